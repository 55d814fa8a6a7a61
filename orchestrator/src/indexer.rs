//! Injected interface to the Vector Indexer (C7). The orchestrator depends
//! on this trait rather than the `vector-indexer` crate directly — §9's
//! "cyclic graphs via injected interfaces" design note: `vector-indexer`
//! itself needs the LLM adapter and document projections the orchestrator
//! owns, so the dependency points inward, not outward.

use async_trait::async_trait;
use doc_enrich_core::{Document, PipelineError};

#[async_trait]
pub trait DocumentIndexer: Send + Sync {
    /// Builds a projection of `doc`, embeds it and upserts it into the
    /// vector store. Per §4.7, a failure here is logged but must never fail
    /// the pipeline — implementations should return `Ok(())` even after
    /// logging an internal error, which is why the signature still returns
    /// a `Result`: only a caller that wants to surface the failure (tests,
    /// health checks) needs the `Err` path.
    async fn index_after_links(&self, doc: &Document) -> Result<(), PipelineError>;
}

/// Used when `vector_search.enabled` is false or no indexer was wired up.
pub struct NoopIndexer;

#[async_trait]
impl DocumentIndexer for NoopIndexer {
    async fn index_after_links(&self, _doc: &Document) -> Result<(), PipelineError> {
        Ok(())
    }
}
