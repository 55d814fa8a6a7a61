//! Errors local to indexing, mirroring `stage_engines::errors::StageError`:
//! wrap `PipelineError` for anything that should carry the
//! transient/permanent distinction through to the orchestrator, plus one
//! local variant for Qdrant-specific failures that don't map cleanly.

use thiserror::Error;

pub type IndexResult<T> = Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] doc_enrich_core::PipelineError),

    #[error("qdrant error: {0}")]
    Qdrant(String),
}

impl From<IndexError> for doc_enrich_core::PipelineError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::Pipeline(p) => p,
            IndexError::Qdrant(msg) => doc_enrich_core::PipelineError::TransientExternal { service: "vector_store".into(), message: msg },
        }
    }
}

impl From<llm_adapter::LlmError> for IndexError {
    fn from(e: llm_adapter::LlmError) -> Self {
        IndexError::Pipeline(e.into())
    }
}

impl From<dms_adapter::DmsError> for IndexError {
    fn from(e: dms_adapter::DmsError) -> Self {
        IndexError::Pipeline(e.into())
    }
}
