//! Bulk ingest and bootstrap (§4.6): one-off variants of the scheduler tick
//! that walk the whole DMS corpus at a configurable rate rather than just
//! the handful of documents a normal tick admits.

use doc_enrich_core::{DocumentId, Stage};
use orchestrator::{extras::StageExtras, indexer::DocumentIndexer, run_batch};
use stage_engines::context::StageContext;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct BulkReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs every document in `doc_ids` through the pipeline in batch mode at
/// `documents_per_second`, used both for bulk ingest (a known document set,
/// e.g. just-imported) and bootstrap (every document currently in `pending`).
pub async fn run_at_rate(
    stage_ctx: &StageContext,
    indexer: &dyn DocumentIndexer,
    doc_ids: &[DocumentId],
    documents_per_second: f64,
) -> BulkReport {
    let mut report = BulkReport::default();
    let delay = if documents_per_second > 0.0 {
        Duration::from_secs_f64(1.0 / documents_per_second)
    } else {
        Duration::ZERO
    };
    let extras = StageExtras::default();

    for &doc_id in doc_ids {
        report.attempted += 1;
        match run_batch(stage_ctx, indexer, doc_id, &extras).await {
            Ok(result) if result.success => report.succeeded += 1,
            Ok(_) => report.failed += 1,
            Err(e) => {
                tracing::warn!(doc_id, error = %e, "bulk run failed for document");
                report.failed += 1;
            }
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    report
}

/// Discovers every document still at `pending` and runs them all (§4.6
/// "bootstrap"). Distinct from a normal tick in that it ignores the
/// in-flight cap and the user-activity pause — it's meant to be invoked
/// explicitly, not by the timer loop.
pub async fn bootstrap(
    stage_ctx: &StageContext,
    indexer: &dyn DocumentIndexer,
    documents_per_second: f64,
) -> Result<BulkReport, doc_enrich_core::PipelineError> {
    let pending_tag = stage_ctx.config.tags.tag_name(Stage::Pending);
    let Some(tag_id) = stage_ctx.dms.tag_cache().id_of(pending_tag) else {
        return Ok(BulkReport::default());
    };
    let docs = stage_ctx.dms.list_documents_by_tag(tag_id).await?;
    let ids: Vec<DocumentId> = docs.into_iter().map(|d| d.id).collect();
    Ok(run_at_rate(stage_ctx, indexer, &ids, documents_per_second).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_yields_no_delay() {
        let delay = if 0.0_f64 > 0.0 { Duration::from_secs_f64(1.0) } else { Duration::ZERO };
        assert_eq!(delay, Duration::ZERO);
    }
}
