//! Batch-mode entry point: run a document to completion (or the first
//! pause) and return a summary, discarding the individual events (§4.5).

use crate::engine::{self, DriveOutcome};
use crate::extras::StageExtras;
use crate::indexer::DocumentIndexer;
use crate::step::Step;
use doc_enrich_core::{DocumentId, PipelineResult};
use serde::Serialize;
use stage_engines::context::StageContext;
use std::collections::HashMap;

/// Mirrors [`DriveOutcome`] but is the shape handed back across the `api`
/// crate's boundary, so it derives `Serialize` independently of the
/// engine's internal type.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub steps: HashMap<String, StepSummary>,
    pub success: bool,
    pub needs_review: bool,
    pub schema_review_needed: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub success: bool,
    pub attempts: u32,
    pub needs_review: bool,
}

impl From<DriveOutcome> for BatchResult {
    fn from(o: DriveOutcome) -> Self {
        BatchResult {
            steps: o
                .steps
                .into_iter()
                .map(|(k, v)| {
                    (
                        k,
                        StepSummary { success: v.success, attempts: v.attempts, needs_review: v.needs_review },
                    )
                })
                .collect(),
            success: o.success,
            needs_review: o.needs_review,
            schema_review_needed: o.schema_review_needed,
            error: o.error,
        }
    }
}

pub async fn run_batch(
    stage_ctx: &StageContext,
    indexer: &dyn DocumentIndexer,
    doc_id: DocumentId,
    extras: &StageExtras,
) -> PipelineResult<BatchResult> {
    let outcome = engine::drive(stage_ctx, indexer, doc_id, extras, None, |_event| {}).await?;
    Ok(outcome.into())
}

/// Runs exactly one step, regardless of what the document's current
/// workflow tag says should run next (§4.5 "Per-step ad-hoc invocation").
pub async fn run_stage_by_name(
    stage_ctx: &StageContext,
    indexer: &dyn DocumentIndexer,
    doc_id: DocumentId,
    step_key: &str,
    extras: &StageExtras,
) -> PipelineResult<BatchResult> {
    let step = Step::from_config_key(step_key)
        .ok_or_else(|| doc_enrich_core::PipelineError::Config(format!("unknown pipeline step '{step_key}'")))?;
    let outcome = engine::drive(stage_ctx, indexer, doc_id, extras, Some(step), |_event| {}).await?;
    Ok(outcome.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StepResult;

    #[test]
    fn batch_result_carries_success_through_from_drive_outcome() {
        let mut steps = HashMap::new();
        steps.insert("title".to_string(), StepResult { success: true, attempts: 2, needs_review: false });
        let outcome = DriveOutcome { steps, success: true, needs_review: false, schema_review_needed: false, error: None };
        let result: BatchResult = outcome.into();
        assert!(result.success);
        assert_eq!(result.steps["title"].attempts, 2);
    }
}
