//! Builds the [`doc_enrich_core::PendingReview`] record a stage enqueues
//! when it runs out of retries (§4.3, §4.4 `queue_for_review`).

use doc_enrich_core::{Analysis, Document, PendingReview, PendingReviewKind, Stage};
use uuid::Uuid;

pub fn from_exhausted_loop(
    doc: &Document,
    kind: PendingReviewKind,
    last_analysis: Analysis,
    last_feedback: Option<String>,
    next_stage: Stage,
    tags: &doc_enrich_core::WorkflowTagConfig,
) -> PendingReview {
    PendingReview {
        id: Uuid::new_v4(),
        doc_id: doc.id,
        doc_title: doc.title.clone(),
        kind,
        suggestion: last_analysis.suggested_value,
        reasoning: last_analysis.reasoning,
        alternatives: last_analysis.alternatives,
        attempts: last_analysis.attempts_used,
        last_feedback,
        next_tag: Some(tags.tag_name(next_stage).to_string()),
        metadata: serde_json::json!({}),
        created_at: chrono::Utc::now(),
    }
}
