//! Append-only audit trail for pipeline execution (§3).

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

/// A single append-only entry, for audit and UI replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingLogEntry {
    pub doc_id: DocumentId,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub step: String,
    pub event_type: ProcessingEventType,
    /// Opaque per-event-type payload (§9).
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingEventType {
    StepStart,
    StepComplete,
    StepError,
    NeedsReview,
    SchemaReviewNeeded,
    PipelinePaused,
    PipelineComplete,
    Error,
}
