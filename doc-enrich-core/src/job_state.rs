//! Scheduler bookkeeping (§3, §4.6).

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    pub last_check_at: Option<chrono::DateTime<chrono::Utc>>,
    pub currently_processing_doc_id: Option<DocumentId>,
    pub processed_since_start: u64,
    pub errors_since_start: u64,
    pub paused: bool,
    pub paused_reason: Option<String>,
}

impl JobState {
    pub fn record_tick_start(&mut self, at: chrono::DateTime<chrono::Utc>) {
        self.last_check_at = Some(at);
    }

    pub fn record_success(&mut self) {
        self.processed_since_start += 1;
        self.currently_processing_doc_id = None;
    }

    pub fn record_error(&mut self) {
        self.errors_since_start += 1;
        self.currently_processing_doc_id = None;
    }

    pub fn pause(&mut self, reason: impl Into<String>) {
        self.paused = true;
        self.paused_reason = Some(reason.into());
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.paused_reason = None;
    }
}
