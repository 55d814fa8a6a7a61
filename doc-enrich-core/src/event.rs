//! Stream-mode event types emitted by the orchestrator (§4.5, §6).
//!
//! The event stream for one document is a valid sentence in the grammar
//! (P6, §8):
//! `pipeline_start (step_start (step_complete|step_error|needs_review))* (pipeline_complete|pipeline_paused|error)`

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventKind {
    PipelineStart,
    StepStart,
    StepComplete,
    StepError,
    NeedsReview,
    SchemaReviewNeeded,
    PipelinePaused,
    PipelineComplete,
    Error,
}

/// One event in the newline-delimited JSON wire format (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub kind: PipelineEventKind,
    pub doc_id: DocumentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl PipelineEvent {
    pub fn new(kind: PipelineEventKind, doc_id: DocumentId) -> Self {
        Self {
            kind,
            doc_id,
            step: None,
            data: None,
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Serializes to one NDJSON line (including the trailing newline).
    pub fn to_ndjson_line(&self) -> String {
        let mut s = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());
        s.push('\n');
        s
    }
}

/// Lightweight, in-order validator for the event-stream grammar (P6).
/// Used by tests and by the orchestrator's own debug assertions.
#[derive(Debug, Default)]
pub struct EventGrammarValidator {
    started: bool,
    in_step: bool,
    terminated: bool,
}

impl EventGrammarValidator {
    pub fn push(&mut self, kind: PipelineEventKind) -> Result<(), String> {
        use PipelineEventKind::*;
        if self.terminated {
            return Err(format!("event {kind:?} after stream terminated"));
        }
        match kind {
            PipelineStart => {
                if self.started {
                    return Err("duplicate pipeline_start".into());
                }
                self.started = true;
            }
            StepStart => {
                if !self.started {
                    return Err("step_start before pipeline_start".into());
                }
                if self.in_step {
                    return Err("step_start while another step is open".into());
                }
                self.in_step = true;
            }
            StepComplete | StepError | NeedsReview => {
                if !self.in_step {
                    return Err(format!("{kind:?} without a matching step_start"));
                }
                self.in_step = false;
            }
            SchemaReviewNeeded => {
                if !self.started {
                    return Err("schema_review_needed before pipeline_start".into());
                }
            }
            PipelinePaused | PipelineComplete | Error => {
                if !self.started {
                    return Err(format!("{kind:?} before pipeline_start"));
                }
                if self.in_step {
                    return Err(format!("{kind:?} while a step is still open"));
                }
                self.terminated = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineEventKind::*;

    #[test]
    fn happy_path_grammar_is_valid() {
        let mut v = EventGrammarValidator::default();
        for k in [PipelineStart, StepStart, StepComplete, StepStart, StepComplete, PipelineComplete] {
            v.push(k).unwrap();
        }
    }

    #[test]
    fn step_complete_without_start_is_rejected() {
        let mut v = EventGrammarValidator::default();
        v.push(PipelineStart).unwrap();
        assert!(v.push(StepComplete).is_err());
    }

    #[test]
    fn events_after_terminal_are_rejected() {
        let mut v = EventGrammarValidator::default();
        v.push(PipelineStart).unwrap();
        v.push(PipelineComplete).unwrap();
        assert!(v.push(StepStart).is_err());
    }
}
