//! In-memory records produced during one stage invocation (§3).

use serde::{Deserialize, Serialize};

/// Produced by an analyst model for one stage and one document. Lifetime is
/// bounded by a single stage invocation — never persisted as-is (a failed
/// [`Analysis`] becomes part of a [`crate::pending_review::PendingReview`]
/// only after the retry budget is exhausted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub suggested_value: serde_json::Value,
    pub reasoning: String,
    pub confidence: f32,
    pub alternatives: Vec<serde_json::Value>,
    pub attempts_used: u32,
}

impl Analysis {
    /// A best-effort analysis with capped confidence, used when the LLM
    /// adapter's response parser falls back to text extraction (§4.2).
    pub fn best_effort(suggested_value: serde_json::Value, reasoning: impl Into<String>) -> Self {
        Self {
            suggested_value,
            reasoning: reasoning.into(),
            confidence: 0.5,
            alternatives: Vec::new(),
            attempts_used: 0,
        }
    }

    pub fn is_empty_suggestion(&self) -> bool {
        match &self.suggested_value {
            serde_json::Value::Null => true,
            serde_json::Value::String(s) => s.trim().is_empty(),
            serde_json::Value::Array(a) => a.is_empty(),
            serde_json::Value::Object(o) => o.is_empty(),
            _ => false,
        }
    }
}

/// Extracted from the reviewer model's response (§3). Lifetime is one
/// confirmation round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationVerdict {
    pub confirmed: bool,
    pub feedback: Option<String>,
}

impl ConfirmationVerdict {
    pub fn confirmed() -> Self {
        Self { confirmed: true, feedback: None }
    }

    pub fn rejected(feedback: impl Into<String>) -> Self {
        Self { confirmed: false, feedback: Some(feedback.into()) }
    }
}
