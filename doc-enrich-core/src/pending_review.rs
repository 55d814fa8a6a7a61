//! Durable pending-review records and schema suggestions (§3, §4.3).

use crate::document::{DocumentId, EntityKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of value a [`PendingReview`] is waiting on a human to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingReviewKind {
    Title,
    Correspondent,
    DocumentType,
    Tag,
    CustomField,
    DocumentLink,
    SchemaSuggestion,
}

impl PendingReviewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PendingReviewKind::Title => "title",
            PendingReviewKind::Correspondent => "correspondent",
            PendingReviewKind::DocumentType => "document_type",
            PendingReviewKind::Tag => "tag",
            PendingReviewKind::CustomField => "custom_field",
            PendingReviewKind::DocumentLink => "document_link",
            PendingReviewKind::SchemaSuggestion => "schema_suggestion",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "title" => PendingReviewKind::Title,
            "correspondent" => PendingReviewKind::Correspondent,
            "document_type" => PendingReviewKind::DocumentType,
            "tag" => PendingReviewKind::Tag,
            "custom_field" => PendingReviewKind::CustomField,
            "document_link" => PendingReviewKind::DocumentLink,
            "schema_suggestion" => PendingReviewKind::SchemaSuggestion,
            _ => return None,
        })
    }
}

/// Durable record created when a stage exhausts its retry budget, or when
/// schema analysis proposes a net-new entity that policy forbids
/// auto-creating (§3). Destroyed on approve/reject/bulk-resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingReview {
    pub id: Uuid,
    pub doc_id: DocumentId,
    pub doc_title: String,
    pub kind: PendingReviewKind,
    pub suggestion: serde_json::Value,
    pub reasoning: String,
    pub alternatives: Vec<serde_json::Value>,
    pub attempts: u32,
    pub last_feedback: Option<String>,
    /// The workflow tag to apply if the reviewer ultimately approves.
    pub next_tag: Option<String>,
    /// Opaque per-kind metadata (§9: semi-structured, not one algebraic type).
    pub metadata: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PendingReview {
    /// Normalizes a suggestion to a canonical string for uniqueness
    /// comparisons ((I2), §4.3 `add`, blocklist membership).
    pub fn normalize_suggestion(suggestion: &serde_json::Value) -> String {
        match suggestion {
            serde_json::Value::String(s) => s.trim().to_lowercase(),
            other => serde_json::to_string(other).unwrap_or_default().to_lowercase(),
        }
    }
}

/// Emitted by schema analysis; each becomes a `PendingReview` of kind
/// `schema_suggestion` (§3, §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSuggestion {
    pub entity_kind: EntityKind,
    pub suggested_name: String,
    pub confidence: f32,
    pub similar_to_existing: Vec<String>,
}
