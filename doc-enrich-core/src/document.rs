//! The external `Document` entity and the value types attached to it.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type DocumentId = i64;
pub type EntityId = i64;
pub type TagId = i64;
pub type CustomFieldId = i64;

/// Projection of a document as read from the DMS. Mutated exclusively
/// through the DMS Adapter (C1); never cached beyond one call (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub correspondent_id: Option<EntityId>,
    pub document_type_id: Option<EntityId>,
    pub tag_ids: HashSet<TagId>,
    pub custom_fields: HashMap<CustomFieldId, CustomFieldValue>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Resolves the document's current tag *names* given an id→name map
    /// (the tag-ID↔name cache owned by the DMS Adapter).
    pub fn tag_names(&self, tag_id_to_name: &HashMap<TagId, String>) -> HashSet<String> {
        self.tag_ids
            .iter()
            .filter_map(|id| tag_id_to_name.get(id).cloned())
            .collect()
    }
}

/// The kind of a named DMS entity namespace that stage engines may need to
/// create-or-lookup by name (§4.1, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Correspondent,
    DocumentType,
    Tag,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Correspondent => "correspondent",
            EntityKind::DocumentType => "document_type",
            EntityKind::Tag => "tag",
        }
    }
}

/// A named DMS entity (correspondent, document type, or tag) as returned by
/// list/create-or-lookup operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub id: EntityId,
    pub name: String,
}

/// Supported custom-field value types (§4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CustomFieldValue {
    String(String),
    Url(String),
    Date(chrono::NaiveDate),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Monetary(String),
    DocumentLink(Vec<DocumentId>),
    Select(String),
}

/// The declared type of a custom field, used to validate a proposed value
/// before writing it (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomFieldType {
    String,
    Url,
    Date,
    Boolean,
    Integer,
    Float,
    Monetary,
    DocumentLink,
    Select,
}

impl CustomFieldValue {
    /// The declared type this value instance corresponds to.
    pub fn field_type(&self) -> CustomFieldType {
        match self {
            CustomFieldValue::String(_) => CustomFieldType::String,
            CustomFieldValue::Url(_) => CustomFieldType::Url,
            CustomFieldValue::Date(_) => CustomFieldType::Date,
            CustomFieldValue::Boolean(_) => CustomFieldType::Boolean,
            CustomFieldValue::Integer(_) => CustomFieldType::Integer,
            CustomFieldValue::Float(_) => CustomFieldType::Float,
            CustomFieldValue::Monetary(_) => CustomFieldType::Monetary,
            CustomFieldValue::DocumentLink(_) => CustomFieldType::DocumentLink,
            CustomFieldValue::Select(_) => CustomFieldType::Select,
        }
    }

    /// Validates a raw JSON value against a configured field type (§4.4),
    /// returning the typed value or `None` if it fails validation (the
    /// caller drops the field with a log entry per spec, it does not error).
    pub fn from_json(expected: CustomFieldType, raw: &serde_json::Value) -> Option<Self> {
        match expected {
            CustomFieldType::String => raw.as_str().map(|s| CustomFieldValue::String(s.to_string())),
            CustomFieldType::Url => raw
                .as_str()
                .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
                .map(|s| CustomFieldValue::Url(s.to_string())),
            CustomFieldType::Date => raw
                .as_str()
                .and_then(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(CustomFieldValue::Date),
            CustomFieldType::Boolean => raw.as_bool().map(CustomFieldValue::Boolean),
            CustomFieldType::Integer => raw.as_i64().map(CustomFieldValue::Integer),
            CustomFieldType::Float => raw.as_f64().map(CustomFieldValue::Float),
            CustomFieldType::Monetary => raw
                .as_str()
                .filter(|s| s.chars().any(|c| c.is_ascii_digit()))
                .map(|s| CustomFieldValue::Monetary(s.to_string())),
            CustomFieldType::DocumentLink => raw.as_array().map(|arr| {
                CustomFieldValue::DocumentLink(arr.iter().filter_map(|v| v.as_i64()).collect())
            }),
            CustomFieldType::Select => raw.as_str().map(|s| CustomFieldValue::Select(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_validation_rejects_non_url_strings() {
        let raw = serde_json::json!("not-a-url");
        assert!(CustomFieldValue::from_json(CustomFieldType::Url, &raw).is_none());
    }

    #[test]
    fn date_validation_accepts_iso_date() {
        let raw = serde_json::json!("2024-01-15");
        let v = CustomFieldValue::from_json(CustomFieldType::Date, &raw).unwrap();
        assert_eq!(v.field_type(), CustomFieldType::Date);
    }
}
