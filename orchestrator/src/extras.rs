//! Per-run inputs a handful of stages need beyond the document itself.
//! Kept separate from [`doc_enrich_core::PipelineConfig`] because these are
//! dynamic facts about the DMS schema and the vector search results, not
//! static configuration.

use doc_enrich_core::{CustomFieldId, CustomFieldType, DocumentId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct StageExtras {
    /// `field_id -> (name, declared type)` for every custom field the
    /// Custom Fields stage should attempt to populate.
    pub custom_field_schema: HashMap<CustomFieldId, (String, CustomFieldType)>,
    /// The custom field the Document Links stage writes into.
    pub document_link_field_id: Option<CustomFieldId>,
    /// Vector-search candidates for Document Links, already
    /// similarity-thresholded by the caller (§4.7).
    pub link_candidates: Vec<(DocumentId, f32)>,
    /// Correspondent/document-type/tag names shown to Schema Analysis.
    pub schema_existing_entities: Vec<String>,
}
