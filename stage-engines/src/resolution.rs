//! Applies a human's decision on a [`doc_enrich_core::PendingReview`] (§4.3
//! approve/reject, §8 scenario 3): the write each stage engine would have
//! made on `Confirmed`, followed by removing the review and advancing past
//! `manual_review`.

use crate::context::StageContext;
use crate::errors::StageResult;
use doc_enrich_core::{
    CustomFieldId, CustomFieldType, CustomFieldValue, EntityKind, PendingReview, PendingReviewKind, ProcessingEventType, ProcessingLogEntry,
    SchemaSuggestion, SidebandTag,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Extra context a single pending review doesn't carry on its own — the
/// custom field schema and the document-link field id are orchestrator-run
/// concerns (`StageExtras`), not part of the durable review record.
#[derive(Debug, Default, Clone)]
pub struct ResolutionContext {
    pub custom_field_schema: HashMap<CustomFieldId, (String, CustomFieldType)>,
    pub document_link_field_id: Option<CustomFieldId>,
}

/// Approves `review_id`, optionally overriding its suggested value (§8
/// scenario 3's `value="Amazon Invoice — 2024-01-15"`), applies the write,
/// then removes the review and clears `manual_review` if it was the last
/// one outstanding for the document.
pub async fn approve(ctx: &StageContext, review_id: Uuid, override_value: Option<serde_json::Value>, extras: &ResolutionContext) -> StageResult<()> {
    let review = ctx.queue.get_by_id(review_id).await?;
    let value = override_value.unwrap_or_else(|| review.suggestion.clone());
    let doc = ctx.dms.get_document(review.doc_id).await?;

    match review.kind {
        PendingReviewKind::Title => {
            let title = value.as_str().unwrap_or(&doc.title).to_string();
            ctx.dms.set_title(doc.id, &title).await?;
        }
        PendingReviewKind::Correspondent | PendingReviewKind::DocumentType => {
            let kind = if review.kind == PendingReviewKind::Correspondent { EntityKind::Correspondent } else { EntityKind::DocumentType };
            let name = value.as_str().unwrap_or_default().trim();
            if !name.is_empty() {
                let entity = ctx.dms.create_or_lookup_entity(kind, name).await?;
                match kind {
                    EntityKind::Correspondent => ctx.dms.set_correspondent(doc.id, entity.id).await?,
                    EntityKind::DocumentType => ctx.dms.set_document_type(doc.id, entity.id).await?,
                    EntityKind::Tag => unreachable!(),
                }
            }
        }
        PendingReviewKind::Tag => {
            let names: Vec<String> = value.as_array().map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()).unwrap_or_default();
            let current = ctx.dms.tag_cache().names_of(&doc.tag_ids);
            let mut add_ids = std::collections::HashSet::new();
            for name in &names {
                if current.contains(name) {
                    continue;
                }
                let entity = ctx.dms.create_or_lookup_entity(EntityKind::Tag, name).await?;
                add_ids.insert(entity.id);
            }
            if !add_ids.is_empty() {
                ctx.dms.set_tags(doc.id, &doc.tag_ids, &add_ids, &std::collections::HashSet::new()).await?;
            }
        }
        PendingReviewKind::CustomField => {
            if let Some(proposed) = value.as_object() {
                for (field_id, (name, expected_type)) in &extras.custom_field_schema {
                    let Some(raw) = proposed.get(&field_id.to_string()).or_else(|| proposed.get(name)) else { continue };
                    if let Some(field_value) = CustomFieldValue::from_json(*expected_type, raw) {
                        ctx.dms.set_custom_field(doc.id, *field_id, &field_value).await?;
                    }
                }
            }
        }
        PendingReviewKind::DocumentLink => {
            if let Some(field_id) = extras.document_link_field_id {
                let linked: Vec<i64> = value.as_array().map(|a| a.iter().filter_map(|v| v.as_i64()).collect()).unwrap_or_default();
                if !linked.is_empty() {
                    ctx.dms.set_custom_field(doc.id, field_id, &CustomFieldValue::DocumentLink(linked)).await?;
                }
            }
        }
        PendingReviewKind::SchemaSuggestion => {
            if let Ok(suggestion) = serde_json::from_value::<SchemaSuggestion>(review.metadata.clone()) {
                let name = value.as_str().unwrap_or(&suggestion.suggested_name);
                ctx.dms.create_or_lookup_entity(suggestion.entity_kind, name).await?;
            }
        }
    }

    finish_approved(ctx, &review).await
}

/// Rejects `review_id` without writing anything, optionally blocklisting the
/// suggestion so the analyst never proposes it again for this document kind
/// (P5), and optionally recording the reviewer's feedback on why.
///
/// Unlike [`approve`], rejection never advances the document past
/// `manual_review` — the document stays parked there for a human to resolve
/// some other way (§4.3).
pub async fn reject(ctx: &StageContext, review_id: Uuid, blocklist: bool, feedback: Option<String>) -> StageResult<()> {
    let review = ctx.queue.get_by_id(review_id).await?;
    if blocklist {
        let suggestion_text = review.suggestion.as_str().map(str::to_string).unwrap_or_else(|| review.suggestion.to_string());
        ctx.queue.block(Some(review.kind), &suggestion_text).await?;
    }
    finish_rejected(ctx, &review, feedback).await
}

/// Removes the review and, if it was the document's last outstanding one,
/// advances it onto `next_tag` and clears the `manual_review` sideband.
async fn finish_approved(ctx: &StageContext, review: &PendingReview) -> StageResult<()> {
    ctx.queue.remove(review.id).await?;

    let remaining = ctx.queue.list(None, Some(review.doc_id)).await?;
    if !remaining.is_empty() {
        return Ok(());
    }

    let doc = ctx.dms.get_document(review.doc_id).await?;
    let current_names = ctx.dms.tag_cache().names_of(&doc.tag_ids);

    let mut add = std::collections::HashSet::new();
    if let Some(next_tag) = &review.next_tag {
        if let Some(tag_id) = ctx.dms.tag_cache().id_of(next_tag) {
            add.insert(tag_id);
        }
    }
    let mut remove = std::collections::HashSet::new();
    if ctx.config.tags.has_sideband(&current_names, SidebandTag::ManualReview) {
        if let Some(tag_id) = ctx.dms.tag_cache().id_of(ctx.config.tags.sideband_tag_name(SidebandTag::ManualReview)) {
            remove.insert(tag_id);
        }
    }

    if !add.is_empty() || !remove.is_empty() {
        ctx.dms.set_tags(doc.id, &doc.tag_ids, &add, &remove).await?;
    }
    Ok(())
}

/// Records the feedback (if any), removes the review, and tags the document
/// with `manual_review` (§4.3) — never `next_tag`, so a rejected suggestion
/// never reads as though it had been approved.
async fn finish_rejected(ctx: &StageContext, review: &PendingReview, feedback: Option<String>) -> StageResult<()> {
    if let Some(feedback) = feedback {
        let entry = ProcessingLogEntry {
            doc_id: review.doc_id,
            timestamp: chrono::Utc::now(),
            step: review.kind.as_str().to_string(),
            event_type: ProcessingEventType::NeedsReview,
            data: serde_json::json!({
                "review_id": review.id,
                "action": "rejected",
                "suggestion": review.suggestion,
                "feedback": feedback,
            }),
        };
        review_queue::processing_log::append(ctx.queue.pool(), &entry).await?;
    }

    ctx.queue.remove(review.id).await?;

    let doc = ctx.dms.get_document(review.doc_id).await?;
    crate::transition::add_sideband(ctx, doc.id, &doc.tag_ids, SidebandTag::ManualReview).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_context_defaults_are_empty() {
        let extras = ResolutionContext::default();
        assert!(extras.custom_field_schema.is_empty());
        assert!(extras.document_link_field_id.is_none());
    }

    #[test]
    fn schema_suggestion_metadata_roundtrips() {
        let suggestion = SchemaSuggestion {
            entity_kind: EntityKind::DocumentType,
            suggested_name: "Lease Agreement".to_string(),
            confidence: 0.82,
            similar_to_existing: Vec::new(),
        };
        let metadata = serde_json::to_value(&suggestion).unwrap();
        let recovered: SchemaSuggestion = serde_json::from_value(metadata).unwrap();
        assert_eq!(recovered.entity_kind, EntityKind::DocumentType);
        assert_eq!(recovered.suggested_name, "Lease Agreement");
    }
}
