//! Schema Analysis stage (§4.4): proposes new correspondent/document-type/
//! tag names this document suggests are missing from the namespace. Unlike
//! the other stages, a confirmed proposal doesn't get applied directly —
//! every suggested entity still needs an explicit human decision before it
//! enters the namespace, so the stage's job is to raise one
//! [`doc_enrich_core::PendingReview`] per suggestion and pause the document
//! at [`Stage::SchemaReview`] until they're all resolved (the orchestrator,
//! not this stage, advances past `SchemaReview` once the queue is clear).

use crate::confirmation_loop::{run, ConfirmationLoopInputs, StageOutcome};
use crate::context::{StageContext, StageRunOutcome};
use crate::errors::StageResult;
use crate::{review, transition};
use doc_enrich_core::{Document, EntityKind, PendingReview, PendingReviewKind, SchemaSuggestion, Stage};
use std::collections::HashMap;
use uuid::Uuid;

pub async fn run_stage(ctx: &StageContext, doc: &Document, existing_entities: &[String]) -> StageResult<StageRunOutcome> {
    let mut base_vars = HashMap::new();
    base_vars.insert("document_content", doc.content.clone());
    base_vars.insert("existing_entities", existing_entities.join(", "));

    let outcome = run(
        &ctx.llm,
        &ctx.prompts,
        &ctx.queue,
        ConfirmationLoopInputs {
            kind: PendingReviewKind::SchemaSuggestion,
            stage_key: "schema_analysis",
            language: &ctx.config.prompt_language,
            max_retries: ctx.config.confirmation.max_retries,
            base_vars,
            approval_keywords: &ctx.config.confirmation.approval_keywords,
        },
    )
    .await?;

    match outcome {
        StageOutcome::Confirmed { analysis, attempts } => {
            let suggestions = parse_suggestions(&analysis.suggested_value);
            if suggestions.is_empty() {
                transition::advance(ctx, doc.id, &doc.tag_ids, Stage::SchemaAnalysisDone).await?;
                return Ok(StageRunOutcome::Applied { attempts });
            }
            for suggestion in &suggestions {
                let pending = PendingReview {
                    id: Uuid::new_v4(),
                    doc_id: doc.id,
                    doc_title: doc.title.clone(),
                    kind: PendingReviewKind::SchemaSuggestion,
                    suggestion: serde_json::json!(suggestion.suggested_name),
                    reasoning: analysis.reasoning.clone(),
                    alternatives: vec![],
                    attempts,
                    last_feedback: None,
                    next_tag: Some(ctx.config.tags.tag_name(Stage::SchemaAnalysisDone).to_string()),
                    metadata: serde_json::to_value(suggestion).unwrap_or_else(|_| serde_json::json!({})),
                    created_at: chrono::Utc::now(),
                };
                ctx.queue.add(&pending).await?;
            }
            transition::advance(ctx, doc.id, &doc.tag_ids, Stage::SchemaReview).await?;
            Ok(StageRunOutcome::Applied { attempts })
        }
        StageOutcome::NeedsReview { last_analysis, last_feedback } => {
            let pending = review::from_exhausted_loop(doc, PendingReviewKind::SchemaSuggestion, last_analysis, last_feedback, Stage::SchemaAnalysisDone, &ctx.config.tags);
            let id = ctx.queue.add(&pending).await?;
            Ok(StageRunOutcome::QueuedForReview { review_id: id })
        }
    }
}

fn parse_suggestions(value: &serde_json::Value) -> Vec<SchemaSuggestion> {
    let Some(arr) = value.as_array() else { return Vec::new() };
    arr.iter()
        .filter_map(|item| {
            let name = item.get("suggested_name")?.as_str()?.to_string();
            let kind_str = item.get("entity_kind").and_then(|v| v.as_str()).unwrap_or("tag");
            let entity_kind = match kind_str {
                "correspondent" => EntityKind::Correspondent,
                "document_type" => EntityKind::DocumentType,
                _ => EntityKind::Tag,
            };
            let confidence = item.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.5) as f32;
            let similar_to_existing = item
                .get("similar_to_existing")
                .and_then(|v| v.as_array())
                .map(|a| a.iter().filter_map(|s| s.as_str().map(str::to_string)).collect())
                .unwrap_or_default();
            Some(SchemaSuggestion { entity_kind, suggested_name: name, confidence, similar_to_existing })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_suggestion_array() {
        let value = serde_json::json!([
            { "entity_kind": "correspondent", "suggested_name": "Globex", "confidence": 0.8, "similar_to_existing": ["Acme"] }
        ]);
        let parsed = parse_suggestions(&value);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].entity_kind, EntityKind::Correspondent);
        assert_eq!(parsed[0].suggested_name, "Globex");
    }

    #[test]
    fn defaults_missing_entity_kind_to_tag() {
        let value = serde_json::json!([{ "suggested_name": "urgent" }]);
        let parsed = parse_suggestions(&value);
        assert_eq!(parsed[0].entity_kind, EntityKind::Tag);
    }

    #[test]
    fn non_array_input_yields_no_suggestions() {
        assert!(parse_suggestions(&serde_json::json!("not an array")).is_empty());
    }
}
