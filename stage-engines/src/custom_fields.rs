//! Custom Fields stage (§4.4): the analyst extracts values for a
//! caller-supplied field schema; each value is independently validated
//! against its declared type before being written — a value that fails
//! validation is dropped with a log entry, it does not fail the stage.

use crate::confirmation_loop::{run, ConfirmationLoopInputs, StageOutcome};
use crate::context::{StageContext, StageRunOutcome};
use crate::errors::StageResult;
use crate::{review, transition};
use doc_enrich_core::{CustomFieldId, CustomFieldType, CustomFieldValue, Document, PendingReviewKind, Stage};
use std::collections::HashMap;

pub async fn run_stage(ctx: &StageContext, doc: &Document, field_schema: &HashMap<CustomFieldId, (String, CustomFieldType)>) -> StageResult<StageRunOutcome> {
    let schema_listing: Vec<String> = field_schema.iter().map(|(id, (name, ty))| format!("{id}:{name} ({ty:?})")).collect();

    let mut base_vars = HashMap::new();
    base_vars.insert("document_content", doc.content.clone());
    base_vars.insert("existing_entities", schema_listing.join(", "));

    let outcome = run(
        &ctx.llm,
        &ctx.prompts,
        &ctx.queue,
        ConfirmationLoopInputs {
            kind: PendingReviewKind::CustomField,
            stage_key: "custom_fields",
            language: &ctx.config.prompt_language,
            max_retries: ctx.config.confirmation.max_retries,
            base_vars,
            approval_keywords: &ctx.config.confirmation.approval_keywords,
        },
    )
    .await?;

    match outcome {
        StageOutcome::Confirmed { analysis, attempts } => {
            let proposed = analysis.suggested_value.as_object().cloned().unwrap_or_default();
            for (field_id, (name, expected_type)) in field_schema {
                let Some(raw) = proposed.get(&field_id.to_string()).or_else(|| proposed.get(name)) else {
                    continue;
                };
                match CustomFieldValue::from_json(*expected_type, raw) {
                    Some(value) => ctx.dms.set_custom_field(doc.id, *field_id, &value).await?,
                    None => tracing::warn!(field = %name, field_id, "dropping custom field value that failed type validation"),
                }
            }
            transition::advance(ctx, doc.id, &doc.tag_ids, Stage::CustomFieldsDone).await?;
            Ok(StageRunOutcome::Applied { attempts })
        }
        StageOutcome::NeedsReview { last_analysis, last_feedback } => {
            let pending = review::from_exhausted_loop(doc, PendingReviewKind::CustomField, last_analysis, last_feedback, Stage::CustomFieldsDone, &ctx.config.tags);
            let id = ctx.queue.add(&pending).await?;
            Ok(StageRunOutcome::QueuedForReview { review_id: id })
        }
    }
}
