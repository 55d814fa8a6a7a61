//! Document Links stage (§4.4): proposes which of the vector-search
//! candidates (already similarity-thresholded by the caller, §4.7) this
//! document should be linked to, and writes the result into a
//! `document_link`-typed custom field.

use crate::confirmation_loop::{run, ConfirmationLoopInputs, StageOutcome};
use crate::context::{StageContext, StageRunOutcome};
use crate::errors::StageResult;
use crate::{review, transition};
use doc_enrich_core::{CustomFieldId, CustomFieldValue, Document, DocumentId, PendingReviewKind, Stage};
use std::collections::HashMap;

pub async fn run_stage(ctx: &StageContext, doc: &Document, candidates: &[(DocumentId, f32)], link_field_id: CustomFieldId) -> StageResult<StageRunOutcome> {
    if candidates.is_empty() {
        transition::advance(ctx, doc.id, &doc.tag_ids, Stage::DocumentLinksDone).await?;
        return Ok(StageRunOutcome::Applied { attempts: 0 });
    }

    let candidate_listing: Vec<String> = candidates.iter().map(|(id, score)| format!("{id} (score {score:.2})")).collect();

    let mut base_vars = HashMap::new();
    base_vars.insert("document_content", doc.content.clone());
    base_vars.insert("existing_entities", candidate_listing.join(", "));

    let outcome = run(
        &ctx.llm,
        &ctx.prompts,
        &ctx.queue,
        ConfirmationLoopInputs {
            kind: PendingReviewKind::DocumentLink,
            stage_key: "document_links",
            language: &ctx.config.prompt_language,
            max_retries: ctx.config.confirmation.max_retries,
            base_vars,
            approval_keywords: &ctx.config.confirmation.approval_keywords,
        },
    )
    .await?;

    match outcome {
        StageOutcome::Confirmed { analysis, attempts } => {
            let linked: Vec<DocumentId> = analysis.suggested_value.as_array().map(|arr| arr.iter().filter_map(|v| v.as_i64()).collect()).unwrap_or_default();
            if !linked.is_empty() {
                ctx.dms.set_custom_field(doc.id, link_field_id, &CustomFieldValue::DocumentLink(linked)).await?;
            }
            transition::advance(ctx, doc.id, &doc.tag_ids, Stage::DocumentLinksDone).await?;
            Ok(StageRunOutcome::Applied { attempts })
        }
        StageOutcome::NeedsReview { last_analysis, last_feedback } => {
            let pending = review::from_exhausted_loop(doc, PendingReviewKind::DocumentLink, last_analysis, last_feedback, Stage::DocumentLinksDone, &ctx.config.tags);
            let id = ctx.queue.add(&pending).await?;
            Ok(StageRunOutcome::QueuedForReview { review_id: id })
        }
    }
}
