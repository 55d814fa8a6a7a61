//! Title stage (§4.4): free-text suggestion, no entity resolution.

use crate::confirmation_loop::{run, ConfirmationLoopInputs, StageOutcome};
use crate::context::{StageContext, StageRunOutcome};
use crate::errors::StageResult;
use crate::{review, transition};
use doc_enrich_core::{Document, PendingReviewKind, Stage};
use std::collections::HashMap;

pub async fn run_stage(ctx: &StageContext, doc: &Document) -> StageResult<StageRunOutcome> {
    let mut base_vars = HashMap::new();
    base_vars.insert("document_content", doc.content.clone());
    base_vars.insert("existing_value", doc.title.clone());

    let outcome = run(
        &ctx.llm,
        &ctx.prompts,
        &ctx.queue,
        ConfirmationLoopInputs {
            kind: PendingReviewKind::Title,
            stage_key: "title",
            language: &ctx.config.prompt_language,
            max_retries: ctx.config.confirmation.max_retries,
            base_vars,
            approval_keywords: &ctx.config.confirmation.approval_keywords,
        },
    )
    .await?;

    match outcome {
        StageOutcome::Confirmed { analysis, attempts } => {
            let title = analysis.suggested_value.as_str().unwrap_or(&doc.title).to_string();
            ctx.dms.set_title(doc.id, &title).await?;
            transition::advance(ctx, doc.id, &doc.tag_ids, Stage::TitleDone).await?;
            Ok(StageRunOutcome::Applied { attempts })
        }
        StageOutcome::NeedsReview { last_analysis, last_feedback } => {
            let pending = review::from_exhausted_loop(doc, PendingReviewKind::Title, last_analysis, last_feedback, Stage::TitleDone, &ctx.config.tags);
            let id = ctx.queue.add(&pending).await?;
            Ok(StageRunOutcome::QueuedForReview { review_id: id })
        }
    }
}
