//! Shared engine for the two entity-resolution stages (Correspondent,
//! Document Type): the analyst proposes a name, the reviewer confirms it,
//! and only then does creating a never-seen-before entity get policy-gated
//! by `confirmation.require_user_for_new_entities` (§4.4, §9 Open Question:
//! the reviewer's confirmation is a "this value looks right" judgment, the
//! create-if-absent gate is a separate "may the system introduce a new
//! namespace entry unattended" policy).

use crate::confirmation_loop::{run, ConfirmationLoopInputs, StageOutcome};
use crate::context::{StageContext, StageRunOutcome};
use crate::errors::StageResult;
use crate::{review, transition};
use doc_enrich_core::{Document, EntityKind, PendingReviewKind, Stage};
use std::collections::HashMap;

pub struct EntityStageSpec {
    pub kind: EntityKind,
    pub review_kind: PendingReviewKind,
    pub stage_key: &'static str,
    pub next_stage: Stage,
}

pub async fn run_stage(ctx: &StageContext, doc: &Document, spec: &EntityStageSpec) -> StageResult<StageRunOutcome> {
    let existing = ctx.dms.list_entities(spec.kind).await?;
    let existing_names: Vec<&str> = existing.iter().map(|e| e.name.as_str()).collect();

    let mut base_vars = HashMap::new();
    base_vars.insert("document_content", doc.content.clone());
    base_vars.insert("existing_entities", existing_names.join(", "));

    let outcome = run(
        &ctx.llm,
        &ctx.prompts,
        &ctx.queue,
        ConfirmationLoopInputs {
            kind: spec.review_kind,
            stage_key: spec.stage_key,
            language: &ctx.config.prompt_language,
            max_retries: ctx.config.confirmation.max_retries,
            base_vars,
            approval_keywords: &ctx.config.confirmation.approval_keywords,
        },
    )
    .await?;

    match outcome {
        StageOutcome::Confirmed { analysis, attempts } => {
            let name = analysis.suggested_value.as_str().unwrap_or_default().trim().to_string();
            let matched = existing.iter().find(|e| e.name.eq_ignore_ascii_case(&name));

            if matched.is_none() && ctx.config.confirmation.require_user_for_new_entities {
                let mut pending = review::from_exhausted_loop(
                    doc,
                    spec.review_kind,
                    doc_enrich_core::Analysis { suggested_value: serde_json::json!(name), ..analysis },
                    None,
                    spec.next_stage,
                    &ctx.config.tags,
                );
                pending.metadata = serde_json::json!({ "new_entity": true });
                let id = ctx.queue.add(&pending).await?;
                return Ok(StageRunOutcome::QueuedForReview { review_id: id });
            }

            let entity = match matched {
                Some(e) => e.clone(),
                None => ctx.dms.create_or_lookup_entity(spec.kind, &name).await?,
            };

            match spec.kind {
                EntityKind::Correspondent => ctx.dms.set_correspondent(doc.id, entity.id).await?,
                EntityKind::DocumentType => ctx.dms.set_document_type(doc.id, entity.id).await?,
                EntityKind::Tag => unreachable!("tags stage has its own engine"),
            }
            transition::advance(ctx, doc.id, &doc.tag_ids, spec.next_stage).await?;
            Ok(StageRunOutcome::Applied { attempts })
        }
        StageOutcome::NeedsReview { last_analysis, last_feedback } => {
            let pending = review::from_exhausted_loop(doc, spec.review_kind, last_analysis, last_feedback, spec.next_stage, &ctx.config.tags);
            let id = ctx.queue.add(&pending).await?;
            Ok(StageRunOutcome::QueuedForReview { review_id: id })
        }
    }
}
