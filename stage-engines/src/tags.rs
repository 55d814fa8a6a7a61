//! Tags stage (§4.4): the analyst proposes a tag set; applying it is an
//! add/remove delta against the document's current tags rather than a
//! single scalar write.

use crate::confirmation_loop::{run, ConfirmationLoopInputs, StageOutcome};
use crate::context::{StageContext, StageRunOutcome};
use crate::errors::StageResult;
use crate::{review, transition};
use doc_enrich_core::{Document, EntityKind, PendingReviewKind, Stage};
use std::collections::{HashMap, HashSet};

pub async fn run_stage(ctx: &StageContext, doc: &Document) -> StageResult<StageRunOutcome> {
    let existing = ctx.dms.list_entities(EntityKind::Tag).await?;
    let existing_names: Vec<&str> = existing.iter().map(|e| e.name.as_str()).collect();
    // Workflow/sideband tags (`document_type_done`, `llm-manual-review`, ...)
    // live in the same DMS tag namespace as content tags; excluding them here
    // keeps the add/remove delta below from ever touching the stage tag the
    // document currently carries (§4.5 "atomic tag transition").
    let workflow_names = ctx.config.tags.all_tag_names();
    let current_tag_names: HashSet<String> = ctx
        .dms
        .tag_cache()
        .names_of(&doc.tag_ids)
        .difference(&workflow_names)
        .cloned()
        .collect();

    let mut base_vars = HashMap::new();
    base_vars.insert("document_content", doc.content.clone());
    base_vars.insert("existing_entities", existing_names.join(", "));

    let outcome = run(
        &ctx.llm,
        &ctx.prompts,
        &ctx.queue,
        ConfirmationLoopInputs {
            kind: PendingReviewKind::Tag,
            stage_key: "tags",
            language: &ctx.config.prompt_language,
            max_retries: ctx.config.confirmation.max_retries,
            base_vars,
            approval_keywords: &ctx.config.confirmation.approval_keywords,
        },
    )
    .await?;

    match outcome {
        StageOutcome::Confirmed { analysis, attempts } => {
            let suggested: Vec<String> = analysis
                .suggested_value
                .as_array()
                .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
                .unwrap_or_default();

            let new_names: Vec<&String> = suggested
                .iter()
                .filter(|name| !existing.iter().any(|e| e.name.eq_ignore_ascii_case(name)))
                .collect();

            if !new_names.is_empty() && ctx.config.confirmation.require_user_for_new_entities {
                let mut pending = review::from_exhausted_loop(
                    doc,
                    PendingReviewKind::Tag,
                    doc_enrich_core::Analysis { suggested_value: serde_json::json!(suggested), ..analysis },
                    None,
                    Stage::TagsDone,
                    &ctx.config.tags,
                );
                pending.metadata = serde_json::json!({ "new_entities": new_names });
                let id = ctx.queue.add(&pending).await?;
                return Ok(StageRunOutcome::QueuedForReview { review_id: id });
            }

            let target_names: HashSet<String> = suggested.iter().cloned().collect();
            let to_add_names: Vec<&String> = target_names.difference(&current_tag_names).collect();
            let to_remove_names: Vec<&String> = current_tag_names.difference(&target_names).collect();

            let mut add_ids = HashSet::new();
            for name in to_add_names {
                let entity = match existing.iter().find(|e| e.name.eq_ignore_ascii_case(name)) {
                    Some(e) => e.clone(),
                    None => ctx.dms.create_or_lookup_entity(EntityKind::Tag, name).await?,
                };
                add_ids.insert(entity.id);
            }
            let remove_ids: HashSet<_> = to_remove_names.into_iter().filter_map(|name| ctx.dms.tag_cache().id_of(name)).collect();

            if !add_ids.is_empty() || !remove_ids.is_empty() {
                ctx.dms.set_tags(doc.id, &doc.tag_ids, &add_ids, &remove_ids).await?;
            }
            // Advance the workflow tag against the *post*-delta tag set, so
            // the content-tag write above isn't clobbered by the transition's
            // own PATCH (§4.5 "atomic tag transition").
            let tags_after_delta: HashSet<_> = doc.tag_ids.difference(&remove_ids).copied().chain(add_ids.iter().copied()).collect();
            transition::advance(ctx, doc.id, &tags_after_delta, Stage::TagsDone).await?;
            Ok(StageRunOutcome::Applied { attempts })
        }
        StageOutcome::NeedsReview { last_analysis, last_feedback } => {
            let pending = review::from_exhausted_loop(doc, PendingReviewKind::Tag, last_analysis, last_feedback, Stage::TagsDone, &ctx.config.tags);
            let id = ctx.queue.add(&pending).await?;
            Ok(StageRunOutcome::QueuedForReview { review_id: id })
        }
    }
}
