//! The single driving loop shared by batch mode and stream mode (§4.5):
//! batch mode discards the emitted events and returns a summary, stream
//! mode forwards them live. Keeping one implementation is what guarantees
//! both modes see the same step ordering and pause semantics.

use crate::extras::StageExtras;
use crate::indexer::DocumentIndexer;
use crate::step::Step;
use doc_enrich_core::{DocumentId, PipelineEvent, PipelineEventKind, PipelineResult, SidebandTag, Stage};
use stage_engines::context::StageContext;
use stage_engines::StageRunOutcome;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct StepResult {
    pub success: bool,
    pub attempts: u32,
    pub needs_review: bool,
}

#[derive(Debug, Clone)]
pub struct DriveOutcome {
    pub steps: HashMap<String, StepResult>,
    pub success: bool,
    pub needs_review: bool,
    pub schema_review_needed: bool,
    pub error: Option<String>,
}

/// Runs `only_step` if given, otherwise every remaining step from the
/// document's current tag through completion or the first pause.
pub async fn drive(
    stage_ctx: &StageContext,
    indexer: &dyn DocumentIndexer,
    doc_id: DocumentId,
    extras: &StageExtras,
    only_step: Option<Step>,
    mut emit: impl FnMut(PipelineEvent),
) -> PipelineResult<DriveOutcome> {
    let mut doc = stage_ctx.dms.get_document(doc_id).await?;
    emit(PipelineEvent::new(PipelineEventKind::PipelineStart, doc_id));

    let mut steps = HashMap::new();
    let mut needs_review = false;
    let mut schema_review_needed = false;
    let mut error: Option<String> = None;

    let current_tags = stage_ctx.dms.tag_cache().names_of(&doc.tag_ids);
    let current_stage = stage_ctx.config.tags.stage_from_tag_names(&current_tags);

    let plan: Vec<Step> = match only_step {
        Some(s) => vec![s],
        None => match Step::first_pending(current_stage) {
            Some(s) => s.remaining_from().to_vec(),
            None => Vec::new(),
        },
    };

    'steps: for step in plan {
        let key = step.config_key();

        let enabled = match step {
            Step::VectorIndex => stage_ctx.config.vector_search.enabled,
            _ => stage_ctx.config.stages.is_enabled(key),
        };

        if !enabled {
            if let Err(e) = stage_engines::transition::advance(stage_ctx, doc.id, &doc.tag_ids, step.target_stage()).await {
                error = Some(e.to_string());
                emit(PipelineEvent::new(PipelineEventKind::StepError, doc_id).with_step(key).with_message(error.clone().unwrap()));
                break 'steps;
            }
            steps.insert(key.to_string(), StepResult { success: true, attempts: 0, needs_review: false });
            doc = stage_ctx.dms.get_document(doc_id).await?;
            continue;
        }

        emit(PipelineEvent::new(PipelineEventKind::StepStart, doc_id).with_step(key));

        match run_step(stage_ctx, indexer, &doc, extras, step).await {
            Ok(StepOutcome::Applied { attempts }) => {
                steps.insert(key.to_string(), StepResult { success: true, attempts, needs_review: false });
                emit(PipelineEvent::new(PipelineEventKind::StepComplete, doc_id).with_step(key));
                doc = stage_ctx.dms.get_document(doc_id).await?;
            }
            Ok(StepOutcome::QueuedForReview) => {
                needs_review = true;
                steps.insert(key.to_string(), StepResult { success: false, attempts: 0, needs_review: true });
                emit(PipelineEvent::new(PipelineEventKind::NeedsReview, doc_id).with_step(key));
                break 'steps;
            }
            Ok(StepOutcome::SchemaReviewPaused) => {
                schema_review_needed = true;
                steps.insert(key.to_string(), StepResult { success: true, attempts: 0, needs_review: false });
                emit(PipelineEvent::new(PipelineEventKind::StepComplete, doc_id).with_step(key));
                emit(PipelineEvent::new(PipelineEventKind::SchemaReviewNeeded, doc_id).with_step(key));
                break 'steps;
            }
            Err(e) => {
                steps.insert(key.to_string(), StepResult { success: false, attempts: 0, needs_review: false });
                emit(PipelineEvent::new(PipelineEventKind::StepError, doc_id).with_step(key).with_message(e.to_string()));
                if e.is_document_fatal() {
                    if let Err(tag_err) = stage_engines::transition::add_sideband(stage_ctx, doc.id, &doc.tag_ids, SidebandTag::Failed).await {
                        tracing::warn!(doc_id, error = %tag_err, "failed to apply failed sideband tag");
                    }
                }
                error = Some(e.to_string());
                break 'steps;
            }
        }
    }

    if schema_review_needed {
        emit(PipelineEvent::new(PipelineEventKind::PipelinePaused, doc_id));
    } else if needs_review {
        if let Err(e) = stage_engines::transition::add_sideband(stage_ctx, doc.id, &doc.tag_ids, SidebandTag::ManualReview).await {
            tracing::warn!(doc_id, error = %e, "failed to apply manual_review sideband tag");
        }
        emit(PipelineEvent::new(PipelineEventKind::PipelineComplete, doc_id).with_message("paused for manual review"));
    } else if let Some(msg) = &error {
        emit(PipelineEvent::new(PipelineEventKind::Error, doc_id).with_message(msg.clone()));
    } else {
        emit(PipelineEvent::new(PipelineEventKind::PipelineComplete, doc_id));
    }

    Ok(DriveOutcome {
        steps,
        success: error.is_none() && !needs_review,
        needs_review,
        schema_review_needed,
        error,
    })
}

enum StepOutcome {
    Applied { attempts: u32 },
    QueuedForReview,
    SchemaReviewPaused,
}

impl From<StageRunOutcome> for StepOutcome {
    fn from(o: StageRunOutcome) -> Self {
        match o {
            StageRunOutcome::Applied { attempts } => StepOutcome::Applied { attempts },
            StageRunOutcome::QueuedForReview { .. } => StepOutcome::QueuedForReview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_outcome_carries_attempt_count_through_conversion() {
        let outcome: StepOutcome = StageRunOutcome::Applied { attempts: 3 }.into();
        assert!(matches!(outcome, StepOutcome::Applied { attempts: 3 }));
    }

    #[test]
    fn queued_for_review_drops_the_review_id_on_conversion() {
        let outcome: StepOutcome = StageRunOutcome::QueuedForReview { review_id: uuid::Uuid::nil() }.into();
        assert!(matches!(outcome, StepOutcome::QueuedForReview));
    }
}

async fn run_step(
    stage_ctx: &StageContext,
    indexer: &dyn DocumentIndexer,
    doc: &doc_enrich_core::Document,
    extras: &StageExtras,
    step: Step,
) -> stage_engines::StageResult<StepOutcome> {
    use stage_engines::{correspondent, custom_fields, document_links, document_type, ocr, schema_analysis, summary, tags, title};

    Ok(match step {
        Step::Ocr => ocr::run_stage(stage_ctx, doc).await?.into(),
        Step::Summary => summary::run_stage(stage_ctx, doc, None).await?.into(),
        Step::SchemaAnalysis => {
            let before = doc.tag_ids.clone();
            let outcome = schema_analysis::run_stage(stage_ctx, doc, &extras.schema_existing_entities).await?;
            let after = stage_ctx.dms.get_document(doc.id).await?;
            let landed_on_review = after.tag_ids != before && stage_ctx.config.tags.stage_from_tag_names(&stage_ctx.dms.tag_cache().names_of(&after.tag_ids)) == Stage::SchemaReview;
            if landed_on_review {
                StepOutcome::SchemaReviewPaused
            } else {
                outcome.into()
            }
        }
        Step::Title => title::run_stage(stage_ctx, doc).await?.into(),
        Step::Correspondent => correspondent::run_stage(stage_ctx, doc).await?.into(),
        Step::DocumentType => document_type::run_stage(stage_ctx, doc).await?.into(),
        Step::Tags => tags::run_stage(stage_ctx, doc).await?.into(),
        Step::CustomFields => custom_fields::run_stage(stage_ctx, doc, &extras.custom_field_schema).await?.into(),
        Step::DocumentLinks => {
            let field_id = extras.document_link_field_id.unwrap_or(0);
            document_links::run_stage(stage_ctx, doc, &extras.link_candidates, field_id).await?.into()
        }
        Step::VectorIndex => {
            if let Err(e) = indexer.index_after_links(doc).await {
                tracing::warn!(doc_id = doc.id, error = %e, "vector indexing failed, processing anyway");
            }
            stage_engines::transition::advance(stage_ctx, doc.id, &doc.tag_ids, Stage::Processed).await?;
            StepOutcome::Applied { attempts: 0 }
        }
    })
}
