use crate::context::{StageContext, StageRunOutcome};
use crate::entity_stage::{self, EntityStageSpec};
use crate::errors::StageResult;
use doc_enrich_core::{Document, EntityKind, PendingReviewKind, Stage};

pub async fn run_stage(ctx: &StageContext, doc: &Document) -> StageResult<StageRunOutcome> {
    entity_stage::run_stage(
        ctx,
        doc,
        &EntityStageSpec {
            kind: EntityKind::DocumentType,
            review_kind: PendingReviewKind::DocumentType,
            stage_key: "document_type",
            next_stage: Stage::DocumentTypeDone,
        },
    )
    .await
}
