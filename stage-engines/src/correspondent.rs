use crate::context::{StageContext, StageRunOutcome};
use crate::entity_stage::{self, EntityStageSpec};
use crate::errors::StageResult;
use doc_enrich_core::{Document, EntityKind, PendingReviewKind, Stage};

pub async fn run_stage(ctx: &StageContext, doc: &Document) -> StageResult<StageRunOutcome> {
    entity_stage::run_stage(
        ctx,
        doc,
        &EntityStageSpec {
            kind: EntityKind::Correspondent,
            review_kind: PendingReviewKind::Correspondent,
            stage_key: "correspondent",
            next_stage: Stage::CorrespondentDone,
        },
    )
    .await
}
