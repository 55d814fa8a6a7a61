//! Atomic workflow-tag advancement shared by every stage (§4.5).

use crate::context::StageContext;
use crate::errors::StageResult;
use doc_enrich_core::{DocumentId, EntityKind, Stage, TagId};
use std::collections::HashSet;

/// Advances `doc_id` to `to`'s workflow tag, removing every other workflow
/// tag currently present in `current_tags` in the same PATCH call.
pub async fn advance(ctx: &StageContext, doc_id: DocumentId, current_tags: &HashSet<TagId>, to: Stage) -> StageResult<()> {
    let target_id = resolve_tag_id(ctx, ctx.config.tags.tag_name(to)).await?;
    let remove: HashSet<TagId> = Stage::ALL_IN_ORDER
        .iter()
        .filter(|s| **s != to)
        .filter_map(|s| ctx.dms.tag_cache().id_of(ctx.config.tags.tag_name(*s)))
        .filter(|id| current_tags.contains(id))
        .collect();
    ctx.dms.apply_tag_transition(doc_id, current_tags, &remove, target_id).await?;
    Ok(())
}

/// Adds a sideband tag (`manual_review`, `failed`) without touching the
/// linear stage tag.
pub async fn add_sideband(ctx: &StageContext, doc_id: DocumentId, current_tags: &HashSet<TagId>, tag: doc_enrich_core::SidebandTag) -> StageResult<()> {
    let tag_id = resolve_tag_id(ctx, ctx.config.tags.sideband_tag_name(tag)).await?;
    ctx.dms.add_tag(doc_id, current_tags, tag_id).await?;
    Ok(())
}

async fn resolve_tag_id(ctx: &StageContext, name: &str) -> StageResult<TagId> {
    if let Some(id) = ctx.dms.tag_cache().id_of(name) {
        return Ok(id);
    }
    let entity = ctx.dms.create_or_lookup_entity(EntityKind::Tag, name).await?;
    Ok(entity.id)
}
