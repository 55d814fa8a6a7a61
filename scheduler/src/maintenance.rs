//! Scheduled maintenance jobs (§4.6): schema-cleanup merges duplicate
//! schema-suggestion reviews, metadata-enhancement backfills descriptions
//! for entities that don't have one yet. Both are idempotent: rerunning
//! with nothing to do is a no-op.

use dms_adapter::DmsClient;
use doc_enrich_core::{EntityKind, PendingReviewKind};
use llm_adapter::{LlmAdapter, ModelRole};
use review_queue::ReviewQueue;

#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenanceReport {
    pub merged_duplicates: usize,
    pub descriptions_written: usize,
}

/// Collapses groups of near-duplicate pending schema suggestions (grouped
/// by [`ReviewQueue::similar_groups`]) down to one representative each,
/// keeping the oldest and removing the rest.
pub async fn schema_cleanup(queue: &ReviewQueue) -> review_queue::QueueResult<MaintenanceReport> {
    let groups = queue.similar_groups(Some(PendingReviewKind::SchemaSuggestion)).await?;
    let mut merged = 0;
    for (_key, mut reviews) in groups {
        if reviews.len() <= 1 {
            continue;
        }
        reviews.sort_by_key(|r| r.created_at);
        for duplicate in reviews.into_iter().skip(1) {
            queue.remove(duplicate.id).await?;
            merged += 1;
        }
    }
    Ok(MaintenanceReport { merged_duplicates: merged, ..Default::default() })
}

/// Writes a one-line description for every correspondent/document-type/tag
/// entity that doesn't have one in `entity_metadata` yet.
pub async fn metadata_enhancement(
    dms: &DmsClient,
    llm: &LlmAdapter,
    queue: &ReviewQueue,
    language: &str,
) -> Result<MaintenanceReport, doc_enrich_core::PipelineError> {
    let mut written = 0;
    for kind in [EntityKind::Correspondent, EntityKind::DocumentType, EntityKind::Tag] {
        let entities = dms.list_entities(kind).await?;
        for entity in entities {
            let existing = review_queue::entity_metadata::get(queue.pool(), kind, entity.id).await?;
            if matches!(&existing, Some((Some(d), _)) if !d.trim().is_empty()) {
                continue;
            }
            let prompt = format!(
                "Write one short sentence (no more than 20 words), in {language}, describing what kind of \
                 {kind:?} entity named \"{}\" most likely represents. Reply with only the sentence.",
                entity.name
            );
            let description = match llm.generate(ModelRole::Small, &prompt, None).await {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(entity = %entity.name, error = %e, "metadata enhancement generation failed, skipping");
                    continue;
                }
            };
            review_queue::entity_metadata::set_description(queue.pool(), kind, entity.id, description.trim()).await?;
            written += 1;
        }
    }
    Ok(MaintenanceReport { descriptions_written: written, ..Default::default() })
}

#[cfg(test)]
mod tests {
    use super::MaintenanceReport;

    #[test]
    fn report_defaults_to_zero() {
        let report = MaintenanceReport::default();
        assert_eq!(report.merged_duplicates, 0);
        assert_eq!(report.descriptions_written, 0);
    }
}
