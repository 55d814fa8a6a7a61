//! Builds the oldest-first admission list (§4.6 step 2): every document
//! carrying `pending`, plus any resumable document that carries a
//! stage-done tag short of `processed` and has no unresolved pending review.

use dms_adapter::DmsClient;
use doc_enrich_core::{Document, DocumentId, PendingReviewKind, Stage, WorkflowTagConfig};
use review_queue::ReviewQueue;
use std::collections::HashSet;

pub async fn admissible_documents(
    dms: &DmsClient,
    queue: &ReviewQueue,
    tags: &WorkflowTagConfig,
) -> Result<Vec<Document>, doc_enrich_core::PipelineError> {
    let mut by_id: std::collections::HashMap<DocumentId, Document> = std::collections::HashMap::new();

    for stage in Stage::ALL_IN_ORDER.iter().copied().filter(|s| *s != Stage::Processed) {
        let Some(tag_id) = dms.tag_cache().id_of(tags.tag_name(stage)) else {
            continue;
        };
        let docs = dms.list_documents_by_tag(tag_id).await?;
        for doc in docs {
            by_id.entry(doc.id).or_insert(doc);
        }
    }

    let blocked: HashSet<DocumentId> = {
        let mut ids = HashSet::new();
        for kind in [
            PendingReviewKind::Title,
            PendingReviewKind::Correspondent,
            PendingReviewKind::DocumentType,
            PendingReviewKind::Tag,
            PendingReviewKind::CustomField,
            PendingReviewKind::DocumentLink,
            PendingReviewKind::SchemaSuggestion,
        ] {
            for review in queue.list(Some(kind), None).await? {
                ids.insert(review.doc_id);
            }
        }
        ids
    };

    let mut out: Vec<Document> = by_id.into_values().filter(|d| !blocked.contains(&d.id)).collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(out)
}
