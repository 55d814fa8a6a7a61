//! Similarity search backing the Document Links stage engine (§4.7): given
//! a document's embedding, finds other already-indexed documents above a
//! minimum cosine score.

use crate::errors::IndexResult;
use crate::qdrant_facade::QdrantFacade;
use doc_enrich_core::DocumentId;

#[derive(Debug, Clone, PartialEq)]
pub struct LinkCandidate {
    pub doc_id: DocumentId,
    pub score: f32,
}

/// Returns up to `top_k` other documents whose embedding scores at least
/// `min_score` against `embedding`, excluding `exclude_doc_id` itself.
///
/// Qdrant's collection is configured with cosine distance, so `search`
/// already returns cosine similarity scores — no separate distance
/// computation is needed here.
pub async fn find_link_candidates(
    facade: &QdrantFacade,
    embedding: Vec<f32>,
    top_k: u64,
    min_score: f32,
    exclude_doc_id: DocumentId,
) -> IndexResult<Vec<LinkCandidate>> {
    // Over-fetch by one slot in case the document itself is already indexed
    // and shows up as its own best match.
    let hits = facade.search(embedding, top_k + 1, None).await?;

    Ok(hits
        .into_iter()
        .filter_map(|(score, payload)| {
            let doc_id = payload.get("doc_id")?.as_i64()?;
            if doc_id == exclude_doc_id || score < min_score {
                return None;
            }
            Some(LinkCandidate { doc_id, score })
        })
        .take(top_k as usize)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_equality_is_by_value() {
        let a = LinkCandidate { doc_id: 1, score: 0.9 };
        let b = LinkCandidate { doc_id: 1, score: 0.9 };
        assert_eq!(a, b);
    }
}
