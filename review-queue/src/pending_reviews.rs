//! Pending-review CRUD, uniqueness and bulk disposition (§4.3).

use crate::error::{QueueError, QueueResult};
use doc_enrich_core::{PendingReview, PendingReviewKind};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct Row {
    id: String,
    doc_id: i64,
    doc_title: String,
    kind: String,
    suggestion: String,
    reasoning: String,
    alternatives: String,
    attempts: i64,
    last_feedback: Option<String>,
    next_tag: Option<String>,
    metadata: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl Row {
    fn into_pending_review(self) -> QueueResult<PendingReview> {
        Ok(PendingReview {
            id: Uuid::parse_str(&self.id).expect("pending_reviews.id is always a UUID we wrote ourselves"),
            doc_id: self.doc_id,
            doc_title: self.doc_title,
            kind: PendingReviewKind::from_str(&self.kind)
                .ok_or_else(|| QueueError::not_found(format!("unknown pending review kind {}", self.kind)))?,
            suggestion: serde_json::from_str(&self.suggestion)?,
            reasoning: self.reasoning,
            alternatives: serde_json::from_str(&self.alternatives)?,
            attempts: self.attempts as u32,
            last_feedback: self.last_feedback,
            next_tag: self.next_tag,
            metadata: serde_json::from_str(&self.metadata)?,
            created_at: self.created_at,
        })
    }
}

/// Inserts a review, or returns the id of an existing one with the same
/// `(doc_id, kind, normalized suggestion)` per (I2)/§4.3 uniqueness.
pub async fn add(pool: &SqlitePool, review: &PendingReview) -> QueueResult<Uuid> {
    let normalized = PendingReview::normalize_suggestion(&review.suggestion);
    if let Some(existing) = sqlx::query_scalar::<_, String>(
        "SELECT id FROM pending_reviews WHERE doc_id = ? AND kind = ? AND normalized_suggestion = ?",
    )
    .bind(review.doc_id)
    .bind(review.kind.as_str())
    .bind(&normalized)
    .fetch_optional(pool)
    .await?
    {
        return Ok(Uuid::parse_str(&existing).expect("stored ids are always valid UUIDs"));
    }

    sqlx::query(
        r#"
        INSERT INTO pending_reviews
            (id, doc_id, doc_title, kind, suggestion, normalized_suggestion, reasoning, alternatives, attempts, last_feedback, next_tag, metadata, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(review.id.to_string())
    .bind(review.doc_id)
    .bind(&review.doc_title)
    .bind(review.kind.as_str())
    .bind(serde_json::to_string(&review.suggestion)?)
    .bind(&normalized)
    .bind(&review.reasoning)
    .bind(serde_json::to_string(&review.alternatives)?)
    .bind(review.attempts as i64)
    .bind(&review.last_feedback)
    .bind(&review.next_tag)
    .bind(serde_json::to_string(&review.metadata)?)
    .bind(review.created_at)
    .execute(pool)
    .await?;

    Ok(review.id)
}

pub async fn get_by_id(pool: &SqlitePool, id: Uuid) -> QueueResult<PendingReview> {
    let row: Row = sqlx::query_as("SELECT * FROM pending_reviews WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| QueueError::not_found(format!("pending review {id}")))?;
    row.into_pending_review()
}

pub async fn list(pool: &SqlitePool, kind: Option<PendingReviewKind>, doc_id: Option<i64>) -> QueueResult<Vec<PendingReview>> {
    let rows: Vec<Row> = sqlx::query_as(
        r#"
        SELECT * FROM pending_reviews
        WHERE (?1 IS NULL OR kind = ?1)
          AND (?2 IS NULL OR doc_id = ?2)
        ORDER BY created_at ASC
        "#,
    )
    .bind(kind.map(|k| k.as_str().to_string()))
    .bind(doc_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Row::into_pending_review).collect()
}

pub async fn counts_by_kind(pool: &SqlitePool) -> QueueResult<Vec<(PendingReviewKind, i64)>> {
    let rows: Vec<(String, i64)> = sqlx::query_as("SELECT kind, COUNT(*) FROM pending_reviews GROUP BY kind").fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(k, n)| PendingReviewKind::from_str(&k).map(|kind| (kind, n)))
        .collect())
}

pub async fn update(pool: &SqlitePool, review: &PendingReview) -> QueueResult<()> {
    sqlx::query(
        r#"
        UPDATE pending_reviews SET
            suggestion = ?, normalized_suggestion = ?, reasoning = ?, alternatives = ?,
            attempts = ?, last_feedback = ?, next_tag = ?, metadata = ?
        WHERE id = ?
        "#,
    )
    .bind(serde_json::to_string(&review.suggestion)?)
    .bind(PendingReview::normalize_suggestion(&review.suggestion))
    .bind(&review.reasoning)
    .bind(serde_json::to_string(&review.alternatives)?)
    .bind(review.attempts as i64)
    .bind(&review.last_feedback)
    .bind(&review.next_tag)
    .bind(serde_json::to_string(&review.metadata)?)
    .bind(review.id.to_string())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn remove(pool: &SqlitePool, id: Uuid) -> QueueResult<()> {
    sqlx::query("DELETE FROM pending_reviews WHERE id = ?").bind(id.to_string()).execute(pool).await?;
    Ok(())
}

/// Groups pending items by normalized suggestion text for bulk disposition
/// (§4.3 `similar_groups`).
pub async fn similar_groups(pool: &SqlitePool, kind: Option<PendingReviewKind>) -> QueueResult<Vec<(String, Vec<PendingReview>)>> {
    let items = list(pool, kind, None).await?;
    let mut groups: Vec<(String, Vec<PendingReview>)> = Vec::new();
    for item in items {
        let key = PendingReview::normalize_suggestion(&item.suggestion);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(item),
            None => groups.push((key, vec![item])),
        }
    }
    Ok(groups)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Approve,
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::connect_memory;

    fn sample_review(doc_id: i64, suggestion: &str) -> PendingReview {
        PendingReview {
            id: Uuid::new_v4(),
            doc_id,
            doc_title: "Invoice".to_string(),
            kind: PendingReviewKind::Title,
            suggestion: serde_json::json!(suggestion),
            reasoning: "looked plausible".to_string(),
            alternatives: vec![],
            attempts: 3,
            last_feedback: None,
            next_tag: Some("llm-title-done".to_string()),
            metadata: serde_json::json!({}),
            created_at: chrono::DateTime::parse_from_rfc3339("2024-01-15T00:00:00Z").unwrap().with_timezone(&chrono::Utc),
        }
    }

    #[tokio::test]
    async fn add_is_idempotent_for_same_doc_kind_and_suggestion() {
        let pool = connect_memory().await.unwrap();
        let review = sample_review(42, "Invoice Amazon January 2024");
        let id1 = add(&pool, &review).await.unwrap();
        let mut dup = sample_review(42, "invoice amazon january 2024");
        dup.id = Uuid::new_v4();
        let id2 = add(&pool, &dup).await.unwrap();
        assert_eq!(id1, id2);

        let all = list(&pool, None, None).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn remove_deletes_the_row() {
        let pool = connect_memory().await.unwrap();
        let review = sample_review(7, "Acme Corp");
        let id = add(&pool, &review).await.unwrap();
        remove(&pool, id).await.unwrap();
        assert!(get_by_id(&pool, id).await.is_err());
    }
}
