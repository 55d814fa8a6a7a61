//! Blocklist of suppressed suggestion strings per kind, plus a "global"
//! bucket (§4.3).

use crate::error::QueueResult;
use doc_enrich_core::PendingReviewKind;
use sqlx::sqlite::SqlitePool;

const GLOBAL_BUCKET: &str = "global";

pub async fn add(pool: &SqlitePool, kind: Option<PendingReviewKind>, suggestion: &str) -> QueueResult<()> {
    let key = kind.map(|k| k.as_str()).unwrap_or(GLOBAL_BUCKET);
    let normalized = normalize(suggestion);
    sqlx::query("INSERT OR IGNORE INTO blocklist (kind, normalized_suggestion, created_at) VALUES (?, ?, ?)")
        .bind(key)
        .bind(normalized)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await?;
    Ok(())
}

/// True if `suggestion` is blocked for `kind` specifically, or globally
/// (§4.4 algorithm: "analysis.suggestion is in blocklist(kind)").
pub async fn is_blocked(pool: &SqlitePool, kind: PendingReviewKind, suggestion: &str) -> QueueResult<bool> {
    let normalized = normalize(suggestion);
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM blocklist WHERE normalized_suggestion = ? AND (kind = ? OR kind = ?)",
    )
    .bind(&normalized)
    .bind(kind.as_str())
    .bind(GLOBAL_BUCKET)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

fn normalize(suggestion: &str) -> String {
    suggestion.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::connect_memory;

    #[tokio::test]
    async fn blocked_suggestion_is_detected_case_insensitively() {
        let pool = connect_memory().await.unwrap();
        add(&pool, Some(PendingReviewKind::Tag), "Invoice").await.unwrap();
        assert!(is_blocked(&pool, PendingReviewKind::Tag, "  invoice ").await.unwrap());
        assert!(!is_blocked(&pool, PendingReviewKind::Tag, "receipt").await.unwrap());
    }

    #[tokio::test]
    async fn global_block_applies_to_every_kind() {
        let pool = connect_memory().await.unwrap();
        add(&pool, None, "spam").await.unwrap();
        assert!(is_blocked(&pool, PendingReviewKind::Title, "spam").await.unwrap());
        assert!(is_blocked(&pool, PendingReviewKind::Tag, "spam").await.unwrap());
    }
}
