//! Flat `settings` key/value store (§6), read by
//! [`doc_enrich_core::PipelineConfig::apply_settings`] at the start of each
//! orchestrator/scheduler tick.

use crate::error::QueueResult;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

pub async fn get_all(pool: &SqlitePool) -> QueueResult<HashMap<String, String>> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings").fetch_all(pool).await?;
    Ok(rows.into_iter().collect())
}

pub async fn set(pool: &SqlitePool, key: &str, value: &str) -> QueueResult<()> {
    sqlx::query("INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value")
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn unset(pool: &SqlitePool, key: &str) -> QueueResult<()> {
    sqlx::query("DELETE FROM settings WHERE key = ?").bind(key).execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::connect_memory;

    #[tokio::test]
    async fn set_then_get_all_round_trips() {
        let pool = connect_memory().await.unwrap();
        set(&pool, "pipeline.summary", "true").await.unwrap();
        let all = get_all(&pool).await.unwrap();
        assert_eq!(all.get("pipeline.summary").map(String::as_str), Some("true"));
    }
}
