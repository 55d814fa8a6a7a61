//! Single-row persistence of [`doc_enrich_core::JobState`] (§3, §4.6).

use crate::error::QueueResult;
use doc_enrich_core::JobState;
use sqlx::sqlite::SqlitePool;

pub async fn load(pool: &SqlitePool) -> QueueResult<JobState> {
    let row: Option<(String,)> = sqlx::query_as("SELECT state FROM job_state WHERE id = 0").fetch_optional(pool).await?;
    Ok(match row {
        Some((raw,)) => serde_json::from_str(&raw)?,
        None => JobState::default(),
    })
}

pub async fn save(pool: &SqlitePool, state: &JobState) -> QueueResult<()> {
    let raw = serde_json::to_string(state)?;
    sqlx::query("INSERT INTO job_state (id, state) VALUES (0, ?) ON CONFLICT(id) DO UPDATE SET state = excluded.state")
        .bind(raw)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::connect_memory;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let pool = connect_memory().await.unwrap();
        let mut state = JobState::default();
        state.record_success();
        state.record_success();
        save(&pool, &state).await.unwrap();
        let loaded = load(&pool).await.unwrap();
        assert_eq!(loaded.processed_since_start, 2);
    }

    #[tokio::test]
    async fn load_without_prior_save_returns_default() {
        let pool = connect_memory().await.unwrap();
        let loaded = load(&pool).await.unwrap();
        assert_eq!(loaded.processed_since_start, 0);
    }
}
