//! Pool creation and schema bootstrap, grounded in
//! `casparian_db::pool::create_pool` (WAL pragma, `SqlitePoolOptions`) and
//! `casparian_db::schema`.

use crate::error::QueueResult;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub async fn connect(url: &str, max_connections: u32) -> QueueResult<SqlitePool> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
    sqlx::query("PRAGMA synchronous=NORMAL").execute(&pool).await?;
    sqlx::query("PRAGMA foreign_keys=ON").execute(&pool).await?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn connect_memory() -> QueueResult<SqlitePool> {
    connect("sqlite::memory:", 1).await
}

async fn migrate(pool: &SqlitePool) -> QueueResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pending_reviews (
            id TEXT PRIMARY KEY,
            doc_id INTEGER NOT NULL,
            doc_title TEXT NOT NULL,
            kind TEXT NOT NULL,
            suggestion TEXT NOT NULL,
            normalized_suggestion TEXT NOT NULL,
            reasoning TEXT NOT NULL,
            alternatives TEXT NOT NULL,
            attempts INTEGER NOT NULL,
            last_feedback TEXT,
            next_tag TEXT,
            metadata TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (doc_id, kind, normalized_suggestion)
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pending_reviews_kind ON pending_reviews(kind)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pending_reviews_doc_id ON pending_reviews(doc_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS processing_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            doc_id INTEGER NOT NULL,
            timestamp TEXT NOT NULL,
            step TEXT NOT NULL,
            event_type TEXT NOT NULL,
            data TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_processing_logs_doc_id ON processing_logs(doc_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blocklist (
            kind TEXT NOT NULL,
            normalized_suggestion TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (kind, normalized_suggestion)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entity_metadata (
            entity_kind TEXT NOT NULL,
            entity_id INTEGER NOT NULL,
            description TEXT,
            translations TEXT NOT NULL DEFAULT '{}',
            PRIMARY KEY (entity_kind, entity_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS job_state (
            id INTEGER PRIMARY KEY CHECK (id = 0),
            state TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
