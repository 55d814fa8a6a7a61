//! Descriptions/translations attached to DMS entities (§6), used by
//! schema analysis prompts to show reviewers what an existing entity means.

use crate::error::QueueResult;
use doc_enrich_core::{EntityId, EntityKind};
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;

pub async fn set_description(pool: &SqlitePool, kind: EntityKind, entity_id: EntityId, description: &str) -> QueueResult<()> {
    sqlx::query(
        r#"
        INSERT INTO entity_metadata (entity_kind, entity_id, description, translations)
        VALUES (?, ?, ?, '{}')
        ON CONFLICT(entity_kind, entity_id) DO UPDATE SET description = excluded.description
        "#,
    )
    .bind(kind.as_str())
    .bind(entity_id)
    .bind(description)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_translation(pool: &SqlitePool, kind: EntityKind, entity_id: EntityId, language: &str, translated_name: &str) -> QueueResult<()> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT translations FROM entity_metadata WHERE entity_kind = ? AND entity_id = ?")
        .bind(kind.as_str())
        .bind(entity_id)
        .fetch_optional(pool)
        .await?;
    let mut translations: HashMap<String, String> = existing.map(|(raw,)| serde_json::from_str(&raw).unwrap_or_default()).unwrap_or_default();
    translations.insert(language.to_string(), translated_name.to_string());
    let raw = serde_json::to_string(&translations)?;

    sqlx::query(
        r#"
        INSERT INTO entity_metadata (entity_kind, entity_id, description, translations)
        VALUES (?, ?, NULL, ?)
        ON CONFLICT(entity_kind, entity_id) DO UPDATE SET translations = excluded.translations
        "#,
    )
    .bind(kind.as_str())
    .bind(entity_id)
    .bind(raw)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &SqlitePool, kind: EntityKind, entity_id: EntityId) -> QueueResult<Option<(Option<String>, HashMap<String, String>)>> {
    let row: Option<(Option<String>, String)> = sqlx::query_as("SELECT description, translations FROM entity_metadata WHERE entity_kind = ? AND entity_id = ?")
        .bind(kind.as_str())
        .bind(entity_id)
        .fetch_optional(pool)
        .await?;
    Ok(match row {
        Some((description, raw)) => Some((description, serde_json::from_str(&raw).unwrap_or_default())),
        None => None,
    })
}
