//! Append-only processing log (§3, §9).

use crate::error::QueueResult;
use doc_enrich_core::{DocumentId, ProcessingEventType, ProcessingLogEntry};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

pub async fn append(pool: &SqlitePool, entry: &ProcessingLogEntry) -> QueueResult<()> {
    sqlx::query("INSERT INTO processing_logs (doc_id, timestamp, step, event_type, data) VALUES (?, ?, ?, ?, ?)")
        .bind(entry.doc_id)
        .bind(entry.timestamp)
        .bind(&entry.step)
        .bind(event_type_str(entry.event_type))
        .bind(serde_json::to_string(&entry.data)?)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_for_document(pool: &SqlitePool, doc_id: DocumentId) -> QueueResult<Vec<ProcessingLogEntry>> {
    let rows: Vec<Row> = sqlx::query_as("SELECT doc_id, timestamp, step, event_type, data FROM processing_logs WHERE doc_id = ? ORDER BY timestamp ASC")
        .bind(doc_id)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(Row::into_entry).collect()
}

#[derive(Debug, FromRow)]
struct Row {
    doc_id: i64,
    timestamp: chrono::DateTime<chrono::Utc>,
    step: String,
    event_type: String,
    data: String,
}

impl Row {
    fn into_entry(self) -> QueueResult<ProcessingLogEntry> {
        Ok(ProcessingLogEntry {
            doc_id: self.doc_id,
            timestamp: self.timestamp,
            step: self.step,
            event_type: event_type_from_str(&self.event_type),
            data: serde_json::from_str(&self.data)?,
        })
    }
}

fn event_type_str(e: ProcessingEventType) -> &'static str {
    match e {
        ProcessingEventType::StepStart => "step_start",
        ProcessingEventType::StepComplete => "step_complete",
        ProcessingEventType::StepError => "step_error",
        ProcessingEventType::NeedsReview => "needs_review",
        ProcessingEventType::SchemaReviewNeeded => "schema_review_needed",
        ProcessingEventType::PipelinePaused => "pipeline_paused",
        ProcessingEventType::PipelineComplete => "pipeline_complete",
        ProcessingEventType::Error => "error",
    }
}

fn event_type_from_str(s: &str) -> ProcessingEventType {
    match s {
        "step_start" => ProcessingEventType::StepStart,
        "step_complete" => ProcessingEventType::StepComplete,
        "step_error" => ProcessingEventType::StepError,
        "needs_review" => ProcessingEventType::NeedsReview,
        "schema_review_needed" => ProcessingEventType::SchemaReviewNeeded,
        "pipeline_paused" => ProcessingEventType::PipelinePaused,
        "pipeline_complete" => ProcessingEventType::PipelineComplete,
        _ => ProcessingEventType::Error,
    }
}
