//! Error type for the durable local store, grounded in
//! `casparian_db::error::DbError`.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),
}

impl QueueError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<QueueError> for doc_enrich_core::PipelineError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::NotFound(msg) => doc_enrich_core::PipelineError::InvariantViolation(msg),
            other => doc_enrich_core::PipelineError::Other(other.to_string()),
        }
    }
}
