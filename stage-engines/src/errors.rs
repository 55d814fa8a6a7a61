//! Errors local to stage execution, distinct from [`doc_enrich_core::PipelineError`]
//! in that `NewEntityBlocked` is a policy outcome, not a failure — callers
//! route it to a pending review rather than log it as an error.

use thiserror::Error;

pub type StageResult<T> = Result<T, StageError>;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("pipeline error: {0}")]
    Pipeline(#[from] doc_enrich_core::PipelineError),

    #[error("{0}")]
    Other(String),
}

impl StageError {
    /// Mirrors [`doc_enrich_core::PipelineError::is_document_fatal`]; a bare
    /// `Other` never fails a document outright.
    pub fn is_document_fatal(&self) -> bool {
        match self {
            StageError::Pipeline(e) => e.is_document_fatal(),
            StageError::Other(_) => false,
        }
    }
}

impl From<dms_adapter::DmsError> for StageError {
    fn from(e: dms_adapter::DmsError) -> Self {
        StageError::Pipeline(e.into())
    }
}

impl From<llm_adapter::LlmError> for StageError {
    fn from(e: llm_adapter::LlmError) -> Self {
        StageError::Pipeline(e.into())
    }
}

impl From<review_queue::QueueError> for StageError {
    fn from(e: review_queue::QueueError) -> Self {
        StageError::Pipeline(e.into())
    }
}
