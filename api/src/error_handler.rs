use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::core::app_state::ConfigError;
use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Pipeline(#[from] doc_enrich_core::PipelineError),

    #[error(transparent)]
    Queue(#[from] review_queue::QueueError),

    #[error(transparent)]
    Stage(#[from] stage_engines::StageError),

    #[error(transparent)]
    Dms(#[from] dms_adapter::DmsError),

    #[error(transparent)]
    Llm(#[from] llm_adapter::LlmError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR, // startup-only
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::Pipeline(e) => pipeline_status(e),
            AppError::Queue(review_queue::QueueError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Queue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Stage(e) => match e {
                stage_engines::StageError::Pipeline(p) => pipeline_status(p),
                stage_engines::StageError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Dms(e) => dms_status(e),
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound => "NOT_FOUND",
            AppError::Pipeline(_) => "PIPELINE_ERROR",
            AppError::Queue(review_queue::QueueError::NotFound(_)) => "NOT_FOUND",
            AppError::Queue(_) => "QUEUE_ERROR",
            AppError::Stage(_) => "STAGE_ERROR",
            AppError::Dms(_) => "DMS_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
        }
    }
}

/// Maps the error taxonomy of spec §7 onto HTTP status: transient failures
/// read as an upstream problem, invariant/config failures as ours.
fn pipeline_status(e: &doc_enrich_core::PipelineError) -> StatusCode {
    match e {
        doc_enrich_core::PipelineError::TransientExternal { .. } => StatusCode::BAD_GATEWAY,
        doc_enrich_core::PipelineError::PermanentExternal { .. } => StatusCode::BAD_GATEWAY,
        doc_enrich_core::PipelineError::InvariantViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        doc_enrich_core::PipelineError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        doc_enrich_core::PipelineError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn dms_status(e: &dms_adapter::DmsError) -> StatusCode {
    match e {
        dms_adapter::DmsError::Unauthorized => StatusCode::UNAUTHORIZED,
        dms_adapter::DmsError::Forbidden => StatusCode::FORBIDDEN,
        dms_adapter::DmsError::NotFound => StatusCode::NOT_FOUND,
        dms_adapter::DmsError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let envelope = ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new());
        (status, Json(envelope)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
