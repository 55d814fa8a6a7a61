//! Document-processing surface (§4.5): batch, streaming and ad-hoc
//! single-stage invocation, plus the document's processing history.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use doc_enrich_core::DocumentId;
use futures::StreamExt;
use orchestrator::extras::StageExtras;
use orchestrator::{run_batch, run_stage_by_name, run_stream, BatchResult};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::AppResult;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/documents/{id}/process", post(process))
        .route("/documents/{id}/stream", get(stream))
        .route("/documents/{id}/stages/{stage}", post(run_stage))
        .route("/documents/{id}/history", get(history))
}

async fn process(State(state): State<AppState>, Path(id): Path<DocumentId>) -> AppResult<Json<ApiResponse<BatchResult>>> {
    state.record_manual_activity();
    let extras = StageExtras::default();
    let result = run_batch(&state.stage_ctx, state.indexer.as_ref(), id, &extras).await?;
    Ok(Json(ApiResponse::success(result)))
}

async fn stream(State(state): State<AppState>, Path(id): Path<DocumentId>) -> impl IntoResponse {
    state.record_manual_activity();
    let extras = StageExtras::default();
    let events = run_stream(state.stage_ctx, state.indexer, id, extras);
    let body_stream = events.map(|event| Ok::<_, std::io::Error>(event.to_ndjson_line()));

    axum::response::Response::builder()
        .status(axum::http::StatusCode::OK)
        .header(axum::http::header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(body_stream))
        .expect("static response parts are always valid")
}

async fn run_stage(
    State(state): State<AppState>,
    Path((id, stage)): Path<(DocumentId, String)>,
) -> AppResult<Json<ApiResponse<BatchResult>>> {
    state.record_manual_activity();
    let extras = StageExtras::default();
    let result = run_stage_by_name(&state.stage_ctx, state.indexer.as_ref(), id, &stage, &extras).await?;
    Ok(Json(ApiResponse::success(result)))
}

async fn history(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> AppResult<Json<ApiResponse<Vec<doc_enrich_core::ProcessingLogEntry>>>> {
    let entries = review_queue::processing_log::list_for_document(state.queue.pool(), id).await?;
    Ok(Json(ApiResponse::success(entries)))
}
