//! Scheduler control surface (§4.6): pause/resume auto-processing, read
//! back its current state, and trigger an explicit bootstrap run.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::AppResult;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scheduler/pause", post(pause))
        .route("/scheduler/resume", post(resume))
        .route("/scheduler/status", get(status))
        .route("/scheduler/bootstrap", post(bootstrap))
}

/// Writes the durable toggle the scheduler's own loop reads every tick
/// (§4.6); there is no separate in-process pause flag to keep in sync.
async fn pause(State(state): State<AppState>) -> AppResult<Json<ApiResponse<()>>> {
    review_queue::settings::set(state.queue.pool(), "auto_processing.enabled", "false").await?;
    Ok(Json(ApiResponse::success(())))
}

async fn resume(State(state): State<AppState>) -> AppResult<Json<ApiResponse<()>>> {
    review_queue::settings::unset(state.queue.pool(), "auto_processing.enabled").await?;
    Ok(Json(ApiResponse::success(())))
}

#[derive(Debug, Serialize)]
struct SchedulerStatus {
    job_state: doc_enrich_core::JobState,
    auto_processing_enabled: bool,
    interval_minutes: u32,
}

async fn status(State(state): State<AppState>) -> AppResult<Json<ApiResponse<SchedulerStatus>>> {
    let job_state = review_queue::job_state::load(state.queue.pool()).await?;
    let config = scheduler::config_loader::load(&state.queue).await?;
    Ok(Json(ApiResponse::success(SchedulerStatus {
        job_state,
        auto_processing_enabled: config.auto_processing.enabled,
        interval_minutes: config.auto_processing.interval_minutes,
    })))
}

/// Runs every `pending` document through the pipeline once, ignoring the
/// in-flight cap and user-activity pause (§4.6 "bootstrap"). Kicked off in
/// the background so the request returns immediately.
async fn bootstrap(State(state): State<AppState>) -> AppResult<Json<ApiResponse<&'static str>>> {
    state.record_manual_activity();
    let stage_ctx = state.stage_ctx.clone();
    let indexer = state.indexer.clone();
    tokio::spawn(async move {
        match scheduler::bulk::bootstrap(&stage_ctx, indexer.as_ref(), 1.0).await {
            Ok(report) => tracing::info!(?report, "bootstrap run complete"),
            Err(e) => tracing::error!(error = %e, "bootstrap run failed"),
        }
    });
    Ok(Json(ApiResponse::success("bootstrap started")))
}
