//! Durable `settings` key/value surface (§6), the mechanism every runtime
//! toggle (stage enablement, auto-processing, debug flags) flows through.

use axum::extract::{Path, State};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;
use std::collections::HashMap;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::AppResult;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list))
        .route("/settings/{key}", put(set).delete(unset))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<HashMap<String, String>>>> {
    let all = review_queue::settings::get_all(state.queue.pool()).await?;
    Ok(Json(ApiResponse::success(all)))
}

#[derive(Debug, Deserialize)]
struct SetBody {
    value: String,
}

async fn set(State(state): State<AppState>, Path(key): Path<String>, Json(body): Json<SetBody>) -> AppResult<Json<ApiResponse<()>>> {
    review_queue::settings::set(state.queue.pool(), &key, &body.value).await?;
    Ok(Json(ApiResponse::success(())))
}

async fn unset(State(state): State<AppState>, Path(key): Path<String>) -> AppResult<Json<ApiResponse<()>>> {
    review_queue::settings::unset(state.queue.pool(), &key).await?;
    Ok(Json(ApiResponse::success(())))
}
