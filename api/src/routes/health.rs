//! GET /api/v1/health — reachability probe for every configured model role.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use llm_adapter::HealthChecker;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<ApiResponse<Vec<llm_adapter::HealthStatus>>> {
    let checker = HealthChecker::new(None);
    let statuses = checker.check_all(state.stage_ctx.llm.config()).await;
    Json(ApiResponse::success(statuses))
}
