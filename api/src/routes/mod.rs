pub mod documents;
pub mod health;
pub mod reviews;
pub mod scheduler;
pub mod settings;

use axum::Router;
use axum::middleware;

use crate::core::app_state::AppState;
use crate::middleware_layer::json_extractor::json_error_mapper;

/// Assembles the whole `/api/v1` surface and binds it to shared state.
pub fn build_router(state: AppState) -> Router {
    let v1 = Router::new()
        .merge(health::router())
        .merge(documents::router())
        .merge(reviews::router())
        .merge(settings::router())
        .merge(scheduler::router())
        .with_state(state);

    Router::new()
        .nest("/api/v1", v1)
        .layer(middleware::from_fn(json_error_mapper))
}
