//! Process entry point: bootstrap every adapter, spin up the scheduler's
//! background loop, and serve the HTTP API (§4, §5 "single binary, two
//! drivers" — the scheduler loop and the HTTP surface share one `AppState`).

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use error_handler::AppError;

/// Binds and serves the API, running until the process is killed. The
/// scheduler's polling loop runs alongside it as a background task sharing
/// the same `StageContext`/`ReviewQueue`.
pub async fn start() -> Result<(), AppError> {
    let state = core::app_state::bootstrap().await?;

    let scheduler_ctx = state.stage_ctx.clone();
    let scheduler_indexer = state.indexer.clone();
    let scheduler_queue = state.queue.clone();
    let scheduler_cancellation = state.cancellation.clone();
    let last_manual_activity = state.last_manual_activity.clone();

    tokio::spawn(async move {
        scheduler::run_loop(scheduler_ctx, scheduler_indexer, scheduler_queue, scheduler_cancellation, move || {
            *last_manual_activity.lock().expect("last_manual_activity mutex poisoned")
        })
        .await;
    });

    let bind_addr = std::env::var("API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let router = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.map_err(AppError::Bind)?;
    tracing::info!(%bind_addr, "document enrichment api listening");
    axum::serve(listener, router).await.map_err(AppError::Server)?;

    Ok(())
}
