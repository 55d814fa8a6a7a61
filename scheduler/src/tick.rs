//! One scheduler tick (§4.6 steps 1-4): admission, then batch-mode
//! orchestrator invocations up to the in-flight cap.

use crate::admission::should_pause_for_user_activity;
use crate::cancellation::CancellationToken;
use crate::candidates::admissible_documents;
use chrono::{DateTime, Utc};
use doc_enrich_core::{JobState, PipelineConfig};
use orchestrator::{extras::StageExtras, indexer::DocumentIndexer, run_batch};
use review_queue::ReviewQueue;
use stage_engines::context::StageContext;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct TickSummary {
    pub admitted: usize,
    pub succeeded: usize,
    pub errored: usize,
    pub skipped_user_activity: bool,
}

/// Runs one tick. `last_manual_activity_at` is read from whatever tracks UI
/// activity (owned by the caller, typically the `api` crate's request
/// handlers); `in_flight_cap` bounds how many admitted documents this tick
/// processes (§5 "default = 1 for the scheduler path").
pub async fn run_tick(
    stage_ctx: &StageContext,
    indexer: &dyn DocumentIndexer,
    queue: &ReviewQueue,
    config: &PipelineConfig,
    last_manual_activity_at: Option<DateTime<Utc>>,
    in_flight_cap: usize,
    cancellation: &CancellationToken,
    job_state: &mut JobState,
) -> Result<TickSummary, doc_enrich_core::PipelineError> {
    let now = Utc::now();
    job_state.record_tick_start(now);

    if should_pause_for_user_activity(&config.auto_processing, last_manual_activity_at, now) {
        tracing::debug!("tick skipped: recent manual pipeline activity");
        return Ok(TickSummary { skipped_user_activity: true, ..Default::default() });
    }

    let candidates = admissible_documents(&stage_ctx.dms, queue, &config.tags).await?;
    let admitted: Vec<_> = candidates.into_iter().take(in_flight_cap.max(1)).collect();
    tracing::info!(admitted = admitted.len(), "tick admission complete");

    let mut summary = TickSummary { admitted: admitted.len(), ..Default::default() };
    let extras = StageExtras::default();

    for doc in admitted {
        if cancellation.is_cancelled() {
            tracing::info!("cancellation requested, draining current document then stopping");
        }
        job_state.currently_processing_doc_id = Some(doc.id);
        match run_batch(stage_ctx, indexer, doc.id, &extras).await {
            Ok(result) if result.success || result.needs_review || result.schema_review_needed => {
                summary.succeeded += 1;
                job_state.record_success();
            }
            Ok(_) => {
                summary.errored += 1;
                job_state.record_error();
            }
            Err(e) => {
                tracing::warn!(doc_id = doc.id, error = %e, "pipeline invocation failed");
                summary.errored += 1;
                job_state.record_error();
            }
        }

        if cancellation.is_cancelled() {
            break;
        }
    }

    Ok(summary)
}

/// Long-running loop: sleeps `interval_minutes` between ticks, stopping
/// once `cancellation` is set. The caller is expected to spawn this as its
/// own task and keep the returned `CancellationToken` to shut it down.
pub async fn run_loop(
    stage_ctx: StageContext,
    indexer: Arc<dyn DocumentIndexer>,
    queue: ReviewQueue,
    cancellation: CancellationToken,
    last_manual_activity_at: impl Fn() -> Option<DateTime<Utc>> + Send + 'static,
) {
    let mut job_state = review_queue::job_state::load(queue.pool()).await.unwrap_or_default();

    while !cancellation.is_cancelled() {
        let config = match crate::config_loader::load(&queue).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "failed to load pipeline config, skipping tick");
                sleep_cancellable(&cancellation, std::time::Duration::from_secs(60)).await;
                continue;
            }
        };

        if !config.auto_processing.enabled {
            sleep_cancellable(&cancellation, std::time::Duration::from_secs(60)).await;
            continue;
        }

        match run_tick(
            &stage_ctx,
            indexer.as_ref(),
            &queue,
            &config,
            last_manual_activity_at(),
            1,
            &cancellation,
            &mut job_state,
        )
        .await
        {
            Ok(summary) => tracing::info!(?summary, "tick complete"),
            Err(e) => tracing::error!(error = %e, "tick failed"),
        }

        if let Err(e) = review_queue::job_state::save(queue.pool(), &job_state).await {
            tracing::warn!(error = %e, "failed to persist job state");
        }

        let interval = std::time::Duration::from_secs(u64::from(config.auto_processing.interval_minutes) * 60);
        sleep_cancellable(&cancellation, interval).await;
    }
}

/// Sleeps in short slices so a cancellation during a long interval is
/// observed promptly rather than only at the next tick boundary.
async fn sleep_cancellable(cancellation: &CancellationToken, total: std::time::Duration) {
    const SLICE: std::time::Duration = std::time::Duration::from_secs(5);
    let mut remaining = total;
    while remaining > std::time::Duration::ZERO {
        if cancellation.is_cancelled() {
            return;
        }
        let step = remaining.min(SLICE);
        tokio::time::sleep(step).await;
        remaining -= step;
    }
}
