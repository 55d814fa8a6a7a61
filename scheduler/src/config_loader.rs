//! Assembles a frozen [`PipelineConfig`] snapshot from the durable
//! `settings` table at the start of each tick (§10.3). Lives here rather
//! than on `PipelineConfig` itself since it needs the `review-queue`
//! crate's sqlx pool, which `doc-enrich-core` deliberately does not
//! depend on.

use doc_enrich_core::PipelineConfig;
use review_queue::ReviewQueue;

pub async fn load(queue: &ReviewQueue) -> review_queue::QueueResult<PipelineConfig> {
    let settings = review_queue::settings::get_all(queue.pool()).await?;
    let mut cfg = PipelineConfig::default();
    cfg.apply_settings(&settings);
    Ok(cfg)
}
