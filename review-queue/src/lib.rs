//! Review Queue (§4.3, component C3): durable store for pending-human-review
//! items, similarity grouping, bulk operations, the processing log, the
//! blocklist, entity metadata and scheduler job state.

pub mod blocklist;
pub mod entity_metadata;
pub mod error;
pub mod job_state;
pub mod pending_reviews;
pub mod pool;
pub mod processing_log;
pub mod settings;

pub use error::{QueueError, QueueResult};
pub use pending_reviews::BulkAction;

use doc_enrich_core::{PendingReview, PendingReviewKind};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Facade over the durable store, cheap to clone (wraps a pooled
/// connection) and safe to share across orchestrator/scheduler tasks.
#[derive(Debug, Clone)]
pub struct ReviewQueue {
    pool: SqlitePool,
}

impl ReviewQueue {
    pub async fn connect(url: &str, max_connections: u32) -> QueueResult<Self> {
        Ok(Self { pool: pool::connect(url, max_connections).await? })
    }

    pub async fn connect_memory() -> QueueResult<Self> {
        Ok(Self { pool: pool::connect_memory().await? })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn add(&self, review: &PendingReview) -> QueueResult<Uuid> {
        pending_reviews::add(&self.pool, review).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> QueueResult<PendingReview> {
        pending_reviews::get_by_id(&self.pool, id).await
    }

    pub async fn list(&self, kind: Option<PendingReviewKind>, doc_id: Option<i64>) -> QueueResult<Vec<PendingReview>> {
        pending_reviews::list(&self.pool, kind, doc_id).await
    }

    pub async fn counts_by_kind(&self) -> QueueResult<Vec<(PendingReviewKind, i64)>> {
        pending_reviews::counts_by_kind(&self.pool).await
    }

    pub async fn update(&self, review: &PendingReview) -> QueueResult<()> {
        pending_reviews::update(&self.pool, review).await
    }

    pub async fn remove(&self, id: Uuid) -> QueueResult<()> {
        pending_reviews::remove(&self.pool, id).await
    }

    pub async fn similar_groups(&self, kind: Option<PendingReviewKind>) -> QueueResult<Vec<(String, Vec<PendingReview>)>> {
        pending_reviews::similar_groups(&self.pool, kind).await
    }

    pub async fn is_blocked(&self, kind: PendingReviewKind, suggestion: &str) -> QueueResult<bool> {
        blocklist::is_blocked(&self.pool, kind, suggestion).await
    }

    pub async fn block(&self, kind: Option<PendingReviewKind>, suggestion: &str) -> QueueResult<()> {
        blocklist::add(&self.pool, kind, suggestion).await
    }
}
