//! Shared handles every stage engine needs: the adapters plus the frozen
//! config for one pipeline run. Cheap to clone (everything inside is an
//! `Arc`), so the orchestrator hands out one per document task.

use dms_adapter::DmsClient;
use doc_enrich_core::PipelineConfig;
use llm_adapter::{LlmAdapter, PromptLibrary};
use review_queue::ReviewQueue;
use std::sync::Arc;

#[derive(Clone)]
pub struct StageContext {
    pub dms: Arc<DmsClient>,
    pub llm: Arc<LlmAdapter>,
    pub queue: Arc<ReviewQueue>,
    pub prompts: Arc<PromptLibrary>,
    pub config: Arc<PipelineConfig>,
}

impl StageContext {
    pub fn new(dms: Arc<DmsClient>, llm: Arc<LlmAdapter>, queue: Arc<ReviewQueue>, prompts: Arc<PromptLibrary>, config: Arc<PipelineConfig>) -> Self {
        Self { dms, llm, queue, prompts, config }
    }
}

/// Outcome common to every LLM-driven stage engine, used by the orchestrator
/// to decide the next workflow-tag transition (§4.5).
#[derive(Debug, Clone)]
pub enum StageRunOutcome {
    /// The reviewer confirmed the proposal and it was written to the DMS.
    Applied { attempts: u32 },
    /// The retry budget was exhausted (or policy blocked auto-creation); a
    /// [`doc_enrich_core::PendingReview`] now holds the document at this stage.
    QueuedForReview { review_id: uuid::Uuid },
}
