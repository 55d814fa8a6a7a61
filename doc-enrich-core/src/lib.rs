//! Shared data model, workflow-tag vocabulary, configuration and error
//! taxonomy for the document enrichment pipeline.
//!
//! Every other crate in this workspace depends on this one; it carries no
//! dependency on the DMS, an LLM provider, or a database, so it stays cheap
//! to pull into unit tests anywhere else in the workspace.

pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod job_state;
pub mod pending_review;
pub mod processing_log;
pub mod stage;

pub use analysis::{Analysis, ConfirmationVerdict};
pub use config::{
    AutoProcessingConfig, ConfirmationConfig, DebugConfig, PipelineConfig, StageToggles,
    TimeoutConfig, VectorSearchConfig,
};
pub use document::{
    CustomFieldId, CustomFieldType, CustomFieldValue, Document, DocumentId, EntityId, EntityKind,
    NamedEntity, TagId,
};
pub use error::{PipelineError, PipelineResult};
pub use event::{EventGrammarValidator, PipelineEvent, PipelineEventKind};
pub use job_state::JobState;
pub use pending_review::{PendingReview, PendingReviewKind, SchemaSuggestion};
pub use processing_log::{ProcessingEventType, ProcessingLogEntry};
pub use stage::{SidebandTag, Stage, WorkflowTagConfig};
