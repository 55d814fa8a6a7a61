//! The pipeline orchestrator (§4.5): a deterministic state machine that
//! walks one document through the stage engines in order, in both a
//! batch (single summary) and a stream (live events) mode, plus ad-hoc
//! single-stage invocation for manual reruns.

pub mod batch;
pub mod engine;
pub mod extras;
pub mod indexer;
pub mod step;
pub mod stream;

pub use batch::{run_batch, run_stage_by_name, BatchResult, StepSummary};
pub use engine::{drive, DriveOutcome, StepResult};
pub use extras::StageExtras;
pub use indexer::{DocumentIndexer, NoopIndexer};
pub use step::Step;
pub use stream::run_stream;
