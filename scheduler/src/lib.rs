//! Scheduler / admission controller (§4.6, component C6): the polling loop
//! that invokes the orchestrator in batch mode, its admission controls,
//! cancellation, scheduled maintenance jobs and bulk ingest/bootstrap.

pub mod admission;
pub mod bulk;
pub mod candidates;
pub mod cancellation;
pub mod config_loader;
pub mod maintenance;
pub mod tick;

pub use cancellation::CancellationToken;
pub use tick::{run_loop, run_tick, TickSummary};
