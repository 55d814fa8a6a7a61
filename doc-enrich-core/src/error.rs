//! Crate-wide error taxonomy (§7), grounded in `ai-llm-service::error_handler`
//! (`ConfigError` + `must_env` helpers) and `mr-reviewer::errors` (a root
//! `Error` aggregating per-concern variants via `#[from]`).

use thiserror::Error;

/// Convenience alias used across the workspace's crates.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Root error type. Each crate defines its own focused error enum and
/// converts into this one via `#[from]`, mirroring `mr-reviewer::errors::Error`
/// aggregating `Provider`/`Cache`/`Parse`/`Config`.
///
/// Variants map directly onto the taxonomy of §7: transient external,
/// permanent external, schema policy, convergence failure, and internal
/// invariant violation. Schema-policy and convergence-failure are *never*
/// constructed as errors in this enum — per §7 they always become a
/// [`crate::pending_review::PendingReview`] instead; they are omitted here
/// on purpose.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Transient external failure (network timeout, 5xx, rate limit).
    /// Recovered locally by bounded retry with backoff; only surfaces here
    /// once the retry budget is exhausted.
    #[error("transient external failure in {service}: {message}")]
    TransientExternal { service: &'static str, message: String },

    /// Permanent external failure (auth failure, non-429 4xx, malformed
    /// response beyond parser tolerance). For OCR/Summary this aborts the
    /// document with `failed`; for LLM stages it escalates to review.
    #[error("permanent external failure in {service}: {message}")]
    PermanentExternal { service: &'static str, message: String },

    /// Internal invariant violation (e.g. a stage reached with a missing
    /// prerequisite tag). Logged and aborts the document with `failed`;
    /// never kills the scheduler.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuration/bootstrap error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that don't fit the above, still tagged with
    /// enough context to route to the right handler.
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Whether this error should abort the *document* (OCR/Summary/internal
    /// invariant) rather than escalate to a pending review (§7).
    pub fn is_document_fatal(&self) -> bool {
        matches!(
            self,
            PipelineError::PermanentExternal { .. } | PipelineError::InvariantViolation(_)
        )
    }
}
