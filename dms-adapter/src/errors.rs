//! Error hierarchy for the DMS adapter, grounded in `mr-reviewer::errors`'s
//! provider-aware HTTP status mapping (401/403/404/429/5xx).

use thiserror::Error;

pub type DmsResult<T> = Result<T, DmsError>;

#[derive(Debug, Error)]
pub enum DmsError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("server error: status {0}")]
    Server(u16),

    #[error("http status error: {0}")]
    HttpStatus(u16),

    #[error("timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response shape: {0}")]
    InvalidResponse(String),

    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl DmsError {
    /// Whether a retry may help (§7: transient external). 404s and auth
    /// failures are permanent; everything else that looks like a blip is
    /// worth one more attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DmsError::RateLimited { .. } | DmsError::Server(_) | DmsError::Timeout | DmsError::Network(_)
        )
    }
}

impl From<reqwest::Error> for DmsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return DmsError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => DmsError::Unauthorized,
                403 => DmsError::Forbidden,
                404 => DmsError::NotFound,
                429 => DmsError::RateLimited { retry_after_secs: None },
                500..=599 => DmsError::Server(code),
                _ => DmsError::HttpStatus(code),
            };
        }
        DmsError::Network(e.to_string())
    }
}

impl From<DmsError> for doc_enrich_core::PipelineError {
    fn from(e: DmsError) -> Self {
        match e {
            DmsError::RateLimited { .. } | DmsError::Server(_) | DmsError::Timeout | DmsError::Network(_) => {
                doc_enrich_core::PipelineError::TransientExternal {
                    service: "dms",
                    message: e.to_string(),
                }
            }
            other => doc_enrich_core::PipelineError::PermanentExternal {
                service: "dms",
                message: other.to_string(),
            },
        }
    }
}
