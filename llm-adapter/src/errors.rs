//! Error hierarchy for the LLM adapter, grounded in
//! `ai-llm-service::error_handler::ConfigError` (env/validation errors) and
//! `mr-reviewer::errors::ProviderError` (transport/status mapping).

use thiserror::Error;

pub type LlmResult<T> = Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("rate limited")]
    RateLimited,

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

    #[error("missing template: {0}")]
    MissingTemplate(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::RateLimited | LlmError::Server(_) | LlmError::Timeout | LlmError::Network(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return LlmError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                429 => LlmError::RateLimited,
                500..=599 => LlmError::Server(code),
                _ => LlmError::HttpStatus(code),
            };
        }
        LlmError::Network(e.to_string())
    }
}

impl From<LlmError> for doc_enrich_core::PipelineError {
    fn from(e: LlmError) -> Self {
        match &e {
            LlmError::RateLimited | LlmError::Server(_) | LlmError::Timeout | LlmError::Network(_) => {
                doc_enrich_core::PipelineError::TransientExternal { service: "llm", message: e.to_string() }
            }
            _ => doc_enrich_core::PipelineError::PermanentExternal { service: "llm", message: e.to_string() },
        }
    }
}
