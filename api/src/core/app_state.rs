//! Process-wide shared state and strict environment-driven bootstrap,
//! grounded in `ai-llm-service::error_handler`'s `ConfigError`/`must_env`
//! style, generalized from one Ollama-only profile set to the adapter's
//! four model roles.

use chrono::{DateTime, Utc};
use dms_adapter::DmsClient;
use llm_adapter::{LlmAdapter, LlmAdapterConfig, LlmProvider, ModelConfig};
use orchestrator::indexer::DocumentIndexer;
use review_queue::ReviewQueue;
use scheduler::CancellationToken;
use stage_engines::context::StageContext;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use vector_indexer::{QdrantFacade, VectorIndexer};

/// Shared state for every handler: the one `StageContext` the orchestrator
/// needs to drive a document, the indexer, a handle on the durable queue
/// for settings/review routes, the scheduler's cancellation flag, and the
/// last time a human triggered a manual run (read by the scheduler's
/// user-activity pause, §4.6).
#[derive(Clone)]
pub struct AppState {
    pub stage_ctx: StageContext,
    pub indexer: Arc<dyn DocumentIndexer>,
    pub queue: ReviewQueue,
    pub cancellation: CancellationToken,
    pub last_manual_activity: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Called by any handler that triggers processing directly (as opposed
    /// to the scheduler's own tick), so the admission controller's
    /// user-activity pause sees it on the next tick.
    pub fn record_manual_activity(&self) {
        *self.last_manual_activity.lock().expect("last_manual_activity mutex poisoned") = Some(Utc::now());
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid number in {var}: {reason}")]
    InvalidNumber { var: &'static str, reason: &'static str },

    #[error("invalid value in {var}: {reason}")]
    InvalidFormat { var: &'static str, reason: &'static str },

    #[error("unsupported LLM provider in {var}: {value}")]
    UnsupportedProvider { var: &'static str, value: String },

    #[error("dms adapter error: {0}")]
    Dms(#[from] dms_adapter::DmsError),

    #[error("review queue error: {0}")]
    Queue(#[from] review_queue::QueueError),

    #[error("vector indexer error: {0}")]
    Indexer(#[from] vector_indexer::IndexError),
}

fn must_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_opt_u32(name: &'static str) -> Result<Option<u32>, ConfigError> {
    match env_opt(name) {
        Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidNumber { var: name, reason: "expected u32" }),
        None => Ok(None),
    }
}

fn env_opt_u64(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env_opt(name) {
        Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidNumber { var: name, reason: "expected u64" }),
        None => Ok(None),
    }
}

fn env_opt_f32(name: &'static str) -> Result<Option<f32>, ConfigError> {
    match env_opt(name) {
        Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidNumber { var: name, reason: "expected f32" }),
        None => Ok(None),
    }
}

/// The `LLM_{ROLE}_*` variable names for one model role.
struct RoleVars {
    provider: &'static str,
    model: &'static str,
    endpoint: &'static str,
    api_key: &'static str,
    max_tokens: &'static str,
    temperature: &'static str,
    top_p: &'static str,
    timeout_secs: &'static str,
}

const LARGE_VARS: RoleVars = RoleVars {
    provider: "LLM_LARGE_PROVIDER",
    model: "LLM_LARGE_MODEL",
    endpoint: "LLM_LARGE_ENDPOINT",
    api_key: "LLM_LARGE_API_KEY",
    max_tokens: "LLM_LARGE_MAX_TOKENS",
    temperature: "LLM_LARGE_TEMPERATURE",
    top_p: "LLM_LARGE_TOP_P",
    timeout_secs: "LLM_LARGE_TIMEOUT_SECS",
};
const SMALL_VARS: RoleVars = RoleVars {
    provider: "LLM_SMALL_PROVIDER",
    model: "LLM_SMALL_MODEL",
    endpoint: "LLM_SMALL_ENDPOINT",
    api_key: "LLM_SMALL_API_KEY",
    max_tokens: "LLM_SMALL_MAX_TOKENS",
    temperature: "LLM_SMALL_TEMPERATURE",
    top_p: "LLM_SMALL_TOP_P",
    timeout_secs: "LLM_SMALL_TIMEOUT_SECS",
};
const EMBEDDING_VARS: RoleVars = RoleVars {
    provider: "LLM_EMBEDDING_PROVIDER",
    model: "LLM_EMBEDDING_MODEL",
    endpoint: "LLM_EMBEDDING_ENDPOINT",
    api_key: "LLM_EMBEDDING_API_KEY",
    max_tokens: "LLM_EMBEDDING_MAX_TOKENS",
    temperature: "LLM_EMBEDDING_TEMPERATURE",
    top_p: "LLM_EMBEDDING_TOP_P",
    timeout_secs: "LLM_EMBEDDING_TIMEOUT_SECS",
};
const TRANSLATION_VARS: RoleVars = RoleVars {
    provider: "LLM_TRANSLATION_PROVIDER",
    model: "LLM_TRANSLATION_MODEL",
    endpoint: "LLM_TRANSLATION_ENDPOINT",
    api_key: "LLM_TRANSLATION_API_KEY",
    max_tokens: "LLM_TRANSLATION_MAX_TOKENS",
    temperature: "LLM_TRANSLATION_TEMPERATURE",
    top_p: "LLM_TRANSLATION_TOP_P",
    timeout_secs: "LLM_TRANSLATION_TIMEOUT_SECS",
};

/// Builds one role's [`ModelConfig`] from its `LLM_*` variables. `required`
/// controls whether a missing provider triggers `MissingVar` or `Ok(None)`
/// (so `small`/`translation` can fall back to `large`, same as
/// [`LlmAdapterConfig::new`]).
fn model_config_from_env(vars: &RoleVars, required: bool) -> Result<Option<ModelConfig>, ConfigError> {
    let provider_raw = match env_opt(vars.provider) {
        Some(v) => v,
        None if required => return Err(ConfigError::MissingVar(vars.provider)),
        None => return Ok(None),
    };
    let provider = match provider_raw.to_ascii_lowercase().as_str() {
        "ollama" => LlmProvider::Ollama,
        "openai" => LlmProvider::OpenAi,
        _ => return Err(ConfigError::UnsupportedProvider { var: vars.provider, value: provider_raw }),
    };
    let model = must_env(vars.model)?;
    let endpoint = must_env(vars.endpoint)?;
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ConfigError::InvalidFormat { var: vars.endpoint, reason: "must start with http:// or https://" });
    }

    Ok(Some(ModelConfig {
        provider,
        model,
        endpoint,
        api_key: env_opt(vars.api_key),
        max_tokens: env_opt_u32(vars.max_tokens)?,
        temperature: env_opt_f32(vars.temperature)?,
        top_p: env_opt_f32(vars.top_p)?,
        timeout_secs: env_opt_u64(vars.timeout_secs)?,
    }))
}

/// Assembles every handle the API and scheduler need to run, strictly from
/// the process environment (§6 "environment variables provide defaults").
pub async fn bootstrap() -> Result<AppState, ConfigError> {
    let dms_base_url = must_env("DMS_BASE_URL")?;
    let dms_token = must_env("DMS_TOKEN")?;
    let http = reqwest::Client::new();
    let dms = Arc::new(DmsClient::new(http, dms_base_url, dms_token));
    dms.refresh_tag_cache().await?;

    let llm_config = LlmAdapterConfig::new(
        model_config_from_env(&LARGE_VARS, true)?.expect("required=true always returns Some"),
        model_config_from_env(&SMALL_VARS, false)?,
        model_config_from_env(&EMBEDDING_VARS, true)?.expect("required=true always returns Some"),
        model_config_from_env(&TRANSLATION_VARS, false)?,
    );
    let llm = Arc::new(LlmAdapter::new(llm_config));
    let prompts = Arc::new(llm_adapter::default_english_templates());

    let queue_url = env_opt("REVIEW_QUEUE_DATABASE_URL");
    let queue = match queue_url {
        Some(url) => ReviewQueue::connect(&url, 5).await?,
        None => ReviewQueue::connect_memory().await?,
    };

    let config = Arc::new(doc_enrich_core::PipelineConfig::default());

    let qdrant_url = env_opt("QDRANT_URL").unwrap_or_else(|| "http://localhost:6334".to_string());
    let qdrant_api_key = env_opt("QDRANT_API_KEY");
    let qdrant_collection = env_opt("QDRANT_COLLECTION").unwrap_or_else(|| "documents".to_string());
    let facade = QdrantFacade::new(&qdrant_url, qdrant_api_key.as_deref(), &qdrant_collection)
        .map_err(ConfigError::Indexer)?;
    let indexer: Arc<dyn DocumentIndexer> =
        Arc::new(VectorIndexer::new(facade, dms.clone(), llm.clone(), config.clone()));

    let stage_ctx = StageContext::new(dms, llm, Arc::new(queue.clone()), prompts, config);

    Ok(AppState {
        stage_ctx,
        indexer,
        queue,
        cancellation: CancellationToken::new(),
        last_manual_activity: Arc::new(Mutex::new(None)),
    })
}
