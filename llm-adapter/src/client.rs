//! Caching LLM client, grounded in
//! `ai-llm-service::service_profiles::LlmServiceProfiles`: one adapter is
//! constructed once, wrapped in `Arc`, and shared; provider clients are
//! cached per `ClientKey` so repeated calls with the same config don't
//! rebuild HTTP clients.

use crate::config::{LlmAdapterConfig, LlmProvider, ModelConfig, ModelRole};
use crate::errors::{LlmError, LlmResult};
use crate::providers::{OllamaService, OpenAiService};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Clone, Eq, Debug)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&ModelConfig> for ClientKey {
    fn from(cfg: &ModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl PartialEq for ClientKey {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.endpoint == other.endpoint
            && self.model == other.model
            && self.api_key == other.api_key
            && self.timeout == other.timeout
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        if let Some(ref k) = self.api_key {
            k.hash(state);
        } else {
            0usize.hash(state);
        }
        self.timeout.hash(state);
    }
}

#[derive(Debug)]
pub struct LlmAdapter {
    config: LlmAdapterConfig,
    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmAdapter {
    pub fn new(config: LlmAdapterConfig) -> Self {
        tracing::info!(
            large.model = %config.large.model,
            small.model = %config.small.model,
            embedding.model = %config.embedding.model,
            translation.model = %config.translation.model,
            "llm adapter initialized"
        );
        Self { config, ollama: RwLock::new(HashMap::new()), openai: RwLock::new(HashMap::new()) }
    }

    pub fn model_name(&self, role: ModelRole) -> &str {
        &self.config.for_role(role).model
    }

    /// Exposes the underlying role configuration, used by the health-check
    /// surface (§11) to probe every configured endpoint.
    pub fn config(&self) -> &LlmAdapterConfig {
        &self.config
    }

    /// `generate(model_role, prompt, options) -> text` (§4.2).
    pub async fn generate(&self, role: ModelRole, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        let cfg = self.config.for_role(role);
        let started = Instant::now();
        let out = match cfg.provider {
            LlmProvider::Ollama => self.get_or_init_ollama(cfg).await?.generate(prompt, system).await,
            LlmProvider::OpenAi => self.get_or_init_openai(cfg).await?.generate(prompt, system).await,
        };
        if out.is_ok() {
            tracing::info!(
                role = %role,
                model = %cfg.model,
                prompt_len = prompt.len(),
                latency_ms = started.elapsed().as_millis() as u64,
                "generation completed"
            );
        }
        out
    }

    pub async fn embed(&self, input: &str) -> LlmResult<Vec<f32>> {
        let cfg = self.config.for_role(ModelRole::Embedding);
        let started = Instant::now();
        let out = match cfg.provider {
            LlmProvider::Ollama => self.get_or_init_ollama(cfg).await?.embeddings(input).await,
            LlmProvider::OpenAi => self.get_or_init_openai(cfg).await?.embeddings(input).await,
        };
        if out.is_ok() {
            tracing::info!(
                model = %cfg.model,
                input_len = input.len(),
                latency_ms = started.elapsed().as_millis() as u64,
                "embedding completed"
            );
        }
        out
    }

    async fn get_or_init_ollama(&self, cfg: &ModelConfig) -> LlmResult<Arc<OllamaService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(&self, cfg: &ModelConfig) -> LlmResult<Arc<OpenAiService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}
