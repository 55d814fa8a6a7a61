//! Lightweight reachability probe for the configured model roles, grounded
//! in `ai-llm-service::health_service::HealthService`. Never fails: a probe
//! error becomes `ok: false` so the `/health` endpoint always has something
//! to render.

use crate::config::{LlmAdapterConfig, LlmProvider, ModelConfig, ModelRole};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub role: String,
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

pub struct HealthChecker {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(timeout_secs: Option<u64>) -> Self {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        Self { client: reqwest::Client::builder().timeout(timeout).build().unwrap_or_default(), timeout }
    }

    /// Checks every distinct role/config pair, deduplicating roles that
    /// share a config (e.g. `small`/`translation` falling back to `large`).
    pub async fn check_all(&self, config: &LlmAdapterConfig) -> Vec<HealthStatus> {
        let roles = [ModelRole::Large, ModelRole::Small, ModelRole::Embedding, ModelRole::Translation];
        let mut seen: Vec<&ModelConfig> = Vec::new();
        let mut out = Vec::with_capacity(roles.len());

        for role in roles {
            let cfg = config.for_role(role);
            if seen.iter().any(|c| *c == cfg) {
                continue;
            }
            seen.push(cfg);
            out.push(self.check(role, cfg).await);
        }
        out
    }

    async fn check(&self, role: ModelRole, cfg: &ModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty() || !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return self.fail(role, cfg, 0, "endpoint is empty or missing http/https");
        }

        let url = match cfg.provider {
            LlmProvider::Ollama => format!("{}/api/tags", endpoint.trim_end_matches('/')),
            LlmProvider::OpenAi => format!("{}/v1/models", endpoint.trim_end_matches('/')),
        };

        let start = Instant::now();
        let mut req = self.client.get(&url).timeout(cfg.timeout_secs.map(Duration::from_secs).unwrap_or(self.timeout));
        if let (LlmProvider::OpenAi, Some(key)) = (cfg.provider, &cfg.api_key) {
            req = req.bearer_auth(key);
        }

        match req.send().await {
            Ok(resp) if resp.status().is_success() => self.ok(role, cfg, start.elapsed().as_millis(), "reachable"),
            Ok(resp) => self.fail(role, cfg, start.elapsed().as_millis(), format!("http status {}", resp.status())),
            Err(e) => self.fail(role, cfg, start.elapsed().as_millis(), e.to_string()),
        }
    }

    fn ok(&self, role: ModelRole, cfg: &ModelConfig, latency_ms: u128, message: impl Into<String>) -> HealthStatus {
        HealthStatus {
            role: role.to_string(),
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    fn fail(&self, role: ModelRole, cfg: &ModelConfig, latency_ms: u128, message: impl Into<String>) -> HealthStatus {
        HealthStatus {
            role: role.to_string(),
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}
