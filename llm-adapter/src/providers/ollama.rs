//! Local Ollama provider, adapted from
//! `ai-llm-service::services::ollama_service` and
//! `mr-reviewer::review::llm::OllamaClient`'s request/response shapes.

use crate::config::ModelConfig;
use crate::errors::{LlmError, LlmResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct OllamaService {
    http: Client,
    cfg: ModelConfig,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaService {
    pub fn new(cfg: ModelConfig) -> LlmResult<Self> {
        let mut builder = Client::builder();
        if let Some(t) = cfg.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(t));
        }
        let http = builder.build().map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self { http, cfg })
    }

    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        let full_prompt = match system {
            Some(s) => format!("{s}\n\n{prompt}"),
            None => prompt.to_string(),
        };
        let url = format!("{}/api/generate", self.cfg.endpoint.trim_end_matches('/'));
        let req = GenerateRequest {
            model: &self.cfg.model,
            prompt: full_prompt,
            stream: false,
            options: Some(GenerateOptions {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                num_predict: self.cfg.max_tokens,
            }),
        };
        let resp: GenerateResponse = self.http.post(url).json(&req).send().await?.error_for_status()?.json().await?;
        Ok(resp.response)
    }

    pub async fn embeddings(&self, input: &str) -> LlmResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.cfg.endpoint.trim_end_matches('/'));
        let req = EmbedRequest { model: &self.cfg.model, prompt: input };
        let resp: EmbedResponse = self.http.post(url).json(&req).send().await?.error_for_status()?.json().await?;
        Ok(resp.embedding)
    }
}
