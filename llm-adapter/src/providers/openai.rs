//! OpenAI-compatible chat-completions provider, adapted from
//! `ai-llm-service::services::open_ai_service`.

use crate::config::ModelConfig;
use crate::errors::{LlmError, LlmResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct OpenAiService {
    http: Client,
    cfg: ModelConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedDatum>,
}

#[derive(Deserialize)]
struct EmbedDatum {
    embedding: Vec<f32>,
}

impl OpenAiService {
    pub fn new(cfg: ModelConfig) -> LlmResult<Self> {
        let mut builder = Client::builder();
        if let Some(t) = cfg.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(t));
        }
        let http = builder.build().map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self { http, cfg })
    }

    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> LlmResult<String> {
        let mut messages = Vec::with_capacity(2);
        if let Some(s) = system {
            messages.push(ChatMessage { role: "system", content: s });
        }
        messages.push(ChatMessage { role: "user", content: prompt });

        let req = ChatRequest {
            model: &self.cfg.model,
            messages,
            temperature: self.cfg.temperature,
            top_p: self.cfg.top_p,
            max_tokens: self.cfg.max_tokens,
        };

        let key = self.cfg.api_key.as_deref().ok_or_else(|| LlmError::Config("missing OpenAI api key".into()))?;
        let mut resp: ChatResponse = self
            .http
            .post(format!("{}/chat/completions", self.cfg.endpoint.trim_end_matches('/')))
            .bearer_auth(key)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        resp.choices
            .pop()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("empty choices array".into()))
    }

    pub async fn embeddings(&self, input: &str) -> LlmResult<Vec<f32>> {
        let key = self.cfg.api_key.as_deref().ok_or_else(|| LlmError::Config("missing OpenAI api key".into()))?;
        let req = EmbedRequest { model: &self.cfg.model, input };
        let mut resp: EmbedResponse = self
            .http
            .post(format!("{}/embeddings", self.cfg.endpoint.trim_end_matches('/')))
            .bearer_auth(key)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        resp.data
            .pop()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::InvalidResponse("empty embedding data array".into()))
    }
}
