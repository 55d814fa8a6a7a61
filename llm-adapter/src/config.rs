//! Per-role model configuration, grounded in
//! `ai-llm-service::config::llm_model_config::LlmModelConfig` and
//! `llm_provider::LlmProvider`, extended with the `translation` role (§4.2).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    Ollama,
    OpenAi,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Ollama => write!(f, "ollama"),
            LlmProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// `model_role ∈ {large, small, embedding, translation}` (§4.2): the adapter
/// maps a role to a concrete model name from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelRole {
    /// The analyst model: proposes an Analysis.
    Large,
    /// The reviewer model: ratifies or rejects a proposal.
    Small,
    Embedding,
    Translation,
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelRole::Large => write!(f, "large"),
            ModelRole::Small => write!(f, "small"),
            ModelRole::Embedding => write!(f, "embedding"),
            ModelRole::Translation => write!(f, "translation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

/// Holds the four role configs. `small` falls back to `large` and
/// `translation` falls back to `large` when not distinctly configured,
/// mirroring `LlmServiceProfiles::new`'s slow→fast fallback.
#[derive(Debug, Clone)]
pub struct LlmAdapterConfig {
    pub large: ModelConfig,
    pub small: ModelConfig,
    pub embedding: ModelConfig,
    pub translation: ModelConfig,
}

impl LlmAdapterConfig {
    pub fn new(large: ModelConfig, small: Option<ModelConfig>, embedding: ModelConfig, translation: Option<ModelConfig>) -> Self {
        let small = small.unwrap_or_else(|| large.clone());
        let translation = translation.unwrap_or_else(|| large.clone());
        Self { large, small, embedding, translation }
    }

    pub fn for_role(&self, role: ModelRole) -> &ModelConfig {
        match role {
            ModelRole::Large => &self.large,
            ModelRole::Small => &self.small,
            ModelRole::Embedding => &self.embedding,
            ModelRole::Translation => &self.translation,
        }
    }
}
