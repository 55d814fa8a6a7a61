//! LLM Adapter (§4.2, component C2): render prompts, invoke analyst and
//! reviewer models, parse structured responses. This is the only crate in
//! the workspace that talks to an LLM transport directly.

pub mod client;
pub mod config;
pub mod errors;
pub mod health;
pub mod prompt;
pub mod providers;
pub mod response_parser;

pub use client::LlmAdapter;
pub use config::{LlmAdapterConfig, LlmProvider, ModelConfig, ModelRole};
pub use errors::{LlmError, LlmResult};
pub use health::{HealthChecker, HealthStatus};
pub use prompt::{default_english_templates, Prompt, PromptLibrary};
pub use response_parser::{extract_outermost_json_object, parse_analysis, parse_confirmation};
