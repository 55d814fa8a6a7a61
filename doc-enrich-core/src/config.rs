//! Pipeline configuration (§6 "Configuration keys"), grounded in
//! `ai-llm-service::config::default_config`'s strict env-var construction
//! (`must_env`/`env_opt_u32`) generalized to the richer key set here.
//!
//! A [`PipelineConfig`] is a frozen snapshot assembled once per orchestrator/
//! scheduler run (§10.3): environment variables provide defaults, and the
//! durable `settings` table (owned by the Review Queue, read-only from
//! worker threads per §5) overrides them via [`PipelineConfig::apply_settings`].

use crate::error::PipelineError;
use crate::stage::{Stage, WorkflowTagConfig};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageToggles {
    pub ocr: bool,
    pub summary: bool,
    pub schema_analysis: bool,
    pub title: bool,
    pub correspondent: bool,
    pub document_type: bool,
    pub tags: bool,
    pub custom_fields: bool,
    pub document_links: bool,
}

impl Default for StageToggles {
    fn default() -> Self {
        Self {
            ocr: true,
            summary: false,
            schema_analysis: false,
            title: true,
            correspondent: true,
            document_type: true,
            tags: true,
            custom_fields: true,
            document_links: true,
        }
    }
}

impl StageToggles {
    /// Whether the given stage transition requires LLM work. `Ocr` is not
    /// LLM-driven but is still individually toggleable (§4.4).
    pub fn is_enabled(&self, stage_config_key: &str) -> bool {
        match stage_config_key {
            "ocr" => self.ocr,
            "summary" => self.summary,
            "schema_analysis" => self.schema_analysis,
            "title" => self.title,
            "correspondent" => self.correspondent,
            "document_type" => self.document_type,
            "tags" => self.tags,
            "custom_fields" => self.custom_fields,
            "document_links" => self.document_links,
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    pub max_retries: u32,
    pub require_user_for_new_entities: bool,
    /// Keywords a reviewer's unstructured (non-JSON) reply is scanned for
    /// when deciding confirmation (§4.2); matched case-insensitively against
    /// the whole response, not just its first line.
    pub approval_keywords: Vec<String>,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            require_user_for_new_entities: true,
            approval_keywords: vec!["confirm".to_string(), "accept".to_string(), "yes".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AutoProcessingConfig {
    pub enabled: bool,
    pub interval_minutes: u32,
    pub pause_on_user_activity: bool,
    /// T in §4.6: window within which a manual invocation counts as
    /// "recent user activity".
    pub user_activity_window: Duration,
}

impl Default for AutoProcessingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: 5,
            pause_on_user_activity: true,
            user_activity_window: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VectorSearchConfig {
    pub enabled: bool,
    pub top_k: u64,
    pub min_score: f32,
}

impl Default for VectorSearchConfig {
    fn default() -> Self {
        Self { enabled: true, top_k: 5, min_score: 0.75 }
    }
}

#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub log_level: String,
    pub log_prompts: bool,
    pub log_responses: bool,
    pub save_processing_history: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_prompts: false,
            log_responses: false,
            save_processing_history: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimeoutConfig {
    pub dms: Duration,
    pub llm: Duration,
    pub ocr: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            dms: Duration::from_secs(30),
            llm: Duration::from_secs(300),
            ocr: Duration::from_secs(600),
        }
    }
}

/// Frozen configuration snapshot for one orchestrator/scheduler run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub stages: StageToggles,
    pub confirmation: ConfirmationConfig,
    pub auto_processing: AutoProcessingConfig,
    pub vector_search: VectorSearchConfig,
    pub debug: DebugConfig,
    pub timeouts: TimeoutConfig,
    pub prompt_language: String,
    pub reference_language: String,
    pub tags: WorkflowTagConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: StageToggles::default(),
            confirmation: ConfirmationConfig::default(),
            auto_processing: AutoProcessingConfig::default(),
            vector_search: VectorSearchConfig::default(),
            debug: DebugConfig::default(),
            timeouts: TimeoutConfig::default(),
            prompt_language: "en".to_string(),
            reference_language: "en".to_string(),
            tags: WorkflowTagConfig::default_vocabulary(),
        }
    }
}

impl PipelineConfig {
    /// Overrides this config in place from a flat `settings` key/value map
    /// (the durable `settings` table of §6). Unknown keys are ignored;
    /// malformed values fall back to the existing (already-valid) value
    /// rather than erroring, since settings are user-editable at runtime.
    pub fn apply_settings(&mut self, settings: &HashMap<String, String>) {
        macro_rules! bool_opt {
            ($key:expr, $field:expr) => {
                if let Some(v) = settings.get($key) {
                    $field = parse_bool(v).unwrap_or($field);
                }
            };
        }
        macro_rules! num_opt {
            ($key:expr, $field:expr, $ty:ty) => {
                if let Some(v) = settings.get($key) {
                    if let Ok(n) = v.parse::<$ty>() {
                        $field = n;
                    }
                }
            };
        }

        bool_opt!("pipeline.ocr", self.stages.ocr);
        bool_opt!("pipeline.summary", self.stages.summary);
        bool_opt!("pipeline.schema_analysis", self.stages.schema_analysis);
        bool_opt!("pipeline.title", self.stages.title);
        bool_opt!("pipeline.correspondent", self.stages.correspondent);
        bool_opt!("pipeline.document_type", self.stages.document_type);
        bool_opt!("pipeline.tags", self.stages.tags);
        bool_opt!("pipeline.custom_fields", self.stages.custom_fields);
        bool_opt!("pipeline.document_links", self.stages.document_links);

        num_opt!("confirmation.max_retries", self.confirmation.max_retries, u32);
        bool_opt!(
            "confirmation.require_user_for_new_entities",
            self.confirmation.require_user_for_new_entities
        );

        bool_opt!("auto_processing.enabled", self.auto_processing.enabled);
        num_opt!(
            "auto_processing.interval_minutes",
            self.auto_processing.interval_minutes,
            u32
        );
        bool_opt!(
            "auto_processing.pause_on_user_activity",
            self.auto_processing.pause_on_user_activity
        );

        bool_opt!("vector_search.enabled", self.vector_search.enabled);
        num_opt!("vector_search.top_k", self.vector_search.top_k, u64);
        num_opt!("vector_search.min_score", self.vector_search.min_score, f32);

        if let Some(v) = settings.get("debug.log_level") {
            self.debug.log_level = v.clone();
        }
        bool_opt!("debug.log_prompts", self.debug.log_prompts);
        bool_opt!("debug.log_responses", self.debug.log_responses);
        bool_opt!("debug.save_processing_history", self.debug.save_processing_history);

        if let Some(v) = settings.get("prompt_language") {
            self.prompt_language = v.clone();
        }

        for stage in Stage::ALL_IN_ORDER {
            let key = format!("tags.{}", stage.config_key());
            if let Some(v) = settings.get(&key) {
                self.tags = self.tags.clone().with_stage_tag(*stage, v.clone());
            }
        }
    }

    /// Loads from environment, mirroring `must_env`/`env_opt_u32` in style
    /// but with permissive defaults (every key is optional here — the DMS
    /// settings store is the real source of truth per §6).
    pub fn from_env() -> Result<Self, PipelineError> {
        let mut cfg = Self::default();
        if let Ok(lang) = std::env::var("PROMPT_LANGUAGE") {
            if !lang.trim().is_empty() {
                cfg.prompt_language = lang;
            }
        }
        if let Ok(retries) = std::env::var("CONFIRMATION_MAX_RETRIES") {
            cfg.confirmation.max_retries = retries
                .parse()
                .map_err(|_| PipelineError::Config("CONFIRMATION_MAX_RETRIES must be u32".into()))?;
        }
        Ok(cfg)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_settings_overrides_defaults() {
        let mut cfg = PipelineConfig::default();
        let mut settings = HashMap::new();
        settings.insert("pipeline.summary".to_string(), "true".to_string());
        settings.insert("confirmation.max_retries".to_string(), "5".to_string());
        cfg.apply_settings(&settings);
        assert!(cfg.stages.summary);
        assert_eq!(cfg.confirmation.max_retries, 5);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let mut cfg = PipelineConfig::default();
        let before = cfg.confirmation.max_retries;
        let mut settings = HashMap::new();
        settings.insert("confirmation.max_retries".to_string(), "not-a-number".to_string());
        cfg.apply_settings(&settings);
        assert_eq!(cfg.confirmation.max_retries, before);
    }
}
