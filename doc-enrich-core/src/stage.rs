//! The pipeline's stage enumeration and the workflow-tag vocabulary that
//! projects it onto (and back from) a document's DMS tag set.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A single step in the pipeline ordering.
///
/// Variants are listed in pipeline order; [`Stage::ALL_IN_ORDER`] relies on
/// that declaration order matching §4.5's transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pending,
    OcrDone,
    SummaryDone,
    SchemaReview,
    SchemaAnalysisDone,
    TitleDone,
    CorrespondentDone,
    DocumentTypeDone,
    TagsDone,
    CustomFieldsDone,
    DocumentLinksDone,
    Processed,
}

impl Stage {
    /// All stages in pipeline order, `Pending` first.
    pub const ALL_IN_ORDER: &'static [Stage] = &[
        Stage::Pending,
        Stage::OcrDone,
        Stage::SummaryDone,
        Stage::SchemaReview,
        Stage::SchemaAnalysisDone,
        Stage::TitleDone,
        Stage::CorrespondentDone,
        Stage::DocumentTypeDone,
        Stage::TagsDone,
        Stage::CustomFieldsDone,
        Stage::DocumentLinksDone,
        Stage::Processed,
    ];

    /// Logical config key used by [`WorkflowTagConfig`] and by
    /// `pipeline.*` settings (see spec §6).
    pub fn config_key(self) -> &'static str {
        match self {
            Stage::Pending => "pending",
            Stage::OcrDone => "ocr_done",
            Stage::SummaryDone => "summary_done",
            Stage::SchemaReview => "schema_review",
            Stage::SchemaAnalysisDone => "schema_analysis_done",
            Stage::TitleDone => "title_done",
            Stage::CorrespondentDone => "correspondent_done",
            Stage::DocumentTypeDone => "document_type_done",
            Stage::TagsDone => "tags_done",
            Stage::CustomFieldsDone => "custom_fields_done",
            Stage::DocumentLinksDone => "document_links_done",
            Stage::Processed => "processed",
        }
    }
}

/// Sideband tags outside the linear stage progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebandTag {
    ManualReview,
    Failed,
}

impl SidebandTag {
    pub fn config_key(self) -> &'static str {
        match self {
            SidebandTag::ManualReview => "manual_review",
            SidebandTag::Failed => "failed",
        }
    }
}

/// A fixed, user-configurable mapping from stage name to tag name.
///
/// `schema_analysis_done` and `schema_review` may reuse the `ocr_done` tag
/// name when not distinctly configured (§3); the stage derivation in
/// [`Stage::from_tag_names`] still recovers the correct stage because it
/// walks stages in reverse pipeline order and `ocr_done`'s reuse only ever
/// collapses *earlier* stages together, never a later one.
#[derive(Debug, Clone)]
pub struct WorkflowTagConfig {
    stage_tags: HashMap<&'static str, String>,
    sideband_tags: HashMap<&'static str, String>,
}

impl WorkflowTagConfig {
    /// Default vocabulary: `llm-<stage>` naming, matching the scenarios in
    /// spec §8 (`llm-pending`, `llm-processed`, `llm-manual-review`, ...).
    pub fn default_vocabulary() -> Self {
        let mut stage_tags = HashMap::new();
        for stage in Stage::ALL_IN_ORDER {
            stage_tags.insert(
                stage.config_key(),
                format!("llm-{}", stage.config_key().replace('_', "-")),
            );
        }
        let mut sideband_tags = HashMap::new();
        sideband_tags.insert(SidebandTag::ManualReview.config_key(), "llm-manual-review".to_string());
        sideband_tags.insert(SidebandTag::Failed.config_key(), "llm-failed".to_string());
        Self { stage_tags, sideband_tags }
    }

    /// Overrides a single stage's tag name (`tags.<stage>` config key).
    pub fn with_stage_tag(mut self, stage: Stage, tag_name: impl Into<String>) -> Self {
        self.stage_tags.insert(stage.config_key(), tag_name.into());
        self
    }

    /// Overrides a sideband tag's name.
    pub fn with_sideband_tag(mut self, tag: SidebandTag, tag_name: impl Into<String>) -> Self {
        self.sideband_tags.insert(tag.config_key(), tag_name.into());
        self
    }

    pub fn tag_name(&self, stage: Stage) -> &str {
        self.stage_tags
            .get(stage.config_key())
            .expect("every Stage has a configured tag name")
    }

    pub fn sideband_tag_name(&self, tag: SidebandTag) -> &str {
        self.sideband_tags
            .get(tag.config_key())
            .expect("every SidebandTag has a configured tag name")
    }

    /// Derives the document's current [`Stage`] from its set of tag names.
    ///
    /// Checks tags in reverse pipeline order and returns the first match;
    /// absence of any workflow tag means `Pending` (§3).
    pub fn stage_from_tag_names(&self, tag_names: &HashSet<String>) -> Stage {
        for stage in Stage::ALL_IN_ORDER.iter().rev() {
            if tag_names.contains(self.tag_name(*stage)) {
                return *stage;
            }
        }
        Stage::Pending
    }

    /// True if the document carries the given sideband tag.
    pub fn has_sideband(&self, tag_names: &HashSet<String>, tag: SidebandTag) -> bool {
        tag_names.contains(self.sideband_tag_name(tag))
    }

    /// Every configured stage and sideband tag name, used to strip internal
    /// workflow markers out of anything shown to a human (e.g. the vector
    /// index's document projection, §4.7).
    pub fn all_tag_names(&self) -> HashSet<String> {
        self.stage_tags.values().chain(self.sideband_tags.values()).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_workflow_tag_is_pending() {
        let cfg = WorkflowTagConfig::default_vocabulary();
        assert_eq!(cfg.stage_from_tag_names(&tags(&["unrelated"])), Stage::Pending);
    }

    #[test]
    fn reverse_scan_picks_latest_stage() {
        let cfg = WorkflowTagConfig::default_vocabulary();
        let set = tags(&["llm-ocr-done", "llm-title-done", "some-other-tag"]);
        assert_eq!(cfg.stage_from_tag_names(&set), Stage::TitleDone);
    }

    #[test]
    fn reused_ocr_tag_still_resolves_to_later_stage() {
        let mut cfg = WorkflowTagConfig::default_vocabulary();
        cfg = cfg.with_stage_tag(Stage::SchemaAnalysisDone, cfg.tag_name(Stage::OcrDone).to_string());
        let set = tags(&["llm-ocr-done", "llm-correspondent-done"]);
        assert_eq!(cfg.stage_from_tag_names(&set), Stage::CorrespondentDone);
    }
}
