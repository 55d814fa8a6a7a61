//! The orchestrator's own step enumeration, distinct from
//! [`doc_enrich_core::Stage`] (which names workflow *tags*, including the
//! non-runnable `SchemaReview` pause marker). Each [`Step`] is one runnable
//! unit of work and knows which tag it leaves behind on success.

use doc_enrich_core::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Ocr,
    Summary,
    SchemaAnalysis,
    Title,
    Correspondent,
    DocumentType,
    Tags,
    CustomFields,
    DocumentLinks,
    VectorIndex,
}

impl Step {
    pub const ALL_IN_ORDER: &'static [Step] = &[
        Step::Ocr,
        Step::Summary,
        Step::SchemaAnalysis,
        Step::Title,
        Step::Correspondent,
        Step::DocumentType,
        Step::Tags,
        Step::CustomFields,
        Step::DocumentLinks,
        Step::VectorIndex,
    ];

    /// Looks up a step by its `StageToggles`/`pipeline.*` config key, used
    /// for ad-hoc single-stage invocation (§4.5 "Per-step ad-hoc invocation").
    pub fn from_config_key(key: &str) -> Option<Step> {
        Step::ALL_IN_ORDER.iter().copied().find(|s| s.config_key() == key)
    }

    pub fn config_key(self) -> &'static str {
        match self {
            Step::Ocr => "ocr",
            Step::Summary => "summary",
            Step::SchemaAnalysis => "schema_analysis",
            Step::Title => "title",
            Step::Correspondent => "correspondent",
            Step::DocumentType => "document_type",
            Step::Tags => "tags",
            Step::CustomFields => "custom_fields",
            Step::DocumentLinks => "document_links",
            Step::VectorIndex => "document_links", // vector indexing rides on the same toggle; gated separately by vector_search.enabled
        }
    }

    /// The workflow tag this step leaves the document at on success (absent
    /// `SchemaAnalysis`, whose "no pause" outcome still lands here — the
    /// pause path is handled specially by the engine).
    pub fn target_stage(self) -> Stage {
        match self {
            Step::Ocr => Stage::OcrDone,
            Step::Summary => Stage::SummaryDone,
            Step::SchemaAnalysis => Stage::SchemaAnalysisDone,
            Step::Title => Stage::TitleDone,
            Step::Correspondent => Stage::CorrespondentDone,
            Step::DocumentType => Stage::DocumentTypeDone,
            Step::Tags => Stage::TagsDone,
            Step::CustomFields => Stage::CustomFieldsDone,
            Step::DocumentLinks => Stage::DocumentLinksDone,
            Step::VectorIndex => Stage::Processed,
        }
    }

    /// The first step that still needs to run given the document's current
    /// workflow tag (§4.5's transition table, read as "next step after tag X").
    pub fn first_pending(current: Stage) -> Option<Step> {
        match current {
            Stage::Pending => Some(Step::Ocr),
            Stage::OcrDone => Some(Step::Summary),
            Stage::SummaryDone | Stage::SchemaReview => Some(Step::SchemaAnalysis),
            Stage::SchemaAnalysisDone => Some(Step::Title),
            Stage::TitleDone => Some(Step::Correspondent),
            Stage::CorrespondentDone => Some(Step::DocumentType),
            Stage::DocumentTypeDone => Some(Step::Tags),
            Stage::TagsDone => Some(Step::CustomFields),
            Stage::CustomFieldsDone => Some(Step::DocumentLinks),
            Stage::DocumentLinksDone => Some(Step::VectorIndex),
            Stage::Processed => None,
        }
    }

    /// All steps from (and including) `self` through the end of the pipeline,
    /// used to run the machine to completion from wherever it currently sits.
    pub fn remaining_from(self) -> &'static [Step] {
        let idx = Step::ALL_IN_ORDER.iter().position(|s| *s == self).expect("every Step is in ALL_IN_ORDER");
        &Step::ALL_IN_ORDER[idx..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_stage_starts_at_ocr() {
        assert_eq!(Step::first_pending(Stage::Pending), Some(Step::Ocr));
    }

    #[test]
    fn summary_done_and_schema_review_both_resume_at_schema_analysis() {
        assert_eq!(Step::first_pending(Stage::SummaryDone), Some(Step::SchemaAnalysis));
        assert_eq!(Step::first_pending(Stage::SchemaReview), Some(Step::SchemaAnalysis));
    }

    #[test]
    fn processed_has_nothing_left_to_run() {
        assert_eq!(Step::first_pending(Stage::Processed), None);
    }

    #[test]
    fn remaining_from_tags_runs_through_vector_index() {
        let remaining = Step::Tags.remaining_from();
        assert_eq!(
            remaining,
            &[Step::Tags, Step::CustomFields, Step::DocumentLinks, Step::VectorIndex]
        );
    }

    #[test]
    fn from_config_key_round_trips_every_step_except_vector_index_alias() {
        for step in Step::ALL_IN_ORDER.iter().copied() {
            if step == Step::VectorIndex {
                continue;
            }
            assert_eq!(Step::from_config_key(step.config_key()), Some(step));
        }
    }

    #[test]
    fn unknown_config_key_resolves_to_none() {
        assert_eq!(Step::from_config_key("not_a_real_step"), None);
    }
}
