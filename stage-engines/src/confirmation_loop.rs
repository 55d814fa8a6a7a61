//! The generic confirmation-loop procedure shared by every LLM-driven stage
//! (§4.4 "All stages that touch the LLM share one algorithm").

use doc_enrich_core::{Analysis, PendingReviewKind};
use llm_adapter::{LlmAdapter, ModelRole, PromptLibrary};
use review_queue::ReviewQueue;
use std::collections::HashMap;

/// Outcome of running the confirmation loop for one stage/document pair.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    /// The reviewer confirmed the analyst's proposal within the retry budget.
    Confirmed { analysis: Analysis, attempts: u32 },
    /// The retry budget was exhausted without a confirmed proposal; the
    /// caller must enqueue a [`doc_enrich_core::PendingReview`] (§4.4
    /// `return queue_for_review(last_analysis)`).
    NeedsReview { last_analysis: Analysis, last_feedback: Option<String> },
}

pub struct ConfirmationLoopInputs<'a> {
    pub kind: PendingReviewKind,
    /// Stage key shared by the `analyst.<key>`/`reviewer.<key>` template pair
    /// (§4.4; see `llm_adapter::default_english_templates`).
    pub stage_key: &'static str,
    pub language: &'a str,
    pub max_retries: u32,
    /// Variables available to both the analyst and reviewer templates;
    /// `feedback` is injected/updated by the loop itself each round.
    pub base_vars: HashMap<&'static str, String>,
    /// Keywords an unstructured reviewer reply is scanned for (§4.2); comes
    /// from [`doc_enrich_core::ConfirmationConfig::approval_keywords`].
    pub approval_keywords: &'a [String],
}

/// Runs the analyst/reviewer confirmation loop for one stage invocation.
///
/// Mirrors the pseudocode in §4.4 exactly: blocklisted or empty analyst
/// suggestions count as a failed attempt and feed a synthetic rejection
/// back into the next round's `feedback` variable, without consuming a
/// reviewer call.
pub async fn run(
    llm: &LlmAdapter,
    prompts: &PromptLibrary,
    queue: &ReviewQueue,
    inputs: ConfirmationLoopInputs<'_>,
) -> Result<StageOutcome, doc_enrich_core::PipelineError> {
    let analyst_template = format!("analyst.{}", inputs.stage_key);
    let reviewer_template = format!("reviewer.{}", inputs.stage_key);

    let mut feedback: Option<String> = None;
    let mut last_analysis: Option<Analysis> = None;

    for attempt in 1..=inputs.max_retries.max(1) {
        let mut vars = inputs.base_vars.clone();
        vars.insert("feedback", feedback.clone().unwrap_or_default());

        let analyst_prompt = prompts
            .render(&analyst_template, inputs.language, &vars)
            .ok_or_else(|| doc_enrich_core::PipelineError::Config(format!("missing prompt template {analyst_template}")))?;
        let raw_analysis = llm.generate(ModelRole::Large, &analyst_prompt.user, Some(&analyst_prompt.system)).await?;
        let mut analysis = llm_adapter::parse_analysis(&raw_analysis, 160);
        analysis.attempts_used = attempt;

        if analysis.is_empty_suggestion() || queue.is_blocked(inputs.kind, &suggestion_text(&analysis)).await? {
            tracing::debug!(attempt, kind = ?inputs.kind, "analyst suggestion blocked or empty, retrying");
            feedback = Some("prior suggestion blocked/empty".to_string());
            last_analysis = Some(analysis);
            continue;
        }

        let mut reviewer_vars = vars.clone();
        reviewer_vars.insert("suggested_value", suggestion_text(&analysis));
        reviewer_vars.insert("reasoning", analysis.reasoning.clone());
        let reviewer_prompt = prompts
            .render(&reviewer_template, inputs.language, &reviewer_vars)
            .ok_or_else(|| doc_enrich_core::PipelineError::Config(format!("missing prompt template {reviewer_template}")))?;
        let raw_verdict = llm.generate(ModelRole::Small, &reviewer_prompt.user, Some(&reviewer_prompt.system)).await?;
        let verdict = llm_adapter::parse_confirmation(&raw_verdict, inputs.approval_keywords);

        if verdict.confirmed {
            return Ok(StageOutcome::Confirmed { analysis, attempts: attempt });
        }

        feedback = Some(verdict.feedback.unwrap_or_else(|| "not confirmed".to_string()));
        last_analysis = Some(analysis);
    }

    Ok(StageOutcome::NeedsReview {
        last_analysis: last_analysis.expect("loop runs at least once"),
        last_feedback: feedback,
    })
}

fn suggestion_text(analysis: &Analysis) -> String {
    match &analysis.suggested_value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_text_unwraps_plain_strings() {
        let analysis = Analysis::best_effort(serde_json::json!("Acme Corp"), "matched letterhead");
        assert_eq!(suggestion_text(&analysis), "Acme Corp");
    }

    #[test]
    fn suggestion_text_stringifies_non_string_values() {
        let analysis = Analysis::best_effort(serde_json::json!(["invoice", "receipt"]), "two tags fit");
        assert_eq!(suggestion_text(&analysis), "[\"invoice\",\"receipt\"]");
    }
}
