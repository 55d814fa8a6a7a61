//! Summary stage (§4.4): single-pass, no confirmation loop. A failure here
//! is logged and swallowed rather than aborting the document — a missing
//! summary is a degraded outcome, not a pipeline-stopping one.

use crate::context::{StageContext, StageRunOutcome};
use crate::errors::StageResult;
use crate::transition;
use doc_enrich_core::{CustomFieldId, CustomFieldValue, Document, Stage};
use llm_adapter::ModelRole;
use std::collections::HashMap;

pub async fn run_stage(ctx: &StageContext, doc: &Document, summary_field_id: Option<CustomFieldId>) -> StageResult<StageRunOutcome> {
    let mut vars = HashMap::new();
    vars.insert("document_content", doc.content.clone());

    let Some(prompt) = ctx.prompts.render("analyst.summary", &ctx.config.prompt_language, &vars) else {
        tracing::warn!(doc_id = doc.id, "no summary template registered, skipping");
        transition::advance(ctx, doc.id, &doc.tag_ids, Stage::SummaryDone).await?;
        return Ok(StageRunOutcome::Applied { attempts: 0 });
    };

    match ctx.llm.generate(ModelRole::Large, &prompt.user, Some(&prompt.system)).await {
        Ok(raw) => {
            let analysis = llm_adapter::parse_analysis(&raw, 160);
            if let (Some(field_id), Some(text)) = (summary_field_id, analysis.suggested_value.as_str()) {
                if let Err(e) = ctx.dms.set_custom_field(doc.id, field_id, &CustomFieldValue::String(text.to_string())).await {
                    tracing::warn!(doc_id = doc.id, error = %e, "failed to write summary, continuing anyway");
                }
            }
        }
        Err(e) => {
            tracing::warn!(doc_id = doc.id, error = %e, "summary generation failed, continuing anyway");
        }
    }

    transition::advance(ctx, doc.id, &doc.tag_ids, Stage::SummaryDone).await?;
    Ok(StageRunOutcome::Applied { attempts: 1 })
}
