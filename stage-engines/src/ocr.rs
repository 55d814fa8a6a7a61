//! OCR stage (§4.4): not LLM-driven. Text extraction itself happens
//! upstream in the DMS; this stage only verifies the result landed on the
//! document before advancing the workflow tag. A document with no
//! extracted content after OCR is a permanent failure, not a retryable one.

use crate::context::{StageContext, StageRunOutcome};
use crate::errors::{StageError, StageResult};
use crate::transition;
use doc_enrich_core::{Document, PipelineError, Stage};

pub async fn run_stage(ctx: &StageContext, doc: &Document) -> StageResult<StageRunOutcome> {
    if doc.content.trim().is_empty() {
        return Err(StageError::Pipeline(PipelineError::PermanentExternal {
            service: "ocr",
            message: format!("document {} has no extracted content", doc.id),
        }));
    }
    transition::advance(ctx, doc.id, &doc.tag_ids, Stage::OcrDone).await?;
    Ok(StageRunOutcome::Applied { attempts: 0 })
}
