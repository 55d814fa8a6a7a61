//! Stream-mode entry point: the same [`engine::drive`] loop, but each event
//! is forwarded live over an mpsc channel as it happens, matching the
//! NDJSON-over-channel bridge described for the streaming API endpoint.

use crate::engine;
use crate::extras::StageExtras;
use crate::indexer::DocumentIndexer;
use doc_enrich_core::{DocumentId, PipelineEvent};
use futures::stream::{self, Stream};
use stage_engines::context::StageContext;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Spawns the drive loop on its own task and returns a stream of the
/// events it emits. The final event is always `pipeline_complete`,
/// `pipeline_paused` or `error` (§6's event grammar); the stream ends
/// right after it.
pub fn run_stream(
    stage_ctx: StageContext,
    indexer: Arc<dyn DocumentIndexer>,
    doc_id: DocumentId,
    extras: StageExtras,
) -> impl Stream<Item = PipelineEvent> {
    let (tx, rx) = mpsc::unbounded_channel::<PipelineEvent>();

    tokio::spawn(async move {
        let emit_tx = tx.clone();
        let result = engine::drive(&stage_ctx, indexer.as_ref(), doc_id, &extras, None, move |event| {
            if emit_tx.send(event).is_err() {
                tracing::debug!(doc_id, "pipeline event receiver dropped mid-run");
            }
        })
        .await;

        if let Err(e) = result {
            let _ = tx.send(
                PipelineEvent::new(doc_enrich_core::PipelineEventKind::Error, doc_id).with_message(e.to_string()),
            );
        }
    });

    stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|event| (event, rx)) })
}
