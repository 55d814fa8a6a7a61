//! `VectorIndexer`: the concrete [`orchestrator::indexer::DocumentIndexer`]
//! wired into the pipeline's `vector_index` step (§4.7).

use crate::projection::DocumentProjection;
use crate::qdrant_facade::{json_to_qvalue, QdrantFacade};
use async_trait::async_trait;
use dms_adapter::DmsClient;
use doc_enrich_core::{Document, EntityKind, PipelineConfig, PipelineError};
use llm_adapter::LlmAdapter;
use orchestrator::indexer::DocumentIndexer;
use qdrant_client::qdrant::{point_id, vectors, PointId, PointStruct, Value as QValue, Vector, Vectors};
use std::collections::HashMap;
use std::sync::Arc;

pub struct VectorIndexer {
    facade: QdrantFacade,
    dms: Arc<DmsClient>,
    llm: Arc<LlmAdapter>,
    config: Arc<PipelineConfig>,
}

impl VectorIndexer {
    pub fn new(facade: QdrantFacade, dms: Arc<DmsClient>, llm: Arc<LlmAdapter>, config: Arc<PipelineConfig>) -> Self {
        Self { facade, dms, llm, config }
    }

    async fn resolve_entity_name(&self, kind: EntityKind, id: Option<doc_enrich_core::EntityId>) -> Option<String> {
        let id = id?;
        match self.dms.list_entities(kind).await {
            Ok(entities) => entities.into_iter().find(|e| e.id == id).map(|e| e.name),
            Err(e) => {
                tracing::warn!(error = %e, ?kind, "could not resolve entity name for indexing");
                None
            }
        }
    }

    async fn build_projection(&self, doc: &Document) -> DocumentProjection {
        let tag_names = self.dms.tag_cache().names_of(&doc.tag_ids);
        let workflow_tags = self.config.tags.all_tag_names();
        let correspondent_name = self.resolve_entity_name(EntityKind::Correspondent, doc.correspondent_id).await;
        let document_type_name = self.resolve_entity_name(EntityKind::DocumentType, doc.document_type_id).await;

        DocumentProjection::build(doc, &tag_names, &workflow_tags, correspondent_name, document_type_name)
    }

    async fn index(&self, doc: &Document) -> crate::errors::IndexResult<()> {
        let projection = self.build_projection(doc).await;
        let vector = self.llm.embed(&projection.to_embedding_text()).await?;

        self.facade.ensure_collection(vector.len() as u64).await?;

        let point = build_point(doc.id, vector, &projection);
        self.facade.upsert_points(vec![point]).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentIndexer for VectorIndexer {
    async fn index_after_links(&self, doc: &Document) -> Result<(), PipelineError> {
        if !self.config.vector_search.enabled {
            return Ok(());
        }
        if let Err(e) = self.index(doc).await {
            tracing::warn!(doc_id = doc.id, error = %e, "vector indexing failed for document");
        }
        Ok(())
    }
}

fn build_point(doc_id: doc_enrich_core::DocumentId, embedding: Vec<f32>, projection: &DocumentProjection) -> PointStruct {
    let mut payload: HashMap<String, QValue> = HashMap::new();
    payload.insert("doc_id".into(), json_to_qvalue(serde_json::json!(doc_id)));
    payload.insert("title".into(), json_to_qvalue(serde_json::json!(projection.title)));
    if let Some(c) = &projection.correspondent_name {
        payload.insert("correspondent_name".into(), json_to_qvalue(serde_json::json!(c)));
    }
    if let Some(d) = &projection.document_type_name {
        payload.insert("document_type_name".into(), json_to_qvalue(serde_json::json!(d)));
    }
    payload.insert("tags".into(), json_to_qvalue(serde_json::json!(projection.tags)));

    let vectors = Vectors {
        vectors_options: Some(vectors::VectorsOptions::Vector(Vector { data: embedding, ..Default::default() })),
    };
    let id = PointId { point_id_options: Some(point_id::PointIdOptions::Num(doc_id as u64)) };

    PointStruct { id: Some(id), payload, vectors: Some(vectors), ..Default::default() }
}
