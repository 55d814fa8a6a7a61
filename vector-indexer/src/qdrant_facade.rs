//! Thin adapter around `qdrant-client`, isolating its verbose builder API
//! from the rest of the crate.

use crate::errors::{IndexError, IndexResult};

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, Filter, PointStruct, SearchParamsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QValue, VectorParamsBuilder,
};
use tracing::{debug, info, warn};

pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
}

impl QdrantFacade {
    pub fn new(url: &str, api_key: Option<&str>, collection: &str) -> IndexResult<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        let client = builder.build().map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(Self { client, collection: collection.to_string() })
    }

    /// Creates the collection with the given vector size if it doesn't
    /// already exist. Always cosine distance; document embeddings are
    /// compared by direction, not magnitude.
    pub async fn ensure_collection(&self, vector_size: u64) -> IndexResult<()> {
        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!(collection = %self.collection, "collection already exists");
                return Ok(());
            }
            Err(err) => {
                warn!(collection = %self.collection, error = %err, "collection not found, creating");
            }
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        info!(collection = %self.collection, "collection created");
        Ok(())
    }

    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> IndexResult<u64> {
        if points.is_empty() {
            return Ok(0);
        }
        let res = self
            .client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(res.result.and_then(|r| r.operation_id).unwrap_or(0))
    }

    /// Returns `(score, payload)` pairs sorted by descending cosine score.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<Filter>,
    ) -> IndexResult<Vec<(f32, serde_json::Value)>> {
        let mut builder = SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if let Some(f) = filter {
            builder = builder.filter(f);
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| IndexError::Qdrant(e.to_string()))?;

        Ok(res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect())
    }
}

fn qpayload_to_json(mut p: std::collections::HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}

pub(crate) fn json_to_qvalue(v: serde_json::Value) -> QValue {
    use qdrant_client::qdrant::value::Kind as K;
    use serde_json::Value as J;

    match v {
        J::String(s) => QValue { kind: Some(K::StringValue(s)) },
        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                QValue { kind: Some(K::IntegerValue(i)) }
            } else if let Some(f) = n.as_f64() {
                QValue { kind: Some(K::DoubleValue(f)) }
            } else {
                QValue { kind: Some(K::StringValue(n.to_string())) }
            }
        }
        J::Bool(b) => QValue { kind: Some(K::BoolValue(b)) },
        other => QValue { kind: Some(K::StringValue(other.to_string())) },
    }
}
