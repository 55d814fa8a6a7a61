//! DMS REST client (§4.1 DMS Adapter).
//!
//! Endpoints are named generically (`/api/documents`, `/api/tags`, ...)
//! since the spec treats the DMS as a pluggable document store rather than
//! naming a specific product; the request/response shapes mirror the
//! subset actually consumed here, same as `GitLabClient` in the reference
//! git-provider client only models the fields it uses.

use crate::errors::{DmsError, DmsResult};
use crate::retry::retry_with_backoff;
use crate::tag_cache::TagCache;
use doc_enrich_core::{CustomFieldId, CustomFieldValue, Document, EntityId, EntityKind, NamedEntity, TagId};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DmsClient {
    http: Client,
    base_url: String,
    token: String,
    tag_cache: std::sync::Arc<TagCache>,
    max_attempts: u32,
}

impl DmsClient {
    pub fn new(http: Client, base_url: String, token: String) -> Self {
        Self {
            http,
            base_url,
            token,
            tag_cache: std::sync::Arc::new(TagCache::new()),
            max_attempts: 3,
        }
    }

    pub fn tag_cache(&self) -> &TagCache {
        &self.tag_cache
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, req: reqwest::RequestBuilder) -> DmsResult<T> {
        retry_with_backoff(
            self.max_attempts,
            Duration::from_millis(250),
            DmsError::is_transient,
            || {
                let req = req.try_clone().expect("DMS requests never stream a body");
                async move {
                    req.header("Authorization", format!("Token {}", self.token))
                        .send()
                        .await?
                        .error_for_status()?
                        .json::<T>()
                        .await
                        .map_err(DmsError::from)
                }
            },
        )
        .await
    }

    async fn send_no_body(&self, req: reqwest::RequestBuilder) -> DmsResult<()> {
        retry_with_backoff(
            self.max_attempts,
            Duration::from_millis(250),
            DmsError::is_transient,
            || {
                let req = req.try_clone().expect("DMS requests never stream a body");
                async move {
                    req.header("Authorization", format!("Token {}", self.token))
                        .send()
                        .await?
                        .error_for_status()
                        .map(|_| ())
                        .map_err(DmsError::from)
                }
            },
        )
        .await
    }

    /// Fetches a document by id. Never cached beyond the call (§3).
    pub async fn get_document(&self, id: i64) -> DmsResult<Document> {
        let url = format!("{}/api/documents/{}/", self.base_url, id);
        let raw: RawDocument = self.send(self.http.get(url)).await?;
        Ok(raw.into())
    }

    /// Populates the tag-ID/name cache from scratch. Call once at startup
    /// and after any bulk tag-creation operation.
    pub async fn refresh_tag_cache(&self) -> DmsResult<()> {
        let url = format!("{}/api/tags/?page_size=1000", self.base_url);
        let page: ListResponse<RawNamedEntity> = self.send(self.http.get(url)).await?;
        self.tag_cache
            .replace_all(page.results.into_iter().map(|t| (t.id, t.name)));
        Ok(())
    }

    pub async fn list_entities(&self, kind: EntityKind) -> DmsResult<Vec<NamedEntity>> {
        let url = format!("{}/api/{}/?page_size=1000", self.base_url, entity_path(kind));
        let page: ListResponse<RawNamedEntity> = self.send(self.http.get(url)).await?;
        Ok(page.results.into_iter().map(|e| NamedEntity { id: e.id, name: e.name }).collect())
    }

    /// Creates an entity if no case-insensitive name match exists, else
    /// returns the existing one (§4.4's create-or-lookup-by-name contract).
    pub async fn create_or_lookup_entity(&self, kind: EntityKind, name: &str) -> DmsResult<NamedEntity> {
        let existing = self.list_entities(kind).await?;
        if let Some(found) = existing.into_iter().find(|e| e.name.eq_ignore_ascii_case(name)) {
            return Ok(found);
        }
        let url = format!("{}/api/{}/", self.base_url, entity_path(kind));
        let body = serde_json::json!({ "name": name });
        let created: RawNamedEntity = self.send(self.http.post(url).json(&body)).await?;
        if kind == EntityKind::Tag {
            self.tag_cache.insert(created.id, created.name.clone());
        }
        Ok(NamedEntity { id: created.id, name: created.name })
    }

    pub async fn set_title(&self, doc_id: i64, title: &str) -> DmsResult<()> {
        self.patch_document(doc_id, serde_json::json!({ "title": title })).await
    }

    pub async fn set_correspondent(&self, doc_id: i64, correspondent_id: EntityId) -> DmsResult<()> {
        self.patch_document(doc_id, serde_json::json!({ "correspondent": correspondent_id })).await
    }

    pub async fn set_document_type(&self, doc_id: i64, document_type_id: EntityId) -> DmsResult<()> {
        self.patch_document(doc_id, serde_json::json!({ "document_type": document_type_id })).await
    }

    pub async fn set_custom_field(&self, doc_id: i64, field_id: CustomFieldId, value: &CustomFieldValue) -> DmsResult<()> {
        let raw = custom_field_to_json(value);
        self.patch_document(
            doc_id,
            serde_json::json!({ "custom_fields": [{ "field": field_id, "value": raw }] }),
        )
        .await
    }

    /// Atomically swaps a document's workflow stage tags: removes every tag
    /// id in `remove` and adds `add` in the same PATCH call, so a reader
    /// polling the document never observes both the old and new stage tag
    /// at once, nor neither (§4.5 "atomic tag transition").
    pub async fn apply_tag_transition(&self, doc_id: i64, current_tags: &HashSet<TagId>, remove: &HashSet<TagId>, add: TagId) -> DmsResult<()> {
        let mut next: HashSet<TagId> = current_tags.difference(remove).copied().collect();
        next.insert(add);
        self.patch_document(doc_id, serde_json::json!({ "tags": next.into_iter().collect::<Vec<_>>() })).await
    }

    pub async fn add_tag(&self, doc_id: i64, current_tags: &HashSet<TagId>, tag_id: TagId) -> DmsResult<()> {
        let mut next = current_tags.clone();
        next.insert(tag_id);
        self.patch_document(doc_id, serde_json::json!({ "tags": next.into_iter().collect::<Vec<_>>() })).await
    }

    /// General add/remove delta over the document's tag set, used by the
    /// Tags stage for content tags (as opposed to the single add/remove
    /// pair `apply_tag_transition` uses for workflow stage tags).
    pub async fn set_tags(&self, doc_id: i64, current_tags: &HashSet<TagId>, add: &HashSet<TagId>, remove: &HashSet<TagId>) -> DmsResult<()> {
        let mut next: HashSet<TagId> = current_tags.difference(remove).copied().collect();
        next.extend(add.iter().copied());
        self.patch_document(doc_id, serde_json::json!({ "tags": next.into_iter().collect::<Vec<_>>() })).await
    }

    async fn patch_document(&self, doc_id: i64, body: serde_json::Value) -> DmsResult<()> {
        let url = format!("{}/api/documents/{}/", self.base_url, doc_id);
        self.send_no_body(self.http.patch(url).json(&body)).await
    }

    /// Lists every document carrying `tag_id`, oldest-first by creation
    /// timestamp with document id as the tiebreaker (§4.6 admission order).
    /// Paginates until the DMS reports no further pages.
    pub async fn list_documents_by_tag(&self, tag_id: TagId) -> DmsResult<Vec<Document>> {
        let mut out = Vec::new();
        let mut url = Some(format!(
            "{}/api/documents/?tags__id__in={}&ordering=created&page_size=100",
            self.base_url, tag_id
        ));
        while let Some(u) = url {
            let page: ListResponse<RawDocument> = self.send(self.http.get(u)).await?;
            out.extend(page.results.into_iter().map(Document::from));
            url = page.next;
        }
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }
}

fn entity_path(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Correspondent => "correspondents",
        EntityKind::DocumentType => "document_types",
        EntityKind::Tag => "tags",
    }
}

fn custom_field_to_json(value: &CustomFieldValue) -> serde_json::Value {
    match value {
        CustomFieldValue::String(s) => serde_json::json!(s),
        CustomFieldValue::Url(s) => serde_json::json!(s),
        CustomFieldValue::Date(d) => serde_json::json!(d.format("%Y-%m-%d").to_string()),
        CustomFieldValue::Boolean(b) => serde_json::json!(b),
        CustomFieldValue::Integer(i) => serde_json::json!(i),
        CustomFieldValue::Float(f) => serde_json::json!(f),
        CustomFieldValue::Monetary(s) => serde_json::json!(s),
        CustomFieldValue::DocumentLink(ids) => serde_json::json!(ids),
        CustomFieldValue::Select(s) => serde_json::json!(s),
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    results: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNamedEntity {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    id: i64,
    title: String,
    #[serde(default)]
    content: String,
    correspondent: Option<EntityId>,
    document_type: Option<EntityId>,
    #[serde(default)]
    tags: Vec<TagId>,
    #[serde(default)]
    custom_fields: Vec<RawCustomFieldInstance>,
    created: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct RawCustomFieldInstance {
    field: CustomFieldId,
    value: serde_json::Value,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        // The field's declared type isn't known from this payload alone;
        // callers that need typed values re-validate via
        // `CustomFieldValue::from_json` against the field's schema entry.
        let custom_fields = raw
            .custom_fields
            .into_iter()
            .filter_map(|f| {
                let as_string = f.value.as_str().map(|s| CustomFieldValue::String(s.to_string()));
                as_string.map(|v| (f.field, v))
            })
            .collect();
        Document {
            id: raw.id,
            title: raw.title,
            content: raw.content,
            correspondent_id: raw.correspondent,
            document_type_id: raw.document_type,
            tag_ids: raw.tags.into_iter().collect(),
            custom_fields,
            created_at: raw.created,
        }
    }
}
