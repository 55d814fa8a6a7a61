//! Builds the text a document is embedded from (§4.7): title, truncated
//! content, user-facing tags (workflow tags excluded) and the resolved
//! correspondent/document-type names.

use doc_enrich_core::{Document, DocumentId};
use std::collections::HashSet;

const MAX_CONTENT_CHARS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct DocumentProjection {
    pub doc_id: DocumentId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub correspondent_name: Option<String>,
    pub document_type_name: Option<String>,
}

impl DocumentProjection {
    /// Builds a projection from a document and its resolved names.
    /// `workflow_tag_names` is excluded from `tags` since those are
    /// internal state markers, not content a reader would recognize.
    pub fn build(
        doc: &Document,
        tag_names: &HashSet<String>,
        workflow_tag_names: &HashSet<String>,
        correspondent_name: Option<String>,
        document_type_name: Option<String>,
    ) -> Self {
        let mut tags: Vec<String> = tag_names.difference(workflow_tag_names).cloned().collect();
        tags.sort();

        let content = truncate_chars(&doc.content, MAX_CONTENT_CHARS);

        Self {
            doc_id: doc.id,
            title: doc.title.clone(),
            content,
            tags,
            correspondent_name,
            document_type_name,
        }
    }

    /// Flattens the projection into the single string passed to the
    /// embedding model.
    pub fn to_embedding_text(&self) -> String {
        let mut parts = vec![format!("Title: {}", self.title)];
        if let Some(c) = &self.correspondent_name {
            parts.push(format!("Correspondent: {c}"));
        }
        if let Some(d) = &self.document_type_name {
            parts.push(format!("Document type: {d}"));
        }
        if !self.tags.is_empty() {
            parts.push(format!("Tags: {}", self.tags.join(", ")));
        }
        parts.push(format!("Content: {}", self.content));
        parts.join("\n")
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn doc(content: &str) -> Document {
        Document {
            id: 1,
            title: "Invoice 42".into(),
            content: content.into(),
            correspondent_id: None,
            document_type_id: None,
            tag_ids: HashSet::new(),
            custom_fields: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn truncates_content_over_the_char_limit() {
        let long = "x".repeat(MAX_CONTENT_CHARS + 500);
        let p = DocumentProjection::build(&doc(&long), &HashSet::new(), &HashSet::new(), None, None);
        assert_eq!(p.content.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn leaves_short_content_untouched() {
        let p = DocumentProjection::build(&doc("short body"), &HashSet::new(), &HashSet::new(), None, None);
        assert_eq!(p.content, "short body");
    }

    #[test]
    fn excludes_workflow_tags_from_the_projection() {
        let mut tags = HashSet::new();
        tags.insert("mr-ai-pending".to_string());
        tags.insert("invoices".to_string());
        let mut workflow = HashSet::new();
        workflow.insert("mr-ai-pending".to_string());

        let p = DocumentProjection::build(&doc("body"), &tags, &workflow, None, None);
        assert_eq!(p.tags, vec!["invoices".to_string()]);
    }

    #[test]
    fn embedding_text_includes_resolved_names() {
        let p = DocumentProjection::build(
            &doc("body"),
            &HashSet::new(),
            &HashSet::new(),
            Some("Acme Corp".into()),
            Some("Invoice".into()),
        );
        let text = p.to_embedding_text();
        assert!(text.contains("Correspondent: Acme Corp"));
        assert!(text.contains("Document type: Invoice"));
    }
}
