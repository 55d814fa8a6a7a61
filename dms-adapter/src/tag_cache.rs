//! Tag-ID/name cache (§3: "never cached beyond one call" applies to
//! documents, not to the much smaller, much more stable tag namespace).
//!
//! Refreshed on a cache miss so a tag created by another process (or by a
//! concurrent stage run) is picked up without a full restart.

use doc_enrich_core::TagId;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct TagCache {
    by_id: RwLock<HashMap<TagId, String>>,
    by_name: RwLock<HashMap<String, TagId>>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&self, tags: impl IntoIterator<Item = (TagId, String)>) {
        let mut by_id = self.by_id.write().expect("tag cache lock poisoned");
        let mut by_name = self.by_name.write().expect("tag cache lock poisoned");
        by_id.clear();
        by_name.clear();
        for (id, name) in tags {
            by_name.insert(name.clone(), id);
            by_id.insert(id, name);
        }
    }

    pub fn name_of(&self, id: TagId) -> Option<String> {
        self.by_id.read().expect("tag cache lock poisoned").get(&id).cloned()
    }

    pub fn id_of(&self, name: &str) -> Option<TagId> {
        self.by_name.read().expect("tag cache lock poisoned").get(name).copied()
    }

    pub fn insert(&self, id: TagId, name: String) {
        self.by_id.write().expect("tag cache lock poisoned").insert(id, name.clone());
        self.by_name.write().expect("tag cache lock poisoned").insert(name, id);
    }

    pub fn names_of(&self, ids: &std::collections::HashSet<TagId>) -> std::collections::HashSet<String> {
        let by_id = self.by_id.read().expect("tag cache lock poisoned");
        ids.iter().filter_map(|id| by_id.get(id).cloned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_visible_from_both_directions() {
        let cache = TagCache::new();
        cache.insert(7, "llm-processed".to_string());
        assert_eq!(cache.name_of(7).as_deref(), Some("llm-processed"));
        assert_eq!(cache.id_of("llm-processed"), Some(7));
    }

    #[test]
    fn replace_all_clears_stale_entries() {
        let cache = TagCache::new();
        cache.insert(1, "stale".to_string());
        cache.replace_all([(2, "fresh".to_string())]);
        assert_eq!(cache.id_of("stale"), None);
        assert_eq!(cache.id_of("fresh"), Some(2));
    }
}
