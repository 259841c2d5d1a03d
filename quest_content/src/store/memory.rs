//! In-memory content store.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{validate_id, ContentAccessor, FactionRelationships};
use crate::{ContentResult, ContentType, Record};

type Documents = BTreeMap<ContentType, BTreeMap<String, Value>>;

/// A [`ContentAccessor`] backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
    relationships: RwLock<FactionRelationships>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a typed record under its own id.
    pub fn insert<T: Record>(&self, record: &T) -> ContentResult<()> {
        self.write_one(record)
    }

    /// Store every record from an iterator.
    pub fn insert_all<'r, T: Record + 'r>(
        &self,
        records: impl IntoIterator<Item = &'r T>,
    ) -> ContentResult<()> {
        for record in records {
            self.write_one(record)?;
        }
        Ok(())
    }

    /// Number of records of a type.
    pub fn count(&self, content_type: ContentType) -> usize {
        self.docs()
            .get(&content_type)
            .map(|records| records.len())
            .unwrap_or(0)
    }

    fn docs(&self) -> RwLockReadGuard<'_, Documents> {
        self.documents.read().unwrap_or_else(|e| e.into_inner())
    }

    fn docs_mut(&self) -> RwLockWriteGuard<'_, Documents> {
        self.documents.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ContentAccessor for MemoryStore {
    fn list_ids(&self, content_type: ContentType) -> ContentResult<Vec<String>> {
        Ok(self
            .docs()
            .get(&content_type)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn read_value(&self, content_type: ContentType, id: &str) -> ContentResult<Option<Value>> {
        Ok(self
            .docs()
            .get(&content_type)
            .and_then(|records| records.get(id))
            .cloned())
    }

    fn write_value(&self, content_type: ContentType, id: &str, value: &Value) -> ContentResult<()> {
        validate_id(id)?;
        self.docs_mut()
            .entry(content_type)
            .or_default()
            .insert(id.to_string(), value.clone());
        Ok(())
    }

    fn delete(&self, content_type: ContentType, id: &str) -> ContentResult<bool> {
        Ok(self
            .docs_mut()
            .get_mut(&content_type)
            .map(|records| records.remove(id).is_some())
            .unwrap_or(false))
    }

    fn faction_relationships(&self) -> ContentResult<FactionRelationships> {
        Ok(self
            .relationships
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn write_faction_relationships(&self, doc: &FactionRelationships) -> ContentResult<()> {
        *self.relationships.write().unwrap_or_else(|e| e.into_inner()) = doc.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Character, Quest};
    use serde_json::json;

    #[test]
    fn test_insert_and_list() {
        let store = MemoryStore::new();
        store.insert(&Quest::new("q2", "f1", 1)).unwrap();
        store.insert(&Quest::new("q1", "f1", 1)).unwrap();
        store.insert(&Character::new("mira", "Mira")).unwrap();

        assert_eq!(
            store.list_ids(ContentType::Quests).unwrap(),
            vec!["q1".to_string(), "q2".to_string()]
        );
        assert_eq!(store.count(ContentType::Characters), 1);
        assert_eq!(store.count(ContentType::Lore), 0);
    }

    #[test]
    fn test_delete() {
        let store = MemoryStore::new();
        store.insert(&Quest::new("q1", "f1", 1)).unwrap();

        assert!(store.delete(ContentType::Quests, "q1").unwrap());
        assert!(!store.delete(ContentType::Quests, "q1").unwrap());
        assert!(store.read_value(ContentType::Quests, "q1").unwrap().is_none());
    }

    #[test]
    fn test_relationships_default_empty() {
        let store = MemoryStore::new();
        assert!(store.faction_relationships().unwrap().relationships.is_empty());

        let doc = FactionRelationships {
            relationships: vec![json!({ "a": "guild", "b": "crown", "stance": "rival" })],
        };
        store.write_faction_relationships(&doc).unwrap();
        assert_eq!(store.faction_relationships().unwrap(), doc);
    }

    #[test]
    fn test_write_rejects_bad_id() {
        let store = MemoryStore::new();
        assert!(store
            .write_value(ContentType::Quests, "", &json!({}))
            .is_err());
    }
}
