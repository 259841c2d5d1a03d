//! Content storage - the seam between the editor's records and whatever holds them.
//!
//! The analysis layer only ever talks to a [`ContentAccessor`]. Two
//! implementations ship with the crate:
//! - **JsonDirStore**: one directory per content type, one `<id>.json` per record
//! - **MemoryStore**: in-process maps, for tests and embedding

mod json_dir;
mod memory;

pub use json_dir::*;
pub use memory::*;

pub(crate) use json_dir::{list_json_stems, read_json_file, remove_file, write_json_file};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{ContentError, ContentResult, ContentType, Record};

/// The externally authored faction relationship document.
///
/// Entries are passed through untouched; nothing in this workspace interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FactionRelationships {
    #[serde(default)]
    pub relationships: Vec<Value>,
}

/// Keyed JSON-document storage, one namespace per content type.
pub trait ContentAccessor {
    /// All record ids of a type, sorted ascending.
    fn list_ids(&self, content_type: ContentType) -> ContentResult<Vec<String>>;

    /// Raw record document, or `None` if absent.
    fn read_value(&self, content_type: ContentType, id: &str) -> ContentResult<Option<Value>>;

    /// Create or replace a record document.
    fn write_value(&self, content_type: ContentType, id: &str, value: &Value) -> ContentResult<()>;

    /// Remove a record. Returns whether anything was removed.
    fn delete(&self, content_type: ContentType, id: &str) -> ContentResult<bool>;

    /// The declared faction relationships; empty when none were authored.
    fn faction_relationships(&self) -> ContentResult<FactionRelationships>;

    /// Replace the declared faction relationships.
    fn write_faction_relationships(&self, doc: &FactionRelationships) -> ContentResult<()>;

    /// Read and decode a single record.
    ///
    /// A document that does not match the schema is logged and treated as absent.
    fn read_one<T: Record>(&self, id: &str) -> ContentResult<Option<T>> {
        let Some(value) = self.read_value(T::CONTENT_TYPE, id)? else {
            return Ok(None);
        };
        Ok(decode_record(T::CONTENT_TYPE, id, value))
    }

    /// Read every decodable record of a type, keyed by id.
    fn read_all<T: Record>(&self) -> ContentResult<BTreeMap<String, T>> {
        let content_type = T::CONTENT_TYPE;
        let mut records = BTreeMap::new();
        for id in self.list_ids(content_type)? {
            if let Some(record) = self.read_one::<T>(&id)? {
                records.insert(id, record);
            }
        }
        tracing::debug!(
            %content_type,
            count = records.len(),
            "Loaded records"
        );
        Ok(records)
    }

    /// Encode and store a record under its own id.
    fn write_one<T: Record>(&self, record: &T) -> ContentResult<()> {
        let value = serde_json::to_value(record)
            .map_err(|e| ContentError::json(format!("{}/{}", T::CONTENT_TYPE, record.id()), e))?;
        self.write_value(T::CONTENT_TYPE, record.id(), &value)
    }
}

fn decode_record<T: Record>(content_type: ContentType, id: &str, value: Value) -> Option<T> {
    match serde_json::from_value::<T>(value) {
        Ok(mut record) => {
            if record.id().is_empty() {
                record.set_id(id.to_string());
            }
            Some(record)
        }
        Err(err) => {
            tracing::warn!(%content_type, id, error = %err, "Skipping malformed record");
            None
        }
    }
}

/// Reject ids that are empty or could escape the type's namespace.
pub fn validate_id(id: &str) -> ContentResult<()> {
    let escapes = id.contains('/') || id.contains('\\') || id.contains("..");
    if id.is_empty() || escapes {
        return Err(ContentError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Quest;
    use serde_json::json;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("q1").is_ok());
        assert!(validate_id("guild.first_contract").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("../secrets").is_err());
        assert!(validate_id("a/b").is_err());
    }

    #[test]
    fn test_read_one_fills_missing_id() {
        let store = MemoryStore::new();
        store
            .write_value(ContentType::Quests, "q1", &json!({ "faction_id": "f1" }))
            .unwrap();

        let quest: Quest = store.read_one("q1").unwrap().unwrap();
        assert_eq!(quest.id, "q1");
        assert_eq!(quest.faction_id, "f1");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let store = MemoryStore::new();
        store
            .write_value(ContentType::Quests, "good", &json!({ "id": "good", "level": 1 }))
            .unwrap();
        store
            .write_value(ContentType::Quests, "bad", &json!({ "id": "bad", "level": "high" }))
            .unwrap();

        assert!(store.read_one::<Quest>("bad").unwrap().is_none());
        let all = store.read_all::<Quest>().unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.contains_key("good"));
    }
}
