//! File-backed content store: `<root>/<type>/<id>.json`.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::{validate_id, ContentAccessor, FactionRelationships};
use crate::{ContentError, ContentResult, ContentType, EditorConfig};

const RECORD_EXTENSION: &str = "json";

/// A [`ContentAccessor`] over a directory tree of pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
    relationships_file: PathBuf,
}

impl JsonDirStore {
    /// Create a store rooted at `root`, with the default relationships file name.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let relationships_file = root.join(EditorConfig::default().relationships_file);
        Self {
            root,
            relationships_file,
        }
    }

    /// Create a store from editor configuration.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            root: config.data_dir.clone(),
            relationships_file: config.data_dir.join(&config.relationships_file),
        }
    }

    /// The data root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn type_dir(&self, content_type: ContentType) -> PathBuf {
        self.root.join(content_type.dir_name())
    }

    fn record_path(&self, content_type: ContentType, id: &str) -> ContentResult<PathBuf> {
        validate_id(id)?;
        Ok(self
            .type_dir(content_type)
            .join(format!("{id}.{RECORD_EXTENSION}")))
    }
}

/// Read and parse a JSON file, returning `None` when it does not exist.
pub(crate) fn read_json_file(path: &Path) -> ContentResult<Option<Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ContentError::io(path, err)),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| ContentError::json(path.display().to_string(), e))
}

/// Write a value as pretty-printed JSON, creating parent directories.
pub(crate) fn write_json_file(path: &Path, value: &impl serde::Serialize) -> ContentResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ContentError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| ContentError::json(path.display().to_string(), e))?;
    fs::write(path, content).map_err(|e| ContentError::io(path, e))
}

/// Remove a file, returning whether it existed.
pub(crate) fn remove_file(path: &Path) -> ContentResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(ContentError::io(path, err)),
    }
}

/// Stems of `*.json` files in a directory, sorted. A missing directory is empty.
pub(crate) fn list_json_stems(dir: &Path) -> ContentResult<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(ContentError::io(dir, err)),
    };

    let mut ids = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ContentError::io(dir, e))?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

impl ContentAccessor for JsonDirStore {
    fn list_ids(&self, content_type: ContentType) -> ContentResult<Vec<String>> {
        list_json_stems(&self.type_dir(content_type))
    }

    fn read_value(&self, content_type: ContentType, id: &str) -> ContentResult<Option<Value>> {
        // An id that cannot name a file cannot name a stored record either.
        let Ok(path) = self.record_path(content_type, id) else {
            return Ok(None);
        };
        match read_json_file(&path) {
            Err(ContentError::Json { context, source }) => {
                tracing::warn!(file = %context, error = %source, "Ignoring unparseable record file");
                Ok(None)
            }
            other => other,
        }
    }

    fn write_value(&self, content_type: ContentType, id: &str, value: &Value) -> ContentResult<()> {
        let path = self.record_path(content_type, id)?;
        write_json_file(&path, value)?;
        tracing::debug!(%content_type, id, "Wrote record");
        Ok(())
    }

    fn delete(&self, content_type: ContentType, id: &str) -> ContentResult<bool> {
        let removed = remove_file(&self.record_path(content_type, id)?)?;
        if removed {
            tracing::debug!(%content_type, id, "Deleted record");
        }
        Ok(removed)
    }

    fn faction_relationships(&self) -> ContentResult<FactionRelationships> {
        match read_json_file(&self.relationships_file)? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| ContentError::json(self.relationships_file.display().to_string(), e)),
            None => Ok(FactionRelationships::default()),
        }
    }

    fn write_faction_relationships(&self, doc: &FactionRelationships) -> ContentResult<()> {
        write_json_file(&self.relationships_file, doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Branch, Outcomes, Quest};
    use serde_json::json;

    #[test]
    fn test_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());

        let quest = Quest::new("q1", "guild", 1)
            .with_location("harbor")
            .with_branch(Branch::new("b1").with_outcomes(Outcomes::new().unlock("q2")));
        store.write_one(&quest).unwrap();

        assert!(dir.path().join("quests").join("q1.json").exists());
        let loaded: Quest = store.read_one("q1").unwrap().unwrap();
        assert_eq!(loaded, quest);
    }

    #[test]
    fn test_list_ids_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let quests = dir.path().join("quests");
        fs::create_dir_all(&quests).unwrap();
        fs::write(quests.join("b.json"), "{}").unwrap();
        fs::write(quests.join("a.json"), "{}").unwrap();
        fs::write(quests.join("notes.txt"), "scratch").unwrap();

        assert_eq!(
            store.list_ids(ContentType::Quests).unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(store.list_ids(ContentType::Lore).unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let quests = dir.path().join("quests");
        fs::create_dir_all(&quests).unwrap();
        fs::write(quests.join("broken.json"), "{ not json").unwrap();

        assert!(store.read_value(ContentType::Quests, "broken").unwrap().is_none());
    }

    #[test]
    fn test_unaddressable_id_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(store.read_value(ContentType::Characters, "").unwrap().is_none());
        assert!(store.read_value(ContentType::Characters, "../x").unwrap().is_none());
        assert!(store.write_value(ContentType::Characters, "../x", &Value::Null).is_err());
    }

    #[test]
    fn test_delete_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(!store.delete(ContentType::Quests, "ghost").unwrap());
    }

    #[test]
    fn test_relationships_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        assert!(store.faction_relationships().unwrap().relationships.is_empty());

        fs::write(
            dir.path().join("faction_relationships.json"),
            r#"{ "relationships": [{ "a": "guild", "b": "crown", "type": "war" }] }"#,
        )
        .unwrap();
        let doc = store.faction_relationships().unwrap();
        assert_eq!(doc.relationships, vec![json!({ "a": "guild", "b": "crown", "type": "war" })]);
    }
}
