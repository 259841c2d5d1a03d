//! Draft staging area: content that has not been reviewed into the live store yet.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::store::{list_json_stems, read_json_file, remove_file, write_json_file};
use crate::{validate_id, ContentAccessor, ContentError, ContentResult, ContentType, EditorConfig};

/// Lifecycle of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Promoted,
}

/// A staged record plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// `<type>/<id>`.
    pub draft_id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub status: DraftStatus,
    pub data: Value,
}

impl Draft {
    fn new(content_type: ContentType, id: &str, data: Value, now: DateTime<Utc>) -> Self {
        let stamp = timestamp(now);
        Self {
            draft_id: format!("{content_type}/{id}"),
            content_type,
            id: id.to_string(),
            created_at: stamp.clone(),
            updated_at: stamp,
            status: DraftStatus::Draft,
            data,
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// File-backed draft storage: `<root>/<type>/<id>.json`.
#[derive(Debug, Clone)]
pub struct DraftStore {
    root: PathBuf,
}

impl DraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.drafts_dir.clone())
    }

    fn path(&self, content_type: ContentType, id: &str) -> ContentResult<PathBuf> {
        validate_id(id)?;
        Ok(self
            .root
            .join(content_type.dir_name())
            .join(format!("{id}.json")))
    }

    /// Drafts of one type, or of every type when `content_type` is `None`.
    pub fn list(&self, content_type: Option<ContentType>) -> ContentResult<Vec<Draft>> {
        let types = match content_type {
            Some(ty) => vec![ty],
            None => ContentType::ALL.to_vec(),
        };

        let mut drafts = Vec::new();
        for ty in types {
            for id in list_json_stems(&self.root.join(ty.dir_name()))? {
                match self.get(ty, &id) {
                    Ok(Some(draft)) => drafts.push(draft),
                    Ok(None) => {}
                    Err(ContentError::Json { context, source }) => {
                        tracing::warn!(file = %context, error = %source, "Skipping malformed draft");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(drafts)
    }

    pub fn get(&self, content_type: ContentType, id: &str) -> ContentResult<Option<Draft>> {
        let path = self.path(content_type, id)?;
        let Some(value) = read_json_file(&path)? else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ContentError::json(path.display().to_string(), e))
    }

    /// Update an existing draft's data, or create it.
    pub fn save(&self, content_type: ContentType, id: &str, data: Value) -> ContentResult<Draft> {
        let now = Utc::now();
        let draft = match self.get(content_type, id)? {
            Some(mut existing) => {
                existing.data = data;
                existing.updated_at = timestamp(now);
                existing
            }
            None => Draft::new(content_type, id, data, now),
        };
        write_json_file(&self.path(content_type, id)?, &draft)?;
        tracing::debug!(draft_id = %draft.draft_id, "Saved draft");
        Ok(draft)
    }

    pub fn delete(&self, content_type: ContentType, id: &str) -> ContentResult<bool> {
        remove_file(&self.path(content_type, id)?)
    }

    /// Write the draft's data into the live store and discard the draft.
    ///
    /// Returns `None` when no such draft exists.
    pub fn promote<A: ContentAccessor>(
        &self,
        content_type: ContentType,
        id: &str,
        live: &A,
    ) -> ContentResult<Option<Draft>> {
        let Some(mut draft) = self.get(content_type, id)? else {
            return Ok(None);
        };
        live.write_value(content_type, id, &draft.data)?;
        self.delete(content_type, id)?;
        draft.status = DraftStatus::Promoted;
        tracing::debug!(draft_id = %draft.draft_id, "Promoted draft");
        Ok(Some(draft))
    }
}
