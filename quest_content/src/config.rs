//! Editor configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{ContentError, ContentResult};

/// Where content, drafts and the relationship document live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Root of the live content tree.
    pub data_dir: PathBuf,
    /// Root of the draft staging tree.
    pub drafts_dir: PathBuf,
    /// File name of the faction relationship document, relative to `data_dir`.
    pub relationships_file: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            drafts_dir: PathBuf::from("drafts"),
            relationships_file: "faction_relationships.json".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse configuration text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> ContentResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ContentResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    /// Full path of the relationship document.
    pub fn relationships_path(&self) -> PathBuf {
        self.data_dir.join(&self.relationships_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(
            config.relationships_path(),
            PathBuf::from("data").join("faction_relationships.json")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str(r#"data_dir = "/srv/rpg""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/rpg"));
        assert_eq!(config.drafts_dir, PathBuf::from("drafts"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = EditorConfig::from_toml_str("data_dir = [");
        assert!(matches!(result, Err(ContentError::Toml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.toml");
        fs::write(&path, "drafts_dir = \"staging\"\nrelationships_file = \"rel.json\"\n").unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.drafts_dir, PathBuf::from("staging"));
        assert_eq!(config.relationships_file, "rel.json");
    }
}
