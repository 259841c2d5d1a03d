//! Characters, factions, locations and the supporting writing records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;

/// A named character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Character {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_location: Option<String>,

    // Appearance, personality, speech and the like are free-form.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_home(mut self, location: impl Into<String>) -> Self {
        self.home_location = Some(location.into());
        self
    }
}

/// A faction or organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Faction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Character ids.
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<String>,
    /// Starting stat values, keyed by stat name.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub stats: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Faction {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_member(mut self, character: impl Into<String>) -> Self {
        self.members.push(character.into());
        self
    }
}

/// A place in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A dialog tree. Nodes are kept as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Dialog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub nodes: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dialog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A lore entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Lore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_entities: Vec<String>,
    /// Hidden from players until revealed in play.
    #[serde(default, deserialize_with = "null_as_default")]
    pub secret: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Prose guidance for generated or hand-written text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WritingStyle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub example: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applicable_to: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
