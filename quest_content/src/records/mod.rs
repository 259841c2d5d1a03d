//! Record schemas for every content type the editor manages.
//!
//! Every record is a JSON document addressed by `(ContentType, id)`. Fields
//! other than `id` default when absent, and fields the schema does not name are
//! kept in a flattened `extra` map so that edits never drop authored data.

mod entities;
mod quest;

pub use entities::*;
pub use quest::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ContentError;

/// Deserialize an explicit `null` the same way as an absent field.
///
/// Hand-edited records often carry `"field": null`; those must not make the
/// whole record unreadable.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The content types stored by the editor, one directory each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Characters,
    Locations,
    Factions,
    Quests,
    Dialogs,
    Lore,
    WritingStyles,
}

impl ContentType {
    /// All content types in display order.
    pub const ALL: [ContentType; 7] = [
        ContentType::Characters,
        ContentType::Locations,
        ContentType::Factions,
        ContentType::Quests,
        ContentType::Dialogs,
        ContentType::Lore,
        ContentType::WritingStyles,
    ];

    /// Directory name used by file-backed stores.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ContentType::Characters => "characters",
            ContentType::Locations => "locations",
            ContentType::Factions => "factions",
            ContentType::Quests => "quests",
            ContentType::Dialogs => "dialogs",
            ContentType::Lore => "lore",
            ContentType::WritingStyles => "writing_styles",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl std::str::FromStr for ContentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|ty| ty.dir_name() == s)
            .ok_or_else(|| ContentError::UnknownType(s.to_string()))
    }
}

/// A typed record bound to its content type.
pub trait Record: Serialize + DeserializeOwned {
    const CONTENT_TYPE: ContentType;

    fn id(&self) -> &str;

    /// Replace the record id. Stores use this to fill in ids omitted from the
    /// document body, since the storage key is authoritative.
    fn set_id(&mut self, id: String);
}

macro_rules! impl_record {
    ($ty:ty, $content_type:expr) => {
        impl Record for $ty {
            const CONTENT_TYPE: ContentType = $content_type;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

impl_record!(Quest, ContentType::Quests);
impl_record!(Character, ContentType::Characters);
impl_record!(Faction, ContentType::Factions);
impl_record!(Location, ContentType::Locations);
impl_record!(Dialog, ContentType::Dialogs);
impl_record!(Lore, ContentType::Lore);
impl_record!(WritingStyle, ContentType::WritingStyles);
