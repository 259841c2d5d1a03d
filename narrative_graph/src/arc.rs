//! Character arcs - where a character shows up across the quest set.

use quest_content::{Character, Quest};
use serde::{Deserialize, Serialize};

use crate::QuestCatalog;

/// How a character takes part in a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcRole {
    /// Listed among the quest's characters.
    QuestCharacter,
    /// Only named in a branch's character extras.
    ExtraMention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub quest_id: String,
    pub quest_summary: String,
    pub faction_id: String,
    pub level: u32,
    pub role: ArcRole,
    /// Matching extras, each as `[<branch_id>] <text>`.
    pub extras: Vec<String>,
    /// Destination of the last branch (in declaration order) that moves the character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moves_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterArc {
    pub character_id: String,
    /// The character record, if it exists.
    pub character: Option<Character>,
    pub appearances: Vec<Appearance>,
}

fn appearance_in(quest: &Quest, character_id: &str) -> Option<Appearance> {
    let mut extras = Vec::new();
    let mut moves_to = None;

    for branch in &quest.branches {
        for extra in &branch.outcomes.character_extras {
            if extra.character == character_id {
                extras.push(format!("[{}] {}", branch.id, extra.text));
            }
        }
        if let Some(destination) = branch.outcomes.move_character.get(character_id) {
            if !destination.is_empty() {
                moves_to = Some(destination.clone());
            }
        }
    }

    let role = if quest.involves_character(character_id) {
        ArcRole::QuestCharacter
    } else if !extras.is_empty() {
        ArcRole::ExtraMention
    } else {
        return None;
    };

    Some(Appearance {
        quest_id: quest.id.clone(),
        quest_summary: quest.summary.clone(),
        faction_id: quest.faction_id.clone(),
        level: quest.level,
        role,
        extras,
        moves_to,
    })
}

/// Collect a character's appearances, ascending by quest level.
///
/// A quest contributes at most one appearance. A move alone does not count as
/// an appearance.
pub fn character_arc(
    catalog: &QuestCatalog,
    character_id: &str,
    character: Option<Character>,
) -> CharacterArc {
    let mut appearances: Vec<Appearance> = catalog
        .iter()
        .filter_map(|quest| appearance_in(quest, character_id))
        .collect();
    appearances.sort_by_key(|a| a.level);

    CharacterArc {
        character_id: character_id.to_string(),
        character,
        appearances,
    }
}
