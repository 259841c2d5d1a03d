//! Reference integrity across content types.

use quest_content::{Character, Dialog, Faction, Location, Quest};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The record sets the reference check reads.
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    pub quests: BTreeMap<String, Quest>,
    pub characters: BTreeMap<String, Character>,
    pub locations: BTreeMap<String, Location>,
    pub factions: BTreeMap<String, Faction>,
    pub dialogs: BTreeMap<String, Dialog>,
}

/// Must-fix errors and should-review warnings, as display messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReferenceReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ReferenceReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

fn ids<'a, T: 'a>(records: &'a BTreeMap<String, T>, id: impl Fn(&T) -> &str) -> HashSet<&'a str> {
    records.values().map(|r| id(r)).collect()
}

/// Check every quest, character and faction for references to unknown records.
///
/// Quest faction, location and character references are errors. Dialog links,
/// character homes, faction members and branchless quests are warnings.
pub fn validate_references(snapshot: &ContentSnapshot) -> ReferenceReport {
    let character_ids = ids(&snapshot.characters, |c| c.id.as_str());
    let location_ids = ids(&snapshot.locations, |l| l.id.as_str());
    let faction_ids = ids(&snapshot.factions, |f| f.id.as_str());
    let dialog_ids = ids(&snapshot.dialogs, |d| d.id.as_str());

    let mut report = ReferenceReport::default();

    for quest in snapshot.quests.values() {
        let name = quest.qualified_id();

        if !faction_ids.contains(quest.faction_id.as_str()) {
            report.errors.push(format!(
                "Quest {name}: references unknown faction '{}'",
                quest.faction_id
            ));
        }
        if !location_ids.contains(quest.location.as_str()) {
            report.errors.push(format!(
                "Quest {name}: references unknown location '{}'",
                quest.location
            ));
        }
        for character in &quest.characters {
            if !character_ids.contains(character.as_str()) {
                report
                    .errors
                    .push(format!("Quest {name}: references unknown character '{character}'"));
            }
        }
        if let Some(dialog) = quest.dialog() {
            if !dialog_ids.contains(dialog) {
                report
                    .warnings
                    .push(format!("Quest {name}: references unknown dialog '{dialog}'"));
            }
        }
        if quest.branches.is_empty() {
            report
                .warnings
                .push(format!("Quest {name}: has no branches defined"));
        }
    }

    for character in snapshot.characters.values() {
        match character.home_location.as_deref() {
            Some(home) if location_ids.contains(home) => {}
            Some(home) => report.warnings.push(format!(
                "Character {}: has unknown home_location '{home}'",
                character.id
            )),
            None => report
                .warnings
                .push(format!("Character {}: has no home_location", character.id)),
        }
    }

    for faction in snapshot.factions.values() {
        for member in &faction.members {
            if !character_ids.contains(member.as_str()) {
                report.warnings.push(format!(
                    "Faction {}: references unknown member '{member}'",
                    faction.id
                ));
            }
        }
    }

    report
}
