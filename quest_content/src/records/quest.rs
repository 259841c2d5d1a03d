//! Quest, branch and outcome definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;
use std::collections::BTreeMap;

/// A quest: one node of the narrative graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Quest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub faction_id: String,
    /// Progression rank within the owning faction.
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub characters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub consequential: bool,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub requirements: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub auto_resolve: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branches: Vec<Branch>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Quest {
    /// Create a quest owned by `faction_id` at the given level.
    pub fn new(id: impl Into<String>, faction_id: impl Into<String>, level: u32) -> Self {
        Self {
            id: id.into(),
            faction_id: faction_id.into(),
            level,
            ..Default::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        self.characters.push(character.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_dialog(mut self, dialog_id: impl Into<String>) -> Self {
        self.dialog_id = Some(dialog_id.into());
        self
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    /// The linked dialog, if any. An empty id counts as no dialog.
    pub fn dialog(&self) -> Option<&str> {
        self.dialog_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Find a branch by id.
    pub fn branch(&self, branch_id: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == branch_id)
    }

    /// Qualified name used in validation messages: `<faction>.<id>`.
    pub fn qualified_id(&self) -> String {
        format!("{}.{}", self.faction_id, self.id)
    }

    /// Check if the character takes part in this quest directly.
    pub fn involves_character(&self, character_id: &str) -> bool {
        self.characters.iter().any(|c| c == character_id)
    }
}

/// One possible resolution of a quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Branch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outcomes: Outcomes,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Branch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_outcomes(mut self, outcomes: Outcomes) -> Self {
        self.outcomes = outcomes;
        self
    }
}

/// Kinds of quest references a branch can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Unlocks,
    Triggers,
    Blocks,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Unlocks,
        ReferenceKind::Triggers,
        ReferenceKind::Blocks,
    ];

    /// Outcome field name (`unlocks`, `triggers`, `blocks`).
    pub fn field_name(&self) -> &'static str {
        match self {
            ReferenceKind::Unlocks => "unlocks",
            ReferenceKind::Triggers => "triggers",
            ReferenceKind::Blocks => "blocks",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// An incidental narrative beat attributed to a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CharacterExtra {
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

impl CharacterExtra {
    pub fn new(character: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            text: text.into(),
        }
    }
}

/// The effect bundle attached to a branch. Every field may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Outcomes {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub unlocks: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub triggers: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub blocks: Vec<String>,

    /// `"<faction_id>.<stat>"` -> signed delta.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub faction_stats: BTreeMap<String, f64>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Map::is_empty"
    )]
    pub global_vars: Map<String, Value>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub character_extras: Vec<CharacterExtra>,

    /// Character id -> destination location id.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub move_character: BTreeMap<String, String>,

    /// Location id -> new named state.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub change_location_state: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Outcomes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlock(mut self, quest_id: impl Into<String>) -> Self {
        self.unlocks.push(quest_id.into());
        self
    }

    pub fn trigger(mut self, quest_id: impl Into<String>) -> Self {
        self.triggers.push(quest_id.into());
        self
    }

    pub fn block(mut self, quest_id: impl Into<String>) -> Self {
        self.blocks.push(quest_id.into());
        self
    }

    pub fn stat(mut self, key: impl Into<String>, delta: f64) -> Self {
        self.faction_stats.insert(key.into(), delta);
        self
    }

    pub fn set_var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.global_vars.insert(name.into(), value.into());
        self
    }

    pub fn extra_for(mut self, character: impl Into<String>, text: impl Into<String>) -> Self {
        self.character_extras
            .push(CharacterExtra::new(character, text));
        self
    }

    pub fn move_to(mut self, character: impl Into<String>, location: impl Into<String>) -> Self {
        self.move_character.insert(character.into(), location.into());
        self
    }

    pub fn location_state(mut self, location: impl Into<String>, state: impl Into<String>) -> Self {
        self.change_location_state
            .insert(location.into(), state.into());
        self
    }

    /// Quest ids referenced under the given kind.
    pub fn targets(&self, kind: ReferenceKind) -> &[String] {
        match kind {
            ReferenceKind::Unlocks => &self.unlocks,
            ReferenceKind::Triggers => &self.triggers,
            ReferenceKind::Blocks => &self.blocks,
        }
    }

    /// Every quest reference, in field order unlocks, triggers, blocks.
    pub fn references(&self) -> impl Iterator<Item = (ReferenceKind, &str)> + '_ {
        ReferenceKind::ALL.into_iter().flat_map(move |kind| {
            self.targets(kind)
                .iter()
                .map(move |target| (kind, target.as_str()))
        })
    }

    /// Faction stat deltas as `(faction, stat, delta)`, split on the first `.`.
    ///
    /// A key without a `.` names the faction with an empty stat.
    pub fn stat_deltas(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.faction_stats.iter().map(|(key, delta)| {
            let (faction, stat) = key.split_once('.').unwrap_or((key.as_str(), ""));
            (faction, stat, *delta)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quest_defaults_for_absent_fields() {
        let quest: Quest = serde_json::from_value(json!({ "id": "q1" })).unwrap();
        assert_eq!(quest.id, "q1");
        assert_eq!(quest.level, 0);
        assert!(quest.branches.is_empty());
        assert!(quest.characters.is_empty());
        assert!(quest.dialog().is_none());
    }

    #[test]
    fn test_null_fields_read_as_absent() {
        let quest: Quest = serde_json::from_value(json!({
            "id": "q2",
            "faction_id": "f1",
            "level": null,
            "location": null,
            "characters": null,
            "summary": null,
            "dialog_id": null,
            "branches": [
                { "id": "b1", "summary": null, "outcomes": null },
                {
                    "id": "b2",
                    "outcomes": {
                        "unlocks": ["q3"],
                        "triggers": null,
                        "faction_stats": null,
                        "character_extras": [{ "character": "mira", "text": null }]
                    }
                }
            ]
        }))
        .unwrap();
        assert_eq!(quest.level, 0);
        assert!(quest.location.is_empty());
        assert!(quest.characters.is_empty());
        assert!(quest.dialog().is_none());
        assert_eq!(quest.branches[0].outcomes, Outcomes::default());

        let outcomes = &quest.branches[1].outcomes;
        assert!(outcomes.triggers.is_empty());
        assert!(outcomes.faction_stats.is_empty());
        assert_eq!(outcomes.character_extras[0].text, "");
        assert_eq!(outcomes.references().count(), 1);
    }

    #[test]
    fn test_empty_dialog_id_is_absent() {
        let quest: Quest =
            serde_json::from_value(json!({ "id": "q1", "dialog_id": "" })).unwrap();
        assert!(quest.dialog().is_none());

        let quest = Quest::new("q2", "f1", 1).with_dialog("intro");
        assert_eq!(quest.dialog(), Some("intro"));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "id": "q1",
            "faction_id": "guild",
            "level": 2,
            "reward_xp": 150,
            "branches": [{ "id": "b1", "mood": "grim", "outcomes": { "spawn": "wolves" } }]
        });
        let quest: Quest = serde_json::from_value(raw).unwrap();
        assert_eq!(quest.extra.get("reward_xp"), Some(&json!(150)));
        assert_eq!(quest.branches[0].extra.get("mood"), Some(&json!("grim")));
        assert_eq!(quest.branches[0].outcomes.extra.get("spawn"), Some(&json!("wolves")));

        let back = serde_json::to_value(&quest).unwrap();
        assert_eq!(back["reward_xp"], json!(150));
        assert_eq!(back["branches"][0]["outcomes"]["spawn"], json!("wolves"));
    }

    #[test]
    fn test_references_in_field_order() {
        let outcomes = Outcomes::new().block("q9").unlock("q2").trigger("q3").unlock("q4");
        let refs: Vec<_> = outcomes.references().collect();
        assert_eq!(
            refs,
            vec![
                (ReferenceKind::Unlocks, "q2"),
                (ReferenceKind::Unlocks, "q4"),
                (ReferenceKind::Triggers, "q3"),
                (ReferenceKind::Blocks, "q9"),
            ]
        );
    }

    #[test]
    fn test_stat_deltas_split_on_first_dot() {
        let outcomes = Outcomes::new()
            .stat("guild.reputation", 5.0)
            .stat("crown.morale.high", -1.0)
            .stat("loner", 2.0);
        let deltas: Vec<_> = outcomes.stat_deltas().collect();
        assert!(deltas.contains(&("guild", "reputation", 5.0)));
        assert!(deltas.contains(&("crown", "morale.high", -1.0)));
        assert!(deltas.contains(&("loner", "", 2.0)));
    }

    #[test]
    fn test_integer_deltas_deserialize() {
        let outcomes: Outcomes =
            serde_json::from_value(json!({ "faction_stats": { "f1.rep": 3 } })).unwrap();
        assert_eq!(outcomes.faction_stats.get("f1.rep"), Some(&3.0));
    }

    #[test]
    fn test_branch_lookup() {
        let quest = Quest::new("q1", "f1", 1)
            .with_branch(Branch::new("peace"))
            .with_branch(Branch::new("war"));
        assert!(quest.branch("war").is_some());
        assert!(quest.branch("retreat").is_none());
        assert_eq!(quest.qualified_id(), "f1.q1");
    }
}
