//! World-state simulation - replay completed branches into one aggregate state.

use quest_content::Outcomes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{AnalysisError, AnalysisResult, QuestCatalog};

/// One step of a playthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedBranch {
    pub quest_id: String,
    pub branch_id: String,
}

impl CompletedBranch {
    pub fn new(quest_id: impl Into<String>, branch_id: impl Into<String>) -> Self {
        Self {
            quest_id: quest_id.into(),
            branch_id: branch_id.into(),
        }
    }
}

/// A character beat recorded during replay, tagged with its quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayedExtra {
    pub character: String,
    pub text: String,
    pub quest_id: String,
}

/// The cumulative effect of a replayed sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// Faction -> stat -> accumulated total.
    pub faction_stats: BTreeMap<String, BTreeMap<String, f64>>,

    /// Last write wins.
    pub global_vars: Map<String, Value>,

    /// Location -> last written state.
    pub location_states: BTreeMap<String, String>,

    /// Character -> last written location.
    pub character_locations: BTreeMap<String, String>,

    /// Append-only, in replay order.
    pub character_extras: Vec<ReplayedExtra>,

    /// First-appearance order, no duplicates, never shrinks.
    pub unlocked_quests: Vec<String>,
    pub blocked_quests: Vec<String>,
}

impl WorldState {
    /// Create a new empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one branch's outcomes into the state.
    ///
    /// Effects apply in a fixed order: stats, variables, extras, moves,
    /// location states, then unlocks and blocks.
    pub fn apply_outcomes(&mut self, quest_id: &str, outcomes: &Outcomes) {
        for (faction, stat, delta) in outcomes.stat_deltas() {
            *self
                .faction_stats
                .entry(faction.to_string())
                .or_default()
                .entry(stat.to_string())
                .or_insert(0.0) += delta;
        }

        for (name, value) in &outcomes.global_vars {
            self.global_vars.insert(name.clone(), value.clone());
        }

        self.character_extras
            .extend(outcomes.character_extras.iter().map(|extra| ReplayedExtra {
                character: extra.character.clone(),
                text: extra.text.clone(),
                quest_id: quest_id.to_string(),
            }));

        for (character, location) in &outcomes.move_character {
            self.character_locations
                .insert(character.clone(), location.clone());
        }

        for (location, state) in &outcomes.change_location_state {
            self.location_states.insert(location.clone(), state.clone());
        }

        push_unique(&mut self.unlocked_quests, &outcomes.unlocks);
        push_unique(&mut self.blocked_quests, &outcomes.blocks);
    }

    /// Current total of a faction stat; zero if never touched.
    pub fn stat(&self, faction_id: &str, stat: &str) -> f64 {
        self.faction_stats
            .get(faction_id)
            .and_then(|stats| stats.get(stat))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_unlocked(&self, quest_id: &str) -> bool {
        self.unlocked_quests.iter().any(|q| q == quest_id)
    }

    pub fn is_blocked(&self, quest_id: &str) -> bool {
        self.blocked_quests.iter().any(|q| q == quest_id)
    }

    pub fn character_location(&self, character_id: &str) -> Option<&str> {
        self.character_locations
            .get(character_id)
            .map(String::as_str)
    }
}

fn push_unique(target: &mut Vec<String>, ids: &[String]) {
    for id in ids {
        if !target.contains(id) {
            target.push(id.clone());
        }
    }
}

/// Replay `completed` in the given order.
///
/// Steps naming an unknown quest or branch are skipped; playthrough logs may
/// outlive the content they reference.
pub fn simulate(catalog: &QuestCatalog, completed: &[CompletedBranch]) -> WorldState {
    let mut state = WorldState::new();

    for step in completed {
        let Some(quest) = catalog.get(&step.quest_id) else {
            tracing::debug!(quest_id = %step.quest_id, "Skipping unknown quest in replay");
            continue;
        };
        let Some(branch) = quest.branch(&step.branch_id) else {
            tracing::debug!(
                quest_id = %step.quest_id,
                branch_id = %step.branch_id,
                "Skipping unknown branch in replay"
            );
            continue;
        };
        state.apply_outcomes(&quest.id, &branch.outcomes);
    }

    state
}

/// Decode a replay list from loosely typed input.
///
/// `null` is an empty replay. Anything other than an array of
/// `{quest_id, branch_id}` objects is rejected.
pub fn parse_completed(value: &Value) -> AnalysisResult<Vec<CompletedBranch>> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        other => {
            return Err(AnalysisError::MalformedInput(format!(
                "completed branches must be an array, got {}",
                json_kind(other)
            )))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            CompletedBranch::deserialize(entry).map_err(|e| {
                AnalysisError::MalformedInput(format!("completed branch #{index}: {e}"))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
