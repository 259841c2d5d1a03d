//! Faction connections - how two factions' storylines touch, and the global
//! cross-faction matrix.

use quest_content::{FactionRelationships, Quest, ReferenceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

use crate::QuestCatalog;

/// A quest reference that crosses between the two compared factions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub branch_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionConnections {
    pub faction_a: String,
    pub faction_b: String,
    pub shared_characters: Vec<String>,
    pub shared_locations: Vec<String>,
    /// Variable names, not values.
    pub shared_global_vars: Vec<String>,
    /// A -> B references followed by B -> A references.
    pub cross_references: Vec<CrossReference>,
}

/// One cross-faction reference inside a matrix bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossLink {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RelationshipMatrix {
    /// Factions that own at least one quest, in first-seen order.
    pub factions: Vec<String>,
    /// Declared relationships, passed through untouched.
    pub defined_relationships: Vec<Value>,
    /// `"<a>:<b>"` (sorted pair) -> every link between the two, either direction.
    pub computed_cross_links: BTreeMap<String, Vec<CrossLink>>,
}

/// Distinct items in first-seen order.
fn ordered_unique<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(*item)).collect()
}

/// Items of `left` (deduplicated, in order) that also appear in `right`.
fn intersect<'a>(
    left: impl IntoIterator<Item = &'a str>,
    right: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let right: HashSet<&str> = right.into_iter().collect();
    ordered_unique(left)
        .into_iter()
        .filter(|item| right.contains(item))
        .map(str::to_string)
        .collect()
}

fn characters<'a>(quests: &'a [&'a Quest]) -> impl Iterator<Item = &'a str> + 'a {
    quests
        .iter()
        .copied()
        .flat_map(|q| q.characters.iter().map(String::as_str))
}

// Quests without a location have nothing to share.
fn locations<'a>(quests: &'a [&'a Quest]) -> impl Iterator<Item = &'a str> + 'a {
    quests
        .iter()
        .copied()
        .map(|q| q.location.as_str())
        .filter(|l| !l.is_empty())
}

fn var_names<'a>(quests: &'a [&'a Quest]) -> impl Iterator<Item = &'a str> + 'a {
    quests
        .iter()
        .copied()
        .flat_map(|q| q.branches.iter())
        .flat_map(|b| b.outcomes.global_vars.keys())
        .map(String::as_str)
}

fn references_into(sources: &[&Quest], targets: &HashSet<&str>, out: &mut Vec<CrossReference>) {
    for quest in sources {
        for branch in &quest.branches {
            for (kind, target) in branch.outcomes.references() {
                if targets.contains(target) {
                    out.push(CrossReference {
                        from: quest.id.clone(),
                        to: target.to_string(),
                        kind,
                        branch_id: branch.id.clone(),
                    });
                }
            }
        }
    }
}

/// Compare two factions' quests for shared entities and mutual references.
pub fn faction_connections(catalog: &QuestCatalog, faction_a: &str, faction_b: &str) -> FactionConnections {
    let quests_a: Vec<&Quest> = catalog.by_faction(faction_a).collect();
    let quests_b: Vec<&Quest> = catalog.by_faction(faction_b).collect();

    let shared_characters = intersect(characters(&quests_a), characters(&quests_b));
    let shared_locations = intersect(locations(&quests_a), locations(&quests_b));
    let shared_global_vars = intersect(var_names(&quests_a), var_names(&quests_b));

    let ids_a: HashSet<&str> = quests_a.iter().map(|q| q.id.as_str()).collect();
    let ids_b: HashSet<&str> = quests_b.iter().map(|q| q.id.as_str()).collect();
    let mut cross_references = Vec::new();
    references_into(&quests_a, &ids_b, &mut cross_references);
    references_into(&quests_b, &ids_a, &mut cross_references);

    FactionConnections {
        faction_a: faction_a.to_string(),
        faction_b: faction_b.to_string(),
        shared_characters,
        shared_locations,
        shared_global_vars,
        cross_references,
    }
}

/// Undirected bucket key for a faction pair.
pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// Merge declared relationships with links computed from quest outcomes.
///
/// Every reference whose target exists under a different faction lands in the
/// bucket of the sorted faction pair, so direction is not preserved.
pub fn relationship_matrix(catalog: &QuestCatalog, declared: FactionRelationships) -> RelationshipMatrix {
    let factions = ordered_unique(
        catalog
            .iter()
            .map(|q| q.faction_id.as_str())
            .filter(|f| !f.is_empty()),
    )
    .into_iter()
    .map(str::to_string)
    .collect();

    let mut computed_cross_links: BTreeMap<String, Vec<CrossLink>> = BTreeMap::new();
    for quest in catalog.iter() {
        for branch in &quest.branches {
            for (kind, target_id) in branch.outcomes.references() {
                let Some(target) = catalog.get(target_id) else {
                    continue;
                };
                if target.faction_id == quest.faction_id {
                    continue;
                }
                computed_cross_links
                    .entry(pair_key(&quest.faction_id, &target.faction_id))
                    .or_default()
                    .push(CrossLink {
                        from: quest.id.clone(),
                        to: target_id.to_string(),
                        kind,
                    });
            }
        }
    }

    RelationshipMatrix {
        factions,
        defined_relationships: declared.relationships,
        computed_cross_links,
    }
}
