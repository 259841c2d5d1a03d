//! Structural checks over the quest graph.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::{build_graph, QuestCatalog};

/// Severity of a chain issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must fix: a broken reference.
    Error,
    /// Should review: isolation or pacing.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainIssue {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_id: Option<String>,
}

impl ChainIssue {
    fn error(message: String, quest_id: &str) -> Self {
        Self {
            severity: Severity::Error,
            message,
            quest_id: Some(quest_id.to_string()),
        }
    }

    fn warning(message: String, quest_id: Option<&str>) -> Self {
        Self {
            severity: Severity::Warning,
            message,
            quest_id: quest_id.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChainReport {
    /// False iff any issue is an error.
    pub valid: bool,
    pub issues: Vec<ChainIssue>,
}

impl ChainReport {
    fn from_issues(issues: Vec<ChainIssue>) -> Self {
        let valid = !issues.iter().any(|i| i.severity == Severity::Error);
        Self { valid, issues }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ChainIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ChainIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Validate the quest chain of one faction, or of every quest.
///
/// Issues come out in three passes: dangling edges (errors), isolated quests,
/// then level gaps. Isolation is judged against the scoped edge set and never
/// reported for a scope of a single quest.
pub fn validate_chain(catalog: &QuestCatalog, faction_id: Option<&str>) -> ChainReport {
    let universe = build_graph(catalog, None);
    let scope = build_graph(catalog, faction_id);

    let scope_ids = scope.node_ids();
    let universe_ids = universe.node_ids();
    let mut issues = Vec::new();

    for edge in &universe.edges {
        if scope_ids.contains(edge.from.as_str()) && !universe_ids.contains(edge.to.as_str()) {
            issues.push(ChainIssue::error(
                format!(
                    "Quest \"{}\" branch \"{}\" {}s non-existent quest \"{}\"",
                    edge.from, edge.branch_id, edge.edge_type, edge.to
                ),
                &edge.from,
            ));
        }
    }

    if scope.nodes.len() > 1 {
        let has_outgoing: HashSet<&str> = scope.edges.iter().map(|e| e.from.as_str()).collect();
        let has_incoming: HashSet<&str> = scope.edges.iter().map(|e| e.to.as_str()).collect();
        for node in &scope.nodes {
            let id = node.id.as_str();
            if !has_outgoing.contains(id) && !has_incoming.contains(id) {
                issues.push(ChainIssue::warning(
                    format!("Quest \"{id}\" is isolated (no connections)"),
                    Some(id),
                ));
            }
        }
    }

    let levels: BTreeSet<u32> = scope.nodes.iter().map(|n| n.level).collect();
    let levels: Vec<u32> = levels.into_iter().collect();
    for pair in levels.windows(2) {
        if pair[1] - pair[0] > 1 {
            issues.push(ChainIssue::warning(
                format!("Level gap between {} and {}", pair[0], pair[1]),
                None,
            ));
        }
    }

    ChainReport::from_issues(issues)
}
