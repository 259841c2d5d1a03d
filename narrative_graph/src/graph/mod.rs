//! Quest Graph - nodes and edges derived from quest records.
//!
//! One node per quest, one edge per outcome reference. Edges are never
//! de-duplicated and cycles are legal. An edge may point at a quest id that
//! does not exist; that is an authoring error for the validator to report.

mod chain;

pub use chain::*;

use quest_content::{Quest, ReferenceKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::QuestCatalog;

/// Kinds of causal links between quests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    Unlock,
    Trigger,
    Block,
}

impl From<ReferenceKind> for EdgeType {
    fn from(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Unlocks => EdgeType::Unlock,
            ReferenceKind::Triggers => EdgeType::Trigger,
            ReferenceKind::Blocks => EdgeType::Block,
        }
    }
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Unlock => "unlock",
            EdgeType::Trigger => "trigger",
            EdgeType::Block => "block",
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quest as seen by the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub faction_id: String,
    pub level: u32,
    pub summary: String,
    pub location: String,
    pub characters: Vec<String>,
}

impl From<&Quest> for GraphNode {
    fn from(quest: &Quest) -> Self {
        Self {
            id: quest.id.clone(),
            faction_id: quest.faction_id.clone(),
            level: quest.level,
            summary: quest.summary.clone(),
            location: quest.location.clone(),
            characters: quest.characters.clone(),
        }
    }
}

/// One outcome reference from a branch of `from` to quest `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    pub branch_id: String,
    /// True iff `to` exists and belongs to a different faction than `from`.
    pub cross_faction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuestGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl QuestGraph {
    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.to == id)
    }
}

/// Build the quest graph, optionally restricted to one faction.
///
/// The filter only decides which quests become nodes (and so whose branches
/// emit edges). Targets are always looked up in the full catalog, so
/// `cross_faction` is correct even for targets outside the filter. An empty
/// filter is the same as no filter.
pub fn build_graph(catalog: &QuestCatalog, faction_id: Option<&str>) -> QuestGraph {
    let faction_id = faction_id.filter(|f| !f.is_empty());
    let mut graph = QuestGraph::default();

    for quest in catalog.iter() {
        if faction_id.is_some_and(|f| quest.faction_id != f) {
            continue;
        }
        graph.nodes.push(GraphNode::from(quest));

        for branch in &quest.branches {
            for (kind, target) in branch.outcomes.references() {
                let cross_faction = catalog
                    .get(target)
                    .is_some_and(|t| t.faction_id != quest.faction_id);
                graph.edges.push(GraphEdge {
                    from: quest.id.clone(),
                    to: target.to_string(),
                    edge_type: kind.into(),
                    branch_id: branch.id.clone(),
                    cross_faction,
                });
            }
        }
    }

    graph
}
