//! Faction chains - the graph projected onto one faction, ordered by level.

use serde::{Deserialize, Serialize};

use super::{build_graph, GraphEdge, GraphNode};
use crate::QuestCatalog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionChain {
    pub faction_id: String,
    /// Ascending by level; equal levels keep catalog order.
    pub quests: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// The faction's quests sorted by level, with their outgoing edges.
///
/// Blocked quests are not removed from the chain.
pub fn faction_chain(catalog: &QuestCatalog, faction_id: &str) -> FactionChain {
    let graph = build_graph(catalog, Some(faction_id));
    let mut quests = graph.nodes;
    quests.sort_by_key(|node| node.level);

    FactionChain {
        faction_id: faction_id.to_string(),
        quests,
        edges: graph.edges,
    }
}
