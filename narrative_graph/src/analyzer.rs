//! Analyzer - the operations exposed to callers, each over a fresh snapshot.
//!
//! Every call re-reads the records it needs from the content store. Nothing
//! is cached between calls, so results always reflect the current content.

use quest_content::{Character, ContentAccessor, Dialog, Faction, Location, Quest};
use serde_json::Value;

use crate::{
    build_graph, character_arc, faction_chain, faction_connections, parse_completed,
    relationship_matrix, simulate, validate_chain, validate_references, AnalysisResult,
    CharacterArc, ChainReport, CompletedBranch, ContentSnapshot, FactionChain,
    FactionConnections, QuestCatalog, QuestGraph, ReferenceReport, RelationshipMatrix, WorldState,
};

/// Runs analysis operations against a content store.
pub struct QuestAnalyzer<'a, A> {
    store: &'a A,
}

impl<'a, A: ContentAccessor> QuestAnalyzer<'a, A> {
    pub fn new(store: &'a A) -> Self {
        Self { store }
    }

    fn catalog(&self) -> AnalysisResult<QuestCatalog> {
        let catalog = QuestCatalog::from_records(self.store.read_all::<Quest>()?);
        tracing::debug!(quests = catalog.len(), "Loaded quest snapshot");
        Ok(catalog)
    }

    pub fn build_graph(&self, faction_id: Option<&str>) -> AnalysisResult<QuestGraph> {
        let graph = build_graph(&self.catalog()?, faction_id);
        tracing::debug!(
            faction_id = faction_id.unwrap_or("*"),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Built quest graph"
        );
        Ok(graph)
    }

    pub fn faction_chain(&self, faction_id: &str) -> AnalysisResult<FactionChain> {
        Ok(faction_chain(&self.catalog()?, faction_id))
    }

    pub fn validate_references(&self) -> AnalysisResult<ReferenceReport> {
        let snapshot = ContentSnapshot {
            quests: self.store.read_all::<Quest>()?,
            characters: self.store.read_all::<Character>()?,
            locations: self.store.read_all::<Location>()?,
            factions: self.store.read_all::<Faction>()?,
            dialogs: self.store.read_all::<Dialog>()?,
        };
        let report = validate_references(&snapshot);
        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validated references"
        );
        Ok(report)
    }

    pub fn validate_chain(&self, faction_id: Option<&str>) -> AnalysisResult<ChainReport> {
        let report = validate_chain(&self.catalog()?, faction_id);
        tracing::debug!(
            faction_id = faction_id.unwrap_or("*"),
            valid = report.valid,
            issues = report.issues.len(),
            "Validated quest chain"
        );
        Ok(report)
    }

    pub fn simulate(&self, completed: &[CompletedBranch]) -> AnalysisResult<WorldState> {
        let state = simulate(&self.catalog()?, completed);
        tracing::debug!(steps = completed.len(), "Simulated world state");
        Ok(state)
    }

    /// Like [`simulate`](Self::simulate), for an untyped request body.
    pub fn simulate_value(&self, completed: &Value) -> AnalysisResult<WorldState> {
        let completed = parse_completed(completed)?;
        self.simulate(&completed)
    }

    pub fn connections(&self, faction_a: &str, faction_b: &str) -> AnalysisResult<FactionConnections> {
        Ok(faction_connections(&self.catalog()?, faction_a, faction_b))
    }

    pub fn relationship_matrix(&self) -> AnalysisResult<RelationshipMatrix> {
        let declared = self.store.faction_relationships()?;
        Ok(relationship_matrix(&self.catalog()?, declared))
    }

    pub fn arc(&self, character_id: &str) -> AnalysisResult<CharacterArc> {
        let character = self.store.read_one::<Character>(character_id)?;
        Ok(character_arc(&self.catalog()?, character_id, character))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalysisError;
    use quest_content::{Branch, ContentType, MemoryStore, Outcomes};
    use serde_json::json;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_all(&[
                Quest::new("q1", "f1", 1).with_branch(
                    Branch::new("b1").with_outcomes(Outcomes::new().unlock("q2").stat("f1.reputation", 5.0)),
                ),
                Quest::new("q2", "f2", 1).with_branch(
                    Branch::new("b1").with_outcomes(Outcomes::new().stat("f1.reputation", -2.0)),
                ),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_graph_reads_current_content() {
        let store = store();
        let analyzer = QuestAnalyzer::new(&store);
        assert_eq!(analyzer.build_graph(None).unwrap().edges.len(), 1);

        store
            .insert(&Quest::new("q3", "f1", 2).with_branch(
                Branch::new("b1").with_outcomes(Outcomes::new().unlock("q1")),
            ))
            .unwrap();
        assert_eq!(analyzer.build_graph(None).unwrap().edges.len(), 2);
    }

    #[test]
    fn test_null_fields_keep_quest_in_analysis() {
        let store = MemoryStore::new();
        store
            .write_value(
                ContentType::Quests,
                "q1",
                &json!({
                    "id": "q1",
                    "faction_id": "f1",
                    "level": 1,
                    "branches": [{ "id": "b1", "outcomes": { "unlocks": ["q2"] } }]
                }),
            )
            .unwrap();
        store
            .write_value(
                ContentType::Quests,
                "q2",
                &json!({
                    "id": "q2",
                    "faction_id": "f1",
                    "level": 2,
                    "summary": null,
                    "branches": [{ "id": "b1", "outcomes": { "triggers": null } }]
                }),
            )
            .unwrap();

        let analyzer = QuestAnalyzer::new(&store);
        let graph = analyzer.build_graph(None).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);

        let report = analyzer.validate_chain(None).unwrap();
        assert!(report.valid);
        assert!(report.errors().next().is_none());
    }

    #[test]
    fn test_simulate_value() {
        let store = store();
        let analyzer = QuestAnalyzer::new(&store);
        let state = analyzer
            .simulate_value(&json!([
                { "quest_id": "q1", "branch_id": "b1" },
                { "quest_id": "q2", "branch_id": "b1" }
            ]))
            .unwrap();
        assert_eq!(state.stat("f1", "reputation"), 3.0);

        let err = analyzer.simulate_value(&json!("q1")).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedInput(_)));
    }

    #[test]
    fn test_chain_sees_deleted_target() {
        let store = store();
        let analyzer = QuestAnalyzer::new(&store);
        assert!(analyzer.validate_chain(Some("f1")).unwrap().valid);

        store.delete(quest_content::ContentType::Quests, "q2").unwrap();
        let report = analyzer.validate_chain(Some("f1")).unwrap();
        assert!(!report.valid);
        assert_eq!(
            report.issues[0].message,
            "Quest \"q1\" branch \"b1\" unlocks non-existent quest \"q2\""
        );
    }

    #[test]
    fn test_arc_for_unknown_character() {
        let store = store();
        let arc = QuestAnalyzer::new(&store).arc("nobody").unwrap();
        assert!(arc.character.is_none());
        assert!(arc.appearances.is_empty());
    }
}
