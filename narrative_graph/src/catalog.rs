//! Quest catalog - the quest record set with an id index.

use quest_content::Quest;
use std::collections::{BTreeMap, HashMap};

/// All quest records in store order, indexed by quest id.
#[derive(Debug, Clone, Default)]
pub struct QuestCatalog {
    quests: Vec<Quest>,
    index: HashMap<String, usize>,
}

impl QuestCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from quests in the given order.
    pub fn from_quests(quests: impl IntoIterator<Item = Quest>) -> Self {
        let mut catalog = Self::new();
        for quest in quests {
            catalog.insert(quest);
        }
        catalog
    }

    /// Build a catalog from a store listing (ordered by record id).
    pub fn from_records(records: BTreeMap<String, Quest>) -> Self {
        Self::from_quests(records.into_values())
    }

    /// Add a quest. A quest with an id already present replaces it in place.
    pub fn insert(&mut self, quest: Quest) {
        match self.index.get(&quest.id) {
            Some(&position) => self.quests[position] = quest,
            None => {
                self.index.insert(quest.id.clone(), self.quests.len());
                self.quests.push(quest);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Quest> {
        self.index.get(id).map(|&position| &self.quests[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Quests in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    /// Quests owned by a faction, in catalog order.
    pub fn by_faction<'a>(&'a self, faction_id: &'a str) -> impl Iterator<Item = &'a Quest> + 'a {
        self.quests.iter().filter(move |q| q.faction_id == faction_id)
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_order() {
        let catalog = QuestCatalog::from_quests([
            Quest::new("b", "f1", 1),
            Quest::new("a", "f2", 1),
        ]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("a"));
        assert_eq!(catalog.get("b").map(|q| q.faction_id.as_str()), Some("f1"));

        let order: Vec<_> = catalog.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut catalog = QuestCatalog::from_quests([
            Quest::new("q1", "f1", 1),
            Quest::new("q2", "f1", 2),
        ]);
        catalog.insert(Quest::new("q1", "f2", 5));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().next().map(|q| q.level), Some(5));
    }

    #[test]
    fn test_by_faction() {
        let catalog = QuestCatalog::from_quests([
            Quest::new("q1", "guild", 1),
            Quest::new("q2", "crown", 1),
            Quest::new("q3", "guild", 2),
        ]);
        let guild: Vec<_> = catalog.by_faction("guild").map(|q| q.id.as_str()).collect();
        assert_eq!(guild, vec!["q1", "q3"]);
    }
}
