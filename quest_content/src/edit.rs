//! Typed edits for quest records.
//!
//! Editors describe a change as a value of [`QuestEdit`] instead of a dotted
//! field path, so every edit is checked against the schema at compile time.

use thiserror::Error;

use crate::{Branch, Outcomes, Quest};

/// Failures applying an edit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("quest has no branch at index {index} (branch count {len})")]
    BranchIndex { index: usize, len: usize },
}

/// A single change to a quest.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestEdit {
    Summary(String),
    Level(u32),
    Faction(String),
    Location(String),
    Dialog(Option<String>),
    Consequential(bool),
    Characters(Vec<String>),
    AddBranch(Branch),
    RemoveBranch(usize),
    Branch { index: usize, edit: BranchEdit },
}

/// A change to one branch of a quest.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchEdit {
    Id(String),
    Summary(String),
    Outcomes(Outcomes),
}

impl Branch {
    pub fn apply(&mut self, edit: BranchEdit) {
        match edit {
            BranchEdit::Id(id) => self.id = id,
            BranchEdit::Summary(summary) => self.summary = summary,
            BranchEdit::Outcomes(outcomes) => self.outcomes = outcomes,
        }
    }
}

impl Quest {
    pub fn apply(&mut self, edit: QuestEdit) -> Result<(), EditError> {
        match edit {
            QuestEdit::Summary(summary) => self.summary = summary,
            QuestEdit::Level(level) => self.level = level,
            QuestEdit::Faction(faction_id) => self.faction_id = faction_id,
            QuestEdit::Location(location) => self.location = location,
            QuestEdit::Dialog(dialog_id) => self.dialog_id = dialog_id,
            QuestEdit::Consequential(flag) => self.consequential = flag,
            QuestEdit::Characters(characters) => self.characters = characters,
            QuestEdit::AddBranch(branch) => self.branches.push(branch),
            QuestEdit::RemoveBranch(index) => {
                self.check_branch_index(index)?;
                self.branches.remove(index);
            }
            QuestEdit::Branch { index, edit } => {
                self.check_branch_index(index)?;
                self.branches[index].apply(edit);
            }
        }
        Ok(())
    }

    fn check_branch_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.branches.len() {
            Ok(())
        } else {
            Err(EditError::BranchIndex {
                index,
                len: self.branches.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_edits() {
        let mut quest = Quest::new("q1", "guild", 1);
        quest.apply(QuestEdit::Summary("Find the ledger".into())).unwrap();
        quest.apply(QuestEdit::Level(3)).unwrap();
        quest.apply(QuestEdit::Dialog(Some("ledger_talk".into()))).unwrap();

        assert_eq!(quest.summary, "Find the ledger");
        assert_eq!(quest.level, 3);
        assert_eq!(quest.dialog(), Some("ledger_talk"));
    }

    #[test]
    fn test_branch_edits() {
        let mut quest = Quest::new("q1", "guild", 1).with_branch(Branch::new("b1"));
        quest
            .apply(QuestEdit::Branch {
                index: 0,
                edit: BranchEdit::Outcomes(Outcomes::new().unlock("q2")),
            })
            .unwrap();
        assert_eq!(quest.branches[0].outcomes.unlocks, vec!["q2".to_string()]);

        quest.apply(QuestEdit::AddBranch(Branch::new("b2"))).unwrap();
        quest.apply(QuestEdit::RemoveBranch(0)).unwrap();
        assert_eq!(quest.branches.len(), 1);
        assert_eq!(quest.branches[0].id, "b2");
    }

    #[test]
    fn test_out_of_range_branch() {
        let mut quest = Quest::new("q1", "guild", 1);
        let err = quest
            .apply(QuestEdit::Branch {
                index: 2,
                edit: BranchEdit::Summary("x".into()),
            })
            .unwrap_err();
        assert_eq!(err, EditError::BranchIndex { index: 2, len: 0 });
    }
}
