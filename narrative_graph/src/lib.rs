//! # Narrative Graph
//!
//! The analysis layer of the quest editor. Quests and their branch outcomes
//! are treated as a directed graph of narrative causality: quests unlock,
//! trigger or block other quests, move characters, shift faction stats and set
//! global variables.
//!
//! ## Core Components
//!
//! - **graph**: Derives nodes and edges from quest records, plus per-faction chains
//! - **validation**: Reference integrity over records and structural checks over the graph
//! - **simulator**: Replays completed branches into an aggregate world state
//! - **factions**: Shared entities and cross-faction coupling
//! - **arc**: A character's level-ordered appearances
//! - **analyzer**: Facade that pulls a fresh snapshot from a content store per call
//!
//! Every component is a pure function of the current records. Nothing derived
//! here is cached or persisted.

pub mod analyzer;
pub mod arc;
pub mod catalog;
pub mod error;
pub mod factions;
pub mod graph;
pub mod simulator;
pub mod validation;

pub use analyzer::*;
pub use arc::*;
pub use catalog::*;
pub use error::*;
pub use factions::*;
pub use graph::*;
pub use simulator::*;
pub use validation::*;
