//! Consistency validation.
//!
//! Two independent checks:
//! - **references**: cross-entity reference integrity over raw records
//! - **chain**: dangling edges, isolated quests and level gaps over the graph
//!
//! Both report problems as data. Nothing here rejects a write.

mod chain;
mod references;

pub use chain::*;
pub use references::*;
