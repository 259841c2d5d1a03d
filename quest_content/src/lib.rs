//! # Quest Content
//!
//! Typed records for quest-editor content and the storage they live in.
//! This crate owns the record schemas, the [`ContentAccessor`] seam used by the
//! analysis layer, the draft staging area and editor configuration. It does not
//! contain any analysis logic.

pub mod config;
pub mod drafts;
pub mod edit;
pub mod error;
pub mod records;
pub mod store;

pub use config::*;
pub use drafts::*;
pub use edit::*;
pub use error::*;
pub use records::*;
pub use store::*;
