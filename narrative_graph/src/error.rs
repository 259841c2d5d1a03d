//! Error types for analysis calls.

use quest_content::ContentError;
use thiserror::Error;

/// Failures surfaced to callers of the analysis operations.
///
/// Missing or malformed content is never an error here; it shows up as
/// validation issues or skipped replay steps instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("content store failure: {0}")]
    Content(#[from] ContentError),

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
