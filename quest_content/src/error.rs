//! Error types for content access.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading or writing content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid record id '{0}'")]
    InvalidId(String),

    #[error("unknown content type '{0}'")]
    UnknownType(String),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type ContentResult<T> = Result<T, ContentError>;
