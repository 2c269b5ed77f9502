//! Fatal configuration errors raised during startup.

use thiserror::Error;

/// Errors that abort initialization before any request can be served.
///
/// Everything past startup is total: `step`, `reset`, and the snapshot
/// accessors cannot fail, and activation recovers locally from unknown
/// names and unreadable weights (see [`crate::policy::provider`]).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read resource data from {path}: {source}")]
    DataUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed resource data: {0}")]
    DataMalformed(#[from] serde_json::Error),

    #[error("resource '{name}' has a non-finite or negative coordinate")]
    InvalidCoordinate { name: String },

    #[error("resource data is empty; the grid needs at least one point")]
    EmptyResourceSet,
}
