//! Route file error types.

use std::path::PathBuf;

use crate::domain::InvalidStopId;

/// Errors that can occur while loading a route definition file.
///
/// Every variant is fatal to a run: without a trustworthy route list there
/// is nothing to process.
#[derive(Debug, thiserror::Error)]
pub enum RouteFileError {
    /// The file could not be read
    #[error("failed to read route file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid route JSON
    #[error("malformed route file: {0}")]
    Json(#[from] serde_json::Error),

    /// A stop key is not a usable identifier
    #[error("route {route}: {source}")]
    InvalidStopId {
        route: String,
        #[source]
        source: InvalidStopId,
    },

    /// The same stop id appears twice within one route
    #[error("route {route}: duplicate stop id {stop_id}")]
    DuplicateStop { route: String, stop_id: String },
}
