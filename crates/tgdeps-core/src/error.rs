//! Error types for tgdeps core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for tgdeps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading modules or building a graph.
///
/// Unresolvable dependency references and duplicate identities are not
/// errors; the graph builder drops or overwrites them and logs the fact.
#[derive(Debug, Error)]
pub enum Error {
    /// A module record carried an identity that is not a usable path.
    #[error("Invalid module identity {identity:?}: {reason}")]
    InvalidIdentity {
        /// The offending identity as received.
        identity: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration handed to the engine is invalid.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Discovering configuration files failed.
    #[error("Discovery failed under {root}: {message}")]
    Discovery {
        /// Directory that was being scanned.
        root: PathBuf,
        /// Error message from the filesystem layer.
        message: String,
    },
}
