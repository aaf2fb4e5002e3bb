//! Error types for Packsmith
//!
//! Uses `thiserror` for library errors. Resolution problems inside a batch are
//! never raised through these; they end up in a `ResolutionReport`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::ModuleLoadError;
use crate::domain::ResolveError;

/// Result type alias for Packsmith operations
pub type PacksmithResult<T> = Result<T, PacksmithError>;

/// Main error type for Packsmith operations
#[derive(Error, Debug)]
pub enum PacksmithError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file that does not deserialize
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Module directory that could not be turned into a record
    #[error(transparent)]
    Load(#[from] ModuleLoadError),

    /// Malformed identifier, version or constraint
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
