//! ModuleLoader port
//!
//! Turns one module directory into a fully-typed `RawModule`. The on-disk
//! format is the adapter's business.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ModuleKind, RawModule};
use crate::domain::ResolveError;

pub trait ModuleLoader: Send + Sync {
    fn load(&self, dir: &Path, kind: ModuleKind) -> Result<LoadedModule, ModuleLoadError>;
}

/// A loaded record plus the declarations the loader dropped while building it.
#[derive(Debug)]
pub struct LoadedModule {
    pub module: RawModule,
    pub dropped: Vec<ResolveError>,
}

impl LoadedModule {
    pub fn new(module: RawModule) -> Self {
        Self {
            module,
            dropped: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModuleLoadError {
    #[error("module manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid module in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ResolveError,
    },
}

impl ModuleLoadError {
    pub fn path(&self) -> &Path {
        match self {
            ModuleLoadError::ManifestNotFound { path }
            | ModuleLoadError::Io { path, .. }
            | ModuleLoadError::Parse { path, .. }
            | ModuleLoadError::Invalid { path, .. } => path,
        }
    }
}
