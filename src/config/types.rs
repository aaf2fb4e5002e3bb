//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::{ContentRoot, RootOrigin};
use crate::error::PacksmithResult;

use super::loader::{self, ConfigWarning};

/// Content root locations, one per origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootsConfig {
    #[serde(default = "default_builtin_root")]
    pub builtin: Option<PathBuf>,

    #[serde(default = "default_user_root")]
    pub user: Option<PathBuf>,

    #[serde(default = "default_cache_root")]
    pub cache: Option<PathBuf>,
}

impl Default for RootsConfig {
    fn default() -> Self {
        Self {
            builtin: default_builtin_root(),
            user: default_user_root(),
            cache: default_cache_root(),
        }
    }
}

fn default_builtin_root() -> Option<PathBuf> {
    Some(PathBuf::from("content"))
}

fn default_user_root() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("packsmith"))
}

fn default_cache_root() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("packsmith").join("modules"))
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `packsmith=debug`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub roots: RootsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PacksmithResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> PacksmithResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load from an explicit file, `./packsmith.toml`, the user config dir, or
    /// defaults, then apply environment overrides.
    pub fn load_or_default(explicit: Option<&Path>) -> PacksmithResult<(Self, Vec<ConfigWarning>)> {
        loader::load_or_default(explicit)
    }

    /// Apply environment variable overrides (PACKSMITH_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_overrides(self, |key| std::env::var(key).ok())
    }

    /// Configured roots in processing order, with `~` expanded.
    pub fn content_roots(&self) -> Vec<ContentRoot> {
        [
            (RootOrigin::BuiltIn, &self.roots.builtin),
            (RootOrigin::User, &self.roots.user),
            (RootOrigin::Cache, &self.roots.cache),
        ]
        .into_iter()
        .filter_map(|(origin, path)| {
            path.as_deref()
                .map(|path| ContentRoot::new(origin, loader::expand_home(path)))
        })
        .collect()
    }
}
