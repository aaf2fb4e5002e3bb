//! Configuration module for Packsmith
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (PACKSMITH_*)
//! 3. Config file (`--config`, `./packsmith.toml`, or the user config dir)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{expand_home, ConfigWarning, CONFIG_FILE};
pub use types::{Config, LoggingConfig, RootsConfig};
