//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `loader/` - Module loaders (`module.toml` manifests)

pub mod loader;

pub use loader::{TomlModuleLoader, MANIFEST_FILE};
