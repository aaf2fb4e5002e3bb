//! Module loaders

mod toml_loader;

pub use toml_loader::{TomlModuleLoader, MANIFEST_FILE};
