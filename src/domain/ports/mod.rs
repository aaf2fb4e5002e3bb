//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod module_loader;

pub use module_loader::{LoadedModule, ModuleLoadError, ModuleLoader};
