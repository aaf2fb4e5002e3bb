//! Domain Services
//!
//! Registries and the resolution passes that operate on them. No I/O: module
//! records come in through `Resolver::register`, results go out through the
//! `ContentRegistry` and a `ResolutionReport`.

pub mod asset_validator;
mod content_registry;
mod module_registry;
mod report;
mod resolver;

pub use asset_validator::{validate_assets, AssetValidation};
pub use content_registry::ContentRegistry;
pub use module_registry::ModuleRegistry;
pub use report::{Diagnostic, Phase, ResolutionReport};
pub use resolver::Resolver;
