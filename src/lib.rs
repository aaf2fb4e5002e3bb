//! Packsmith - dependency resolver and compiler for versioned game content
//!
//! Packsmith turns independently-authored, versioned packs and resources into
//! a consistent content graph: pack-level constraints are validated against
//! every other registered module, then packs are compiled dependency-first with
//! per-asset reference checks. Failures drop only the offending module or
//! asset and are collected into a `ResolutionReport`.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{ContentProcessor, ContentRoot, RootOrigin};
pub use config::Config;
pub use domain::entities::{
    AssetDeclaration, AssetReference, CompiledPack, DependencyConstraint, ModuleKind, RawModule,
    Resource,
};
pub use domain::services::{Diagnostic, Phase, ResolutionReport, Resolver};
pub use domain::value_objects::{
    AssetType, DependencyKind, GenericIdentifier, Identifier, Version, VersionRange,
};
pub use domain::ResolveError;
pub use error::{PacksmithError, PacksmithResult};
pub use infrastructure::TomlModuleLoader;
