//! Domain Entities
//!
//! - `DependencyConstraint` - a requirement on another module
//! - `RawModule` - a pack or resource as handed over by the loader
//! - `Resource` - a registered, dependency-free module
//! - `CompiledPack` - the immutable result of compilation

mod compiled_pack;
mod constraint;
mod raw_module;
mod resource;

pub use compiled_pack::{CompiledPack, MissingAssets};
pub use constraint::{DependencyConstraint, VersionRequirement};
pub use raw_module::{AssetDeclaration, AssetMap, AssetReference, ModuleKind, RawModule};
pub use resource::Resource;
