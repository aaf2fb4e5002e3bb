//! Domain Layer
//!
//! The resolver core: versioned identities, dependency constraints, module
//! records and the validate/compile state machine.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (Version, Identifier, AssetType)
//! - `entities/` - Module records (RawModule, Resource, CompiledPack)
//! - `services/` - Registries, the Resolver and per-asset validation
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Explicit context** - Registries are owned values passed to each phase
//! 3. **Ports & Adapters** - Module loading goes through a trait-defined port

pub mod entities;
mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use error::ResolveError;
