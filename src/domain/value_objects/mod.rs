//! Domain Value Objects
//!
//! Immutable value types that name modules and describe their versions.

mod asset_type;
mod identifier;
mod version;

pub use asset_type::{AssetType, DependencyKind};
pub use identifier::{GenericIdentifier, Identifier};
pub use version::{Version, VersionRange};
