//! Resolution error taxonomy
//!
//! Every variant names the module (or asset) that gets dropped. Errors are
//! caught at the narrowest frame, logged, and recorded in the
//! `ResolutionReport`; they never abort a batch.

use crate::domain::entities::{AssetReference, DependencyConstraint};
use crate::domain::value_objects::{AssetType, GenericIdentifier, Identifier, Version};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid version '{value}' (expected major.minor.patch)")]
    InvalidVersion { value: String },

    #[error("maximum version {max} may not be lower than or equal to minimum version {min}")]
    InvalidVersionRange { min: Version, max: Version },

    #[error("invalid identifier '{value}' (expected namespace:name)")]
    InvalidIdentifier { value: String },

    #[error("duplicate identifier {identifier}: a module with this exact identifier is already registered")]
    DuplicateIdentifier { identifier: Identifier },

    #[error("duplicate {asset_type} asset {asset} in pack {pack}")]
    DuplicateAsset {
        pack: Identifier,
        asset_type: AssetType,
        asset: GenericIdentifier,
    },

    #[error("pack {module} declares multiple dependencies which reference {dependency}")]
    DuplicateDependency {
        module: Identifier,
        dependency: DependencyConstraint,
    },

    #[error("dependency {dependency} may create an ambiguous reference to the parent pack {module}")]
    AmbiguousDependency {
        module: Identifier,
        dependency: DependencyConstraint,
    },

    #[error("resource {identifier} may not declare dependencies or assets")]
    InvalidResource { identifier: Identifier },

    #[error("dependency {dependency} of {module} could not be resolved{}", near_miss_hint(.near_misses))]
    UnresolvedDependency {
        module: Identifier,
        dependency: DependencyConstraint,
        near_misses: Vec<Identifier>,
    },

    #[error("dependency {dependency} of {module} is circular: {}", chain_display(.chain))]
    CircularDependency {
        module: Identifier,
        dependency: DependencyConstraint,
        chain: Vec<Identifier>,
    },

    #[error("dependency {dependency} of {module} references subdependency {subdependency} which requires an older version of {module}")]
    VersionHierarchy {
        module: Identifier,
        dependency: DependencyConstraint,
        subdependency: DependencyConstraint,
    },

    #[error("{asset_type} {asset} in pack {pack} references {reference} which has no definition")]
    ReferenceWithoutDefinition {
        pack: Identifier,
        asset_type: AssetType,
        asset: GenericIdentifier,
        reference: AssetReference,
    },

    #[error("{asset_type} {asset} in pack {pack} references {reference} circularly")]
    CircularReference {
        pack: Identifier,
        asset_type: AssetType,
        asset: GenericIdentifier,
        reference: AssetReference,
    },
}

impl ResolveError {
    /// Stable machine-readable code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::InvalidVersion { .. }
            | ResolveError::InvalidVersionRange { .. }
            | ResolveError::InvalidIdentifier { .. }
            | ResolveError::InvalidResource { .. } => "config_error",
            ResolveError::DuplicateIdentifier { .. } | ResolveError::DuplicateAsset { .. } => {
                "duplicate_identifier"
            }
            ResolveError::DuplicateDependency { .. } => "duplicate_dependency",
            ResolveError::AmbiguousDependency { .. } => "ambiguous_dependency",
            ResolveError::UnresolvedDependency { .. } => "unresolved_dependency",
            ResolveError::CircularDependency { .. } => "circular_dependency",
            ResolveError::VersionHierarchy { .. } => "version_hierarchy",
            ResolveError::ReferenceWithoutDefinition { .. } => "reference_without_definition",
            ResolveError::CircularReference { .. } => "circular_reference",
        }
    }
}

fn near_miss_hint(near_misses: &[Identifier]) -> String {
    if near_misses.is_empty() {
        return String::new();
    }
    let available: Vec<String> = near_misses.iter().map(ToString::to_string).collect();
    format!(" (available versions: {})", available.join(", "))
}

fn chain_display(chain: &[Identifier]) -> String {
    let names: Vec<String> = chain.iter().map(ToString::to_string).collect();
    names.join(" -> ")
}
