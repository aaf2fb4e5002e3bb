//! Raw (unvalidated) module records
//!
//! A `RawModule` is what the external loader hands over for each module
//! directory: identity, typed dependency constraints and, for packs, the
//! per-type asset declarations with their asset-to-asset references.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::DependencyConstraint;
use crate::domain::value_objects::{AssetType, DependencyKind, GenericIdentifier, Identifier};
use crate::domain::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Pack,
    Resource,
}

impl ModuleKind {
    /// Subdirectory of a content root holding modules of this kind.
    pub fn directory(&self) -> &'static str {
        match self {
            ModuleKind::Pack => "packs",
            ModuleKind::Resource => "resources",
        }
    }
}

/// Reference from one asset declaration to another asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetReference {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub identifier: GenericIdentifier,
}

impl AssetReference {
    pub fn new(asset_type: AssetType, identifier: GenericIdentifier) -> Self {
        Self {
            asset_type,
            identifier,
        }
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.asset_type, self.identifier)
    }
}

/// One declared asset. Only identity and outgoing references matter here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDeclaration {
    identifier: GenericIdentifier,
    asset_type: AssetType,
    references: Vec<AssetReference>,
    source: Option<PathBuf>,
}

impl AssetDeclaration {
    pub fn new(asset_type: AssetType, identifier: GenericIdentifier) -> Self {
        Self {
            identifier,
            asset_type,
            references: Vec::new(),
            source: None,
        }
    }

    pub fn with_reference(mut self, asset_type: AssetType, identifier: GenericIdentifier) -> Self {
        self.references
            .push(AssetReference::new(asset_type, identifier));
        self
    }

    pub fn with_references(mut self, references: Vec<AssetReference>) -> Self {
        self.references = references;
        self
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn identifier(&self) -> &GenericIdentifier {
        &self.identifier
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn references(&self) -> &[AssetReference] {
        &self.references
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }
}

pub type AssetMap = BTreeMap<AssetType, BTreeMap<GenericIdentifier, AssetDeclaration>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModule {
    identifier: Identifier,
    kind: ModuleKind,
    dependencies: BTreeMap<DependencyKind, Vec<DependencyConstraint>>,
    assets: AssetMap,
    root: Option<PathBuf>,
}

impl RawModule {
    pub fn new(identifier: Identifier, kind: ModuleKind) -> Self {
        Self {
            identifier,
            kind,
            dependencies: BTreeMap::new(),
            assets: BTreeMap::new(),
            root: None,
        }
    }

    pub fn pack(identifier: Identifier) -> Self {
        Self::new(identifier, ModuleKind::Pack)
    }

    pub fn resource(identifier: Identifier) -> Self {
        Self::new(identifier, ModuleKind::Resource)
    }

    /// Builder: add a dependency constraint under its own kind.
    pub fn with_dependency(mut self, dependency: DependencyConstraint) -> Self {
        self.dependencies
            .entry(dependency.kind())
            .or_default()
            .push(dependency);
        self
    }

    /// Builder: add an asset declaration, keeping the first on collision.
    pub fn with_asset(mut self, asset: AssetDeclaration) -> Self {
        let _ = self.insert_asset(asset);
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Add an asset declaration. A second declaration with the same type and
    /// identifier is rejected and the first one is kept.
    pub fn insert_asset(&mut self, asset: AssetDeclaration) -> Result<(), ResolveError> {
        let by_id = self.assets.entry(asset.asset_type()).or_default();
        if by_id.contains_key(asset.identifier()) {
            return Err(ResolveError::DuplicateAsset {
                pack: self.identifier.clone(),
                asset_type: asset.asset_type(),
                asset: asset.identifier().clone(),
            });
        }
        by_id.insert(asset.identifier().clone(), asset);
        Ok(())
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }

    pub fn dependencies(&self, kind: DependencyKind) -> &[DependencyConstraint] {
        self.dependencies
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn asset_dependencies(&self) -> &[DependencyConstraint] {
        self.dependencies(DependencyKind::Asset)
    }

    pub fn resource_dependencies(&self) -> &[DependencyConstraint] {
        self.dependencies(DependencyKind::Resource)
    }

    pub fn assets(&self) -> &AssetMap {
        &self.assets
    }

    pub fn asset_count(&self) -> usize {
        self.assets.values().map(BTreeMap::len).sum()
    }

    /// Declaration-level checks run before a module is registered:
    ///
    /// - resources carry neither dependencies nor assets
    /// - no two constraints of one kind target the same generic identity
    /// - a pack may only depend on strictly older builds of itself
    pub fn check_declarations(&self) -> Result<(), ResolveError> {
        if self.kind == ModuleKind::Resource {
            let has_dependencies = self.dependencies.values().any(|d| !d.is_empty());
            if has_dependencies || self.asset_count() > 0 {
                return Err(ResolveError::InvalidResource {
                    identifier: self.identifier.clone(),
                });
            }
            return Ok(());
        }

        for constraints in self.dependencies.values() {
            for (idx, dependency) in constraints.iter().enumerate() {
                if constraints[..idx]
                    .iter()
                    .any(|earlier| earlier.overlaps_constraint(dependency, true))
                {
                    return Err(ResolveError::DuplicateDependency {
                        module: self.identifier.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        for dependency in self.asset_dependencies() {
            if dependency.compatible(&self.identifier)
                && !dependency.is_below(self.identifier.version())
            {
                return Err(ResolveError::AmbiguousDependency {
                    module: self.identifier.clone(),
                    dependency: dependency.clone(),
                });
            }
        }

        Ok(())
    }
}
