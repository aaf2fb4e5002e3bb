//! Compiled pack entity
//!
//! The final, immutable form of a pack: validated asset declarations, the
//! resolved dependency identifier sets, and the asset references that were
//! deliberately deferred to dependency packs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::entities::{AssetDeclaration, AssetMap};
use crate::domain::value_objects::{AssetType, GenericIdentifier, Identifier};

pub type MissingAssets = BTreeMap<AssetType, BTreeSet<GenericIdentifier>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledPack {
    identifier: Identifier,
    root: Option<PathBuf>,
    asset_dependencies: BTreeSet<Identifier>,
    resources: BTreeSet<Identifier>,
    assets: AssetMap,
    missing_assets: MissingAssets,
}

impl CompiledPack {
    pub(crate) fn new(
        identifier: Identifier,
        root: Option<PathBuf>,
        asset_dependencies: BTreeSet<Identifier>,
        resources: BTreeSet<Identifier>,
        assets: AssetMap,
        missing_assets: MissingAssets,
    ) -> Self {
        Self {
            identifier,
            root,
            asset_dependencies,
            resources,
            assets,
            missing_assets,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }

    /// Compiled packs this pack's ASSET constraints resolved to.
    pub fn asset_dependencies(&self) -> &BTreeSet<Identifier> {
        &self.asset_dependencies
    }

    /// Resources this pack's RESOURCE constraints resolved to.
    pub fn resources(&self) -> &BTreeSet<Identifier> {
        &self.resources
    }

    pub fn assets(&self) -> &AssetMap {
        &self.assets
    }

    pub fn assets_of(&self, asset_type: AssetType) -> impl Iterator<Item = &AssetDeclaration> {
        self.assets
            .get(&asset_type)
            .into_iter()
            .flat_map(|by_id| by_id.values())
    }

    pub fn contains_asset(&self, asset_type: AssetType, identifier: &GenericIdentifier) -> bool {
        self.asset(asset_type, identifier).is_some()
    }

    pub fn asset(
        &self,
        asset_type: AssetType,
        identifier: &GenericIdentifier,
    ) -> Option<&AssetDeclaration> {
        self.assets.get(&asset_type)?.get(identifier)
    }

    pub fn asset_count(&self) -> usize {
        self.assets.values().map(BTreeMap::len).sum()
    }

    /// References left for dependency packs to supply, by referenced type.
    pub fn missing_assets(&self) -> &MissingAssets {
        &self.missing_assets
    }

    /// Deferred references that none of `active` supplies. Types with nothing
    /// left are omitted.
    pub fn leftover_missing<'a, I>(&self, active: I) -> MissingAssets
    where
        I: IntoIterator<Item = &'a CompiledPack>,
    {
        let mut remaining = self.missing_assets.clone();
        remaining.retain(|_, ids| !ids.is_empty());

        for pack in active {
            if remaining.is_empty() {
                break;
            }
            remaining.retain(|asset_type, ids| {
                ids.retain(|id| !pack.contains_asset(*asset_type, id));
                !ids.is_empty()
            });
        }
        remaining
    }

    /// True when `active` supplies every deferred reference.
    pub fn satisfies_missing<'a, I>(&self, active: I) -> bool
    where
        I: IntoIterator<Item = &'a CompiledPack>,
    {
        self.leftover_missing(active).is_empty()
    }
}
