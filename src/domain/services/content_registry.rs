//! Content registry
//!
//! Published compiled packs and resources, queried by exact or generic
//! identity. Insertion is first-write-wins; later collisions are ignored here
//! because duplicates are already rejected at module registration.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::domain::entities::{CompiledPack, DependencyConstraint, Resource};
use crate::domain::value_objects::{GenericIdentifier, Identifier};

type Buckets<T> = BTreeMap<GenericIdentifier, BTreeMap<Identifier, Arc<T>>>;

#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    packs: Buckets<CompiledPack>,
    resources: Buckets<Resource>,
}

fn insert_if_absent<T>(buckets: &mut Buckets<T>, identifier: &Identifier, value: T) -> bool {
    let bucket = buckets.entry(identifier.to_generic()).or_default();
    if bucket.contains_key(identifier) {
        return false;
    }
    bucket.insert(identifier.clone(), Arc::new(value));
    true
}

fn bucket_of<'a, T>(
    buckets: &'a Buckets<T>,
    generic: &GenericIdentifier,
) -> impl Iterator<Item = &'a Arc<T>> + 'a {
    buckets.get(generic).into_iter().flat_map(BTreeMap::values)
}

fn overlapping<T>(buckets: &Buckets<T>, constraint: &DependencyConstraint) -> BTreeSet<Identifier> {
    buckets
        .get(constraint.target())
        .map(|bucket| constraint.overlapping(bucket.keys()))
        .unwrap_or_default()
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when a pack with the same identifier is already published.
    pub fn insert_pack(&mut self, pack: CompiledPack) -> bool {
        let identifier = pack.identifier().clone();
        insert_if_absent(&mut self.packs, &identifier, pack)
    }

    /// Returns false when a resource with the same identifier is already published.
    pub fn insert_resource(&mut self, resource: Resource) -> bool {
        let identifier = resource.identifier().clone();
        insert_if_absent(&mut self.resources, &identifier, resource)
    }

    pub fn pack(&self, identifier: &Identifier) -> Option<&Arc<CompiledPack>> {
        self.packs.get(identifier.generic())?.get(identifier)
    }

    /// Every compiled version of one generic identity, ascending.
    pub fn packs<'a>(
        &'a self,
        generic: &GenericIdentifier,
    ) -> impl Iterator<Item = &'a Arc<CompiledPack>> + 'a {
        bucket_of(&self.packs, generic)
    }

    pub fn all_packs(&self) -> impl Iterator<Item = &Arc<CompiledPack>> {
        self.packs.values().flat_map(BTreeMap::values)
    }

    pub fn resource(&self, identifier: &Identifier) -> Option<&Arc<Resource>> {
        self.resources.get(identifier.generic())?.get(identifier)
    }

    pub fn resources<'a>(
        &'a self,
        generic: &GenericIdentifier,
    ) -> impl Iterator<Item = &'a Arc<Resource>> + 'a {
        bucket_of(&self.resources, generic)
    }

    pub fn all_resources(&self) -> impl Iterator<Item = &Arc<Resource>> {
        self.resources.values().flat_map(BTreeMap::values)
    }

    pub fn packs_overlapping(&self, constraint: &DependencyConstraint) -> BTreeSet<Identifier> {
        overlapping(&self.packs, constraint)
    }

    pub fn resources_overlapping(&self, constraint: &DependencyConstraint) -> BTreeSet<Identifier> {
        overlapping(&self.resources, constraint)
    }

    pub fn has_pack_overlapping(&self, constraint: &DependencyConstraint) -> bool {
        self.packs
            .get(constraint.target())
            .is_some_and(|bucket| bucket.keys().any(|id| constraint.overlaps(id)))
    }

    pub fn pack_count(&self) -> usize {
        self.packs.values().map(BTreeMap::len).sum()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.values().map(BTreeMap::len).sum()
    }
}
