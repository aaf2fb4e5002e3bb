//! Module registry
//!
//! Owns every raw module record seen by a scan, bucketed generic → exact
//! identity, plus the two work queues of the resolver:
//!
//! - `packs` / `resources` - all accepted records per kind, never shrink
//! - `pending` - packs awaiting validation
//! - `validated` - packs awaiting compilation
//!
//! Packs and resources are separate namespaces: a pack and a resource may
//! share an exact identifier.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::{DependencyConstraint, ModuleKind, RawModule};
use crate::domain::value_objects::{GenericIdentifier, Identifier};
use crate::domain::ResolveError;

type Buckets = BTreeMap<GenericIdentifier, BTreeMap<Identifier, RawModule>>;

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    packs: Buckets,
    resources: Buckets,
    pending: BTreeSet<Identifier>,
    validated: BTreeSet<Identifier>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn buckets(&self, kind: ModuleKind) -> &Buckets {
        match kind {
            ModuleKind::Pack => &self.packs,
            ModuleKind::Resource => &self.resources,
        }
    }

    /// Register a record. Packs are queued for validation.
    ///
    /// An exact-identifier collision within the same kind rejects the new
    /// record and keeps the original.
    pub fn register(&mut self, module: RawModule) -> Result<(), ResolveError> {
        let identifier = module.identifier().clone();
        let kind = module.kind();
        let buckets = match kind {
            ModuleKind::Pack => &mut self.packs,
            ModuleKind::Resource => &mut self.resources,
        };
        let bucket = buckets.entry(identifier.to_generic()).or_default();
        if bucket.contains_key(&identifier) {
            return Err(ResolveError::DuplicateIdentifier { identifier });
        }
        if kind == ModuleKind::Pack {
            self.pending.insert(identifier.clone());
        }
        bucket.insert(identifier, module);
        Ok(())
    }

    /// Exact pack identifiers registered under a generic identity, ascending.
    pub fn packs_of<'a>(
        &'a self,
        generic: &GenericIdentifier,
    ) -> impl Iterator<Item = &'a Identifier> + 'a {
        self.packs
            .get(generic)
            .into_iter()
            .flat_map(|bucket| bucket.keys())
    }

    pub fn pack_of(&self, identifier: &Identifier) -> Option<&RawModule> {
        self.packs.get(identifier.generic())?.get(identifier)
    }

    pub fn resource_of(&self, identifier: &Identifier) -> Option<&RawModule> {
        self.resources.get(identifier.generic())?.get(identifier)
    }

    pub fn contains(&self, kind: ModuleKind, identifier: &Identifier) -> bool {
        self.buckets(kind)
            .get(identifier.generic())
            .is_some_and(|bucket| bucket.contains_key(identifier))
    }

    pub fn modules(&self) -> impl Iterator<Item = &RawModule> {
        self.resources
            .values()
            .chain(self.packs.values())
            .flat_map(BTreeMap::values)
    }

    pub fn len(&self) -> usize {
        self.modules().count()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty() && self.resources.is_empty()
    }

    /// Registered modules of `kind` overlapping `constraint`.
    pub fn overlapping(&self, kind: ModuleKind, constraint: &DependencyConstraint) -> Vec<Identifier> {
        self.buckets(kind)
            .get(constraint.target())
            .map(|bucket| constraint.overlapping(bucket.keys()).into_iter().collect())
            .unwrap_or_default()
    }

    /// Registered modules of `kind` sharing the constraint's generic identity,
    /// whatever their version.
    pub fn near_misses(&self, kind: ModuleKind, constraint: &DependencyConstraint) -> Vec<Identifier> {
        self.buckets(kind)
            .get(constraint.target())
            .map(|bucket| bucket.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn pending(&self) -> &BTreeSet<Identifier> {
        &self.pending
    }

    pub fn is_pending(&self, identifier: &Identifier) -> bool {
        self.pending.contains(identifier)
    }

    pub fn take_next_pending(&mut self) -> Option<Identifier> {
        self.pending.pop_first()
    }

    pub fn remove_pending(&mut self, identifier: &Identifier) -> bool {
        self.pending.remove(identifier)
    }

    pub fn pending_overlapping(&self, constraint: &DependencyConstraint) -> Vec<Identifier> {
        constraint.overlapping(self.pending.iter()).into_iter().collect()
    }

    pub fn validated(&self) -> &BTreeSet<Identifier> {
        &self.validated
    }

    pub fn is_validated(&self, identifier: &Identifier) -> bool {
        self.validated.contains(identifier)
    }

    pub fn mark_validated(&mut self, identifier: Identifier) {
        self.validated.insert(identifier);
    }

    pub fn first_validated(&self) -> Option<&Identifier> {
        self.validated.first()
    }

    pub fn remove_validated(&mut self, identifier: &Identifier) -> bool {
        self.validated.remove(identifier)
    }

    pub fn validated_overlapping(&self, constraint: &DependencyConstraint) -> Vec<Identifier> {
        constraint.overlapping(self.validated.iter()).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    #[test]
    fn register_buckets_by_generic_identity() {
        let mut registry = ModuleRegistry::new();
        registry.register(RawModule::pack(id("core:base@2.0.0"))).unwrap();
        registry.register(RawModule::pack(id("core:base@1.0.0"))).unwrap();
        registry.register(RawModule::pack(id("core:other@1.0.0"))).unwrap();

        let bucket: Vec<_> = registry.packs_of(&"core:base".parse().unwrap()).cloned().collect();
        assert_eq!(bucket, vec![id("core:base@1.0.0"), id("core:base@2.0.0")]);
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.pack_of(&id("core:base@2.0.0")).unwrap().identifier(),
            &id("core:base@2.0.0")
        );
    }

    #[test]
    fn duplicate_keeps_original() {
        let mut registry = ModuleRegistry::new();
        registry
            .register(RawModule::pack(id("core:base@1.0.0")).with_root("/first"))
            .unwrap();
        let err = registry
            .register(RawModule::pack(id("core:base@1.0.0")).with_root("/second"))
            .unwrap_err();

        assert_eq!(
            err,
            ResolveError::DuplicateIdentifier {
                identifier: id("core:base@1.0.0")
            }
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry
                .pack_of(&id("core:base@1.0.0"))
                .unwrap()
                .root()
                .unwrap()
                .to_str(),
            Some("/first")
        );
    }

    #[test]
    fn only_packs_are_queued() {
        let mut registry = ModuleRegistry::new();
        registry.register(RawModule::pack(id("core:base@1.0.0"))).unwrap();
        registry
            .register(RawModule::resource(id("core:sounds@1.0.0")))
            .unwrap();

        assert_eq!(registry.pending().len(), 1);
        assert!(registry.is_pending(&id("core:base@1.0.0")));
        assert!(!registry.is_pending(&id("core:sounds@1.0.0")));
    }

    #[test]
    fn queues_move_independently() {
        let mut registry = ModuleRegistry::new();
        registry.register(RawModule::pack(id("core:a@1.0.0"))).unwrap();
        registry.register(RawModule::pack(id("core:b@1.0.0"))).unwrap();

        let next = registry.take_next_pending().unwrap();
        assert_eq!(next, id("core:a@1.0.0"));
        registry.mark_validated(next.clone());
        assert!(registry.is_validated(&next));
        assert!(!registry.is_pending(&next));

        assert!(registry.remove_validated(&next));
        assert!(registry.contains(ModuleKind::Pack, &next));
    }

    #[test]
    fn overlapping_filters_by_kind() {
        use crate::domain::value_objects::DependencyKind;

        let mut registry = ModuleRegistry::new();
        registry.register(RawModule::pack(id("core:x@1.0.0"))).unwrap();
        registry.register(RawModule::resource(id("core:x@2.0.0"))).unwrap();

        let any_x = DependencyConstraint::range(
            DependencyKind::Resource,
            "core:x".parse().unwrap(),
            crate::domain::value_objects::Version::MIN,
            None,
        )
        .unwrap();
        assert_eq!(
            registry.overlapping(ModuleKind::Resource, &any_x),
            vec![id("core:x@2.0.0")]
        );
        assert_eq!(
            registry.near_misses(ModuleKind::Pack, &any_x),
            vec![id("core:x@1.0.0")]
        );
    }

    #[test]
    fn pack_and_resource_may_share_identifier() {
        let mut registry = ModuleRegistry::new();
        registry
            .register(RawModule::resource(id("core:base@1.0.0")))
            .unwrap();
        registry.register(RawModule::pack(id("core:base@1.0.0"))).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.is_pending(&id("core:base@1.0.0")));
        assert!(registry.pack_of(&id("core:base@1.0.0")).is_some());
        assert!(registry.resource_of(&id("core:base@1.0.0")).is_some());
        assert_eq!(
            registry.register(RawModule::resource(id("core:base@1.0.0"))),
            Err(ResolveError::DuplicateIdentifier {
                identifier: id("core:base@1.0.0")
            })
        );
    }
}
