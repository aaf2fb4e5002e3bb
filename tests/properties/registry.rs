//! Property tests for module registration buckets.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use packsmith::domain::services::ModuleRegistry;
use packsmith::{Identifier, RawModule, ResolveError, Version};

fn identifier() -> impl Strategy<Value = Identifier> {
    (
        prop_oneof![Just("core"), Just("user"), Just("mods")],
        prop_oneof![Just("base"), Just("addon"), Just("extra")],
        0u32..3,
        0u32..3,
    )
        .prop_map(|(namespace, name, major, minor)| {
            Identifier::parse(&format!("{namespace}:{name}"), Version::new(major, minor, 0)).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every generic bucket holds exactly the exact identifiers
    /// registered under it, and duplicates are rejected without replacing.
    #[test]
    fn property_buckets_match_registrations(ids in proptest::collection::vec(identifier(), 0..24)) {
        let mut registry = ModuleRegistry::new();
        let mut expected: BTreeMap<_, BTreeSet<Identifier>> = BTreeMap::new();

        for id in &ids {
            let fresh = expected.entry(id.to_generic()).or_default().insert(id.clone());
            let result = registry.register(RawModule::pack(id.clone()));
            if fresh {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(ResolveError::DuplicateIdentifier { identifier: id.clone() }));
            }
        }

        for (generic, exact) in &expected {
            let bucket: BTreeSet<Identifier> = registry.packs_of(generic).cloned().collect();
            prop_assert_eq!(&bucket, exact);
            for id in exact {
                prop_assert_eq!(registry.pack_of(id).map(RawModule::identifier), Some(id));
            }
        }
        prop_assert_eq!(registry.len(), expected.values().map(BTreeSet::len).sum::<usize>());
    }
}
