//! Property tests for whole-batch resolution over random dependency graphs.

use std::collections::BTreeSet;

use proptest::prelude::*;

use packsmith::{DependencyConstraint, DependencyKind, Identifier, RawModule, Resolver, Version};

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn pack_id(index: usize, major: u32) -> Identifier {
    Identifier::parse(&format!("core:{}", NAMES[index]), Version::new(major, 0, 0)).unwrap()
}

/// Packs 0..6, each at version 1 or 2, with arbitrary exact edges (cycles included).
fn batch() -> impl Strategy<Value = Vec<RawModule>> {
    proptest::collection::vec(
        (1u32..3, proptest::collection::btree_set((0usize..6, 1u32..3), 0..3)),
        NAMES.len(),
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (major, edges))| {
                let mut module = RawModule::pack(pack_id(index, major));
                let mut targets = BTreeSet::new();
                for (target, target_major) in edges {
                    if target == index || !targets.insert(target) {
                        continue;
                    }
                    module = module.with_dependency(DependencyConstraint::exact(
                        DependencyKind::Asset,
                        pack_id(target, target_major),
                    ));
                }
                module
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: compilation terminates, leaves no queued work, and every
    /// registered pack is either compiled or named by a diagnostic.
    #[test]
    fn property_every_pack_is_accounted_for(modules in batch()) {
        let mut resolver = Resolver::new();
        let ids: Vec<Identifier> = modules.iter().map(|m| m.identifier().clone()).collect();
        for module in modules {
            resolver.register(module).unwrap();
        }

        let report = resolver.compile();

        prop_assert!(resolver.modules().pending().is_empty());
        prop_assert!(resolver.modules().validated().is_empty());
        for id in &ids {
            let compiled = resolver.content().pack(id).is_some();
            let diagnosed = report.diagnostics_for(&id.to_string()).next().is_some();
            prop_assert!(compiled != diagnosed, "{} compiled={} diagnosed={}", id, compiled, diagnosed);
        }
    }

    /// PROPERTY: a compiled pack only depends on compiled packs.
    #[test]
    fn property_dependencies_are_compiled(modules in batch()) {
        let mut resolver = Resolver::new();
        for module in modules {
            resolver.register(module).unwrap();
        }
        resolver.compile();

        for pack in resolver.content().all_packs() {
            for dependency in pack.asset_dependencies() {
                prop_assert!(resolver.content().pack(dependency).is_some());
            }
            prop_assert_eq!(
                pack.asset_dependencies().len(),
                resolver.modules().pack_of(pack.identifier()).unwrap().asset_dependencies().len()
            );
        }
    }
}
