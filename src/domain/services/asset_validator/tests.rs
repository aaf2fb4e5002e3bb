use super::*;
use crate::domain::value_objects::Identifier;

fn id(s: &str) -> Identifier {
    s.parse().unwrap()
}

fn generic(s: &str) -> GenericIdentifier {
    s.parse().unwrap()
}

fn dependency_pack(identifier: &str, assets: &[(AssetType, &str)]) -> Arc<CompiledPack> {
    let mut map = AssetMap::new();
    for (asset_type, asset) in assets {
        map.entry(*asset_type)
            .or_default()
            .insert(generic(asset), AssetDeclaration::new(*asset_type, generic(asset)));
    }
    Arc::new(CompiledPack::new(
        id(identifier),
        None,
        BTreeSet::new(),
        BTreeSet::new(),
        map,
        MissingAssets::new(),
    ))
}

fn kept(validation: &AssetValidation, asset_type: AssetType, asset: &str) -> bool {
    validation
        .assets
        .get(&asset_type)
        .is_some_and(|by_id| by_id.contains_key(&generic(asset)))
}

#[test]
fn local_chain_validates_in_any_order() {
    let module = RawModule::pack(id("core:base@1.0.0"))
        .with_asset(
            AssetDeclaration::new(AssetType::Entity, generic("core:a_golem"))
                .with_reference(AssetType::Model, generic("core:z_golem_model")),
        )
        .with_asset(
            AssetDeclaration::new(AssetType::Model, generic("core:z_golem_model"))
                .with_reference(AssetType::Animation, generic("core:walk")),
        )
        .with_asset(AssetDeclaration::new(AssetType::Animation, generic("core:walk")));

    let validation = validate_assets(&module, &[]);

    assert!(validation.errors.is_empty());
    assert!(validation.missing.is_empty());
    assert!(kept(&validation, AssetType::Entity, "core:a_golem"));
    assert!(kept(&validation, AssetType::Model, "core:z_golem_model"));
    assert!(kept(&validation, AssetType::Animation, "core:walk"));
}

#[test]
fn reference_supplied_by_dependency_is_deferred() {
    let module = RawModule::pack(id("core:addon@1.0.0")).with_asset(
        AssetDeclaration::new(AssetType::Item, generic("core:gem_sword"))
            .with_reference(AssetType::Model, generic("core:sword_model")),
    );
    let base = dependency_pack("core:base@1.0.0", &[(AssetType::Model, "core:sword_model")]);

    let validation = validate_assets(&module, &[base]);

    assert!(validation.errors.is_empty());
    assert!(kept(&validation, AssetType::Item, "core:gem_sword"));
    assert_eq!(
        validation.missing[&AssetType::Model],
        BTreeSet::from([generic("core:sword_model")])
    );
}

#[test]
fn local_definition_wins_over_dependency() {
    let module = RawModule::pack(id("core:addon@1.0.0"))
        .with_asset(
            AssetDeclaration::new(AssetType::Item, generic("core:gem_sword"))
                .with_reference(AssetType::Model, generic("core:sword_model")),
        )
        .with_asset(AssetDeclaration::new(AssetType::Model, generic("core:sword_model")));
    let base = dependency_pack("core:base@1.0.0", &[(AssetType::Model, "core:sword_model")]);

    let validation = validate_assets(&module, &[base]);

    assert!(validation.errors.is_empty());
    assert!(validation.missing.is_empty());
}

#[test]
fn undefined_reference_drops_only_that_asset() {
    let module = RawModule::pack(id("core:base@1.0.0"))
        .with_asset(
            AssetDeclaration::new(AssetType::Recipe, generic("core:broken"))
                .with_reference(AssetType::Item, generic("core:nowhere")),
        )
        .with_asset(AssetDeclaration::new(AssetType::Item, generic("core:fine")));

    let validation = validate_assets(&module, &[]);

    assert!(!kept(&validation, AssetType::Recipe, "core:broken"));
    assert!(kept(&validation, AssetType::Item, "core:fine"));
    assert_eq!(validation.errors.len(), 1);
    assert!(matches!(
        &validation.errors[0],
        ResolveError::ReferenceWithoutDefinition { asset, .. } if *asset == generic("core:broken")
    ));
}

#[test]
fn failure_propagates_to_referencing_assets() {
    let module = RawModule::pack(id("core:base@1.0.0"))
        .with_asset(
            AssetDeclaration::new(AssetType::LootTable, generic("core:chest"))
                .with_reference(AssetType::Item, generic("core:bad_item")),
        )
        .with_asset(
            AssetDeclaration::new(AssetType::Item, generic("core:bad_item"))
                .with_reference(AssetType::Model, generic("core:absent")),
        );

    let validation = validate_assets(&module, &[]);

    assert!(validation.assets.is_empty());
    assert_eq!(validation.errors.len(), 2);
}

#[test]
fn reference_type_must_match() {
    let module = RawModule::pack(id("core:base@1.0.0"))
        .with_asset(
            AssetDeclaration::new(AssetType::Item, generic("core:stone"))
                .with_reference(AssetType::Model, generic("core:stone")),
        );

    let validation = validate_assets(&module, &[]);

    assert!(validation.assets.is_empty());
    assert!(matches!(
        validation.errors[0],
        ResolveError::ReferenceWithoutDefinition { .. }
    ));
}

#[test]
fn reference_cycle_is_reported() {
    let module = RawModule::pack(id("core:base@1.0.0"))
        .with_asset(
            AssetDeclaration::new(AssetType::Interface, generic("core:menu"))
                .with_reference(AssetType::Layout, generic("core:menu_layout")),
        )
        .with_asset(
            AssetDeclaration::new(AssetType::Layout, generic("core:menu_layout"))
                .with_reference(AssetType::Interface, generic("core:menu")),
        );

    let validation = validate_assets(&module, &[]);

    assert!(validation.assets.is_empty());
    assert!(validation
        .errors
        .iter()
        .any(|e| matches!(e, ResolveError::CircularReference { .. })));
}

#[test]
fn long_chain_does_not_recurse() {
    let mut module = RawModule::pack(id("core:deep@1.0.0"));
    let depth = 20_000;
    for i in 0..depth {
        let declaration = AssetDeclaration::new(AssetType::Element, generic(&format!("core:e{i}")));
        let declaration = if i + 1 < depth {
            declaration.with_reference(AssetType::Element, generic(&format!("core:e{}", i + 1)))
        } else {
            declaration
        };
        module = module.with_asset(declaration);
    }

    let validation = validate_assets(&module, &[]);

    assert!(validation.errors.is_empty());
    assert_eq!(validation.assets[&AssetType::Element].len(), depth);
}
