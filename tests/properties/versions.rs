//! Property tests for versions, ranges and constraint predicates.

use proptest::prelude::*;

use packsmith::{DependencyConstraint, DependencyKind, GenericIdentifier, Identifier, Version, VersionRange};

fn version() -> impl Strategy<Value = Version> {
    (0u32..4, 0u32..4, 0u32..4).prop_map(|(major, minor, patch)| Version::new(major, minor, patch))
}

fn target() -> GenericIdentifier {
    "core:base".parse().unwrap()
}

fn constraint() -> impl Strategy<Value = DependencyConstraint> {
    prop_oneof![
        version().prop_map(|v| DependencyConstraint::exact(DependencyKind::Asset, target().at(v))),
        (version(), proptest::option::of(version()))
            .prop_filter("min < max", |(min, max)| max.is_none_or(|max| *min < max))
            .prop_map(|(min, max)| {
                DependencyConstraint::range(DependencyKind::Asset, target(), min, max).unwrap()
            }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `in_range` is exactly `min <= v < max`, unbounded when max is absent.
    #[test]
    fn property_in_range_is_half_open(v in version(), min in version(), max in proptest::option::of(version())) {
        let expected = min <= v && max.is_none_or(|max| v < max);
        prop_assert_eq!(v.in_range(&min, max.as_ref()), expected);
    }

    /// PROPERTY: range construction fails exactly when an upper bound is not above the lower.
    #[test]
    fn property_range_construction(min in version(), max in version()) {
        prop_assert_eq!(VersionRange::new(min, Some(max)).is_ok(), min < max);
        prop_assert!(VersionRange::new(min, None).is_ok());
    }

    /// PROPERTY: Display output parses back to the same version.
    #[test]
    fn property_version_display_parses_back(major in any::<u32>(), minor in any::<u32>(), patch in any::<u32>()) {
        let v = Version::new(major, minor, patch);
        prop_assert_eq!(v.to_string().parse::<Version>().unwrap(), v);
    }

    /// PROPERTY: a constraint below `v` admits nothing at or above `v`.
    #[test]
    fn property_is_below_excludes_everything_above(c in constraint(), v in version(), probe in version()) {
        if c.is_below(&v) && probe >= v {
            prop_assert!(!c.overlaps(&Identifier::new(target(), probe)));
        }
    }

    /// PROPERTY: constraint overlap is symmetric and agrees with a shared witness.
    #[test]
    fn property_constraint_overlap_symmetric(a in constraint(), b in constraint()) {
        prop_assert_eq!(a.overlaps_constraint(&b, false), b.overlaps_constraint(&a, false));

        let witness = (0u32..5).flat_map(|x| (0u32..5).flat_map(move |y| (0u32..5).map(move |z| Version::new(x, y, z))))
            .map(|v| Identifier::new(target(), v))
            .any(|id| a.overlaps(&id) && b.overlaps(&id));
        if witness {
            prop_assert!(a.overlaps_constraint(&b, false));
        }
    }
}
