//! Dependency constraint entity
//!
//! A declared requirement on another module: either one exact identifier or a
//! generic identifier plus a version range.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::domain::value_objects::{
    DependencyKind, GenericIdentifier, Identifier, Version, VersionRange,
};
use crate::domain::ResolveError;

/// Which versions of the target satisfy a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionRequirement {
    Exact(Version),
    Range(VersionRange),
}

impl VersionRequirement {
    pub fn admits(&self, version: &Version) -> bool {
        match self {
            VersionRequirement::Exact(exact) => exact == version,
            VersionRequirement::Range(range) => range.contains(version),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyConstraint {
    kind: DependencyKind,
    target: GenericIdentifier,
    requirement: VersionRequirement,
}

impl DependencyConstraint {
    /// Constraint on one exact identifier.
    pub fn exact(kind: DependencyKind, identifier: Identifier) -> Self {
        let version = *identifier.version();
        Self {
            kind,
            target: identifier.to_generic(),
            requirement: VersionRequirement::Exact(version),
        }
    }

    /// Constraint on `[min, max)`; fails when `max` is present and `min >= max`.
    pub fn range(
        kind: DependencyKind,
        target: GenericIdentifier,
        min: Version,
        max: Option<Version>,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            kind,
            target,
            requirement: VersionRequirement::Range(VersionRange::new(min, max)?),
        })
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn target(&self) -> &GenericIdentifier {
        &self.target
    }

    pub fn requirement(&self) -> &VersionRequirement {
        &self.requirement
    }

    /// Generic identity match only.
    pub fn compatible(&self, identifier: &Identifier) -> bool {
        self.target == *identifier.generic()
    }

    /// Compatible and the version satisfies the requirement.
    pub fn overlaps(&self, identifier: &Identifier) -> bool {
        self.compatible(identifier) && self.requirement.admits(identifier.version())
    }

    /// Subset of `identifiers` this constraint overlaps.
    pub fn overlapping<'a, I>(&self, identifiers: I) -> BTreeSet<Identifier>
    where
        I: IntoIterator<Item = &'a Identifier>,
    {
        identifiers
            .into_iter()
            .filter(|id| self.overlaps(id))
            .cloned()
            .collect()
    }

    /// True when every admissible version lies strictly below `version`.
    pub fn is_below(&self, version: &Version) -> bool {
        match &self.requirement {
            VersionRequirement::Exact(exact) => exact < version,
            VersionRequirement::Range(range) => range.is_below(version),
        }
    }

    /// Whether two constraints can be satisfied by a common identifier.
    ///
    /// With `ignore_versions` only the generic targets are compared.
    pub fn overlaps_constraint(&self, other: &DependencyConstraint, ignore_versions: bool) -> bool {
        if self.target != other.target {
            return false;
        }
        if ignore_versions {
            return true;
        }
        match (&self.requirement, &other.requirement) {
            (VersionRequirement::Exact(a), VersionRequirement::Exact(b)) => a == b,
            (VersionRequirement::Exact(v), VersionRequirement::Range(r))
            | (VersionRequirement::Range(r), VersionRequirement::Exact(v)) => r.contains(v),
            (VersionRequirement::Range(a), VersionRequirement::Range(b)) => a.intersects(b),
        }
    }
}

impl fmt::Display for DependencyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.requirement {
            VersionRequirement::Exact(version) => write!(f, "{}@{}", self.target, version),
            VersionRequirement::Range(range) => match range.max() {
                Some(max) => write!(
                    f,
                    "{} with version range {} to {}",
                    self.target,
                    range.min(),
                    max
                ),
                None => write!(f, "{} with minimum version {}", self.target, range.min()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u32, minor: u32, patch: u32) -> Version {
        Version::new(major, minor, patch)
    }

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    fn generic(s: &str) -> GenericIdentifier {
        s.parse().unwrap()
    }

    fn range(target: &str, min: Version, max: Option<Version>) -> DependencyConstraint {
        DependencyConstraint::range(DependencyKind::Asset, generic(target), min, max).unwrap()
    }

    #[test]
    fn construction_rejects_inverted_range() {
        let err =
            DependencyConstraint::range(DependencyKind::Asset, generic("core:base"), v(2, 0, 0), Some(v(1, 0, 0)))
                .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidVersionRange { .. }));
    }

    #[test]
    fn exact_overlaps_only_same_version() {
        let c = DependencyConstraint::exact(DependencyKind::Asset, id("core:base@1.5.0"));
        assert!(c.overlaps(&id("core:base@1.5.0")));
        assert!(!c.overlaps(&id("core:base@1.5.1")));
        assert!(c.compatible(&id("core:base@9.0.0")));
        assert!(!c.compatible(&id("core:other@1.5.0")));
    }

    #[test]
    fn range_overlaps_half_open_interval() {
        let c = range("core:base", v(1, 0, 0), Some(v(2, 0, 0)));
        assert!(c.overlaps(&id("core:base@1.0.0")));
        assert!(c.overlaps(&id("core:base@1.9.9")));
        assert!(!c.overlaps(&id("core:base@2.0.0")));
        assert!(!c.overlaps(&id("core:other@1.5.0")));
    }

    #[test]
    fn overlapping_filters_set() {
        let c = range("core:base", v(1, 0, 0), None);
        let ids = [
            id("core:base@0.9.0"),
            id("core:base@1.0.0"),
            id("core:base@3.0.0"),
            id("core:other@1.0.0"),
        ];
        let found = c.overlapping(ids.iter());
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec![id("core:base@1.0.0"), id("core:base@3.0.0")]
        );
    }

    #[test]
    fn is_below_for_exact_and_range() {
        let exact = DependencyConstraint::exact(DependencyKind::Asset, id("core:a@1.0.0"));
        assert!(exact.is_below(&v(2, 0, 0)));
        assert!(!exact.is_below(&v(1, 0, 0)));

        let bounded = range("core:a", v(1, 0, 0), Some(v(2, 0, 0)));
        assert!(bounded.is_below(&v(2, 0, 0)));
        assert!(!bounded.is_below(&v(1, 5, 0)));

        let open = range("core:a", v(1, 0, 0), None);
        assert!(!open.is_below(&v(100, 0, 0)));
    }

    #[test]
    fn constraint_overlap_matrix() {
        let exact = DependencyConstraint::exact(DependencyKind::Asset, id("core:a@1.5.0"));
        let other_exact = DependencyConstraint::exact(DependencyKind::Asset, id("core:a@1.6.0"));
        let low = range("core:a", v(1, 0, 0), Some(v(2, 0, 0)));
        let high = range("core:a", v(2, 0, 0), None);
        let foreign = range("core:b", v(0, 0, 0), None);

        assert!(exact.overlaps_constraint(&exact, false));
        assert!(!exact.overlaps_constraint(&other_exact, false));
        assert!(exact.overlaps_constraint(&other_exact, true));
        assert!(exact.overlaps_constraint(&low, false));
        assert!(low.overlaps_constraint(&exact, false));
        assert!(!exact.overlaps_constraint(&high, false));
        assert!(!low.overlaps_constraint(&high, false));
        assert!(low.overlaps_constraint(&high, true));
        assert!(!low.overlaps_constraint(&foreign, true));
    }

    #[test]
    fn display_matches_requirement() {
        let exact = DependencyConstraint::exact(DependencyKind::Asset, id("core:a@1.5.0"));
        assert_eq!(exact.to_string(), "core:a@1.5.0");
        let bounded = range("core:a", v(1, 0, 0), Some(v(2, 0, 0)));
        assert_eq!(bounded.to_string(), "core:a with version range 1.0.0 to 2.0.0");
        let open = range("core:a", v(1, 0, 0), None);
        assert_eq!(open.to_string(), "core:a with minimum version 1.0.0");
    }
}
