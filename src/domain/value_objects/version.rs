//! Version value objects
//!
//! A `Version` is a `major.minor.patch` triple. A `VersionRange` is a
//! half-open interval `[min, max)` whose upper bound may be omitted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ResolveError;

/// Module version, ordered lexicographically by (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl Version {
    pub const MIN: Version = Version::new(0, 0, 0);
    pub const MAX: Version = Version::new(u32::MAX, u32::MAX, u32::MAX);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Lower bound inclusive, upper bound exclusive. `None` means unbounded above.
    pub fn in_range(&self, min: &Version, max: Option<&Version>) -> bool {
        self >= min && max.is_none_or(|max| self < max)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolveError::InvalidVersion {
            value: s.to_string(),
        };

        let mut parts = s.trim().split('.');
        let mut next = || -> Result<u32, ResolveError> {
            parts
                .next()
                .ok_or_else(invalid)?
                .parse::<u32>()
                .map_err(|_| invalid())
        };

        let version = Version::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}

impl From<[u32; 3]> for Version {
    fn from([major, minor, patch]: [u32; 3]) -> Self {
        Self::new(major, minor, patch)
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Accepts both `"1.2.3"` and `[1, 2, 3]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum VersionDe {
    Text(String),
    Vector([u32; 3]),
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match VersionDe::deserialize(deserializer)? {
            VersionDe::Text(s) => s.parse().map_err(serde::de::Error::custom),
            VersionDe::Vector(v) => Ok(v.into()),
        }
    }
}

/// Half-open version interval `[min, max)`.
///
/// Invariant: `min < max` whenever `max` is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VersionRange {
    min: Version,
    max: Option<Version>,
}

impl VersionRange {
    pub fn new(min: Version, max: Option<Version>) -> Result<Self, ResolveError> {
        if let Some(max) = max {
            if min >= max {
                return Err(ResolveError::InvalidVersionRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Range with no upper bound.
    pub fn at_least(min: Version) -> Self {
        Self { min, max: None }
    }

    pub fn min(&self) -> &Version {
        &self.min
    }

    pub fn max(&self) -> Option<&Version> {
        self.max.as_ref()
    }

    pub fn contains(&self, version: &Version) -> bool {
        version.in_range(&self.min, self.max.as_ref())
    }

    /// True when every admissible version is strictly below `version`.
    ///
    /// An unbounded range is never below anything.
    pub fn is_below(&self, version: &Version) -> bool {
        self.max.is_some_and(|max| max <= *version)
    }

    /// True when the two intervals share at least one version.
    pub fn intersects(&self, other: &VersionRange) -> bool {
        let below_other_max = other.max.is_none_or(|max| self.min < max);
        let other_below_max = self.max.is_none_or(|max| other.min < max);
        below_other_max && other_below_max
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.max {
            Some(max) => write!(f, "[{}, {})", self.min, max),
            None => write!(f, ">={}", self.min),
        }
    }
}
