//! Identifier value objects
//!
//! - `GenericIdentifier` - `namespace:name`, the version-agnostic identity that
//!   buckets every build of one logical module
//! - `Identifier` - a generic identifier pinned to one `Version`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Version;
use crate::domain::ResolveError;

/// Version-agnostic `namespace:name` identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenericIdentifier {
    namespace: String,
    name: String,
}

impl GenericIdentifier {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self, ResolveError> {
        let namespace = namespace.into();
        let name = name.into();
        if !is_valid_segment(&namespace) || !is_valid_segment(&name) {
            return Err(ResolveError::InvalidIdentifier {
                value: format!("{}:{}", namespace, name),
            });
        }
        Ok(Self { namespace, name })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pin this identity to a version.
    pub fn at(&self, version: Version) -> Identifier {
        Identifier {
            generic: self.clone(),
            version,
        }
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.chars().any(|c| c == ':' || c.is_whitespace())
}

impl fmt::Display for GenericIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for GenericIdentifier {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Err(ResolveError::InvalidIdentifier {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for GenericIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GenericIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Exact, versioned module identity. Equality covers all three fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    generic: GenericIdentifier,
    version: Version,
}

impl Identifier {
    pub fn new(generic: GenericIdentifier, version: Version) -> Self {
        Self { generic, version }
    }

    /// Parse `namespace:name` and attach `version`.
    pub fn parse(id: &str, version: Version) -> Result<Self, ResolveError> {
        Ok(Self::new(id.parse()?, version))
    }

    pub fn namespace(&self) -> &str {
        self.generic.namespace()
    }

    pub fn name(&self) -> &str {
        self.generic.name()
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn generic(&self) -> &GenericIdentifier {
        &self.generic
    }

    pub fn to_generic(&self) -> GenericIdentifier {
        self.generic.clone()
    }

    /// Same generic identity, any version.
    pub fn compatible(&self, other: &Identifier) -> bool {
        self.generic == other.generic
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.generic, self.version)
    }
}

impl FromStr for Identifier {
    type Err = ResolveError;

    /// Parses `namespace:name@major.minor.patch`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, version) = s
            .rsplit_once('@')
            .ok_or_else(|| ResolveError::InvalidIdentifier {
                value: s.to_string(),
            })?;
        Self::parse(id, version.parse()?)
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
