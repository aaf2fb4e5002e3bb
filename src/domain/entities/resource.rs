//! Resource entity
//!
//! A dependency-free module supplying non-asset data that packs reference.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::entities::{ModuleKind, RawModule};
use crate::domain::value_objects::Identifier;
use crate::domain::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    identifier: Identifier,
    root: Option<PathBuf>,
}

impl Resource {
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            root: None,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn root(&self) -> Option<&PathBuf> {
        self.root.as_ref()
    }
}

/// Only the kind is checked here; declaration checks run at registration.
impl TryFrom<&RawModule> for Resource {
    type Error = ResolveError;

    fn try_from(module: &RawModule) -> Result<Self, Self::Error> {
        if module.kind() != ModuleKind::Resource {
            return Err(ResolveError::InvalidResource {
                identifier: module.identifier().clone(),
            });
        }
        Ok(Self {
            identifier: module.identifier().clone(),
            root: module.root().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_plain_resource() {
        let raw = RawModule::resource("core:sounds@1.0.0".parse().unwrap()).with_root("/tmp/sounds");
        let resource = Resource::try_from(&raw).unwrap();
        assert_eq!(resource.identifier().to_string(), "core:sounds@1.0.0");
        assert_eq!(resource.root(), Some(&PathBuf::from("/tmp/sounds")));
    }

    #[test]
    fn rejects_pack_records() {
        let raw = RawModule::pack("core:base@1.0.0".parse().unwrap());
        assert!(matches!(
            Resource::try_from(&raw),
            Err(ResolveError::InvalidResource { .. })
        ));
    }
}
