//! `module.toml` ModuleLoader implementation
//!
//! One manifest per module directory:
//!
//! ```toml
//! identifier = "core:addon"
//! version = "1.0.0"
//!
//! [[dependencies]]
//! type = "asset"
//! identifier = "core:base"
//! version = { min = "1.0.0", max = "2.0.0" }
//!
//! [[assets.element]]
//! identifier = "core:stone"
//! references = [{ type = "model", identifier = "core:stone_model" }]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::domain::entities::{
    AssetDeclaration, AssetReference, DependencyConstraint, ModuleKind, RawModule,
};
use crate::domain::ports::{LoadedModule, ModuleLoadError, ModuleLoader};
use crate::domain::value_objects::{AssetType, DependencyKind, GenericIdentifier, Version};

pub const MANIFEST_FILE: &str = "module.toml";

#[derive(Debug, Deserialize)]
struct ModuleManifest {
    identifier: GenericIdentifier,
    version: Version,
    #[serde(default)]
    dependencies: Vec<DependencyManifest>,
    /// Keyed by asset type name.
    #[serde(default)]
    assets: BTreeMap<String, Vec<AssetManifest>>,
}

#[derive(Debug, Deserialize)]
struct DependencyManifest {
    #[serde(rename = "type")]
    kind: DependencyKind,
    identifier: GenericIdentifier,
    version: VersionSpec,
}

/// `version = "1.5.0"` or `version = { min = "1.0.0", max = "2.0.0" }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VersionSpec {
    Exact(Version),
    Range {
        min: Version,
        #[serde(default)]
        max: Option<Version>,
    },
}

#[derive(Debug, Deserialize)]
struct AssetManifest {
    identifier: GenericIdentifier,
    #[serde(default)]
    references: Vec<AssetReference>,
    #[serde(default)]
    source: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct TomlModuleLoader {
    manifest_name: String,
}

impl Default for TomlModuleLoader {
    fn default() -> Self {
        Self {
            manifest_name: MANIFEST_FILE.to_string(),
        }
    }
}

impl TomlModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Build a record from manifest text. `path` is only used for messages.
    ///
    /// Duplicate asset declarations keep the first one; the rest are returned
    /// in `LoadedModule::dropped`.
    pub fn parse_str(
        &self,
        content: &str,
        path: &Path,
        kind: ModuleKind,
    ) -> Result<LoadedModule, ModuleLoadError> {
        let mut unknown_keys: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(content);
        let manifest: ModuleManifest = serde_ignored::deserialize(deserializer, |key| {
            unknown_keys.push(key.to_string());
        })
        .map_err(|e| ModuleLoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        for key in unknown_keys {
            warn!(path = %path.display(), key, "ignoring unknown manifest key");
        }

        build_module(manifest, path, kind)
    }
}

fn build_module(
    manifest: ModuleManifest,
    path: &Path,
    kind: ModuleKind,
) -> Result<LoadedModule, ModuleLoadError> {
    let invalid = |source| ModuleLoadError::Invalid {
        path: path.to_path_buf(),
        source,
    };

    let mut module = RawModule::new(manifest.identifier.at(manifest.version), kind);
    let mut dropped = Vec::new();

    for dependency in manifest.dependencies {
        let constraint = match dependency.version {
            VersionSpec::Exact(version) => {
                DependencyConstraint::exact(dependency.kind, dependency.identifier.at(version))
            }
            VersionSpec::Range { min, max } => {
                DependencyConstraint::range(dependency.kind, dependency.identifier, min, max)
                    .map_err(invalid)?
            }
        };
        module = module.with_dependency(constraint);
    }

    for (type_name, assets) in manifest.assets {
        let asset_type = AssetType::parse(&type_name).ok_or_else(|| ModuleLoadError::Parse {
            path: path.to_path_buf(),
            message: format!("unknown asset type '{type_name}'"),
        })?;
        for asset in assets {
            let mut declaration = AssetDeclaration::new(asset_type, asset.identifier)
                .with_references(asset.references);
            if let Some(source) = asset.source {
                declaration = declaration.with_source(source);
            }
            if let Err(error) = module.insert_asset(declaration) {
                dropped.push(error);
            }
        }
    }

    Ok(LoadedModule { module, dropped })
}

impl ModuleLoader for TomlModuleLoader {
    fn load(&self, dir: &Path, kind: ModuleKind) -> Result<LoadedModule, ModuleLoadError> {
        let path = dir.join(&self.manifest_name);
        if !path.is_file() {
            return Err(ModuleLoadError::ManifestNotFound { path });
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ModuleLoadError::Io {
            path: path.clone(),
            source,
        })?;
        let mut loaded = self.parse_str(&content, &path, kind)?;
        loaded.module = loaded.module.with_root(dir);
        Ok(loaded)
    }
}
