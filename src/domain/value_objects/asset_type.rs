//! Asset type and dependency kind enumerations

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of asset a pack can declare.
///
/// Wire names are camelCase (`animationController`, `lootTable`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetType {
    AnimationController,
    Animation,
    Element,
    Entity,
    Item,
    Model,
    RenderMaterial,
    Layout,
    Interface,
    LootTable,
    Recipe,
}

impl AssetType {
    pub const ALL: [AssetType; 11] = [
        AssetType::AnimationController,
        AssetType::Animation,
        AssetType::Element,
        AssetType::Entity,
        AssetType::Item,
        AssetType::Model,
        AssetType::RenderMaterial,
        AssetType::Layout,
        AssetType::Interface,
        AssetType::LootTable,
        AssetType::Recipe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::AnimationController => "animationController",
            AssetType::Animation => "animation",
            AssetType::Element => "element",
            AssetType::Entity => "entity",
            AssetType::Item => "item",
            AssetType::Model => "model",
            AssetType::RenderMaterial => "renderMaterial",
            AssetType::Layout => "layout",
            AssetType::Interface => "interface",
            AssetType::LootTable => "lootTable",
            AssetType::Recipe => "recipe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a dependency constraint points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Another pack whose assets may be referenced.
    Asset,
    /// A dependency-free resource module.
    Resource,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::Asset => "asset",
            DependencyKind::Resource => "resource",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matches_wire_names() {
        for t in AssetType::ALL {
            assert_eq!(AssetType::parse(t.as_str()), Some(t));
        }
        assert_eq!(AssetType::parse("Element"), None);
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&AssetType::RenderMaterial).unwrap();
        assert_eq!(json, "\"renderMaterial\"");
        let kind: DependencyKind = serde_json::from_str("\"resource\"").unwrap();
        assert_eq!(kind, DependencyKind::Resource);
    }
}
