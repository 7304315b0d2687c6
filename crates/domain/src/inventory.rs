//! Object inventories reported by the simulation, and the scene filter.
//!
//! The simulation reports object names as a single comma-space separated
//! string. Inventories are always replaced wholesale, never merged.

use serde::{Deserialize, Serialize};

/// Separator used by the simulation for object lists.
pub const OBJECT_LIST_SEPARATOR: &str = ", ";

/// Object-name fragments that identify rig, UI and environment objects in
/// the scene rather than training objects.
pub const DEFAULT_EXCLUDED_KEYWORDS: &[&str] = &[
    "snap_point",
    "ray interactor",
    "poke interactor",
    "direct interactor",
    "left controller",
    "right controller",
    "dynamic move provider",
    "debug updater",
    "trackables",
    "hand",
    "Canvas",
    "Value",
    "Button",
    "XR",
    "UI",
    "Tools",
    "Text",
    "EventSystem",
    "Snap Point",
    "Parts",
    "Light",
    "Environment",
    "Menu",
    "Move",
    "Other",
    "Sfx",
    "Camera",
    "Manual",
    "Teleport",
    "Turn",
    "Ray",
    "Anchor",
    "Background",
    "Floor",
    "Image",
    "InitializeScripts",
    "Input Action Manager",
    "Locomotion System",
];

/// Which of the two inventories a list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryKind {
    /// Prefabs that can be placed
    Available,
    /// Objects currently in the running scene
    Scene,
}

/// Ordered list of object names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    names: Vec<String>,
}

impl Inventory {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Parse a comma-space separated list, trimming each name.
    ///
    /// Empty names (from an empty list or a trailing separator) are dropped.
    pub fn parse(list: &str) -> Self {
        let names = list
            .split(OBJECT_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Case-insensitive keyword set used to hide infrastructure objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    keywords: Vec<String>,
    lowered: Vec<String>,
}

impl ExclusionList {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.trim().is_empty())
            .collect();
        let lowered = keywords.iter().map(|k| k.to_lowercase()).collect();
        Self { keywords, lowered }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if any keyword is a case-insensitive substring of `name`.
    pub fn excludes(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.lowered.iter().any(|keyword| name.contains(keyword.as_str()))
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_KEYWORDS.iter().copied())
    }
}

/// Remove every name matched by the exclusion list, preserving order.
pub fn filter_scene(names: &[String], excluded: &ExclusionList) -> Vec<String> {
    names
        .iter()
        .filter(|name| !excluded.excludes(name))
        .cloned()
        .collect()
}
