//! Flat-color materials
//!
//! Materials are stored centrally in [`MaterialManager`] and objects reference
//! them by name, so several objects can share (and be highlighted through) a
//! single material.

use std::collections::{hash_map::Entry, HashMap};

/// Material ID for referencing materials
pub type MaterialId = String;

/// Appearance of a surface: an RGBA base color plus an additive emissive tint
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            emissive: [0.0, 0.0, 0.0],
        }
    }
}

impl Material {
    /// Creates an opaque material with no emission
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    pub fn new(name: &str, base_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            emissive: [0.0, 0.0, 0.0],
        }
    }

    /// Creates an opaque material from a `0xRRGGBB` color
    pub fn from_hex(name: &str, hex: u32) -> Self {
        let [r, g, b] = hex_to_rgb(hex);
        Self::new(name, [r, g, b, 1.0])
    }

    pub fn with_emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.base_color[3] = opacity.clamp(0.0, 1.0);
        self
    }
}

/// Converts a `0xRRGGBB` color into normalized RGB components
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Resolved colors of one drawn object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
}

impl Default for Appearance {
    fn default() -> Self {
        Self::from(&Material::default())
    }
}

impl From<&Material> for Appearance {
    fn from(material: &Material) -> Self {
        Self {
            base_color: material.base_color,
            emissive: material.emissive,
        }
    }
}

/// Per-object color override drawn over the material without touching it.
///
/// An override on a group covers every part below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    /// Replaces the base color; opacity comes from the material
    pub fill: [f32; 3],
    pub emissive: [f32; 3],
}

impl Highlight {
    pub fn apply(&self, appearance: Appearance) -> Appearance {
        let [r, g, b] = self.fill;
        Appearance {
            base_color: [r, g, b, appearance.base_color[3]],
            emissive: self.emissive,
        }
    }
}

/// Central material storage keyed by material name
#[derive(Debug, Default)]
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a material under its own name
    pub fn add_material(&mut self, material: Material) -> &mut Material {
        match self.materials.entry(material.name.clone()) {
            Entry::Occupied(mut entry) => {
                entry.insert(material);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(material),
        }
    }

    pub fn get_material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
