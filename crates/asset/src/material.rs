//! Shading parameters keyed by material name.

use std::collections::BTreeMap;

/// Texture file names referenced by a material. Names only; nothing is decoded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureMaps {
    pub diffuse: Option<String>,
    pub ambient: Option<String>,
    pub specular: Option<String>,
    pub shininess: Option<String>,
    pub opacity: Option<String>,
    pub bump: Option<String>,
}

/// Phong-style material record. Colors are not clamped.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialRecord {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub emissive: [f32; 3],
    pub shininess: f32,
    /// 1.0 is fully opaque.
    pub opacity: f32,
    pub optical_density: f32,
    pub illumination: Option<u32>,
    pub maps: TextureMaps,
}

impl MaterialRecord {
    pub const DEFAULT_SHININESS: f32 = 1.0;

    /// Record as opened by `newmtl`, before any property is applied.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            emissive: [0.0; 3],
            shininess: Self::DEFAULT_SHININESS,
            opacity: 1.0,
            optical_density: 1.0,
            illumination: None,
            maps: TextureMaps::default(),
        }
    }

    /// Fallback used for geometries whose material is unnamed or unknown.
    pub fn viewer_default() -> Self {
        Self {
            ambient: [0.3; 3],
            diffuse: [0.9; 3],
            specular: [1.0; 3],
            emissive: [0.1; 3],
            shininess: 400.0,
            ..Self::new("default")
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Materials by name with last-wins insertion and sorted iteration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialMap {
    materials: BTreeMap<String, MaterialRecord>,
}

impl MaterialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` under its name, replacing any earlier definition.
    pub fn insert(&mut self, record: MaterialRecord) -> Option<MaterialRecord> {
        self.materials.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&MaterialRecord> {
        self.materials.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut MaterialRecord> {
        self.materials.get_mut(name)
    }

    /// Look up `name`, falling back to `default` when it is `None` or unknown.
    pub fn resolve<'a>(
        &'a self,
        name: Option<&str>,
        default: &'a MaterialRecord,
    ) -> &'a MaterialRecord {
        name.and_then(|n| self.get(n)).unwrap_or(default)
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

    pub fn iter(&self) -> impl Iterator<Item = &MaterialRecord> {
        self.materials.values()
    }
}
