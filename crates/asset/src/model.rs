//! Render-ready draw parts: geometry merged with its resolved material.

use bytemuck::{Pod, Zeroable};
use corelib::Extents;

use crate::{
    bounds::compute_extents,
    loader::LoadedSources,
    material::{MaterialMap, MaterialRecord},
    mesh::{Geometry, ParseResult},
};

/// Interleaved vertex: position + normal + uv + color.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl GpuVertex {
    pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
    pub const DEFAULT_UV: [f32; 2] = [0.0, 0.0];
    pub const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

/// One draw call: vertices, triangle indices and the material to shade them with.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawPart {
    pub label: String,
    pub material: MaterialRecord,
    pub vertices: Vec<GpuVertex>,
    pub indices: Vec<u32>,
}

impl DrawPart {
    /// Interleave `geometry`, filling attributes it lacks with defaults.
    pub fn new(geometry: &Geometry, material: MaterialRecord) -> Self {
        let data = &geometry.data;
        let vertices = data
            .positions()
            .enumerate()
            .map(|(i, position)| GpuVertex {
                position,
                normal: data.normal(i).unwrap_or(GpuVertex::DEFAULT_NORMAL),
                uv: data.texcoord(i).unwrap_or(GpuVertex::DEFAULT_UV),
                color: data
                    .color(i)
                    .map_or(GpuVertex::DEFAULT_COLOR, |[r, g, b]| [r, g, b, 1.0]),
            })
            .collect();

        Self {
            label: geometry.label(),
            material,
            vertices,
            indices: geometry.indices.clone(),
        }
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Everything the renderer needs for one loaded model.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub parts: Vec<DrawPart>,
    pub extents: Extents,
}

impl Model {
    /// Pair every geometry with its material. Unnamed or unknown materials use
    /// `default_material`.
    pub fn assemble(
        mesh: &ParseResult,
        materials: &MaterialMap,
        default_material: &MaterialRecord,
    ) -> Self {
        let parts = mesh
            .geometries
            .iter()
            .map(|geometry| {
                if let Some(name) = geometry.material.as_deref() {
                    if !materials.contains(name) {
                        log::warn!("Material '{}' not found, using '{}'", name, default_material.name);
                    }
                }
                let material = materials.resolve(geometry.material.as_deref(), default_material);
                DrawPart::new(geometry, material.clone())
            })
            .collect();

        Self {
            parts,
            extents: compute_extents(&mesh.geometries),
        }
    }

    pub fn from_sources(sources: &LoadedSources, default_material: &MaterialRecord) -> Self {
        Self::assemble(&sources.mesh, &sources.materials, default_material)
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|p| p.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(DrawPart::triangle_count).sum()
    }
}
