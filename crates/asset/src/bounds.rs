//! Axis-aligned bounds over parsed geometry.

use corelib::{Extents, Vec3};

use crate::mesh::Geometry;

/// Componentwise min/max over every position of every geometry.
///
/// Returns [`Extents::EMPTY`] when there are no positions at all.
pub fn compute_extents(geometries: &[Geometry]) -> Extents {
    geometries
        .iter()
        .flat_map(|g| g.data.positions())
        .map(Vec3::from)
        .collect()
}
