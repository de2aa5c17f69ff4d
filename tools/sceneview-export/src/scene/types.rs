//! Types for scene building

use glam::Vec3;
use sceneview_common::Vertex;

use crate::error::EncodeError;

/// One corner of a polygon face: 0-based position and texture coordinate indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub position: usize,
    pub tex_coord: usize,
}

impl FaceVertex {
    pub fn new(position: usize, tex_coord: usize) -> Self {
        Self {
            position,
            tex_coord,
        }
    }
}

/// Hashable identity of a combined vertex
///
/// Exact match on all 8 attributes, no epsilon. `-0.0` is folded into `0.0`
/// so keys agree with float equality; NaN lanes compare by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey([u32; 8]);

impl From<&Vertex> for VertexKey {
    fn from(vertex: &Vertex) -> Self {
        let mut lanes = vertex.to_array();
        for lane in &mut lanes {
            if *lane == 0.0 {
                *lane = 0.0;
            }
        }
        VertexKey(bytemuck::cast(lanes))
    }
}

/// Unit normal of the triangle (a, b, c) with counter-clockwise winding
///
/// Zero-area triangles yield the zero vector.
pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let a = Vec3::from(a);
    let cross = (Vec3::from(b) - a).cross(Vec3::from(c) - a);

    let mag = cross.length();
    if mag == 0.0 {
        return [0.0; 3];
    }
    (cross / mag).to_array()
}

/// Index of the next entry in a table that already holds `len` entries
pub(crate) fn table_index(kind: &'static str, len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooManyEntries {
        kind,
        count: len.saturating_add(1),
    })
}

/// Triangle-list indices for a convex polygon, fanned from its first corner
pub fn fan_triangulate(polygon: &[u32]) -> impl Iterator<Item = u32> + '_ {
    (1..polygon.len().saturating_sub(1))
        .flat_map(move |i| [polygon[0], polygon[i], polygon[i + 1]])
}
