//! # Procedural Geometry Generation
//!
//! This module turns the analytic [`Geometry`] of scene objects into
//! triangle meshes for the renderer, so no external model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Cuboid**: Box with independent width, height and depth
//! - **Sphere**: UV sphere with configurable resolution
//! - **Cylinder**: Optionally tapered, standing on the Y axis, with caps
//! - **Torus**: Ring-shaped tube lying in the XY plane
//! - **Plane** and **Ring**: Flat shapes in the XY plane
//!
//! ## Usage
//!
//! ```rust
//! use vantage::gfx::geometry::{generate_cuboid, generate_sphere, generate_plane};
//!
//! let crate_box = generate_cuboid(1.0, 2.0, 1.0);
//! let ball = generate_sphere(0.5, 32, 16);
//! let ground = generate_plane(10.0, 10.0, 4, 4);
//! assert_eq!(crate_box.triangle_count(), 12);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::{rendering::vertex::Vertex3D, scene::Geometry};

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

/// Tessellates an object's geometry; groups have no mesh
pub fn mesh_for(geometry: &Geometry) -> Option<GeometryData> {
    let mesh = match *geometry {
        Geometry::Group => return None,
        Geometry::Cuboid {
            width,
            height,
            depth,
        } => generate_cuboid(width, height, depth),
        Geometry::Sphere { radius } => generate_sphere(radius, 32, 16),
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => generate_cylinder(radius_top, radius_bottom, height, 24),
        Geometry::Torus { radius, tube } => generate_torus(radius, tube, 16, 100),
        Geometry::Plane { width, height } => generate_plane(width, height, 1, 1),
        Geometry::Ring {
            inner_radius,
            outer_radius,
        } => generate_ring(inner_radius, outer_radius, 32),
    };
    Some(mesh)
}

/// Cache key for meshes: geometry parameters compared bit for bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshKey {
    kind: u8,
    params: [u32; 3],
}

impl MeshKey {
    pub fn of(geometry: &Geometry) -> Option<Self> {
        let (kind, params) = match *geometry {
            Geometry::Group => return None,
            Geometry::Cuboid {
                width,
                height,
                depth,
            } => (0, [width, height, depth]),
            Geometry::Sphere { radius } => (1, [radius, 0.0, 0.0]),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => (2, [radius_top, radius_bottom, height]),
            Geometry::Torus { radius, tube } => (3, [radius, tube, 0.0]),
            Geometry::Plane { width, height } => (4, [width, height, 0.0]),
            Geometry::Ring {
                inner_radius,
                outer_radius,
            } => (5, [inner_radius, outer_radius, 0.0]),
        };
        Some(Self {
            kind,
            params: params.map(f32::to_bits),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_have_no_mesh() {
        assert!(mesh_for(&Geometry::Group).is_none());
        assert!(MeshKey::of(&Geometry::Group).is_none());
    }

    #[test]
    fn equal_geometry_shares_a_key() {
        let a = MeshKey::of(&Geometry::cuboid(1.0, 2.0, 3.0));
        let b = MeshKey::of(&Geometry::cuboid(1.0, 2.0, 3.0));
        let c = MeshKey::of(&Geometry::cuboid(1.0, 2.0, 3.5));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, MeshKey::of(&Geometry::Sphere { radius: 1.0 }));
    }

    #[test]
    fn interleaved_vertices_keep_normals() {
        let mesh = mesh_for(&Geometry::Plane {
            width: 2.0,
            height: 2.0,
        })
        .unwrap();
        let vertices = mesh.to_vertices();
        assert_eq!(vertices.len(), mesh.vertex_count());
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
