//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are centered at the origin and generated with outward normals,
//! matching the local frames used by picking.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box centered at the origin
///
/// Each face has its own four vertices so the normals stay flat.
pub fn generate_cuboid(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // Front face
        ([0.0, 0.0, 1.0], [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]]),
        // Back face
        ([0.0, 0.0, -1.0], [[-x, -y, -z], [-x, y, -z], [x, y, -z], [x, -y, -z]]),
        // Left face
        ([-1.0, 0.0, 0.0], [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]]),
        // Right face
        ([1.0, 0.0, 0.0], [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]]),
        // Top face
        ([0.0, 1.0, 0.0], [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]]),
        // Bottom face
        ([0.0, -1.0, 0.0], [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]]),
    ];

    for (normal, corners) in faces {
        let first = data.push_vertex(corners[0], normal);
        for corner in &corners[1..] {
            data.push_vertex(*corner, normal);
        }
        data.indices
            .extend_from_slice(&[first, first + 1, first + 2, first + 2, first + 3, first]);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.push_vertex(normal.map(|c| c * radius), normal);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a plane in the XY plane
///
/// Returns a plane centered at the origin with its normal along +Z.
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let pos_y = (y as f32 / h_segs as f32 - 0.5) * height;
        for x in 0..=w_segs {
            let pos_x = (x as f32 / w_segs as f32 - 0.5) * width;
            data.push_vertex([pos_x, pos_y, 0.0], [0.0, 0.0, 1.0]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[next_row, i + 1, next_row + 1]);
        }
    }

    data
}

/// Generate a capped cylinder along the Y axis
///
/// # Arguments
/// * `radius_top` - Radius of the upper cap
/// * `radius_bottom` - Radius of the lower cap
/// * `height` - Height of the cylinder, centered on the origin
/// * `segments` - Number of circular segments
pub fn generate_cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;
    // Side normals tilt with the taper
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let len = (1.0 + slope * slope).sqrt();
        let normal = [cos_a / len, slope / len, sin_a / len];

        data.push_vertex([radius_bottom * cos_a, -half_height, radius_bottom * sin_a], normal);
        data.push_vertex([radius_top * cos_a, half_height, radius_top * sin_a], normal);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = bottom_current + 2;
        let top_next = bottom_next + 1;

        data.indices.extend_from_slice(&[bottom_current, top_current, bottom_next]);
        data.indices.extend_from_slice(&[top_current, top_next, bottom_next]);
    }

    for (y, radius, normal_y) in [(-half_height, radius_bottom, -1.0), (half_height, radius_top, 1.0)] {
        let center = data.push_vertex([0.0, y, 0.0], [0.0, normal_y, 0.0]);
        let rim_start = data.vertex_count() as u32;
        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            data.push_vertex([radius * cos_a, y, radius * sin_a], [0.0, normal_y, 0.0]);
        }
        for i in 0..segs {
            let (current, next) = (rim_start + i, rim_start + i + 1);
            if normal_y > 0.0 {
                data.indices.extend_from_slice(&[center, next, current]);
            } else {
                data.indices.extend_from_slice(&[center, current, next]);
            }
        }
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the center to the middle of the tube
/// * `tube` - Radius of the tube
/// * `radial_segments` - Segments around the tube cross-section
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        let (sin_v, cos_v) = v.sin_cos();
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;
            let (sin_u, cos_u) = u.sin_cos();

            let ring = radius + tube * cos_v;
            let position = [ring * cos_u, ring * sin_u, tube * sin_v];
            let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];
            data.push_vertex(position, normal);
        }
    }

    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (tubular + 1) * j + i - 1;
            let b = (tubular + 1) * (j - 1) + i - 1;
            let c = (tubular + 1) * (j - 1) + i;
            let d = (tubular + 1) * j + i;

            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }

    data
}

/// Generate a flat annulus in the XY plane with its normal along +Z
pub fn generate_ring(inner_radius: f32, outer_radius: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.push_vertex([inner_radius * cos_a, inner_radius * sin_a, 0.0], [0.0, 0.0, 1.0]);
        data.push_vertex([outer_radius * cos_a, outer_radius * sin_a, 0.0], [0.0, 0.0, 1.0]);
    }

    for i in 0..segs {
        let inner = i * 2;
        let outer = inner + 1;
        let (inner_next, outer_next) = (inner + 2, inner + 3);
        data.indices.extend_from_slice(&[inner, outer, outer_next]);
        data.indices.extend_from_slice(&[inner, outer_next, inner_next]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_extent(data: &GeometryData, axis: usize) -> f32 {
        data.vertices
            .iter()
            .map(|v| v[axis].abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_cuboid_generation() {
        let cuboid = generate_cuboid(2.0, 4.0, 6.0);
        assert_eq!(cuboid.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cuboid.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cuboid.triangle_count(), 12);
        assert_eq!(max_extent(&cuboid, 0), 1.0);
        assert_eq!(max_extent(&cuboid, 1), 2.0);
        assert_eq!(max_extent(&cuboid, 2), 3.0);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(2.0, 8, 6);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert!((max_extent(&sphere, 1) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(0.4, 0.5, 4.0, 12);
        assert_eq!(max_extent(&cylinder, 1), 2.0);
        assert!((max_extent(&cylinder, 0) - 0.5).abs() < 1e-5);
        let max_index = cylinder.indices.iter().copied().max().unwrap();
        assert!((max_index as usize) < cylinder.vertex_count());
    }

    #[test]
    fn test_torus_and_ring_lie_in_xy() {
        let torus = generate_torus(1.0, 0.4, 8, 16);
        assert!((max_extent(&torus, 2) - 0.4).abs() < 1e-5);
        assert!((max_extent(&torus, 0) - 1.4).abs() < 1e-5);

        let ring = generate_ring(1.0, 2.0, 16);
        assert_eq!(max_extent(&ring, 2), 0.0);
        assert_eq!(ring.triangle_count(), 32);
    }
}
