//! # Object Picking System
//!
//! This module provides 3D object picking using mouse ray-casting. It maps a
//! pointer position to the nearest scene object under it, and keeps track of
//! which object is selected or hovered.
//!
//! ## How it works
//!
//! 1. **Mouse to Ray**: Convert pointer coordinates to normalized device
//!    coordinates, then unproject them into a world-space ray
//! 2. **Ray-Object Intersection**: Test the ray against each candidate's
//!    analytic geometry, in the candidate's local frame
//! 3. **Selection**: Return the closest intersected object
//!
//! ## Usage
//!
//! ```no_run
//! use vantage::gfx::picking::{ObjectPicker, PickTargets};
//! # use vantage::gfx::{camera::OrbitCamera, scene::Scene};
//! # let (camera, scene) = (OrbitCamera::default(), Scene::new());
//!
//! let picker = ObjectPicker::new();
//! let targets = PickTargets::Flat(scene.roots().to_vec());
//! if let Some(hit) = picker.pick((320.0, 240.0), (640.0, 480.0), &camera, &scene, &targets) {
//!     println!("Selected object: {:?} at {:.2}", hit.candidate, hit.distance);
//! }
//! ```

pub mod hover;
pub mod pulse;
pub mod selection;

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::{
    camera::camera_utils::Camera,
    scene::{Geometry, ObjectId, Scene},
};

pub use hover::HoverTracker;
pub use pulse::{pulse_scale, PulseAnimation, PulseSettings};
pub use selection::{HighlightStyle, SelectionInfo, SelectionManager};

/// Determinants and directions below this are treated as degenerate
const EPSILON: f32 = 1e-6;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized for world rays)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray with a normalized direction
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Maps the ray through an affine matrix without renormalizing, so the
    /// ray parameter `t` of a hit is the same in both frames.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let origin = matrix * self.origin.extend(1.0);
        let direction = matrix * self.direction.extend(0.0);
        Self {
            origin: origin.truncate(),
            direction: direction.truncate(),
        }
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Vector3<f32>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(*first, *first);
        for p in rest {
            bounds.min = min_components(bounds.min, *p);
            bounds.max = max_components(bounds.max, *p);
        }
        Some(bounds)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            min_components(self.min, other.min),
            max_components(self.max, other.max),
        )
    }

    /// Test ray-AABB intersection (slab method)
    ///
    /// Returns the ray parameter of the entry point, the exit point when the
    /// origin is inside the box, or `None` if the box is missed or behind.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = min_components(t_min, t_max);
        let t2 = max_components(t_min, t_max);

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        // Transform all 8 corners of the AABB and compute new bounds
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed: Vec<Vector3<f32>> = corners
            .iter()
            .map(|corner| {
                let p = matrix * corner.extend(1.0);
                p.truncate() / p.w
            })
            .collect();

        Self::from_points(&transformed).unwrap_or(*self)
    }
}

fn min_components(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z))
}

fn max_components(a: Vector3<f32>, b: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z))
}

/// The candidate set a pick is tested against
#[derive(Debug, Clone, PartialEq)]
pub enum PickTargets {
    /// Only the listed objects' own geometry
    Flat(Vec<ObjectId>),
    /// The listed objects and every descendant; hits on a descendant are
    /// reported against the listed ancestor
    Recursive(Vec<ObjectId>),
}

impl PickTargets {
    pub fn candidates(&self) -> &[ObjectId] {
        match self {
            Self::Flat(ids) | Self::Recursive(ids) => ids,
        }
    }

    pub fn is_recursive(&self) -> bool {
        matches!(self, Self::Recursive(_))
    }
}

/// Result of an object picking operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// The object whose surface was hit
    pub object: ObjectId,
    /// The candidate `object` belongs to (equal to `object` for flat picks)
    pub candidate: ObjectId,
    /// Distance from camera to intersection point
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Converts viewport pixels (origin top-left, Y down) into normalized
/// device coordinates (origin center, Y up).
///
/// The viewport must have nonzero dimensions.
pub fn screen_to_ndc(screen_pos: (f32, f32), screen_size: (f32, f32)) -> (f32, f32) {
    let (mouse_x, mouse_y) = screen_pos;
    let (screen_width, screen_height) = screen_size;
    debug_assert!(
        screen_width > 0.0 && screen_height > 0.0,
        "viewport must not be empty"
    );

    let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
    let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height; // Flip Y axis
    (ndc_x, ndc_y)
}

/// Object picker for 3D mouse selection
#[derive(Debug, Clone, Copy)]
pub struct ObjectPicker {
    /// Hits farther than this from the camera are ignored
    pub far: f32,
}

impl Default for ObjectPicker {
    fn default() -> Self {
        Self { far: f32::INFINITY }
    }
}

impl ObjectPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert screen coordinates to a world-space ray starting at the eye
    ///
    /// Returns `None` if the camera's view-projection cannot be inverted.
    pub fn screen_to_ray(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &impl Camera,
    ) -> Option<Ray> {
        let (ndc_x, ndc_y) = screen_to_ndc(screen_pos, screen_size);
        let inv_view_proj = camera.build_view_projection_matrix().invert()?;

        // Transform near and far points from NDC to world space
        let unproject = |z: f32| {
            let p = inv_view_proj * Vector4::new(ndc_x, ndc_y, z, 1.0);
            p.truncate() / p.w
        };
        let direction = unproject(1.0) - unproject(-1.0);
        if direction.magnitude2() < EPSILON {
            return None;
        }
        Some(Ray::new(camera.eye_position(), direction))
    }

    /// Pick the nearest object under the pointer
    pub fn pick(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &impl Camera,
        scene: &Scene,
        targets: &PickTargets,
    ) -> Option<PickHit> {
        self.pick_all(screen_pos, screen_size, camera, scene, targets)
            .into_iter()
            .next()
    }

    /// Every intersection under the pointer, nearest first
    pub fn pick_all(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &impl Camera,
        scene: &Scene,
        targets: &PickTargets,
    ) -> Vec<PickHit> {
        match self.screen_to_ray(screen_pos, screen_size, camera) {
            Some(ray) => self.intersect_targets(&ray, scene, targets),
            None => Vec::new(),
        }
    }

    /// Tests a world-space ray against the targets, nearest hit first
    pub fn intersect_targets(&self, ray: &Ray, scene: &Scene, targets: &PickTargets) -> Vec<PickHit> {
        let mut hits = Vec::new();

        for &candidate in targets.candidates() {
            let mut tested = vec![candidate];
            if targets.is_recursive() {
                tested.extend(scene.descendants(candidate));
            }

            for object in tested {
                let Some(distance) = intersect_object(ray, scene, object) else {
                    continue;
                };
                if distance <= self.far {
                    hits.push(PickHit {
                        object,
                        candidate,
                        distance,
                        point: ray.point_at(distance),
                    });
                }
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

fn intersect_object(ray: &Ray, scene: &Scene, id: ObjectId) -> Option<f32> {
    let object = scene.object(id)?;
    if object.geometry.is_group() {
        return None;
    }
    let inverse = scene.world_matrix(id)?.invert()?;
    intersect_geometry(&object.geometry, &ray.transformed(&inverse))
}

/// Ray parameter of the first surface hit in the geometry's local frame
fn intersect_geometry(geometry: &Geometry, ray: &Ray) -> Option<f32> {
    match *geometry {
        Geometry::Group => None,
        Geometry::Cuboid { .. } | Geometry::Torus { .. } => {
            geometry.local_bounds()?.intersect_ray(ray)
        }
        Geometry::Sphere { radius } => intersect_sphere(ray, radius),
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => intersect_cylinder(ray, radius_top.max(radius_bottom), height * 0.5),
        Geometry::Plane { width, height } => {
            let (t, p) = intersect_xy_plane(ray)?;
            (p.x.abs() <= width * 0.5 && p.y.abs() <= height * 0.5).then_some(t)
        }
        Geometry::Ring {
            inner_radius,
            outer_radius,
        } => {
            let (t, p) = intersect_xy_plane(ray)?;
            let r2 = p.x * p.x + p.y * p.y;
            (r2 >= inner_radius * inner_radius && r2 <= outer_radius * outer_radius)
                .then_some(t)
        }
    }
}

/// Smallest non-negative root of `a t^2 + b t + c`
fn smallest_positive_root(a: f32, b: f32, c: f32) -> Option<f32> {
    let discriminant = b * b - 4.0 * a * c;
    if a.abs() < EPSILON || discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t0 = (-b - sqrt_d) / (2.0 * a);
    let t1 = (-b + sqrt_d) / (2.0 * a);
    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

fn intersect_sphere(ray: &Ray, radius: f32) -> Option<f32> {
    let o = ray.origin;
    let d = ray.direction;
    smallest_positive_root(d.dot(d), 2.0 * o.dot(d), o.dot(o) - radius * radius)
}

/// Capped cylinder standing on the Y axis
fn intersect_cylinder(ray: &Ray, radius: f32, half_height: f32) -> Option<f32> {
    let o = ray.origin;
    let d = ray.direction;
    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.map_or(true, |b| t < b) {
            best = Some(t);
        }
    };

    // Side wall: solve on the XZ circle, then keep hits within the height.
    let a = d.x * d.x + d.z * d.z;
    let b = 2.0 * (o.x * d.x + o.z * d.z);
    let c = o.x * o.x + o.z * o.z - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if a > EPSILON && discriminant >= 0.0 {
        let sqrt_d = discriminant.sqrt();
        for t in [(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)] {
            if (o.y + t * d.y).abs() <= half_height {
                consider(t);
            }
        }
    }

    // Caps
    if d.y.abs() > EPSILON {
        for cap in [-half_height, half_height] {
            let t = (cap - o.y) / d.y;
            let x = o.x + t * d.x;
            let z = o.z + t * d.z;
            if x * x + z * z <= radius * radius {
                consider(t);
            }
        }
    }

    best
}

fn intersect_xy_plane(ray: &Ray) -> Option<(f32, Vector3<f32>)> {
    if ray.direction.z.abs() < EPSILON {
        return None;
    }
    let t = -ray.origin.z / ray.direction.z;
    (t >= 0.0).then(|| (t, ray.origin + ray.direction * t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::OrbitCamera,
        resources::Material,
        scene::Object,
    };

    fn forward_ray(x: f32, y: f32) -> Ray {
        Ray::new(Vector3::new(x, y, -10.0), Vector3::new(0.0, 0.0, 1.0))
    }

    /// Camera on +Z looking at the origin with a square viewport
    fn front_camera() -> OrbitCamera {
        OrbitCamera::new(20.0, Vector3::new(0.0, 0.0, 0.0), 1.0)
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        // Ray hitting the box
        let t = aabb.intersect_ray(&forward_ray(0.0, 0.0)).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        // Ray missing the box
        assert!(aabb.intersect_ray(&forward_ray(5.0, 0.0)).is_none());

        // Origin inside reports the exit point
        let inside = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!((aabb.intersect_ray(&inside).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ndc_center_and_corners() {
        assert_eq!(screen_to_ndc((400.0, 300.0), (800.0, 600.0)), (0.0, 0.0));
        assert_eq!(screen_to_ndc((0.0, 0.0), (800.0, 600.0)), (-1.0, 1.0));
        assert_eq!(screen_to_ndc((800.0, 600.0), (800.0, 600.0)), (1.0, -1.0));
    }

    #[test]
    fn ndc_stays_in_unit_square_inside_viewport() {
        let size = (1280.0, 720.0);
        for px in (0..=1280).step_by(37) {
            for py in (0..=720).step_by(23) {
                let (x, y) = screen_to_ndc((px as f32, py as f32), size);
                assert!((-1.0..=1.0).contains(&x), "x out of range: {x}");
                assert!((-1.0..=1.0).contains(&y), "y out of range: {y}");
            }
        }
    }

    #[test]
    fn sphere_and_cylinder_hits() {
        let t = intersect_sphere(&forward_ray(0.0, 0.0), 2.0).unwrap();
        assert!((t - 8.0).abs() < 1e-5);
        assert!(intersect_sphere(&forward_ray(2.5, 0.0), 2.0).is_none());

        // Side wall
        let t = intersect_cylinder(&forward_ray(0.0, 0.0), 1.0, 2.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        // Above the cap
        assert!(intersect_cylinder(&forward_ray(0.0, 2.5), 1.0, 2.0).is_none());
        // Straight down onto the top cap
        let down = Ray::new(Vector3::new(0.2, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert!((intersect_cylinder(&down, 1.0, 2.0).unwrap() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn ring_ignores_its_hole() {
        let ring = Geometry::Ring {
            inner_radius: 1.0,
            outer_radius: 2.0,
        };
        assert!(intersect_geometry(&ring, &forward_ray(0.0, 0.0)).is_none());
        assert!(intersect_geometry(&ring, &forward_ray(1.5, 0.0)).is_some());
    }

    #[test]
    fn rotated_box_is_tested_as_oriented_box() {
        let mut scene = Scene::new();
        // A thin slab rotated 90 degrees about Y now faces the X axis.
        let slab = scene
            .add(
                Object::builder("slab", Geometry::cuboid(4.0, 1.0, 0.1))
                    .rotation(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            )
            .unwrap();
        let targets = PickTargets::Flat(vec![slab]);
        let picker = ObjectPicker::new();

        // Along Z the rotated slab is 4 units deep, so a ray at x = 1.0 misses.
        assert!(picker.intersect_targets(&forward_ray(1.0, 0.0), &scene, &targets).is_empty());
        let hits = picker.intersect_targets(&forward_ray(0.0, 0.0), &scene, &targets);
        assert!((hits[0].distance - 8.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_hit_wins() {
        let mut scene = Scene::new();
        let far = scene
            .add(Object::builder("far", Geometry::cuboid(2.0, 2.0, 2.0)).position(0.0, 0.0, -5.0))
            .unwrap();
        let near = scene
            .add(Object::builder("near", Geometry::cuboid(2.0, 2.0, 2.0)).position(0.0, 0.0, 5.0))
            .unwrap();
        let camera = front_camera();
        camera_eye_on_z(&camera);

        let picker = ObjectPicker::new();
        let targets = PickTargets::Flat(vec![far, near]);
        let hits = picker.pick_all((50.0, 50.0), (100.0, 100.0), &camera, &scene, &targets);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object, near);
        assert!(hits[0].distance < hits[1].distance);
        assert_eq!(
            picker.pick((50.0, 50.0), (100.0, 100.0), &camera, &scene, &targets).map(|h| h.object),
            Some(near)
        );
    }

    #[test]
    fn empty_candidates_never_hit() {
        let scene = Scene::new();
        let camera = front_camera();
        let hit = ObjectPicker::new().pick(
            (50.0, 50.0),
            (100.0, 100.0),
            &camera,
            &scene,
            &PickTargets::Flat(Vec::new()),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn recursive_pick_reports_the_composite() {
        let mut scene = Scene::new();
        scene.add_material(Material::from_hex("brick", 0x884422));
        let building = scene
            .add(Object::builder("building", Geometry::Group).material("brick"))
            .unwrap();
        let wing = scene
            .add(
                Object::builder("wing", Geometry::cuboid(2.0, 2.0, 2.0))
                    .material("brick")
                    .parent(building),
            )
            .unwrap();
        let camera = front_camera();
        let picker = ObjectPicker::new();

        let flat = picker.pick((50.0, 50.0), (100.0, 100.0), &camera, &scene, &PickTargets::Flat(vec![building]));
        assert!(flat.is_none(), "groups have no surface of their own");

        let hit = picker
            .pick((50.0, 50.0), (100.0, 100.0), &camera, &scene, &PickTargets::Recursive(vec![building]))
            .unwrap();
        assert_eq!(hit.object, wing);
        assert_eq!(hit.candidate, building);
        assert!((hit.point.z - 1.0).abs() < 1e-3);
    }

    fn camera_eye_on_z(camera: &OrbitCamera) {
        let eye = camera.eye_position();
        assert!(eye.x.abs() < 1e-5 && eye.y.abs() < 1e-5 && eye.z > 0.0);
    }
}
