//! Scene objects: transforms, analytic geometry and hierarchy links.

use cgmath::{Matrix4, Rad, Vector3, Zero};

use crate::gfx::{
    picking::Aabb,
    resources::material::{Highlight, MaterialId},
};

/// Stable handle to an object inside a [`Scene`](super::Scene).
///
/// Handles are plain indices and compare by identity: two distinct objects
/// never share an id, even if every other field is equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    /// Position of the object in scene insertion order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale of an object
/// relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Local-to-parent matrix, composed as `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }
}

/// Intersectable shape of an object, expressed in its local frame and
/// centered on the local origin.
///
/// Planes, rings and tori lie in the local XY plane, cylinders stand along Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Pure grouping node without a surface of its own
    Group,
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
    },
    Plane {
        width: f32,
        height: f32,
    },
    Ring {
        inner_radius: f32,
        outer_radius: f32,
    },
}

impl Geometry {
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Cuboid {
            width,
            height,
            depth,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }

    /// Tight local-space bounds, or `None` for groups
    pub fn local_bounds(&self) -> Option<Aabb> {
        let half = match *self {
            Self::Group => return None,
            Self::Cuboid {
                width,
                height,
                depth,
            } => Vector3::new(width, height, depth) * 0.5,
            Self::Sphere { radius } => Vector3::new(radius, radius, radius),
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => {
                let r = radius_top.max(radius_bottom);
                Vector3::new(r, height * 0.5, r)
            }
            Self::Torus { radius, tube } => {
                let outer = radius + tube;
                Vector3::new(outer, outer, tube)
            }
            Self::Plane { width, height } => Vector3::new(width * 0.5, height * 0.5, 0.0),
            Self::Ring { outer_radius, .. } => Vector3::new(outer_radius, outer_radius, 0.0),
        };
        Some(Aabb::new(-half, half))
    }
}

/// A node of the scene graph
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub geometry: Geometry,
    pub transform: Transform,
    /// Material used for rendering; several objects may share one
    pub material: Option<MaterialId>,
    /// Constant rotation applied every frame, radians per axis
    pub spin: Option<Vector3<f32>>,
    /// Selection override drawn instead of the material colors
    pub highlight: Option<Highlight>,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
}

impl Object {
    pub fn builder(name: impl Into<String>, geometry: Geometry) -> ObjectBuilder {
        ObjectBuilder::new(name, geometry)
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

/// Builder used with [`Scene::add`](super::Scene::add)
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    pub(crate) name: String,
    pub(crate) geometry: Geometry,
    pub(crate) transform: Transform,
    pub(crate) material: Option<MaterialId>,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) spin: Option<Vector3<f32>>,
}

impl ObjectBuilder {
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
            transform: Transform::default(),
            material: None,
            parent: None,
            spin: None,
        }
    }

    pub fn position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.transform.set_uniform_scale(scale);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn material(mut self, material: impl Into<MaterialId>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn parent(mut self, parent: ObjectId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn spin(mut self, x: f32, y: f32, z: f32) -> Self {
        self.spin = Some(Vector3::new(x, y, z));
        self
    }

    pub(crate) fn into_object(self) -> Object {
        Object {
            name: self.name,
            geometry: self.geometry,
            transform: self.transform,
            material: self.material,
            spin: self.spin,
            highlight: None,
            parent: self.parent,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    #[test]
    fn default_transform_is_identity() {
        let m = Transform::default().matrix();
        assert_eq!(m, Matrix4::from_scale(1.0));
    }

    #[test]
    fn transform_applies_scale_before_translation() {
        let mut transform = Transform::from_position(Vector3::new(1.0, 2.0, 3.0));
        transform.set_uniform_scale(2.0);
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.truncate() - Vector3::new(3.0, 2.0, 3.0)).magnitude() < 1e-6);
    }

    #[test]
    fn cuboid_bounds_match_dimensions() {
        let bounds = Geometry::cuboid(2.0, 4.0, 6.0).local_bounds().unwrap();
        assert_eq!(bounds.size(), Vector3::new(2.0, 4.0, 6.0));
        assert!(Geometry::Group.local_bounds().is_none());
    }

    #[test]
    fn tapered_cylinder_uses_wider_radius() {
        let bounds = Geometry::Cylinder {
            radius_top: 0.4,
            radius_bottom: 0.5,
            height: 4.0,
        }
        .local_bounds()
        .unwrap();
        assert_eq!(bounds.size(), Vector3::new(1.0, 4.0, 1.0));
    }
}
