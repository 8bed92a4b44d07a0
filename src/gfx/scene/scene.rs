use cgmath::{Matrix4, Vector3};
use thiserror::Error;

use crate::gfx::{
    picking::Aabb,
    resources::material::{Appearance, Material, MaterialManager},
};

use super::object::{Object, ObjectBuilder, ObjectId};

/// Errors raised while building a scene
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("material '{0}' is not registered")]
    UnknownMaterial(String),
    #[error("parent object {0:?} does not exist")]
    UnknownParent(ObjectId),
}

/// Main scene containing the object hierarchy and materials
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<Object>,
    roots: Vec<ObjectId>,
    pub material_manager: MaterialManager, // Centralized material storage
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object built with [`Object::builder`]
    ///
    /// The referenced material (if any) must already be registered and the
    /// parent (if any) must already be part of this scene.
    pub fn add(&mut self, builder: ObjectBuilder) -> Result<ObjectId, SceneError> {
        if let Some(material) = &builder.material {
            if !self.material_manager.contains(material) {
                return Err(SceneError::UnknownMaterial(material.clone()));
            }
        }

        let id = ObjectId(self.objects.len());
        match builder.parent {
            Some(parent) => self
                .objects
                .get_mut(parent.0)
                .ok_or(SceneError::UnknownParent(parent))?
                .children
                .push(id),
            None => self.roots.push(id),
        }

        self.objects.push(builder.into_object());
        Ok(id)
    }

    /// Registers a material and returns a mutable reference to it
    pub fn add_material(&mut self, material: Material) -> &mut Material {
        self.material_manager.add_material(material)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0)
    }

    /// All objects with their ids, in insertion order
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(index, object)| (ObjectId(index), object))
    }

    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    /// Local-to-world matrix of an object, composed through its ancestors
    pub fn world_matrix(&self, id: ObjectId) -> Option<Matrix4<f32>> {
        let mut object = self.object(id)?;
        let mut matrix = object.transform.matrix();
        while let Some(parent) = object.parent {
            object = self.object(parent)?;
            matrix = object.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    pub fn world_position(&self, id: ObjectId) -> Option<Vector3<f32>> {
        self.world_matrix(id).map(|m| m.w.truncate())
    }

    /// Every object below `id`, depth first, excluding `id` itself
    pub fn descendants(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut result = Vec::new();
        let Some(object) = self.object(id) else {
            return result;
        };
        let mut stack: Vec<ObjectId> = object.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            result.push(next);
            if let Some(object) = self.object(next) {
                stack.extend(object.children.iter().rev().copied());
            }
        }
        result
    }

    /// Bounds of an object and all its descendants in the object's own
    /// frame. The object's transform is left out, so scaling the object
    /// does not change the reported size.
    pub fn local_bounds(&self, id: ObjectId) -> Option<Aabb> {
        let mut bounds = self.object(id)?.geometry.local_bounds();

        for descendant in self.descendants(id) {
            let Some(child_bounds) = self
                .object(descendant)
                .and_then(|child| child.geometry.local_bounds())
            else {
                continue;
            };
            let Some(relative) = self.matrix_relative_to(id, descendant) else {
                continue;
            };
            let transformed = child_bounds.transform(&relative);
            bounds = Some(match bounds {
                Some(existing) => existing.union(&transformed),
                None => transformed,
            });
        }
        bounds
    }

    /// Matrix taking `id`'s local frame into `ancestor`'s local frame
    fn matrix_relative_to(&self, ancestor: ObjectId, id: ObjectId) -> Option<Matrix4<f32>> {
        let mut object = self.object(id)?;
        let mut matrix = object.transform.matrix();
        loop {
            let parent = object.parent?;
            if parent == ancestor {
                return Some(matrix);
            }
            object = self.object(parent)?;
            matrix = object.transform.matrix() * matrix;
        }
    }

    pub fn material_for(&self, id: ObjectId) -> Option<&Material> {
        let name = self.object(id)?.material.as_deref()?;
        self.material_manager.get_material(name)
    }

    /// Colors an object is drawn with: its material, under the nearest
    /// highlight found on the object or one of its ancestors
    pub fn appearance(&self, id: ObjectId) -> Option<Appearance> {
        let base = self
            .material_for(id)
            .map(Appearance::from)
            .unwrap_or_default();

        let mut current = Some(id);
        while let Some(next) = current {
            let object = self.object(next)?;
            if let Some(highlight) = object.highlight {
                return Some(highlight.apply(base));
            }
            current = object.parent;
        }
        Some(base)
    }

    /// Applies every object's constant spin once
    pub fn advance_spins(&mut self) {
        for object in self.objects.iter_mut() {
            if let Some(spin) = object.spin {
                object.transform.rotation += spin;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{resources::material::Highlight, scene::object::Geometry};
    use cgmath::InnerSpace;

    fn scene_with_group() -> (Scene, ObjectId, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        scene.add_material(Material::from_hex("wall", 0x888888));
        let group = scene
            .add(Object::builder("group", Geometry::Group).position(10.0, 0.0, 0.0))
            .unwrap();
        let left = scene
            .add(
                Object::builder("left", Geometry::cuboid(2.0, 2.0, 2.0))
                    .position(-3.0, 1.0, 0.0)
                    .material("wall")
                    .parent(group),
            )
            .unwrap();
        let right = scene
            .add(
                Object::builder("right", Geometry::cuboid(2.0, 4.0, 2.0))
                    .position(3.0, 2.0, 0.0)
                    .material("wall")
                    .parent(group),
            )
            .unwrap();
        (scene, group, left, right)
    }

    #[test]
    fn unknown_material_is_rejected() {
        let mut scene = Scene::new();
        let result = scene.add(Object::builder("box", Geometry::cuboid(1.0, 1.0, 1.0)).material("nope"));
        assert_eq!(result, Err(SceneError::UnknownMaterial("nope".to_string())));
        assert!(scene.is_empty());
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut scene = Scene::new();
        let result = scene.add(Object::builder("box", Geometry::Group).parent(ObjectId(4)));
        assert_eq!(result, Err(SceneError::UnknownParent(ObjectId(4))));
    }

    #[test]
    fn world_position_composes_parents() {
        let (scene, group, left, _) = scene_with_group();
        let position = scene.world_position(left).unwrap();
        assert!((position - Vector3::new(7.0, 1.0, 0.0)).magnitude() < 1e-6);
        assert_eq!(scene.roots(), &[group]);
        assert_eq!(scene.descendants(group).len(), 2);
    }

    #[test]
    fn group_bounds_cover_children_in_group_frame() {
        let (mut scene, group, _, _) = scene_with_group();
        scene.object_mut(group).unwrap().transform.set_uniform_scale(3.0);

        let bounds = scene.local_bounds(group).unwrap();
        assert!((bounds.min - Vector3::new(-4.0, 0.0, -1.0)).magnitude() < 1e-5);
        assert!((bounds.max - Vector3::new(4.0, 4.0, 1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn shared_material_is_reachable_from_every_part() {
        let (scene, group, left, right) = scene_with_group();
        let wall = scene.material_manager.get_material("wall").unwrap();
        assert_eq!(scene.material_for(left), Some(wall));
        assert_eq!(scene.material_for(right), Some(wall));
        assert!(scene.material_for(group).is_none());
    }

    #[test]
    fn group_highlight_covers_parts_without_touching_materials() {
        let (mut scene, group, left, right) = scene_with_group();
        let outside = scene
            .add(Object::builder("outside", Geometry::cuboid(1.0, 1.0, 1.0)).material("wall"))
            .unwrap();
        let wall = Appearance::from(scene.material_manager.get_material("wall").unwrap());

        scene.object_mut(group).unwrap().highlight = Some(Highlight {
            fill: [1.0, 1.0, 0.0],
            emissive: [1.0, 0.4, 0.0],
        });
        for part in [left, right] {
            assert_eq!(scene.appearance(part).unwrap().base_color, [1.0, 1.0, 0.0, 1.0]);
        }
        assert_eq!(scene.appearance(outside), Some(wall));
        assert_eq!(Appearance::from(scene.material_for(left).unwrap()), wall);

        scene.object_mut(group).unwrap().highlight = None;
        assert_eq!(scene.appearance(left), Some(wall));
        assert!(scene.appearance(ObjectId(99)).is_none());
    }

    #[test]
    fn spins_accumulate_each_frame() {
        let mut scene = Scene::new();
        let id = scene
            .add(Object::builder("torus", Geometry::Torus { radius: 1.0, tube: 0.4 }).spin(0.01, 0.0, 0.0))
            .unwrap();
        scene.advance_spins();
        scene.advance_spins();
        let rotation = scene.object(id).unwrap().transform.rotation;
        assert!((rotation.x - 0.02).abs() < 1e-6);
    }
}
