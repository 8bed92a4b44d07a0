//! # Scene Management Module
//!
//! A retained-mode scene graph: objects with transforms and analytic
//! geometry, organized in parent/child hierarchies, with materials stored
//! centrally and referenced by name.
//!
//! ## Key Components
//!
//! - [`Scene`] - The scene container owning objects and materials
//! - [`Object`] - A node with geometry, transform and optional material
//! - [`ObjectBuilder`] - Builder pattern for configuring objects
//! - [`Geometry`] - Intersectable shapes used by picking and rendering
//!
//! ## Usage
//!
//! ```no_run
//! use vantage::gfx::{resources::Material, scene::{Geometry, Object, Scene}};
//!
//! let mut scene = Scene::new();
//! scene.add_material(Material::from_hex("crate", 0xaa7744));
//! let id = scene
//!     .add(Object::builder("crate", Geometry::cuboid(1.0, 1.0, 1.0)).material("crate"))
//!     .unwrap();
//! assert!(scene.object(id).is_some());
//! ```

pub mod object;
pub mod scene;

// Re-export main types
pub use object::{Geometry, Object, ObjectBuilder, ObjectId, Transform};
pub use scene::{Scene, SceneError};
