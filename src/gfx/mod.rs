//! # Graphics Module
//!
//! This module contains the scene graph, the picking engine, the orbit
//! camera and the wgpu renderer.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Eased orbit camera driven by drags and wheel steps
//! - **Picking** ([`picking`]) - Pointer ray casting, selection highlight and pulse
//! - **Scene Management** ([`scene`]) - Object hierarchy with analytic geometry
//! - **Resource Management** ([`resources`]) - Materials, lights and GPU uniforms
//! - **Geometry** ([`geometry`]) - Procedural meshes for the renderer
//! - **Rendering Pipeline** ([`rendering`]) - Instanced Lambert shading with depth testing
//!
//! ## Usage
//!
//! ```no_run
//! use vantage::gfx::{scene::{Geometry, Object, Scene}, OrbitCamera};
//!
//! let mut scene = Scene::new();
//! scene.add(Object::builder("box", Geometry::cuboid(1.0, 1.0, 1.0))).unwrap();
//! let camera = OrbitCamera::default();
//! // let render_engine = RenderEngine::new(window, width, height).await?;
//! ```

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
