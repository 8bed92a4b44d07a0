//! Core rendering functionality
//!
//! Handles the render pipeline, GPU resource management, and frame rendering.

pub mod instanced_renderer;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use instanced_renderer::SceneRenderer;
pub use render_engine::{RenderEngine, RenderError};
pub use vertex::{InstanceData, Vertex3D};
