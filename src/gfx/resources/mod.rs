//! Scene resources shared between objects and the GPU: materials, lights,
//! global uniforms and depth textures.

pub mod global_bindings;
pub mod lighting;
pub mod material;
pub mod texture_resource;

pub use lighting::{DirectionalLight, LightRig, PointLight};
pub use material::{hex_to_rgb, Appearance, Highlight, Material, MaterialId, MaterialManager};
