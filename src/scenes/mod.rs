//! Ready-to-run stages
//!
//! Each builder returns a [`Stage`]: the scene, the camera looking at it, the
//! objects the pointer may pick, the lights and the driver animating it.

pub mod box_field;
pub mod campus;
pub mod spinning;

use crate::{
    app::SceneDriver,
    gfx::{
        camera::OrbitCamera,
        picking::PickTargets,
        resources::{hex_to_rgb, LightRig},
        scene::Scene,
    },
};

pub use box_field::{build_box_field, BoxFieldSettings, InspectorDriver};
pub use campus::{build_campus, CampusDriver};
pub use spinning::{build_spinning_tori, SpinningDriver};

pub struct Stage {
    pub scene: Scene,
    pub camera: OrbitCamera,
    pub targets: PickTargets,
    pub lights: LightRig,
    pub background: wgpu::Color,
    pub driver: Box<dyn SceneDriver>,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("title", &self.driver.title())
            .field("objects", &self.scene.len())
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

/// Clear color from a `0xRRGGBB` literal
pub fn clear_color(hex: u32) -> wgpu::Color {
    let [r, g, b] = hex_to_rgb(hex);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
