//! Three tori turning at fixed per-axis rates

use cgmath::{Vector3, Zero};

use super::{clear_color, Stage};
use crate::{
    app::SceneDriver,
    gfx::{
        camera::OrbitCamera,
        picking::PickTargets,
        resources::{DirectionalLight, LightRig, Material},
        scene::{Geometry, Object, Scene, SceneError},
    },
};

const TORUS: Geometry = Geometry::Torus {
    radius: 1.0,
    tube: 0.4,
};

/// x offset, color and spin in radians per frame
const TORI: [(f32, u32, [f32; 3]); 3] = [
    (0.0, 0xffaa00, [0.01, 0.01, 0.005]),
    (3.0, 0x00aaff, [-0.01, -0.01, -0.005]),
    (-3.0, 0xaaff00, [0.01, 0.0, 0.0]),
];

pub fn build_spinning_tori() -> Result<Stage, SceneError> {
    let mut scene = Scene::new();
    let mut tori = Vec::with_capacity(TORI.len());
    for (i, (x, hex, [sx, sy, sz])) in TORI.into_iter().enumerate() {
        let name = format!("Torus {}", i + 1);
        scene.add_material(Material::from_hex(&name, hex));
        tori.push(scene.add(
            Object::builder(name.clone(), TORUS)
                .position(x, 0.0, 0.0)
                .spin(sx, sy, sz)
                .material(name),
        )?);
    }

    let mut lights = LightRig::default()
        .with_ambient(0.15)
        .with_directional(DirectionalLight {
            position: Vector3::new(2.0, 5.0, 5.0),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        });
    lights.point.intensity = 0.0;

    Ok(Stage {
        scene,
        camera: OrbitCamera::new(5.0, Vector3::zero(), 16.0 / 9.0),
        targets: PickTargets::Flat(tori),
        lights,
        background: clear_color(0x202020),
        driver: Box::new(SpinningDriver),
    })
}

/// Spins live on the objects themselves, so the driver only names the stage
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinningDriver;

impl SceneDriver for SpinningDriver {
    fn title(&self) -> &str {
        "Spinning Tori"
    }
}
