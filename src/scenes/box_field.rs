//! Inspector stage: a random field of spinning boxes, each selectable

use cgmath::{Vector3, Zero};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

use super::{clear_color, Stage};
use crate::{
    app::SceneDriver,
    gfx::{
        camera::OrbitCamera,
        picking::{PickTargets, SelectionInfo},
        resources::{LightRig, Material},
        scene::{Geometry, Object, ObjectId, Scene, SceneError},
    },
    interaction::InteractionEvent,
};

/// Environment variable that fixes the field's seed
pub const SEED_VAR: &str = "VANTAGE_SEED";

const BASE_SPIN: f32 = 0.001;
const DRIFT_RADIUS: f32 = 30.0;
const DRIFT_HEIGHT: f32 = 10.0;
/// Azimuth drift of the camera, radians per second
const DRIFT_SPEED: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxFieldSettings {
    pub count: usize,
    pub min_size: f32,
    pub max_size: f32,
    /// Full extent of the volume the boxes are centered in
    pub spread: Vector3<f32>,
    /// `None` draws a fresh seed
    pub seed: Option<u64>,
}

impl Default for BoxFieldSettings {
    fn default() -> Self {
        Self {
            count: 20,
            min_size: 1.0,
            max_size: 4.0,
            spread: Vector3::new(40.0, 20.0, 40.0),
            seed: None,
        }
    }
}

impl BoxFieldSettings {
    /// Defaults, with the seed taken from `VANTAGE_SEED` when it parses
    pub fn from_env() -> Self {
        let seed = std::env::var(SEED_VAR).ok().and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                log::warn!("ignoring {SEED_VAR}={raw:?}: not an unsigned integer");
                None
            }
        });
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.min_size = min.min(max);
        self.max_size = max.max(min);
        self
    }

    pub fn with_spread(mut self, x: f32, y: f32, z: f32) -> Self {
        self.spread = Vector3::new(x, y, z);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Adds `settings.count` boxes named `Box 1`, `Box 2`, ... to `scene`, each
/// with its own material
pub fn populate_boxes(
    scene: &mut Scene,
    settings: &BoxFieldSettings,
    rng: &mut impl Rng,
) -> Result<Vec<ObjectId>, SceneError> {
    let mut ids = Vec::with_capacity(settings.count);
    for i in 0..settings.count {
        let name = format!("Box {}", i + 1);
        let mut size = || {
            if settings.max_size > settings.min_size {
                rng.random_range(settings.min_size..settings.max_size)
            } else {
                settings.min_size
            }
        };
        let (width, height, depth) = (size(), size(), size());

        let color = [rng.random(), rng.random(), rng.random(), 1.0];
        scene.add_material(Material::new(&name, color));

        let x = (rng.random::<f32>() - 0.5) * settings.spread.x;
        let y = (rng.random::<f32>() - 0.5) * settings.spread.y;
        let z = (rng.random::<f32>() - 0.5) * settings.spread.z;
        let rx = rng.random::<f32>() * std::f32::consts::PI;
        let ry = rng.random::<f32>() * std::f32::consts::PI;

        let spin = BASE_SPIN * (1.0 + i as f32 * 0.1);
        let id = scene.add(
            Object::builder(name.clone(), Geometry::cuboid(width, height, depth))
                .position(x, y, z)
                .rotation(rx, ry, 0.0)
                .spin(spin, spin, 0.0)
                .material(name),
        )?;
        ids.push(id);
    }
    Ok(ids)
}

/// The inspector stage: boxes, a drifting camera and the default light rig
pub fn build_box_field(settings: &BoxFieldSettings) -> Result<Stage, SceneError> {
    let seed = settings.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut scene = Scene::new();
    let boxes = populate_boxes(&mut scene, settings, &mut rng)?;
    log::info!("box field: {} boxes, seed {seed}", boxes.len());

    let distance = DRIFT_RADIUS.hypot(DRIFT_HEIGHT);
    let camera = OrbitCamera::new(distance, Vector3::zero(), 16.0 / 9.0)
        .with_angles(0.0, DRIFT_HEIGHT.atan2(DRIFT_RADIUS))
        .with_auto_rotate(DRIFT_SPEED);

    Ok(Stage {
        scene,
        camera,
        targets: PickTargets::Flat(boxes),
        lights: LightRig::default(),
        background: clear_color(0x1a1a2e),
        driver: Box::new(InspectorDriver::default()),
    })
}

/// Keeps the info panel text for the selected box
#[derive(Debug, Default)]
pub struct InspectorDriver {
    status: Option<String>,
}

impl InspectorDriver {
    pub const PLACEHOLDER: &'static str = "Click a cube to see its information here.";

    fn describe(info: Option<&SelectionInfo>) -> String {
        match info {
            Some(info) => info.to_string(),
            None => Self::PLACEHOLDER.to_string(),
        }
    }
}

impl SceneDriver for InspectorDriver {
    fn title(&self) -> &str {
        "Box Inspector"
    }

    fn on_event(
        &mut self,
        event: &InteractionEvent,
        _scene: &mut Scene,
        _lights: &mut LightRig,
        _now: Duration,
    ) {
        if let InteractionEvent::SelectionChanged(info) = event {
            let text = Self::describe(info.as_ref());
            log::info!("{text}");
            self.status = Some(text);
        }
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_deref().unwrap_or(Self::PLACEHOLDER))
    }
}
