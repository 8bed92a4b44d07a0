//! Campus stage: a composite Rectorate building that reacts to hover and
//! clicks, with flags, trees and a pulsing light around it

use cgmath::{Deg, Vector3};
use rand::Rng;
use std::{
    f32::consts::{FRAC_PI_2, TAU},
    time::Duration,
};

use super::{clear_color, Stage};
use crate::{
    app::SceneDriver,
    frame_loop::FrameTick,
    gfx::{
        camera::{OrbitCamera, OrbitCameraBounds},
        picking::PickTargets,
        resources::{hex_to_rgb, DirectionalLight, LightRig, Material, PointLight},
        scene::{Geometry, Object, ObjectId, Scene, SceneError},
    },
    interaction::InteractionEvent,
};

pub const RECTORATE_NAME: &str = "SEEU Rectorate Building";
pub const DEFAULT_BANNER: &str =
    "Click Rectorate to highlight it • Press L to toggle lights • Hover for info";

const ORBIT_RADIUS: f32 = 80.0;
const ORBIT_HEIGHT: f32 = 25.0;
const LOOK_AT_HEIGHT: f32 = 8.0;

/// Animation time added each frame
const TIME_STEP: f32 = 0.01;
const POINT_INTENSITY: f32 = 1.5;
const DIRECTIONAL_ON: f32 = 0.8;
const DIRECTIONAL_OFF: f32 = 0.2;
const LEAF_SPIN: f32 = 0.002;

const FLAG_REST_X: f32 = 2.0;
const FLAGS: [(f32, u32, &str); 5] = [
    (-12.0, 0xff0000, "North Macedonia"),
    (-6.0, 0x0000ff, "European Union"),
    (0.0, 0xffffff, "SEEU"),
    (6.0, 0x00ff00, "Albania"),
    (12.0, 0xffff00, "Kosovo"),
];
const FLAG_ROW_Z: f32 = 27.0;

const TREES: [(f32, f32); 6] = [
    (-35.0, 15.0),
    (35.0, 15.0),
    (-30.0, 40.0),
    (30.0, 40.0),
    (-25.0, -10.0),
    (25.0, -10.0),
];

fn materials(scene: &mut Scene) {
    for (name, hex) in [
        ("grass", 0x2d5a2d),
        ("brick", 0x8b4513),
        ("concrete", 0xcccccc),
        ("entrance", 0xe8d4a0),
        ("road", 0x3a3a3a),
        ("monument", 0x8b7355),
        ("pole", 0xcccccc),
        ("trunk", 0x4a2511),
        ("leaves", 0x2d5a2d),
    ] {
        scene.add_material(Material::from_hex(name, hex));
    }
    scene.add_material(Material::from_hex("glass", 0x333333).with_opacity(0.7));
    for (_, hex, country) in FLAGS {
        scene.add_material(Material::from_hex(country, hex));
    }
}

/// The building is one group; a highlight set on the group covers every part
fn rectorate(scene: &mut Scene) -> Result<ObjectId, SceneError> {
    let group = scene.add(Object::builder(RECTORATE_NAME, Geometry::Group))?;

    scene.add(
        Object::builder("Main building", Geometry::cuboid(25.0, 25.0, 20.0))
            .position(0.0, 12.5, 0.0)
            .material("brick")
            .parent(group),
    )?;
    for (side, x) in [("Left wing", -18.0), ("Right wing", 18.0)] {
        scene.add(
            Object::builder(side, Geometry::cuboid(15.0, 15.0, 15.0))
                .position(x, 7.5, 0.0)
                .material("concrete")
                .parent(group),
        )?;
    }
    scene.add(
        Object::builder("Entrance", Geometry::cuboid(8.0, 12.0, 5.0))
            .position(0.0, 6.0, 12.5)
            .material("entrance")
            .parent(group),
    )?;

    let window = |x: f32, y: f32, z: f32| {
        Object::builder("Window", Geometry::cuboid(2.5, 2.5, 0.2))
            .position(x, y, z)
            .material("glass")
            .parent(group)
    };
    for floor in 0..5 {
        for col in 0..6 {
            scene.add(window(
                -10.0 + col as f32 * 4.0,
                3.0 + floor as f32 * 4.5,
                10.1,
            ))?;
        }
    }
    for floor in 0..3 {
        for col in 0..3 {
            let y = 2.0 + floor as f32 * 4.5;
            scene.add(window(-22.0 + col as f32 * 4.0, y, 7.6))?;
            scene.add(window(14.0 + col as f32 * 4.0, y, 7.6))?;
        }
    }
    Ok(group)
}

fn grounds(scene: &mut Scene) -> Result<(), SceneError> {
    scene.add(
        Object::builder("Grass", Geometry::Plane { width: 120.0, height: 120.0 })
            .rotation(-FRAC_PI_2, 0.0, 0.0)
            .material("grass"),
    )?;

    let roundabout = scene.add(Object::builder("Roundabout", Geometry::Group).position(
        0.0, 0.1, 35.0,
    ))?;
    scene.add(
        Object::builder(
            "Roundabout road",
            Geometry::Ring {
                inner_radius: 10.0,
                outer_radius: 14.0,
            },
        )
        .rotation(-FRAC_PI_2, 0.0, 0.0)
        .material("road")
        .parent(roundabout),
    )?;
    scene.add(
        Object::builder(
            "Grass island",
            Geometry::Ring {
                inner_radius: 0.0,
                outer_radius: 10.0,
            },
        )
        .rotation(-FRAC_PI_2, 0.0, 0.0)
        .material("grass")
        .parent(roundabout),
    )?;
    scene.add(
        Object::builder(
            "Monument",
            Geometry::Cylinder {
                radius_top: 1.0,
                radius_bottom: 1.5,
                height: 4.0,
            },
        )
        .position(0.0, 2.0, 0.0)
        .material("monument")
        .parent(roundabout),
    )?;

    for (name, length, z) in [("Road to building", 22.0, 24.0), ("Entrance road", 30.0, 64.0)] {
        scene.add(
            Object::builder(name, Geometry::Plane { width: 8.0, height: length })
                .position(0.0, 0.05, z)
                .rotation(-FRAC_PI_2, 0.0, 0.0)
                .material("road"),
        )?;
    }
    Ok(())
}

/// One pole group per country; returns each flag with its wave phase
fn flag_poles(scene: &mut Scene, rng: &mut impl Rng) -> Result<Vec<(ObjectId, f32)>, SceneError> {
    let mut flags = Vec::with_capacity(FLAGS.len());
    for (x, _, country) in FLAGS {
        let pole = scene.add(
            Object::builder(format!("{country} flag pole"), Geometry::Group)
                .position(x, 0.0, FLAG_ROW_Z),
        )?;
        scene.add(
            Object::builder(
                "Pole",
                Geometry::Cylinder {
                    radius_top: 0.15,
                    radius_bottom: 0.15,
                    height: 14.0,
                },
            )
            .position(0.0, 7.0, 0.0)
            .material("pole")
            .parent(pole),
        )?;
        scene.add(
            Object::builder(
                "Pole base",
                Geometry::Cylinder {
                    radius_top: 0.4,
                    radius_bottom: 0.5,
                    height: 0.5,
                },
            )
            .position(0.0, 0.25, 0.0)
            .material("pole")
            .parent(pole),
        )?;
        let flag = scene.add(
            Object::builder(country, Geometry::Plane { width: 4.0, height: 2.5 })
                .position(FLAG_REST_X, 12.0, 0.0)
                .material(country)
                .parent(pole),
        )?;
        flags.push((flag, rng.random::<f32>() * TAU));
    }
    Ok(flags)
}

fn trees(scene: &mut Scene) -> Result<(), SceneError> {
    for (index, (x, z)) in TREES.into_iter().enumerate() {
        scene.add(
            Object::builder(
                "Trunk",
                Geometry::Cylinder {
                    radius_top: 0.4,
                    radius_bottom: 0.5,
                    height: 4.0,
                },
            )
            .position(x, 2.0, z)
            .material("trunk"),
        )?;
        let direction = if index % 2 == 0 { 1.0 } else { -1.0 };
        scene.add(
            Object::builder("Leaves", Geometry::Sphere { radius: 2.5 })
                .position(x, 5.0, z)
                .spin(0.0, LEAF_SPIN * direction, 0.0)
                .material("leaves"),
        )?;
    }
    Ok(())
}

fn lights() -> LightRig {
    LightRig::default()
        .with_ambient(0.4)
        .with_directional(DirectionalLight {
            position: Vector3::new(40.0, 60.0, 30.0),
            color: [1.0, 1.0, 1.0],
            intensity: DIRECTIONAL_ON,
        })
        .with_point(PointLight {
            position: Vector3::new(0.0, 20.0, 0.0),
            color: hex_to_rgb(0xffaa00),
            intensity: POINT_INTENSITY,
            range: 60.0,
        })
}

/// The campus stage; only the Rectorate (as a whole) can be picked
pub fn build_campus(rng: &mut impl Rng) -> Result<Stage, SceneError> {
    let mut scene = Scene::new();
    materials(&mut scene);
    grounds(&mut scene)?;
    let rectorate = rectorate(&mut scene)?;
    let flags = flag_poles(&mut scene, rng)?;
    trees(&mut scene)?;
    log::info!("campus: {} objects", scene.len());

    let camera = OrbitCamera::new(ORBIT_RADIUS, Vector3::new(0.0, ORBIT_HEIGHT, 0.0), 16.0 / 9.0)
        .with_look_at(Vector3::new(0.0, LOOK_AT_HEIGHT, 0.0))
        .with_fovy(Deg(60.0))
        .with_bounds(OrbitCameraBounds::default().with_distance(20.0, 200.0));

    Ok(Stage {
        scene,
        camera,
        targets: PickTargets::Recursive(vec![rectorate]),
        lights: lights(),
        background: clear_color(0x87ceeb),
        driver: Box::new(CampusDriver::new(flags)),
    })
}

/// Waves the flags, pulses the point light, toggles the lights on `L` and
/// keeps the banner text
#[derive(Debug)]
pub struct CampusDriver {
    flags: Vec<(ObjectId, f32)>,
    time: f32,
    lights_on: bool,
    banner: String,
    /// When a transient banner falls back to the default text
    banner_expires: Option<Duration>,
}

impl CampusDriver {
    pub fn new(flags: Vec<(ObjectId, f32)>) -> Self {
        Self {
            flags,
            time: 0.0,
            lights_on: true,
            banner: DEFAULT_BANNER.to_string(),
            banner_expires: None,
        }
    }

    pub fn banner(&self) -> &str {
        &self.banner
    }

    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    fn set_banner(&mut self, text: impl Into<String>, expires: Option<Duration>) {
        let text = text.into();
        if text != self.banner {
            log::info!("{text}");
        }
        self.banner = text;
        self.banner_expires = expires;
    }

    fn toggle_lights(&mut self, lights: &mut LightRig, now: Duration) {
        self.lights_on = !self.lights_on;
        lights.directional.intensity = if self.lights_on {
            DIRECTIONAL_ON
        } else {
            DIRECTIONAL_OFF
        };
        lights.point.intensity = if self.lights_on { POINT_INTENSITY } else { 0.0 };
        let state = if self.lights_on { "ON" } else { "OFF" };
        self.set_banner(
            format!("Lights {state}"),
            Some(now + Duration::from_millis(1500)),
        );
    }
}

impl SceneDriver for CampusDriver {
    fn title(&self) -> &str {
        "SEEU Campus"
    }

    fn frame(&mut self, scene: &mut Scene, lights: &mut LightRig, tick: &FrameTick) {
        self.time += TIME_STEP;

        for &(flag, phase) in &self.flags {
            let wave = ((self.time + phase) * 2.0).sin();
            if let Some(object) = scene.object_mut(flag) {
                object.transform.rotation.y = wave * 0.2;
                object.transform.position.x = FLAG_REST_X + wave * 0.3;
            }
        }

        if self.lights_on {
            lights.point.intensity = POINT_INTENSITY + (self.time * 3.0).sin() * 0.4;
        }

        if self.banner_expires.is_some_and(|at| tick.now >= at) {
            self.set_banner(DEFAULT_BANNER, None);
        }
    }

    fn on_event(
        &mut self,
        event: &InteractionEvent,
        scene: &mut Scene,
        lights: &mut LightRig,
        now: Duration,
    ) {
        match event {
            InteractionEvent::HoverChanged(Some(id)) => {
                let name = scene.object(*id).map_or(RECTORATE_NAME, |o| o.name.as_str());
                let text = format!("Hovering: {name}");
                self.set_banner(text, None);
            }
            InteractionEvent::HoverChanged(None) => self.set_banner(DEFAULT_BANNER, None),
            InteractionEvent::SelectionChanged(Some(info)) => {
                log::debug!("selected {info}");
                self.set_banner(
                    format!("{} - highlighted", info.name),
                    Some(now + Duration::from_secs(2)),
                );
            }
            InteractionEvent::SelectionChanged(None) => {}
            InteractionEvent::KeyPressed('l' | 'L') => self.toggle_lights(lights, now),
            InteractionEvent::KeyPressed(_) => {}
        }
    }

    fn status(&self) -> Option<&str> {
        Some(&self.banner)
    }
}
