//! Composition of camera control, picking, selection, hover and keys
//!
//! [`InteractionController`] consumes the [`InputEvent`] stream and one
//! [`FrameTick`] per frame. Camera control and picking see the same events
//! but share no state.

use std::time::Duration;

use crate::{
    frame_loop::FrameTick,
    gfx::{
        camera::{CameraController, CameraManager, OrbitCamera},
        picking::{HoverTracker, ObjectPicker, PickTargets, SelectionInfo, SelectionManager},
        scene::{ObjectId, Scene},
    },
    input::InputEvent,
};

/// What the presentation layer should react to
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    SelectionChanged(Option<SelectionInfo>),
    HoverChanged(Option<ObjectId>),
    KeyPressed(char),
}

#[derive(Debug)]
pub struct InteractionController {
    pub camera: CameraManager,
    pub picker: ObjectPicker,
    pub selection: SelectionManager,
    pub targets: PickTargets,
    hover: HoverTracker,
    viewport: (f32, f32),
}

impl InteractionController {
    pub fn new(camera: OrbitCamera, targets: PickTargets, viewport: (u32, u32)) -> Self {
        let mut controller = Self {
            camera: CameraManager::new(camera, CameraController::default()),
            picker: ObjectPicker::new(),
            selection: SelectionManager::default(),
            targets,
            hover: HoverTracker::new(),
            viewport: (0.0, 0.0),
        };
        controller.resize(viewport.0, viewport.1);
        controller
    }

    pub fn with_controller(mut self, controller: CameraController) -> Self {
        self.camera.controller = controller;
        self
    }

    pub fn with_selection(mut self, selection: SelectionManager) -> Self {
        self.selection = selection;
        self
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.hover.hovered()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
        self.camera.camera.resize_projection(width, height);
    }

    /// Routes one input event; input never fails
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        scene: &mut Scene,
        now: Duration,
    ) -> Vec<InteractionEvent> {
        self.camera.process_event(event);

        let mut events = Vec::new();
        match *event {
            InputEvent::Click { x, y } => {
                let hit = self.pick_candidate((x, y), scene);
                let info = self.selection.handle_selection(scene, hit, now);
                events.push(InteractionEvent::SelectionChanged(info));
            }
            InputEvent::PointerMove { x, y } => {
                let hit = self.pick_candidate((x, y), scene);
                if let Some(changed) = self.hover.update(hit) {
                    log::debug!("hover changed to {changed:?}");
                    events.push(InteractionEvent::HoverChanged(changed));
                }
            }
            InputEvent::KeyPress(key) => events.push(InteractionEvent::KeyPressed(key)),
            InputEvent::Resized { width, height } => self.resize(width, height),
            _ => {}
        }
        events
    }

    /// Per-frame update: ease the camera and advance the pulse
    pub fn tick(&mut self, scene: &mut Scene, tick: &FrameTick) {
        self.camera.update(tick.dt());
        self.selection.advance(scene, tick.now);
    }

    fn pick_candidate(&self, pointer: (f32, f32), scene: &Scene) -> Option<ObjectId> {
        // A minimized window has no pixels to pick from
        if self.viewport.0 <= 0.0 || self.viewport.1 <= 0.0 {
            return None;
        }
        self.picker
            .pick(pointer, self.viewport, &self.camera.camera, scene, &self.targets)
            .map(|hit| hit.candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        frame_loop::{FrameLoop, ManualClock},
        gfx::{
            camera::Camera,
            picking::HighlightStyle,
            resources::Material,
            scene::{Geometry, Object},
        },
        input::PointerButton,
    };
    use cgmath::{Vector3, Vector4, Zero};

    const VIEWPORT: (u32, u32) = (800, 600);

    /// 20 unit boxes on a 5 x 4 grid in the z = 0 plane
    fn box_grid() -> (Scene, Vec<ObjectId>) {
        let mut scene = Scene::new();
        let mut ids = Vec::new();
        for i in 0..20 {
            let name = format!("Box {i}");
            scene.add_material(Material::from_hex(&name, 0x2266aa));
            let x = (i % 5) as f32 * 4.0 - 8.0;
            let y = (i / 5) as f32 * 4.0 - 6.0;
            let id = scene
                .add(
                    Object::builder(name.clone(), Geometry::cuboid(1.0, 1.0, 1.0))
                        .position(x, y, 0.0)
                        .material(name),
                )
                .unwrap();
            ids.push(id);
        }
        (scene, ids)
    }

    fn project(camera: &OrbitCamera, point: Vector3<f32>) -> (f32, f32) {
        let clip = camera.build_view_projection_matrix() * Vector4::new(point.x, point.y, point.z, 1.0);
        let (ndc_x, ndc_y) = (clip.x / clip.w, clip.y / clip.w);
        (
            (ndc_x + 1.0) * 0.5 * VIEWPORT.0 as f32,
            (1.0 - ndc_y) * 0.5 * VIEWPORT.1 as f32,
        )
    }

    fn controller(ids: &[ObjectId]) -> InteractionController {
        let camera = OrbitCamera::new(40.0, Vector3::zero(), 1.0);
        InteractionController::new(camera, PickTargets::Flat(ids.to_vec()), VIEWPORT)
    }

    #[test]
    fn clicking_box_seven_selects_it() {
        let (mut scene, ids) = box_grid();
        let mut interaction = controller(&ids);
        let (x, y) = project(&interaction.camera.camera, scene.world_position(ids[7]).unwrap());

        let events = interaction.handle_event(&InputEvent::Click { x, y }, &mut scene, Duration::ZERO);
        let [InteractionEvent::SelectionChanged(Some(info))] = events.as_slice() else {
            panic!("expected a selection, got {events:?}");
        };
        assert_eq!(info.name, "Box 7");
        assert_eq!(info.position, [0.0, -2.0, 0.0]);
        assert_eq!(info.size, [1.0, 1.0, 1.0]);
        assert_eq!(interaction.selection.selected(), Some(ids[7]));
        assert_eq!(scene.appearance(ids[7]).unwrap().base_color, [1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn clicking_empty_space_clears_selection() {
        let (mut scene, ids) = box_grid();
        let original = scene.appearance(ids[7]).unwrap();
        let mut interaction = controller(&ids);
        let (x, y) = project(&interaction.camera.camera, scene.world_position(ids[7]).unwrap());

        interaction.handle_event(&InputEvent::Click { x, y }, &mut scene, Duration::ZERO);
        // Between boxes 7 and 8
        let (gap_x, gap_y) = project(&interaction.camera.camera, Vector3::new(2.0, -2.0, 0.0));
        let events = interaction.handle_event(
            &InputEvent::Click { x: gap_x, y: gap_y },
            &mut scene,
            Duration::from_millis(30),
        );

        assert_eq!(events, vec![InteractionEvent::SelectionChanged(None)]);
        assert_eq!(scene.appearance(ids[7]).unwrap(), original);
    }

    #[test]
    fn hover_reports_changes_only() {
        let (mut scene, ids) = box_grid();
        let mut interaction = controller(&ids);
        let (x, y) = project(&interaction.camera.camera, scene.world_position(ids[3]).unwrap());

        let first = interaction.handle_event(&InputEvent::PointerMove { x, y }, &mut scene, Duration::ZERO);
        assert_eq!(first, vec![InteractionEvent::HoverChanged(Some(ids[3]))]);
        let again = interaction.handle_event(
            &InputEvent::PointerMove { x: x + 1.0, y },
            &mut scene,
            Duration::ZERO,
        );
        assert!(again.is_empty());
        assert_eq!(interaction.hovered(), Some(ids[3]));
    }

    #[test]
    fn drag_then_ticks_orbit_the_camera() {
        let (mut scene, ids) = box_grid();
        let mut interaction = controller(&ids);
        let start = interaction.camera.camera.eye;

        let press = InputEvent::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Primary,
        };
        interaction.handle_event(&press, &mut scene, Duration::ZERO);
        interaction.handle_event(&InputEvent::PointerMove { x: 300.0, y: 100.0 }, &mut scene, Duration::ZERO);

        let mut frames = FrameLoop::new(ManualClock::sixty_hz());
        frames.run_until_cancelled(|tick, cancel| {
            interaction.tick(&mut scene, tick);
            if tick.index == 200 {
                cancel.cancel();
            }
        });

        let camera = &interaction.camera.camera;
        assert!((camera.azimuth - 1.0).abs() < 1e-3);
        assert!((camera.eye - start).x > 30.0);
        assert_eq!(camera.pose().look_at, Vector3::zero());
    }

    #[test]
    fn pulse_finishes_through_ticks() {
        let (mut scene, ids) = box_grid();
        let mut interaction = controller(&ids);
        let (x, y) = project(&interaction.camera.camera, scene.world_position(ids[7]).unwrap());
        interaction.handle_event(&InputEvent::Click { x, y }, &mut scene, Duration::ZERO);

        let mut frames = FrameLoop::new(ManualClock::sixty_hz());
        let mut peak: f32 = 0.0;
        frames.run_until_cancelled(|tick, cancel| {
            interaction.tick(&mut scene, tick);
            peak = peak.max(scene.object(ids[7]).unwrap().transform.scale.x);
            if tick.now > Duration::from_millis(400) {
                cancel.cancel();
            }
        });

        assert!(peak > 1.15 && peak <= 1.2);
        assert!(interaction.selection.active_pulse().is_none());
        assert!((scene.object(ids[7]).unwrap().transform.scale.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn keys_and_resizes_are_forwarded() {
        let (mut scene, ids) = box_grid();
        let mut interaction = controller(&ids);
        let events = interaction.handle_event(&InputEvent::KeyPress('l'), &mut scene, Duration::ZERO);
        assert_eq!(events, vec![InteractionEvent::KeyPressed('l')]);

        interaction.handle_event(
            &InputEvent::Resized {
                width: 1024,
                height: 512,
            },
            &mut scene,
            Duration::ZERO,
        );
        assert_eq!(interaction.viewport(), (1024.0, 512.0));
        assert!((interaction.camera.camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn custom_controller_and_selection_are_used() {
        let (mut scene, ids) = box_grid();
        let style = HighlightStyle {
            fill: 0x00ff00,
            emissive: 0x000000,
        };
        let mut interaction = controller(&ids)
            .with_controller(CameraController::new(0.002).with_zoom_factors(0.5, 2.0))
            .with_selection(SelectionManager::new(style, Default::default()));

        let press = InputEvent::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Primary,
        };
        interaction.handle_event(&press, &mut scene, Duration::ZERO);
        interaction.handle_event(&InputEvent::PointerMove { x: 200.0, y: 100.0 }, &mut scene, Duration::ZERO);
        interaction.handle_event(
            &InputEvent::PointerUp {
                x: 200.0,
                y: 100.0,
                button: PointerButton::Primary,
            },
            &mut scene,
            Duration::ZERO,
        );
        assert!((interaction.camera.camera.target_azimuth - 0.2).abs() < 1e-5);

        interaction.handle_event(&InputEvent::Wheel { delta_y: -1.0 }, &mut scene, Duration::ZERO);
        assert!((interaction.camera.camera.distance - 20.0).abs() < 1e-4);

        let (x, y) = project(&interaction.camera.camera, scene.world_position(ids[7]).unwrap());
        interaction.handle_event(&InputEvent::Click { x, y }, &mut scene, Duration::ZERO);
        assert_eq!(scene.appearance(ids[7]).unwrap().base_color, [0.0, 1.0, 0.0, 1.0]);
    }
}
