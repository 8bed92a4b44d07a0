//! Single-object selection with highlight, restore and pulse
//!
//! The highlight is a per-object override ([`Highlight`]) layered over the
//! material, so objects that share a material with the selection keep their
//! own look.

use std::fmt;
use std::time::Duration;

use crate::gfx::{
    resources::material::{hex_to_rgb, Appearance, Highlight},
    scene::{ObjectId, Scene},
};

use super::pulse::{PulseAnimation, PulseSettings};

/// Colors drawn over the selected object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightStyle {
    /// `0xRRGGBB` replacing the base color (opacity is kept)
    pub fill: u32,
    /// `0xRRGGBB` replacing the emissive color
    pub emissive: u32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            fill: 0xffff00,
            emissive: 0xff6600,
        }
    }
}

impl HighlightStyle {
    pub fn highlight(&self) -> Highlight {
        Highlight {
            fill: hex_to_rgb(self.fill),
            emissive: hex_to_rgb(self.emissive),
        }
    }
}

/// State of an object captured right before it is highlighted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppearanceSnapshot {
    /// The object's own override, put back on restore
    pub highlight: Option<Highlight>,
    /// Colors the object was drawn with
    pub appearance: Appearance,
}

/// Summary of the selected object shown by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub object: ObjectId,
    pub name: String,
    /// World position, rounded to two decimals
    pub position: [f32; 3],
    /// Local bounding-box size, rounded to two decimals
    pub size: [f32; 3],
}

impl fmt::Display for SelectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        let [w, h, d] = self.size;
        write!(
            f,
            "{}: position ({x:.2}, {y:.2}, {z:.2}), size {w:.2} x {h:.2} x {d:.2}",
            self.name
        )
    }
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

impl SelectionInfo {
    fn describe(scene: &Scene, id: ObjectId) -> Option<Self> {
        let object = scene.object(id)?;
        let position = scene.world_position(id)?;
        let size = scene
            .local_bounds(id)
            .map(|bounds| bounds.size())
            .unwrap_or_else(cgmath::Zero::zero);
        Some(Self {
            object: id,
            name: object.name.clone(),
            position: [round2(position.x), round2(position.y), round2(position.z)],
            size: [round2(size.x), round2(size.y), round2(size.z)],
        })
    }
}

type SelectionObserver = Box<dyn FnMut(Option<&SelectionInfo>)>;

#[derive(Debug, Clone)]
struct Selected {
    id: ObjectId,
    snapshot: AppearanceSnapshot,
}

/// Owns the current selection and the running pulse
pub struct SelectionManager {
    pub style: HighlightStyle,
    pub pulse_settings: PulseSettings,
    selected: Option<Selected>,
    pulse: Option<PulseAnimation>,
    observers: Vec<SelectionObserver>,
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new(HighlightStyle::default(), PulseSettings::default())
    }
}

impl fmt::Debug for SelectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionManager")
            .field("style", &self.style)
            .field("selected", &self.selected)
            .field("pulse", &self.pulse)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl SelectionManager {
    pub fn new(style: HighlightStyle, pulse_settings: PulseSettings) -> Self {
        Self {
            style,
            pulse_settings,
            selected: None,
            pulse: None,
            observers: Vec::new(),
        }
    }

    /// Registers a callback run after every selection change
    pub fn on_selection_changed<F>(&mut self, observer: F)
    where
        F: FnMut(Option<&SelectionInfo>) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected.as_ref().map(|s| s.id)
    }

    /// Pre-highlight state of the current selection
    pub fn snapshot(&self) -> Option<&AppearanceSnapshot> {
        self.selected.as_ref().map(|s| &s.snapshot)
    }

    pub fn active_pulse(&self) -> Option<&PulseAnimation> {
        self.pulse.as_ref()
    }

    /// Resolves a click: restores the previous selection, then selects and
    /// highlights `hit` (or clears the selection when `hit` is `None`).
    pub fn handle_selection(
        &mut self,
        scene: &mut Scene,
        hit: Option<ObjectId>,
        now: Duration,
    ) -> Option<SelectionInfo> {
        if let Some(previous) = self.selected.take() {
            restore(scene, previous.id, &previous.snapshot);
        }
        if let Some(pulse) = self.pulse.take() {
            pulse.cancel(scene);
        }

        let info = hit.and_then(|id| SelectionInfo::describe(scene, id));
        match &info {
            Some(info) => {
                let id = info.object;
                let snapshot = take_snapshot(scene, id);
                if let Some(object) = scene.object_mut(id) {
                    object.highlight = Some(self.style.highlight());
                }
                self.selected = snapshot.map(|snapshot| Selected { id, snapshot });
                self.pulse = PulseAnimation::start(scene, id, now, self.pulse_settings);
                log::debug!("selected {info}");
            }
            None => log::debug!("selection cleared"),
        }

        for observer in self.observers.iter_mut() {
            observer(info.as_ref());
        }
        info
    }

    /// Advances the pulse, dropping it once finished
    pub fn advance(&mut self, scene: &mut Scene, now: Duration) {
        if let Some(pulse) = &self.pulse {
            if pulse.apply(scene, now) {
                self.pulse = None;
            }
        }
    }
}

fn take_snapshot(scene: &Scene, id: ObjectId) -> Option<AppearanceSnapshot> {
    Some(AppearanceSnapshot {
        highlight: scene.object(id)?.highlight,
        appearance: scene.appearance(id)?,
    })
}

fn restore(scene: &mut Scene, id: ObjectId, snapshot: &AppearanceSnapshot) {
    if let Some(object) = scene.object_mut(id) {
        object.highlight = snapshot.highlight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        resources::Material,
        scene::{Geometry, Object},
    };
    use std::{cell::RefCell, rc::Rc};

    fn two_boxes() -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        scene.add_material(Material::from_hex("a", 0x3366cc).with_emissive([0.1, 0.0, 0.0]));
        scene.add_material(Material::from_hex("b", 0x22aa44));
        let a = scene
            .add(
                Object::builder("Box 1", Geometry::cuboid(1.234, 2.0, 3.0))
                    .position(1.004, -2.0, 3.14159)
                    .material("a"),
            )
            .unwrap();
        let b = scene
            .add(Object::builder("Box 2", Geometry::cuboid(1.0, 1.0, 1.0)).material("b"))
            .unwrap();
        (scene, a, b)
    }

    const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

    #[test]
    fn selecting_and_clearing_restores_exactly() {
        let (mut scene, a, _) = two_boxes();
        let material = scene.material_for(a).unwrap().clone();
        let original = scene.appearance(a).unwrap();
        let mut selection = SelectionManager::default();

        selection.handle_selection(&mut scene, Some(a), Duration::ZERO);
        let highlighted = scene.appearance(a).unwrap();
        assert_eq!(highlighted.base_color, YELLOW);
        assert_eq!(highlighted.emissive, hex_to_rgb(0xff6600));
        assert_eq!(selection.snapshot().map(|s| s.appearance), Some(original));
        assert_eq!(scene.material_for(a).unwrap(), &material);

        assert!(selection.handle_selection(&mut scene, None, Duration::from_millis(10)).is_none());
        assert_eq!(scene.appearance(a).unwrap(), original);
        assert!(scene.object(a).unwrap().highlight.is_none());
        assert_eq!(selection.selected(), None);
        assert!(selection.active_pulse().is_none());
    }

    #[test]
    fn switching_selection_restores_previous_object() {
        let (mut scene, a, b) = two_boxes();
        let original_a = scene.appearance(a).unwrap();
        let mut selection = SelectionManager::default();

        selection.handle_selection(&mut scene, Some(a), Duration::ZERO);
        selection.handle_selection(&mut scene, Some(b), Duration::from_millis(50));

        assert_eq!(scene.appearance(a).unwrap(), original_a);
        assert_eq!(scene.appearance(b).unwrap().base_color, YELLOW);
        assert_eq!(selection.selected(), Some(b));
        assert_eq!(selection.active_pulse().map(|p| p.target), Some(b));
    }

    #[test]
    fn objects_sharing_a_material_highlight_one_at_a_time() {
        let mut scene = Scene::new();
        scene.add_material(Material::from_hex("shared", 0x3366cc));
        let a = scene
            .add(Object::builder("A", Geometry::cuboid(1.0, 1.0, 1.0)).material("shared"))
            .unwrap();
        let b = scene
            .add(
                Object::builder("B", Geometry::cuboid(1.0, 1.0, 1.0))
                    .position(3.0, 0.0, 0.0)
                    .material("shared"),
            )
            .unwrap();
        let shared = scene.material_for(a).unwrap().clone();
        let original = scene.appearance(a).unwrap();
        let mut selection = SelectionManager::default();

        selection.handle_selection(&mut scene, Some(a), Duration::ZERO);
        assert_eq!(scene.appearance(a).unwrap().base_color, YELLOW);
        assert_eq!(scene.appearance(b).unwrap(), original);

        selection.handle_selection(&mut scene, Some(b), Duration::from_millis(30));
        assert_eq!(scene.appearance(a).unwrap(), original);
        assert_eq!(scene.appearance(b).unwrap().base_color, YELLOW);
        assert_eq!(scene.material_for(b).unwrap(), &shared);
    }

    #[test]
    fn reselecting_never_snapshots_the_highlight() {
        let (mut scene, a, _) = two_boxes();
        let original = scene.appearance(a).unwrap();
        let mut selection = SelectionManager::default();

        selection.handle_selection(&mut scene, Some(a), Duration::ZERO);
        selection.handle_selection(&mut scene, Some(a), Duration::from_millis(20));
        assert_eq!(selection.selected(), Some(a));
        assert_eq!(selection.snapshot().map(|s| s.appearance), Some(original));

        selection.handle_selection(&mut scene, None, Duration::from_millis(40));
        assert_eq!(scene.appearance(a).unwrap(), original);
    }

    #[test]
    fn custom_pulse_settings_drive_the_animation() {
        let (mut scene, a, _) = two_boxes();
        let settings = PulseSettings::default()
            .with_duration(Duration::from_millis(100))
            .with_scales(1.0, 2.0);
        let mut selection = SelectionManager::new(HighlightStyle::default(), settings);

        selection.handle_selection(&mut scene, Some(a), Duration::ZERO);
        assert_eq!(selection.active_pulse().map(|p| p.settings), Some(settings));

        selection.advance(&mut scene, Duration::from_millis(50));
        assert!((scene.object(a).unwrap().transform.scale.x - 2.0).abs() < 1e-5);

        selection.advance(&mut scene, Duration::from_millis(120));
        assert!(selection.active_pulse().is_none());
        assert!((scene.object(a).unwrap().transform.scale.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rapid_clicks_keep_a_single_pulse() {
        let (mut scene, a, b) = two_boxes();
        let mut selection = SelectionManager::default();

        selection.handle_selection(&mut scene, Some(a), Duration::ZERO);
        selection.advance(&mut scene, Duration::from_millis(150));
        assert!(scene.object(a).unwrap().transform.scale.x > 1.1);

        selection.handle_selection(&mut scene, Some(b), Duration::from_millis(160));
        // The interrupted pulse leaves its object at the base scale
        assert_eq!(scene.object(a).unwrap().transform.scale.x, 1.0);
        assert_eq!(selection.active_pulse().map(|p| p.target), Some(b));

        selection.advance(&mut scene, Duration::from_millis(500));
        assert!(selection.active_pulse().is_none());
        assert!((scene.object(b).unwrap().transform.scale.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn info_is_rounded_and_observers_notified() {
        let (mut scene, a, _) = two_boxes();
        let seen: Rc<RefCell<Vec<Option<String>>>> = Rc::default();
        let mut selection = SelectionManager::default();
        let sink = seen.clone();
        selection.on_selection_changed(move |info| {
            sink.borrow_mut().push(info.map(|i| i.name.clone()));
        });

        let info = selection.handle_selection(&mut scene, Some(a), Duration::ZERO).unwrap();
        assert_eq!(info.position, [1.0, -2.0, 3.14]);
        assert_eq!(info.size, [1.23, 2.0, 3.0]);
        assert_eq!(
            info.to_string(),
            "Box 1: position (1.00, -2.00, 3.14), size 1.23 x 2.00 x 3.00"
        );

        selection.handle_selection(&mut scene, None, Duration::ZERO);
        assert_eq!(*seen.borrow(), vec![Some("Box 1".to_string()), None]);
    }
}
