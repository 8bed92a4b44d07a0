use crate::input::{InputEvent, PointerButton};

use super::orbit_camera::OrbitCamera;

/// Pointer drag state of the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { last: (f32, f32) },
}

/// Turns pointer drags and wheel steps into orbit camera motion
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Radians of target rotation per pixel dragged
    pub rotate_speed: f32,
    /// Radius multiplier for one wheel step toward the scene
    pub zoom_in_factor: f32,
    /// Radius multiplier for one wheel step away from the scene
    pub zoom_out_factor: f32,
    state: DragState,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005)
    }
}

impl CameraController {
    pub fn new(rotate_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            state: DragState::Idle,
        }
    }

    pub fn with_zoom_factors(mut self, zoom_in: f32, zoom_out: f32) -> Self {
        self.zoom_in_factor = zoom_in;
        self.zoom_out_factor = zoom_out;
        self
    }

    /// Applies one input event to the camera target; returns `true` when the
    /// event changed the controller or the camera.
    pub fn process_event(&mut self, event: &InputEvent, camera: &mut OrbitCamera) -> bool {
        match *event {
            InputEvent::PointerDown {
                x,
                y,
                button: PointerButton::Primary,
            } => {
                self.state = DragState::Dragging { last: (x, y) };
                true
            }
            // Releasing any button ends the drag
            InputEvent::PointerUp { .. } => {
                let was_dragging = self.is_dragging();
                self.state = DragState::Idle;
                was_dragging
            }
            InputEvent::PointerMove { x, y } => match self.state {
                DragState::Dragging { last } => {
                    let (dx, dy) = (x - last.0, y - last.1);
                    camera.rotate_by(dx * self.rotate_speed, dy * self.rotate_speed);
                    self.state = DragState::Dragging { last: (x, y) };
                    true
                }
                DragState::Idle => false,
            },
            InputEvent::Wheel { delta_y } => self.zoom(delta_y, camera),
            _ => false,
        }
    }

    fn zoom(&self, delta_y: f32, camera: &mut OrbitCamera) -> bool {
        let factor = if delta_y > 0.0 {
            self.zoom_out_factor
        } else if delta_y < 0.0 {
            self.zoom_in_factor
        } else {
            return false;
        };
        camera.zoom_by(factor);
        log::debug!("zoom x{factor}: distance {:.2}", camera.distance);
        true
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Returns true if currently rotating
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }
}
