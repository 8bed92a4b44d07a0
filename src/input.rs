//! Input events consumed by the interaction layer
//!
//! [`InputEvent`] is the window-system-independent event model. Pointer
//! coordinates are viewport pixels with the origin at the top-left corner and
//! wheel deltas follow the browser convention (positive means "scroll down",
//! i.e. zoom out). [`WinitInputAdapter`] produces these events from winit.

use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::Key,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

impl From<MouseButton> for PointerButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::Primary,
            MouseButton::Right => Self::Secondary,
            MouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: PointerButton },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32, button: PointerButton },
    /// Mouse wheel step, positive zooms out
    Wheel { delta_y: f32 },
    /// A completed primary click, emitted after the matching `PointerUp`
    Click { x: f32, y: f32 },
    KeyPress(char),
    Resized { width: u32, height: u32 },
}

/// Translates winit window events into [`InputEvent`]s
///
/// winit reports button presses without a position, so the adapter keeps
/// the last cursor position and attaches it.
#[derive(Debug, Default)]
pub struct WinitInputAdapter {
    cursor: (f32, f32),
}

impl WinitInputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in physical pixels
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => vec![self.on_cursor_moved(*position)],
            WindowEvent::MouseInput { state, button, .. } => self.on_mouse_input(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.on_wheel(*delta).into_iter().collect(),
            WindowEvent::KeyboardInput { event, .. } => self.on_key(event).into_iter().collect(),
            WindowEvent::Resized(size) => vec![self.on_resized(*size)],
            _ => Vec::new(),
        }
    }

    pub fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        self.cursor = (position.x as f32, position.y as f32);
        InputEvent::PointerMove {
            x: self.cursor.0,
            y: self.cursor.1,
        }
    }

    pub fn on_mouse_input(&mut self, state: ElementState, button: MouseButton) -> Vec<InputEvent> {
        let (x, y) = self.cursor;
        let button = PointerButton::from(button);
        match state {
            ElementState::Pressed => vec![InputEvent::PointerDown { x, y, button }],
            ElementState::Released if button == PointerButton::Primary => vec![
                InputEvent::PointerUp { x, y, button },
                InputEvent::Click { x, y },
            ],
            ElementState::Released => vec![InputEvent::PointerUp { x, y, button }],
        }
    }

    /// winit reports "scroll up" as positive; flip it to the browser sign
    pub fn on_wheel(&self, delta: MouseScrollDelta) -> Option<InputEvent> {
        let delta_y = -match delta {
            MouseScrollDelta::LineDelta(_, scroll) => scroll,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => scroll as f32,
        };
        (delta_y != 0.0).then_some(InputEvent::Wheel { delta_y })
    }

    pub fn on_key(&self, event: &KeyEvent) -> Option<InputEvent> {
        if event.state != ElementState::Pressed || event.repeat {
            return None;
        }
        match &event.logical_key {
            Key::Character(text) => text.chars().next().map(InputEvent::KeyPress),
            _ => None,
        }
    }

    pub fn on_resized(&self, size: PhysicalSize<u32>) -> InputEvent {
        InputEvent::Resized {
            width: size.width,
            height: size.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presses_carry_the_last_cursor_position() {
        let mut adapter = WinitInputAdapter::new();
        assert_eq!(adapter.cursor(), (0.0, 0.0));
        adapter.on_cursor_moved(PhysicalPosition::new(120.0, 45.5));
        assert_eq!(adapter.cursor(), (120.0, 45.5));
        let events = adapter.on_mouse_input(ElementState::Pressed, MouseButton::Left);
        assert_eq!(
            events,
            vec![InputEvent::PointerDown {
                x: 120.0,
                y: 45.5,
                button: PointerButton::Primary
            }]
        );
    }

    #[test]
    fn primary_release_emits_click() {
        let mut adapter = WinitInputAdapter::new();
        adapter.on_cursor_moved(PhysicalPosition::new(10.0, 20.0));
        let events = adapter.on_mouse_input(ElementState::Released, MouseButton::Left);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], InputEvent::Click { x: 10.0, y: 20.0 });

        let right = adapter.on_mouse_input(ElementState::Released, MouseButton::Right);
        assert_eq!(right.len(), 1);
    }

    #[test]
    fn wheel_sign_follows_browser_convention() {
        let adapter = WinitInputAdapter::new();
        // Scrolling toward the user (down) is negative in winit
        assert_eq!(
            adapter.on_wheel(MouseScrollDelta::LineDelta(0.0, -1.0)),
            Some(InputEvent::Wheel { delta_y: 1.0 })
        );
        assert_eq!(
            adapter.on_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 30.0))),
            Some(InputEvent::Wheel { delta_y: -30.0 })
        );
        assert_eq!(adapter.on_wheel(MouseScrollDelta::LineDelta(2.0, 0.0)), None);
    }

    #[test]
    fn resize_is_forwarded() {
        let adapter = WinitInputAdapter::new();
        assert_eq!(
            adapter.on_resized(PhysicalSize::new(800, 600)),
            InputEvent::Resized {
                width: 800,
                height: 600
            }
        );
    }
}
