//! Vantage
//!
//! Pointer picking and an eased orbit camera for retained-mode 3D scenes,
//! hosted in a winit window and drawn with wgpu.

pub mod app;
pub mod frame_loop;
pub mod gfx;
pub mod input;
pub mod interaction;
pub mod prelude;
pub mod scenes;

// Re-export main types for convenience
pub use app::{AppConfig, AppError, SceneDriver, VantageApp};
pub use scenes::Stage;

/// Opens a window on `stage` and runs it until closed
pub fn run(stage: Stage) -> Result<(), AppError> {
    VantageApp::new(stage).run()
}
