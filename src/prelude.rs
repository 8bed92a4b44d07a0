//! # Vantage Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use vantage::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let stage = build_spinning_tori()?;
//!     vantage::run(stage)?;
//!     Ok(())
//! }
//! ```

// Application host
pub use crate::app::{AppConfig, AppError, SceneDriver, VantageApp};
pub use crate::frame_loop::{FrameLoop, FrameTick, ManualClock, SystemClock};
pub use crate::input::{InputEvent, PointerButton};
pub use crate::interaction::{InteractionController, InteractionEvent};

// Scene, camera and picking
pub use crate::gfx::camera::{CameraController, OrbitCamera, OrbitCameraBounds};
pub use crate::gfx::picking::{
    HighlightStyle, ObjectPicker, PickHit, PickTargets, PulseSettings, SelectionInfo,
    SelectionManager,
};
pub use crate::gfx::resources::{LightRig, Material};
pub use crate::gfx::scene::{Geometry, Object, ObjectId, Scene};

// Stages
pub use crate::scenes::{
    build_box_field, build_campus, build_spinning_tori, BoxFieldSettings, Stage,
};

// Re-export common external dependencies
pub use cgmath::{Vector3, Zero};
