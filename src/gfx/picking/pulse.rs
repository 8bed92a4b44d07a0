//! Scale pulse played on a freshly selected object

use std::time::Duration;

use cgmath::Vector3;

use crate::gfx::scene::{ObjectId, Scene};

/// Shape of the selection pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseSettings {
    pub duration: Duration,
    /// Scale factor at the start and end of the pulse
    pub start_scale: f32,
    /// Scale factor at the midpoint
    pub end_scale: f32,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            start_scale: 1.0,
            end_scale: 1.2,
        }
    }
}

impl PulseSettings {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_scales(mut self, start_scale: f32, end_scale: f32) -> Self {
        self.start_scale = start_scale;
        self.end_scale = end_scale;
        self
    }
}

/// Triangular envelope: `start` at `p = 0`, `end` at `p = 0.5`, `start`
/// again at `p = 1`. `p` is clamped to `[0, 1]`.
pub fn pulse_scale(progress: f32, start: f32, end: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if p <= 0.5 {
        start + (end - start) * (p / 0.5)
    } else {
        end - (end - start) * ((p - 0.5) / 0.5)
    }
}

/// A running pulse on one object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseAnimation {
    pub target: ObjectId,
    pub started_at: Duration,
    pub settings: PulseSettings,
    /// Scale of the target when the pulse started
    pub base_scale: Vector3<f32>,
}

impl PulseAnimation {
    /// Starts a pulse on `target`, or `None` if it is not in the scene
    pub fn start(scene: &Scene, target: ObjectId, now: Duration, settings: PulseSettings) -> Option<Self> {
        let base_scale = scene.object(target)?.transform.scale;
        Some(Self {
            target,
            started_at: now,
            settings,
            base_scale,
        })
    }

    pub fn progress(&self, now: Duration) -> f32 {
        if self.settings.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.settings.duration.as_secs_f32()).min(1.0)
    }

    pub fn factor_at(&self, now: Duration) -> f32 {
        pulse_scale(self.progress(now), self.settings.start_scale, self.settings.end_scale)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// Writes the scale for `now` into the target; returns `true` once the
    /// pulse has finished
    pub fn apply(&self, scene: &mut Scene, now: Duration) -> bool {
        let factor = self.factor_at(now);
        if let Some(object) = scene.object_mut(self.target) {
            object.transform.scale = self.base_scale * factor;
        }
        self.is_finished(now)
    }

    /// Puts the target back at its pre-pulse scale
    pub fn cancel(&self, scene: &mut Scene) {
        if let Some(object) = scene.object_mut(self.target) {
            object.transform.scale = self.base_scale;
        }
    }
}
