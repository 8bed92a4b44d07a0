use super::camera_utils::{Camera, CameraPose, OPENGL_TO_WGPU_MATRIX};
use cgmath::*;

/// Camera that orbits a center point on a sphere and always looks at a fixed
/// target.
///
/// Input only moves the *target* angles. [`OrbitCamera::update`] eases the
/// live angles toward them once per frame and re-derives the eye position.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Orbit radius
    pub distance: f32,
    /// Live azimuth around the Y axis, radians
    pub azimuth: f32,
    /// Live elevation above the XZ plane, radians
    pub elevation: f32,
    pub target_azimuth: f32,
    pub target_elevation: f32,
    /// Center of the orbit sphere
    pub center: Vector3<f32>,
    /// Point the camera looks at every frame
    pub look_at: Vector3<f32>,
    pub up: Vector3<f32>,
    pub eye: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    /// Fraction of the remaining angle covered each frame
    pub easing: f32,
    /// Constant azimuth drift in radians per second
    pub auto_rotate: Option<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(10.0, Vector3::zero(), 16.0 / 9.0)
    }
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.look_at);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj = perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    fn eye_position(&self) -> Vector3<f32> {
        self.eye
    }
}

impl OrbitCamera {
    /// Camera at azimuth and elevation zero (on the +Z side of `center`),
    /// looking at `center`
    pub fn new(distance: f32, center: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            azimuth: 0.0,
            elevation: 0.0,
            target_azimuth: 0.0,
            target_elevation: 0.0,
            center,
            look_at: center,
            up: Vector3::unit_y(),
            eye: Vector3::zero(), // Will be auto-calculated in `update_eye()` nevertheless.
            bounds: OrbitCameraBounds::default(),
            easing: 0.05,
            auto_rotate: None,
            aspect,
            fovy: Rad(75f32.to_radians()),
            znear: 0.1,
            zfar: 1000.0,
        };
        camera.update_eye();
        camera
    }

    pub fn with_look_at(mut self, look_at: Vector3<f32>) -> Self {
        self.look_at = look_at;
        self
    }

    pub fn with_fovy(mut self, fovy: impl Into<Rad<f32>>) -> Self {
        self.fovy = fovy.into();
        self
    }

    pub fn with_bounds(mut self, bounds: OrbitCameraBounds) -> Self {
        self.bounds = bounds;
        self.set_distance(self.distance);
        self.set_target_elevation(self.target_elevation);
        self.elevation = self.bounds.clamp_elevation(self.elevation);
        self.update_eye();
        self
    }

    pub fn with_easing(mut self, easing: f32) -> Self {
        self.easing = easing.clamp(0.0, 1.0);
        self
    }

    pub fn with_auto_rotate(mut self, radians_per_second: f32) -> Self {
        self.auto_rotate = Some(radians_per_second);
        self
    }

    /// Places both the live and the target angles, skipping the easing
    pub fn with_angles(mut self, azimuth: f32, elevation: f32) -> Self {
        let elevation = self.bounds.clamp_elevation(elevation);
        self.azimuth = azimuth;
        self.target_azimuth = azimuth;
        self.elevation = elevation;
        self.target_elevation = elevation;
        self.update_eye();
        self
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = self.bounds.clamp_distance(distance);
        self.update_eye();
    }

    pub fn set_target_elevation(&mut self, elevation: f32) {
        self.target_elevation = self.bounds.clamp_elevation(elevation);
    }

    /// Adds a drag rotation to the target angles
    pub fn rotate_by(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        self.target_azimuth += delta_azimuth;
        self.set_target_elevation(self.target_elevation + delta_elevation);
    }

    /// Multiplies the orbit radius by `factor`, within the distance bounds
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_distance(self.distance * factor);
    }

    /// Advances one frame: drift, ease, clamp and reposition
    pub fn update(&mut self, dt: f32) {
        if let Some(speed) = self.auto_rotate {
            self.target_azimuth += speed * dt;
            self.azimuth += speed * dt;
        }

        self.azimuth += (self.target_azimuth - self.azimuth) * self.easing;
        self.elevation += (self.target_elevation - self.elevation) * self.easing;
        self.elevation = self.bounds.clamp_elevation(self.elevation);

        self.update_eye();
    }

    /// Recomputes the eye after changing `distance`, angles or `center`.
    fn update_eye(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.elevation, self.azimuth, self.distance, self.center);
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.eye,
            look_at: self.look_at,
            up: self.up,
        }
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// View-projection with wgpu's depth range, for rendering
    pub fn build_render_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.build_view_projection_matrix()
    }
}

/// Limits applied to the orbit radius and elevation
#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_elevation: f32,
    pub max_elevation: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(1.0),
            max_distance: Some(500.0),
            min_elevation: -std::f32::consts::FRAC_PI_3,
            max_elevation: std::f32::consts::FRAC_PI_3,
        }
    }
}

impl OrbitCameraBounds {
    pub fn with_distance(mut self, min: f32, max: f32) -> Self {
        self.min_distance = Some(min);
        self.max_distance = Some(max);
        self
    }

    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(
            self.min_distance.unwrap_or(f32::EPSILON),
            self.max_distance.unwrap_or(f32::MAX),
        )
    }

    pub fn clamp_elevation(&self, elevation: f32) -> f32 {
        elevation.clamp(self.min_elevation, self.max_elevation)
    }
}

fn calculate_cartesian_eye_position(
    elevation: f32,
    azimuth: f32,
    distance: f32,
    center: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * azimuth.sin() * elevation.cos(),
        distance * elevation.sin(),
        distance * azimuth.cos() * elevation.cos(),
    ) + center
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_3;

    #[test]
    fn eye_follows_spherical_coordinates() {
        let camera = OrbitCamera::new(80.0, Vector3::new(0.0, 25.0, 0.0), 1.0)
            .with_look_at(Vector3::new(0.0, 8.0, 0.0))
            .with_angles(std::f32::consts::FRAC_PI_2, 0.0);
        assert!((camera.eye - Vector3::new(80.0, 25.0, 0.0)).magnitude() < 1e-3);
        assert_eq!(camera.pose().look_at, Vector3::new(0.0, 8.0, 0.0));
    }

    #[test]
    fn elevation_is_clamped_on_target_and_current() {
        let mut camera = OrbitCamera::default();
        camera.rotate_by(0.0, 10.0);
        assert!((camera.target_elevation - FRAC_PI_3).abs() < 1e-6);

        for _ in 0..500 {
            camera.update(1.0 / 60.0);
            assert!(camera.elevation <= FRAC_PI_3);
        }
        camera.rotate_by(0.0, -20.0);
        assert!((camera.target_elevation + FRAC_PI_3).abs() < 1e-6);
    }

    #[test]
    fn easing_converges_without_overshoot() {
        let mut camera = OrbitCamera::default();
        camera.rotate_by(1.0, 0.5);

        let mut previous = camera.azimuth;
        for _ in 0..140 {
            camera.update(1.0 / 60.0);
            assert!(camera.azimuth >= previous, "azimuth moved backwards");
            assert!(camera.azimuth <= 1.0, "azimuth overshot the target");
            previous = camera.azimuth;
        }
        assert!((camera.azimuth - 1.0).abs() < 1e-3);
        assert!((camera.elevation - 0.5).abs() < 1e-3);
    }

    #[test]
    fn first_frame_moves_five_percent() {
        let mut camera = OrbitCamera::default();
        camera.rotate_by(1.0, 0.0);
        camera.update(0.0);
        assert!((camera.azimuth - 0.05).abs() < 1e-6);
    }

    #[test]
    fn zoom_respects_distance_bounds() {
        let mut camera = OrbitCamera::new(30.0, Vector3::zero(), 1.0)
            .with_bounds(OrbitCameraBounds::default().with_distance(10.0, 40.0));
        camera.zoom_by(1.1);
        assert!((camera.distance - 33.0).abs() < 1e-4);
        for _ in 0..10 {
            camera.zoom_by(1.1);
        }
        assert_eq!(camera.distance, 40.0);
        for _ in 0..40 {
            camera.zoom_by(0.9);
        }
        assert_eq!(camera.distance, 10.0);
        assert!((camera.eye.magnitude() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn auto_rotate_drifts_both_angles() {
        let mut camera = OrbitCamera::default().with_auto_rotate(0.5);
        camera.update(2.0);
        assert!((camera.target_azimuth - 1.0).abs() < 1e-6);
        assert!((camera.azimuth - 1.0).abs() < 1e-6);
    }
}
