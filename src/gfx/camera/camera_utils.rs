use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};
use crate::input::InputEvent;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Owns the orbit camera together with the controller that drives it
#[derive(Debug, Clone)]
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Feeds one input event to the controller; `true` when the camera
    /// consumed it
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        self.controller.process_event(event, &mut self.camera)
    }

    pub fn update(&mut self, dt: f32) {
        self.camera.update(dt);
        log::trace!("camera pose {:?}", self.camera.pose());
    }
}

/// A camera usable for picking and rendering.
///
/// The projection follows the OpenGL depth convention (`[-1, 1]`), so
/// unprojecting NDC points at `z = -1` and `z = 1` gives the near and far
/// planes.
pub trait Camera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;

    fn eye_position(&self) -> Vector3<f32>;
}

/// Where the camera is and what it looks at, recomputed every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vector3<f32>,
    pub look_at: Vector3<f32>,
    pub up: Vector3<f32>,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

impl CameraUniform {
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        let eye = camera.eye;
        Self {
            view_position: [eye.x, eye.y, eye.z, 1.0],
            view_proj: convert_matrix4_to_array(camera.build_render_matrix()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
