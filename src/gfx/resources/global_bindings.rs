//! Global uniform bindings for camera and scene data
//!
//! Manages the GPU uniform buffer and bind group for per-frame state shared
//! by every drawn object: the camera matrix and the light rig.

use wgpu::util::DeviceExt;

use crate::gfx::camera::camera_utils::CameraUniform;

use super::lighting::LightRig;

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the scene shader exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    // Camera data (matches CameraUniform)
    view_position: [f32; 4],  // Camera position (homogeneous coordinates)
    view_proj: [[f32; 4]; 4], // Camera view-projection matrix

    ambient: [f32; 4],               // rgb premultiplied by intensity
    directional_direction: [f32; 4], // xyz towards the light, w = intensity
    directional_color: [f32; 4],
    point_position: [f32; 4], // xyz, w = range (0 = infinite)
    point_color: [f32; 4],    // rgb, w = intensity
}
// Total: 16 + 64 + 5 * 16 = 160 bytes

impl GlobalUniform {
    pub fn new(camera: CameraUniform, lights: &LightRig) -> Self {
        let [ar, ag, ab] = lights.ambient_color;
        let a = lights.ambient_intensity;

        let dir = &lights.directional;
        let towards = if dir.position == cgmath::Vector3::new(0.0, 0.0, 0.0) {
            [0.0, 1.0, 0.0]
        } else {
            let n = cgmath::InnerSpace::normalize(dir.position);
            [n.x, n.y, n.z]
        };

        let point = &lights.point;
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [ar * a, ag * a, ab * a, 1.0],
            directional_direction: [towards[0], towards[1], towards[2], dir.intensity],
            directional_color: [dir.color[0], dir.color[1], dir.color[2], 1.0],
            point_position: [point.position.x, point.position.y, point.position.z, point.range],
            point_color: [point.color[0], point.color[1], point.color[2], point.intensity],
        }
    }
}

/// Uniform buffer plus the bind group (group 0) exposing it to shaders
pub struct GlobalBindings {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let content = GlobalUniform::new(CameraUniform::default(), &LightRig::default());
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global Uniform Buffer"),
            contents: bytemuck::bytes_of(&content),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
        }
    }

    /// Updates the global uniform buffer with camera and light data
    ///
    /// Should be called each frame before the scene pass is encoded.
    pub fn update(&self, queue: &wgpu::Queue, camera: CameraUniform, lights: &LightRig) {
        let content = GlobalUniform::new(camera, lights);
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
