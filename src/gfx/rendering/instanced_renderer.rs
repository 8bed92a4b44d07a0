//! Instanced scene rendering
//!
//! Every drawable object becomes one [`InstanceData`] entry. Objects with
//! the same geometry share a cached mesh and are drawn with a single
//! instanced call.

use std::collections::HashMap;
use std::ops::Range;

use wgpu::util::DeviceExt;
use wgpu::{Buffer, Device, Queue, RenderPass, RenderPipeline};

use crate::gfx::{
    camera::camera_utils::CameraUniform,
    geometry::{mesh_for, MeshKey},
    resources::{
        global_bindings::GlobalBindings, lighting::LightRig, texture_resource::TextureResource,
    },
    scene::Scene,
};

use super::vertex::{InstanceData, Vertex3D};

/// GPU buffers for one tessellated geometry
pub struct MeshBuffers {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &Device, vertices: &[Vertex3D], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// Groups the scene's drawable objects by mesh, preserving first-seen order
pub fn collect_instances(scene: &Scene) -> Vec<(MeshKey, Vec<InstanceData>)> {
    let mut batches: Vec<(MeshKey, Vec<InstanceData>)> = Vec::new();

    for (id, object) in scene.objects() {
        let Some(key) = MeshKey::of(&object.geometry) else {
            continue;
        };
        let Some(model) = scene.world_matrix(id) else {
            continue;
        };
        let appearance = scene.appearance(id).unwrap_or_default();
        let instance = InstanceData::new(model, appearance.base_color, appearance.emissive);

        match batches.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, instances)) => instances.push(instance),
            None => batches.push((key, vec![instance])),
        }
    }
    batches
}

/// Flat-shaded instanced renderer for a [`Scene`]
pub struct SceneRenderer {
    pipeline: RenderPipeline,
    global_bindings: GlobalBindings,
    meshes: HashMap<MeshKey, MeshBuffers>,
    instance_buffer: Buffer,
    instance_capacity: usize,
    batches: Vec<(MeshKey, Range<u32>)>,
}

impl SceneRenderer {
    pub fn new(device: &Device, surface_format: wgpu::TextureFormat) -> Self {
        let global_bindings = GlobalBindings::new(device);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[global_bindings.bind_group_layout()],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc(), InstanceData::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING), // Enable alpha blending for transparency
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Planes, rings and flags are seen from both sides
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let instance_capacity = 64;
        let instance_buffer = Self::create_instance_buffer(device, instance_capacity);

        Self {
            pipeline,
            global_bindings,
            meshes: HashMap::new(),
            instance_buffer,
            instance_capacity,
            batches: Vec::new(),
        }
    }

    fn create_instance_buffer(device: &Device, capacity: usize) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Instance Buffer"),
            size: (capacity * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Uploads this frame's uniforms, missing meshes and instance data
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        scene: &Scene,
        camera: CameraUniform,
        lights: &LightRig,
    ) {
        self.global_bindings.update(queue, camera, lights);

        let batches = collect_instances(scene);
        let mut all_instances = Vec::new();
        self.batches.clear();

        for (key, instances) in batches {
            if !self.meshes.contains_key(&key) {
                let geometry = scene
                    .objects()
                    .map(|(_, object)| object.geometry)
                    .find(|geometry| MeshKey::of(geometry) == Some(key));
                if let Some(mesh) = geometry.as_ref().and_then(mesh_for) {
                    log::debug!("uploading mesh with {} triangles", mesh.triangle_count());
                    self.meshes
                        .insert(key, MeshBuffers::new(device, &mesh.to_vertices(), &mesh.indices));
                }
            }

            let start = all_instances.len() as u32;
            all_instances.extend(instances);
            self.batches.push((key, start..all_instances.len() as u32));
        }

        if all_instances.len() > self.instance_capacity {
            self.instance_capacity = all_instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.instance_capacity);
        }
        if !all_instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&all_instances));
        }
    }

    /// Draws the prepared batches, one instanced call per mesh
    pub fn render<'a>(&'a self, render_pass: &mut RenderPass<'a>) {
        if self.batches.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        for (key, instances) in &self.batches {
            let Some(mesh) = self.meshes.get(key) else {
                continue;
            };
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, instances.clone());
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

// Lambert shading: ambient + one directional + one point light, plus emissive
const SCENE_SHADER: &str = r#"
struct Globals {
    view_position: vec4<f32>,
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    directional_direction: vec4<f32>,
    directional_color: vec4<f32>,
    point_position: vec4<f32>,
    point_color: vec4<f32>,
}

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec3<f32>,
}

@group(0) @binding(0)
var<uniform> globals: Globals;

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(instance.model_0, instance.model_1, instance.model_2, instance.model_3);
    let world_position = model * vec4<f32>(vertex.position, 1.0);
    let normal_matrix = mat3x3<f32>(model[0].xyz, model[1].xyz, model[2].xyz);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_position;
    out.world_position = world_position.xyz;
    out.world_normal = normalize(normal_matrix * vertex.normal);
    out.color = instance.color;
    out.emissive = instance.emissive.rgb;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var normal = normalize(in.world_normal);
    let view_dir = normalize(globals.view_position.xyz - in.world_position);
    // Two-sided lighting for open surfaces
    if (dot(normal, view_dir) < 0.0) {
        normal = -normal;
    }

    var light = globals.ambient.rgb;

    let sun = max(dot(normal, normalize(globals.directional_direction.xyz)), 0.0);
    light += globals.directional_color.rgb * globals.directional_direction.w * sun;

    let to_point = globals.point_position.xyz - in.world_position;
    let dist = length(to_point);
    var attenuation = 1.0;
    if (globals.point_position.w > 0.0) {
        attenuation = clamp(1.0 - dist / globals.point_position.w, 0.0, 1.0);
    }
    let lamp = max(dot(normal, to_point / max(dist, 0.0001)), 0.0);
    light += globals.point_color.rgb * globals.point_color.w * lamp * attenuation;

    let rgb = in.color.rgb * light + in.emissive;
    return vec4<f32>(rgb, in.color.a);
}
"#;
