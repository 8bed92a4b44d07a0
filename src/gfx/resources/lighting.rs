//! Scene lighting consumed by the renderer: ambient, one directional and one
//! point light.

use cgmath::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Position the light shines from, towards the origin
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which the contribution reaches zero
    pub range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.6,
            directional: DirectionalLight {
                position: Vector3::new(10.0, 10.0, 10.0),
                color: [1.0, 1.0, 1.0],
                intensity: 0.8,
            },
            point: PointLight {
                position: Vector3::new(-10.0, -10.0, 10.0),
                color: [1.0, 1.0, 1.0],
                intensity: 0.5,
                range: 0.0,
            },
        }
    }
}

impl LightRig {
    pub fn with_ambient(mut self, intensity: f32) -> Self {
        self.ambient_intensity = intensity;
        self
    }

    pub fn with_directional(mut self, light: DirectionalLight) -> Self {
        self.directional = light;
        self
    }

    pub fn with_point(mut self, light: PointLight) -> Self {
        self.point = light;
        self
    }
}
