use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Maximum number of lights pushed to the pixel shader per draw.
pub const MAX_LIGHTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    #[default]
    Directional,
    Point,
    Spot,
}

impl LightKind {
    /// Integer tag the shaders switch on.
    pub fn shader_id(self) -> i32 {
        match self {
            LightKind::Directional => 0,
            LightKind::Point => 1,
            LightKind::Spot => 2,
        }
    }
}

/// A scene light. Which fields matter depends on `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub kind: LightKind,
    pub direction: Vec3,
    pub range: f32,
    pub position: Vec3,
    pub intensity: f32,
    pub color: Vec3,
    pub spot_falloff: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Directional,
            direction: Vec3::Z,
            range: 10.0,
            position: Vec3::ZERO,
            intensity: 1.0,
            color: Vec3::ONE,
            spot_falloff: 1.0,
        }
    }
}

impl Light {
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            direction,
            color,
            intensity,
            ..Self::default()
        }
    }

    pub fn point(position: Vec3, range: f32, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            range,
            color,
            intensity,
            ..Self::default()
        }
    }

    pub fn to_gpu(&self) -> GpuLight {
        GpuLight {
            kind: self.kind.shader_id(),
            direction: self.direction.to_array(),
            range: self.range,
            position: self.position.to_array(),
            intensity: self.intensity,
            color: self.color.to_array(),
            spot_falloff: self.spot_falloff,
            _pad: [0.0; 3],
        }
    }
}

/// Shader-side light layout, packed in 16-byte rows.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub kind: i32,
    pub direction: [f32; 3],
    pub range: f32,
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub spot_falloff: f32,
    pub _pad: [f32; 3],
}

/// Pack lights into the fixed-size shader array. Extra lights are dropped,
/// missing slots are zeroed.
pub fn pack_lights(lights: &[Light]) -> [GpuLight; MAX_LIGHTS] {
    if lights.len() > MAX_LIGHTS {
        tracing::debug!(count = lights.len(), max = MAX_LIGHTS, "extra lights dropped");
    }
    let mut packed = [GpuLight::zeroed(); MAX_LIGHTS];
    for (slot, light) in packed.iter_mut().zip(lights) {
        *slot = light.to_gpu();
    }
    packed
}
