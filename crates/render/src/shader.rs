use glam::{Mat4, Vec2, Vec3};
use prism_common::{SamplerHandle, ShaderHandle, TextureHandle};

use crate::mesh::Mesh;

/// Shader input names written by material, scene and sky bindings.
///
/// These strings must match the variable names in the shader sources.
pub mod slots {
    pub const WORLD_MATRIX: &str = "worldMatrix";
    pub const WORLD_INV_TRANSPOSE_MATRIX: &str = "worldInvTransposeMatrix";
    pub const VIEW_MATRIX: &str = "viewMatrix";
    pub const PROJECTION_MATRIX: &str = "projectionMatrix";

    pub const ROUGHNESS: &str = "roughness";
    pub const CAMERA_POSITION: &str = "cameraPosition";
    pub const COLOR_TINT: &str = "colorTint";
    pub const UV_SCALE: &str = "uvScale";
    pub const UV_OFFSET: &str = "uvOffset";
    pub const USE_SPECULAR_MAP: &str = "useSpecularMap";

    pub const TIME: &str = "time";
    pub const GAMMA: &str = "gamma";
    pub const AMBIENT_COLOR: &str = "ambientColor";
    pub const LIGHTS: &str = "lights";

    pub const CUBE_MAP: &str = "CubeMap";
    pub const BASIC_SAMPLER: &str = "BasicSampler";

    /// Conventional texture slot names used by the standard materials.
    pub const DIFFUSE_TEXTURE: &str = "DiffuseTexture";
    pub const NORMAL_MAP: &str = "NormalMap";
    pub const METALNESS: &str = "Metalness";
    pub const ROUGHNESS_MAP: &str = "Roughness";
}

/// A scalar, vector or matrix uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Float2(Vec2),
    Float3(Vec3),
    Mat4(Mat4),
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Float2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Float3(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

/// Shader-stage surface provided by the graphics backend.
///
/// Uniform writes are staged per shader and only reach the GPU on
/// [`commit`](ShaderBackend::commit). A shader must be activated before any of
/// its inputs are written.
pub trait ShaderBackend {
    /// Bind the shader to its pipeline stage.
    fn activate(&mut self, shader: ShaderHandle);

    /// Stage a named uniform value.
    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue);

    /// Stage raw bytes for a named uniform (structured arrays such as lights).
    fn set_data(&mut self, shader: ShaderHandle, name: &str, bytes: &[u8]);

    /// Bind a texture resource to a named slot.
    fn set_texture(&mut self, shader: ShaderHandle, name: &str, texture: TextureHandle);

    /// Bind a sampler state to a named slot.
    fn set_sampler(&mut self, shader: ShaderHandle, name: &str, sampler: SamplerHandle);

    /// Upload all staged uniforms for the shader.
    fn commit(&mut self, shader: ShaderHandle);
}

/// Fixed-function state the core switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterState {
    /// Back-face culling, depth test less.
    Default,
    /// Front-face culling, depth test less-or-equal, for drawing inside a sky cube.
    Sky,
}

/// Draw-submission surface provided by the graphics backend.
pub trait DrawBackend {
    fn set_raster_state(&mut self, state: RasterState);

    /// Bind the mesh's vertex and index buffers and issue one indexed draw.
    fn draw_indexed(&mut self, mesh: &Mesh);
}

/// A backend that can both bind shader inputs and submit draws.
pub trait RenderDevice: ShaderBackend + DrawBackend {}

impl<T: ShaderBackend + DrawBackend> RenderDevice for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_conversions() {
        assert_eq!(UniformValue::from(1.5), UniformValue::Float(1.5));
        assert_eq!(UniformValue::from(1), UniformValue::Int(1));
        assert_eq!(UniformValue::from(Vec2::ONE), UniformValue::Float2(Vec2::ONE));
        assert_eq!(UniformValue::from(Mat4::IDENTITY), UniformValue::Mat4(Mat4::IDENTITY));
    }

    #[test]
    fn slot_names_match_shader_sources() {
        assert_eq!(slots::WORLD_INV_TRANSPOSE_MATRIX, "worldInvTransposeMatrix");
        assert_eq!(slots::USE_SPECULAR_MAP, "useSpecularMap");
        assert_eq!(slots::CUBE_MAP, "CubeMap");
    }
}
