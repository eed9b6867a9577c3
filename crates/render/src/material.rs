use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use prism_common::{SamplerHandle, ShaderHandle, TextureHandle, Transform};

use crate::camera::Camera;
use crate::shader::{ShaderBackend, slots};

fn clamp_roughness(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Surface parameters plus the shader pair that consumes them.
///
/// Materials are shared between entities through the
/// [`AssetRegistry`](crate::AssetRegistry); each draw pushes the owning
/// entity's transform alongside the material's own inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    vertex_shader: ShaderHandle,
    pixel_shader: ShaderHandle,
    color_tint: Vec3,
    roughness: f32,
    use_specular_map: bool,
    uv_scale: Vec2,
    uv_offset: Vec2,
    textures: BTreeMap<String, TextureHandle>,
    samplers: BTreeMap<String, SamplerHandle>,
}

impl Material {
    /// A material with roughness 0, no specular map and an identity UV transform.
    pub fn new(vertex_shader: ShaderHandle, pixel_shader: ShaderHandle, color_tint: Vec3) -> Self {
        Self {
            vertex_shader,
            pixel_shader,
            color_tint,
            roughness: 0.0,
            use_specular_map: false,
            uv_scale: Vec2::ONE,
            uv_offset: Vec2::ZERO,
            textures: BTreeMap::new(),
            samplers: BTreeMap::new(),
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.set_roughness(roughness);
        self
    }

    pub fn with_specular_map(mut self, use_specular_map: bool) -> Self {
        self.use_specular_map = use_specular_map;
        self
    }

    pub fn with_uv_scale(mut self, uv_scale: Vec2) -> Self {
        self.uv_scale = uv_scale;
        self
    }

    pub fn with_uv_offset(mut self, uv_offset: Vec2) -> Self {
        self.uv_offset = uv_offset;
        self
    }

    pub fn with_texture(mut self, slot: impl Into<String>, texture: TextureHandle) -> Self {
        self.add_texture(slot, texture);
        self
    }

    pub fn with_sampler(mut self, slot: impl Into<String>, sampler: SamplerHandle) -> Self {
        self.add_sampler(slot, sampler);
        self
    }

    pub fn vertex_shader(&self) -> ShaderHandle {
        self.vertex_shader
    }

    pub fn pixel_shader(&self) -> ShaderHandle {
        self.pixel_shader
    }

    pub fn color_tint(&self) -> Vec3 {
        self.color_tint
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    pub fn use_specular_map(&self) -> bool {
        self.use_specular_map
    }

    pub fn uv_scale(&self) -> Vec2 {
        self.uv_scale
    }

    pub fn uv_offset(&self) -> Vec2 {
        self.uv_offset
    }

    pub fn textures(&self) -> &BTreeMap<String, TextureHandle> {
        &self.textures
    }

    pub fn samplers(&self) -> &BTreeMap<String, SamplerHandle> {
        &self.samplers
    }

    pub fn set_vertex_shader(&mut self, shader: ShaderHandle) {
        self.vertex_shader = shader;
    }

    pub fn set_pixel_shader(&mut self, shader: ShaderHandle) {
        self.pixel_shader = shader;
    }

    pub fn set_color_tint(&mut self, tint: Vec3) {
        self.color_tint = tint;
    }

    /// Store roughness clamped to [0, 1]. NaN stores 0.
    pub fn set_roughness(&mut self, roughness: f32) {
        let clamped = clamp_roughness(roughness);
        if clamped != roughness {
            tracing::debug!(requested = roughness, stored = clamped, "roughness clamped");
        }
        self.roughness = clamped;
    }

    pub fn set_use_specular_map(&mut self, use_specular_map: bool) {
        self.use_specular_map = use_specular_map;
    }

    pub fn set_uv_scale(&mut self, uv_scale: Vec2) {
        self.uv_scale = uv_scale;
    }

    pub fn set_uv_offset(&mut self, uv_offset: Vec2) {
        self.uv_offset = uv_offset;
    }

    /// Bind a texture to a pixel-shader slot. Returns the handle it replaced.
    pub fn add_texture(
        &mut self,
        slot: impl Into<String>,
        texture: TextureHandle,
    ) -> Option<TextureHandle> {
        let slot = slot.into();
        let previous = self.textures.insert(slot.clone(), texture);
        if let Some(old) = previous {
            tracing::debug!(slot = %slot, old = old.0, new = texture.0, "texture slot replaced");
        }
        previous
    }

    /// Bind a sampler to a pixel-shader slot. Returns the handle it replaced.
    pub fn add_sampler(
        &mut self,
        slot: impl Into<String>,
        sampler: SamplerHandle,
    ) -> Option<SamplerHandle> {
        let slot = slot.into();
        let previous = self.samplers.insert(slot.clone(), sampler);
        if let Some(old) = previous {
            tracing::debug!(slot = %slot, old = old.0, new = sampler.0, "sampler slot replaced");
        }
        previous
    }

    pub fn remove_texture(&mut self, slot: &str) -> Option<TextureHandle> {
        self.textures.remove(slot)
    }

    pub fn remove_sampler(&mut self, slot: &str) -> Option<SamplerHandle> {
        self.samplers.remove(slot)
    }

    /// Push everything one draw needs to both shader stages.
    ///
    /// Both stages are activated first. Vertex inputs (world,
    /// world-inverse-transpose, view, projection) are committed before any
    /// pixel input is written. Pixel inputs go roughness, camera position,
    /// tint, textures, samplers, UV scale, UV offset, specular flag, then
    /// commit. Textures and samplers are pushed in slot-name order.
    pub fn send_data_to_shader<B: ShaderBackend + ?Sized>(
        &self,
        transform: &mut Transform,
        camera: &Camera,
        backend: &mut B,
    ) {
        let vs = self.vertex_shader;
        let ps = self.pixel_shader;

        backend.activate(vs);
        backend.activate(ps);

        backend.set_uniform(vs, slots::WORLD_MATRIX, transform.world_matrix().into());
        backend.set_uniform(
            vs,
            slots::WORLD_INV_TRANSPOSE_MATRIX,
            transform.world_inverse_transpose_matrix().into(),
        );
        backend.set_uniform(vs, slots::VIEW_MATRIX, camera.view_matrix().into());
        backend.set_uniform(vs, slots::PROJECTION_MATRIX, camera.projection_matrix().into());
        backend.commit(vs);

        backend.set_uniform(ps, slots::ROUGHNESS, self.roughness.into());
        backend.set_uniform(ps, slots::CAMERA_POSITION, camera.position().into());
        backend.set_uniform(ps, slots::COLOR_TINT, self.color_tint.into());
        for (slot, texture) in &self.textures {
            backend.set_texture(ps, slot, *texture);
        }
        for (slot, sampler) in &self.samplers {
            backend.set_sampler(ps, slot, *sampler);
        }
        backend.set_uniform(ps, slots::UV_SCALE, self.uv_scale.into());
        backend.set_uniform(ps, slots::UV_OFFSET, self.uv_offset.into());
        backend.set_uniform(
            ps,
            slots::USE_SPECULAR_MAP,
            i32::from(self.use_specular_map).into(),
        );
        backend.commit(ps);
    }
}
