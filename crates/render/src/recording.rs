use std::fmt;

use prism_common::{SamplerHandle, ShaderHandle, TextureHandle};

use crate::mesh::Mesh;
use crate::shader::{DrawBackend, RasterState, ShaderBackend, UniformValue};

/// One backend call, as seen by a [`RecordingDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Activate(ShaderHandle),
    SetUniform {
        shader: ShaderHandle,
        name: String,
        value: UniformValue,
    },
    SetData {
        shader: ShaderHandle,
        name: String,
        bytes: Vec<u8>,
    },
    SetTexture {
        shader: ShaderHandle,
        name: String,
        texture: TextureHandle,
    },
    SetSampler {
        shader: ShaderHandle,
        name: String,
        sampler: SamplerHandle,
    },
    Commit(ShaderHandle),
    SetRasterState(RasterState),
    DrawIndexed {
        mesh: String,
        index_count: u32,
    },
}

impl DeviceCall {
    /// Slot name for calls that write a named shader input.
    pub fn slot(&self) -> Option<&str> {
        match self {
            Self::SetUniform { name, .. }
            | Self::SetData { name, .. }
            | Self::SetTexture { name, .. }
            | Self::SetSampler { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn shader(&self) -> Option<ShaderHandle> {
        match self {
            Self::Activate(s) | Self::Commit(s) => Some(*s),
            Self::SetUniform { shader, .. }
            | Self::SetData { shader, .. }
            | Self::SetTexture { shader, .. }
            | Self::SetSampler { shader, .. } => Some(*shader),
            Self::SetRasterState(_) | Self::DrawIndexed { .. } => None,
        }
    }
}

impl fmt::Display for DeviceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activate(s) => write!(f, "activate shader#{}", s.0),
            Self::SetUniform { shader, name, value } => {
                write!(f, "  shader#{} {name} = {value:?}", shader.0)
            }
            Self::SetData { shader, name, bytes } => {
                write!(f, "  shader#{} {name} <- {} bytes", shader.0, bytes.len())
            }
            Self::SetTexture {
                shader,
                name,
                texture,
            } => write!(f, "  shader#{} {name} <- texture#{}", shader.0, texture.0),
            Self::SetSampler {
                shader,
                name,
                sampler,
            } => write!(f, "  shader#{} {name} <- sampler#{}", shader.0, sampler.0),
            Self::Commit(s) => write!(f, "commit shader#{}", s.0),
            Self::SetRasterState(state) => write!(f, "raster {state:?}"),
            Self::DrawIndexed { mesh, index_count } => {
                write!(f, "draw {mesh} ({index_count} indices)")
            }
        }
    }
}

/// In-memory backend that records every call instead of talking to a GPU.
///
/// Stands in for the graphics device in tests and in the headless CLI.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    calls: Vec<DeviceCall>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Drain recorded calls, e.g. between frames.
    pub fn take(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DrawIndexed { .. }))
            .count()
    }

    /// Last value staged for `name` on `shader`.
    pub fn uniform(&self, shader: ShaderHandle, name: &str) -> Option<UniformValue> {
        self.calls.iter().rev().find_map(|c| match c {
            DeviceCall::SetUniform {
                shader: s,
                name: n,
                value,
            } if *s == shader && n == name => Some(*value),
            _ => None,
        })
    }

    /// Last raw data block staged for `name` on `shader`.
    pub fn data(&self, shader: ShaderHandle, name: &str) -> Option<&[u8]> {
        self.calls.iter().rev().find_map(|c| match c {
            DeviceCall::SetData {
                shader: s,
                name: n,
                bytes,
            } if *s == shader && n == name => Some(bytes.as_slice()),
            _ => None,
        })
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&DeviceCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }

    /// Slot names written, in call order.
    pub fn slot_names(&self) -> Vec<&str> {
        self.calls.iter().filter_map(DeviceCall::slot).collect()
    }

    /// Human-readable call log, one call per line.
    pub fn log(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Device calls ({}) ===\n", self.calls.len()));
        for call in &self.calls {
            out.push_str(&format!("{call}\n"));
        }
        out
    }
}

impl ShaderBackend for RecordingDevice {
    fn activate(&mut self, shader: ShaderHandle) {
        self.calls.push(DeviceCall::Activate(shader));
    }

    fn set_uniform(&mut self, shader: ShaderHandle, name: &str, value: UniformValue) {
        self.calls.push(DeviceCall::SetUniform {
            shader,
            name: name.to_string(),
            value,
        });
    }

    fn set_data(&mut self, shader: ShaderHandle, name: &str, bytes: &[u8]) {
        self.calls.push(DeviceCall::SetData {
            shader,
            name: name.to_string(),
            bytes: bytes.to_vec(),
        });
    }

    fn set_texture(&mut self, shader: ShaderHandle, name: &str, texture: TextureHandle) {
        self.calls.push(DeviceCall::SetTexture {
            shader,
            name: name.to_string(),
            texture,
        });
    }

    fn set_sampler(&mut self, shader: ShaderHandle, name: &str, sampler: SamplerHandle) {
        self.calls.push(DeviceCall::SetSampler {
            shader,
            name: name.to_string(),
            sampler,
        });
    }

    fn commit(&mut self, shader: ShaderHandle) {
        self.calls.push(DeviceCall::Commit(shader));
    }
}

impl DrawBackend for RecordingDevice {
    fn set_raster_state(&mut self, state: RasterState) {
        self.calls.push(DeviceCall::SetRasterState(state));
    }

    fn draw_indexed(&mut self, mesh: &Mesh) {
        self.calls.push(DeviceCall::DrawIndexed {
            mesh: mesh.name.clone(),
            index_count: mesh.index_count,
        });
    }
}
