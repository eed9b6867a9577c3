//! Camera, material binding and scene driving over a backend-agnostic
//! shader interface.
//!
//! # Invariants
//! - The core never talks to a GPU directly. Everything goes through
//!   [`ShaderBackend`] and [`DrawBackend`].
//! - A shader is activated before any of its inputs are written, and all of a
//!   stage's inputs are written before that stage is committed.
//! - Meshes and materials live in the [`AssetRegistry`]; entities hold handles.
//! - Invalid camera clip planes never reach the projection matrix.
//!
//! [`RecordingDevice`] stands in for a real backend in tests and headless runs.

pub mod camera;
pub mod config;
pub mod entity;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod recording;
pub mod registry;
pub mod scene;
pub mod shader;
pub mod sky;

pub use camera::{Camera, CameraDesc, Projection};
pub use config::SceneConfig;
pub use entity::{Entity, Motion};
pub use error::{CameraError, ConfigError, RenderError};
pub use light::{GpuLight, Light, LightKind, MAX_LIGHTS};
pub use material::Material;
pub use mesh::Mesh;
pub use recording::{DeviceCall, RecordingDevice};
pub use registry::AssetRegistry;
pub use scene::Scene;
pub use shader::{DrawBackend, RasterState, RenderDevice, ShaderBackend, UniformValue, slots};
pub use sky::Sky;

pub fn crate_info() -> &'static str {
    "prism-render v0.1.0"
}
