//! Shared types for the prism renderer.
//!
//! # Invariants
//! - Derived transform state is never stale when read.
//! - Handles are opaque ids; the resources they name live with external collaborators.

pub mod time;
pub mod transform;
pub mod types;

pub use time::{FrameClock, FrameTime, FrameStats};
pub use transform::{Transform, rotation_quat};
pub use types::{
    BufferHandle, EntityId, MaterialHandle, MeshHandle, SamplerHandle, ShaderHandle,
    TextureHandle,
};

pub fn crate_info() -> &'static str {
    "prism-common v0.1.0"
}
