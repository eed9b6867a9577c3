//! Developer tooling: scene, camera, entity and material inspectors.
//!
//! # Invariants
//! - Inspectors only read. Editing goes through the scene's own accessors.

mod inspector;

pub use inspector::{CameraInfo, EntityInfo, MaterialInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "prism-tools v0.1.0"
}
