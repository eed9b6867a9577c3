//! Input snapshots: per-frame key and pointer state handed to the camera.
//!
//! # Invariants
//! - No global input state. Callers build an [`InputSnapshot`] per frame and pass it in.
//! - Cameras consume [`CameraIntent`]s, never raw key codes.

pub mod bindings;
pub mod snapshot;

pub use bindings::{CameraBindings, CameraIntent};
pub use snapshot::{InputSnapshot, Key};

pub fn crate_info() -> &'static str {
    "prism-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
