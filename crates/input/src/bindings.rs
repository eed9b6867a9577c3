use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::snapshot::{InputSnapshot, Key};

/// Key assignments for camera movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraBindings {
    pub forward: Key,
    pub back: Key,
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
}

impl Default for CameraBindings {
    fn default() -> Self {
        Self {
            forward: Key::W,
            back: Key::S,
            left: Key::A,
            right: Key::D,
            up: Key::Space,
            down: Key::X,
        }
    }
}

/// What the camera should do this frame, independent of the device that produced it.
///
/// Axes are in [-1, 1]. `look` is the raw pointer delta and is present only
/// while the drag button is held.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraIntent {
    /// +1 moves along the camera's facing direction.
    pub forward: f32,
    /// +1 moves toward the camera's right.
    pub strafe: f32,
    /// +1 moves up along world Y.
    pub lift: f32,
    pub look: Option<Vec2>,
}

impl CameraIntent {
    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0 && self.lift == 0.0 && self.look.is_none()
    }
}

fn axis(input: &InputSnapshot, positive: Key, negative: Key) -> f32 {
    let mut value = 0.0;
    if input.key_down(positive) {
        value += 1.0;
    }
    if input.key_down(negative) {
        value -= 1.0;
    }
    value
}

impl CameraBindings {
    /// Map a snapshot to a camera intent.
    pub fn intent(&self, input: &InputSnapshot) -> CameraIntent {
        CameraIntent {
            forward: axis(input, self.forward, self.back),
            strafe: axis(input, self.right, self.left),
            lift: axis(input, self.up, self.down),
            look: input.drag_down().then_some(input.pointer_delta),
        }
    }
}
