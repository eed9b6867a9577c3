use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Keys the renderer core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    X,
    Space,
    Shift,
    Control,
    Escape,
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_lowercase().as_str() {
            "w" => Self::W,
            "a" => Self::A,
            "s" => Self::S,
            "d" => Self::D,
            "q" => Self::Q,
            "e" => Self::E,
            "x" => Self::X,
            "space" | " " => Self::Space,
            "shift" => Self::Shift,
            "control" | "ctrl" => Self::Control,
            "escape" | "esc" => Self::Escape,
            other => return Err(format!("unknown key '{other}'")),
        };
        Ok(key)
    }
}

/// Input state sampled once per frame.
///
/// `pointer_delta` is the pointer movement since the previous sample, in
/// pixels. `drag` is whether the look/drag button is held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    keys_down: BTreeSet<Key>,
    pub pointer_delta: Vec2,
    pub drag: bool,
    /// Set when a UI layer owns the keyboard this frame.
    pub keyboard_captured: bool,
    /// Set when a UI layer owns the pointer this frame.
    pub pointer_captured: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with the given keys held.
    pub fn with_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys_down: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Snapshot with the drag button held and the given pointer movement.
    pub fn dragging(mut self, delta: Vec2) -> Self {
        self.drag = true;
        self.pointer_delta = delta;
        self
    }

    pub fn press(&mut self, key: Key) {
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }

    /// Whether `key` is held. Always false while the keyboard is captured.
    pub fn key_down(&self, key: Key) -> bool {
        !self.keyboard_captured && self.keys_down.contains(&key)
    }

    /// Whether the drag button is held. Always false while the pointer is captured.
    pub fn drag_down(&self) -> bool {
        !self.pointer_captured && self.drag
    }

    /// Clear per-sample deltas, keeping held keys. Call after a frame consumes the snapshot.
    pub fn end_frame(&mut self) {
        self.pointer_delta = Vec2::ZERO;
    }
}
