use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, Euler rotation (pitch, yaw, roll) and scale.
///
/// The world matrix, its inverse-transpose and the right/up/forward basis are
/// derived lazily. Two independent dirty flags track them: any mutation marks
/// the matrices dirty, only rotation mutations mark the basis dirty, so pure
/// translation or scale changes never redo the basis trigonometry.
///
/// Rotation is accumulated as Euler angles. Pitch near ±π/2 gimbal-locks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TransformRepr", into = "TransformRepr")]
pub struct Transform {
    position: Vec3,
    /// x = pitch, y = yaw, z = roll, in radians.
    rotation: Vec3,
    scale: Vec3,

    world: Mat4,
    world_inverse_transpose: Mat4,
    right: Vec3,
    up: Vec3,
    forward: Vec3,

    matrices_dirty: bool,
    basis_dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            world: Mat4::IDENTITY,
            world_inverse_transpose: Mat4::IDENTITY,
            right: Vec3::X,
            up: Vec3::Y,
            forward: Vec3::Z,
            matrices_dirty: false,
            basis_dirty: false,
        }
    }
}

/// Rotation quaternion for a pitch/yaw/roll triple: roll first, then pitch, then yaw.
pub fn rotation_quat(pitch_yaw_roll: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        pitch_yaw_roll.y,
        pitch_yaw_roll.x,
        pitch_yaw_roll.z,
    )
}

impl Transform {
    /// Identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transform from explicit components.
    pub fn from_parts(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let mut t = Self::default();
        t.set_position(position);
        t.set_rotation(rotation);
        t.set_scale(scale);
        t
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.matrices_dirty = true;
    }

    pub fn set_rotation(&mut self, pitch_yaw_roll: Vec3) {
        self.rotation = pitch_yaw_roll;
        self.matrices_dirty = true;
        self.basis_dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.matrices_dirty = true;
    }

    /// Offset the position along the world axes.
    pub fn move_absolute(&mut self, offset: Vec3) {
        self.position += offset;
        self.matrices_dirty = true;
    }

    /// Offset the position along the transform's own axes.
    ///
    /// `(0, 0, 1)` always moves along the current facing direction.
    pub fn move_relative(&mut self, offset: Vec3) {
        self.position += rotation_quat(self.rotation) * offset;
        self.matrices_dirty = true;
    }

    /// Add to the pitch/yaw/roll angles.
    pub fn rotate(&mut self, pitch_yaw_roll: Vec3) {
        self.rotation += pitch_yaw_roll;
        self.matrices_dirty = true;
        self.basis_dirty = true;
    }

    /// Multiply the current scale component-wise.
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.matrices_dirty = true;
    }

    /// Local-to-world matrix: scale, then rotate, then translate.
    pub fn world_matrix(&mut self) -> Mat4 {
        self.update_matrices();
        self.world
    }

    /// Inverse-transpose of the world matrix, for transforming normals.
    pub fn world_inverse_transpose_matrix(&mut self) -> Mat4 {
        self.update_matrices();
        self.world_inverse_transpose
    }

    pub fn right(&mut self) -> Vec3 {
        self.update_basis();
        self.right
    }

    pub fn up(&mut self) -> Vec3 {
        self.update_basis();
        self.up
    }

    pub fn forward(&mut self) -> Vec3 {
        self.update_basis();
        self.forward
    }

    /// Whether the next matrix read will recompute.
    pub fn matrices_dirty(&self) -> bool {
        self.matrices_dirty
    }

    /// Whether the next basis read will recompute.
    pub fn basis_dirty(&self) -> bool {
        self.basis_dirty
    }

    fn update_matrices(&mut self) {
        if !self.matrices_dirty {
            return;
        }
        let world = Mat4::from_scale_rotation_translation(
            self.scale,
            rotation_quat(self.rotation),
            self.position,
        );
        self.world = world;
        self.world_inverse_transpose = world.inverse().transpose();
        self.matrices_dirty = false;
        tracing::trace!(position = ?self.position, "world matrix rebuilt");
    }

    fn update_basis(&mut self) {
        if !self.basis_dirty {
            return;
        }
        let q = rotation_quat(self.rotation);
        self.right = q * Vec3::X;
        self.up = q * Vec3::Y;
        self.forward = q * Vec3::Z;
        self.basis_dirty = false;
    }
}

/// Serialized form: only the source fields, caches are rebuilt on first read.
#[derive(Serialize, Deserialize)]
struct TransformRepr {
    #[serde(default)]
    position: Vec3,
    #[serde(default)]
    rotation: Vec3,
    #[serde(default = "unit_scale")]
    scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl From<TransformRepr> for Transform {
    fn from(r: TransformRepr) -> Self {
        Self::from_parts(r.position, r.rotation, r.scale)
    }
}

impl From<Transform> for TransformRepr {
    fn from(t: Transform) -> Self {
        Self {
            position: t.position,
            rotation: t.rotation,
            scale: t.scale,
        }
    }
}
