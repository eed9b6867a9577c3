use glam::Vec3;
use prism_common::{EntityId, FrameTime, MaterialHandle, MeshHandle, Transform};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::registry::AssetRegistry;
use crate::shader::RenderDevice;

/// Scripted per-frame animation applied to an entity's transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Motion {
    /// Rotate by `rate` radians per second on each axis. An axis that reaches
    /// a full turn wraps back to zero.
    Spin { rate: Vec3 },
    /// Set height to `amplitude * sin(total_time)`.
    Bob { amplitude: f32 },
}

impl Motion {
    pub fn apply(&self, transform: &mut Transform, time: FrameTime) {
        match *self {
            Motion::Spin { rate } => {
                let mut rotation = transform.rotation() + rate * time.delta;
                for (axis, r) in rotation.as_mut().iter_mut().enumerate() {
                    if rate[axis] != 0.0 && *r >= TAU {
                        *r = 0.0;
                    }
                }
                transform.set_rotation(rotation);
            }
            Motion::Bob { amplitude } => {
                let p = transform.position();
                transform.set_position(Vec3::new(p.x, amplitude * time.total.sin(), p.z));
            }
        }
    }
}

/// A drawable object: its own transform plus shared mesh and material.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    transform: Transform,
    mesh: MeshHandle,
    material: MaterialHandle,
    motion: Option<Motion>,
}

impl Entity {
    pub fn new(name: impl Into<String>, mesh: MeshHandle, material: MaterialHandle) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            transform: Transform::new(),
            mesh,
            material,
            motion: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    pub fn motion(&self) -> Option<Motion> {
        self.motion
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_mesh(&mut self, mesh: MeshHandle) {
        self.mesh = mesh;
    }

    pub fn set_material(&mut self, material: MaterialHandle) {
        self.material = material;
    }

    pub fn set_motion(&mut self, motion: Option<Motion>) {
        self.motion = motion;
    }

    /// Advance this entity's motion, if it has one.
    pub fn animate(&mut self, time: FrameTime) {
        if let Some(motion) = self.motion {
            motion.apply(&mut self.transform, time);
        }
    }

    /// Bind material inputs for this entity and issue its draw.
    pub fn draw<D: RenderDevice + ?Sized>(
        &mut self,
        assets: &AssetRegistry,
        device: &mut D,
        camera: &Camera,
    ) -> Result<(), RenderError> {
        let mesh = assets
            .mesh(self.mesh)
            .ok_or(RenderError::UnknownMesh(self.mesh))?;
        let material = assets
            .material(self.material)
            .ok_or(RenderError::UnknownMaterial(self.material))?;
        tracing::trace!(entity = %self.name, mesh = %mesh.name, "draw");
        material.send_data_to_shader(&mut self.transform, camera, device);
        device.draw_indexed(mesh);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::mesh::Mesh;
    use crate::recording::{DeviceCall, RecordingDevice};
    use prism_common::{BufferHandle, ShaderHandle};

    fn setup() -> (AssetRegistry, Entity) {
        let mut assets = AssetRegistry::new();
        let mesh = assets.insert_mesh(Mesh::new("cube", BufferHandle(0), BufferHandle(1), 24, 36));
        let material =
            assets.insert_material(Material::new(ShaderHandle(1), ShaderHandle(2), Vec3::ONE));
        (assets, Entity::new("Cube", mesh, material))
    }

    fn frame(delta: f32, total: f32) -> FrameTime {
        FrameTime {
            delta,
            total,
            frame: 1,
        }
    }

    #[test]
    fn draw_binds_material_then_draws_mesh() {
        let (assets, mut entity) = setup();
        let mut dev = RecordingDevice::new();
        entity.draw(&assets, &mut dev, &Camera::default()).unwrap();

        let calls = dev.calls();
        assert_eq!(calls[0], DeviceCall::Activate(ShaderHandle(1)));
        assert_eq!(
            calls.last(),
            Some(&DeviceCall::DrawIndexed {
                mesh: "cube".into(),
                index_count: 36
            })
        );
        assert_eq!(calls[calls.len() - 2], DeviceCall::Commit(ShaderHandle(2)));
        assert_eq!(dev.draw_count(), 1);
    }

    #[test]
    fn draw_with_missing_assets_fails() {
        let (mut assets, mut entity) = setup();
        let mut dev = RecordingDevice::new();
        entity.set_material(MaterialHandle(99));
        assert!(matches!(
            entity.draw(&assets, &mut dev, &Camera::default()),
            Err(RenderError::UnknownMaterial(MaterialHandle(99)))
        ));
        assets.remove_mesh(entity.mesh());
        assert!(matches!(
            entity.draw(&assets, &mut dev, &Camera::default()),
            Err(RenderError::UnknownMesh(_))
        ));
        assert!(dev.calls().is_empty());
    }

    #[test]
    fn mesh_hot_swap() {
        let (mut assets, mut entity) = setup();
        let sphere =
            assets.insert_mesh(Mesh::new("sphere", BufferHandle(2), BufferHandle(3), 100, 600));
        entity.set_mesh(sphere);
        let mut dev = RecordingDevice::new();
        entity.draw(&assets, &mut dev, &Camera::default()).unwrap();
        assert!(matches!(
            dev.calls().last(),
            Some(DeviceCall::DrawIndexed { index_count: 600, .. })
        ));
    }

    #[test]
    fn spin_accumulates_and_wraps() {
        let mut t = Transform::new();
        let spin = Motion::Spin {
            rate: Vec3::new(0.0, 1.0, 2.0),
        };
        spin.apply(&mut t, frame(0.5, 0.5));
        assert_eq!(t.rotation(), Vec3::new(0.0, 0.5, 1.0));

        t.set_rotation(Vec3::new(0.0, TAU - 0.1, 1.0));
        spin.apply(&mut t, frame(0.5, 1.0));
        let r = t.rotation();
        assert_eq!(r.y, 0.0);
        assert_eq!(r.z, 2.0);
    }

    #[test]
    fn spin_leaves_still_axes_alone() {
        let mut t = Transform::new();
        t.set_rotation(Vec3::new(7.0, 0.0, 0.0));
        Motion::Spin { rate: Vec3::Y }.apply(&mut t, frame(0.1, 0.1));
        assert_eq!(t.rotation().x, 7.0);
    }

    #[test]
    fn bob_follows_total_time() {
        let mut t = Transform::new();
        t.set_position(Vec3::new(3.0, 10.0, -1.0));
        let total = std::f32::consts::FRAC_PI_2;
        Motion::Bob { amplitude: 2.0 }.apply(&mut t, frame(0.016, total));
        assert!(t.position().abs_diff_eq(Vec3::new(3.0, 2.0, -1.0), 1e-5));
    }

    #[test]
    fn animate_without_motion_is_noop() {
        let (_, mut entity) = setup();
        entity.animate(frame(1.0, 1.0));
        assert_eq!(entity.transform().rotation(), Vec3::ZERO);
        assert_eq!(entity.transform().position(), Vec3::ZERO);
    }

    #[test]
    fn motion_parses_from_yaml() {
        let m: Motion = serde_yaml::from_str("kind: spin\nrate: [0.0, 1.0, 0.0]\n").unwrap();
        assert_eq!(m, Motion::Spin { rate: Vec3::Y });
        let m: Motion = serde_yaml::from_str("kind: bob\namplitude: 1.0\n").unwrap();
        assert_eq!(m, Motion::Bob { amplitude: 1.0 });
    }
}
