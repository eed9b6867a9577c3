use glam::Vec3;
use prism_common::{EntityId, FrameTime, MaterialHandle, MeshHandle};
use prism_input::{CameraBindings, InputSnapshot};

use crate::camera::Camera;
use crate::entity::Entity;
use crate::error::RenderError;
use crate::light::{Light, MAX_LIGHTS, pack_lights};
use crate::material::Material;
use crate::mesh::Mesh;
use crate::registry::AssetRegistry;
use crate::shader::{RenderDevice, slots};
use crate::sky::Sky;

pub const DEFAULT_AMBIENT: Vec3 = Vec3::splat(0.15);
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Everything one frame needs: assets, entities, cameras, lights and sky.
///
/// A frame is `update` followed by `draw`. Both take `&mut self`, so every
/// transform read during draw sees the settled state from update.
#[derive(Debug)]
pub struct Scene {
    assets: AssetRegistry,
    entities: Vec<Entity>,
    /// Never empty.
    cameras: Vec<Camera>,
    active_camera: usize,
    lights: Vec<Light>,
    ambient_color: Vec3,
    gamma: f32,
    sky: Option<Sky>,
    bindings: CameraBindings,
    motion_paused: bool,
}

impl Scene {
    /// Create an empty scene viewed through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            assets: AssetRegistry::new(),
            entities: Vec::new(),
            cameras: vec![camera],
            active_camera: 0,
            lights: Vec::new(),
            ambient_color: DEFAULT_AMBIENT,
            gamma: DEFAULT_GAMMA,
            sky: None,
            bindings: CameraBindings::default(),
            motion_paused: false,
        }
    }

    // Assets

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshHandle {
        self.assets.insert_mesh(mesh)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.assets.insert_material(material)
    }

    /// Remove a material no entity uses any more.
    pub fn remove_material(&mut self, handle: MaterialHandle) -> Result<Material, RenderError> {
        if self.entities.iter().any(|e| e.material() == handle) {
            return Err(RenderError::MaterialInUse(handle));
        }
        self.assets
            .remove_material(handle)
            .ok_or(RenderError::UnknownMaterial(handle))
    }

    /// Remove a mesh that neither an entity nor the sky uses.
    pub fn remove_mesh(&mut self, handle: MeshHandle) -> Result<Mesh, RenderError> {
        let sky_uses = self.sky.as_ref().is_some_and(|s| s.mesh == handle);
        if sky_uses || self.entities.iter().any(|e| e.mesh() == handle) {
            return Err(RenderError::MeshInUse(handle));
        }
        self.assets
            .remove_mesh(handle)
            .ok_or(RenderError::UnknownMesh(handle))
    }

    // Entities

    /// Add an entity. Entities draw in insertion order.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        tracing::debug!(id = %id.short(), name = entity.name(), "entity added");
        self.entities.push(entity);
        id
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, RenderError> {
        let index = self
            .entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or(RenderError::EntityNotFound(id))?;
        Ok(self.entities.remove(index))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn find_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Point every entity whose name contains `pattern` at `mesh`.
    /// Returns how many entities changed.
    pub fn swap_mesh_matching(&mut self, pattern: &str, mesh: MeshHandle) -> usize {
        let mut count = 0;
        for entity in self.entities.iter_mut().filter(|e| e.name().contains(pattern)) {
            entity.set_mesh(mesh);
            count += 1;
        }
        count
    }

    /// Lay entities out in a row through `origin`, `spacing` apart.
    ///
    /// The entity at index `len / 2` sits on `origin`. Earlier entities step
    /// toward their local -X, later ones toward local +X.
    pub fn layout_row(
        &mut self,
        ids: &[EntityId],
        origin: Vec3,
        spacing: f32,
    ) -> Result<(), RenderError> {
        let halfway = ids.len() / 2;
        for (i, id) in ids.iter().enumerate() {
            let entity = self
                .entity_mut(*id)
                .ok_or(RenderError::EntityNotFound(*id))?;
            let transform = entity.transform_mut();
            transform.set_position(origin);
            if i < halfway {
                transform.move_relative(Vec3::new(-spacing * (i + 1) as f32, 0.0, 0.0));
            } else if i > halfway {
                transform.move_relative(Vec3::new(spacing * (i - halfway) as f32, 0.0, 0.0));
            }
        }
        Ok(())
    }

    // Cameras

    /// Add a camera and return its index.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn camera_mut(&mut self, index: usize) -> Option<&mut Camera> {
        self.cameras.get_mut(index)
    }

    pub fn active_camera_index(&self) -> usize {
        self.active_camera
    }

    pub fn active_camera(&self) -> &Camera {
        &self.cameras[self.active_camera]
    }

    pub fn active_camera_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.active_camera]
    }

    pub fn set_active_camera(&mut self, index: usize) -> Result<(), RenderError> {
        if index >= self.cameras.len() {
            return Err(RenderError::NoCamera {
                index,
                count: self.cameras.len(),
            });
        }
        tracing::debug!(from = self.active_camera, to = index, "active camera changed");
        self.active_camera = index;
        Ok(())
    }

    /// Propagate a new window size to every camera's projection.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "resize to empty surface ignored");
            return;
        }
        let aspect = width as f32 / height as f32;
        for camera in &mut self.cameras {
            camera.update_projection_matrix(aspect);
        }
    }

    // Lighting and frame parameters

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut Vec<Light> {
        &mut self.lights
    }

    pub fn add_light(&mut self, light: Light) {
        if self.lights.len() >= MAX_LIGHTS {
            tracing::debug!(max = MAX_LIGHTS, "light beyond shader capacity will not be drawn");
        }
        self.lights.push(light);
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color
    }

    pub fn set_ambient_color(&mut self, color: Vec3) {
        self.ambient_color = color;
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    pub fn set_gamma(&mut self, gamma: f32) {
        self.gamma = gamma;
    }

    pub fn sky(&self) -> Option<&Sky> {
        self.sky.as_ref()
    }

    pub fn set_sky(&mut self, sky: Option<Sky>) {
        self.sky = sky;
    }

    pub fn bindings(&self) -> &CameraBindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: CameraBindings) {
        self.bindings = bindings;
    }

    pub fn motion_paused(&self) -> bool {
        self.motion_paused
    }

    pub fn set_motion_paused(&mut self, paused: bool) {
        self.motion_paused = paused;
    }

    // Frame

    /// Animate entities, then move the active camera from input.
    pub fn update(&mut self, time: FrameTime, input: &InputSnapshot) {
        let _span = tracing::info_span!("scene_update", frame = time.frame).entered();
        if !self.motion_paused {
            for entity in &mut self.entities {
                entity.animate(time);
            }
        }
        let intent = self.bindings.intent(input);
        self.cameras[self.active_camera].update(time.delta, &intent);
    }

    /// Draw every entity through the active camera, then the sky.
    ///
    /// Each entity's pixel shader is activated and receives the frame inputs
    /// (time, gamma, ambient color, lights) before the entity binds its
    /// material.
    pub fn draw<D: RenderDevice + ?Sized>(
        &mut self,
        device: &mut D,
        time: FrameTime,
    ) -> Result<(), RenderError> {
        let _span = tracing::info_span!("scene_draw", frame = time.frame).entered();
        let packed = pack_lights(&self.lights);
        let count = self.lights.len().min(MAX_LIGHTS);
        let light_bytes: &[u8] = bytemuck::cast_slice(&packed[..count]);
        let camera = &self.cameras[self.active_camera];

        for entity in &mut self.entities {
            let material = self
                .assets
                .material(entity.material())
                .ok_or(RenderError::UnknownMaterial(entity.material()))?;
            let ps = material.pixel_shader();
            device.activate(ps);
            device.set_uniform(ps, slots::TIME, time.total.into());
            device.set_uniform(ps, slots::GAMMA, self.gamma.into());
            device.set_uniform(ps, slots::AMBIENT_COLOR, self.ambient_color.into());
            device.set_data(ps, slots::LIGHTS, light_bytes);

            entity.draw(&self.assets, device, camera)?;
        }

        if let Some(sky) = &self.sky {
            sky.draw(&self.assets, device, camera)?;
        }
        tracing::trace!(entities = self.entities.len(), "frame drawn");
        Ok(())
    }
}
