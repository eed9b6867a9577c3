use std::fmt;

use glam::Vec3;
use prism_common::{EntityId, MaterialHandle, rotation_quat};
use prism_render::{AssetRegistry, Camera, Entity, Material, Motion, Projection, Scene};
use serde::Serialize;

/// Read-only queries against a scene for debugging and editor panels.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene) -> SceneSummary {
        SceneSummary {
            entity_count: scene.entities().len(),
            mesh_count: scene.assets().mesh_count(),
            material_count: scene.assets().material_count(),
            camera_count: scene.cameras().len(),
            active_camera: scene.active_camera_index(),
            light_count: scene.lights().len(),
            has_sky: scene.sky().is_some(),
            motion_paused: scene.motion_paused(),
            gamma: scene.gamma(),
            ambient: scene.ambient_color().to_array(),
        }
    }

    pub fn camera_info(index: usize, camera: &Camera) -> CameraInfo {
        CameraInfo {
            index,
            position: camera.position().to_array(),
            rotation: camera.transform().rotation().to_array(),
            fov_degrees: camera.field_of_view().to_degrees(),
            aspect_ratio: camera.aspect_ratio(),
            near_clip: camera.near_clip_distance(),
            far_clip: camera.far_clip_distance(),
            orthographic: camera.projection() == Projection::Orthographic,
            move_speed: camera.move_speed(),
            rotation_speed: camera.rotation_speed(),
        }
    }

    pub fn cameras(scene: &Scene) -> Vec<CameraInfo> {
        scene
            .cameras()
            .iter()
            .enumerate()
            .map(|(i, c)| Self::camera_info(i, c))
            .collect()
    }

    pub fn entity_info(entity: &Entity, assets: &AssetRegistry) -> EntityInfo {
        let t = entity.transform();
        let forward = rotation_quat(t.rotation()) * Vec3::Z;
        EntityInfo {
            id: entity.id(),
            name: entity.name().to_string(),
            position: t.position().to_array(),
            rotation: t.rotation().to_array(),
            scale: t.scale().to_array(),
            forward: forward.to_array(),
            mesh: assets.mesh(entity.mesh()).map(|m| m.name.clone()),
            material: entity.material().0,
            motion: entity.motion().map(|m| match m {
                Motion::Spin { .. } => "spin",
                Motion::Bob { .. } => "bob",
            }),
        }
    }

    pub fn entities(scene: &Scene) -> Vec<EntityInfo> {
        scene
            .entities()
            .iter()
            .map(|e| Self::entity_info(e, scene.assets()))
            .collect()
    }

    /// `users` is how many entities reference the material.
    pub fn material_info(handle: MaterialHandle, material: &Material, users: usize) -> MaterialInfo {
        MaterialInfo {
            handle: handle.0,
            vertex_shader: material.vertex_shader().0,
            pixel_shader: material.pixel_shader().0,
            tint: material.color_tint().to_array(),
            roughness: material.roughness(),
            use_specular_map: material.use_specular_map(),
            uv_scale: material.uv_scale().to_array(),
            uv_offset: material.uv_offset().to_array(),
            textures: material.textures().keys().cloned().collect(),
            samplers: material.samplers().keys().cloned().collect(),
            users,
        }
    }

    pub fn materials(scene: &Scene) -> Vec<MaterialInfo> {
        scene
            .assets()
            .materials()
            .map(|(h, m)| {
                let users = scene.entities().iter().filter(|e| e.material() == h).count();
                Self::material_info(h, m, users)
            })
            .collect()
    }

    pub fn find_entity(scene: &Scene, id: EntityId) -> Option<EntityInfo> {
        scene
            .entity(id)
            .map(|e| Self::entity_info(e, scene.assets()))
    }
}

/// Counts and frame parameters for a scene.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub entity_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub camera_count: usize,
    pub active_camera: usize,
    pub light_count: usize,
    pub has_sky: bool,
    pub motion_paused: bool,
    pub gamma: f32,
    pub ambient: [f32; 3],
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scene: entities={} meshes={} materials={} cameras={} (active {}) lights={} sky={} paused={} gamma={:.2}",
            self.entity_count,
            self.mesh_count,
            self.material_count,
            self.camera_count,
            self.active_camera,
            self.light_count,
            self.has_sky,
            self.motion_paused,
            self.gamma,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CameraInfo {
    pub index: usize,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub orthographic: bool,
    pub move_speed: f32,
    pub rotation_speed: f32,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Camera {} pos=({:.2}, {:.2}, {:.2}) fov={:.1} aspect={:.2} clip=[{}, {}] {}",
            self.index,
            self.position[0],
            self.position[1],
            self.position[2],
            self.fov_degrees,
            self.aspect_ratio,
            self.near_clip,
            self.far_clip,
            if self.orthographic { "ortho" } else { "persp" },
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub forward: [f32; 3],
    /// `None` if the mesh handle no longer resolves.
    pub mesh: Option<String>,
    pub material: u64,
    pub motion: Option<&'static str>,
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity [{}] {} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2}) mesh={} material#{}",
            self.id.short(),
            self.name,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
            self.mesh.as_deref().unwrap_or("<missing>"),
            self.material,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialInfo {
    pub handle: u64,
    pub vertex_shader: u64,
    pub pixel_shader: u64,
    pub tint: [f32; 3],
    pub roughness: f32,
    pub use_specular_map: bool,
    pub uv_scale: [f32; 2],
    pub uv_offset: [f32; 2],
    pub textures: Vec<String>,
    pub samplers: Vec<String>,
    pub users: usize,
}

impl fmt::Display for MaterialInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Material #{} tint=({:.2}, {:.2}, {:.2}) roughness={:.2} textures=[{}] users={}",
            self.handle,
            self.tint[0],
            self.tint[1],
            self.tint[2],
            self.roughness,
            self.textures.join(", "),
            self.users,
        )
    }
}
