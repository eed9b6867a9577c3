//! YAML scene descriptions.
//!
//! A [`SceneConfig`] names meshes and materials by string; entities, rows
//! and the sky refer to those names. [`SceneConfig::build`] resolves every
//! name and produces a ready-to-run [`Scene`].
//!
//! ```yaml
//! version: 1
//! cameras:
//!   - position: [0.0, 0.0, -15.0]
//! meshes:
//!   - { name: cube, vertex_buffer: 0, index_buffer: 1, vertex_count: 24, index_count: 36 }
//! materials:
//!   - { name: blue, vertex_shader: 0, pixel_shader: 1, tint: [0.0, 0.0, 1.0] }
//! entities:
//!   - { name: Cube, mesh: cube, material: blue }
//! ```

use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_4;
use std::path::Path;

use glam::{Vec2, Vec3};
use prism_common::{
    BufferHandle, EntityId, MaterialHandle, MeshHandle, SamplerHandle, ShaderHandle,
    TextureHandle, Transform,
};
use prism_input::CameraBindings;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CameraDesc};
use crate::entity::{Entity, Motion};
use crate::error::ConfigError;
use crate::light::Light;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::scene::{DEFAULT_AMBIENT, DEFAULT_GAMMA, Scene};
use crate::shader::slots;
use crate::sky::Sky;

/// Current scene file version.
pub const SCENE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub version: u32,
    pub ambient: Vec3,
    pub gamma: f32,
    pub active_camera: usize,
    pub motion_paused: bool,
    pub bindings: CameraBindings,
    pub cameras: Vec<CameraDesc>,
    pub lights: Vec<Light>,
    pub meshes: Vec<MeshConfig>,
    pub materials: Vec<MaterialConfig>,
    pub entities: Vec<EntityConfig>,
    pub rows: Vec<RowConfig>,
    pub sky: Option<SkyConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            version: SCENE_SCHEMA_VERSION,
            ambient: DEFAULT_AMBIENT,
            gamma: DEFAULT_GAMMA,
            active_camera: 0,
            motion_paused: false,
            bindings: CameraBindings::default(),
            cameras: vec![CameraDesc::default()],
            lights: Vec::new(),
            meshes: Vec::new(),
            materials: Vec::new(),
            entities: Vec::new(),
            rows: Vec::new(),
            sky: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub name: String,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub vertex_count: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    pub name: String,
    pub vertex_shader: ShaderHandle,
    pub pixel_shader: ShaderHandle,
    #[serde(default = "white")]
    pub tint: Vec3,
    #[serde(default)]
    pub roughness: f32,
    #[serde(default)]
    pub use_specular_map: bool,
    #[serde(default = "unit_uv")]
    pub uv_scale: Vec2,
    #[serde(default)]
    pub uv_offset: Vec2,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureHandle>,
    #[serde(default)]
    pub samplers: BTreeMap<String, SamplerHandle>,
}

fn claim<T>(seen: &BTreeMap<&str, T>, kind: &'static str, name: &str) -> Result<(), ConfigError> {
    if seen.contains_key(name) {
        return Err(ConfigError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn white() -> Vec3 {
    Vec3::ONE
}

fn unit_uv() -> Vec2 {
    Vec2::ONE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    pub mesh: String,
    pub material: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub motion: Option<Motion>,
}

/// Entities (by name) laid out with [`Scene::layout_row`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowConfig {
    pub entities: Vec<String>,
    #[serde(default)]
    pub origin: Vec3,
    pub spacing: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyConfig {
    pub mesh: String,
    pub cube_map: TextureHandle,
    pub sampler: SamplerHandle,
    pub vertex_shader: ShaderHandle,
    pub pixel_shader: ShaderHandle,
}

impl SceneConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        if config.version != SCENE_SCHEMA_VERSION {
            return Err(ConfigError::SchemaMismatch {
                file_version: config.version,
                expected_version: SCENE_SCHEMA_VERSION,
            });
        }
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(
            path = %path.display(),
            entities = config.entities.len(),
            cameras = config.cameras.len(),
            "scene config loaded"
        );
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Resolve names and build the scene. Mesh, material and entity names
    /// must each be unique within their list.
    pub fn build(&self) -> Result<Scene, ConfigError> {
        let mut cameras = self.cameras.iter().enumerate().map(|(index, desc)| {
            Camera::new(desc.clone()).map_err(|source| ConfigError::Camera { index, source })
        });
        let first = cameras.next().ok_or(ConfigError::NoCameras)??;
        let mut scene = Scene::new(first);
        for camera in cameras {
            scene.add_camera(camera?);
        }
        scene.set_active_camera(self.active_camera)?;

        let mut meshes: BTreeMap<&str, MeshHandle> = BTreeMap::new();
        for m in &self.meshes {
            claim(&meshes, "mesh", &m.name)?;
            let handle = scene.add_mesh(Mesh::new(
                m.name.clone(),
                m.vertex_buffer,
                m.index_buffer,
                m.vertex_count,
                m.index_count,
            ));
            meshes.insert(&m.name, handle);
        }

        let mut materials: BTreeMap<&str, MaterialHandle> = BTreeMap::new();
        for m in &self.materials {
            claim(&materials, "material", &m.name)?;
            let mut material = Material::new(m.vertex_shader, m.pixel_shader, m.tint)
                .with_roughness(m.roughness)
                .with_specular_map(m.use_specular_map)
                .with_uv_scale(m.uv_scale)
                .with_uv_offset(m.uv_offset);
            for (slot, texture) in &m.textures {
                material.add_texture(slot.clone(), *texture);
            }
            for (slot, sampler) in &m.samplers {
                material.add_sampler(slot.clone(), *sampler);
            }
            materials.insert(&m.name, scene.add_material(material));
        }

        let mut entity_ids: BTreeMap<&str, EntityId> = BTreeMap::new();
        for e in &self.entities {
            claim(&entity_ids, "entity", &e.name)?;
            let mesh = *meshes
                .get(e.mesh.as_str())
                .ok_or_else(|| ConfigError::UnknownMesh {
                    entity: e.name.clone(),
                    mesh: e.mesh.clone(),
                })?;
            let material = *materials.get(e.material.as_str()).ok_or_else(|| {
                ConfigError::UnknownMaterial {
                    entity: e.name.clone(),
                    material: e.material.clone(),
                }
            })?;
            let mut entity = Entity::new(e.name.clone(), mesh, material)
                .with_transform(e.transform.clone());
            entity.set_motion(e.motion);
            let id = scene.add_entity(entity);
            entity_ids.insert(&e.name, id);
        }

        for row in &self.rows {
            let ids = row
                .entities
                .iter()
                .map(|name| {
                    entity_ids
                        .get(name.as_str())
                        .copied()
                        .ok_or_else(|| ConfigError::UnknownEntity(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            scene.layout_row(&ids, row.origin, row.spacing)?;
        }

        if let Some(sky) = &self.sky {
            let mesh = *meshes
                .get(sky.mesh.as_str())
                .ok_or_else(|| ConfigError::UnknownSkyMesh(sky.mesh.clone()))?;
            scene.set_sky(Some(Sky {
                mesh,
                cube_map: sky.cube_map,
                sampler: sky.sampler,
                vertex_shader: sky.vertex_shader,
                pixel_shader: sky.pixel_shader,
            }));
        }

        for light in &self.lights {
            scene.add_light(*light);
        }
        scene.set_ambient_color(self.ambient);
        scene.set_gamma(self.gamma);
        scene.set_bindings(self.bindings.clone());
        scene.set_motion_paused(self.motion_paused);
        Ok(scene)
    }

    /// The reference scene: three cameras, three directional lights, a row of
    /// animated primitives, a row of textured test meshes and a sky.
    pub fn demo() -> Self {
        const VS: ShaderHandle = ShaderHandle(0);
        const PS: ShaderHandle = ShaderHandle(1);
        const TEXTURE_PS: ShaderHandle = ShaderHandle(2);
        const SKY_VS: ShaderHandle = ShaderHandle(3);
        const SKY_PS: ShaderHandle = ShaderHandle(4);
        const SAMPLER: SamplerHandle = SamplerHandle(0);

        let camera = |position: Vec3, rotation: Vec3, field_of_view: f32| CameraDesc {
            position,
            rotation,
            field_of_view,
            move_speed: 8.0,
            rotation_speed: 0.005,
            near_clip: 0.01,
            far_clip: 100.0,
            ..CameraDesc::default()
        };
        let cameras = vec![
            camera(Vec3::new(0.0, 0.0, -15.0), Vec3::ZERO, FRAC_PI_4),
            camera(
                Vec3::new(0.0, 15.0, -30.0),
                Vec3::new(0.475, 0.0, 0.0),
                32f32.to_radians(),
            ),
            camera(
                Vec3::new(1.7, 0.3, 10.5),
                Vec3::new(0.1, -0.9, 0.0),
                FRAC_PI_4 / 2.0 + FRAC_PI_4,
            ),
        ];

        let lights = [
            Vec3::new(1.0, 0.5, 0.5),
            Vec3::new(-0.25, -1.0, 0.75),
            Vec3::new(-1.0, 1.0, -0.5),
        ]
        .into_iter()
        .map(|dir| Light::directional(dir, Vec3::ONE, 1.0))
        .collect();

        let shapes = [
            ("cube", 24, 36),
            ("cylinder", 130, 252),
            ("helix", 1550, 3072),
            ("sphere", 559, 2880),
            ("torus", 561, 3072),
            ("quad", 8, 12),
        ];
        let meshes = shapes
            .iter()
            .enumerate()
            .map(|(i, (name, vertices, indices))| MeshConfig {
                name: (*name).to_string(),
                vertex_buffer: BufferHandle(2 * i as u64),
                index_buffer: BufferHandle(2 * i as u64 + 1),
                vertex_count: *vertices,
                index_count: *indices,
            })
            .collect();

        let solid = |name: &str, tint: Vec3, roughness: f32| MaterialConfig {
            name: name.to_string(),
            vertex_shader: VS,
            pixel_shader: PS,
            tint,
            roughness,
            use_specular_map: false,
            uv_scale: Vec2::ONE,
            uv_offset: Vec2::ZERO,
            textures: BTreeMap::new(),
            samplers: BTreeMap::new(),
        };
        let mut materials = vec![
            solid("blue", Vec3::new(0.0, 0.0, 1.0), 0.56),
            solid("green", Vec3::new(0.0, 1.0, 0.0), 0.14),
            solid("red", Vec3::new(1.0, 0.0, 0.0), 0.43),
            solid("cyan", Vec3::new(0.0, 1.0, 1.0), 1.0),
            solid("magenta", Vec3::new(1.0, 0.0, 0.5), 0.74),
            solid("yellow", Vec3::new(1.0, 1.0, 0.0), 0.26),
        ];
        let mut uv = solid("uv", Vec3::ONE, 1.0);
        uv.pixel_shader = TEXTURE_PS;
        uv.textures
            .insert(slots::DIFFUSE_TEXTURE.to_string(), TextureHandle(0));
        uv.textures.insert(slots::NORMAL_MAP.to_string(), TextureHandle(1));
        uv.samplers.insert(slots::BASIC_SAMPLER.to_string(), SAMPLER);
        let mut rusty = uv.clone();
        rusty.name = "rusty metal".to_string();
        rusty.roughness = 0.0;
        rusty.use_specular_map = true;
        rusty
            .textures
            .insert(slots::DIFFUSE_TEXTURE.to_string(), TextureHandle(2));
        rusty.textures.insert("SpecularMap".to_string(), TextureHandle(3));
        materials.push(uv);
        materials.push(rusty);

        let entity = |name: &str, mesh: &str, material: &str, motion: Option<Motion>| {
            EntityConfig {
                name: name.to_string(),
                mesh: mesh.to_string(),
                material: material.to_string(),
                transform: Transform::new(),
                motion,
            }
        };
        let spin = |rate: Vec3| Some(Motion::Spin { rate });
        let bob = Some(Motion::Bob { amplitude: 1.0 });
        let entities = vec![
            entity("Cube", "cube", "blue", spin(Vec3::new(0.0, 1.0, 1.0))),
            entity("Cylinder", "cylinder", "green", bob),
            entity("Helix", "helix", "red", spin(Vec3::Y)),
            entity("Sphere", "sphere", "cyan", bob),
            entity("Torus", "torus", "magenta", spin(Vec3::X)),
            entity("Quad", "quad", "yellow", spin(Vec3::Z)),
            entity("Texture Test 1", "sphere", "rusty metal", None),
            entity("UV Mesh", "sphere", "uv", None),
            entity("Texture Test 2", "sphere", "rusty metal", None),
        ];

        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }
        let rows = vec![
            RowConfig {
                entities: names(&["Cube", "Cylinder", "Helix", "Sphere", "Torus", "Quad"]),
                origin: Vec3::new(0.0, 0.0, 10.0),
                spacing: 4.0,
            },
            RowConfig {
                entities: names(&["Texture Test 1", "UV Mesh", "Texture Test 2"]),
                origin: Vec3::new(0.0, -2.0, 0.0),
                spacing: 4.0,
            },
        ];

        Self {
            cameras,
            lights,
            meshes,
            materials,
            entities,
            rows,
            sky: Some(SkyConfig {
                mesh: "cube".to_string(),
                cube_map: TextureHandle(100),
                sampler: SAMPLER,
                vertex_shader: SKY_VS,
                pixel_shader: SKY_PS,
            }),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CameraError;
    use crate::recording::RecordingDevice;
    use prism_common::FrameTime;

    const MINIMAL: &str = r#"
version: 1
cameras:
  - position: [0.0, 0.0, -15.0]
    move_speed: 8.0
meshes:
  - { name: cube, vertex_buffer: 0, index_buffer: 1, vertex_count: 24, index_count: 36 }
materials:
  - name: blue
    vertex_shader: 0
    pixel_shader: 1
    tint: [0.0, 0.0, 1.0]
    roughness: 1.5
    textures: { DiffuseTexture: 7 }
entities:
  - name: Cube
    mesh: cube
    material: blue
    transform: { position: [1.0, 2.0, 3.0] }
    motion: { kind: spin, rate: [0.0, 1.0, 0.0] }
"#;

    #[test]
    fn minimal_yaml_builds() {
        let config = SceneConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.gamma, 2.2);
        let scene = config.build().unwrap();

        assert_eq!(scene.cameras().len(), 1);
        assert_eq!(scene.active_camera().move_speed(), 8.0);
        assert_eq!(scene.active_camera().rotation_speed(), 0.003);
        let cube = scene.find_entity("Cube").unwrap();
        assert_eq!(cube.transform().position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cube.transform().scale(), Vec3::ONE);
        assert!(matches!(cube.motion(), Some(Motion::Spin { .. })));

        let material = scene.assets().material(cube.material()).unwrap();
        assert_eq!(material.roughness(), 1.0);
        assert_eq!(material.textures()["DiffuseTexture"], TextureHandle(7));
    }

    #[test]
    fn unknown_mesh_is_reported() {
        let text = MINIMAL.replace("mesh: cube", "mesh: torus");
        let err = SceneConfig::from_yaml(&text).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMesh { ref mesh, .. } if mesh == "torus"));
    }

    #[test]
    fn unknown_material_is_reported() {
        let text = MINIMAL.replace("material: blue", "material: gold");
        let err = SceneConfig::from_yaml(&text).unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMaterial { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut config = SceneConfig::from_yaml(MINIMAL).unwrap();
        config.meshes.push(config.meshes[0].clone());
        assert!(matches!(
            config.build(),
            Err(ConfigError::DuplicateName { kind: "mesh", ref name }) if name == "cube"
        ));

        let mut config = SceneConfig::from_yaml(MINIMAL).unwrap();
        config.materials.push(config.materials[0].clone());
        assert!(matches!(
            config.build(),
            Err(ConfigError::DuplicateName { kind: "material", .. })
        ));

        let mut config = SceneConfig::from_yaml(MINIMAL).unwrap();
        config.entities.push(config.entities[0].clone());
        assert!(matches!(
            config.build(),
            Err(ConfigError::DuplicateName { kind: "entity", .. })
        ));
    }

    #[test]
    fn orthographic_camera_needs_positive_height() {
        let text = MINIMAL.replace("move_speed: 8.0", "move_speed: 8.0\n    projection: orthographic\n    ortho_height: 0.0");
        let err = SceneConfig::from_yaml(&text).unwrap().build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Camera {
                index: 0,
                source: CameraError::InvalidOrthoHeight(_)
            }
        ));
    }

    #[test]
    fn empty_camera_list_is_rejected() {
        let config = SceneConfig {
            cameras: Vec::new(),
            ..SceneConfig::default()
        };
        assert!(matches!(config.build(), Err(ConfigError::NoCameras)));
    }

    #[test]
    fn invalid_camera_clip_is_rejected() {
        let config = SceneConfig {
            cameras: vec![
                CameraDesc::default(),
                CameraDesc {
                    near_clip: 5.0,
                    far_clip: 5.0,
                    ..CameraDesc::default()
                },
            ],
            ..SceneConfig::default()
        };
        assert!(matches!(
            config.build(),
            Err(ConfigError::Camera { index: 1, .. })
        ));
    }

    #[test]
    fn active_camera_out_of_range() {
        let config = SceneConfig {
            active_camera: 4,
            ..SceneConfig::default()
        };
        assert!(matches!(config.build(), Err(ConfigError::Render(_))));
    }

    #[test]
    fn schema_mismatch() {
        let text = MINIMAL.replace("version: 1", "version: 9");
        assert!(matches!(
            SceneConfig::from_yaml(&text),
            Err(ConfigError::SchemaMismatch { file_version: 9, .. })
        ));
    }

    #[test]
    fn row_with_unknown_entity() {
        let mut config = SceneConfig::from_yaml(MINIMAL).unwrap();
        config.rows.push(RowConfig {
            entities: vec!["Ghost".into()],
            origin: Vec3::ZERO,
            spacing: 1.0,
        });
        assert!(matches!(config.build(), Err(ConfigError::UnknownEntity(_))));
    }

    #[test]
    fn demo_scene_matches_reference_layout() {
        let scene = SceneConfig::demo().build().unwrap();
        assert_eq!(scene.cameras().len(), 3);
        assert_eq!(scene.lights().len(), 3);
        assert_eq!(scene.entities().len(), 9);
        assert!(scene.sky().is_some());
        assert_eq!(scene.ambient_color(), Vec3::splat(0.15));

        assert_eq!(scene.cameras()[0].position(), Vec3::new(0.0, 0.0, -15.0));
        assert_eq!(scene.cameras()[0].move_speed(), 8.0);
        // Six shapes: index 3 (Sphere) sits on the row origin.
        let sphere = scene.find_entity("Sphere").unwrap();
        assert_eq!(sphere.transform().position(), Vec3::new(0.0, 0.0, 10.0));
        let cube = scene.find_entity("Cube").unwrap();
        assert_eq!(cube.transform().position(), Vec3::new(-4.0, 0.0, 10.0));
        let quad = scene.find_entity("Quad").unwrap();
        assert_eq!(quad.transform().position(), Vec3::new(8.0, 0.0, 10.0));
    }

    #[test]
    fn demo_scene_draws_every_entity_and_sky() {
        let mut scene = SceneConfig::demo().build().unwrap();
        let mut dev = RecordingDevice::new();
        let time = FrameTime {
            delta: 0.016,
            total: 0.016,
            frame: 1,
        };
        scene.update(time, &prism_input::InputSnapshot::new());
        scene.draw(&mut dev, time).unwrap();
        assert_eq!(dev.draw_count(), 10);
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yaml");
        SceneConfig::demo().save(&path).unwrap();

        let loaded = SceneConfig::load(&path).unwrap();
        assert_eq!(loaded.entities.len(), 9);
        assert_eq!(loaded.materials, SceneConfig::demo().materials);
        let scene = loaded.build().unwrap();
        assert_eq!(scene.cameras()[1].field_of_view(), 32f32.to_radians());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
