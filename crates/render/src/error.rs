use prism_common::{EntityId, MaterialHandle, MeshHandle};

/// Rejected camera parameter changes. The camera keeps its prior value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("clip distance {0} is negative")]
    NegativeClip(f32),
    #[error("clip distance {0} coincides with the opposite clip plane")]
    CoincidentClip(f32),
    #[error("orthographic height {0} must be positive")]
    InvalidOrthoHeight(f32),
}

/// Errors from scene and draw operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("mesh {0:?} is not registered")]
    UnknownMesh(MeshHandle),
    #[error("material {0:?} is not registered")]
    UnknownMaterial(MaterialHandle),
    #[error("material {0:?} is still referenced by an entity")]
    MaterialInUse(MaterialHandle),
    #[error("mesh {0:?} is still referenced")]
    MeshInUse(MeshHandle),
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
    #[error("camera index {index} out of range ({count} cameras)")]
    NoCamera { index: usize, count: usize },
    #[error("camera: {0}")]
    Camera(#[from] CameraError),
}

/// Errors from loading and resolving scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("entity '{entity}' references unknown mesh '{mesh}'")]
    UnknownMesh { entity: String, mesh: String },
    #[error("entity '{entity}' references unknown material '{material}'")]
    UnknownMaterial { entity: String, material: String },
    #[error("{kind} name '{name}' is used more than once")]
    DuplicateName { kind: &'static str, name: String },
    #[error("row references unknown entity '{0}'")]
    UnknownEntity(String),
    #[error("sky references unknown mesh '{0}'")]
    UnknownSkyMesh(String),
    #[error("scene file version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
    #[error("scene needs at least one camera")]
    NoCameras,
    #[error("camera {index}: {source}")]
    Camera { index: usize, source: CameraError },
    #[error(transparent)]
    Render(#[from] RenderError),
}
