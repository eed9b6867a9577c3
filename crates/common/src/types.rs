use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and inspector output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);
    };
}

handle!(
    /// A mesh registered in the scene's asset registry.
    MeshHandle
);
handle!(
    /// A material registered in the scene's asset registry.
    MaterialHandle
);
handle!(
    /// A compiled shader program owned by the shader backend.
    ShaderHandle
);
handle!(
    /// A texture resource view owned by the backend.
    TextureHandle
);
handle!(
    /// A sampler state owned by the backend.
    SamplerHandle
);
handle!(
    /// A GPU vertex or index buffer owned by the backend.
    BufferHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn entity_id_short_form() {
        let id = EntityId::new();
        assert_eq!(id.short().len(), 8);
        assert!(id.0.simple().to_string().starts_with(&id.short()));
    }

    #[test]
    fn handles_order_by_id() {
        assert!(MeshHandle(1) < MeshHandle(2));
        assert_ne!(TextureHandle(3), TextureHandle(4));
    }
}
