use std::collections::BTreeMap;

use prism_common::{MaterialHandle, MeshHandle};

use crate::material::Material;
use crate::mesh::Mesh;

/// Central store for meshes and materials shared between entities.
///
/// Entities hold handles, never the assets themselves. Handles are allocated
/// monotonically and are never reused, so a stale handle resolves to `None`
/// rather than to a different asset.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    meshes: BTreeMap<MeshHandle, Mesh>,
    materials: BTreeMap<MaterialHandle, Material>,
    next_mesh: u64,
    next_material: u64,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_mesh(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(self.next_mesh);
        self.next_mesh += 1;
        tracing::trace!(handle = handle.0, name = %mesh.name, "mesh registered");
        self.meshes.insert(handle, mesh);
        handle
    }

    pub fn insert_material(&mut self, material: Material) -> MaterialHandle {
        let handle = MaterialHandle(self.next_material);
        self.next_material += 1;
        self.materials.insert(handle, material);
        handle
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(&handle)
    }

    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut Mesh> {
        self.meshes.get_mut(&handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(&handle)
    }

    /// Remove a mesh. Callers must check that no entity still refers to it;
    /// [`Scene::remove_mesh`](crate::Scene::remove_mesh) does.
    pub fn remove_mesh(&mut self, handle: MeshHandle) -> Option<Mesh> {
        self.meshes.remove(&handle)
    }

    /// Remove a material. See [`remove_mesh`](Self::remove_mesh).
    pub fn remove_material(&mut self, handle: MaterialHandle) -> Option<Material> {
        self.materials.remove(&handle)
    }

    /// Look up a mesh by its name.
    pub fn find_mesh(&self, name: &str) -> Option<MeshHandle> {
        self.meshes
            .iter()
            .find(|(_, m)| m.name == name)
            .map(|(h, _)| *h)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &Mesh)> {
        self.meshes.iter().map(|(h, m)| (*h, m))
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialHandle, &Material)> {
        self.materials.iter().map(|(h, m)| (*h, m))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use prism_common::{BufferHandle, ShaderHandle};

    fn cube() -> Mesh {
        Mesh::new("cube", BufferHandle(0), BufferHandle(1), 24, 36)
    }

    #[test]
    fn handles_are_monotonic_and_not_reused() {
        let mut reg = AssetRegistry::new();
        let a = reg.insert_mesh(cube());
        let b = reg.insert_mesh(cube());
        assert!(b > a);
        reg.remove_mesh(b);
        let c = reg.insert_mesh(cube());
        assert!(c > b);
        assert!(reg.mesh(b).is_none());
        assert_eq!(reg.mesh_count(), 2);
    }

    #[test]
    fn material_edits_are_shared_through_handle() {
        let mut reg = AssetRegistry::new();
        let h = reg.insert_material(Material::new(ShaderHandle(0), ShaderHandle(1), Vec3::ONE));
        reg.material_mut(h).unwrap().set_roughness(0.5);
        assert_eq!(reg.material(h).unwrap().roughness(), 0.5);
        assert_eq!(reg.material_count(), 1);
    }

    #[test]
    fn find_mesh_by_name() {
        let mut reg = AssetRegistry::new();
        reg.insert_mesh(Mesh::new("sphere", BufferHandle(2), BufferHandle(3), 8, 12));
        let cube = reg.insert_mesh(cube());
        assert_eq!(reg.find_mesh("cube"), Some(cube));
        assert_eq!(reg.find_mesh("torus"), None);
    }
}
