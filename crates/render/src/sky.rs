use prism_common::{MeshHandle, SamplerHandle, ShaderHandle, TextureHandle};

use crate::camera::Camera;
use crate::error::RenderError;
use crate::registry::AssetRegistry;
use crate::shader::{RasterState, RenderDevice, slots};

/// Cube-mapped background drawn after all entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sky {
    pub mesh: MeshHandle,
    pub cube_map: TextureHandle,
    pub sampler: SamplerHandle,
    pub vertex_shader: ShaderHandle,
    pub pixel_shader: ShaderHandle,
}

impl Sky {
    /// Draw the sky cube from inside, then restore default raster state.
    pub fn draw<D: RenderDevice + ?Sized>(
        &self,
        assets: &AssetRegistry,
        device: &mut D,
        camera: &Camera,
    ) -> Result<(), RenderError> {
        let mesh = assets
            .mesh(self.mesh)
            .ok_or(RenderError::UnknownMesh(self.mesh))?;

        device.set_raster_state(RasterState::Sky);

        device.activate(self.vertex_shader);
        device.set_uniform(self.vertex_shader, slots::VIEW_MATRIX, camera.view_matrix().into());
        device.set_uniform(
            self.vertex_shader,
            slots::PROJECTION_MATRIX,
            camera.projection_matrix().into(),
        );
        device.commit(self.vertex_shader);

        device.activate(self.pixel_shader);
        device.set_texture(self.pixel_shader, slots::CUBE_MAP, self.cube_map);
        device.set_sampler(self.pixel_shader, slots::BASIC_SAMPLER, self.sampler);
        device.commit(self.pixel_shader);

        device.draw_indexed(mesh);
        device.set_raster_state(RasterState::Default);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::recording::{DeviceCall, RecordingDevice};
    use prism_common::BufferHandle;

    #[test]
    fn sky_draw_sequence() {
        let mut assets = AssetRegistry::new();
        let mesh = assets.insert_mesh(Mesh::new("cube", BufferHandle(0), BufferHandle(1), 24, 36));
        let sky = Sky {
            mesh,
            cube_map: TextureHandle(4),
            sampler: SamplerHandle(5),
            vertex_shader: ShaderHandle(6),
            pixel_shader: ShaderHandle(7),
        };
        let mut dev = RecordingDevice::new();
        sky.draw(&assets, &mut dev, &Camera::default()).unwrap();

        let calls = dev.calls();
        assert_eq!(calls[0], DeviceCall::SetRasterState(RasterState::Sky));
        assert_eq!(calls[1], DeviceCall::Activate(ShaderHandle(6)));
        assert_eq!(
            dev.slot_names(),
            vec!["viewMatrix", "projectionMatrix", "CubeMap", "BasicSampler"]
        );
        assert_eq!(calls[calls.len() - 3], DeviceCall::Commit(ShaderHandle(7)));
        assert!(matches!(calls[calls.len() - 2], DeviceCall::DrawIndexed { .. }));
        assert_eq!(
            calls.last(),
            Some(&DeviceCall::SetRasterState(RasterState::Default))
        );
    }

    #[test]
    fn missing_sky_mesh_draws_nothing() {
        let sky = Sky {
            mesh: MeshHandle(3),
            cube_map: TextureHandle(0),
            sampler: SamplerHandle(0),
            vertex_shader: ShaderHandle(0),
            pixel_shader: ShaderHandle(1),
        };
        let mut dev = RecordingDevice::new();
        assert!(sky.draw(&AssetRegistry::new(), &mut dev, &Camera::default()).is_err());
        assert!(dev.calls().is_empty());
    }
}
