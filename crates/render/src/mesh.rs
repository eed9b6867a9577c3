use prism_common::BufferHandle;

/// GPU geometry as seen by the core: buffer handles plus counts.
///
/// Buffers are created and owned by the loading layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl Mesh {
    pub fn new(
        name: impl Into<String>,
        vertex_buffer: BufferHandle,
        index_buffer: BufferHandle,
        vertex_count: u32,
        index_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            vertex_buffer,
            index_buffer,
            vertex_count,
            index_count,
        }
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }
}
