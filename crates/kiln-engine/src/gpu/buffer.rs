use std::rc::Rc;

use anyhow::{anyhow, Result};

use super::driver::{BufferId, GlDriver, VertexArrayId, NULL_ID};

/// Static vertex data in an `ARRAY_BUFFER`.
pub struct VertexBuffer {
    gl: Rc<dyn GlDriver>,
    id: BufferId,
    byte_len: usize,
}

impl VertexBuffer {
    pub fn new<T: bytemuck::Pod>(gl: Rc<dyn GlDriver>, data: &[T]) -> Result<Self> {
        let id = gl
            .create_buffer()
            .map_err(|e| anyhow!("failed to create vertex buffer: {e}"))?;
        let bytes: &[u8] = bytemuck::cast_slice(data);
        gl.bind_buffer(glow::ARRAY_BUFFER, id);
        gl.buffer_data(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);
        Ok(Self {
            gl,
            id,
            byte_len: bytes.len(),
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(glow::ARRAY_BUFFER, self.id);
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        if self.id != NULL_ID {
            self.gl.delete_buffer(self.id);
        }
    }
}

/// 32-bit indices in an `ELEMENT_ARRAY_BUFFER`.
pub struct IndexBuffer {
    gl: Rc<dyn GlDriver>,
    id: BufferId,
    count: usize,
}

impl IndexBuffer {
    pub fn new(gl: Rc<dyn GlDriver>, indices: &[u32]) -> Result<Self> {
        let id = gl
            .create_buffer()
            .map_err(|e| anyhow!("failed to create index buffer: {e}"))?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, id);
        gl.buffer_data(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(indices),
            glow::STATIC_DRAW,
        );
        Ok(Self {
            gl,
            id,
            count: indices.len(),
        })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// GL type of one index.
    pub fn index_type(&self) -> u32 {
        glow::UNSIGNED_INT
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.id);
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        if self.id != NULL_ID {
            self.gl.delete_buffer(self.id);
        }
    }
}

/// Vertex attribute layout bound to one or more vertex buffers.
pub struct VertexArray {
    gl: Rc<dyn GlDriver>,
    id: VertexArrayId,
}

impl VertexArray {
    pub fn new(gl: Rc<dyn GlDriver>) -> Result<Self> {
        let id = gl
            .create_vertex_array()
            .map_err(|e| anyhow!("failed to create vertex array: {e}"))?;
        Ok(Self { gl, id })
    }

    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.id);
    }

    /// Declares float attribute `index` as `components` floats read from
    /// `buffer` at byte `offset` with byte `stride`.
    pub fn add_attribute(
        &mut self,
        buffer: &VertexBuffer,
        index: u32,
        components: i32,
        stride: i32,
        offset: i32,
    ) -> &mut Self {
        self.bind();
        buffer.bind();
        self.gl.enable_vertex_attrib_array(index);
        self.gl
            .vertex_attrib_pointer_f32(index, components, stride, offset);
        self
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        if self.id != NULL_ID {
            self.gl.delete_vertex_array(self.id);
        }
    }
}
