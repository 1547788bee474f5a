//! Hardware-agnostic buffer descriptors and the capability used to
//! allocate them.
//!
//! Loaders never write through raw pointers: they ask a
//! `HardwareBufferManager` for a buffer of the right shape and fill it with
//! bounds-checked `write_bytes` calls.  A render system can implement the
//! trait to hand out buffers it later uploads.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("write of {len} bytes at offset {offset} overruns a {size} byte buffer")]
    OutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("buffer of {count} elements of {element_size} bytes is too large")]
    TooLarge { count: usize, element_size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferUsage {
    Static,
    Dynamic,
    #[default]
    StaticWriteOnly,
}

/// How the buffers of one mesh should be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferPolicy {
    pub usage: BufferUsage,
    pub use_shadow_buffer: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    Size16,
    Size32,
}

impl IndexType {
    pub fn size(self) -> usize {
        match self {
            IndexType::Size16 => 2,
            IndexType::Size32 => 4,
        }
    }
}

fn allocate(count: usize, element_size: usize) -> Result<Vec<u8>, BufferError> {
    let len = count
        .checked_mul(element_size)
        .ok_or(BufferError::TooLarge {
            count,
            element_size,
        })?;
    Ok(vec![0; len])
}

fn write_into(data: &mut [u8], offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
    let out_of_bounds = BufferError::OutOfBounds {
        offset,
        len: bytes.len(),
        size: data.len(),
    };
    let end = offset.checked_add(bytes.len()).ok_or(out_of_bounds.clone())?;
    data.get_mut(offset..end)
        .ok_or(out_of_bounds)?
        .copy_from_slice(bytes);
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    vertex_size: usize,
    num_vertices: usize,
    policy: BufferPolicy,
    data: Vec<u8>,
}

impl VertexBuffer {
    pub fn new(
        vertex_size: usize,
        num_vertices: usize,
        policy: BufferPolicy,
    ) -> Result<Self, BufferError> {
        Ok(Self {
            vertex_size,
            num_vertices,
            policy,
            data: allocate(num_vertices, vertex_size)?,
        })
    }

    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn policy(&self) -> BufferPolicy {
        self.policy
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        write_into(&mut self.data, offset, bytes)
    }

    /// Buffer contents reinterpreted as native-endian floats.
    pub fn to_f32s(&self) -> Vec<f32> {
        self.data
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexBuffer {
    index_type: IndexType,
    policy: BufferPolicy,
    data: Vec<u8>,
}

impl IndexBuffer {
    pub fn new(
        index_type: IndexType,
        num_indices: usize,
        policy: BufferPolicy,
    ) -> Result<Self, BufferError> {
        Ok(Self {
            index_type,
            policy,
            data: allocate(num_indices, index_type.size())?,
        })
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    pub fn policy(&self) -> BufferPolicy {
        self.policy
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        write_into(&mut self.data, offset, bytes)
    }

    /// Indices widened to `u32`, whatever the stored width.
    pub fn to_u32s(&self) -> Vec<u32> {
        match self.index_type {
            IndexType::Size16 => self
                .data
                .chunks_exact(2)
                .map(|c| u16::from_ne_bytes([c[0], c[1]]) as u32)
                .collect(),
            IndexType::Size32 => self
                .data
                .chunks_exact(4)
                .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        }
    }
}

/// Allocation capability handed to loaders.
pub trait HardwareBufferManager {
    fn create_vertex_buffer(
        &self,
        vertex_size: usize,
        num_vertices: usize,
        policy: BufferPolicy,
    ) -> Result<VertexBuffer, BufferError>;

    fn create_index_buffer(
        &self,
        index_type: IndexType,
        num_indices: usize,
        policy: BufferPolicy,
    ) -> Result<IndexBuffer, BufferError>;
}

/// Keeps every buffer in plain system memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMemoryBufferManager;

impl HardwareBufferManager for SystemMemoryBufferManager {
    fn create_vertex_buffer(
        &self,
        vertex_size: usize,
        num_vertices: usize,
        policy: BufferPolicy,
    ) -> Result<VertexBuffer, BufferError> {
        VertexBuffer::new(vertex_size, num_vertices, policy)
    }

    fn create_index_buffer(
        &self,
        index_type: IndexType,
        num_indices: usize,
        policy: BufferPolicy,
    ) -> Result<IndexBuffer, BufferError> {
        IndexBuffer::new(index_type, num_indices, policy)
    }
}
