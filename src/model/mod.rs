//! Target objects the loaders populate.
//!
//! Everything in here is hardware agnostic: vertex and index buffers are
//! plain byte storage handed out by a `HardwareBufferManager`.
pub mod buffer;
pub mod mesh;
pub mod vertex;

pub use buffer::{
    BufferError, BufferPolicy, BufferUsage, HardwareBufferManager, IndexBuffer, IndexType,
    SystemMemoryBufferManager, VertexBuffer,
};
pub use mesh::{IndexData, Mesh, OperationType, SubMesh};
pub use vertex::{
    VertexBufferBinding, VertexData, VertexDeclaration, VertexElement, VertexElementSemantic,
    VertexElementType,
};

use cgmath::Vector3;

/// RGBA colour with float components, as used by material scripts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorEx {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorEx {
    pub const WHITE: ColorEx = ColorEx::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl AxisAlignedBox {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }
}

impl Default for AxisAlignedBox {
    fn default() -> Self {
        let zero = Vector3::new(0.0, 0.0, 0.0);
        Self::new(zero, zero)
    }
}
