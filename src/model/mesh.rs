//! Mesh and sub mesh containers filled in by the binary mesh reader.

use super::AxisAlignedBox;
use super::buffer::{BufferPolicy, IndexBuffer};
use super::vertex::VertexData;

/// Primitive topology of a sub mesh.  Discriminants match the values
/// stored in mesh files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationType {
    PointList = 1,
    LineList = 2,
    LineStrip = 3,
    #[default]
    TriangleList = 4,
    TriangleStrip = 5,
    TriangleFan = 6,
}

impl OperationType {
    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::PointList),
            2 => Some(Self::LineList),
            3 => Some(Self::LineStrip),
            4 => Some(Self::TriangleList),
            5 => Some(Self::TriangleStrip),
            6 => Some(Self::TriangleFan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexData {
    pub index_start: usize,
    pub index_count: usize,
    pub index_buffer: Option<IndexBuffer>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubMesh {
    pub name: String,
    pub material_name: String,
    pub use_shared_vertices: bool,
    pub operation_type: OperationType,
    pub index_data: IndexData,
    /// Own vertices; `None` when `use_shared_vertices` is set.
    pub vertex_data: Option<VertexData>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub shared_vertex_data: Option<VertexData>,
    pub bounding_box: AxisAlignedBox,
    pub bounding_sphere_radius: f32,
    pub vertex_buffer_policy: BufferPolicy,
    pub index_buffer_policy: BufferPolicy,
    sub_meshes: Vec<SubMesh>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn create_sub_mesh(&mut self, name: impl Into<String>) -> &mut SubMesh {
        let index = self.sub_meshes.len();
        self.sub_meshes.push(SubMesh {
            name: name.into(),
            ..SubMesh::default()
        });
        &mut self.sub_meshes[index]
    }

    pub fn sub_meshes(&self) -> &[SubMesh] {
        &self.sub_meshes
    }

    pub fn sub_mesh(&self, index: usize) -> Option<&SubMesh> {
        self.sub_meshes.get(index)
    }

    pub fn sub_mesh_count(&self) -> usize {
        self.sub_meshes.len()
    }
}
