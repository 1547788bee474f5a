//! JSON dumps of loaded scripts, meshes and normalized directive lines.

use serde::Serialize;
use std::io::{self, Write};

use crate::model::{IndexType, Mesh, SubMesh, VertexData};
use crate::script::ConcreteTree;

#[derive(Serialize, Debug, PartialEq)]
pub struct VertexElementSummary {
    pub source: u16,
    pub semantic: String,
    pub index: u16,
    pub components: usize,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct VertexBufferSummary {
    pub bind_index: u16,
    pub vertex_size: usize,
    pub num_vertices: usize,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct VertexDataSummary {
    pub vertex_count: usize,
    pub buffers: Vec<VertexBufferSummary>,
    pub elements: Vec<VertexElementSummary>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct SubMeshSummary {
    pub name: String,
    pub material: String,
    pub shared_vertices: bool,
    pub operation: String,
    pub index_count: usize,
    pub index_bits: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_data: Option<VertexDataSummary>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct MeshSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_vertex_data: Option<VertexDataSummary>,
    pub sub_meshes: Vec<SubMeshSummary>,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub bounding_radius: f32,
}

impl From<&VertexData> for VertexDataSummary {
    fn from(data: &VertexData) -> Self {
        Self {
            vertex_count: data.vertex_count,
            buffers: data
                .vertex_buffer_binding
                .iter()
                .map(|(bind_index, buffer)| VertexBufferSummary {
                    bind_index,
                    vertex_size: buffer.vertex_size(),
                    num_vertices: buffer.num_vertices(),
                })
                .collect(),
            elements: data
                .vertex_declaration
                .elements()
                .iter()
                .map(|e| VertexElementSummary {
                    source: e.source,
                    semantic: format!("{:?}", e.semantic),
                    index: e.index,
                    components: e.element_type.float_count(),
                })
                .collect(),
        }
    }
}

impl From<&SubMesh> for SubMeshSummary {
    fn from(sub: &SubMesh) -> Self {
        let index_bits = match sub.index_data.index_buffer.as_ref().map(|b| b.index_type()) {
            Some(IndexType::Size32) => 32,
            _ => 16,
        };

        Self {
            name: sub.name.clone(),
            material: sub.material_name.clone(),
            shared_vertices: sub.use_shared_vertices,
            operation: format!("{:?}", sub.operation_type),
            index_count: sub.index_data.index_count,
            index_bits,
            vertex_data: sub.vertex_data.as_ref().map(Into::into),
        }
    }
}

impl From<&Mesh> for MeshSummary {
    fn from(mesh: &Mesh) -> Self {
        let bounds = mesh.bounding_box;
        Self {
            name: mesh.name.clone(),
            shared_vertex_data: mesh.shared_vertex_data.as_ref().map(Into::into),
            sub_meshes: mesh.sub_meshes().iter().map(Into::into).collect(),
            bounds_min: bounds.min.into(),
            bounds_max: bounds.max.into(),
            bounding_radius: mesh.bounding_sphere_radius,
        }
    }
}

fn emit_value<T: Serialize + ?Sized>(value: &T, out: &mut impl Write, pretty: bool) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)
}

pub fn emit_tree(tree: &ConcreteTree, out: &mut impl Write, pretty: bool) -> io::Result<()> {
    emit_value(&tree.to_view(), out, pretty)
}

pub fn emit_mesh(mesh: &Mesh, out: &mut impl Write, pretty: bool) -> io::Result<()> {
    emit_value(&MeshSummary::from(mesh), out, pretty)
}

pub fn emit_lines(lines: &[String], out: &mut impl Write, pretty: bool) -> io::Result<()> {
    emit_value(lines, out, pretty)
}
