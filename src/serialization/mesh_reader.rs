//! Reader for the chunked binary `.mesh` format.
//!
//! The file is a header id and version string followed by chunks.  Only
//! `Mesh` chunks are legal at the top level.  Chunk kinds that are known
//! but not supported (skeleton links, bone assignments, LOD, vertex
//! colours) are stepped over with a seek so the stream stays aligned
//! however large they are.
//!
//! Sub readers for optional, repeatable chunks read one header too many;
//! they rewind by `CHUNK_OVERHEAD_SIZE` so the enclosing loop sees it.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use cgmath::Vector3;
use log::{debug, trace, warn};

use super::chunk::{CHUNK_OVERHEAD_SIZE, ChunkHeader, MeshChunkId};
use super::error::MeshError;
use crate::model::{
    AxisAlignedBox, BufferPolicy, HardwareBufferManager, IndexBuffer, IndexData, IndexType, Mesh,
    OperationType, VertexData, VertexElementSemantic, VertexElementType,
};

type Result<T> = std::result::Result<T, MeshError>;

fn to_count(value: i32, what: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| MeshError::InvalidCount {
        what,
        value: value as i64,
    })
}

pub struct MeshReader<'a, R, M> {
    stream: &'a mut R,
    buffers: &'a M,
    version: String,
    current_chunk: ChunkHeader,
    skeletally_animated: bool,
    sub_mesh_auto_number: usize,
}

impl<'a, R: Read + Seek, M: HardwareBufferManager> MeshReader<'a, R, M> {
    /// The reader borrows the stream; it never closes it.
    pub fn new(stream: &'a mut R, buffers: &'a M) -> Self {
        Self {
            stream,
            buffers,
            version: String::new(),
            current_chunk: ChunkHeader { id: 0, length: 0 },
            skeletally_animated: false,
            sub_mesh_auto_number: 0,
        }
    }

    /// Version string from the file header, once `import` has read it.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_skeletally_animated(&self) -> bool {
        self.skeletally_animated
    }

    /// Populates `mesh` from the stream.  On error the mesh is left
    /// partially filled and should be discarded.
    pub fn import(&mut self, mesh: &mut Mesh) -> Result<()> {
        self.read_file_header()?;

        match self.read_top_level(mesh) {
            Err(MeshError::EndOfStream) => {
                debug!("end of mesh stream, {} sub meshes", mesh.sub_mesh_count());
                Ok(())
            }
            other => other,
        }
    }

    fn read_file_header(&mut self) -> Result<()> {
        let id = self.read_u16()?;
        if id != MeshChunkId::Header as u16 {
            return Err(MeshError::InvalidHeader { found: id });
        }

        // informational only
        self.version = self.read_string()?;
        debug!("mesh serializer version `{}`", self.version);
        Ok(())
    }

    fn read_top_level(&mut self, mesh: &mut Mesh) -> Result<()> {
        let mut header = self.read_chunk()?;
        loop {
            match header.kind() {
                Some(MeshChunkId::Mesh) => header = self.read_mesh(mesh)?,
                _ => {
                    warn!(
                        "can only parse meshes at the top level during mesh loading, found chunk {:#06x}",
                        header.id
                    );
                    return Ok(());
                }
            }
        }
    }

    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.stream.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_bytes::<1>()?[0] != 0)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_bytes()?))
    }

    fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_bytes()?))
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_bytes()?))
    }

    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_bytes()?))
    }

    /// Reads up to a `\n` (or NUL) terminator, one Latin-1 byte per char.
    fn read_string(&mut self) -> Result<String> {
        let mut s = String::new();
        loop {
            match self.read_bytes::<1>()?[0] {
                b'\n' | 0 => return Ok(s),
                b => s.push(b as char),
            }
        }
    }

    /// `count` little-endian values of `N` bytes each.  The stream is read
    /// before anything is allocated for the values, so a bogus count in a
    /// truncated file fails on the read.
    fn read_array<const N: usize, T>(
        &mut self,
        count: usize,
        what: &'static str,
        decode: fn([u8; N]) -> T,
    ) -> Result<Vec<T>> {
        let len = count.checked_mul(N).ok_or(MeshError::InvalidCount {
            what,
            value: count as i64,
        })?;

        let mut raw = Vec::new();
        (&mut *self.stream).take(len as u64).read_to_end(&mut raw)?;
        if raw.len() != len {
            return Err(MeshError::Io(ErrorKind::UnexpectedEof.into()));
        }

        Ok(raw
            .chunks_exact(N)
            .map(|c| {
                let mut bytes = [0u8; N];
                bytes.copy_from_slice(c);
                decode(bytes)
            })
            .collect())
    }

    fn read_chunk(&mut self) -> Result<ChunkHeader> {
        let bytes = match self.read_bytes::<CHUNK_OVERHEAD_SIZE>() {
            Ok(bytes) => bytes,
            Err(MeshError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(MeshError::EndOfStream);
            }
            Err(e) => return Err(e),
        };

        let header = ChunkHeader {
            id: u16::from_le_bytes([bytes[0], bytes[1]]),
            length: i32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        };
        trace!("chunk {:#06x}, {} bytes", header.id, header.length);

        self.current_chunk = header;
        Ok(header)
    }

    fn seek_relative(&mut self, offset: i64) -> Result<()> {
        self.stream.seek(SeekFrom::Current(offset))?;
        Ok(())
    }

    /// Seeks past the body of the chunk whose header was just read.
    fn ignore_current_chunk(&mut self) -> Result<()> {
        let ChunkHeader { id, length } = self.current_chunk;
        let body = length as i64 - CHUNK_OVERHEAD_SIZE as i64;
        if body < 0 {
            return Err(MeshError::InvalidChunkLength { id, length });
        }

        debug!("skipping chunk {id:#06x} ({length} bytes)");
        self.seek_relative(body)
    }

    /// Steps back over the header of a chunk that belongs to the caller.
    fn rewind_chunk_header(&mut self) -> Result<()> {
        self.seek_relative(-(CHUNK_OVERHEAD_SIZE as i64))
    }

    /// Returns the header of the first chunk that is not part of the mesh.
    fn read_mesh(&mut self, mesh: &mut Mesh) -> Result<ChunkHeader> {
        self.skeletally_animated = self.read_bool()?;
        if self.skeletally_animated {
            debug!("mesh `{}` is skeletally animated", mesh.name);
        }

        loop {
            let header = self.read_chunk()?;

            match header.kind() {
                Some(MeshChunkId::Geometry) => {
                    let policy = mesh.vertex_buffer_policy;
                    let data = mesh.shared_vertex_data.insert(VertexData::default());
                    self.read_geometry(data, policy)?;
                }
                Some(MeshChunkId::SubMesh) => self.read_sub_mesh(mesh)?,
                Some(
                    MeshChunkId::MeshSkeletonLink
                    | MeshChunkId::MeshBoneAssignment
                    | MeshChunkId::MeshLod,
                ) => self.ignore_current_chunk()?,
                Some(MeshChunkId::MeshBounds) => self.read_bounds_info(mesh)?,
                _ => return Ok(header),
            }
        }
    }

    fn read_bounds_info(&mut self, mesh: &mut Mesh) -> Result<()> {
        let min = Vector3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?);
        let max = Vector3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?);
        mesh.bounding_box = AxisAlignedBox::new(min, max);
        mesh.bounding_sphere_radius = self.read_f32()?;
        Ok(())
    }

    fn read_index_buffer(
        &mut self,
        count: usize,
        index_32bit: bool,
        policy: BufferPolicy,
    ) -> Result<IndexBuffer> {
        let mut buffer;
        if index_32bit {
            let indices = self.read_array(count, "index", u32::from_le_bytes)?;
            buffer = self
                .buffers
                .create_index_buffer(IndexType::Size32, count, policy)?;
            buffer.write_bytes(0, bytemuck::cast_slice(&indices))?;
        } else {
            let indices = self.read_array(count, "index", u16::from_le_bytes)?;
            buffer = self
                .buffers
                .create_index_buffer(IndexType::Size16, count, policy)?;
            buffer.write_bytes(0, bytemuck::cast_slice(&indices))?;
        }
        Ok(buffer)
    }

    fn read_sub_mesh(&mut self, mesh: &mut Mesh) -> Result<()> {
        let name = format!("SubMesh{}", self.sub_mesh_auto_number);
        self.sub_mesh_auto_number += 1;

        let material_name = self.read_string()?;
        let use_shared_vertices = self.read_bool()?;
        let index_count = to_count(self.read_i32()?, "index")?;
        let index_32bit = self.read_bool()?;

        let index_buffer = self.read_index_buffer(index_count, index_32bit, mesh.index_buffer_policy)?;
        let vertex_policy = mesh.vertex_buffer_policy;

        debug!("{name}: material `{material_name}`, {index_count} indices");

        let sub_mesh = mesh.create_sub_mesh(name);
        sub_mesh.material_name = material_name;
        sub_mesh.use_shared_vertices = use_shared_vertices;
        sub_mesh.index_data = IndexData {
            index_start: 0,
            index_count,
            index_buffer: Some(index_buffer),
        };

        if !use_shared_vertices {
            let missing = || MeshError::MissingGeometry {
                sub_mesh: sub_mesh.name.clone(),
            };
            let header = match self.read_chunk() {
                Err(MeshError::EndOfStream) => return Err(missing()),
                other => other?,
            };
            if !header.is(MeshChunkId::Geometry) {
                return Err(missing());
            }

            let data = sub_mesh.vertex_data.insert(VertexData::default());
            self.read_geometry(data, vertex_policy)?;
        }

        loop {
            let header = self.read_chunk()?;

            match header.kind() {
                Some(MeshChunkId::SubMeshBoneAssignment) => self.ignore_current_chunk()?,
                Some(MeshChunkId::SubMeshOperation) => {
                    let op = self.read_i16()?;
                    match OperationType::from_i16(op) {
                        Some(operation) => sub_mesh.operation_type = operation,
                        None => warn!(
                            "{}: unknown operation type {op}, keeping {:?}",
                            sub_mesh.name, sub_mesh.operation_type
                        ),
                    }
                }
                _ => break,
            }
        }

        self.rewind_chunk_header()
    }

    /// Reads a vertex count and one buffer per attribute: positions always,
    /// then any normals and texture coordinate sets, each at the next bind
    /// index.
    fn read_geometry(&mut self, data: &mut VertexData, policy: BufferPolicy) -> Result<()> {
        let mut tex_coord_set: u16 = 0;
        let mut bind_index: u16 = 0;

        data.vertex_start = 0;
        data.vertex_count = to_count(self.read_i32()?, "vertex")?;

        self.read_vertex_stream(
            data,
            bind_index,
            VertexElementType::Float3,
            VertexElementSemantic::Position,
            0,
            policy,
        )?;
        bind_index += 1;

        loop {
            let header = self.read_chunk()?;

            match header.kind() {
                Some(MeshChunkId::GeometryNormals) => {
                    self.read_vertex_stream(
                        data,
                        bind_index,
                        VertexElementType::Float3,
                        VertexElementSemantic::Normal,
                        0,
                        policy,
                    )?;
                    bind_index += 1;
                }
                Some(MeshChunkId::GeometryColors) => self.ignore_current_chunk()?,
                Some(MeshChunkId::GeometryTexCoords) => {
                    let dim = self.read_i16()?;
                    let element_type = usize::try_from(dim)
                        .ok()
                        .and_then(VertexElementType::from_float_count)
                        .ok_or(MeshError::InvalidTexCoordDimension(dim))?;

                    self.read_vertex_stream(
                        data,
                        bind_index,
                        element_type,
                        VertexElementSemantic::TexCoords,
                        tex_coord_set,
                        policy,
                    )?;
                    tex_coord_set += 1;
                    bind_index += 1;
                }
                _ => break,
            }
        }

        self.rewind_chunk_header()
    }

    fn read_vertex_stream(
        &mut self,
        data: &mut VertexData,
        bind_index: u16,
        element_type: VertexElementType,
        semantic: VertexElementSemantic,
        index: u16,
        policy: BufferPolicy,
    ) -> Result<()> {
        data.vertex_declaration
            .add_element(bind_index, 0, element_type, semantic, index);
        let vertex_size = data.vertex_declaration.vertex_size(bind_index);

        let float_count = data
            .vertex_count
            .checked_mul(element_type.float_count())
            .ok_or(MeshError::InvalidCount {
                what: "vertex",
                value: data.vertex_count as i64,
            })?;
        let floats = self.read_array(float_count, "vertex", f32::from_le_bytes)?;

        let mut buffer = self
            .buffers
            .create_vertex_buffer(vertex_size, data.vertex_count, policy)?;
        buffer.write_bytes(0, bytemuck::cast_slice(&floats))?;
        data.vertex_buffer_binding.set_binding(bind_index, buffer);
        Ok(())
    }
}
