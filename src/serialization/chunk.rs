//! Chunk ids and headers of the binary `.mesh` format, plus a small
//! writer for assembling chunk streams.
//!
//! Every chunk starts with a 6 byte header: `u16` id followed by an `i32`
//! length that counts the header itself.  All values are little endian.

/// Size of a chunk header (id + length).
pub const CHUNK_OVERHEAD_SIZE: usize = 6;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshChunkId {
    Header = 0x1000,
    Material = 0x2000,
    TextureLayer = 0x2200,
    Mesh = 0x3000,
    SubMesh = 0x4000,
    SubMeshOperation = 0x4010,
    SubMeshBoneAssignment = 0x4100,
    Geometry = 0x5000,
    GeometryNormals = 0x5100,
    GeometryColors = 0x5200,
    GeometryTexCoords = 0x5300,
    MeshSkeletonLink = 0x6000,
    MeshBoneAssignment = 0x7000,
    MeshLod = 0x8000,
    MeshLodUsage = 0x8100,
    MeshLodManual = 0x8110,
    MeshLodGenerated = 0x8120,
    MeshBounds = 0x9000,
}

impl MeshChunkId {
    pub const ALL: [MeshChunkId; 18] = [
        Self::Header,
        Self::Material,
        Self::TextureLayer,
        Self::Mesh,
        Self::SubMesh,
        Self::SubMeshOperation,
        Self::SubMeshBoneAssignment,
        Self::Geometry,
        Self::GeometryNormals,
        Self::GeometryColors,
        Self::GeometryTexCoords,
        Self::MeshSkeletonLink,
        Self::MeshBoneAssignment,
        Self::MeshLod,
        Self::MeshLodUsage,
        Self::MeshLodManual,
        Self::MeshLodGenerated,
        Self::MeshBounds,
    ];

    pub fn from_u16(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| *c as u16 == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: u16,
    /// Total chunk size in bytes, header included.
    pub length: i32,
}

impl ChunkHeader {
    pub fn kind(&self) -> Option<MeshChunkId> {
        MeshChunkId::from_u16(self.id)
    }

    pub fn is(&self, id: MeshChunkId) -> bool {
        self.id == id as u16
    }
}

/// Builds a chunk stream in memory.  Lengths of nested chunks are patched
/// in when each chunk is closed.
#[derive(Debug, Default)]
pub struct ChunkWriter {
    buf: Vec<u8>,
    open: Vec<usize>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// File header id followed by the newline-terminated version string.
    pub fn file_header(&mut self, version: &str) -> &mut Self {
        self.u16(MeshChunkId::Header as u16).string(version)
    }

    pub fn begin_chunk(&mut self, id: MeshChunkId) -> &mut Self {
        self.begin_raw_chunk(id as u16)
    }

    pub fn begin_raw_chunk(&mut self, id: u16) -> &mut Self {
        self.open.push(self.buf.len());
        self.u16(id).i32(0)
    }

    /// Closes the innermost open chunk.  A no-op when none is open.
    pub fn end_chunk(&mut self) -> &mut Self {
        if let Some(start) = self.open.pop() {
            let length = (self.buf.len() - start) as i32;
            self.buf[start + 2..start + CHUNK_OVERHEAD_SIZE].copy_from_slice(&length.to_le_bytes());
        }
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.u8(v as u8)
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32s(&mut self, values: &[f32]) -> &mut Self {
        for v in values {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    /// Newline-terminated string.
    pub fn string(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self.u8(b'\n')
    }

    pub fn bytes(&mut self, raw: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(raw);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn finish(&mut self) -> Vec<u8> {
        while !self.open.is_empty() {
            self.end_chunk();
        }
        std::mem::take(&mut self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_ids_round_trip() {
        for id in MeshChunkId::ALL {
            assert_eq!(MeshChunkId::from_u16(id as u16), Some(id));
        }
        assert_eq!(MeshChunkId::from_u16(0x1234), None);
        assert_eq!(MeshChunkId::GeometryTexCoords as u16, 0x5300);
    }

    #[test]
    fn test_nested_lengths_are_patched() {
        let bytes = ChunkWriter::new()
            .begin_chunk(MeshChunkId::Mesh)
            .bool(false)
            .begin_chunk(MeshChunkId::MeshBounds)
            .f32s(&[0.0; 7])
            .end_chunk()
            .end_chunk()
            .finish();

        // outer: 6 + 1 + inner (6 + 28)
        assert_eq!(bytes.len(), 41);
        assert_eq!(&bytes[0..2], &0x3000u16.to_le_bytes());
        assert_eq!(&bytes[2..6], &41i32.to_le_bytes());
        assert_eq!(&bytes[7..9], &0x9000u16.to_le_bytes());
        assert_eq!(&bytes[9..13], &34i32.to_le_bytes());
    }
}
