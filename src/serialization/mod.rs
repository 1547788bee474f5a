//! Binary `.mesh` import.
pub mod chunk;
pub mod error;
pub mod mesh_reader;

pub use chunk::{CHUNK_OVERHEAD_SIZE, ChunkHeader, ChunkWriter, MeshChunkId};
pub use error::MeshError;
pub use mesh_reader::MeshReader;
