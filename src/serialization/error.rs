use std::io;

use thiserror::Error;

use crate::model::BufferError;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stream ran out where a chunk header was expected.  The format has
    /// no terminator, so at the top level this is how a file ends.
    #[error("end of stream")]
    EndOfStream,

    #[error("invalid mesh file, no header found (read id {found:#06x})")]
    InvalidHeader { found: u16 },

    #[error("missing geometry data in sub mesh `{sub_mesh}`")]
    MissingGeometry { sub_mesh: String },

    #[error("invalid {what} count {value}")]
    InvalidCount { what: &'static str, value: i64 },

    #[error("invalid texture coordinate dimension {0}")]
    InvalidTexCoordDimension(i16),

    #[error("chunk {id:#06x} declares length {length}, shorter than its header")]
    InvalidChunkLength { id: u16, length: i32 },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}
