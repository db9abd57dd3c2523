use std::fmt;

use thiserror::Error;

/// Which attribute array a face index points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    Uv,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeKind::Position => "position",
            AttributeKind::Uv => "uv",
            AttributeKind::Normal => "normal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,

    #[error("failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("model has no triangles")]
    EmptyModel,

    #[error("face {face} references {kind} {index}, which does not exist")]
    InvalidFaceIndex {
        face: usize,
        kind: AttributeKind,
        index: usize,
    },

    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

pub type Result<T> = std::result::Result<T, Error>;
