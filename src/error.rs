use thiserror::Error;

use crate::utils::ScalarClass;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinalgError {
    #[error("Matrix dimensions {rows}x{cols} must be non-zero and their product must fit in usize")]
    InvalidDimension { rows: usize, cols: usize },

    #[error("All rows have to be equal in length: row {row} has {found} entries, expected {expected}")]
    RaggedShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Index ({row}, {col}) exceeds range of {rows}x{cols}")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Matrix has to be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Matrix is singular")]
    Singular,

    #[error("Unsupported operation {op} for {class:?} scalars")]
    UnsupportedType {
        op: &'static str,
        class: ScalarClass,
    },

    #[error("Operation {op} is undefined for a zero-length vector")]
    ZeroNorm { op: &'static str },
}

pub type Result<T> = std::result::Result<T, LinalgError>;
