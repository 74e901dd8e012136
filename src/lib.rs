pub mod dense;
pub mod error;
pub mod ring;
pub mod vector;
mod utils;

pub use dense::{DenseMatrix, MulConfig, DEFAULT_MIN_COLS_PER_WORKER};
pub use error::{LinalgError, Result};
pub use ring::ModRing;
pub use utils::Scalar;
pub use utils::ScalarClass;
pub use vector::DenseVector;
