//! # Dense Vectors
//!
//! A [`DenseVector`] is a column matrix with a remembered dimension. It owns its
//! backing [`DenseMatrix`] exclusively and forwards every arithmetic operation
//! to it, so vectors and matrices share a single implementation of the numeric
//! work.

use std::fmt;
use std::ops::{Add, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub};

use ndarray::{Array1, ArrayView1};

use crate::dense::DenseMatrix;
use crate::error::{LinalgError, Result};
use crate::utils::{Scalar, ScalarClass};

#[derive(Debug, Clone, PartialEq)]
pub struct DenseVector<T: Scalar> {
    dimension: usize,
    backing: DenseMatrix<T>,
}

impl<T: Scalar> DenseVector<T> {
    /// Zero vector of the given dimension.
    pub fn new(dimension: usize) -> Result<Self> {
        Self::filled(dimension, T::zero())
    }

    /// # Errors
    /// `InvalidDimension` if `dimension` is zero.
    pub fn filled(dimension: usize, fill: T) -> Result<Self> {
        Ok(Self::from_column(DenseMatrix::filled(dimension, 1, fill)?))
    }

    pub fn from_slice(values: &[T]) -> Result<Self> {
        Ok(Self::from_column(DenseMatrix::from_flat(values, false)?))
    }

    pub fn from_vec(values: Vec<T>) -> Result<Self> {
        let dimension = values.len();
        Ok(Self::from_column(DenseMatrix::from_vec(dimension, 1, values)?))
    }

    fn from_column(backing: DenseMatrix<T>) -> Self {
        debug_assert_eq!(backing.cols(), 1);
        DenseVector {
            dimension: backing.rows(),
            backing,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The backing `dimension x 1` matrix.
    pub fn as_matrix(&self) -> &DenseMatrix<T> {
        &self.backing
    }

    pub fn into_matrix(self) -> DenseMatrix<T> {
        self.backing
    }

    pub fn as_slice(&self) -> &[T] {
        self.backing.as_slice()
    }

    /// Entry `i`; `IndexOutOfRange` when `i >= dimension`.
    pub fn get(&self, i: usize) -> Result<T> {
        self.backing.get(i, 0)
    }

    pub fn get_mut(&mut self, i: usize) -> Result<&mut T> {
        self.backing.get_mut(i, 0)
    }

    pub fn set(&mut self, i: usize, value: T) -> Result<()> {
        self.backing.set(i, 0, value)
    }

    fn mismatch(&self, op: &'static str, other: &Self) -> LinalgError {
        LinalgError::DimensionMismatch {
            op,
            left: self.backing.shape(),
            right: other.backing.shape(),
        }
    }

    /// Inner product, computed as the `1 x 1` matrix product `selfᵀ · other`.
    ///
    /// # Errors
    /// `DimensionMismatch` unless both vectors have the same dimension.
    pub fn dot(&self, other: &Self) -> Result<T> {
        if self.dimension != other.dimension {
            return Err(self.mismatch("dot", other));
        }
        self.backing
            .transpose()
            .matmul(&other.backing)?
            .get(0, 0)
    }

    pub fn scale(&self, scalar: T) -> Self {
        Self::from_column(self.backing.scale(scalar))
    }

    pub fn div_scalar(&self, scalar: T) -> Self {
        Self::from_column(self.backing.div_scalar(scalar))
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        Ok(Self::from_column(self.backing.checked_add(&other.backing)?))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        Ok(Self::from_column(self.backing.checked_sub(&other.backing)?))
    }

    pub fn add_assign_checked(&mut self, other: &Self) -> Result<()> {
        self.backing = self.backing.checked_add(&other.backing)?;
        Ok(())
    }

    pub fn sub_assign_checked(&mut self, other: &Self) -> Result<()> {
        self.backing = self.backing.checked_sub(&other.backing)?;
        Ok(())
    }

    /// Euclidean length `sqrt(self · self)`.
    ///
    /// # Errors
    /// `UnsupportedType` for scalars without a real counterpart, such as
    /// [`ModRing`](crate::ring::ModRing).
    pub fn norm(&self) -> Result<f64> {
        let unsupported = LinalgError::UnsupportedType {
            op: "norm",
            class: T::CLASS,
        };
        if T::CLASS == ScalarClass::Modular {
            return Err(unsupported);
        }
        self.dot(self)?
            .to_real()
            .map(f64::sqrt)
            .ok_or(unsupported)
    }

    /// `self / norm()`.
    ///
    /// # Errors
    /// - `UnsupportedType` unless the scalar class is [`ScalarClass::Real`];
    ///   integer entries would truncate to zero
    /// - `ZeroNorm` for the zero vector
    pub fn unit(&self) -> Result<Self> {
        let unsupported = LinalgError::UnsupportedType {
            op: "unit",
            class: T::CLASS,
        };
        if T::CLASS != ScalarClass::Real {
            return Err(unsupported);
        }
        let norm = self.norm()?;
        if norm == 0.0 {
            return Err(LinalgError::ZeroNorm { op: "unit" });
        }
        let divisor = T::from_real(norm).ok_or(unsupported)?;
        Ok(self.div_scalar(divisor))
    }

    /// Replaces `self` by its unit vector. On error `self` is left unchanged.
    pub fn normalize(&mut self) -> Result<()> {
        *self = self.unit()?;
        Ok(())
    }

    /// Angle between `self` and `other` in radians, in `[0, π]`.
    ///
    /// The cosine is clamped to `[-1, 1]` before `acos` so rounding on
    /// (anti)parallel vectors cannot produce NaN.
    ///
    /// # Errors
    /// - `DimensionMismatch` for vectors of different dimension
    /// - `UnsupportedType` when `norm` is unsupported for `T`
    /// - `ZeroNorm` when either vector has length zero
    pub fn angle(&self, other: &Self) -> Result<f64> {
        let dot = self.dot(other)?;
        let lengths = self.norm()? * other.norm()?;
        if lengths == 0.0 {
            return Err(LinalgError::ZeroNorm { op: "angle" });
        }
        let dot = dot.to_real().ok_or(LinalgError::UnsupportedType {
            op: "angle",
            class: T::CLASS,
        })?;
        Ok((dot / lengths).clamp(-1.0, 1.0).acos())
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Matrix-vector product, delegated to the matrix product with the
    /// vector's backing column.
    ///
    /// # Errors
    /// `DimensionMismatch` if `self.cols() != vector.dimension()`.
    pub fn mul_vector(&self, vector: &DenseVector<T>) -> Result<DenseVector<T>> {
        if self.cols() != vector.dimension {
            return Err(LinalgError::DimensionMismatch {
                op: "mul_vector",
                left: self.shape(),
                right: vector.backing.shape(),
            });
        }
        Ok(DenseVector::from_column(self.matmul(&vector.backing)?))
    }
}

impl<T: Scalar> TryFrom<DenseMatrix<T>> for DenseVector<T> {
    type Error = LinalgError;

    /// Accepts column matrices as they are and row matrices transposed.
    fn try_from(matrix: DenseMatrix<T>) -> Result<Self> {
        if matrix.cols() == 1 {
            Ok(Self::from_column(matrix))
        } else if matrix.rows() == 1 {
            Ok(Self::from_column(matrix.transpose()))
        } else {
            Err(LinalgError::DimensionMismatch {
                op: "vector",
                left: matrix.shape(),
                right: (matrix.rows(), 1),
            })
        }
    }
}

impl<T: Scalar> From<DenseVector<T>> for DenseMatrix<T> {
    fn from(vector: DenseVector<T>) -> Self {
        vector.backing
    }
}

impl<T: Scalar> Index<usize> for DenseVector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.backing[(i, 0)]
    }
}

impl<T: Scalar> IndexMut<usize> for DenseVector<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.backing[(i, 0)]
    }
}

impl<T: Scalar> Add for &DenseVector<T> {
    type Output = Result<DenseVector<T>>;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs)
    }
}

impl<T: Scalar> Sub for &DenseVector<T> {
    type Output = Result<DenseVector<T>>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs)
    }
}

impl<T: Scalar> Mul<T> for &DenseVector<T> {
    type Output = DenseVector<T>;

    fn mul(self, rhs: T) -> DenseVector<T> {
        self.scale(rhs)
    }
}

impl<T: Scalar> Div<T> for &DenseVector<T> {
    type Output = DenseVector<T>;

    fn div(self, rhs: T) -> DenseVector<T> {
        self.div_scalar(rhs)
    }
}

impl<T: Scalar> MulAssign<T> for DenseVector<T> {
    fn mul_assign(&mut self, rhs: T) {
        self.backing *= rhs;
    }
}

impl<T: Scalar> DivAssign<T> for DenseVector<T> {
    fn div_assign(&mut self, rhs: T) {
        self.backing /= rhs;
    }
}

impl<T: Scalar> Mul<&DenseVector<T>> for &DenseMatrix<T> {
    type Output = Result<DenseVector<T>>;

    fn mul(self, rhs: &DenseVector<T>) -> Self::Output {
        self.mul_vector(rhs)
    }
}

macro_rules! impl_left_scale {
    ($($t:ty),*) => {
        $(
            impl Mul<&DenseVector<$t>> for $t {
                type Output = DenseVector<$t>;

                fn mul(self, rhs: &DenseVector<$t>) -> DenseVector<$t> {
                    rhs.scale(self)
                }
            }
        )*
    };
}

impl_left_scale!(f32, f64, i8, i16, i32, i64, i128, isize);

impl<T: Scalar + fmt::Display> fmt::Display for DenseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.backing, f)
    }
}

impl<T: Scalar> From<&DenseVector<T>> for Array1<T> {
    fn from(vector: &DenseVector<T>) -> Self {
        Array1::from_vec(vector.as_slice().to_vec())
    }
}

impl<T: Scalar> TryFrom<ArrayView1<'_, T>> for DenseVector<T> {
    type Error = LinalgError;

    fn try_from(array: ArrayView1<'_, T>) -> Result<Self> {
        Self::from_vec(array.iter().copied().collect())
    }
}
