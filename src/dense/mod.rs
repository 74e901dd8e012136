//! # Dense Matrices
//!
//! Row-major, heap-allocated matrices over any [`Scalar`]. Element `(i, j)` of a
//! `rows x cols` matrix lives at offset `i * cols + j`.
//!
//! All arithmetic returns fresh matrices; the receiver is never modified except
//! through the explicit compound-assignment methods.
//!
//! ## Submodules
//! - `elimination`: Gauss and Gauss-Jordan elimination, determinant, inverse
//! - `parallel`: column-partitioned matrix multiplication

use std::fmt;
use std::ops::{Add, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub};

use ndarray::{Array2, ArrayView2};

use crate::error::{LinalgError, Result};
use crate::utils::Scalar;

mod elimination;
mod parallel;

pub use parallel::{MulConfig, DEFAULT_MIN_COLS_PER_WORKER};

#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T: Scalar> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Creates a `rows x cols` matrix of zeros.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, T::zero())
    }

    /// Creates a `rows x cols` matrix with every entry set to `fill`.
    ///
    /// # Errors
    /// `InvalidDimension` if either dimension is zero or `rows * cols`
    /// overflows `usize`.
    pub fn filled(rows: usize, cols: usize, fill: T) -> Result<Self> {
        let len = Self::storage_len(rows, cols)?;
        Ok(Self::from_parts(rows, cols, vec![fill; len]))
    }

    /// Number of stored entries for a `rows x cols` shape.
    fn storage_len(rows: usize, cols: usize) -> Result<usize> {
        match rows.checked_mul(cols) {
            Some(len) if len > 0 => Ok(len),
            _ => Err(LinalgError::InvalidDimension { rows, cols }),
        }
    }

    /// Builds a matrix from a list of rows.
    ///
    /// ```
    /// use dense_algebra::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(m.get(1, 0).unwrap(), 3.0);
    /// ```
    ///
    /// # Errors
    /// - `InvalidDimension` when there are no rows or the rows are empty
    /// - `RaggedShape` when a row's length differs from the first row's
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let len = Self::storage_len(rows.len(), cols)?;

        let mut data = Vec::with_capacity(len);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(LinalgError::RaggedShape {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self::from_parts(rows.len(), cols, data))
    }

    /// Builds a `1 x n` matrix when `as_row` is set, otherwise `n x 1`.
    pub fn from_flat(values: &[T], as_row: bool) -> Result<Self> {
        let (rows, cols) = if as_row {
            (1, values.len())
        } else {
            (values.len(), 1)
        };
        Self::from_vec(rows, cols, values.to_vec())
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    /// - `InvalidDimension` if either dimension is zero or the entry count
    ///   overflows `usize`
    /// - `DimensionMismatch` if `data.len() != rows * cols`
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != Self::storage_len(rows, cols)? {
            return Err(LinalgError::DimensionMismatch {
                op: "from_vec",
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        Ok(Self::from_parts(rows, cols, data))
    }

    /// Internal constructor for buffers whose shape is already known to be valid.
    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        debug_assert_eq!(data.len(), rows * cols);
        DenseMatrix { rows, cols, data }
    }

    /// The `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        Ok(m)
    }

    /// Identity matrix with the entry at `(row, col)` replaced by `val`.
    ///
    /// Left-multiplying by such a matrix adds `val` times row `col` to row
    /// `row` (or scales row `row` when `row == col`).
    pub fn elementary(n: usize, row: usize, col: usize, val: T) -> Result<Self> {
        let mut m = Self::identity(n)?;
        m.set(row, col, val)?;
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of stored entries.
    pub fn entries(&self) -> usize {
        self.data.len()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major view of the underlying buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn row(&self, i: usize) -> Result<&[T]> {
        if i >= self.rows {
            return Err(self.out_of_range(i, 0));
        }
        Ok(&self.data[i * self.cols..(i + 1) * self.cols])
    }

    fn out_of_range(&self, row: usize, col: usize) -> LinalgError {
        LinalgError::IndexOutOfRange {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    fn offset(&self, i: usize, j: usize) -> Result<usize> {
        if i >= self.rows || j >= self.cols {
            return Err(self.out_of_range(i, j));
        }
        Ok(i * self.cols + j)
    }

    pub fn get(&self, i: usize, j: usize) -> Result<T> {
        let k = self.offset(i, j)?;
        Ok(self.data[k])
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> Result<&mut T> {
        let k = self.offset(i, j)?;
        Ok(&mut self.data[k])
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        *self.get_mut(i, j)? = value;
        Ok(())
    }

    /// Swaps rows `a` and `b` in place. Both must be in range.
    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let cols = self.cols;
        let (upper, lower) = self.data.split_at_mut(hi * cols);
        upper[lo * cols..(lo + 1) * cols].swap_with_slice(&mut lower[..cols]);
    }

    fn map(&self, f: impl Fn(T) -> T) -> Self {
        Self::from_parts(self.rows, self.cols, self.data.iter().map(|&x| f(x)).collect())
    }

    fn zip_with(&self, other: &Self, op: &'static str, f: impl Fn(T, T) -> T) -> Result<Self> {
        if self.shape() != other.shape() {
            return Err(LinalgError::DimensionMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::from_parts(self.rows, self.cols, data))
    }

    /// Elementwise sum. Fails with `DimensionMismatch` unless shapes are identical.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    /// Elementwise difference. Fails with `DimensionMismatch` unless shapes are identical.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    pub fn scale(&self, scalar: T) -> Self {
        self.map(|x| x * scalar)
    }

    /// Divides every entry by `scalar`. Division by zero follows the scalar
    /// type's own semantics (infinities for floats, a panic for integers).
    pub fn div_scalar(&self, scalar: T) -> Self {
        self.map(|x| x / scalar)
    }

    pub fn add_assign_checked(&mut self, other: &Self) -> Result<()> {
        *self = self.checked_add(other)?;
        Ok(())
    }

    pub fn sub_assign_checked(&mut self, other: &Self) -> Result<()> {
        *self = self.checked_sub(other)?;
        Ok(())
    }

    pub fn mul_assign_checked(&mut self, other: &Self) -> Result<()> {
        *self = self.matmul(other)?;
        Ok(())
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.data[i * self.cols + j]);
            }
        }
        Self::from_parts(self.cols, self.rows, data)
    }

    /// Places `other` to the right of `self`. Row counts must agree.
    pub fn hconcat(&self, other: &Self) -> Result<Self> {
        if self.rows != other.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "hconcat",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let cols = self.cols + other.cols;
        let mut data = Vec::with_capacity(self.rows * cols);
        for (left, right) in self
            .data
            .chunks_exact(self.cols)
            .zip(other.data.chunks_exact(other.cols))
        {
            data.extend_from_slice(left);
            data.extend_from_slice(right);
        }
        Ok(Self::from_parts(self.rows, cols, data))
    }

    /// Places `other` below `self`. Column counts must agree.
    pub fn vconcat(&self, other: &Self) -> Result<Self> {
        if self.cols != other.cols {
            return Err(LinalgError::DimensionMismatch {
                op: "vconcat",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Self::from_parts(self.rows + other.rows, self.cols, data))
    }
}

impl<T: Scalar> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        match self.offset(i, j) {
            Ok(k) => &self.data[k],
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for DenseMatrix<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        match self.offset(i, j) {
            Ok(k) => &mut self.data[k],
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T: Scalar> Add for &DenseMatrix<T> {
    type Output = Result<DenseMatrix<T>>;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs)
    }
}

impl<T: Scalar> Sub for &DenseMatrix<T> {
    type Output = Result<DenseMatrix<T>>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs)
    }
}

impl<T: Scalar> Mul<T> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: T) -> DenseMatrix<T> {
        self.scale(rhs)
    }
}

impl<T: Scalar> Div<T> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn div(self, rhs: T) -> DenseMatrix<T> {
        self.div_scalar(rhs)
    }
}

impl<T: Scalar> MulAssign<T> for DenseMatrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        *self = self.scale(rhs);
    }
}

impl<T: Scalar> DivAssign<T> for DenseMatrix<T> {
    fn div_assign(&mut self, rhs: T) {
        *self = self.div_scalar(rhs);
    }
}

macro_rules! impl_left_scale {
    ($($t:ty),*) => {
        $(
            impl Mul<&DenseMatrix<$t>> for $t {
                type Output = DenseMatrix<$t>;

                fn mul(self, rhs: &DenseMatrix<$t>) -> DenseMatrix<$t> {
                    rhs.scale(self)
                }
            }
        )*
    };
}

impl_left_scale!(f32, f64, i8, i16, i32, i64, i128, isize);

impl<T: Scalar + fmt::Display> fmt::Display for DenseMatrix<T> {
    /// One `| ... |` line per row, entries right-aligned to the widest entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.data.iter().map(|x| x.to_string()).collect();
        let width = cells.iter().map(String::len).max().unwrap_or(1);
        for row in cells.chunks_exact(self.cols) {
            write!(f, "|")?;
            for cell in row {
                write!(f, " {cell:>width$}")?;
            }
            writeln!(f, " |")?;
        }
        Ok(())
    }
}

impl<T: Scalar> From<&DenseMatrix<T>> for Array2<T> {
    fn from(m: &DenseMatrix<T>) -> Self {
        Array2::from_shape_fn((m.rows, m.cols), |(i, j)| m.data[i * m.cols + j])
    }
}

impl<T: Scalar> TryFrom<ArrayView2<'_, T>> for DenseMatrix<T> {
    type Error = LinalgError;

    fn try_from(array: ArrayView2<'_, T>) -> Result<Self> {
        let (rows, cols) = array.dim();
        // `iter` walks logical row-major order regardless of memory layout.
        Self::from_vec(rows, cols, array.iter().copied().collect())
    }
}
