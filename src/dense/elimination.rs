use log::debug;

use super::DenseMatrix;
use crate::error::{LinalgError, Result};
use crate::utils::Scalar;

impl<T: Scalar> DenseMatrix<T> {
    /// Row-echelon form of a copy of `self`, together with the factor the
    /// determinant of the result has to be multiplied by to recover the
    /// determinant of `self` (`-1` per row swap).
    ///
    /// Pivoting takes the first non-zero entry below a zero pivot; there is no
    /// search for the largest magnitude. A column without any usable pivot is
    /// left as is.
    pub(crate) fn forward_eliminate(&self) -> (Self, T) {
        let mut m = self.clone();
        let mut correction = T::one();
        let cols = m.cols;

        for j in 0..m.rows.min(cols) {
            if m.data[j * cols + j].is_zero() {
                if let Some(i) = (j + 1..m.rows).find(|&i| !m.data[i * cols + j].is_zero()) {
                    m.swap_rows(i, j);
                    correction = correction.negate();
                }
            }

            let pivot = m.data[j * cols + j];
            if pivot.is_zero() {
                continue;
            }

            let (upper, lower) = m.data.split_at_mut((j + 1) * cols);
            let pivot_row = &upper[j * cols..];
            for row in lower.chunks_exact_mut(cols) {
                if row[j].is_zero() {
                    continue;
                }
                let factor = row[j] / pivot;
                row[j] = T::zero();
                for k in j + 1..cols {
                    row[k] = row[k] - pivot_row[k] * factor;
                }
            }
        }

        (m, correction)
    }

    /// Row-echelon form obtained by Gaussian elimination.
    pub fn gauss(&self) -> Self {
        self.forward_eliminate().0
    }

    /// Reduced row-echelon form.
    ///
    /// Runs [`gauss`](Self::gauss), then walks the pivots from last to first,
    /// scaling each pivot row so its pivot becomes one and clearing the column
    /// above it. Rows whose pivot is zero are skipped instead of divided by zero.
    pub fn gauss_jordan(&self) -> Self {
        let mut m = self.gauss();
        let cols = m.cols;

        for j in (0..m.rows.min(cols)).rev() {
            let pivot = m.data[j * cols + j];
            if pivot.is_zero() {
                continue;
            }
            for x in &mut m.data[j * cols + j..(j + 1) * cols] {
                *x = *x / pivot;
            }

            let (upper, lower) = m.data.split_at_mut(j * cols);
            let pivot_row = &lower[..cols];
            for row in upper.chunks_exact_mut(cols) {
                let factor = row[j];
                if factor.is_zero() {
                    continue;
                }
                row[j] = T::zero();
                for k in j + 1..cols {
                    row[k] = row[k] - pivot_row[k] * factor;
                }
            }
        }

        m
    }

    /// Determinant via forward elimination: the product of the diagonal of the
    /// echelon form, corrected for row swaps.
    ///
    /// # Errors
    /// `NotSquare` unless `rows == cols`.
    pub fn determinant(&self) -> Result<T> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }

        let (m, correction) = self.forward_eliminate();
        let n = m.rows;
        let det = (0..n).fold(correction, |acc, i| acc * m.data[i * n + i]);

        // Collapses -0.0 and friends onto the canonical zero.
        Ok(if det.is_zero() { T::zero() } else { det })
    }

    /// Inverse computed by Gauss-Jordan elimination of `[self | I]`.
    ///
    /// # Errors
    /// - `NotSquare` unless `rows == cols`
    /// - `Singular` if the determinant is zero
    pub fn invert(&self) -> Result<Self> {
        let det = self.determinant()?;
        if det.is_zero() {
            debug!("Refusing to invert singular {}x{} matrix", self.rows, self.cols);
            return Err(LinalgError::Singular);
        }

        let n = self.rows;
        let reduced = self.hconcat(&Self::identity(n)?)?.gauss_jordan();

        let mut data = Vec::with_capacity(n * n);
        for row in reduced.data.chunks_exact(2 * n) {
            data.extend_from_slice(&row[n..]);
        }
        Ok(Self::from_parts(n, n, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::ModRing;
    use approx::assert_relative_eq;
    use num_traits::Zero;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    type F13 = ModRing<13>;

    fn cofactor_determinant(m: &DenseMatrix<f64>) -> f64 {
        let n = m.rows();
        if n == 1 {
            return m[(0, 0)];
        }
        let mut det = 0.0;
        for c in 0..n {
            let mut minor = Vec::with_capacity((n - 1) * (n - 1));
            for i in 1..n {
                for j in (0..n).filter(|&j| j != c) {
                    minor.push(m[(i, j)]);
                }
            }
            let minor = DenseMatrix::from_vec(n - 1, n - 1, minor).unwrap();
            let sign = if c % 2 == 0 { 1.0 } else { -1.0 };
            det += sign * m[(0, c)] * cofactor_determinant(&minor);
        }
        det
    }

    /// Integer-valued and diagonally dominant, so pivots stay well away from zero.
    fn random_matrix(rng: &mut ChaCha8Rng, n: usize) -> DenseMatrix<f64> {
        let mut m = DenseMatrix::new(n, n).unwrap();
        for i in 0..n {
            for j in 0..n {
                m[(i, j)] = if i == j {
                    rng.random_range(30..=40) as f64
                } else {
                    rng.random_range(-9..=9) as f64
                };
            }
        }
        m
    }

    fn assert_matrix_close(a: &DenseMatrix<f64>, b: &DenseMatrix<f64>) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_relative_eq!(x, y, epsilon = 1e-9, max_relative = 1e-7);
        }
    }

    #[test]
    fn test_determinant_2x2() -> anyhow::Result<()> {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
        assert_eq!(m.determinant()?, -2.0);
        Ok(())
    }

    #[test]
    fn test_determinant_requires_square() {
        let m = DenseMatrix::<f64>::new(2, 3).unwrap();
        assert_eq!(
            m.determinant(),
            Err(LinalgError::NotSquare { rows: 2, cols: 3 })
        );
        assert!(matches!(m.invert(), Err(LinalgError::NotSquare { .. })));
    }

    #[test]
    fn test_determinant_with_row_swap() -> anyhow::Result<()> {
        // Zero pivot forces a swap, flipping the sign.
        let m = DenseMatrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]])?;
        assert_eq!(m.determinant()?, -1.0);

        let p = DenseMatrix::from_rows(&[[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]])?;
        assert_eq!(p.determinant()?, -1.0);
        Ok(())
    }

    #[test]
    fn test_singular_determinant_is_plain_zero() -> anyhow::Result<()> {
        let m = DenseMatrix::from_rows(&[[0.0, 2.0], [0.0, 3.0]])?;
        let det: f64 = m.determinant()?;
        assert_eq!(det, 0.0);
        assert!(det.is_sign_positive());

        // A swap followed by a zero diagonal would otherwise give -0.0.
        let n = DenseMatrix::from_rows(&[[0.0, 1.0, 2.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]])?;
        let det: f64 = n.determinant()?;
        assert_eq!(det, 0.0);
        assert!(det.is_sign_positive());
        Ok(())
    }

    #[test]
    fn test_determinant_matches_cofactor_expansion() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for n in 1..=4 {
            for _ in 0..25 {
                let m = random_matrix(&mut rng, n);
                let expected = cofactor_determinant(&m);
                assert_relative_eq!(m.determinant().unwrap(), expected, epsilon = 1e-8, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_determinant_matches_nalgebra() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for n in 2..=6 {
            let m = random_matrix(&mut rng, n);
            let reference = nalgebra::DMatrix::from_row_slice(n, n, m.as_slice());
            assert_relative_eq!(
                m.determinant().unwrap(),
                reference.determinant(),
                epsilon = 1e-6,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_gauss_is_upper_triangular() -> anyhow::Result<()> {
        let m = DenseMatrix::from_rows(&[[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]])?;
        let g = m.gauss();
        for i in 0..3 {
            for j in 0..i {
                assert_eq!(g[(i, j)], 0.0);
            }
        }
        assert_eq!(g.row(0)?, m.row(0)?);
        // Elimination does not touch the receiver.
        assert_eq!(m[(1, 0)], -3.0);

        let (_, correction) = m.forward_eliminate();
        let diag: f64 = (0..3).map(|i| g[(i, i)]).product();
        assert_relative_eq!(correction * diag, m.determinant()?);
        Ok(())
    }

    #[test]
    fn test_gauss_on_wide_and_tall_matrices() -> anyhow::Result<()> {
        let wide = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0, 4.0], [2.0, 4.0, 7.0, 9.0]])?;
        assert_eq!(
            wide.gauss(),
            DenseMatrix::from_rows(&[[1.0, 2.0, 3.0, 4.0], [0.0, 0.0, 1.0, 1.0]])?
        );

        let tall = DenseMatrix::from_rows(&[[1.0, 1.0], [2.0, 3.0], [3.0, 4.0]])?;
        assert_eq!(
            tall.gauss(),
            DenseMatrix::from_rows(&[[1.0, 1.0], [0.0, 1.0], [0.0, 0.0]])?
        );
        Ok(())
    }

    #[test]
    fn test_gauss_jordan_solves_system() -> anyhow::Result<()> {
        // 2x + y - z = 8, -3x - y + 2z = -11, -2x + y + 2z = -3  =>  (2, 3, -1)
        let augmented = DenseMatrix::from_rows(&[
            [2.0, 1.0, -1.0, 8.0],
            [-3.0, -1.0, 2.0, -11.0],
            [-2.0, 1.0, 2.0, -3.0],
        ])?;
        let rref = augmented.gauss_jordan();
        let expected = [2.0, 3.0, -1.0];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rref[(i, j)], if i == j { 1.0 } else { 0.0 }, epsilon = 1e-10);
            }
            assert_relative_eq!(rref[(i, 3)], expected[i], epsilon = 1e-10);
        }
        Ok(())
    }

    #[test]
    fn test_gauss_jordan_skips_zero_pivot() -> anyhow::Result<()> {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]])?;
        let rref = m.gauss_jordan();
        assert_eq!(rref, DenseMatrix::from_rows(&[[1.0, 2.0], [0.0, 0.0]])?);
        Ok(())
    }

    #[test]
    fn test_invert_diagonal() -> anyhow::Result<()> {
        let m = DenseMatrix::from_rows(&[[2.0, 0.0], [0.0, 2.0]])?;
        assert_eq!(m.invert()?, DenseMatrix::from_rows(&[[0.5, 0.0], [0.0, 0.5]])?);
        Ok(())
    }

    #[test]
    fn test_invert_singular() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
        assert_eq!(m.invert(), Err(LinalgError::Singular));
    }

    #[test]
    fn test_invert_needs_row_swap() -> anyhow::Result<()> {
        let m = DenseMatrix::from_rows(&[[0.0, 1.0], [2.0, 0.0]])?;
        let inv = m.invert()?;
        assert_eq!(inv, DenseMatrix::from_rows(&[[0.0, 0.5], [1.0, 0.0]])?);
        assert_eq!(m.matmul(&inv)?, DenseMatrix::identity(2)?);
        Ok(())
    }

    #[test]
    fn test_invert_twice_floating() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let m = random_matrix(&mut rng, 4);
            let inv = m.invert().unwrap();
            assert_matrix_close(&inv.invert().unwrap(), &m);

            let reference = nalgebra::DMatrix::from_row_slice(4, 4, m.as_slice())
                .try_inverse()
                .unwrap();
            let reference = DenseMatrix::from_vec(4, 4, reference.transpose().as_slice().to_vec()).unwrap();
            assert_matrix_close(&inv, &reference);
        }
    }

    #[test]
    fn test_invert_twice_exact_over_finite_field() -> anyhow::Result<()> {
        let m = DenseMatrix::from_rows(&[
            [F13::new(2), F13::new(5), F13::new(0)],
            [F13::new(1), F13::new(0), F13::new(7)],
            [F13::new(0), F13::new(3), F13::new(4)],
        ])?;
        assert!(!m.determinant()?.is_zero());

        let inv = m.invert()?;
        assert_eq!(inv.invert()?, m);
        assert_eq!(m.matmul(&inv)?, DenseMatrix::identity(3)?);
        assert_eq!(inv.matmul(&m)?, DenseMatrix::identity(3)?);
        Ok(())
    }

    #[test]
    fn test_determinant_over_finite_field() -> anyhow::Result<()> {
        // det [[1,2],[3,4]] = -2 = 11 mod 13
        let m = DenseMatrix::from_rows(&[[F13::new(1), F13::new(2)], [F13::new(3), F13::new(4)]])?;
        assert_eq!(m.determinant()?, F13::new(11));

        // Rows are proportional modulo 13.
        let s = DenseMatrix::from_rows(&[[F13::new(2), F13::new(3)], [F13::new(4), F13::new(6)]])?;
        assert_eq!(s.determinant()?, F13::zero());
        assert_eq!(s.invert(), Err(LinalgError::Singular));
        Ok(())
    }
}
