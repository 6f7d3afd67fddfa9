//! Matrix products and singular value decomposition, delegated to a [`Kernel`].

use std::ops::Mul;

use crate::{
    kernel::{self, Kernel},
    Error, Matrix, Result, Vector,
};

impl Matrix<f32> {
    /// Computes the matrix product `self * rhs` with the [default kernel][kernel::default_kernel].
    ///
    /// Returns [`Error::DimensionMismatch`] if `self.ncols() != rhs.nrows()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let a = Matrix::from_rows(&[[1.0f32, 2.0], [3.0, 4.0]])?;
    /// let b = Matrix::from_rows(&[[5.0f32, 6.0], [7.0, 8.0]])?;
    /// assert_eq!(a.multiply(&b)?, Matrix::from_rows(&[[19.0, 22.0], [43.0, 50.0]])?);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn multiply(&self, rhs: &Self) -> Result<Self> {
        self.multiply_with(rhs, kernel::default_kernel())
    }

    /// Computes the matrix product `self * rhs` with the given kernel.
    pub fn multiply_with(&self, rhs: &Self, kernel: &dyn Kernel) -> Result<Self> {
        if self.ncols() != rhs.nrows() {
            return Err(Error::DimensionMismatch {
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let (m, k, n) = (self.nrows(), self.ncols(), rhs.ncols());
        let mut out = vec![0.0; m * n];
        kernel.sgemm(m, n, k, self.as_slice(), rhs.as_slice(), &mut out)?;
        Matrix::from_row_major(m, n, out)
    }

    /// Computes the singular value decomposition of `self` with the
    /// [default kernel][kernel::default_kernel].
    pub fn svd(&self) -> Result<Svd> {
        self.svd_with(kernel::default_kernel())
    }

    /// Computes the singular value decomposition of `self` with the given kernel.
    ///
    /// `self` is not modified; the kernel works on a copy.
    pub fn svd_with(&self, kernel: &dyn Kernel) -> Result<Svd> {
        let (m, n) = self.shape();
        let mut a = self.as_slice().to_vec();
        let mut s = vec![0.0; m.min(n)];
        let mut u = vec![0.0; m * m];
        let mut vt = vec![0.0; n * n];

        let found = kernel.sgesvdx(m, n, &mut a, &mut s, &mut u, &mut vt)?;
        let found = found.min(s.len());
        if found < s.len() {
            log::debug!(
                "{} kernel found {found} of {} singular values",
                kernel.kind(),
                s.len()
            );
        }

        let sigma = Matrix::from_fn(m, n, |row, col| {
            if row == col && row < found {
                s[row]
            } else {
                0.0
            }
        })?;
        Ok(Svd {
            u: Matrix::from_row_major(m, m, u)?,
            sigma,
            vt: Matrix::from_row_major(n, n, vt)?,
        })
    }
}

impl Vector<f32> {
    /// Computes the same inner product as [`Vector::dot`], using the given kernel.
    ///
    /// Kernels may reorder the summation, so the result is only approximately equal to the one
    /// of [`Vector::dot`] (around `1e-3` relative for long vectors).
    pub fn dot_with(&self, other: &Self, kernel: &dyn Kernel) -> Result<f32> {
        self.check_inner_product(other)?;
        kernel.sdot(self.as_slice(), other.as_slice())
    }
}

/// Matrix product.
///
/// # Panics
///
/// Panics if `self.ncols() != rhs.nrows()`. Use [`Matrix::multiply`] to handle this case.
impl Mul for &Matrix<f32> {
    type Output = Matrix<f32>;

    #[track_caller]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Mul for Matrix<f32> {
    type Output = Matrix<f32>;

    #[track_caller]
    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

/// The singular value decomposition `A = U * Sigma * Vt` of an `m`x`n` matrix `A`.
#[derive(Debug, Clone)]
pub struct Svd {
    /// `m`x`m` matrix whose columns are the left singular vectors.
    pub u: Matrix<f32>,
    /// `m`x`n` matrix that is zero except for the singular values on its diagonal, in
    /// non-increasing order.
    pub sigma: Matrix<f32>,
    /// `n`x`n` matrix whose rows are the right singular vectors.
    pub vt: Matrix<f32>,
}

impl Svd {
    /// Returns the diagonal of `sigma` as a row vector.
    pub fn singular_values(&self) -> Vector<f32> {
        let count = self.sigma.min_dimension();
        Vector::row((0..count).map(|i| self.sigma[(i, i)]).collect())
    }

    /// Multiplies the factors back together, approximating the decomposed matrix.
    pub fn reconstruct(&self) -> Result<Matrix<f32>> {
        self.u.multiply(&self.sigma)?.multiply(&self.vt)
    }

    /// Computes the best rank-`k` approximation of the decomposed matrix by only keeping the `k`
    /// largest singular values.
    ///
    /// `k` is clamped to the number of singular values. `k = 0` yields the zero matrix.
    pub fn low_rank(&self, k: usize) -> Result<Matrix<f32>> {
        let (m, n) = (self.u.nrows(), self.vt.ncols());
        let k = k.min(self.sigma.min_dimension());
        if k == 0 {
            return Matrix::zeros(m, n);
        }

        // Scale the first `k` columns of `u` instead of multiplying by a diagonal matrix.
        let us = Matrix::from_fn(m, k, |row, col| self.u[(row, col)] * self.sigma[(col, col)])?;
        let vt = Matrix::from_fn(k, n, |row, col| self.vt[(row, col)])?;
        us.multiply(&vt)
    }
}
