// Declare the OpenBLAS crate as `extern` so its exposed C functions become available to `cblas`
// and `lapack`.
extern crate openblas_src;

use crate::{Error, Result};

use super::{check_gemm_sizes, check_svd_sizes, Kernel, KernelKind};

/// Kernel calling CBLAS and LAPACK routines from a system OpenBLAS.
///
/// The SVD uses the `sgesvdx` expert driver, which only computes the first `min(m, n)` columns of
/// `u` and rows of `vt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LapackKernel;

fn to_i32(routine: &'static str, value: usize) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::kernel(routine, format!("dimension {value} does not fit in an i32")))
}

impl Kernel for LapackKernel {
    fn kind(&self) -> KernelKind {
        KernelKind::Lapack
    }

    fn sgemm(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[f32],
        b: &[f32],
        c: &mut [f32],
    ) -> Result<()> {
        check_gemm_sizes(m, n, k, a, b, c);

        let m = to_i32("cblas_sgemm", m)?;
        let n = to_i32("cblas_sgemm", n)?;
        let k = to_i32("cblas_sgemm", k)?;

        // SAFETY: `a` is `m x k` with a leading dimension of `k`, `b` is `k x n` with a leading
        // dimension of `n` and `c` is `m x n` with a leading dimension of `n`, all row-major.
        unsafe {
            cblas::sgemm(
                cblas::Layout::RowMajor,
                cblas::Transpose::None,
                cblas::Transpose::None,
                m,
                n,
                k,
                1.0,
                a,
                k,
                b,
                n,
                0.0,
                c,
                n,
            );
        }
        Ok(())
    }

    fn sdot(&self, x: &[f32], y: &[f32]) -> Result<f32> {
        assert_eq!(x.len(), y.len(), "`x` and `y` must have the same length");

        let n = to_i32("cblas_sdot", x.len())?;
        // SAFETY: both slices hold `n` contiguous elements.
        Ok(unsafe { cblas::sdot(n, x, 1, y, 1) })
    }

    fn sgesvdx(
        &self,
        m: usize,
        n: usize,
        a: &mut [f32],
        s: &mut [f32],
        u: &mut [f32],
        vt: &mut [f32],
    ) -> Result<usize> {
        check_svd_sizes(m, n, a, s, u, vt);

        // LAPACK works on column-major data, so the row-major `a` is seen as its `n x m`
        // transpose. Decomposing `a^T = U' S V'^T` gives `a = V' S U'^T`: the `U'` LAPACK writes
        // is our `vt` and its `V'^T` is our `u`, both already in row-major order.
        let rows = to_i32("sgesvdx", n)?;
        let cols = to_i32("sgesvdx", m)?;
        let mut iwork = vec![0i32; 12 * m.min(n)];
        let mut found = 0i32;
        let mut info = 0i32;

        let mut query = [0.0f32];
        // SAFETY: `lwork = -1` only writes the optimal workspace size to `query[0]`. Buffer sizes
        // are the same as for the real call below.
        unsafe {
            lapack::sgesvdx(
                b'V', b'V', b'A', rows, cols, a, rows, 0.0, 0.0, 0, 0, &mut found, s, vt, rows, u,
                cols, &mut query, -1, &mut iwork, &mut info,
            );
        }
        if info != 0 {
            return Err(Error::kernel(
                "sgesvdx",
                format!("workspace query failed with info = {info}"),
            ));
        }

        let lwork = (query[0] as usize).max(1);
        log::trace!("sgesvdx on {m}x{n} matrix requested {lwork} workspace elements");
        let mut work = vec![0.0f32; lwork];
        let lwork = to_i32("sgesvdx", lwork)?;

        // SAFETY:
        // * `a` holds `n x m` column-major elements with a leading dimension of `n`.
        // * `s` holds `min(m, n)` elements.
        // * `vt` is `n x n`, passed as LAPACK's `U` with a leading dimension of `n`.
        // * `u` is `m x m`, passed as LAPACK's `VT` with a leading dimension of `m`, which is at
        //   least the `min(m, n)` rows that are written.
        // * `work` and `iwork` have the sizes LAPACK asked for.
        unsafe {
            lapack::sgesvdx(
                b'V', b'V', b'A', rows, cols, a, rows, 0.0, 0.0, 0, 0, &mut found, s, vt, rows, u,
                cols, &mut work, lwork, &mut iwork, &mut info,
            );
        }

        match info {
            0 => Ok(found.max(0) as usize),
            info if info < 0 => Err(Error::kernel(
                "sgesvdx",
                format!("argument {} had an illegal value", -info),
            )),
            info => Err(Error::kernel(
                "sgesvdx",
                format!("{info} eigenvectors failed to converge"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::kernel::FaerKernel;

    #[test]
    fn matches_faer() {
        let mut rng = fastrand::Rng::with_seed(42);
        let (m, n, k) = (5, 3, 4);
        let a: Vec<f32> = (0..m * k).map(|_| rng.f32()).collect();
        let b: Vec<f32> = (0..k * n).map(|_| rng.f32()).collect();

        let mut expected = vec![0.0; m * n];
        FaerKernel.sgemm(m, n, k, &a, &b, &mut expected).unwrap();
        let mut actual = vec![0.0; m * n];
        LapackKernel.sgemm(m, n, k, &a, &b, &mut actual).unwrap();
        assert_relative_eq!(&expected[..], &actual[..], epsilon = 1e-5);

        let dot = LapackKernel.sdot(&a[..k], &b[..k]).unwrap();
        let reference: f32 = a[..k].iter().zip(&b[..k]).map(|(x, y)| x * y).sum();
        assert_relative_eq!(dot, reference, epsilon = 1e-5);
    }

    #[test]
    fn singular_values() {
        let (m, n) = (4, 2);
        let mut rng = fastrand::Rng::with_seed(3);
        let a: Vec<f32> = (0..m * n).map(|_| rng.f32()).collect();

        let mut expected = vec![0.0; 2];
        FaerKernel
            .sgesvdx(m, n, &mut a.clone(), &mut expected, &mut [0.0; 16], &mut [0.0; 4])
            .unwrap();
        let mut actual = vec![0.0; 2];
        let found = LapackKernel
            .sgesvdx(m, n, &mut a.clone(), &mut actual, &mut [0.0; 16], &mut [0.0; 4])
            .unwrap();
        assert_eq!(found, 2);
        assert_relative_eq!(&expected[..], &actual[..], epsilon = 1e-4);
    }
}
