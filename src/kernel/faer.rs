use faer::{
    dyn_stack::{GlobalPodBuffer, PodStack},
    linalg::{
        matmul::matmul,
        svd::{compute_svd, compute_svd_req, ComputeVectors, SvdParams},
    },
    Parallelism,
};

use crate::{Error, Result};

use super::{check_gemm_sizes, check_svd_sizes, Kernel, KernelKind};

/// Kernel backed by the pure-Rust `faer` crate.
///
/// Computes full `u` and `vt` matrices, and always finds all `min(m, n)` singular values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaerKernel;

impl Kernel for FaerKernel {
    fn kind(&self) -> KernelKind {
        KernelKind::Faer
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

        let a = faer::mat::from_row_major_slice(a, m, k);
        let b = faer::mat::from_row_major_slice(b, k, n);
        let c = faer::mat::from_row_major_slice_mut(c, m, n);

        // `alpha: None` overwrites `c` instead of accumulating into it.
        matmul(c, a, b, None, 1.0, Parallelism::None);
        Ok(())
    }

    fn sdot(&self, x: &[f32], y: &[f32]) -> Result<f32> {
        assert_eq!(x.len(), y.len(), "`x` and `y` must have the same length");

        let mut out = [0.0f32];
        self.sgemm(1, 1, x.len(), x, y, &mut out)?;
        Ok(out[0])
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

        let req = compute_svd_req::<f32>(
            m,
            n,
            ComputeVectors::Full,
            ComputeVectors::Full,
            Parallelism::None,
            SvdParams::default(),
        )
        .map_err(|_| Error::kernel("compute_svd_req", "workspace size overflows usize"))?;
        log::trace!("svd of {m}x{n} matrix needs {} bytes of workspace", req.size_bytes());

        let mut workspace = GlobalPodBuffer::new(req);
        let stack = PodStack::new(&mut workspace);

        let a = faer::mat::from_row_major_slice(&*a, m, n);
        let s_col = faer::col::from_slice_mut(s);
        let u = faer::mat::from_row_major_slice_mut(u, m, m);
        // faer produces `V`, which is `vt` stored column-major.
        let v = faer::mat::from_column_major_slice_mut(vt, n, n);

        compute_svd(a, s_col, Some(u), Some(v), Parallelism::None, stack, SvdParams::default());

        if s.iter().any(|sv| !sv.is_finite()) {
            return Err(Error::kernel("compute_svd", "did not converge"));
        }
        Ok(s.len())
    }
}
