//! Numeric kernels backing matrix multiplication, dot products and SVD.
//!
//! A [`Kernel`] is a thin adapter over an external linear algebra library. Two are known:
//!
//! - [`KernelKind::Faer`] uses the pure-Rust [faer] crate and is always available.
//! - [`KernelKind::Lapack`] calls `cblas_sgemm`, `cblas_sdot` and LAPACK's `sgesvdx` expert
//!   driver through a system OpenBLAS. It is only compiled in when the `lapack` Cargo feature is
//!   enabled.
//!
//! All buffers passed to a kernel are dense and row-major. Kernels that expect column-major data
//! are responsible for converting.
//!
//! The kernel used by [`Matrix::multiply`] and [`Matrix::svd`] is configured by the
//! `MINIGRAD_KERNEL` environment variable (see [`default_kernel`]). Use [`get`] and the `*_with`
//! methods to pick one explicitly.
//!
//! [faer]: https://github.com/sarah-quinones/faer-rs
//! [`Matrix::multiply`]: crate::Matrix::multiply
//! [`Matrix::svd`]: crate::Matrix::svd

mod faer;
#[cfg(feature = "lapack")]
mod lapack;

use std::{
    env::{self, VarError},
    fmt, process,
};

use once_cell::sync::Lazy;

use crate::{Error, Result};

pub use self::faer::FaerKernel;
#[cfg(feature = "lapack")]
pub use self::lapack::LapackKernel;

/// Identifies a [`Kernel`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelKind {
    Faer,
    Lapack,
}

impl KernelKind {
    /// All known kernels, whether or not they are available in this build.
    pub const ALL: [KernelKind; 2] = [KernelKind::Faer, KernelKind::Lapack];

    /// The name of this kernel, as accepted by the `MINIGRAD_KERNEL` variable.
    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Faer => "faer",
            KernelKind::Lapack => "lapack",
        }
    }

    /// Looks up a kernel by its [name][KernelKind::name].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns whether this kernel was compiled into the current build.
    pub fn is_available(self) -> bool {
        match self {
            KernelKind::Faer => true,
            KernelKind::Lapack => cfg!(feature = "lapack"),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-precision linear algebra routines.
///
/// All matrices are dense and row-major. Implementations may assume the buffer sizes documented on
/// each method; callers in this crate always uphold them.
pub trait Kernel: Send + Sync + fmt::Debug {
    fn kind(&self) -> KernelKind;

    /// Computes `c = a * b` for an `m`x`k` matrix `a` and a `k`x`n` matrix `b`.
    ///
    /// `c` is `m`x`n` and completely overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `a.len() != m * k`, `b.len() != k * n` or `c.len() != m * n`.
    fn sgemm(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[f32],
        b: &[f32],
        c: &mut [f32],
    ) -> Result<()>;

    /// Computes the inner product of `x` and `y`.
    ///
    /// The result may differ from a sequential sum by rounding, around `1e-3` relative for long
    /// inputs.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != y.len()`.
    fn sdot(&self, x: &[f32], y: &[f32]) -> Result<f32>;

    /// Computes the singular value decomposition `a = u * diag(s) * vt` of the `m`x`n` matrix `a`.
    ///
    /// - `s` has `min(m, n)` entries and receives the singular values in non-increasing order.
    /// - `u` is `m`x`m` and `vt` is `n`x`n`. Singular vectors that the backing routine does not
    ///   compute are left untouched.
    /// - The contents of `a` are unspecified afterwards.
    ///
    /// Returns the number of singular values found. Entries of `s` past that number are left
    /// untouched.
    ///
    /// # Panics
    ///
    /// Panics if any buffer has the wrong size.
    fn sgesvdx(
        &self,
        m: usize,
        n: usize,
        a: &mut [f32],
        s: &mut [f32],
        u: &mut [f32],
        vt: &mut [f32],
    ) -> Result<usize>;
}

#[track_caller]
fn check_gemm_sizes(m: usize, n: usize, k: usize, a: &[f32], b: &[f32], c: &[f32]) {
    assert_eq!(
        a.len(),
        m * k,
        "expected {m}x{k} matrix `a` to have length {}, instead got {}",
        m * k,
        a.len()
    );
    assert_eq!(
        b.len(),
        k * n,
        "expected {k}x{n} matrix `b` to have length {}, instead got {}",
        k * n,
        b.len()
    );
    assert_eq!(
        c.len(),
        m * n,
        "expected {m}x{n} matrix `c` to have length {}, instead got {}",
        m * n,
        c.len()
    );
}

#[track_caller]
fn check_svd_sizes(m: usize, n: usize, a: &[f32], s: &[f32], u: &[f32], vt: &[f32]) {
    assert_eq!(a.len(), m * n, "expected {m}x{n} matrix `a`");
    assert_eq!(s.len(), m.min(n), "expected {} singular values", m.min(n));
    assert_eq!(u.len(), m * m, "expected {m}x{m} matrix `u`");
    assert_eq!(vt.len(), n * n, "expected {n}x{n} matrix `vt`");
}

static FAER: FaerKernel = FaerKernel;
#[cfg(feature = "lapack")]
static LAPACK: LapackKernel = LapackKernel;

/// Returns the kernel identified by `kind`.
///
/// Returns [`Error::KernelUnavailable`] if it was not compiled into this build.
pub fn get(kind: KernelKind) -> Result<&'static dyn Kernel> {
    match kind {
        KernelKind::Faer => Ok(&FAER),
        #[cfg(feature = "lapack")]
        KernelKind::Lapack => Ok(&LAPACK),
        #[allow(unreachable_patterns)]
        kind => Err(Error::KernelUnavailable(kind)),
    }
}

const DEFAULT_KERNEL: KernelKind = KernelKind::Faer;

static CONFIGURED: Lazy<&'static dyn Kernel> = Lazy::new(|| {
    let kind = match env::var("MINIGRAD_KERNEL") {
        Ok(v) => match KernelKind::from_name(&v) {
            Some(kind) => kind,
            None => {
                log::error!("unknown kernel '{v}'");
                eprintln!("invalid value set for `MINIGRAD_KERNEL` variable: '{v}'; exiting");
                process::exit(1);
            }
        },
        Err(VarError::NotPresent) => DEFAULT_KERNEL,
        Err(VarError::NotUnicode(s)) => {
            log::error!("`MINIGRAD_KERNEL` is not valid unicode");
            eprintln!(
                "invalid value set for `MINIGRAD_KERNEL` variable: {}; exiting",
                s.to_string_lossy()
            );
            process::exit(1);
        }
    };

    match get(kind) {
        Ok(kernel) => {
            log::debug!("using {kind} kernel");
            kernel
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("`MINIGRAD_KERNEL` is set to '{kind}', but {e}; exiting");
            process::exit(1);
        }
    }
});

/// Returns the kernel selected by the `MINIGRAD_KERNEL` environment variable.
///
/// The variable is read once, on first use. If it is unset, the faer kernel is used.
///
/// If the variable names an unknown kernel, or one that is not available in this build, an error
/// is printed and the process exits with status 1.
pub fn default_kernel() -> &'static dyn Kernel {
    *CONFIGURED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        for kind in KernelKind::ALL {
            assert_eq!(KernelKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
        assert_eq!(KernelKind::from_name("mkl"), None);
        assert_eq!(KernelKind::from_name("FAER"), None);
    }

    #[test]
    fn availability() {
        assert!(KernelKind::Faer.is_available());
        assert_eq!(KernelKind::Lapack.is_available(), cfg!(feature = "lapack"));

        for kind in KernelKind::ALL {
            match get(kind) {
                Ok(kernel) => {
                    assert!(kind.is_available());
                    assert_eq!(kernel.kind(), kind);
                }
                Err(e) => {
                    assert!(!kind.is_available());
                    assert_eq!(e, Error::KernelUnavailable(kind));
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "expected 2x3 matrix `a` to have length 6, instead got 5")]
    fn gemm_size_check() {
        let mut c = [0.0; 4];
        let _ = FAER.sgemm(2, 2, 3, &[0.0; 5], &[0.0; 6], &mut c);
    }
}
