//! Small dense linear algebra with copy-on-write matrices.
//!
//! - [`Matrix`] is a row-major matrix whose element buffer is shared between clones until one of
//!   them is written to.
//! - [`Vector`] is an owned sequence of elements tagged with an [`Orientation`].
//! - Matrix products, dot products and singular value decompositions on `f32` data are delegated
//!   to a [`Kernel`][kernel::Kernel] backed by an external library (see [`kernel`]).
//! - The [`image`] module converts between matrices and grayscale images.
//!
//! Fallible operations return [`Result`]; the operator overloads panic instead, just like slice
//! indexing does.
//!
//! # Environment Variables
//!
//! * `MINIGRAD_KERNEL`: Configures the kernel used by [`Matrix::multiply`], [`Matrix::svd`] and
//!   the `*` operator on `f32` matrices. Allowed values are:
//!   * `faer` (the default): uses the pure-Rust [faer] crate.
//!   * `lapack`: uses CBLAS and LAPACK from a system OpenBLAS. Requires the `lapack` Cargo
//!     feature.
//!
//!   Any other value, or `lapack` in a build without the feature, makes the process exit with an
//!   error on first use.
//! * `RUST_LOG`: Overrides the log filters set up by [`init_logger!`].
//!
//! [faer]: https://github.com/sarah-quinones/faer-rs

use log::LevelFilter;

mod approx_eq;
mod error;
pub mod image;
pub mod kernel;
mod linalg;
mod matrix;
mod traits;
mod vector;

pub use error::{Error, Result};
pub use linalg::Svd;
pub use matrix::Matrix;
pub use traits::{Element, One, Zero};
pub use vector::{Orientation, Vector};

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and minigrad will log at *debug* level. Buffer copies and kernel workspace
/// sizes are logged at *trace* level, which can be enabled with `RUST_LOG=minigrad=trace`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
