//! Backing storage for [`Matrix`][super::Matrix].

/// A contiguous, row-major run of `rows * cols` elements.
///
/// Buffers are shared between matrix handles through an `Arc`. They are never mutated while
/// shared; a handle that wants to write first obtains a unique copy (see `Matrix::make_unique`).
#[derive(Clone)]
pub(crate) struct Buffer<T> {
    rows: usize,
    cols: usize,
    data: Box<[T]>,
}

impl<T> Buffer<T> {
    /// Wraps `data`, which must hold exactly `rows * cols` elements.
    pub(crate) fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self {
            rows,
            cols,
            data: data.into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }
}
