use std::{fmt, ops::Range, sync::Arc};

use crate::{Element, Error, One, Result, Vector};

mod buffer;
mod ops;

use buffer::Buffer;

/// A dense, row-major matrix with element type `T` and copy-on-write storage.
///
/// # Construction
///
/// Matrices always have at least one row and one column. All constructors validate this and
/// return [`Error::InvalidShape`] otherwise.
///
/// - [`Matrix::zeros`] and [`Matrix::filled`] create a matrix with every element set to the same
///   value.
/// - [`Matrix::from_rows`] copies nested rows into a matrix.
/// - [`Matrix::from_row_major`] takes ownership of a flat, row-major [`Vec`].
/// - [`Matrix::from_fn`] invokes a closure with the row and column of each element.
/// - [`Matrix::diagonal`] and [`Matrix::identity`] create square matrices that are zero outside of
///   their diagonal.
///
/// # Copy-on-write
///
/// Cloning a [`Matrix`] is cheap: the clone shares the element buffer with the original. Before
/// any write ([`Matrix::set`], [`IndexMut`], [`Matrix::set_row_slice`], [`Matrix::as_mut_slice`])
/// the handle checks whether it is the only one referencing its buffer, and copies the buffer if it
/// isn't. A write through one handle is therefore never observable through another.
///
/// ```
/// # use minigrad::*;
/// let a = Matrix::from_rows(&[[1, 2], [3, 4]])?;
/// let mut b = a.clone();
/// assert!(b.shares_buffer_with(&a));
///
/// b.set(0, 0, 100)?;
/// assert!(!b.shares_buffer_with(&a));
/// assert_eq!(a.get(0, 0)?, 1);
/// assert_eq!(b.get(0, 0)?, 100);
/// # Ok::<(), Error>(())
/// ```
///
/// The uniqueness check and buffer swap are atomic, so distinct handles may be mutated on
/// different threads without additional locking.
///
/// # Element Access
///
/// [`Matrix::get`] and [`Matrix::set`] perform checked access and return
/// [`Error::IndexOutOfBounds`] for invalid positions. [`Matrix`] also implements [`Index`] and
/// [`IndexMut`] for `(row, column)` tuples, which panic when out of bounds, just like slices do.
///
/// [`Index`]: std::ops::Index
/// [`IndexMut`]: std::ops::IndexMut
#[derive(Clone)]
pub struct Matrix<T> {
    buf: Arc<Buffer<T>>,
}

impl<T: Element> Matrix<T> {
    fn from_buffer(buf: Buffer<T>) -> Self {
        Self { buf: Arc::new(buf) }
    }

    /// Validates a shape and returns its element count.
    pub(crate) fn check_shape(rows: usize, cols: usize) -> Result<usize> {
        match rows.checked_mul(cols) {
            Some(len) if len != 0 => Ok(len),
            _ => Err(Error::InvalidShape { rows, cols }),
        }
    }

    /// Builds a matrix from a closure without validating the shape.
    fn generate<F>(rows: usize, cols: usize, mut cb: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(cb(row, col));
            }
        }
        Self::from_buffer(Buffer::from_vec(rows, cols, data))
    }

    /// Creates a `rows`x`cols` matrix with every element set to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::<f32>::zeros(2, 3)?;
    /// assert_eq!(mat.shape(), (2, 3));
    /// assert!(mat.as_slice().iter().all(|&e| e == 0.0));
    ///
    /// assert_eq!(
    ///     Matrix::<f32>::zeros(0, 3).unwrap_err(),
    ///     Error::InvalidShape { rows: 0, cols: 3 },
    /// );
    /// # Ok::<(), Error>(())
    /// ```
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, T::ZERO)
    }

    /// Creates a `rows`x`cols` matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self> {
        let len = Self::check_shape(rows, cols)?;
        Ok(Self::from_buffer(Buffer::from_vec(rows, cols, vec![value; len])))
    }

    /// Creates a matrix by invoking a closure with the position (row and column) of each element.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::from_fn(2, 3, |row, col| row * 10 + col)?;
    /// assert_eq!(mat, Matrix::from_rows(&[
    ///     [ 0,  1,  2],
    ///     [10, 11, 12],
    /// ])?);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn from_fn<F>(rows: usize, cols: usize, cb: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        Self::check_shape(rows, cols)?;
        Ok(Self::generate(rows, cols, cb))
    }

    /// Creates a matrix that takes ownership of `data`, interpreted in row-major order.
    ///
    /// Returns [`Error::LengthMismatch`] if `data` does not contain exactly `rows * cols` elements.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let len = Self::check_shape(rows, cols)?;
        if data.len() != len {
            return Err(Error::LengthMismatch {
                left: data.len(),
                right: len,
            });
        }
        Ok(Self::from_buffer(Buffer::from_vec(rows, cols, data)))
    }

    /// Creates a matrix by copying a list of rows.
    ///
    /// Every row must have the same length as the first one.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `rows` is empty.
    /// - [`Error::RaggedInput`] if a row's length differs from the first row's.
    /// - [`Error::InvalidShape`] if the rows are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::from_rows(&[
    ///     [1, 2, 3],
    ///     [4, 5, 6],
    /// ])?;
    /// assert_eq!(mat.shape(), (2, 3));
    /// assert_eq!(mat[(1, 0)], 4);
    ///
    /// let ragged = Matrix::from_rows(&[vec![1, 2], vec![3]]);
    /// assert_eq!(ragged.unwrap_err(), Error::RaggedInput { row: 1, expected: 2, found: 1 });
    /// # Ok::<(), Error>(())
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let ncols = rows.first().ok_or(Error::EmptyInput)?.as_ref().len();
        let mut data = Vec::with_capacity(rows.len() * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(Error::RaggedInput {
                    row: i,
                    expected: ncols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_row_major(rows.len(), ncols, data)
    }

    /// Creates a square matrix from its diagonal.
    ///
    /// Elements outside the diagonal are initialized with zero. An empty diagonal results in
    /// [`Error::InvalidShape`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let diag = Matrix::diagonal(&[1, 2, 3])?;
    /// assert_eq!(diag, Matrix::from_rows(&[
    ///     [1, 0, 0],
    ///     [0, 2, 0],
    ///     [0, 0, 3],
    /// ])?);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn diagonal(elements: &[T]) -> Result<Self> {
        let n = elements.len();
        Self::from_fn(n, n, |row, col| {
            if row == col {
                elements[row]
            } else {
                T::ZERO
            }
        })
    }

    /// Creates the `n`x`n` identity matrix.
    pub fn identity(n: usize) -> Result<Self>
    where
        T: One,
    {
        Self::from_fn(n, n, |row, col| if row == col { T::ONE } else { T::ZERO })
    }

    /// Returns the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.buf.rows()
    }

    /// Returns the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.buf.cols()
    }

    /// Returns `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// The smallest dimension of the matrix, `min(nrows, ncols)`.
    ///
    /// This is the number of singular values of the matrix.
    #[inline]
    pub fn min_dimension(&self) -> usize {
        self.nrows().min(self.ncols())
    }

    /// Returns the total number of elements, `nrows * ncols`.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Always returns `false`: every matrix has at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row < self.nrows() && col < self.ncols() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                row,
                col,
                shape: self.shape(),
            })
        }
    }

    fn check_row_range(&self, row: usize, cols: &Range<usize>) -> Result<()> {
        if row < self.nrows() && cols.start <= cols.end && cols.end <= self.ncols() {
            Ok(())
        } else {
            let col = if cols.start > cols.end {
                cols.start
            } else {
                cols.end.saturating_sub(1)
            };
            Err(Error::IndexOutOfBounds {
                row,
                col,
                shape: self.shape(),
            })
        }
    }

    /// Ensures this handle is the only one referencing its buffer, copying it if necessary.
    ///
    /// Must be called before every write.
    fn make_unique(&mut self) -> &mut Buffer<T> {
        if Arc::strong_count(&self.buf) > 1 {
            log::trace!(
                "copying shared {}x{} buffer before write",
                self.nrows(),
                self.ncols()
            );
        }
        Arc::make_mut(&mut self.buf)
    }

    /// Returns the element at `(row, col)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::from_rows(&[[0, 1, 2], [3, 4, 5]])?;
    /// assert_eq!(mat.get(0, 0)?, 0);
    /// assert_eq!(mat.get(1, 0)?, 3);
    /// assert!(mat.get(2, 0).is_err());
    /// # Ok::<(), Error>(())
    /// ```
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check_index(row, col)?;
        Ok(self.buf.as_slice()[self.buf.offset(row, col)])
    }

    /// Replaces the element at `(row, col)` with `value`.
    ///
    /// If the buffer is shared with other handles, it is copied first.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_index(row, col)?;
        let buf = self.make_unique();
        let offset = buf.offset(row, col);
        buf.as_mut_slice()[offset] = value;
        Ok(())
    }

    /// Copies the elements of `row` in the column range `cols` into a new row [`Vector`].
    ///
    /// The returned vector does not share storage with the matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::from_rows(&[[0, 1, 2], [3, 4, 5]])?;
    /// let v = mat.slice_row(1, 1..3)?;
    /// assert_eq!(v, Vector::row(vec![4, 5]));
    /// assert_eq!(v.orientation(), Orientation::Row);
    /// assert!(mat.slice_row(1, 1..4).is_err());
    /// # Ok::<(), Error>(())
    /// ```
    pub fn slice_row(&self, row: usize, cols: Range<usize>) -> Result<Vector<T>> {
        self.check_row_range(row, &cols)?;
        let start = self.buf.offset(row, cols.start);
        let data = self.buf.as_slice()[start..start + cols.len()].to_vec();
        Ok(Vector::row(data))
    }

    /// Copies an entire row into a new row [`Vector`].
    pub fn row(&self, row: usize) -> Result<Vector<T>> {
        self.slice_row(row, 0..self.ncols())
    }

    /// Overwrites the elements of `row` in the column range `cols` with the contents of `values`.
    ///
    /// Returns [`Error::LengthMismatch`] if `values` does not have exactly `cols.len()` elements.
    /// Orientation of `values` is ignored.
    pub fn set_row_slice(
        &mut self,
        row: usize,
        cols: Range<usize>,
        values: &Vector<T>,
    ) -> Result<()> {
        self.check_row_range(row, &cols)?;
        if values.len() != cols.len() {
            return Err(Error::LengthMismatch {
                left: values.len(),
                right: cols.len(),
            });
        }
        let buf = self.make_unique();
        let start = buf.offset(row, cols.start);
        buf.as_mut_slice()[start..start + cols.len()].copy_from_slice(values.as_slice());
        Ok(())
    }

    /// Returns a row [`Vector`] holding the diagonal elements `(i, i)` for `i` in
    /// `0..min_dimension()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]])?;
    /// assert_eq!(mat.diagonal_values()?, Vector::row(vec![1, 5]));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn diagonal_values(&self) -> Result<Vector<T>> {
        if self.nrows() == 0 || self.ncols() == 0 {
            return Err(Error::NotApplicable("matrix has no diagonal"));
        }
        let data = (0..self.min_dimension()).map(|i| self[(i, i)]).collect();
        Ok(Vector::row(data))
    }

    /// Returns the elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    /// Returns the elements in row-major order, for writing.
    ///
    /// If the buffer is shared with other handles, it is copied first.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.make_unique().as_mut_slice()
    }

    /// Converts the matrix into its row-major elements.
    ///
    /// This avoids a copy if the buffer is not shared.
    pub fn into_vec(self) -> Vec<T> {
        match Arc::try_unwrap(self.buf) {
            Ok(buf) => buf.into_vec(),
            Err(shared) => shared.as_slice().to_vec(),
        }
    }

    /// Returns an iterator over the rows of the matrix, as slices.
    pub fn row_slices(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.as_slice().chunks_exact(self.ncols())
    }

    /// Returns `true` if another [`Matrix`] handle references the same buffer.
    #[inline]
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.buf) > 1
    }

    /// Returns `true` if `self` and `other` reference the same buffer.
    #[inline]
    pub fn shares_buffer_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf)
    }

    /// Applies a closure to each element, returning a new matrix of the same shape.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::from_rows(&[[0, 1, 2], [3, 4, 5]])?;
    /// assert_eq!(mat.map(|e| e * 2), Matrix::from_rows(&[[0, 2, 4], [6, 8, 10]])?);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn map<U, F>(&self, f: F) -> Matrix<U>
    where
        U: Element,
        F: FnMut(T) -> U,
    {
        let data = self.as_slice().iter().copied().map(f).collect();
        Matrix::from_buffer(Buffer::from_vec(self.nrows(), self.ncols(), data))
    }

    /// Swaps the rows and columns of this matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use minigrad::*;
    /// let mat = Matrix::from_rows(&[[0, 1, 2], [3, 4, 5]])?.transpose();
    /// assert_eq!(mat, Matrix::from_rows(&[
    ///     [0, 3],
    ///     [1, 4],
    ///     [2, 5],
    /// ])?);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn transpose(&self) -> Self {
        Self::generate(self.ncols(), self.nrows(), |row, col| self[(col, row)])
    }

    fn zip_with<F>(&self, rhs: &Self, mut f: F) -> Result<Self>
    where
        F: FnMut(T, T) -> T,
    {
        if self.shape() != rhs.shape() {
            return Err(Error::DimensionMismatch {
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        let data = self
            .as_slice()
            .iter()
            .zip(rhs.as_slice())
            .map(|(&l, &r)| f(l, r))
            .collect();
        Ok(Self::from_buffer(Buffer::from_vec(
            self.nrows(),
            self.ncols(),
            data,
        )))
    }

    /// Element-wise sum of two matrices of the same shape.
    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |l, r| l + r)
    }

    /// Element-wise difference of two matrices of the same shape.
    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |l, r| l - r)
    }

    /// Element-wise (Hadamard) product of two matrices of the same shape.
    pub fn hadamard(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |l, r| l * r)
    }

    /// Multiplies every element by `scalar`.
    pub fn scale(&self, scalar: T) -> Self {
        self.map(|elem| elem * scalar)
    }
}

impl Matrix<u8> {
    /// Converts every element to [`f32`], without rescaling.
    pub fn to_f32(&self) -> Matrix<f32> {
        self.map(f32::from)
    }
}

impl Matrix<f32> {
    /// Converts every element to [`u8`], truncating the fractional part.
    ///
    /// Values outside of `0..=255` saturate; `NaN` becomes 0.
    pub fn to_u8(&self) -> Matrix<u8> {
        self.map(|elem| elem as u8)
    }
}

impl<T: Element + fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = " --- ".repeat(self.ncols());
        writeln!(f, "{border}")?;
        for row in self.row_slices() {
            write!(f, "|")?;
            for elem in row {
                write!(f, "{elem:.2} ")?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "{border}")
    }
}

impl<T: Element> fmt::Debug for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.row_slices()).finish()
    }
}
