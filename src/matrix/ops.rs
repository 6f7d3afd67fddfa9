use std::{
    ops::{Add, Index, IndexMut, Mul, Sub},
    sync::Arc,
};

use crate::{Element, Matrix};

impl<T: Element> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        if let Err(e) = self.check_index(row, col) {
            panic!("{e}");
        }
        &self.buf.as_slice()[self.buf.offset(row, col)]
    }
}

/// Mutable element access.
///
/// Like all writes, this copies the buffer first if it is shared with another handle.
impl<T: Element> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        if let Err(e) = self.check_index(row, col) {
            panic!("{e}");
        }
        let buf = self.make_unique();
        let offset = buf.offset(row, col);
        &mut buf.as_mut_slice()[offset]
    }
}

// Compares by value; two handles to the same buffer are trivially equal.
impl<T: Element> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && (Arc::ptr_eq(&self.buf, &other.buf) || self.as_slice() == other.as_slice())
    }
}

impl<T: Element + Eq> Eq for Matrix<T> {}

/// Matrix * Scalar.
impl<T: Element> Mul<T> for Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}

impl<T: Element> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Self::Output {
        self.scale(rhs)
    }
}

/// Element-wise sum.
///
/// # Panics
///
/// Panics if the shapes differ. Use [`Matrix::try_add`] to handle this case.
impl<T: Element> Add for &Matrix<T> {
    type Output = Matrix<T>;

    #[track_caller]
    fn add(self, rhs: Self) -> Self::Output {
        self.try_add(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

/// Element-wise difference.
///
/// # Panics
///
/// Panics if the shapes differ. Use [`Matrix::try_sub`] to handle this case.
impl<T: Element> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    #[track_caller]
    fn sub(self, rhs: Self) -> Self::Output {
        self.try_sub(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

#[cfg(test)]
mod tests {
    use crate::Matrix;

    #[test]
    fn scalar_mul() {
        let mat = Matrix::from_rows(&[[1, -2], [3, 0]]).unwrap();
        assert_eq!(&mat * 2, Matrix::from_rows(&[[2, -4], [6, 0]]).unwrap());
        assert_eq!(mat * 0, Matrix::zeros(2, 2).unwrap());
    }

    #[test]
    fn add_sub() {
        let a = Matrix::from_rows(&[[1.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(&[[0.5, 0.5]]).unwrap();
        assert_eq!(&a + &b, Matrix::from_rows(&[[1.5, 2.5]]).unwrap());
        assert_eq!(&a - &b, Matrix::from_rows(&[[0.5, 1.5]]).unwrap());
    }

    #[test]
    #[should_panic(expected = "dimension mismatch: 1x2 and 2x1 are incompatible")]
    fn add_mismatch_panics() {
        let a = Matrix::<i32>::zeros(1, 2).unwrap();
        let _ = &a + &a.transpose();
    }

    #[test]
    fn index_mut_writes_through() {
        let mut mat = Matrix::<u8>::zeros(2, 2).unwrap();
        mat[(1, 0)] = 9;
        assert_eq!(mat.as_slice(), &[0, 0, 9, 0]);
    }
}
