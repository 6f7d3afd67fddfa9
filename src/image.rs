//! Conversions between matrices and grayscale images.
//!
//! An image of width `W` and height `H` corresponds to an `H`x`W` matrix: pixel `(x, y)` is
//! element `(y, x)`.

use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, ImageBuffer, Luma, Primitive};

use crate::{Element, Error, Matrix, Result};

/// Describes how grayscale pixels are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PixelFormat {
    /// One unsigned byte per pixel, `0` is black and `255` is white.
    Luma8,
    /// One `f32` per pixel, expected to be in range `0.0..=1.0`.
    Luma32F,
}

impl PixelFormat {
    #[inline]
    pub const fn bits_per_pixel(self) -> usize {
        match self {
            PixelFormat::Luma8 => 8,
            PixelFormat::Luma32F => 32,
        }
    }

    /// Returns the number of bytes a tightly packed row of `width` pixels occupies.
    #[inline]
    pub const fn bytes_per_row(self, width: usize) -> usize {
        width * self.bits_per_pixel() / 8
    }
}

/// Matrix element types that can be used as grayscale pixels.
pub trait GrayPixel: Element + Primitive {
    /// The pixel format of images with this element type.
    const FORMAT: PixelFormat;

    /// Converts an image of any color type to grayscale with this element type.
    fn convert(image: &DynamicImage) -> ImageBuffer<Luma<Self>, Vec<Self>>;
}

impl GrayPixel for u8 {
    const FORMAT: PixelFormat = PixelFormat::Luma8;

    fn convert(image: &DynamicImage) -> ImageBuffer<Luma<Self>, Vec<Self>> {
        image.to_luma8()
    }
}

impl GrayPixel for f32 {
    const FORMAT: PixelFormat = PixelFormat::Luma32F;

    fn convert(image: &DynamicImage) -> ImageBuffer<Luma<Self>, Vec<Self>> {
        image.to_luma32f()
    }
}

/// Image interop.
impl<T: GrayPixel> Matrix<T> {
    /// Returns the [`PixelFormat`] used when converting this matrix to an image.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        T::FORMAT
    }

    /// Creates a matrix holding the pixel values of a grayscale image buffer.
    ///
    /// Returns [`Error::InvalidShape`] if the image has a width or height of zero.
    pub fn from_luma(image: &ImageBuffer<Luma<T>, Vec<T>>) -> Result<Self> {
        let (width, height) = image.dimensions();
        let (rows, cols) = (height as usize, width as usize);
        let len = Self::check_shape(rows, cols)?;
        // The container may be longer than the image itself.
        Self::from_row_major(rows, cols, image.as_raw()[..len].to_vec())
    }

    /// Converts `image` to grayscale with element type `T`, and copies it into a matrix.
    ///
    /// For `f32` matrices, pixel values are in range `0.0..=1.0`.
    pub fn from_image(image: &DynamicImage) -> Result<Self> {
        Self::from_luma(&T::convert(image))
    }

    /// Copies the matrix into a grayscale image buffer of matching dimensions.
    ///
    /// Returns [`Error::InvalidShape`] if a dimension exceeds [`u32::MAX`].
    pub fn to_luma(&self) -> Result<ImageBuffer<Luma<T>, Vec<T>>> {
        let (width, height) = self.image_dimensions()?;
        Ok(ImageBuffer::from_fn(width, height, |x, y| {
            Luma([self[(y as usize, x as usize)]])
        }))
    }

    fn image_dimensions(&self) -> Result<(u32, u32)> {
        let invalid = || Error::InvalidShape {
            rows: self.nrows(),
            cols: self.ncols(),
        };
        let width = u32::try_from(self.ncols()).map_err(|_| invalid())?;
        let height = u32::try_from(self.nrows()).map_err(|_| invalid())?;
        Ok((width, height))
    }

    /// Loads an image from the filesystem and converts it to a grayscale matrix.
    ///
    /// The image format is determined from the file extension.
    pub fn load<A: AsRef<Path>>(path: A) -> anyhow::Result<Self> {
        Self::load_impl(path.as_ref())
    }

    fn load_impl(path: &Path) -> anyhow::Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to load image from '{}'", path.display()))?;
        log::trace!(
            "loaded {}x{} image from '{}'",
            image.width(),
            image.height(),
            path.display()
        );
        Ok(Self::from_image(&image)?)
    }
}

impl Matrix<f32> {
    /// Quantizes the matrix into an 8-bit grayscale image.
    ///
    /// Elements are clamped to `0.0..=1.0` first, `NaN` becomes black.
    pub fn to_luma8(&self) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
        self.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .to_luma()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use image::{GrayImage, Rgb, RgbImage};

    use super::*;

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([(x * 16 + y) as u8]))
    }

    #[test]
    fn pixel_format() {
        assert_eq!(PixelFormat::Luma8.bytes_per_row(10), 10);
        assert_eq!(PixelFormat::Luma32F.bytes_per_row(10), 40);
        assert_eq!(<u8 as GrayPixel>::FORMAT, PixelFormat::Luma8);
        assert_eq!(
            Matrix::<f32>::zeros(1, 1).unwrap().pixel_format(),
            PixelFormat::Luma32F
        );
    }

    #[test]
    fn dimensions() {
        let img = gradient(5, 3);
        let mat = Matrix::from_luma(&img).unwrap();
        assert_eq!(mat.shape(), (3, 5));
        assert_eq!(mat[(2, 4)], img.get_pixel(4, 2).0[0]);

        let back = mat.to_luma().unwrap();
        assert_eq!(back.dimensions(), (5, 3));
        assert_eq!(back, img);
    }

    #[test]
    fn oversized_container() {
        let img = GrayImage::from_raw(2, 2, vec![1, 2, 3, 4, 5]).unwrap();
        let mat = Matrix::from_luma(&img).unwrap();
        assert_eq!(mat, Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap());
    }

    #[test]
    fn empty_image() {
        let img = GrayImage::new(0, 4);
        assert_eq!(
            Matrix::from_luma(&img).unwrap_err(),
            Error::InvalidShape { rows: 4, cols: 0 }
        );
    }

    #[test]
    fn float_round_trip() {
        let img = DynamicImage::ImageLuma8(gradient(8, 8));
        let mat = Matrix::<f32>::from_image(&img).unwrap();
        assert!(mat.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_abs_diff_eq!(mat[(0, 1)], 16.0 / 255.0, epsilon = 1e-6);

        let quantized = mat.to_luma8().unwrap();
        assert_eq!(&quantized, img.as_luma8().unwrap());
    }

    #[test]
    fn color_is_converted() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])));
        let mat = Matrix::<u8>::from_image(&img).unwrap();
        assert_eq!(mat, Matrix::filled(2, 2, 255).unwrap());
    }

    #[test]
    fn quantization_clamps() {
        let mat = Matrix::from_rows(&[[-1.0f32, 0.5, 2.0, f32::NAN]]).unwrap();
        let img = mat.to_luma8().unwrap();
        assert_eq!(img.as_raw(), &vec![0, 128, 255, 0]);
    }
}
