use approx::{assert_abs_diff_eq, assert_relative_eq};
use image::{DynamicImage, GrayImage, Luma};
use minigrad::{kernel, Error, Matrix, Orientation, Vector};

#[test]
fn product_scenario() {
    let a = Matrix::from_rows(&[[1.0f32, 2.0], [3.0, 4.0]]).unwrap();
    let b = Matrix::from_rows(&[[5.0f32, 6.0], [7.0, 8.0]]).unwrap();
    assert_eq!(
        &a * &b,
        Matrix::from_rows(&[[19.0, 22.0], [43.0, 50.0]]).unwrap()
    );
    assert_eq!(
        a.multiply(&Matrix::zeros(3, 2).unwrap()).unwrap_err(),
        Error::DimensionMismatch {
            left: (2, 2),
            right: (3, 2)
        }
    );
}

#[test]
fn dot_scenario() {
    let v1 = Vector::new(vec![-1.0f32, 2.0, 2.0]);
    let v2 = Vector::new(vec![1.0f32, 0.0, -3.0]);
    assert_eq!(v1.orientation(), Orientation::Column);

    assert_eq!(v1.transpose().dot(&v2).unwrap(), -7.0);
    let fast = v1
        .transpose()
        .dot_with(&v2, kernel::default_kernel())
        .unwrap();
    assert_relative_eq!(fast, -7.0, epsilon = 1e-3);
}

#[test]
fn inner_product_of_matrix_rows() {
    let m = Matrix::from_rows(&[[1, 2], [3, 4], [5, 6]]).unwrap();
    let row = m.row(1).unwrap();
    let col = m.row(0).unwrap().transpose();
    assert_eq!(col.orientation(), Orientation::Column);
    assert_eq!(row.dot(&col).unwrap(), 3 * 1 + 4 * 2);
    assert!(col.dot(&row).is_err());
}

#[test]
fn default_kernel_is_available() {
    let kernel = kernel::default_kernel();
    assert!(kernel.kind().is_available());
}

#[test]
fn unavailable_kernels_are_reported() {
    for kind in kernel::KernelKind::ALL {
        if !kind.is_available() {
            let err = kernel::get(kind).unwrap_err();
            assert_eq!(err, Error::KernelUnavailable(kind));
            assert!(err.to_string().contains(kind.name()));
        }
    }
}

/// A smooth synthetic "photo" with a bit of texture.
fn test_image(width: u32, height: u32) -> DynamicImage {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let fx = x as f32 / width as f32;
        let fy = y as f32 / height as f32;
        let v = 0.5 + 0.3 * (fx * 6.0).sin() * (fy * 4.0).cos() + 0.1 * ((x ^ y) & 1) as f32;
        Luma([(v.clamp(0.0, 1.0) * 255.0) as u8])
    });
    DynamicImage::ImageLuma8(img)
}

#[test]
fn svd_of_image() {
    let img = test_image(48, 32);
    let a = Matrix::<f32>::from_image(&img).unwrap();
    assert_eq!(a.shape(), (32, 48));

    let svd = a.svd().unwrap();
    assert_eq!(svd.u.shape(), (32, 32));
    assert_eq!(svd.sigma.shape(), (32, 48));
    assert_eq!(svd.vt.shape(), (48, 48));

    let reconstructed = svd.reconstruct().unwrap();
    assert_relative_eq!(reconstructed, a, epsilon = 1e-3, max_relative = 1e-2);

    // More singular values never make the approximation worse.
    let error = |k: usize| {
        svd.low_rank(k)
            .unwrap()
            .try_sub(&a)
            .unwrap()
            .as_slice()
            .iter()
            .map(|d| d * d)
            .sum::<f32>()
    };
    let errors: Vec<f32> = [1, 2, 4, 8, 16, 32].into_iter().map(error).collect();
    for pair in errors.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-3, "{errors:?}");
    }
    assert!(errors[5] < 1e-3);
}

#[test]
fn image_round_trip() {
    let img = test_image(20, 10);
    let bytes = Matrix::<u8>::from_image(&img).unwrap();
    assert_eq!(&bytes.to_luma().unwrap(), img.as_luma8().unwrap());

    let floats = bytes.to_f32().scale(1.0 / 255.0);
    assert_abs_diff_eq!(
        floats,
        Matrix::<f32>::from_image(&img).unwrap(),
        epsilon = 1e-6
    );
    assert_eq!(floats.to_luma8().unwrap(), bytes.to_luma().unwrap());
}
