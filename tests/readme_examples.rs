//! Validates the code examples from README.md compile and behave correctly.

#[test]
fn readme_filters() {
    use pixops::{PixelBuffer, brightness, sepia};

    let mut fb = PixelBuffer::from_vec(2, 1, vec![100, 150, 200, 255, 10, 20, 30, 128]).unwrap();
    brightness(&mut fb, 0.5);
    assert_eq!(fb.pixels(), &[50, 75, 100, 255, 5, 10, 15, 128]);

    sepia(&mut fb, 1.0);
    assert_eq!(fb.pixel(1, 0).unwrap()[3], 128);
}

#[test]
fn readme_explicit_path() {
    use pixops::{ExecutionPath, Filter, PixelBuffer};

    let mut a = PixelBuffer::from_vec(1, 1, vec![12, 34, 56, 78]).unwrap();
    let mut b = a.clone();
    Filter::Saturate.apply_on(ExecutionPath::Accelerated, &mut a, 1.5);
    Filter::Saturate.apply_on(ExecutionPath::ScalarBe, &mut b, 1.5);
    assert_eq!(a, b);
}

#[test]
fn readme_geometry() {
    use pixops::{AffineMatrix, PixelBuffer, resize_nearest, rotate, warp_affine};

    let fb = PixelBuffer::new(64, 32);
    let turned = rotate(&fb, 90.0, true);
    assert_eq!((turned.width(), turned.height()), (32, 64));

    let half = resize_nearest(&fb, 32, 16);
    assert_eq!(half.pixels().len(), 32 * 16 * 4);

    let m = AffineMatrix::compose([AffineMatrix::rotate(15.0), AffineMatrix::uniform_scale(0.5)]);
    let warped = warp_affine(&fb, m, true).unwrap();
    assert!(warped.width() < 64);
}

#[cfg(feature = "rgb")]
#[test]
fn readme_typed_rgb() {
    use pixops::PixelBuffer;
    use rgb::Rgba;

    let fb = PixelBuffer::from_rgba(10, 10, vec![Rgba::new(255, 0, 128, 255); 100]).unwrap();
    assert_eq!(fb.as_rgba()[99], Rgba::new(255, 0, 128, 255));
}

#[cfg(feature = "imgref")]
#[test]
fn readme_imgref() {
    use imgref::ImgVec;
    use pixops::PixelBuffer;
    use rgb::Rgba;

    let img = ImgVec::new(vec![Rgba::new(255u8, 0, 128, 200); 640 * 480], 640, 480);
    let fb = PixelBuffer::from_img(img.as_ref());
    assert_eq!(fb.as_img().width(), 640);
    assert_eq!(fb.into_img().height(), 480);
}
