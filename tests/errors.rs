#![warn(unused)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

use yuv::{
    bgra_buffer_size, convert_bgra_to_yuv420, convert_yuv420_to_bgra, simd_supported,
    validate_geometry, yuv420_buffers_size, Algorithm, BgraImage, BgraView, ErrorKind,
    Yuv420View, BGRA_BPP,
};

use itertools::iproduct;
use yuv420_primitives as yuv;

const ALGORITHMS: [Algorithm; 2] = [Algorithm::Scalar, Algorithm::Simd];

fn bgra_view(width: u32, height: u32, stride: usize, data: &[u8]) -> BgraView<'_> {
    BgraView {
        width,
        height,
        stride,
        data,
    }
}

fn yuv420_view<'a>(
    width: u32,
    height: u32,
    y: &'a [u8],
    u: &'a [u8],
    v: &'a [u8],
) -> Yuv420View<'a> {
    Yuv420View {
        width,
        height,
        y,
        u,
        v,
        y_stride: width as usize,
        u_stride: (width / 2) as usize,
        v_stride: (width / 2) as usize,
    }
}

#[test]
fn geometry_helpers() {
    assert_eq!(validate_geometry(2, 2), Ok(()));
    assert_eq!(validate_geometry(640, 480), Ok(()));

    for (width, height) in [(0, 2), (2, 0), (1, 2), (2, 1), (3, 3), (0, 0)] {
        assert_eq!(validate_geometry(width, height), Err(ErrorKind::InvalidGeometry));
        assert_eq!(
            yuv420_buffers_size(width, height),
            Err(ErrorKind::InvalidGeometry)
        );
        assert_eq!(bgra_buffer_size(width, height), Err(ErrorKind::InvalidGeometry));
    }

    assert_eq!(yuv420_buffers_size(4, 2), Ok([8, 2, 2]));
    assert_eq!(bgra_buffer_size(4, 2), Ok(32));
}

#[test]
fn odd_or_zero_dimensions_are_rejected() {
    let data = vec![0_u8; 1024];

    // Geometry is validated before dispatch, for every algorithm.
    for (algorithm, (width, height)) in
        iproduct!(ALGORITHMS, [(0, 2), (2, 0), (3, 2), (2, 3), (5, 5)])
    {
        let src = bgra_view(width, height, BGRA_BPP * width as usize, &data);
        assert_eq!(
            convert_bgra_to_yuv420(&src, algorithm).err(),
            Some(ErrorKind::InvalidGeometry)
        );

        let src = yuv420_view(width, height, &data, &data, &data);
        assert_eq!(
            convert_yuv420_to_bgra(&src, algorithm).err(),
            Some(ErrorKind::InvalidGeometry)
        );
    }
}

#[test]
fn undersized_strides_are_rejected() {
    let data = vec![0_u8; 1024];

    for algorithm in ALGORITHMS {
        let src = bgra_view(4, 4, BGRA_BPP * 4 - 1, &data);
        assert_eq!(
            convert_bgra_to_yuv420(&src, algorithm).err(),
            Some(ErrorKind::InvalidGeometry)
        );

        let mut src = yuv420_view(4, 4, &data, &data, &data);
        src.y_stride = 3;
        assert_eq!(
            convert_yuv420_to_bgra(&src, algorithm).err(),
            Some(ErrorKind::InvalidGeometry)
        );

        let mut src = yuv420_view(4, 4, &data, &data, &data);
        src.u_stride = 1;
        assert_eq!(
            convert_yuv420_to_bgra(&src, algorithm).err(),
            Some(ErrorKind::InvalidGeometry)
        );
    }
}

#[test]
fn undersized_buffers_are_rejected() {
    for algorithm in ALGORITHMS {
        let short = vec![0_u8; BGRA_BPP * 4 * 4 - 1];
        let src = bgra_view(4, 4, BGRA_BPP * 4, &short);
        assert_eq!(
            convert_bgra_to_yuv420(&src, algorithm).err(),
            Some(ErrorKind::NotEnoughData)
        );

        let y = vec![0_u8; 16];
        let full = vec![0_u8; 4];
        let short = vec![0_u8; 3];
        let src = yuv420_view(4, 4, &y, &short, &full);
        assert_eq!(
            convert_yuv420_to_bgra(&src, algorithm).err(),
            Some(ErrorKind::NotEnoughData)
        );

        let src = yuv420_view(4, 4, &y, &full, &short);
        assert_eq!(
            convert_yuv420_to_bgra(&src, algorithm).err(),
            Some(ErrorKind::NotEnoughData)
        );

        let short_y = vec![0_u8; 15];
        let src = yuv420_view(4, 4, &short_y, &full, &full);
        assert_eq!(
            convert_yuv420_to_bgra(&src, algorithm).err(),
            Some(ErrorKind::NotEnoughData)
        );
    }
}

#[test]
fn simd_requires_hardware_support() {
    let data = vec![0_u8; BGRA_BPP * 4];
    let src = bgra_view(2, 2, BGRA_BPP * 2, &data);
    let result = convert_bgra_to_yuv420(&src, Algorithm::Simd);

    if simd_supported() {
        assert!(result.is_ok());
    } else {
        // Never a silent fallback to the scalar converters.
        assert_eq!(result.err(), Some(ErrorKind::UnsupportedAlgorithm));
    }
}

#[test]
fn owned_image_validation() {
    assert!(BgraImage::from_vec(4, 2, BGRA_BPP * 4, vec![0_u8; 32]).is_ok());
    assert_eq!(
        BgraImage::from_vec(3, 2, BGRA_BPP * 3, vec![0_u8; 24]).err(),
        Some(ErrorKind::InvalidGeometry)
    );
    assert_eq!(
        BgraImage::from_vec(4, 2, BGRA_BPP * 4 - 1, vec![0_u8; 32]).err(),
        Some(ErrorKind::InvalidGeometry)
    );
    assert_eq!(
        BgraImage::from_vec(4, 2, BGRA_BPP * 4, vec![0_u8; 31]).err(),
        Some(ErrorKind::NotEnoughData)
    );
}

#[test]
fn error_kind_display() {
    assert!(!ErrorKind::InvalidGeometry.to_string().is_empty());
    assert!(!ErrorKind::UnsupportedAlgorithm.to_string().is_empty());
    assert_eq!(ErrorKind::NotEnoughData.to_string(), "Not enough data provided");
}
