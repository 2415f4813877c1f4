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
    convert_bgra_to_yuv420, convert_yuv420_to_bgra, simd_supported, Algorithm, BgraImage,
    BgraView, Yuv420Frame, BGRA_BPP,
};

use itertools::iproduct;
use paste::paste;
use rand::Rng;
use std::convert::TryFrom;
use yuv420_primitives as yuv;

const MAX_PAD: usize = 3;

fn skip(algorithm: Algorithm) -> bool {
    algorithm == Algorithm::Simd && !simd_supported()
}

fn random_bgra(width: u32, height: u32, pad: usize) -> (usize, Vec<u8>) {
    let stride = BGRA_BPP * width as usize + pad;
    let mut data = vec![0_u8; stride * height as usize];
    rand::thread_rng().fill(data.as_mut_slice());
    (stride, data)
}

fn solid_bgra(width: u32, height: u32, blue: u8, green: u8, red: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(BGRA_BPP * (width * height) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&[blue, green, red, 0]);
    }
    data
}

fn convert_packed(width: u32, height: u32, data: &[u8], algorithm: Algorithm) -> Yuv420Frame {
    let view = BgraView {
        width,
        height,
        stride: BGRA_BPP * width as usize,
        data,
    };
    convert_bgra_to_yuv420(&view, algorithm).unwrap()
}

fn assert_plane_close(expected: &[u8], actual: &[u8], tolerance: i32, plane: &str) {
    assert_eq!(expected.len(), actual.len());
    for (i, (&e, &a)) in expected.iter().zip(actual).enumerate() {
        let delta = (i32::from(e) - i32::from(a)).abs();
        assert!(
            delta <= tolerance,
            "{}[{}]: {} vs {} exceeds tolerance {}",
            plane,
            i,
            e,
            a,
            tolerance
        );
    }
}

fn white_block(algorithm: Algorithm) {
    if skip(algorithm) {
        return;
    }

    let data = solid_bgra(2, 2, 255, 255, 255);
    let frame = convert_packed(2, 2, &data, algorithm);

    for &luma in frame.y() {
        assert!((i32::from(luma) - 235).abs() <= 1);
    }
    assert_eq!(frame.u().len(), 1);
    assert_eq!(frame.v().len(), 1);
    assert!((i32::from(frame.u()[0]) - 128).abs() <= 1);
    assert!((i32::from(frame.v()[0]) - 128).abs() <= 1);

    let image = convert_yuv420_to_bgra(&frame.as_view(), algorithm).unwrap();
    for pixel in image.data().chunks_exact(BGRA_BPP) {
        for &channel in &pixel[..3] {
            assert!((i32::from(channel) - 255).abs() <= 2);
        }
        assert_eq!(pixel[3], 255);
    }
}

fn solid_color_roundtrip(algorithm: Algorithm) {
    if skip(algorithm) {
        return;
    }

    const COLORS: [[u8; 3]; 6] = [
        [0, 0, 0],
        [255, 255, 255],
        [0, 0, 255],
        [0, 255, 0],
        [255, 0, 0],
        [128, 128, 128],
    ];

    const WIDTH: u32 = 8;
    const HEIGHT: u32 = 6;

    for [blue, green, red] in COLORS {
        let data = solid_bgra(WIDTH, HEIGHT, blue, green, red);
        let frame = convert_packed(WIDTH, HEIGHT, &data, algorithm);
        let image = convert_yuv420_to_bgra(&frame.as_view(), algorithm).unwrap();

        for pixel in image.data().chunks_exact(BGRA_BPP) {
            assert!((i32::from(pixel[0]) - i32::from(blue)).abs() <= 2);
            assert!((i32::from(pixel[1]) - i32::from(green)).abs() <= 2);
            assert!((i32::from(pixel[2]) - i32::from(red)).abs() <= 2);
            assert_eq!(pixel[3], 255);
        }
    }
}

fn gray_ramp_roundtrip(algorithm: Algorithm) {
    if skip(algorithm) {
        return;
    }

    const WIDTH: u32 = 64;
    const HEIGHT: u32 = 64;

    let mut data = Vec::with_capacity(BGRA_BPP * (WIDTH * HEIGHT) as usize);
    for i in 0..WIDTH * HEIGHT {
        let gray = u8::try_from(i % 256).unwrap();
        data.extend_from_slice(&[gray, gray, gray, 0]);
    }

    let frame = convert_packed(WIDTH, HEIGHT, &data, algorithm);
    let image = convert_yuv420_to_bgra(&frame.as_view(), algorithm).unwrap();

    for (src, dst) in data
        .chunks_exact(BGRA_BPP)
        .zip(image.data().chunks_exact(BGRA_BPP))
    {
        // Gray input carries no chroma, so the round trip only exercises
        // the luma quantization.
        for channel in 0..3 {
            assert!((i32::from(src[channel]) - i32::from(dst[channel])).abs() <= 2);
        }
        assert_eq!(dst[3], 255);
    }
}

fn strided_matches_packed(algorithm: Algorithm) {
    if skip(algorithm) {
        return;
    }

    const WIDTH: u32 = 10;
    const HEIGHT: u32 = 4;

    for pad in 1..=MAX_PAD {
        let (stride, data) = random_bgra(WIDTH, HEIGHT, pad);

        let mut packed = Vec::with_capacity(BGRA_BPP * (WIDTH * HEIGHT) as usize);
        for line in data.chunks_exact(stride) {
            packed.extend_from_slice(&line[..BGRA_BPP * WIDTH as usize]);
        }

        let strided_view = BgraView {
            width: WIDTH,
            height: HEIGHT,
            stride,
            data: &data,
        };
        let from_strided = convert_bgra_to_yuv420(&strided_view, algorithm).unwrap();
        let from_packed = convert_packed(WIDTH, HEIGHT, &packed, algorithm);

        assert_eq!(from_strided.y(), from_packed.y());
        assert_eq!(from_strided.u(), from_packed.u());
        assert_eq!(from_strided.v(), from_packed.v());
    }
}

fn size_grid(algorithm: Algorithm) {
    if skip(algorithm) {
        return;
    }

    for (width, height, pad) in iproduct!(1..=8_u32, 1..=4_u32, 0..MAX_PAD) {
        let (width, height) = (2 * width, 2 * height);
        let (stride, data) = random_bgra(width, height, pad);
        let view = BgraView {
            width,
            height,
            stride,
            data: &data,
        };

        let frame = convert_bgra_to_yuv420(&view, algorithm).unwrap();
        assert_eq!(frame.y().len(), (width * height) as usize);
        assert_eq!(frame.u().len(), ((width / 2) * (height / 2)) as usize);
        assert_eq!(frame.v().len(), frame.u().len());

        let image = convert_yuv420_to_bgra(&frame.as_view(), algorithm).unwrap();
        assert_eq!(image.width(), width);
        assert_eq!(image.height(), height);
        assert_eq!(image.data().len(), BGRA_BPP * (width * height) as usize);
    }
}

fn owned_image_roundtrip(algorithm: Algorithm) {
    if skip(algorithm) {
        return;
    }

    const WIDTH: u32 = 16;
    const HEIGHT: u32 = 8;

    let (stride, data) = random_bgra(WIDTH, HEIGHT, 2);
    let image = BgraImage::from_vec(WIDTH, HEIGHT, stride, data).unwrap();

    let frame = convert_bgra_to_yuv420(&image.as_view(), algorithm).unwrap();
    let back = convert_yuv420_to_bgra(&frame.as_view(), algorithm).unwrap();
    assert_eq!(back.stride(), BGRA_BPP * WIDTH as usize);
    assert_eq!(back.into_vec().len(), BGRA_BPP * (WIDTH * HEIGHT) as usize);
}

macro_rules! algorithm_tests {
    ($algorithm:ident) => {
        paste! {
            #[test]
            fn [<white_block_ $algorithm:lower>]() {
                white_block(Algorithm::$algorithm);
            }

            #[test]
            fn [<solid_color_roundtrip_ $algorithm:lower>]() {
                solid_color_roundtrip(Algorithm::$algorithm);
            }

            #[test]
            fn [<gray_ramp_roundtrip_ $algorithm:lower>]() {
                gray_ramp_roundtrip(Algorithm::$algorithm);
            }

            #[test]
            fn [<strided_matches_packed_ $algorithm:lower>]() {
                strided_matches_packed(Algorithm::$algorithm);
            }

            #[test]
            fn [<size_grid_ $algorithm:lower>]() {
                size_grid(Algorithm::$algorithm);
            }

            #[test]
            fn [<owned_image_roundtrip_ $algorithm:lower>]() {
                owned_image_roundtrip(Algorithm::$algorithm);
            }
        }
    };
}

algorithm_tests!(Scalar);
algorithm_tests!(Simd);

#[test]
fn narrow_rows_scalar_simd_equivalence() {
    if !simd_supported() {
        return;
    }

    // Widths below the vector lane count leave every row to the partial
    // load and store paths, with luma rows starting at odd offsets and
    // chroma strides of 3, 5 and 7 bytes.
    const SIZES: [(u32, u32); 4] = [(6, 2), (6, 4), (10, 2), (14, 6)];

    for &(width, height) in &SIZES {
        for pad in 0..MAX_PAD {
            let (stride, data) = random_bgra(width, height, pad);
            let view = BgraView {
                width,
                height,
                stride,
                data: &data,
            };

            let scalar = convert_bgra_to_yuv420(&view, Algorithm::Scalar).unwrap();
            let simd = convert_bgra_to_yuv420(&view, Algorithm::Simd).unwrap();
            assert_plane_close(scalar.y(), simd.y(), 2, "y");
            assert_plane_close(scalar.u(), simd.u(), 2, "u");
            assert_plane_close(scalar.v(), simd.v(), 2, "v");

            let scalar_back = convert_yuv420_to_bgra(&scalar.as_view(), Algorithm::Scalar).unwrap();
            let simd_back = convert_yuv420_to_bgra(&scalar.as_view(), Algorithm::Simd).unwrap();
            assert_plane_close(scalar_back.data(), simd_back.data(), 2, "bgra");
        }
    }
}

#[test]
fn scalar_simd_equivalence() {
    if !simd_supported() {
        return;
    }

    // Sizes around the vector widths, so both the main loops and the
    // scalar row tails are exercised.
    const SIZES: [(u32, u32); 6] = [(2, 2), (6, 4), (10, 6), (16, 8), (34, 2), (64, 64)];

    for &(width, height) in &SIZES {
        for pad in 0..MAX_PAD {
            let (stride, data) = random_bgra(width, height, pad);
            let view = BgraView {
                width,
                height,
                stride,
                data: &data,
            };

            let scalar = convert_bgra_to_yuv420(&view, Algorithm::Scalar).unwrap();
            let simd = convert_bgra_to_yuv420(&view, Algorithm::Simd).unwrap();
            assert_plane_close(scalar.y(), simd.y(), 2, "y");
            assert_plane_close(scalar.u(), simd.u(), 2, "u");
            assert_plane_close(scalar.v(), simd.v(), 2, "v");

            let scalar_back = convert_yuv420_to_bgra(&scalar.as_view(), Algorithm::Scalar).unwrap();
            let simd_back = convert_yuv420_to_bgra(&scalar.as_view(), Algorithm::Simd).unwrap();
            assert_plane_close(scalar_back.data(), simd_back.data(), 2, "bgra");
        }
    }
}
