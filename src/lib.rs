// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::too_many_arguments, // API design
    clippy::missing_safety_doc, // Until we add them...
    clippy::similar_names, // This requires effort to ensure
    clippy::inline_always,
    // Yield false positives
    clippy::must_use_candidate,
)]

//! A library to convert raster images between interleaved BGRA and planar
//! YUV 4:2:0 (I420), using BT.601 studio-swing colorimetry.
//!
//! The scalar converters work on every architecture. On x86 and x86_64
//! processors with SSSE3, a vectorized code path producing bit-identical
//! results is selected through runtime feature detection.
//!
//! # Examples
//!
//! Convert a 2x2 BGRA image into a YUV 4:2:0 frame and back:
//! ```
//! use yuv420_primitives::{
//!     convert_bgra_to_yuv420, convert_yuv420_to_bgra, Algorithm, BgraView,
//! };
//! use std::error;
//!
//! fn main() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 2;
//!     const HEIGHT: u32 = 2;
//!
//!     let pixels = vec![255u8; 4 * (WIDTH * HEIGHT) as usize];
//!     let src = BgraView {
//!         width: WIDTH,
//!         height: HEIGHT,
//!         stride: 4 * WIDTH as usize,
//!         data: &pixels,
//!     };
//!
//!     let frame = convert_bgra_to_yuv420(&src, Algorithm::Scalar)?;
//!     assert_eq!(frame.y().len(), (WIDTH * HEIGHT) as usize);
//!
//!     let image = convert_yuv420_to_bgra(&frame.as_view(), Algorithm::Scalar)?;
//!     assert_eq!(image.data().len(), pixels.len());
//!     Ok(())
//! }
//! ```
//!
//! Time repeated conversions with the [`timing`] harness:
//! ```
//! use yuv420_primitives::timing::TimingHarness;
//! use yuv420_primitives::{Algorithm, BgraImage, Direction};
//! use std::error;
//!
//! fn main() -> Result<(), Box<dyn error::Error>> {
//!     let image = BgraImage::from_vec(16, 16, 64, vec![0u8; 64 * 16])?;
//!     let mut harness = TimingHarness::new(image)?;
//!
//!     harness.run_once(Direction::BgraToYuv420, Algorithm::Scalar)?;
//!     assert_eq!(harness.count(Direction::BgraToYuv420), 1);
//!     println!("{}", harness.report(Direction::BgraToYuv420));
//!     Ok(())
//! }
//! ```

use std::error;
use std::fmt;
use std::sync::OnceLock;

mod convert_image;
mod cpu_info;
mod dispatcher;
mod frame;
pub mod timing;

use cpu_info::{CpuManufacturer, InstructionSet};

pub use frame::{
    bgra_buffer_size, validate_geometry, yuv420_buffers_size, BgraImage, BgraView, Yuv420Frame,
    Yuv420View, BGRA_BPP,
};

/// An enumeration of errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Width or height is zero or odd, or a stride is smaller than one
    /// tightly packed row
    InvalidGeometry,
    /// The requested algorithm is not available on the running processor
    UnsupportedAlgorithm,
    /// Not enough data was provided to the called function. Typically, provided
    /// buffers are not correctly sized
    NotEnoughData,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidGeometry => write!(
                f,
                "Image dimensions are not positive and even, or a stride is too small"
            ),
            ErrorKind::UnsupportedAlgorithm => write!(
                f,
                "The requested algorithm is not supported by the running processor"
            ),
            ErrorKind::NotEnoughData => write!(f, "Not enough data provided"),
        }
    }
}

impl error::Error for ErrorKind {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

/// An enumeration of conversion code paths.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Portable scalar converters, available on every architecture
    Scalar,
    /// Vectorized converters, available when the processor supports SSSE3
    Simd,
}

/// An enumeration of conversion directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Interleaved BGRA to planar YUV 4:2:0
    BgraToYuv420,
    /// Planar YUV 4:2:0 to interleaved BGRA
    Yuv420ToBgra,
}

macro_rules! set_dispatch_table {
    ($table:expr, $algorithm:ident, $set:ident) => {
        $table[Algorithm::$algorithm as usize][Direction::BgraToYuv420 as usize] =
            Some(convert_image::$set::bgra_to_yuv420);
        $table[Algorithm::$algorithm as usize][Direction::Yuv420ToBgra as usize] =
            Some(convert_image::$set::yuv420_to_bgra);
    };
}

struct Context {
    manufacturer: CpuManufacturer,
    set: InstructionSet,
    converters: dispatcher::DispatchTable,
}

impl Context {
    pub fn global() -> &'static Context {
        static INSTANCE: OnceLock<Context> = OnceLock::new();
        INSTANCE.get_or_init(Context::new)
    }

    pub fn new() -> Self {
        let (manufacturer, set) = cpu_info::get();
        let mut converters = dispatcher::EMPTY_TABLE;

        set_dispatch_table!(converters, Scalar, scalar);

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        if let InstructionSet::Ssse3 = set {
            set_dispatch_table!(converters, Simd, ssse3);
        }

        Context {
            manufacturer,
            set,
            converters,
        }
    }
}

/// Returns a description of the algorithms that are best for the running cpu and
/// available instruction sets
///
/// # Examples
/// ```
/// use yuv420_primitives as yuv;
/// println!("{}", yuv::describe_acceleration());
/// // => {cpu-manufacturer:Intel,instruction-set:Ssse3}
/// ```
pub fn describe_acceleration() -> String {
    let state = Context::global();

    format!(
        "{{cpu-manufacturer:{:?},instruction-set:{:?}}}",
        state.manufacturer, state.set
    )
}

/// Returns true when the running processor supports the vectorized
/// converters, so that [`Algorithm::Simd`] requests will succeed.
pub fn simd_supported() -> bool {
    dispatcher::get_converter(
        &Context::global().converters,
        Algorithm::Simd,
        Direction::BgraToYuv420,
    )
    .is_some()
}

/// Converts an interleaved BGRA raster into a freshly allocated, tightly
/// packed planar YUV 4:2:0 frame.
///
/// The source is never mutated. Chroma is computed as the average of each
/// 2x2 pixel block; alpha is discarded.
///
/// # Errors
///
/// * [`ErrorKind::InvalidGeometry`] if the source dimensions are zero or
///   odd, or its stride is smaller than one tightly packed row
/// * [`ErrorKind::NotEnoughData`] if the source buffer is shorter than
///   `stride * height`
/// * [`ErrorKind::UnsupportedAlgorithm`] if `algorithm` is not available
///   on the running processor
pub fn convert_bgra_to_yuv420(
    src: &BgraView<'_>,
    algorithm: Algorithm,
) -> Result<Yuv420Frame, ErrorKind> {
    frame::validate_bgra_view(src)?;

    let converter = dispatcher::get_converter(
        &Context::global().converters,
        algorithm,
        Direction::BgraToYuv420,
    )
    .ok_or(ErrorKind::UnsupportedAlgorithm)?;

    let mut dst = Yuv420Frame::packed(src.width, src.height);
    let dst_strides = [dst.y_stride(), dst.chroma_stride(), dst.chroma_stride()];
    let (y_plane, u_plane, v_plane) = dst.planes_mut();

    if converter(
        src.width,
        src.height,
        &[src.stride],
        &[src.data],
        &dst_strides,
        &mut [y_plane, u_plane, v_plane],
    ) {
        Ok(dst)
    } else {
        Err(ErrorKind::NotEnoughData)
    }
}

/// Converts a planar YUV 4:2:0 frame into a freshly allocated, tightly
/// packed interleaved BGRA raster.
///
/// The source is never mutated. Every pixel of a 2x2 block receives the
/// chroma of that block; alpha is set to opaque.
///
/// # Errors
///
/// * [`ErrorKind::InvalidGeometry`] if the source dimensions are zero or
///   odd, or a plane stride is smaller than one tightly packed row
/// * [`ErrorKind::NotEnoughData`] if a source plane is shorter than its
///   stride times its line count
/// * [`ErrorKind::UnsupportedAlgorithm`] if `algorithm` is not available
///   on the running processor
pub fn convert_yuv420_to_bgra(
    src: &Yuv420View<'_>,
    algorithm: Algorithm,
) -> Result<BgraImage, ErrorKind> {
    frame::validate_yuv420_view(src)?;

    let converter = dispatcher::get_converter(
        &Context::global().converters,
        algorithm,
        Direction::Yuv420ToBgra,
    )
    .ok_or(ErrorKind::UnsupportedAlgorithm)?;

    let mut dst = BgraImage::packed(src.width, src.height);
    let dst_strides = [dst.stride()];

    if converter(
        src.width,
        src.height,
        &[src.y_stride, src.u_stride, src.v_stride],
        &[src.y, src.u, src.v],
        &dst_strides,
        &mut [dst.data_mut()],
    ) {
        Ok(dst)
    } else {
        Err(ErrorKind::NotEnoughData)
    }
}
