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
use crate::ErrorKind;

/// Number of bytes per BGRA pixel.
pub const BGRA_BPP: usize = 4;

/// A borrowed view over an interleaved BGRA raster.
///
/// Each pixel takes 4 bytes, in B,G,R,A byte order, rows separated by
/// `stride` bytes. The stride may exceed `4 * width` to accommodate padding.
pub struct BgraView<'a> {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Distance in bytes between starts of consecutive lines
    pub stride: usize,
    /// Pixel data, at least `stride * height` bytes
    pub data: &'a [u8],
}

/// A borrowed view over a planar YUV 4:2:0 (I420) frame.
///
/// The Y plane holds one byte per pixel; the U and V planes hold one byte
/// per 2x2 pixel block.
pub struct Yuv420View<'a> {
    /// Width of the frame in pixels
    pub width: u32,
    /// Height of the frame in pixels
    pub height: u32,
    /// Luma plane, at least `y_stride * height` bytes
    pub y: &'a [u8],
    /// Blue-difference chroma plane, at least `u_stride * height / 2` bytes
    pub u: &'a [u8],
    /// Red-difference chroma plane, at least `v_stride * height / 2` bytes
    pub v: &'a [u8],
    /// Distance in bytes between starts of consecutive luma lines
    pub y_stride: usize,
    /// Distance in bytes between starts of consecutive U lines
    pub u_stride: usize,
    /// Distance in bytes between starts of consecutive V lines
    pub v_stride: usize,
}

/// An owned, tightly packed BGRA raster.
pub struct BgraImage {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl BgraImage {
    /// Wraps caller-provided pixel data into an owned image.
    ///
    /// # Errors
    ///
    /// * [`InvalidGeometry`] if `width` or `height` is zero or odd, or if
    ///   `stride` is smaller than `4 * width`
    /// * [`NotEnoughData`] if `data` is shorter than `stride * height`
    ///
    /// [`InvalidGeometry`]: ../enum.ErrorKind.html#variant.InvalidGeometry
    /// [`NotEnoughData`]: ../enum.ErrorKind.html#variant.NotEnoughData
    pub fn from_vec(
        width: u32,
        height: u32,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, ErrorKind> {
        validate_geometry(width, height)?;
        if stride < BGRA_BPP * width as usize {
            return Err(ErrorKind::InvalidGeometry);
        }
        if data.len() < stride * height as usize {
            return Err(ErrorKind::NotEnoughData);
        }

        Ok(BgraImage {
            width,
            height,
            stride,
            data,
        })
    }

    // Geometry must have been validated by the caller.
    pub(crate) fn packed(width: u32, height: u32) -> Self {
        let stride = BGRA_BPP * width as usize;
        BgraImage {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    /// Width of the image in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the image in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Distance in bytes between starts of consecutive lines
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel data, `stride * height` bytes or more
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns the backing pixel data
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Borrows the image as a conversion source
    pub fn as_view(&self) -> BgraView<'_> {
        BgraView {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: &self.data,
        }
    }
}

/// An owned, tightly packed planar YUV 4:2:0 frame.
pub struct Yuv420Frame {
    width: u32,
    height: u32,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
}

impl Yuv420Frame {
    // Geometry must have been validated by the caller.
    pub(crate) fn packed(width: u32, height: u32) -> Self {
        let (w, h) = (width as usize, height as usize);
        Yuv420Frame {
            width,
            height,
            y: vec![0; w * h],
            u: vec![0; (w / 2) * (h / 2)],
            v: vec![0; (w / 2) * (h / 2)],
        }
    }

    /// Width of the frame in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the frame in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luma plane, one byte per pixel
    pub fn y(&self) -> &[u8] {
        &self.y
    }

    /// Blue-difference chroma plane, one byte per 2x2 block
    pub fn u(&self) -> &[u8] {
        &self.u
    }

    /// Red-difference chroma plane, one byte per 2x2 block
    pub fn v(&self) -> &[u8] {
        &self.v
    }

    /// Distance in bytes between starts of consecutive luma lines
    pub fn y_stride(&self) -> usize {
        self.width as usize
    }

    /// Distance in bytes between starts of consecutive chroma lines
    pub fn chroma_stride(&self) -> usize {
        (self.width / 2) as usize
    }

    /// Borrows the frame as a conversion source
    pub fn as_view(&self) -> Yuv420View<'_> {
        Yuv420View {
            width: self.width,
            height: self.height,
            y: &self.y,
            u: &self.u,
            v: &self.v,
            y_stride: self.y_stride(),
            u_stride: self.chroma_stride(),
            v_stride: self.chroma_stride(),
        }
    }

    pub(crate) fn planes_mut(&mut self) -> (&mut [u8], &mut [u8], &mut [u8]) {
        (&mut self.y, &mut self.u, &mut self.v)
    }
}

/// Checks the common geometry preconditions of both conversion directions.
///
/// 4:2:0 subsampling requires whole 2x2 blocks, so zero or odd dimensions
/// are rejected rather than truncated.
///
/// # Errors
///
/// * [`InvalidGeometry`] if `width` or `height` is zero or odd
///
/// [`InvalidGeometry`]: ../enum.ErrorKind.html#variant.InvalidGeometry
pub fn validate_geometry(width: u32, height: u32) -> Result<(), ErrorKind> {
    if width == 0 || height == 0 || (width & 1) != 0 || (height & 1) != 0 {
        return Err(ErrorKind::InvalidGeometry);
    }

    Ok(())
}

/// Computes the number of bytes required for each plane of a tightly packed
/// YUV 4:2:0 frame, in Y, U, V order.
///
/// # Errors
///
/// * [`InvalidGeometry`] if `width` or `height` is zero or odd
///
/// [`InvalidGeometry`]: ../enum.ErrorKind.html#variant.InvalidGeometry
pub fn yuv420_buffers_size(width: u32, height: u32) -> Result<[usize; 3], ErrorKind> {
    validate_geometry(width, height)?;
    let luma = (width as usize) * (height as usize);
    Ok([luma, luma / 4, luma / 4])
}

/// Computes the number of bytes required for a tightly packed BGRA raster.
///
/// # Errors
///
/// * [`InvalidGeometry`] if `width` or `height` is zero or odd
///
/// [`InvalidGeometry`]: ../enum.ErrorKind.html#variant.InvalidGeometry
pub fn bgra_buffer_size(width: u32, height: u32) -> Result<usize, ErrorKind> {
    validate_geometry(width, height)?;
    Ok(BGRA_BPP * (width as usize) * (height as usize))
}

pub(crate) fn validate_bgra_view(src: &BgraView<'_>) -> Result<(), ErrorKind> {
    validate_geometry(src.width, src.height)?;
    if src.stride < BGRA_BPP * src.width as usize {
        return Err(ErrorKind::InvalidGeometry);
    }
    if src.data.len() < src.stride * src.height as usize {
        return Err(ErrorKind::NotEnoughData);
    }

    Ok(())
}

pub(crate) fn validate_yuv420_view(src: &Yuv420View<'_>) -> Result<(), ErrorKind> {
    validate_geometry(src.width, src.height)?;
    let (w, h) = (src.width as usize, src.height as usize);
    if src.y_stride < w || src.u_stride < w / 2 || src.v_stride < w / 2 {
        return Err(ErrorKind::InvalidGeometry);
    }
    if src.y.len() < src.y_stride * h
        || src.u.len() < src.u_stride * (h / 2)
        || src.v.len() < src.v_stride * (h / 2)
    {
        return Err(ErrorKind::NotEnoughData);
    }

    Ok(())
}
