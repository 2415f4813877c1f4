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

use crate::convert_image::common::*;

const DEPTH: usize = 4;

/// Deinterleave a BGRA pixel into 3 int, alpha is discarded
unsafe fn unpack_ui8x3_i32(image: *const u8) -> (i32, i32, i32) {
    (
        i32::from(*image.add(2)),
        i32::from(*image.add(1)),
        i32::from(*image),
    )
}

/// Deinterleave 2 uchar samples into 2 deinterleaved int
unsafe fn unpack_ui8x2_i32(image: *const u8) -> (i32, i32) {
    (i32::from(*image), i32::from(*image.add(1)))
}

/// Truncate and interleave 2 int to 2 uchar
unsafe fn pack_i32x2(image: *mut u8, x: i32, y: i32) {
    *image = x as u8;
    *image.add(1) = y as u8;
}

/// Truncate and interleave 3 int into a dword
/// Last component is set to DEFAULT_ALPHA
unsafe fn pack_ui8x3(image: *mut u8, x: u8, y: u8, z: u8) {
    *image = x;
    *image.add(1) = y;
    *image.add(2) = z;
    *image.add(3) = DEFAULT_ALPHA;
}

/// Converts a range of 2x2 blocks on one block row from BGRA to YUV 4:2:0.
///
/// Luma is computed per pixel; chroma is the average of the four pixels in
/// the block, with the rounding bias widened to match the summed samples.
/// Also the tail converter for vectorized code paths.
#[inline(always)]
pub(crate) unsafe fn convert_blocks_to_yuv420(
    bgra_group: *const u8,
    bgra_stride: usize,
    y_group: *mut u8,
    y_stride: usize,
    u_group: *mut u8,
    u_stride: usize,
    v_group: *mut u8,
    v_stride: usize,
    block_row: usize,
    first_block: usize,
    last_block: usize,
) {
    let y = block_row;
    for x in first_block..last_block {
        let (r00, g00, b00) =
            unpack_ui8x3_i32(bgra_group.add(wg_index(2 * x, 2 * y, DEPTH, bgra_stride)));
        let (r10, g10, b10) =
            unpack_ui8x3_i32(bgra_group.add(wg_index(2 * x + 1, 2 * y, DEPTH, bgra_stride)));

        pack_i32x2(
            y_group.add(wg_index(2 * x, 2 * y, 1, y_stride)),
            fix_to_i32(affine_transform(r00, g00, b00, Y_R, Y_G, Y_B, Y_OFFSET), FIX8),
            fix_to_i32(affine_transform(r10, g10, b10, Y_R, Y_G, Y_B, Y_OFFSET), FIX8),
        );

        let (r01, g01, b01) =
            unpack_ui8x3_i32(bgra_group.add(wg_index(2 * x, 2 * y + 1, DEPTH, bgra_stride)));
        let (r11, g11, b11) =
            unpack_ui8x3_i32(bgra_group.add(wg_index(2 * x + 1, 2 * y + 1, DEPTH, bgra_stride)));

        pack_i32x2(
            y_group.add(wg_index(2 * x, 2 * y + 1, 1, y_stride)),
            fix_to_i32(affine_transform(r01, g01, b01, Y_R, Y_G, Y_B, Y_OFFSET), FIX8),
            fix_to_i32(affine_transform(r11, g11, b11, Y_R, Y_G, Y_B, Y_OFFSET), FIX8),
        );

        let sr = (r00 + r10) + (r01 + r11);
        let sg = (g00 + g10) + (g01 + g11);
        let sb = (b00 + b10) + (b01 + b11);
        *u_group.add(wg_index(x, y, 1, u_stride)) =
            fix_to_i32(affine_transform(sr, sg, sb, U_R, U_G, U_B, C_OFFSET), FIX10) as u8;
        *v_group.add(wg_index(x, y, 1, v_stride)) =
            fix_to_i32(affine_transform(sr, sg, sb, V_R, V_G, V_B, C_OFFSET), FIX10) as u8;
    }
}

/// Converts a range of 2x2 blocks on one block row from YUV 4:2:0 to BGRA.
///
/// Each pixel takes its chroma from the enclosing block, with no
/// interpolation. Alpha is set to opaque. Also the tail converter for
/// vectorized code paths.
#[inline(always)]
pub(crate) unsafe fn convert_blocks_to_bgra(
    y_group: *const u8,
    y_stride: usize,
    u_group: *const u8,
    u_stride: usize,
    v_group: *const u8,
    v_stride: usize,
    bgra_group: *mut u8,
    bgra_stride: usize,
    block_row: usize,
    first_block: usize,
    last_block: usize,
) {
    let y = block_row;
    for x in first_block..last_block {
        let cb = i32::from(*u_group.add(wg_index(x, y, 1, u_stride))) - C_HALF;
        let cr = i32::from(*v_group.add(wg_index(x, y, 1, v_stride))) - C_HALF;

        let sr = (R_CR * cr) + RGB_OFFSET;
        let sg = (G_CB * cb) + (G_CR * cr) + RGB_OFFSET;
        let sb = (B_CB * cb) + RGB_OFFSET;

        let (y00, y10) = unpack_ui8x2_i32(y_group.add(wg_index(2 * x, 2 * y, 1, y_stride)));

        let sy00 = Y_SCALE * (y00 - Y_MIN);
        pack_ui8x3(
            bgra_group.add(wg_index(2 * x, 2 * y, DEPTH, bgra_stride)),
            fix_to_u8_sat(sy00 + sb, FIX8),
            fix_to_u8_sat(sy00 + sg, FIX8),
            fix_to_u8_sat(sy00 + sr, FIX8),
        );

        let sy10 = Y_SCALE * (y10 - Y_MIN);
        pack_ui8x3(
            bgra_group.add(wg_index(2 * x + 1, 2 * y, DEPTH, bgra_stride)),
            fix_to_u8_sat(sy10 + sb, FIX8),
            fix_to_u8_sat(sy10 + sg, FIX8),
            fix_to_u8_sat(sy10 + sr, FIX8),
        );

        let (y01, y11) = unpack_ui8x2_i32(y_group.add(wg_index(2 * x, 2 * y + 1, 1, y_stride)));

        let sy01 = Y_SCALE * (y01 - Y_MIN);
        pack_ui8x3(
            bgra_group.add(wg_index(2 * x, 2 * y + 1, DEPTH, bgra_stride)),
            fix_to_u8_sat(sy01 + sb, FIX8),
            fix_to_u8_sat(sy01 + sg, FIX8),
            fix_to_u8_sat(sy01 + sr, FIX8),
        );

        let sy11 = Y_SCALE * (y11 - Y_MIN);
        pack_ui8x3(
            bgra_group.add(wg_index(2 * x + 1, 2 * y + 1, DEPTH, bgra_stride)),
            fix_to_u8_sat(sy11 + sb, FIX8),
            fix_to_u8_sat(sy11 + sg, FIX8),
            fix_to_u8_sat(sy11 + sr, FIX8),
        );
    }
}

pub fn bgra_to_yuv420(
    width: u32,
    height: u32,
    src_strides: &[usize],
    src_buffers: &[&[u8]],
    dst_strides: &[usize],
    dst_buffers: &mut [&mut [u8]],
) -> bool {
    if src_strides.is_empty()
        || src_buffers.is_empty()
        || dst_strides.len() < 3
        || dst_buffers.len() < 3
    {
        return false;
    }

    let col_count = width as usize;
    let line_count = height as usize;
    let packed_bgra_stride = DEPTH * col_count;

    let bgra_stride = if src_strides[0] == 0 {
        packed_bgra_stride
    } else {
        src_strides[0]
    };

    let y_stride = if dst_strides[0] == 0 {
        col_count
    } else {
        dst_strides[0]
    };

    let u_stride = if dst_strides[1] == 0 {
        col_count / 2
    } else {
        dst_strides[1]
    };

    let v_stride = if dst_strides[2] == 0 {
        col_count / 2
    } else {
        dst_strides[2]
    };

    if line_count == 0 {
        return true;
    }

    if bgra_stride < packed_bgra_stride
        || y_stride < col_count
        || u_stride < col_count / 2
        || v_stride < col_count / 2
    {
        return false;
    }

    let bgra_plane = src_buffers[0];
    let (y_planes, chroma_planes) = dst_buffers.split_at_mut(1);
    let (u_planes, v_planes) = chroma_planes.split_at_mut(1);
    let y_plane = &mut *y_planes[0];
    let u_plane = &mut *u_planes[0];
    let v_plane = &mut *v_planes[0];

    let max_stride = usize::max_value() / line_count;
    if (bgra_stride > max_stride)
        || (y_stride > max_stride)
        || (u_stride > max_stride)
        || (v_stride > max_stride)
    {
        return false;
    }

    let wg_height = line_count / 2;
    if bgra_stride * line_count > bgra_plane.len()
        || y_stride * line_count > y_plane.len()
        || u_stride * wg_height > u_plane.len()
        || v_stride * wg_height > v_plane.len()
    {
        return false;
    }

    unsafe {
        let bgra_group = bgra_plane.as_ptr();
        let y_group = y_plane.as_mut_ptr();
        let u_group = u_plane.as_mut_ptr();
        let v_group = v_plane.as_mut_ptr();
        let wg_width = col_count / 2;

        for y in 0..wg_height {
            convert_blocks_to_yuv420(
                bgra_group,
                bgra_stride,
                y_group,
                y_stride,
                u_group,
                u_stride,
                v_group,
                v_stride,
                y,
                0,
                wg_width,
            );
        }
    }

    true
}

pub fn yuv420_to_bgra(
    width: u32,
    height: u32,
    src_strides: &[usize],
    src_buffers: &[&[u8]],
    dst_strides: &[usize],
    dst_buffers: &mut [&mut [u8]],
) -> bool {
    if src_strides.len() < 3
        || src_buffers.len() < 3
        || dst_strides.is_empty()
        || dst_buffers.is_empty()
    {
        return false;
    }

    let col_count = width as usize;
    let line_count = height as usize;
    let packed_bgra_stride = DEPTH * col_count;

    let y_stride = if src_strides[0] == 0 {
        col_count
    } else {
        src_strides[0]
    };

    let u_stride = if src_strides[1] == 0 {
        col_count / 2
    } else {
        src_strides[1]
    };

    let v_stride = if src_strides[2] == 0 {
        col_count / 2
    } else {
        src_strides[2]
    };

    let bgra_stride = if dst_strides[0] == 0 {
        packed_bgra_stride
    } else {
        dst_strides[0]
    };

    if line_count == 0 {
        return true;
    }

    if y_stride < col_count
        || u_stride < col_count / 2
        || v_stride < col_count / 2
        || bgra_stride < packed_bgra_stride
    {
        return false;
    }

    let (y_plane, u_plane, v_plane) = (src_buffers[0], src_buffers[1], src_buffers[2]);
    let bgra_plane = &mut *dst_buffers[0];

    let max_stride = usize::max_value() / line_count;
    if (y_stride > max_stride)
        || (u_stride > max_stride)
        || (v_stride > max_stride)
        || (bgra_stride > max_stride)
    {
        return false;
    }

    let wg_height = line_count / 2;
    if y_stride * line_count > y_plane.len()
        || u_stride * wg_height > u_plane.len()
        || v_stride * wg_height > v_plane.len()
        || bgra_stride * line_count > bgra_plane.len()
    {
        return false;
    }

    unsafe {
        let y_group = y_plane.as_ptr();
        let u_group = u_plane.as_ptr();
        let v_group = v_plane.as_ptr();
        let bgra_group = bgra_plane.as_mut_ptr();
        let wg_width = col_count / 2;

        for y in 0..wg_height {
            convert_blocks_to_bgra(
                y_group,
                y_stride,
                u_group,
                u_stride,
                v_group,
                v_stride,
                bgra_group,
                bgra_stride,
                y,
                0,
                wg_width,
            );
        }
    }

    true
}
