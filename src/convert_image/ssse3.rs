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
use crate::convert_image::scalar;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

const DEPTH: usize = 4;
const LANE_COUNT: usize = 16;
const TO_YUV420_WG_SIZE: usize = 4;
const TO_BGRA_WG_SIZE: usize = 2;
const TO_YUV420_WAVES: usize = LANE_COUNT / TO_YUV420_WG_SIZE;
const TO_BGRA_WAVES: usize = LANE_COUNT / TO_BGRA_WG_SIZE;

const fn mm_shuffle(z: i32, y: i32, x: i32, w: i32) -> i32 {
    (z << 6) | (y << 4) | (x << 2) | w
}

macro_rules! zero {
    () => {
        _mm_setzero_si128()
    };
}

macro_rules! xcgh_odd_even_words {
    () => {
        mm_shuffle(2, 3, 0, 1)
    };
}

// The green samples appear in both the (red, green) and the (blue, green)
// vectors, so its coefficient is split between the two madd weights. The
// split is arbitrary as long as both halves fit a short.
const GREEN_SPLIT: i32 = 64;

const FORWARD_WEIGHTS: [i32; 6] = [
    i32x2_to_i32(Y_G - GREEN_SPLIT, Y_R),
    i32x2_to_i32(GREEN_SPLIT, Y_B),
    i32x2_to_i32(U_G - GREEN_SPLIT, U_R),
    i32x2_to_i32(V_G - GREEN_SPLIT, V_R),
    i32x2_to_i32(GREEN_SPLIT, U_B),
    i32x2_to_i32(GREEN_SPLIT, V_B),
];

const BACKWARD_WEIGHTS: [i32; 3] = [
    i32x2_to_i32(R_CR, 0),
    i32x2_to_i32(G_CR, G_CB),
    i32x2_to_i32(0, B_CB),
];

/// Convert fixed point to int (4-wide)
macro_rules! fix_to_i32_4x {
    ($fix:expr, $frac_bits:expr) => {
        _mm_srai_epi32($fix, $frac_bits)
    };
}

/// Convert short to 2D short vector (8-wide)
///
/// x:      --x7--x6 --x5--x4 --x3--x2 --x1--x0
/// return: --x3--x3 --x2--x2 --x1--x1 --x0--x0
#[target_feature(enable = "ssse3")]
unsafe fn i16_to_i16x2_lo_8x(x: __m128i) -> __m128i {
    _mm_unpacklo_epi16(x, x)
}

/// Unpack 8 uchar samples into 8 short samples (8-wide)
///
/// image:  ******** g7g6g5g4 g3g2g1g0
/// return: --g7--g6 --g5--g4 --g3--g2 --g1--g0
#[target_feature(enable = "ssse3")]
unsafe fn unpack_ui8_i16_8x(image: *const u8) -> __m128i {
    let x = _mm_set1_epi64x((image as *const i64).read_unaligned());
    _mm_unpacklo_epi8(x, zero!())
}

/// Unpack 4 uchar samples into 4 short samples (4-wide)
///
/// image:  ******** ******** g3g2g1g0
/// return: -------- -------- --g3--g2 --g1--g0
#[target_feature(enable = "ssse3")]
unsafe fn unpack_ui8_i16_4x(image: *const u8) -> __m128i {
    let x = _mm_cvtsi32_si128((image as *const i32).read_unaligned());
    _mm_unpacklo_epi8(x, zero!())
}

/// Deinterleave 4 BGRA pixels into 2 deinterleaved short vectors (4-wide)
/// Alpha is discarded
///
/// image:      a3r3g3b3 a2r2g2b2 a1r1g1b1 a0r0g0b0
/// green_red:  --g3--r3 --g2--r2 --g1--r1 --g0--r0
/// green_blue: --g3--b3 --g2--b2 --g1--b1 --g0--b0
#[target_feature(enable = "ssse3")]
unsafe fn unpack_ui8x3_i16x2_4x(image: *const u8) -> (__m128i, __m128i) {
    let line = _mm_loadu_si128(image as *const __m128i);
    let red = _mm_srli_epi32(_mm_slli_epi32(line, 8), 24);
    let blue = _mm_srli_epi32(_mm_slli_epi32(line, 24), 24);
    let green = _mm_srli_epi32(_mm_slli_epi32(_mm_srli_epi32(line, 8), 24), 8);

    (_mm_or_si128(red, green), _mm_or_si128(blue, green))
}

/// Truncate int to uchar (4-wide)
///
/// red:      ******r3 ******r2 ******r1 ******r0
/// image[0]: r3r2r1r0
#[target_feature(enable = "ssse3")]
unsafe fn pack_i32_4x(image: *mut u8, red: __m128i) {
    let y = _mm_packs_epi32(red, red);
    let z = _mm_packus_epi16(y, y);
    // Plane strides carry no alignment guarantee.
    (image as *mut i32).write_unaligned(_mm_cvtsi128_si32(z));
}

/// Truncate 2 int pairs into 2x2 uchar planes (2-wide)
///
/// u32v:     ******u1 ******u1 ******u0 ******u0
/// v32v:     ******v1 ******v1 ******v0 ******v0
/// u_image:  u1u0
/// v_image:  v1v0
#[target_feature(enable = "ssse3")]
unsafe fn pack_i32x2x2_2x(u_image: *mut u8, v_image: *mut u8, u32v: __m128i, v32v: __m128i) {
    let x = _mm_packs_epi32(u32v, v32v);
    let y = _mm_shuffle_epi8(
        x,
        _mm_set_epi8(-1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 12, 8, 4, 0),
    );

    let packed = _mm_cvtsi128_si32(y) as u32;
    (u_image as *mut u16).write_unaligned(packed as u16);
    (v_image as *mut u16).write_unaligned((packed >> 16) as u16);
}

/// Truncate and deinterleave 3 short samples into 4 uchar samples (8-wide)
/// Alpha set to DEFAULT_ALPHA
///
/// red:      --r7--r6 --r5--r4 --r3--r2 --r1--r0
/// green:    --g7--g6 --g5--g4 --g3--g2 --g1--g0
/// blue:     --b7--b6 --b5--b4 --b3--b2 --b1--b0
/// image[0]: ffr3g3b3 ffr2g2b2 ffr1g1b1 ffr0g0b0
/// image[1]: ffr7g7b7 ffr6g6b6 ffr5g5b5 ffr4g4b4
#[target_feature(enable = "ssse3")]
unsafe fn pack_i16x3_8x(image: *mut u8, red: __m128i, green: __m128i, blue: __m128i) {
    let x = _mm_packus_epi16(blue, red);
    let y = _mm_packus_epi16(green, _mm_srli_epi16(_mm_cmpeq_epi32(zero!(), zero!()), 8));
    let z = _mm_unpacklo_epi8(x, y);
    let w = _mm_unpackhi_epi8(x, y);

    _mm_storeu_si128(image as *mut __m128i, _mm_unpacklo_epi16(z, w));
    _mm_storeu_si128(
        image.add(LANE_COUNT) as *mut __m128i,
        _mm_unpackhi_epi16(z, w),
    );
}

#[target_feature(enable = "ssse3")]
unsafe fn affine_transform(xy: __m128i, zy: __m128i, weights: &[__m128i; 3]) -> __m128i {
    _mm_add_epi32(
        _mm_add_epi32(
            _mm_madd_epi16(xy, weights[0]),
            _mm_madd_epi16(zy, weights[1]),
        ),
        weights[2],
    )
}

/// Sum 2x2 neighborhood of 2D short vectors (2-wide)
///
/// xy0:    -y30-x30 -y20-x20 -y10-x10 -y00-x00
/// xy1:    -y31-x31 -y21-x21 -y11-x11 -y01-x01
/// return: -ys1-xs1 -ys1-xs1 -ys0-xs0 -ys0-xs0
///
/// xs0 = x00 + x10 + x01 + x11
/// xs1 = x20 + x30 + x21 + x31
/// ys0 = y00 + y10 + y01 + y11
/// ys1 = y20 + y30 + y21 + y31
#[target_feature(enable = "ssse3")]
unsafe fn sum_i16x2_neighborhood_2x(xy0: __m128i, xy1: __m128i) -> __m128i {
    _mm_add_epi16(
        _mm_add_epi16(xy0, _mm_shuffle_epi32(xy0, xcgh_odd_even_words!())),
        _mm_add_epi16(xy1, _mm_shuffle_epi32(xy1, xcgh_odd_even_words!())),
    )
}

/// Convert 2 rows of 4 BGRA pixels to the yuv colorspace (4-wide)
#[target_feature(enable = "ssse3")]
unsafe fn bgra_to_yuv420_4x(
    bgra0: *const u8,
    bgra1: *const u8,
    y0: *mut u8,
    y1: *mut u8,
    u: *mut u8,
    v: *mut u8,
    y_weights: &[__m128i; 3],
    u_weights: &[__m128i; 3],
    v_weights: &[__m128i; 3],
) {
    let (rg0, bg0) = unpack_ui8x3_i16x2_4x(bgra0);
    pack_i32_4x(
        y0,
        fix_to_i32_4x!(affine_transform(rg0, bg0, y_weights), FIX8),
    );

    let (rg1, bg1) = unpack_ui8x3_i16x2_4x(bgra1);
    pack_i32_4x(
        y1,
        fix_to_i32_4x!(affine_transform(rg1, bg1, y_weights), FIX8),
    );

    let srg = sum_i16x2_neighborhood_2x(rg0, rg1);
    let sbg = sum_i16x2_neighborhood_2x(bg0, bg1);
    pack_i32x2x2_2x(
        u,
        v,
        fix_to_i32_4x!(affine_transform(srg, sbg, u_weights), FIX10),
        fix_to_i32_4x!(affine_transform(srg, sbg, v_weights), FIX10),
    );
}

/// Convert 2 rows of 8 yuv pixels to BGRA (8-wide)
#[target_feature(enable = "ssse3")]
unsafe fn yuv420_to_bgra_8x(
    y0: *const u8,
    y1: *const u8,
    u: *const u8,
    v: *const u8,
    bgra0: *mut u8,
    bgra1: *mut u8,
    weights: &[__m128i; 5],
) {
    let cb = _mm_sub_epi16(unpack_ui8_i16_4x(u), _mm_set1_epi16(C_HALF as i16));
    let cr = _mm_sub_epi16(unpack_ui8_i16_4x(v), _mm_set1_epi16(C_HALF as i16));

    // Each chroma sample covers two luma columns.
    let d = i16_to_i16x2_lo_8x(cb);
    let e = i16_to_i16x2_lo_8x(cr);
    let de_lo = _mm_unpacklo_epi16(d, e);
    let de_hi = _mm_unpackhi_epi16(d, e);

    let r_bias_lo = _mm_add_epi32(_mm_madd_epi16(de_lo, weights[1]), weights[4]);
    let r_bias_hi = _mm_add_epi32(_mm_madd_epi16(de_hi, weights[1]), weights[4]);
    let g_bias_lo = _mm_add_epi32(_mm_madd_epi16(de_lo, weights[2]), weights[4]);
    let g_bias_hi = _mm_add_epi32(_mm_madd_epi16(de_hi, weights[2]), weights[4]);
    let b_bias_lo = _mm_add_epi32(_mm_madd_epi16(de_lo, weights[3]), weights[4]);
    let b_bias_hi = _mm_add_epi32(_mm_madd_epi16(de_hi, weights[3]), weights[4]);

    for (&y_row, &bgra_row) in [y0, y1].iter().zip([bgra0, bgra1].iter()) {
        let ly = _mm_sub_epi16(unpack_ui8_i16_8x(y_row), _mm_set1_epi16(Y_MIN as i16));
        let sy_lo = _mm_madd_epi16(_mm_unpacklo_epi16(ly, zero!()), weights[0]);
        let sy_hi = _mm_madd_epi16(_mm_unpackhi_epi16(ly, zero!()), weights[0]);

        let red = _mm_packs_epi32(
            fix_to_i32_4x!(_mm_add_epi32(sy_lo, r_bias_lo), FIX8),
            fix_to_i32_4x!(_mm_add_epi32(sy_hi, r_bias_hi), FIX8),
        );
        let green = _mm_packs_epi32(
            fix_to_i32_4x!(_mm_add_epi32(sy_lo, g_bias_lo), FIX8),
            fix_to_i32_4x!(_mm_add_epi32(sy_hi, g_bias_hi), FIX8),
        );
        let blue = _mm_packs_epi32(
            fix_to_i32_4x!(_mm_add_epi32(sy_lo, b_bias_lo), FIX8),
            fix_to_i32_4x!(_mm_add_epi32(sy_hi, b_bias_hi), FIX8),
        );

        pack_i16x3_8x(bgra_row, red, green, blue);
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
        let y_weights = [
            _mm_set1_epi32(FORWARD_WEIGHTS[0]),
            _mm_set1_epi32(FORWARD_WEIGHTS[1]),
            _mm_set1_epi32(Y_OFFSET),
        ];

        let u_weights = [
            _mm_set1_epi32(FORWARD_WEIGHTS[2]),
            _mm_set1_epi32(FORWARD_WEIGHTS[4]),
            _mm_set1_epi32(C_OFFSET),
        ];

        let v_weights = [
            _mm_set1_epi32(FORWARD_WEIGHTS[3]),
            _mm_set1_epi32(FORWARD_WEIGHTS[5]),
            _mm_set1_epi32(C_OFFSET),
        ];

        let bgra_group = bgra_plane.as_ptr();
        let y_group = y_plane.as_mut_ptr();
        let u_group = u_plane.as_mut_ptr();
        let v_group = v_plane.as_mut_ptr();

        let bgra_depth = DEPTH * TO_YUV420_WAVES;
        let chroma_depth = TO_YUV420_WAVES / 2;
        let wg_width = col_count / TO_YUV420_WAVES;
        let first_tail_block = wg_width * chroma_depth;
        let last_block = col_count / 2;

        for y in 0..wg_height {
            for x in 0..wg_width {
                bgra_to_yuv420_4x(
                    bgra_group.add(wg_index(x, 2 * y, bgra_depth, bgra_stride)),
                    bgra_group.add(wg_index(x, 2 * y + 1, bgra_depth, bgra_stride)),
                    y_group.add(wg_index(x, 2 * y, TO_YUV420_WAVES, y_stride)),
                    y_group.add(wg_index(x, 2 * y + 1, TO_YUV420_WAVES, y_stride)),
                    u_group.add(wg_index(x, y, chroma_depth, u_stride)),
                    v_group.add(wg_index(x, y, chroma_depth, v_stride)),
                    &y_weights,
                    &u_weights,
                    &v_weights,
                );
            }

            if first_tail_block != last_block {
                scalar::convert_blocks_to_yuv420(
                    bgra_group,
                    bgra_stride,
                    y_group,
                    y_stride,
                    u_group,
                    u_stride,
                    v_group,
                    v_stride,
                    y,
                    first_tail_block,
                    last_block,
                );
            }
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
        let weights = [
            _mm_set1_epi32(Y_SCALE),
            _mm_set1_epi32(BACKWARD_WEIGHTS[0]),
            _mm_set1_epi32(BACKWARD_WEIGHTS[1]),
            _mm_set1_epi32(BACKWARD_WEIGHTS[2]),
            _mm_set1_epi32(RGB_OFFSET),
        ];

        let y_group = y_plane.as_ptr();
        let u_group = u_plane.as_ptr();
        let v_group = v_plane.as_ptr();
        let bgra_group = bgra_plane.as_mut_ptr();

        let bgra_depth = DEPTH * TO_BGRA_WAVES;
        let chroma_depth = TO_BGRA_WAVES / 2;
        let wg_width = col_count / TO_BGRA_WAVES;
        let first_tail_block = wg_width * chroma_depth;
        let last_block = col_count / 2;

        for y in 0..wg_height {
            for x in 0..wg_width {
                yuv420_to_bgra_8x(
                    y_group.add(wg_index(x, 2 * y, TO_BGRA_WAVES, y_stride)),
                    y_group.add(wg_index(x, 2 * y + 1, TO_BGRA_WAVES, y_stride)),
                    u_group.add(wg_index(x, y, chroma_depth, u_stride)),
                    v_group.add(wg_index(x, y, chroma_depth, v_stride)),
                    bgra_group.add(wg_index(x, 2 * y, bgra_depth, bgra_stride)),
                    bgra_group.add(wg_index(x, 2 * y + 1, bgra_depth, bgra_stride)),
                    &weights,
                );
            }

            if first_tail_block != last_block {
                scalar::convert_blocks_to_bgra(
                    y_group,
                    y_stride,
                    u_group,
                    u_stride,
                    v_group,
                    v_stride,
                    bgra_group,
                    bgra_stride,
                    y,
                    first_tail_block,
                    last_block,
                );
            }
        }
    }

    true
}
