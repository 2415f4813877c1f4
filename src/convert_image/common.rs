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

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub const fn i32x2_to_i32(x: i32, y: i32) -> i32 {
    let val = (((x & 0xFFFF) as u32) << 16) | ((y & 0xFFFF) as u32);
    val as i32
}

pub fn wg_index(x: usize, y: usize, w: usize, h: usize) -> usize {
    (h * y) + (x * w)
}

pub const FIX8: i32 = 8;
pub const FIX10: i32 = 10;
pub const FIX8_HALF: i32 = 1 << (FIX8 - 1);
pub const FIX10_HALF: i32 = 1 << (FIX10 - 1);

// Forward coefficient table, BT.601 studio swing, 8-bit fixed point.
pub const Y_R: i32 = 66;
pub const Y_G: i32 = 129;
pub const Y_B: i32 = 25;
pub const U_R: i32 = -38;
pub const U_G: i32 = -74;
pub const U_B: i32 = 112;
pub const V_R: i32 = 112;
pub const V_G: i32 = -94;
pub const V_B: i32 = -18;

// Backward coefficient table (1.164, 1.596, 0.813, 0.391, 2.018 scaled by 256).
pub const Y_SCALE: i32 = 298;
pub const R_CR: i32 = 409;
pub const G_CB: i32 = -100;
pub const G_CR: i32 = -208;
pub const B_CB: i32 = 516;

// Other defines
pub const Y_MIN: i32 = 16;
pub const C_HALF: i32 = 128;

// Rounding biases with the post-shift offsets folded in. Adding a multiple
// of the fixed point denominator commutes exactly with the arithmetic shift,
// so these keep the scalar and vector paths bit identical.
pub const Y_OFFSET: i32 = FIX8_HALF + (Y_MIN << FIX8);
pub const C_OFFSET: i32 = FIX10_HALF + (C_HALF << FIX10);
pub const RGB_OFFSET: i32 = FIX8_HALF;

pub const DEFAULT_ALPHA: u8 = 255;

/// Convert fixed point number approximation to uchar, using saturation
///
/// This is equivalent to the following code:
/// if (fix[8 + frac_bits:31] == 0) {
///      return fix >> frac_bits;  // extracts the integer part, no integer underflow
/// } else if (fix < 0) {
///      return 0;       // integer underflow occurred (we got a negative number)
/// } else {
///      return 255;     // no integer underflow occurred, fix is just bigger than 255
/// }
///
/// We can get rid of the last branch (else if / else) by observing that:
/// - if fix is negative, fix[31] is 1, fix[31] + 255 = 256, when clamped to uint8 is 0 (just what we want)
/// -    <<  is positive, fix[31] is 0, fix[31] + 255 = 255, when clamped to uint8 is 255 (just what we want)
pub fn fix_to_u8_sat(fix: i32, frac_bits: i32) -> u8 {
    if (fix & !((256 << frac_bits) - 1)) == 0 {
        ((fix as u32) >> frac_bits) as u8
    } else {
        ((((fix as u32) >> 31) + 255) & 255) as u8
    }
}

/// Converts fixed point number to int
pub fn fix_to_i32(fix: i32, frac_bits: i32) -> i32 {
    fix >> frac_bits
}

/// Perform affine transformation y = Ax + b, where:
/// - A = (ax, ay, az, 0)
/// - x = (x, y, z, 0)
/// - b = (0, 0, 0, bw)
pub fn affine_transform(x: i32, y: i32, z: i32, ax: i32, ay: i32, az: i32, bw: i32) -> i32 {
    (ax * x) + (ay * y) + (az * z) + bw
}
