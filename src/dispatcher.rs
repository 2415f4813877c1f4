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
use crate::{Algorithm, Direction};

/// Converter entry point: width, height, source strides and planes,
/// destination strides and planes. Returns false when a plane does not
/// provide enough data.
pub type ConvertDispatcher =
    fn(u32, u32, &[usize], &[&[u8]], &[usize], &mut [&mut [u8]]) -> bool;

pub const ALGORITHM_COUNT: usize = 2;
pub const DIRECTION_COUNT: usize = 2;

/// Converters indexed by algorithm then direction. A `None` entry means
/// the algorithm is not available on the running processor.
pub type DispatchTable = [[Option<ConvertDispatcher>; DIRECTION_COUNT]; ALGORITHM_COUNT];

pub const EMPTY_TABLE: DispatchTable = [[None; DIRECTION_COUNT]; ALGORITHM_COUNT];

pub fn get_converter(
    table: &DispatchTable,
    algorithm: Algorithm,
    direction: Direction,
) -> Option<ConvertDispatcher> {
    table[algorithm as usize][direction as usize]
}
