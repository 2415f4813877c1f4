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

//! Wall-clock measurement of repeated conversions.
//!
//! [`TimingHarness`] owns a BGRA image and the YUV 4:2:0 frame derived from
//! it, and keeps one accumulator per conversion direction. Each
//! [`run_once`](TimingHarness::run_once) performs a full conversion and
//! records two durations: the total time including destination set up, and
//! the inner time covering the conversion call alone.

use std::time::{Duration, Instant};

use crate::{
    convert_bgra_to_yuv420, convert_yuv420_to_bgra, Algorithm, BgraImage, Direction, ErrorKind,
};
use crate::frame::Yuv420Frame;

/// Wall-clock totals for one conversion direction.
#[derive(Copy, Clone, Debug, Default)]
pub struct TimingAccumulator {
    total: Duration,
    inner: Duration,
    count: u64,
}

impl TimingAccumulator {
    fn record(&mut self, total: Duration, inner: Duration) {
        self.total += total;
        self.inner += inner;
        self.count += 1;
    }

    fn reset(&mut self) {
        *self = TimingAccumulator::default();
    }

    /// Number of recorded conversions
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Accumulated wall-clock time, including destination set up
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Accumulated wall-clock time of the conversion calls alone
    pub fn inner(&self) -> Duration {
        self.inner
    }
}

/// Runs conversions over a fixed image pair and accumulates their timings.
///
/// The YUV frame is derived from the source image once at construction, so
/// both directions always operate on consistent data. The harness takes
/// `&mut self` throughout and carries no shared state.
pub struct TimingHarness {
    bgra: BgraImage,
    yuv: Yuv420Frame,
    to_frame: TimingAccumulator,
    from_frame: TimingAccumulator,
}

impl TimingHarness {
    /// Wraps a source image, deriving its YUV 4:2:0 counterpart with the
    /// scalar converter.
    ///
    /// # Errors
    ///
    /// Any error of [`convert_bgra_to_yuv420`]
    pub fn new(bgra: BgraImage) -> Result<Self, ErrorKind> {
        let yuv = convert_bgra_to_yuv420(&bgra.as_view(), Algorithm::Scalar)?;

        Ok(TimingHarness {
            bgra,
            yuv,
            to_frame: TimingAccumulator::default(),
            from_frame: TimingAccumulator::default(),
        })
    }

    /// Zeroes the accumulators of both directions.
    pub fn reset(&mut self) {
        self.to_frame.reset();
        self.from_frame.reset();
    }

    /// Performs one conversion and records its timings.
    ///
    /// The result replaces the harness copy for that direction, so
    /// successive runs keep converting consistent data. A failed conversion
    /// records no sample.
    ///
    /// # Errors
    ///
    /// Any error of the underlying conversion
    pub fn run_once(&mut self, direction: Direction, algorithm: Algorithm) -> Result<(), ErrorKind> {
        match direction {
            Direction::BgraToYuv420 => {
                let total_start = Instant::now();
                let src = self.bgra.as_view();

                let inner_start = Instant::now();
                let result = convert_bgra_to_yuv420(&src, algorithm);
                let inner = inner_start.elapsed();

                self.yuv = result?;
                self.to_frame.record(total_start.elapsed(), inner);
            }
            Direction::Yuv420ToBgra => {
                let total_start = Instant::now();
                let src = self.yuv.as_view();

                let inner_start = Instant::now();
                let result = convert_yuv420_to_bgra(&src, algorithm);
                let inner = inner_start.elapsed();

                self.bgra = result?;
                self.from_frame.record(total_start.elapsed(), inner);
            }
        }

        Ok(())
    }

    /// Number of recorded conversions for one direction
    pub fn count(&self, direction: Direction) -> u64 {
        self.accumulator(direction).count
    }

    /// Borrows the accumulator of one direction
    pub fn accumulator(&self, direction: Direction) -> &TimingAccumulator {
        match direction {
            Direction::BgraToYuv420 => &self.to_frame,
            Direction::Yuv420ToBgra => &self.from_frame,
        }
    }

    /// Formats the average timings of one direction.
    ///
    /// Returns `"N/A"` when no conversion has been recorded, otherwise the
    /// conversion count and the average total and inner times in
    /// milliseconds with three decimals, for example
    /// `BGRA->YUV420, count: 100, total/inner: 1.934/1.842 msecs`.
    pub fn report(&self, direction: Direction) -> String {
        let label = match direction {
            Direction::BgraToYuv420 => "BGRA->YUV420",
            Direction::Yuv420ToBgra => "YUV420->BGRA",
        };

        let acc = self.accumulator(direction);
        if acc.count == 0 {
            return "N/A".to_owned();
        }

        #[allow(clippy::cast_precision_loss)]
        let samples = acc.count as f64;
        format!(
            "{}, count: {}, total/inner: {:.3}/{:.3} msecs",
            label,
            acc.count,
            acc.total.as_secs_f64() * 1e3 / samples,
            acc.inner.as_secs_f64() * 1e3 / samples,
        )
    }
}
