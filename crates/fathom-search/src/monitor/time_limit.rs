// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Wall-Clock Budget
//!
//! Caps the runtime of a resolution without reading the clock at every node:
//! a bitmask-based step filter checks elapsed time roughly every
//! `mask + 1` opened nodes. The driver itself never polls wall time; this
//! monitor is the only place the clock is read.

use crate::monitor::search_monitor::{SearchContext, SearchMonitor};
use std::time::{Duration, Instant};

/// Requests a limit stop once the configured wall-clock budget is spent.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    clock_check_mask: u64,
    steps: u64,
    time_limit: Duration,
    start_time: Instant,
}

impl TimeLimitMonitor {
    /// Default mask: check the clock every 16,384 steps (2^14).
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    /// Creates a monitor enforcing `time_limit` with the default step
    /// filter.
    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    /// Creates a monitor checking the clock whenever
    /// `steps & clock_check_mask == 0`. A mask of 0 checks on every step.
    #[inline]
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            clock_check_mask,
            steps: 0,
            time_limit,
            start_time: Instant::now(),
        }
    }
}

impl<T> SearchMonitor<T> for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn before_initialize(&mut self, _ctx: &mut SearchContext<'_, T>) {
        self.start_time = Instant::now();
        self.steps = 0;
    }

    #[inline]
    fn after_open_node(&mut self, ctx: &mut SearchContext<'_, T>) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.start_time.elapsed() >= self.time_limit
        {
            ctx.reach_limit();
        }
    }
}
