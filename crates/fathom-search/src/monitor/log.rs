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

use crate::monitor::search_monitor::{SearchContext, SearchMonitor};
use std::time::{Duration, Instant};

/// Prints a throttled progress table to stdout and a summary at close.
///
/// Lines are emitted at most every `log_interval`, and the clock is only
/// consulted when the node count passes the bitmask filter, so the monitor
/// costs next to nothing in the hot loop.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    header_printed: bool,
}

impl LogMonitor {
    /// Creates a log monitor printing at most every `log_interval`, checking
    /// the clock whenever `node_count & clock_check_mask == 0`.
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            header_printed: false,
        }
    }

    fn print_header(&mut self) {
        println!(
            "{:<9} | {:<12} | {:<10} | {:<10} | {:<9} | {:<7}",
            "Elapsed", "Nodes", "Fails", "Backtracks", "Solutions", "Depth"
        );
        println!("{}", "-".repeat(72));
        self.header_printed = true;
    }

    fn log_line<T>(&mut self, ctx: &SearchContext<'_, T>) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();
        let m = ctx.measures();
        println!(
            "{:<9} | {:<12} | {:<10} | {:<10} | {:<9} | {:<7}",
            format!("{:.1}s", elapsed),
            m.node_count,
            m.fail_count,
            m.backtrack_count,
            m.solution_count,
            ctx.depth()
        );
        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> SearchMonitor<T> for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn before_initialize(&mut self, _ctx: &mut SearchContext<'_, T>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        if !self.header_printed {
            self.print_header();
        }
    }

    fn after_open_node(&mut self, ctx: &mut SearchContext<'_, T>) {
        if (ctx.measures().node_count & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(ctx);
        }
    }

    fn on_solution(&mut self, ctx: &mut SearchContext<'_, T>) {
        self.log_line(ctx);
    }

    fn after_close(&mut self, ctx: &mut SearchContext<'_, T>) {
        println!("{}", ctx.measures());
    }
}
