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

//! # Restart Policies
//!
//! Restarting escapes an unlucky prefix of decisions: the search rewinds to
//! the state right after the initial propagation while keeping everything
//! that lives outside the trail (objective bounds, recorded nogoods). A
//! policy is an ordinary monitor that counts contradictions and requests
//! `restart()` when its budget for the current run is spent.

use crate::monitor::search_monitor::{SearchContext, SearchMonitor};

/// Returns the `i`-th element (1-indexed) of the Luby sequence
/// 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, …
///
/// # Panics
///
/// Panics if `i` is zero.
pub fn luby(mut i: u64) -> u64 {
    assert!(i > 0, "called `luby` with index 0; the sequence is 1-indexed");
    loop {
        let mut k = 1u32;
        while (1u64 << k) - 1 < i {
            k += 1;
        }
        if (1u64 << k) - 1 == i {
            return 1u64 << (k - 1);
        }
        i -= (1u64 << (k - 1)) - 1;
    }
}

/// Restarts after `scale * luby(n)` contradictions for the n-th run.
///
/// The Luby sequence is the classic universally-good schedule: it retries
/// short runs often while still granting unbounded runs eventually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LubyRestartMonitor {
    scale: u64,
    run: u64,
    fails_in_run: u64,
}

impl LubyRestartMonitor {
    /// Creates a Luby policy with the given scale factor (the fail budget of
    /// the first run).
    #[inline]
    pub fn new(scale: u64) -> Self {
        Self {
            scale: scale.max(1),
            run: 1,
            fails_in_run: 0,
        }
    }

    #[inline]
    fn budget(&self) -> u64 {
        self.scale.saturating_mul(luby(self.run))
    }
}

impl<T> SearchMonitor<T> for LubyRestartMonitor {
    fn name(&self) -> &str {
        "LubyRestartMonitor"
    }

    fn on_contradiction(&mut self, ctx: &mut SearchContext<'_, T>) {
        self.fails_in_run += 1;
        if self.fails_in_run >= self.budget() {
            ctx.restart();
        }
    }

    fn after_restart(&mut self, _ctx: &mut SearchContext<'_, T>) {
        self.run += 1;
        self.fails_in_run = 0;
    }
}

/// Restarts after a geometrically growing number of contradictions:
/// the budget starts at `period` and is multiplied by `factor` on every
/// restart.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricRestartMonitor {
    period: u64,
    factor: f64,
    fails_in_run: u64,
}

impl GeometricRestartMonitor {
    /// Creates a geometric policy.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `factor < 1.0` or `period == 0`.
    #[inline]
    pub fn new(period: u64, factor: f64) -> Self {
        debug_assert!(
            factor >= 1.0,
            "called `GeometricRestartMonitor::new` with a shrinking factor {}",
            factor
        );
        debug_assert!(
            period >= 1,
            "called `GeometricRestartMonitor::new` with a zero period"
        );
        Self {
            period: period.max(1),
            factor,
            fails_in_run: 0,
        }
    }
}

impl Default for GeometricRestartMonitor {
    fn default() -> Self {
        Self::new(100, 1.1)
    }
}

impl<T> SearchMonitor<T> for GeometricRestartMonitor {
    fn name(&self) -> &str {
        "GeometricRestartMonitor"
    }

    fn on_contradiction(&mut self, ctx: &mut SearchContext<'_, T>) {
        self.fails_in_run += 1;
        if self.fails_in_run >= self.period {
            ctx.restart();
        }
    }

    fn after_restart(&mut self, _ctx: &mut SearchContext<'_, T>) {
        self.period = (self.period as f64 * self.factor) as u64;
        self.period = self.period.max(1);
        self.fails_in_run = 0;
    }
}
