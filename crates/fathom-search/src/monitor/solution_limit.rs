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

/// Requests a limit stop once `limit` solutions have been recorded.
///
/// The solution that reaches the limit is still recorded first; the limit
/// interrupt fires after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionLimitMonitor {
    limit: u64,
}

impl SolutionLimitMonitor {
    /// Creates a monitor allowing at most `limit` solutions.
    #[inline]
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<T> SearchMonitor<T> for SolutionLimitMonitor {
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    #[inline]
    fn on_solution(&mut self, ctx: &mut SearchContext<'_, T>) {
        if ctx.measures().solution_count >= self.limit {
            ctx.reach_limit();
        }
    }
}
