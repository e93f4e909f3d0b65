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
use fathom_model::solution::Solution;
use fathom_model::value::DomainValue;

/// Records every solution the search finds.
///
/// The driver time stamp changes whenever the world does, so two
/// `on_solution` dispatches with the same stamp describe the same state; the
/// recorder overwrites the previous snapshot instead of duplicating it.
#[derive(Debug, Clone, Default)]
pub struct SolutionRecorder<T> {
    solutions: Vec<Solution<T>>,
    last_stamp: Option<u64>,
}

impl<T> SolutionRecorder<T> {
    /// Creates an empty recorder.
    #[inline]
    pub fn new() -> Self {
        Self {
            solutions: Vec::new(),
            last_stamp: None,
        }
    }

    /// Returns all recorded solutions, oldest first.
    #[inline]
    pub fn solutions(&self) -> &[Solution<T>] {
        &self.solutions
    }

    /// Returns the most recent solution, if any.
    #[inline]
    pub fn last(&self) -> Option<&Solution<T>> {
        self.solutions.last()
    }

    /// Returns the number of recorded solutions.
    #[inline]
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Returns `true` if nothing was recorded yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Forgets every recorded solution.
    pub fn clear(&mut self) {
        self.solutions.clear();
        self.last_stamp = None;
    }
}

impl<T> SearchMonitor<T> for SolutionRecorder<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "SolutionRecorder"
    }

    fn on_solution(&mut self, ctx: &mut SearchContext<'_, T>) {
        let snapshot = ctx.store().solution();
        if self.last_stamp == Some(ctx.time_stamp()) {
            if let Some(last) = self.solutions.last_mut() {
                *last = snapshot;
                return;
            }
        }
        self.last_stamp = Some(ctx.time_stamp());
        self.solutions.push(snapshot);
    }
}
