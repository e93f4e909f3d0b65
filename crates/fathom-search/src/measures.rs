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

use crate::result::StopReason;
use std::time::Duration;

/// The three-valued feasibility verdict of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feasibility {
    /// At least one solution was found.
    True,
    /// The search proved no solution exists.
    False,
    /// The search stopped before deciding either way.
    #[default]
    Unknown,
}

impl std::fmt::Display for Feasibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feasibility::True => write!(f, "feasible"),
            Feasibility::False => write!(f, "infeasible"),
            Feasibility::Unknown => write!(f, "unknown"),
        }
    }
}

/// Counters and the final verdict of a resolution, filled in by the driver.
///
/// Monitors read these through the search context; a monitor that wants its
/// own statistic keeps its own field rather than repurposing one of these.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchMeasures {
    /// Solutions recorded so far.
    pub solution_count: u64,
    /// Nodes opened so far.
    pub node_count: u64,
    /// Worlds rolled back so far.
    pub backtrack_count: u64,
    /// Contradictions hit while going down a branch.
    pub fail_count: u64,
    /// Restarts performed so far.
    pub restart_count: u64,
    /// The deepest decision chain reached.
    pub peak_depth: u64,
    /// Wall time of the resolution, set at close.
    pub time_total: Duration,
    /// Whether an objective was declared on this resolution.
    pub has_objective: bool,
    /// The feasibility verdict, set at close.
    pub feasibility: Feasibility,
    /// Whether the best solution was proven optimal, set at close.
    pub optimality_proven: bool,
    /// Why the resolution stopped.
    pub stop_reason: Option<StopReason>,
}

impl SearchMeasures {
    /// Creates zeroed measures.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes every counter and clears the verdict, so the same measures can
    /// carry a new resolution.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn on_node(&mut self) {
        self.node_count = self.node_count.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtrack_count = self.backtrack_count.saturating_add(1);
    }

    #[inline]
    pub fn on_fail(&mut self) {
        self.fail_count = self.fail_count.saturating_add(1);
    }

    #[inline]
    pub fn on_solution(&mut self) {
        self.solution_count = self.solution_count.saturating_add(1);
    }

    #[inline]
    pub fn on_restart(&mut self) {
        self.restart_count = self.restart_count.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.peak_depth = self.peak_depth.max(depth);
    }

    /// Marks that the resolution optimizes an objective.
    #[inline]
    pub fn declare_objective(&mut self) {
        self.has_objective = true;
    }

    /// Records the stop reason. The first recorded reason wins.
    #[inline]
    pub fn record_stop_reason(&mut self, reason: StopReason) {
        if self.stop_reason.is_none() {
            self.stop_reason = Some(reason);
        }
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SearchMeasures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search measures:")?;
        writeln!(f, "  Solutions:   {}", self.solution_count)?;
        writeln!(f, "  Nodes:       {}", self.node_count)?;
        writeln!(f, "  Backtracks:  {}", self.backtrack_count)?;
        writeln!(f, "  Fails:       {}", self.fail_count)?;
        writeln!(f, "  Restarts:    {}", self.restart_count)?;
        writeln!(f, "  Peak depth:  {}", self.peak_depth)?;
        writeln!(f, "  Feasibility: {}", self.feasibility)?;
        if self.has_objective {
            writeln!(
                f,
                "  Optimality:  {}",
                if self.optimality_proven {
                    "proven"
                } else {
                    "open"
                }
            )?;
        }
        if let Some(reason) = self.stop_reason {
            writeln!(f, "  Stopped:     {}", reason)?;
        }
        writeln!(f, "  Total time:  {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let m = SearchMeasures::new();
        assert_eq!(m.solution_count, 0);
        assert_eq!(m.node_count, 0);
        assert_eq!(m.backtrack_count, 0);
        assert_eq!(m.fail_count, 0);
        assert_eq!(m.restart_count, 0);
        assert_eq!(m.peak_depth, 0);
        assert_eq!(m.feasibility, Feasibility::Unknown);
        assert!(!m.optimality_proven);
        assert_eq!(m.stop_reason, None);
    }

    #[test]
    fn test_increments_and_peak_depth() {
        let mut m = SearchMeasures::new();
        m.on_node();
        m.on_node();
        m.on_fail();
        m.on_backtrack();
        m.on_solution();
        m.on_restart();
        m.on_depth_update(3);
        m.on_depth_update(1);
        assert_eq!(m.node_count, 2);
        assert_eq!(m.fail_count, 1);
        assert_eq!(m.backtrack_count, 1);
        assert_eq!(m.solution_count, 1);
        assert_eq!(m.restart_count, 1);
        assert_eq!(m.peak_depth, 3);
    }

    #[test]
    fn test_first_stop_reason_wins() {
        let mut m = SearchMeasures::new();
        m.record_stop_reason(StopReason::FirstSolution);
        m.record_stop_reason(StopReason::LimitReached);
        assert_eq!(m.stop_reason, Some(StopReason::FirstSolution));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut m = SearchMeasures::new();
        m.on_node();
        m.on_solution();
        m.declare_objective();
        m.record_stop_reason(StopReason::SearchSpaceExhausted);
        m.feasibility = Feasibility::True;
        m.optimality_proven = true;

        m.reset();
        assert_eq!(m, SearchMeasures::new());
    }
}
