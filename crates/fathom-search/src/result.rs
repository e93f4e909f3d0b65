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

use crate::measures::SearchMeasures;
use fathom_model::solution::Solution;

/// The reason a resolution stopped. Exactly one is recorded per launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Every branch of the search tree was explored or refuted.
    SearchSpaceExhausted,
    /// A monitor reported that a budget (time, nodes, solutions, …) is spent.
    LimitReached,
    /// Tightening the objective below the incumbent failed at the root:
    /// the incumbent is optimal.
    CutFailure,
    /// The caller asked for a single solution and one was found.
    FirstSolution,
    /// The root state itself is contradictory.
    InitialPropagationFailure,
    /// The branching strategy reported the problem inconsistent up front.
    StrategyInconsistency,
}

impl StopReason {
    /// Returns the human-readable message attached to this reason.
    pub fn message(&self) -> &'static str {
        match self {
            StopReason::SearchSpaceExhausted => "the entire search space has been explored",
            StopReason::LimitReached => "a limit has been reached",
            StopReason::CutFailure => "applying the cut leads to a failure",
            StopReason::FirstSolution => "stop at first solution",
            StopReason::InitialPropagationFailure => {
                "failure encountered during initial propagation"
            }
            StopReason::StrategyInconsistency => "search strategy detects inconsistency",
        }
    }

    /// Returns `true` if this reason proves the search tree was exhausted
    /// under the final cut, which is what optimality proofs rest on.
    #[inline]
    pub fn proves_exhaustion(&self) -> bool {
        matches!(
            self,
            StopReason::SearchSpaceExhausted | StopReason::CutFailure
        )
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// What the resolution established about the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// A solution was found and proven optimal.
    Optimal(Solution<T>),
    /// A solution was found; optimality is open or was not asked for.
    Feasible(Solution<T>),
    /// No solution exists.
    Infeasible,
    /// The resolution stopped before deciding anything.
    Unknown,
}

impl<T> SolverResult<T> {
    /// Returns the best solution carried by this result, if any.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        match self {
            SolverResult::Optimal(solution) | SolverResult::Feasible(solution) => Some(solution),
            _ => None,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(solution) => write!(f, "Optimal({})", solution),
            SolverResult::Feasible(solution) => write!(f, "Feasible({})", solution),
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The complete verdict of a resolution: result plus the measures that carry
/// the stop reason and the counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOutcome<T> {
    result: SolverResult<T>,
    measures: SearchMeasures,
}

impl<T> SolverOutcome<T> {
    /// Creates an outcome for a proven-optimal solution.
    #[inline]
    pub fn optimal(solution: Solution<T>, measures: SearchMeasures) -> Self {
        Self {
            result: SolverResult::Optimal(solution),
            measures,
        }
    }

    /// Creates an outcome for a solution without an optimality proof.
    #[inline]
    pub fn feasible(solution: Solution<T>, measures: SearchMeasures) -> Self {
        Self {
            result: SolverResult::Feasible(solution),
            measures,
        }
    }

    /// Creates an outcome for a proven-infeasible problem.
    #[inline]
    pub fn infeasible(measures: SearchMeasures) -> Self {
        Self {
            result: SolverResult::Infeasible,
            measures,
        }
    }

    /// Creates an outcome for a resolution that decided nothing.
    #[inline]
    pub fn unknown(measures: SearchMeasures) -> Self {
        Self {
            result: SolverResult::Unknown,
            measures,
        }
    }

    /// Returns the result.
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    /// Returns the measures of the resolution.
    #[inline]
    pub fn measures(&self) -> &SearchMeasures {
        &self.measures
    }

    /// Returns why the resolution stopped.
    #[inline]
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.measures.stop_reason
    }

    /// Returns `true` if the result carries a proven-optimal solution.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self.result, SolverResult::Optimal(_))
    }

    /// Returns `true` if any solution was found.
    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(
            self.result,
            SolverResult::Optimal(_) | SolverResult::Feasible(_)
        )
    }

    /// Returns `true` if the problem was proven infeasible.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.result, SolverResult::Infeasible)
    }
}

impl<T> std::fmt::Display for SolverOutcome<T>
where
    T: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Result: {}", self.result)?;
        write!(f, "{}", self.measures)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let reasons = [
            StopReason::SearchSpaceExhausted,
            StopReason::LimitReached,
            StopReason::CutFailure,
            StopReason::FirstSolution,
            StopReason::InitialPropagationFailure,
            StopReason::StrategyInconsistency,
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in reasons.iter().skip(i + 1) {
                assert_ne!(a.message(), b.message());
            }
        }
    }

    #[test]
    fn test_only_exhaustive_reasons_prove_exhaustion() {
        assert!(StopReason::SearchSpaceExhausted.proves_exhaustion());
        assert!(StopReason::CutFailure.proves_exhaustion());
        assert!(!StopReason::LimitReached.proves_exhaustion());
        assert!(!StopReason::FirstSolution.proves_exhaustion());
        assert!(!StopReason::InitialPropagationFailure.proves_exhaustion());
        assert!(!StopReason::StrategyInconsistency.proves_exhaustion());
    }

    #[test]
    fn test_outcome_classification() {
        let solution = Solution::<i64>::new(vec![1, 2]);
        let measures = SearchMeasures::new();

        let outcome = SolverOutcome::optimal(solution.clone(), measures.clone());
        assert!(outcome.is_optimal());
        assert!(outcome.has_solution());
        assert_eq!(outcome.result().solution(), Some(&solution));

        let outcome = SolverOutcome::feasible(solution, measures.clone());
        assert!(!outcome.is_optimal());
        assert!(outcome.has_solution());

        let outcome = SolverOutcome::<i64>::infeasible(measures.clone());
        assert!(outcome.is_infeasible());
        assert!(!outcome.has_solution());

        let outcome = SolverOutcome::<i64>::unknown(measures);
        assert!(!outcome.is_infeasible());
        assert!(!outcome.has_solution());
        assert_eq!(outcome.result().solution(), None);
    }

    #[test]
    fn test_outcome_reports_the_recorded_stop_reason() {
        let mut measures = SearchMeasures::new();
        measures.record_stop_reason(StopReason::LimitReached);
        let outcome = SolverOutcome::<i64>::unknown(measures);
        assert_eq!(outcome.stop_reason(), Some(StopReason::LimitReached));
    }
}
