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

//! # The Solver Facade
//!
//! One type to declare a problem and resolve it. The facade owns the shared
//! fixpoint engine and a solution recorder, hands the driver a fresh engine
//! handle per resolution, and folds driver measures plus recorded solutions
//! into a [`SolverOutcome`]. Successive resolutions on the same solver reset
//! the driver in between, so `find_solution` / `find_all_solutions` /
//! `minimize` can be called back to back.

use crate::propagation::nogoods::{NogoodBase, NogoodRecorder, SolutionNogoods};
use crate::propagation::{EngineHandle, FixpointEngine, Propagator};
use fathom_model::index::{PropagatorId, VariableId};
use fathom_model::solution::Solution;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;
use fathom_search::branching::BranchingStrategy;
use fathom_search::driver::SearchLoop;
use fathom_search::error::SearchError;
use fathom_search::measures::{Feasibility, SearchMeasures};
use fathom_search::monitor::list::MonitorHandle;
use fathom_search::monitor::solution::SolutionRecorder;
use fathom_search::objective::ObjectiveManager;
use fathom_search::result::SolverOutcome;
use std::cell::RefCell;
use std::rc::Rc;

/// A finite-domain constraint solver: variables, propagators, search.
pub struct Solver<T> {
    driver: SearchLoop<T>,
    engine: Rc<RefCell<FixpointEngine<T>>>,
    recorder: Rc<RefCell<SolutionRecorder<T>>>,
    solved_once: bool,
}

impl<T> Default for Solver<T>
where
    T: DomainValue,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Solver<T>
where
    T: DomainValue,
{
    /// Creates a solver with no variables and no propagators.
    pub fn new() -> Self {
        let mut driver = SearchLoop::new(DomainStore::new());
        let recorder = Rc::new(RefCell::new(SolutionRecorder::new()));
        driver.plug_monitor(recorder.clone());
        Self {
            driver,
            engine: Rc::new(RefCell::new(FixpointEngine::new())),
            recorder,
            solved_once: false,
        }
    }

    /// Declares a fresh variable with domain `{lb, …, ub}`.
    pub fn new_variable(&mut self, lb: T, ub: T) -> VariableId {
        self.driver.store_mut().new_variable(lb, ub)
    }

    /// Posts a propagator on the shared engine.
    pub fn post(&mut self, propagator: Box<dyn Propagator<T>>) -> PropagatorId {
        self.engine.borrow_mut().add(propagator)
    }

    /// Replaces the branching strategy.
    pub fn set_strategy(
        &mut self,
        strategy: Box<dyn BranchingStrategy<T>>,
    ) -> Result<(), SearchError> {
        self.driver.set_strategy(strategy)
    }

    /// Plugs an additional monitor on the driver.
    pub fn plug_monitor(&mut self, monitor: MonitorHandle<T>) -> bool {
        self.driver.plug_monitor(monitor)
    }

    /// After each solution, restart from the post-propagation root instead
    /// of backtracking.
    pub fn restart_after_each_solution(&mut self, does: bool) {
        self.driver.restart_after_each_solution(does);
    }

    /// Turns every future solution into a forbidden assignment, so that
    /// restart-based enumeration cannot rediscover it. Returns the shared
    /// nogood base; call at most once per solver.
    pub fn record_solution_nogoods(&mut self) -> Rc<RefCell<NogoodBase<T>>> {
        let base = Rc::new(RefCell::new(NogoodBase::new()));
        self.engine
            .borrow_mut()
            .add(Box::new(SolutionNogoods::new(base.clone())));
        self.driver
            .plug_monitor(Rc::new(RefCell::new(NogoodRecorder::new(base.clone()))));
        base
    }

    /// Returns the search driver, for lower-level control.
    #[inline]
    pub fn driver(&self) -> &SearchLoop<T> {
        &self.driver
    }

    /// Returns the search driver mutably.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut SearchLoop<T> {
        &mut self.driver
    }

    /// Returns the measures of the last resolution.
    #[inline]
    pub fn measures(&self) -> &SearchMeasures {
        self.driver.measures()
    }

    /// Returns every solution the last resolution recorded.
    pub fn solutions(&self) -> Vec<Solution<T>> {
        self.recorder.borrow().solutions().to_vec()
    }

    /// Returns the best objective value of the last optimization, if any.
    pub fn best_objective(&self) -> Option<T> {
        self.driver.objective().best()
    }

    /// Runs a resolution with the given stop-at-first flag and returns the
    /// outcome.
    pub fn solve(&mut self, stop_at_first: bool) -> Result<SolverOutcome<T>, SearchError> {
        self.prepare()?;
        self.driver.launch(stop_at_first)?;
        Ok(self.outcome())
    }

    /// Searches for one solution.
    pub fn find_solution(&mut self) -> Result<SolverOutcome<T>, SearchError> {
        self.solve(true)
    }

    /// Enumerates every solution. The returned vector is the recorded
    /// solutions in discovery order.
    pub fn find_all_solutions(&mut self) -> Result<Vec<Solution<T>>, SearchError> {
        self.solve(false)?;
        Ok(self.solutions())
    }

    /// Finds the solution minimizing `objective` and proves it optimal when
    /// the search is left to exhaust the tree.
    pub fn minimize(&mut self, objective: VariableId) -> Result<SolverOutcome<T>, SearchError> {
        self.prepare()?;
        self.driver
            .set_objective_manager(ObjectiveManager::minimize(objective))?;
        self.driver.launch(false)?;
        Ok(self.outcome())
    }

    /// Finds the solution maximizing `objective` and proves it optimal when
    /// the search is left to exhaust the tree.
    pub fn maximize(&mut self, objective: VariableId) -> Result<SolverOutcome<T>, SearchError> {
        self.prepare()?;
        self.driver
            .set_objective_manager(ObjectiveManager::maximize(objective))?;
        self.driver.launch(false)?;
        Ok(self.outcome())
    }

    /// Folds driver measures and recorded solutions into an outcome.
    pub fn outcome(&self) -> SolverOutcome<T> {
        let measures = self.driver.measures().clone();
        match self.recorder.borrow().last().cloned() {
            Some(solution) => {
                if measures.has_objective && measures.optimality_proven {
                    SolverOutcome::optimal(solution, measures)
                } else {
                    SolverOutcome::feasible(solution, measures)
                }
            }
            None => {
                if measures.feasibility == Feasibility::False {
                    SolverOutcome::infeasible(measures)
                } else {
                    SolverOutcome::unknown(measures)
                }
            }
        }
    }

    /// Rewinds the driver (when a resolution already ran) and rearms the
    /// engine handle and the recorder.
    fn prepare(&mut self) -> Result<(), SearchError> {
        if self.solved_once {
            self.driver.reset()?;
        }
        self.driver
            .set_engine(Box::new(EngineHandle::new(self.engine.clone())))?;
        self.recorder.borrow_mut().clear();
        self.solved_once = true;
        Ok(())
    }
}

impl<T> std::fmt::Debug for Solver<T>
where
    T: DomainValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("variables", &self.driver.store().num_variables())
            .field("propagators", &self.engine.borrow().len())
            .field("measures", self.driver.measures())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::arithm::{FixedValue, NotEqual};
    use crate::propagation::linear::SumEquals;
    use fathom_search::result::StopReason;

    type IntegerType = i64;

    fn not_equal_solver() -> (Solver<IntegerType>, VariableId, VariableId) {
        let mut solver = Solver::new();
        let x = solver.new_variable(0, 1);
        let y = solver.new_variable(0, 1);
        solver.post(Box::new(NotEqual::new(x, y)));
        (solver, x, y)
    }

    #[test]
    fn test_find_solution_then_enumerate_on_the_same_solver() {
        let (mut solver, x, y) = not_equal_solver();

        let outcome = solver.find_solution().unwrap();
        assert!(outcome.has_solution());
        let solution = outcome.result().solution().unwrap();
        assert_ne!(solution.value(x), solution.value(y));

        // The same solver resolves again after an internal reset.
        let all = solver.find_all_solutions().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(
            solver.measures().stop_reason,
            Some(StopReason::SearchSpaceExhausted)
        );
    }

    #[test]
    fn test_minimize_reports_an_optimal_outcome() {
        let mut solver = Solver::<IntegerType>::new();
        let x = solver.new_variable(1, 3);
        let y = solver.new_variable(1, 3);
        let z = solver.new_variable(0, 10);
        solver.post(Box::new(SumEquals::new(vec![x, y], z)));

        let outcome = solver.minimize(z).unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(solver.best_objective(), Some(2));
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.value(x), 1);
        assert_eq!(solution.value(y), 1);
        assert_eq!(solution.value(z), 2);
    }

    #[test]
    fn test_maximize_reports_an_optimal_outcome() {
        let mut solver = Solver::<IntegerType>::new();
        let x = solver.new_variable(1, 3);
        let y = solver.new_variable(1, 3);
        let z = solver.new_variable(0, 10);
        solver.post(Box::new(SumEquals::new(vec![x, y], z)));

        let outcome = solver.maximize(z).unwrap();
        assert!(outcome.is_optimal());
        assert_eq!(solver.best_objective(), Some(6));
    }

    #[test]
    fn test_infeasible_problem_reports_infeasible() {
        let mut solver = Solver::<IntegerType>::new();
        let x = solver.new_variable(0, 1);
        solver.post(Box::new(FixedValue::new(x, 0)));
        solver.post(Box::new(FixedValue::new(x, 1)));

        let outcome = solver.find_solution().unwrap();
        assert!(outcome.is_infeasible());
        assert_eq!(
            outcome.stop_reason(),
            Some(StopReason::InitialPropagationFailure)
        );
    }
}
