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

//! End-to-end resolutions through the full stack: facade, fixpoint engine,
//! search driver, monitors.

use fathom_model::index::VariableId;
use fathom_search::branching::bisect::InputOrderBisect;
use fathom_search::branching::enumerate::InputOrderEnumerate;
use fathom_search::branching::first_fail::FirstFailMinValue;
use fathom_search::measures::Feasibility;
use fathom_search::monitor::fail_limit::FailLimitMonitor;
use fathom_search::monitor::node_limit::NodeLimitMonitor;
use fathom_search::monitor::restart::GeometricRestartMonitor;
use fathom_search::monitor::time_limit::TimeLimitMonitor;
use fathom_search::result::StopReason;
use fathom_solver::propagation::arithm::{FixedValue, LowerBound, NotEqual};
use fathom_solver::propagation::linear::SumEquals;
use fathom_solver::solver::Solver;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type IntegerType = i64;

/// Two 0/1 variables constrained to differ.
fn not_equal_solver() -> (Solver<IntegerType>, VariableId, VariableId) {
    let mut solver = Solver::new();
    let x = solver.new_variable(0, 1);
    let y = solver.new_variable(0, 1);
    solver.post(Box::new(NotEqual::new(x, y)));
    (solver, x, y)
}

#[test]
fn test_single_solution_satisfaction() {
    let (mut solver, x, y) = not_equal_solver();

    let outcome = solver.find_solution().unwrap();

    assert!(outcome.has_solution());
    assert_eq!(outcome.stop_reason(), Some(StopReason::FirstSolution));
    assert_eq!(outcome.measures().feasibility, Feasibility::True);
    assert_eq!(outcome.measures().solution_count, 1);

    let solution = outcome.result().solution().unwrap();
    assert_eq!(solution.value(x), 0);
    assert_eq!(solution.value(y), 1);
}

#[test]
fn test_enumerate_all_solutions() {
    let (mut solver, x, y) = not_equal_solver();

    let solutions = solver.find_all_solutions().unwrap();

    let values: Vec<(IntegerType, IntegerType)> = solutions
        .iter()
        .map(|s| (s.value(x), s.value(y)))
        .collect();
    assert_eq!(values, vec![(0, 1), (1, 0)]);
    assert_eq!(
        solver.measures().stop_reason,
        Some(StopReason::SearchSpaceExhausted)
    );
    assert_eq!(solver.measures().feasibility, Feasibility::True);
}

#[test]
fn test_infeasible_at_initial_propagation() {
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
    assert_eq!(outcome.measures().feasibility, Feasibility::False);
    assert_eq!(outcome.measures().solution_count, 0);
}

#[test]
fn test_minimize_proves_optimality() {
    let mut solver = Solver::<IntegerType>::new();
    let x = solver.new_variable(1, 3);
    let y = solver.new_variable(1, 3);
    let z = solver.new_variable(0, 10);
    solver.post(Box::new(SumEquals::new(vec![x, y], z)));
    solver.post(Box::new(LowerBound::new(z, 2)));

    let outcome = solver.minimize(z).unwrap();

    assert!(outcome.is_optimal());
    assert_eq!(solver.best_objective(), Some(2));
    assert!(outcome.measures().optimality_proven);
    assert!(outcome
        .stop_reason()
        .is_some_and(|reason| reason.proves_exhaustion()));

    let solution = outcome.result().solution().unwrap();
    assert_eq!(solution.value(x) + solution.value(y), 2);
    assert_eq!(solution.value(z), 2);
}

#[test]
fn test_node_limit_interrupts_after_a_solution() {
    // Two free 0/1 variables: the third opened node is the first leaf.
    let mut solver = Solver::<IntegerType>::new();
    solver.new_variable(0, 1);
    solver.new_variable(0, 1);
    solver.plug_monitor(Rc::new(RefCell::new(NodeLimitMonitor::new(3))));

    let outcome = solver.solve(false).unwrap();

    assert_eq!(outcome.stop_reason(), Some(StopReason::LimitReached));
    assert_eq!(outcome.measures().node_count, 3);
    assert_eq!(outcome.measures().solution_count, 1);
    assert_eq!(outcome.measures().feasibility, Feasibility::True);
    assert!(!outcome.measures().optimality_proven);
}

#[test]
fn test_node_limit_before_any_solution_leaves_feasibility_open() {
    let (mut solver, _, _) = not_equal_solver();
    solver.plug_monitor(Rc::new(RefCell::new(NodeLimitMonitor::new(1))));

    let outcome = solver.solve(false).unwrap();

    assert_eq!(outcome.stop_reason(), Some(StopReason::LimitReached));
    assert_eq!(outcome.measures().solution_count, 0);
    assert_eq!(outcome.measures().feasibility, Feasibility::Unknown);
}

#[test]
fn test_restart_after_each_solution_with_nogoods_enumerates_everything() {
    let (mut solver, x, y) = not_equal_solver();
    solver.restart_after_each_solution(true);
    solver.record_solution_nogoods();

    let solutions = solver.find_all_solutions().unwrap();

    let mut values: Vec<(IntegerType, IntegerType)> = solutions
        .iter()
        .map(|s| (s.value(x), s.value(y)))
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![(0, 1), (1, 0)]);

    let measures = solver.measures();
    assert_eq!(measures.solution_count, 2);
    assert_eq!(measures.restart_count, measures.solution_count);
    assert_eq!(measures.stop_reason, Some(StopReason::SearchSpaceExhausted));
}

#[test]
fn test_first_fail_branches_on_the_tightest_variable() {
    let mut solver = Solver::<IntegerType>::new();
    let x = solver.new_variable(0, 5);
    let y = solver.new_variable(0, 1);
    solver.post(Box::new(NotEqual::new(x, y)));
    solver.set_strategy(Box::new(FirstFailMinValue::new())).unwrap();

    let outcome = solver.find_solution().unwrap();

    let solution = outcome.result().solution().unwrap();
    // y (two values) is decided first, then propagation bars 0 from x.
    assert_eq!(solution.value(y), 0);
    assert_eq!(solution.value(x), 1);
}

#[test]
fn test_bisection_enumerates_the_same_solution_set() {
    let mut solver = Solver::<IntegerType>::new();
    let x = solver.new_variable(0, 3);
    let y = solver.new_variable(0, 3);
    let z = solver.new_variable(0, 6);
    solver.post(Box::new(SumEquals::new(vec![x, y], z)));
    solver.post(Box::new(FixedValue::new(z, 3)));
    solver.set_strategy(Box::new(InputOrderBisect::new())).unwrap();

    let solutions = solver.find_all_solutions().unwrap();

    let mut values: Vec<(IntegerType, IntegerType)> = solutions
        .iter()
        .map(|s| (s.value(x), s.value(y)))
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![(0, 3), (1, 2), (2, 1), (3, 0)]);
}

#[test]
fn test_value_enumeration_revisits_the_same_node_downward() {
    let (mut solver, x, y) = not_equal_solver();
    solver
        .set_strategy(Box::new(InputOrderEnumerate::new()))
        .unwrap();

    let solutions = solver.find_all_solutions().unwrap();

    let values: Vec<(IntegerType, IntegerType)> = solutions
        .iter()
        .map(|s| (s.value(x), s.value(y)))
        .collect();
    assert_eq!(values, vec![(0, 1), (1, 0)]);
    // One decision per variable: both solutions live at depth 1.
    assert_eq!(solver.measures().peak_depth, 1);
}

#[test]
fn test_time_limit_with_zero_budget_stops_immediately() {
    let (mut solver, _, _) = not_equal_solver();
    solver.plug_monitor(Rc::new(RefCell::new(
        TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0),
    )));

    let outcome = solver.solve(false).unwrap();

    assert_eq!(outcome.stop_reason(), Some(StopReason::LimitReached));
    assert_eq!(outcome.measures().feasibility, Feasibility::Unknown);
}

#[test]
fn test_restart_policy_keeps_the_incumbent_but_cannot_prove_optimality() {
    // Aggressive restarts without learning revisit refuted prefixes forever;
    // the fail budget is the backstop that ends the run.
    let mut solver = Solver::<IntegerType>::new();
    let x = solver.new_variable(1, 3);
    let y = solver.new_variable(1, 3);
    let z = solver.new_variable(0, 10);
    solver.post(Box::new(SumEquals::new(vec![x, y], z)));
    solver.plug_monitor(Rc::new(RefCell::new(GeometricRestartMonitor::new(1, 1.0))));
    solver.plug_monitor(Rc::new(RefCell::new(FailLimitMonitor::new(20))));

    let outcome = solver.minimize(z).unwrap();

    assert!(outcome.has_solution());
    assert!(!outcome.is_optimal());
    assert_eq!(solver.best_objective(), Some(2));
    assert_eq!(outcome.stop_reason(), Some(StopReason::LimitReached));
    assert!(outcome.measures().restart_count >= 1);
}

#[test]
fn test_back_to_back_resolutions_reproduce_the_measures() {
    let (mut solver, _, _) = not_equal_solver();

    solver.find_all_solutions().unwrap();
    let first = solver.measures().clone();

    solver.find_all_solutions().unwrap();
    let second = solver.measures().clone();

    assert_eq!(first.solution_count, second.solution_count);
    assert_eq!(first.node_count, second.node_count);
    assert_eq!(first.backtrack_count, second.backtrack_count);
    assert_eq!(first.fail_count, second.fail_count);
    assert_eq!(first.peak_depth, second.peak_depth);
    assert_eq!(first.stop_reason, second.stop_reason);
}

#[test]
fn test_trail_is_balanced_after_an_exhausted_enumeration() {
    let (mut solver, _, _) = not_equal_solver();
    solver.find_all_solutions().unwrap();

    // Exhaustion pops back below the post-propagation root; only the world
    // pushed before the initial propagation remains.
    assert_eq!(solver.driver().store().world_index(), 1);
    assert_eq!(solver.driver().current_depth(), 0);
}
