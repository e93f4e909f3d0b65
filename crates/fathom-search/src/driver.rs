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

//! # The Search Loop
//!
//! A recursive depth-first tree search, flattened: every iteration of the
//! loop runs exactly one transition selected by a state tag, so the host
//! stack stays O(1) no matter how deep the tree grows, and stopping,
//! restarting or resuming the search is a matter of replacing the tag.
//!
//! One resolution walks through:
//! 1. `Init` — remember the root world.
//! 2. `InitialPropagation` — filter the root state; two worlds are pushed so
//!    restarts can rewind to the post-propagation state without losing it.
//! 3. `OpenNode` — a solution if nothing is left to decide, otherwise take
//!    the strategy's next decision and go down.
//! 4. `DownLeft`/`DownRight` — open a world, apply the branch, post the
//!    objective cut, propagate; contradiction sends the loop to the
//!    configured fail state.
//! 5. `UpBranch` — roll back, try the next branch of the top decision or
//!    free it and climb further; an empty chain means exhaustion.
//! 6. `Restart` — rewind to the post-propagation world, free the chain.
//!
//! Monitors bracket every transition and steer the loop exclusively through
//! queued commands, which the driver drains between transitions.

use crate::branching::input_order::InputOrderMinValue;
use crate::branching::{Branching, BranchingStrategy};
use crate::decision::DecisionChain;
use crate::engine::{Contradiction, NoPropagationEngine, PropagationEngine};
use crate::error::SearchError;
use crate::measures::{Feasibility, SearchMeasures};
use crate::monitor::list::{MonitorHandle, MonitorList};
use crate::monitor::search_monitor::{SearchCommands, SearchContext};
use crate::objective::{CutOutcome, ObjectiveManager};
use crate::result::StopReason;
use crate::step::SearchStep;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;
use std::time::Instant;

/// Which branch of the top decision a down transition applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchSide {
    Left,
    Right,
}

/// The search driver: owns the store, the decision chain and the measures,
/// and walks the search tree by dispatching one transition per loop
/// iteration.
pub struct SearchLoop<T> {
    store: DomainStore<T>,
    engine: Box<dyn PropagationEngine<T>>,
    strategy: Box<dyn BranchingStrategy<T>>,
    monitors: MonitorList<T>,
    objective: ObjectiveManager<T>,
    measures: SearchMeasures,
    chain: DecisionChain<T>,
    commands: SearchCommands,
    next_state: SearchStep,
    alive: bool,
    /// Bumped on every branching transition and on reset, so observers can
    /// tell whether the world changed since they last looked.
    time_stamp: u64,
    /// The world before the initial propagation; `None` until a resolution
    /// ran.
    root_world: Option<usize>,
    /// The world right after the initial propagation; restarts rewind here.
    search_world: Option<usize>,
    /// How many worlds the next up transition pops. Normally 1; a
    /// backjumping hint raises it for one transition.
    jump_to: usize,
    has_reached_limit: bool,
    stop_at_first_solution: bool,
    state_after_solution: SearchStep,
    state_after_fail: SearchStep,
    start_time: Instant,
}

impl<T> SearchLoop<T>
where
    T: DomainValue,
{
    /// Creates a driver over `store` with an inert engine, the input-order
    /// strategy and no objective. Install the real collaborators with
    /// `set_engine`, `set_strategy` and `set_objective_manager`.
    pub fn new(store: DomainStore<T>) -> Self {
        Self {
            store,
            engine: Box::new(NoPropagationEngine),
            strategy: Box::new(InputOrderMinValue::new()),
            monitors: MonitorList::new(),
            objective: ObjectiveManager::satisfaction(),
            measures: SearchMeasures::new(),
            chain: DecisionChain::new(),
            commands: SearchCommands::new(),
            next_state: SearchStep::Init,
            alive: false,
            time_stamp: 0,
            root_world: None,
            search_world: None,
            jump_to: 1,
            has_reached_limit: false,
            stop_at_first_solution: false,
            state_after_solution: SearchStep::UpBranch,
            state_after_fail: SearchStep::UpBranch,
            start_time: Instant::now(),
        }
    }

    /// Replaces the propagation engine. Valid before `launch` or after
    /// `reset`.
    pub fn set_engine(&mut self, engine: Box<dyn PropagationEngine<T>>) -> Result<(), SearchError> {
        if self.next_state != SearchStep::Init {
            return Err(SearchError::NotInitialized);
        }
        self.engine = engine;
        Ok(())
    }

    /// Replaces the branching strategy. Valid before `launch` or after
    /// `reset`.
    pub fn set_strategy(
        &mut self,
        strategy: Box<dyn BranchingStrategy<T>>,
    ) -> Result<(), SearchError> {
        if self.next_state != SearchStep::Init {
            return Err(SearchError::NotInitialized);
        }
        self.strategy = strategy;
        Ok(())
    }

    /// Installs the objective manager and declares the objective on the
    /// measures. Valid before `launch` or after `reset`.
    pub fn set_objective_manager(
        &mut self,
        objective: ObjectiveManager<T>,
    ) -> Result<(), SearchError> {
        if self.next_state != SearchStep::Init {
            return Err(SearchError::NotInitialized);
        }
        if objective.is_optimization() {
            self.measures.declare_objective();
        }
        self.objective = objective;
        Ok(())
    }

    /// Appends a monitor unless the same handle is already plugged.
    /// Returns `true` if the monitor was added.
    pub fn plug_monitor(&mut self, monitor: MonitorHandle<T>) -> bool {
        self.monitors.plug(monitor)
    }

    /// After each solution, go back up (`false`, the default) or restart
    /// from the post-propagation root (`true`).
    pub fn restart_after_each_solution(&mut self, does: bool) {
        self.state_after_solution = if does {
            SearchStep::Restart
        } else {
            SearchStep::UpBranch
        };
    }

    /// After each failed branch, go back up (`false`, the default) or
    /// restart from the post-propagation root (`true`).
    pub fn restart_after_each_fail(&mut self, does: bool) {
        self.state_after_fail = if does {
            SearchStep::Restart
        } else {
            SearchStep::UpBranch
        };
    }

    /// Backjumping hint: the next up transition pops `gap` worlds (and
    /// abandons the decisions jumped over) instead of one.
    pub fn override_previous_world(&mut self, gap: usize) {
        self.jump_to = gap;
    }

    /// Solves the problem held by the store.
    ///
    /// Runs the dispatch loop until a transition stops the search, then
    /// closes the resolution and returns. The verdict is on
    /// [`measures`](Self::measures). Fails with
    /// [`SearchError::NotInitialized`] when a resolution already ran and
    /// `reset` was not called.
    pub fn launch(&mut self, stop_at_first: bool) -> Result<(), SearchError> {
        if self.next_state != SearchStep::Init {
            return Err(SearchError::NotInitialized);
        }
        self.stop_at_first_solution = stop_at_first;
        self.start_time = Instant::now();
        self.run_loop()
    }

    /// Makes the driver solvable again after a resolution:
    /// rewinds the trail to the root world, drops the objective manager,
    /// zeroes the measures and replaces the engine by an inert one.
    /// Idempotent when no resolution ran.
    pub fn reset(&mut self) -> Result<(), SearchError> {
        if let Some(root_world) = self.root_world {
            self.next_state = SearchStep::Init;
            self.store.world_pop_until(root_world)?;
            self.objective = ObjectiveManager::satisfaction();
            self.engine = Box::new(NoPropagationEngine);
            self.measures.reset();
            self.chain.clear();
            self.commands = SearchCommands::new();
            self.time_stamp += 1;
            self.root_world = None;
            self.search_world = None;
            self.has_reached_limit = false;
            self.jump_to = 1;
            self.stop_at_first_solution = false;
        }
        Ok(())
    }

    /// Stops the search: the current transition finishes, no further one
    /// runs, and the loop proceeds to close. Idempotent; only the first
    /// interrupt of a resolution records its reason and notifies monitors.
    pub fn interrupt(&mut self, reason: StopReason) {
        if self.measures.stop_reason.is_some() {
            self.alive = false;
            return;
        }
        log::debug!("search interruption: {}", reason.message());
        self.measures.record_stop_reason(reason);
        self.next_state = SearchStep::Resume;
        self.alive = false;
        self.fire_after_interrupt();
    }

    /// Marks the sticky limit flag and interrupts with
    /// [`StopReason::LimitReached`].
    pub fn reach_limit(&mut self) {
        self.has_reached_limit = true;
        self.interrupt(StopReason::LimitReached);
    }

    /// Makes the next transition a restart.
    pub fn restart(&mut self) {
        self.next_state = SearchStep::Restart;
    }

    /// Escape hatch for external resolution drivers that pause and resume
    /// the loop.
    pub fn force_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Rewinds the trail to the world right after the initial propagation
    /// and frees the whole decision chain.
    pub fn restore_root_node(&mut self) -> Result<(), SearchError> {
        if let Some(search_world) = self.search_world {
            self.store.world_pop_until(search_world)?;
        }
        // Force delta consumers to re-read the world.
        self.time_stamp += 1;
        self.chain.clear();
        Ok(())
    }

    /// Returns the store the search mutates.
    #[inline]
    pub fn store(&self) -> &DomainStore<T> {
        &self.store
    }

    /// Returns the store mutably. Meant for posting root constraints before
    /// the launch; mutating the store mid-resolution voids the trail
    /// bookkeeping.
    #[inline]
    pub fn store_mut(&mut self) -> &mut DomainStore<T> {
        &mut self.store
    }

    /// Returns the measures of the current (or last) resolution.
    #[inline]
    pub fn measures(&self) -> &SearchMeasures {
        &self.measures
    }

    /// Returns the objective manager.
    #[inline]
    pub fn objective(&self) -> &ObjectiveManager<T> {
        &self.objective
    }

    /// Returns the state tag the loop dispatches next.
    #[inline]
    pub fn next_step(&self) -> SearchStep {
        self.next_state
    }

    /// Returns the driver time stamp.
    #[inline]
    pub fn time_stamp(&self) -> u64 {
        self.time_stamp
    }

    /// Returns `true` once a limit monitor stopped the resolution.
    #[inline]
    pub fn has_reached_limit(&self) -> bool {
        self.has_reached_limit
    }

    /// Walks the decision chain and returns the current depth.
    pub fn current_depth(&self) -> usize {
        self.chain.depth()
    }

    /// Renders the decision path from the current node back to the root.
    pub fn decision_path(&self) -> String {
        self.chain.describe_path()
    }

    // --- the dispatch loop -------------------------------------------------

    fn run_loop(&mut self) -> Result<(), SearchError> {
        self.alive = true;
        while self.alive {
            let step = self.next_state;
            self.fire_before(step);
            match step {
                SearchStep::Init => self.initialize(),
                SearchStep::InitialPropagation => self.initial_propagation(),
                SearchStep::OpenNode => self.open_node(),
                SearchStep::DownLeft => self.down_branch(BranchSide::Left),
                SearchStep::DownRight => self.down_branch(BranchSide::Right),
                SearchStep::UpBranch => self.up_branch(),
                SearchStep::Restart => self.restart_search()?,
                SearchStep::Resume => {
                    self.alive = false;
                }
            }
            self.fire_after(step);
            self.drain_commands();
        }

        self.fire_before_close();
        self.close();
        self.fire_after_close();
        Ok(())
    }

    fn initialize(&mut self) {
        self.root_world = Some(self.store.world_index());
        self.next_state = SearchStep::InitialPropagation;
    }

    /// Filters the root state. Two worlds are pushed on success so that a
    /// restart can rewind to the post-propagation state while `reset` can
    /// still reach the pre-propagation one.
    fn initial_propagation(&mut self) {
        self.store.world_push();
        match self.engine.propagate(&mut self.store) {
            Ok(()) => {
                self.store.world_push();
                self.search_world = Some(self.store.world_index());
                self.next_state = SearchStep::OpenNode;
            }
            Err(Contradiction) => {
                self.interrupt(StopReason::InitialPropagationFailure);
            }
        }
    }

    fn open_node(&mut self) {
        self.measures.on_node();
        self.measures.on_depth_update(self.chain.depth() as u64);
        match self.strategy.next_decision(&self.store) {
            Branching::Decision(decision) => {
                self.chain.push(decision);
                self.next_state = SearchStep::DownLeft;
            }
            Branching::AllInstantiated => self.record_solution(),
            Branching::Inconsistent => self.interrupt(StopReason::StrategyInconsistency),
        }
    }

    fn record_solution(&mut self) {
        self.measures.on_solution();
        self.objective.update_best(&self.store);
        self.fire_on_solution();
        if self.stop_at_first_solution {
            self.interrupt(StopReason::FirstSolution);
            return;
        }
        match self.objective.post_cut(&mut self.store) {
            CutOutcome::Applied => self.next_state = self.state_after_solution,
            CutOutcome::Contradiction => {
                if self.chain.is_root() {
                    // Nothing above the root improves on the incumbent.
                    self.interrupt(StopReason::CutFailure);
                } else {
                    self.next_state = SearchStep::UpBranch;
                }
            }
        }
    }

    fn down_branch(&mut self, side: BranchSide) {
        self.time_stamp += 1;
        self.store.world_push();
        match self.apply_branch_and_propagate(side) {
            Ok(()) => self.next_state = SearchStep::OpenNode,
            Err(Contradiction) => {
                self.measures.on_fail();
                self.jump_to = 1;
                self.fire_on_contradiction();
                self.next_state = self.state_after_fail;
            }
        }
    }

    /// The branch is consumed before the cut and the filtering run, so a
    /// contradictory cut cannot replay the same branch forever.
    fn apply_branch_and_propagate(&mut self, side: BranchSide) -> Result<(), Contradiction> {
        debug_assert!(
            !self.chain.is_root(),
            "dispatched a down transition with no decision on the chain"
        );
        let decision = self.chain.top_mut().ok_or(Contradiction)?;
        match side {
            BranchSide::Left => decision.apply_left(&mut self.store)?,
            BranchSide::Right => decision.apply_right(&mut self.store)?,
        }
        self.objective.post_cut(&mut self.store).into_result()?;
        self.engine.propagate(&mut self.store)
    }

    fn up_branch(&mut self) {
        self.measures.on_backtrack();
        let jump = self.jump_to.max(1);
        self.jump_to = 1;
        for _ in 0..jump {
            self.store.world_pop();
        }
        // Decisions jumped over are abandoned along with their worlds.
        for _ in 1..jump {
            self.chain.pop();
        }
        if self.chain.is_root() {
            self.interrupt(StopReason::SearchSpaceExhausted);
        } else if self.chain.top().is_some_and(|d| d.has_next_branch()) {
            self.next_state = SearchStep::DownRight;
        } else {
            self.chain.pop();
            self.next_state = SearchStep::UpBranch;
        }
    }

    fn restart_search(&mut self) -> Result<(), SearchError> {
        self.measures.on_restart();
        self.restore_root_node()?;
        self.next_state = SearchStep::OpenNode;
        Ok(())
    }

    /// Fills the feasibility/optimality verdict from what the resolution
    /// proved.
    fn close(&mut self) {
        self.measures.set_total_time(self.start_time.elapsed());
        if self.measures.solution_count > 0 {
            self.measures.feasibility = Feasibility::True;
            if self.objective.is_optimization() {
                self.measures.optimality_proven = self
                    .measures
                    .stop_reason
                    .is_some_and(|reason| reason.proves_exhaustion());
            }
        } else {
            match self.measures.stop_reason {
                Some(StopReason::SearchSpaceExhausted)
                | Some(StopReason::InitialPropagationFailure) => {
                    self.measures.feasibility = Feasibility::False;
                }
                _ => {
                    self.measures.feasibility = Feasibility::Unknown;
                    self.measures.optimality_proven = false;
                }
            }
        }
    }

    /// Applies the commands monitors queued during the last dispatch, in
    /// escalation order: a restart request yields to a limit, a limit to an
    /// explicit interrupt.
    fn drain_commands(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        if commands.restart {
            self.restart();
        }
        if commands.limit {
            self.reach_limit();
        }
        if let Some(reason) = commands.interrupt {
            self.interrupt(reason);
        }
    }

    // --- monitor dispatch --------------------------------------------------

    fn fire_before(&mut self, step: SearchStep) {
        let depth = self.chain.depth();
        let mut ctx = SearchContext::new(
            &self.measures,
            &self.store,
            self.time_stamp,
            depth,
            &mut self.commands,
        );
        match step {
            SearchStep::Init => self.monitors.before_initialize(&mut ctx),
            SearchStep::InitialPropagation => self.monitors.before_initial_propagation(&mut ctx),
            SearchStep::OpenNode => self.monitors.before_open_node(&mut ctx),
            SearchStep::DownLeft => self.monitors.before_down_left(&mut ctx),
            SearchStep::DownRight => self.monitors.before_down_right(&mut ctx),
            SearchStep::UpBranch => self.monitors.before_up_branch(&mut ctx),
            SearchStep::Restart => self.monitors.before_restart(&mut ctx),
            SearchStep::Resume => {}
        }
    }

    fn fire_after(&mut self, step: SearchStep) {
        let depth = self.chain.depth();
        let mut ctx = SearchContext::new(
            &self.measures,
            &self.store,
            self.time_stamp,
            depth,
            &mut self.commands,
        );
        match step {
            SearchStep::Init => self.monitors.after_initialize(&mut ctx),
            SearchStep::InitialPropagation => self.monitors.after_initial_propagation(&mut ctx),
            SearchStep::OpenNode => self.monitors.after_open_node(&mut ctx),
            SearchStep::DownLeft => self.monitors.after_down_left(&mut ctx),
            SearchStep::DownRight => self.monitors.after_down_right(&mut ctx),
            SearchStep::UpBranch => self.monitors.after_up_branch(&mut ctx),
            SearchStep::Restart => self.monitors.after_restart(&mut ctx),
            SearchStep::Resume => {}
        }
    }

    fn fire_on_solution(&mut self) {
        let depth = self.chain.depth();
        let mut ctx = SearchContext::new(
            &self.measures,
            &self.store,
            self.time_stamp,
            depth,
            &mut self.commands,
        );
        self.monitors.on_solution(&mut ctx);
    }

    fn fire_on_contradiction(&mut self) {
        let depth = self.chain.depth();
        let mut ctx = SearchContext::new(
            &self.measures,
            &self.store,
            self.time_stamp,
            depth,
            &mut self.commands,
        );
        self.monitors.on_contradiction(&mut ctx);
    }

    fn fire_after_interrupt(&mut self) {
        let depth = self.chain.depth();
        let mut ctx = SearchContext::new(
            &self.measures,
            &self.store,
            self.time_stamp,
            depth,
            &mut self.commands,
        );
        self.monitors.after_interrupt(&mut ctx);
    }

    fn fire_before_close(&mut self) {
        let depth = self.chain.depth();
        let mut ctx = SearchContext::new(
            &self.measures,
            &self.store,
            self.time_stamp,
            depth,
            &mut self.commands,
        );
        self.monitors.before_close(&mut ctx);
    }

    fn fire_after_close(&mut self) {
        let depth = self.chain.depth();
        let mut ctx = SearchContext::new(
            &self.measures,
            &self.store,
            self.time_stamp,
            depth,
            &mut self.commands,
        );
        self.monitors.after_close(&mut ctx);
    }
}

impl<T> std::fmt::Debug for SearchLoop<T>
where
    T: DomainValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchLoop")
            .field("next_state", &self.next_state)
            .field("alive", &self.alive)
            .field("time_stamp", &self.time_stamp)
            .field("root_world", &self.root_world)
            .field("search_world", &self.search_world)
            .field("depth", &self.chain.depth())
            .field("measures", &self.measures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::node_limit::NodeLimitMonitor;
    use crate::monitor::search_monitor::SearchMonitor;
    use crate::monitor::solution::SolutionRecorder;
    use crate::monitor::solution_limit::SolutionLimitMonitor;
    use fathom_model::index::VariableId;
    use std::cell::RefCell;
    use std::rc::Rc;

    type IntegerType = i64;

    /// A fixpoint engine over binary disequalities, enough to drive the loop
    /// through real propagation in tests.
    struct PairwiseNotEqual {
        pairs: Vec<(VariableId, VariableId)>,
    }

    impl PairwiseNotEqual {
        fn prune(
            store: &mut DomainStore<IntegerType>,
            from: VariableId,
            to: VariableId,
        ) -> Result<bool, Contradiction> {
            match store.value(from) {
                Some(v) => Ok(store.try_remove(to, v)?),
                None => Ok(false),
            }
        }
    }

    impl PropagationEngine<IntegerType> for PairwiseNotEqual {
        fn name(&self) -> &str {
            "PairwiseNotEqual"
        }

        fn propagate(
            &mut self,
            store: &mut DomainStore<IntegerType>,
        ) -> Result<(), Contradiction> {
            loop {
                let mut changed = false;
                for &(x, y) in &self.pairs {
                    changed |= Self::prune(store, x, y)?;
                    changed |= Self::prune(store, y, x)?;
                }
                if !changed {
                    return Ok(());
                }
            }
        }
    }

    struct FailingEngine;

    impl PropagationEngine<IntegerType> for FailingEngine {
        fn name(&self) -> &str {
            "FailingEngine"
        }

        fn propagate(
            &mut self,
            _store: &mut DomainStore<IntegerType>,
        ) -> Result<(), Contradiction> {
            Err(Contradiction)
        }
    }

    struct InconsistentStrategy;

    impl BranchingStrategy<IntegerType> for InconsistentStrategy {
        fn name(&self) -> &str {
            "InconsistentStrategy"
        }

        fn next_decision(&mut self, _store: &DomainStore<IntegerType>) -> Branching<IntegerType> {
            Branching::Inconsistent
        }
    }

    /// Records every dispatched hook name, for ordering and pairing checks.
    struct JournalMonitor {
        journal: Rc<RefCell<Vec<&'static str>>>,
    }

    impl SearchMonitor<IntegerType> for JournalMonitor {
        fn name(&self) -> &str {
            "JournalMonitor"
        }

        fn before_initialize(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_initialize");
        }
        fn after_initialize(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_initialize");
        }
        fn before_initial_propagation(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_initial_propagation");
        }
        fn after_initial_propagation(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_initial_propagation");
        }
        fn before_open_node(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_open_node");
        }
        fn after_open_node(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_open_node");
        }
        fn before_down_left(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_down_left");
        }
        fn after_down_left(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_down_left");
        }
        fn before_down_right(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_down_right");
        }
        fn after_down_right(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_down_right");
        }
        fn before_up_branch(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_up_branch");
        }
        fn after_up_branch(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_up_branch");
        }
        fn before_restart(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_restart");
        }
        fn after_restart(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_restart");
        }
        fn before_close(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("before_close");
        }
        fn after_close(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_close");
        }
        fn on_solution(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("on_solution");
        }
        fn on_contradiction(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("on_contradiction");
        }
        fn after_interrupt(&mut self, _: &mut SearchContext<'_, IntegerType>) {
            self.journal.borrow_mut().push("after_interrupt");
        }
    }

    /// Tracks the deepest `ctx.depth()` seen by any hook.
    struct DepthProbe {
        max_depth: Rc<RefCell<usize>>,
        stamps: Rc<RefCell<Vec<u64>>>,
    }

    impl SearchMonitor<IntegerType> for DepthProbe {
        fn name(&self) -> &str {
            "DepthProbe"
        }

        fn after_open_node(&mut self, ctx: &mut SearchContext<'_, IntegerType>) {
            let mut max = self.max_depth.borrow_mut();
            *max = (*max).max(ctx.depth());
            self.stamps.borrow_mut().push(ctx.time_stamp());
        }

        fn after_down_left(&mut self, ctx: &mut SearchContext<'_, IntegerType>) {
            self.stamps.borrow_mut().push(ctx.time_stamp());
        }

        fn after_down_right(&mut self, ctx: &mut SearchContext<'_, IntegerType>) {
            self.stamps.borrow_mut().push(ctx.time_stamp());
        }
    }

    /// Two 0/1 variables constrained to differ: the canonical two-solution
    /// problem.
    fn not_equal_driver() -> SearchLoop<IntegerType> {
        let mut store = DomainStore::new();
        let x = store.new_variable(0, 1);
        let y = store.new_variable(0, 1);
        let mut driver = SearchLoop::new(store);
        driver
            .set_engine(Box::new(PairwiseNotEqual {
                pairs: vec![(x, y)],
            }))
            .unwrap();
        driver
    }

    #[test]
    fn test_stop_at_first_solution() {
        let mut driver = not_equal_driver();
        let recorder = Rc::new(RefCell::new(SolutionRecorder::new()));
        driver.plug_monitor(recorder.clone());

        driver.launch(true).unwrap();

        let measures = driver.measures();
        assert_eq!(measures.solution_count, 1);
        assert_eq!(measures.feasibility, Feasibility::True);
        assert_eq!(measures.stop_reason, Some(StopReason::FirstSolution));

        let recorder = recorder.borrow();
        let solution = recorder.last().unwrap();
        assert_eq!(solution.value(VariableId::new(0)), 0);
        assert_eq!(solution.value(VariableId::new(1)), 1);
    }

    #[test]
    fn test_enumerate_all_solutions() {
        let mut driver = not_equal_driver();
        let recorder = Rc::new(RefCell::new(SolutionRecorder::new()));
        driver.plug_monitor(recorder.clone());

        driver.launch(false).unwrap();

        let measures = driver.measures();
        assert_eq!(measures.solution_count, 2);
        assert_eq!(measures.feasibility, Feasibility::True);
        assert_eq!(measures.stop_reason, Some(StopReason::SearchSpaceExhausted));
        assert_eq!(measures.node_count, 3);
        assert_eq!(measures.peak_depth, 1);

        let recorder = recorder.borrow();
        let values: Vec<(IntegerType, IntegerType)> = recorder
            .solutions()
            .iter()
            .map(|s| (s.value(VariableId::new(0)), s.value(VariableId::new(1))))
            .collect();
        assert_eq!(values, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_second_launch_without_reset_fails() {
        let mut driver = not_equal_driver();
        driver.launch(false).unwrap();
        assert_eq!(driver.launch(false), Err(SearchError::NotInitialized));
    }

    #[test]
    fn test_initial_propagation_failure_proves_infeasibility() {
        let mut store = DomainStore::new();
        store.new_variable(0, 1);
        let mut driver = SearchLoop::new(store);
        driver.set_engine(Box::new(FailingEngine)).unwrap();

        driver.launch(false).unwrap();

        let measures = driver.measures();
        assert_eq!(measures.solution_count, 0);
        assert_eq!(measures.feasibility, Feasibility::False);
        assert_eq!(
            measures.stop_reason,
            Some(StopReason::InitialPropagationFailure)
        );
    }

    #[test]
    fn test_inconsistent_strategy_leaves_feasibility_open() {
        let mut store = DomainStore::new();
        store.new_variable(0, 1);
        let mut driver = SearchLoop::new(store);
        driver.set_strategy(Box::new(InconsistentStrategy)).unwrap();

        driver.launch(false).unwrap();

        let measures = driver.measures();
        assert_eq!(
            measures.stop_reason,
            Some(StopReason::StrategyInconsistency)
        );
        assert_eq!(measures.feasibility, Feasibility::Unknown);
    }

    #[test]
    fn test_monitor_hooks_are_paired() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut driver = not_equal_driver();
        driver.plug_monitor(Rc::new(RefCell::new(JournalMonitor {
            journal: journal.clone(),
        })));

        driver.launch(false).unwrap();

        // Every `before_X` must be closed by its `after_X` before the next
        // `before_Y` starts.
        let journal = journal.borrow();
        let mut open: Option<&str> = None;
        for entry in journal.iter() {
            if let Some(rest) = entry.strip_prefix("before_") {
                assert!(open.is_none(), "unclosed transition before {}", entry);
                open = Some(rest);
            } else if let Some(rest) = entry.strip_prefix("after_") {
                if rest != "interrupt" {
                    assert_eq!(open, Some(rest), "mismatched {}", entry);
                    open = None;
                }
            }
        }
        assert!(open.is_none());
        assert_eq!(journal.first(), Some(&"before_initialize"));
        assert_eq!(journal.last(), Some(&"after_close"));
        // The exhaustion interrupt fires inside the final up transition.
        assert!(journal.contains(&"after_interrupt"));
    }

    #[test]
    fn test_interrupt_notifies_monitors_once() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut driver = not_equal_driver();
        driver.plug_monitor(Rc::new(RefCell::new(JournalMonitor {
            journal: journal.clone(),
        })));

        driver.interrupt(StopReason::LimitReached);
        driver.interrupt(StopReason::SearchSpaceExhausted);

        let count = journal
            .borrow()
            .iter()
            .filter(|e| **e == "after_interrupt")
            .count();
        assert_eq!(count, 1);
        assert_eq!(
            driver.measures().stop_reason,
            Some(StopReason::LimitReached)
        );
    }

    #[test]
    fn test_plugging_a_monitor_twice_is_a_no_op() {
        let mut driver = not_equal_driver();
        let recorder: MonitorHandle<IntegerType> =
            Rc::new(RefCell::new(SolutionRecorder::new()));
        assert!(driver.plug_monitor(recorder.clone()));
        assert!(!driver.plug_monitor(recorder));
    }

    #[test]
    fn test_node_limit_stops_the_search() {
        let mut driver = not_equal_driver();
        driver.plug_monitor(Rc::new(RefCell::new(NodeLimitMonitor::new(1))));

        driver.launch(false).unwrap();

        let measures = driver.measures();
        assert_eq!(measures.stop_reason, Some(StopReason::LimitReached));
        assert_eq!(measures.node_count, 1);
        assert_eq!(measures.solution_count, 0);
        assert_eq!(measures.feasibility, Feasibility::Unknown);
        assert!(driver.has_reached_limit());
        assert!(!measures.optimality_proven);
    }

    #[test]
    fn test_restart_after_each_solution_rewinds_to_the_search_root() {
        let mut driver = not_equal_driver();
        driver.restart_after_each_solution(true);
        driver.plug_monitor(Rc::new(RefCell::new(SolutionLimitMonitor::new(2))));
        let recorder = Rc::new(RefCell::new(SolutionRecorder::new()));
        driver.plug_monitor(recorder.clone());

        driver.launch(false).unwrap();

        let measures = driver.measures();
        assert_eq!(measures.solution_count, 2);
        assert_eq!(measures.restart_count, 1);
        assert_eq!(measures.stop_reason, Some(StopReason::LimitReached));
        // Without nogood learning the same first solution is found again
        // after the restart.
        let recorder = recorder.borrow();
        let values: Vec<(IntegerType, IntegerType)> = recorder
            .solutions()
            .iter()
            .map(|s| (s.value(VariableId::new(0)), s.value(VariableId::new(1))))
            .collect();
        assert_eq!(values, vec![(0, 1), (0, 1)]);
    }

    #[test]
    fn test_reset_then_relaunch_reproduces_the_measures() {
        let mut driver = not_equal_driver();
        driver.launch(false).unwrap();
        let first = driver.measures().clone();

        driver.reset().unwrap();
        assert_eq!(driver.measures().node_count, 0);
        let x = VariableId::new(0);
        let y = VariableId::new(1);
        driver
            .set_engine(Box::new(PairwiseNotEqual {
                pairs: vec![(x, y)],
            }))
            .unwrap();
        driver.launch(false).unwrap();
        let second = driver.measures().clone();

        assert_eq!(first.solution_count, second.solution_count);
        assert_eq!(first.node_count, second.node_count);
        assert_eq!(first.backtrack_count, second.backtrack_count);
        assert_eq!(first.fail_count, second.fail_count);
        assert_eq!(first.peak_depth, second.peak_depth);
        assert_eq!(first.stop_reason, second.stop_reason);
        assert_eq!(first.feasibility, second.feasibility);
    }

    #[test]
    fn test_reset_is_idempotent_when_nothing_ran() {
        let mut driver = not_equal_driver();
        driver.reset().unwrap();
        driver.reset().unwrap();
        assert_eq!(driver.next_step(), SearchStep::Init);
    }

    #[test]
    fn test_depth_and_time_stamp_observed_by_monitors() {
        let max_depth = Rc::new(RefCell::new(0));
        let stamps = Rc::new(RefCell::new(Vec::new()));
        let mut driver = not_equal_driver();
        driver.plug_monitor(Rc::new(RefCell::new(DepthProbe {
            max_depth: max_depth.clone(),
            stamps: stamps.clone(),
        })));

        driver.launch(false).unwrap();

        assert_eq!(*max_depth.borrow() as u64, driver.measures().peak_depth);
        let stamps = stamps.borrow();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        // Two down transitions ran, so the stamp advanced at least twice.
        assert!(*stamps.last().unwrap() >= 2);
    }

    #[test]
    fn test_decision_path_is_root_outside_a_resolution() {
        let driver = not_equal_driver();
        assert_eq!(driver.decision_path(), "<root>");
        assert_eq!(driver.current_depth(), 0);
    }
}
