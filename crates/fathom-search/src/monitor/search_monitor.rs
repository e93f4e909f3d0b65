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

//! # The Monitor Hook Contract
//!
//! A monitor sees every transition of the search loop twice: right before it
//! runs and right after, plus the three event hooks `on_solution`,
//! `on_contradiction` and `after_interrupt`. Every hook has an empty default
//! body, so a monitor implements only what it cares about.
//!
//! Hooks receive a [`SearchContext`]: a read-only view of the measures, the
//! store, the current depth and the driver time stamp, plus the command sink
//! through which a monitor asks the driver to interrupt, restart, or stop on
//! a spent budget. Commands are queued, never executed inside the hook; the
//! driver drains them before the next transition.

use crate::measures::SearchMeasures;
use crate::result::StopReason;
use fathom_model::store::DomainStore;

/// The commands a monitor may queue during a dispatch. Drained by the driver
/// once per loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchCommands {
    pub(crate) interrupt: Option<StopReason>,
    pub(crate) restart: bool,
    pub(crate) limit: bool,
}

impl SearchCommands {
    /// Creates an empty command sink.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no command is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interrupt.is_none() && !self.restart && !self.limit
    }
}

/// The per-dispatch view a monitor works with.
pub struct SearchContext<'a, T> {
    measures: &'a SearchMeasures,
    store: &'a DomainStore<T>,
    time_stamp: u64,
    depth: usize,
    commands: &'a mut SearchCommands,
}

impl<'a, T> SearchContext<'a, T> {
    /// Assembles a context. Called by the driver once per dispatch.
    #[inline]
    pub fn new(
        measures: &'a SearchMeasures,
        store: &'a DomainStore<T>,
        time_stamp: u64,
        depth: usize,
        commands: &'a mut SearchCommands,
    ) -> Self {
        Self {
            measures,
            store,
            time_stamp,
            depth,
            commands,
        }
    }

    /// The measures of the running resolution.
    #[inline]
    pub fn measures(&self) -> &SearchMeasures {
        self.measures
    }

    /// The domain store, read-only.
    #[inline]
    pub fn store(&self) -> &DomainStore<T> {
        self.store
    }

    /// The driver time stamp; it changes whenever the world does, so two
    /// observations with the same stamp saw the same state.
    #[inline]
    pub fn time_stamp(&self) -> u64 {
        self.time_stamp
    }

    /// The current search depth (length of the decision chain).
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Queues an interrupt with the given reason. The first interrupt of a
    /// resolution wins.
    #[inline]
    pub fn interrupt(&mut self, reason: StopReason) {
        if self.commands.interrupt.is_none() {
            self.commands.interrupt = Some(reason);
        }
    }

    /// Queues a restart: the next transition will rewind to the world right
    /// after the initial propagation.
    #[inline]
    pub fn restart(&mut self) {
        self.commands.restart = true;
    }

    /// Reports a spent budget. The driver marks the limit sticky and
    /// interrupts with [`StopReason::LimitReached`].
    #[inline]
    pub fn reach_limit(&mut self) {
        self.commands.limit = true;
    }
}

/// The observer contract of the search loop.
///
/// `before_*`/`after_*` hooks bracket the transition of the same name; the
/// driver guarantees the pairing even when the transition is cut short by a
/// contradiction. `on_solution` fires inside the open-node transition after
/// the solution is counted, `on_contradiction` inside a failed down
/// transition, `after_interrupt` right after an interrupt is recorded.
#[allow(unused_variables)]
pub trait SearchMonitor<T> {
    /// Returns the name of the monitor, used in logs and for diagnostics.
    fn name(&self) -> &str;

    fn before_initialize(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_initialize(&mut self, ctx: &mut SearchContext<'_, T>) {}

    fn before_initial_propagation(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_initial_propagation(&mut self, ctx: &mut SearchContext<'_, T>) {}

    fn before_open_node(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_open_node(&mut self, ctx: &mut SearchContext<'_, T>) {}

    fn before_down_left(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_down_left(&mut self, ctx: &mut SearchContext<'_, T>) {}

    fn before_down_right(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_down_right(&mut self, ctx: &mut SearchContext<'_, T>) {}

    fn before_up_branch(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_up_branch(&mut self, ctx: &mut SearchContext<'_, T>) {}

    fn before_restart(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_restart(&mut self, ctx: &mut SearchContext<'_, T>) {}

    fn before_close(&mut self, ctx: &mut SearchContext<'_, T>) {}
    fn after_close(&mut self, ctx: &mut SearchContext<'_, T>) {}

    /// A solution was just counted; the store is fully instantiated.
    fn on_solution(&mut self, ctx: &mut SearchContext<'_, T>) {}

    /// A branch just failed; the store still holds the contradictory world.
    fn on_contradiction(&mut self, ctx: &mut SearchContext<'_, T>) {}

    /// An interrupt was just recorded; the loop is about to close.
    fn after_interrupt(&mut self, ctx: &mut SearchContext<'_, T>) {}
}

impl<T> std::fmt::Debug for dyn SearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}
