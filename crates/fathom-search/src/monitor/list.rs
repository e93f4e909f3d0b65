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

//! # The Monitor List
//!
//! Ordered fan-out of one driver dispatch to every plugged monitor.
//! `before_*` hooks (and the event hooks) run in plug order, `after_*` hooks
//! in reverse plug order, so monitors nest like scopes around a transition.
//!
//! Monitors are shared handles (`Rc<RefCell<…>>`): the code that plugged a
//! monitor keeps a handle and reads its state after the search. Plugging the
//! same handle twice is silently rejected. A hook that panics is caught,
//! logged and dropped — observation must never be able to kill the search.

use crate::monitor::index::MonitorIndex;
use crate::monitor::search_monitor::{SearchContext, SearchMonitor};
use std::cell::RefCell;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

/// A shared, mutable handle on a plugged monitor.
pub type MonitorHandle<T> = Rc<RefCell<dyn SearchMonitor<T>>>;

/// The ordered collection of plugged monitors.
pub struct MonitorList<T> {
    monitors: Vec<MonitorHandle<T>>,
}

macro_rules! forward_dispatch {
    ($($method:ident),* $(,)?) => {
        $(
            pub fn $method(&self, ctx: &mut SearchContext<'_, T>) {
                for monitor in self.monitors.iter() {
                    Self::fire(monitor, ctx, |m, ctx| m.$method(ctx));
                }
            }
        )*
    };
}

macro_rules! reverse_dispatch {
    ($($method:ident),* $(,)?) => {
        $(
            pub fn $method(&self, ctx: &mut SearchContext<'_, T>) {
                for monitor in self.monitors.iter().rev() {
                    Self::fire(monitor, ctx, |m, ctx| m.$method(ctx));
                }
            }
        )*
    };
}

impl<T> Default for MonitorList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MonitorList<T> {
    /// Creates an empty list.
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Returns the number of plugged monitors.
    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if no monitor is plugged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Returns `true` if this exact handle is already plugged.
    pub fn contains(&self, monitor: &MonitorHandle<T>) -> bool {
        self.monitors.iter().any(|m| Rc::ptr_eq(m, monitor))
    }

    /// Appends a monitor unless the same handle is already plugged.
    /// Returns `true` if the monitor was added.
    pub fn plug(&mut self, monitor: MonitorHandle<T>) -> bool {
        if self.contains(&monitor) {
            log::warn!(
                "search monitor '{}' is already plugged and was ignored",
                monitor.borrow().name()
            );
            return false;
        }
        self.monitors.push(monitor);
        true
    }

    /// Returns the monitor plugged at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn monitor(&self, index: MonitorIndex) -> &MonitorHandle<T> {
        &self.monitors[index.get()]
    }

    /// Runs one hook on one monitor, isolating the search from a panic in
    /// the hook body.
    fn fire<F>(monitor: &MonitorHandle<T>, ctx: &mut SearchContext<'_, T>, f: F)
    where
        F: FnOnce(&mut dyn SearchMonitor<T>, &mut SearchContext<'_, T>),
    {
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let mut guard = monitor.borrow_mut();
            f(&mut *guard, ctx);
        }));
        if outcome.is_err() {
            let name = monitor
                .try_borrow()
                .map(|m| m.name().to_string())
                .unwrap_or_else(|_| "<unavailable>".to_string());
            log::warn!("search monitor '{}' panicked and was ignored", name);
        }
    }

    forward_dispatch!(
        before_initialize,
        before_initial_propagation,
        before_open_node,
        before_down_left,
        before_down_right,
        before_up_branch,
        before_restart,
        before_close,
        on_solution,
        on_contradiction,
    );

    reverse_dispatch!(
        after_initialize,
        after_initial_propagation,
        after_open_node,
        after_down_left,
        after_down_right,
        after_up_branch,
        after_restart,
        after_close,
        after_interrupt,
    );
}

impl<T> std::fmt::Debug for MonitorList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .monitors
            .iter()
            .map(|m| {
                m.try_borrow()
                    .map(|m| m.name().to_string())
                    .unwrap_or_else(|_| "<borrowed>".to_string())
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "MonitorList([{}])", names)
    }
}
