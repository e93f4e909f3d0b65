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

//! # Solution Nogoods
//!
//! Enumerating with a restart after every solution only terminates if the
//! search cannot rediscover an old solution. The fix is a *nogood* per
//! recorded solution: a forbidden complete assignment. The nogood base lives
//! outside the trail, so the forbiddance survives every backtrack and
//! restart, while the pruning it implies is re-derived by ordinary
//! propagation in each world.
//!
//! Wiring: post a [`SolutionNogoods`] propagator on the engine and plug a
//! [`NogoodRecorder`] monitor on the driver, both over the same shared
//! [`NogoodBase`].

use crate::propagation::Propagator;
use fathom_model::index::VariableId;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;
use fathom_search::engine::Contradiction;
use fathom_search::monitor::search_monitor::{SearchContext, SearchMonitor};
use std::cell::RefCell;
use std::rc::Rc;

/// The forbidden complete assignments recorded so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NogoodBase<T> {
    nogoods: Vec<Vec<(VariableId, T)>>,
}

impl<T> NogoodBase<T> {
    /// Creates an empty base.
    #[inline]
    pub fn new() -> Self {
        Self {
            nogoods: Vec::new(),
        }
    }

    /// Forbids the given complete assignment.
    pub fn add(&mut self, assignment: Vec<(VariableId, T)>) {
        self.nogoods.push(assignment);
    }

    /// Returns the number of recorded nogoods.
    #[inline]
    pub fn len(&self) -> usize {
        self.nogoods.len()
    }

    /// Returns `true` if nothing is forbidden.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nogoods.is_empty()
    }

    /// Forgets every recorded nogood.
    pub fn clear(&mut self) {
        self.nogoods.clear();
    }
}

/// Filters against every nogood in a shared [`NogoodBase`].
///
/// Per nogood: if some literal can no longer hold, the nogood is inert; if
/// every literal holds, the state is contradictory; if exactly one literal
/// is undecided, its value is removed (unit propagation).
#[derive(Debug, Clone)]
pub struct SolutionNogoods<T> {
    base: Rc<RefCell<NogoodBase<T>>>,
}

impl<T> SolutionNogoods<T> {
    /// Creates a propagator over `base`.
    #[inline]
    pub fn new(base: Rc<RefCell<NogoodBase<T>>>) -> Self {
        Self { base }
    }
}

impl<T> Propagator<T> for SolutionNogoods<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "SolutionNogoods"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction> {
        let base = self.base.borrow();
        let mut changed = false;
        'nogoods: for nogood in &base.nogoods {
            let mut undecided = None;
            for &(variable, value) in nogood {
                if store.value(variable) == Some(value) {
                    continue;
                }
                if !store.contains(variable, value) {
                    // A literal is already refuted; the nogood cannot fire.
                    continue 'nogoods;
                }
                if undecided.is_some() {
                    // Two open literals: nothing to propagate yet.
                    continue 'nogoods;
                }
                undecided = Some((variable, value));
            }
            match undecided {
                None => return Err(Contradiction),
                Some((variable, value)) => {
                    changed |= store.try_remove(variable, value)?;
                }
            }
        }
        Ok(changed)
    }
}

/// Adds a nogood for every solution the search finds.
#[derive(Debug, Clone)]
pub struct NogoodRecorder<T> {
    base: Rc<RefCell<NogoodBase<T>>>,
}

impl<T> NogoodRecorder<T> {
    /// Creates a recorder feeding `base`.
    #[inline]
    pub fn new(base: Rc<RefCell<NogoodBase<T>>>) -> Self {
        Self { base }
    }
}

impl<T> SearchMonitor<T> for NogoodRecorder<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "NogoodRecorder"
    }

    fn on_solution(&mut self, ctx: &mut SearchContext<'_, T>) {
        let assignment = ctx.store().solution().iter().collect();
        self.base.borrow_mut().add(assignment);
    }
}
