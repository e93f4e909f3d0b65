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

//! # Fixpoint Propagation
//!
//! The concrete engine behind the driver's propagation contract: an ordered
//! list of propagators run round-robin until a full pass changes no domain.
//! Each propagator shrinks domains monotonically, so the fixpoint is unique
//! for a given store state and the engine is deterministic — which the
//! search driver relies on when it replays worlds after backtracks and
//! restarts.
//!
//! ## Submodules
//!
//! - `arithm`: unary bounds/value propagators and binary disequality.
//! - `linear`: bounds-consistent sum.
//! - `nogoods`: forbidden-assignment store fed by a solution recorder, the
//!   ingredient that makes restart-based enumeration terminate.

use fathom_model::index::PropagatorId;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;
use fathom_search::engine::{Contradiction, PropagationEngine};
use std::cell::RefCell;
use std::rc::Rc;

pub mod arithm;
pub mod linear;
pub mod nogoods;

/// One filtering rule over the store.
///
/// `propagate` removes values that cannot appear in any solution of the
/// constraint, reports whether it changed anything, and signals a wiped-out
/// domain as [`Contradiction`]. Filtering must be monotone: it may only
/// shrink domains, never widen them.
pub trait Propagator<T> {
    /// Returns the name of the propagator.
    fn name(&self) -> &str;

    /// Runs one filtering pass. `Ok(true)` means a domain changed.
    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction>;
}

impl<T> std::fmt::Debug for dyn Propagator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Propagator({})", self.name())
    }
}

/// Round-robin fixpoint over an ordered propagator list.
#[derive(Debug, Default)]
pub struct FixpointEngine<T> {
    propagators: Vec<Box<dyn Propagator<T>>>,
}

impl<T> FixpointEngine<T> {
    /// Creates an engine with no propagators; it filters nothing until
    /// `add` is called.
    #[inline]
    pub fn new() -> Self {
        Self {
            propagators: Vec::new(),
        }
    }

    /// Appends a propagator and returns its id.
    pub fn add(&mut self, propagator: Box<dyn Propagator<T>>) -> PropagatorId {
        let id = PropagatorId::new(self.propagators.len());
        self.propagators.push(propagator);
        id
    }

    /// Returns the number of propagators.
    #[inline]
    pub fn len(&self) -> usize {
        self.propagators.len()
    }

    /// Returns `true` if no propagator was added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.propagators.is_empty()
    }
}

impl<T> PropagationEngine<T> for FixpointEngine<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "FixpointEngine"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        loop {
            let mut changed = false;
            for propagator in self.propagators.iter_mut() {
                changed |= propagator.propagate(store)?;
            }
            if !changed {
                return Ok(());
            }
        }
    }
}

/// A shared handle on a [`FixpointEngine`], usable as the driver's engine.
///
/// The solver keeps the `Rc` so it can keep posting propagators between
/// resolutions, while the driver owns a handle it can drop on `reset`.
#[derive(Debug, Clone)]
pub struct EngineHandle<T> {
    engine: Rc<RefCell<FixpointEngine<T>>>,
}

impl<T> EngineHandle<T> {
    /// Creates a handle on `engine`.
    #[inline]
    pub fn new(engine: Rc<RefCell<FixpointEngine<T>>>) -> Self {
        Self { engine }
    }
}

impl<T> PropagationEngine<T> for EngineHandle<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "FixpointEngine"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        self.engine.borrow_mut().propagate(store)
    }
}
