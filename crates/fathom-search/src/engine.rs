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

use fathom_model::domain::EmptyDomain;
use fathom_model::store::DomainStore;

/// The control-flow signal of constraint filtering: the current state admits
/// no solution and the search must reconsider a decision.
///
/// A contradiction never surfaces to the caller of the driver; it only
/// travels from the propagation engine (or a decision application) back to
/// the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction;

impl std::fmt::Display for Contradiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "contradiction")
    }
}

impl From<EmptyDomain> for Contradiction {
    #[inline]
    fn from(_: EmptyDomain) -> Self {
        Contradiction
    }
}

/// The contract between the search driver and the constraint filtering
/// machinery.
///
/// `propagate` must run filtering to fixpoint on the current store state and
/// must be deterministic for a given state: the driver re-propagates the same
/// worlds after backtracks and restarts and relies on reaching the same
/// fixpoints.
pub trait PropagationEngine<T> {
    /// Returns the name of the engine.
    fn name(&self) -> &str;

    /// Runs filtering to fixpoint. `Err(Contradiction)` means the current
    /// state admits no solution.
    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction>;
}

impl<T> std::fmt::Debug for dyn PropagationEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PropagationEngine({})", self.name())
    }
}

/// An engine that filters nothing and never fails.
///
/// This is the engine a driver holds after `reset`, so that a stale driver
/// can never re-run filtering on a problem the caller has moved away from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPropagationEngine;

impl<T> PropagationEngine<T> for NoPropagationEngine {
    fn name(&self) -> &str {
        "NoPropagationEngine"
    }

    fn propagate(&mut self, _store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        Ok(())
    }
}
