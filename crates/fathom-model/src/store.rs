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

//! # Trailed Domain Store
//!
//! The mutable heart of the solver: every variable domain, together with the
//! undo trail that makes domain mutation reversible. The trail is organized
//! in *worlds*: `world_push` marks a save point, `world_pop` restores every
//! domain to the state it had at the matching push. The first mutation of a
//! variable inside a world saves a copy of its domain on the trail
//! (copy-on-first-write); later mutations in the same world piggyback on that
//! save.
//!
//! Mutations performed while no world is open (world index 0) are permanent.
//! This is how constraints posted before the search tighten the root state.

use crate::domain::{Domain, EmptyDomain};
use crate::index::VariableId;
use crate::solution::Solution;
use crate::value::DomainValue;

/// Error raised when a caller asks the store to pop to a world that is above
/// the current one. This indicates a bug in the collaborator driving the
/// store, not a recoverable search event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWorld {
    /// The world index the caller asked for.
    pub requested: usize,
    /// The world index the store was at.
    pub current: usize,
}

impl std::fmt::Display for InvalidWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot pop to world {}: the store is at world {}",
            self.requested, self.current
        )
    }
}

impl std::error::Error for InvalidWorld {}

/// One saved domain on the undo trail.
#[derive(Debug, Clone)]
struct TrailEntry<T> {
    variable: VariableId,
    saved: Domain<T>,
    /// The save mark the variable carried before this save, restored on undo.
    saved_mark: usize,
}

/// All variable domains plus the world-structured undo trail.
#[derive(Debug, Clone)]
pub struct DomainStore<T> {
    domains: Vec<Domain<T>>,
    /// The linear history of saved domains.
    trail: Vec<TrailEntry<T>>,
    /// A stack of indices into `trail`; `worlds[i]` is where world `i + 1`
    /// began.
    worlds: Vec<usize>,
    /// Per variable, the world index at which its domain was last saved.
    marks: Vec<usize>,
}

impl<T> Default for DomainStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DomainStore<T> {
    /// Creates an empty store with no variables.
    #[inline]
    pub fn new() -> Self {
        Self {
            domains: Vec::new(),
            trail: Vec::new(),
            worlds: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// Creates an empty store preallocating room for `num_variables`
    /// variables and one trail entry per variable per expected world.
    #[inline]
    pub fn with_capacity(num_variables: usize) -> Self {
        Self {
            domains: Vec::with_capacity(num_variables),
            trail: Vec::with_capacity(num_variables),
            worlds: Vec::with_capacity(num_variables + 1),
            marks: Vec::with_capacity(num_variables),
        }
    }

    /// Returns the number of variables in the store.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    /// Iterates over all variable ids in creation order.
    #[inline]
    pub fn variables(&self) -> impl Iterator<Item = VariableId> {
        (0..self.domains.len()).map(VariableId::new)
    }

    /// Returns the current world index: 0 before any push, incremented by
    /// each `world_push` and decremented by each `world_pop`.
    #[inline]
    pub fn world_index(&self) -> usize {
        self.worlds.len()
    }
}

impl<T> DomainStore<T>
where
    T: DomainValue,
{
    /// Creates a fresh variable with domain `{lb, …, ub}` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `lb > ub`. In debug builds, panics when called while a world
    /// is open; variables must be created before the search starts.
    pub fn new_variable(&mut self, lb: T, ub: T) -> VariableId {
        debug_assert!(
            self.worlds.is_empty(),
            "called `DomainStore::new_variable` while {} world(s) are open",
            self.worlds.len()
        );
        let id = VariableId::new(self.domains.len());
        self.domains.push(Domain::new(lb, ub));
        self.marks.push(0);
        id
    }

    /// Returns the domain of `variable`.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is out of bounds.
    #[inline]
    pub fn domain(&self, variable: VariableId) -> &Domain<T> {
        &self.domains[variable.get()]
    }

    /// Returns the smallest value still in the domain of `variable`.
    #[inline]
    pub fn min(&self, variable: VariableId) -> T {
        self.domain(variable).min()
    }

    /// Returns the largest value still in the domain of `variable`.
    #[inline]
    pub fn max(&self, variable: VariableId) -> T {
        self.domain(variable).max()
    }

    /// Returns the number of values still in the domain of `variable`.
    #[inline]
    pub fn domain_size(&self, variable: VariableId) -> usize {
        self.domain(variable).size()
    }

    /// Returns `true` if `value` is still in the domain of `variable`.
    #[inline]
    pub fn contains(&self, variable: VariableId, value: T) -> bool {
        self.domain(variable).contains(value)
    }

    /// Returns `true` if the domain of `variable` is a singleton.
    #[inline]
    pub fn is_instantiated(&self, variable: VariableId) -> bool {
        self.domain(variable).is_instantiated()
    }

    /// Returns the instantiated value of `variable`, or `None` if more than
    /// one value remains.
    #[inline]
    pub fn value(&self, variable: VariableId) -> Option<T> {
        self.domain(variable).value()
    }

    /// Returns `true` if every variable is instantiated.
    pub fn all_instantiated(&self) -> bool {
        self.domains.iter().all(Domain::is_instantiated)
    }

    /// Opens a new world: a save point that a later `world_pop` restores.
    #[inline]
    pub fn world_push(&mut self) {
        self.worlds.push(self.trail.len());
    }

    /// Closes the current world, restoring every domain saved in it.
    ///
    /// A pop with no world open is a no-op.
    pub fn world_pop(&mut self) {
        let start = match self.worlds.pop() {
            Some(s) => s,
            None => return,
        };
        while self.trail.len() > start {
            debug_assert!(
                !self.trail.is_empty(),
                "called `DomainStore::world_pop` with a truncated trail"
            );
            let entry = self.trail.pop().expect("the trail holds entries past the frame start");
            self.domains[entry.variable.get()] = entry.saved;
            self.marks[entry.variable.get()] = entry.saved_mark;
        }
    }

    /// Pops worlds until the world index equals `index`.
    ///
    /// A no-op when the store is already at `index`; fails with
    /// [`InvalidWorld`] when `index` is above the current world.
    pub fn world_pop_until(&mut self, index: usize) -> Result<(), InvalidWorld> {
        if index > self.world_index() {
            return Err(InvalidWorld {
                requested: index,
                current: self.world_index(),
            });
        }
        while self.world_index() > index {
            self.world_pop();
        }
        Ok(())
    }

    /// Removes `value` from the domain of `variable`.
    ///
    /// Returns whether the domain changed, or `EmptyDomain` if `value` was
    /// the last value.
    pub fn try_remove(&mut self, variable: VariableId, value: T) -> Result<bool, EmptyDomain> {
        if !self.domain(variable).contains(value) {
            return Ok(false);
        }
        self.save(variable);
        self.domains[variable.get()].remove(value)
    }

    /// Removes every value strictly below `min` from the domain of
    /// `variable`.
    pub fn try_set_min(&mut self, variable: VariableId, min: T) -> Result<bool, EmptyDomain> {
        if min <= self.domain(variable).min() {
            return Ok(false);
        }
        if min > self.domain(variable).max() {
            return Err(EmptyDomain);
        }
        self.save(variable);
        self.domains[variable.get()].remove_below(min)
    }

    /// Removes every value strictly above `max` from the domain of
    /// `variable`.
    pub fn try_set_max(&mut self, variable: VariableId, max: T) -> Result<bool, EmptyDomain> {
        if max >= self.domain(variable).max() {
            return Ok(false);
        }
        if max < self.domain(variable).min() {
            return Err(EmptyDomain);
        }
        self.save(variable);
        self.domains[variable.get()].remove_above(max)
    }

    /// Reduces the domain of `variable` to the single value `value`.
    pub fn try_instantiate(&mut self, variable: VariableId, value: T) -> Result<bool, EmptyDomain> {
        if !self.domain(variable).contains(value) {
            return Err(EmptyDomain);
        }
        if self.domain(variable).is_instantiated() {
            return Ok(false);
        }
        self.save(variable);
        self.domains[variable.get()].instantiate_to(value)
    }

    /// Snapshots the current state into a [`Solution`].
    ///
    /// Every variable contributes its minimum, which is its value when the
    /// store is fully instantiated.
    pub fn solution(&self) -> Solution<T> {
        Solution::new(self.domains.iter().map(Domain::min).collect())
    }

    /// Saves the domain of `variable` on the trail if this is its first
    /// mutation in the current world. No world open means the mutation is
    /// permanent and nothing is saved.
    fn save(&mut self, variable: VariableId) {
        let current = self.worlds.len();
        if current == 0 {
            return;
        }
        let idx = variable.get();
        if self.marks[idx] != current {
            self.trail.push(TrailEntry {
                variable,
                saved: self.domains[idx].clone(),
                saved_mark: self.marks[idx],
            });
            self.marks[idx] = current;
        }
    }
}

impl<T> std::fmt::Display for DomainStore<T>
where
    T: DomainValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DomainStore(variables: {}, world: {}, trail: {})",
            self.domains.len(),
            self.world_index(),
            self.trail.len()
        )
    }
}
