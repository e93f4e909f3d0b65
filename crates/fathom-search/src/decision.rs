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

//! # Decisions and the Decision Chain
//!
//! A decision is one branching choice at a node of the search tree. Applying
//! its left branch descends; when that subtree is refuted, applying the next
//! branch reconsiders the choice. Decisions are polymorphic — binary
//! assignment, domain bisection, value enumeration — behind one small
//! capability trait.
//!
//! The chain of applied decisions is the search path. Each link owns its
//! predecessor, so popping the top frees exactly the abandoned branch, and
//! the root of the tree is simply the empty chain.

use crate::engine::Contradiction;
use fathom_model::index::VariableId;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;

/// The capability set of a branching choice.
///
/// A fresh decision first applies its left branch. After a refutation the
/// driver asks `has_next_branch`; applying the right branch *consumes* it, so
/// a decision whose every branch failed reports `false` and gets freed.
pub trait Decision<T>: std::fmt::Debug {
    /// The variable this decision branches on.
    fn variable(&self) -> VariableId;

    /// Posts the first branch on the store.
    fn apply_left(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction>;

    /// Consumes and posts the next branch. Must only be called when
    /// `has_next_branch` returned `true`.
    fn apply_right(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction>;

    /// Returns `true` while an unexplored branch remains.
    fn has_next_branch(&self) -> bool;

    /// Renders the decision for logs, e.g. `x2 = 4`.
    fn describe(&self) -> String;
}

/// The binary assignment decision: `x = v` on the left, `x ≠ v` on the
/// right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntAssign<T> {
    variable: VariableId,
    value: T,
    right_taken: bool,
}

impl<T> IntAssign<T> {
    /// Creates the decision `x = value` / `x ≠ value`.
    #[inline]
    pub fn new(variable: VariableId, value: T) -> Self {
        Self {
            variable,
            value,
            right_taken: false,
        }
    }
}

impl<T> Decision<T> for IntAssign<T>
where
    T: DomainValue,
{
    fn variable(&self) -> VariableId {
        self.variable
    }

    fn apply_left(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        store.try_instantiate(self.variable, self.value)?;
        Ok(())
    }

    fn apply_right(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        debug_assert!(
            !self.right_taken,
            "called `IntAssign::apply_right` twice on the same decision"
        );
        self.right_taken = true;
        store.try_remove(self.variable, self.value)?;
        Ok(())
    }

    fn has_next_branch(&self) -> bool {
        !self.right_taken
    }

    fn describe(&self) -> String {
        if self.right_taken {
            format!("x{} != {}", self.variable.get(), self.value)
        } else {
            format!("x{} = {}", self.variable.get(), self.value)
        }
    }
}

/// The domain bisection decision: `x ≤ pivot` on the left, `x > pivot` on
/// the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntSplit<T> {
    variable: VariableId,
    pivot: T,
    right_taken: bool,
}

impl<T> IntSplit<T> {
    /// Creates the decision `x ≤ pivot` / `x > pivot`.
    #[inline]
    pub fn new(variable: VariableId, pivot: T) -> Self {
        Self {
            variable,
            pivot,
            right_taken: false,
        }
    }
}

impl<T> Decision<T> for IntSplit<T>
where
    T: DomainValue,
{
    fn variable(&self) -> VariableId {
        self.variable
    }

    fn apply_left(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        store.try_set_max(self.variable, self.pivot)?;
        Ok(())
    }

    fn apply_right(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        debug_assert!(
            !self.right_taken,
            "called `IntSplit::apply_right` twice on the same decision"
        );
        self.right_taken = true;
        let above = self.pivot.checked_add(&T::one()).ok_or(Contradiction)?;
        store.try_set_min(self.variable, above)?;
        Ok(())
    }

    fn has_next_branch(&self) -> bool {
        !self.right_taken
    }

    fn describe(&self) -> String {
        if self.right_taken {
            format!("x{} > {}", self.variable.get(), self.pivot)
        } else {
            format!("x{} <= {}", self.variable.get(), self.pivot)
        }
    }
}

/// The n-ary enumeration decision: one branch per candidate value, tried in
/// order. Each refutation re-enters the tree downward on the next value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntEnumerate<T> {
    variable: VariableId,
    values: Vec<T>,
    cursor: usize,
}

impl<T> IntEnumerate<T> {
    /// Creates the decision trying `values` in order.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(variable: VariableId, values: Vec<T>) -> Self {
        assert!(
            !values.is_empty(),
            "called `IntEnumerate::new` with no candidate values"
        );
        Self {
            variable,
            values,
            cursor: 0,
        }
    }
}

impl<T> Decision<T> for IntEnumerate<T>
where
    T: DomainValue,
{
    fn variable(&self) -> VariableId {
        self.variable
    }

    fn apply_left(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        store.try_instantiate(self.variable, self.values[self.cursor])?;
        Ok(())
    }

    fn apply_right(&mut self, store: &mut DomainStore<T>) -> Result<(), Contradiction> {
        debug_assert!(
            self.cursor + 1 < self.values.len(),
            "called `IntEnumerate::apply_right` with no branch left"
        );
        self.cursor += 1;
        store.try_instantiate(self.variable, self.values[self.cursor])?;
        Ok(())
    }

    fn has_next_branch(&self) -> bool {
        self.cursor + 1 < self.values.len()
    }

    fn describe(&self) -> String {
        format!("x{} = {}", self.variable.get(), self.values[self.cursor])
    }
}

/// One link of the decision chain, owning its predecessor.
#[derive(Debug)]
struct ChainNode<T> {
    decision: Box<dyn Decision<T>>,
    previous: Option<Box<ChainNode<T>>>,
}

/// The search path: the applied decisions from the current node back to the
/// root, linked top-down.
///
/// The root of the tree is the empty chain; there is no sentinel object to
/// allocate or to accidentally free. Dropping the chain releases its links
/// iteratively, so a deep search path cannot overflow the stack on drop.
#[derive(Debug, Default)]
pub struct DecisionChain<T> {
    top: Option<Box<ChainNode<T>>>,
}

impl<T> DecisionChain<T> {
    /// Creates an empty chain: the search is at the root.
    #[inline]
    pub fn new() -> Self {
        Self { top: None }
    }

    /// Returns `true` when no decision is applied, i.e. at the root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.top.is_none()
    }

    /// Pushes a freshly taken decision on top of the chain.
    #[inline]
    pub fn push(&mut self, decision: Box<dyn Decision<T>>) {
        let previous = self.top.take();
        self.top = Some(Box::new(ChainNode { decision, previous }));
    }

    /// Pops and frees the top decision, exposing its predecessor.
    /// A pop at the root is a no-op.
    #[inline]
    pub fn pop(&mut self) {
        if let Some(node) = self.top.take() {
            self.top = node.previous;
        }
    }

    /// Returns the current top decision, or `None` at the root.
    #[inline]
    pub fn top(&self) -> Option<&dyn Decision<T>> {
        self.top.as_ref().map(|node| node.decision.as_ref())
    }

    /// Returns the current top decision mutably, or `None` at the root.
    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut (dyn Decision<T> + 'static)> {
        self.top.as_mut().map(move |node| node.decision.as_mut())
    }

    /// Walks the chain and returns its length, i.e. the search depth.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.top.as_deref();
        while let Some(node) = cursor {
            depth += 1;
            cursor = node.previous.as_deref();
        }
        depth
    }

    /// Pops and frees every decision down to the root.
    pub fn clear(&mut self) {
        while self.top.is_some() {
            self.pop();
        }
    }

    /// Renders the decision path from the current node back to the root,
    /// e.g. `x1 != 0 <- x0 = 1`.
    pub fn describe_path(&self) -> String {
        let mut parts = Vec::new();
        let mut cursor = self.top.as_deref();
        while let Some(node) = cursor {
            parts.push(node.decision.describe());
            cursor = node.previous.as_deref();
        }
        if parts.is_empty() {
            "<root>".to_string()
        } else {
            parts.join(" <- ")
        }
    }
}

impl<T> Drop for DecisionChain<T> {
    fn drop(&mut self) {
        // Unlink iteratively; a recursive drop of a deep chain would blow
        // the stack.
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn store_one_var() -> (DomainStore<IntegerType>, VariableId) {
        let mut store = DomainStore::new();
        let x = store.new_variable(0, 4);
        (store, x)
    }

    #[test]
    fn test_assign_left_then_right() {
        let (mut store, x) = store_one_var();
        let mut d = IntAssign::new(x, 2);
        assert!(d.has_next_branch());

        store.world_push();
        d.apply_left(&mut store).unwrap();
        assert_eq!(store.value(x), Some(2));
        store.world_pop();

        d.apply_right(&mut store).unwrap();
        assert!(!store.contains(x, 2));
        assert!(!d.has_next_branch());
    }

    #[test]
    fn test_assign_right_on_singleton_is_a_contradiction() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(3, 3);
        let mut d = IntAssign::new(x, 3);
        assert_eq!(d.apply_right(&mut store), Err(Contradiction));
        // The branch is consumed even though it failed.
        assert!(!d.has_next_branch());
    }

    #[test]
    fn test_split_halves_the_domain() {
        let (mut store, x) = store_one_var();
        let mut d = IntSplit::new(x, 2);

        store.world_push();
        d.apply_left(&mut store).unwrap();
        assert_eq!(store.max(x), 2);
        store.world_pop();

        d.apply_right(&mut store).unwrap();
        assert_eq!(store.min(x), 3);
        assert!(!d.has_next_branch());
    }

    #[test]
    fn test_enumerate_walks_all_values() {
        let (mut store, x) = store_one_var();
        let mut d = IntEnumerate::new(x, vec![0, 1, 2]);

        store.world_push();
        d.apply_left(&mut store).unwrap();
        assert_eq!(store.value(x), Some(0));
        store.world_pop();
        assert!(d.has_next_branch());

        store.world_push();
        d.apply_right(&mut store).unwrap();
        assert_eq!(store.value(x), Some(1));
        store.world_pop();
        assert!(d.has_next_branch());

        store.world_push();
        d.apply_right(&mut store).unwrap();
        assert_eq!(store.value(x), Some(2));
        store.world_pop();
        assert!(!d.has_next_branch());
    }

    #[test]
    fn test_chain_depth_matches_pushes() {
        let mut chain = DecisionChain::<IntegerType>::new();
        assert!(chain.is_root());
        assert_eq!(chain.depth(), 0);

        chain.push(Box::new(IntAssign::new(VariableId::new(0), 1)));
        chain.push(Box::new(IntAssign::new(VariableId::new(1), 0)));
        assert_eq!(chain.depth(), 2);
        assert!(!chain.is_root());

        chain.pop();
        assert_eq!(chain.depth(), 1);
        assert_eq!(chain.top().map(|d| d.variable()), Some(VariableId::new(0)));

        chain.pop();
        assert!(chain.is_root());
        chain.pop(); // pop at root is a no-op
        assert!(chain.is_root());
    }

    #[test]
    fn test_chain_clear_frees_everything() {
        let mut chain = DecisionChain::<IntegerType>::new();
        for i in 0..10 {
            chain.push(Box::new(IntAssign::new(VariableId::new(i), 0)));
        }
        chain.clear();
        assert!(chain.is_root());
        assert_eq!(chain.depth(), 0);
    }

    #[test]
    fn test_deep_chain_drops_without_overflow() {
        let mut chain = DecisionChain::<IntegerType>::new();
        for _ in 0..200_000 {
            chain.push(Box::new(IntAssign::new(VariableId::new(0), 0)));
        }
        drop(chain);
    }

    #[test]
    fn test_describe_path_renders_top_first() {
        let mut chain = DecisionChain::<IntegerType>::new();
        assert_eq!(chain.describe_path(), "<root>");
        chain.push(Box::new(IntAssign::new(VariableId::new(0), 1)));
        chain.push(Box::new(IntAssign::new(VariableId::new(1), 0)));
        assert_eq!(chain.describe_path(), "x1 = 0 <- x0 = 1");
    }
}
