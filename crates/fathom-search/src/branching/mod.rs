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

//! # Branching Strategies
//!
//! A strategy looks at the current store and picks the next decision, or
//! reports that nothing is left to decide — which is how the driver learns
//! that the current node is a solution.
//!
//! ## Submodules
//!
//! - `input_order`: first undecided variable, smallest value first.
//! - `first_fail`: smallest-domain variable first, smallest value first.
//! - `bisect`: first undecided variable, domain bisection.
//! - `enumerate`: first undecided variable, one branch per value.

use crate::decision::Decision;
use fathom_model::store::DomainStore;

pub mod bisect;
pub mod enumerate;
pub mod first_fail;
pub mod input_order;

/// What a strategy has to say about the current node.
#[derive(Debug)]
pub enum Branching<T> {
    /// Branch on this decision.
    Decision(Box<dyn Decision<T>>),
    /// Every variable is decided: the node is a solution.
    AllInstantiated,
    /// The strategy saw a state no decision can repair (e.g. an empty
    /// domain). The driver aborts the resolution.
    Inconsistent,
}

/// Picks the decision the search takes next.
pub trait BranchingStrategy<T> {
    /// Returns the name of the strategy.
    fn name(&self) -> &str;

    /// Inspects the store and produces the next branching choice.
    fn next_decision(&mut self, store: &DomainStore<T>) -> Branching<T>;
}

impl<T> std::fmt::Debug for dyn BranchingStrategy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BranchingStrategy({})", self.name())
    }
}
