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

use crate::branching::{Branching, BranchingStrategy};
use crate::decision::IntAssign;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;

/// The lexicographic baseline: branch on the first undecided variable in
/// creation order, trying its smallest value first.
///
/// Deterministic and free of heuristics, which makes it the strategy of
/// choice for enumeration and for reproducing searches in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOrderMinValue;

impl InputOrderMinValue {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BranchingStrategy<T> for InputOrderMinValue
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "InputOrderMinValue"
    }

    fn next_decision(&mut self, store: &DomainStore<T>) -> Branching<T> {
        for variable in store.variables() {
            match store.domain_size(variable) {
                0 => return Branching::Inconsistent,
                1 => continue,
                _ => {
                    let value = store.min(variable);
                    return Branching::Decision(Box::new(IntAssign::new(variable, value)));
                }
            }
        }
        Branching::AllInstantiated
    }
}
