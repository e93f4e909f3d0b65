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
use crate::decision::IntSplit;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;

/// Domain bisection in creation order: split the first undecided variable at
/// the midpoint of its bounds, lower half first. Suited to wide domains
/// where value-by-value enumeration branches too much.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOrderBisect;

impl InputOrderBisect {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BranchingStrategy<T> for InputOrderBisect
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "InputOrderBisect"
    }

    fn next_decision(&mut self, store: &DomainStore<T>) -> Branching<T> {
        for variable in store.variables() {
            match store.domain_size(variable) {
                0 => return Branching::Inconsistent,
                1 => continue,
                _ => {
                    let lb = store.min(variable);
                    let ub = store.max(variable);
                    let two = T::one() + T::one();
                    let pivot = lb + (ub - lb) / two;
                    return Branching::Decision(Box::new(IntSplit::new(variable, pivot)));
                }
            }
        }
        Branching::AllInstantiated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Decision;

    type IntegerType = i64;

    #[test]
    fn test_splits_at_the_midpoint() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(0, 9);

        let mut strategy = InputOrderBisect::new();
        match strategy.next_decision(&store) {
            Branching::Decision(d) => {
                assert_eq!(d.variable(), x);
                assert_eq!(d.describe(), format!("x{} <= 4", x.get()));
            }
            other => panic!("expected a decision, got {:?}", other),
        }
    }

    #[test]
    fn test_pivot_never_covers_the_whole_domain() {
        // A two-value domain must split into two non-empty halves.
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(3, 4);

        let mut strategy = InputOrderBisect::new();
        match strategy.next_decision(&store) {
            Branching::Decision(d) => {
                assert_eq!(d.variable(), x);
                assert_eq!(d.describe(), format!("x{} <= 3", x.get()));
            }
            other => panic!("expected a decision, got {:?}", other),
        }
    }
}
