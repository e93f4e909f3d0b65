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

/// The first-fail principle: branch on the undecided variable with the
/// smallest domain (ties broken by creation order), trying its smallest
/// value first. Failing early keeps refuted subtrees small.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstFailMinValue;

impl FirstFailMinValue {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BranchingStrategy<T> for FirstFailMinValue
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "FirstFailMinValue"
    }

    fn next_decision(&mut self, store: &DomainStore<T>) -> Branching<T> {
        let mut smallest = None;
        for variable in store.variables() {
            match store.domain_size(variable) {
                0 => return Branching::Inconsistent,
                1 => continue,
                size => {
                    if smallest.map_or(true, |(_, s)| size < s) {
                        smallest = Some((variable, size));
                    }
                }
            }
        }
        match smallest {
            Some((variable, _)) => {
                let value = store.min(variable);
                Branching::Decision(Box::new(IntAssign::new(variable, value)))
            }
            None => Branching::AllInstantiated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::Decision;

    type IntegerType = i64;

    #[test]
    fn test_prefers_smallest_domain() {
        let mut store = DomainStore::<IntegerType>::new();
        let _x = store.new_variable(0, 9);
        let y = store.new_variable(0, 1);
        let _z = store.new_variable(0, 4);

        let mut strategy = FirstFailMinValue::new();
        match strategy.next_decision(&store) {
            Branching::Decision(d) => assert_eq!(d.variable(), y),
            other => panic!("expected a decision, got {:?}", other),
        }
    }

    #[test]
    fn test_ties_break_by_creation_order() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(0, 1);
        let _y = store.new_variable(5, 6);

        let mut strategy = FirstFailMinValue::new();
        match strategy.next_decision(&store) {
            Branching::Decision(d) => assert_eq!(d.variable(), x),
            other => panic!("expected a decision, got {:?}", other),
        }
    }
}
