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

//! Bounds-consistent linear sum.

use crate::propagation::Propagator;
use fathom_model::index::VariableId;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;
use fathom_search::engine::Contradiction;

/// `term_1 + term_2 + … + term_n = total`, filtered on bounds.
///
/// Every pass tightens `total` to the reachable sum interval and each term
/// to what the others leave for it. Extreme bound sums saturate instead of
/// wrapping, which only ever weakens the filtering, never falsifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumEquals {
    terms: Vec<VariableId>,
    total: VariableId,
}

impl SumEquals {
    /// Creates the constraint `sum(terms) = total`.
    ///
    /// # Panics
    ///
    /// Panics if `terms` is empty.
    pub fn new(terms: Vec<VariableId>, total: VariableId) -> Self {
        assert!(
            !terms.is_empty(),
            "called `SumEquals::new` with no terms"
        );
        Self { terms, total }
    }
}

fn saturating_add<T: DomainValue>(a: T, b: T) -> T {
    a.checked_add(&b).unwrap_or(if b > T::zero() {
        T::max_value()
    } else {
        T::min_value()
    })
}

fn saturating_sub<T: DomainValue>(a: T, b: T) -> T {
    a.checked_sub(&b).unwrap_or(if b > T::zero() {
        T::min_value()
    } else {
        T::max_value()
    })
}

impl<T> Propagator<T> for SumEquals
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "SumEquals"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction> {
        let mut sum_min = T::zero();
        let mut sum_max = T::zero();
        for &term in &self.terms {
            sum_min = saturating_add(sum_min, store.min(term));
            sum_max = saturating_add(sum_max, store.max(term));
        }

        let mut changed = store.try_set_min(self.total, sum_min)?;
        changed |= store.try_set_max(self.total, sum_max)?;

        let total_min = store.min(self.total);
        let total_max = store.max(self.total);
        for &term in &self.terms {
            let others_min = saturating_sub(sum_min, store.min(term));
            let others_max = saturating_sub(sum_max, store.max(term));
            changed |= store.try_set_min(term, saturating_sub(total_min, others_max))?;
            changed |= store.try_set_max(term, saturating_sub(total_max, others_min))?;
        }
        Ok(changed)
    }
}
