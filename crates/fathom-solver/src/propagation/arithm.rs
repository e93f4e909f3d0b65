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

//! Unary value/bounds propagators and the binary disequality.

use crate::propagation::Propagator;
use fathom_model::index::VariableId;
use fathom_model::store::DomainStore;
use fathom_model::value::DomainValue;
use fathom_search::engine::Contradiction;

/// `x = value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedValue<T> {
    variable: VariableId,
    value: T,
}

impl<T> FixedValue<T> {
    #[inline]
    pub fn new(variable: VariableId, value: T) -> Self {
        Self { variable, value }
    }
}

impl<T> Propagator<T> for FixedValue<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "FixedValue"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction> {
        Ok(store.try_instantiate(self.variable, self.value)?)
    }
}

/// `x ≠ value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedValue<T> {
    variable: VariableId,
    value: T,
}

impl<T> RemovedValue<T> {
    #[inline]
    pub fn new(variable: VariableId, value: T) -> Self {
        Self { variable, value }
    }
}

impl<T> Propagator<T> for RemovedValue<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "RemovedValue"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction> {
        Ok(store.try_remove(self.variable, self.value)?)
    }
}

/// `x ≥ min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LowerBound<T> {
    variable: VariableId,
    min: T,
}

impl<T> LowerBound<T> {
    #[inline]
    pub fn new(variable: VariableId, min: T) -> Self {
        Self { variable, min }
    }
}

impl<T> Propagator<T> for LowerBound<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "LowerBound"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction> {
        Ok(store.try_set_min(self.variable, self.min)?)
    }
}

/// `x ≤ max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpperBound<T> {
    variable: VariableId,
    max: T,
}

impl<T> UpperBound<T> {
    #[inline]
    pub fn new(variable: VariableId, max: T) -> Self {
        Self { variable, max }
    }
}

impl<T> Propagator<T> for UpperBound<T>
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "UpperBound"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction> {
        Ok(store.try_set_max(self.variable, self.max)?)
    }
}

/// `x ≠ y`: once either side is instantiated, its value leaves the other
/// side's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotEqual {
    x: VariableId,
    y: VariableId,
}

impl NotEqual {
    #[inline]
    pub fn new(x: VariableId, y: VariableId) -> Self {
        Self { x, y }
    }

    fn prune<T>(
        store: &mut DomainStore<T>,
        from: VariableId,
        to: VariableId,
    ) -> Result<bool, Contradiction>
    where
        T: DomainValue,
    {
        match store.value(from) {
            Some(value) => Ok(store.try_remove(to, value)?),
            None => Ok(false),
        }
    }
}

impl<T> Propagator<T> for NotEqual
where
    T: DomainValue,
{
    fn name(&self) -> &str {
        "NotEqual"
    }

    fn propagate(&mut self, store: &mut DomainStore<T>) -> Result<bool, Contradiction> {
        let mut changed = Self::prune(store, self.x, self.y)?;
        changed |= Self::prune(store, self.y, self.x)?;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_fixed_value_instantiates_once() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(0, 5);
        let mut p = FixedValue::new(x, 3);
        assert_eq!(p.propagate(&mut store), Ok(true));
        assert_eq!(store.value(x), Some(3));
        // Idempotent on the second pass.
        assert_eq!(p.propagate(&mut store), Ok(false));
    }

    #[test]
    fn test_conflicting_fixed_values_contradict() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(0, 1);
        let mut p0 = FixedValue::new(x, 0);
        let mut p1 = FixedValue::new(x, 1);
        assert_eq!(p0.propagate(&mut store), Ok(true));
        assert_eq!(p1.propagate(&mut store), Err(Contradiction));
    }

    #[test]
    fn test_removed_value_and_bounds() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(0, 5);
        assert_eq!(RemovedValue::new(x, 2).propagate(&mut store), Ok(true));
        assert_eq!(LowerBound::new(x, 1).propagate(&mut store), Ok(true));
        assert_eq!(UpperBound::new(x, 4).propagate(&mut store), Ok(true));
        assert!(!store.contains(x, 2));
        assert_eq!(store.min(x), 1);
        assert_eq!(store.max(x), 4);
    }

    #[test]
    fn test_not_equal_waits_for_an_instantiation() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(0, 1);
        let y = store.new_variable(0, 1);
        let mut p = NotEqual::new(x, y);

        assert_eq!(Propagator::<IntegerType>::propagate(&mut p, &mut store), Ok(false));

        store.try_instantiate(x, 0).unwrap();
        assert_eq!(Propagator::<IntegerType>::propagate(&mut p, &mut store), Ok(true));
        assert_eq!(store.value(y), Some(1));
    }

    #[test]
    fn test_not_equal_on_equal_singletons_contradicts() {
        let mut store = DomainStore::<IntegerType>::new();
        let x = store.new_variable(2, 2);
        let y = store.new_variable(2, 2);
        let mut p = NotEqual::new(x, y);
        assert_eq!(
            Propagator::<IntegerType>::propagate(&mut p, &mut store),
            Err(Contradiction)
        );
    }
}
