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

use crate::index::VariableId;

/// An immutable snapshot of a fully instantiated store: one value per
/// variable, indexed by [`VariableId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution<T> {
    values: Vec<T>,
}

impl<T> Solution<T>
where
    T: Copy,
{
    /// Creates a solution from the per-variable values, in variable order.
    #[inline]
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Returns the value of `variable` in this solution.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is out of bounds.
    #[inline]
    pub fn value(&self, variable: VariableId) -> T {
        self.values[variable.get()]
    }

    /// Returns the number of variables captured by this solution.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// Iterates over `(variable, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (VariableId::new(i), v))
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Solution(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "x{}={}", i, value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_value_lookup_by_variable() {
        let solution = Solution::<IntegerType>::new(vec![3, -1, 7]);
        assert_eq!(solution.num_variables(), 3);
        assert_eq!(solution.value(VariableId::new(0)), 3);
        assert_eq!(solution.value(VariableId::new(1)), -1);
        assert_eq!(solution.value(VariableId::new(2)), 7);
    }

    #[test]
    fn test_iter_yields_pairs_in_order() {
        let solution = Solution::<IntegerType>::new(vec![1, 2]);
        let pairs: Vec<_> = solution.iter().collect();
        assert_eq!(
            pairs,
            vec![(VariableId::new(0), 1), (VariableId::new(1), 2)]
        );
    }

    #[test]
    fn test_display() {
        let solution = Solution::<IntegerType>::new(vec![0, 1]);
        assert_eq!(format!("{}", solution), "Solution(x0=0, x1=1)");
    }
}
