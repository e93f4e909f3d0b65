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

//! # Enumerated Integer Domains
//!
//! A `Domain<T>` is the set of values a variable may still take: a base
//! offset plus a bit set recording membership, with the bounds and the size
//! cached. All mutators keep the invariant that `min` and `max` are present
//! values, and report a wipe-out (`EmptyDomain`) instead of ever leaving the
//! domain empty.

use crate::value::DomainValue;
use fixedbitset::FixedBitSet;

/// Signals that a domain mutation would have removed the last value.
///
/// This is the normal control-flow signal of constraint filtering, not a
/// programming error; callers recover by backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyDomain;

impl std::fmt::Display for EmptyDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "domain wiped out")
    }
}

impl std::error::Error for EmptyDomain {}

/// The set of values a variable may still take.
///
/// Values are stored as a membership bit set over the initial interval
/// `[lb0, ub0]` handed to [`Domain::new`]; removals punch holes, and the
/// current bounds plus the cardinality are kept cached so that `min`, `max`
/// and `size` are O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain<T> {
    /// The value mapped to bit 0. Never changes after construction.
    base: T,
    bits: FixedBitSet,
    lb: T,
    ub: T,
    size: usize,
}

impl<T> Domain<T>
where
    T: DomainValue,
{
    /// Creates the full domain `{lb, lb + 1, …, ub}`.
    ///
    /// # Panics
    ///
    /// Panics if `lb > ub` or if the span `ub - lb` does not fit in `usize`
    /// (an enumerated representation of such a domain would be absurd).
    pub fn new(lb: T, ub: T) -> Self {
        assert!(
            lb <= ub,
            "called `Domain::new` with inverted bounds: lb is {} but ub is {}",
            lb,
            ub
        );
        let width = ub
            .checked_sub(&lb)
            .and_then(|w| w.to_usize())
            .and_then(|w| w.checked_add(1))
            .expect("domain span exceeds the addressable range");

        let mut bits = FixedBitSet::with_capacity(width);
        bits.insert_range(..);

        Self {
            base: lb,
            bits,
            lb,
            ub,
            size: width,
        }
    }

    /// Returns the smallest value still in the domain.
    #[inline]
    pub fn min(&self) -> T {
        self.lb
    }

    /// Returns the largest value still in the domain.
    #[inline]
    pub fn max(&self) -> T {
        self.ub
    }

    /// Returns the number of values still in the domain.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if exactly one value remains.
    #[inline]
    pub fn is_instantiated(&self) -> bool {
        self.size == 1
    }

    /// Returns the instantiated value, or `None` if more than one value
    /// remains.
    #[inline]
    pub fn value(&self) -> Option<T> {
        if self.size == 1 {
            Some(self.lb)
        } else {
            None
        }
    }

    /// Returns `true` if `value` is still in the domain.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        if value < self.lb || value > self.ub {
            return false;
        }
        self.bits.contains(self.offset_of(value))
    }

    /// Removes a single value.
    ///
    /// Returns `Ok(true)` if the domain changed, `Ok(false)` if the value was
    /// already absent, and `Err(EmptyDomain)` if `value` was the last value.
    pub fn remove(&mut self, value: T) -> Result<bool, EmptyDomain> {
        if !self.contains(value) {
            return Ok(false);
        }
        if self.size == 1 {
            return Err(EmptyDomain);
        }

        let idx = self.offset_of(value);
        self.bits.set(idx, false);
        self.size -= 1;

        if value == self.lb {
            let next = self
                .first_present_at_or_after(idx + 1)
                .expect("a non-empty domain has a value above its removed minimum");
            self.lb = self.value_at(next);
        } else if value == self.ub {
            let prev = self
                .last_present_at_or_before(idx - 1)
                .expect("a non-empty domain has a value below its removed maximum");
            self.ub = self.value_at(prev);
        }
        Ok(true)
    }

    /// Removes every value strictly below `min`.
    ///
    /// Returns `Ok(true)` if the domain changed, `Ok(false)` if `min` was not
    /// above the current minimum, and `Err(EmptyDomain)` if no value `>= min`
    /// remains.
    pub fn remove_below(&mut self, min: T) -> Result<bool, EmptyDomain> {
        if min <= self.lb {
            return Ok(false);
        }
        if min > self.ub {
            return Err(EmptyDomain);
        }

        let start = self.offset_of(self.lb);
        let end = self.offset_of(min);
        for idx in start..end {
            if self.bits.contains(idx) {
                self.bits.set(idx, false);
                self.size -= 1;
            }
        }
        let next = self
            .first_present_at_or_after(end)
            .expect("the maximum is present and not below the new minimum");
        self.lb = self.value_at(next);
        Ok(true)
    }

    /// Removes every value strictly above `max`.
    ///
    /// Returns `Ok(true)` if the domain changed, `Ok(false)` if `max` was not
    /// below the current maximum, and `Err(EmptyDomain)` if no value `<= max`
    /// remains.
    pub fn remove_above(&mut self, max: T) -> Result<bool, EmptyDomain> {
        if max >= self.ub {
            return Ok(false);
        }
        if max < self.lb {
            return Err(EmptyDomain);
        }

        let start = self.offset_of(max) + 1;
        let end = self.offset_of(self.ub) + 1;
        for idx in start..end {
            if self.bits.contains(idx) {
                self.bits.set(idx, false);
                self.size -= 1;
            }
        }
        let prev = self
            .last_present_at_or_before(start - 1)
            .expect("the minimum is present and not above the new maximum");
        self.ub = self.value_at(prev);
        Ok(true)
    }

    /// Reduces the domain to the single value `value`.
    ///
    /// Returns `Ok(true)` if the domain changed, `Ok(false)` if it was
    /// already instantiated to `value`, and `Err(EmptyDomain)` if `value` is
    /// not in the domain.
    pub fn instantiate_to(&mut self, value: T) -> Result<bool, EmptyDomain> {
        if !self.contains(value) {
            return Err(EmptyDomain);
        }
        if self.size == 1 {
            return Ok(false);
        }

        let keep = self.offset_of(value);
        self.bits.clear();
        self.bits.insert(keep);
        self.size = 1;
        self.lb = value;
        self.ub = value;
        Ok(true)
    }

    /// Iterates over the remaining values in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.bits.ones().map(move |idx| self.value_at(idx))
    }

    #[inline]
    fn offset_of(&self, value: T) -> usize {
        debug_assert!(
            value >= self.base,
            "called `Domain::offset_of` with a value below the domain base"
        );
        (value - self.base)
            .to_usize()
            .expect("domain offsets fit in usize by construction")
    }

    #[inline]
    fn value_at(&self, idx: usize) -> T {
        self.base + T::from(idx).expect("bit indices fit in the domain value type by construction")
    }

    fn first_present_at_or_after(&self, mut idx: usize) -> Option<usize> {
        while idx < self.bits.len() {
            if self.bits.contains(idx) {
                return Some(idx);
            }
            idx += 1;
        }
        None
    }

    fn last_present_at_or_before(&self, mut idx: usize) -> Option<usize> {
        loop {
            if self.bits.contains(idx) {
                return Some(idx);
            }
            if idx == 0 {
                return None;
            }
            idx -= 1;
        }
    }
}

impl<T> std::fmt::Display for Domain<T>
where
    T: DomainValue,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "}}")
    }
}
