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

use num_traits::{CheckedAdd, CheckedSub, PrimInt, Signed};

/// A trait alias for the numeric types a variable domain can range over.
/// These are usually the signed integer primitives `i8`, `i16`, `i32`, `i64`
/// and `isize`.
///
/// # Note
///
/// `i128` is intentionally excluded: it is significantly slower on many
/// platforms and domains wide enough to need it would not fit in an
/// enumerated representation anyway.
pub trait DomainValue:
    PrimInt
    + Signed
    + CheckedAdd
    + CheckedSub
    + std::fmt::Debug
    + std::fmt::Display
    + 'static
{
}

impl<T> DomainValue for T where
    T: PrimInt
        + Signed
        + CheckedAdd
        + CheckedSub
        + std::fmt::Debug
        + std::fmt::Display
        + 'static
{
}
