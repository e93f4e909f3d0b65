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

//! Fathom-Model: variables, domains and the backtrackable store
//!
//! This crate holds the data the search mutates: integer variables with
//! enumerated finite domains, and the `DomainStore` that records every domain
//! mutation on an undo trail organized in *worlds*. Pushing a world marks a
//! save point; popping a world restores every domain to the state it had at
//! the matching push. The search driver in `fathom-search` drives the store
//! exclusively through the world operations, while propagators shrink domains
//! through the `try_*` mutators.
//!
//! Module map
//! - `index`: strongly typed `VariableId` / `PropagatorId`.
//! - `value`: the `DomainValue` trait alias bounding domain value types.
//! - `domain`: a single enumerated domain (offset + bit set, cached bounds).
//! - `store`: the trailed collection of all domains, with world push/pop.
//! - `solution`: immutable snapshot of a fully instantiated store.

pub mod domain;
pub mod index;
pub mod solution;
pub mod store;
pub mod value;
