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

//! Fathom-Solver: the user-facing facade
//!
//! Wires the three lower layers into one type: variables and domains from
//! `fathom-model`, a round-robin fixpoint engine with concrete propagators,
//! and the search driver from `fathom-search`. Declare variables, post
//! propagators, then ask for one solution, all solutions, or an optimum.
//!
//! ```rust
//! use fathom_solver::propagation::arithm::NotEqual;
//! use fathom_solver::solver::Solver;
//!
//! let mut solver = Solver::<i64>::new();
//! let x = solver.new_variable(0, 1);
//! let y = solver.new_variable(0, 1);
//! solver.post(Box::new(NotEqual::new(x, y)));
//!
//! let outcome = solver.find_all_solutions().unwrap();
//! assert_eq!(outcome.len(), 2);
//! ```
//!
//! Module map
//! - `propagation`: the fixpoint engine, arithmetic and linear propagators,
//!   and solution nogoods for restart-based enumeration.
//! - `solver`: the `Solver` facade and its outcome reporting.

pub mod propagation;
pub mod solver;
