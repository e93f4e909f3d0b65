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

//! Fathom-Search: the backtracking search driver
//!
//! A depth-first tree search expressed as a flat state machine, so that stack
//! usage is independent of search depth and interruption, restart and
//! resumption are ordinary state transitions instead of unwinding tricks.
//! One loop iteration reads the pending state, fires the matching `before_*`
//! monitor hooks, runs the transition, fires the `after_*` hooks in reverse
//! plug order, and honors any commands (interrupt, restart, limit) the
//! monitors queued.
//!
//! Core flow
//! - Build a `fathom_model::store::DomainStore` and hand it to
//!   [`driver::SearchLoop`].
//! - Provide a [`engine::PropagationEngine`] (constraint filtering to
//!   fixpoint) and a [`branching::BranchingStrategy`] (decision selection).
//! - Optionally install an [`objective::ObjectiveManager`] and plug
//!   [`monitor::search_monitor::SearchMonitor`]s.
//! - Call `launch`; read the verdict from [`measures::SearchMeasures`].
//!
//! Design highlights
//! - The decision chain owns its history: each applied decision owns its
//!   predecessor, so freeing the top of the chain on backtrack reclaims
//!   exactly the abandoned branch.
//! - Monitors cannot crash the search: a panicking hook is caught, logged
//!   and dropped.
//! - Contradictions are control flow, not errors; only structural misuse
//!   (`launch` on a running driver, popping to a future world) surfaces as
//!   [`error::SearchError`].
//!
//! Module map
//! - `step`: the state tag dispatched by the loop.
//! - `driver`: the loop itself and its lifecycle operations.
//! - `decision`: the decision capability trait, concrete decisions, the chain.
//! - `branching`: strategy contract plus input-order / first-fail / bisection.
//! - `engine`: propagation contract and the inert engine used after `reset`.
//! - `objective`: satisfaction vs. minimize/maximize, bound recording, cuts.
//! - `measures`: counters and the feasibility/optimality verdict.
//! - `monitor`: hook trait, dispatch list, limits, recorders, restart policies.
//! - `result`: stop reasons reported at the end of a resolution.

pub mod branching;
pub mod decision;
pub mod driver;
pub mod engine;
pub mod error;
pub mod measures;
pub mod monitor;
pub mod objective;
pub mod result;
pub mod step;
