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

//! # Search Monitors
//!
//! Pluggable observers hooked into every transition of the search loop.
//! Monitors collect telemetry, record solutions, enforce budgets and drive
//! restart policies — without any of that entangling the loop itself. A
//! monitor influences the search only through the command sink of its
//! context: request an interrupt, a restart, or report a spent limit; the
//! driver honors queued commands before running the next transition.
//!
//! ## Submodules
//!
//! - `search_monitor`: the hook trait, the per-dispatch `SearchContext`, and
//!   the command sink.
//! - `list`: ordered dispatch to plugged monitors, panic isolation included.
//! - `index`: strongly typed monitor indices.
//! - `time_limit`, `node_limit`, `solution_limit`, `fail_limit`: budget
//!   monitors reporting through `reach_limit`.
//! - `solution`: records solutions as they are found.
//! - `restart`: geometric and Luby restart policies.
//! - `log`: throttled progress table on stdout.

pub mod fail_limit;
pub mod index;
pub mod list;
pub mod log;
pub mod node_limit;
pub mod restart;
pub mod search_monitor;
pub mod solution;
pub mod solution_limit;
pub mod time_limit;
