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

use fathom_model::store::InvalidWorld;

/// Structural errors surfaced to the caller of the search driver.
///
/// Contradictions and limit hits are *not* errors; the driver recovers from
/// them internally. What remains is misuse of the driver API or a bug in a
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// `launch` was called while the driver is not in its initial state.
    /// Call `reset` before solving the same problem again.
    NotInitialized,
    /// A trail rollback targeted a world above the current one.
    InvalidWorld(InvalidWorld),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::NotInitialized => {
                write!(
                    f,
                    "the search has not been initialized; call `reset` before launching again"
                )
            }
            SearchError::InvalidWorld(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<InvalidWorld> for SearchError {
    fn from(err: InvalidWorld) -> Self {
        SearchError::InvalidWorld(err)
    }
}
