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

/// The state tag dispatched by the search loop.
///
/// The loop is a flat rendition of a recursive tree search: every iteration
/// runs exactly one of these transitions and leaves the tag for the next one
/// behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStep {
    /// Record the root world and move to the initial propagation.
    Init,
    /// Run propagation on the root state and check its feasibility.
    InitialPropagation,
    /// Check for a solution or ask the strategy for the next decision.
    OpenNode,
    /// Apply the left branch of the current decision and propagate.
    DownLeft,
    /// Apply the next branch of the current decision and propagate.
    DownRight,
    /// Roll back one (or `jump_to`) worlds and reconsider the decision.
    UpBranch,
    /// Rewind to the world right after the initial propagation.
    Restart,
    /// Leave the loop. Dispatching this tag exits; an external driver that
    /// pauses the search must replace it before re-entering.
    Resume,
}

impl std::fmt::Display for SearchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SearchStep::Init => "Init",
            SearchStep::InitialPropagation => "InitialPropagation",
            SearchStep::OpenNode => "OpenNode",
            SearchStep::DownLeft => "DownLeft",
            SearchStep::DownRight => "DownRight",
            SearchStep::UpBranch => "UpBranch",
            SearchStep::Restart => "Restart",
            SearchStep::Resume => "Resume",
        };
        write!(f, "{}", name)
    }
}
