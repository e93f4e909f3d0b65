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

use crate::monitor::search_monitor::{SearchContext, SearchMonitor};

/// Requests a limit stop once the driver has opened `limit` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimitMonitor {
    limit: u64,
}

impl NodeLimitMonitor {
    /// Creates a monitor allowing at most `limit` opened nodes.
    #[inline]
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl<T> SearchMonitor<T> for NodeLimitMonitor {
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    #[inline]
    fn after_open_node(&mut self, ctx: &mut SearchContext<'_, T>) {
        if ctx.measures().node_count >= self.limit {
            ctx.reach_limit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measures::SearchMeasures;
    use crate::monitor::search_monitor::SearchCommands;
    use fathom_model::store::DomainStore;

    type IntegerType = i64;

    #[test]
    fn test_trips_exactly_at_the_limit() {
        let mut measures = SearchMeasures::new();
        let store = DomainStore::<IntegerType>::new();
        let mut monitor = NodeLimitMonitor::new(3);

        for expected_trip in [false, false, true] {
            measures.on_node();
            let mut commands = SearchCommands::new();
            let mut ctx =
                SearchContext::<IntegerType>::new(&measures, &store, 0, 0, &mut commands);
            monitor.after_open_node(&mut ctx);
            assert_eq!(!commands.is_empty(), expected_trip);
        }
    }
}
