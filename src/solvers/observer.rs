//! Search Observer

/// Observer for the branch-and-bound search as it runs.
///
/// Every callback has an empty default, so implementors only override what
/// they record. When no observer is needed the solver uses [`NoopObserver`]
/// and the calls are optimized away via monomorphization.
pub trait SearchObserver {
    /// Called each time a search node is visited.
    ///
    /// # Parameters
    ///
    /// - `depth`: Number of slots already decided on the path to this node
    fn on_node(&mut self, _depth: usize) {}

    /// Called when a subtree is discarded because its bound cannot beat the incumbent.
    ///
    /// # Parameters
    ///
    /// - `depth`: Depth of the pruned node
    /// - `bound`: Fractional upper bound of the subtree, in minor units
    /// - `incumbent`: Best value found so far, in minor units
    fn on_prune(&mut self, _depth: usize, _bound: i128, _incumbent: i64) {}

    /// Called when a strictly better complete selection is found.
    ///
    /// # Parameters
    ///
    /// - `value`: Value of the new incumbent, in minor units
    /// - `selection`: Candidate slot indices of the new incumbent, in search order
    fn on_incumbent(&mut self, _value: i64, _selection: &[usize]) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Counters describing how a search went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited
    pub nodes_visited: u64,

    /// Subtrees pruned by the bound
    pub pruned: u64,

    /// Times the incumbent improved
    pub incumbents: u64,
}

impl SearchObserver for SearchStats {
    fn on_node(&mut self, _depth: usize) {
        self.nodes_visited += 1;
    }

    fn on_prune(&mut self, _depth: usize, _bound: i128, _incumbent: i64) {
        self.pruned += 1;
    }

    fn on_incumbent(&mut self, _value: i64, _selection: &[usize]) {
        self.incumbents += 1;
    }
}

impl<O: SearchObserver + ?Sized> SearchObserver for &mut O {
    fn on_node(&mut self, depth: usize) {
        (**self).on_node(depth);
    }

    fn on_prune(&mut self, depth: usize, bound: i128, incumbent: i64) {
        (**self).on_prune(depth, bound, incumbent);
    }

    fn on_incumbent(&mut self, value: i64, selection: &[usize]) {
        (**self).on_incumbent(value, selection);
    }
}

impl<A: SearchObserver, B: SearchObserver> SearchObserver for (A, B) {
    fn on_node(&mut self, depth: usize) {
        self.0.on_node(depth);
        self.1.on_node(depth);
    }

    fn on_prune(&mut self, depth: usize, bound: i128, incumbent: i64) {
        self.0.on_prune(depth, bound, incumbent);
        self.1.on_prune(depth, bound, incumbent);
    }

    fn on_incumbent(&mut self, value: i64, selection: &[usize]) {
        self.0.on_incumbent(value, selection);
        self.1.on_incumbent(value, selection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_callbacks() {
        let mut stats = SearchStats::default();

        stats.on_node(0);
        stats.on_node(1);
        stats.on_prune(1, 10, 12);
        stats.on_incumbent(12, &[0]);

        assert_eq!(
            stats,
            SearchStats {
                nodes_visited: 2,
                pruned: 1,
                incumbents: 1,
            }
        );
    }

    #[test]
    fn pair_forwards_to_both_observers() {
        let mut first = SearchStats::default();
        let mut second = SearchStats::default();

        {
            let mut pair = (&mut first, &mut second);
            pair.on_node(0);
            pair.on_incumbent(1, &[]);
        }

        assert_eq!(first.nodes_visited, 1);
        assert_eq!(second.incumbents, 1);
    }
}
