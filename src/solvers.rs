//! Solvers for Portfolio Selection

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    config::OptimizerConfig,
    slots::UnitSlot,
    solvers::observer::{NoopObserver, SearchObserver},
};

pub mod branch_and_bound;
pub mod observer;

/// Solver Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// A slot with a non-positive cost was offered to the solver.
    #[error("slot {index} has non-positive cost {cost_minor}")]
    NonPositiveCost {
        /// Candidate index of the slot
        index: usize,
        /// Cost in minor units
        cost_minor: i64,
    },

    /// Accumulated value does not fit in minor units.
    #[error("selection value overflowed")]
    Overflow,
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The search ran to completion; the selection is a global optimum.
    Optimal,

    /// The node budget ran out; the selection is the best found so far.
    NodeLimitReached,
}

/// Result of a solver run over a set of candidate slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Indexes of the chosen slots in candidate order, ascending
    pub indices: SmallVec<[usize; 16]>,

    /// Total value of the chosen slots, in minor units
    pub value_minor: i64,

    /// Total cost of the chosen slots, in minor units
    pub cost_minor: i64,

    /// Whether the selection is proven optimal
    pub status: SearchStatus,
}

impl Selection {
    /// An empty, trivially optimal selection.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            indices: SmallVec::new(),
            value_minor: 0,
            cost_minor: 0,
            status: SearchStatus::Optimal,
        }
    }

    /// Check if nothing was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Trait for choosing the value-maximizing subset of unit slots within a capacity.
pub trait Solver {
    /// Solve without observing the search.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the slots are malformed or values overflow.
    fn solve(
        slots: &[UnitSlot],
        capacity_minor: i64,
        config: &OptimizerConfig,
    ) -> Result<Selection, SolverError> {
        Self::solve_with_observer(slots, capacity_minor, config, NoopObserver)
    }

    /// Solve while reporting search events to `observer`.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the slots are malformed or values overflow.
    fn solve_with_observer<O: SearchObserver>(
        slots: &[UnitSlot],
        capacity_minor: i64,
        config: &OptimizerConfig,
        observer: O,
    ) -> Result<Selection, SolverError>;
}
