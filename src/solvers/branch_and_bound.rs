//! Branch and Bound Solver
//!
//! Exact 0/1 knapsack over unit slots. Slots are visited in descending
//! value/cost order; each node is bounded by the fractional relaxation of the
//! remaining slots and discarded when that bound cannot beat the incumbent.
//!
//! The depth-first walk runs on an explicit work stack rather than native
//! recursion, so deep candidate lists cannot exhaust the call stack. The
//! include branch of a node is always explored before its exclude branch.

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    config::OptimizerConfig,
    slots::UnitSlot,
    solvers::{SearchStatus, Selection, Solver, SolverError, observer::SearchObserver},
};

/// Depth-first branch-and-bound knapsack solver.
#[derive(Debug)]
pub struct BranchAndBoundSolver;

/// Pending work on the search stack.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Decide the slot at `depth` given the path so far.
    Visit {
        depth: usize,
        weight: i64,
        value: i64,
    },

    /// Undo the include decision pushed before the matching `Visit`.
    Backtrack,
}

impl Solver for BranchAndBoundSolver {
    fn solve_with_observer<O: SearchObserver>(
        slots: &[UnitSlot],
        capacity_minor: i64,
        config: &OptimizerConfig,
        mut observer: O,
    ) -> Result<Selection, SolverError> {
        if let Some((index, slot)) = slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.cost_minor() <= 0)
        {
            return Err(SolverError::NonPositiveCost {
                index,
                cost_minor: slot.cost_minor(),
            });
        }

        // Return early if there is nothing to decide
        if slots.is_empty() || capacity_minor <= 0 {
            return Ok(Selection::empty());
        }

        let order = efficiency_order(slots);
        let sorted: SmallVec<[UnitSlot; 32]> = order
            .iter()
            .filter_map(|idx| slots.get(*idx).copied())
            .collect();

        debug!(
            slots = slots.len(),
            capacity_minor, "starting branch and bound search"
        );

        let mut best_value = 0_i64;
        let mut best_path: SmallVec<[usize; 16]> = SmallVec::new();
        let mut path: SmallVec<[usize; 16]> = SmallVec::new();
        let mut nodes = 0_u64;
        let mut status = SearchStatus::Optimal;

        let mut stack = vec![Frame::Visit {
            depth: 0,
            weight: 0,
            value: 0,
        }];

        while let Some(frame) = stack.pop() {
            let (depth, weight, value) = match frame {
                Frame::Backtrack => {
                    path.pop();
                    continue;
                }
                Frame::Visit {
                    depth,
                    weight,
                    value,
                } => (depth, weight, value),
            };

            if config.node_limit.is_some_and(|limit| nodes >= limit) {
                status = SearchStatus::NodeLimitReached;
                break;
            }

            nodes += 1;
            observer.on_node(depth);

            if weight > capacity_minor {
                continue;
            }

            let (Some(slot), Some(candidate_idx)) = (sorted.get(depth), order.get(depth)) else {
                // Every slot has been decided
                if value > best_value {
                    best_value = value;
                    best_path.clone_from(&path);
                    observer.on_incumbent(best_value, &best_path);
                }

                continue;
            };

            let bound = fractional_bound(&sorted, depth, weight, value, capacity_minor);

            if bound <= i128::from(best_value) {
                observer.on_prune(depth, bound, best_value);
                continue;
            }

            // Exclude branch runs once the include subtree has been exhausted
            stack.push(Frame::Visit {
                depth: depth + 1,
                weight,
                value,
            });

            if let Some(next_weight) = weight
                .checked_add(slot.cost_minor())
                .filter(|next| *next <= capacity_minor)
            {
                let next_value = value
                    .checked_add(slot.value_minor())
                    .ok_or(SolverError::Overflow)?;

                stack.push(Frame::Backtrack);
                stack.push(Frame::Visit {
                    depth: depth + 1,
                    weight: next_weight,
                    value: next_value,
                });

                path.push(*candidate_idx);
            }
        }

        if status == SearchStatus::NodeLimitReached {
            warn!(
                nodes,
                best_value, "node limit reached; returning best selection found so far"
            );
        }

        best_path.sort_unstable();

        let cost_minor = best_path
            .iter()
            .filter_map(|idx| slots.get(*idx))
            .try_fold(0_i64, |acc, slot| acc.checked_add(slot.cost_minor()))
            .ok_or(SolverError::Overflow)?;

        debug!(
            nodes,
            value_minor = best_value,
            cost_minor,
            selected = best_path.len(),
            "branch and bound search finished"
        );

        Ok(Selection {
            indices: best_path,
            value_minor: best_value,
            cost_minor,
            status,
        })
    }
}

/// Candidate indexes sorted by descending efficiency; ties keep candidate order.
fn efficiency_order(slots: &[UnitSlot]) -> SmallVec<[usize; 32]> {
    let mut order: SmallVec<[usize; 32]> = (0..slots.len()).collect();

    order.sort_by(|a, b| match (slots.get(*a), slots.get(*b)) {
        (Some(lhs), Some(rhs)) => lhs.cmp_efficiency_desc(rhs),
        _ => a.cmp(b),
    });

    order
}

/// Fractional-relaxation upper bound for completions of a partial selection.
///
/// Whole slots are added greedily from `start` while they fit, then a floored
/// proportional share of the first slot that does not. Slots with non-positive
/// value only ever lower a completion, so the fill stops at the first one.
fn fractional_bound(sorted: &[UnitSlot], start: usize, weight: i64, value: i64, capacity: i64) -> i128 {
    if weight > capacity {
        return 0;
    }

    let mut bound = i128::from(value);
    let mut room = i128::from(capacity) - i128::from(weight);

    for slot in sorted.iter().skip(start) {
        if slot.value_minor() <= 0 {
            break;
        }

        let cost = i128::from(slot.cost_minor());
        let slot_value = i128::from(slot.value_minor());

        if cost <= room {
            room -= cost;
            bound += slot_value;
        } else {
            bound += slot_value * room / cost;
            break;
        }
    }

    bound
}
