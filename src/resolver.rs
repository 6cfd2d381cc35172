//! Constraint Resolution
//!
//! Turns a catalog plus per-opportunity constraints into the solver's input:
//! forced-include opportunities are pre-purchased (one unit each, greedily in
//! catalog order), forced-exclude opportunities are dropped, and every other
//! remaining unit of capacity becomes a [`UnitSlot`].
//!
//! Forced purchases are first-come-first-served against the budget. Under a
//! tight budget a later forced opportunity can be priced out by an earlier one;
//! those are reported in [`Resolution::skipped_forced`] rather than rejected.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    catalog::Catalog,
    config::OptimizerConfig,
    constraints::{Constraint, ConstraintMap},
    holdings::Holdings,
    opportunities::OpportunityId,
    slots::UnitSlot,
};

/// Output of constraint resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    /// Budget left after forced purchases
    pub remaining_budget: Money<'a, Currency>,

    /// Units bought up-front for forced-include opportunities
    pub mandatory: Holdings,

    /// Additional purchasable units, in catalog order
    pub slots: Vec<UnitSlot>,

    /// Forced-include opportunities that did not fit in the budget
    pub skipped_forced: SmallVec<[OpportunityId; 4]>,
}

/// Resolve constraints against the catalog and budget.
pub fn resolve<'a>(
    catalog: &Catalog<'_>,
    constraints: &ConstraintMap,
    budget: &Money<'a, Currency>,
    config: &OptimizerConfig,
) -> Resolution<'a> {
    let mut remaining_minor = budget.to_minor_units();
    let mut mandatory = Holdings::new();
    let mut skipped_forced = SmallVec::new();

    for opportunity in catalog.iter() {
        if constraints.get(opportunity.id()) != Constraint::ForceInclude {
            continue;
        }

        let cost_minor = opportunity.cost().to_minor_units();

        if config.max_units_per_item > 0 && cost_minor <= remaining_minor {
            remaining_minor -= cost_minor;
            mandatory.add_unit(opportunity.id());
        } else {
            debug!(
                opportunity = %opportunity.id(),
                cost_minor,
                remaining_minor,
                "forced opportunity does not fit remaining budget"
            );

            skipped_forced.push(opportunity.id());
        }
    }

    let mut slots = Vec::new();

    for opportunity in catalog.iter() {
        if constraints.get(opportunity.id()) == Constraint::ForceExclude {
            continue;
        }

        let cost_minor = opportunity.cost().to_minor_units();

        if cost_minor <= 0 {
            continue;
        }

        let capacity = config
            .max_units_per_item
            .saturating_sub(mandatory.units(opportunity.id()));

        let slot = UnitSlot::new(
            opportunity.id(),
            cost_minor,
            opportunity.npv().to_minor_units(),
        );

        slots.extend((0..capacity).map(|_| slot));
    }

    Resolution {
        remaining_budget: Money::from_minor(remaining_minor, budget.currency()),
        mandatory,
        slots,
        skipped_forced,
    }
}
