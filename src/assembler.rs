//! Result Assembly
//!
//! Merges forced purchases with the solver's selection and recomputes every
//! aggregate from the merged quantities. Running totals kept during the search
//! are never carried into the result.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    financing::Financing,
    holdings::Holdings,
    opportunities::{Opportunity, OpportunityId},
    slots::UnitSlot,
    solvers::{SearchStatus, Selection, observer::SearchStats},
};

/// Errors raised while assembling a result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// The selection refers to a slot that was not offered.
    #[error("selected slot {0} does not exist")]
    UnknownSlot(usize),

    /// A held opportunity is missing from the catalog.
    #[error("opportunity {0} is not in the catalog")]
    UnknownOpportunity(OpportunityId),

    /// An aggregate does not fit in minor units.
    #[error("portfolio totals overflowed")]
    Overflow,
}

/// Units held of one opportunity, with the opportunity's passthrough fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Position<'a> {
    /// The opportunity held
    pub opportunity: Opportunity<'a>,

    /// Units purchased (always at least one)
    pub units: u32,

    /// `units × cost`
    pub total_cost: Money<'a, Currency>,

    /// `units × npv`
    pub total_value: Money<'a, Currency>,
}

/// How the search behind a result went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    /// Whether the selection is proven optimal
    pub status: SearchStatus,

    /// Search counters
    pub stats: SearchStats,
}

/// Final valuation of an optimized portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult<'a> {
    /// Held opportunities in catalog order
    pub positions: Vec<Position<'a>>,

    /// Sum of `units × cost` over all positions
    pub total_cost: Money<'a, Currency>,

    /// Sum of `units × npv` over all positions
    pub operational_value: Money<'a, Currency>,

    /// Valuation of the loan drawn against the budget
    pub financing: Financing<'a>,

    /// Operational value plus net financing value
    pub grand_total_value: Money<'a, Currency>,

    /// Budget ceiling before any purchase
    pub budget_limit: Money<'a, Currency>,

    /// Budget ceiling minus total cost
    pub remaining_budget: Money<'a, Currency>,

    /// Forced-include opportunities that did not fit in the budget
    pub skipped_forced: SmallVec<[OpportunityId; 4]>,

    /// Search outcome
    pub search: SearchSummary,
}

impl<'a> OptimizationResult<'a> {
    /// Net financing value (principal minus present value of obligations)
    pub fn net_financing_value(&self) -> Money<'a, Currency> {
        self.financing.net_value
    }

    /// Amount borrowed
    pub fn loan_principal(&self) -> Money<'a, Currency> {
        self.financing.principal
    }

    /// Own funds put in: the budget less the loan principal.
    pub fn equity(&self) -> Money<'a, Currency> {
        Money::from_minor(
            self.budget_limit
                .to_minor_units()
                .saturating_sub(self.financing.principal.to_minor_units()),
            self.budget_limit.currency(),
        )
    }

    /// Units held of an opportunity.
    pub fn units(&self, id: OpportunityId) -> u32 {
        self.positions
            .iter()
            .find(|position| position.opportunity.id() == id)
            .map_or(0, |position| position.units)
    }

    /// Total units across all positions.
    pub fn total_units(&self) -> u64 {
        self.positions.iter().map(|p| u64::from(p.units)).sum()
    }

    /// Operational value per unit of money invested, `None` when nothing is invested.
    pub fn return_on_investment(&self) -> Option<Decimal> {
        let cost = self.total_cost.to_minor_units();

        if cost == 0 {
            return None;
        }

        Decimal::from(self.operational_value.to_minor_units()).checked_div(Decimal::from(cost))
    }

    /// Whether the selection is proven optimal.
    pub fn is_optimal(&self) -> bool {
        self.search.status == SearchStatus::Optimal
    }

    /// Attach search counters.
    #[must_use]
    pub fn with_search_stats(mut self, stats: SearchStats) -> Self {
        self.search.stats = stats;
        self
    }

    /// Attach the forced-include opportunities that could not be bought.
    #[must_use]
    pub fn with_skipped_forced(mut self, skipped: SmallVec<[OpportunityId; 4]>) -> Self {
        self.skipped_forced = skipped;
        self
    }
}

/// Merge forced purchases and a solver selection into a valued result.
///
/// # Errors
///
/// Returns an [`AssemblyError`] if the selection or holdings refer to unknown
/// slots or opportunities, or if totals overflow.
pub fn assemble<'a>(
    mandatory: &Holdings,
    selection: &Selection,
    slots: &[UnitSlot],
    catalog: &Catalog<'a>,
    budget: &Money<'a, Currency>,
    financing: &Financing<'a>,
) -> Result<OptimizationResult<'a>, AssemblyError> {
    let mut holdings = mandatory.clone();

    for idx in &selection.indices {
        let slot = slots.get(*idx).ok_or(AssemblyError::UnknownSlot(*idx))?;

        holdings.add_unit(slot.opportunity());
    }

    if let Some((id, _)) = holdings.iter().find(|(id, _)| !catalog.contains(*id)) {
        return Err(AssemblyError::UnknownOpportunity(id));
    }

    let currency = budget.currency();
    let mut positions = Vec::with_capacity(holdings.len());
    let mut total_cost = 0_i64;
    let mut operational_value = 0_i64;

    for opportunity in catalog.iter() {
        let units = holdings.units(opportunity.id());

        if units == 0 {
            continue;
        }

        let cost = times(opportunity.cost(), units)?;
        let value = times(opportunity.npv(), units)?;

        total_cost = total_cost.checked_add(cost).ok_or(AssemblyError::Overflow)?;
        operational_value = operational_value
            .checked_add(value)
            .ok_or(AssemblyError::Overflow)?;

        positions.push(Position {
            opportunity: opportunity.clone(),
            units,
            total_cost: Money::from_minor(cost, currency),
            total_value: Money::from_minor(value, currency),
        });
    }

    let grand_total = operational_value
        .checked_add(financing.net_value.to_minor_units())
        .ok_or(AssemblyError::Overflow)?;

    let remaining = budget
        .to_minor_units()
        .checked_sub(total_cost)
        .ok_or(AssemblyError::Overflow)?;

    Ok(OptimizationResult {
        positions,
        total_cost: Money::from_minor(total_cost, currency),
        operational_value: Money::from_minor(operational_value, currency),
        financing: *financing,
        grand_total_value: Money::from_minor(grand_total, currency),
        budget_limit: *budget,
        remaining_budget: Money::from_minor(remaining, currency),
        skipped_forced: SmallVec::new(),
        search: SearchSummary {
            status: selection.status,
            stats: SearchStats::default(),
        },
    })
}

fn times(amount: &Money<'_, Currency>, units: u32) -> Result<i64, AssemblyError> {
    amount
        .to_minor_units()
        .checked_mul(i64::from(units))
        .ok_or(AssemblyError::Overflow)
}
