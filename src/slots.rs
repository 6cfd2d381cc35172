//! Unit Slots

use std::cmp::Ordering;

use crate::opportunities::OpportunityId;

/// One purchasable unit of an opportunity, as seen by the solver.
///
/// Costs and values are carried in minor units so the search stays in exact
/// integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSlot {
    opportunity: OpportunityId,
    cost_minor: i64,
    value_minor: i64,
}

impl UnitSlot {
    /// Create a slot for one more unit of `opportunity`.
    pub fn new(opportunity: OpportunityId, cost_minor: i64, value_minor: i64) -> Self {
        Self {
            opportunity,
            cost_minor,
            value_minor,
        }
    }

    /// Opportunity this slot buys a unit of
    pub fn opportunity(&self) -> OpportunityId {
        self.opportunity
    }

    /// Cost of the unit in minor units
    pub fn cost_minor(&self) -> i64 {
        self.cost_minor
    }

    /// Value of the unit in minor units
    pub fn value_minor(&self) -> i64 {
        self.value_minor
    }

    /// Value per unit of cost, for display.
    #[expect(
        clippy::cast_precision_loss,
        reason = "ratio is informational; ordering uses exact comparison"
    )]
    pub fn ratio(&self) -> f64 {
        if self.cost_minor == 0 {
            return 0.0;
        }

        self.value_minor as f64 / self.cost_minor as f64
    }

    /// Compare value/cost efficiency exactly, highest first.
    ///
    /// Both costs must be positive.
    pub fn cmp_efficiency_desc(&self, other: &Self) -> Ordering {
        let lhs = i128::from(self.value_minor) * i128::from(other.cost_minor);
        let rhs = i128::from(other.value_minor) * i128::from(self.cost_minor);

        rhs.cmp(&lhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_efficient_slot_orders_first() {
        let efficient = UnitSlot::new(OpportunityId(1), 60, 45);
        let plain = UnitSlot::new(OpportunityId(2), 100, 50);

        assert_eq!(efficient.cmp_efficiency_desc(&plain), Ordering::Less);
        assert_eq!(plain.cmp_efficiency_desc(&efficient), Ordering::Greater);
    }

    #[test]
    fn equal_ratios_compare_equal() {
        let small = UnitSlot::new(OpportunityId(1), 10, 5);
        let large = UnitSlot::new(OpportunityId(2), 1_000_000_000_000, 500_000_000_000);

        assert_eq!(small.cmp_efficiency_desc(&large), Ordering::Equal);
    }

    #[test]
    fn ratio_reports_value_per_cost() {
        let slot = UnitSlot::new(OpportunityId(1), 200, 50);

        assert!((slot.ratio() - 0.25).abs() < f64::EPSILON);
        assert!(UnitSlot::new(OpportunityId(2), 0, 10).ratio().abs() < f64::EPSILON);
    }
}
