//! Opportunities

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

/// Stable identifier of a catalog opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct OpportunityId(pub u32);

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for OpportunityId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Descriptive fields carried through to the output, unused by the optimizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityDetails<'a> {
    /// Street address
    pub address: Option<String>,

    /// Distance from the city centre in kilometres
    pub distance_km: Option<Decimal>,

    /// Expected monthly rental income
    pub rental_fee_monthly: Option<Money<'a, Currency>>,

    /// Present value of the rental cash flow
    pub pv_rent_cash_flow: Option<Money<'a, Currency>>,

    /// Present value of the eventual sale
    pub pv_sale: Option<Money<'a, Currency>>,
}

/// A purchasable investment opportunity.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity<'a> {
    id: OpportunityId,
    name: String,
    cost: Money<'a, Currency>,
    npv: Money<'a, Currency>,
    details: OpportunityDetails<'a>,
}

impl<'a> Opportunity<'a> {
    /// Create an opportunity without descriptive details.
    pub fn new(
        id: impl Into<OpportunityId>,
        name: impl Into<String>,
        cost: Money<'a, Currency>,
        npv: Money<'a, Currency>,
    ) -> Self {
        Self::with_details(id, name, cost, npv, OpportunityDetails::default())
    }

    /// Create an opportunity with descriptive details.
    pub fn with_details(
        id: impl Into<OpportunityId>,
        name: impl Into<String>,
        cost: Money<'a, Currency>,
        npv: Money<'a, Currency>,
        details: OpportunityDetails<'a>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            npv,
            details,
        }
    }

    /// Returns the identifier
    pub fn id(&self) -> OpportunityId {
        self.id
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the acquisition cost of one unit
    pub fn cost(&self) -> &Money<'a, Currency> {
        &self.cost
    }

    /// Returns the net present value of owning one unit
    pub fn npv(&self) -> &Money<'a, Currency> {
        &self.npv
    }

    /// Returns the passthrough descriptive fields
    pub fn details(&self) -> &OpportunityDetails<'a> {
        &self.details
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::VND;

    use super::*;

    #[test]
    fn opportunity_accessors_return_constructor_values() {
        let opportunity = Opportunity::new(
            7,
            "Centana - 1 bedrooms",
            Money::from_minor(3_150_000_000, VND),
            Money::from_minor(1_939_215_287, VND),
        );

        assert_eq!(opportunity.id(), OpportunityId(7));
        assert_eq!(opportunity.name(), "Centana - 1 bedrooms");
        assert_eq!(opportunity.cost().to_minor_units(), 3_150_000_000);
        assert_eq!(opportunity.npv().to_minor_units(), 1_939_215_287);
        assert_eq!(opportunity.details(), &OpportunityDetails::default());
    }

    #[test]
    fn opportunity_id_displays_with_hash() {
        assert_eq!(OpportunityId(12).to_string(), "#12");
    }

    #[test]
    fn opportunity_ids_order_numerically() {
        let mut ids = [OpportunityId(10), OpportunityId(2), OpportunityId(7)];
        ids.sort();

        assert_eq!(ids, [OpportunityId(2), OpportunityId(7), OpportunityId(10)]);
    }
}
