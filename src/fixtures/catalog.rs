//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_money},
    opportunities::{Opportunity, OpportunityDetails, OpportunityId},
};

/// Wrapper for a catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Catalog currency code (e.g., "VND")
    pub currency: String,

    /// Opportunities in the catalog
    pub opportunities: Vec<OpportunityFixture>,
}

/// Opportunity Fixture
#[derive(Debug, Deserialize)]
pub struct OpportunityFixture {
    /// Stable identifier
    pub id: OpportunityId,

    /// Display name
    pub name: String,

    /// Acquisition cost of one unit (e.g., "4676470600 VND")
    pub cost: String,

    /// Net present value of one unit
    pub npv: String,

    /// Street address
    #[serde(default)]
    pub address: Option<String>,

    /// Distance from the city centre in kilometres
    #[serde(default)]
    pub distance_km: Option<f64>,

    /// Expected monthly rent
    #[serde(default)]
    pub rental_fee_monthly: Option<String>,

    /// Present value of the rental cash flow
    #[serde(default)]
    pub pv_rent_cash_flow: Option<String>,

    /// Present value of the eventual sale
    #[serde(default)]
    pub pv_sale: Option<String>,
}

impl OpportunityFixture {
    /// Convert into an [`Opportunity`], checking every amount is in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be parsed, uses another currency, or
    /// the distance is not a finite number.
    pub fn try_into_opportunity(
        self,
        currency: &'static Currency,
    ) -> Result<Opportunity<'static>, FixtureError> {
        let money = |value: &str| -> Result<Money<'static, Currency>, FixtureError> {
            let parsed = parse_money(value)?;

            if parsed.currency() == currency {
                Ok(parsed)
            } else {
                Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    parsed.currency().iso_alpha_code.to_string(),
                ))
            }
        };

        let optional = |value: Option<&String>| value.map(|v| money(v)).transpose();

        let distance_km = self
            .distance_km
            .map(|km| {
                Decimal::from_f64(km).ok_or_else(|| FixtureError::InvalidNumber(km.to_string()))
            })
            .transpose()?;

        let details = OpportunityDetails {
            address: self.address,
            distance_km,
            rental_fee_monthly: optional(self.rental_fee_monthly.as_ref())?,
            pv_rent_cash_flow: optional(self.pv_rent_cash_flow.as_ref())?,
            pv_sale: optional(self.pv_sale.as_ref())?,
        };

        Ok(Opportunity::with_details(
            self.id,
            self.name,
            money(&self.cost)?,
            money(&self.npv)?,
            details,
        ))
    }
}
