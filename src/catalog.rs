//! Catalog

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::opportunities::{Opportunity, OpportunityId};

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two opportunities share an identifier.
    #[error("Duplicate opportunity id {0}")]
    DuplicateId(OpportunityId),

    /// An opportunity's cost is negative.
    #[error("Opportunity {0} has a negative cost")]
    NegativeCost(OpportunityId),

    /// An opportunity's currency differs from the catalog currency (id, item currency, catalog currency).
    #[error("Opportunity {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(OpportunityId, &'static str, &'static str),
}

/// Read-only set of opportunities, held in ascending identifier order.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    opportunities: Vec<Opportunity<'a>>,
    positions: FxHashMap<OpportunityId, usize>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            opportunities: Vec::new(),
            positions: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from the given opportunities.
    ///
    /// Opportunities are reordered by ascending identifier; that order is the
    /// canonical order used for forced purchases and for reporting.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids, negative costs or mixed currencies.
    pub fn with_opportunities(
        opportunities: impl Into<Vec<Opportunity<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut opportunities = opportunities.into();

        for opportunity in &opportunities {
            for money in [opportunity.cost(), opportunity.npv()] {
                if money.currency() != currency {
                    return Err(CatalogError::CurrencyMismatch(
                        opportunity.id(),
                        money.currency().iso_alpha_code,
                        currency.iso_alpha_code,
                    ));
                }
            }

            if opportunity.cost().to_minor_units() < 0 {
                return Err(CatalogError::NegativeCost(opportunity.id()));
            }
        }

        opportunities.sort_by_key(Opportunity::id);

        let mut positions = FxHashMap::default();

        for (idx, opportunity) in opportunities.iter().enumerate() {
            if positions.insert(opportunity.id(), idx).is_some() {
                return Err(CatalogError::DuplicateId(opportunity.id()));
            }
        }

        Ok(Catalog {
            opportunities,
            positions,
            currency,
        })
    }

    /// Look up an opportunity by identifier.
    pub fn get(&self, id: OpportunityId) -> Option<&Opportunity<'a>> {
        self.positions
            .get(&id)
            .and_then(|idx| self.opportunities.get(*idx))
    }

    /// Check whether an identifier is present.
    pub fn contains(&self, id: OpportunityId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Iterate over opportunities in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Opportunity<'a>> {
        self.opportunities.iter()
    }

    /// Number of opportunities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.opportunities.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }

    /// Currency of every amount in the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn opportunity(id: u32, cost: i64) -> Opportunity<'static> {
        Opportunity::new(
            id,
            format!("Unit {id}"),
            Money::from_minor(cost, GBP),
            Money::from_minor(cost / 2, GBP),
        )
    }

    #[test]
    fn with_opportunities_sorts_by_id() -> TestResult {
        let catalog =
            Catalog::with_opportunities([opportunity(3, 30), opportunity(1, 10), opportunity(2, 20)], GBP)?;

        let ids: Vec<u32> = catalog.iter().map(|o| o.id().0).collect();

        assert_eq!(ids, vec![1, 2, 3]);

        Ok(())
    }

    #[test]
    fn get_finds_by_id() -> TestResult {
        let catalog = Catalog::with_opportunities([opportunity(5, 50), opportunity(1, 10)], GBP)?;

        assert_eq!(
            catalog.get(OpportunityId(5)).map(|o| o.cost().to_minor_units()),
            Some(50)
        );
        assert!(catalog.get(OpportunityId(9)).is_none());
        assert!(catalog.contains(OpportunityId(1)));

        Ok(())
    }

    #[test]
    fn duplicate_ids_error() {
        let result = Catalog::with_opportunities([opportunity(1, 10), opportunity(1, 20)], GBP);

        assert_eq!(result.err(), Some(CatalogError::DuplicateId(OpportunityId(1))));
    }

    #[test]
    fn negative_cost_errors() {
        let result = Catalog::with_opportunities([opportunity(4, -10)], GBP);

        assert_eq!(result.err(), Some(CatalogError::NegativeCost(OpportunityId(4))));
    }

    #[test]
    fn currency_mismatch_errors() {
        let mixed = Opportunity::new(
            2,
            "Dollar unit",
            Money::from_minor(100, USD),
            Money::from_minor(10, USD),
        );

        let result = Catalog::with_opportunities([opportunity(1, 10), mixed], GBP);

        assert_eq!(
            result.err(),
            Some(CatalogError::CurrencyMismatch(
                OpportunityId(2),
                USD.iso_alpha_code,
                GBP.iso_alpha_code
            ))
        );
    }

    #[test]
    fn empty_catalog_reports_empty() {
        let catalog = Catalog::new(GBP);

        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert_eq!(catalog.currency(), GBP);
    }
}
