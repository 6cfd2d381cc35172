//! Scenarios
//!
//! A scenario is one optimization request: a budget, the terms of the loan
//! drawn against it and the per-opportunity constraints.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::Catalog, constraints::ConstraintMap, financing::LoanTerms,
    opportunities::OpportunityId,
};

/// Caller errors rejected before a scenario reaches the optimizer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Loan-to-value ratio is outside `[0, 1]`.
    #[error("loan-to-value ratio {0} is outside [0, 1]")]
    LtvOutOfRange(Decimal),

    /// Loan interest rate is negative.
    #[error("loan rate {0} is negative")]
    NegativeRate(Decimal),

    /// Budget is negative.
    #[error("budget {0} is negative")]
    NegativeBudget(String),

    /// A constraint names an opportunity that is not in the catalog.
    #[error("constraint references unknown opportunity {0}")]
    UnknownOpportunity(OpportunityId),

    /// Budget currency differs from the catalog currency (budget currency, catalog currency).
    #[error("budget has currency {0}, but catalog has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// One optimization request.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario<'a> {
    /// Display name
    pub name: String,

    /// Total purchase budget
    pub budget: Money<'a, Currency>,

    /// Loan drawn against the budget
    pub loan: LoanTerms,

    /// Per-opportunity overrides
    pub constraints: ConstraintMap,
}

impl<'a> Scenario<'a> {
    /// Create an unleveraged, unconstrained scenario.
    pub fn new(name: impl Into<String>, budget: Money<'a, Currency>) -> Self {
        Self {
            name: name.into(),
            budget,
            loan: LoanTerms::unleveraged(),
            constraints: ConstraintMap::new(),
        }
    }

    /// Replace the loan terms.
    #[must_use]
    pub fn with_loan(mut self, loan: LoanTerms) -> Self {
        self.loan = loan;
        self
    }

    /// Replace the constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: ConstraintMap) -> Self {
        self.constraints = constraints;
        self
    }

    /// Check the scenario against the catalog it will be optimized over.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self, catalog: &Catalog<'_>) -> Result<(), ValidationError> {
        if self.budget.currency() != catalog.currency() {
            return Err(ValidationError::CurrencyMismatch(
                self.budget.currency().iso_alpha_code,
                catalog.currency().iso_alpha_code,
            ));
        }

        if self.budget.to_minor_units() < 0 {
            return Err(ValidationError::NegativeBudget(self.budget.to_string()));
        }

        if self.loan.ltv < Decimal::ZERO || self.loan.ltv > Decimal::ONE {
            return Err(ValidationError::LtvOutOfRange(self.loan.ltv));
        }

        if self.loan.annual_rate < Decimal::ZERO {
            return Err(ValidationError::NegativeRate(self.loan.annual_rate));
        }

        let mut unknown: Vec<OpportunityId> = self
            .constraints
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !catalog.contains(*id))
            .collect();

        unknown.sort_unstable();

        if let Some(id) = unknown.first() {
            return Err(ValidationError::UnknownOpportunity(*id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::{constraints::Constraint, opportunities::Opportunity};

    use super::*;

    fn catalog() -> Result<Catalog<'static>, crate::catalog::CatalogError> {
        Catalog::with_opportunities(
            [Opportunity::new(1, "A", Money::from_minor(100, GBP), Money::from_minor(50, GBP))],
            GBP,
        )
    }

    #[test]
    fn valid_scenario_passes() -> TestResult {
        let scenario = Scenario::new("base", Money::from_minor(1_000, GBP))
            .with_loan(LoanTerms::new(Decimal::new(5, 1), Decimal::new(6, 2), 5))
            .with_constraints(ConstraintMap::new().with(1, Constraint::ForceInclude));

        scenario.validate(&catalog()?)?;

        Ok(())
    }

    #[test]
    fn ltv_above_one_is_rejected() -> TestResult {
        let scenario = Scenario::new("greedy", Money::from_minor(1_000, GBP))
            .with_loan(LoanTerms::new(Decimal::new(11, 1), Decimal::new(6, 2), 5));

        assert_eq!(
            scenario.validate(&catalog()?),
            Err(ValidationError::LtvOutOfRange(Decimal::new(11, 1)))
        );

        Ok(())
    }

    #[test]
    fn negative_ltv_is_rejected() -> TestResult {
        let scenario = Scenario::new("odd", Money::from_minor(1_000, GBP))
            .with_loan(LoanTerms::new(Decimal::new(-1, 1), Decimal::new(6, 2), 5));

        assert!(matches!(
            scenario.validate(&catalog()?),
            Err(ValidationError::LtvOutOfRange(_))
        ));

        Ok(())
    }

    #[test]
    fn negative_rate_is_rejected() -> TestResult {
        let scenario = Scenario::new("odd", Money::from_minor(1_000, GBP))
            .with_loan(LoanTerms::new(Decimal::new(5, 1), Decimal::new(-1, 2), 5));

        assert_eq!(
            scenario.validate(&catalog()?),
            Err(ValidationError::NegativeRate(Decimal::new(-1, 2)))
        );

        Ok(())
    }

    #[test]
    fn unknown_constraint_id_is_rejected() -> TestResult {
        let scenario = Scenario::new("typo", Money::from_minor(1_000, GBP))
            .with_constraints(ConstraintMap::new().with(42, Constraint::ForceExclude));

        assert_eq!(
            scenario.validate(&catalog()?),
            Err(ValidationError::UnknownOpportunity(OpportunityId(42)))
        );

        Ok(())
    }

    #[test]
    fn negative_budget_is_rejected() -> TestResult {
        let scenario = Scenario::new("debt", Money::from_minor(-1, GBP));

        assert!(matches!(
            scenario.validate(&catalog()?),
            Err(ValidationError::NegativeBudget(_))
        ));

        Ok(())
    }

    #[test]
    fn currency_mismatch_is_rejected() -> TestResult {
        let scenario = Scenario::new("abroad", Money::from_minor(1_000, USD));

        assert_eq!(
            scenario.validate(&catalog()?),
            Err(ValidationError::CurrencyMismatch(
                USD.iso_alpha_code,
                GBP.iso_alpha_code
            ))
        );

        Ok(())
    }
}
