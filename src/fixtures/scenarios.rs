//! Scenario Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    constraints::{Constraint, ConstraintMap},
    financing::LoanTerms,
    fixtures::{FixtureError, parse_money, parse_rate},
    opportunities::OpportunityId,
    scenario::Scenario,
};

/// Wrapper for scenarios in YAML
#[derive(Debug, Deserialize)]
pub struct ScenariosFixture {
    /// Scenarios in file order
    pub scenarios: Vec<ScenarioFixture>,
}

/// Scenario Fixture
#[derive(Debug, Deserialize)]
pub struct ScenarioFixture {
    /// Scenario name
    pub name: String,

    /// Budget (e.g., "50000000000 VND")
    pub budget: String,

    /// Loan terms; omitted means an all-equity purchase
    #[serde(default)]
    pub loan: Option<LoanFixture>,

    /// Opportunity id -> constraint
    #[serde(default)]
    pub constraints: FxHashMap<OpportunityId, Constraint>,
}

/// Loan Fixture
#[derive(Debug, Deserialize)]
pub struct LoanFixture {
    /// Loan-to-value ratio (e.g., "50%" or "0.5")
    pub ltv: String,

    /// Annual interest rate (e.g., "6%" or "0.06")
    pub rate: String,

    /// Term in whole years
    pub years: u32,
}

impl TryFrom<LoanFixture> for LoanTerms {
    type Error = FixtureError;

    fn try_from(fixture: LoanFixture) -> Result<Self, Self::Error> {
        Ok(LoanTerms::new(
            parse_rate(&fixture.ltv)?,
            parse_rate(&fixture.rate)?,
            fixture.years,
        ))
    }
}

impl TryFrom<ScenarioFixture> for Scenario<'static> {
    type Error = FixtureError;

    fn try_from(fixture: ScenarioFixture) -> Result<Self, Self::Error> {
        let budget = parse_money(&fixture.budget)?;

        let loan = fixture
            .loan
            .map(LoanTerms::try_from)
            .transpose()?
            .unwrap_or_else(LoanTerms::unleveraged);

        let constraints: ConstraintMap = fixture.constraints.into_iter().collect();

        Ok(Scenario::new(fixture.name, budget)
            .with_loan(loan)
            .with_constraints(constraints))
    }
}
