//! Utils

use clap::Parser;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::Money;

use crate::{
    config::OptimizerConfig,
    constraints::{Constraint, ConstraintMap},
    financing::LoanTerms,
    fixtures::{Fixture, FixtureError},
    opportunities::OpportunityId,
    scenario::Scenario,
};

const BILLION: i64 = 1_000_000_000;

/// Arguments for the portfolio example
#[derive(Debug, Parser)]
pub struct ExamplePortfolioArgs {
    /// Fixture set to use for the catalog & scenarios
    #[clap(short, long, default_value = "thu-duc")]
    pub fixture: String,

    /// Named scenario from the fixture set; overrides the budget and loan flags
    #[clap(short, long)]
    pub scenario: Option<String>,

    /// Budget in billions of the catalog currency
    #[clap(short, long, default_value = "50")]
    pub budget: Decimal,

    /// Loan-to-value ratio as a fraction
    #[clap(long, default_value = "0.5")]
    pub ltv: Decimal,

    /// Annual loan interest rate as a fraction
    #[clap(long, default_value = "0.06")]
    pub rate: Decimal,

    /// Loan term in years
    #[clap(long, default_value_t = 5)]
    pub years: u32,

    /// Opportunity ids that must be bought
    #[clap(long)]
    pub force: Vec<u32>,

    /// Opportunity ids that must not be bought
    #[clap(long)]
    pub exclude: Vec<u32>,

    /// Stop the search after this many nodes
    #[clap(long)]
    pub node_limit: Option<u64>,
}

impl ExamplePortfolioArgs {
    /// Build the scenario to optimize, either by name from the fixture or from the flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the named scenario does not exist, no catalog is
    /// loaded, or the budget does not fit in minor units.
    pub fn scenario(&self, fixture: &Fixture) -> Result<Scenario<'static>, FixtureError> {
        if let Some(name) = &self.scenario {
            return fixture.scenario(name).cloned();
        }

        let currency = fixture.catalog()?.currency();

        let minor_per_billion = 10_i64
            .checked_pow(currency.exponent)
            .and_then(|scale| scale.checked_mul(BILLION))
            .ok_or_else(|| FixtureError::InvalidMoney(self.budget.to_string()))?;

        let budget_minor = self
            .budget
            .checked_mul(Decimal::from(minor_per_billion))
            .and_then(|amount| amount.trunc().to_i64())
            .ok_or_else(|| FixtureError::InvalidMoney(self.budget.to_string()))?;

        let constraints: ConstraintMap = self
            .force
            .iter()
            .map(|id| (OpportunityId(*id), Constraint::ForceInclude))
            .chain(
                self.exclude
                    .iter()
                    .map(|id| (OpportunityId(*id), Constraint::ForceExclude)),
            )
            .collect();

        Ok(Scenario::new("command line", Money::from_minor(budget_minor, currency))
            .with_loan(LoanTerms::new(self.ltv, self.rate, self.years))
            .with_constraints(constraints))
    }

    /// Optimizer configuration for the run.
    pub fn config(&self) -> OptimizerConfig {
        node_limited(self.node_limit)
    }
}

/// Arguments for the scenario comparison example
#[derive(Debug, Parser)]
pub struct ExampleCompareArgs {
    /// Fixture set to use for the catalog & scenarios
    #[clap(short, long, default_value = "thu-duc")]
    pub fixture: String,

    /// Stop each search after this many nodes
    #[clap(long)]
    pub node_limit: Option<u64>,
}

impl ExampleCompareArgs {
    /// Optimizer configuration shared by every scenario.
    pub fn config(&self) -> OptimizerConfig {
        node_limited(self.node_limit)
    }
}

fn node_limited(node_limit: Option<u64>) -> OptimizerConfig {
    let config = OptimizerConfig::default();

    match node_limit {
        Some(limit) => config.with_node_limit(limit),
        None => config,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_follow_the_reference_inputs() -> TestResult {
        let args = ExamplePortfolioArgs::try_parse_from(["portfolio"])?;

        assert_eq!(args.fixture, "thu-duc");
        assert_eq!(args.budget, Decimal::from(50));
        assert_eq!(args.ltv, Decimal::new(5, 1));
        assert_eq!(args.rate, Decimal::new(6, 2));
        assert_eq!(args.years, 5);
        assert_eq!(args.config(), OptimizerConfig::default());

        Ok(())
    }

    #[test]
    fn flags_build_a_scenario_in_the_catalog_currency() -> TestResult {
        let fixture = Fixture::from_set("thu-duc")?;
        let args = ExamplePortfolioArgs::try_parse_from([
            "portfolio",
            "--budget",
            "12.5",
            "--force",
            "6",
            "--exclude",
            "22",
            "--node-limit",
            "1000",
        ])?;

        let scenario = args.scenario(&fixture)?;

        assert_eq!(scenario.budget.to_minor_units(), 12_500_000_000);
        assert_eq!(scenario.budget.currency(), fixture.catalog()?.currency());
        assert_eq!(scenario.constraints.get(OpportunityId(6)), Constraint::ForceInclude);
        assert_eq!(scenario.constraints.get(OpportunityId(22)), Constraint::ForceExclude);
        assert_eq!(args.config().node_limit, Some(1000));

        Ok(())
    }

    #[test]
    fn named_scenario_comes_from_the_fixture() -> TestResult {
        let fixture = Fixture::from_set("thu-duc")?;
        let args = ExamplePortfolioArgs::try_parse_from(["portfolio", "-s", "All cash"])?;

        let scenario = args.scenario(&fixture)?;

        assert_eq!(scenario.name, "All cash");
        assert_eq!(scenario.loan, LoanTerms::unleveraged());

        Ok(())
    }
}
