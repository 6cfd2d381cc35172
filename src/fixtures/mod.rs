//! Fixtures
//!
//! YAML catalogs and scenarios, loaded from `<base>/catalogs/<name>.yml` and
//! `<base>/scenarios/<name>.yml`.

use std::{fs, path::PathBuf};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD, VND},
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    fixtures::{catalog::CatalogFixture, scenarios::ScenariosFixture},
    scenario::Scenario,
};

pub mod catalog;
pub mod scenarios;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid money format
    #[error("Invalid money format: {0}")]
    InvalidMoney(String),

    /// Invalid rate format
    #[error("Invalid rate format: {0}")]
    InvalidRate(String),

    /// Invalid number
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between catalog and an amount
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Scenario not found
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    /// No catalog loaded yet
    #[error("No catalog loaded")]
    NoCatalog,

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded catalog
    catalog: Option<Catalog<'static>>,

    /// Loaded scenarios, in file order
    scenarios: Vec<Scenario<'static>>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            scenarios: Vec::new(),
        }
    }

    /// Load a catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an amount is in
    /// another currency, or if the catalog is invalid.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let currency = parse_currency(&fixture.currency)?;

        let opportunities = fixture
            .opportunities
            .into_iter()
            .map(|opportunity| opportunity.try_into_opportunity(currency))
            .collect::<Result<Vec<_>, _>>()?;

        self.catalog = Some(Catalog::with_opportunities(opportunities, currency)?);

        Ok(self)
    }

    /// Load scenarios from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a budget is
    /// in a different currency from the loaded catalog.
    pub fn load_scenarios(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("scenarios").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ScenariosFixture = serde_norway::from_str(&contents)?;

        for scenario_fixture in fixture.scenarios {
            let scenario = Scenario::try_from(scenario_fixture)?;

            if let Some(catalog) = &self.catalog
                && scenario.budget.currency() != catalog.currency()
            {
                return Err(FixtureError::CurrencyMismatch(
                    catalog.currency().iso_alpha_code.to_string(),
                    scenario.budget.currency().iso_alpha_code.to_string(),
                ));
            }

            self.scenarios.push(scenario);
        }

        Ok(self)
    }

    /// Load a complete fixture set (catalog and scenarios with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_scenarios(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded.
    pub fn catalog(&self) -> Result<&Catalog<'static>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Get all scenarios
    pub fn scenarios(&self) -> &[Scenario<'static>] {
        &self.scenarios
    }

    /// Get a scenario by name
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario is not found.
    pub fn scenario(&self, name: &str) -> Result<&Scenario<'static>, FixtureError> {
        self.scenarios
            .iter()
            .find(|scenario| scenario.name == name)
            .ok_or_else(|| FixtureError::ScenarioNotFound(name.to_string()))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up a supported currency by ISO code
///
/// # Errors
///
/// Returns an error if the code is not one of GBP, USD, EUR or VND.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "VND" => Ok(VND),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a money string (e.g., "2.99 GBP" or "4676470600 VND")
///
/// The amount is in major units and is rounded to the currency's minor unit.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if
/// the amount is not a decimal number, or if the currency code is not recognized.
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(FixtureError::InvalidMoney(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = parse_currency(code)?;

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidMoney(s.to_string()))?;

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or_else(|| FixtureError::InvalidMoney(s.to_string()))?;

    let minor_units = amount
        .checked_mul(scale)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or_else(|| FixtureError::InvalidMoney(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse a rate string (e.g., "6%" or "0.06") into a decimal fraction
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a decimal number.
pub fn parse_rate(s: &str) -> Result<Decimal, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidRate(s.to_string()))?;

        value
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(|| FixtureError::InvalidRate(s.to_string()))
    } else {
        trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidRate(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use testresult::TestResult;

    use crate::{constraints::Constraint, opportunities::OpportunityId};

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    const CATALOG: &str = "currency: GBP
opportunities:
  - id: 2
    name: Terrace
    cost: 600.00 GBP
    npv: 450.00 GBP
  - id: 1
    name: Loft
    cost: 1000.00 GBP
    npv: 500.00 GBP
";

    const SCENARIOS: &str = "scenarios:
  - name: cash
    budget: 1000 GBP
  - name: geared
    budget: 2000 GBP
    loan:
      ltv: 25%
      rate: 3%
      years: 10
    constraints:
      1: force
";

    #[test]
    fn loads_catalog_and_scenarios_from_set() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "catalogs", "small", CATALOG)?;
        write_fixture(dir.path(), "scenarios", "small", SCENARIOS)?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("small")?.load_scenarios("small")?;

        let catalog = fixture.catalog()?;
        let ids: Vec<u32> = catalog.iter().map(|o| o.id().0).collect();

        assert_eq!(ids, vec![1, 2]);
        assert_eq!(catalog.currency(), GBP);

        assert_eq!(fixture.scenarios().len(), 2);

        let geared = fixture.scenario("geared")?;

        assert_eq!(geared.budget.to_minor_units(), 200_000);
        assert_eq!(geared.loan.ltv, Decimal::new(25, 2));
        assert_eq!(geared.constraints.get(OpportunityId(1)), Constraint::ForceInclude);

        Ok(())
    }

    #[test]
    fn scenario_currency_must_match_catalog() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(dir.path(), "catalogs", "small", CATALOG)?;
        write_fixture(
            dir.path(),
            "scenarios",
            "dollars",
            "scenarios:\n  - name: abroad\n    budget: 10 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_catalog("small")?;

        let result = fixture.load_scenarios("dollars");

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(_, _))));

        Ok(())
    }

    #[test]
    fn duplicate_catalog_ids_are_rejected() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "catalogs",
            "dupes",
            "currency: GBP\nopportunities:\n  - {id: 1, name: A, cost: 1 GBP, npv: 1 GBP}\n  - {id: 1, name: B, cost: 2 GBP, npv: 1 GBP}\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        let result = fixture.load_catalog("dupes");

        assert!(matches!(
            result,
            Err(FixtureError::Catalog(CatalogError::DuplicateId(OpportunityId(1))))
        ));

        Ok(())
    }

    #[test]
    fn bundled_thu_duc_set_loads() -> TestResult {
        let fixture = Fixture::from_set("thu-duc")?;

        assert_eq!(fixture.catalog()?.len(), 26);
        assert_eq!(fixture.catalog()?.currency(), VND);
        assert!(!fixture.scenarios().is_empty());

        Ok(())
    }

    #[test]
    fn missing_catalog_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.catalog(), Err(FixtureError::NoCatalog)));
    }

    #[test]
    fn missing_scenario_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(
            fixture.scenario("nope"),
            Err(FixtureError::ScenarioNotFound(_))
        ));
    }

    #[test]
    fn missing_file_returns_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_catalog("anything"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn parse_money_scales_to_minor_units() -> TestResult {
        assert_eq!(parse_money("2.99 GBP")?.to_minor_units(), 299);
        assert_eq!(parse_money("1.005 USD")?.to_minor_units(), 101);
        assert_eq!(parse_money("-3 EUR")?.to_minor_units(), -300);

        Ok(())
    }

    #[test]
    fn parse_money_rejects_invalid_format() {
        assert!(matches!(parse_money("2.99GBP"), Err(FixtureError::InvalidMoney(_))));
        assert!(matches!(parse_money("abc GBP"), Err(FixtureError::InvalidMoney(_))));
    }

    #[test]
    fn parse_money_rejects_unknown_currency() {
        let result = parse_money("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_rate_accepts_percentage_and_fraction() -> TestResult {
        assert_eq!(parse_rate("6%")?, Decimal::new(6, 2));
        assert_eq!(parse_rate(" 4.7 % ")?, Decimal::new(47, 3));
        assert_eq!(parse_rate("0.5")?, Decimal::new(5, 1));

        Ok(())
    }

    #[test]
    fn parse_rate_rejects_invalid_format() {
        assert!(matches!(parse_rate("invalid"), Err(FixtureError::InvalidRate(_))));
    }
}
