//! Integration tests over the bundled Thu Duc fixture set

use testresult::TestResult;

use atrium::{
    config::OptimizerConfig,
    constraints::Constraint,
    fixtures::Fixture,
    optimizer::{compare_scenarios, optimize},
};

#[test]
fn balanced_scenario_is_feasible_and_cannot_be_extended() -> TestResult {
    let fixture = Fixture::from_set("thu-duc")?;
    let catalog = fixture.catalog()?;
    let scenario = fixture.scenario("Balanced")?;
    let config = OptimizerConfig::default();

    let result = optimize(catalog, scenario, &config)?;

    assert!(result.is_optimal());
    assert!(result.total_cost.to_minor_units() <= scenario.budget.to_minor_units());
    assert!(result.positions.iter().all(|p| p.units <= config.max_units_per_item));

    // No further profitable unit fits in what is left
    let remaining = result.remaining_budget.to_minor_units();

    for opportunity in catalog.iter() {
        let fits = opportunity.cost().to_minor_units() <= remaining;
        let below_cap = result.units(opportunity.id()) < config.max_units_per_item;
        let profitable = opportunity.npv().to_minor_units() > 0;

        assert!(
            !(fits && below_cap && profitable),
            "{} could still be bought",
            opportunity.name()
        );
    }

    // 6% borrowing discounted at 4.7% destroys value
    assert!(result.net_financing_value().to_minor_units() < 0);
    assert_eq!(result.loan_principal().to_minor_units(), 25_000_000_000);

    Ok(())
}

#[test]
fn constrained_scenario_honours_force_and_exclude() -> TestResult {
    let fixture = Fixture::from_set("thu-duc")?;
    let catalog = fixture.catalog()?;
    let scenario = fixture.scenario("Thao Dien focus")?;

    let result = optimize(catalog, scenario, &OptimizerConfig::default())?;

    for (id, constraint) in scenario.constraints.iter() {
        match constraint {
            Constraint::ForceInclude => assert!(result.units(id) >= 1, "{id} not bought"),
            Constraint::ForceExclude => assert_eq!(result.units(id), 0, "{id} bought"),
            Constraint::Automatic => {}
        }
    }

    assert!(result.skipped_forced.is_empty());

    Ok(())
}

#[test]
fn comparison_covers_every_fixture_scenario() -> TestResult {
    let fixture = Fixture::from_set("thu-duc")?;

    let comparison = compare_scenarios(
        fixture.catalog()?,
        fixture.scenarios(),
        &OptimizerConfig::default(),
    )?;

    assert_eq!(comparison.len(), fixture.scenarios().len());

    for ((name, result), scenario) in comparison.entries().iter().zip(fixture.scenarios()) {
        assert_eq!(name, &scenario.name);
        assert!(result.total_cost.to_minor_units() <= scenario.budget.to_minor_units());
    }

    let best = comparison
        .best_total_value()
        .and_then(|idx| comparison.entries().get(idx))
        .map(|(_, result)| result.grand_total_value.to_minor_units());

    let max = comparison
        .entries()
        .iter()
        .map(|(_, result)| result.grand_total_value.to_minor_units())
        .max();

    assert_eq!(best, max);

    Ok(())
}
