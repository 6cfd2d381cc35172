//! Portfolio Optimizer
//!
//! Runs one request end to end: validate the scenario, value the financing,
//! resolve constraints, search for the best selection and assemble the result.

use std::thread;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info_span};

use crate::{
    assembler::{AssemblyError, OptimizationResult, assemble},
    catalog::Catalog,
    config::OptimizerConfig,
    financing::{FinancingError, valuate},
    resolver::resolve,
    scenario::{Scenario, ValidationError},
    solvers::{
        Solver, SolverError,
        branch_and_bound::BranchAndBoundSolver,
        observer::{NoopObserver, SearchObserver, SearchStats},
    },
};

/// Errors raised while optimizing a scenario.
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// The scenario was rejected before optimization.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The financing could not be valued.
    #[error(transparent)]
    Financing(#[from] FinancingError),

    /// The solver failed.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The result could not be assembled.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// A scenario worker thread panicked.
    #[error("scenario worker panicked")]
    WorkerPanicked,
}

/// Optimize a scenario over the catalog.
///
/// # Errors
///
/// Returns an [`OptimizeError`] if the scenario is invalid for the catalog or a
/// stage of the pipeline fails.
pub fn optimize<'a>(
    catalog: &Catalog<'a>,
    scenario: &Scenario<'a>,
    config: &OptimizerConfig,
) -> Result<OptimizationResult<'a>, OptimizeError> {
    optimize_with_observer(catalog, scenario, config, NoopObserver)
}

/// Optimize a scenario while reporting search events to `observer`.
///
/// # Errors
///
/// Returns an [`OptimizeError`] if the scenario is invalid for the catalog or a
/// stage of the pipeline fails.
pub fn optimize_with_observer<'a, O: SearchObserver>(
    catalog: &Catalog<'a>,
    scenario: &Scenario<'a>,
    config: &OptimizerConfig,
    observer: O,
) -> Result<OptimizationResult<'a>, OptimizeError> {
    let span = info_span!(
        "optimize",
        scenario = %scenario.name,
        budget = %scenario.budget,
        opportunities = catalog.len()
    );
    let _guard = span.enter();

    scenario.validate(catalog)?;

    let financing = valuate(&scenario.budget, &scenario.loan, config.discount_rate)?;

    debug!(
        principal = %financing.principal,
        net_value = %financing.net_value,
        months = financing.months,
        "valued financing"
    );

    let resolution = resolve(catalog, &scenario.constraints, &scenario.budget, config);

    debug!(
        mandatory_units = resolution.mandatory.total_units(),
        slots = resolution.slots.len(),
        remaining = %resolution.remaining_budget,
        "resolved constraints"
    );

    let mut stats = SearchStats::default();

    let selection = BranchAndBoundSolver::solve_with_observer(
        &resolution.slots,
        resolution.remaining_budget.to_minor_units(),
        config,
        (&mut stats, observer),
    )?;

    let result = assemble(
        &resolution.mandatory,
        &selection,
        &resolution.slots,
        catalog,
        &scenario.budget,
        &financing,
    )?
    .with_search_stats(stats)
    .with_skipped_forced(resolution.skipped_forced);

    Ok(result)
}

/// Results of several scenarios over the same catalog.
#[derive(Debug, Clone)]
pub struct ScenarioComparison<'a> {
    entries: Vec<(String, OptimizationResult<'a>)>,
}

impl<'a> ScenarioComparison<'a> {
    /// Scenario names and results, in input order.
    pub fn entries(&self) -> &[(String, OptimizationResult<'a>)] {
        &self.entries
    }

    /// Index of the scenario with the highest grand total value; first wins ties.
    pub fn best_total_value(&self) -> Option<usize> {
        best_index(
            self.entries
                .iter()
                .map(|(_, result)| Some(result.grand_total_value.to_minor_units())),
        )
    }

    /// Index of the scenario with the highest return on investment; first wins ties.
    pub fn best_return_on_investment(&self) -> Option<usize> {
        best_index::<Decimal>(
            self.entries
                .iter()
                .map(|(_, result)| result.return_on_investment()),
        )
    }

    /// Number of scenarios compared.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no scenarios were compared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn best_index<T: PartialOrd>(values: impl Iterator<Item = Option<T>>) -> Option<usize> {
    let mut best: Option<(usize, T)> = None;

    for (idx, value) in values.enumerate() {
        let Some(value) = value else {
            continue;
        };

        match &best {
            Some((_, current)) if value <= *current => {}
            _ => best = Some((idx, value)),
        }
    }

    best.map(|(idx, _)| idx)
}

/// Optimize independent scenarios concurrently over a shared catalog.
///
/// # Errors
///
/// Returns the first [`OptimizeError`] in input order.
pub fn compare_scenarios<'a>(
    catalog: &Catalog<'a>,
    scenarios: &[Scenario<'a>],
    config: &OptimizerConfig,
) -> Result<ScenarioComparison<'a>, OptimizeError> {
    let results = thread::scope(|scope| {
        let handles: Vec<_> = scenarios
            .iter()
            .map(|scenario| scope.spawn(move || optimize(catalog, scenario, config)))
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(_panic) => Err(OptimizeError::WorkerPanicked),
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    let entries = scenarios
        .iter()
        .map(|scenario| scenario.name.clone())
        .zip(results)
        .collect();

    Ok(ScenarioComparison { entries })
}
