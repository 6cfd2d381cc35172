//! Atrium prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    assembler::{AssemblyError, OptimizationResult, Position, SearchSummary, assemble},
    catalog::{Catalog, CatalogError},
    config::OptimizerConfig,
    constraints::{Constraint, ConstraintMap},
    financing::{Financing, FinancingError, LoanTerms, valuate},
    fixtures::{Fixture, FixtureError},
    holdings::Holdings,
    opportunities::{Opportunity, OpportunityDetails, OpportunityId},
    optimizer::{
        OptimizeError, ScenarioComparison, compare_scenarios, optimize, optimize_with_observer,
    },
    resolver::{Resolution, resolve},
    scenario::{Scenario, ValidationError},
    slots::UnitSlot,
    solvers::{
        SearchStatus, Selection, Solver, SolverError,
        branch_and_bound::BranchAndBoundSolver,
        observer::{NoopObserver, SearchObserver, SearchStats},
    },
    statement::{Statement, StatementError},
};
