//! Schemalens engine - analyses over a populated catalog
//!
//! This crate implements what runs after a crawl:
//! - Reduction of a catalog by inclusion rules, type filters and grep
//! - The table relationship graph and its cycles
//! - The lint engine and its linters

pub mod graph;
pub mod lint;
pub mod reducer;

pub use graph::{Direction, TableGraph, TableRelationshipRule};
pub use lint::{LintConnection, LintContext, LintError, Linter, LinterRegistration, LinterRun, Linters};
pub use reducer::{reduce_catalog, ReduceError, ReductionSummary, RoutineReducer, RuleReducer, TableReducer};
