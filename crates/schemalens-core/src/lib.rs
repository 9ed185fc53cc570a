//! Schemalens Core
//!
//! Shared vocabulary for catalog population, reduction and linting.
//! Linter ids and report fields are part of the public API - add, never rename.

pub mod config;
pub mod diagnostic;
pub mod inclusion;
pub mod info_level;
pub mod kind;
pub mod options;
pub mod report;

pub use config::{Config, ConfigError};
pub use diagnostic::{Finding, Severity};
pub use inclusion::{InclusionRule, InclusionRuleError, Pattern, RuleConfig};
pub use info_level::{SchemaInfoLevel, SchemaInfoLevelBuilder, SchemaInfoRetrieval, UnknownRetrieval};
pub use kind::{ObjectKind, UnknownObjectKind};
pub use options::{GrepOptions, LimitOptions, LinterConfig};
pub use report::{LintReport, ReportSummary, ReportVersion};
