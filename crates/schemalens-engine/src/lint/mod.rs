//! Lint engine
//!
//! Linters inspect a (possibly reduced) catalog and report findings. They are
//! read-only: the catalog is borrowed immutably for the whole run. Some linters
//! need supplemental queries against the live database, which they make
//! through an optional [`LintConnection`].

mod columns;
mod cycles;
mod engine;
mod registry;
mod tables;

pub use columns::{BadlyNamedColumns, InconsistentColumnTypes, NullIntendedColumns};
pub use cycles::TableCycles;
pub use engine::{LinterRun, Linters};
pub use registry::{registered_linters, registration, LinterRegistration};
pub use tables::{
    EmptyTable, ForeignKeyWithNoIndex, NullableColumnsInUniqueIndex, RedundantIndexes, TableWithNoIndexes,
    TableWithNoPrimaryKey, TableWithSingleColumn, TooManyColumns,
};

use schemalens_catalog::{Catalog, Column, NamedObject, Table};
use schemalens_core::{Finding, LinterConfig, ObjectKind, Severity};

/// Lint errors
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("Unknown linter: {0}")]
    UnknownLinter(String),

    #[error("Invalid configuration for linter {linter}: {message}")]
    InvalidConfig { linter: String, message: String },

    #[error("Linter {linter} failed: {message}")]
    CheckFailed { linter: String, message: String },

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Supplemental queries against the live database
pub trait LintConnection {
    /// Number of rows in a table
    fn row_count(&self, table: &Table) -> Result<u64, LintError>;
}

/// A structural rule check
///
/// Implementations report findings in discovery order and dedupe internally
/// when they report one finding per object.
pub trait Linter {
    /// Stable id, used in configuration and reports
    fn id(&self) -> &'static str;

    /// One-line description, also the message of every finding
    fn summary(&self) -> &'static str;

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError>;
}

/// What a linter sees during one run
pub struct LintContext<'a> {
    pub catalog: &'a Catalog,
    pub connection: Option<&'a dyn LintConnection>,
    pub config: &'a LinterConfig,

    linter_id: &'static str,
    severity: Severity,
}

impl<'a> LintContext<'a> {
    pub fn new(
        linter: &dyn Linter,
        catalog: &'a Catalog,
        connection: Option<&'a dyn LintConnection>,
        config: &'a LinterConfig,
    ) -> Self {
        Self {
            catalog,
            connection,
            config,
            linter_id: linter.id(),
            severity: config.severity.unwrap_or_else(|| linter.default_severity()),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Tables that pass the linter's table rule
    pub fn tables(&self) -> Vec<&'a Table> {
        self.catalog
            .tables()
            .iter()
            .filter(|table| self.config.table_rule.test(&table.full_name()))
            .collect()
    }

    /// Columns of `table` that pass the linter's column rule
    pub fn columns<'t>(&self, table: &'t Table) -> Vec<&'t Column> {
        table
            .columns()
            .iter()
            .filter(|column| self.config.column_rule.test(&column.full_name()))
            .collect()
    }

    /// A finding about `table`
    pub fn table_finding(&self, table: &Table, message: impl Into<String>) -> Finding {
        Finding::new(self.linter_id, self.severity, ObjectKind::Table, table.full_name(), message)
    }

    /// A finding about the whole catalog
    pub fn catalog_finding(&self, message: impl Into<String>) -> Finding {
        Finding::new(self.linter_id, self.severity, ObjectKind::Catalog, self.catalog.name(), message)
    }
}

/// Join names for a finding value
pub(crate) fn join_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> String {
    names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
