//! Table-level linters

use schemalens_catalog::{NamedObject, Table};
use schemalens_core::{Finding, LinterConfig, Severity};
use tracing::debug;

use super::{LintContext, LintError, Linter};

/// Tables (not views) without a primary key
#[derive(Debug, Clone, Copy, Default)]
pub struct TableWithNoPrimaryKey;

impl Linter for TableWithNoPrimaryKey {
    fn id(&self) -> &'static str {
        "table_with_no_primary_key"
    }

    fn summary(&self) -> &'static str {
        "no primary key"
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        Ok(ctx
            .tables()
            .into_iter()
            .filter(|table| !table.is_view() && !table.has_primary_key())
            .map(|table| ctx.table_finding(table, self.summary()))
            .collect())
    }
}

/// Tables (not views) without any index
#[derive(Debug, Clone, Copy, Default)]
pub struct TableWithNoIndexes;

impl Linter for TableWithNoIndexes {
    fn id(&self) -> &'static str {
        "table_with_no_indexes"
    }

    fn summary(&self) -> &'static str {
        "no indexes"
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        Ok(ctx
            .tables()
            .into_iter()
            .filter(|table| !table.is_view() && table.indexes().is_empty())
            .map(|table| ctx.table_finding(table, self.summary()))
            .collect())
    }
}

/// Column lists of every index on the table, primary key included
fn index_column_lists(table: &Table) -> Vec<Vec<&str>> {
    let mut lists: Vec<Vec<&str>> = table.indexes().iter().map(|index| index.column_names()).collect();
    if let Some(primary_key) = table.primary_key() {
        lists.push(primary_key.column_names());
    }
    lists
}

/// Foreign keys whose columns do not lead any index
#[derive(Debug, Clone, Copy, Default)]
pub struct ForeignKeyWithNoIndex;

impl Linter for ForeignKeyWithNoIndex {
    fn id(&self) -> &'static str {
        "foreign_key_with_no_index"
    }

    fn summary(&self) -> &'static str {
        "foreign key with no index"
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let mut findings = Vec::new();
        for table in ctx.tables() {
            let indexed = index_column_lists(table);
            for foreign_key in table.imported_foreign_keys() {
                let columns = foreign_key.foreign_key_columns();
                if columns.is_empty() {
                    continue;
                }
                if !indexed.iter().any(|list| list.starts_with(&columns)) {
                    findings.push(ctx.table_finding(table, self.summary()).with_value(foreign_key.name()));
                }
            }
        }
        Ok(findings)
    }
}

/// Unique indexes with a nullable column
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableColumnsInUniqueIndex;

impl Linter for NullableColumnsInUniqueIndex {
    fn id(&self) -> &'static str {
        "nullable_columns_in_unique_index"
    }

    fn summary(&self) -> &'static str {
        "unique index with nullable columns"
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let mut findings = Vec::new();
        for table in ctx.tables() {
            for index in table.indexes().iter().filter(|index| index.unique) {
                let nullable = index.columns().iter().any(|index_column| {
                    table
                        .lookup_column(&index_column.name)
                        .map_or(false, |column| column.nullable)
                });
                if nullable {
                    findings.push(ctx.table_finding(table, self.summary()).with_value(index.name()));
                }
            }
        }
        Ok(findings)
    }
}

/// Indexes whose columns lead another index on the same table
#[derive(Debug, Clone, Copy, Default)]
pub struct RedundantIndexes;

impl Linter for RedundantIndexes {
    fn id(&self) -> &'static str {
        "redundant_indexes"
    }

    fn summary(&self) -> &'static str {
        "redundant index"
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let mut findings = Vec::new();
        for table in ctx.tables() {
            let indexes = table.indexes();
            for (i, index) in indexes.iter().enumerate() {
                let columns = index.column_names();
                if columns.is_empty() {
                    continue;
                }
                let redundant = indexes
                    .iter()
                    .enumerate()
                    .any(|(j, other)| i != j && other.column_names().starts_with(&columns));
                if redundant {
                    findings.push(ctx.table_finding(table, self.summary()).with_value(index.name()));
                }
            }
        }
        Ok(findings)
    }
}

/// Tables with more than `max_columns` columns
#[derive(Debug, Clone, Copy)]
pub struct TooManyColumns {
    pub max_columns: usize,
}

impl TooManyColumns {
    pub const DEFAULT_MAX_COLUMNS: usize = 20;

    pub fn from_config(config: &LinterConfig) -> Result<Self, LintError> {
        let max_columns = match config.config.get("max_columns") {
            None => Self::DEFAULT_MAX_COLUMNS,
            Some(value) => value
                .as_u64()
                .and_then(|max| usize::try_from(max).ok())
                .ok_or_else(|| LintError::InvalidConfig {
                    linter: config.id.clone(),
                    message: format!("max_columns must be a non-negative integer, got {}", value),
                })?,
        };
        Ok(Self { max_columns })
    }
}

impl Default for TooManyColumns {
    fn default() -> Self {
        Self {
            max_columns: Self::DEFAULT_MAX_COLUMNS,
        }
    }
}

impl Linter for TooManyColumns {
    fn id(&self) -> &'static str {
        "too_many_columns"
    }

    fn summary(&self) -> &'static str {
        "too many columns"
    }

    fn default_severity(&self) -> Severity {
        Severity::Low
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        Ok(ctx
            .tables()
            .into_iter()
            .filter(|table| table.columns().len() > self.max_columns)
            .map(|table| {
                ctx.table_finding(table, self.summary())
                    .with_value(table.columns().len().to_string())
            })
            .collect())
    }
}

/// Tables with exactly one column
#[derive(Debug, Clone, Copy, Default)]
pub struct TableWithSingleColumn;

impl Linter for TableWithSingleColumn {
    fn id(&self) -> &'static str {
        "table_with_single_column"
    }

    fn summary(&self) -> &'static str {
        "single column"
    }

    fn default_severity(&self) -> Severity {
        Severity::Low
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        Ok(ctx
            .tables()
            .into_iter()
            .filter(|table| !table.is_view() && table.columns().len() == 1)
            .map(|table| ctx.table_finding(table, self.summary()))
            .collect())
    }
}

/// Tables without rows, counted over the live connection
///
/// Without a connection there is nothing to count and no findings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTable;

impl Linter for EmptyTable {
    fn id(&self) -> &'static str {
        "empty_table"
    }

    fn summary(&self) -> &'static str {
        "empty table"
    }

    fn default_severity(&self) -> Severity {
        Severity::Low
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let Some(connection) = ctx.connection else {
            debug!(linter = self.id(), "No connection, skipping row counts");
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();
        for table in ctx.tables().into_iter().filter(|table| !table.is_view()) {
            if connection.row_count(table)? == 0 {
                findings.push(ctx.table_finding(table, self.summary()));
            }
        }
        Ok(findings)
    }
}
