//! Column-level linters

use schemalens_catalog::NamedObject;
use schemalens_core::{Finding, LinterConfig, Pattern, Severity};
use std::collections::{BTreeMap, BTreeSet};

use super::{join_names, LintContext, LintError, Linter};

/// Columns that share a name but not a data type
///
/// Names are compared case-insensitively across every table the rule admits.
/// Each offending column is reported on its own table.
#[derive(Debug, Clone, Copy, Default)]
pub struct InconsistentColumnTypes;

impl Linter for InconsistentColumnTypes {
    fn id(&self) -> &'static str {
        "inconsistent_column_types"
    }

    fn summary(&self) -> &'static str {
        "column with same name but different data types"
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let tables = ctx.tables();

        let mut types_by_name: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for table in &tables {
            for column in ctx.columns(table) {
                types_by_name
                    .entry(column.name().to_uppercase())
                    .or_default()
                    .insert(column.column_data_type.to_string());
            }
        }

        let mut findings = Vec::new();
        for table in &tables {
            for column in ctx.columns(table) {
                let inconsistent = types_by_name
                    .get(&column.name().to_uppercase())
                    .map_or(false, |types| types.len() > 1);
                if inconsistent {
                    findings.push(
                        ctx.table_finding(table, self.summary())
                            .with_value(format!("{} {}", column.full_name(), column.type_name)),
                    );
                }
            }
        }
        Ok(findings)
    }
}

/// Columns whose names match the configured `bad_column_names` pattern
pub struct BadlyNamedColumns {
    bad_column_names: Pattern,
}

impl BadlyNamedColumns {
    pub fn from_config(config: &LinterConfig) -> Result<Self, LintError> {
        let invalid = |message: String| LintError::InvalidConfig {
            linter: config.id.clone(),
            message,
        };

        let pattern = config
            .get_str("bad_column_names")
            .ok_or_else(|| invalid("bad_column_names is required".to_string()))?;
        let bad_column_names = Pattern::new(pattern).map_err(|e| invalid(e.to_string()))?;

        Ok(Self { bad_column_names })
    }
}

impl Linter for BadlyNamedColumns {
    fn id(&self) -> &'static str {
        "badly_named_columns"
    }

    fn summary(&self) -> &'static str {
        "badly named column"
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let mut findings = Vec::new();
        for table in ctx.tables() {
            let bad: Vec<&str> = ctx
                .columns(table)
                .into_iter()
                .map(|column| column.name())
                .filter(|name| self.bad_column_names.matches(name))
                .collect();
            if !bad.is_empty() {
                findings.push(ctx.table_finding(table, self.summary()).with_value(join_names(bad)));
            }
        }
        Ok(findings)
    }
}

/// Columns defaulting to the text `NULL` instead of a null value
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIntendedColumns;

impl Linter for NullIntendedColumns {
    fn id(&self) -> &'static str {
        "null_intended_columns"
    }

    fn summary(&self) -> &'static str {
        "column where NULL may be intended"
    }

    fn check(&self, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
        let mut findings = Vec::new();
        for table in ctx.tables() {
            for column in ctx.columns(table) {
                let intended = column
                    .default_value
                    .as_deref()
                    .map_or(false, |value| value.trim().eq_ignore_ascii_case("NULL"));
                if intended {
                    findings.push(ctx.table_finding(table, self.summary()).with_value(column.name()));
                }
            }
        }
        Ok(findings)
    }
}
