use schemalens_core::LinterConfig;

use super::columns::{BadlyNamedColumns, InconsistentColumnTypes, NullIntendedColumns};
use super::cycles::TableCycles;
use super::tables::{
    EmptyTable, ForeignKeyWithNoIndex, NullableColumnsInUniqueIndex, RedundantIndexes, TableWithNoIndexes,
    TableWithNoPrimaryKey, TableWithSingleColumn, TooManyColumns,
};
use super::{LintError, Linter};

type Build = fn(&LinterConfig) -> Result<Box<dyn Linter>, LintError>;

/// A linter known to the engine, built from its configuration
#[derive(Clone, Copy)]
pub struct LinterRegistration {
    pub id: &'static str,
    pub summary: &'static str,
    build: Build,
}

impl LinterRegistration {
    const fn new(id: &'static str, summary: &'static str, build: Build) -> Self {
        Self { id, summary, build }
    }

    /// Build the linter, validating its linter-specific settings
    pub fn build(&self, config: &LinterConfig) -> Result<Box<dyn Linter>, LintError> {
        (self.build)(config)
    }
}

impl std::fmt::Debug for LinterRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinterRegistration")
            .field("id", &self.id)
            .field("summary", &self.summary)
            .finish()
    }
}

/// Every linter, in the order they run when all are enabled
pub fn registered_linters() -> Vec<LinterRegistration> {
    vec![
        LinterRegistration::new("table_cycles", "cycles in table relationships", |_| {
            Ok(Box::new(TableCycles))
        }),
        LinterRegistration::new("table_with_no_primary_key", "no primary key", |_| {
            Ok(Box::new(TableWithNoPrimaryKey))
        }),
        LinterRegistration::new("table_with_no_indexes", "no indexes", |_| Ok(Box::new(TableWithNoIndexes))),
        LinterRegistration::new("foreign_key_with_no_index", "foreign key with no index", |_| {
            Ok(Box::new(ForeignKeyWithNoIndex))
        }),
        LinterRegistration::new("nullable_columns_in_unique_index", "unique index with nullable columns", |_| {
            Ok(Box::new(NullableColumnsInUniqueIndex))
        }),
        LinterRegistration::new("redundant_indexes", "redundant index", |_| Ok(Box::new(RedundantIndexes))),
        LinterRegistration::new("too_many_columns", "too many columns", |config| {
            Ok(Box::new(TooManyColumns::from_config(config)?))
        }),
        LinterRegistration::new("table_with_single_column", "single column", |_| {
            Ok(Box::new(TableWithSingleColumn))
        }),
        LinterRegistration::new(
            "inconsistent_column_types",
            "column with same name but different data types",
            |_| Ok(Box::new(InconsistentColumnTypes)),
        ),
        LinterRegistration::new("badly_named_columns", "badly named column", |config| {
            Ok(Box::new(BadlyNamedColumns::from_config(config)?))
        }),
        LinterRegistration::new("null_intended_columns", "column where NULL may be intended", |_| {
            Ok(Box::new(NullIntendedColumns))
        }),
        LinterRegistration::new("empty_table", "empty table", |_| Ok(Box::new(EmptyTable))),
    ]
}

/// Look up a registered linter by id
pub fn registration(id: &str) -> Option<LinterRegistration> {
    registered_linters().into_iter().find(|registration| registration.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrations_match_their_linters() {
        for registration in registered_linters() {
            let config = LinterConfig::new(registration.id).with_config("bad_column_names", "ID");
            let linter = registration.build(&config).unwrap();

            assert_eq!(linter.id(), registration.id);
            assert_eq!(linter.summary(), registration.summary);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<&str> = registered_linters().iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn badly_named_columns_needs_a_pattern() {
        let Some(registration) = registration("badly_named_columns") else {
            panic!("badly_named_columns is not registered");
        };

        let err = registration
            .build(&LinterConfig::new("badly_named_columns"))
            .err()
            .unwrap();
        assert!(matches!(err, LintError::InvalidConfig { .. }));
    }
}
