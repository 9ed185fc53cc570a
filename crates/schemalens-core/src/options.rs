//! Compiled reduction and lint options

use serde_json::Value;
use std::collections::BTreeMap;

use crate::diagnostic::Severity;
use crate::inclusion::InclusionRule;
use crate::kind::ObjectKind;

/// Which objects to keep after a crawl
///
/// A kind without a rule is not reduced at all.
#[derive(Debug, Clone, Default)]
pub struct LimitOptions {
    /// Schema full names
    pub schemas: Option<InclusionRule>,

    /// Table full names
    pub tables: Option<InclusionRule>,

    /// Routine full names
    pub routines: Option<InclusionRule>,

    /// Sequence full names
    pub sequences: Option<InclusionRule>,

    /// Synonym full names
    pub synonyms: Option<InclusionRule>,

    /// Table types to keep (e.g. "TABLE", "VIEW"); `None` keeps every type
    pub table_types: Option<Vec<String>>,

    /// Routine types to keep ("procedure", "function"); `None` keeps every type
    pub routine_types: Option<Vec<String>>,

    /// How many foreign key hops towards referenced tables to follow
    pub parent_table_depth: usize,

    /// How many foreign key hops towards referencing tables to follow
    pub child_table_depth: usize,
}

impl LimitOptions {
    /// The rule for a reducible kind
    pub fn rule_for(&self, kind: ObjectKind) -> Option<&InclusionRule> {
        match kind {
            ObjectKind::Schema => self.schemas.as_ref(),
            ObjectKind::Table => self.tables.as_ref(),
            ObjectKind::Routine => self.routines.as_ref(),
            ObjectKind::Sequence => self.sequences.as_ref(),
            ObjectKind::Synonym => self.synonyms.as_ref(),
            _ => None,
        }
    }

    /// Set the rule for a reducible kind; other kinds are ignored
    pub fn with_rule(mut self, kind: ObjectKind, rule: InclusionRule) -> Self {
        match kind {
            ObjectKind::Schema => self.schemas = Some(rule),
            ObjectKind::Table => self.tables = Some(rule),
            ObjectKind::Routine => self.routines = Some(rule),
            ObjectKind::Sequence => self.sequences = Some(rule),
            ObjectKind::Synonym => self.synonyms = Some(rule),
            _ => {}
        }
        self
    }

    /// Whether a table type passes the type filter (case-insensitive)
    pub fn is_table_type_included(&self, table_type: &str) -> bool {
        type_included(self.table_types.as_deref(), table_type)
    }

    /// Whether a routine type passes the type filter (case-insensitive)
    pub fn is_routine_type_included(&self, routine_type: &str) -> bool {
        type_included(self.routine_types.as_deref(), routine_type)
    }
}

fn type_included(types: Option<&[String]>, value: &str) -> bool {
    types.map_or(true, |types| types.iter().any(|t| t.eq_ignore_ascii_case(value)))
}

/// Content-based table and routine filters
#[derive(Debug, Clone, Default)]
pub struct GrepOptions {
    /// Keep tables with at least one matching column full name
    pub columns: Option<InclusionRule>,

    /// Keep routines with at least one matching parameter full name
    pub routine_parameters: Option<InclusionRule>,

    /// Keep tables whose definition or remarks match
    pub definitions: Option<InclusionRule>,

    /// Keep what does not match instead
    pub invert_match: bool,
}

impl GrepOptions {
    /// Whether any table grep is configured
    pub fn is_table_grep(&self) -> bool {
        self.columns.is_some() || self.definitions.is_some()
    }

    /// Whether a routine grep is configured
    pub fn is_routine_grep(&self) -> bool {
        self.routine_parameters.is_some()
    }
}

/// Configuration for one linter
#[derive(Debug, Clone)]
pub struct LinterConfig {
    /// Registered linter id
    pub id: String,

    /// Whether to run the linter at all
    pub run: bool,

    /// Overrides the linter's default severity
    pub severity: Option<Severity>,

    /// Number of findings tolerated before the run counts as failed
    pub threshold: usize,

    /// Tables the linter looks at (full names)
    pub table_rule: InclusionRule,

    /// Columns the linter looks at (full names)
    pub column_rule: InclusionRule,

    /// Linter-specific settings
    pub config: BTreeMap<String, Value>,
}

impl LinterConfig {
    /// A config that runs the linter on everything with defaults
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            run: true,
            severity: None,
            threshold: usize::MAX,
            table_rule: InclusionRule::IncludeAll,
            column_rule: InclusionRule::IncludeAll,
            config: BTreeMap::new(),
        }
    }

    /// Set a linter-specific value
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Set the severity override
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Set the finding threshold
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the table inclusion rule
    pub fn with_table_rule(mut self, rule: InclusionRule) -> Self {
        self.table_rule = rule;
        self
    }

    /// Set the column inclusion rule
    pub fn with_column_rule(mut self, rule: InclusionRule) -> Self {
        self.column_rule = rule;
        self
    }

    /// Disable the linter
    pub fn disabled(mut self) -> Self {
        self.run = false;
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.config.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).and_then(Value::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_by_kind() {
        let limit = LimitOptions::default()
            .with_rule(ObjectKind::Schema, InclusionRule::ExcludeAll)
            .with_rule(ObjectKind::Column, InclusionRule::ExcludeAll);

        assert_eq!(limit.rule_for(ObjectKind::Schema), Some(&InclusionRule::ExcludeAll));
        assert_eq!(limit.rule_for(ObjectKind::Table), None);
        assert_eq!(limit.rule_for(ObjectKind::Column), None);
    }

    #[test]
    fn type_filters_ignore_case() {
        let limit = LimitOptions {
            table_types: Some(vec!["TABLE".to_string()]),
            ..Default::default()
        };

        assert!(limit.is_table_type_included("table"));
        assert!(!limit.is_table_type_included("VIEW"));
        assert!(limit.is_routine_type_included("procedure"));
    }

    #[test]
    fn linter_config_values() {
        let config = LinterConfig::new("too_many_columns")
            .with_config("max_columns", 5)
            .with_config("bad_column_names", "ID|NAME")
            .with_config("strict", true);

        assert_eq!(config.get_u64("max_columns"), Some(5));
        assert_eq!(config.get_str("bad_column_names"), Some("ID|NAME"));
        assert_eq!(config.get_bool("strict"), Some(true));
        assert_eq!(config.get_u64("missing"), None);
        assert!(config.run);
        assert_eq!(config.threshold, usize::MAX);
    }
}
