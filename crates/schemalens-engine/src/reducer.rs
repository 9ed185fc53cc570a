//! Catalog reducers
//!
//! Each reducer decides, for one kind of object, which objects of a catalog to
//! keep. [`reduce_catalog`] runs them in order: schemas, tables, routines,
//! sequences, synonyms. Removal and its cascades are done by the catalog.

use schemalens_catalog::{Catalog, CatalogError, NamedObject, NamedObjectKey, Reducer, Routine, Table};
use schemalens_core::{GrepOptions, InclusionRule, LimitOptions, ObjectKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::graph::{Direction, TableGraph, TableRelationshipRule};

/// Errors raised while reducing a catalog
#[derive(Debug, thiserror::Error)]
pub enum ReduceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Keeps schemas, sequences or synonyms whose full name passes a rule
#[derive(Debug, Clone)]
pub struct RuleReducer {
    kind: ObjectKind,
    rule: InclusionRule,
}

impl RuleReducer {
    pub fn schemas(rule: InclusionRule) -> Self {
        Self {
            kind: ObjectKind::Schema,
            rule,
        }
    }

    pub fn sequences(rule: InclusionRule) -> Self {
        Self {
            kind: ObjectKind::Sequence,
            rule,
        }
    }

    pub fn synonyms(rule: InclusionRule) -> Self {
        Self {
            kind: ObjectKind::Synonym,
            rule,
        }
    }

    fn keep<'a, T: NamedObject + 'a>(&self, objects: impl IntoIterator<Item = &'a T>) -> BTreeSet<NamedObjectKey> {
        objects
            .into_iter()
            .filter(|object| self.rule.test(&object.full_name()))
            .map(|object| object.key())
            .collect()
    }
}

impl Reducer for RuleReducer {
    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn retained(&self, catalog: &Catalog) -> BTreeSet<NamedObjectKey> {
        match self.kind {
            ObjectKind::Schema => self.keep(catalog.schemas()),
            ObjectKind::Sequence => self.keep(catalog.sequences()),
            ObjectKind::Synonym => self.keep(catalog.synonyms()),
            _ => BTreeSet::new(),
        }
    }
}

/// Keeps tables that pass the name rule, the type filter and the grep, plus
/// tables related to them within the configured depths
pub struct TableReducer {
    rule: InclusionRule,
    table_types: Option<Vec<String>>,
    grep: GrepOptions,
    parent_table_depth: usize,
    child_table_depth: usize,
    relationship_rule: Option<Box<dyn TableRelationshipRule>>,
}

impl TableReducer {
    pub fn new(limit: &LimitOptions, grep: &GrepOptions) -> Self {
        Self {
            rule: limit.tables.clone().unwrap_or_default(),
            table_types: limit.table_types.clone(),
            grep: grep.clone(),
            parent_table_depth: limit.parent_table_depth,
            child_table_depth: limit.child_table_depth,
            relationship_rule: None,
        }
    }

    /// Only follow relationships the rule accepts
    pub fn with_relationship_rule(mut self, rule: impl TableRelationshipRule + 'static) -> Self {
        self.relationship_rule = Some(Box::new(rule));
        self
    }

    /// Whether a table is selected on its own merits
    pub fn matches(&self, table: &Table) -> bool {
        if !self.rule.test(&table.full_name()) {
            return false;
        }
        if let Some(types) = &self.table_types {
            if !types.iter().any(|t| t.eq_ignore_ascii_case(&table.table_type)) {
                return false;
            }
        }
        self.grep_matches(table)
    }

    fn grep_matches(&self, table: &Table) -> bool {
        if !self.grep.is_table_grep() {
            return true;
        }

        let columns = self.grep.columns.as_ref().map_or(false, |rule| {
            table.columns().iter().any(|column| rule.test(&column.full_name()))
        });
        let definitions = self.grep.definitions.as_ref().map_or(false, |rule| {
            let view_definition = table.view.as_ref().map(|view| view.definition.as_str());
            [Some(table.definition.as_str()), Some(table.remarks.as_str()), view_definition]
                .into_iter()
                .flatten()
                .chain(table.triggers().iter().map(|t| t.action_statement.as_str()))
                .any(|text| !text.is_empty() && rule.test(text))
        });

        (columns || definitions) != self.grep.invert_match
    }

    fn follow(&self, catalog: &Catalog, from: &NamedObjectKey, to: &NamedObjectKey, direction: Direction) -> bool {
        let Some(rule) = &self.relationship_rule else {
            return true;
        };
        let (referencing, referenced) = match direction {
            Direction::Parents => (from, to),
            Direction::Children => (to, from),
        };
        match (catalog.lookup_table_by_key(referencing), catalog.lookup_table_by_key(referenced)) {
            (Some(referencing), Some(referenced)) => rule.test(referencing, referenced),
            _ => false,
        }
    }
}

impl Reducer for TableReducer {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Table
    }

    fn retained(&self, catalog: &Catalog) -> BTreeSet<NamedObjectKey> {
        let matched: BTreeSet<NamedObjectKey> = catalog
            .tables()
            .iter()
            .filter(|table| self.matches(table))
            .map(|table| table.key())
            .collect();

        if self.parent_table_depth == 0 && self.child_table_depth == 0 {
            return matched;
        }

        let graph = TableGraph::from_catalog(catalog);
        let mut retained = graph.reachable(&matched, Direction::Parents, self.parent_table_depth, |from, to| {
            self.follow(catalog, from, to, Direction::Parents)
        });
        retained.extend(graph.reachable(&matched, Direction::Children, self.child_table_depth, |from, to| {
            self.follow(catalog, from, to, Direction::Children)
        }));

        debug!(
            matched = matched.len(),
            related = retained.len() - matched.len(),
            "Selected tables"
        );
        retained
    }
}

/// Keeps routines that pass the name rule, the type filter and the parameter
/// grep
#[derive(Debug, Clone)]
pub struct RoutineReducer {
    rule: InclusionRule,
    routine_types: Option<Vec<String>>,
    parameters: Option<InclusionRule>,
    invert_match: bool,
}

impl RoutineReducer {
    pub fn new(limit: &LimitOptions, grep: &GrepOptions) -> Self {
        Self {
            rule: limit.routines.clone().unwrap_or_default(),
            routine_types: limit.routine_types.clone(),
            parameters: grep.routine_parameters.clone(),
            invert_match: grep.invert_match,
        }
    }

    pub fn matches(&self, routine: &Routine) -> bool {
        if !self.rule.test(&routine.full_name()) {
            return false;
        }
        if let Some(types) = &self.routine_types {
            let routine_type = routine.routine_type.to_string();
            if !types.iter().any(|t| t.eq_ignore_ascii_case(&routine_type)) {
                return false;
            }
        }
        match &self.parameters {
            Some(rule) => {
                let found = routine
                    .parameters()
                    .iter()
                    .any(|p| rule.test(&format!("{}.{}", routine.full_name(), p.name())));
                found != self.invert_match
            }
            None => true,
        }
    }
}

impl Reducer for RoutineReducer {
    fn kind(&self) -> ObjectKind {
        ObjectKind::Routine
    }

    fn retained(&self, catalog: &Catalog) -> BTreeSet<NamedObjectKey> {
        catalog
            .routines()
            .iter()
            .filter(|routine| self.matches(routine))
            .map(|routine| routine.key())
            .collect()
    }
}

/// How many objects of each kind a reduction removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReductionSummary {
    pub schemas: usize,
    pub tables: usize,
    pub routines: usize,
    pub sequences: usize,
    pub synonyms: usize,
}

impl ReductionSummary {
    pub fn total(&self) -> usize {
        self.schemas + self.tables + self.routines + self.sequences + self.synonyms
    }
}

/// Reduce a catalog with every configured limit and grep
///
/// Kinds without a rule, type filter or grep are left alone.
pub fn reduce_catalog(
    catalog: &mut Catalog,
    limit: &LimitOptions,
    grep: &GrepOptions,
) -> Result<ReductionSummary, ReduceError> {
    let mut summary = ReductionSummary::default();

    if let Some(rule) = &limit.schemas {
        summary.schemas = catalog.reduce(ObjectKind::Schema, &RuleReducer::schemas(rule.clone()))?;
    }

    if limit.tables.is_some() || limit.table_types.is_some() || grep.is_table_grep() {
        summary.tables = catalog.reduce(ObjectKind::Table, &TableReducer::new(limit, grep))?;
    }

    if limit.routines.is_some() || limit.routine_types.is_some() || grep.is_routine_grep() {
        summary.routines = catalog.reduce(ObjectKind::Routine, &RoutineReducer::new(limit, grep))?;
    }

    if let Some(rule) = &limit.sequences {
        summary.sequences = catalog.reduce(ObjectKind::Sequence, &RuleReducer::sequences(rule.clone()))?;
    }

    if let Some(rule) = &limit.synonyms {
        summary.synonyms = catalog.reduce(ObjectKind::Synonym, &RuleReducer::synonyms(rule.clone()))?;
    }

    info!(removed = summary.total(), "Reduction complete");
    Ok(summary)
}
