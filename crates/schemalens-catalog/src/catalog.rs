//! The catalog aggregate
//!
//! A catalog owns every crawled object by value. Objects refer to each other by
//! [`NamedObjectKey`], resolved through the catalog's lookups. After a crawl the
//! catalog is read-only, apart from [`Catalog::reduce`].

use schemalens_core::ObjectKind;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

use crate::attributes::Attributes;
use crate::data_type::ColumnDataType;
use crate::error::{CatalogError, CatalogResult};
use crate::info::{CrawlInfo, DatabaseInfo, DatabaseUser, DriverInfo};
use crate::named::{DatabaseObject, NamedObject, NamedObjectKey, NamedObjectList};
use crate::column::Column;
use crate::routine::Routine;
use crate::schema::SchemaReference;
use crate::sequence::{Sequence, Synonym};
use crate::table::Table;

/// Decides which objects of one kind survive a reduction
///
/// A reducer only reads the catalog; the catalog removes everything of the
/// reducer's kind whose key is not in the retained set, then restores
/// consistency between the remaining objects.
pub trait Reducer {
    /// The kind this reducer filters
    fn kind(&self) -> ObjectKind;

    /// Keys of the objects of [`Reducer::kind`] to keep
    fn retained(&self, catalog: &Catalog) -> BTreeSet<NamedObjectKey>;
}

/// In-memory model of a database's structure
#[derive(Debug, Clone)]
pub struct Catalog {
    name: String,
    database_info: DatabaseInfo,
    driver_info: DriverInfo,
    crawl_info: Option<CrawlInfo>,
    schemas: NamedObjectList<SchemaReference>,
    column_data_types: NamedObjectList<ColumnDataType>,
    tables: NamedObjectList<Table>,
    routines: NamedObjectList<Routine>,
    sequences: NamedObjectList<Sequence>,
    synonyms: NamedObjectList<Synonym>,
    database_users: NamedObjectList<DatabaseUser>,
    pub attributes: Attributes,
}

impl Catalog {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database_info: DatabaseInfo::default(),
            driver_info: DriverInfo::default(),
            crawl_info: None,
            schemas: NamedObjectList::new(),
            column_data_types: NamedObjectList::new(),
            tables: NamedObjectList::new(),
            routines: NamedObjectList::new(),
            sequences: NamedObjectList::new(),
            synonyms: NamedObjectList::new(),
            database_users: NamedObjectList::new(),
            attributes: Attributes::new(),
        }
    }

    /// Catalog name, used as the object name of catalog-wide findings
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database_info(&self) -> &DatabaseInfo {
        &self.database_info
    }

    pub fn driver_info(&self) -> &DriverInfo {
        &self.driver_info
    }

    /// Present once a crawl has completed
    pub fn crawl_info(&self) -> Option<&CrawlInfo> {
        self.crawl_info.as_ref()
    }

    // Schemas

    pub fn schemas(&self) -> &[SchemaReference] {
        self.schemas.values()
    }

    /// Schema by full name, e.g. `PUBLIC.BOOKS`
    pub fn lookup_schema(&self, full_name: &str) -> Option<&SchemaReference> {
        if full_name.trim().is_empty() {
            return None;
        }
        self.schemas.iter().find(|s| s.full_name() == full_name)
    }

    // Tables

    pub fn tables(&self) -> &[Table] {
        self.tables.values()
    }

    pub fn tables_in<'a>(&'a self, schema: &'a SchemaReference) -> impl Iterator<Item = &'a Table> + 'a {
        self.tables.in_schema(schema)
    }

    pub fn lookup_table(&self, schema: &SchemaReference, name: &str) -> Option<&Table> {
        self.tables.lookup(schema, name)
    }

    pub fn lookup_table_by_key(&self, key: &NamedObjectKey) -> Option<&Table> {
        self.tables.lookup_key(key)
    }

    pub fn lookup_column(&self, schema: &SchemaReference, table: &str, name: &str) -> Option<&Column> {
        self.lookup_table(schema, table)?.lookup_column(name)
    }

    // Routines

    pub fn routines(&self) -> &[Routine] {
        self.routines.values()
    }

    pub fn routines_in<'a>(&'a self, schema: &'a SchemaReference) -> impl Iterator<Item = &'a Routine> + 'a {
        self.routines.in_schema(schema)
    }

    /// Every overload called `name`
    pub fn routines_named<'a>(&'a self, schema: &'a SchemaReference, name: &'a str) -> impl Iterator<Item = &'a Routine> + 'a {
        self.routines_in(schema).filter(move |r| r.name() == name)
    }

    /// First routine called `name`
    pub fn lookup_routine(&self, schema: &SchemaReference, name: &str) -> Option<&Routine> {
        self.routines.lookup(schema, name)
    }

    pub fn lookup_routine_by_key(&self, key: &NamedObjectKey) -> Option<&Routine> {
        self.routines.lookup_key(key)
    }

    // Sequences and synonyms

    pub fn sequences(&self) -> &[Sequence] {
        self.sequences.values()
    }

    pub fn sequences_in<'a>(&'a self, schema: &'a SchemaReference) -> impl Iterator<Item = &'a Sequence> + 'a {
        self.sequences.in_schema(schema)
    }

    pub fn lookup_sequence(&self, schema: &SchemaReference, name: &str) -> Option<&Sequence> {
        self.sequences.lookup(schema, name)
    }

    pub fn synonyms(&self) -> &[Synonym] {
        self.synonyms.values()
    }

    pub fn synonyms_in<'a>(&'a self, schema: &'a SchemaReference) -> impl Iterator<Item = &'a Synonym> + 'a {
        self.synonyms.in_schema(schema)
    }

    pub fn lookup_synonym(&self, schema: &SchemaReference, name: &str) -> Option<&Synonym> {
        self.synonyms.lookup(schema, name)
    }

    // Column data types

    pub fn column_data_types(&self) -> &[ColumnDataType] {
        self.column_data_types.values()
    }

    pub fn system_column_data_types(&self) -> impl Iterator<Item = &ColumnDataType> {
        self.column_data_types.iter().filter(|t| t.schema().is_system())
    }

    pub fn user_defined_column_data_types<'a>(
        &'a self,
        schema: &'a SchemaReference,
    ) -> impl Iterator<Item = &'a ColumnDataType> + 'a {
        self.column_data_types.in_schema(schema).filter(|t| t.is_user_defined())
    }

    pub fn lookup_column_data_type(&self, schema: &SchemaReference, name: &str) -> Option<&ColumnDataType> {
        self.column_data_types.lookup(schema, name)
    }

    pub fn lookup_column_data_type_by_key(&self, key: &NamedObjectKey) -> Option<&ColumnDataType> {
        self.column_data_types.lookup_key(key)
    }

    pub fn lookup_system_column_data_type(&self, name: &str) -> Option<&ColumnDataType> {
        self.lookup_column_data_type(&SchemaReference::system(), name)
    }

    /// The only system type with the given vendor type code
    ///
    /// No match and several matches both resolve to `None`.
    pub fn lookup_base_column_data_type_by_type(&self, type_code: i32) -> Option<&ColumnDataType> {
        let mut matches = self
            .system_column_data_types()
            .filter(|t| t.type_code == type_code);
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    // Users

    pub fn database_users(&self) -> &[DatabaseUser] {
        self.database_users.values()
    }

    pub fn lookup_database_user(&self, name: &str) -> Option<&DatabaseUser> {
        self.database_users.iter().find(|u| u.name() == name)
    }

    /// Whether an object of `kind` with `key` is in the catalog
    pub fn contains(&self, kind: ObjectKind, key: &NamedObjectKey) -> bool {
        match kind {
            ObjectKind::Schema => self.schemas.contains_key(key),
            ObjectKind::Table => self.tables.contains_key(key),
            ObjectKind::Routine => self.routines.contains_key(key),
            ObjectKind::Sequence => self.sequences.contains_key(key),
            ObjectKind::Synonym => self.synonyms.contains_key(key),
            ObjectKind::ColumnDataType => self.column_data_types.contains_key(key),
            ObjectKind::DatabaseUser => self.database_users.contains_key(key),
            _ => false,
        }
    }

    /// Remove every object of `kind` the reducer does not retain
    ///
    /// Removing schemas removes everything they own. Removing tables prunes
    /// foreign keys on the remaining tables that point at them. Synonyms whose
    /// target is gone lose their resolved reference. Kinds that cannot be
    /// reduced are left untouched. Returns the number of objects removed.
    pub fn reduce(&mut self, kind: ObjectKind, reducer: &dyn Reducer) -> CatalogResult<usize> {
        if reducer.kind() != kind {
            return Err(CatalogError::ReducerKindMismatch {
                kind,
                reducer_kind: reducer.kind(),
            });
        }
        if !kind.is_reducible() {
            debug!(%kind, "Kind is not reducible, skipping");
            return Ok(0);
        }

        let keep = reducer.retained(self);
        let removed = match kind {
            ObjectKind::Schema => self.retain_schemas(&keep),
            ObjectKind::Table => self.retain_tables(|t| keep.contains(&t.key())),
            ObjectKind::Routine => self.routines.retain(|r| keep.contains(&r.key())),
            ObjectKind::Sequence => self.sequences.retain(|s| keep.contains(&s.key())),
            ObjectKind::Synonym => self.synonyms.retain(|s| keep.contains(&s.key())),
            _ => 0,
        };
        self.prune_synonym_references();

        info!(%kind, removed, "Reduced catalog");
        Ok(removed)
    }

    fn retain_schemas(&mut self, keep: &BTreeSet<NamedObjectKey>) -> usize {
        let removed = self.schemas.retain(|s| keep.contains(&s.key()));
        if removed == 0 {
            return 0;
        }

        let retained: HashSet<SchemaReference> = self.schemas.iter().cloned().collect();
        let owned = |schema: &SchemaReference| retained.contains(schema);

        let tables = self.retain_tables(|t| owned(t.schema()));
        let routines = self.routines.retain(|r| owned(r.schema()));
        let sequences = self.sequences.retain(|s| owned(s.schema()));
        let synonyms = self.synonyms.retain(|s| owned(s.schema()));
        let data_types = self
            .column_data_types
            .retain(|t| t.schema().is_system() || owned(t.schema()));

        debug!(tables, routines, sequences, synonyms, data_types, "Removed objects of excluded schemas");
        removed
    }

    fn retain_tables(&mut self, keep: impl FnMut(&Table) -> bool) -> usize {
        let removed = self.tables.retain(keep);
        if removed == 0 {
            return 0;
        }

        let retained: HashSet<NamedObjectKey> = self.tables.iter().map(|t| t.key()).collect();
        for table in self.tables.iter_mut() {
            let before = table.foreign_keys.len();
            table.foreign_keys.retain(|fk| {
                retained.contains(fk.primary_key_table()) && retained.contains(fk.foreign_key_table())
            });
            if table.foreign_keys.len() != before {
                table.refresh_column_flags();
            }
        }
        removed
    }

    fn prune_synonym_references(&mut self) {
        let synonym_keys: HashSet<NamedObjectKey> = self.synonyms.iter().map(|s| s.key()).collect();
        let tables = &self.tables;
        let routines = &self.routines;
        let sequences = &self.sequences;

        for synonym in self.synonyms.iter_mut() {
            let dangling = match &synonym.referenced_object {
                Some(reference) => match reference.kind {
                    ObjectKind::Table => !tables.contains_key(&reference.key),
                    ObjectKind::Routine => !routines.contains_key(&reference.key),
                    ObjectKind::Sequence => !sequences.contains_key(&reference.key),
                    ObjectKind::Synonym => !synonym_keys.contains(&reference.key),
                    _ => false,
                },
                None => false,
            };
            if dangling {
                synonym.referenced_object = None;
            }
        }
    }

    // Population

    pub(crate) fn set_database_info(&mut self, database_info: DatabaseInfo) {
        self.database_info = database_info;
    }

    pub(crate) fn database_info_mut(&mut self) -> &mut DatabaseInfo {
        &mut self.database_info
    }

    pub(crate) fn set_driver_info(&mut self, driver_info: DriverInfo) {
        self.driver_info = driver_info;
    }

    pub(crate) fn driver_info_mut(&mut self) -> &mut DriverInfo {
        &mut self.driver_info
    }

    pub(crate) fn set_crawl_info(&mut self, crawl_info: CrawlInfo) {
        self.crawl_info = Some(crawl_info);
    }

    pub(crate) fn add_schema(&mut self, schema: SchemaReference) {
        self.schemas.add(schema);
    }

    pub(crate) fn add_database_user(&mut self, user: DatabaseUser) {
        self.database_users.add(user);
    }

    pub(crate) fn add_column_data_type(&mut self, column_data_type: ColumnDataType) {
        self.column_data_types.add(column_data_type);
    }

    pub(crate) fn add_table(&mut self, table: Table) {
        self.tables.add(table);
    }

    pub(crate) fn table_mut(&mut self, key: &NamedObjectKey) -> Option<&mut Table> {
        self.tables.lookup_key_mut(key)
    }

    pub(crate) fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.tables.iter_mut()
    }

    pub(crate) fn add_routine(&mut self, routine: Routine) {
        self.routines.add(routine);
    }

    pub(crate) fn routine_mut(&mut self, key: &NamedObjectKey) -> Option<&mut Routine> {
        self.routines.lookup_key_mut(key)
    }

    pub(crate) fn add_sequence(&mut self, sequence: Sequence) {
        self.sequences.add(sequence);
    }

    pub(crate) fn add_synonym(&mut self, synonym: Synonym) {
        self.synonyms.add(synonym);
    }

    pub(crate) fn synonyms_mut(&mut self) -> impl Iterator<Item = &mut Synonym> {
        self.synonyms.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foreign_key::ForeignKey;
    use crate::routine::RoutineType;
    use crate::sequence::ObjectReference;

    struct Keep {
        kind: ObjectKind,
        names: Vec<&'static str>,
    }

    impl Reducer for Keep {
        fn kind(&self) -> ObjectKind {
            self.kind
        }

        fn retained(&self, catalog: &Catalog) -> BTreeSet<NamedObjectKey> {
            let full_names: Vec<(NamedObjectKey, String)> = match self.kind {
                ObjectKind::Schema => catalog.schemas().iter().map(|s| (s.key(), s.full_name())).collect(),
                ObjectKind::Table => catalog.tables().iter().map(|t| (t.key(), t.full_name())).collect(),
                ObjectKind::Routine => catalog.routines().iter().map(|r| (r.key(), r.full_name())).collect(),
                _ => Vec::new(),
            };
            full_names
                .into_iter()
                .filter(|(_, name)| self.names.contains(&name.as_str()))
                .map(|(key, _)| key)
                .collect()
        }
    }

    fn books() -> SchemaReference {
        SchemaReference::new(Some("PUBLIC"), Some("BOOKS"))
    }

    fn for_lint() -> SchemaReference {
        SchemaReference::new(Some("PUBLIC"), Some("FOR_LINT"))
    }

    fn sample() -> Catalog {
        let mut catalog = Catalog::new("catalog");
        catalog.add_schema(books());
        catalog.add_schema(for_lint());

        let authors = Table::new(books(), "AUTHORS", "TABLE");
        let mut bookauthors = Table::new(books(), "BOOKAUTHORS", "TABLE");
        let writers = Table::new(for_lint(), "WRITERS", "TABLE");

        let fk = ForeignKey::new("FK_Z_AUTHOR", authors.key(), bookauthors.key());
        bookauthors.add_foreign_key(fk.clone());
        let mut authors = authors;
        authors.add_foreign_key(fk);

        catalog.add_table(authors);
        catalog.add_table(bookauthors);
        catalog.add_table(writers);

        catalog.add_routine(Routine::new(books(), "NEW_PUBLISHER", "", RoutineType::Procedure));
        catalog.add_routine(Routine::new(for_lint(), "NEW_WRITER", "", RoutineType::Procedure));
        catalog.add_sequence(Sequence::new(for_lint(), "WRITER_SEQ"));

        let mut synonym = Synonym::new(books(), "WRITERS_ALIAS", for_lint(), "WRITERS");
        synonym.referenced_object = Some(ObjectReference {
            kind: ObjectKind::Table,
            key: for_lint().key().with("WRITERS"),
        });
        catalog.add_synonym(synonym);

        catalog.add_column_data_type(ColumnDataType::system("INTEGER", 4));
        catalog.add_column_data_type(ColumnDataType::user_defined(for_lint(), "NAME_TYPE", 12));
        catalog
    }

    #[test]
    fn lookups() {
        let catalog = sample();

        assert_eq!(catalog.lookup_schema("PUBLIC.BOOKS"), Some(&books()));
        assert!(catalog.lookup_schema("PUBLIC.NOPE").is_none());
        assert!(catalog.lookup_schema("").is_none());
        assert!(catalog.lookup_table(&books(), "AUTHORS").is_some());
        assert!(catalog.lookup_table(&books(), "").is_none());
        assert!(catalog.lookup_table(&for_lint(), "AUTHORS").is_none());
        assert!(catalog.lookup_sequence(&for_lint(), "WRITER_SEQ").is_some());
        assert!(catalog.lookup_synonym(&books(), "WRITERS_ALIAS").is_some());
        assert!(catalog.lookup_routine(&books(), "NEW_PUBLISHER").is_some());
        assert!(catalog.lookup_system_column_data_type("INTEGER").is_some());
        assert!(catalog.lookup_column_data_type(&for_lint(), "NAME_TYPE").is_some());
        assert_eq!(catalog.tables_in(&books()).count(), 2);
    }

    #[test]
    fn base_type_lookup_requires_unique_match() {
        let mut catalog = sample();
        assert_eq!(
            catalog.lookup_base_column_data_type_by_type(4).map(|t| t.name()),
            Some("INTEGER")
        );
        assert!(catalog.lookup_base_column_data_type_by_type(-5).is_none());
        // user-defined types never count
        assert!(catalog.lookup_base_column_data_type_by_type(12).is_none());

        catalog.add_column_data_type(ColumnDataType::system("INT", 4));
        assert!(catalog.lookup_base_column_data_type_by_type(4).is_none());
    }

    #[test]
    fn mismatched_reducer_is_rejected() {
        let mut catalog = sample();
        let reducer = Keep {
            kind: ObjectKind::Table,
            names: vec![],
        };

        let result = catalog.reduce(ObjectKind::Schema, &reducer);
        assert_eq!(
            result,
            Err(CatalogError::ReducerKindMismatch {
                kind: ObjectKind::Schema,
                reducer_kind: ObjectKind::Table,
            })
        );
        assert_eq!(catalog.tables().len(), 3);
    }

    #[test]
    fn non_reducible_kind_is_a_no_op() {
        let mut catalog = sample();
        let reducer = Keep {
            kind: ObjectKind::Column,
            names: vec![],
        };
        assert_eq!(catalog.reduce(ObjectKind::Column, &reducer), Ok(0));
    }

    #[test]
    fn schema_reduction_cascades() {
        let mut catalog = sample();
        let reducer = Keep {
            kind: ObjectKind::Schema,
            names: vec!["PUBLIC.BOOKS"],
        };

        assert_eq!(catalog.reduce(ObjectKind::Schema, &reducer), Ok(1));
        assert!(catalog.lookup_schema("PUBLIC.FOR_LINT").is_none());
        assert_eq!(catalog.tables().len(), 2);
        assert_eq!(catalog.routines().len(), 1);
        assert!(catalog.sequences().is_empty());
        assert!(catalog.lookup_column_data_type(&for_lint(), "NAME_TYPE").is_none());
        assert!(catalog.lookup_system_column_data_type("INTEGER").is_some());

        let synonym = catalog.lookup_synonym(&books(), "WRITERS_ALIAS").unwrap();
        assert!(synonym.referenced_object.is_none());
        assert_eq!(synonym.referenced_full_name(), "PUBLIC.FOR_LINT.WRITERS");
    }

    #[test]
    fn table_reduction_prunes_foreign_keys() {
        let mut catalog = sample();
        let reducer = Keep {
            kind: ObjectKind::Table,
            names: vec!["PUBLIC.BOOKS.AUTHORS", "PUBLIC.FOR_LINT.WRITERS"],
        };

        assert_eq!(catalog.reduce(ObjectKind::Table, &reducer), Ok(1));
        let authors = catalog.lookup_table(&books(), "AUTHORS").unwrap();
        assert!(authors.foreign_keys().is_empty());
        assert!(catalog.lookup_synonym(&books(), "WRITERS_ALIAS").unwrap().referenced_object.is_some());
    }

    #[test]
    fn reduction_is_idempotent() {
        let mut catalog = sample();
        let reducer = Keep {
            kind: ObjectKind::Routine,
            names: vec!["PUBLIC.FOR_LINT.NEW_WRITER"],
        };

        assert_eq!(catalog.reduce(ObjectKind::Routine, &reducer), Ok(1));
        let names: Vec<String> = catalog.routines().iter().map(|r| r.full_name()).collect();

        assert_eq!(catalog.reduce(ObjectKind::Routine, &reducer), Ok(0));
        let again: Vec<String> = catalog.routines().iter().map(|r| r.full_name()).collect();
        assert_eq!(names, again);
    }

    #[test]
    fn contains_by_kind() {
        let catalog = sample();
        assert!(catalog.contains(ObjectKind::Table, &books().key().with("AUTHORS")));
        assert!(!catalog.contains(ObjectKind::Routine, &books().key().with("AUTHORS")));
        assert!(catalog.contains(ObjectKind::Schema, &books().key()));
    }
}
