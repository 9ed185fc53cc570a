//! Tables and views

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::attributes::Attributes;
use crate::column::Column;
use crate::constraint::{TableConstraint, Trigger};
use crate::foreign_key::ForeignKey;
use crate::index::{Index, PrimaryKey};
use crate::named::{DatabaseObject, NamedObject, NamedObjectKey};
use crate::privilege::Privilege;
use crate::schema::SchemaReference;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOption {
    #[default]
    None,
    Local,
    Cascaded,
}

/// What a view adds to a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewDetails {
    pub definition: String,
    pub updatable: bool,
    pub check_option: CheckOption,
}

/// A table, or a view when the table type says so
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: SchemaReference,
    name: String,

    /// Table type as reported by the database, e.g. `TABLE` or `VIEW`
    pub table_type: String,

    pub remarks: String,
    pub definition: String,
    pub view: Option<ViewDetails>,
    pub attributes: Attributes,

    pub(crate) columns: Vec<Column>,
    pub(crate) primary_key: Option<PrimaryKey>,
    pub(crate) indexes: Vec<Index>,
    pub(crate) foreign_keys: Vec<ForeignKey>,
    pub(crate) table_constraints: Vec<TableConstraint>,
    pub(crate) triggers: Vec<Trigger>,
    pub(crate) privileges: Vec<Privilege>,
}

impl Table {
    pub fn new(schema: SchemaReference, name: impl Into<String>, table_type: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
            table_type: table_type.into(),
            remarks: String::new(),
            definition: String::new(),
            view: None,
            attributes: Attributes::new(),
            columns: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            table_constraints: Vec::new(),
            triggers: Vec::new(),
            privileges: Vec::new(),
        }
    }

    pub fn is_view(&self) -> bool {
        self.view.is_some() || self.table_type.to_ascii_uppercase().contains("VIEW")
    }

    /// Columns in ordinal order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn lookup_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub(crate) fn lookup_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name() == name)
    }

    pub(crate) fn add_column(&mut self, column: Column) {
        let position = self
            .columns
            .partition_point(|c| c.ordinal_position <= column.ordinal_position);
        self.columns.insert(position, column);
    }

    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    pub fn has_primary_key(&self) -> bool {
        self.primary_key.is_some()
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn lookup_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name() == name)
    }

    /// Foreign keys on either side of this table
    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn lookup_foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.name() == name)
    }

    /// Foreign keys where this table is the referencing side
    pub fn imported_foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        let key = self.key();
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.foreign_key_table() == &key)
    }

    /// Foreign keys where this table is the referenced side
    pub fn exported_foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        let key = self.key();
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.primary_key_table() == &key)
    }

    /// Tables this table references, excluding itself
    pub fn referenced_tables(&self) -> BTreeSet<NamedObjectKey> {
        self.imported_foreign_keys()
            .filter(|fk| !fk.is_self_referencing())
            .map(|fk| fk.primary_key_table().clone())
            .collect()
    }

    /// Tables referencing this table, excluding itself
    pub fn referencing_tables(&self) -> BTreeSet<NamedObjectKey> {
        self.exported_foreign_keys()
            .filter(|fk| !fk.is_self_referencing())
            .map(|fk| fk.foreign_key_table().clone())
            .collect()
    }

    pub(crate) fn add_foreign_key(&mut self, foreign_key: ForeignKey) {
        if self.lookup_foreign_key_by_key(&foreign_key.key()).is_none() {
            self.foreign_keys.push(foreign_key);
        }
    }

    fn lookup_foreign_key_by_key(&self, key: &NamedObjectKey) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| &fk.key() == key)
    }

    pub fn table_constraints(&self) -> &[TableConstraint] {
        &self.table_constraints
    }

    pub fn lookup_table_constraint(&self, name: &str) -> Option<&TableConstraint> {
        self.table_constraints.iter().find(|c| c.name() == name)
    }

    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    pub fn lookup_trigger(&self, name: &str) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.name() == name)
    }

    pub fn privileges(&self) -> &[Privilege] {
        &self.privileges
    }

    pub fn lookup_privilege(&self, name: &str) -> Option<&Privilege> {
        self.privileges.iter().find(|p| p.name() == name)
    }

    /// Recompute the `part_of_*` column flags from keys and indexes
    pub(crate) fn refresh_column_flags(&mut self) {
        let primary_key: BTreeSet<String> = self
            .primary_key
            .iter()
            .flat_map(|pk| pk.column_names())
            .map(str::to_string)
            .collect();
        let foreign_key: BTreeSet<String> = self
            .imported_foreign_keys()
            .flat_map(|fk| fk.foreign_key_columns())
            .map(str::to_string)
            .collect();
        let indexed: BTreeSet<String> = self
            .indexes
            .iter()
            .flat_map(|i| i.column_names())
            .map(str::to_string)
            .collect();
        let unique: BTreeSet<String> = self
            .indexes
            .iter()
            .filter(|i| i.unique)
            .flat_map(|i| i.column_names())
            .map(str::to_string)
            .collect();

        for column in &mut self.columns {
            let name = column.name().to_string();
            column.part_of_primary_key = primary_key.contains(&name);
            column.part_of_foreign_key = foreign_key.contains(&name);
            column.part_of_index = indexed.contains(&name);
            column.part_of_unique_index = unique.contains(&name);
        }
    }
}

impl NamedObject for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.schema.key().with(&self.name)
    }
}

impl DatabaseObject for Table {
    fn schema(&self) -> &SchemaReference {
        &self.schema
    }
}
