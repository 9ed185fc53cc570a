//! Foreign keys

use serde::{Deserialize, Serialize};

use crate::named::{NamedObject, NamedObjectKey};

/// Referential action on update or delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyRule {
    #[default]
    Unknown,
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

/// When constraint checking happens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deferrability {
    #[default]
    Unknown,
    InitiallyDeferred,
    InitiallyImmediate,
    NotDeferrable,
}

/// One referencing column paired with the column it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    pub key_sequence: u32,

    /// Column name on the referenced table
    pub primary_key_column: String,

    /// Column name on the referencing table
    pub foreign_key_column: String,
}

/// A foreign key from a referencing table to a referenced table
///
/// The key is stored on both tables; a self-referencing key is stored once.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    name: String,
    primary_key_table: NamedObjectKey,
    foreign_key_table: NamedObjectKey,
    column_references: Vec<ColumnReference>,
    pub update_rule: ForeignKeyRule,
    pub delete_rule: ForeignKeyRule,
    pub deferrability: Deferrability,
    pub definition: String,
}

impl ForeignKey {
    pub fn new(name: impl Into<String>, primary_key_table: NamedObjectKey, foreign_key_table: NamedObjectKey) -> Self {
        Self {
            name: name.into(),
            primary_key_table,
            foreign_key_table,
            column_references: Vec::new(),
            update_rule: ForeignKeyRule::default(),
            delete_rule: ForeignKeyRule::default(),
            deferrability: Deferrability::default(),
            definition: String::new(),
        }
    }

    /// The referenced (parent) table
    pub fn primary_key_table(&self) -> &NamedObjectKey {
        &self.primary_key_table
    }

    /// The referencing (child) table
    pub fn foreign_key_table(&self) -> &NamedObjectKey {
        &self.foreign_key_table
    }

    /// Column pairs in key sequence order
    pub fn column_references(&self) -> &[ColumnReference] {
        &self.column_references
    }

    pub fn foreign_key_columns(&self) -> Vec<&str> {
        self.column_references
            .iter()
            .map(|r| r.foreign_key_column.as_str())
            .collect()
    }

    pub fn is_self_referencing(&self) -> bool {
        self.primary_key_table == self.foreign_key_table
    }

    /// Whether either side is the given table
    pub fn involves(&self, table: &NamedObjectKey) -> bool {
        &self.primary_key_table == table || &self.foreign_key_table == table
    }

    pub(crate) fn add_column_reference(&mut self, reference: ColumnReference) {
        let position = self
            .column_references
            .partition_point(|r| r.key_sequence <= reference.key_sequence);
        self.column_references.insert(position, reference);
    }
}

impl NamedObject for ForeignKey {
    fn name(&self) -> &str {
        &self.name
    }

    /// Keyed under the referencing table
    fn key(&self) -> NamedObjectKey {
        self.foreign_key_table.with(&self.name)
    }
}
