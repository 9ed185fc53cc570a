//! Indexes and primary keys

use serde::{Deserialize, Serialize};

use crate::named::{NamedObject, NamedObjectKey};

/// Sort order of an index column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortSequence {
    #[default]
    Unknown,
    Ascending,
    Descending,
}

/// A column as it participates in an index or key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: String,

    /// 1-based position within the index
    pub index_ordinal_position: u32,

    pub sort_sequence: SortSequence,
}

/// An index on a table
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    table: NamedObjectKey,
    name: String,
    pub unique: bool,
    pub index_type: String,
    pub cardinality: u64,
    pub pages: u64,
    pub definition: String,
    pub remarks: String,
    columns: Vec<IndexColumn>,
}

impl Index {
    pub fn new(table: NamedObjectKey, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
            unique: false,
            index_type: String::new(),
            cardinality: 0,
            pages: 0,
            definition: String::new(),
            remarks: String::new(),
            columns: Vec::new(),
        }
    }

    pub fn table(&self) -> &NamedObjectKey {
        &self.table
    }

    /// Columns in index order
    pub fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Insert a column, keeping index order
    pub(crate) fn add_column(&mut self, column: IndexColumn) {
        let position = self
            .columns
            .partition_point(|c| c.index_ordinal_position <= column.index_ordinal_position);
        self.columns.insert(position, column);
    }
}

impl NamedObject for Index {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.table.with(&self.name)
    }
}

/// The primary key of a table
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    table: NamedObjectKey,
    name: String,
    pub definition: String,
    columns: Vec<IndexColumn>,
}

impl PrimaryKey {
    pub fn new(table: NamedObjectKey, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
            definition: String::new(),
            columns: Vec::new(),
        }
    }

    pub fn table(&self) -> &NamedObjectKey {
        &self.table
    }

    /// Columns in key sequence order
    pub fn columns(&self) -> &[IndexColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub(crate) fn add_column(&mut self, column: IndexColumn) {
        let position = self
            .columns
            .partition_point(|c| c.index_ordinal_position <= column.index_ordinal_position);
        self.columns.insert(position, column);
    }
}

impl NamedObject for PrimaryKey {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.table.with(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_column(name: &str, position: u32) -> IndexColumn {
        IndexColumn {
            name: name.to_string(),
            index_ordinal_position: position,
            sort_sequence: SortSequence::Ascending,
        }
    }

    #[test]
    fn columns_stay_in_index_order() {
        let table = NamedObjectKey::new(vec![None, Some("BOOKS".to_string())]).with("AUTHORS");
        let mut index = Index::new(table, "IDX_A1_AUTHORS");
        index.add_column(index_column("LASTNAME", 2));
        index.add_column(index_column("FIRSTNAME", 1));
        index.add_column(index_column("ID", 3));

        assert_eq!(index.column_names(), vec!["FIRSTNAME", "LASTNAME", "ID"]);
        assert_eq!(index.full_name(), "BOOKS.AUTHORS.IDX_A1_AUTHORS");
    }

    #[test]
    fn primary_key_columns() {
        let table = NamedObjectKey::new(vec![None, Some("BOOKS".to_string())]).with("BOOKAUTHORS");
        let mut pk = PrimaryKey::new(table, "PK_BOOKAUTHORS");
        pk.add_column(index_column("AUTHORID", 2));
        pk.add_column(index_column("BOOKID", 1));

        assert_eq!(pk.column_names(), vec!["BOOKID", "AUTHORID"]);
    }
}
