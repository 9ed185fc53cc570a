//! Column data types

use crate::named::{DatabaseObject, NamedObject, NamedObjectKey};
use crate::schema::SchemaReference;

/// A data type, either built into the database or defined by a user
///
/// System types live in the system schema; user-defined types live in their
/// owning schema and may name a system base type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDataType {
    schema: SchemaReference,
    name: String,

    /// Vendor type code
    pub type_code: i32,

    pub precision: u64,
    pub nullable: bool,
    pub auto_incrementable: bool,
    pub searchable: bool,
    pub literal_prefix: String,
    pub literal_suffix: String,
    pub create_parameters: String,
    pub remarks: String,
    pub enum_values: Vec<String>,

    /// Key of the system type a user-defined type is based on
    pub base_type: Option<NamedObjectKey>,

    user_defined: bool,
}

impl ColumnDataType {
    /// A built-in type
    pub fn system(name: impl Into<String>, type_code: i32) -> Self {
        Self::new(SchemaReference::system(), name, type_code, false)
    }

    /// A type defined in `schema`
    pub fn user_defined(schema: SchemaReference, name: impl Into<String>, type_code: i32) -> Self {
        Self::new(schema, name, type_code, true)
    }

    fn new(schema: SchemaReference, name: impl Into<String>, type_code: i32, user_defined: bool) -> Self {
        Self {
            schema,
            name: name.into(),
            type_code,
            precision: 0,
            nullable: true,
            auto_incrementable: false,
            searchable: true,
            literal_prefix: String::new(),
            literal_suffix: String::new(),
            create_parameters: String::new(),
            remarks: String::new(),
            enum_values: Vec::new(),
            base_type: None,
            user_defined,
        }
    }

    pub fn is_user_defined(&self) -> bool {
        self.user_defined
    }

    pub fn is_enumerated(&self) -> bool {
        !self.enum_values.is_empty()
    }
}

impl NamedObject for ColumnDataType {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.schema.key().with(&self.name)
    }
}

impl DatabaseObject for ColumnDataType {
    fn schema(&self) -> &SchemaReference {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_types_live_in_system_schema() {
        let integer = ColumnDataType::system("INTEGER", 4);
        assert!(integer.schema().is_system());
        assert!(!integer.is_user_defined());
        assert_eq!(integer.full_name(), "INTEGER");
    }

    #[test]
    fn user_defined_types_are_schema_scoped() {
        let books = SchemaReference::new(Some("PUBLIC"), Some("BOOKS"));
        let mut name_type = ColumnDataType::user_defined(books, "NAME_TYPE", 12);
        name_type.base_type = Some(SchemaReference::system().key().with("VARCHAR"));

        assert!(name_type.is_user_defined());
        assert_eq!(name_type.full_name(), "PUBLIC.BOOKS.NAME_TYPE");
        assert!(!name_type.is_enumerated());
    }
}
