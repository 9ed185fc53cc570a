//! Table columns

use crate::attributes::Attributes;
use crate::named::{NamedObject, NamedObjectKey};
use crate::privilege::Privilege;

/// A column of a table or view
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    table: NamedObjectKey,
    name: String,

    /// 1-based position in the table
    pub ordinal_position: u32,

    /// Key of the resolved column data type
    pub column_data_type: NamedObjectKey,

    /// Type name as reported by the database, e.g. `VARCHAR(20)`
    pub type_name: String,

    pub size: u64,
    pub decimal_digits: u32,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub remarks: String,
    pub auto_incremented: bool,
    pub generated: bool,
    pub hidden: bool,

    pub part_of_primary_key: bool,
    pub part_of_foreign_key: bool,
    pub part_of_index: bool,
    pub part_of_unique_index: bool,

    pub privileges: Vec<Privilege>,
    pub attributes: Attributes,
}

impl Column {
    pub fn new(table: NamedObjectKey, name: impl Into<String>, column_data_type: NamedObjectKey) -> Self {
        Self {
            table,
            name: name.into(),
            ordinal_position: 0,
            column_data_type,
            type_name: String::new(),
            size: 0,
            decimal_digits: 0,
            nullable: true,
            default_value: None,
            remarks: String::new(),
            auto_incremented: false,
            generated: false,
            hidden: false,
            part_of_primary_key: false,
            part_of_foreign_key: false,
            part_of_index: false,
            part_of_unique_index: false,
            privileges: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    /// Key of the owning table
    pub fn table(&self) -> &NamedObjectKey {
        &self.table
    }

    /// Type name with size, e.g. `VARCHAR(20)` or `DECIMAL(10, 2)`
    pub fn width(&self) -> String {
        if self.type_name.contains('(') || self.size == 0 {
            self.type_name.clone()
        } else if self.decimal_digits > 0 {
            format!("{}({}, {})", self.type_name, self.size, self.decimal_digits)
        } else {
            format!("{}({})", self.type_name, self.size)
        }
    }

    pub fn lookup_privilege(&self, name: &str) -> Option<&Privilege> {
        self.privileges.iter().find(|p| p.name() == name)
    }
}

impl NamedObject for Column {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.table.with(&self.name)
    }
}
