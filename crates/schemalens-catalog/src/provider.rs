//! Metadata provider trait and the rows it yields
//!
//! A provider answers one question per metadata category, per schema. An empty
//! result means the category is absent; only real failures are errors.

use schemalens_core::ObjectKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constraint::{ActionOrientation, ConditionTiming, EventManipulationType, TableConstraintType};
use crate::foreign_key::{Deferrability, ForeignKeyRule};
use crate::index::SortSequence;
use crate::info::{DatabaseInfo, DriverInfo};
use crate::routine::{ParameterMode, RoutineBodyType, RoutineReturnType, RoutineType};
use crate::schema::SchemaReference;
use crate::table::CheckOption;

fn default_true() -> bool {
    true
}

fn default_table_type() -> String {
    "TABLE".to_string()
}

fn default_increment() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub name: String,

    #[serde(default = "default_table_type")]
    pub table_type: String,

    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub table_name: String,
    pub name: String,

    #[serde(default)]
    pub ordinal_position: u32,

    pub type_name: String,

    /// Vendor type code of the column's data type
    #[serde(default)]
    pub type_code: i32,

    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub decimal_digits: u32,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub default_value: Option<String>,

    #[serde(default)]
    pub remarks: String,

    #[serde(default)]
    pub auto_incremented: bool,

    #[serde(default)]
    pub generated: bool,

    #[serde(default)]
    pub hidden: bool,
}

/// One column of one index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub table_name: String,
    pub index_name: String,
    pub column_name: String,

    #[serde(default)]
    pub ordinal_position: u32,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub sort_sequence: SortSequence,

    #[serde(default)]
    pub index_type: String,

    #[serde(default)]
    pub cardinality: u64,

    #[serde(default)]
    pub pages: u64,

    #[serde(default)]
    pub definition: String,
}

/// One column of one primary key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    pub table_name: String,
    pub name: String,
    pub column_name: String,

    #[serde(default)]
    pub key_sequence: u32,

    #[serde(default)]
    pub definition: String,
}

/// One column pair of one foreign key, imported by a table in the crawled schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    pub name: String,

    /// Referencing table, in the crawled schema
    pub table_name: String,
    pub column_name: String,

    /// Schema of the referenced table; defaults to the crawled schema
    #[serde(default)]
    pub primary_key_schema: Option<SchemaReference>,

    pub primary_key_table: String,
    pub primary_key_column: String,

    #[serde(default)]
    pub key_sequence: u32,

    #[serde(default)]
    pub update_rule: ForeignKeyRule,

    #[serde(default)]
    pub delete_rule: ForeignKeyRule,

    #[serde(default)]
    pub deferrability: Deferrability,

    #[serde(default)]
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConstraintRow {
    pub table_name: String,
    pub name: String,

    #[serde(default)]
    pub constraint_type: TableConstraintType,

    #[serde(default)]
    pub column_name: Option<String>,

    #[serde(default)]
    pub definition: String,

    #[serde(default)]
    pub deferrable: bool,

    #[serde(default)]
    pub initially_deferred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRow {
    pub table_name: String,
    pub name: String,

    #[serde(default)]
    pub event_manipulation_type: EventManipulationType,

    #[serde(default)]
    pub condition_timing: ConditionTiming,

    #[serde(default)]
    pub action_orientation: ActionOrientation,

    #[serde(default)]
    pub action_order: i32,

    #[serde(default)]
    pub action_condition: String,

    #[serde(default)]
    pub action_statement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub table_name: String,

    #[serde(default)]
    pub definition: String,

    #[serde(default)]
    pub updatable: bool,

    #[serde(default)]
    pub check_option: CheckOption,
}

/// Source text of a table or routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRow {
    pub name: String,

    /// Distinguishes routine overloads
    #[serde(default)]
    pub specific_name: Option<String>,

    pub definition: String,
}

/// A grant on a table, or on one of its columns when `column_name` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivilegeRow {
    pub table_name: String,

    #[serde(default)]
    pub column_name: Option<String>,

    pub privilege: String,

    #[serde(default)]
    pub grantor: String,

    #[serde(default)]
    pub grantee: String,

    #[serde(default)]
    pub is_grantable: bool,
}

/// An additional attribute of a table, or of one of its columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRow {
    pub table_name: String,

    #[serde(default)]
    pub column_name: Option<String>,

    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineRow {
    pub name: String,

    #[serde(default)]
    pub specific_name: String,

    #[serde(default)]
    pub routine_type: RoutineType,

    #[serde(default)]
    pub return_type: RoutineReturnType,

    #[serde(default)]
    pub body_type: RoutineBodyType,

    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineParameterRow {
    pub routine_name: String,

    #[serde(default)]
    pub specific_name: String,

    pub name: String,

    #[serde(default)]
    pub ordinal_position: u32,

    #[serde(default)]
    pub mode: ParameterMode,

    pub type_name: String,

    #[serde(default)]
    pub type_code: i32,

    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub decimal_digits: u32,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRow {
    pub name: String,

    #[serde(default = "default_increment")]
    pub increment: i64,

    #[serde(default)]
    pub minimum_value: Option<i64>,

    #[serde(default)]
    pub maximum_value: Option<i64>,

    #[serde(default)]
    pub cycle: bool,

    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymRow {
    pub name: String,

    /// Schema of the referenced object; defaults to the crawled schema
    #[serde(default)]
    pub referenced_schema: Option<SchemaReference>,

    pub referenced_object_name: String,

    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDataTypeRow {
    pub name: String,

    #[serde(default)]
    pub type_code: i32,

    #[serde(default)]
    pub precision: u64,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub auto_incrementable: bool,

    #[serde(default = "default_true")]
    pub searchable: bool,

    #[serde(default)]
    pub literal_prefix: String,

    #[serde(default)]
    pub literal_suffix: String,

    #[serde(default)]
    pub create_parameters: String,

    /// Type code of the system type a user-defined type is based on
    #[serde(default)]
    pub base_type_code: Option<i32>,

    #[serde(default)]
    pub remarks: String,

    #[serde(default)]
    pub enum_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseUserRow {
    pub name: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// Errors a provider can report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Source of database metadata
///
/// Calls are synchronous and made by a single crawler, in population order.
/// Every category defaults to empty, so a provider only implements what its
/// data source knows about.
pub trait MetadataProvider {
    /// Provider name, for logging
    fn name(&self) -> &str {
        "metadata"
    }

    /// Verify the data source is reachable before crawling
    fn check_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn database_info(&self) -> Result<DatabaseInfo, ProviderError> {
        Ok(DatabaseInfo::default())
    }

    fn database_properties(&self) -> Result<BTreeMap<String, Value>, ProviderError> {
        Ok(BTreeMap::new())
    }

    fn server_info(&self) -> Result<BTreeMap<String, String>, ProviderError> {
        Ok(BTreeMap::new())
    }

    fn driver_info(&self) -> Result<DriverInfo, ProviderError> {
        Ok(DriverInfo::default())
    }

    fn driver_properties(&self) -> Result<BTreeMap<String, String>, ProviderError> {
        Ok(BTreeMap::new())
    }

    fn database_users(&self) -> Result<Vec<DatabaseUserRow>, ProviderError> {
        Ok(Vec::new())
    }

    /// Every schema in the data source
    fn schemas(&self) -> Result<Vec<SchemaReference>, ProviderError>;

    fn system_column_data_types(&self) -> Result<Vec<ColumnDataTypeRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn user_defined_column_data_types(&self, _schema: &SchemaReference) -> Result<Vec<ColumnDataTypeRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn tables(&self, _schema: &SchemaReference) -> Result<Vec<TableRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn columns(&self, _schema: &SchemaReference) -> Result<Vec<ColumnRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn primary_keys(&self, _schema: &SchemaReference) -> Result<Vec<PrimaryKeyRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn indexes(&self, _schema: &SchemaReference) -> Result<Vec<IndexRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn foreign_keys(&self, _schema: &SchemaReference) -> Result<Vec<ForeignKeyRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn table_constraints(&self, _schema: &SchemaReference) -> Result<Vec<TableConstraintRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn triggers(&self, _schema: &SchemaReference) -> Result<Vec<TriggerRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn views(&self, _schema: &SchemaReference) -> Result<Vec<ViewRow>, ProviderError> {
        Ok(Vec::new())
    }

    /// Definitions of tables or routines
    fn definitions(&self, _kind: ObjectKind, _schema: &SchemaReference) -> Result<Vec<DefinitionRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn table_privileges(&self, _schema: &SchemaReference) -> Result<Vec<PrivilegeRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn column_privileges(&self, _schema: &SchemaReference) -> Result<Vec<PrivilegeRow>, ProviderError> {
        Ok(Vec::new())
    }

    /// Additional attributes of tables or columns
    fn attributes(&self, _kind: ObjectKind, _schema: &SchemaReference) -> Result<Vec<AttributeRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn routines(&self, _schema: &SchemaReference) -> Result<Vec<RoutineRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn routine_parameters(&self, _schema: &SchemaReference) -> Result<Vec<RoutineParameterRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn sequences(&self, _schema: &SchemaReference) -> Result<Vec<SequenceRow>, ProviderError> {
        Ok(Vec::new())
    }

    fn synonyms(&self, _schema: &SchemaReference) -> Result<Vec<SynonymRow>, ProviderError> {
        Ok(Vec::new())
    }
}
