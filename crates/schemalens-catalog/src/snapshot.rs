//! JSON snapshot metadata provider
//!
//! A snapshot is a serialized record of everything a provider would report for
//! a database. Loading one lets the crawler, the reducer and the lint engine
//! run without a live connection. It is useful for:
//! - Linting metadata exported from another environment
//! - Unit and integration testing
//! - Simulating provider failures at a given population step
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemalens_catalog::{Crawler, SnapshotProvider};
//! use schemalens_core::SchemaInfoLevel;
//!
//! let provider = SnapshotProvider::from_file("snapshot.json")?;
//! let catalog = Crawler::new(&provider, SchemaInfoLevel::standard()).crawl()?;
//! ```
//!
//! ## Simulating Failures
//!
//! ```rust,ignore
//! // Fail the connection check
//! let provider = SnapshotProvider::default().with_connection_failure();
//!
//! // Fail one category
//! let provider = SnapshotProvider::default()
//!     .with_error("columns", ProviderError::QueryFailed("timeout".to_string()));
//! ```

use schemalens_core::ObjectKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::info::{DatabaseInfo, DriverInfo};
use crate::provider::{
    AttributeRow, ColumnDataTypeRow, ColumnRow, DatabaseUserRow, DefinitionRow, ForeignKeyRow, IndexRow,
    MetadataProvider, PrimaryKeyRow, PrivilegeRow, ProviderError, RoutineParameterRow, RoutineRow, SequenceRow,
    SynonymRow, TableConstraintRow, TableRow, TriggerRow, ViewRow,
};
use crate::schema::SchemaReference;

/// Everything a provider reports for one database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    #[serde(default)]
    pub database_info: DatabaseInfo,

    #[serde(default)]
    pub database_properties: BTreeMap<String, Value>,

    #[serde(default)]
    pub server_info: BTreeMap<String, String>,

    #[serde(default)]
    pub driver_info: DriverInfo,

    #[serde(default)]
    pub driver_properties: BTreeMap<String, String>,

    #[serde(default)]
    pub database_users: Vec<DatabaseUserRow>,

    #[serde(default)]
    pub system_column_data_types: Vec<ColumnDataTypeRow>,

    #[serde(default)]
    pub schemas: Vec<SchemaSnapshot>,
}

/// Everything a provider reports for one schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(flatten)]
    pub schema: SchemaReference,

    #[serde(default)]
    pub user_defined_column_data_types: Vec<ColumnDataTypeRow>,

    #[serde(default)]
    pub tables: Vec<TableRow>,

    #[serde(default)]
    pub columns: Vec<ColumnRow>,

    #[serde(default)]
    pub primary_keys: Vec<PrimaryKeyRow>,

    #[serde(default)]
    pub indexes: Vec<IndexRow>,

    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyRow>,

    #[serde(default)]
    pub table_constraints: Vec<TableConstraintRow>,

    #[serde(default)]
    pub triggers: Vec<TriggerRow>,

    #[serde(default)]
    pub views: Vec<ViewRow>,

    #[serde(default)]
    pub table_definitions: Vec<DefinitionRow>,

    #[serde(default)]
    pub table_privileges: Vec<PrivilegeRow>,

    #[serde(default)]
    pub column_privileges: Vec<PrivilegeRow>,

    #[serde(default)]
    pub table_attributes: Vec<AttributeRow>,

    #[serde(default)]
    pub column_attributes: Vec<AttributeRow>,

    #[serde(default)]
    pub routines: Vec<RoutineRow>,

    #[serde(default)]
    pub routine_parameters: Vec<RoutineParameterRow>,

    #[serde(default)]
    pub routine_definitions: Vec<DefinitionRow>,

    #[serde(default)]
    pub sequences: Vec<SequenceRow>,

    #[serde(default)]
    pub synonyms: Vec<SynonymRow>,
}

impl SchemaSnapshot {
    pub fn new(schema: SchemaReference) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }
}

impl MetadataSnapshot {
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(json).map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ProviderError> {
        serde_json::to_string_pretty(self).map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ProviderError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ProviderError::IoError(e.to_string()))
    }
}

/// Metadata provider backed by a [`MetadataSnapshot`]
///
/// Errors can be configured per operation; the operation name is the
/// [`MetadataProvider`] method name, such as `"tables"` or `"foreign_keys"`.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: MetadataSnapshot,

    /// Errors to return for specific operations
    errors: HashMap<String, ProviderError>,

    /// Simulate connection failure
    fail_connection: bool,

    provider_name: String,
}

impl SnapshotProvider {
    pub fn new(snapshot: MetadataSnapshot) -> Self {
        Self {
            snapshot,
            errors: HashMap::new(),
            fail_connection: false,
            provider_name: "snapshot".to_string(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        Ok(Self::new(MetadataSnapshot::from_json(json)?))
    }

    /// Load a snapshot file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Configure to fail the connection check
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Configure an error to be returned by one operation
    pub fn with_error(mut self, operation: impl Into<String>, error: ProviderError) -> Self {
        self.errors.insert(operation.into(), error);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    pub fn snapshot(&self) -> &MetadataSnapshot {
        &self.snapshot
    }

    fn check(&self, operation: &str) -> Result<(), ProviderError> {
        match self.errors.get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn rows<T: Clone>(
        &self,
        operation: &str,
        schema: &SchemaReference,
        select: impl Fn(&SchemaSnapshot) -> &Vec<T>,
    ) -> Result<Vec<T>, ProviderError> {
        self.check(operation)?;
        let schema = schema.normalized();
        Ok(self
            .snapshot
            .schemas
            .iter()
            .find(|s| s.schema.normalized() == schema)
            .map(|s| select(s).clone())
            .unwrap_or_default())
    }
}

impl Default for SnapshotProvider {
    fn default() -> Self {
        Self::new(MetadataSnapshot::default())
    }
}

impl MetadataProvider for SnapshotProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    fn check_connection(&self) -> Result<(), ProviderError> {
        if self.fail_connection {
            return Err(ProviderError::ConnectionFailed(
                "Simulated connection failure".to_string(),
            ));
        }
        self.check("check_connection")
    }

    fn database_info(&self) -> Result<DatabaseInfo, ProviderError> {
        self.check("database_info")?;
        Ok(self.snapshot.database_info.clone())
    }

    fn database_properties(&self) -> Result<BTreeMap<String, Value>, ProviderError> {
        self.check("database_properties")?;
        Ok(self.snapshot.database_properties.clone())
    }

    fn server_info(&self) -> Result<BTreeMap<String, String>, ProviderError> {
        self.check("server_info")?;
        Ok(self.snapshot.server_info.clone())
    }

    fn driver_info(&self) -> Result<DriverInfo, ProviderError> {
        self.check("driver_info")?;
        Ok(self.snapshot.driver_info.clone())
    }

    fn driver_properties(&self) -> Result<BTreeMap<String, String>, ProviderError> {
        self.check("driver_properties")?;
        Ok(self.snapshot.driver_properties.clone())
    }

    fn database_users(&self) -> Result<Vec<DatabaseUserRow>, ProviderError> {
        self.check("database_users")?;
        Ok(self.snapshot.database_users.clone())
    }

    fn schemas(&self) -> Result<Vec<SchemaReference>, ProviderError> {
        self.check("schemas")?;
        Ok(self.snapshot.schemas.iter().map(|s| s.schema.clone()).collect())
    }

    fn system_column_data_types(&self) -> Result<Vec<ColumnDataTypeRow>, ProviderError> {
        self.check("system_column_data_types")?;
        Ok(self.snapshot.system_column_data_types.clone())
    }

    fn user_defined_column_data_types(&self, schema: &SchemaReference) -> Result<Vec<ColumnDataTypeRow>, ProviderError> {
        self.rows("user_defined_column_data_types", schema, |s| &s.user_defined_column_data_types)
    }

    fn tables(&self, schema: &SchemaReference) -> Result<Vec<TableRow>, ProviderError> {
        self.rows("tables", schema, |s| &s.tables)
    }

    fn columns(&self, schema: &SchemaReference) -> Result<Vec<ColumnRow>, ProviderError> {
        self.rows("columns", schema, |s| &s.columns)
    }

    fn primary_keys(&self, schema: &SchemaReference) -> Result<Vec<PrimaryKeyRow>, ProviderError> {
        self.rows("primary_keys", schema, |s| &s.primary_keys)
    }

    fn indexes(&self, schema: &SchemaReference) -> Result<Vec<IndexRow>, ProviderError> {
        self.rows("indexes", schema, |s| &s.indexes)
    }

    fn foreign_keys(&self, schema: &SchemaReference) -> Result<Vec<ForeignKeyRow>, ProviderError> {
        self.rows("foreign_keys", schema, |s| &s.foreign_keys)
    }

    fn table_constraints(&self, schema: &SchemaReference) -> Result<Vec<TableConstraintRow>, ProviderError> {
        self.rows("table_constraints", schema, |s| &s.table_constraints)
    }

    fn triggers(&self, schema: &SchemaReference) -> Result<Vec<TriggerRow>, ProviderError> {
        self.rows("triggers", schema, |s| &s.triggers)
    }

    fn views(&self, schema: &SchemaReference) -> Result<Vec<ViewRow>, ProviderError> {
        self.rows("views", schema, |s| &s.views)
    }

    fn definitions(&self, kind: ObjectKind, schema: &SchemaReference) -> Result<Vec<DefinitionRow>, ProviderError> {
        match kind {
            ObjectKind::Table => self.rows("definitions", schema, |s| &s.table_definitions),
            ObjectKind::Routine => self.rows("definitions", schema, |s| &s.routine_definitions),
            _ => Ok(Vec::new()),
        }
    }

    fn table_privileges(&self, schema: &SchemaReference) -> Result<Vec<PrivilegeRow>, ProviderError> {
        self.rows("table_privileges", schema, |s| &s.table_privileges)
    }

    fn column_privileges(&self, schema: &SchemaReference) -> Result<Vec<PrivilegeRow>, ProviderError> {
        self.rows("column_privileges", schema, |s| &s.column_privileges)
    }

    fn attributes(&self, kind: ObjectKind, schema: &SchemaReference) -> Result<Vec<AttributeRow>, ProviderError> {
        match kind {
            ObjectKind::Table => self.rows("attributes", schema, |s| &s.table_attributes),
            ObjectKind::Column => self.rows("attributes", schema, |s| &s.column_attributes),
            _ => Ok(Vec::new()),
        }
    }

    fn routines(&self, schema: &SchemaReference) -> Result<Vec<RoutineRow>, ProviderError> {
        self.rows("routines", schema, |s| &s.routines)
    }

    fn routine_parameters(&self, schema: &SchemaReference) -> Result<Vec<RoutineParameterRow>, ProviderError> {
        self.rows("routine_parameters", schema, |s| &s.routine_parameters)
    }

    fn sequences(&self, schema: &SchemaReference) -> Result<Vec<SequenceRow>, ProviderError> {
        self.rows("sequences", schema, |s| &s.sequences)
    }

    fn synonyms(&self, schema: &SchemaReference) -> Result<Vec<SynonymRow>, ProviderError> {
        self.rows("synonyms", schema, |s| &s.synonyms)
    }
}

/// Builder for creating a SnapshotProvider schema by schema
///
/// # Example
///
/// ```rust,ignore
/// let provider = SnapshotProviderBuilder::new()
///     .with_database_info(DatabaseInfo { product_name: "PostgreSQL".into(), ..Default::default() })
///     .with_schema(SchemaSnapshot::new(SchemaReference::new(Some("PUBLIC"), Some("BOOKS"))))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct SnapshotProviderBuilder {
    snapshot: MetadataSnapshot,
    errors: HashMap<String, ProviderError>,
    fail_connection: bool,
    provider_name: Option<String>,
}

impl SnapshotProviderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database_info(mut self, database_info: DatabaseInfo) -> Self {
        self.snapshot.database_info = database_info;
        self
    }

    pub fn with_driver_info(mut self, driver_info: DriverInfo) -> Self {
        self.snapshot.driver_info = driver_info;
        self
    }

    pub fn with_system_column_data_type(mut self, row: ColumnDataTypeRow) -> Self {
        self.snapshot.system_column_data_types.push(row);
        self
    }

    pub fn with_schema(mut self, schema: SchemaSnapshot) -> Self {
        self.snapshot.schemas.push(schema);
        self
    }

    pub fn with_error(mut self, operation: impl Into<String>, error: ProviderError) -> Self {
        self.errors.insert(operation.into(), error);
        self
    }

    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    pub fn build(self) -> SnapshotProvider {
        let mut provider = SnapshotProvider::new(self.snapshot);
        provider.errors = self.errors;
        provider.fail_connection = self.fail_connection;
        if let Some(name) = self.provider_name {
            provider.provider_name = name;
        }
        provider
    }
}
