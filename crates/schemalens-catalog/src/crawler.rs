//! Catalog population
//!
//! The crawler asks a [`MetadataProvider`] for one metadata category at a time
//! and builds a [`Catalog`] in a single pass: database and driver information,
//! users, schemas and system types first, then everything owned by each schema,
//! then foreign keys across all schemas, then synonym targets. Each step runs
//! only if the active [`SchemaInfoLevel`] enables it. The first provider error
//! abandons the crawl.

use chrono::Utc;
use schemalens_core::SchemaInfoRetrieval::*;
use schemalens_core::{ObjectKind, SchemaInfoLevel};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::column::Column;
use crate::constraint::{TableConstraint, TableConstraintType, Trigger};
use crate::data_type::ColumnDataType;
use crate::error::CrawlError;
use crate::foreign_key::{ColumnReference, ForeignKey};
use crate::index::{Index, IndexColumn, PrimaryKey, SortSequence};
use crate::info::{CrawlInfo, DatabaseUser};
use crate::named::{DatabaseObject, NamedObject, NamedObjectKey};
use crate::privilege::Privilege;
use crate::provider::{ColumnDataTypeRow, MetadataProvider, PrivilegeRow, ProviderError};
use crate::routine::{Routine, RoutineParameter};
use crate::schema::SchemaReference;
use crate::sequence::{ObjectReference, Sequence, Synonym};
use crate::table::{Table, ViewDetails};

/// Name given to catalogs unless configured otherwise
pub const DEFAULT_CATALOG_NAME: &str = "catalog";

fn step<T>(operation: &'static str, result: Result<T, ProviderError>) -> Result<T, CrawlError> {
    result.map_err(|source| CrawlError::Provider { operation, source })
}

/// Builds a catalog from a metadata provider
pub struct Crawler<'a> {
    provider: &'a dyn MetadataProvider,
    info_level: SchemaInfoLevel,
    catalog_name: String,
}

impl<'a> Crawler<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, info_level: SchemaInfoLevel) -> Self {
        Self {
            provider,
            info_level,
            catalog_name: DEFAULT_CATALOG_NAME.to_string(),
        }
    }

    pub fn with_catalog_name(mut self, name: impl Into<String>) -> Self {
        self.catalog_name = name.into();
        self
    }

    pub fn info_level(&self) -> &SchemaInfoLevel {
        &self.info_level
    }

    /// Run the crawl
    pub fn crawl(&self) -> Result<Catalog, CrawlError> {
        let level = &self.info_level;
        info!(provider = self.provider.name(), info_level = level.tag(), "Crawling catalog");

        step("connection", self.provider.check_connection())?;

        let mut catalog = Catalog::new(&self.catalog_name);
        self.crawl_database_info(&mut catalog)?;

        if level.is(RetrieveDatabaseUsers) {
            for row in step("database users", self.provider.database_users())? {
                let mut user = DatabaseUser::new(row.name);
                for (name, value) in row.attributes {
                    user.attributes.set(name, value);
                }
                catalog.add_database_user(user);
            }
        }

        let mut schemas = Vec::new();
        for schema in step("schemas", self.provider.schemas())? {
            let schema = schema.normalized();
            if catalog.contains(ObjectKind::Schema, &schema.key()) {
                debug!(schema = %schema, "Skipping duplicate schema");
                continue;
            }
            catalog.add_schema(schema.clone());
            schemas.push(schema);
        }
        debug!(count = schemas.len(), "Retrieved schemas");

        if level.is(RetrieveColumnDataTypes) {
            for row in step("system column data types", self.provider.system_column_data_types())? {
                let data_type = build_data_type(&catalog, ColumnDataType::system(&row.name, row.type_code), &row);
                catalog.add_column_data_type(data_type);
            }
        }

        for schema in &schemas {
            self.crawl_schema(&mut catalog, schema)?;
        }

        if level.is(RetrieveTables) && level.is(RetrieveForeignKeys) {
            if level.is(RetrieveTableColumns) {
                for schema in &schemas {
                    self.crawl_foreign_keys(&mut catalog, schema)?;
                }
            } else {
                debug!("Skipping foreign keys, table columns are not retrieved");
            }
        }

        for table in catalog.tables_mut() {
            table.refresh_column_flags();
        }

        if level.is(RetrieveSynonymInformation) {
            resolve_synonyms(&mut catalog);
        }

        let crawl_info = CrawlInfo {
            crawl_timestamp: Utc::now(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            database_info: catalog.database_info().summary(),
            driver_info: catalog.driver_info().summary(),
            info_level: level.tag().to_string(),
        };
        catalog.set_crawl_info(crawl_info);

        info!(
            schemas = catalog.schemas().len(),
            tables = catalog.tables().len(),
            routines = catalog.routines().len(),
            "Crawled catalog"
        );
        Ok(catalog)
    }

    fn crawl_database_info(&self, catalog: &mut Catalog) -> Result<(), CrawlError> {
        let level = &self.info_level;
        if !level.is(RetrieveDatabaseInfo) {
            return Ok(());
        }

        catalog.set_database_info(step("database info", self.provider.database_info())?);
        catalog.set_driver_info(step("driver info", self.provider.driver_info())?);

        if level.is(RetrieveServerInfo) {
            let server_info = step("server info", self.provider.server_info())?;
            catalog.database_info_mut().server_info.extend(server_info);
        }
        if level.is(RetrieveAdditionalDatabaseInfo) {
            let properties = step("database properties", self.provider.database_properties())?;
            catalog.database_info_mut().properties.extend(properties);
        }
        if level.is(RetrieveAdditionalDriverInfo) {
            let properties = step("driver properties", self.provider.driver_properties())?;
            catalog.driver_info_mut().properties.extend(properties);
        }
        Ok(())
    }

    fn crawl_schema(&self, catalog: &mut Catalog, schema: &SchemaReference) -> Result<(), CrawlError> {
        let level = &self.info_level;
        debug!(schema = %schema, "Crawling schema");

        if level.is(RetrieveUserDefinedColumnDataTypes) {
            for row in step("user defined column data types", self.provider.user_defined_column_data_types(schema))? {
                let data_type = ColumnDataType::user_defined(schema.clone(), &row.name, row.type_code);
                let data_type = build_data_type(catalog, data_type, &row);
                catalog.add_column_data_type(data_type);
            }
        }

        if level.is(RetrieveTables) {
            self.crawl_tables(catalog, schema)?;
        }

        if level.is(RetrieveRoutines) {
            self.crawl_routines(catalog, schema)?;
        }

        if level.is(RetrieveSequenceInformation) {
            for row in step("sequences", self.provider.sequences(schema))? {
                let mut sequence = Sequence::new(schema.clone(), row.name);
                sequence.increment = row.increment;
                sequence.minimum_value = row.minimum_value;
                sequence.maximum_value = row.maximum_value;
                sequence.cycle = row.cycle;
                sequence.remarks = row.remarks;
                catalog.add_sequence(sequence);
            }
        }

        if level.is(RetrieveSynonymInformation) {
            for row in step("synonyms", self.provider.synonyms(schema))? {
                let referenced_schema = row
                    .referenced_schema
                    .map(|s| s.normalized())
                    .unwrap_or_else(|| schema.clone());
                let mut synonym = Synonym::new(schema.clone(), row.name, referenced_schema, row.referenced_object_name);
                synonym.remarks = row.remarks;
                catalog.add_synonym(synonym);
            }
        }

        Ok(())
    }

    fn crawl_tables(&self, catalog: &mut Catalog, schema: &SchemaReference) -> Result<(), CrawlError> {
        let level = &self.info_level;

        for row in step("tables", self.provider.tables(schema))? {
            let mut table = Table::new(schema.clone(), row.name, row.table_type);
            table.remarks = row.remarks;
            catalog.add_table(table);
        }

        let columns = level.is(RetrieveTableColumns);
        if columns {
            self.crawl_columns(catalog, schema)?;
        } else {
            debug!(schema = %schema, "Skipping columns, keys, indexes, constraints and triggers");
        }

        if columns && level.is(RetrieveIndexes) {
            self.crawl_indexes(catalog, schema)?;
        }

        if columns && level.is(RetrieveTableConstraintInformation) {
            self.crawl_table_constraints(catalog, schema)?;
        }

        if columns && level.is(RetrieveTriggerInformation) {
            for row in step("triggers", self.provider.triggers(schema))? {
                with_table(catalog, schema, &row.table_name, "trigger", |table| {
                    let mut trigger = Trigger::new(table.key(), &row.name);
                    trigger.event_manipulation_type = row.event_manipulation_type;
                    trigger.condition_timing = row.condition_timing;
                    trigger.action_orientation = row.action_orientation;
                    trigger.action_order = row.action_order;
                    trigger.action_condition = row.action_condition.clone();
                    trigger.action_statement = row.action_statement.clone();
                    table.triggers.push(trigger);
                });
            }
        }

        if level.is(RetrieveViewInformation) {
            for row in step("views", self.provider.views(schema))? {
                with_table(catalog, schema, &row.table_name, "view", |table| {
                    table.view = Some(ViewDetails {
                        definition: row.definition.clone(),
                        updatable: row.updatable,
                        check_option: row.check_option,
                    });
                });
            }
        }

        if level.is(RetrieveTableDefinitionsInformation) {
            for row in step("table definitions", self.provider.definitions(ObjectKind::Table, schema))? {
                with_table(catalog, schema, &row.name, "definition", |table| {
                    table.definition = row.definition.clone();
                });
            }
        }

        if level.is(RetrieveTablePrivileges) {
            for row in step("table privileges", self.provider.table_privileges(schema))? {
                with_table(catalog, schema, &row.table_name, "privilege", |table| {
                    let key = table.key();
                    grant(&mut table.privileges, key, &row);
                });
            }
        }

        if columns && level.is(RetrieveTableColumnPrivileges) {
            for row in step("column privileges", self.provider.column_privileges(schema))? {
                let Some(column_name) = row.column_name.clone() else {
                    debug!(table = %row.table_name, "Skipping column privilege without a column");
                    continue;
                };
                with_table(catalog, schema, &row.table_name, "column privilege", |table| {
                    match table.lookup_column_mut(&column_name) {
                        Some(column) => {
                            let key = column.key();
                            grant(&mut column.privileges, key, &row);
                        }
                        None => debug!(column = %column_name, "Skipping privilege for unknown column"),
                    }
                });
            }
        }

        if level.is(RetrieveAdditionalTableAttributes) {
            for row in step("table attributes", self.provider.attributes(ObjectKind::Table, schema))? {
                with_table(catalog, schema, &row.table_name, "attribute", |table| {
                    table.attributes.set(row.name.clone(), row.value.clone());
                });
            }
        }

        if columns && level.is(RetrieveAdditionalColumnAttributes) {
            for row in step("column attributes", self.provider.attributes(ObjectKind::Column, schema))? {
                let column_name = row.column_name.clone().unwrap_or_default();
                with_table(catalog, schema, &row.table_name, "column attribute", |table| {
                    match table.lookup_column_mut(&column_name) {
                        Some(column) => column.attributes.set(row.name.clone(), row.value.clone()),
                        None => debug!(column = %column_name, "Skipping attribute for unknown column"),
                    }
                });
            }
        }

        Ok(())
    }

    fn crawl_columns(&self, catalog: &mut Catalog, schema: &SchemaReference) -> Result<(), CrawlError> {
        for row in step("columns", self.provider.columns(schema))? {
            let table_key = schema.key().with(&row.table_name);
            if catalog.lookup_table_by_key(&table_key).is_none() {
                debug!(table = %table_key, column = %row.name, "Skipping column of unknown table");
                continue;
            }

            let data_type = resolve_data_type(catalog, schema, &row.type_name, row.type_code);
            let mut column = Column::new(table_key.clone(), &row.name, data_type);
            column.ordinal_position = row.ordinal_position;
            column.type_name = row.type_name;
            column.size = row.size;
            column.decimal_digits = row.decimal_digits;
            column.nullable = row.nullable;
            column.default_value = row.default_value;
            column.remarks = row.remarks;
            column.auto_incremented = row.auto_incremented;
            column.generated = row.generated;
            column.hidden = row.hidden;

            if let Some(table) = catalog.table_mut(&table_key) {
                table.add_column(column);
            }
        }
        Ok(())
    }

    fn crawl_indexes(&self, catalog: &mut Catalog, schema: &SchemaReference) -> Result<(), CrawlError> {
        let level = &self.info_level;

        for row in step("primary keys", self.provider.primary_keys(schema))? {
            with_table(catalog, schema, &row.table_name, "primary key", |table| {
                let key = table.key();
                let primary_key = table
                    .primary_key
                    .get_or_insert_with(|| PrimaryKey::new(key, &row.name));
                if level.is(RetrievePrimaryKeyDefinitions) && !row.definition.is_empty() {
                    primary_key.definition = row.definition.clone();
                }
                primary_key.add_column(IndexColumn {
                    name: row.column_name.clone(),
                    index_ordinal_position: row.key_sequence,
                    sort_sequence: SortSequence::Unknown,
                });
            });
        }

        for row in step("indexes", self.provider.indexes(schema))? {
            with_table(catalog, schema, &row.table_name, "index", |table| {
                let position = match table.indexes.iter().position(|i| i.name() == row.index_name) {
                    Some(position) => position,
                    None => {
                        let mut index = Index::new(table.key(), &row.index_name);
                        index.unique = row.unique;
                        index.index_type = row.index_type.clone();
                        index.cardinality = row.cardinality;
                        index.pages = row.pages;
                        if level.is(RetrieveIndexInformation) {
                            index.definition = row.definition.clone();
                        }
                        table.indexes.push(index);
                        table.indexes.len() - 1
                    }
                };
                table.indexes[position].add_column(IndexColumn {
                    name: row.column_name.clone(),
                    index_ordinal_position: row.ordinal_position,
                    sort_sequence: row.sort_sequence,
                });
            });
        }
        Ok(())
    }

    fn crawl_table_constraints(&self, catalog: &mut Catalog, schema: &SchemaReference) -> Result<(), CrawlError> {
        let definitions = self.info_level.is(RetrieveTableConstraintDefinitions);

        for row in step("table constraints", self.provider.table_constraints(schema))? {
            with_table(catalog, schema, &row.table_name, "table constraint", |table| {
                let position = match table.table_constraints.iter().position(|c| c.name() == row.name) {
                    Some(position) => position,
                    None => {
                        let mut constraint = TableConstraint::new(table.key(), &row.name, row.constraint_type);
                        constraint.deferrable = row.deferrable;
                        constraint.initially_deferred = row.initially_deferred;
                        if definitions {
                            constraint.definition = row.definition.clone();
                        }
                        table.table_constraints.push(constraint);
                        table.table_constraints.len() - 1
                    }
                };
                if let Some(column_name) = &row.column_name {
                    table.table_constraints[position].columns.push(column_name.clone());
                }
            });
        }

        // Mirror primary keys as constraints
        for table in catalog.tables_mut() {
            if table.schema() != schema {
                continue;
            }
            let Some(primary_key) = &table.primary_key else {
                continue;
            };
            if table.lookup_table_constraint(primary_key.name()).is_some() {
                continue;
            }
            let mut constraint = TableConstraint::new(table.key(), primary_key.name(), TableConstraintType::PrimaryKey);
            constraint.columns = primary_key.column_names().into_iter().map(str::to_string).collect();
            constraint.definition = primary_key.definition.clone();
            table.table_constraints.push(constraint);
        }
        Ok(())
    }

    fn crawl_routines(&self, catalog: &mut Catalog, schema: &SchemaReference) -> Result<(), CrawlError> {
        let level = &self.info_level;

        for row in step("routines", self.provider.routines(schema))? {
            let mut routine = Routine::new(schema.clone(), row.name, row.specific_name, row.routine_type);
            routine.return_type = row.return_type;
            routine.body_type = row.body_type;
            routine.remarks = row.remarks;
            catalog.add_routine(routine);
        }

        if level.is(RetrieveRoutineParameters) {
            for row in step("routine parameters", self.provider.routine_parameters(schema))? {
                let specific_name = if row.specific_name.trim().is_empty() {
                    &row.routine_name
                } else {
                    &row.specific_name
                };
                let routine_key = schema.key().with(&row.routine_name).with(specific_name);
                if catalog.lookup_routine_by_key(&routine_key).is_none() {
                    debug!(routine = %routine_key, parameter = %row.name, "Skipping parameter of unknown routine");
                    continue;
                }

                let data_type = resolve_data_type(catalog, schema, &row.type_name, row.type_code);
                let mut parameter = RoutineParameter::new(routine_key.clone(), &row.name, data_type);
                parameter.ordinal_position = row.ordinal_position;
                parameter.mode = row.mode;
                parameter.type_name = row.type_name;
                parameter.size = row.size;
                parameter.decimal_digits = row.decimal_digits;
                parameter.nullable = row.nullable;
                parameter.remarks = row.remarks;

                if let Some(routine) = catalog.routine_mut(&routine_key) {
                    routine.add_parameter(parameter);
                }
            }
        }

        if level.is(RetrieveRoutineInformation) {
            for row in step("routine definitions", self.provider.definitions(ObjectKind::Routine, schema))? {
                let routine_key = match &row.specific_name {
                    Some(specific_name) => Some(schema.key().with(&row.name).with(specific_name)),
                    None => catalog.lookup_routine(schema, &row.name).map(|r| r.key()),
                };
                let routine = match routine_key {
                    Some(key) => catalog.routine_mut(&key),
                    None => None,
                };
                match routine {
                    Some(routine) => routine.definition = row.definition,
                    None => debug!(routine = %row.name, "Skipping definition of unknown routine"),
                }
            }
        }

        Ok(())
    }

    fn crawl_foreign_keys(&self, catalog: &mut Catalog, schema: &SchemaReference) -> Result<(), CrawlError> {
        let definitions = self.info_level.is(RetrieveForeignKeyDefinitions);

        let mut foreign_keys: Vec<ForeignKey> = Vec::new();
        let mut positions: HashMap<NamedObjectKey, usize> = HashMap::new();

        for row in step("foreign keys", self.provider.foreign_keys(schema))? {
            let foreign_key_table = schema.key().with(&row.table_name);
            let primary_key_schema = row
                .primary_key_schema
                .as_ref()
                .map(SchemaReference::normalized)
                .unwrap_or_else(|| schema.clone());
            let primary_key_table = primary_key_schema.key().with(&row.primary_key_table);

            let key = foreign_key_table.with(&row.name);
            let position = *positions.entry(key).or_insert_with(|| {
                let mut foreign_key = ForeignKey::new(&row.name, primary_key_table, foreign_key_table);
                foreign_key.update_rule = row.update_rule;
                foreign_key.delete_rule = row.delete_rule;
                foreign_key.deferrability = row.deferrability;
                if definitions {
                    foreign_key.definition = row.definition.clone();
                }
                foreign_keys.push(foreign_key);
                foreign_keys.len() - 1
            });
            foreign_keys[position].add_column_reference(ColumnReference {
                key_sequence: row.key_sequence,
                primary_key_column: row.primary_key_column,
                foreign_key_column: row.column_name,
            });
        }

        for foreign_key in foreign_keys {
            let referenced = catalog.contains(ObjectKind::Table, foreign_key.primary_key_table());
            let referencing = catalog.contains(ObjectKind::Table, foreign_key.foreign_key_table());
            if !referenced || !referencing {
                debug!(foreign_key = %foreign_key.full_name(), "Skipping foreign key to a table outside the catalog");
                continue;
            }

            if !foreign_key.is_self_referencing() {
                if let Some(table) = catalog.table_mut(foreign_key.primary_key_table()) {
                    table.add_foreign_key(foreign_key.clone());
                }
            }
            if let Some(table) = catalog.table_mut(foreign_key.foreign_key_table()) {
                table.add_foreign_key(foreign_key);
            }
        }
        Ok(())
    }
}

fn with_table(
    catalog: &mut Catalog,
    schema: &SchemaReference,
    table_name: &str,
    what: &str,
    apply: impl FnOnce(&mut Table),
) {
    let key = schema.key().with(table_name);
    match catalog.table_mut(&key) {
        Some(table) => apply(table),
        None => debug!(table = %key, what, "Skipping row for unknown table"),
    }
}

fn grant(privileges: &mut Vec<Privilege>, parent: NamedObjectKey, row: &PrivilegeRow) {
    let position = match privileges.iter().position(|p| p.name() == row.privilege) {
        Some(position) => position,
        None => {
            privileges.push(Privilege::new(parent, &row.privilege));
            privileges.len() - 1
        }
    };
    privileges[position].add_grant(&row.grantor, &row.grantee, row.is_grantable);
}

fn build_data_type(catalog: &Catalog, mut data_type: ColumnDataType, row: &ColumnDataTypeRow) -> ColumnDataType {
    data_type.precision = row.precision;
    data_type.nullable = row.nullable;
    data_type.auto_incrementable = row.auto_incrementable;
    data_type.searchable = row.searchable;
    data_type.literal_prefix = row.literal_prefix.clone();
    data_type.literal_suffix = row.literal_suffix.clone();
    data_type.create_parameters = row.create_parameters.clone();
    data_type.remarks = row.remarks.clone();
    data_type.enum_values = row.enum_values.clone();
    data_type.base_type = row
        .base_type_code
        .and_then(|code| catalog.lookup_base_column_data_type_by_type(code))
        .map(|base| base.key());
    data_type
}

/// Key of the type called `type_name`: user-defined in `schema` first, then
/// system; unknown types are added to the system types
fn resolve_data_type(catalog: &mut Catalog, schema: &SchemaReference, type_name: &str, type_code: i32) -> NamedObjectKey {
    if let Some(data_type) = catalog.lookup_column_data_type(schema, type_name) {
        return data_type.key();
    }
    if let Some(data_type) = catalog.lookup_system_column_data_type(type_name) {
        return data_type.key();
    }

    debug!(type_name, type_code, "Adding column data type on demand");
    let data_type = ColumnDataType::system(type_name, type_code);
    let key = data_type.key();
    catalog.add_column_data_type(data_type);
    key
}

fn resolve_synonyms(catalog: &mut Catalog) {
    let resolved: Vec<Option<ObjectReference>> = catalog
        .synonyms()
        .iter()
        .map(|synonym| {
            let schema = &synonym.referenced_schema;
            let name = synonym.referenced_object_name.as_str();

            if let Some(table) = catalog.lookup_table(schema, name) {
                return Some(ObjectReference {
                    kind: ObjectKind::Table,
                    key: table.key(),
                });
            }
            if let Some(routine) = catalog.lookup_routine(schema, name) {
                return Some(ObjectReference {
                    kind: ObjectKind::Routine,
                    key: routine.key(),
                });
            }
            if let Some(sequence) = catalog.lookup_sequence(schema, name) {
                return Some(ObjectReference {
                    kind: ObjectKind::Sequence,
                    key: sequence.key(),
                });
            }
            catalog
                .lookup_synonym(schema, name)
                .filter(|target| target.key() != synonym.key())
                .map(|target| ObjectReference {
                    kind: ObjectKind::Synonym,
                    key: target.key(),
                })
        })
        .collect();

    for (synonym, reference) in catalog.synonyms_mut().zip(resolved) {
        if reference.is_none() {
            debug!(synonym = %synonym.full_name(), "Synonym target is not in the catalog");
        }
        synonym.referenced_object = reference;
    }
}
