//! Test fixtures for catalog integration tests
//!
//! This module provides a metadata snapshot modelled on a small test database
//! with two schemas:
//! - `PUBLIC.BOOKS`: authors, books and publishers, with every optional
//!   category populated (constraints, triggers, privileges, routines...)
//! - `PUBLIC.FOR_LINT`: writers and publications referencing each other, plus
//!   a self-referencing writer column

use schemalens_catalog::{MetadataSnapshot, SchemaReference, SnapshotProvider};
use serde_json::{json, Value};

pub fn books() -> SchemaReference {
    SchemaReference::new(Some("PUBLIC"), Some("BOOKS"))
}

pub fn for_lint() -> SchemaReference {
    SchemaReference::new(Some("PUBLIC"), Some("FOR_LINT"))
}

fn column(table: &str, name: &str, position: u32, type_name: &str, type_code: i32, nullable: bool) -> Value {
    let size = if type_name == "VARCHAR" { 255 } else { 10 };
    json!({
        "table_name": table,
        "name": name,
        "ordinal_position": position,
        "type_name": type_name,
        "type_code": type_code,
        "size": size,
        "nullable": nullable
    })
}

fn foreign_key(name: &str, table: &str, column: &str, pk_table: &str, pk_column: &str) -> Value {
    json!({
        "name": name,
        "table_name": table,
        "column_name": column,
        "primary_key_table": pk_table,
        "primary_key_column": pk_column,
        "key_sequence": 1,
        "delete_rule": "cascade",
        "definition": format!("FOREIGN KEY ({}) REFERENCES {} ({})", column, pk_table, pk_column)
    })
}

fn index(table: &str, name: &str, column: &str, position: u32, unique: bool) -> Value {
    json!({
        "table_name": table,
        "index_name": name,
        "column_name": column,
        "ordinal_position": position,
        "unique": unique,
        "sort_sequence": "ascending"
    })
}

fn books_schema() -> Value {
    json!({
        "catalog_name": "PUBLIC",
        "schema_name": "BOOKS",
        "user_defined_column_data_types": [
            {"name": "NAME_TYPE", "type_code": 2001, "base_type_code": 12},
            {"name": "STATE_TYPE", "type_code": 2001, "base_type_code": 1},
            {"name": "TEXT_TYPE", "type_code": 2001, "base_type_code": -1}
        ],
        "tables": [
            {"name": "AUTHORS", "remarks": "Contact details for book authors"},
            {"name": "BOOKS"},
            {"name": "BOOKAUTHORS"},
            {"name": "PUBLISHERS"},
            {"name": "AUTHORSLIST", "table_type": "VIEW"}
        ],
        "columns": [
            column("AUTHORS", "ID", 1, "INTEGER", 4, false),
            column("AUTHORS", "LASTNAME", 3, "NAME_TYPE", 2001, false),
            column("AUTHORS", "FIRSTNAME", 2, "NAME_TYPE", 2001, false),
            column("AUTHORS", "CITY", 4, "VARCHAR", 12, true),
            column("AUTHORS", "STATE", 5, "STATE_TYPE", 2001, true),
            column("BOOKS", "ID", 1, "INTEGER", 4, false),
            column("BOOKS", "TITLE", 2, "VARCHAR", 12, false),
            column("BOOKS", "PUBLISHERID", 3, "INTEGER", 4, false),
            column("BOOKS", "COVER", 4, "BLOB", 2004, true),
            column("BOOKAUTHORS", "BOOKID", 1, "INTEGER", 4, false),
            column("BOOKAUTHORS", "AUTHORID", 2, "INTEGER", 4, false),
            column("PUBLISHERS", "ID", 1, "INTEGER", 4, false),
            column("PUBLISHERS", "PUBLISHER", 2, "VARCHAR", 12, true),
            column("AUTHORSLIST", "ID", 1, "INTEGER", 4, false),
            column("AUTHORSLIST", "FIRSTNAME", 2, "VARCHAR", 12, false),
            column("NO_SUCH_TABLE", "ID", 1, "INTEGER", 4, false)
        ],
        "primary_keys": [
            {"table_name": "AUTHORS", "name": "PK_AUTHORS", "column_name": "ID", "key_sequence": 1},
            {"table_name": "BOOKS", "name": "PK_BOOKS", "column_name": "ID", "key_sequence": 1},
            {"table_name": "PUBLISHERS", "name": "PK_PUBLISHERS", "column_name": "ID", "key_sequence": 1}
        ],
        "indexes": [
            index("AUTHORS", "SYS_IDX_PK_AUTHORS", "ID", 1, true),
            index("AUTHORS", "IDX_B_AUTHORS", "FIRSTNAME", 2, false),
            index("AUTHORS", "IDX_B_AUTHORS", "LASTNAME", 1, false),
            index("BOOKS", "SYS_IDX_PK_BOOKS", "ID", 1, true),
            index("BOOKAUTHORS", "UIDX_BOOKAUTHORS", "BOOKID", 1, true),
            index("BOOKAUTHORS", "UIDX_BOOKAUTHORS", "AUTHORID", 2, true),
            index("PUBLISHERS", "SYS_IDX_PK_PUBLISHERS", "ID", 1, true)
        ],
        "foreign_keys": [
            foreign_key("FK_Y_BOOK", "BOOKAUTHORS", "BOOKID", "BOOKS", "ID"),
            foreign_key("FZ_FK_AUTHOR", "BOOKAUTHORS", "AUTHORID", "AUTHORS", "ID"),
            foreign_key("FK_BOOKS_PUBLISHER", "BOOKS", "PUBLISHERID", "PUBLISHERS", "ID"),
            foreign_key("FK_BOOKS_ARCHIVE", "BOOKS", "ID", "ARCHIVED_BOOKS", "ID")
        ],
        "table_constraints": [
            {
                "table_name": "AUTHORS",
                "name": "CHECK_UPPERCASE_STATE",
                "constraint_type": "check",
                "column_name": "STATE",
                "definition": "CHECK (UPPER(STATE) = STATE)"
            }
        ],
        "triggers": [
            {
                "table_name": "AUTHORS",
                "name": "TRG_AUTHORS",
                "event_manipulation_type": "delete",
                "condition_timing": "after",
                "action_orientation": "row",
                "action_statement": "UPDATE PUBLISHERS SET PUBLISHER = 'Jacob' WHERE PUBLISHER = 'John'"
            }
        ],
        "views": [
            {
                "table_name": "AUTHORSLIST",
                "definition": "SELECT ID, FIRSTNAME FROM AUTHORS",
                "check_option": "cascaded"
            }
        ],
        "table_privileges": [
            {"table_name": "AUTHORS", "privilege": "SELECT", "grantor": "_SYSTEM", "grantee": "SA", "is_grantable": true},
            {"table_name": "AUTHORS", "privilege": "SELECT", "grantor": "_SYSTEM", "grantee": "SA", "is_grantable": true},
            {"table_name": "AUTHORS", "privilege": "SELECT", "grantor": "_SYSTEM", "grantee": "OTHERUSER", "is_grantable": false},
            {"table_name": "AUTHORS", "privilege": "INSERT", "grantor": "_SYSTEM", "grantee": "SA", "is_grantable": true}
        ],
        "column_privileges": [
            {"table_name": "AUTHORS", "column_name": "ID", "privilege": "REFERENCES", "grantor": "_SYSTEM", "grantee": "SA"}
        ],
        "table_attributes": [
            {"table_name": "AUTHORS", "name": "TABLE_STORAGE", "value": "memory"}
        ],
        "column_attributes": [
            {"table_name": "AUTHORS", "column_name": "CITY", "name": "COLLATION", "value": "SQL_TEXT"}
        ],
        "routines": [
            {"name": "NEW_PUBLISHER", "specific_name": "NEW_PUBLISHER_10160", "routine_type": "procedure", "return_type": "no_result"},
            {"name": "CUSTOMADD", "specific_name": "CUSTOMADD_10161", "routine_type": "function", "return_type": "returns_result"},
            {"name": "CUSTOMADD", "specific_name": "CUSTOMADD_10162", "routine_type": "function", "return_type": "returns_result"}
        ],
        "routine_parameters": [
            {"routine_name": "NEW_PUBLISHER", "specific_name": "NEW_PUBLISHER_10160", "name": "PUBLISHER", "ordinal_position": 1, "mode": "in", "type_name": "VARCHAR", "type_code": 12},
            {"routine_name": "NEW_PUBLISHER", "specific_name": "NEW_PUBLISHER_10160", "name": "PUBLISHER_ID", "ordinal_position": 2, "mode": "out", "type_name": "INTEGER", "type_code": 4},
            {"routine_name": "CUSTOMADD", "specific_name": "CUSTOMADD_10161", "name": "ONE", "ordinal_position": 1, "mode": "in", "type_name": "INTEGER", "type_code": 4},
            {"routine_name": "CUSTOMADD", "specific_name": "CUSTOMADD_10162", "name": "ONE", "ordinal_position": 1, "mode": "in", "type_name": "INTEGER", "type_code": 4},
            {"routine_name": "CUSTOMADD", "specific_name": "CUSTOMADD_10162", "name": "TWO", "ordinal_position": 2, "mode": "in", "type_name": "INTEGER", "type_code": 4}
        ],
        "routine_definitions": [
            {"name": "CUSTOMADD", "specific_name": "CUSTOMADD_10161", "definition": "RETURN ONE + 1"},
            {"name": "NEW_PUBLISHER", "definition": "INSERT INTO PUBLISHERS (PUBLISHER) VALUES (PUBLISHER)"}
        ],
        "sequences": [
            {"name": "PUBLISHER_ID_SEQ", "minimum_value": 0, "maximum_value": 2147483647}
        ],
        "synonyms": [
            {"name": "AUTHORS_SYN", "referenced_object_name": "AUTHORS"},
            {"name": "SEQ_SYN", "referenced_object_name": "PUBLISHER_ID_SEQ"},
            {"name": "DANGLING_SYN", "referenced_object_name": "NO_SUCH_OBJECT"}
        ]
    })
}

fn for_lint_schema() -> Value {
    json!({
        "catalog_name": "PUBLIC",
        "schema_name": "FOR_LINT",
        "tables": [
            {"name": "WRITERS"},
            {"name": "PUBLICATIONS"}
        ],
        "columns": [
            column("WRITERS", "ID", 1, "BIGINT", -5, false),
            column("WRITERS", "PUBLICATION_ID", 2, "INTEGER", 4, false),
            column("WRITERS", "REPLY_TO", 3, "BIGINT", -5, true),
            column("PUBLICATIONS", "ID", 1, "INTEGER", 4, false),
            column("PUBLICATIONS", "WRITERID", 2, "BIGINT", -5, false),
            column("PUBLICATIONS", "LOCATION", 3, "GEOMETRY", 1111, true)
        ],
        "primary_keys": [
            {"table_name": "WRITERS", "name": "PK_WRITERS", "column_name": "ID", "key_sequence": 1},
            {"table_name": "PUBLICATIONS", "name": "PK_PUBLICATIONS", "column_name": "ID", "key_sequence": 1}
        ],
        "foreign_keys": [
            foreign_key("FK_WRITERS_PUBLICATION", "WRITERS", "PUBLICATION_ID", "PUBLICATIONS", "ID"),
            foreign_key("FK_PUBLICATIONS_WRITER", "PUBLICATIONS", "WRITERID", "WRITERS", "ID"),
            foreign_key("FK_WRITERS_REPLY_TO", "WRITERS", "REPLY_TO", "WRITERS", "ID"),
            {
                "name": "FK_WRITERS_BOOK_AUTHOR",
                "table_name": "WRITERS",
                "column_name": "ID",
                "primary_key_schema": {"catalog_name": "PUBLIC", "schema_name": "BOOKS"},
                "primary_key_table": "AUTHORS",
                "primary_key_column": "ID",
                "key_sequence": 1
            }
        ]
    })
}

/// The complete snapshot
pub fn snapshot() -> MetadataSnapshot {
    let value = json!({
        "database_info": {
            "product_name": "HSQL Database Engine",
            "product_version": "2.7.1",
            "user_name": "SA"
        },
        "server_info": {"DATABASE_VERSION": "2.7.1"},
        "database_properties": {"supportsTransactions": true},
        "driver_info": {
            "driver_name": "HSQL Database Engine Driver",
            "driver_version": "2.7.1",
            "connection_url": "jdbc:hsqldb:hsql://localhost/schemacrawler"
        },
        "driver_properties": {"get_column_name": "true"},
        "database_users": [
            {"name": "SA", "attributes": {"ADMIN": true}},
            {"name": "OTHERUSER"}
        ],
        "system_column_data_types": [
            {"name": "CHARACTER", "type_code": 1},
            {"name": "INTEGER", "type_code": 4, "precision": 32, "auto_incrementable": true},
            {"name": "BIGINT", "type_code": -5, "precision": 64},
            {"name": "VARCHAR", "type_code": 12, "create_parameters": "LENGTH"},
            {"name": "LONGVARCHAR", "type_code": -1},
            {"name": "CHARACTER VARYING", "type_code": -1},
            {"name": "BLOB", "type_code": 2004}
        ],
        "schemas": [books_schema(), for_lint_schema()]
    });

    serde_json::from_value(value).expect("fixture snapshot is valid")
}

pub fn provider() -> SnapshotProvider {
    SnapshotProvider::new(snapshot())
}
