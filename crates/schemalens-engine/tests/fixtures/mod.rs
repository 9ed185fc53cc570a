//! Test fixtures for engine integration tests
//!
//! Two snapshots:
//! - [`snapshot`]: `PUBLIC.BOOKS` and `PUBLIC.FOR_LINT`, shaped so that every
//!   linter has something to report
//! - [`chain_snapshot`]: a single schema whose tables reference each other
//!   along a given list of edges

#![allow(dead_code)]

use schemalens_catalog::{Catalog, Crawler, MetadataSnapshot, SchemaReference, SnapshotProvider};
use schemalens_core::SchemaInfoLevel;
use serde_json::{json, Value};

pub fn books() -> SchemaReference {
    SchemaReference::new(Some("PUBLIC"), Some("BOOKS"))
}

pub fn for_lint() -> SchemaReference {
    SchemaReference::new(Some("PUBLIC"), Some("FOR_LINT"))
}

fn column(table: &str, name: &str, position: u32, type_name: &str, type_code: i32, nullable: bool) -> Value {
    json!({
        "table_name": table,
        "name": name,
        "ordinal_position": position,
        "type_name": type_name,
        "type_code": type_code,
        "nullable": nullable
    })
}

fn column_with_default(table: &str, name: &str, position: u32, default_value: &str) -> Value {
    json!({
        "table_name": table,
        "name": name,
        "ordinal_position": position,
        "type_name": "VARCHAR",
        "type_code": 12,
        "nullable": true,
        "default_value": default_value
    })
}

fn primary_key(table: &str, column: &str) -> Value {
    json!({"table_name": table, "name": format!("PK_{}", table), "column_name": column, "key_sequence": 1})
}

fn index(table: &str, name: &str, column: &str, position: u32, unique: bool) -> Value {
    json!({
        "table_name": table,
        "index_name": name,
        "column_name": column,
        "ordinal_position": position,
        "unique": unique
    })
}

fn foreign_key(name: &str, table: &str, column: &str, pk_table: &str, pk_column: &str) -> Value {
    json!({
        "name": name,
        "table_name": table,
        "column_name": column,
        "primary_key_table": pk_table,
        "primary_key_column": pk_column,
        "key_sequence": 1
    })
}

fn books_schema() -> Value {
    json!({
        "catalog_name": "PUBLIC",
        "schema_name": "BOOKS",
        "tables": [
            {"name": "AUTHORS"},
            {"name": "BOOKS"},
            {"name": "BOOKAUTHORS"},
            {"name": "PUBLISHERS"},
            {"name": "COUPONS"},
            {"name": "AUTHORSLIST", "table_type": "VIEW"}
        ],
        "columns": [
            column("AUTHORS", "ID", 1, "INTEGER", 4, false),
            column("AUTHORS", "FIRSTNAME", 2, "VARCHAR", 12, false),
            column("AUTHORS", "LASTNAME", 3, "VARCHAR", 12, false),
            column_with_default("AUTHORS", "ADDRESS", 4, "NULL"),
            column("BOOKS", "ID", 1, "INTEGER", 4, false),
            column("BOOKS", "TITLE", 2, "VARCHAR", 12, false),
            column("BOOKS", "PUBLISHERID", 3, "INTEGER", 4, false),
            column("BOOKAUTHORS", "BOOKID", 1, "INTEGER", 4, false),
            column("BOOKAUTHORS", "AUTHORID", 2, "INTEGER", 4, false),
            column("PUBLISHERS", "ID", 1, "INTEGER", 4, false),
            column("PUBLISHERS", "PUBLISHER", 2, "VARCHAR", 12, true),
            column("COUPONS", "ID", 1, "INTEGER", 4, false),
            column("AUTHORSLIST", "ID", 1, "INTEGER", 4, false),
            column("AUTHORSLIST", "LASTNAME", 2, "VARCHAR", 12, false)
        ],
        "primary_keys": [
            primary_key("AUTHORS", "ID"),
            primary_key("BOOKS", "ID"),
            primary_key("PUBLISHERS", "ID")
        ],
        "indexes": [
            index("AUTHORS", "SYS_IDX_PK_AUTHORS", "ID", 1, true),
            index("AUTHORS", "IDX_B_AUTHORS", "LASTNAME", 1, false),
            index("AUTHORS", "IDX_B_AUTHORS", "FIRSTNAME", 2, false),
            index("AUTHORS", "IDX_A_AUTHORS", "LASTNAME", 1, false),
            index("BOOKS", "SYS_IDX_PK_BOOKS", "ID", 1, true),
            index("BOOKAUTHORS", "UIDX_BOOKAUTHORS", "BOOKID", 1, true),
            index("BOOKAUTHORS", "UIDX_BOOKAUTHORS", "AUTHORID", 2, true),
            index("PUBLISHERS", "SYS_IDX_PK_PUBLISHERS", "ID", 1, true),
            index("PUBLISHERS", "UIDX_PUBLISHER", "PUBLISHER", 1, true)
        ],
        "foreign_keys": [
            foreign_key("FK_Y_BOOK", "BOOKAUTHORS", "BOOKID", "BOOKS", "ID"),
            foreign_key("FZ_FK_AUTHOR", "BOOKAUTHORS", "AUTHORID", "AUTHORS", "ID"),
            foreign_key("FK_BOOKS_PUBLISHER", "BOOKS", "PUBLISHERID", "PUBLISHERS", "ID")
        ],
        "triggers": [
            {
                "table_name": "BOOKS",
                "name": "TRG_BOOKS",
                "action_statement": "UPDATE COUPONS SET ID = 0"
            }
        ],
        "views": [
            {"table_name": "AUTHORSLIST", "definition": "SELECT ID, LASTNAME FROM AUTHORS"}
        ],
        "routines": [
            {"name": "NEW_PUBLISHER", "specific_name": "NEW_PUBLISHER_10160", "routine_type": "procedure"},
            {"name": "CUSTOMADD", "specific_name": "CUSTOMADD_10161", "routine_type": "function"},
            {"name": "CUSTOMADD", "specific_name": "CUSTOMADD_10162", "routine_type": "function"}
        ],
        "routine_parameters": [
            {"routine_name": "NEW_PUBLISHER", "specific_name": "NEW_PUBLISHER_10160", "name": "PUBLISHER", "ordinal_position": 1, "mode": "in", "type_name": "VARCHAR", "type_code": 12},
            {"routine_name": "CUSTOMADD", "specific_name": "CUSTOMADD_10161", "name": "ONE", "ordinal_position": 1, "mode": "in", "type_name": "INTEGER", "type_code": 4},
            {"routine_name": "CUSTOMADD", "specific_name": "CUSTOMADD_10162", "name": "ONE", "ordinal_position": 1, "mode": "in", "type_name": "INTEGER", "type_code": 4},
            {"routine_name": "CUSTOMADD", "specific_name": "CUSTOMADD_10162", "name": "TWO", "ordinal_position": 2, "mode": "in", "type_name": "INTEGER", "type_code": 4}
        ],
        "sequences": [
            {"name": "PUBLISHER_ID_SEQ"},
            {"name": "COUPON_ID_SEQ"}
        ],
        "synonyms": [
            {"name": "AUTHORS_SYN", "referenced_object_name": "AUTHORS"},
            {"name": "COUPONS_SYN", "referenced_object_name": "COUPONS"}
        ]
    })
}

fn for_lint_schema() -> Value {
    json!({
        "catalog_name": "PUBLIC",
        "schema_name": "FOR_LINT",
        "tables": [
            {"name": "WRITERS"},
            {"name": "PUBLICATIONS"},
            {"name": "PUBLICATIONWRITERS"},
            {"name": "PUBLICATIONVIEWS", "table_type": "VIEW"},
            {"name": "EXTRA_PK"},
            {"name": "Global Counts"}
        ],
        "columns": [
            column("WRITERS", "ID", 1, "BIGINT", -5, false),
            column("WRITERS", "FIRSTNAME", 2, "VARCHAR", 12, false),
            column("WRITERS", "LASTNAME", 3, "VARCHAR", 12, false),
            column("WRITERS", "PUBLICATION_ID", 4, "INTEGER", 4, false),
            column("WRITERS", "REPLY_TO", 5, "BIGINT", -5, true),
            column("PUBLICATIONS", "ID", 1, "INTEGER", 4, false),
            column("PUBLICATIONS", "TITLE", 2, "VARCHAR", 12, false),
            column("PUBLICATIONS", "WRITERID", 3, "BIGINT", -5, false),
            column("PUBLICATIONWRITERS", "PUBLICATIONID", 1, "INTEGER", 4, false),
            column("PUBLICATIONWRITERS", "WRITERID", 2, "BIGINT", -5, false),
            column("PUBLICATIONVIEWS", "ID", 1, "INTEGER", 4, false),
            column("PUBLICATIONVIEWS", "TITLE", 2, "VARCHAR", 12, false),
            column("EXTRA_PK", "WRITERID", 1, "BIGINT", -5, false),
            column("EXTRA_PK", "PUBLICATIONID", 2, "INTEGER", 4, false),
            column("EXTRA_PK", "ID", 3, "INTEGER", 4, false),
            column_with_default("Global Counts", "Global Count", 1, " null ")
        ],
        "primary_keys": [
            primary_key("WRITERS", "ID"),
            primary_key("PUBLICATIONS", "ID"),
            primary_key("EXTRA_PK", "ID")
        ],
        "indexes": [
            index("WRITERS", "SYS_IDX_PK_WRITERS", "ID", 1, true),
            index("PUBLICATIONS", "SYS_IDX_PK_PUBLICATIONS", "ID", 1, true),
            index("EXTRA_PK", "SYS_IDX_PK_EXTRA_PK", "ID", 1, true)
        ],
        "foreign_keys": [
            foreign_key("FK_WRITERS_PUBLICATION", "WRITERS", "PUBLICATION_ID", "PUBLICATIONS", "ID"),
            foreign_key("FK_WRITERS_REPLY_TO", "WRITERS", "REPLY_TO", "WRITERS", "ID"),
            foreign_key("FK_PUBLICATIONS_WRITER", "PUBLICATIONS", "WRITERID", "WRITERS", "ID"),
            foreign_key("FK_PW_PUBLICATION", "PUBLICATIONWRITERS", "PUBLICATIONID", "PUBLICATIONS", "ID"),
            foreign_key("FK_PW_WRITER", "PUBLICATIONWRITERS", "WRITERID", "WRITERS", "ID"),
            foreign_key("FK_EXTRA_PK_WRITER", "EXTRA_PK", "WRITERID", "WRITERS", "ID"),
            foreign_key("FK_EXTRA_PK_PUBLICATION", "EXTRA_PK", "PUBLICATIONID", "PUBLICATIONS", "ID"),
            {
                "name": "FK_WRITERS_AUTHOR",
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

fn system_column_data_types() -> Value {
    json!([
        {"name": "INTEGER", "type_code": 4},
        {"name": "BIGINT", "type_code": -5},
        {"name": "VARCHAR", "type_code": 12}
    ])
}

pub fn snapshot() -> MetadataSnapshot {
    let value = json!({
        "database_info": {"product_name": "HSQL Database Engine", "product_version": "2.7.1"},
        "system_column_data_types": system_column_data_types(),
        "schemas": [books_schema(), for_lint_schema()]
    });

    serde_json::from_value(value).expect("fixture snapshot is valid")
}

pub fn provider() -> SnapshotProvider {
    SnapshotProvider::new(snapshot())
}

/// Crawl the books and lint snapshot
pub fn catalog(level: SchemaInfoLevel) -> Catalog {
    Crawler::new(&provider(), level).crawl().expect("fixture crawl succeeds")
}

/// A schema `PUBLIC.CHAIN` with one table per name and one foreign key per
/// `(referencing, referenced)` edge
pub fn chain_snapshot(tables: &[&str], edges: &[(&str, &str)]) -> MetadataSnapshot {
    let table_rows: Vec<Value> = tables.iter().map(|name| json!({"name": name})).collect();
    let columns: Vec<Value> = tables
        .iter()
        .flat_map(|name| {
            [
                column(name, "ID", 1, "INTEGER", 4, false),
                column(name, "PARENT_ID", 2, "INTEGER", 4, true),
            ]
        })
        .collect();
    let foreign_keys: Vec<Value> = edges
        .iter()
        .map(|(child, parent)| foreign_key(&format!("FK_{}_{}", child, parent), child, "PARENT_ID", parent, "ID"))
        .collect();

    let value = json!({
        "system_column_data_types": system_column_data_types(),
        "schemas": [{
            "catalog_name": "PUBLIC",
            "schema_name": "CHAIN",
            "tables": table_rows,
            "columns": columns,
            "foreign_keys": foreign_keys
        }]
    });

    serde_json::from_value(value).expect("chain snapshot is valid")
}

pub fn chain_catalog(tables: &[&str], edges: &[(&str, &str)]) -> Catalog {
    let provider = SnapshotProvider::new(chain_snapshot(tables, edges));
    Crawler::new(&provider, SchemaInfoLevel::standard())
        .crawl()
        .expect("chain crawl succeeds")
}
