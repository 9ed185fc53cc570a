//! Database catalog model
//!
//! This crate holds the in-memory model of a database's structure: schemas,
//! tables with their columns, keys, indexes, constraints, triggers and
//! privileges, plus routines, sequences, synonyms, column data types and users.
//!
//! A [`Catalog`] is built by the [`Crawler`] from any [`MetadataProvider`] and
//! can then be narrowed in place with [`Catalog::reduce`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemalens_catalog::{Crawler, SnapshotProvider};
//! use schemalens_core::SchemaInfoLevel;
//!
//! let provider = SnapshotProvider::from_file("snapshot.json")?;
//! let catalog = Crawler::new(&provider, SchemaInfoLevel::standard()).crawl()?;
//! for table in catalog.tables() {
//!     println!("{}", table.full_name());
//! }
//! ```

pub mod attributes;
pub mod catalog;
pub mod column;
pub mod constraint;
pub mod crawler;
pub mod data_type;
pub mod error;
pub mod foreign_key;
pub mod index;
pub mod info;
pub mod named;
pub mod privilege;
pub mod provider;
pub mod routine;
pub mod schema;
pub mod sequence;
pub mod snapshot;
pub mod table;

pub use attributes::Attributes;
pub use catalog::{Catalog, Reducer};
pub use column::Column;
pub use constraint::{
    ActionOrientation, ConditionTiming, EventManipulationType, TableConstraint, TableConstraintType, Trigger,
};
pub use crawler::Crawler;
pub use data_type::ColumnDataType;
pub use error::{CatalogError, CatalogResult, CrawlError};
pub use foreign_key::{ColumnReference, Deferrability, ForeignKey, ForeignKeyRule};
pub use index::{Index, IndexColumn, PrimaryKey, SortSequence};
pub use info::{CrawlInfo, DatabaseInfo, DatabaseUser, DriverInfo};
pub use named::{DatabaseObject, NamedObject, NamedObjectKey, NamedObjectList};
pub use privilege::{Grant, Privilege};
pub use provider::{MetadataProvider, ProviderError};
pub use routine::{ParameterMode, Routine, RoutineBodyType, RoutineParameter, RoutineReturnType, RoutineType};
pub use schema::SchemaReference;
pub use sequence::{ObjectReference, Sequence, Synonym};
pub use snapshot::{MetadataSnapshot, SchemaSnapshot, SnapshotProvider, SnapshotProviderBuilder};
pub use table::{CheckOption, Table, ViewDetails};
