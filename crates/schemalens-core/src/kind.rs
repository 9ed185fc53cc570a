//! Kinds of catalog objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every kind of object the catalog model holds
///
/// Used to select a reducer and to tag the object a finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Catalog,
    Schema,
    Table,
    Column,
    Index,
    PrimaryKey,
    ForeignKey,
    TableConstraint,
    Trigger,
    Privilege,
    Routine,
    RoutineParameter,
    Sequence,
    Synonym,
    ColumnDataType,
    DatabaseUser,
}

impl ObjectKind {
    /// Kinds that can be filtered out of a catalog, in reduction order
    pub const REDUCIBLE: [ObjectKind; 5] = [
        ObjectKind::Schema,
        ObjectKind::Table,
        ObjectKind::Routine,
        ObjectKind::Sequence,
        ObjectKind::Synonym,
    ];

    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Schema => "schema",
            Self::Table => "table",
            Self::Column => "column",
            Self::Index => "index",
            Self::PrimaryKey => "primary_key",
            Self::ForeignKey => "foreign_key",
            Self::TableConstraint => "table_constraint",
            Self::Trigger => "trigger",
            Self::Privilege => "privilege",
            Self::Routine => "routine",
            Self::RoutineParameter => "routine_parameter",
            Self::Sequence => "sequence",
            Self::Synonym => "synonym",
            Self::ColumnDataType => "column_data_type",
            Self::DatabaseUser => "database_user",
        }
    }

    /// Whether a reducer can remove objects of this kind
    pub fn is_reducible(&self) -> bool {
        Self::REDUCIBLE.contains(self)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when parsing an unknown object kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown object kind: {0}")]
pub struct UnknownObjectKind(pub String);

impl FromStr for ObjectKind {
    type Err = UnknownObjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [ObjectKind; 16] = [
            ObjectKind::Catalog,
            ObjectKind::Schema,
            ObjectKind::Table,
            ObjectKind::Column,
            ObjectKind::Index,
            ObjectKind::PrimaryKey,
            ObjectKind::ForeignKey,
            ObjectKind::TableConstraint,
            ObjectKind::Trigger,
            ObjectKind::Privilege,
            ObjectKind::Routine,
            ObjectKind::RoutineParameter,
            ObjectKind::Sequence,
            ObjectKind::Synonym,
            ObjectKind::ColumnDataType,
            ObjectKind::DatabaseUser,
        ];

        ALL.iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownObjectKind(s.to_string()))
    }
}
