//! Schema references

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::named::{NamedObject, NamedObjectKey};

/// Identifies a schema by catalog name and schema name
///
/// Either part may be absent, depending on what the database supports. The
/// reference with both parts absent is the system schema, which holds the
/// database's built-in column data types.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
}

impl SchemaReference {
    /// Create a reference; blank names count as absent
    pub fn new(catalog_name: Option<&str>, schema_name: Option<&str>) -> Self {
        Self {
            catalog_name: non_blank(catalog_name),
            schema_name: non_blank(schema_name),
        }
    }

    /// The system schema
    pub fn system() -> Self {
        Self::default()
    }

    pub fn is_system(&self) -> bool {
        self.catalog_name.is_none() && self.schema_name.is_none()
    }

    /// Same reference with blank names normalized to absent
    pub(crate) fn normalized(&self) -> Self {
        Self::new(self.catalog_name.as_deref(), self.schema_name.as_deref())
    }
}

fn non_blank(name: Option<&str>) -> Option<String> {
    name.filter(|n| !n.trim().is_empty()).map(str::to_string)
}

impl NamedObject for SchemaReference {
    fn name(&self) -> &str {
        self.schema_name
            .as_deref()
            .or(self.catalog_name.as_deref())
            .unwrap_or("")
    }

    fn key(&self) -> NamedObjectKey {
        NamedObjectKey::new(vec![self.catalog_name.clone(), self.schema_name.clone()])
    }
}

impl fmt::Display for SchemaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
