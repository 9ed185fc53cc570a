//! Database, driver and crawl information

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::attributes::Attributes;
use crate::named::{NamedObject, NamedObjectKey};

/// Database product information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub product_version: String,

    #[serde(default)]
    pub user_name: String,

    /// Server parameters
    #[serde(default)]
    pub server_info: BTreeMap<String, String>,

    /// Additional database metadata properties
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl DatabaseInfo {
    pub fn summary(&self) -> String {
        format!("{} {}", self.product_name, self.product_version).trim().to_string()
    }
}

/// Connection driver information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverInfo {
    #[serde(default)]
    pub driver_name: String,

    #[serde(default)]
    pub driver_version: String,

    #[serde(default)]
    pub driver_class_name: String,

    #[serde(default)]
    pub connection_url: String,

    #[serde(default)]
    pub compliant: bool,

    /// Driver connection properties
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl DriverInfo {
    pub fn summary(&self) -> String {
        format!("{} {}", self.driver_name, self.driver_version).trim().to_string()
    }
}

/// When and how a catalog was crawled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlInfo {
    pub crawl_timestamp: DateTime<Utc>,
    pub crawler_version: String,
    pub database_info: String,
    pub driver_info: String,
    pub info_level: String,
}

/// A database user and their attributes
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseUser {
    name: String,
    pub attributes: Attributes,
}

impl DatabaseUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }
}

impl NamedObject for DatabaseUser {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        NamedObjectKey::new(vec![Some(self.name.clone())])
    }
}
