//! Lint findings
//!
//! A finding ties a linter's message to the object it is about. Linter ids are
//! stable and part of the public API - never rename them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::kind::ObjectKind;

/// Finding severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or stylistic
    Low,

    /// Should be reviewed
    Medium,

    /// Likely to cause problems
    High,

    /// Blocking issue
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("Unknown severity: {}", other)),
        }
    }
}

/// A structural issue reported by a linter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Id of the linter that produced this finding
    pub linter_id: String,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Kind of the offending object
    pub object_kind: ObjectKind,

    /// Full name of the offending object
    pub object_name: String,

    /// Optional detail, e.g. the offending column names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Finding {
    /// Create a new finding without a value
    pub fn new(
        linter_id: impl Into<String>,
        severity: Severity,
        object_kind: ObjectKind,
        object_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            linter_id: linter_id.into(),
            severity,
            message: message.into(),
            object_kind,
            object_name: object_name.into(),
            value: None,
        }
    }

    /// Set the detail value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "[{}] {}: {}", self.object_name, self.message, value),
            None => write!(f, "[{}] {}", self.object_name, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn finding_display() {
        let finding = Finding::new(
            "table_cycles",
            Severity::High,
            ObjectKind::Catalog,
            "catalog",
            "cycles in table relationships",
        )
        .with_value("PUBLIC.FOR_LINT.PUBLICATIONS, PUBLIC.FOR_LINT.WRITERS");

        assert_eq!(
            finding.to_string(),
            "[catalog] cycles in table relationships: PUBLIC.FOR_LINT.PUBLICATIONS, PUBLIC.FOR_LINT.WRITERS"
        );
    }

    #[test]
    fn finding_serialization() {
        let finding = Finding::new(
            "table_with_no_primary_key",
            Severity::Medium,
            ObjectKind::Table,
            "PUBLIC.BOOKS.COUPONS",
            "no primary key",
        );

        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"severity\":\"medium\""));
        assert!(json.contains("\"object_kind\":\"table\""));
        assert!(!json.contains("value"));
    }
}
