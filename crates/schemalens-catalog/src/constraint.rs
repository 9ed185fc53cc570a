//! Table constraints and triggers

use serde::{Deserialize, Serialize};

use crate::named::{NamedObject, NamedObjectKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableConstraintType {
    #[default]
    Unknown,
    PrimaryKey,
    Unique,
    Check,
    ForeignKey,
}

/// A constraint declared on a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableConstraint {
    table: NamedObjectKey,
    name: String,
    pub constraint_type: TableConstraintType,
    pub columns: Vec<String>,
    pub definition: String,
    pub deferrable: bool,
    pub initially_deferred: bool,
}

impl TableConstraint {
    pub fn new(table: NamedObjectKey, name: impl Into<String>, constraint_type: TableConstraintType) -> Self {
        Self {
            table,
            name: name.into(),
            constraint_type,
            columns: Vec::new(),
            definition: String::new(),
            deferrable: false,
            initially_deferred: false,
        }
    }

    pub fn table(&self) -> &NamedObjectKey {
        &self.table
    }
}

impl NamedObject for TableConstraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.table.with(&self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventManipulationType {
    #[default]
    Unknown,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTiming {
    #[default]
    Unknown,
    Before,
    After,
    InsteadOf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOrientation {
    #[default]
    Unknown,
    Row,
    Statement,
}

/// A trigger on a table
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    table: NamedObjectKey,
    name: String,
    pub event_manipulation_type: EventManipulationType,
    pub condition_timing: ConditionTiming,
    pub action_orientation: ActionOrientation,
    pub action_order: i32,
    pub action_condition: String,
    pub action_statement: String,
}

impl Trigger {
    pub fn new(table: NamedObjectKey, name: impl Into<String>) -> Self {
        Self {
            table,
            name: name.into(),
            event_manipulation_type: EventManipulationType::default(),
            condition_timing: ConditionTiming::default(),
            action_orientation: ActionOrientation::default(),
            action_order: 0,
            action_condition: String::new(),
            action_statement: String::new(),
        }
    }

    pub fn table(&self) -> &NamedObjectKey {
        &self.table
    }
}

impl NamedObject for Trigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.table.with(&self.name)
    }
}
