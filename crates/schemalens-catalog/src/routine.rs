//! Functions and procedures

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attributes::Attributes;
use crate::named::{DatabaseObject, NamedObject, NamedObjectKey};
use crate::schema::SchemaReference;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineType {
    #[default]
    Unknown,
    Procedure,
    Function,
}

impl fmt::Display for RoutineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Procedure => write!(f, "procedure"),
            Self::Function => write!(f, "function"),
        }
    }
}

/// What a routine returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineReturnType {
    #[default]
    Unknown,
    NoResult,
    ReturnsResult,
    ReturnsTable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineBodyType {
    #[default]
    Unknown,
    Sql,
    External,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterMode {
    #[default]
    Unknown,
    In,
    InOut,
    Out,
    Return,
    Result,
}

/// A parameter of a routine
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineParameter {
    routine: NamedObjectKey,
    name: String,
    pub ordinal_position: u32,
    pub mode: ParameterMode,
    pub column_data_type: NamedObjectKey,
    pub type_name: String,
    pub size: u64,
    pub decimal_digits: u32,
    pub nullable: bool,
    pub remarks: String,
}

impl RoutineParameter {
    pub fn new(routine: NamedObjectKey, name: impl Into<String>, column_data_type: NamedObjectKey) -> Self {
        Self {
            routine,
            name: name.into(),
            ordinal_position: 0,
            mode: ParameterMode::default(),
            column_data_type,
            type_name: String::new(),
            size: 0,
            decimal_digits: 0,
            nullable: true,
            remarks: String::new(),
        }
    }

    pub fn routine(&self) -> &NamedObjectKey {
        &self.routine
    }
}

impl NamedObject for RoutineParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.routine.with(&self.name)
    }
}

/// A function or procedure
///
/// Overloads share a name and differ by specific name, which is part of the key.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    schema: SchemaReference,
    name: String,
    specific_name: String,
    pub routine_type: RoutineType,
    pub return_type: RoutineReturnType,
    pub body_type: RoutineBodyType,
    pub definition: String,
    pub remarks: String,
    pub attributes: Attributes,
    pub(crate) parameters: Vec<RoutineParameter>,
}

impl Routine {
    /// A blank specific name defaults to the routine name
    pub fn new(
        schema: SchemaReference,
        name: impl Into<String>,
        specific_name: impl Into<String>,
        routine_type: RoutineType,
    ) -> Self {
        let name = name.into();
        let specific_name = specific_name.into();
        let specific_name = if specific_name.trim().is_empty() {
            name.clone()
        } else {
            specific_name
        };

        Self {
            schema,
            name,
            specific_name,
            routine_type,
            return_type: RoutineReturnType::default(),
            body_type: RoutineBodyType::default(),
            definition: String::new(),
            remarks: String::new(),
            attributes: Attributes::new(),
            parameters: Vec::new(),
        }
    }

    pub fn specific_name(&self) -> &str {
        &self.specific_name
    }

    /// Parameters in ordinal order
    pub fn parameters(&self) -> &[RoutineParameter] {
        &self.parameters
    }

    pub fn lookup_parameter(&self, name: &str) -> Option<&RoutineParameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub(crate) fn add_parameter(&mut self, parameter: RoutineParameter) {
        let position = self
            .parameters
            .partition_point(|p| p.ordinal_position <= parameter.ordinal_position);
        self.parameters.insert(position, parameter);
    }
}

impl NamedObject for Routine {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.schema.key().with(&self.name).with(&self.specific_name)
    }

    /// Overloads share a full name
    fn full_name(&self) -> String {
        self.schema.key().with(&self.name).to_string()
    }
}

impl DatabaseObject for Routine {
    fn schema(&self) -> &SchemaReference {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> SchemaReference {
        SchemaReference::new(Some("PUBLIC"), Some("BOOKS"))
    }

    #[test]
    fn specific_name_defaults_to_name() {
        let routine = Routine::new(books(), "NEW_PUBLISHER", "", RoutineType::Procedure);
        assert_eq!(routine.specific_name(), "NEW_PUBLISHER");
    }

    #[test]
    fn overloads_have_distinct_keys_and_shared_full_name() {
        let first = Routine::new(books(), "CUSTOMADD", "CUSTOMADD_10160", RoutineType::Function);
        let second = Routine::new(books(), "CUSTOMADD", "CUSTOMADD_10161", RoutineType::Function);

        assert_ne!(first.key(), second.key());
        assert_eq!(first.full_name(), "PUBLIC.BOOKS.CUSTOMADD");
        assert_eq!(first.full_name(), second.full_name());
    }

    #[test]
    fn parameters_in_order() {
        let mut routine = Routine::new(books(), "CUSTOMADD", "CUSTOMADD_10160", RoutineType::Function);
        let data_type = SchemaReference::system().key().with("INTEGER");

        let mut two = RoutineParameter::new(routine.key(), "TWO", data_type.clone());
        two.ordinal_position = 2;
        let mut one = RoutineParameter::new(routine.key(), "ONE", data_type);
        one.ordinal_position = 1;
        routine.add_parameter(two);
        routine.add_parameter(one);

        let names: Vec<&str> = routine.parameters().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["ONE", "TWO"]);
        assert!(routine.lookup_parameter("TWO").is_some());
    }

    #[test]
    fn routine_type_display() {
        assert_eq!(RoutineType::Function.to_string(), "function");
    }
}
