//! Sequences and synonyms

use schemalens_core::ObjectKind;

use crate::named::{DatabaseObject, NamedObject, NamedObjectKey};
use crate::schema::SchemaReference;

/// A number sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    schema: SchemaReference,
    name: String,
    pub increment: i64,
    pub minimum_value: Option<i64>,
    pub maximum_value: Option<i64>,
    pub cycle: bool,
    pub remarks: String,
}

impl Sequence {
    pub fn new(schema: SchemaReference, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
            increment: 1,
            minimum_value: None,
            maximum_value: None,
            cycle: false,
            remarks: String::new(),
        }
    }
}

impl NamedObject for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.schema.key().with(&self.name)
    }
}

impl DatabaseObject for Sequence {
    fn schema(&self) -> &SchemaReference {
        &self.schema
    }
}

/// A resolved reference to another catalog object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    pub kind: ObjectKind,
    pub key: NamedObjectKey,
}

/// An alias for a table, routine, sequence or another synonym
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synonym {
    schema: SchemaReference,
    name: String,

    /// Schema of the referenced object
    pub referenced_schema: SchemaReference,

    /// Name of the referenced object as reported by the database
    pub referenced_object_name: String,

    /// The referenced object, when it is part of the catalog
    pub referenced_object: Option<ObjectReference>,

    pub remarks: String,
}

impl Synonym {
    pub fn new(
        schema: SchemaReference,
        name: impl Into<String>,
        referenced_schema: SchemaReference,
        referenced_object_name: impl Into<String>,
    ) -> Self {
        Self {
            schema,
            name: name.into(),
            referenced_schema,
            referenced_object_name: referenced_object_name.into(),
            referenced_object: None,
            remarks: String::new(),
        }
    }

    /// Full name of the referenced object, resolved or not
    pub fn referenced_full_name(&self) -> String {
        match &self.referenced_object {
            Some(reference) => reference.key.to_string(),
            None => self.referenced_schema.key().with(&self.referenced_object_name).to_string(),
        }
    }
}

impl NamedObject for Synonym {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.schema.key().with(&self.name)
    }
}

impl DatabaseObject for Synonym {
    fn schema(&self) -> &SchemaReference {
        &self.schema
    }
}
