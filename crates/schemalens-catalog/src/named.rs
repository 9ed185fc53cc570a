//! Named objects and ordered, key-indexed containers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::schema::SchemaReference;

/// Compound identity used for every catalog lookup
///
/// The parts are the names along the containment path, e.g. catalog, schema,
/// table, column. Catalog and schema parts may be absent depending on what the
/// database supports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedObjectKey(Vec<Option<String>>);

impl NamedObjectKey {
    pub fn new(parts: Vec<Option<String>>) -> Self {
        Self(parts)
    }

    /// Extend the key with one more name
    pub fn with(&self, part: impl Into<String>) -> Self {
        let mut parts = self.0.clone();
        parts.push(Some(part.into()));
        Self(parts)
    }

    pub fn parts(&self) -> &[Option<String>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this key extends `prefix`
    pub fn starts_with(&self, prefix: &NamedObjectKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The key without its last part
    pub fn parent(&self) -> Option<NamedObjectKey> {
        self.0.split_last().map(|(_, rest)| Self(rest.to_vec()))
    }
}

impl fmt::Display for NamedObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self
            .0
            .iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        write!(f, "{}", parts.join("."))
    }
}

/// An object with a name and a compound key
pub trait NamedObject {
    /// Local name
    fn name(&self) -> &str;

    /// Lookup key, unique per object kind within a catalog
    fn key(&self) -> NamedObjectKey;

    /// Dotted full name, e.g. `PUBLIC.BOOKS.AUTHORS`
    fn full_name(&self) -> String {
        self.key().to_string()
    }
}

/// An object that belongs to exactly one schema
pub trait DatabaseObject: NamedObject {
    fn schema(&self) -> &SchemaReference;
}

/// Ordered collection of named objects with key lookup
///
/// Insertion order is preserved. Duplicate keys are stored, but key lookup
/// returns the first object added under a key.
#[derive(Debug, Clone)]
pub struct NamedObjectList<T> {
    items: Vec<T>,
    index: HashMap<NamedObjectKey, usize>,
}

impl<T> Default for NamedObjectList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: NamedObject> NamedObjectList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object
    pub fn add(&mut self, item: T) {
        let position = self.items.len();
        self.index.entry(item.key()).or_insert(position);
        self.items.push(item);
    }

    /// Exact key lookup
    pub fn lookup_key(&self, key: &NamedObjectKey) -> Option<&T> {
        self.index.get(key).map(|&position| &self.items[position])
    }

    pub(crate) fn lookup_key_mut(&mut self, key: &NamedObjectKey) -> Option<&mut T> {
        let position = *self.index.get(key)?;
        self.items.get_mut(position)
    }

    pub fn contains_key(&self, key: &NamedObjectKey) -> bool {
        self.index.contains_key(key)
    }

    /// Objects in insertion order
    pub fn values(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keep only the objects matching the predicate; returns how many were removed
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| keep(item));
        self.reindex();
        before - self.items.len()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, item) in self.items.iter().enumerate() {
            self.index.entry(item.key()).or_insert(position);
        }
    }
}

impl<T: DatabaseObject> NamedObjectList<T> {
    /// First object in `schema` called `name`; a blank name never matches
    pub fn lookup(&self, schema: &SchemaReference, name: &str) -> Option<&T> {
        if name.trim().is_empty() {
            return None;
        }
        self.items
            .iter()
            .find(|item| item.schema() == schema && item.name() == name)
    }

    /// Objects belonging to `schema`, in insertion order
    pub fn in_schema<'a>(&'a self, schema: &'a SchemaReference) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter(move |item| item.schema() == schema)
    }
}

impl<'a, T> IntoIterator for &'a NamedObjectList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        schema: SchemaReference,
        name: String,
        tag: u32,
    }

    impl NamedObject for Item {
        fn name(&self) -> &str {
            &self.name
        }

        fn key(&self) -> NamedObjectKey {
            self.schema.key().with(&self.name)
        }
    }

    impl DatabaseObject for Item {
        fn schema(&self) -> &SchemaReference {
            &self.schema
        }
    }

    fn item(schema: &SchemaReference, name: &str, tag: u32) -> Item {
        Item {
            schema: schema.clone(),
            name: name.to_string(),
            tag,
        }
    }

    #[test]
    fn key_display_skips_missing_parts() {
        let key = NamedObjectKey::new(vec![None, Some("BOOKS".to_string())]).with("AUTHORS");
        assert_eq!(key.to_string(), "BOOKS.AUTHORS");
        assert_eq!(key.len(), 3);
        assert_eq!(key.parent().unwrap().to_string(), "BOOKS");
    }

    #[test]
    fn key_prefix() {
        let schema = SchemaReference::new(Some("PUBLIC"), Some("BOOKS"));
        let table = schema.key().with("AUTHORS");
        assert!(table.starts_with(&schema.key()));
        assert!(!schema.key().starts_with(&table));
    }

    #[test]
    fn insertion_order_and_lookup() {
        let books = SchemaReference::new(Some("PUBLIC"), Some("BOOKS"));
        let mut list = NamedObjectList::new();
        list.add(item(&books, "B", 1));
        list.add(item(&books, "A", 2));

        let names: Vec<&str> = list.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(list.lookup(&books, "A").map(|i| i.tag), Some(2));
        assert_eq!(list.lookup_key(&books.key().with("B")).map(|i| i.tag), Some(1));
    }

    #[test]
    fn missing_and_blank_names() {
        let books = SchemaReference::new(Some("PUBLIC"), Some("BOOKS"));
        let other = SchemaReference::new(Some("PUBLIC"), Some("FOR_LINT"));
        let mut list = NamedObjectList::new();
        list.add(item(&books, "A", 1));

        assert!(list.lookup(&books, "").is_none());
        assert!(list.lookup(&books, "   ").is_none());
        assert!(list.lookup(&other, "A").is_none());
        assert!(list.lookup(&books, "Z").is_none());
    }

    #[test]
    fn duplicate_keys_resolve_to_first() {
        let books = SchemaReference::new(Some("PUBLIC"), Some("BOOKS"));
        let mut list = NamedObjectList::new();
        list.add(item(&books, "A", 1));
        list.add(item(&books, "A", 2));

        assert_eq!(list.len(), 2);
        assert_eq!(list.lookup_key(&books.key().with("A")).map(|i| i.tag), Some(1));
        assert_eq!(list.lookup(&books, "A").map(|i| i.tag), Some(1));
    }

    #[test]
    fn retain_rebuilds_index() {
        let books = SchemaReference::new(Some("PUBLIC"), Some("BOOKS"));
        let mut list = NamedObjectList::new();
        list.add(item(&books, "A", 1));
        list.add(item(&books, "B", 2));

        let removed = list.retain(|i| i.name != "A");
        assert_eq!(removed, 1);
        assert!(list.lookup_key(&books.key().with("A")).is_none());
        assert_eq!(list.lookup_key(&books.key().with("B")).map(|i| i.tag), Some(2));
    }
}
