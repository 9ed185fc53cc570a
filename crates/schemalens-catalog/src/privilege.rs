//! Privileges and grants on tables and columns

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::named::{NamedObject, NamedObjectKey};

/// One grant of a privilege
///
/// Grants order by grantor, then grantee.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub grantor: String,
    pub grantee: String,
    pub is_grantable: bool,
}

/// A named privilege (SELECT, INSERT, ...) on a table or column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privilege {
    parent: NamedObjectKey,
    name: String,
    grants: BTreeSet<Grant>,
}

impl Privilege {
    pub fn new(parent: NamedObjectKey, name: impl Into<String>) -> Self {
        Self {
            parent,
            name: name.into(),
            grants: BTreeSet::new(),
        }
    }

    /// Key of the table or column the privilege is on
    pub fn parent(&self) -> &NamedObjectKey {
        &self.parent
    }

    /// Record a grant; returns false for duplicates and for blank grantors or grantees
    pub fn add_grant(&mut self, grantor: &str, grantee: &str, is_grantable: bool) -> bool {
        if grantor.trim().is_empty() || grantee.trim().is_empty() {
            return false;
        }
        self.grants.insert(Grant {
            grantor: grantor.to_string(),
            grantee: grantee.to_string(),
            is_grantable,
        })
    }

    /// Unique grants, sorted by grantor and grantee
    pub fn grants(&self) -> impl Iterator<Item = &Grant> {
        self.grants.iter()
    }

    pub fn grant_count(&self) -> usize {
        self.grants.len()
    }
}

impl NamedObject for Privilege {
    fn name(&self) -> &str {
        &self.name
    }

    fn key(&self) -> NamedObjectKey {
        self.parent.with(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_on_authors() -> Privilege {
        let table = NamedObjectKey::new(vec![Some("PUBLIC".to_string()), Some("BOOKS".to_string())]).with("AUTHORS");
        Privilege::new(table, "SELECT")
    }

    #[test]
    fn duplicate_grants_are_merged() {
        let mut privilege = select_on_authors();
        assert!(privilege.add_grant("SA", "PUBLIC", false));
        assert!(!privilege.add_grant("SA", "PUBLIC", false));

        assert_eq!(privilege.grant_count(), 1);
    }

    #[test]
    fn grants_differing_in_grantability_are_distinct() {
        let mut privilege = select_on_authors();
        privilege.add_grant("SA", "PUBLIC", false);
        privilege.add_grant("SA", "PUBLIC", true);

        assert_eq!(privilege.grant_count(), 2);
    }

    #[test]
    fn grants_are_sorted() {
        let mut privilege = select_on_authors();
        privilege.add_grant("SYSTEM", "ALICE", false);
        privilege.add_grant("SA", "ZED", false);
        privilege.add_grant("SA", "BOB", true);

        let order: Vec<(&str, &str)> = privilege
            .grants()
            .map(|g| (g.grantor.as_str(), g.grantee.as_str()))
            .collect();
        assert_eq!(order, vec![("SA", "BOB"), ("SA", "ZED"), ("SYSTEM", "ALICE")]);
    }

    #[test]
    fn blank_grants_are_skipped() {
        let mut privilege = select_on_authors();
        assert!(!privilege.add_grant("", "PUBLIC", false));
        assert!(!privilege.add_grant("SA", " ", false));
        assert_eq!(privilege.grant_count(), 0);
    }

    #[test]
    fn full_name() {
        assert_eq!(select_on_authors().full_name(), "PUBLIC.BOOKS.AUTHORS.SELECT");
    }
}
