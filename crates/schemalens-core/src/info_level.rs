//! Schema info levels
//!
//! An info level is a named bitmask of retrieval flags. The crawler consults it
//! before every population step; a category whose flag is off is left empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single retrieval flag
///
/// The discriminant is the bit position in [`SchemaInfoLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaInfoRetrieval {
    RetrieveDatabaseInfo,
    RetrieveAdditionalDatabaseInfo,
    RetrieveServerInfo,
    RetrieveAdditionalDriverInfo,
    RetrieveDatabaseUsers,
    RetrieveColumnDataTypes,
    RetrieveUserDefinedColumnDataTypes,
    RetrieveTables,
    RetrieveTableColumns,
    RetrieveAdditionalTableAttributes,
    RetrieveAdditionalColumnAttributes,
    RetrieveTableDefinitionsInformation,
    RetrieveViewInformation,
    RetrieveIndexes,
    RetrieveIndexInformation,
    RetrievePrimaryKeyDefinitions,
    RetrieveForeignKeys,
    RetrieveForeignKeyDefinitions,
    RetrieveTableConstraintInformation,
    RetrieveTableConstraintDefinitions,
    RetrieveTriggerInformation,
    RetrieveTablePrivileges,
    RetrieveTableColumnPrivileges,
    RetrieveRoutines,
    RetrieveRoutineParameters,
    RetrieveRoutineInformation,
    RetrieveSequenceInformation,
    RetrieveSynonymInformation,
}

use SchemaInfoRetrieval::*;

impl SchemaInfoRetrieval {
    /// Every flag, in bit order
    pub const ALL: [SchemaInfoRetrieval; 28] = [
        RetrieveDatabaseInfo,
        RetrieveAdditionalDatabaseInfo,
        RetrieveServerInfo,
        RetrieveAdditionalDriverInfo,
        RetrieveDatabaseUsers,
        RetrieveColumnDataTypes,
        RetrieveUserDefinedColumnDataTypes,
        RetrieveTables,
        RetrieveTableColumns,
        RetrieveAdditionalTableAttributes,
        RetrieveAdditionalColumnAttributes,
        RetrieveTableDefinitionsInformation,
        RetrieveViewInformation,
        RetrieveIndexes,
        RetrieveIndexInformation,
        RetrievePrimaryKeyDefinitions,
        RetrieveForeignKeys,
        RetrieveForeignKeyDefinitions,
        RetrieveTableConstraintInformation,
        RetrieveTableConstraintDefinitions,
        RetrieveTriggerInformation,
        RetrieveTablePrivileges,
        RetrieveTableColumnPrivileges,
        RetrieveRoutines,
        RetrieveRoutineParameters,
        RetrieveRoutineInformation,
        RetrieveSequenceInformation,
        RetrieveSynonymInformation,
    ];

    /// The flag's configuration name, e.g. `retrieveIndexes`
    pub fn name(&self) -> &'static str {
        match self {
            RetrieveDatabaseInfo => "retrieveDatabaseInfo",
            RetrieveAdditionalDatabaseInfo => "retrieveAdditionalDatabaseInfo",
            RetrieveServerInfo => "retrieveServerInfo",
            RetrieveAdditionalDriverInfo => "retrieveAdditionalDriverInfo",
            RetrieveDatabaseUsers => "retrieveDatabaseUsers",
            RetrieveColumnDataTypes => "retrieveColumnDataTypes",
            RetrieveUserDefinedColumnDataTypes => "retrieveUserDefinedColumnDataTypes",
            RetrieveTables => "retrieveTables",
            RetrieveTableColumns => "retrieveTableColumns",
            RetrieveAdditionalTableAttributes => "retrieveAdditionalTableAttributes",
            RetrieveAdditionalColumnAttributes => "retrieveAdditionalColumnAttributes",
            RetrieveTableDefinitionsInformation => "retrieveTableDefinitionsInformation",
            RetrieveViewInformation => "retrieveViewInformation",
            RetrieveIndexes => "retrieveIndexes",
            RetrieveIndexInformation => "retrieveIndexInformation",
            RetrievePrimaryKeyDefinitions => "retrievePrimaryKeyDefinitions",
            RetrieveForeignKeys => "retrieveForeignKeys",
            RetrieveForeignKeyDefinitions => "retrieveForeignKeyDefinitions",
            RetrieveTableConstraintInformation => "retrieveTableConstraintInformation",
            RetrieveTableConstraintDefinitions => "retrieveTableConstraintDefinitions",
            RetrieveTriggerInformation => "retrieveTriggerInformation",
            RetrieveTablePrivileges => "retrieveTablePrivileges",
            RetrieveTableColumnPrivileges => "retrieveTableColumnPrivileges",
            RetrieveRoutines => "retrieveRoutines",
            RetrieveRoutineParameters => "retrieveRoutineParameters",
            RetrieveRoutineInformation => "retrieveRoutineInformation",
            RetrieveSequenceInformation => "retrieveSequenceInformation",
            RetrieveSynonymInformation => "retrieveSynonymInformation",
        }
    }

    fn bit(self) -> u64 {
        1u64 << (self as u32)
    }
}

impl fmt::Display for SchemaInfoRetrieval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returned when parsing an unknown retrieval flag name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown schema info retrieval: {0}")]
pub struct UnknownRetrieval(pub String);

impl FromStr for SchemaInfoRetrieval {
    type Err = UnknownRetrieval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|retrieval| retrieval.name() == s)
            .ok_or_else(|| UnknownRetrieval(s.to_string()))
    }
}

const MINIMUM: &[SchemaInfoRetrieval] = &[RetrieveDatabaseInfo, RetrieveTables, RetrieveRoutines];

const STANDARD: &[SchemaInfoRetrieval] = &[
    RetrieveColumnDataTypes,
    RetrieveUserDefinedColumnDataTypes,
    RetrieveTableColumns,
    RetrieveIndexes,
    RetrieveForeignKeys,
    RetrieveRoutineParameters,
];

const DETAILED: &[SchemaInfoRetrieval] = &[
    RetrieveDatabaseUsers,
    RetrieveViewInformation,
    RetrieveTableConstraintInformation,
    RetrieveTableConstraintDefinitions,
    RetrieveTriggerInformation,
    RetrieveTablePrivileges,
    RetrieveTableColumnPrivileges,
    RetrieveRoutineInformation,
    RetrieveSequenceInformation,
    RetrieveSynonymInformation,
];

fn mask(groups: &[&[SchemaInfoRetrieval]]) -> u64 {
    groups
        .iter()
        .flat_map(|group| group.iter())
        .fold(0, |bits, retrieval| bits | retrieval.bit())
}

/// An immutable, named set of retrieval flags
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaInfoLevel {
    tag: String,
    retrievals: u64,
}

impl SchemaInfoLevel {
    /// Tags of the standard levels, from least to most detailed
    pub const STANDARD_TAGS: [&'static str; 4] = ["minimum", "standard", "detailed", "maximum"];

    /// Database info, table names and routine names only
    pub fn minimum() -> Self {
        Self::tagged("minimum", mask(&[MINIMUM]))
    }

    /// Adds columns, indexes, foreign keys and routine parameters
    pub fn standard() -> Self {
        Self::tagged("standard", mask(&[MINIMUM, STANDARD]))
    }

    /// Adds constraints, triggers, views, privileges, sequences and synonyms
    pub fn detailed() -> Self {
        Self::tagged("detailed", mask(&[MINIMUM, STANDARD, DETAILED]))
    }

    /// Everything
    pub fn maximum() -> Self {
        Self::tagged("maximum", mask(&[&SchemaInfoRetrieval::ALL]))
    }

    /// Look up a standard level by its tag
    pub fn for_tag(tag: &str) -> Option<Self> {
        match tag {
            "minimum" => Some(Self::minimum()),
            "standard" => Some(Self::standard()),
            "detailed" => Some(Self::detailed()),
            "maximum" => Some(Self::maximum()),
            _ => None,
        }
    }

    fn tagged(tag: &str, retrievals: u64) -> Self {
        Self {
            tag: tag.to_string(),
            retrievals,
        }
    }

    /// Name of this level
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The raw bitmask
    pub fn bits(&self) -> u64 {
        self.retrievals
    }

    /// Whether a flag is enabled
    pub fn is(&self, retrieval: SchemaInfoRetrieval) -> bool {
        self.retrievals & retrieval.bit() != 0
    }

    /// Whether a flag, given by name, is enabled; unknown names are never enabled
    pub fn is_named(&self, name: &str) -> bool {
        name.parse::<SchemaInfoRetrieval>()
            .map(|retrieval| self.is(retrieval))
            .unwrap_or(false)
    }

    /// Enabled flags, in bit order
    pub fn enabled(&self) -> impl Iterator<Item = SchemaInfoRetrieval> + '_ {
        SchemaInfoRetrieval::ALL
            .iter()
            .copied()
            .filter(move |retrieval| self.is(*retrieval))
    }
}

impl Default for SchemaInfoLevel {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for SchemaInfoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SchemaInfoLevel <{}>", self.tag)?;
        writeln!(f, "{{")?;
        for retrieval in SchemaInfoRetrieval::ALL {
            writeln!(f, "  {}={}", retrieval.name(), self.is(retrieval))?;
        }
        writeln!(f, "}}")
    }
}

/// Derives custom info levels
#[derive(Debug, Clone, Default)]
pub struct SchemaInfoLevelBuilder {
    tag: Option<String>,
    retrievals: u64,
}

impl SchemaInfoLevelBuilder {
    /// Start from a level with no flags set
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the flags of an existing level
    pub fn from_level(level: &SchemaInfoLevel) -> Self {
        Self {
            tag: None,
            retrievals: level.retrievals,
        }
    }

    /// Name the resulting level
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Enable or disable a flag
    pub fn set(mut self, retrieval: SchemaInfoRetrieval, value: bool) -> Self {
        if value {
            self.retrievals |= retrieval.bit();
        } else {
            self.retrievals &= !retrieval.bit();
        }
        self
    }

    /// Build the level; untagged levels are called `custom`
    pub fn build(self) -> SchemaInfoLevel {
        SchemaInfoLevel {
            tag: self.tag.unwrap_or_else(|| "custom".to_string()),
            retrievals: self.retrievals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_levels_are_nested() {
        let levels = [
            SchemaInfoLevel::minimum(),
            SchemaInfoLevel::standard(),
            SchemaInfoLevel::detailed(),
            SchemaInfoLevel::maximum(),
        ];

        for pair in levels.windows(2) {
            let (lower, higher) = (&pair[0], &pair[1]);
            assert_eq!(lower.bits() & higher.bits(), lower.bits());
            assert!(lower.bits() != higher.bits());
        }
    }

    #[test]
    fn maximum_enables_every_flag() {
        let level = SchemaInfoLevel::maximum();
        assert_eq!(level.enabled().count(), SchemaInfoRetrieval::ALL.len());
    }

    #[test]
    fn minimum_has_no_columns() {
        let level = SchemaInfoLevel::minimum();
        assert!(level.is(RetrieveTables));
        assert!(!level.is(RetrieveTableColumns));
        assert!(!level.is(RetrieveIndexes));
    }

    #[test]
    fn query_by_name() {
        let level = SchemaInfoLevel::standard();
        assert!(level.is_named("retrieveIndexes"));
        assert!(!level.is_named("retrieveTriggerInformation"));
        assert!(!level.is_named("noSuchFlag"));
    }

    #[test]
    fn builder_overrides_flags() {
        let level = SchemaInfoLevelBuilder::from_level(&SchemaInfoLevel::maximum())
            .set(RetrieveIndexes, false)
            .build();

        assert_eq!(level.tag(), "custom");
        assert!(!level.is(RetrieveIndexes));
        assert!(level.is(RetrieveForeignKeys));
    }

    #[test]
    fn for_tag_lookup() {
        assert_eq!(SchemaInfoLevel::for_tag("detailed"), Some(SchemaInfoLevel::detailed()));
        assert_eq!(SchemaInfoLevel::for_tag("verbose"), None);
        for tag in SchemaInfoLevel::STANDARD_TAGS {
            assert_eq!(SchemaInfoLevel::for_tag(tag).unwrap().tag(), tag);
        }
    }

    #[test]
    fn retrieval_names_parse() {
        for retrieval in SchemaInfoRetrieval::ALL {
            assert_eq!(retrieval.name().parse::<SchemaInfoRetrieval>().unwrap(), retrieval);
        }
        assert!("retrieveEverything".parse::<SchemaInfoRetrieval>().is_err());
    }

    #[test]
    fn serde_uses_retrieval_names() {
        let json = serde_json::to_string(&RetrieveTableColumnPrivileges).unwrap();
        assert_eq!(json, "\"retrieveTableColumnPrivileges\"");
    }

    #[test]
    fn display_lists_flags() {
        let text = SchemaInfoLevel::minimum().to_string();
        assert!(text.starts_with("SchemaInfoLevel <minimum>"));
        assert!(text.contains("  retrieveTables=true"));
        assert!(text.contains("  retrieveIndexes=false"));
    }
}
