//! Regular-expression inclusion rules
//!
//! A rule decides whether a named object is kept, by testing its full name
//! against an include pattern and an exclude pattern. Patterns must match the
//! whole text, not a substring of it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pattern that could not be compiled
#[derive(Debug, thiserror::Error)]
#[error("Invalid pattern '{pattern}': {source}")]
pub struct InclusionRuleError {
    /// The pattern as written
    pub pattern: String,

    #[source]
    pub source: regex::Error,
}

/// A compiled full-match pattern that keeps its source text
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern, anchored at both ends
    pub fn new(pattern: &str) -> Result<Self, InclusionRuleError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| InclusionRuleError {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the whole text matches
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Decides whether an object, identified by its full name, is retained
///
/// `test(x)` is `include(x) && !exclude(x)`; a missing include pattern matches
/// everything and a missing exclude pattern matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InclusionRule {
    /// Retain everything
    #[default]
    IncludeAll,

    /// Retain nothing
    ExcludeAll,

    /// Retain what matches `include` and does not match `exclude`
    Patterns {
        include: Option<Pattern>,
        exclude: Option<Pattern>,
    },
}

impl InclusionRule {
    /// Build a rule from optional include and exclude patterns
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, InclusionRuleError> {
        if include.is_none() && exclude.is_none() {
            return Ok(Self::IncludeAll);
        }

        Ok(Self::Patterns {
            include: include.map(Pattern::new).transpose()?,
            exclude: exclude.map(Pattern::new).transpose()?,
        })
    }

    /// Retain only names matching the pattern
    pub fn include(pattern: &str) -> Result<Self, InclusionRuleError> {
        Self::new(Some(pattern), None)
    }

    /// Retain every name except those matching the pattern
    pub fn exclusion(pattern: &str) -> Result<Self, InclusionRuleError> {
        Self::new(None, Some(pattern))
    }

    /// Test a full name against the rule
    pub fn test(&self, text: &str) -> bool {
        match self {
            Self::IncludeAll => true,
            Self::ExcludeAll => false,
            Self::Patterns { include, exclude } => {
                let included = include.as_ref().map_or(true, |p| p.matches(text));
                let excluded = exclude.as_ref().map_or(false, |p| p.matches(text));
                included && !excluded
            }
        }
    }

    /// Whether the rule keeps every name
    pub fn is_include_all(&self) -> bool {
        match self {
            Self::IncludeAll => true,
            Self::ExcludeAll => false,
            Self::Patterns { include, exclude } => {
                exclude.is_none() && include.as_ref().map_or(true, |p| p.as_str() == ".*")
            }
        }
    }
}

impl fmt::Display for InclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncludeAll => write!(f, "include all"),
            Self::ExcludeAll => write!(f, "exclude all"),
            Self::Patterns { include, exclude } => {
                let include = include.as_ref().map_or(".*", |p| p.as_str());
                match exclude {
                    Some(exclude) => write!(f, "+/{}/ -/{}/", include, exclude),
                    None => write!(f, "+/{}/", include),
                }
            }
        }
    }
}

/// An include/exclude pair as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Names to include (default: everything)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    /// Names to exclude (default: nothing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

impl RuleConfig {
    /// Compile into a rule, failing on malformed patterns
    pub fn compile(&self) -> Result<InclusionRule, InclusionRuleError> {
        InclusionRule::new(self.include.as_deref(), self.exclude.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_includes_everything() {
        let rule = InclusionRule::default();
        assert!(rule.test("PUBLIC.BOOKS"));
        assert!(rule.test(""));
        assert!(rule.is_include_all());
    }

    #[test]
    fn exclude_all_rejects_everything() {
        assert!(!InclusionRule::ExcludeAll.test("PUBLIC.BOOKS"));
    }

    #[test]
    fn exclusion_rule() {
        let rule = InclusionRule::exclusion(r".*\.FOR_LINT").unwrap();
        assert!(rule.test("PUBLIC.BOOKS"));
        assert!(!rule.test("PUBLIC.FOR_LINT"));
        assert!(!rule.is_include_all());
    }

    #[test]
    fn patterns_must_match_whole_name() {
        let rule = InclusionRule::include("PUBLIC.BOOK").unwrap();
        assert!(!rule.test("PUBLIC.BOOKS"));
        assert!(rule.test("PUBLIC.BOOK"));
    }

    #[test]
    fn include_and_exclude_combine() {
        let rule = InclusionRule::new(Some(r"PUBLIC\..*"), Some(r".*\.AUTHORS")).unwrap();
        assert!(rule.test("PUBLIC.BOOKS.BOOKS"));
        assert!(!rule.test("PUBLIC.BOOKS.AUTHORS"));
        assert!(!rule.test("OTHER.BOOKS.BOOKS"));
    }

    #[test]
    fn malformed_pattern_fails_fast() {
        let err = InclusionRule::include("(unclosed").unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
    }

    #[test]
    fn rule_config_compiles() {
        let config = RuleConfig {
            include: None,
            exclude: Some(r".*\.FOR_LINT".to_string()),
        };
        let rule = config.compile().unwrap();
        assert!(!rule.test("PUBLIC.FOR_LINT"));

        assert_eq!(RuleConfig::default().compile().unwrap(), InclusionRule::IncludeAll);
    }

    #[test]
    fn display() {
        let rule = InclusionRule::new(Some("A.*"), Some("AB")).unwrap();
        assert_eq!(rule.to_string(), "+/A.*/ -/AB/");
        assert_eq!(InclusionRule::IncludeAll.to_string(), "include all");
    }
}
