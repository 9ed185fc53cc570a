//! Configuration schema (schemalens.toml)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::diagnostic::Severity;
use crate::inclusion::{InclusionRule, InclusionRuleError, RuleConfig};
use crate::info_level::{SchemaInfoLevel, SchemaInfoLevelBuilder, SchemaInfoRetrieval};
use crate::options::{GrepOptions, LimitOptions, LinterConfig};

/// What to retrieve during a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Standard level tag: minimum, standard, detailed or maximum
    #[serde(default = "default_info_level")]
    pub info_level: String,

    /// Per-flag overrides, keyed by retrieval name (e.g. `retrieveIndexes`)
    #[serde(default)]
    pub overrides: BTreeMap<String, bool>,
}

fn default_info_level() -> String {
    "standard".to_string()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            info_level: default_info_level(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Which objects to keep
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitConfig {
    #[serde(default)]
    pub schemas: Option<RuleConfig>,

    #[serde(default)]
    pub tables: Option<RuleConfig>,

    #[serde(default)]
    pub routines: Option<RuleConfig>,

    #[serde(default)]
    pub sequences: Option<RuleConfig>,

    #[serde(default)]
    pub synonyms: Option<RuleConfig>,

    /// Table types to keep
    #[serde(default)]
    pub table_types: Option<Vec<String>>,

    /// Routine types to keep
    #[serde(default)]
    pub routine_types: Option<Vec<String>>,

    /// Foreign key hops towards referenced tables
    #[serde(default)]
    pub parent_table_depth: usize,

    /// Foreign key hops towards referencing tables
    #[serde(default)]
    pub child_table_depth: usize,
}

/// Content-based filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrepConfig {
    #[serde(default)]
    pub columns: Option<RuleConfig>,

    #[serde(default)]
    pub routine_parameters: Option<RuleConfig>,

    #[serde(default)]
    pub definitions: Option<RuleConfig>,

    #[serde(default)]
    pub invert_match: bool,
}

/// Global lint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintSettings {
    /// Also run registered linters that have no `[[linters]]` entry
    #[serde(default = "default_true")]
    pub run_all_linters: bool,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self { run_all_linters: true }
    }
}

fn default_true() -> bool {
    true
}

/// One `[[linters]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinterEntry {
    /// Registered linter id
    pub id: String,

    #[serde(default = "default_true")]
    pub run: bool,

    #[serde(default)]
    pub severity: Option<Severity>,

    #[serde(default)]
    pub threshold: Option<usize>,

    #[serde(default)]
    pub table_inclusion: Option<String>,

    #[serde(default)]
    pub table_exclusion: Option<String>,

    #[serde(default)]
    pub column_inclusion: Option<String>,

    #[serde(default)]
    pub column_exclusion: Option<String>,

    /// Linter-specific settings
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
}

impl LinterEntry {
    fn compile(&self) -> Result<LinterConfig, ConfigError> {
        Ok(LinterConfig {
            id: self.id.clone(),
            run: self.run,
            severity: self.severity,
            threshold: self.threshold.unwrap_or(usize::MAX),
            table_rule: InclusionRule::new(self.table_inclusion.as_deref(), self.table_exclusion.as_deref())?,
            column_rule: InclusionRule::new(self.column_inclusion.as_deref(), self.column_exclusion.as_deref())?,
            config: self.config.clone(),
        })
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub load: LoadConfig,

    #[serde(default)]
    pub limit: LimitConfig,

    #[serde(default)]
    pub grep: GrepConfig,

    #[serde(default)]
    pub lint: LintSettings,

    /// Linter entries, in the order the linters run
    #[serde(default)]
    pub linters: Vec<LinterEntry>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Resolve the info level and its overrides
    pub fn info_level(&self) -> Result<SchemaInfoLevel, ConfigError> {
        let base = SchemaInfoLevel::for_tag(&self.load.info_level)
            .ok_or_else(|| ConfigError::UnknownInfoLevel(self.load.info_level.clone()))?;

        if self.load.overrides.is_empty() {
            return Ok(base);
        }

        let mut builder = SchemaInfoLevelBuilder::from_level(&base);
        for (name, value) in &self.load.overrides {
            let retrieval = name
                .parse::<SchemaInfoRetrieval>()
                .map_err(|e| ConfigError::UnknownRetrieval(e.0))?;
            builder = builder.set(retrieval, *value);
        }

        Ok(builder.build())
    }

    /// Compile the `[limit]` section
    pub fn limit_options(&self) -> Result<LimitOptions, ConfigError> {
        let limit = &self.limit;

        Ok(LimitOptions {
            schemas: compile_rule(&limit.schemas)?,
            tables: compile_rule(&limit.tables)?,
            routines: compile_rule(&limit.routines)?,
            sequences: compile_rule(&limit.sequences)?,
            synonyms: compile_rule(&limit.synonyms)?,
            table_types: limit.table_types.clone(),
            routine_types: limit.routine_types.clone(),
            parent_table_depth: limit.parent_table_depth,
            child_table_depth: limit.child_table_depth,
        })
    }

    /// Compile the `[grep]` section
    pub fn grep_options(&self) -> Result<GrepOptions, ConfigError> {
        Ok(GrepOptions {
            columns: compile_rule(&self.grep.columns)?,
            routine_parameters: compile_rule(&self.grep.routine_parameters)?,
            definitions: compile_rule(&self.grep.definitions)?,
            invert_match: self.grep.invert_match,
        })
    }

    /// Compile the `[[linters]]` entries, in order
    pub fn linter_configs(&self) -> Result<Vec<LinterConfig>, ConfigError> {
        self.linters.iter().map(LinterEntry::compile).collect()
    }
}

fn compile_rule(rule: &Option<RuleConfig>) -> Result<Option<InclusionRule>, ConfigError> {
    Ok(rule.as_ref().map(RuleConfig::compile).transpose()?)
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error(transparent)]
    InvalidPattern(#[from] InclusionRuleError),

    #[error("Unknown info level: {0}")]
    UnknownInfoLevel(String),

    #[error("Unknown schema info retrieval: {0}")]
    UnknownRetrieval(String),
}
