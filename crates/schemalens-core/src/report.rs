//! Lint report (`lints.json`)
//!
//! The JSON layout is versioned. Removing or renaming a field bumps the major
//! version; new optional fields bump the minor version.

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Finding, Severity};

/// Version of the `lints.json` layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Bumped when existing readers would break
    pub major: u32,

    /// Bumped for additive changes
    pub minor: u32,
}

impl ReportVersion {
    /// Version written by this build
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Finding counts per severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of findings
    pub total: usize,

    pub critical: usize,

    pub high: usize,

    pub medium: usize,

    pub low: usize,

    /// Number of linters that ran
    pub linters_run: usize,

    /// Number of tables in the linted catalog
    pub tables_checked: usize,
}

impl ReportSummary {
    fn count(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
        self.total += 1;
    }
}

/// Lint report (lints.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintReport {
    pub version: ReportVersion,

    /// When the report was built (RFC 3339)
    pub timestamp: String,

    pub summary: ReportSummary,

    /// All findings, in linter order
    pub findings: Vec<Finding>,

    /// Whether any linter produced more findings than its threshold
    pub exceeds_threshold: bool,

    /// Crawl information of the linted catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl LintReport {
    /// Empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            findings: Vec::new(),
            exceeds_threshold: false,
            metadata: None,
        }
    }

    /// Create a report from findings
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut report = Self::new();
        for finding in findings {
            report.add_finding(finding);
        }
        report
    }

    /// Add a finding to the report
    pub fn add_finding(&mut self, finding: Finding) {
        self.summary.count(finding.severity);
        self.findings.push(finding);
    }

    /// Findings at or above a severity
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity >= severity)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the JSON form to `path`
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for LintReport {
    fn default() -> Self {
        Self::new()
    }
}
