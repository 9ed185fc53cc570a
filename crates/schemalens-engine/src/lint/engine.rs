use schemalens_catalog::Catalog;
use schemalens_core::{Finding, LintReport, LinterConfig, ObjectKind, Severity};
use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

use super::registry::{registered_linters, registration};
use super::{LintConnection, LintContext, LintError, Linter};

/// A configured linter and what it found in the last run
pub struct LinterRun {
    linter: Box<dyn Linter>,
    config: LinterConfig,
    findings: Vec<Finding>,
}

impl LinterRun {
    pub fn id(&self) -> &'static str {
        self.linter.id()
    }

    pub fn summary(&self) -> &'static str {
        self.linter.summary()
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Whether the last run found more than the configured threshold
    pub fn exceeds_threshold(&self) -> bool {
        self.findings.len() > self.config.threshold
    }
}

/// An ordered set of linters
///
/// Linters run in configuration order. With `run_all`, registered linters that
/// were not configured run afterwards in registry order with default settings.
pub struct Linters {
    runs: Vec<LinterRun>,
}

impl Linters {
    /// Build the linters for a set of configurations
    ///
    /// Unknown ids and invalid linter settings are errors. Configurations with
    /// `run = false` are skipped, and also keep `run_all` from adding that
    /// linter.
    pub fn new(configs: Vec<LinterConfig>, run_all: bool) -> Result<Self, LintError> {
        let mut runs = Vec::new();
        let mut configured = BTreeSet::new();

        for config in configs {
            let registration =
                registration(&config.id).ok_or_else(|| LintError::UnknownLinter(config.id.clone()))?;
            configured.insert(registration.id);
            if !config.run {
                debug!(linter = registration.id, "Linter disabled");
                continue;
            }
            let linter = registration.build(&config)?;
            runs.push(LinterRun {
                linter,
                config,
                findings: Vec::new(),
            });
        }

        if run_all {
            for registration in registered_linters() {
                if configured.contains(registration.id) {
                    continue;
                }
                let config = LinterConfig::new(registration.id);
                match registration.build(&config) {
                    Ok(linter) => runs.push(LinterRun {
                        linter,
                        config,
                        findings: Vec::new(),
                    }),
                    // Linters with required settings only run when configured
                    Err(e) => debug!(linter = registration.id, error = %e, "Not running unconfigured linter"),
                }
            }
        }

        Ok(Self { runs })
    }

    /// Append a linter that is not in the registry
    pub fn with_linter(mut self, linter: Box<dyn Linter>, config: LinterConfig) -> Self {
        self.runs.push(LinterRun {
            linter,
            config,
            findings: Vec::new(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn runs(&self) -> &[LinterRun] {
        &self.runs
    }

    /// Run every linter against the catalog
    ///
    /// A linter that fails or panics does not stop the run; its failure is
    /// recorded as a critical finding in its place.
    pub fn check(&mut self, catalog: &Catalog, connection: Option<&dyn LintConnection>) {
        for run in &mut self.runs {
            let ctx = LintContext::new(run.linter.as_ref(), catalog, connection, &run.config);
            run.findings = match check_isolated(run.linter.as_ref(), &ctx) {
                Ok(findings) => findings,
                Err(e) => {
                    warn!(linter = run.linter.id(), error = %e, "Linter failed");
                    vec![Finding::new(
                        run.linter.id(),
                        Severity::Critical,
                        ObjectKind::Catalog,
                        catalog.name(),
                        "linter failed",
                    )
                    .with_value(e.to_string())]
                }
            };
            debug!(linter = run.linter.id(), findings = run.findings.len(), "Linter complete");
        }

        info!(linters = self.runs.len(), findings = self.finding_count(), "Lint complete");
    }

    /// Every finding, in linter order then discovery order
    pub fn findings(&self) -> Vec<&Finding> {
        self.runs.iter().flat_map(|run| run.findings.iter()).collect()
    }

    pub fn finding_count(&self) -> usize {
        self.runs.iter().map(|run| run.findings.len()).sum()
    }

    /// Whether any linter found more than its threshold
    pub fn exceeds_threshold(&self) -> bool {
        self.runs.iter().any(LinterRun::exceeds_threshold)
    }

    /// Build a report of the last run
    pub fn report(&self, catalog: &Catalog) -> LintReport {
        let mut report = LintReport::from_findings(self.findings().into_iter().cloned().collect());
        report.summary.linters_run = self.runs.len();
        report.summary.tables_checked = catalog.tables().len();
        report.exceeds_threshold = self.exceeds_threshold();
        report.metadata = catalog
            .crawl_info()
            .and_then(|crawl_info| serde_json::to_value(crawl_info).ok());
        report
    }
}

fn check_isolated(linter: &dyn Linter, ctx: &LintContext<'_>) -> Result<Vec<Finding>, LintError> {
    catch_unwind(AssertUnwindSafe(|| linter.check(ctx))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(LintError::CheckFailed {
            linter: linter.id().to_string(),
            message: format!("panicked: {}", message),
        })
    })
}
