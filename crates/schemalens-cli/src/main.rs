use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemalens_catalog::{Catalog, Crawler, NamedObject, SnapshotProvider};
use schemalens_core::config::LinterEntry;
use schemalens_core::{Config, LintReport, Severity};
use schemalens_engine::{lint::registered_linters, reduce_catalog, Linters};

/// Schemalens - structural analysis of database metadata
#[derive(Parser)]
#[command(name = "schemalens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemalens.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint the catalog described by a metadata snapshot
    Lint {
        /// Metadata snapshot (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Output file for the lint report
        #[arg(short, long, default_value = "lints.json")]
        output: PathBuf,
    },

    /// List schemas and tables left after reduction
    List {
        /// Metadata snapshot (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Write a config file listing every linter
    Init {
        /// Where to write the config
        #[arg(default_value = "schemalens.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Lint { snapshot, output } => {
            let exceeded = lint_command(&config, &snapshot, &output, cli.verbose)?;
            if exceeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::List { snapshot } => list_command(&config, &snapshot),
        Commands::Init { path } => init_command(&path),
    }
}

/// Load the given config, or `schemalens.toml` when present, or defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()));
    }

    let default_path = Path::new("schemalens.toml");
    if default_path.exists() {
        tracing::debug!("Using config {}", default_path.display());
        return Ok(Config::from_file(default_path)?);
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

/// Crawl the snapshot and reduce the catalog with the configured limits
fn load_catalog(config: &Config, snapshot: &Path, verbose: bool) -> Result<Catalog> {
    if verbose {
        eprintln!("{} {}", "Loading snapshot from:".cyan(), snapshot.display());
    }

    let provider = SnapshotProvider::from_file(snapshot)
        .with_context(|| format!("Failed to load snapshot {}", snapshot.display()))?;
    let level = config.info_level()?;
    let mut catalog = Crawler::new(&provider, level).crawl()?;

    let summary = reduce_catalog(&mut catalog, &config.limit_options()?, &config.grep_options()?)?;
    if verbose {
        eprintln!(
            "{} {} tables, {} routines ({} objects removed)",
            "Catalog:".cyan(),
            catalog.tables().len(),
            catalog.routines().len(),
            summary.total()
        );
    }

    Ok(catalog)
}

/// Lint command - returns whether any linter exceeded its threshold
fn lint_command(config: &Config, snapshot: &Path, output: &Path, verbose: bool) -> Result<bool> {
    let catalog = load_catalog(config, snapshot, verbose)?;

    let mut linters = Linters::new(config.linter_configs()?, config.lint.run_all_linters)?;
    if verbose {
        eprintln!("{} {} linters...", "Running".cyan(), linters.len());
    }
    linters.check(&catalog, None);
    tracing::debug!(findings = linters.finding_count(), "Lint finished");

    let report = linters.report(&catalog);
    report
        .save_to_file(output)
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    print_report(&report);
    eprintln!("{} {}", "Report saved to:".green(), output.display());

    Ok(report.exceeds_threshold)
}

fn print_report(report: &LintReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Lint Summary".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    if report.findings.is_empty() {
        println!("{}", "✓ No findings".green());
    }

    let mut current = "";
    for finding in &report.findings {
        if finding.linter_id != current {
            current = &finding.linter_id;
            println!("{}", current.bold());
        }
        let severity = match finding.severity {
            Severity::Critical => finding.severity.to_string().red().bold(),
            Severity::High => finding.severity.to_string().red(),
            Severity::Medium => finding.severity.to_string().yellow(),
            Severity::Low => finding.severity.to_string().normal(),
        };
        println!("  {:>8}  {}", severity, finding);
    }

    let summary = &report.summary;
    println!();
    println!(
        "{} {} findings ({} critical, {} high, {} medium, {} low) from {} linters over {} tables",
        "Total:".bold(),
        summary.total,
        summary.critical.to_string().red(),
        summary.high.to_string().red(),
        summary.medium.to_string().yellow(),
        summary.low,
        summary.linters_run,
        summary.tables_checked
    );

    if report.exceeds_threshold {
        println!("{}", "⚠ At least one linter exceeded its threshold".yellow().bold());
    }
    println!("{}", "=".repeat(60).bright_blue());
}

/// List command - schemas and their tables after reduction
fn list_command(config: &Config, snapshot: &Path) -> Result<()> {
    let catalog = load_catalog(config, snapshot, false)?;

    for schema in catalog.schemas() {
        println!("{}", schema.full_name().bold());
        for table in catalog.tables_in(schema) {
            let kind = if table.is_view() { "view" } else { "table" };
            println!("  {} {}", table.name().green(), format!("({})", kind).dimmed());
        }
        for routine in catalog.routines_in(schema) {
            println!("  {} {}", routine.name().cyan(), format!("({})", routine.routine_type).dimmed());
        }
    }

    Ok(())
}

/// The config `init` writes: every registered linter, in registry order
fn starter_config() -> Config {
    let linters = registered_linters()
        .into_iter()
        .map(|registration| {
            let mut entry = LinterEntry {
                id: registration.id.to_string(),
                run: true,
                severity: None,
                threshold: None,
                table_inclusion: None,
                table_exclusion: None,
                column_inclusion: None,
                column_exclusion: None,
                config: Default::default(),
            };
            if registration.id == "badly_named_columns" {
                entry
                    .config
                    .insert("bad_column_names".to_string(), serde_json::json!(r".*\s.*"));
            }
            entry
        })
        .collect();

    Config {
        linters,
        ..Config::default()
    }
}

fn init_command(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    starter_config().save_to_file(path)?;
    eprintln!("{} {}", "Config written to:".green(), path.display());
    Ok(())
}
