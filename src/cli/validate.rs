//! `agile-docs validate` command

use crate::config::DocsConfig;
use crate::models::{SemanticFinding, Severity, ValidationReport, Violation};
use crate::parser::DocumentFormat;
use crate::validator::DocumentValidator;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Document files or directories to validate
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Schema file to use instead of the bundled schema
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Run referential-integrity checks after structural validation
    #[arg(long)]
    pub semantic: bool,

    /// Fail on high-severity semantic findings (implies --semantic)
    #[arg(long)]
    pub strict: bool,

    /// Assert `format` keywords such as date-time
    #[arg(long)]
    pub validate_formats: bool,

    /// Output JSON format
    #[arg(long)]
    pub json: bool,

    /// Configuration file (default: ./agile-docs.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Outcome for one input file
#[derive(Debug, Serialize)]
struct FileOutcome {
    source: String,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<ValidationReport>,
}

/// Run validate command, returning whether every document passed
pub fn run(args: &ValidateArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => DocsConfig::load_from(path)?,
        None => DocsConfig::load(&env::current_dir()?)?,
    };
    let settings = config.validation.with_flags(
        args.validate_formats,
        args.semantic,
        args.strict,
        args.schema.clone(),
    );

    let validator =
        DocumentValidator::from_settings(&settings).context("Failed to prepare the schema validator")?;

    let files = collect_documents(&args.paths)?;
    if files.is_empty() {
        anyhow::bail!("No .json, .yaml or .yml documents found");
    }

    let outcomes: Vec<FileOutcome> = files
        .iter()
        .map(|file| match validator.validate_file(file) {
            Ok(report) => FileOutcome {
                source: report.source.clone(),
                passed: validator.passes(&report),
                error: None,
                report: Some(report),
            },
            Err(e) => FileOutcome {
                source: file.display().to_string(),
                passed: false,
                error: Some(e.to_string()),
                report: None,
            },
        })
        .collect();

    let all_passed = outcomes.iter().all(|o| o.passed);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        print_outcomes(&outcomes, validator.is_strict());
    }

    Ok(all_passed)
}

/// Expand directories into the documents they contain, sorted by path
pub fn collect_documents(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file() && is_document(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            anyhow::bail!("Path not found: {}", path.display());
        }
    }

    Ok(files)
}

fn is_document(path: &Path) -> bool {
    DocumentFormat::from_path(path).is_some()
}

fn print_outcomes(outcomes: &[FileOutcome], strict: bool) {
    println!("{}", "🔍 Validating agile documentation".cyan());
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());

    for outcome in outcomes {
        println!();
        println!("   {}", outcome.source.bold());

        if let Some(error) = &outcome.error {
            println!("      {} {}", "ERROR:".red(), error);
            continue;
        }

        let Some(report) = &outcome.report else {
            continue;
        };

        for violation in &report.violations {
            print_violation(violation);
        }
        for finding in &report.findings {
            print_finding(finding);
        }

        if outcome.passed {
            println!("      {}", "✓ OK".green());
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed).count();
    println!();
    if failed == 0 {
        println!(
            "{}",
            format!("✅ {} document(s) passed validation", outcomes.len()).green().bold()
        );
    } else {
        println!(
            "{}",
            format!("❌ {} of {} document(s) failed validation", failed, outcomes.len())
                .red()
                .bold()
        );
        if strict {
            println!("   {}", "Strict mode: high-severity findings count as failures".bright_black());
        }
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::High => "HIGH:".red(),
        Severity::Medium => "MEDIUM:".yellow(),
        Severity::Low => "LOW:".bright_black(),
    }
}

fn print_violation(violation: &Violation) {
    println!(
        "      {} {} ({})",
        severity_label(violation.severity),
        violation.message,
        violation.path.bright_black()
    );
    println!("         expected {}", violation.expected.bright_black());
}

fn print_finding(finding: &SemanticFinding) {
    println!(
        "      {} {} ({})",
        severity_label(finding.severity),
        finding.message,
        finding.path.bright_black()
    );
}
