//! htmlint CLI - lint HTML pages for markup, SEO and accessibility issues

mod json;
mod sarif;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use htmlint_core::{check_project, config::LintConfig, diagnostics::DiagnosticLevel, Diagnostic};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the validated directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = ".htmlint.toml";

#[derive(Parser)]
#[command(name = "htmlint")]
#[command(author, version, long_about = None)]
#[command(
    about = "Lint HTML pages",
    long_about = "Lint HTML pages for markup, SEO and accessibility issues.\n\nChecks: line breaks • inline handlers • canonical links • meta descriptions • figure captions • image dimensions"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to validate (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Strict mode (treat warnings as errors)
    #[arg(short, long, global = true)]
    strict: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Verbose output (rule ids, suggestions and debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Sarif,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate HTML files
    Validate {
        /// Path to validate
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize config file
    Init {
        /// Output path for config
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },

    /// List available rules
    Rules,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Validate { path }) => validate_command(path, &cli),
        Some(Commands::Init { output }) => init_command(output),
        Some(Commands::Rules) => rules_command(),
        None => validate_command(&cli.path, &cli),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr so JSON and SARIF on stdout stay parseable
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(path: &Path, explicit: Option<&Path>) -> anyhow::Result<LintConfig> {
    if let Some(config_path) = explicit {
        return LintConfig::load(config_path)
            .with_context(|| format!("loading config {}", config_path.display()));
    }

    let discovered = path.join(DEFAULT_CONFIG_FILE);
    if path.is_dir() && discovered.is_file() {
        tracing::debug!(config = %discovered.display(), "using discovered config");
        return LintConfig::load(&discovered)
            .with_context(|| format!("loading config {}", discovered.display()));
    }

    Ok(LintConfig::default())
}

/// Returns `Ok(false)` when the run should exit non-zero
fn validate_command(path: &Path, cli: &Cli) -> anyhow::Result<bool> {
    let config = load_config(path, cli.config.as_deref())?;

    if cli.format == OutputFormat::Text {
        println!("{} {}", "Validating:".cyan().bold(), path.display());
        println!();
    }

    let report = check_project(path, &config)?;
    let diagnostics = &report.diagnostics;

    let errors = count_level(diagnostics, DiagnosticLevel::Error);
    let warnings = count_level(diagnostics, DiagnosticLevel::Warning);
    let passed = errors == 0 && !(cli.strict && warnings > 0);

    // Output paths are shown relative to the directory that was walked
    let base_path = if path.is_file() {
        path.parent().unwrap_or(path)
    } else {
        path
    };

    match cli.format {
        OutputFormat::Json => {
            let output = json::diagnostics_to_json(diagnostics, base_path, report.files_checked);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Sarif => {
            let output = sarif::diagnostics_to_sarif(diagnostics, base_path);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_text(diagnostics, report.files_checked, cli.verbose),
    }

    Ok(passed)
}

fn count_level(diagnostics: &[Diagnostic], level: DiagnosticLevel) -> usize {
    diagnostics.iter().filter(|d| d.level == level).count()
}

fn print_text(diagnostics: &[Diagnostic], files_checked: usize, verbose: bool) {
    if diagnostics.is_empty() {
        println!(
            "{} ({} {} checked)",
            "✓ No issues found".green().bold(),
            files_checked,
            if files_checked == 1 { "file" } else { "files" }
        );
        return;
    }

    for diag in diagnostics {
        let level_str = match diag.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
            DiagnosticLevel::Info => "info".blue().bold(),
        };

        println!(
            "{}:{}:{} {}: {} {}",
            diag.file.display().to_string().dimmed(),
            diag.line,
            diag.column,
            level_str,
            diag.message,
            format!("[{}]", diag.rule).dimmed()
        );

        if verbose {
            if let Some(suggestion) = &diag.suggestion {
                println!("  {} {}", "help:".cyan(), suggestion);
            }
        }
    }

    let errors = count_level(diagnostics, DiagnosticLevel::Error);
    let warnings = count_level(diagnostics, DiagnosticLevel::Warning);
    let infos = count_level(diagnostics, DiagnosticLevel::Info);

    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "Found {} {}, {} {} in {} {}",
        errors,
        if errors == 1 { "error" } else { "errors" },
        warnings,
        if warnings == 1 { "warning" } else { "warnings" },
        files_checked,
        if files_checked == 1 { "file" } else { "files" }
    );

    if infos > 0 {
        println!("  {} info messages", infos);
    }
}

fn init_command(output: &Path) -> anyhow::Result<bool> {
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    let toml_content = toml::to_string_pretty(&LintConfig::default())?;
    std::fs::write(output, toml_content)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{} Created config file: {}",
        "✓".green().bold(),
        output.display()
    );

    Ok(true)
}

fn rules_command() -> anyhow::Result<bool> {
    for rule in htmlint_rules::RULES {
        let severity = match rule.severity {
            "error" => rule.severity.red(),
            "warning" => rule.severity.yellow(),
            _ => rule.severity.blue(),
        };
        println!(
            "{:<26} {:<8} {:<24} {}",
            rule.id.bold(),
            severity,
            rule.events.join(",").dimmed(),
            rule.name
        );
    }
    println!();
    println!("{} rules", htmlint_rules::rule_count());
    Ok(true)
}
