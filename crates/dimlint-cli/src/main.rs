use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dimlint_core::{AnalysisOutcome, Config, ModelReport, RunReport, Verdict};
use dimlint_engine::ModelAnalyzer;

/// dimlint - Dimensional modeling checks for dbt projects
#[derive(Parser)]
#[command(name = "dimlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dimlint.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// dbt project directory containing `models/` (overrides the config location)
    #[arg(short, long, global = true)]
    project_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze models and check dimensional modeling conventions
    Analyze {
        /// Models to analyze (defaults to the configured list)
        models: Vec<String>,

        /// Analyze every discovered model
        #[arg(long, conflicts_with = "models")]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with an error code when any model has warnings
        #[arg(long)]
        strict: bool,
    },

    /// List discovered models and their roles
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(project_dir) = cli.project_dir {
        config.project_root = project_dir;
    }

    tracing::debug!(root = %config.project_root.display(), "using project root");

    match cli.command {
        Commands::Analyze { models, all, format, strict } => {
            analyze_command(&config, models, all, format, strict)
        }
        Commands::List => list_command(&config),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    if let Some(config_path) = path {
        return Config::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    let default_path = std::path::Path::new("dimlint.toml");
    if default_path.exists() {
        return Config::from_file(default_path).context("Failed to load dimlint.toml");
    }

    tracing::debug!("no config file found, using defaults");
    Ok(Config::default())
}

/// Analyze command - extract and check each requested model
fn analyze_command(
    config: &Config,
    models: Vec<String>,
    all: bool,
    format: OutputFormat,
    strict: bool,
) -> Result<()> {
    let mut analyzer = ModelAnalyzer::from_config(config)
        .with_context(|| format!("Failed to discover models under {}", config.models_dir().display()))?;

    let requested = if all {
        analyzer.catalog().names()
    } else if !models.is_empty() {
        models
    } else {
        config.models.clone()
    };

    let mut run = RunReport::new();

    for name in requested {
        if config.allowlist.is_model_skipped(&name) {
            tracing::debug!(model = %name, "skipped by allowlist");
            continue;
        }

        match analyzer.analyze_model(&name) {
            Ok(outcome) => run.add_outcome(outcome),
            Err(e) => {
                tracing::warn!(model = %name, error = %e, "analysis failed");
                run.add_failure(name, e.to_string());
            }
        }
    }

    match format {
        OutputFormat::Json => println!("{}", run.to_json()?),
        OutputFormat::Text => print_run(&run),
    }

    if run.has_failures() || (strict && run.has_warnings()) {
        std::process::exit(1);
    }

    Ok(())
}

/// List command - show the catalog without reading any model
fn list_command(config: &Config) -> Result<()> {
    let analyzer = ModelAnalyzer::from_config(config)
        .with_context(|| format!("Failed to discover models under {}", config.models_dir().display()))?;
    let catalog = analyzer.catalog();

    if catalog.is_empty() {
        println!("{}", format!("No models found in {}", config.models_dir().display()).yellow());
        return Ok(());
    }

    for model in catalog.iter() {
        let descriptor = if model.yaml_path.is_some() {
            config.descriptor_file.green()
        } else {
            "no descriptor".dimmed()
        };
        println!("  {:<32} {:<10} {}", model.name.bold(), model.role.to_string(), descriptor);
    }

    println!();
    println!("{} {}", "Models discovered:".bold(), catalog.len());

    Ok(())
}

fn print_run(run: &RunReport) {
    for outcome in &run.results {
        match outcome {
            AnalysisOutcome::Report(report) => print_model_report(report),
            AnalysisOutcome::NotFound { error } => {
                println!("\n{} {}", "✗".red(), error);
            }
        }
    }

    for failure in &run.failures {
        println!("\n{} {}: {}", "✗".red(), failure.name.bold(), failure.message.red());
    }

    println!("\n{}", "=".repeat(60).bright_blue());
    println!(
        "{} analyzed, {} compliant, {} with warnings, {} not found, {} failed",
        run.summary.models_analyzed,
        run.summary.compliant.to_string().green(),
        run.summary.with_warnings.to_string().yellow(),
        run.summary.not_found,
        run.summary.failed.to_string().red(),
    );
}

fn print_model_report(report: &ModelReport) {
    println!("\n{}", format!("=== Model Analysis: {} ===", report.name).bold().bright_blue());
    println!("Type: {}", report.role);
    println!("Column Count: {}", report.column_count);
    println!("References: {}", report.references.join(", "));

    println!("\n{}", "Structure:".bold());
    for (label, columns) in report.structure.groups() {
        if !columns.is_empty() {
            println!("  {}: {}", label, columns.join(", "));
        }
    }

    println!("\n{}", "Kimball Compliance:".bold());
    let status = match report.compliance.status {
        Verdict::Compliant => report.compliance.status.to_string().green(),
        Verdict::Warnings => report.compliance.status.to_string().yellow(),
    };
    println!("  Status: {}", status);
    if !report.compliance.warnings.is_empty() {
        println!("  Warnings:");
        for warning in &report.compliance.warnings {
            println!("    - {} {}", warning.message, format!("[{}]", warning.code).dimmed());
        }
    }

    println!("\n{}", "Columns:".bold());
    for column in &report.columns {
        println!("  {}:", column.name);
        println!("    Category: {}", column.category);
        if !column.description.is_empty() {
            println!("    Description: {}", column.description);
        }
        let tests = column.test_names();
        if !tests.is_empty() {
            println!("    Tests: {}", tests.join(", "));
        }
    }
}
