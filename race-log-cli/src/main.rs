//! Race Log Analyzer CLI Application
//!
//! This is the command-line interface for the race log analyzer.
//! It uses the race-log-analyzer library and adds:
//! - TOML configuration with command-line overrides
//! - Parallel analysis of several log files
//! - Report generation (TXT/JSON)
//! - Text charts of the shared value with overlap events highlighted

use anyhow::{bail, Context, Result};
use clap::Parser;
use race_log_analyzer::{AnalysisReport, AnalyzerError, Event};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

mod chart;
mod config;
mod report;

use config::{AppConfig, OutputFormat};

/// Race Log Analyzer - Find lost and overlapping updates in counter logs
#[derive(Parser, Debug)]
#[command(name = "race-log-cli")]
#[command(about = "Analyze thread interleaving, lost updates, and overlapping (stale) updates from thread output", long_about = None)]
#[command(version)]
struct Args {
    /// Log file(s) with `[<thread_id>] glob = <value>` lines
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write reports into this directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Name of the shared variable in the log lines
    #[arg(long, value_name = "NAME")]
    variable: Option<String>,

    /// Only analyze events from this thread (can be repeated)
    #[arg(long = "thread", value_name = "ID")]
    threads: Vec<u32>,

    /// Render a chart of the value progression
    #[arg(long)]
    chart: bool,

    /// Chart width in columns
    #[arg(long, value_name = "COLS")]
    chart_width: Option<u16>,

    /// Chart height in rows
    #[arg(long, value_name = "ROWS")]
    chart_height: Option<u16>,

    /// Maximum number of overlap events listed in text reports
    #[arg(long, value_name = "COUNT")]
    max_details: Option<usize>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Parsed events and their analysis for one input file
struct FileAnalysis {
    events: Vec<Event>,
    report: AnalysisReport,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Race Log Analyzer CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using analyzer library v{}", race_log_analyzer::VERSION);

    let config = resolve_config(&args)?;

    if config.input.files.is_empty() {
        // No arguments - show help
        println!("Race Log Analyzer - No input specified");
        println!("\nQuick Start:");
        println!("  race-log-cli thread_incr.log");
        println!("  race-log-cli thread_incr.log --chart");
        println!("\nWith a configuration file:");
        println!("  race-log-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    }

    run(&config)
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    config.input.files.extend(args.inputs.iter().cloned());

    if let Some(variable) = &args.variable {
        config.parser.variable_name = variable.clone();
    }
    if !args.threads.is_empty() {
        config.parser.thread_filter = Some(args.threads.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(dir) = &args.output {
        config.output.output_dir = Some(dir.clone());
    }
    if let Some(max) = args.max_details {
        config.output.max_details = Some(max);
    }
    if args.chart {
        config.chart.enabled = true;
    }
    if let Some(width) = args.chart_width {
        config.chart.width = width;
    }
    if let Some(height) = args.chart_height {
        config.chart.height = height;
    }

    config.validate()?;
    log::debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// Analyze every input file and emit its report.
///
/// Files are analyzed in parallel; reports are emitted in input order. A file
/// that fails to analyze or to emit does not stop the others, but makes the
/// run fail at the end.
fn run(config: &AppConfig) -> Result<()> {
    let stems = report::output_stems(&config.input.files)?;

    if let Some(dir) = &config.output.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    }

    let outcomes: Vec<_> = config
        .input
        .files
        .par_iter()
        .map(|path| analyze_file(path, config))
        .collect();

    let multiple = config.input.files.len() > 1;
    let mut failures = 0;

    for ((path, stem), outcome) in config.input.files.iter().zip(&stems).zip(outcomes) {
        match outcome {
            Ok(analysis) => {
                if let Err(e) = emit(path, stem, &analysis, config, multiple) {
                    failures += 1;
                    log::error!("{:?}: {:#}", path, e);
                }
            }
            Err(AnalyzerError::EmptyInput) => {
                failures += 1;
                if notices_to_stderr(config.output.format) {
                    eprintln!("No valid entries found in {:?}.", path);
                } else {
                    println!("No valid entries found in {:?}.", path);
                }
            }
            Err(e) => {
                failures += 1;
                log::error!("{:?}: {}", path, e);
            }
        }
    }

    if failures > 0 {
        bail!(
            "{} of {} input file(s) could not be analyzed or reported",
            failures,
            config.input.files.len()
        );
    }

    Ok(())
}

fn analyze_file(path: &Path, config: &AppConfig) -> race_log_analyzer::Result<FileAnalysis> {
    let events = race_log_analyzer::parse_file(path, &config.parser)?;
    log::info!("{:?}: {} events", path, events.len());

    let report = race_log_analyzer::analyze(&events)?;
    Ok(FileAnalysis { events, report })
}

/// Print or write the report (and chart, if enabled) for one file
fn emit(
    path: &Path,
    stem: &str,
    analysis: &FileAnalysis,
    config: &AppConfig,
    multiple: bool,
) -> Result<()> {
    let body = report::render(path, &analysis.report, &config.output)?;
    let chart = config.chart.enabled.then(|| {
        chart::render(
            &analysis.events,
            &analysis.report,
            config.chart.width,
            config.chart.height,
        )
    });

    match &config.output.output_dir {
        Some(dir) => {
            let report_path = report::report_path(dir, stem, config.output.format);
            fs::write(&report_path, &body)
                .with_context(|| format!("Failed to write report: {:?}", report_path))?;
            log::info!("Report written to {:?}", report_path);

            if let Some(chart) = chart {
                let chart_path = report::chart_path(dir, stem);
                fs::write(&chart_path, chart + "\n")
                    .with_context(|| format!("Failed to write chart: {:?}", chart_path))?;
                log::info!("Chart written to {:?}", chart_path);
            }
        }
        None => {
            if multiple && config.output.format == OutputFormat::Txt {
                println!("── {} ──", path.display());
            }
            print!("{}", body);
            if config.output.format == OutputFormat::Json {
                println!();
            }

            if let Some(chart) = chart {
                if notices_to_stderr(config.output.format) {
                    eprintln!("{}", chart);
                } else {
                    println!("\n{}", chart);
                }
            }
        }
    }

    Ok(())
}

/// Anything besides the report goes to stderr when stdout must stay valid JSON
fn notices_to_stderr(format: OutputFormat) -> bool {
    format == OutputFormat::Json
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
