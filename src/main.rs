//! dirsizes - per-directory size totals, largest first.
//!
//! Usage:
//!   dirsizes [OPTIONS] <ROOT_DIR>     Scan and list the largest directories
//!   dirsizes --help                   Show help

use std::path::PathBuf;
use std::thread::JoinHandle;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;

use dirsizes_core::SizeUnit;
use dirsizes_report::{DirFilter, Report, ReportBuilder, ReportConfig, ReportRow, ScanReport};
use dirsizes_scan::{DirScanner, ScanConfig};

#[derive(Parser)]
#[command(
    name = "dirsizes",
    version,
    about = "Show the largest directories under a path",
    long_about = "dirsizes scans a directory tree once, totals size, file count and \
                  read errors for every directory, and lists the largest ones.\n\n\
                  Directories and files that cannot be read are counted, never fatal."
)]
struct Cli {
    /// Directory to scan
    root_dir: PathBuf,

    /// Unit sizes are displayed in (bytes, KiB, MiB, GiB, TiB)
    #[arg(short = 'u', long, default_value = "MiB", value_parser = SizeUnit::from_selector)]
    size_unit: SizeUnit,

    /// Number of directories and of unreadable paths to show
    #[arg(short = 'n', long = "results", default_value = "100")]
    results: usize,

    /// Keep the root path as given instead of resolving it
    #[arg(long)]
    relative: bool,

    /// Decimal places in displayed sizes
    #[arg(short, long, default_value = "1")]
    decimals: usize,

    /// Hide directories smaller than this many `--min-size-unit`s
    #[arg(long, default_value = "1")]
    min_size: u64,

    /// Unit of `--min-size`
    #[arg(long, default_value = "MiB", value_parser = SizeUnit::from_selector)]
    min_size_unit: SizeUnit,

    /// Show directories of any size
    #[arg(short, long, conflicts_with = "min_size")]
    all: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Traversal threads (1 = serial, 0 = one per core)
    #[arg(short = 'j', long, default_value = "1")]
    threads: usize,

    /// Log scan phases and progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let scan_config = ScanConfig::builder()
        .root(cli.root_dir.clone())
        .absolute_root(!cli.relative)
        .threads(cli.threads)
        .build()
        .context("Invalid scan configuration")?;

    let filter = if cli.all {
        DirFilter::AcceptAll
    } else {
        DirFilter::at_least(cli.min_size_unit, cli.min_size)
    };
    let report_config = ReportConfig::builder()
        .size_unit(cli.size_unit)
        .decimal_places(cli.decimals)
        .max_results(cli.results)
        .filter(filter)
        .build()
        .context("Invalid report configuration")?;

    eprintln!("Scanning {}...", cli.root_dir.display());

    let scanner = DirScanner::with_span(info_span!("dirsizes", root = %cli.root_dir.display()));
    let progress = cli.verbose.then(|| spawn_progress_logger(&scanner));
    let tree = scanner
        .scan(&scan_config)
        .with_context(|| format!("Cannot scan {}", cli.root_dir.display()))?;

    // Dropping the scanner closes the progress channel.
    drop(scanner);
    if let Some(handle) = progress {
        let _ = handle.join();
    }

    let scan = ScanReport::from_tree(tree);
    let report = ReportBuilder::with_config(report_config).build(&scan);

    match cli.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "error" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

/// Log progress snapshots until the scanner goes away.
fn spawn_progress_logger(scanner: &DirScanner) -> JoinHandle<()> {
    let mut rx = scanner.subscribe();
    std::thread::spawn(move || {
        while let Ok(progress) = rx.blocking_recv() {
            info!(
                files = progress.files_scanned,
                dirs = progress.dirs_scanned,
                size = %format_size(progress.bytes_scanned),
                errors = progress.errors_count,
                "scan progress"
            );
        }
    })
}

/// Print the summary, the directory table, and the error list.
fn print_report(report: &Report) {
    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} - {}",
        report.root_path.display(),
        format_size(report.total_size)
    );
    println!(
        " {} files, {} unreadable directories",
        report.total_files, report.total_errors
    );
    println!(" Scanned in {:.2}s", report.scan_duration.as_secs_f64());
    println!("{}", "─".repeat(60));
    println!();

    if !report.rows.is_empty() {
        println!("Dir List");
        print_table(&report.rows);
    }

    if !report.errors.is_empty() {
        println!();
        println!("Error List");
        println!("filepath");
        for path in &report.errors {
            println!("{}", path.display());
        }
        if report.hidden_errors() > 0 {
            println!("... and {} more", report.hidden_errors());
        }
    }
}

/// Print rows as an aligned table: paths left, numbers right.
fn print_table(rows: &[ReportRow]) {
    let cells: Vec<[String; 6]> = rows.iter().map(ReportRow::cells).collect();

    let mut widths = ReportRow::COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", table_line(&ReportRow::COLUMNS.map(String::from), &widths));
    println!("{}", widths.map(|w| "-".repeat(w)).join("  "));
    for row in &cells {
        println!("{}", table_line(row, &widths));
    }
}

fn table_line(cells: &[String; 6], widths: &[usize; 6]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            if i == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
