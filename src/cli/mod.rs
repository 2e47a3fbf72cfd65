//! kolosal-prep CLI Module
//!
//! Command-line interface for cleaning and inspecting delimited data files.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::preprocessing::{
    describe, AllMissingPolicy, CleaningConfig, CleaningReport, ConstantColumnPolicy, Preprocessor,
};
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{:.4}", x)).unwrap_or_else(|| "-".to_string())
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kolosal-prep")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clean tabular data: impute, replace outliers, standardize")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a data file
    Clean {
        /// Input data file (CSV or TSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Zero-variance column handling (zero, fail)
        #[arg(long)]
        constant_column: Option<String>,

        /// Leave columns without any values untouched instead of failing
        #[arg(long)]
        skip_all_missing: bool,

        /// Print per-column statistics as JSON
        #[arg(long)]
        report: bool,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Configuration ─────────────────────────────────────────────────────────────

/// Build the cleaning configuration from an optional file plus flag overrides
pub fn build_config(
    config_path: Option<&Path>,
    constant_column: Option<&str>,
    skip_all_missing: bool,
) -> anyhow::Result<CleaningConfig> {
    let mut config = match config_path {
        Some(path) => CleaningConfig::from_json_file(path)?,
        None => CleaningConfig::default(),
    };

    if let Some(policy) = constant_column {
        config = config.with_constant_column(match policy {
            "zero" => ConstantColumnPolicy::Zero,
            "fail" => ConstantColumnPolicy::Fail,
            other => anyhow::bail!("Unknown constant column policy: {} (expected zero or fail)", other),
        });
    }

    if skip_all_missing {
        config = config.with_all_missing(AllMissingPolicy::Skip);
    }

    Ok(config)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_clean(
    data_path: &Path,
    output_path: &Path,
    config: CleaningConfig,
    print_report: bool,
) -> anyhow::Result<CleaningReport> {
    section("Clean");

    step_run("Loading data");
    let mut df = DataLoader::new().load_auto(data_path)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));

    step_run("Processing");
    let start = Instant::now();
    let report = Preprocessor::with_config(config).process_in_place(&mut df)?;
    step_done(&format!("{:?}", start.elapsed()));

    step_run(&format!("Saving → {}", output_path.display()));
    DataSaver::save_csv(&mut df, output_path)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));

    println!();
    println!(
        "  {:<20} {:>8} {:>10} {:>10} {:>10}",
        muted("Column"), muted("Filled"), muted("Outliers"), muted("Mean"), muted("Std")
    );
    println!("  {}", dim(&"─".repeat(62)));
    for col in &report.numeric {
        println!(
            "  {:<20} {:>8} {:>10} {:>10} {:>10}",
            col.name,
            col.missing_filled,
            col.outliers_replaced,
            fmt_opt(col.scale_mean),
            fmt_opt(col.scale_std),
        );
    }
    for col in &report.categorical {
        println!(
            "  {:<20} {:>8} {:>10} {:>10}",
            col.name,
            col.missing_filled,
            "-",
            col.mode.as_deref().unwrap_or("-"),
        );
    }

    if print_report {
        println!();
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    println!();
    Ok(report)
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let df = DataLoader::new().load_auto(data_path)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!("  {:<12} {:.2} MB", muted("Memory"), df.estimated_size() as f64 / 1024.0 / 1024.0);
    println!();

    println!(
        "  {:<20} {:<12} {:<12} {:>6} {:>8}",
        muted("Column"), muted("Kind"), muted("Type"), muted("Nulls"), muted("Unique")
    );
    println!("  {}", dim(&"─".repeat(62)));

    for stats in describe(&df)? {
        let kind = stats
            .kind
            .map(|k| format!("{:?}", k))
            .unwrap_or_else(|| "unsupported".to_string());
        println!(
            "  {:<20} {:<12} {:<12} {:>6} {:>8}",
            stats.name,
            kind,
            stats.dtype.truecolor(140, 140, 140),
            stats.null_count,
            stats.unique_count.map(|u| u.to_string()).unwrap_or_else(|| "-".to_string()),
        );
    }

    println!();
    Ok(())
}
