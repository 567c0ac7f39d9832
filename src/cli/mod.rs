//! Kolosal kNN CLI Module
//!
//! Command-line interface for cross-validating, classifying and timing.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ExperimentConfig;
use crate::data::{Attribute, DataReader, ReaderConfig, Record};
use crate::metrics::ConfusionMatrix;
use crate::training::CrossValidator;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

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

fn kv(key: &str, val: &str) {
    println!("  {:<16} {}", muted(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kolosal-knn")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stratified k-fold cross-validation for a mixed-type KNN classifier")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Input and classifier options shared by every command
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Delimited data file
    #[arg(short, long)]
    pub data: PathBuf,

    /// JSON experiment config; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Label column (first column = 1)
    #[arg(short, long)]
    pub label: Option<usize>,

    /// Field delimiter
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Row where the data begins (first line = 1)
    #[arg(long)]
    pub begin_row: Option<usize>,

    /// Columns to ignore (first column = 1), comma separated
    #[arg(long, value_delimiter = ',')]
    pub ignore: Vec<usize>,

    /// Number of neighbors per vote
    #[arg(short = 'k', long)]
    pub neighbors: Option<usize>,

    /// Number of cross-validation folds
    #[arg(short, long)]
    pub folds: Option<usize>,
}

impl DataArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn experiment(&self) -> crate::Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_file(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(label) = self.label {
            config.reader.label_column = Some(label);
        }
        if let Some(delimiter) = self.delimiter {
            config.reader.delimiter = delimiter;
        }
        if let Some(row) = self.begin_row {
            config.reader.data_begin_row = row;
        }
        if !self.ignore.is_empty() {
            config.reader.ignored_columns = self.ignore.clone();
        }
        if let Some(k) = self.neighbors {
            config.knn.n_neighbors = k;
        }
        if let Some(folds) = self.folds {
            config.knn.n_folds = folds;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run k-fold cross-validation and print the confusion matrix
    Evaluate {
        #[command(flatten)]
        args: DataArgs,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a single delimited row against the whole dataset
    Classify {
        #[command(flatten)]
        args: DataArgs,

        /// Row to classify, label position included (its value is ignored)
        #[arg(short, long)]
        query: String,
    },

    /// Measure the time spent classifying one record repeatedly
    Time {
        #[command(flatten)]
        args: DataArgs,

        /// Number of classifications
        #[arg(short, long, default_value = "100000")]
        iterations: usize,
    },

    /// Show the categories found in a data file
    Info {
        #[command(flatten)]
        args: DataArgs,
    },
}

// ─── Shared steps ──────────────────────────────────────────────────────────────

/// Read the data file described by `config` and train a cross-validator on it
pub fn load_validator(path: &Path, config: &ExperimentConfig, quiet: bool) -> crate::Result<CrossValidator> {
    let reader = DataReader::new(config.reader.clone());

    let start = Instant::now();
    let records = reader.read_path(path)?;
    let n_records = records.len();

    let mut cv = CrossValidator::new(config.knn.clone());
    cv.train(records, reader.label_index()?);
    let n_categories = cv.index().map_or(0, |index| index.len());

    if !quiet {
        step_ok(&format!(
            "Read {} rows into {} categories in {:?}",
            n_records,
            n_categories,
            start.elapsed()
        ));
    }
    Ok(cv)
}

/// Parse one row with the same column rules as the data file
pub fn parse_query(query: &str, reader: &ReaderConfig) -> crate::Result<Record> {
    let reader = DataReader::new(ReaderConfig {
        data_begin_row: 1,
        ..reader.clone()
    });
    reader
        .read_from(query.as_bytes())?
        .into_iter()
        .next()
        .ok_or_else(|| crate::KolosalError::DataError("query row is empty".to_string()))
}

/// Plain-text confusion matrix: rows are the reference, columns the prediction
pub fn render_matrix(matrix: &ConfusionMatrix) -> String {
    let labels: Vec<String> = matrix.categories().iter().map(Attribute::to_string).collect();
    let counts = matrix.counts();
    let width = labels
        .iter()
        .map(String::len)
        .chain(counts.iter().map(|c| c.to_string().len()))
        .max()
        .unwrap_or(1)
        .max(3);

    let mut out = String::new();
    out.push_str(&format!("{:>w$} ", "", w = width));
    for label in &labels {
        out.push_str(&format!(" {:>w$}", label, w = width));
    }
    out.push('\n');

    for (i, label) in labels.iter().enumerate() {
        out.push_str(&format!("{:>w$} ", label, w = width));
        for count in counts.row(i) {
            out.push_str(&format!(" {:>w$}", count, w = width));
        }
        out.push('\n');
    }
    out
}

/// Accuracy as a percentage with two decimals, or `n/a` for an empty matrix
pub fn format_accuracy(accuracy: Option<f64>) -> String {
    match accuracy {
        Some(a) => format!("{:.2}%", a * 100.0),
        None => "n/a".to_string(),
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_evaluate(args: &DataArgs, json: bool) -> anyhow::Result<()> {
    let config = args.experiment()?;
    if json {
        let cv = load_validator(&args.data, &config, true)?;
        let results = cv.evaluate()?;
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    section("Evaluate");
    let cv = load_validator(&args.data, &config, false)?;

    step_run(&format!("Running {}-fold cross-validation", config.knn.n_folds));
    let start = Instant::now();
    let results = cv.evaluate()?;
    step_done(&format!("{:?}", start.elapsed()));

    section("Confusion matrix");
    for line in render_matrix(&results.matrix).lines() {
        println!("  {}", line);
    }
    println!("  {}", dim(&"─".repeat(56)));
    println!("  {}", muted("Vertical axis: reference, horizontal axis: prediction"));
    println!();
    kv("Neighbors", &config.knn.n_neighbors.to_string());
    kv("Folds", &results.n_folds.to_string());
    kv("Classified", &results.matrix.total().to_string());
    println!(
        "  {:<16} {}",
        muted("Accuracy"),
        format_accuracy(results.accuracy).white().bold()
    );
    println!();
    Ok(())
}

pub fn cmd_classify(args: &DataArgs, query: &str) -> anyhow::Result<()> {
    let config = args.experiment()?;
    section("Classify");
    let cv = load_validator(&args.data, &config, false)?;

    let record = parse_query(query, &config.reader)?;
    let predicted = cv.classify_one(&record)?;

    println!();
    println!("  {:<16} {}", muted("Prediction"), predicted.to_string().white().bold());
    println!();
    Ok(())
}

pub fn cmd_time(args: &DataArgs, iterations: usize) -> anyhow::Result<()> {
    let config = args.experiment()?;
    section("Time");
    let cv = load_validator(&args.data, &config, false)?;

    step_run("Measuring time");
    let elapsed = cv.measure_classification(iterations)?;
    step_done("");

    println!();
    kv("Classified", &iterations.to_string());
    kv("Total", &format!("{:.3?}", elapsed));
    if iterations > 0 {
        kv("Per record", &format!("{:.3?}", elapsed.div_f64(iterations as f64)));
    }
    println!();
    Ok(())
}

pub fn cmd_info(args: &DataArgs) -> anyhow::Result<()> {
    let config = args.experiment()?;
    section("Data Info");
    let cv = load_validator(&args.data, &config, false)?;

    println!();
    if let Some(index) = cv.index() {
        kv("Records", &index.total_records().to_string());
        kv("Label index", &index.label_index().to_string());
        println!();
        for category in index.categories() {
            println!(
                "  {:<24} {}",
                category.label().to_string().white(),
                muted(&category.len().to_string())
            );
        }
    }
    println!();
    Ok(())
}
