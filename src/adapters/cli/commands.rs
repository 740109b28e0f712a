//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the reversion backtester.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::adapters::csv_data::CsvPriceSource;
use crate::adapters::export::{write_report_csv, write_report_json};
use crate::application::{BacktestOrchestrator, BacktestReport};
use crate::config::load_config;
use crate::ports::PriceSource;
use crate::strategy::{BacktestParams, CapitalMode, ValidationMode};

/// Reversion - Streaming Z-Score Mean Reversion Backtester
#[derive(Parser, Debug)]
#[command(
    name = "reversion",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Streaming Z-Score Mean Reversion Backtester",
    long_about = "Runs a single-pass mean reversion backtest over price columns of a CSV file. \
                  Running mean and variance are updated one price at a time, positions act \
                  with a one-step lag, and capital compounds on price-normalised profit."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run backtests described by a config file
    Run(RunCmd),

    /// Backtest a CSV file directly from the command line
    Backtest(BacktestCmd),

    /// List the columns of a CSV file
    Columns(ColumnsCmd),
}

/// Parameter overrides shared by `run` and `backtest`
#[derive(Args, Debug, Default, Clone)]
pub struct ParamOverrides {
    /// Initial capital (first capital curve element)
    #[arg(long, value_name = "AMOUNT")]
    pub capital: Option<f64>,

    /// Z-score magnitude below the mean that opens a long
    #[arg(long, value_name = "Z")]
    pub buy_threshold: Option<f64>,

    /// Z-score magnitude above the mean that opens a short
    #[arg(long, value_name = "Z")]
    pub sell_threshold: Option<f64>,

    /// Cost per unit of position change
    #[arg(long, value_name = "COST")]
    pub trading_cost: Option<f64>,

    /// Compound from the initial capital instead of 1.0
    #[arg(long)]
    pub scaled: bool,

    /// Reject NaN/infinite prices
    #[arg(long)]
    pub strict: bool,
}

impl ParamOverrides {
    pub fn apply(&self, mut params: BacktestParams) -> BacktestParams {
        if let Some(c) = self.capital {
            params.initial_capital = c;
        }
        if let Some(b) = self.buy_threshold {
            params.buy_threshold = b;
        }
        if let Some(s) = self.sell_threshold {
            params.sell_threshold = s;
        }
        if let Some(t) = self.trading_cost {
            params.trading_cost = t;
        }
        if self.scaled {
            params.capital_mode = CapitalMode::Scaled;
        }
        if self.strict {
            params.validation = ValidationMode::Strict;
        }
        params
    }
}

/// Config-driven run
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/backtest.toml")]
    pub config: PathBuf,

    /// Override the configured price columns (repeatable)
    #[arg(long = "column", value_name = "NAME")]
    pub columns: Vec<String>,

    #[command(flatten)]
    pub overrides: ParamOverrides,

    /// Rows to print per column
    #[arg(long, value_name = "ROWS")]
    pub preview_rows: Option<usize>,

    /// Export report rows to CSV
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Export full report to JSON
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,
}

/// Ad-hoc backtest of one CSV file
#[derive(Parser, Debug)]
pub struct BacktestCmd {
    /// CSV file with a header row
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Price column(s) to backtest (repeatable)
    #[arg(short, long = "column", value_name = "NAME", default_value = "Close")]
    pub columns: Vec<String>,

    #[command(flatten)]
    pub overrides: ParamOverrides,

    /// Rows to print per column
    #[arg(long, value_name = "ROWS", default_value = "20")]
    pub preview_rows: usize,

    /// Export report rows to CSV
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Export full report to JSON
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,
}

/// List CSV columns
#[derive(Parser, Debug)]
pub struct ColumnsCmd {
    /// CSV file with a header row
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Treat blank cells as non-numeric (as `backtest --strict` does)
    #[arg(long)]
    pub strict: bool,
}

/// Where and how to emit finished reports
#[derive(Debug, Clone, Default)]
struct OutputPlan {
    preview_rows: usize,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    match app.command {
        Command::Run(cmd) => run_command(cmd).await,
        Command::Backtest(cmd) => backtest_command(cmd).await,
        Command::Columns(cmd) => columns_command(cmd).await,
    }
}

/// Handle run command
async fn run_command(cmd: RunCmd) -> Result<()> {
    tracing::info!("Config: {}", cmd.config.display());

    let config = load_config(&cmd.config)
        .with_context(|| format!("Failed to load configuration from {}", cmd.config.display()))?;

    let params = cmd.overrides.apply(BacktestParams::from(&config));
    let columns = if cmd.columns.is_empty() {
        config.data.price_columns.clone()
    } else {
        cmd.columns
    };

    let plan = OutputPlan {
        preview_rows: cmd.preview_rows.unwrap_or(config.output.preview_rows),
        csv: cmd.export_csv.or_else(|| config.output.csv_path.as_ref().map(PathBuf::from)),
        json: cmd.export_json.or_else(|| config.output.json_path.as_ref().map(PathBuf::from)),
    };

    let source = CsvPriceSource::new(config.data.file_path()).with_validation(params.validation);
    run_backtests(source, params, &columns, &plan).await
}

/// Handle backtest command
async fn backtest_command(cmd: BacktestCmd) -> Result<()> {
    let params = cmd.overrides.apply(BacktestParams::default());
    let plan = OutputPlan {
        preview_rows: cmd.preview_rows,
        csv: cmd.export_csv,
        json: cmd.export_json,
    };
    let source = CsvPriceSource::new(shellexpand::tilde(&cmd.file.to_string_lossy()).into_owned())
        .with_validation(params.validation);
    run_backtests(source, params, &cmd.columns, &plan).await
}

/// Handle columns command
async fn columns_command(cmd: ColumnsCmd) -> Result<()> {
    let validation = if cmd.strict {
        ValidationMode::Strict
    } else {
        ValidationMode::Permissive
    };
    let source = CsvPriceSource::new(shellexpand::tilde(&cmd.file.to_string_lossy()).into_owned())
        .with_validation(validation);
    let columns = source
        .columns()
        .await
        .with_context(|| format!("Failed to read {}", cmd.file.display()))?;

    println!("Columns in {}:", source.name());
    for column in columns {
        let kind = if column.numeric { "numeric" } else { "text" };
        println!("  {:<24} {}", column.name, kind);
    }
    Ok(())
}

async fn run_backtests(
    source: CsvPriceSource,
    params: BacktestParams,
    columns: &[String],
    plan: &OutputPlan,
) -> Result<()> {
    params.validate().context("Invalid backtest parameters")?;
    tracing::info!(
        "Backtesting {} column(s) of {} | buy {} | sell {} | cost {} | {:?}",
        columns.len(),
        source.path().display(),
        params.buy_threshold,
        params.sell_threshold,
        params.trading_cost,
        params.capital_mode
    );

    let orchestrator = BacktestOrchestrator::new(source, params);
    let runs = orchestrator.run_columns(columns).await;
    let multi = runs.len() > 1;

    let mut failed = Vec::new();
    for run in runs {
        match run.result {
            Ok(report) => emit_report(&report, plan, multi)?,
            Err(e) => {
                eprintln!("✗ {}: {}", run.column, e);
                failed.push(run.column);
            }
        }
    }

    if !failed.is_empty() {
        bail!("Backtest failed for column(s): {}", failed.join(", "));
    }
    Ok(())
}

fn emit_report(report: &BacktestReport, plan: &OutputPlan, multi: bool) -> Result<()> {
    println!("{}", report.render_preview(plan.preview_rows));

    if let Some(ref path) = plan.csv {
        let path = path_for_column(path, &report.column, multi);
        write_report_csv(&path, report)
            .with_context(|| format!("Failed to export CSV to {}", path.display()))?;
        println!("✓ CSV saved as {}", path.display());
    }

    if let Some(ref path) = plan.json {
        let path = path_for_column(path, &report.column, multi);
        write_report_json(&path, report)
            .with_context(|| format!("Failed to export JSON to {}", path.display()))?;
        println!("✓ JSON saved as {}", path.display());
    }
    Ok(())
}

/// `reports/out.csv` becomes `reports/out_Close.csv` when several columns share one path
fn path_for_column(path: &Path, column: &str, multi: bool) -> PathBuf {
    if !multi {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, column, ext.to_string_lossy()),
        None => format!("{}_{}", stem, column),
    };
    path.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backtest_command() {
        let app = CliApp::parse_from([
            "reversion",
            "backtest",
            "prices.csv",
            "--column",
            "Close",
            "--column",
            "Open",
            "--trading-cost",
            "0.1",
            "--scaled",
        ]);
        match app.command {
            Command::Backtest(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("prices.csv"));
                assert_eq!(cmd.columns, vec!["Close", "Open"]);
                assert_eq!(cmd.preview_rows, 20);
                let params = cmd.overrides.apply(BacktestParams::default());
                assert_eq!(params.trading_cost, 0.1);
                assert_eq!(params.capital_mode, CapitalMode::Scaled);
                assert_eq!(params.validation, ValidationMode::Permissive);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_backtest_default_column() {
        let app = CliApp::parse_from(["reversion", "-v", "backtest", "prices.csv"]);
        assert!(app.verbose);
        match app.command {
            Command::Backtest(cmd) => assert_eq!(cmd.columns, vec!["Close"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_run_command_defaults() {
        let app = CliApp::parse_from(["reversion", "run", "--strict"]);
        match app.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.config, PathBuf::from("config/backtest.toml"));
                assert!(cmd.columns.is_empty());
                assert!(cmd.preview_rows.is_none());
                let params = cmd.overrides.apply(BacktestParams::default());
                assert_eq!(params.validation, ValidationMode::Strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_columns_command() {
        let app = CliApp::parse_from(["reversion", "columns", "prices.csv", "--strict"]);
        match app.command {
            Command::Columns(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("prices.csv"));
                assert!(cmd.strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_leave_unset_fields() {
        let overrides = ParamOverrides {
            buy_threshold: Some(2.0),
            ..Default::default()
        };
        let params = overrides.apply(BacktestParams::default());
        assert_eq!(params.buy_threshold, 2.0);
        assert_eq!(params.sell_threshold, 1.0);
        assert_eq!(params.initial_capital, 100.0);
    }

    #[test]
    fn test_path_for_column() {
        let path = Path::new("reports/out.csv");
        assert_eq!(path_for_column(path, "Close", false), PathBuf::from("reports/out.csv"));
        assert_eq!(path_for_column(path, "Close", true), PathBuf::from("reports/out_Close.csv"));
        assert_eq!(
            path_for_column(Path::new("out"), "Open", true),
            PathBuf::from("out_Open")
        );
    }
}
