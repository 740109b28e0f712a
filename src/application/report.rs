//! Backtest Report
//!
//! Turns a [`BacktestOutcome`] into the tabular view the CLI prints and the
//! exporters write, plus a handful of summary statistics.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fmt::Write as _;

use crate::domain::Position;
use crate::strategy::{BacktestOutcome, BacktestParams};

/// One row of the report table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub index: usize,
    pub price: f64,
    pub z_score: f64,
    pub position: Position,
    pub profit: f64,
    pub cumulative_profit: f64,
    /// Capital going into this row: `capital_curve[index]`
    pub capital: f64,
}

/// Aggregate statistics over a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub steps: usize,
    pub total_profit: f64,
    pub final_capital: f64,
    /// Number of steps where the decided position differs from the previous one
    pub position_changes: usize,
    pub long_steps: usize,
    pub short_steps: usize,
    pub flat_steps: usize,
    pub winning_steps: usize,
    pub losing_steps: usize,
    pub mean_profit: f64,
    pub profit_std_dev: f64,
    /// Largest peak-to-trough fall of the compounded curve, as a fraction
    pub max_drawdown: f64,
}

/// Report for a single price column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub source: String,
    pub column: String,
    pub params: BacktestParams,
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
    pub capital_curve: Vec<f64>,
}

impl BacktestReport {
    pub fn new(source: &str, column: &str, params: &BacktestParams, outcome: &BacktestOutcome) -> Self {
        Self {
            source: source.to_string(),
            column: column.to_string(),
            params: params.clone(),
            summary: summarize(outcome),
            rows: build_rows(outcome),
            capital_curve: outcome.capital_curve.clone(),
        }
    }

    /// Render the first `limit` rows and the totals as a plain-text table
    pub fn render_preview(&self, limit: usize) -> String {
        let mut out = String::new();
        let shown = limit.min(self.rows.len());

        let _ = writeln!(
            out,
            "=== {} [{}] - strategy profits (first {} rows) ===",
            self.source, self.column, shown
        );
        let _ = writeln!(
            out,
            "{:>6} {:>12} {:>9} {:>6} {:>12} {:>12} {:>14}",
            "index", "price", "z", "pos", "profit", "cum_profit", "capital"
        );
        for row in self.rows.iter().take(shown) {
            let _ = writeln!(
                out,
                "{:>6} {:>12.4} {:>9.4} {:>6} {:>12.4} {:>12.4} {:>14.6}",
                row.index,
                row.price,
                row.z_score,
                row.position,
                row.profit,
                row.cumulative_profit,
                row.capital
            );
        }

        let s = &self.summary;
        let _ = writeln!(out, "Total profit: {:.4}", s.total_profit);
        let _ = writeln!(out, "Final capital: {:.6}", s.final_capital);
        let _ = writeln!(
            out,
            "Steps: {} (long {}, short {}, flat {}), position changes: {}",
            s.steps, s.long_steps, s.short_steps, s.flat_steps, s.position_changes
        );
        let _ = writeln!(
            out,
            "Winning/losing steps: {}/{}, mean profit {:.4}, std {:.4}, max drawdown {:.2}%",
            s.winning_steps,
            s.losing_steps,
            s.mean_profit,
            s.profit_std_dev,
            s.max_drawdown * 100.0
        );
        out
    }
}

fn build_rows(outcome: &BacktestOutcome) -> Vec<ReportRow> {
    let mut cumulative = 0.0;
    outcome
        .steps
        .iter()
        .map(|step| {
            cumulative += step.profit;
            ReportRow {
                index: step.index,
                price: step.price,
                z_score: step.z_score,
                position: step.position,
                profit: step.profit,
                cumulative_profit: cumulative,
                capital: outcome.capital_curve[step.index],
            }
        })
        .collect()
}

/// Compute summary statistics for an outcome
pub fn summarize(outcome: &BacktestOutcome) -> ReportSummary {
    let mut position_changes = 0;
    let mut prev = Position::Flat;
    let (mut long_steps, mut short_steps, mut flat_steps) = (0, 0, 0);

    for step in &outcome.steps {
        if step.position != prev {
            position_changes += 1;
        }
        prev = step.position;
        match step.position {
            Position::Long => long_steps += 1,
            Position::Short => short_steps += 1,
            Position::Flat => flat_steps += 1,
        }
    }

    let winning_steps = outcome.profits.iter().filter(|p| **p > 0.0).count();
    let losing_steps = outcome.profits.iter().filter(|p| **p < 0.0).count();

    ReportSummary {
        steps: outcome.steps.len(),
        total_profit: outcome.total_profit,
        final_capital: outcome.final_capital(),
        position_changes,
        long_steps,
        short_steps,
        flat_steps,
        winning_steps,
        losing_steps,
        mean_profit: outcome.profits.iter().mean(),
        profit_std_dev: outcome.profits.iter().population_std_dev(),
        // Entry 0 may be on a different scale than the compounded values
        max_drawdown: max_drawdown(outcome.capital_curve.get(1..).unwrap_or(&[])),
    }
}

/// Largest relative fall from a running peak
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in curve {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}
