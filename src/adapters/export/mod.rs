//! Report Exporters
//!
//! Writes a [`BacktestReport`] to disk:
//! - CSV: one line per price with profit, cumulative profit and capital
//! - JSON: parameters, summary, rows and the full capital curve

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

use crate::application::report::BacktestReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct CsvLine<'a> {
    index: usize,
    price: f64,
    z_score: f64,
    position: &'a str,
    profit: f64,
    cumulative_profit: f64,
    capital: f64,
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a BacktestReport,
}

fn create_file(path: &Path) -> Result<File, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    File::create(path).map_err(io_err)
}

/// Write the report rows as CSV
pub fn write_report_csv(path: &Path, report: &BacktestReport) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(create_file(path)?));
    for row in &report.rows {
        let position = row.position.to_string();
        writer.serialize(CsvLine {
            index: row.index,
            price: row.price,
            z_score: row.z_score,
            position: &position,
            profit: row.profit,
            cumulative_profit: row.cumulative_profit,
            capital: row.capital,
        })?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!("Report CSV written to {}", path.display());
    Ok(())
}

/// Write the whole report, stamped with the current time, as pretty JSON
pub fn write_report_json(path: &Path, report: &BacktestReport) -> Result<(), ExportError> {
    let envelope = JsonEnvelope {
        generated_at: Utc::now(),
        report,
    };
    serde_json::to_writer_pretty(BufWriter::new(create_file(path)?), &envelope)?;
    tracing::info!("Report JSON written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{BacktestParams, StreamingMeanReversionBacktester};
    use tempfile::tempdir;

    fn report() -> BacktestReport {
        let params = BacktestParams::default();
        let outcome = StreamingMeanReversionBacktester::new(params.clone())
            .run(&[10.0, 12.0, 8.0, 8.0, 15.0])
            .unwrap();
        BacktestReport::new("TSLA.csv", "Close", &params, &outcome)
    }

    #[test]
    fn test_write_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("report.csv");
        write_report_csv(&path, &report()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("index,price,z_score,position,profit,cumulative_profit,capital")
        );
        assert_eq!(content.lines().count(), 6);
        assert!(content.lines().nth(2).unwrap().contains(",Short,"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&path, &report()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.get("generated_at").is_some());
        assert_eq!(value["column"], "Close");
        assert_eq!(value["summary"]["total_profit"], 11.0);
        assert_eq!(value["capital_curve"].as_array().unwrap().len(), 6);
        assert_eq!(value["params"]["capital_mode"], "seed_only");
        assert_eq!(value["rows"][1]["position"], "short");
    }
}
