//! Backtest Orchestrator
//!
//! Loads one price series per requested column and runs an independent
//! backtest on each. Runs share nothing, so every column goes to its own
//! blocking task and they proceed in parallel. Results come back in the
//! order the columns were requested.

use std::sync::Arc;
use thiserror::Error;

use crate::application::report::BacktestReport;
use crate::domain::BacktestError;
use crate::ports::{MarketDataError, PriceSource};
use crate::strategy::{run_backtest, BacktestParams};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
    #[error("Backtest error: {0}")]
    Backtest(#[from] BacktestError),
    #[error("Backtest task failed: {0}")]
    Task(String),
}

/// Outcome of one column's run
#[derive(Debug)]
pub struct ColumnRun {
    pub column: String,
    pub result: Result<BacktestReport, OrchestratorError>,
}

impl ColumnRun {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Coordinates data loading and backtest runs
pub struct BacktestOrchestrator<S: PriceSource + 'static> {
    source: Arc<S>,
    params: BacktestParams,
}

impl<S: PriceSource + 'static> Clone for BacktestOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            params: self.params.clone(),
        }
    }
}

impl<S: PriceSource + 'static> BacktestOrchestrator<S> {
    pub fn new(source: S, params: BacktestParams) -> Self {
        Self {
            source: Arc::new(source),
            params,
        }
    }

    pub fn params(&self) -> &BacktestParams {
        &self.params
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run one column end to end
    pub async fn run_column(&self, column: &str) -> Result<BacktestReport, OrchestratorError> {
        let source_name = self.source.name();
        tracing::info!("Loading {}:{}", source_name, column);
        let series = self.source.load_prices(column).await?;

        let params = self.params.clone();
        let column_name = column.to_string();
        let report = tokio::task::spawn_blocking(move || {
            let outcome = run_backtest(&series, &params)?;
            Ok::<_, BacktestError>(BacktestReport::new(&source_name, &column_name, &params, &outcome))
        })
        .await
        .map_err(|e| OrchestratorError::Task(e.to_string()))??;

        tracing::info!(
            "{} [{}] | steps {} | total profit {:.4} | final capital {:.6}",
            report.source,
            report.column,
            report.summary.steps,
            report.summary.total_profit,
            report.summary.final_capital
        );
        Ok(report)
    }

    /// Run every column concurrently; a failing column does not stop the others
    pub async fn run_columns(&self, columns: &[String]) -> Vec<ColumnRun> {
        let handles: Vec<_> = columns
            .iter()
            .map(|column| {
                let orch = self.clone();
                let column = column.clone();
                tokio::spawn(async move {
                    let result = orch.run_column(&column).await;
                    ColumnRun { column, result }
                })
            })
            .collect();

        let mut runs = Vec::with_capacity(handles.len());
        for (handle, column) in handles.into_iter().zip(columns) {
            let run = match handle.await {
                Ok(run) => run,
                Err(e) => ColumnRun {
                    column: column.clone(),
                    result: Err(OrchestratorError::Task(e.to_string())),
                },
            };
            if let Err(ref e) = run.result {
                tracing::error!("Backtest for column '{}' failed: {}", run.column, e);
            }
            runs.push(run);
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockPriceSource;
    use crate::strategy::ValidationMode;

    fn source() -> MockPriceSource {
        MockPriceSource::new()
            .with_column("Close", vec![10.0, 12.0, 8.0, 8.0, 15.0])
            .with_column("Flat", vec![50.0, 50.0, 50.0])
            .with_column("Broken", vec![1.0, f64::NAN])
    }

    #[tokio::test]
    async fn test_run_single_column() {
        let orch = BacktestOrchestrator::new(source(), BacktestParams::default());
        let report = orch.run_column("Close").await.unwrap();
        assert_eq!(report.summary.total_profit, 11.0);
        assert_eq!(report.source, "mock");
        assert_eq!(orch.source().get_calls(), vec!["Close"]);
    }

    #[tokio::test]
    async fn test_run_columns_keeps_order_and_isolates_failures() {
        let orch = BacktestOrchestrator::new(
            source(),
            BacktestParams::default().with_validation(ValidationMode::Strict),
        );
        let columns: Vec<String> = ["Flat", "Missing", "Close", "Broken"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let runs = orch.run_columns(&columns).await;
        let names: Vec<&str> = runs.iter().map(|r| r.column.as_str()).collect();
        assert_eq!(names, vec!["Flat", "Missing", "Close", "Broken"]);

        assert!(runs[0].is_ok());
        assert!(matches!(runs[1].result, Err(OrchestratorError::MarketData(_))));
        assert!(runs[2].is_ok());
        assert!(matches!(runs[3].result, Err(OrchestratorError::Backtest(_))));
    }

    #[tokio::test]
    async fn test_invalid_params_fail_each_column() {
        let orch = BacktestOrchestrator::new(
            source(),
            BacktestParams::default().with_initial_capital(-5.0),
        );
        let result = orch.run_column("Close").await;
        assert!(matches!(result, Err(OrchestratorError::Backtest(BacktestError::InvalidInput(_)))));
    }
}
