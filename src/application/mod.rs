pub mod orchestrator;
pub mod report;

pub use orchestrator::{BacktestOrchestrator, ColumnRun, OrchestratorError};
pub use report::{BacktestReport, ReportRow, ReportSummary};
