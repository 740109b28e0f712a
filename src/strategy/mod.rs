//! Strategy Layer - Streaming Z-Score Mean Reversion
//!
//! - `running_stats`: cumulative mean/variance updated one price at a time
//! - `zscore_gate`: contrarian threshold rule turning a z-score into a position
//! - `backtester`: the single-pass fold producing profits and a capital curve
//! - `params`: run parameters, defaults and validation

pub mod params;
pub mod running_stats;
pub mod zscore_gate;
pub mod backtester;

pub use params::{BacktestParams, CapitalMode, ValidationMode, ParamsError};
pub use running_stats::{RunningStats, StatsSnapshot};
pub use zscore_gate::{ZScoreGate, ZScoreResult};
pub use backtester::{
    run_backtest, BacktestOutcome, BacktestState, StepResult, StreamingMeanReversionBacktester,
};
