//! CLI Adapter
//!
//! Command-line interface for the reversion backtester.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    execute, BacktestCmd, CliApp, ColumnsCmd, Command, ParamOverrides, RunCmd,
};
