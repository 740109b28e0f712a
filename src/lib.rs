//! Reversion - Streaming Z-Score Mean Reversion Backtester Library
//!
//! A single-pass backtest driven by running (online) statistics: no
//! look-ahead, no re-scanning of history.
//!
//! # Modules
//!
//! - `domain`: Core types (Position, PriceSeries, BacktestError)
//! - `strategy`: RunningStats, ZScoreGate and the streaming backtester
//! - `ports`: Trait abstractions (PriceSource)
//! - `adapters`: External implementations (CSV data, report export, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Orchestrator and report building

pub mod domain;
pub mod strategy;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
