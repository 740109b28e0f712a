//! Ports Layer - Trait definitions for external dependencies
//!
//! The backtest core never touches files. Price data arrives through
//! `PriceSource`; adapters implement it for concrete storage.

pub mod market_data;
pub mod mocks;

pub use market_data::{ColumnInfo, MarketDataError, PriceSource};
pub use mocks::MockPriceSource;
