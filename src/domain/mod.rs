//! Domain Layer - Core types for the backtester
//!
//! Pure domain types with no I/O. External interactions happen through the
//! ports layer.

pub mod error;
pub mod position;
pub mod price_series;

pub use error::BacktestError;
pub use position::Position;
pub use price_series::PriceSeries;
