//! Core types for the nepseview application.
//!
//! This crate provides fundamental data structures with no external dependencies:
//! - `Candle` - OHLCV candle data
//! - `Security` - a listed security (id, symbol, name)
//! - `IndicatorSeries` - tagged indicator payload shapes (line, band, composite)

pub mod candle;
pub mod indicator;
pub mod security;

pub use candle::{normalize_candles, Candle};
pub use indicator::{time_span, IndicatorSeries, SeriesPoint};
pub use security::Security;
