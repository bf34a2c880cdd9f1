//! # NEPSE Dashboard API Client
//!
//! A Rust client library for the read-only JSON endpoints of the NEPSE
//! dashboard backend.
//!
//! ## Features
//!
//! - **Market data**: security list, OHLC history and technical-indicator
//!   series per security
//! - **Type safety**: strongly typed response models, including the three
//!   indicator payload shapes (line, band, composite)
//! - **No hidden retries**: every call is a single request/response; retry
//!   policy belongs to the caller
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nepse_api::{MarketApi, NepseClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nepse_api::Error> {
//!     let client = NepseClient::public()?;
//!     let market = MarketApi::new(client);
//!
//!     // List securities
//!     let securities = market.security_list().await?;
//!     println!("{} securities listed", securities.len());
//!
//!     // Fetch daily OHLC history
//!     let history = market.ta_history(131).await?;
//!     println!("{}: {} candles", history.symbol, history.candles.len());
//!
//!     // Fetch indicator series
//!     let payload = market.ta_indicators(131, &["sma20", "rsi14"]).await?;
//!     println!("{} series returned", payload.series.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust,ignore
//! use nepse_api::{Config, NepseClient};
//! use std::time::Duration;
//!
//! let config = Config::default()
//!     .with_base_url("https://dashboard.example.com")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let client = NepseClient::new(config)?;
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod types;

// Re-exports for convenience
pub use client::NepseClient;
pub use config::Config;
pub use error::{ApiError, Error, Result};
pub use market::MarketApi;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base URL of a locally running dashboard backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Prelude module for convenient imports.
pub mod prelude {
    //! Common imports for using the NEPSE dashboard API client.

    pub use crate::client::NepseClient;
    pub use crate::config::Config;
    pub use crate::error::{ApiError, Error, Result};
    pub use crate::market::MarketApi;
    pub use crate::types::{
        CandleRecord, HistoryPayload, IndicatorsPayload, SecurityRecord, SeriesPointRecord,
        SeriesRecord,
    };
}
