//! Market data gateway.
//!
//! [`MarketGateway`] is the domain-level contract the panel fetches
//! through: security list, candle history and indicator series. The
//! production implementation wraps [`nepse_api::MarketApi`] and maps wire
//! records into core types; tests substitute their own implementation.

use std::collections::BTreeMap;
use std::future::Future;

use nepse_api::types::{CandleRecord, SeriesPointRecord, SeriesRecord};
use nepse_api::MarketApi;
use nepseview_core::{normalize_candles, Candle, IndicatorSeries, Security, SeriesPoint};

/// Async market data operations, cloneable into spawned fetch tasks.
///
/// Each call is a single request/response; retry policy belongs to the
/// caller (the panel surfaces failures and waits for a manual retry).
pub trait MarketGateway: Clone + Send + Sync + 'static {
    /// Fetch the full security list.
    fn list_securities(&self) -> impl Future<Output = anyhow::Result<Vec<Security>>> + Send;

    /// Fetch the candle history of a security, sorted by time ascending.
    fn fetch_history(
        &self,
        security_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Candle>>> + Send;

    /// Fetch indicator series for a security.
    fn fetch_indicators(
        &self,
        security_id: i64,
        keys: Vec<String>,
    ) -> impl Future<Output = anyhow::Result<BTreeMap<String, IndicatorSeries>>> + Send;
}

/// Production gateway over the dashboard backend.
#[derive(Debug, Clone)]
pub struct NepseGateway {
    market: MarketApi,
}

impl NepseGateway {
    pub fn new(market: MarketApi) -> Self {
        Self { market }
    }
}

impl MarketGateway for NepseGateway {
    fn list_securities(&self) -> impl Future<Output = anyhow::Result<Vec<Security>>> + Send {
        let market = self.market.clone();
        async move {
            let records = market.security_list().await?;
            Ok(records
                .into_iter()
                .map(|r| {
                    let name = r.display_name().to_string();
                    Security::new(r.id, r.symbol, name)
                })
                .collect())
        }
    }

    fn fetch_history(
        &self,
        security_id: i64,
    ) -> impl Future<Output = anyhow::Result<Vec<Candle>>> + Send {
        let market = self.market.clone();
        async move {
            let payload = market.ta_history(security_id).await?;
            let candles = payload.candles.into_iter().map(to_candle).collect();
            Ok(normalize_candles(candles))
        }
    }

    fn fetch_indicators(
        &self,
        security_id: i64,
        keys: Vec<String>,
    ) -> impl Future<Output = anyhow::Result<BTreeMap<String, IndicatorSeries>>> + Send {
        let market = self.market.clone();
        async move {
            let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
            let payload = market.ta_indicators(security_id, &refs).await?;
            Ok(payload
                .series
                .into_iter()
                .map(|(key, record)| (key, to_series(record)))
                .collect())
        }
    }
}

fn to_candle(record: CandleRecord) -> Candle {
    Candle::new(
        record.time,
        record.open,
        record.high,
        record.low,
        record.close,
        record.volume.unwrap_or(0.0),
    )
}

/// Gaps arrive as `null` on the wire and become `NAN` in the domain; the
/// chart layer passes them through rather than rejecting the series.
fn to_points(records: Vec<SeriesPointRecord>) -> Vec<SeriesPoint> {
    records
        .into_iter()
        .map(|r| SeriesPoint::new(r.time, r.value.unwrap_or(f64::NAN)))
        .collect()
}

fn to_series(record: SeriesRecord) -> IndicatorSeries {
    match record {
        SeriesRecord::Line(points) => IndicatorSeries::Line(to_points(points)),
        SeriesRecord::Band {
            upper,
            middle,
            lower,
        } => IndicatorSeries::Band {
            upper: to_points(upper),
            middle: to_points(middle),
            lower: to_points(lower),
        },
        SeriesRecord::Composite { macd, signal, hist } => IndicatorSeries::Composite {
            main: to_points(macd),
            signal: to_points(signal),
            hist: to_points(hist),
        },
    }
}
