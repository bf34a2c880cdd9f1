//! Wire types for the dashboard backend responses.

use serde::Deserialize;

/// One entry of the `/SecurityList` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRecord {
    /// Stable security identifier.
    pub id: i64,
    /// Ticker symbol.
    pub symbol: String,
    /// Full security name.
    #[serde(alias = "companyName", default)]
    pub security_name: Option<String>,
}

impl SecurityRecord {
    /// Display name, falling back to the symbol when the backend omits it.
    pub fn display_name(&self) -> &str {
        self.security_name.as_deref().unwrap_or(&self.symbol)
    }
}

/// One OHLC candle record of the `/api/ta/history` response.
///
/// `time` is a unix timestamp in seconds. The backend guarantees the four
/// price fields; `volume` may be `null` for illiquid days.
#[derive(Debug, Clone, Deserialize)]
pub struct CandleRecord {
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Traded volume; `null` is treated as zero downstream.
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Response of `/api/ta/history`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPayload {
    /// Ticker symbol resolved by the backend.
    pub symbol: String,
    /// The security the history belongs to.
    pub security_id: i64,
    /// Candles sorted by time ascending.
    pub candles: Vec<CandleRecord>,
}

/// One time/value point of an indicator series.
///
/// `value` is `null` when the backend could not compute a finite number
/// for that timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesPointRecord {
    /// Unix timestamp in seconds.
    pub time: i64,
    /// Indicator value, or `null` for a gap.
    #[serde(default)]
    pub value: Option<f64>,
}

/// One indicator series of the `/api/ta/indicators` response.
///
/// The backend emits three shapes, distinguished purely by structure:
/// a bare array of points, a `{upper, middle, lower}` band object, or a
/// `{macd, signal, hist}` composite object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeriesRecord {
    /// Band shape: `{upper, middle, lower}`.
    Band {
        /// Upper band points.
        upper: Vec<SeriesPointRecord>,
        /// Middle band points.
        middle: Vec<SeriesPointRecord>,
        /// Lower band points.
        lower: Vec<SeriesPointRecord>,
    },
    /// Composite shape: `{macd, signal, hist}`.
    Composite {
        /// Main line points.
        macd: Vec<SeriesPointRecord>,
        /// Signal line points.
        signal: Vec<SeriesPointRecord>,
        /// Histogram points.
        hist: Vec<SeriesPointRecord>,
    },
    /// Plain line shape: a bare array of points.
    Line(Vec<SeriesPointRecord>),
}

/// Response of `/api/ta/indicators`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorsPayload {
    /// The security the series belong to.
    pub security_id: i64,
    /// Mapping from indicator key to its series payload.
    pub series: std::collections::BTreeMap<String, SeriesRecord>,
}
