//! Indicator series payload shapes.
//!
//! The indicator service returns one of three shapes per indicator key:
//! a plain time/value line (SMA, EMA, RSI), a three-line band (Bollinger),
//! or a composite of two lines plus a histogram (MACD). The tagged enum
//! here replaces shape-sniffing at the render layer.

/// One time/value point of an indicator series.
///
/// `value` may be `f64::NAN` when the service could not compute a value
/// for that timestamp; consumers pass gaps through rather than rejecting
/// the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Indicator payload, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorSeries {
    /// Single line output (e.g., SMA, EMA, RSI).
    Line(Vec<SeriesPoint>),
    /// Upper/middle/lower band (e.g., Bollinger Bands).
    Band {
        upper: Vec<SeriesPoint>,
        middle: Vec<SeriesPoint>,
        lower: Vec<SeriesPoint>,
    },
    /// Main line, signal line and histogram (e.g., MACD).
    Composite {
        main: Vec<SeriesPoint>,
        signal: Vec<SeriesPoint>,
        hist: Vec<SeriesPoint>,
    },
}

/// Returns the first and last timestamp of a point series, if non-empty.
pub fn time_span(points: &[SeriesPoint]) -> Option<(i64, i64)> {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => Some((first.time, last.time)),
        _ => None,
    }
}
