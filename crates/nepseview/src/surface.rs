//! Chart surface abstraction.
//!
//! The charting library is an external capability. This module defines the
//! narrow interface the panel needs from it: create a series, feed it data,
//! remove it, and get/set the visible time range. The synchronization
//! engine and the overlay manager only ever talk to [`ChartSurface`], so
//! they can run against [`crate::headless::HeadlessSurface`] without a
//! rendering backend.

use nepseview_core::{Candle, SeriesPoint};

/// One of the three linked chart panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Candlestick price chart.
    Price,
    /// Volume histogram below the price chart.
    Volume,
    /// Oscillator pane (RSI, MACD).
    Oscillator,
}

impl Pane {
    /// All three panes, in layout order.
    pub const ALL: [Pane; 3] = [Pane::Price, Pane::Volume, Pane::Oscillator];
}

/// Visible logical range of a pane's time scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRange {
    pub from: f64,
    pub to: f64,
}

impl VisibleRange {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }
}

/// Opaque handle to a series drawn on a surface.
///
/// Minted by the `add_*_series` calls; only valid for the surface that
/// created it, and destroyed by exactly one `remove_series` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(pub u64);

/// Kind of a drawn series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Candlestick,
    Histogram,
    Line,
}

/// Line rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// Options for a new line series.
#[derive(Debug, Clone)]
pub struct LineOptions {
    pub color: String,
    pub width: u32,
    pub style: LineStyle,
}

impl LineOptions {
    /// A solid line of the given color.
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            width: 2,
            style: LineStyle::Solid,
        }
    }

    /// A thin dashed line of the given color, used for guide lines.
    pub fn dashed(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            width: 1,
            style: LineStyle::Dashed,
        }
    }
}

/// Options for a new histogram series.
#[derive(Debug, Clone)]
pub struct HistogramOptions {
    /// Base color for bars that carry no per-bar color.
    pub color: String,
}

/// Options for a new candlestick series.
#[derive(Debug, Clone)]
pub struct CandleOptions {
    pub up_color: String,
    pub down_color: String,
}

/// One histogram bar, optionally colored individually.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBar {
    pub time: i64,
    pub value: f64,
    pub color: Option<String>,
}

/// Data fed to a series via [`ChartSurface::set_series_data`].
#[derive(Debug, Clone, Copy)]
pub enum SeriesData<'a> {
    Candles(&'a [Candle]),
    Line(&'a [SeriesPoint]),
    Histogram(&'a [HistogramBar]),
}

/// The capability the panel requires from a chart surface.
pub trait ChartSurface {
    /// Create a candlestick series and return its handle.
    fn add_candlestick_series(&mut self, options: CandleOptions) -> SeriesId;

    /// Create a histogram series and return its handle.
    fn add_histogram_series(&mut self, options: HistogramOptions) -> SeriesId;

    /// Create a line series and return its handle.
    fn add_line_series(&mut self, options: LineOptions) -> SeriesId;

    /// Replace the data of an existing series.
    fn set_series_data(&mut self, series: SeriesId, data: SeriesData<'_>);

    /// Remove a series. The handle must not be used afterwards.
    fn remove_series(&mut self, series: SeriesId);

    /// Current visible logical range, if the surface has one.
    fn visible_range(&self) -> Option<VisibleRange>;

    /// Assign the visible logical range.
    fn set_visible_range(&mut self, range: VisibleRange);
}
