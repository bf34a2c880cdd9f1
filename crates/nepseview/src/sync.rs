//! Three-pane chart synchronization.
//!
//! [`LinkedCharts`] owns the price, volume and oscillator surfaces and
//! keeps their visible time ranges in lock step. Range propagation always
//! excludes the origin pane, and a report of the range the charts already
//! share is dropped, so one user pan/zoom produces exactly one update per
//! non-origin pane and never an update storm.

use nepseview_core::Candle;

use crate::surface::{
    CandleOptions, ChartSurface, HistogramBar, HistogramOptions, Pane, SeriesData, SeriesId,
    VisibleRange,
};

const CANDLE_UP_COLOR: &str = "#26a69a";
const CANDLE_DOWN_COLOR: &str = "#ef5350";
const VOLUME_UP_COLOR: &str = "#26a69a80";
const VOLUME_DOWN_COLOR: &str = "#ef535080";

/// Handles of the two base series, created once per panel lifetime.
#[derive(Debug, Clone, Copy)]
struct BaseSeries {
    candles: SeriesId,
    volume: SeriesId,
}

/// The three linked chart panes and their shared visible range.
pub struct LinkedCharts {
    price: Box<dyn ChartSurface>,
    volume: Box<dyn ChartSurface>,
    oscillator: Box<dyn ChartSurface>,
    base: Option<BaseSeries>,
    last_range: Option<VisibleRange>,
}

impl LinkedCharts {
    pub fn new(
        price: Box<dyn ChartSurface>,
        volume: Box<dyn ChartSurface>,
        oscillator: Box<dyn ChartSurface>,
    ) -> Self {
        Self {
            price,
            volume,
            oscillator,
            base: None,
            last_range: None,
        }
    }

    /// Borrow a pane.
    pub fn pane(&self, pane: Pane) -> &dyn ChartSurface {
        match pane {
            Pane::Price => self.price.as_ref(),
            Pane::Volume => self.volume.as_ref(),
            Pane::Oscillator => self.oscillator.as_ref(),
        }
    }

    /// Borrow a pane mutably.
    pub fn pane_mut(&mut self, pane: Pane) -> &mut dyn ChartSurface {
        match pane {
            Pane::Price => self.price.as_mut(),
            Pane::Volume => self.volume.as_mut(),
            Pane::Oscillator => self.oscillator.as_mut(),
        }
    }

    /// Create the candlestick and volume series if they do not exist yet.
    ///
    /// Idempotent: a second call is a no-op.
    pub fn ensure_base_series(&mut self) {
        if self.base.is_some() {
            return;
        }
        let candles = self.price.add_candlestick_series(CandleOptions {
            up_color: CANDLE_UP_COLOR.to_string(),
            down_color: CANDLE_DOWN_COLOR.to_string(),
        });
        let volume = self.volume.add_histogram_series(HistogramOptions {
            color: VOLUME_UP_COLOR.to_string(),
        });
        self.base = Some(BaseSeries { candles, volume });
    }

    /// Replace the base candle and volume data.
    pub fn set_candles(&mut self, candles: &[Candle]) {
        self.ensure_base_series();
        let Some(base) = self.base else {
            return;
        };

        self.price
            .set_series_data(base.candles, SeriesData::Candles(candles));

        let bars: Vec<HistogramBar> = candles
            .iter()
            .map(|c| HistogramBar {
                time: c.time,
                value: c.volume,
                color: Some(
                    if c.is_bullish() {
                        VOLUME_UP_COLOR
                    } else {
                        VOLUME_DOWN_COLOR
                    }
                    .to_string(),
                ),
            })
            .collect();
        self.volume
            .set_series_data(base.volume, SeriesData::Histogram(&bars));
    }

    /// Mirror a visible-range change from `origin` to the other two panes.
    ///
    /// The origin pane is excluded from propagation, and a repeated report
    /// of the current range is dropped, which is what breaks the echo
    /// cycle when the host feeds the propagated assignments back in as
    /// change events.
    pub fn range_changed(&mut self, origin: Pane, range: VisibleRange) {
        if self.last_range == Some(range) {
            return;
        }
        self.last_range = Some(range);

        for pane in Pane::ALL {
            if pane != origin {
                self.pane_mut(pane).set_visible_range(range);
            }
        }
    }

    /// The range all panes currently share, if one was ever reported.
    pub fn shared_range(&self) -> Option<VisibleRange> {
        self.last_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;

    fn linked() -> (LinkedCharts, HeadlessSurface, HeadlessSurface, HeadlessSurface) {
        let price = HeadlessSurface::new();
        let volume = HeadlessSurface::new();
        let oscillator = HeadlessSurface::new();
        let charts = LinkedCharts::new(
            Box::new(price.clone()),
            Box::new(volume.clone()),
            Box::new(oscillator.clone()),
        );
        (charts, price, volume, oscillator)
    }

    fn candle(time: i64, open: f64, close: f64) -> Candle {
        Candle::new(time, open, open.max(close) + 1.0, open.min(close) - 1.0, close, 500.0)
    }

    #[test]
    fn test_ensure_base_series_is_idempotent() {
        let (mut charts, price, volume, _) = linked();

        charts.ensure_base_series();
        charts.ensure_base_series();

        assert_eq!(price.series_count(), 1);
        assert_eq!(volume.series_count(), 1);
    }

    #[test]
    fn test_set_candles_feeds_price_and_volume() {
        let (mut charts, price, volume, oscillator) = linked();

        let candles = vec![candle(1, 10.0, 11.0), candle(2, 11.0, 10.5)];
        charts.set_candles(&candles);

        assert_eq!(price.series_count(), 1);
        assert_eq!(volume.series_count(), 1);
        assert_eq!(oscillator.series_count(), 0);

        // Both base series received both rows.
        let price_series = price.series(crate::surface::SeriesId(0)).unwrap();
        assert_eq!(price_series.data_len, 2);
    }

    #[test]
    fn test_range_propagates_to_non_origin_panes_once() {
        let (mut charts, price, volume, oscillator) = linked();

        charts.range_changed(Pane::Price, VisibleRange::new(5.0, 50.0));

        assert_eq!(price.range_set_count(), 0);
        assert_eq!(volume.range_set_count(), 1);
        assert_eq!(oscillator.range_set_count(), 1);
        assert_eq!(volume.last_range(), Some(VisibleRange::new(5.0, 50.0)));
        assert_eq!(oscillator.last_range(), Some(VisibleRange::new(5.0, 50.0)));
    }

    #[test]
    fn test_echoed_range_does_not_loop() {
        let (mut charts, price, volume, oscillator) = linked();

        charts.range_changed(Pane::Price, VisibleRange::new(5.0, 50.0));
        // The host reports the propagated assignments back as changes.
        charts.range_changed(Pane::Volume, VisibleRange::new(5.0, 50.0));
        charts.range_changed(Pane::Oscillator, VisibleRange::new(5.0, 50.0));

        assert_eq!(price.range_set_count(), 0);
        assert_eq!(volume.range_set_count(), 1);
        assert_eq!(oscillator.range_set_count(), 1);
    }

    #[test]
    fn test_new_range_from_other_pane_propagates() {
        let (mut charts, price, volume, oscillator) = linked();

        charts.range_changed(Pane::Price, VisibleRange::new(5.0, 50.0));
        charts.range_changed(Pane::Oscillator, VisibleRange::new(10.0, 60.0));

        assert_eq!(price.range_set_count(), 1);
        assert_eq!(volume.range_set_count(), 2);
        assert_eq!(oscillator.range_set_count(), 1);
        assert_eq!(price.last_range(), Some(VisibleRange::new(10.0, 60.0)));
        assert_eq!(charts.shared_range(), Some(VisibleRange::new(10.0, 60.0)));
    }
}
