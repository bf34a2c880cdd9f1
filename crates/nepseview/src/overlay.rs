//! Indicator overlay lifecycle.
//!
//! [`OverlayManager`] owns the registry of rendered indicator elements and
//! guarantees exact symmetry between add and remove: `apply` always clears
//! the previous overlay set before rendering the new one, so the registry
//! is never partially updated and no visual element outlives its entry.

use std::collections::{BTreeMap, BTreeSet};

use nepseview_core::{time_span, IndicatorSeries, SeriesPoint};

use crate::surface::{HistogramBar, HistogramOptions, LineOptions, Pane, SeriesData, SeriesId};
use crate::sync::LinkedCharts;

/// Fallback color for indicator keys missing from the style table.
const DEFAULT_COLOR: &str = "#3498db";
/// Color of the `_signal` line of a composite indicator.
const SIGNAL_COLOR: &str = "#e67e22";
/// Color of the upper/lower edges of a band indicator.
const BAND_EDGE_COLOR: &str = "#aab7b8";
/// Histogram bar colors by sign.
const HIST_POS_COLOR: &str = "#2ecc71";
const HIST_NEG_COLOR: &str = "#e74c3c";
/// RSI guide line colors.
const OVERBOUGHT_COLOR: &str = "#c0392b";
const OVERSOLD_COLOR: &str = "#27ae60";

/// RSI guide levels: (registry-key suffix, value, color).
const RSI_GUIDES: [(&str, f64, &str); 2] = [
    ("overbought", 70.0, OVERBOUGHT_COLOR),
    ("oversold", 30.0, OVERSOLD_COLOR),
];

/// Fixed style table: pane and color per known indicator key.
///
/// Unrecognized keys fall back to [`DEFAULT_COLOR`] and to a pane chosen
/// by payload shape.
fn style_for(key: &str) -> (Option<Pane>, &'static str) {
    match key {
        "sma20" => (Some(Pane::Price), "#f39c12"),
        "ema50" => (Some(Pane::Price), "#8e44ad"),
        "bb20" => (Some(Pane::Price), "#5d6d7e"),
        "rsi14" => (Some(Pane::Oscillator), "#16a085"),
        "macd" => (Some(Pane::Oscillator), "#2980b9"),
        _ => (None, DEFAULT_COLOR),
    }
}

/// A rendered overlay element: the pane it lives on and its series handle.
#[derive(Debug, Clone, Copy)]
pub struct OverlayHandle {
    pub pane: Pane,
    pub series: SeriesId,
}

/// Registry of rendered indicator elements, keyed by element name
/// (`sma20`, `bb20_upper`, `rsi14_overbought`, `macd_hist`, ...).
#[derive(Debug, Default)]
pub struct OverlayManager {
    registry: BTreeMap<String, OverlayHandle>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rendered elements.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no overlay is currently rendered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Element keys currently rendered, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    /// Look up a rendered element.
    pub fn get(&self, key: &str) -> Option<OverlayHandle> {
        self.registry.get(key).copied()
    }

    /// Remove every rendered element from its pane and empty the registry.
    ///
    /// Each handle is removed exactly once; after this call the registry
    /// is empty.
    pub fn clear(&mut self, charts: &mut LinkedCharts) {
        for (_, handle) in std::mem::take(&mut self.registry) {
            charts.pane_mut(handle.pane).remove_series(handle.series);
        }
    }

    /// Render the indicator payload, replacing whatever was on screen.
    ///
    /// Only keys present in both `active` and `payload` are drawn. The
    /// previous overlay set is always cleared first; the manager never
    /// diffs old against new.
    pub fn apply(
        &mut self,
        charts: &mut LinkedCharts,
        active: &BTreeSet<String>,
        payload: &BTreeMap<String, IndicatorSeries>,
    ) {
        self.clear(charts);

        for (key, series) in payload {
            if !active.contains(key) {
                log::debug!("skipping inactive indicator {key}");
                continue;
            }
            match series {
                IndicatorSeries::Line(points) => self.render_line(charts, key, points),
                IndicatorSeries::Band {
                    upper,
                    middle,
                    lower,
                } => self.render_band(charts, key, upper, middle, lower),
                IndicatorSeries::Composite { main, signal, hist } => {
                    self.render_composite(charts, key, main, signal, hist)
                }
            }
        }
    }

    fn render_line(&mut self, charts: &mut LinkedCharts, key: &str, points: &[SeriesPoint]) {
        let (pane, color) = style_for(key);
        let pane = pane.unwrap_or(Pane::Price);
        self.add_line(charts, pane, key.to_string(), LineOptions::solid(color), points);

        if key == "rsi14" {
            self.render_rsi_guides(charts, pane, key, points);
        }
    }

    /// Static guide lines at the 70/30 levels, spanning the RSI line's
    /// time domain. Registered like any other element so they participate
    /// in the clear cycle.
    fn render_rsi_guides(
        &mut self,
        charts: &mut LinkedCharts,
        pane: Pane,
        key: &str,
        points: &[SeriesPoint],
    ) {
        let Some((first, last)) = time_span(points) else {
            return;
        };
        for (suffix, level, color) in RSI_GUIDES {
            let guide = [
                SeriesPoint::new(first, level),
                SeriesPoint::new(last, level),
            ];
            self.add_line(
                charts,
                pane,
                format!("{key}_{suffix}"),
                LineOptions::dashed(color),
                &guide,
            );
        }
    }

    fn render_band(
        &mut self,
        charts: &mut LinkedCharts,
        key: &str,
        upper: &[SeriesPoint],
        middle: &[SeriesPoint],
        lower: &[SeriesPoint],
    ) {
        let (pane, color) = style_for(key);
        let pane = pane.unwrap_or(Pane::Price);

        self.add_line(
            charts,
            pane,
            format!("{key}_upper"),
            LineOptions::dashed(BAND_EDGE_COLOR),
            upper,
        );
        self.add_line(
            charts,
            pane,
            format!("{key}_middle"),
            LineOptions::solid(color),
            middle,
        );
        self.add_line(
            charts,
            pane,
            format!("{key}_lower"),
            LineOptions::dashed(BAND_EDGE_COLOR),
            lower,
        );
    }

    fn render_composite(
        &mut self,
        charts: &mut LinkedCharts,
        key: &str,
        main: &[SeriesPoint],
        signal: &[SeriesPoint],
        hist: &[SeriesPoint],
    ) {
        let (pane, color) = style_for(key);
        let pane = pane.unwrap_or(Pane::Oscillator);

        self.add_line(charts, pane, key.to_string(), LineOptions::solid(color), main);
        self.add_line(
            charts,
            pane,
            format!("{key}_signal"),
            LineOptions::solid(SIGNAL_COLOR),
            signal,
        );

        let bars: Vec<HistogramBar> = hist
            .iter()
            .map(|p| HistogramBar {
                time: p.time,
                value: p.value,
                color: Some(
                    if p.value >= 0.0 {
                        HIST_POS_COLOR
                    } else {
                        HIST_NEG_COLOR
                    }
                    .to_string(),
                ),
            })
            .collect();
        let surface = charts.pane_mut(pane);
        let series = surface.add_histogram_series(HistogramOptions {
            color: HIST_POS_COLOR.to_string(),
        });
        surface.set_series_data(series, SeriesData::Histogram(&bars));
        self.registry
            .insert(format!("{key}_hist"), OverlayHandle { pane, series });
    }

    fn add_line(
        &mut self,
        charts: &mut LinkedCharts,
        pane: Pane,
        registry_key: String,
        options: LineOptions,
        points: &[SeriesPoint],
    ) {
        let surface = charts.pane_mut(pane);
        let series = surface.add_line_series(options);
        surface.set_series_data(series, SeriesData::Line(points));
        self.registry.insert(registry_key, OverlayHandle { pane, series });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurface;
    use crate::surface::SeriesKind;

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

    fn line(times: &[i64]) -> IndicatorSeries {
        IndicatorSeries::Line(times.iter().map(|&t| SeriesPoint::new(t, 50.0)).collect())
    }

    fn active(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_line_overlay_renders_on_price_pane() {
        let (mut charts, price, _, oscillator) = linked();
        let mut overlays = OverlayManager::new();

        let payload = BTreeMap::from([("sma20".to_string(), line(&[1, 2, 3]))]);
        overlays.apply(&mut charts, &active(&["sma20"]), &payload);

        assert_eq!(overlays.len(), 1);
        assert_eq!(price.series_count(), 1);
        assert_eq!(oscillator.series_count(), 0);
        assert_eq!(overlays.get("sma20").unwrap().pane, Pane::Price);
    }

    #[test]
    fn test_rsi_renders_line_plus_two_guides() {
        let (mut charts, price, _, oscillator) = linked();
        let mut overlays = OverlayManager::new();

        let payload = BTreeMap::from([("rsi14".to_string(), line(&[1, 2, 3]))]);
        overlays.apply(&mut charts, &active(&["rsi14"]), &payload);

        assert_eq!(overlays.len(), 3);
        let keys: Vec<&str> = overlays.keys().collect();
        assert_eq!(keys, vec!["rsi14", "rsi14_overbought", "rsi14_oversold"]);
        assert_eq!(oscillator.series_count(), 3);
        assert_eq!(price.series_count(), 0);
        // Guide lines span the RSI line's time domain: two points each.
        let guide = overlays.get("rsi14_overbought").unwrap();
        assert_eq!(oscillator.series(guide.series).unwrap().data_len, 2);
    }

    #[test]
    fn test_band_renders_three_lines() {
        let (mut charts, price, _, _) = linked();
        let mut overlays = OverlayManager::new();

        let band = IndicatorSeries::Band {
            upper: vec![SeriesPoint::new(1, 520.0)],
            middle: vec![SeriesPoint::new(1, 505.0)],
            lower: vec![SeriesPoint::new(1, 490.0)],
        };
        let payload = BTreeMap::from([("bb20".to_string(), band)]);
        overlays.apply(&mut charts, &active(&["bb20"]), &payload);

        let keys: Vec<&str> = overlays.keys().collect();
        assert_eq!(keys, vec!["bb20_lower", "bb20_middle", "bb20_upper"]);
        assert_eq!(price.series_count(), 3);
    }

    #[test]
    fn test_composite_renders_two_lines_and_histogram() {
        let (mut charts, _, _, oscillator) = linked();
        let mut overlays = OverlayManager::new();

        let composite = IndicatorSeries::Composite {
            main: vec![SeriesPoint::new(1, 1.2)],
            signal: vec![SeriesPoint::new(1, 1.0)],
            hist: vec![SeriesPoint::new(1, 0.2), SeriesPoint::new(2, -0.1)],
        };
        let payload = BTreeMap::from([("macd".to_string(), composite)]);
        overlays.apply(&mut charts, &active(&["macd"]), &payload);

        let keys: Vec<&str> = overlays.keys().collect();
        assert_eq!(keys, vec!["macd", "macd_hist", "macd_signal"]);
        assert_eq!(oscillator.series_count_of(SeriesKind::Line), 2);
        assert_eq!(oscillator.series_count_of(SeriesKind::Histogram), 1);
    }

    #[test]
    fn test_apply_clears_previous_set() {
        let (mut charts, price, _, oscillator) = linked();
        let mut overlays = OverlayManager::new();

        let payload = BTreeMap::from([
            ("sma20".to_string(), line(&[1, 2])),
            ("rsi14".to_string(), line(&[1, 2])),
        ]);
        overlays.apply(&mut charts, &active(&["sma20", "rsi14"]), &payload);
        assert_eq!(overlays.len(), 4);

        let payload = BTreeMap::from([("ema50".to_string(), line(&[1, 2]))]);
        overlays.apply(&mut charts, &active(&["ema50"]), &payload);

        let keys: Vec<&str> = overlays.keys().collect();
        assert_eq!(keys, vec!["ema50"]);
        assert_eq!(price.series_count(), 1);
        assert_eq!(oscillator.series_count(), 0);
        assert_eq!(price.invalid_removals(), 0);
        assert_eq!(oscillator.invalid_removals(), 0);
    }

    #[test]
    fn test_clear_empties_registry_without_double_removal() {
        let (mut charts, price, _, _) = linked();
        let mut overlays = OverlayManager::new();

        let payload = BTreeMap::from([("sma20".to_string(), line(&[1]))]);
        overlays.apply(&mut charts, &active(&["sma20"]), &payload);

        overlays.clear(&mut charts);
        overlays.clear(&mut charts);

        assert!(overlays.is_empty());
        assert_eq!(price.series_count(), 0);
        assert_eq!(price.invalid_removals(), 0);
    }

    #[test]
    fn test_payload_keys_outside_active_set_are_skipped() {
        let (mut charts, price, _, _) = linked();
        let mut overlays = OverlayManager::new();

        let payload = BTreeMap::from([
            ("sma20".to_string(), line(&[1])),
            ("ema50".to_string(), line(&[1])),
        ]);
        overlays.apply(&mut charts, &active(&["sma20"]), &payload);

        assert_eq!(overlays.len(), 1);
        assert!(overlays.get("ema50").is_none());
        assert_eq!(price.series_count(), 1);
    }

    #[test]
    fn test_unknown_key_gets_default_color_on_price_pane() {
        let (mut charts, price, _, _) = linked();
        let mut overlays = OverlayManager::new();

        let payload = BTreeMap::from([("wma9".to_string(), line(&[1]))]);
        overlays.apply(&mut charts, &active(&["wma9"]), &payload);

        let handle = overlays.get("wma9").unwrap();
        assert_eq!(handle.pane, Pane::Price);
        assert_eq!(price.series(handle.series).unwrap().color, DEFAULT_COLOR);
    }

    #[test]
    fn test_registry_count_matches_surface_series_count() {
        let (mut charts, price, _, oscillator) = linked();
        let mut overlays = OverlayManager::new();

        let sets: [&[&str]; 3] = [&["sma20", "rsi14"], &["macd"], &["sma20", "ema50", "bb20"]];
        for set in sets {
            let payload: BTreeMap<String, IndicatorSeries> = set
                .iter()
                .map(|&k| {
                    let series = match k {
                        "bb20" => IndicatorSeries::Band {
                            upper: vec![SeriesPoint::new(1, 1.0)],
                            middle: vec![SeriesPoint::new(1, 1.0)],
                            lower: vec![SeriesPoint::new(1, 1.0)],
                        },
                        "macd" => IndicatorSeries::Composite {
                            main: vec![SeriesPoint::new(1, 1.0)],
                            signal: vec![SeriesPoint::new(1, 1.0)],
                            hist: vec![SeriesPoint::new(1, 1.0)],
                        },
                        _ => line(&[1]),
                    };
                    (k.to_string(), series)
                })
                .collect();

            overlays.apply(&mut charts, &active(set), &payload);
            assert_eq!(
                overlays.len(),
                price.series_count() + oscillator.series_count(),
                "registry must mirror the drawn series exactly"
            );
        }
    }
}
