//! In-memory chart surface.
//!
//! [`HeadlessSurface`] implements [`ChartSurface`] without any rendering
//! backend. It records every series and range assignment so tests (and
//! headless embeddings) can assert on what a real chart would have drawn.
//! Cloning a surface shares its recorder, so a test can keep a probe handle
//! while the panel owns the boxed surface.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::surface::{
    CandleOptions, ChartSurface, HistogramOptions, LineOptions, SeriesData, SeriesId, SeriesKind,
    VisibleRange,
};

/// A series as recorded by a headless surface.
#[derive(Debug, Clone)]
pub struct RecordedSeries {
    /// What kind of series was created.
    pub kind: SeriesKind,
    /// Primary color it was created with.
    pub color: String,
    /// Number of data points last assigned via `set_series_data`.
    pub data_len: usize,
}

#[derive(Debug, Default)]
struct SurfaceState {
    next_id: u64,
    series: BTreeMap<SeriesId, RecordedSeries>,
    visible: Option<VisibleRange>,
    range_sets: Vec<VisibleRange>,
    removed: usize,
    invalid_removals: usize,
}

/// Recording implementation of [`ChartSurface`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of series currently alive on the surface.
    pub fn series_count(&self) -> usize {
        self.state.borrow().series.len()
    }

    /// Number of alive series of the given kind.
    pub fn series_count_of(&self, kind: SeriesKind) -> usize {
        self.state
            .borrow()
            .series
            .values()
            .filter(|s| s.kind == kind)
            .count()
    }

    /// Recorded state of a series, if it is alive.
    pub fn series(&self, id: SeriesId) -> Option<RecordedSeries> {
        self.state.borrow().series.get(&id).cloned()
    }

    /// Total `remove_series` calls that hit an alive series.
    pub fn removed_count(&self) -> usize {
        self.state.borrow().removed
    }

    /// Total `remove_series` calls that referenced an unknown handle.
    ///
    /// Stays zero as long as the caller never double-removes.
    pub fn invalid_removals(&self) -> usize {
        self.state.borrow().invalid_removals
    }

    /// Number of `set_visible_range` calls received.
    pub fn range_set_count(&self) -> usize {
        self.state.borrow().range_sets.len()
    }

    /// The last range assigned, if any.
    pub fn last_range(&self) -> Option<VisibleRange> {
        self.state.borrow().range_sets.last().copied()
    }
}

impl ChartSurface for HeadlessSurface {
    fn add_candlestick_series(&mut self, options: CandleOptions) -> SeriesId {
        self.insert(SeriesKind::Candlestick, options.up_color)
    }

    fn add_histogram_series(&mut self, options: HistogramOptions) -> SeriesId {
        self.insert(SeriesKind::Histogram, options.color)
    }

    fn add_line_series(&mut self, options: LineOptions) -> SeriesId {
        self.insert(SeriesKind::Line, options.color)
    }

    fn set_series_data(&mut self, series: SeriesId, data: SeriesData<'_>) {
        let len = match data {
            SeriesData::Candles(candles) => candles.len(),
            SeriesData::Line(points) => points.len(),
            SeriesData::Histogram(bars) => bars.len(),
        };
        if let Some(recorded) = self.state.borrow_mut().series.get_mut(&series) {
            recorded.data_len = len;
        }
    }

    fn remove_series(&mut self, series: SeriesId) {
        let mut state = self.state.borrow_mut();
        if state.series.remove(&series).is_some() {
            state.removed += 1;
        } else {
            state.invalid_removals += 1;
        }
    }

    fn visible_range(&self) -> Option<VisibleRange> {
        self.state.borrow().visible
    }

    fn set_visible_range(&mut self, range: VisibleRange) {
        let mut state = self.state.borrow_mut();
        state.visible = Some(range);
        state.range_sets.push(range);
    }
}

impl HeadlessSurface {
    fn insert(&mut self, kind: SeriesKind, color: String) -> SeriesId {
        let mut state = self.state.borrow_mut();
        let id = SeriesId(state.next_id);
        state.next_id += 1;
        state.series.insert(
            id,
            RecordedSeries {
                kind,
                color,
                data_len: 0,
            },
        );
        id
    }
}
