//! Technical-analysis panel controller for the NEPSE dashboard.
//!
//! Owns the state of one TA panel: three linked chart panes (price,
//! volume, oscillator), the lifecycle of indicator overlays, a debounced
//! security search, and the loading/ready/error pipeline that keeps
//! overlapping fetches coherent via request epochs.
//!
//! The charting library and the widget layer stay outside: charts are
//! reached through the [`surface::ChartSurface`] trait (with
//! [`headless::HeadlessSurface`] as the in-memory implementation), and the
//! host UI reacts to [`events::PanelEvent`]s drained from the panel.

pub mod events;
pub mod gateway;
pub mod headless;
pub mod overlay;
pub mod panel;
pub mod search;
pub mod surface;
pub mod sync;

pub use events::{EventQueue, PanelEvent};
pub use gateway::{MarketGateway, NepseGateway};
pub use headless::HeadlessSurface;
pub use overlay::{OverlayHandle, OverlayManager};
pub use panel::{LoadState, PanelMessage, TaPanel};
pub use search::{SearchController, MAX_SEARCH_RESULTS, SEARCH_DEBOUNCE};
pub use surface::{
    CandleOptions, ChartSurface, HistogramBar, HistogramOptions, LineOptions, LineStyle, Pane,
    SeriesData, SeriesId, SeriesKind, VisibleRange,
};
pub use sync::LinkedCharts;
