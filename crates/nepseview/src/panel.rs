//! Panel state and orchestration.
//!
//! [`TaPanel`] is the owned session state of one technical-analysis panel:
//! the cached security list, the current candle sequence, the active
//! indicator set, the load/error state machine, and the request epoch that
//! arbitrates overlapping fetches. Gateway calls run as spawned tasks that
//! post [`PanelMessage`]s back through a channel; the host drains them with
//! [`TaPanel::process_messages`] on the owning thread.

use std::collections::{BTreeMap, BTreeSet};

use nepseview_core::{normalize_candles, Candle, IndicatorSeries, Security};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::events::{EventQueue, PanelEvent};
use crate::gateway::MarketGateway;
use crate::overlay::OverlayManager;
use crate::search::SearchController;
use crate::sync::LinkedCharts;

/// Generic message shown when the initial chart load fails.
pub const HISTORY_ERROR_MESSAGE: &str = "Unable to load chart data";
/// Generic message shown inline when an overlay refresh fails.
pub const INDICATOR_ERROR_MESSAGE: &str = "Indicator refresh failed";
/// Generic message shown when the security list cannot be fetched.
pub const SECURITIES_ERROR_MESSAGE: &str = "Unable to load security list";

/// Load/error state of the panel.
///
/// `Idle` exists only before the first selection; afterwards the session
/// oscillates among `Loading`, `Ready` and `Error` until torn down.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No security selected yet.
    Idle,
    /// A pipeline is in flight; the spinner is visible.
    Loading,
    /// The chart is on screen.
    Ready,
    /// The initial load failed; the retry affordance is visible.
    Error(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}

/// Messages posted by spawned fetch tasks and debounce timers.
#[derive(Debug)]
pub enum PanelMessage {
    /// The security list fetch completed.
    SecuritiesLoaded(anyhow::Result<Vec<Security>>),
    /// A history fetch completed.
    HistoryLoaded {
        /// Epoch the fetch was started under.
        epoch: u64,
        /// The security that was fetched.
        security_id: i64,
        /// Candles, or the transport/shape error.
        result: anyhow::Result<Vec<Candle>>,
    },
    /// An indicator fetch completed.
    IndicatorsLoaded {
        /// Epoch the fetch was started under.
        epoch: u64,
        /// Series per indicator key, or the transport/shape error.
        result: anyhow::Result<BTreeMap<String, IndicatorSeries>>,
    },
    /// A search debounce timer expired.
    SearchElapsed {
        /// Timer generation, checked against the controller's current one.
        generation: u64,
    },
}

/// One technical-analysis panel: session state plus orchestration.
///
/// All operations must be called from within a tokio runtime; fetches are
/// spawned, never awaited inline.
pub struct TaPanel<G: MarketGateway> {
    gateway: G,
    charts: LinkedCharts,
    overlays: OverlayManager,
    search: SearchController,
    events: EventQueue,

    active_indicators: BTreeSet<String>,
    candles: Vec<Candle>,
    current_security: Option<i64>,
    securities_requested: bool,
    epoch: u64,
    load_state: LoadState,

    tx: UnboundedSender<PanelMessage>,
    rx: UnboundedReceiver<PanelMessage>,
}

impl<G: MarketGateway> TaPanel<G> {
    pub fn new(gateway: G, charts: LinkedCharts) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            charts,
            overlays: OverlayManager::new(),
            search: SearchController::new(),
            events: EventQueue::new(),
            active_indicators: BTreeSet::new(),
            candles: Vec::new(),
            current_security: None,
            securities_requested: false,
            epoch: 0,
            load_state: LoadState::Idle,
            tx,
            rx,
        }
    }

    /// Current state of the load/error state machine.
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Current request epoch.
    pub fn request_epoch(&self) -> u64 {
        self.epoch
    }

    /// The cached candle sequence of the current security.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// The set of checked indicator toggles.
    pub fn active_indicators(&self) -> &BTreeSet<String> {
        &self.active_indicators
    }

    /// The currently selected security, resolved against the cached list.
    pub fn current_security(&self) -> Option<&Security> {
        self.current_security.and_then(|id| self.search.find(id))
    }

    /// The overlay registry.
    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    /// The linked chart panes.
    pub fn charts(&self) -> &LinkedCharts {
        &self.charts
    }

    /// The linked chart panes, mutably (range events come in through here).
    pub fn charts_mut(&mut self) -> &mut LinkedCharts {
        &mut self.charts
    }

    /// Pending events for the host UI.
    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// The most recent search results.
    pub fn search_results(&self) -> &[Security] {
        self.search.results()
    }

    /// Fetch the security list. The list is loaded once per session; the
    /// guard resets on failure so the host can call `init` again.
    pub fn init(&mut self) {
        if self.securities_requested {
            return;
        }
        self.securities_requested = true;

        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.list_securities().await;
            let _ = tx.send(PanelMessage::SecuritiesLoaded(result));
        });
    }

    /// Record a search keystroke (debounced).
    pub fn search_input(&mut self, query: &str) {
        self.search.note_input(query, &self.tx);
    }

    /// Select a security. The sole trigger for changing the current
    /// security; supersedes any in-flight pipeline.
    pub fn select_security(&mut self, security_id: i64) {
        self.current_security = Some(security_id);
        self.start_pipeline(security_id);
    }

    /// Re-run the pipeline for the current security.
    pub fn retry(&mut self) {
        match self.current_security {
            Some(id) => self.start_pipeline(id),
            None => log::debug!("retry invoked with no selection"),
        }
    }

    /// Toggle an indicator. In Ready state this refetches and reapplies
    /// the overlay set; otherwise the set is picked up after the next
    /// successful load.
    pub fn set_indicator(&mut self, key: &str, enabled: bool) {
        let key = key.to_lowercase();
        let changed = if enabled {
            self.active_indicators.insert(key)
        } else {
            self.active_indicators.remove(key.as_str())
        };
        if !changed {
            return;
        }
        self.refresh_overlays();
    }

    /// Apply every pending message. Returns true if any message mutated
    /// panel state (stale completions do not).
    pub fn process_messages(&mut self) -> bool {
        let mut updated = false;
        while let Ok(msg) = self.rx.try_recv() {
            updated |= self.apply_message(msg);
        }
        updated
    }

    fn start_pipeline(&mut self, security_id: i64) {
        // Every pipeline start supersedes whatever is in flight.
        self.epoch += 1;
        let epoch = self.epoch;
        self.candles.clear();
        self.set_load_state(LoadState::Loading);

        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.fetch_history(security_id).await;
            let _ = tx.send(PanelMessage::HistoryLoaded {
                epoch,
                security_id,
                result,
            });
        });
    }

    fn refresh_overlays(&mut self) {
        if !self.load_state.is_ready() {
            return;
        }
        if self.active_indicators.is_empty() {
            self.overlays.clear(&mut self.charts);
            self.events.emit(PanelEvent::OverlaysUpdated { count: 0 });
            return;
        }
        self.spawn_indicator_fetch();
    }

    fn spawn_indicator_fetch(&mut self) {
        let Some(security_id) = self.current_security else {
            return;
        };
        let keys: Vec<String> = self.active_indicators.iter().cloned().collect();
        let epoch = self.epoch;

        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = gateway.fetch_indicators(security_id, keys).await;
            let _ = tx.send(PanelMessage::IndicatorsLoaded { epoch, result });
        });
    }

    fn set_load_state(&mut self, state: LoadState) {
        self.load_state = state.clone();
        self.events.emit(PanelEvent::StateChanged(state));
    }

    fn apply_message(&mut self, msg: PanelMessage) -> bool {
        match msg {
            PanelMessage::SecuritiesLoaded(Ok(securities)) => {
                let count = securities.len();
                self.search.set_securities(securities);
                self.events.emit(PanelEvent::SecuritiesLoaded { count });
                true
            }
            PanelMessage::SecuritiesLoaded(Err(err)) => {
                log::error!("security list fetch failed: {err:#}");
                self.securities_requested = false;
                self.events
                    .emit(PanelEvent::SecuritiesFailed(SECURITIES_ERROR_MESSAGE.to_string()));
                true
            }
            PanelMessage::HistoryLoaded {
                epoch,
                security_id,
                result,
            } => {
                if epoch != self.epoch {
                    log::debug!(
                        "discarding stale history for security {security_id} (epoch {epoch} != {})",
                        self.epoch
                    );
                    return false;
                }
                match result {
                    Ok(candles) => {
                        self.candles = normalize_candles(candles);
                        self.charts.set_candles(&self.candles);
                        // The previous security's overlays must not survive
                        // the reload.
                        self.overlays.clear(&mut self.charts);
                        self.set_load_state(LoadState::Ready);
                        if !self.active_indicators.is_empty() {
                            self.spawn_indicator_fetch();
                        }
                    }
                    Err(err) => {
                        log::warn!("history fetch for security {security_id} failed: {err:#}");
                        self.set_load_state(LoadState::Error(HISTORY_ERROR_MESSAGE.to_string()));
                    }
                }
                true
            }
            PanelMessage::IndicatorsLoaded { epoch, result } => {
                if epoch != self.epoch {
                    log::debug!(
                        "discarding stale indicators (epoch {epoch} != {})",
                        self.epoch
                    );
                    return false;
                }
                match result {
                    Ok(payload) => {
                        self.overlays
                            .apply(&mut self.charts, &self.active_indicators, &payload);
                        self.events.emit(PanelEvent::OverlaysUpdated {
                            count: self.overlays.len(),
                        });
                    }
                    Err(err) => {
                        // Local and recoverable: the chart already on
                        // screen is not discarded.
                        log::warn!("indicator fetch failed: {err:#}");
                        self.events
                            .emit(PanelEvent::IndicatorError(INDICATOR_ERROR_MESSAGE.to_string()));
                    }
                }
                true
            }
            PanelMessage::SearchElapsed { generation } => {
                if !self.search.timer_elapsed(generation) {
                    return false;
                }
                let results = self.search.run_filter().to_vec();
                self.events.emit(PanelEvent::SearchResults(results));
                true
            }
        }
    }
}
