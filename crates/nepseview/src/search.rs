//! Debounced security search.
//!
//! Filtering runs over the security list cached at init. Every keystroke
//! aborts the pending debounce timer and arms a new one; only the timer
//! that survives [`SEARCH_DEBOUNCE`] of input silence triggers a filter
//! evaluation, so rapid typing produces at most one evaluation per pause.

use std::time::Duration;

use nepseview_core::Security;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::panel::PanelMessage;

/// Input-silence window before a filter evaluation runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Result set cap for the dropdown.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Debounced free-text filter over the cached security list.
#[derive(Debug, Default)]
pub struct SearchController {
    securities: Vec<Security>,
    query: String,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    results: Vec<Security>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached security list (done once per session).
    pub fn set_securities(&mut self, securities: Vec<Security>) {
        self.securities = securities;
    }

    /// The cached security list.
    pub fn securities(&self) -> &[Security] {
        &self.securities
    }

    /// The most recent filter results.
    pub fn results(&self) -> &[Security] {
        &self.results
    }

    /// Resolve a security id against the cached list.
    pub fn find(&self, security_id: i64) -> Option<&Security> {
        self.securities.iter().find(|s| s.id == security_id)
    }

    /// Record a keystroke and re-arm the debounce timer.
    ///
    /// The previous timer is aborted outright; its evaluation is
    /// discarded, not queued. A timer that already posted its expiry
    /// before the abort is caught by the generation check in
    /// [`Self::timer_elapsed`].
    pub fn note_input(&mut self, query: impl Into<String>, tx: &UnboundedSender<PanelMessage>) {
        self.query = query.into();
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.generation += 1;

        let generation = self.generation;
        let tx = tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(SEARCH_DEBOUNCE).await;
            let _ = tx.send(PanelMessage::SearchElapsed { generation });
        }));
    }

    /// Whether a timer expiry is still current. Stale expiries are dropped.
    pub fn timer_elapsed(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            log::debug!(
                "discarding stale search timer (generation {generation} != {})",
                self.generation
            );
            return false;
        }
        self.pending = None;
        true
    }

    /// Run the filter for the current query and store the results.
    pub fn run_filter(&mut self) -> &[Security] {
        self.results = filter_securities(&self.securities, &self.query);
        &self.results
    }
}

/// Case-insensitive substring match over `"{symbol} {name}"`, capped at
/// [`MAX_SEARCH_RESULTS`]. An empty query yields no matches.
pub fn filter_securities(securities: &[Security], query: &str) -> Vec<Security> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    securities
        .iter()
        .filter(|s| {
            format!("{} {}", s.symbol, s.name)
                .to_lowercase()
                .contains(&needle)
        })
        .take(MAX_SEARCH_RESULTS)
        .cloned()
        .collect()
}
