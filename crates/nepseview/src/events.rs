//! Event queue for the host UI.
//!
//! The panel never touches the DOM/widget layer directly. It emits
//! [`PanelEvent`]s into an [`EventQueue`] which the host drains after each
//! call into the panel, mapping events onto its loading/ready/error
//! regions, search dropdown and inline error affordances.

use std::collections::VecDeque;

use nepseview_core::Security;

use crate::panel::LoadState;

/// Semantic events the host UI reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The load/error state machine moved; show the matching UI region.
    StateChanged(LoadState),
    /// The security list arrived; selector and search are usable.
    SecuritiesLoaded { count: usize },
    /// The security list could not be fetched.
    SecuritiesFailed(String),
    /// A debounced search evaluation produced results for the dropdown.
    SearchResults(Vec<Security>),
    /// The overlay set was rebuilt; `count` registry elements are drawn.
    OverlaysUpdated { count: usize },
    /// An overlay refresh failed while the chart stays on screen.
    IndicatorError(String),
}

/// A simple FIFO queue of panel events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<PanelEvent>,
}

impl EventQueue {
    /// Create a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an event to be processed by the host.
    pub fn emit(&mut self, event: PanelEvent) {
        self.events.push_back(event);
    }

    /// Drain all pending events in FIFO order.
    pub fn drain(&mut self) -> impl Iterator<Item = PanelEvent> + '_ {
        self.events.drain(..)
    }

    /// Take all pending events as an owned `Vec`, leaving the queue empty.
    #[must_use]
    pub fn take(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events).into_iter().collect()
    }

    /// Check if there are any pending events.
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get the number of pending events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Peek at the next event without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&PanelEvent> {
        self.events.front()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
