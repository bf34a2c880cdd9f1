//! Listed-security type.

/// A listed security as reported by the market data service.
///
/// Immutable once fetched; the list is refreshed once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Security {
    /// Stable unique identifier assigned by the exchange.
    pub id: i64,
    /// Ticker symbol (e.g., "NABIL").
    pub symbol: String,
    /// Full company/security name.
    pub name: String,
}

impl Security {
    pub fn new(id: i64, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}
