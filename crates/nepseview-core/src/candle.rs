//! Candle data structures for OHLCV data.

/// OHLCV Candle data structure.
///
/// `time` is a unix timestamp in seconds. Within a series, timestamps are
/// unique and strictly increasing (see [`normalize_candles`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether the candle closed at or above its open.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Sorts candles by time ascending and collapses duplicate timestamps.
///
/// When two candles share a timestamp the later one in the input wins.
/// The result satisfies the strictly-increasing-time invariant expected by
/// every consumer of a candle sequence.
pub fn normalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.time);
    candles.reverse();
    let mut last_time: Option<i64> = None;
    candles.retain(|c| {
        if last_time == Some(c.time) {
            false
        } else {
            last_time = Some(c.time);
            true
        }
    });
    candles.reverse();
    candles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, close: f64) -> Candle {
        Candle::new(time, close, close + 1.0, close - 1.0, close, 100.0)
    }

    #[test]
    fn test_normalize_sorts_by_time() {
        let candles = vec![candle(3, 30.0), candle(1, 10.0), candle(2, 20.0)];
        let normalized = normalize_candles(candles);

        let times: Vec<i64> = normalized.iter().map(|c| c.time).collect();
        assert_eq!(times, vec![1, 2, 3]);
    }

    #[test]
    fn test_normalize_collapses_duplicates_last_wins() {
        let candles = vec![candle(1, 10.0), candle(2, 20.0), candle(2, 25.0)];
        let normalized = normalize_candles(candles);

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[1].time, 2);
        assert_eq!(normalized[1].close, 25.0);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_candles(Vec::new()).is_empty());
    }

    #[test]
    fn test_is_bullish() {
        let up = Candle::new(1, 10.0, 12.0, 9.0, 11.0, 100.0);
        let down = Candle::new(2, 11.0, 12.0, 9.0, 10.0, 100.0);
        assert!(up.is_bullish());
        assert!(!down.is_bullish());
    }
}
