//! Integration tests for the NEPSE dashboard API client.
//!
//! Note: Tests marked with `#[ignore]` require a running dashboard backend
//! (set `NEPSE_DASHBOARD_URL` to point somewhere other than localhost).

use nepse_api::prelude::*;
use std::time::Duration;

/// Test creating a client with the default configuration.
#[test]
fn test_create_public_client() {
    let client = NepseClient::public();
    assert!(client.is_ok());
}

/// Test configuration builder.
#[test]
fn test_config_builder() {
    let config = Config::new("https://dashboard.example.com")
        .with_timeout(Duration::from_secs(10))
        .with_user_agent("nepseview-tests");

    assert_eq!(config.base_url, "https://dashboard.example.com");
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.user_agent, "nepseview-tests");
}

/// Test that trailing configuration defaults stay sane.
#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.base_url, nepse_api::DEFAULT_BASE_URL);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.user_agent.starts_with("nepse-api-rust/"));
}

/// Test that an empty indicator list is rejected locally.
#[tokio::test]
async fn test_empty_indicator_list_rejected() {
    let client = NepseClient::public().unwrap();
    let market = MarketApi::new(client);

    let result = market.ta_indicators(131, &[]).await;
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
}

fn live_market() -> MarketApi {
    let base_url = std::env::var("NEPSE_DASHBOARD_URL")
        .unwrap_or_else(|_| nepse_api::DEFAULT_BASE_URL.to_string());
    let client = NepseClient::new(Config::new(base_url)).unwrap();
    MarketApi::new(client)
}

/// Live test: fetch the security list.
#[tokio::test]
#[ignore]
async fn test_live_security_list() {
    let market = live_market();
    let securities = market.security_list().await.unwrap();

    assert!(!securities.is_empty());
    assert!(securities.iter().all(|s| !s.symbol.is_empty()));
}

/// Live test: fetch history and indicators for one security.
#[tokio::test]
#[ignore]
async fn test_live_history_and_indicators() {
    let market = live_market();
    let securities = market.security_list().await.unwrap();
    let first = &securities[0];

    let history = market.ta_history(first.id).await.unwrap();
    assert_eq!(history.security_id, first.id);
    // Candles arrive sorted by time ascending.
    assert!(history
        .candles
        .windows(2)
        .all(|pair| pair[0].time < pair[1].time));

    let payload = market
        .ta_indicators(first.id, &["sma20", "rsi14", "macd"])
        .await
        .unwrap();
    assert_eq!(payload.security_id, first.id);
    assert!(payload.series.contains_key("sma20"));
}
