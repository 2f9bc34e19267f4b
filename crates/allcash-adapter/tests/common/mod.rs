/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for allcash-adapter tests

#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use allcash_adapter::{AllcashClient, ClientConfig};
use rust_decimal::Decimal;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// API key sent verbatim in the Authorization header
pub fn mock_api_key() -> String {
    "Bearer test-api-key".to_string()
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer, demo_mode: bool) -> AllcashClient {
    let config = ClientConfig::default().with_base_url(server.uri());
    AllcashClient::with_config(mock_api_key(), demo_mode, config).expect("client init")
}

/// Client whose every request fails at the transport layer
pub fn unreachable_client(demo_mode: bool) -> AllcashClient {
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .with_timeout(Duration::from_secs(2));
    AllcashClient::with_config(mock_api_key(), demo_mode, config).expect("client init")
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("decimal")
}
