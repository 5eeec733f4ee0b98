/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for linguo-adapter tests

use linguo_adapter::{ClientConfig, LinguoClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> LinguoClient {
    LinguoClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Deterministic test account address
pub fn test_account() -> &'static str {
    "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
}
