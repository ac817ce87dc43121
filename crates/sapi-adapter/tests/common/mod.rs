/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for sapi-adapter tests

use sapi_adapter::{ClientConfig, Credentials, RequestSigner, SapiClient};
use secrecy::SecretString;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";
pub const TEST_SECRET_KEY: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server with the test credentials
pub fn test_client(server: &MockServer) -> SapiClient {
    let config = ClientConfig {
        base_url: Some(server.uri()),
        ..ClientConfig::default()
    };
    SapiClient::with_config(Credentials::new(TEST_API_KEY, TEST_SECRET_KEY), config)
        .expect("client init")
}

/// Check the `signature` parameter of a received request against its payload
#[allow(dead_code)]
pub fn assert_valid_signature(request: &wiremock::Request) {
    let query = request.url.query().unwrap_or_default();
    let (payload, signature) = query
        .rsplit_once("&signature=")
        .expect("signature must be the last query parameter");
    let form = String::from_utf8_lossy(&request.body);

    let secret = SecretString::from(TEST_SECRET_KEY.to_string());
    let expected = RequestSigner::new(&secret)
        .sign_payload(payload, &form)
        .expect("signing failed");
    assert_eq!(signature, expected);
}
