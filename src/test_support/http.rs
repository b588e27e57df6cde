use std::panic::{self, AssertUnwindSafe};

use httpmock::MockServer;

/// Starts a fresh `httpmock::MockServer`, or returns `None` when the sandbox
/// does not allow binding a local port.
pub fn try_start_mock_server() -> Option<MockServer> {
    panic::catch_unwind(AssertUnwindSafe(MockServer::start)).ok()
}

/// API client pointed at `server` with a fixed bearer token.
pub fn api_client_for(server: &MockServer) -> crate::api::ApiClient {
    let headers = crate::http::DefaultHeaders::new();
    headers.set_bearer_token("test-token");
    crate::api::ApiClient::new(headers)
        .unwrap()
        .with_base_url(server.base_url())
}
