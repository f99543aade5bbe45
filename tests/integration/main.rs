//! Integration tests using WireMock
//!
//! Each scenario runs against a real HTTP server through both transports:
//! the socket transport (`use_alternate_transport = false`) and the reqwest
//! transport (`true`).

mod services;
mod token_flows;
mod transports;

use serde_json::{json, Value};
use sumup_client::{Credentials, CredentialsBuilder};
use wiremock::{MockServer, ResponseTemplate};

/// Starts a mock API server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Credentials pointing at the mock server.
pub fn credentials(server: &MockServer, alternate_transport: bool) -> CredentialsBuilder {
    Credentials::builder()
        .client_id("id")
        .client_secret("sec")
        .base_url(server.uri())
        .use_alternate_transport(alternate_transport)
}

/// A full token endpoint reply.
pub fn token_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600,
        "scope": "payments user.profile_readonly",
        "refresh_token": "ref"
    })
}

/// JSON reply with a status.
pub fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
