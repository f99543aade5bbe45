//! Transport behaviour: headers, error envelopes, failures.

use super::*;
use sumup_client::{create_transport, Response, ResponseBody, SumUpClient, SumUpError};
use test_case::test_case;
use wiremock::matchers::{header, method, path};
use wiremock::Mock;

async fn client_with_token(server: &MockServer, alternate_transport: bool) -> SumUpClient {
    SumUpClient::builder()
        .credentials(
            credentials(server, alternate_transport)
                .access_token("tok")
                .header("X-SDK", "partner-sdk/1.0")
                .header("X-Partner", "acme")
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap()
}

async fn get_me(
    server: &MockServer,
    alternate_transport: bool,
    reply: ResponseTemplate,
) -> Result<Response, SumUpError> {
    Mock::given(method("GET"))
        .and(path("/v0.1/me"))
        .respond_with(reply)
        .mount(server)
        .await;

    client_with_token(server, alternate_transport)
        .await
        .custom()
        .request("GET", "/v0.1/me", None)
        .await
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_custom_headers_override_standard_headers(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v0.1/me"))
        .and(header("Authorization", "Bearer tok"))
        .and(header("X-SDK", "partner-sdk/1.0"))
        .and(header("X-Partner", "acme"))
        .respond_with(json_response(200, json!({"merchant_code": "MC123"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_with_token(&server, alternate_transport)
        .await
        .custom()
        .request("GET", "/v0.1/me", None)
        .await
        .unwrap();

    assert_eq!(response.http_response_code(), 200);
    assert_eq!(
        response.body().as_json().unwrap()["merchant_code"],
        json!("MC123")
    );
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_not_authorized_envelope_with_success_status(alternate_transport: bool) {
    let server = setup_mock_server().await;
    let err = get_me(
        &server,
        alternate_transport,
        json_response(200, json!({"error_code": "NOT_AUTHORIZED", "error_message": "bad token"})),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        SumUpError::Authentication {
            message: "bad token".to_string(),
            status_code: 200
        }
    );
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_validation_list_envelope(alternate_transport: bool) {
    let server = setup_mock_server().await;
    let err = get_me(
        &server,
        alternate_transport,
        json_response(
            200,
            json!([
                {"error_code": "MISSING", "param": "username"},
                {"error_code": "MISSING", "param": "lastname"}
            ]),
        ),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.invalid_fields().unwrap(),
        &["username".to_string(), "lastname".to_string()]
    );
    assert_eq!(err.to_string(), "Validation error in: username, lastname");
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_client_error_message_is_probed(alternate_transport: bool) {
    let server = setup_mock_server().await;
    let err = get_me(
        &server,
        alternate_transport,
        json_response(404, json!({"message": "not found"})),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        SumUpError::Response {
            message: "not found".to_string(),
            status_code: 404
        }
    );
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_server_error_with_raw_body(alternate_transport: bool) {
    let server = setup_mock_server().await;
    let err = get_me(
        &server,
        alternate_transport,
        ResponseTemplate::new(503).set_body_string("upstream unavailable"),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        SumUpError::Server {
            message: "Server error".to_string(),
            status_code: 503
        }
    );
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_non_json_success_body_is_raw(alternate_transport: bool) {
    let server = setup_mock_server().await;
    let response = get_me(
        &server,
        alternate_transport,
        ResponseTemplate::new(200).set_body_string("OK"),
    )
    .await
    .unwrap();

    assert_eq!(response.body(), &ResponseBody::Raw(b"OK".to_vec()));
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_refused_connection_is_connection_error(alternate_transport: bool) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = SumUpClient::builder()
        .credentials(
            Credentials::builder()
                .client_id("id")
                .client_secret("sec")
                .grant_type("client_credentials")
                .base_url(format!("http://{}", addr))
                .use_alternate_transport(alternate_transport)
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, SumUpError::Connection { .. }), "{:?}", err);
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_redirect_is_returned_unfollowed(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v0.1/other"))
        .respond_with(json_response(200, json!({"ok": true})))
        .expect(0)
        .mount(&server)
        .await;

    let response = get_me(
        &server,
        alternate_transport,
        ResponseTemplate::new(302).insert_header("Location", "/v0.1/other"),
    )
    .await
    .unwrap();

    assert_eq!(response.http_response_code(), 302);
    assert!(response.body().is_empty());
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_redirect_on_token_endpoint_is_not_resent(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/elsewhere"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/elsewhere"))
        .respond_with(json_response(200, token_body("tok")))
        .expect(0)
        .mount(&server)
        .await;

    let err = SumUpClient::builder()
        .credentials(
            credentials(&server, alternate_transport)
                .grant_type("client_credentials")
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, SumUpError::Sdk { code: Some(302), .. }), "{:?}", err);
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
fn test_transport_accepts_ca_bundle(alternate_transport: bool) {
    let credentials = Credentials::builder()
        .client_id("id")
        .client_secret("sec")
        .ca_bundle_path(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/test-ca.pem"))
        .use_alternate_transport(alternate_transport)
        .build()
        .unwrap();

    assert!(create_transport(&credentials).is_ok());
}
