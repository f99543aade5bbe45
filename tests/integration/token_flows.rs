//! Token acquisition and refresh against the token endpoint.

use super::*;
use sumup_client::{SumUpClient, SumUpError};
use test_case::test_case;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::Mock;

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_client_credentials_grant(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("Content-Type", "application/json"))
        .and(header_exists("X-SDK"))
        .and(body_partial_json(json!({
            "grant_type": "client_credentials",
            "client_id": "id",
            "client_secret": "sec"
        })))
        .respond_with(json_response(200, token_body("tok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = SumUpClient::builder()
        .credentials(
            credentials(&server, alternate_transport)
                .grant_type("client_credentials")
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap();

    let token = client.access_token();
    assert_eq!(token.value(), "tok");
    assert_eq!(token.token_type(), "Bearer");
    assert_eq!(token.expires_in(), 3600);
    assert!(token.scopes().is_empty());
    assert!(token.refresh_token().is_none());
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_password_grant(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_partial_json(json!({
            "grant_type": "password",
            "username": "merchant@example.com",
            "password": "pw",
            "scope": "payments transactions.history user.app-settings user.profile_readonly"
        })))
        .respond_with(json_response(200, token_body("tok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = SumUpClient::builder()
        .credentials(
            credentials(&server, alternate_transport)
                .grant_type("password")
                .username("merchant@example.com")
                .password("pw")
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap();

    let token = client.access_token();
    assert_eq!(token.scopes(), &["payments", "user.profile_readonly"]);
    assert_eq!(token.refresh_token(), Some("ref"));
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_preset_tokens_skip_network_until_refresh(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_partial_json(json!({
            "grant_type": "refresh_token",
            "refresh_token": "preset-ref"
        })))
        .respond_with(json_response(200, token_body("fresh")))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = SumUpClient::builder()
        .credentials(
            credentials(&server, alternate_transport)
                .access_token("preset")
                .refresh_token("preset-ref")
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap();
    assert_eq!(client.access_token().value(), "preset");

    client.refresh_token(None).await.unwrap();
    assert_eq!(client.access_token().value(), "fresh");
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_rejected_client_is_authentication_error(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(json_response(
            401,
            json!({"error_code": "NOT_AUTHORIZED", "error_message": "invalid client"}),
        ))
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

    assert_eq!(
        err,
        SumUpError::Authentication {
            message: "invalid client".to_string(),
            status_code: 401
        }
    );
}

#[tokio::test]
async fn test_missing_username_never_reaches_server() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(json_response(200, token_body("tok")))
        .expect(0)
        .mount(&server)
        .await;

    let err = SumUpClient::builder()
        .credentials(
            credentials(&server, false)
                .grant_type("password")
                .password("pw")
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap_err();

    assert!(matches!(err, SumUpError::Configuration { .. }));
}
