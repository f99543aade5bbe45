//! Checkouts service end to end.

use super::*;
use sumup_client::{CreateCheckout, SumUpClient};
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::Mock;

async fn client(server: &MockServer, alternate_transport: bool) -> SumUpClient {
    SumUpClient::builder()
        .credentials(
            credentials(server, alternate_transport)
                .access_token("tok")
                .build()
                .unwrap(),
        )
        .build()
        .await
        .unwrap()
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_create_checkout(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/v0.1/checkouts"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_json(json!({
            "merchant_code": "MC123",
            "amount": 12.5,
            "currency": "EUR",
            "checkout_reference": "order-1",
            "description": ""
        })))
        .respond_with(json_response(201, json!({"id": "chk-1", "status": "PENDING"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, alternate_transport)
        .await
        .checkouts()
        .create(CreateCheckout::new(12.5, "EUR", "order-1", "MC123"))
        .await
        .unwrap();

    #[derive(serde::Deserialize)]
    struct Checkout {
        id: String,
        status: String,
    }

    let checkout: Checkout = response.json().unwrap();
    assert_eq!(checkout.id, "chk-1");
    assert_eq!(checkout.status, "PENDING");
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_find_by_reference_id(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/v0.1/checkouts"))
        .and(query_param("checkout_reference", "order 1"))
        .respond_with(json_response(200, json!([{"id": "chk-1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, alternate_transport)
        .await
        .checkouts()
        .find_by_reference_id("order 1")
        .await
        .unwrap();

    assert_eq!(response.body().as_json().unwrap()[0]["id"], json!("chk-1"));
}

#[test_case(false ; "socket transport")]
#[test_case(true ; "reqwest transport")]
#[tokio::test]
async fn test_delete_checkout_without_content(alternate_transport: bool) {
    let server = setup_mock_server().await;

    Mock::given(method("DELETE"))
        .and(path("/v0.1/checkouts/chk-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, alternate_transport)
        .await
        .checkouts()
        .delete("chk-1")
        .await
        .unwrap();

    assert_eq!(response.http_response_code(), 204);
    assert!(response.body().is_empty());
}
