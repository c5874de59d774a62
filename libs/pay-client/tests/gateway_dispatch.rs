//! End-to-end tests against a mock remote: gateway discovery, dispatch,
//! and response classification.

use httpmock::prelude::*;
use pay_client::{Amount, ErrorKind, OrderCreate, PayClient, ProductQuantity};
use serde_json::json;

/// Basic token for the "S1"/"secret" identity used throughout.
const TOKEN_S1: &str = "Basic UzE6c2VjcmV0";

fn client_for(server: &MockServer) -> PayClient {
    PayClient::builder("S1", "secret")
        .api_url(server.base_url())
        .suppress_warnings(true)
        .build()
        .unwrap()
}

/// Discovery response whose single candidate points back at the mock
/// server, so subsequent order dispatch lands there too.
fn self_discovery(server: &MockServer) -> serde_json::Value {
    json!({
        "code": "SL-1",
        "tguList": [
            {"ID": 1, "share": 100.0, "domain": server.base_url(), "status": "ACTIVE"},
        ],
    })
}

#[tokio::test]
async fn first_order_call_resolves_gateway_once() {
    let server = MockServer::start();
    let discovery = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/services/config")
            .header("authorization", TOKEN_S1);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    let status = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/orders/o-1/status")
            .header("authorization", TOKEN_S1);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": "o-1", "status": {"code": 100, "action": "PAID"}}));
    });

    let client = client_for(&server);
    let first = client.orders.status("o-1").await.unwrap();
    let second = client.orders.status("o-1").await.unwrap();

    assert_eq!(first.status.code, Some(100));
    assert_eq!(second.status.code, Some(100));
    discovery.assert_calls(1);
    status.assert_calls(2);
}

#[tokio::test]
async fn discovery_ranks_candidates_by_share_descending() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
            "tguList": [
                {"ID": 1, "share": 1.0, "domain": "a.example", "status": "ACTIVE"},
                {"ID": 2, "share": 5.0, "domain": "b.example", "status": "ACTIVE"},
                {"ID": 3, "share": 3.0, "domain": "c.example", "status": "ACTIVE"},
            ],
        }));
    });

    let client = client_for(&server);
    let active = client.orders.network().resolve_gateway().await.unwrap();

    assert_eq!(active.domain, "b.example");
    let list = client.config().gateway_list().unwrap();
    let domains: Vec<&str> = list.iter().map(|h| h.domain.as_str()).collect();
    assert_eq!(domains, ["b.example", "c.example", "a.example"]);
    assert_eq!(
        client.orders.network().base_url(),
        "https://b.example"
    );
}

#[tokio::test]
async fn empty_gateway_list_fails_and_leaves_registry_unresolved() {
    let server = MockServer::start();
    let discovery = server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"tguList": []}));
    });

    let client = client_for(&server);
    let err = client.orders.status("o-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(client.config().gateway_list().is_none());
    assert!(client.config().active_gateway().is_none());
    discovery.assert_calls(1);

    // Still unresolved, so the next call retries discovery.
    let _ = client.orders.status("o-1").await.unwrap_err();
    discovery.assert_calls(2);
}

#[tokio::test]
async fn discovery_failures_are_api_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(500)
            .header("content-type", "application/json")
            .json_body(json!({"error": "maintenance"}));
    });

    let client = client_for(&server);
    let err = client.orders.status("o-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
}

#[tokio::test]
async fn create_stamps_session_service_id_over_caller_value() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/orders")
            .header("authorization", TOKEN_S1)
            .json_body(json!({
                "amount": {"value": 100},
                "serviceId": "S1",
            }));
        then.status(201)
            .header("content-type", "application/json")
            .json_body(json!({"id": "o-9", "serviceId": "S1"}));
    });

    let client = client_for(&server);
    let order = client
        .orders
        .create(&OrderCreate::new(Amount::new(100)))
        .await
        .unwrap();

    assert_eq!(order.id, "o-9");
    create.assert();
}

#[tokio::test]
async fn capture_endpoints_use_patch_with_wrapped_bodies() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    let amount = server.mock(|when, then| {
        when.method(PATCH)
            .path("/v1/orders/o-1/capture/amount")
            .json_body(json!({
                "amount": {"value": 50},
                "serviceId": "S1",
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": "o-1"}));
    });
    let products = server.mock(|when, then| {
        when.method(PATCH)
            .path("/v1/orders/o-1/capture/products")
            .json_body(json!({
                "products": [{"id": "p-1", "quantity": 2}],
                "serviceId": "S1",
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": "o-1"}));
    });
    let full = server.mock(|when, then| {
        when.method(PATCH).path("/v1/orders/o-1/capture");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": "o-1"}));
    });

    let client = client_for(&server);
    client.orders.capture_amount("o-1", &Amount::new(50)).await.unwrap();
    client
        .orders
        .capture_products(
            "o-1",
            &[ProductQuantity {
                id: "p-1".to_owned(),
                quantity: 2,
            }],
        )
        .await
        .unwrap();
    client.orders.capture("o-1").await.unwrap();

    amount.assert();
    products.assert();
    full.assert();
}

#[tokio::test]
async fn error_shaped_body_fails_even_with_success_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/orders/o-1/status");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"error": "order not found"}));
    });

    let client = client_for(&server);
    let err = client.orders.status("o-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.envelope().unwrap().error, "order not found");
}

#[tokio::test]
async fn non_string_error_field_is_still_an_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/orders/o-1/status");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"error": 42}));
    });

    let client = client_for(&server);
    let err = client.orders.status("o-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.envelope().unwrap().error, "42");
}

#[tokio::test]
async fn success_shaped_body_with_error_status_is_an_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/orders/o-1/status");
        then.status(503)
            .header("content-type", "application/json")
            .json_body(json!({"retry": true}));
    });

    let client = client_for(&server);
    let err = client.orders.status("o-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn non_json_body_is_an_api_error_with_raw_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/orders/o-1/status");
        then.status(200)
            .header("content-type", "text/plain")
            .body("boom");
    });

    let client = client_for(&server);
    let err = client.orders.status("o-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    let envelope = err.envelope().unwrap();
    assert_eq!(envelope.error, "Unhandled response format: boom");
    assert_eq!(envelope.raw.as_deref(), Some("boom"));
}

#[tokio::test]
async fn empty_order_id_is_rejected_before_any_network_call() {
    let server = MockServer::start();
    let discovery = server.mock(|when, then| {
        when.method(GET).path("/v2/services/config");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });

    let client = client_for(&server);
    let err = client.orders.status("  ").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Input);
    discovery.assert_calls(0);
}

#[tokio::test]
async fn service_calls_skip_gateway_resolution() {
    let server = MockServer::start();
    let config = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/services/config")
            .query_param("serviceId", "S1")
            .header("authorization", TOKEN_S1);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
            "code": "SL-1",
            "name": "Webshop",
            "tguList": [
                {"ID": 1, "share": 1.0, "domain": "a.example", "status": "ACTIVE"},
                {"ID": 2, "share": 9.0, "domain": "b.example", "status": "ACTIVE"},
            ],
        }));
    });

    let client = client_for(&server);
    let service = client.services.get_config().await.unwrap();
    assert_eq!(service.name.as_deref(), Some("Webshop"));

    let url = client.services.gateway_url().await.unwrap();
    assert_eq!(url, "https://b.example");

    // Two service calls, zero discovery fetches: the registry is untouched.
    config.assert_calls(2);
    assert!(client.config().active_gateway().is_none());
}

#[tokio::test]
async fn identity_change_forces_rediscovery_with_new_token() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/services/config")
            .header("authorization", TOKEN_S1);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/services/config")
            // base64("S2:secret")
            .header("authorization", "Basic UzI6c2VjcmV0");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(self_discovery(&server));
    });
    server.mock(|when, then| {
        when.method(GET).path_includes("/status");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": "o-1"}));
    });

    let client = client_for(&server);
    client.orders.status("o-1").await.unwrap();
    first.assert_calls(1);

    client.config().set_service_id("S2");
    assert!(client.config().active_gateway().is_none());

    client.orders.status("o-1").await.unwrap();
    second.assert_calls(1);
    first.assert_calls(1);
}
