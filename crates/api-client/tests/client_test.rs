//! Session and dispatch behavior against a mock iiko server

use iiko_cloud_api::endpoints::organizations::ListOrganizationsParams;
use iiko_cloud_api::prelude::*;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::time::Duration;

const TOKEN_PATH: &str = "/api/1/access_token";
const ORGANIZATIONS_PATH: &str = "/api/1/organizations";

fn config(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new("test-login").with_base_url(server.url())
}

async fn client_with_token(server: &ServerGuard, token: &str) -> IikoClient {
    IikoClient::with_config(config(server).with_working_token(token))
        .await
        .unwrap()
}

fn organizations_body() -> String {
    json!({
        "correlationId": "c-orgs",
        "organizations": [
            {"id": "org-1", "name": "Central Kitchen"},
            {"id": "org-2", "name": "Riverside"}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_working_token_call_skips_exchange() {
    let mut server = Server::new_async().await;
    let exchange = server
        .mock("POST", TOKEN_PATH)
        .expect(0)
        .create_async()
        .await;
    let orgs = server
        .mock("POST", ORGANIZATIONS_PATH)
        .match_header("authorization", "Bearer preset")
        .with_status(200)
        .with_body(organizations_body())
        .expect(1)
        .create_async()
        .await;

    let client = client_with_token(&server, "preset").await;
    let outcome = client
        .organizations()
        .list(&ListOrganizationsParams::default())
        .await
        .unwrap();

    assert!(outcome.is_success());
    exchange.assert_async().await;
    orgs.assert_async().await;
}

#[tokio::test]
async fn test_construction_exchanges_login_once() {
    let mut server = Server::new_async().await;
    let exchange = server
        .mock("POST", TOKEN_PATH)
        .match_body(Matcher::Json(json!({"apiLogin": "test-login"})))
        .with_status(200)
        .with_body(r#"{"correlationId":"c-token","token":"fresh"}"#)
        .expect(1)
        .create_async()
        .await;
    let orgs = server
        .mock("POST", ORGANIZATIONS_PATH)
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_body(organizations_body())
        .expect(2)
        .create_async()
        .await;

    let client = IikoClient::with_config(config(&server)).await.unwrap();
    assert_eq!(client.token().as_deref(), Some("fresh"));

    for _ in 0..2 {
        let outcome = client
            .organizations()
            .list(&ListOrganizationsParams::default())
            .await
            .unwrap();
        assert!(outcome.is_success());
    }

    exchange.assert_async().await;
    orgs.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_triggers_one_refresh_and_replay() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("POST", ORGANIZATIONS_PATH)
        .match_header("authorization", "Bearer old")
        .with_status(401)
        .with_body("Unauthorized")
        .expect(1)
        .create_async()
        .await;
    let exchange = server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"token":"new"}"#)
        .expect(1)
        .create_async()
        .await;
    let replayed = server
        .mock("POST", ORGANIZATIONS_PATH)
        .match_header("authorization", "Bearer new")
        .with_status(200)
        .with_body(organizations_body())
        .expect(1)
        .create_async()
        .await;

    let client = client_with_token(&server, "old").await;
    let response = client
        .organizations()
        .list(&ListOrganizationsParams::default())
        .await
        .unwrap()
        .success()
        .unwrap();

    assert_eq!(response.ids(), vec!["org-1", "org-2"]);
    assert_eq!(client.token().as_deref(), Some("new"));
    rejected.assert_async().await;
    exchange.assert_async().await;
    replayed.assert_async().await;
}

#[tokio::test]
async fn test_second_unauthorized_is_a_fault() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("POST", ORGANIZATIONS_PATH)
        .with_status(401)
        .with_body("Unauthorized")
        .expect(2)
        .create_async()
        .await;
    let exchange = server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"token":"still-bad"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_with_token(&server, "old").await;
    let err = client
        .organizations()
        .list(&ListOrganizationsParams::default())
        .await
        .unwrap_err();

    assert!(err.is_transport_error());
    assert!(err.to_string().contains("401"));
    rejected.assert_async().await;
    exchange.assert_async().await;
}

#[tokio::test]
async fn test_error_payload_with_success_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/1/cancel_causes")
        .with_status(200)
        .with_body(r#"{"errorDescription":"bad id"}"#)
        .create_async()
        .await;

    let client = client_with_token(&server, "tok").await;
    let outcome = client
        .dictionaries()
        .cancel_causes(&["org-1"])
        .await
        .unwrap();

    let error = outcome.error().unwrap();
    assert_eq!(error.error_description.as_deref(), Some("bad id"));
    assert_eq!(error.status_code, Some(200));
}

#[tokio::test]
async fn test_error_payload_with_client_error_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/1/cancel_causes")
        .with_status(400)
        .with_body(
            json!({
                "correlationId": "c1",
                "errorDescription": "Organization not found",
                "error": "ORG_NOT_FOUND"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_with_token(&server, "tok").await;
    let error = client
        .dictionaries()
        .cancel_causes(&["missing"])
        .await
        .unwrap()
        .error()
        .unwrap();

    assert_eq!(error.status_code, Some(400));
    assert_eq!(error.error.as_deref(), Some("ORG_NOT_FOUND"));
    assert_eq!(error.correlation_id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn test_token_exchange_error_description() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TOKEN_PATH)
        .with_status(401)
        .with_body(r#"{"errorDescription":"Login 'test-login' is not authorized"}"#)
        .create_async()
        .await;

    let err = IikoClient::with_config(config(&server)).await.unwrap_err();
    assert!(err.is_token_error());
    assert!(err.to_string().contains("is not authorized"));
}

#[tokio::test]
async fn test_non_json_body_is_a_fault() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", ORGANIZATIONS_PATH)
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let client = client_with_token(&server, "tok").await;
    let err = client
        .organizations()
        .list(&ListOrganizationsParams::default())
        .await
        .unwrap_err();

    assert!(err.is_transport_error());
    assert!(client.last_response().is_none());
}

#[tokio::test]
async fn test_empty_ids_send_nothing() {
    let mut server = Server::new_async().await;
    let never = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_with_token(&server, "tok").await;
    let empty: Vec<String> = Vec::new();

    let err = client.dictionaries().payment_types(&empty).await.unwrap_err();
    assert!(err.is_parameter_error());
    let err = client
        .terminal_groups()
        .is_alive(&["org"], &empty)
        .await
        .unwrap_err();
    assert!(err.is_parameter_error());

    never.assert_async().await;
}

#[tokio::test]
async fn test_raw_call_returns_body_unchanged() {
    let mut server = Server::new_async().await;
    let body = json!({"errorDescription": "bad id", "extra": [1, 2, 3]});
    server
        .mock("POST", "/api/1/custom")
        .match_body(Matcher::Json(json!({})))
        .with_status(400)
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = client_with_token(&server, "tok").await;
    let raw = client
        .post_raw::<Value>("/api/1/custom", None, None)
        .await
        .unwrap();

    assert_eq!(raw, body);
    assert_eq!(client.last_response(), Some(body));
}

#[tokio::test]
async fn test_listing_fills_organization_cache() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", ORGANIZATIONS_PATH)
        .with_status(200)
        .with_body(organizations_body())
        .create_async()
        .await;

    let client = client_with_token(&server, "tok").await;
    assert!(client.organization_ids().is_none());

    client
        .organizations()
        .list(&ListOrganizationsParams::default())
        .await
        .unwrap();

    assert_eq!(
        client.organization_ids(),
        Some(vec!["org-1".to_string(), "org-2".to_string()])
    );
    let cached = client.cached_organizations().unwrap();
    assert_eq!(cached[0].name, "Central Kitchen");

    let last = client.last_response().unwrap();
    assert_eq!(last["correlationId"], "c-orgs");
}

#[tokio::test]
async fn test_timeout_and_custom_headers() {
    let mut server = Server::new_async().await;
    let default_timeout = server
        .mock("POST", "/api/1/cancel_causes")
        .match_header("timeout", "15")
        .match_header("x-source", "pos")
        .match_header("content-type", "application/json")
        .match_header("x-request-id", Matcher::Any)
        .with_status(200)
        .with_body(r#"{"cancelCauses":[]}"#)
        .expect(1)
        .create_async()
        .await;
    let long_timeout = server
        .mock("POST", "/api/1/payment_types")
        .match_header("timeout", "45")
        .with_status(200)
        .with_body(r#"{"paymentTypes":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = IikoClient::with_config(
        config(&server)
            .with_working_token("tok")
            .with_header("X-Source", "pos"),
    )
    .await
    .unwrap();

    client.dictionaries().cancel_causes(&["org"]).await.unwrap();
    client
        .dictionaries()
        .with_timeout(Duration::from_secs(45))
        .payment_types(&["org"])
        .await
        .unwrap();

    default_timeout.assert_async().await;
    long_timeout.assert_async().await;
}

#[tokio::test]
async fn test_sub_second_timeouts_round_up() {
    let mut server = Server::new_async().await;
    let half_second = server
        .mock("POST", "/api/1/tips_types")
        .match_header("timeout", "1")
        .with_status(200)
        .with_body(r#"{"tipsTypes":[]}"#)
        .expect(1)
        .create_async()
        .await;
    let one_and_a_half = server
        .mock("POST", "/api/1/cancel_causes")
        .match_header("timeout", "2")
        .with_status(200)
        .with_body(r#"{"cancelCauses":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = IikoClient::with_config(
        config(&server)
            .with_working_token("tok")
            .with_request_timeout(Duration::from_millis(500)),
    )
    .await
    .unwrap();

    client.dictionaries().tips_types().await.unwrap();
    client
        .dictionaries()
        .with_timeout(Duration::from_millis(1500))
        .cancel_causes(&["org"])
        .await
        .unwrap();

    half_second.assert_async().await;
    one_and_a_half.assert_async().await;
}

#[tokio::test]
async fn test_connection_failure_is_a_fault() {
    // Nothing listens on port 9.
    let client = IikoClient::with_config(
        ClientConfig::new("test-login")
            .with_base_url("http://127.0.0.1:9")
            .with_working_token("tok"),
    )
    .await
    .unwrap();

    let err = client
        .dictionaries()
        .cancel_causes(&["org"])
        .await
        .unwrap_err();

    assert!(err.is_transport_error());
    match &err {
        ApiError::RequestFailed { context, .. } => {
            assert_eq!(context.endpoint, "/api/1/cancel_causes");
            assert_eq!(context.method, "POST");
            assert!(context.request_id.is_some());
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("/api/1/cancel_causes"));
    assert!(client.last_response().is_none());
}

#[tokio::test]
async fn test_manual_refresh_replaces_token() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", TOKEN_PATH)
        .with_status(200)
        .with_body(r#"{"token":"second"}"#)
        .create_async()
        .await;

    let client = client_with_token(&server, "first").await;
    let before = client.token_acquired_at().unwrap();

    let state = client.refresh_token().await.unwrap();
    assert_eq!(state.token(), "second");
    assert_eq!(client.token().as_deref(), Some("second"));
    assert!(client.token_acquired_at().unwrap() >= before);
    assert!(!client.ensure_fresh_token().await.unwrap());
}
