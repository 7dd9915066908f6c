//! Request bodies and response decoding of individual endpoint groups

use chrono::NaiveDate;
use iiko_cloud_api::endpoints::commands::CommandState;
use iiko_cloud_api::endpoints::customers::{CustomerIdentifier, WalletOperation};
use iiko_cloud_api::endpoints::deliveries::DeliveryStatus;
use iiko_cloud_api::endpoints::orders::CreateOrderParams;
use iiko_cloud_api::prelude::*;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

async fn client(server: &ServerGuard) -> IikoClient {
    IikoClient::with_config(
        ClientConfig::new("test-login")
            .with_base_url(server.url())
            .with_working_token("tok"),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_delivered_status_carries_delivery_date() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/1/deliveries/update_order_delivery_status")
        .match_body(Matcher::Json(json!({
            "organizationId": "org",
            "orderId": "o1",
            "deliveryStatus": "Delivered",
            "deliveryDate": "2024-03-05 18:04:09.120"
        })))
        .with_status(200)
        .with_body(r#"{"correlationId":"c1"}"#)
        .create_async()
        .await;

    let delivered_at = NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_milli_opt(18, 4, 9, 120)
        .unwrap();
    let response = client(&server)
        .await
        .deliveries()
        .update_status("org", "o1", DeliveryStatus::Delivered, Some(delivered_at))
        .await
        .unwrap()
        .success()
        .unwrap();

    assert_eq!(response.correlation_id.as_deref(), Some("c1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_on_way_status_omits_delivery_date() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/1/deliveries/update_order_delivery_status")
        .match_body(Matcher::Json(json!({
            "organizationId": "org",
            "orderId": "o1",
            "deliveryStatus": "OnWay"
        })))
        .with_status(200)
        .with_body(r#"{"correlationId":"c2"}"#)
        .create_async()
        .await;

    client(&server)
        .await
        .deliveries()
        .update_status("org", "o1", DeliveryStatus::OnWay, None)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_order_and_follow_command() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/1/order/create")
        .match_body(Matcher::PartialJson(json!({
            "organizationId": "org",
            "terminalGroupId": "tg",
            "createOrderSettings": {"transportToFrontTimeout": 30}
        })))
        .with_status(200)
        .with_body(
            json!({
                "correlationId": "c-create",
                "orderInfo": {
                    "id": "o1",
                    "organizationId": "org",
                    "timestamp": 1_700_000_000,
                    "creationStatus": "InProgress"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let status = server
        .mock("POST", "/api/1/commands/status")
        .match_body(Matcher::Json(json!({
            "organizationId": "org",
            "correlationId": "c-create"
        })))
        .with_status(200)
        .with_body(r#"{"state":"Success"}"#)
        .create_async()
        .await;

    let client = client(&server).await;
    let params =
        CreateOrderParams::new("org", "tg", json!({"items": []})).with_transport_timeout(30);
    let created = client
        .orders()
        .create(&params)
        .await
        .unwrap()
        .success()
        .unwrap();
    assert!(created.order_info.order.is_none());

    let correlation_id = created.correlation_id.unwrap();
    let state = client
        .commands()
        .status("org", &correlation_id)
        .await
        .unwrap()
        .success()
        .unwrap();
    assert_eq!(state.state, CommandState::Success);
    assert!(state.is_finished());

    create.assert_async().await;
    status.assert_async().await;
}

#[tokio::test]
async fn test_customer_lookup_by_phone() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/1/loyalty/iiko/customer/info")
        .match_body(Matcher::Json(json!({
            "organizationId": "org",
            "type": "phone",
            "phone": "+79990000000"
        })))
        .with_status(200)
        .with_body(
            json!({
                "id": "cust",
                "name": "Olga",
                "walletBalances": [{"id": "w1", "name": "Bonus", "type": 1, "balance": 120.0}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let customer = client(&server)
        .await
        .customers()
        .info("org", &CustomerIdentifier::Phone("+79990000000".into()))
        .await
        .unwrap()
        .success()
        .unwrap();

    assert_eq!(customer.wallet_balance("w1"), Some(120.0));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_wallet_hold_and_cancel() {
    let mut server = Server::new_async().await;
    let hold = server
        .mock("POST", "/api/1/loyalty/iiko/customer/wallet/hold")
        .match_body(Matcher::Json(json!({
            "customerId": "cust",
            "walletId": "w1",
            "sum": 50.0,
            "organizationId": "org"
        })))
        .with_status(200)
        .with_body(r#"{"transactionId":"tx-1"}"#)
        .create_async()
        .await;
    let cancel = server
        .mock("POST", "/api/1/loyalty/iiko/customer/wallet/cancel_hold")
        .match_body(Matcher::Json(json!({
            "organizationId": "org",
            "transactionId": "tx-1"
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = client(&server).await;
    let customers = client.customers();
    let held = customers
        .hold(&WalletOperation::new("org", "cust", "w1", 50.0))
        .await
        .unwrap()
        .success()
        .unwrap();
    assert_eq!(held.transaction_id, "tx-1");

    let cancelled = customers.cancel_hold("org", &held.transaction_id).await.unwrap();
    assert!(cancelled.is_success());

    hold.assert_async().await;
    cancel.assert_async().await;
}

#[tokio::test]
async fn test_couriers_lookup_by_code() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/1/employees/couriers")
        .match_body(Matcher::Json(json!({"organizationIds": ["org"]})))
        .with_status(200)
        .with_body(
            json!({
                "employees": [{
                    "organizationId": "org",
                    "items": [{"id": "courier-1", "displayName": "Anna", "code": "17"}]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client(&server).await;
    let couriers = client
        .employees()
        .couriers("org")
        .await
        .unwrap()
        .success()
        .unwrap();

    let courier = couriers.find_by_code("17").unwrap();
    assert_eq!(courier.id, "courier-1");
}

#[tokio::test]
async fn test_blank_organization_rejected_locally() {
    let mut server = Server::new_async().await;
    let never = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client(&server).await;
    let err = client.coupons().coupon_series("").await.unwrap_err();
    assert!(err.is_parameter_error());
    let err = client.coupons().coupon_info(" ", "0001", None).await.unwrap_err();
    assert!(err.is_parameter_error());

    never.assert_async().await;
}

#[tokio::test]
async fn test_nomenclature_revision() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/1/nomenclature")
        .match_body(Matcher::Json(json!({"organizationId": "org", "startRevision": 41})))
        .with_status(200)
        .with_body(
            json!({
                "correlationId": "c",
                "groups": [],
                "productCategories": [],
                "products": [],
                "sizes": [],
                "revision": 42
            })
            .to_string(),
        )
        .create_async()
        .await;

    let nomenclature = client(&server)
        .await
        .menu()
        .nomenclature("org", Some(41))
        .await
        .unwrap()
        .success()
        .unwrap();

    assert_eq!(nomenclature.revision, 42);
    mock.assert_async().await;
}
