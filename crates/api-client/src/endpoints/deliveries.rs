//! Delivery endpoints
//!
//! Creation, status changes and searches over delivery orders. Timestamps are
//! terminal-local and sent in [`VENDOR_DATETIME_FORMAT`](super::VENDOR_DATETIME_FORMAT).

use super::orders::{CreateOrderSettings, OrderInfo, OrderInfoResponse};
use super::{require_ids, vendor_datetime, Caller};
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::{CorrelationResponse, Outcome};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Deliveries API interface
#[derive(Clone, Debug)]
pub struct DeliveriesApi {
    caller: Caller,
}

impl DeliveriesApi {
    pub(crate) fn new(client: IikoClient) -> Self {
        Self {
            caller: Caller::new(client),
        }
    }

    /// Override the vendor `Timeout` for calls made through this interface
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.caller.set_timeout(timeout);
        self
    }

    /// Create a delivery order
    ///
    /// POST /api/1/deliveries/create
    pub async fn create(
        &self,
        params: &CreateDeliveryParams,
    ) -> ApiResult<Outcome<OrderInfoResponse>> {
        self.caller.call("/api/1/deliveries/create", params).await
    }

    /// Move a delivery to `Waiting`, `OnWay` or `Delivered`.
    ///
    /// `delivered_at` is only sent for [`DeliveryStatus::Delivered`] and defaults
    /// to the current local time.
    ///
    /// POST /api/1/deliveries/update_order_delivery_status
    pub async fn update_status(
        &self,
        organization_id: &str,
        order_id: &str,
        status: DeliveryStatus,
        delivered_at: Option<NaiveDateTime>,
    ) -> ApiResult<Outcome<CorrelationResponse>> {
        self.caller
            .call(
                "/api/1/deliveries/update_order_delivery_status",
                &UpdateStatusRequest::new(organization_id, order_id, status, delivered_at),
            )
            .await
    }

    /// Confirm a delivery
    ///
    /// POST /api/1/deliveries/confirm
    pub async fn confirm(
        &self,
        organization_id: &str,
        order_id: &str,
    ) -> ApiResult<Outcome<CorrelationResponse>> {
        self.caller
            .call(
                "/api/1/deliveries/confirm",
                &OrderRequest {
                    organization_id,
                    order_id,
                },
            )
            .await
    }

    /// Cancel a delivery confirmation
    ///
    /// POST /api/1/deliveries/cancel_confirmation
    pub async fn cancel_confirmation(
        &self,
        organization_id: &str,
        order_id: &str,
    ) -> ApiResult<Outcome<CorrelationResponse>> {
        self.caller
            .call(
                "/api/1/deliveries/cancel_confirmation",
                &OrderRequest {
                    organization_id,
                    order_id,
                },
            )
            .await
    }

    /// Deliveries in a date range, optionally filtered by status and source
    ///
    /// POST /api/1/deliveries/by_delivery_date_and_status
    pub async fn by_delivery_date_and_status(
        &self,
        params: &DeliveriesByDateParams,
    ) -> ApiResult<Outcome<DeliveriesResponse>> {
        require_ids(
            "by_delivery_date_and_status",
            "organization_ids",
            &params.organization_ids,
        )?;
        self.caller
            .call("/api/1/deliveries/by_delivery_date_and_status", params)
            .await
    }

    /// Deliveries matching a combined filter
    ///
    /// POST /api/1/deliveries/by_delivery_date_and_source_key_and_filter
    pub async fn by_delivery_date_and_source_key_and_filter(
        &self,
        params: &DeliverySearchParams,
    ) -> ApiResult<Outcome<DeliveriesResponse>> {
        require_ids(
            "by_delivery_date_and_source_key_and_filter",
            "organization_ids",
            &params.organization_ids,
        )?;
        self.caller
            .call(
                "/api/1/deliveries/by_delivery_date_and_source_key_and_filter",
                params,
            )
            .await
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Statuses a delivery can be switched between by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// Waiting for a courier
    Waiting,
    /// On the way
    OnWay,
    /// Handed to the guest
    Delivered,
}

/// Every status a delivery order can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryOrderStatus {
    /// Not confirmed yet
    Unconfirmed,
    /// Waiting to be cooked
    WaitCooking,
    /// Ready for cooking
    ReadyForCooking,
    /// Cooking started
    CookingStarted,
    /// Cooking completed
    CookingCompleted,
    /// Waiting for a courier
    Waiting,
    /// On the way
    OnWay,
    /// Delivered
    Delivered,
    /// Closed
    Closed,
    /// Cancelled
    Cancelled,
}

/// Parameters for creating a delivery order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryParams {
    /// Organization ID
    pub organization_id: String,
    /// Terminal group; iiko picks one when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_group_id: Option<String>,
    /// Order body as defined by the iiko API
    pub order: Value,
    /// Creation settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_order_settings: Option<CreateOrderSettings>,
}

impl CreateDeliveryParams {
    /// Parameters for one delivery order
    pub fn new(organization_id: impl Into<String>, order: Value) -> Self {
        Self {
            organization_id: organization_id.into(),
            terminal_group_id: None,
            order,
            create_order_settings: None,
        }
    }

    /// Send the order to a specific terminal group
    #[must_use]
    pub fn with_terminal_group(mut self, id: impl Into<String>) -> Self {
        self.terminal_group_id = Some(id.into());
        self
    }

    /// Set the transport-to-front timeout in seconds
    #[must_use]
    pub fn with_transport_timeout(mut self, seconds: u64) -> Self {
        self.create_order_settings = Some(CreateOrderSettings {
            transport_to_front_timeout: seconds,
        });
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderRequest<'a> {
    organization_id: &'a str,
    order_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatusRequest<'a> {
    organization_id: &'a str,
    order_id: &'a str,
    delivery_status: DeliveryStatus,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "vendor_datetime::option::serialize"
    )]
    delivery_date: Option<NaiveDateTime>,
}

impl<'a> UpdateStatusRequest<'a> {
    fn new(
        organization_id: &'a str,
        order_id: &'a str,
        status: DeliveryStatus,
        delivered_at: Option<NaiveDateTime>,
    ) -> Self {
        let delivery_date = (status == DeliveryStatus::Delivered)
            .then(|| delivered_at.unwrap_or_else(|| Local::now().naive_local()));
        Self {
            organization_id,
            order_id,
            delivery_status: status,
            delivery_date,
        }
    }
}

/// Parameters for `by_delivery_date_and_status`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveriesByDateParams {
    /// Organizations to search in
    pub organization_ids: Vec<String>,
    /// Lower bound of the delivery date
    #[serde(serialize_with = "vendor_datetime::serialize")]
    pub delivery_date_from: NaiveDateTime,
    /// Upper bound of the delivery date
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "vendor_datetime::option::serialize"
    )]
    pub delivery_date_to: Option<NaiveDateTime>,
    /// Allowed statuses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<DeliveryOrderStatus>>,
    /// Source keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_keys: Option<Vec<String>>,
}

impl DeliveriesByDateParams {
    /// Deliveries from `from` onwards
    #[must_use]
    pub fn new(organization_ids: Vec<String>, from: NaiveDateTime) -> Self {
        Self {
            organization_ids,
            delivery_date_from: from,
            delivery_date_to: None,
            statuses: None,
            source_keys: None,
        }
    }

    /// Set the upper bound
    #[must_use]
    pub fn until(mut self, to: NaiveDateTime) -> Self {
        self.delivery_date_to = Some(to);
        self
    }

    /// Restrict to the given statuses
    #[must_use]
    pub fn with_statuses(mut self, statuses: Vec<DeliveryOrderStatus>) -> Self {
        self.statuses = Some(statuses);
        self
    }

    /// Restrict to the given source keys
    #[must_use]
    pub fn with_source_keys(mut self, keys: Vec<String>) -> Self {
        self.source_keys = Some(keys);
        self
    }
}

/// Parameters for `by_delivery_date_and_source_key_and_filter`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySearchParams {
    /// Organizations to search in
    pub organization_ids: Vec<String>,
    /// Terminal groups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_group_ids: Option<Vec<String>>,
    /// Lower bound of the delivery date
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "vendor_datetime::option::serialize"
    )]
    pub delivery_date_from: Option<NaiveDateTime>,
    /// Upper bound of the delivery date
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "vendor_datetime::option::serialize"
    )]
    pub delivery_date_to: Option<NaiveDateTime>,
    /// Allowed statuses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<DeliveryOrderStatus>>,
    /// Only deliveries with (or without) a problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_problem: Option<bool>,
    /// `DeliveryByCourier` or `DeliveryByClient`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_service_type: Option<String>,
    /// Prefix search text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    /// Error timeout for time-to-cooking, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_cooking_error_timeout: Option<i64>,
    /// Expected cooking time, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_timeout: Option<i64>,
    /// `Number`, `CompleteBefore`, `Sum`, `Customer`, `Courier` or `Status`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_property: Option<String>,
    /// `Ascending` or `Descending`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<String>,
    /// Maximum number of orders returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_count: Option<u32>,
    /// Source keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_keys: Option<Vec<String>>,
    /// Order IDs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_ids: Option<Vec<String>>,
}

impl DeliverySearchParams {
    /// Search within the given organizations
    #[must_use]
    pub fn new(organization_ids: Vec<String>) -> Self {
        Self {
            organization_ids,
            ..Self::default()
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Orders of one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationOrders {
    /// Organization ID
    pub organization_id: String,
    /// Orders
    #[serde(default)]
    pub orders: Vec<OrderInfo>,
}

impl OrganizationOrders {
    /// First order assigned to the courier with this ID
    #[must_use]
    pub fn find_by_courier_id(&self, courier_id: &str) -> Option<&OrderInfo> {
        self.orders.iter().find(|o| o.is_assigned_to(courier_id))
    }

    /// First order assigned to a courier with this display name
    #[must_use]
    pub fn find_by_courier_name(&self, courier_name: &str) -> Option<&OrderInfo> {
        self.orders
            .iter()
            .find(|o| o.courier().and_then(|c| c.name.as_deref()) == Some(courier_name))
    }
}

/// Response of the delivery searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveriesResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Revision of the returned data
    #[serde(default)]
    pub max_revision: i64,
    /// Orders grouped by organization
    #[serde(default)]
    pub orders_by_organizations: Vec<OrganizationOrders>,
}

impl DeliveriesResponse {
    /// Every returned order
    pub fn orders(&self) -> impl Iterator<Item = &OrderInfo> {
        self.orders_by_organizations
            .iter()
            .flat_map(|o| o.orders.iter())
    }

    /// Orders assigned to the courier with this ID, across organizations
    pub fn orders_for_courier<'a>(
        &'a self,
        courier_id: &'a str,
    ) -> impl Iterator<Item = &'a OrderInfo> {
        self.orders().filter(move |o| o.is_assigned_to(courier_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_delivery_date_only_for_delivered() {
        let request =
            UpdateStatusRequest::new("org", "o1", DeliveryStatus::OnWay, Some(at(12, 0)));
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(
            body,
            json!({"organizationId": "org", "orderId": "o1", "deliveryStatus": "OnWay"})
        );

        let body = serde_json::to_value(UpdateStatusRequest::new(
            "org",
            "o1",
            DeliveryStatus::Delivered,
            Some(at(12, 30)),
        ))
        .unwrap();
        assert_eq!(body["deliveryStatus"], "Delivered");
        assert_eq!(body["deliveryDate"], "2024-05-01 12:30:00.000");
    }

    #[test]
    fn test_delivered_defaults_to_now() {
        let request = UpdateStatusRequest::new("org", "o1", DeliveryStatus::Delivered, None);
        assert!(request.delivery_date.is_some());
    }

    #[test]
    fn test_create_delivery_settings_shape() {
        let params = CreateDeliveryParams::new("org", json!({"phone": "+70000000000"}))
            .with_transport_timeout(30);
        let body = serde_json::to_value(&params).unwrap();
        assert_eq!(body["createOrderSettings"], json!({"transportToFrontTimeout": 30}));
        assert!(body.get("terminalGroupId").is_none());
    }

    #[test]
    fn test_by_date_params_shape() {
        let params = DeliveriesByDateParams::new(vec!["org".into()], at(9, 0))
            .until(at(21, 0))
            .with_statuses(vec![DeliveryOrderStatus::OnWay, DeliveryOrderStatus::CookingCompleted]);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "organizationIds": ["org"],
                "deliveryDateFrom": "2024-05-01 09:00:00.000",
                "deliveryDateTo": "2024-05-01 21:00:00.000",
                "statuses": ["OnWay", "CookingCompleted"]
            })
        );
    }

    #[test]
    fn test_search_params_skip_absent() {
        let params = DeliverySearchParams {
            rows_count: Some(50),
            ..DeliverySearchParams::new(vec!["org".into()])
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"organizationIds": ["org"], "rowsCount": 50})
        );
    }

    #[test]
    fn test_courier_lookups() {
        let response: DeliveriesResponse = serde_json::from_value(json!({
            "correlationId": "c",
            "maxRevision": 10,
            "ordersByOrganizations": [{
                "organizationId": "org",
                "orders": [
                    {"id": "a", "organizationId": "org", "timestamp": 1, "order": {"courierInfo": null}},
                    {"id": "b", "organizationId": "org", "timestamp": 2, "order": {"courierInfo": {"courier": {"id": "c1", "name": "Petr"}}}},
                    {"id": "c", "organizationId": "org", "timestamp": 3, "order": {"courierInfo": {"courier": {"id": "c1", "name": "Petr"}}}}
                ]
            }]
        }))
        .unwrap();

        let org = &response.orders_by_organizations[0];
        assert_eq!(org.find_by_courier_id("c1").map(|o| o.id.as_str()), Some("b"));
        assert_eq!(org.find_by_courier_name("Petr").map(|o| o.id.as_str()), Some("b"));
        assert!(org.find_by_courier_id("nobody").is_none());
        assert_eq!(response.orders_for_courier("c1").count(), 2);
        assert_eq!(response.orders().count(), 3);
    }
}
