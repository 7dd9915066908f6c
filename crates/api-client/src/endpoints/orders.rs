//! Table order endpoints and the order models shared with deliveries
//!
//! Order bodies for `create` are passed through as JSON: the vendor's order
//! schema is large and changes between API versions, while the response side
//! is typed.

use super::{require_ids, Caller};
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::{IdName, Outcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Orders API interface
#[derive(Clone, Debug)]
pub struct OrdersApi {
    caller: Caller,
}

impl OrdersApi {
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

    /// Create a table order
    ///
    /// POST /api/1/order/create
    pub async fn create(
        &self,
        params: &CreateOrderParams,
    ) -> ApiResult<Outcome<OrderInfoResponse>> {
        self.caller.call("/api/1/order/create", params).await
    }

    /// Orders by ID
    ///
    /// POST /api/1/order/by_id
    pub async fn by_id(&self, params: &OrdersByIdParams) -> ApiResult<Outcome<OrdersResponse>> {
        require_ids("order_by_id", "organization_ids", &params.organization_ids)?;
        self.caller.call("/api/1/order/by_id", params).await
    }

    /// Orders placed at the given tables
    ///
    /// POST /api/1/order/by_table
    pub async fn by_table(
        &self,
        params: &OrdersByTableParams,
    ) -> ApiResult<Outcome<OrdersResponse>> {
        require_ids("order_by_table", "organization_ids", &params.organization_ids)?;
        require_ids("order_by_table", "table_ids", &params.table_ids)?;
        self.caller.call("/api/1/order/by_table", params).await
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Order creation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderSettings {
    /// Seconds to wait for the order to reach the front terminal
    pub transport_to_front_timeout: u64,
}

/// Parameters for creating a table order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderParams {
    /// Organization ID
    pub organization_id: String,
    /// Terminal group that receives the order
    pub terminal_group_id: String,
    /// Order body as defined by the iiko API
    pub order: Value,
    /// Creation settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_order_settings: Option<CreateOrderSettings>,
}

impl CreateOrderParams {
    /// Parameters for one order
    pub fn new(
        organization_id: impl Into<String>,
        terminal_group_id: impl Into<String>,
        order: Value,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            terminal_group_id: terminal_group_id.into(),
            order,
            create_order_settings: None,
        }
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

/// Parameters for `by_id`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersByIdParams {
    /// Organizations to search in
    pub organization_ids: Vec<String>,
    /// Order IDs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_ids: Option<Vec<String>>,
    /// Source keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_keys: Option<Vec<String>>,
    /// IDs assigned by the front terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_order_ids: Option<Vec<String>>,
    /// External data keys to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_external_data_keys: Option<Vec<String>>,
}

impl OrdersByIdParams {
    /// Look up orders by ID within the given organizations
    #[must_use]
    pub fn new(organization_ids: Vec<String>, order_ids: Vec<String>) -> Self {
        Self {
            organization_ids,
            order_ids: Some(order_ids),
            ..Self::default()
        }
    }
}

/// Parameters for `by_table`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersByTableParams {
    /// Organizations to search in
    pub organization_ids: Vec<String>,
    /// Table IDs
    pub table_ids: Vec<String>,
    /// Source keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_keys: Option<Vec<String>>,
    /// `New`, `Bill` or `Closed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<String>>,
    /// Lower bound of the order date, in the vendor date format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    /// Upper bound of the order date, in the vendor date format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
}

// ============================================================================
// Order Models
// ============================================================================

/// Result of asynchronous order creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreationStatus {
    /// Created on the terminal
    Success,
    /// Still being delivered to the terminal
    InProgress,
    /// Creation failed; see `error_info`
    Error,
}

/// Why order creation failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    /// Error code
    pub code: String,
    /// Message
    pub message: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Additional data
    pub additional_data: Option<Value>,
}

/// Guest attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    /// Customer ID
    pub id: Option<String>,
    /// Name
    pub name: Option<String>,
    /// Surname
    pub surname: Option<String>,
    /// Comment
    pub comment: Option<String>,
    /// Gender
    pub gender: Option<String>,
    /// Blacklisted
    #[serde(default)]
    pub in_blacklist: bool,
    /// Blacklist reason
    pub blacklist_reason: Option<String>,
    /// Birth date
    pub birthdate: Option<String>,
}

/// Employee reference inside an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEmployee {
    /// Employee ID
    pub id: String,
    /// Name
    pub name: Option<String>,
    /// Phone
    pub phone: Option<String>,
}

/// Courier assigned to a delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourierInfo {
    /// Courier
    pub courier: Option<OrderEmployee>,
    /// Assigned by hand rather than automatically
    #[serde(default)]
    pub is_courier_selected_manually: bool,
}

/// Cancellation details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelInfo {
    /// When the order was cancelled
    pub when_cancelled: Option<String>,
    /// Cancel cause
    pub cause: Option<IdName>,
    /// Comment
    pub comment: Option<String>,
}

/// Problem flag on a delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Has a problem
    pub has_problem: bool,
    /// Problem description
    pub description: Option<String>,
}

/// Order type reference inside an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTypeRef {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Service type
    pub order_service_type: Option<String>,
}

/// Payment type reference inside an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeRef {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Payment type kind
    pub kind: Option<String>,
}

/// A payment of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Payment type
    pub payment_type: PaymentTypeRef,
    /// Sum
    pub sum: f64,
    /// Preliminary payment
    #[serde(default)]
    pub is_preliminary: bool,
    /// External payment
    #[serde(default)]
    pub is_external: bool,
    /// Processed outside iiko
    #[serde(default)]
    pub is_processed_externally: bool,
    /// Fiscalized outside iiko
    pub is_fiscalized_externally: Option<bool>,
}

/// Tips paid with an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    /// Tips type
    pub tips_type: Option<IdName>,
    /// Payment type
    pub payment_type: PaymentTypeRef,
    /// Sum
    pub sum: f64,
    /// Preliminary payment
    #[serde(default)]
    pub is_preliminary: bool,
    /// External payment
    #[serde(default)]
    pub is_external: bool,
    /// Processed outside iiko
    #[serde(default)]
    pub is_processed_externally: bool,
}

/// Discount applied to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedDiscount {
    /// Discount type
    pub discount_type: IdName,
    /// Discount sum
    pub sum: f64,
    /// Position IDs the discount applies to
    pub selective_positions: Option<Vec<String>>,
}

/// Combo inside an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCombo {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Amount
    pub amount: f64,
    /// Price
    pub price: f64,
    /// Combo specification
    pub source_id: Option<String>,
}

/// Modifier of an order item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemModifier {
    /// Modifier product
    pub product: IdName,
    /// Amount
    pub amount: f64,
    /// Modifier group
    pub product_group: Option<IdName>,
    /// Price
    pub price: Option<f64>,
    /// Total
    pub result_sum: Option<f64>,
    /// Position ID
    pub position_id: Option<String>,
}

/// Item of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// `Product` or `Compound`
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    /// Product
    pub product: Option<IdName>,
    /// Modifiers
    #[serde(default)]
    pub modifiers: Vec<OrderItemModifier>,
    /// Unit price
    pub price: Option<f64>,
    /// Total cost
    pub cost: Option<f64>,
    /// Amount
    pub amount: f64,
    /// Position ID
    pub position_id: Option<String>,
    /// Cooking status
    pub status: Option<String>,
    /// Comment
    pub comment: Option<String>,
    /// Size
    pub size: Option<IdName>,
    /// Combo the item belongs to
    pub combo_information: Option<Value>,
    /// Deletion details
    pub deleted: Option<Value>,
}

/// Order contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    /// Parent delivery of a split order
    pub parent_delivery_id: Option<String>,
    /// Guest
    pub customer: Option<OrderCustomer>,
    /// Guest phone
    pub phone: Option<String>,
    /// Delivery point
    pub delivery_point: Option<Value>,
    /// Order status
    pub status: Option<String>,
    /// Cancellation details
    pub cancel_info: Option<CancelInfo>,
    /// Courier
    pub courier_info: Option<CourierInfo>,
    /// Promised delivery time
    pub complete_before: Option<String>,
    /// Creation time
    pub when_created: Option<String>,
    /// Confirmation time
    pub when_confirmed: Option<String>,
    /// Print time
    pub when_printed: Option<String>,
    /// Dispatch time
    pub when_sended: Option<String>,
    /// Delivery time
    pub when_delivered: Option<String>,
    /// Close time
    pub when_closed: Option<String>,
    /// Comment
    pub comment: Option<String>,
    /// Problem flag
    pub problem: Option<Problem>,
    /// Operator
    pub operator: Option<OrderEmployee>,
    /// Marketing source
    pub marketing_source: Option<IdName>,
    /// Delivery duration in minutes
    pub delivery_duration: Option<i64>,
    /// Position in the courier route
    pub index_in_courier_route: Option<i64>,
    /// Cooking start time
    pub cooking_start_time: Option<String>,
    /// Deleted
    #[serde(default)]
    pub is_deleted: bool,
    /// Source key
    pub source_key: Option<String>,
    /// Order sum
    pub sum: Option<f64>,
    /// Order number
    pub number: Option<i64>,
    /// Guests info
    pub guests_info: Option<Value>,
    /// Items
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Combos
    #[serde(default)]
    pub combos: Vec<OrderCombo>,
    /// Payments
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Tips
    #[serde(default)]
    pub tips: Vec<Tip>,
    /// Discounts
    #[serde(default)]
    pub discounts: Vec<AppliedDiscount>,
    /// Order type
    pub order_type: Option<OrderTypeRef>,
    /// Terminal group
    pub terminal_group_id: Option<String>,
    /// Sum of processed payments
    pub processed_payments_sum: Option<f64>,
    /// Tables of a table order
    pub table_ids: Option<Vec<String>>,
    /// Waiter of a table order
    pub waiter: Option<OrderEmployee>,
    /// Tab name
    pub tab_name: Option<String>,
}

/// An order with its creation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    /// Order ID
    pub id: String,
    /// Number in the external system
    pub external_number: Option<String>,
    /// Organization ID
    pub organization_id: String,
    /// Last change timestamp
    pub timestamp: i64,
    /// Creation state
    pub creation_status: Option<CreationStatus>,
    /// Why creation failed
    pub error_info: Option<ErrorInfo>,
    /// Order contents, absent while creation is in progress
    pub order: Option<OrderDetails>,
}

impl OrderInfo {
    /// Courier assigned to the order, if any
    #[must_use]
    pub fn courier(&self) -> Option<&OrderEmployee> {
        self.order
            .as_ref()
            .and_then(|o| o.courier_info.as_ref())
            .and_then(|c| c.courier.as_ref())
    }

    /// Whether the order is assigned to the courier with this ID
    #[must_use]
    pub fn is_assigned_to(&self, courier_id: &str) -> bool {
        self.courier().is_some_and(|c| c.id == courier_id)
    }
}

/// Response of order creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfoResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Created order
    pub order_info: OrderInfo,
}

/// Response of order lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Orders
    #[serde(default)]
    pub orders: Vec<OrderInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_with_courier(id: &str) -> OrderInfo {
        serde_json::from_value(json!({
            "id": "o1",
            "organizationId": "org",
            "timestamp": 1_700_000_000,
            "creationStatus": "Success",
            "order": {
                "status": "OnWay",
                "sum": 1200.5,
                "number": 17,
                "courierInfo": {"courier": {"id": id, "name": "Ivan"}, "isCourierSelectedManually": true},
                "items": [{"type": "Product", "product": {"id": "p", "name": "Soup"}, "amount": 2}]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_order_courier_lookup() {
        let order = order_with_courier("courier-1");
        assert!(order.is_assigned_to("courier-1"));
        assert!(!order.is_assigned_to("courier-2"));
        assert_eq!(order.courier().and_then(|c| c.name.as_deref()), Some("Ivan"));
        assert_eq!(order.creation_status, Some(CreationStatus::Success));
    }

    #[test]
    fn test_order_in_progress_has_no_details() {
        let order: OrderInfo = serde_json::from_value(json!({
            "id": "o2",
            "organizationId": "org",
            "timestamp": 1,
            "creationStatus": "InProgress",
            "order": null
        }))
        .unwrap();
        assert!(order.courier().is_none());
        assert!(!order.is_assigned_to("anyone"));
    }

    #[test]
    fn test_create_params_shape() {
        let params =
            CreateOrderParams::new("org", "tg", json!({"items": []})).with_transport_timeout(8);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "organizationId": "org",
                "terminalGroupId": "tg",
                "order": {"items": []},
                "createOrderSettings": {"transportToFrontTimeout": 8}
            })
        );
    }

    #[test]
    fn test_by_id_params_skip_absent() {
        let params = OrdersByIdParams::new(vec!["org".into()], vec!["o1".into()]);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"organizationIds": ["org"], "orderIds": ["o1"]})
        );
    }
}
