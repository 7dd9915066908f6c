//! Parsing of webhook payloads pushed by iiko Cloud
//!
//! iiko posts a JSON array of events to the URL registered for the
//! organization. Only delivery order events are typed here; other event
//! types are skipped.

use crate::endpoints::orders::OrderInfo;
use crate::error::ApiResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Event type of delivery order updates
pub const DELIVERY_ORDER_UPDATE: &str = "DeliveryOrderUpdate";

/// A delivery order was created or changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrderEvent {
    /// Event type, [`DELIVERY_ORDER_UPDATE`]
    pub event_type: String,
    /// When the event happened, terminal-local time
    pub event_time: String,
    /// Organization ID
    pub organization_id: String,
    /// Operation that caused the event
    pub correlation_id: Option<String>,
    /// The order as it is now
    pub event_info: OrderInfo,
}

impl DeliveryOrderEvent {
    /// Order ID
    #[must_use]
    pub fn order_id(&self) -> &str {
        &self.event_info.id
    }

    /// Order status, once the order exists
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.event_info
            .order
            .as_ref()
            .and_then(|o| o.status.as_deref())
    }
}

/// Parse a webhook body into delivery order events
///
/// # Errors
///
/// Returns `ApiError::Json` when the body is not a JSON array or a delivery
/// order event does not have the expected shape.
pub fn parse_delivery_order_events(body: &str) -> ApiResult<Vec<DeliveryOrderEvent>> {
    let events: Vec<Value> = serde_json::from_str(body)?;
    let total = events.len();

    let parsed = events
        .into_iter()
        .filter(|event| {
            event.get("eventType").and_then(Value::as_str) == Some(DELIVERY_ORDER_UPDATE)
        })
        .map(serde_json::from_value)
        .collect::<Result<Vec<DeliveryOrderEvent>, _>>()?;

    debug!(total, delivery_orders = parsed.len(), "Parsed webhook payload");
    Ok(parsed)
}
