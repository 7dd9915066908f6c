//! Delivery restriction endpoints
//!
//! Delivery zones and the check that picks terminal groups able to serve an
//! address.

use super::dictionaries::OrganizationIdsRequest;
use super::{require_ids, Caller};
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Delivery restrictions API interface
#[derive(Clone, Debug)]
pub struct DeliveryRestrictionsApi {
    caller: Caller,
}

impl DeliveryRestrictionsApi {
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

    /// Delivery restrictions (zones, schedules, minimal sums).
    ///
    /// The zone schema varies between iiko versions, so the body is returned untyped.
    ///
    /// POST /api/1/delivery_restrictions
    pub async fn list<S: AsRef<str>>(&self, organization_ids: &[S]) -> ApiResult<Outcome<Value>> {
        require_ids("delivery_restrictions", "organization_ids", organization_ids)?;
        self.caller
            .call(
                "/api/1/delivery_restrictions",
                &OrganizationIdsRequest::new(organization_ids),
            )
            .await
    }

    /// Terminal groups that may serve a delivery
    ///
    /// POST /api/1/delivery_restrictions/allowed
    pub async fn allowed(
        &self,
        params: &AllowedParams,
    ) -> ApiResult<Outcome<DeliveryRestrictionsAllowed>> {
        require_ids("allowed", "organization_ids", &params.organization_ids)?;
        self.caller
            .call("/api/1/delivery_restrictions/allowed", params)
            .await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Parameters for `allowed`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedParams {
    /// Organizations to check
    pub organization_ids: Vec<String>,
    /// Courier delivery (`true`) or pickup (`false`)
    pub is_courier_delivery: bool,
    /// Delivery address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Value>,
    /// Coordinates of the delivery point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_location: Option<Value>,
    /// Order items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Value>,
    /// Delivery date, in the vendor date format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    /// Order sum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_sum: Option<f64>,
    /// Discount sum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_sum: Option<f64>,
}

impl AllowedParams {
    /// Check for the given organizations
    #[must_use]
    pub fn new(organization_ids: Vec<String>, is_courier_delivery: bool) -> Self {
        Self {
            organization_ids,
            is_courier_delivery,
            ..Self::default()
        }
    }

    /// Set the delivery address
    #[must_use]
    pub fn with_delivery_address(mut self, address: Value) -> Self {
        self.delivery_address = Some(address);
        self
    }

    /// Set the delivery coordinates
    #[must_use]
    pub fn with_order_location(mut self, location: Value) -> Self {
        self.order_location = Some(location);
        self
    }

    /// Set the order sum
    #[must_use]
    pub fn with_delivery_sum(mut self, sum: f64) -> Self {
        self.delivery_sum = Some(sum);
        self
    }
}

/// A terminal group able to serve the delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedItem {
    /// Terminal group ID
    pub terminal_group_id: String,
    /// Organization ID
    pub organization_id: String,
    /// Expected delivery duration
    pub delivery_duration_in_minutes: Option<i64>,
    /// Matching delivery zone
    pub zone: Option<String>,
    /// Delivery service product
    pub delivery_service_product_id: Option<String>,
}

/// Response of `allowed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRestrictionsAllowed {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Whether delivery is possible
    #[serde(default)]
    pub is_allowed: bool,
    /// Suitable terminal groups
    #[serde(default)]
    pub allowed_items: Vec<AllowedItem>,
    /// Minimal-sum rejection details
    pub rejected_by_min_sum_limitation: Option<Value>,
}
