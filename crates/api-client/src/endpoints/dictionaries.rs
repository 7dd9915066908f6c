//! Dictionary endpoints
//!
//! Reference data configured in iikoOffice: cancel causes, order types,
//! discounts, payment types, removal types and tips types.

use super::{id_refs, require_ids, Caller};
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dictionaries API interface
#[derive(Clone, Debug)]
pub struct DictionariesApi {
    caller: Caller,
}

impl DictionariesApi {
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

    /// Delivery cancel causes
    ///
    /// POST /api/1/cancel_causes
    pub async fn cancel_causes<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
    ) -> ApiResult<Outcome<CancelCausesResponse>> {
        require_ids("cancel_causes", "organization_ids", organization_ids)?;
        self.caller
            .call("/api/1/cancel_causes", &OrganizationIdsRequest::new(organization_ids))
            .await
    }

    /// Order types
    ///
    /// POST /api/1/deliveries/order_types
    pub async fn order_types<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
    ) -> ApiResult<Outcome<OrderTypesResponse>> {
        require_ids("order_types", "organization_ids", organization_ids)?;
        self.caller
            .call(
                "/api/1/deliveries/order_types",
                &OrganizationIdsRequest::new(organization_ids),
            )
            .await
    }

    /// Discounts and surcharges
    ///
    /// POST /api/1/discounts
    pub async fn discounts<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
    ) -> ApiResult<Outcome<DiscountsResponse>> {
        require_ids("discounts", "organization_ids", organization_ids)?;
        self.caller
            .call("/api/1/discounts", &OrganizationIdsRequest::new(organization_ids))
            .await
    }

    /// Payment types
    ///
    /// POST /api/1/payment_types
    pub async fn payment_types<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
    ) -> ApiResult<Outcome<PaymentTypesResponse>> {
        require_ids("payment_types", "organization_ids", organization_ids)?;
        self.caller
            .call("/api/1/payment_types", &OrganizationIdsRequest::new(organization_ids))
            .await
    }

    /// Removal types (reasons for deleting order items)
    ///
    /// POST /api/1/removal_types
    pub async fn removal_types<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
    ) -> ApiResult<Outcome<RemovalTypesResponse>> {
        require_ids("removal_types", "organization_ids", organization_ids)?;
        self.caller
            .call("/api/1/removal_types", &OrganizationIdsRequest::new(organization_ids))
            .await
    }

    /// Tips types for the API login's organizations
    ///
    /// POST /api/1/tips_types
    pub async fn tips_types(&self) -> ApiResult<Outcome<TipsTypesResponse>> {
        self.caller.call_empty("/api/1/tips_types").await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body shared by every endpoint that takes only organization ids
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrganizationIdsRequest<'a> {
    organization_ids: Vec<&'a str>,
}

impl<'a> OrganizationIdsRequest<'a> {
    pub(crate) fn new<S: AsRef<str>>(ids: &'a [S]) -> Self {
        Self {
            organization_ids: id_refs(ids),
        }
    }
}

/// A delivery cancel cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelCause {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Deleted in iikoOffice
    #[serde(default)]
    pub is_deleted: bool,
}

/// Response of `cancel_causes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelCausesResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Cancel causes
    #[serde(default)]
    pub cancel_causes: Vec<CancelCause>,
}

/// An order type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderType {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// `Common`, `DeliveryByCourier` or `DeliveryByClient`
    pub order_service_type: String,
    /// Deleted in iikoOffice
    #[serde(default)]
    pub is_deleted: bool,
    /// Revision in the external system
    pub external_revision: Option<i64>,
}

/// Order types of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationOrderTypes {
    /// Organization ID
    pub organization_id: String,
    /// Order types
    #[serde(default)]
    pub items: Vec<OrderType>,
}

/// Response of `order_types`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTypesResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Order types grouped by organization
    #[serde(default)]
    pub order_types: Vec<OrganizationOrderTypes>,
}

/// Discount percentage applied to one product category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoryDiscount {
    /// Product category ID
    pub category_id: String,
    /// Product category name
    pub category_name: Option<String>,
    /// Discount percentage
    pub percent: f64,
}

/// A discount or surcharge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Discount percentage
    pub percent: f64,
    /// Whether the percentage depends on product category
    #[serde(default)]
    pub is_categorised_discount: bool,
    /// Category-specific percentages
    #[serde(default)]
    pub product_category_discounts: Vec<ProductCategoryDiscount>,
    /// Comment
    pub comment: Option<String>,
    /// Whether it can be applied to selected items only
    pub can_be_applied_selectively: Option<bool>,
    /// Minimal order sum
    pub min_order_sum: Option<f64>,
    /// `Percent`, `FlexibleSum` or `FixedSum`
    pub mode: Option<String>,
    /// Fixed sum
    pub sum: Option<f64>,
    /// Whether it can be applied by card number
    #[serde(default)]
    pub can_apply_by_card_number: bool,
    /// Applied manually
    #[serde(default)]
    pub is_manual: bool,
    /// Applied by card
    #[serde(default)]
    pub is_card: bool,
    /// Applied automatically
    #[serde(default)]
    pub is_automatic: bool,
    /// Deleted in iikoOffice
    #[serde(default)]
    pub is_deleted: bool,
}

/// Discounts of one organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDiscounts {
    /// Organization ID
    pub organization_id: String,
    /// Discounts
    #[serde(default)]
    pub items: Vec<Discount>,
}

/// Response of `discounts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountsResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Discounts grouped by organization
    #[serde(default)]
    pub discounts: Vec<OrganizationDiscounts>,
}

/// Terminal group a payment type is available on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTerminalGroup {
    /// Terminal group ID
    pub id: String,
    /// Organization ID
    pub organization_id: String,
    /// Name
    pub name: String,
    /// Address
    pub address: Option<String>,
}

/// A payment type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentType {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Code
    pub code: Option<String>,
    /// Comment
    pub comment: Option<String>,
    /// Can be combined with other payment types
    #[serde(default)]
    pub combinable: bool,
    /// Revision in the external system
    pub external_revision: Option<i64>,
    /// Marketing campaigns the payment type applies to
    #[serde(default)]
    pub applicable_marketing_campaigns: Vec<String>,
    /// Deleted in iikoOffice
    #[serde(default)]
    pub is_deleted: bool,
    /// Whether a fiscal cheque is printed
    #[serde(default)]
    pub print_cheque: bool,
    /// `External`, `Internal` or `Both`
    pub payment_processing_type: Option<String>,
    /// `Cash`, `Card`, `IikoCard`, `External`, ...
    pub payment_type_kind: Option<String>,
    /// Terminal groups where the payment type is available
    #[serde(default)]
    pub terminal_groups: Vec<PaymentTerminalGroup>,
}

/// Response of `payment_types`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTypesResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Payment types
    #[serde(default)]
    pub payment_types: Vec<PaymentType>,
}

impl PaymentTypesResponse {
    /// IDs of the listed payment types
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.payment_types.iter().map(|p| p.id.clone()).collect()
    }
}

/// A removal type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalType {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Comment
    pub comment: Option<String>,
    /// Write-off to the restaurant allowed
    #[serde(default)]
    pub can_writeoff_to_cafe: bool,
    /// Write-off to the waiter allowed
    #[serde(default)]
    pub can_writeoff_to_waiter: bool,
    /// Write-off to a user allowed
    #[serde(default)]
    pub can_writeoff_to_user: bool,
    /// A reason must be given
    #[serde(default)]
    pub reason_required: bool,
    /// Manual removal
    #[serde(default)]
    pub manual: bool,
    /// Deleted in iikoOffice
    #[serde(default)]
    pub is_deleted: bool,
}

/// Response of `removal_types`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalTypesResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Removal types
    #[serde(default)]
    pub removal_types: Vec<RemovalType>,
}

/// A tips type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsType {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Organizations where the tips type is used
    #[serde(default)]
    pub organization_ids: Vec<String>,
    /// Order service types it applies to
    #[serde(default)]
    pub order_service_types: Vec<String>,
    /// Payment types it can be paid with
    #[serde(default)]
    pub payment_types_ids: Vec<String>,
}

/// Response of `tips_types`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsTypesResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Tips types
    #[serde(default)]
    pub tips_types: Vec<TipsType>,
}
