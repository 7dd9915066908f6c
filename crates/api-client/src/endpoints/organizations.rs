//! Organizations API endpoints
//!
//! Maps to `/api/1/organizations`. A successful listing also refreshes the
//! client's organization cache (see [`IikoClient::cached_organizations`]).

use super::Caller;
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ORGANIZATIONS_PATH: &str = "/api/1/organizations";

/// Organizations API interface
#[derive(Clone, Debug)]
pub struct OrganizationsApi {
    caller: Caller,
}

impl OrganizationsApi {
    /// Create a new organizations API interface
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

    /// List organizations available to the API login
    ///
    /// POST /api/1/organizations
    pub async fn list(
        &self,
        params: &ListOrganizationsParams,
    ) -> ApiResult<Outcome<OrganizationsResponse>> {
        let outcome: Outcome<OrganizationsResponse> =
            self.caller.call(ORGANIZATIONS_PATH, params).await?;

        if let Outcome::Success(ref response) = outcome {
            debug!(count = response.organizations.len(), "Caching organizations");
            self.caller.client().cache_organizations(&response.organizations);
        }
        Ok(outcome)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Parameters for listing organizations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrganizationsParams {
    /// Restrict the listing to these organizations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_ids: Option<Vec<String>>,
    /// Ask for the extended organization shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_additional_info: Option<bool>,
    /// Include disabled organizations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_disabled: Option<bool>,
}

impl ListOrganizationsParams {
    /// Restrict the listing to the given organizations
    #[must_use]
    pub fn with_organization_ids(mut self, ids: Vec<String>) -> Self {
        self.organization_ids = Some(ids);
        self
    }

    /// Request additional organization info
    #[must_use]
    pub fn with_additional_info(mut self, enabled: bool) -> Self {
        self.return_additional_info = Some(enabled);
        self
    }

    /// Include disabled organizations
    #[must_use]
    pub fn with_disabled(mut self, enabled: bool) -> Self {
        self.include_disabled = Some(enabled);
        self
    }
}

/// Simple or extended organization shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    /// Id and name only
    Simple,
    /// Full organization settings
    Extended,
}

/// Address format configured for an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFormatType {
    /// Street-based legacy format
    Legacy,
    /// City-based format
    City,
    /// International format
    International,
    /// International format without postcode
    IntNoPostcode,
}

/// An organization visible to the API login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Organization ID
    pub id: String,
    /// Organization name
    pub name: String,
    /// Country
    pub country: Option<String>,
    /// Restaurant address
    pub restaurant_address: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
    /// Whether the UAE addressing system is in use
    pub use_uae_addressing_system: Option<bool>,
    /// iikoRMS version
    pub version: Option<String>,
    /// Currency ISO code
    pub currency_iso_name: Option<String>,
    /// Smallest currency denomination
    pub currency_minimum_denomination: Option<f64>,
    /// Country phone code
    pub country_phone_code: Option<String>,
    /// Whether deliveries must carry a marketing source
    pub marketing_source_required_in_delivery: Option<bool>,
    /// Default delivery city
    pub default_delivery_city_id: Option<String>,
    /// Cities served by delivery
    pub delivery_city_ids: Option<Vec<String>>,
    /// Delivery service type
    pub delivery_service_type: Option<String>,
    /// Default payment type for call-center orders
    pub default_call_center_payment_type_id: Option<String>,
    /// Whether order item comments are enabled
    pub order_item_comment_enabled: Option<bool>,
    /// Taxpayer identification number
    pub inn: Option<String>,
    /// Address format
    pub address_format_type: Option<AddressFormatType>,
    /// Whether delivery confirmation is enabled
    pub is_confirmation_enabled: Option<bool>,
    /// Interval during which confirmation is allowed
    pub confirm_allowed_interval_in_minutes: Option<i64>,
    /// Response shape
    pub response_type: Option<ResponseType>,
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Response of the organizations listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationsResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Organizations
    #[serde(default)]
    pub organizations: Vec<Organization>,
}

impl OrganizationsResponse {
    /// IDs of the listed organizations
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.organizations.iter().map(|o| o.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_skip_absent_fields() {
        let params = ListOrganizationsParams::default();
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({}));

        let params = ListOrganizationsParams::default()
            .with_organization_ids(vec!["org-1".to_string()])
            .with_additional_info(true);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"organizationIds": ["org-1"], "returnAdditionalInfo": true})
        );
    }

    #[test]
    fn test_organizations_response_parse() {
        let response: OrganizationsResponse = serde_json::from_value(json!({
            "correlationId": "c-1",
            "organizations": [
                {"id": "org-1", "name": "Main", "responseType": "Simple"},
                {
                    "id": "org-2",
                    "name": "Second",
                    "country": "RU",
                    "latitude": 55.75,
                    "addressFormatType": "IntNoPostcode",
                    "responseType": "Extended"
                }
            ]
        }))
        .unwrap();

        assert_eq!(response.ids(), vec!["org-1", "org-2"]);
        assert_eq!(response.organizations[0].to_string(), "Main");
        assert_eq!(
            response.organizations[1].address_format_type,
            Some(AddressFormatType::IntNoPostcode)
        );
        assert_eq!(response.organizations[1].response_type, Some(ResponseType::Extended));
    }
}
