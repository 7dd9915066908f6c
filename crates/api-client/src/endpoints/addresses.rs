//! Address dictionary endpoints: regions, cities and streets

use super::dictionaries::OrganizationIdsRequest;
use super::{require_ids, Caller};
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Addresses API interface
#[derive(Clone, Debug)]
pub struct AddressesApi {
    caller: Caller,
}

impl AddressesApi {
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

    /// Regions
    ///
    /// POST /api/1/regions
    pub async fn regions<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
    ) -> ApiResult<Outcome<RegionsResponse>> {
        require_ids("regions", "organization_ids", organization_ids)?;
        self.caller
            .call("/api/1/regions", &OrganizationIdsRequest::new(organization_ids))
            .await
    }

    /// Cities
    ///
    /// POST /api/1/cities
    pub async fn cities<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
    ) -> ApiResult<Outcome<CitiesResponse>> {
        require_ids("cities", "organization_ids", organization_ids)?;
        self.caller
            .call("/api/1/cities", &OrganizationIdsRequest::new(organization_ids))
            .await
    }

    /// Streets of a city
    ///
    /// POST /api/1/streets/by_city
    pub async fn streets_by_city(
        &self,
        organization_id: &str,
        city_id: &str,
    ) -> ApiResult<Outcome<StreetsResponse>> {
        self.caller
            .call(
                "/api/1/streets/by_city",
                &StreetsRequest {
                    organization_id,
                    city_id,
                },
            )
            .await
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StreetsRequest<'a> {
    organization_id: &'a str,
    city_id: &'a str,
}

/// A region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Revision in the external system
    pub external_revision: Option<i64>,
    /// Deleted
    #[serde(default)]
    pub is_deleted: bool,
}

/// Regions of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRegions {
    /// Organization ID
    pub organization_id: String,
    /// Regions
    #[serde(default)]
    pub items: Vec<Region>,
}

/// Response of `regions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionsResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Regions grouped by organization
    #[serde(default)]
    pub regions: Vec<OrganizationRegions>,
}

/// A city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Revision in the external system
    pub external_revision: Option<i64>,
    /// Deleted
    #[serde(default)]
    pub is_deleted: bool,
    /// KLADR classifier ID
    pub classifier_id: Option<String>,
    /// Additional information
    pub additional_info: Option<String>,
}

/// Cities of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCities {
    /// Organization ID
    pub organization_id: String,
    /// Cities
    #[serde(default)]
    pub items: Vec<City>,
}

/// Response of `cities`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiesResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Cities grouped by organization
    #[serde(default)]
    pub cities: Vec<OrganizationCities>,
}

impl CitiesResponse {
    /// Find a city by name across organizations, ignoring deleted ones
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&City> {
        self.cities
            .iter()
            .flat_map(|o| o.items.iter())
            .find(|c| !c.is_deleted && c.name == name)
    }
}

/// A street
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Street {
    /// ID
    pub id: String,
    /// Name
    pub name: String,
    /// Revision in the external system
    pub external_revision: Option<i64>,
    /// KLADR classifier ID
    pub classifier_id: Option<String>,
    /// Deleted
    #[serde(default)]
    pub is_deleted: bool,
}

/// Response of `streets_by_city`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetsResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Streets
    #[serde(default)]
    pub streets: Vec<Street>,
}
