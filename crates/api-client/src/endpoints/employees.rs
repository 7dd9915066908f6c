//! Employee endpoints

use super::Caller;
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Employees API interface
#[derive(Clone, Debug)]
pub struct EmployeesApi {
    caller: Caller,
}

impl EmployeesApi {
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

    /// Couriers of an organization
    ///
    /// POST /api/1/employees/couriers
    pub async fn couriers(&self, organization_id: &str) -> ApiResult<Outcome<CouriersResponse>> {
        self.caller
            .call(
                "/api/1/employees/couriers",
                &CouriersRequest {
                    organization_ids: [organization_id],
                },
            )
            .await
    }

    /// Details of one employee
    ///
    /// POST /api/1/employees/info
    pub async fn info(
        &self,
        organization_id: &str,
        employee_id: &str,
    ) -> ApiResult<Outcome<EmployeeInfoResponse>> {
        self.caller
            .call(
                "/api/1/employees/info",
                &InfoRequest {
                    organization_id,
                    id: employee_id,
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
struct CouriersRequest<'a> {
    organization_ids: [&'a str; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoRequest<'a> {
    organization_id: &'a str,
    id: &'a str,
}

/// A courier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Courier {
    /// Employee ID
    pub id: String,
    /// First name
    pub first_name: Option<String>,
    /// Middle name
    pub middle_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Display name
    pub display_name: String,
    /// Employee code
    pub code: Option<String>,
    /// Deleted
    #[serde(default)]
    pub is_deleted: bool,
}

/// Couriers of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCouriers {
    /// Organization ID
    pub organization_id: String,
    /// Couriers
    #[serde(default)]
    pub items: Vec<Courier>,
}

/// Response of `couriers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouriersResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Couriers grouped by organization
    #[serde(default)]
    pub employees: Vec<OrganizationCouriers>,
}

impl CouriersResponse {
    fn all(&self) -> impl Iterator<Item = &Courier> {
        self.employees.iter().flat_map(|o| o.items.iter())
    }

    /// Find a courier by employee code
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Courier> {
        self.all().find(|c| c.code.as_deref() == Some(code))
    }

    /// Find a courier by employee ID
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Courier> {
        self.all().find(|c| c.id == id)
    }
}

/// Employee details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfo {
    /// Employee ID
    pub id: String,
    /// First name
    pub first_name: Option<String>,
    /// Middle name
    pub middle_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Email
    pub email: Option<String>,
    /// Phone
    pub phone: Option<String>,
    /// Cell phone
    pub cell_phone: Option<String>,
}

/// Response of `info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfoResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Employee
    pub employee_info: EmployeeInfo,
}
