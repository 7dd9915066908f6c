//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for one group of iiko Cloud endpoints.
//! Every call returns `ApiResult<Outcome<T>>`: `Err` for faults, `Outcome::Error`
//! when iiko rejected the request.
//!
//! ## Mapping to iiko Cloud API
//!
//! | Module | Endpoints | Description |
//! |--------|-----------|-------------|
//! | `organizations` | `/api/1/organizations` | Organizations visible to the API login |
//! | `commands` | `/api/1/commands/status` | Status of asynchronous operations |
//! | `dictionaries` | `/api/1/cancel_causes`, `/api/1/payment_types`, ... | Reference data |
//! | `coupons` | `/api/1/loyalty/iiko/coupons/*` | Loyalty coupons |
//! | `menu` | `/api/1/nomenclature`, `/api/2/menu`, `/api/1/stop_lists`, `/api/1/combo` | Menu data |
//! | `terminal_groups` | `/api/1/terminal_groups*` | Point-of-sale terminal groups |
//! | `addresses` | `/api/1/regions`, `/api/1/cities`, `/api/1/streets/by_city` | Address dictionaries |
//! | `delivery_restrictions` | `/api/1/delivery_restrictions*` | Delivery zones |
//! | `orders` | `/api/1/order/*` | Table orders |
//! | `deliveries` | `/api/1/deliveries/*` | Delivery orders |
//! | `notifications` | `/api/1/notifications/send` | Front-office notifications |
//! | `employees` | `/api/1/employees/*` | Couriers and employees |
//! | `customers` | `/api/1/loyalty/iiko/customer/*` | Loyalty customers and wallets |

pub mod addresses;
pub mod commands;
pub mod coupons;
pub mod customers;
pub mod deliveries;
pub mod delivery_restrictions;
pub mod dictionaries;
pub mod employees;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod organizations;
pub mod terminal_groups;

pub use addresses::AddressesApi;
pub use commands::CommandsApi;
pub use coupons::CouponsApi;
pub use customers::CustomersApi;
pub use deliveries::DeliveriesApi;
pub use delivery_restrictions::DeliveryRestrictionsApi;
pub use dictionaries::DictionariesApi;
pub use employees::EmployeesApi;
pub use menu::MenuApi;
pub use notifications::NotificationsApi;
pub use orders::OrdersApi;
pub use organizations::OrganizationsApi;
pub use terminal_groups::TerminalGroupsApi;

use crate::client::IikoClient;
use crate::error::{ApiError, ApiResult};
use crate::response::Outcome;
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Date-time format iiko expects for terminal-local timestamps
pub const VENDOR_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format a terminal-local timestamp the way iiko expects it
#[must_use]
pub fn format_vendor_datetime(value: &NaiveDateTime) -> String {
    value.format(VENDOR_DATETIME_FORMAT).to_string()
}

/// Serde helpers writing `NaiveDateTime` in [`VENDOR_DATETIME_FORMAT`]
pub(crate) mod vendor_datetime {
    use super::VENDOR_DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub(crate) fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(VENDOR_DATETIME_FORMAT))
    }

    pub(crate) mod option {
        use chrono::NaiveDateTime;
        use serde::Serializer;

        pub(crate) fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }
    }
}

/// Shared plumbing of every endpoint group: the client and an optional timeout
#[derive(Clone, Debug)]
pub(crate) struct Caller {
    client: IikoClient,
    timeout: Option<Duration>,
}

impl Caller {
    pub(crate) fn new(client: IikoClient) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    pub(crate) fn client(&self) -> &IikoClient {
        &self.client
    }

    pub(crate) async fn call<T, B>(&self, path: &str, body: &B) -> ApiResult<Outcome<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.client.post_as(path, Some(body), self.timeout).await
    }

    pub(crate) async fn call_empty<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> ApiResult<Outcome<T>> {
        self.client
            .post_as(path, Option::<&()>::None, self.timeout)
            .await
    }
}

/// Reject an empty id list before anything is sent
pub(crate) fn require_ids<S: AsRef<str>>(
    operation: &'static str,
    name: &str,
    ids: &[S],
) -> ApiResult<()> {
    if ids.is_empty() {
        return Err(ApiError::parameter(operation, format!("{name} must not be empty")));
    }
    Ok(())
}

/// Reject a blank identifier before anything is sent
pub(crate) fn require_value(operation: &'static str, name: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::parameter(operation, format!("{name} is required")));
    }
    Ok(())
}

/// Borrow a list of ids as `&str` for a request body
pub(crate) fn id_refs<S: AsRef<str>>(ids: &[S]) -> Vec<&str> {
    ids.iter().map(AsRef::as_ref).collect()
}
