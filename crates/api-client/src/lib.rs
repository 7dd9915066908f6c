//! Typed async client for the iiko Cloud (iikoTransport) API
//!
//! This crate wraps the iiko Cloud restaurant API: organizations, menus,
//! table orders, deliveries, couriers, loyalty customers and the reference
//! dictionaries around them.
//!
//! # Features
//!
//! - **Token lifecycle**: The API login is exchanged for a bearer token on
//!   construction; a 401 triggers one re-authentication and one replay
//! - **Typed outcomes**: Every call yields `Outcome::Success` or
//!   `Outcome::Error` with iiko's `errorDescription`, faults are `ApiError`
//! - **Environment-based configuration**: Load the login and overrides from
//!   environment variables
//! - **Request correlation**: Every request carries a unique `X-Request-ID`
//! - **Webhooks**: Parse pushed delivery order events without a client
//!
//! # Example
//!
//! ```rust,no_run
//! use iiko_cloud_api::prelude::*;
//! use iiko_cloud_api::endpoints::organizations::ListOrganizationsParams;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = IikoClient::with_config(ClientConfig::new("my-api-login")).await?;
//!
//!     let organizations = client
//!         .organizations()
//!         .list(&ListOrganizationsParams::default())
//!         .await?;
//!
//!     match organizations {
//!         Outcome::Success(response) => {
//!             for org in &response.organizations {
//!                 println!("{org}");
//!             }
//!         }
//!         Outcome::Error(err) => eprintln!("iiko refused: {err}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod response;
pub mod session;
pub mod webhooks;

pub use client::IikoClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use response::{CorrelationResponse, ErrorResponse, Outcome};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::IikoClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{
        AddressesApi, CommandsApi, CouponsApi, CustomersApi, DeliveriesApi,
        DeliveryRestrictionsApi, DictionariesApi, EmployeesApi, MenuApi, NotificationsApi,
        OrdersApi, OrganizationsApi, TerminalGroupsApi,
    };
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::response::{ErrorResponse, Outcome};
}
