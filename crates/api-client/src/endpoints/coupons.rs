//! Loyalty coupon endpoints

use super::{require_value, Caller};
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coupons API interface
#[derive(Clone, Debug)]
pub struct CouponsApi {
    caller: Caller,
}

impl CouponsApi {
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

    /// Coupon series that still have non-activated coupons
    ///
    /// POST /api/1/loyalty/iiko/coupons/series
    pub async fn coupon_series(&self, organization_id: &str) -> ApiResult<Outcome<CouponSeries>> {
        require_value("coupon_series", "organization_id", organization_id)?;
        self.caller
            .call(
                "/api/1/loyalty/iiko/coupons/series",
                &SeriesRequest { organization_id },
            )
            .await
    }

    /// Information about a coupon by number, optionally within a series
    ///
    /// POST /api/1/loyalty/iiko/coupons/info
    pub async fn coupon_info(
        &self,
        organization_id: &str,
        number: &str,
        series: Option<&str>,
    ) -> ApiResult<Outcome<CouponInfoResponse>> {
        require_value("coupon_info", "organization_id", organization_id)?;
        self.caller
            .call(
                "/api/1/loyalty/iiko/coupons/info",
                &InfoRequest {
                    organization_id,
                    number,
                    series,
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
struct SeriesRequest<'a> {
    organization_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoRequest<'a> {
    organization_id: &'a str,
    number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<&'a str>,
}

/// A loyalty coupon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Coupon ID
    pub id: String,
    /// Coupon number
    pub number: Option<String>,
    /// Series name
    pub series_name: Option<String>,
    /// Series ID
    pub series_id: Option<String>,
    /// Activation time
    pub when_activated: Option<String>,
    /// Deleted
    pub is_deleted: Option<bool>,
}

/// Response of `coupon_series`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponSeries {
    /// Coupons from series that still have non-activated coupons
    #[serde(rename = "seriesWithNotActivatedCoupons", default)]
    pub series: Vec<Coupon>,
}

/// Response of `coupon_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponInfoResponse {
    /// Matching coupons
    #[serde(rename = "couponInfo", default)]
    pub coupons: Vec<Coupon>,
}
