//! Front-office notification endpoint

use super::Caller;
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::{CorrelationResponse, Outcome};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default message type of front-office notifications
pub const DEFAULT_MESSAGE_TYPE: &str = "delivery_attention";

/// Notifications API interface
#[derive(Clone, Debug)]
pub struct NotificationsApi {
    caller: Caller,
}

impl NotificationsApi {
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

    /// Show a notification about an order on the front terminal
    ///
    /// POST /api/1/notifications/send
    pub async fn send(
        &self,
        params: &SendNotificationParams,
    ) -> ApiResult<Outcome<CorrelationResponse>> {
        self.caller.call("/api/1/notifications/send", params).await
    }
}

/// Parameters for `send`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationParams {
    /// Where the order came from
    pub order_source: String,
    /// Order ID
    pub order_id: String,
    /// Notification text
    pub additional_info: String,
    /// Message type
    pub message_type: String,
    /// Organization ID
    pub organization_id: String,
}

impl SendNotificationParams {
    /// A `delivery_attention` notification
    pub fn new(
        organization_id: impl Into<String>,
        order_id: impl Into<String>,
        order_source: impl Into<String>,
        additional_info: impl Into<String>,
    ) -> Self {
        Self {
            order_source: order_source.into(),
            order_id: order_id.into(),
            additional_info: additional_info.into(),
            message_type: DEFAULT_MESSAGE_TYPE.to_string(),
            organization_id: organization_id.into(),
        }
    }

    /// Use another message type
    #[must_use]
    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = message_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_params_default_message_type() {
        let params = SendNotificationParams::new("org", "o1", "site", "Guest is waiting");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "orderSource": "site",
                "orderId": "o1",
                "additionalInfo": "Guest is waiting",
                "messageType": "delivery_attention",
                "organizationId": "org"
            })
        );
    }
}
