//! Operation status endpoint
//!
//! Long-running iiko operations answer with a `correlationId`; this endpoint
//! reports how far such an operation has got.

use super::Caller;
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Commands API interface
#[derive(Clone, Debug)]
pub struct CommandsApi {
    caller: Caller,
}

impl CommandsApi {
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

    /// Get the status of an asynchronous operation
    ///
    /// POST /api/1/commands/status
    pub async fn status(
        &self,
        organization_id: &str,
        correlation_id: &str,
    ) -> ApiResult<Outcome<CommandStatus>> {
        self.caller
            .call(
                "/api/1/commands/status",
                &StatusRequest {
                    organization_id,
                    correlation_id,
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
struct StatusRequest<'a> {
    organization_id: &'a str,
    correlation_id: &'a str,
}

/// Progress of an asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandState {
    /// Completed successfully
    Success,
    /// Still running
    InProgress,
    /// Failed
    Error,
}

/// Status of an asynchronous operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandStatus {
    /// Current state
    pub state: CommandState,
    /// Failure details when `state` is `Error`
    pub exception: Option<Value>,
}

impl CommandStatus {
    /// Whether the operation has finished, successfully or not
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state != CommandState::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse() {
        let status: CommandStatus = serde_json::from_value(json!({"state": "InProgress"})).unwrap();
        assert_eq!(status.state, CommandState::InProgress);
        assert!(!status.is_finished());

        let status: CommandStatus = serde_json::from_value(json!({
            "state": "Error",
            "exception": {"message": "Terminal is offline"}
        }))
        .unwrap();
        assert!(status.is_finished());
        assert!(status.exception.is_some());
    }

    #[test]
    fn test_status_request_shape() {
        let body = serde_json::to_value(StatusRequest {
            organization_id: "org",
            correlation_id: "c-1",
        })
        .unwrap();
        assert_eq!(body, json!({"organizationId": "org", "correlationId": "c-1"}));
    }
}
