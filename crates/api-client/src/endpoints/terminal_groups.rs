//! Terminal group endpoints

use super::{id_refs, require_ids, Caller};
use crate::client::IikoClient;
use crate::error::ApiResult;
use crate::response::Outcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal groups API interface
#[derive(Clone, Debug)]
pub struct TerminalGroupsApi {
    caller: Caller,
}

impl TerminalGroupsApi {
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

    /// Terminal groups of the given organizations
    ///
    /// POST /api/1/terminal_groups
    pub async fn list<S: AsRef<str>>(
        &self,
        organization_ids: &[S],
        include_disabled: bool,
    ) -> ApiResult<Outcome<TerminalGroupsResponse>> {
        require_ids("terminal_groups", "organization_ids", organization_ids)?;
        self.caller
            .call(
                "/api/1/terminal_groups",
                &ListRequest {
                    organization_ids: id_refs(organization_ids),
                    include_disabled: include_disabled.then_some(true),
                },
            )
            .await
    }

    /// Whether the terminal groups are online
    ///
    /// POST /api/1/terminal_groups/is_alive
    pub async fn is_alive<S: AsRef<str>, T: AsRef<str>>(
        &self,
        organization_ids: &[S],
        terminal_group_ids: &[T],
    ) -> ApiResult<Outcome<IsAliveResponse>> {
        require_ids("is_alive", "organization_ids", organization_ids)?;
        require_ids("is_alive", "terminal_group_ids", terminal_group_ids)?;
        self.caller
            .call(
                "/api/1/terminal_groups/is_alive",
                &IsAliveRequest {
                    organization_ids: id_refs(organization_ids),
                    terminal_group_ids: id_refs(terminal_group_ids),
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
struct ListRequest<'a> {
    organization_ids: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_disabled: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IsAliveRequest<'a> {
    organization_ids: Vec<&'a str>,
    terminal_group_ids: Vec<&'a str>,
}

/// A terminal group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalGroup {
    /// ID
    pub id: String,
    /// Organization ID
    pub organization_id: String,
    /// Name
    pub name: String,
    /// Address
    pub address: Option<String>,
}

/// Terminal groups of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationTerminalGroups {
    /// Organization ID
    pub organization_id: String,
    /// Terminal groups
    #[serde(default)]
    pub items: Vec<TerminalGroup>,
}

/// Response of `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalGroupsResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Terminal groups grouped by organization
    #[serde(default)]
    pub terminal_groups: Vec<OrganizationTerminalGroups>,
}

impl TerminalGroupsResponse {
    /// All terminal groups across organizations
    pub fn all(&self) -> impl Iterator<Item = &TerminalGroup> {
        self.terminal_groups.iter().flat_map(|o| o.items.iter())
    }
}

/// Availability of one terminal group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalGroupAlive {
    /// Online
    pub is_alive: bool,
    /// Terminal group ID
    pub terminal_group_id: String,
    /// Organization ID
    pub organization_id: String,
}

/// Response of `is_alive`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsAliveResponse {
    /// Operation ID
    pub correlation_id: Option<String>,
    /// Availability per terminal group
    #[serde(default)]
    pub is_alive_status: Vec<TerminalGroupAlive>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_request_omits_disabled_flag() {
        let body = serde_json::to_value(ListRequest {
            organization_ids: vec!["org"],
            include_disabled: false.then_some(true),
        })
        .unwrap();
        assert_eq!(body, json!({"organizationIds": ["org"]}));
    }

    #[test]
    fn test_terminal_groups_flatten() {
        let response: TerminalGroupsResponse = serde_json::from_value(json!({
            "terminalGroups": [
                {"organizationId": "a", "items": [{"id": "t1", "organizationId": "a", "name": "Hall"}]},
                {"organizationId": "b", "items": [{"id": "t2", "organizationId": "b", "name": "Bar", "address": "Main st"}]}
            ]
        }))
        .unwrap();
        let ids: Vec<_> = response.all().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t1", "t2"]);
    }
}
