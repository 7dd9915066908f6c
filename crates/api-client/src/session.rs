//! Credential and session management
//!
//! [`SessionManager`] owns the HTTP connection pool and the current bearer token.
//! The token and the moment it was obtained live together in an immutable
//! [`SessionState`]; a refresh builds a new state and swaps it in whole.

use crate::error::{ApiError, ApiResult, ErrorContext};
use crate::response::ERROR_DESCRIPTION_KEY;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Token exchange endpoint
pub const ACCESS_TOKEN_PATH: &str = "/api/1/access_token";

/// Age after which a token is considered stale (15 minutes)
pub const TOKEN_STALE_AFTER_SECS: i64 = 15 * 60;

/// A bearer token together with its acquisition time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    token: String,
    acquired_at: DateTime<Utc>,
}

impl SessionState {
    /// Create a state for a token obtained at `acquired_at`
    pub fn new(token: impl Into<String>, acquired_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            acquired_at,
        }
    }

    /// The bearer token
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the token was obtained or adopted
    #[must_use]
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Whether the staleness window has fully elapsed at `now`
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.acquired_at) >= Duration::seconds(TOKEN_STALE_AFTER_SECS)
    }

    /// Value of the `Authorization` header for this token
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub(crate) fn authorization_header(&self) -> ApiResult<HeaderValue> {
        HeaderValue::from_str(&self.authorization()).map_err(|e| ApiError::InvalidHeader {
            name: "Authorization".to_string(),
            message: e.to_string(),
        })
    }
}

/// What the dispatcher should do with a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// Token was rejected; obtain a new one and replay
    Refresh,
    /// Leave the response to body inspection
    PassThrough,
}

/// Decide whether a status code warrants a token refresh.
///
/// Only 401 does. 400, 408 and 500 carry an error body that the caller sees as
/// an error payload, as does every other status.
#[must_use]
pub fn classify_status(status: StatusCode) -> StatusAction {
    match status {
        StatusCode::UNAUTHORIZED => StatusAction::Refresh,
        _ => StatusAction::PassThrough,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenRequest<'a> {
    api_login: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    token: Option<String>,
    error_description: Option<String>,
}

/// Holds the API login, the connection pool and the current token
#[derive(Debug)]
pub struct SessionManager {
    api_login: String,
    token_url: String,
    http: Client,
    state: RwLock<Option<Arc<SessionState>>>,
}

impl SessionManager {
    /// Create a manager with no token yet
    pub fn new(api_login: impl Into<String>, base_url: &str, http: Client) -> Self {
        Self {
            api_login: api_login.into(),
            token_url: format!("{}{ACCESS_TOKEN_PATH}", base_url.trim_end_matches('/')),
            http,
            state: RwLock::new(None),
        }
    }

    /// The API login this session authenticates with
    #[must_use]
    pub fn api_login(&self) -> &str {
        &self.api_login
    }

    /// The HTTP client shared by every request of this session
    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Snapshot of the current session state
    #[must_use]
    pub fn current(&self) -> Option<Arc<SessionState>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Adopt a token obtained elsewhere. Nothing is sent and the token is not checked.
    pub fn adopt(&self, token: impl Into<String>) -> Arc<SessionState> {
        self.install(SessionState::new(token, Utc::now()))
    }

    fn install(&self, state: SessionState) -> Arc<SessionState> {
        let state = Arc::new(state);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&state));
        state
    }

    /// Exchange the API login for a new bearer token.
    ///
    /// Never retries. On failure the previous state, if any, is left untouched.
    #[instrument(skip(self), fields(endpoint = ACCESS_TOKEN_PATH))]
    pub async fn acquire_token(&self) -> ApiResult<Arc<SessionState>> {
        let request_id = Uuid::new_v4().to_string();
        let context = ErrorContext::post(ACCESS_TOKEN_PATH, Some(request_id.clone()));

        let response = self
            .http
            .post(&self.token_url)
            .header(crate::client::X_REQUEST_ID, &request_id)
            .json(&AccessTokenRequest {
                api_login: &self.api_login,
            })
            .send()
            .await
            .map_err(|e| ApiError::token_acquisition(context.clone(), e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::token_acquisition(context.clone(), e.to_string()))?;

        let parsed: AccessTokenResponse = serde_json::from_slice(&body).map_err(|e| {
            ApiError::token_acquisition(
                context.clone(),
                format!("unreadable response (HTTP {}): {e}", status.as_u16()),
            )
        })?;

        if let Some(description) = parsed.error_description {
            return Err(ApiError::token_acquisition(
                context,
                format!("{ERROR_DESCRIPTION_KEY}: {description}"),
            ));
        }

        let Some(token) = parsed.token.filter(|t| !t.is_empty()) else {
            return Err(ApiError::token_acquisition(
                context,
                format!("HTTP {} response carries no token", status.as_u16()),
            ));
        };

        let state = self.install(SessionState::new(token, Utc::now()));
        info!(request_id = %request_id, "Obtained iiko access token");
        Ok(state)
    }

    /// Whether the current token has outlived the staleness window at `now`.
    ///
    /// Fails when no token was ever acquired or adopted.
    pub fn is_token_stale(&self, now: DateTime<Utc>) -> ApiResult<bool> {
        self.current()
            .map(|state| state.is_stale(now))
            .ok_or_else(|| ApiError::TokenState {
                operation: "is_token_stale",
                message: "no access token has been acquired".to_string(),
            })
    }

    /// Re-acquire the token if it is stale. Returns whether a new token was obtained.
    pub async fn ensure_fresh_token(&self) -> ApiResult<bool> {
        if self.is_token_stale(Utc::now())? {
            debug!("Access token is stale, requesting a new one");
            self.acquire_token().await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new("login", "https://api-ru.iiko.services/", Client::new())
    }

    #[test]
    fn test_staleness_window() {
        let acquired = Utc::now();
        let state = SessionState::new("t", acquired);

        assert!(!state.is_stale(acquired));
        assert!(!state.is_stale(acquired + Duration::minutes(14)));
        assert!(!state.is_stale(acquired + Duration::seconds(TOKEN_STALE_AFTER_SECS - 1)));
        assert!(state.is_stale(acquired + Duration::minutes(15)));
        assert!(state.is_stale(acquired + Duration::hours(2)));
    }

    #[test]
    fn test_stale_check_requires_token() {
        let manager = manager();
        let err = manager.is_token_stale(Utc::now()).unwrap_err();
        assert!(matches!(err, ApiError::TokenState { .. }));

        manager.adopt("tok");
        assert!(!manager.is_token_stale(Utc::now()).unwrap());
        assert!(
            manager
                .is_token_stale(Utc::now() + Duration::minutes(16))
                .unwrap()
        );
    }

    #[test]
    fn test_adopt_sets_token_and_timestamp_together() {
        let manager = manager();
        assert!(manager.current().is_none());

        let before = Utc::now();
        manager.adopt("abc");
        let state = manager.current().unwrap();
        assert_eq!(state.token(), "abc");
        assert!(state.acquired_at() >= before);
        assert_eq!(state.authorization(), "Bearer abc");
    }

    #[test]
    fn test_swap_keeps_old_snapshot_intact() {
        let manager = manager();
        let first = manager.adopt("one");
        manager.adopt("two");
        assert_eq!(first.token(), "one");
        assert_eq!(manager.current().unwrap().token(), "two");
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::UNAUTHORIZED), StatusAction::Refresh);
        for status in [
            StatusCode::OK,
            StatusCode::BAD_REQUEST,
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::FORBIDDEN,
        ] {
            assert_eq!(classify_status(status), StatusAction::PassThrough);
        }
    }

    #[test]
    fn test_failed_exchange_keeps_previous_token() {
        // Nothing listens on port 9.
        let manager = SessionManager::new("login", "http://127.0.0.1:9", Client::new());
        manager.adopt("kept");

        let err = tokio_test::block_on(manager.acquire_token()).unwrap_err();
        assert!(matches!(err, ApiError::TokenAcquisition { .. }));
        assert_eq!(manager.current().unwrap().token(), "kept");
    }

    #[tokio::test]
    async fn test_stale_token_is_refreshed_once() {
        let mut server = mockito::Server::new_async().await;
        let exchange = server
            .mock("POST", ACCESS_TOKEN_PATH)
            .with_status(200)
            .with_body(r#"{"token":"renewed"}"#)
            .expect(1)
            .create_async()
            .await;

        let manager = SessionManager::new("login", &server.url(), Client::new());
        manager.install(SessionState::new("expired", Utc::now() - Duration::minutes(16)));

        assert!(manager.ensure_fresh_token().await.unwrap());
        assert_eq!(manager.current().unwrap().token(), "renewed");
        assert!(!manager.ensure_fresh_token().await.unwrap());

        exchange.assert_async().await;
    }

    #[test]
    fn test_token_url_has_single_slash() {
        assert_eq!(
            manager().token_url,
            "https://api-ru.iiko.services/api/1/access_token"
        );
    }
}
