//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::organizations::Organization;
use crate::endpoints::{
    AddressesApi, CommandsApi, CouponsApi, CustomersApi, DeliveriesApi, DeliveryRestrictionsApi,
    DictionariesApi, EmployeesApi, MenuApi, NotificationsApi, OrdersApi, OrganizationsApi,
    TerminalGroupsApi,
};
use crate::error::{ApiError, ApiResult, ErrorContext};
use crate::response::{is_error_payload, ErrorPayload, Outcome};
use crate::session::{classify_status, SessionManager, SessionState, StatusAction};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
pub const X_REQUEST_ID: &str = "X-Request-ID";

/// Vendor `Timeout` header carrying the per-call timeout in whole seconds, rounded up
pub const TIMEOUT_HEADER: &str = "timeout";

/// Re-authentications allowed per logical call
const MAX_REAUTHENTICATIONS: u32 = 1;

const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// iiko Cloud API client
///
/// Cloning is cheap: clones share the session (token and connection pool), the
/// organization cache and the last-response slot. Endpoint groups are reached
/// through accessor methods such as [`IikoClient::orders`].
///
/// One client is one logical session. Concurrent calls that hit a 401 at the same
/// time will each exchange the login; give each task its own client if that matters.
#[derive(Clone)]
pub struct IikoClient {
    config: Arc<ClientConfig>,
    session: Arc<SessionManager>,
    base_headers: Arc<HeaderMap>,
    last_response: Arc<RwLock<Option<Value>>>,
    organizations: Arc<RwLock<Option<Vec<Organization>>>>,
}

impl IikoClient {
    /// Create a new client with configuration from environment
    pub async fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config).await
    }

    /// Create a new client with specific configuration.
    ///
    /// Adopts `working_token` when set, otherwise exchanges the API login right away.
    pub async fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(HeaderMap::from_iter([(
                USER_AGENT,
                HeaderValue::from_static(CLIENT_USER_AGENT),
            )]))
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        Self::with_http_client(config, http).await
    }

    /// Create a client on top of an existing `reqwest::Client` (shared pool)
    ///
    /// The supplied client is used as-is: `config.timeout` and the crate's
    /// `User-Agent` only apply to clients built by [`IikoClient::with_config`].
    /// Set them on the `reqwest::ClientBuilder` when they matter.
    pub async fn with_http_client(config: ClientConfig, http: Client) -> ApiResult<Self> {
        config.validate()?;
        let base_headers = build_base_headers(&config)?;

        let session = SessionManager::new(config.api_login.clone(), &config.base_url, http);
        match config.working_token.as_deref() {
            Some(token) => {
                session.adopt(token);
                debug!("Adopted working token, skipping token exchange");
            }
            None => {
                session.acquire_token().await?;
            }
        }

        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(session),
            base_headers: Arc::new(base_headers),
            last_response: Arc::new(RwLock::new(None)),
            organizations: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The API login this client authenticates with
    #[must_use]
    pub fn api_login(&self) -> &str {
        self.session.api_login()
    }

    /// Session manager (token lifecycle and connection pool)
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Current bearer token
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.session.current().map(|s| s.token().to_string())
    }

    /// When the current token was obtained
    #[must_use]
    pub fn token_acquired_at(&self) -> Option<DateTime<Utc>> {
        self.session.current().map(|s| s.acquired_at())
    }

    /// Headers the next request will carry, `Authorization` included
    pub fn headers(&self) -> ApiResult<HeaderMap> {
        let mut headers = (*self.base_headers).clone();
        if let Some(state) = self.session.current() {
            headers.insert(AUTHORIZATION, state.authorization_header()?);
        }
        Ok(headers)
    }

    /// Exchange the API login for a fresh token now
    pub async fn refresh_token(&self) -> ApiResult<Arc<SessionState>> {
        self.session.acquire_token().await
    }

    /// Whether the token has outlived the staleness window
    pub fn is_token_stale(&self, now: DateTime<Utc>) -> ApiResult<bool> {
        self.session.is_token_stale(now)
    }

    /// Refresh the token if it is stale; returns whether it was refreshed
    pub async fn ensure_fresh_token(&self) -> ApiResult<bool> {
        self.session.ensure_fresh_token().await
    }

    /// Body of the most recent dispatched response
    #[must_use]
    pub fn last_response(&self) -> Option<Value> {
        self.last_response
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Organizations returned by the last successful `organizations().list()` call
    #[must_use]
    pub fn cached_organizations(&self) -> Option<Vec<Organization>> {
        self.organizations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// IDs of the organizations returned by the last successful listing
    #[must_use]
    pub fn organization_ids(&self) -> Option<Vec<String>> {
        self.organizations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|orgs| orgs.iter().map(|o| o.id.clone()).collect())
    }

    pub(crate) fn cache_organizations(&self, organizations: &[Organization]) {
        *self
            .organizations
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(organizations.to_vec());
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access organization endpoints
    #[must_use]
    pub fn organizations(&self) -> OrganizationsApi {
        OrganizationsApi::new(self.clone())
    }

    /// Access operation status endpoints
    #[must_use]
    pub fn commands(&self) -> CommandsApi {
        CommandsApi::new(self.clone())
    }

    /// Access dictionary endpoints (cancel causes, payment types, ...)
    #[must_use]
    pub fn dictionaries(&self) -> DictionariesApi {
        DictionariesApi::new(self.clone())
    }

    /// Access loyalty coupon endpoints
    #[must_use]
    pub fn coupons(&self) -> CouponsApi {
        CouponsApi::new(self.clone())
    }

    /// Access menu and nomenclature endpoints
    #[must_use]
    pub fn menu(&self) -> MenuApi {
        MenuApi::new(self.clone())
    }

    /// Access terminal group endpoints
    #[must_use]
    pub fn terminal_groups(&self) -> TerminalGroupsApi {
        TerminalGroupsApi::new(self.clone())
    }

    /// Access region, city and street endpoints
    #[must_use]
    pub fn addresses(&self) -> AddressesApi {
        AddressesApi::new(self.clone())
    }

    /// Access delivery restriction endpoints
    #[must_use]
    pub fn delivery_restrictions(&self) -> DeliveryRestrictionsApi {
        DeliveryRestrictionsApi::new(self.clone())
    }

    /// Access table order endpoints
    #[must_use]
    pub fn orders(&self) -> OrdersApi {
        OrdersApi::new(self.clone())
    }

    /// Access delivery endpoints
    #[must_use]
    pub fn deliveries(&self) -> DeliveriesApi {
        DeliveriesApi::new(self.clone())
    }

    /// Access notification endpoints
    #[must_use]
    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.clone())
    }

    /// Access employee endpoints
    #[must_use]
    pub fn employees(&self) -> EmployeesApi {
        EmployeesApi::new(self.clone())
    }

    /// Access loyalty customer endpoints
    #[must_use]
    pub fn customers(&self) -> CustomersApi {
        CustomersApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// POST `payload` to `path` and decode the answer into `T` or
    /// [`ErrorResponse`](crate::response::ErrorResponse)
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> ApiResult<Outcome<T>> {
        self.post_as(path, Some(payload), None).await
    }

    /// POST and decode into an untyped success mapping or
    /// [`ErrorResponse`](crate::response::ErrorResponse)
    pub async fn post_value<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &B,
    ) -> ApiResult<Outcome<Value>> {
        self.post_as(path, Some(payload), None).await
    }

    /// POST with full control over the success shape `T`, the error shape `E`
    /// and the vendor timeout. A missing payload is sent as `{}`.
    #[instrument(skip(self, payload))]
    pub async fn post_as<T, E, B>(
        &self,
        path: &str,
        payload: Option<&B>,
        timeout: Option<Duration>,
    ) -> ApiResult<Outcome<T, E>>
    where
        T: DeserializeOwned,
        E: ErrorPayload,
        B: Serialize + ?Sized,
    {
        let payload = payload_value(payload)?;
        let (status, body) = self.dispatch(path, &payload, timeout).await?;
        decode(path, status, body)
    }

    /// POST and return the parsed body unchanged, error-shaped or not
    #[instrument(skip(self, payload))]
    pub async fn post_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: Option<&B>,
        timeout: Option<Duration>,
    ) -> ApiResult<Value> {
        let payload = payload_value(payload)?;
        let (_, body) = self.dispatch(path, &payload, timeout).await?;
        Ok(body)
    }

    /// Send one logical call: at most one replay, after a 401 and a token refresh
    async fn dispatch(
        &self,
        path: &str,
        payload: &Value,
        timeout: Option<Duration>,
    ) -> ApiResult<(StatusCode, Value)> {
        let url = format!("{}{}", self.config.base_url_trimmed(), path);
        let timeout = timeout.unwrap_or(self.config.request_timeout);
        let mut reauthentications = 0;

        loop {
            let request_id = Uuid::new_v4().to_string();
            let context = ErrorContext::post(path, Some(request_id.clone()));

            let start = Instant::now();
            let response = self
                .execute_single_request(&url, &context, payload, timeout)
                .await?;
            let status = response.status();

            if classify_status(status) == StatusAction::Refresh {
                if reauthentications >= MAX_REAUTHENTICATIONS {
                    warn!(
                        request_id = %request_id,
                        endpoint = %path,
                        "Token rejected again after re-authentication"
                    );
                    return Err(ApiError::request_failed(
                        context,
                        "HTTP 401 Unauthorized after re-authentication",
                    ));
                }
                warn!(
                    request_id = %request_id,
                    endpoint = %path,
                    "Token rejected, re-authenticating before replay"
                );
                self.session.acquire_token().await?;
                reauthentications += 1;
                continue;
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| ApiError::request_failed(context.clone(), e.to_string()))?;
            let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
                ApiError::request_failed(
                    context.clone(),
                    format!("malformed response body (HTTP {}): {e}", status.as_u16()),
                )
            })?;

            debug!(
                request_id = %request_id,
                endpoint = %path,
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis(),
                "Request completed"
            );
            if self.config.debug {
                debug!(
                    request_id = %request_id,
                    request = %payload,
                    response = %body,
                    "Request and response bodies"
                );
            }

            *self
                .last_response
                .write()
                .unwrap_or_else(PoisonError::into_inner) = Some(body.clone());

            return Ok((status, body));
        }
    }

    /// Execute a single request without replay
    async fn execute_single_request(
        &self,
        url: &str,
        context: &ErrorContext,
        payload: &Value,
        timeout: Duration,
    ) -> ApiResult<Response> {
        let mut headers = self.headers()?;
        headers.insert(
            HeaderName::from_static(TIMEOUT_HEADER),
            HeaderValue::from(timeout_header_secs(timeout)),
        );

        let response = self
            .session
            .http()
            .post(url)
            .headers(headers)
            .header(X_REQUEST_ID, context.request_id.as_deref().unwrap_or_default())
            .json(payload)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(context.clone(), e.to_string()))?;

        Ok(response)
    }
}

/// Whole seconds for the vendor `timeout` header, rounded up and never zero
fn timeout_header_secs(timeout: Duration) -> u64 {
    let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
    secs.max(1)
}

fn payload_value<B: Serialize + ?Sized>(payload: Option<&B>) -> ApiResult<Value> {
    match payload {
        Some(body) => Ok(serde_json::to_value(body)?),
        None => Ok(Value::Object(serde_json::Map::new())),
    }
}

fn decode<T: DeserializeOwned, E: ErrorPayload>(
    path: &str,
    status: StatusCode,
    body: Value,
) -> ApiResult<Outcome<T, E>> {
    if is_error_payload(&body) {
        let mut error: E = serde_json::from_value(body)?;
        error.set_status_code(status.as_u16());
        warn!(endpoint = %path, status = status.as_u16(), "iiko returned an error payload");
        return Ok(Outcome::Error(error));
    }
    Ok(Outcome::Success(serde_json::from_value(body)?))
}

/// Headers every request carries besides `Authorization`
fn build_base_headers(config: &ClientConfig) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &config.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ApiError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ApiError::InvalidHeader {
            name: name.clone(),
            message: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

impl std::fmt::Debug for IikoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IikoClient")
            .field("base_url", &self.config.base_url)
            .field("api_login", &self.session.api_login())
            .field("has_token", &self.session.current().is_some())
            .finish_non_exhaustive()
    }
}
