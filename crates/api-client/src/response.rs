//! Response shapes shared by every endpoint
//!
//! iiko reports business rejections (unknown organization, invalid order, ...)
//! inside the body, often with HTTP 200. A body is error-shaped when its top-level
//! object carries `errorDescription`; the status code plays no part in the decision.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level key that marks an error-shaped body
pub const ERROR_DESCRIPTION_KEY: &str = "errorDescription";

/// Whether a parsed body is an error payload
#[must_use]
pub fn is_error_payload(body: &Value) -> bool {
    body.get(ERROR_DESCRIPTION_KEY).is_some_and(|v| !v.is_null())
}

/// Result of a call that reached the API and got a readable answer
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, E = ErrorResponse> {
    /// Success-shaped body
    Success(T),
    /// Error-shaped body, annotated with the HTTP status
    Error(E),
}

impl<T, E> Outcome<T, E> {
    /// Whether the API accepted the request
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether the API rejected the request
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The success value, if any
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// The error payload, if any
    pub fn error(self) -> Option<E> {
        match self {
            Self::Success(_) => None,
            Self::Error(error) => Some(error),
        }
    }

    /// Borrow the contents
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Error(error) => Outcome::Error(error),
        }
    }

    /// Transform the success value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Error(error) => Outcome::Error(error),
        }
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(error) => Err(error),
        }
    }
}

/// An error-shaped body that can carry the HTTP status it arrived with
pub trait ErrorPayload: DeserializeOwned {
    /// Attach the transport status code
    fn set_status_code(&mut self, status: u16);
}

/// Default error shape returned by every iiko endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Operation id assigned by iiko
    pub correlation_id: Option<String>,
    /// Human readable reason
    pub error_description: Option<String>,
    /// Machine readable error code
    pub error: Option<String>,
    /// HTTP status the body arrived with
    #[serde(skip)]
    pub status_code: Option<u16>,
}

impl ErrorPayload for ErrorResponse {
    fn set_status_code(&mut self, status: u16) {
        self.status_code = Some(status);
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.error_description.as_deref().unwrap_or("unknown error")
        )?;
        if let Some(ref code) = self.error {
            write!(f, " [{code}]")?;
        }
        if let Some(status) = self.status_code {
            write!(f, " (HTTP {status})")?;
        }
        Ok(())
    }
}

/// Success body that only carries the operation id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResponse {
    /// Operation id; pass it to `commands().status()` to follow up
    pub correlation_id: Option<String>,
}

/// An `{ id, name }` pair used across many dictionaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdName {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl std::fmt::Display for IdName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_discrimination_is_structural() {
        assert!(is_error_payload(&json!({"errorDescription": "bad id"})));
        assert!(is_error_payload(&json!({"errorDescription": "", "error": "X"})));
        assert!(!is_error_payload(&json!({"errorDescription": null})));
        assert!(!is_error_payload(&json!({"organizations": []})));
        assert!(!is_error_payload(&json!([{"errorDescription": "nested"}])));
    }

    #[test]
    fn test_error_response_parse_and_status() {
        let mut err: ErrorResponse = serde_json::from_value(json!({
            "correlationId": "c-1",
            "errorDescription": "Organization not found",
            "error": "ORGANIZATION_NOT_FOUND"
        }))
        .unwrap();
        assert_eq!(err.status_code, None);

        err.set_status_code(400);
        assert_eq!(err.status_code, Some(400));
        assert_eq!(
            err.to_string(),
            "Organization not found [ORGANIZATION_NOT_FOUND] (HTTP 400)"
        );
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: Outcome<u32> = Outcome::Success(3);
        assert!(ok.is_success());
        assert_eq!(ok.clone().map(|v| v * 2).success(), Some(6));
        assert_eq!(ok.into_result().ok(), Some(3));

        let err: Outcome<u32> = Outcome::Error(ErrorResponse {
            correlation_id: None,
            error_description: Some("bad".to_string()),
            error: None,
            status_code: Some(200),
        });
        assert!(err.is_error());
        assert_eq!(err.as_ref().error().and_then(|e| e.status_code), Some(200));
        assert!(err.success().is_none());
    }
}
