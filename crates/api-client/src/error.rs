//! Error types for the API client
//!
//! Faults (transport failures, token problems, bad parameters) are `Err(ApiError)`.
//! Rejections reported by iiko inside a response body are not errors at this level;
//! they come back as [`Outcome::Error`](crate::response::Outcome::Error).

use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Exchanging the API login for a bearer token failed
    #[error("{context}: failed to obtain access token: {message}")]
    TokenAcquisition {
        /// Where the exchange was attempted
        context: ErrorContext,
        /// Transport error or vendor `errorDescription`
        message: String,
    },

    /// Token state was queried before any token was acquired
    #[error("token state unavailable in {operation}: {message}")]
    TokenState {
        /// Operation that needed the token
        operation: &'static str,
        /// What was missing
        message: String,
    },

    /// A required parameter was missing or empty; no request was sent
    #[error("invalid parameter for {operation}: {message}")]
    Parameter {
        /// Endpoint operation that rejected the parameter
        operation: &'static str,
        /// Which parameter and why
        message: String,
    },

    /// Transport failure or unreadable response body
    #[error("{context}: request failed: {message}")]
    RequestFailed {
        /// Request that failed
        context: ErrorContext,
        /// Underlying failure
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// A configured header name or value is not valid HTTP
    #[error("Invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name as configured
        name: String,
        /// Parse failure
        message: String,
    },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Create a parameter error
    pub fn parameter(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Parameter {
            operation,
            message: message.into(),
        }
    }

    /// Create a token acquisition error
    pub fn token_acquisition(context: ErrorContext, message: impl Into<String>) -> Self {
        Self::TokenAcquisition {
            context,
            message: message.into(),
        }
    }

    /// Create a request failure
    pub fn request_failed(context: ErrorContext, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            context,
            message: message.into(),
        }
    }

    /// Check if this error came from the token lifecycle
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::TokenAcquisition { .. } | Self::TokenState { .. })
    }

    /// Check if this error is a transport-level failure
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Check if this error was raised before anything was sent
    #[must_use]
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Self::Parameter { .. })
    }
}

/// Error context for better debugging
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request ID for correlation
    pub request_id: Option<String>,
    /// Endpoint that was called
    pub endpoint: String,
    /// HTTP method used
    pub method: String,
}

impl ErrorContext {
    /// Context for a POST to `endpoint`
    pub fn post(endpoint: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            request_id,
            endpoint: endpoint.into(),
            method: "POST".to_string(),
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.endpoint)?;
        if let Some(ref id) = self.request_id {
            write!(f, " (request_id: {id})")?;
        }
        Ok(())
    }
}
