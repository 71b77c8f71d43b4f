/*
[INPUT]:  Error sources (key material, signing, HTTP, gateway, serialization)
[OUTPUT]: Structured error types with context and classification helpers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the gateway adapter
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Private key is empty or not a parseable RSA private key
    #[error("Invalid private key material: {reason}")]
    InvalidKeyMaterial { reason: String },

    /// RSA signature primitive failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Gateway answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Gateway returned a business failure code
    #[error("API error (code {code}): {message}{}", .sub_msg.as_deref().map(|m| format!(" ({m})")).unwrap_or_default())]
    Api {
        code: String,
        message: String,
        sub_code: Option<String>,
        sub_msg: Option<String>,
    },

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Create an invalid key error
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        GatewayError::InvalidKeyMaterial {
            reason: reason.into(),
        }
    }

    /// Check if the error happened while talking to the gateway
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            GatewayError::Http(_) | GatewayError::Timeout { .. } | GatewayError::Status { .. }
        )
    }

    /// Check if the error comes from unusable key material
    pub fn is_key_error(&self) -> bool {
        matches!(self, GatewayError::InvalidKeyMaterial { .. })
    }

    /// Create a status error from an HTTP status and response body
    pub fn status_error(status: StatusCode, body: impl Into<String>) -> Self {
        GatewayError::Status {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
