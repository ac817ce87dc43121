/*
[INPUT]:  Error sources (validation, transport, API, decoding, cancellation)
[OUTPUT]: Tagged error type callers pattern-match on
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error body returned by the exchange for 4xx/5xx responses.
///
/// Each field decodes on its own; a field of the wrong shape stays zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, deserialize_with = "lenient_code")]
    pub code: i64,
    #[serde(rename = "msg", default, deserialize_with = "lenient_message")]
    pub message: String,
}

fn lenient_code<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_i64().unwrap_or_default())
}

fn lenient_message<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_str()
        .map(str::to_string)
        .unwrap_or_default())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<APIError> code={}, msg={}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Failures that happen while talking to the network or preparing bytes for it.
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP request failed (connect, timeout, protocol)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Signature could not be computed
    #[error("failed to sign request: {0}")]
    Signing(String),

    /// Built URL or header is not acceptable to the HTTP client
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Main error type for the adapter
#[derive(Error, Debug)]
pub enum SapiError {
    /// Request rejected before any network I/O
    #[error("validation failed: {0}")]
    Validation(String),

    /// Network or request-construction failure
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Exchange answered with status >= 400
    #[error("{0}")]
    Api(ApiError),

    /// Success payload did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// External cancellation signal fired before the call completed
    #[error("request cancelled")]
    Cancelled,
}

impl SapiError {
    /// Error for a mandatory endpoint field that was not supplied.
    pub fn mandatory_field(field: &str) -> Self {
        SapiError::Validation(format!("{field}: field is MANDATORY"))
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, SapiError::Api(_))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, SapiError::Validation(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SapiError::Cancelled)
    }

    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            SapiError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for SapiError {
    fn from(err: ApiError) -> Self {
        SapiError::Api(err)
    }
}

impl From<reqwest::Error> for SapiError {
    fn from(err: reqwest::Error) -> Self {
        SapiError::Transport(TransportError::Http(err))
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, SapiError>;
