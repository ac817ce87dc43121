/*
[INPUT]:  RawResponse (status code and body bytes)
[OUTPUT]: Untouched success payload or SapiError::Api
[POS]:    HTTP layer - response classification before endpoint decoding
[UPDATE]: When changing how error responses are recognised
*/

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::error::{ApiError, Result, SapiError};
use super::transport::RawResponse;

/// Status codes from this value upward are exchange errors.
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

/// Split a raw response into payload or API error.
///
/// A 4xx/5xx response always yields `SapiError::Api`, even when its body is
/// not a valid error document.
pub fn classify_response(response: RawResponse) -> Result<Bytes> {
    if response.status < ERROR_STATUS_THRESHOLD {
        return Ok(response.body);
    }
    Err(SapiError::Api(decode_api_error(&response.body).unwrap_or_default()))
}

/// Decode an exchange error document.
pub(crate) fn decode_api_error(body: &[u8]) -> std::result::Result<ApiError, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Decode a success payload into an endpoint type.
pub fn decode_payload<T: DeserializeOwned>(payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(SapiError::Decode)
}
