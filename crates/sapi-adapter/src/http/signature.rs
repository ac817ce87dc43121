/*
[INPUT]:  Secret key and encoded query/form strings
[OUTPUT]: Lowercase hex HMAC-SHA256 signature (signature= query parameter)
[POS]:    HTTP layer - request signing for SIGNED endpoints
[UPDATE]: When changing signing algorithm or signed payload layout
*/

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::error::TransportError;

type HmacSha256 = Hmac<Sha256>;

/// Signs canonical request payloads with the account secret key
pub struct RequestSigner<'a> {
    secret_key: &'a SecretString,
}

impl<'a> RequestSigner<'a> {
    pub fn new(secret_key: &'a SecretString) -> Self {
        Self { secret_key }
    }

    /// HMAC-SHA256 of `message`, lowercase hex.
    pub fn sign(&self, message: &str) -> Result<String, TransportError> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.expose_secret().as_bytes())
            .map_err(|e| TransportError::Signing(e.to_string()))?;
        mac.update(message.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Sign the encoded query string followed by the encoded form body.
    ///
    /// The two parts are concatenated with no separator; an empty part adds
    /// nothing to the signed bytes.
    pub fn sign_payload(&self, query: &str, form: &str) -> Result<String, TransportError> {
        let mut payload = String::with_capacity(query.len() + form.len());
        payload.push_str(query);
        payload.push_str(form);
        self.sign(&payload)
    }
}

impl std::fmt::Debug for RequestSigner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
