/*
[INPUT]:  Endpoint method, path, security level and parameters
[OUTPUT]: Request descriptors and the transport-ready HttpRequest
[POS]:    HTTP layer - request description consumed by the request builder
[UPDATE]: When adding request options or descriptor invariants
*/

use reqwest::header::HeaderMap;
use reqwest::Method;

use super::error::{Result, SapiError};
use super::params::ParamSet;

pub(crate) const TIMESTAMP_KEY: &str = "timestamp";
pub(crate) const SIGNATURE_KEY: &str = "signature";
pub(crate) const RECV_WINDOW_KEY: &str = "recvWindow";

/// How a request authenticates against the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityLevel {
    /// Public endpoint.
    #[default]
    None,
    /// API key header only.
    ApiKey,
    /// API key header plus timestamp and HMAC signature.
    Signed,
}

impl SecurityLevel {
    pub fn requires_api_key(self) -> bool {
        matches!(self, SecurityLevel::ApiKey | SecurityLevel::Signed)
    }
}

/// Description of a single API call before it is built.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub endpoint: String,
    pub security: SecurityLevel,
    pub query: ParamSet,
    pub form: ParamSet,
    pub recv_window: Option<u64>,
}

impl Request {
    pub fn new(method: Method, endpoint: impl Into<String>, security: SecurityLevel) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            security,
            query: ParamSet::new(),
            form: ParamSet::new(),
            recv_window: None,
        }
    }

    pub fn get(endpoint: impl Into<String>, security: SecurityLevel) -> Self {
        Self::new(Method::GET, endpoint, security)
    }

    pub fn post(endpoint: impl Into<String>, security: SecurityLevel) -> Self {
        Self::new(Method::POST, endpoint, security)
    }

    pub fn delete(endpoint: impl Into<String>, security: SecurityLevel) -> Self {
        Self::new(Method::DELETE, endpoint, security)
    }

    pub fn set_param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.query.set(key, value);
        self
    }

    pub fn add_param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.query.add(key, value);
        self
    }

    pub fn set_form_param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.form.set(key, value);
        self
    }

    /// Set a query parameter only when a value is present.
    pub fn set_opt_param<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.query.set(key, value);
        }
        self
    }

    pub fn set_opt_form_param<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.form.set(key, value);
        }
        self
    }

    /// Apply caller options in order.
    pub fn apply(self, opts: &[RequestOption]) -> Self {
        opts.iter().fold(self, |request, opt| opt.apply(request))
    }

    /// Structural checks performed before any timestamp or signature is added.
    pub fn validate(&self) -> Result<()> {
        if !self.endpoint.starts_with('/') {
            return Err(SapiError::Validation(format!(
                "endpoint must start with '/': {}",
                self.endpoint
            )));
        }

        if self.recv_window == Some(0) {
            return Err(SapiError::Validation(
                "recvWindow must be greater than zero".to_string(),
            ));
        }

        for params in [&self.query, &self.form] {
            if params.contains_key(SIGNATURE_KEY) {
                return Err(SapiError::Validation(format!(
                    "'{SIGNATURE_KEY}' is reserved and cannot be set by the caller"
                )));
            }
            if self.security == SecurityLevel::Signed && params.contains_key(TIMESTAMP_KEY) {
                return Err(SapiError::Validation(format!(
                    "'{TIMESTAMP_KEY}' is stamped on signed requests and cannot be set by the caller"
                )));
            }
        }

        Ok(())
    }
}

/// Caller-supplied transformation applied to a request before it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOption {
    RecvWindow(u64),
    SetQuery(String, String),
    AddQuery(String, String),
    SetForm(String, String),
    AddForm(String, String),
}

impl RequestOption {
    pub fn recv_window(millis: u64) -> Self {
        RequestOption::RecvWindow(millis)
    }

    pub fn set_query(key: impl Into<String>, value: impl ToString) -> Self {
        RequestOption::SetQuery(key.into(), value.to_string())
    }

    pub fn add_query(key: impl Into<String>, value: impl ToString) -> Self {
        RequestOption::AddQuery(key.into(), value.to_string())
    }

    pub fn set_form(key: impl Into<String>, value: impl ToString) -> Self {
        RequestOption::SetForm(key.into(), value.to_string())
    }

    pub fn add_form(key: impl Into<String>, value: impl ToString) -> Self {
        RequestOption::AddForm(key.into(), value.to_string())
    }

    pub fn apply(&self, mut request: Request) -> Request {
        match self {
            RequestOption::RecvWindow(millis) => request.recv_window = Some(*millis),
            RequestOption::SetQuery(key, value) => {
                request.query.set(key.as_str(), value);
            }
            RequestOption::AddQuery(key, value) => {
                request.query.add(key.as_str(), value);
            }
            RequestOption::SetForm(key, value) => {
                request.form.set(key.as_str(), value);
            }
            RequestOption::AddForm(key, value) => {
                request.form.add(key.as_str(), value);
            }
        }
        request
    }
}

/// Fully built request, ready for a transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpRequest {
    /// Query string portion of the URL, without the leading `?`.
    pub fn query(&self) -> &str {
        self.url.split_once('?').map(|(_, query)| query).unwrap_or("")
    }
}
