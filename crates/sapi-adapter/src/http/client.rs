/*
[INPUT]:  HTTP configuration (environment, timeout, debug), credentials, clock
[OUTPUT]: Signed, transport-ready requests and classified response payloads
[POS]:    HTTP layer - core client implementation and request pipeline
[UPDATE]: When adding connection options or changing client behavior
*/

use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{Result, SapiError, TransportError};
use super::request::{
    HttpRequest, Request, RequestOption, SecurityLevel, RECV_WINDOW_KEY, SIGNATURE_KEY,
    TIMESTAMP_KEY,
};
use super::response::{classify_response, decode_api_error, ERROR_STATUS_THRESHOLD};
use super::signature::RequestSigner;
use super::transport::{ReqwestTransport, Transport};

/// Base URLs for the REST API
const PRODUCTION_BASE_URL: &str = "https://api.binance.com";
const TESTNET_BASE_URL: &str = "https://testnet.binance.vision";

/// Header carrying the API key on authenticated requests
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Which exchange network the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Testnet,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Testnet => TESTNET_BASE_URL,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Overrides the environment's base URL when set
    pub base_url: Option<String>,
    pub timeout: Duration,
    /// Emit request/response debug events
    pub debug: bool,
    /// Milliseconds subtracted from local time when stamping signed requests
    pub time_offset: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            base_url: None,
            timeout: Duration::from_secs(5),
            debug: false,
            time_offset: 0,
        }
    }
}

impl ClientConfig {
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

/// Credentials for authenticated requests
pub struct Credentials {
    api_key: String,
    secret_key: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// Credentials for public endpoints only.
    pub fn anonymous() -> Self {
        Self::new("", "")
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn signer(&self) -> RequestSigner<'_> {
        RequestSigner::new(&self.secret_key)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Wall-clock source used for request timestamps
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Main HTTP client for the broker, bswap and capital REST API
#[derive(Clone)]
pub struct SapiClient {
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    credentials: Arc<Credentials>,
    base_url: String,
    time_offset: Arc<AtomicI64>,
    debug: bool,
}

impl SapiClient {
    /// Create a client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client backed by reqwest
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(credentials, config, Arc::new(transport)))
    }

    /// Create a client with an injected transport
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            clock: Arc::new(SystemClock),
            credentials: Arc::new(credentials),
            base_url: config.resolved_base_url(),
            time_offset: Arc::new(AtomicI64::new(config.time_offset)),
            debug: config.debug,
        }
    }

    /// Replace the clock used for request timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    pub fn time_offset(&self) -> i64 {
        self.time_offset.load(Ordering::Relaxed)
    }

    /// Update the clock-offset correction shared by all clones of this client
    pub fn set_time_offset(&self, offset_millis: i64) {
        self.time_offset.store(offset_millis, Ordering::Relaxed);
    }

    /// Turn a request descriptor into a signed, transport-ready request.
    ///
    /// Performs no network I/O.
    pub fn build_request(&self, request: Request, opts: &[RequestOption]) -> Result<HttpRequest> {
        let mut request = request.apply(opts);
        request.validate()?;

        if let Some(recv_window) = request.recv_window {
            request.query.set(RECV_WINDOW_KEY, recv_window);
        }
        if request.security == SecurityLevel::Signed {
            let timestamp = self.clock.now_millis().saturating_sub(self.time_offset());
            request.query.set(TIMESTAMP_KEY, timestamp);
        }

        let mut query = request.query.encode();
        let body = request.form.encode();

        let mut headers = HeaderMap::new();
        if !body.is_empty() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }
        if request.security.requires_api_key() {
            let api_key = HeaderValue::from_str(self.credentials.api_key()).map_err(|_| {
                TransportError::InvalidRequest("API key is not a valid header value".to_string())
            })?;
            headers.insert(API_KEY_HEADER, api_key);
        }

        if request.security == SecurityLevel::Signed {
            let signature = self.credentials.signer().sign_payload(&query, &body)?;
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(SIGNATURE_KEY);
            query.push('=');
            query.push_str(&signature);
        }

        let mut url = format!("{}{}", self.base_url, request.endpoint);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        if self.debug {
            debug!(method = %request.method, url = %url, body = %body, "built request");
        }

        Ok(HttpRequest {
            method: request.method,
            url,
            headers,
            body,
        })
    }

    /// Build, send and classify one request, returning the raw success payload.
    pub async fn call_api(&self, request: Request, opts: &[RequestOption]) -> Result<Bytes> {
        let http_request = self.build_request(request, opts)?;
        if self.debug {
            debug!(
                method = %http_request.method,
                url = %http_request.url,
                "sending request"
            );
        }

        let response = self.transport.execute(http_request).await?;
        if self.debug {
            debug!(
                status = response.status,
                body = %String::from_utf8_lossy(&response.body),
                "received response"
            );
            if response.status >= ERROR_STATUS_THRESHOLD {
                if let Err(err) = decode_api_error(&response.body) {
                    debug!(
                        status = response.status,
                        error = %err,
                        "failed to unmarshal error response body"
                    );
                }
            }
        }

        classify_response(response)
    }

    /// `call_api` that aborts with `SapiError::Cancelled` once `cancel` fires.
    pub async fn call_api_cancellable(
        &self,
        cancel: &CancellationToken,
        request: Request,
        opts: &[RequestOption],
    ) -> Result<Bytes> {
        with_cancellation(cancel, self.call_api(request, opts)).await
    }
}

impl std::fmt::Debug for SapiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SapiClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("time_offset", &self.time_offset())
            .field("debug", &self.debug)
            .finish()
    }
}

/// Race any client call against a cancellation token.
///
/// When the token fires first the call's future is dropped, which aborts the
/// in-flight HTTP request.
pub async fn with_cancellation<T, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SapiError::Cancelled),
        result = call => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::params::ParamSet;
    use crate::http::transport::RawResponse;
    use async_trait::async_trait;
    use reqwest::Method;
    use rstest::rstest;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    const NOW: i64 = 1_700_000_000_000;

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now_millis(&self) -> i64 {
            self.0
        }
    }

    /// Replays one scripted response and records what it was asked to send.
    struct ScriptedTransport {
        response: RawResponse,
        calls: AtomicUsize,
        last_request: Mutex<Option<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                response: RawResponse::new(status, body),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: HttpRequest) -> std::result::Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            Ok(self.response.clone())
        }
    }

    /// Never answers; used to exercise cancellation.
    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn execute(&self, _request: HttpRequest) -> std::result::Result<RawResponse, TransportError> {
            std::future::pending().await
        }
    }

    fn test_client(transport: Arc<dyn Transport>) -> SapiClient {
        let config = ClientConfig {
            base_url: Some("https://api.test".to_string()),
            ..ClientConfig::default()
        };
        SapiClient::with_transport(Credentials::new("api-key", "secret"), config, transport)
            .with_clock(Arc::new(FixedClock(NOW)))
    }

    fn sign(message: &str) -> String {
        let secret = SecretString::from("secret".to_string());
        RequestSigner::new(&secret).sign(message).unwrap()
    }

    #[test]
    fn test_signed_request_stamps_timestamp_from_clock() {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        let built = client
            .build_request(Request::get("/sapi/v1/bswap/liquidity", SecurityLevel::Signed), &[])
            .unwrap();

        let query = ParamSet::parse(built.query());
        assert_eq!(query.get("timestamp"), Some(NOW.to_string().as_str()));
    }

    #[test]
    fn test_time_offset_is_subtracted_from_timestamp() {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        client.set_time_offset(250);

        let built = client
            .build_request(Request::get("/sapi/v1/bswap/liquidity", SecurityLevel::Signed), &[])
            .unwrap();

        let query = ParamSet::parse(built.query());
        assert_eq!(query.get("timestamp"), Some((NOW - 250).to_string().as_str()));
    }

    #[test]
    fn test_signature_covers_query_without_trailing_separator() {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        let mut request = Request::get("/sapi/v1/bswap/liquidity", SecurityLevel::Signed);
        request.set_param("poolId", 3);

        let built = client.build_request(request, &[]).unwrap();

        let signed = format!("poolId=3&timestamp={NOW}");
        assert_eq!(
            built.url,
            format!("https://api.test/sapi/v1/bswap/liquidity?{signed}&signature={}", sign(&signed))
        );
        assert!(built.body.is_empty());
        assert!(built.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_form_body_is_signed_after_query_and_signature_stays_in_query() {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        let mut request = Request::post("/sapi/v1/bswap/liquidityAdd", SecurityLevel::Signed);
        request
            .set_form_param("poolId", 2)
            .set_form_param("asset", "USDT")
            .set_form_param("quantity", "100");

        let built = client
            .build_request(request, &[RequestOption::recv_window(5_000)])
            .unwrap();

        let query = format!("recvWindow=5000&timestamp={NOW}");
        let form = "asset=USDT&poolId=2&quantity=100";
        assert_eq!(built.body, form);
        assert_eq!(
            built.headers.get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            built.query(),
            format!("{query}&signature={}", sign(&format!("{query}{form}")))
        );
    }

    #[rstest]
    #[case(SecurityLevel::None, false)]
    #[case(SecurityLevel::ApiKey, true)]
    #[case(SecurityLevel::Signed, true)]
    fn test_api_key_header_by_security_level(
        #[case] security: SecurityLevel,
        #[case] expect_header: bool,
    ) {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        let built = client
            .build_request(Request::get("/sapi/v1/bswap/pools", security), &[])
            .unwrap();

        assert_eq!(built.headers.contains_key(API_KEY_HEADER), expect_header);
        if expect_header {
            assert_eq!(built.headers.get(API_KEY_HEADER).unwrap(), "api-key");
        }
        assert_eq!(
            ParamSet::parse(built.query()).contains_key("signature"),
            security == SecurityLevel::Signed
        );
    }

    #[test]
    fn test_unsigned_request_without_params_has_no_question_mark() {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        let built = client
            .build_request(Request::get("/sapi/v1/bswap/pools", SecurityLevel::None), &[])
            .unwrap();

        assert_eq!(built.url, "https://api.test/sapi/v1/bswap/pools");
    }

    #[test]
    fn test_signed_request_without_params_signs_timestamp_only() {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        let built = client
            .build_request(Request::post("/sapi/v1/broker/subAccount", SecurityLevel::Signed), &[])
            .unwrap();

        let signed = format!("timestamp={NOW}");
        assert_eq!(built.query(), format!("{signed}&signature={}", sign(&signed)));
    }

    #[test]
    fn test_rebuilding_same_parameters_yields_same_url() {
        let client = test_client(ScriptedTransport::new(200, "{}"));

        let mut first = Request::get("/sapi/v1/broker/transfer", SecurityLevel::Signed);
        first.set_param("toId", "2").set_param("fromId", "1");
        let mut second = Request::get("/sapi/v1/broker/transfer", SecurityLevel::Signed);
        second.set_param("fromId", "1").set_param("toId", "2");

        assert_eq!(
            client.build_request(first, &[]).unwrap().url,
            client.build_request(second, &[]).unwrap().url
        );
    }

    #[tokio::test]
    async fn test_call_api_returns_payload_and_sends_once() {
        let transport = ScriptedTransport::new(200, r#"[{"poolId":2}]"#);
        let client = test_client(transport.clone());

        let payload = client
            .call_api(Request::get("/sapi/v1/bswap/pools", SecurityLevel::None), &[])
            .await
            .unwrap();

        assert_eq!(payload, Bytes::from_static(br#"[{"poolId":2}]"#));
        assert_eq!(transport.calls(), 1);
        let sent = transport.last_request.lock().unwrap().take().unwrap();
        assert_eq!(sent.method, Method::GET);
    }

    #[tokio::test]
    async fn test_validation_failure_never_reaches_transport() {
        let transport = ScriptedTransport::new(200, "{}");
        let client = test_client(transport.clone());

        let err = client
            .call_api(
                Request::get("/sapi/v1/bswap/pools", SecurityLevel::None),
                &[RequestOption::set_query("signature", "forged")],
            )
            .await
            .unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_call_api_surfaces_api_error() {
        let transport = ScriptedTransport::new(400, r#"{"code":-1102,"msg":"Mandatory parameter missing"}"#);
        let client = test_client(transport);

        let err = client
            .call_api(Request::get("/sapi/v1/bswap/quote", SecurityLevel::Signed), &[])
            .await
            .unwrap_err();

        let api = err.api_error().expect("api error");
        assert_eq!(api.code, -1102);
        assert_eq!(api.message, "Mandatory parameter missing");
    }

    #[tokio::test]
    async fn test_cancellation_aborts_in_flight_call() {
        let client = test_client(Arc::new(HangingTransport));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = client
            .call_api_cancellable(
                &cancel,
                Request::get("/sapi/v1/bswap/pools", SecurityLevel::None),
                &[],
            )
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_transport() {
        let transport = ScriptedTransport::new(200, "{}");
        let client = test_client(transport.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = with_cancellation(
            &cancel,
            client.call_api(Request::get("/sapi/v1/bswap/pools", SecurityLevel::None), &[]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SapiError::Cancelled));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_environment_base_urls() {
        assert_eq!(ClientConfig::default().resolved_base_url(), "https://api.binance.com");

        let config = ClientConfig {
            environment: Environment::Testnet,
            ..ClientConfig::default()
        };
        assert_eq!(config.resolved_base_url(), "https://testnet.binance.vision");

        let config = ClientConfig {
            base_url: Some("http://127.0.0.1:8080/".to_string()),
            ..config
        };
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_debug_output_never_contains_secret() {
        let client = SapiClient::with_transport(
            Credentials::new("visible-key", "super_secret_key"),
            ClientConfig::default(),
            ScriptedTransport::new(200, "{}"),
        );
        let debug = format!("{client:?}");

        assert!(debug.contains("visible-key"));
        assert!(!debug.contains("super_secret_key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_extreme_time_offset_saturates() {
        let client = test_client(ScriptedTransport::new(200, "{}"));
        client.set_time_offset(i64::MIN);

        let built = client
            .build_request(Request::get("/sapi/v1/bswap/liquidity", SecurityLevel::Signed), &[])
            .unwrap();

        let query = ParamSet::parse(built.query());
        assert_eq!(query.get("timestamp"), Some(i64::MAX.to_string().as_str()));
    }

    /// In-memory sink for formatted tracing output.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    const LOGGED_SECRET: &str = "s3cr3t-never-logged";

    async fn call_with_captured_logs(debug: bool) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let config = ClientConfig {
            base_url: Some("https://api.test".to_string()),
            debug,
            ..ClientConfig::default()
        };
        let client = SapiClient::with_transport(
            Credentials::new("api-key", LOGGED_SECRET),
            config,
            ScriptedTransport::new(400, "<html>Bad Request</html>"),
        )
        .with_clock(Arc::new(FixedClock(NOW)));

        let mut request = Request::post("/sapi/v1/bswap/liquidityAdd", SecurityLevel::Signed);
        request.set_form_param("poolId", 2);
        let err = client.call_api(request, &[]).await.unwrap_err();
        assert!(err.is_api_error());

        logs.contents()
    }

    #[tokio::test]
    async fn test_debug_events_emitted_only_when_enabled() {
        let logs = call_with_captured_logs(true).await;

        assert!(logs.contains("built request"));
        assert!(logs.contains("sending request"));
        assert!(logs.contains("received response"));
        assert!(logs.contains("status=400"));
        assert!(logs.contains("poolId=2"));
        assert!(logs.contains("failed to unmarshal error response body"));
        assert!(!logs.contains(LOGGED_SECRET));

        let quiet = call_with_captured_logs(false).await;
        assert!(quiet.is_empty(), "unexpected events: {quiet}");
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SapiClient>();
    }
}
