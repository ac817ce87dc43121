/*
[INPUT]:  HTTP client configuration, credentials and endpoint requests
[OUTPUT]: Signed HTTP requests and typed API results
[POS]:    HTTP layer - request pipeline and SAPI endpoints
[UPDATE]: When adding new endpoints or changing pipeline stages
*/

pub mod bswap;
pub mod broker;
pub mod client;
pub mod deposit;
pub mod error;
pub mod params;
pub mod request;
pub mod response;
pub mod signature;
pub mod transport;

pub use error::{ApiError, Result, SapiError, TransportError};
pub use params::ParamSet;
pub use request::{HttpRequest, Request, RequestOption, SecurityLevel};
pub use response::{classify_response, decode_payload};
pub use signature::RequestSigner;
pub use transport::{RawResponse, ReqwestTransport, Transport};

pub use client::{
    with_cancellation, ClientConfig, Clock, Credentials, Environment, SapiClient, SystemClock,
    API_KEY_HEADER,
};
