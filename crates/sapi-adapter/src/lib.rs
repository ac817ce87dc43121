/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public SAPI adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    ApiError,
    ClientConfig,
    Credentials,
    Environment,
    ParamSet,
    Request,
    RequestOption,
    RequestSigner,
    Result,
    SapiClient,
    SapiError,
    SecurityLevel,
    Transport,
    TransportError,
    with_cancellation,
};

// Re-export all types
pub use types::*;
