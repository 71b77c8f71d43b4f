/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public payment gateway adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{RsaSigner, load_signer, reconstruct_pem};

// Re-export commonly used types from http
pub use http::{
    AppConfig,
    ClientConfig,
    GatewayClient,
    GatewayError,
    RequestSigner,
    Result,
    canonical_string,
};

// Re-export all types
pub use types::*;
