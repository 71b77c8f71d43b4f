/*
[INPUT]:  Application configuration, key material and request parameters
[OUTPUT]: Signed gateway requests and decoded responses
[POS]:    HTTP layer - signing content, signatures and transport
[UPDATE]: When adding gateway operations or changing client behavior
*/

pub mod canonical;
pub mod client;
pub mod error;
pub mod gateway;
pub mod signature;

pub use canonical::{canonical_bytes, canonical_string};
pub use error::{GatewayError, Result};
pub use signature::{RequestSigner, sign};

pub use client::{AppConfig, ClientConfig, GATEWAY_URL, GatewayClient, SANDBOX_GATEWAY_URL};
