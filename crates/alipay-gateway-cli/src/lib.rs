/*
[INPUT]:  Public API exports for alipay-gateway-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod request;

// Re-export main types for convenience
pub use config::CliConfig;
pub use request::{DryRunReport, build_client, build_request, parse_param};
