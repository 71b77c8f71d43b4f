/*
[INPUT]:  Path to an application private key file
[OUTPUT]: RsaSigner loaded from a bare base64 blob or PEM file
[POS]:    Auth layer - one-time key loading at startup
[UPDATE]: When key file formats change
*/

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::auth::RsaSigner;
use crate::http::{GatewayError, Result};

/// Load the application private key from disk.
///
/// The file may hold either the bare base64 blob the gateway's key tool
/// exports or complete PEM text.
pub fn load_signer(path: impl AsRef<Path>) -> Result<RsaSigner> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        GatewayError::Config(format!(
            "failed to read private key file {}: {e}",
            path.display()
        ))
    })?;

    let signer = RsaSigner::from_base64_blob(&content)?;
    debug!(path = %path.display(), key_bits = signer.key_bits(), "private key loaded");
    Ok(signer)
}
