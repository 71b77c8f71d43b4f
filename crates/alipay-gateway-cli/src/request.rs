/*
[INPUT]:  CLI configuration, method name, business JSON and --param overrides
[OUTPUT]: Gateway client plus the signed request and its dry-run report
[POS]:    Request layer - turns CLI input into a SignedRequest
[UPDATE]: When CLI request options change
*/

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use alipay_gateway_adapter::{
    GatewayClient, ParameterSet, SignedRequest, canonical_string, load_signer,
};

use crate::config::CliConfig;

/// Parse a `KEY=VALUE` override; the value may be empty
pub fn parse_param(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("parameter key must not be empty in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Build the gateway client from configuration, loading the key once
pub fn build_client(config: &CliConfig) -> Result<GatewayClient> {
    let key_path = config.key_path();
    let signer = load_signer(&key_path)
        .with_context(|| format!("load private key from {}", key_path.display()))?;

    GatewayClient::with_config_and_gateway_url(
        config.app_config(),
        Arc::new(signer),
        config.client_config(),
        &config.gateway_url,
    )
    .context("create gateway client")
}

/// Assemble and sign a request for `method`
pub fn build_request(
    client: &GatewayClient,
    method: &str,
    biz: &str,
    params: &[(String, String)],
) -> Result<SignedRequest> {
    let biz: Value = serde_json::from_str(biz).context("business content must be valid JSON")?;
    let overrides: ParameterSet = params.iter().cloned().collect();

    let request = client
        .build_request(method, &biz, overrides)
        .context("sign request")?;
    info!(method, fields = request.params().len(), "request signed");
    Ok(request)
}

/// What a dry run prints instead of sending
#[derive(Debug, Serialize)]
pub struct DryRunReport {
    pub endpoint: String,
    pub canonical: String,
    pub sign: String,
    pub form_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl DryRunReport {
    pub fn new(client: &GatewayClient, request: &SignedRequest, verify: bool) -> Self {
        let verified = verify.then(|| verify_request(client, request));
        Self {
            endpoint: client.endpoint().to_string(),
            canonical: canonical_string(request.params()),
            sign: request.sign().to_string(),
            form_body: request.to_form_body(),
            verified,
        }
    }
}

/// Check the request's signature against the client's own key
pub fn verify_request(client: &GatewayClient, request: &SignedRequest) -> bool {
    let sign_type = request
        .params()
        .get_text("sign_type")
        .and_then(|value| value.parse().ok())
        .unwrap_or(client.app().sign_type);
    client
        .signer()
        .verify(request.params(), request.sign(), sign_type)
}
