/*
[INPUT]:  Method name, business content, caller overrides
[OUTPUT]: Signed form POST to the gateway and decoded JSON response
[POS]:    HTTP layer - request assembly and transport
[UPDATE]: When protocol fields or transport behavior change
*/

use std::time::Instant;

use chrono::Local;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::http::{GatewayClient, GatewayError, Result};
use crate::types::{
    BIZ_CONTENT_FIELD, GatewayResponse, ParameterSet, SignKeyType, SignType, SignedRequest,
};

/// Response format requested from the gateway
pub const FORMAT: &str = "JSON";
/// Protocol version
pub const API_VERSION: &str = "1.0";
/// Layout of the `timestamp` field
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl GatewayClient {
    /// Protocol fields for `method`, with `overrides` merged on top
    pub fn common_params(&self, method: &str, overrides: ParameterSet) -> ParameterSet {
        let app = self.app();
        let mut params = ParameterSet::new()
            .with("app_id", &app.app_id)
            .with("method", method)
            .with("format", FORMAT)
            .with("charset", app.charset.as_str())
            .with("sign_type", app.sign_type.as_str())
            .with("timestamp", Local::now().format(TIMESTAMP_FORMAT).to_string())
            .with("version", API_VERSION);

        if app.sign_key_type == SignKeyType::Cert {
            params.insert("alipay_root_cert_sn", &app.alipay_root_cert_sn);
            params.insert("app_cert_sn", &app.app_cert_sn);
        }
        if let Some(url) = &app.notify_url {
            params.insert("notify_url", url);
        }
        if let Some(url) = &app.return_url {
            params.insert("return_url", url);
        }
        if let Some(token) = &app.app_auth_token {
            params.insert("app_auth_token", token);
        }

        params.merge(overrides);
        params
    }

    /// Assemble and sign a request.
    ///
    /// `biz_content` is JSON-encoded into the business content field. The
    /// signature uses the merged `sign_type`, so an override changes both the
    /// declared and the applied algorithm.
    pub fn build_request<B>(
        &self,
        method: &str,
        biz_content: &B,
        overrides: ParameterSet,
    ) -> Result<SignedRequest>
    where
        B: Serialize + ?Sized,
    {
        let mut params = self.common_params(method, overrides);
        params.insert(BIZ_CONTENT_FIELD, serde_json::to_string(biz_content)?);

        let sign_type = resolve_sign_type(&params, self.app().sign_type)?;
        let sign = self.signer().generate_sign(&params, sign_type)?;
        debug!(method, sign_type = %sign_type, fields = params.len(), "request signed");

        Ok(SignedRequest::new(params, self.app().charset, sign))
    }

    /// POST a signed request and decode the JSON body
    pub async fn send(&self, request: SignedRequest) -> Result<GatewayResponse> {
        let charset = request.charset();
        let method = request.method().unwrap_or_default().to_string();
        let body = request.to_form_body();

        let started = Instant::now();
        let response = self
            .http_client()
            .post(self.endpoint())
            .header(
                CONTENT_TYPE,
                format!("application/x-www-form-urlencoded;charset={charset}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let text = charset.decode(&bytes);
        info!(
            method = %method,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "gateway responded"
        );

        if !status.is_success() {
            warn!(method = %method, status = status.as_u16(), "gateway returned error status");
            return Err(GatewayError::status_error(status, text));
        }

        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(GatewayResponse(map)),
            other => Err(GatewayError::InvalidResponse(format!(
                "expected JSON object, got {other}"
            ))),
        }
    }

    /// Build, sign and send a request in one call
    pub async fn execute<B>(
        &self,
        method: &str,
        biz_content: &B,
        overrides: ParameterSet,
    ) -> Result<GatewayResponse>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, biz_content, overrides)?;
        self.send(request).await
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout {
                duration_ms: self.timeout().as_millis() as u64,
            }
        } else {
            GatewayError::Http(err)
        }
    }
}

fn resolve_sign_type(params: &ParameterSet, fallback: SignType) -> Result<SignType> {
    match params.get_text("sign_type") {
        Some(value) => value.parse().map_err(GatewayError::Config),
        None => Ok(fallback),
    }
}
