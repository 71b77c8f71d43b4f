/*
[INPUT]:  Application config, shared RSA key, HTTP timeouts, gateway URL
[OUTPUT]: Configured gateway client ready to sign and send requests
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::RequestSigner;
use crate::auth::RsaSigner;
use crate::http::Result;
use crate::types::{Charset, SignKeyType, SignType};

/// Production gateway endpoint
pub const GATEWAY_URL: &str = "https://openapi.alipay.com/gateway.do";
/// Sandbox gateway endpoint
pub const SANDBOX_GATEWAY_URL: &str = "https://openapi.alipaydev.com/gateway.do";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Application identity and protocol options sent with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub app_id: String,
    #[serde(default)]
    pub charset: Charset,
    #[serde(default)]
    pub sign_type: SignType,
    #[serde(default)]
    pub sign_key_type: SignKeyType,
    /// Gateway root certificate serial number (certificate mode)
    #[serde(default)]
    pub alipay_root_cert_sn: String,
    /// Application certificate serial number (certificate mode)
    #[serde(default)]
    pub app_cert_sn: String,
    #[serde(default)]
    pub notify_url: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub app_auth_token: Option<String>,
}

impl AppConfig {
    /// Key-mode configuration with default charset and sign type
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            charset: Charset::default(),
            sign_type: SignType::default(),
            sign_key_type: SignKeyType::default(),
            alipay_root_cert_sn: String::new(),
            app_cert_sn: String::new(),
            notify_url: None,
            return_url: None,
            app_auth_token: None,
        }
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    /// Switch to certificate mode with the given serial numbers
    pub fn with_cert_sn(
        mut self,
        alipay_root_cert_sn: impl Into<String>,
        app_cert_sn: impl Into<String>,
    ) -> Self {
        self.sign_key_type = SignKeyType::Cert;
        self.alipay_root_cert_sn = alipay_root_cert_sn.into();
        self.app_cert_sn = app_cert_sn.into();
        self
    }

    pub fn with_notify_url(mut self, notify_url: impl Into<String>) -> Self {
        self.notify_url = Some(notify_url.into());
        self
    }
}

/// Main HTTP client for the payment gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http_client: Client,
    gateway_url: Url,
    timeout: Duration,
    app: AppConfig,
    signer: RequestSigner,
}

impl GatewayClient {
    /// Create a new client against the production gateway
    pub fn new(app: AppConfig, key: Arc<RsaSigner>) -> Result<Self> {
        Self::with_config(app, key, ClientConfig::default())
    }

    /// Create a new client with custom HTTP configuration
    pub fn with_config(app: AppConfig, key: Arc<RsaSigner>, config: ClientConfig) -> Result<Self> {
        Self::with_config_and_gateway_url(app, key, config, GATEWAY_URL)
    }

    /// Create a new client against an explicit gateway URL (sandbox, mocks)
    pub fn with_config_and_gateway_url(
        app: AppConfig,
        key: Arc<RsaSigner>,
        config: ClientConfig,
        gateway_url: &str,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        let signer = RequestSigner::new(key, app.charset);

        Ok(Self {
            http_client,
            gateway_url: Url::parse(gateway_url)?,
            timeout: config.timeout,
            app,
            signer,
        })
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Gateway URL with the charset query parameter attached
    pub fn endpoint(&self) -> Url {
        let mut url = self.gateway_url.clone();
        url.query_pairs_mut()
            .append_pair("charset", self.app.charset.as_str());
        url
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }
}
