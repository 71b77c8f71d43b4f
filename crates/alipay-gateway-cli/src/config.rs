/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed application, key and HTTP configuration
[POS]:    Configuration layer - gateway client setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use alipay_gateway_adapter::http::GATEWAY_URL;
use alipay_gateway_adapter::{AppConfig, Charset, ClientConfig, SignKeyType, SignType};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the gateway CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Application id assigned by the gateway
    pub app_id: String,
    /// File holding the application private key (bare base64 or PEM)
    pub private_key_path: PathBuf,
    /// Gateway endpoint
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default)]
    pub charset: Charset,
    #[serde(default)]
    pub sign_type: SignType,
    #[serde(default)]
    pub sign_key_type: SignKeyType,
    #[serde(default)]
    pub alipay_root_cert_sn: String,
    #[serde(default)]
    pub app_cert_sn: String,
    #[serde(default)]
    pub notify_url: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory of the file this config was loaded from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_gateway_url() -> String {
    GATEWAY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Private key path, resolved against the config file's directory
    pub fn key_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) if self.private_key_path.is_relative() => base.join(&self.private_key_path),
            _ => self.private_key_path.clone(),
        }
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            app_id: self.app_id.clone(),
            charset: self.charset,
            sign_type: self.sign_type,
            sign_key_type: self.sign_key_type,
            alipay_root_cert_sn: self.alipay_root_cert_sn.clone(),
            app_cert_sn: self.app_cert_sn.clone(),
            notify_url: self.notify_url.clone(),
            return_url: self.return_url.clone(),
            app_auth_token: None,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }
}
