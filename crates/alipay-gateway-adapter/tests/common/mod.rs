/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for alipay-gateway-adapter tests

use std::sync::{Arc, OnceLock};

use alipay_gateway_adapter::{AppConfig, ClientConfig, GatewayClient, RsaSigner};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use rsa::RsaPrivateKey;
use rsa::pkcs1::EncodeRsaPrivateKey;
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
#[allow(dead_code)]
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Shared 2048-bit RSA key, generated once per test binary
pub fn test_private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("generate test key")
    })
}

/// Bare base64 PKCS#1 body, as exported by the gateway's key tool
pub fn test_key_blob() -> String {
    let der = test_private_key().to_pkcs1_der().expect("encode test key");
    STANDARD.encode(der.as_bytes())
}

/// Signer loaded through the bare-blob path
pub fn test_signer() -> Arc<RsaSigner> {
    Arc::new(RsaSigner::from_base64_blob(&test_key_blob()).expect("load test key"))
}

/// Client pointed at the mock gateway
#[allow(dead_code)]
pub fn mock_client(server: &MockServer, app: AppConfig, config: ClientConfig) -> GatewayClient {
    let url = format!("{}/gateway.do", server.uri());
    GatewayClient::with_config_and_gateway_url(app, test_signer(), config, &url)
        .expect("client init")
}

/// Test application id
#[allow(dead_code)]
pub fn test_app_id() -> String {
    "2021000000000000".to_string()
}
