/*
[INPUT]:  ParameterSet, sign type and shared RSA key material
[OUTPUT]: Base64 `sign` field value for gateway requests
[POS]:    HTTP layer - request signing entry point used by the client
[UPDATE]: When changing signing content or signature encoding
*/

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::debug;

use super::canonical;
use crate::auth::RsaSigner;
use crate::http::Result;
use crate::types::{Charset, ParameterSet, SignType};

/// Sign canonical content with `key`, returning the base64 signature.
///
/// The content is converted to `charset` before hashing.
pub fn sign(
    canonical: &str,
    sign_type: SignType,
    charset: Charset,
    key: &RsaSigner,
) -> Result<String> {
    let content = charset.encode(canonical);
    debug!(
        sign_type = %sign_type,
        charset = %charset,
        content_len = content.len(),
        "signing request content"
    );
    let signature = key.sign(&content, sign_type)?;
    Ok(BASE64.encode(signature))
}

/// Signs request parameters for the gateway
#[derive(Debug, Clone)]
pub struct RequestSigner {
    signer: Arc<RsaSigner>,
    charset: Charset,
}

impl RequestSigner {
    /// Create a request signer that encodes signing content as `charset`
    pub fn new(signer: Arc<RsaSigner>, charset: Charset) -> Self {
        Self { signer, charset }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn key(&self) -> &RsaSigner {
        &self.signer
    }

    /// Canonical string the signature is computed over
    pub fn canonical_string(&self, params: &ParameterSet) -> String {
        canonical::canonical_string(params)
    }

    /// Sign an already canonical string
    pub fn sign(&self, canonical: &str, sign_type: SignType) -> Result<String> {
        sign(canonical, sign_type, self.charset, &self.signer)
    }

    /// Canonicalize `params` and sign the result
    pub fn generate_sign(&self, params: &ParameterSet, sign_type: SignType) -> Result<String> {
        self.sign(&canonical::canonical_string(params), sign_type)
    }

    /// Check a base64 signature against `params` with this key
    pub fn verify(&self, params: &ParameterSet, signature: &str, sign_type: SignType) -> bool {
        let Ok(raw) = BASE64.decode(signature) else {
            return false;
        };
        let content = canonical::canonical_bytes(params, self.charset);
        self.signer.verify(&content, &raw, sign_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::signer::tests::{test_key, test_key_blob};
    use crate::types::ParamValue;
    use rsa::Pkcs1v15Sign;
    use rstest::rstest;
    use sha2::{Digest, Sha256};

    fn request_signer(charset: Charset) -> RequestSigner {
        let key = RsaSigner::from_base64_blob(&test_key_blob()).unwrap();
        RequestSigner::new(Arc::new(key), charset)
    }

    fn sample_params() -> ParameterSet {
        ParameterSet::new()
            .with("app_id", "2014072300007148")
            .with("method", "alipay.trade.query")
            .with("charset", "UTF-8")
            .with("sign_type", "RSA2")
            .with("timestamp", "2014-07-24 03:07:50")
            .with("version", "1.0")
            .with("biz_content", r#"{"out_trade_no":"20150320010101001"}"#)
            .with("notify_url", ParamValue::Null)
    }

    #[test]
    fn test_generate_sign_verifies_with_public_key() {
        let signer = request_signer(Charset::Utf8);
        let params = sample_params();
        let sign = signer.generate_sign(&params, SignType::Rsa2).unwrap();

        let raw = BASE64.decode(&sign).unwrap();
        let hashed = Sha256::digest(signer.canonical_string(&params).as_bytes());
        assert!(
            test_key()
                .to_public_key()
                .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, &raw)
                .is_ok()
        );
        assert!(signer.verify(&params, &sign, SignType::Rsa2));
    }

    #[rstest]
    #[case(Charset::Utf8)]
    #[case(Charset::Gbk)]
    #[case(Charset::Gb18030)]
    fn test_generate_sign_matches_sign_of_canonical_string(#[case] charset: Charset) {
        let signer = request_signer(charset);
        let params = sample_params()
            .with("body", "😀")
            .with("subject", "中文");
        let canonical = signer.canonical_string(&params);

        let composed = signer.generate_sign(&params, SignType::Rsa2).unwrap();
        assert_eq!(composed, signer.sign(&canonical, SignType::Rsa2).unwrap());
        assert_eq!(
            composed,
            sign(&canonical, SignType::Rsa2, charset, signer.key()).unwrap()
        );
        assert!(signer.verify(&params, &composed, SignType::Rsa2));
    }

    #[test]
    fn test_sign_with_fallback_covers_posted_bytes() {
        let signer = request_signer(Charset::Gbk);
        let params = ParameterSet::new()
            .with("body", "😀")
            .with("subject", "中文");
        let sign = signer
            .sign(&signer.canonical_string(&params), SignType::Rsa2)
            .unwrap();

        let mut expected = b"body=".to_vec();
        expected.extend_from_slice("😀".as_bytes());
        expected.extend_from_slice(b"&subject=\xD6\xD0\xCE\xC4");
        let raw = BASE64.decode(&sign).unwrap();
        assert!(signer.key().verify(&expected, &raw, SignType::Rsa2));
    }

    #[test]
    fn test_sign_type_changes_signature() {
        let signer = request_signer(Charset::Utf8);
        let params = sample_params();
        let rsa = signer.generate_sign(&params, SignType::Rsa).unwrap();
        let rsa2 = signer.generate_sign(&params, SignType::Rsa2).unwrap();

        assert_ne!(rsa, rsa2);
        assert!(signer.verify(&params, &rsa, SignType::Rsa));
        assert!(!signer.verify(&params, &rsa, SignType::Rsa2));
    }

    #[test]
    fn test_existing_sign_field_does_not_change_signature() {
        let signer = request_signer(Charset::Utf8);
        let params = sample_params();
        let sign = signer.generate_sign(&params, SignType::Rsa2).unwrap();

        let with_sign = params.clone().with("sign", sign.clone());
        assert_eq!(signer.generate_sign(&with_sign, SignType::Rsa2).unwrap(), sign);
    }

    #[test]
    fn test_empty_params_still_sign() {
        let signer = request_signer(Charset::Utf8);
        let sign = signer
            .generate_sign(&ParameterSet::new(), SignType::Rsa2)
            .unwrap();
        assert!(!sign.is_empty());
        assert!(signer.key().verify(b"", &BASE64.decode(&sign).unwrap(), SignType::Rsa2));
    }

    #[test]
    fn test_charset_changes_signing_bytes() {
        let params = ParameterSet::new().with("subject", "中文");
        let utf8 = request_signer(Charset::Utf8);
        let gbk = request_signer(Charset::Gbk);

        let utf8_sign = utf8.generate_sign(&params, SignType::Rsa2).unwrap();
        let gbk_sign = gbk.generate_sign(&params, SignType::Rsa2).unwrap();
        assert_ne!(utf8_sign, gbk_sign);

        let raw = BASE64.decode(&gbk_sign).unwrap();
        assert!(gbk.key().verify(b"subject=\xD6\xD0\xCE\xC4", &raw, SignType::Rsa2));
    }

    #[test]
    fn test_verify_rejects_malformed_base64() {
        let signer = request_signer(Charset::Utf8);
        assert!(!signer.verify(&sample_params(), "%%%", SignType::Rsa2));
    }
}
