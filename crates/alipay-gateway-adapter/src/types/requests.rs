/*
[INPUT]:  Signed ParameterSet and target charset
[OUTPUT]: Immutable SignedRequest ready for form encoding
[POS]:    Data layer - the payload handed from signer to transport
[UPDATE]: When protocol fields or form serialization change
*/

use url::form_urlencoded::byte_serialize;

use super::enums::Charset;
use super::params::ParameterSet;

/// Name of the field carrying the request signature
pub const SIGN_FIELD: &str = "sign";

/// Name of the field carrying the JSON-encoded business payload
pub const BIZ_CONTENT_FIELD: &str = "biz_content";

/// A fully signed gateway request.
///
/// Built once by the client and consumed by value when sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    params: ParameterSet,
    charset: Charset,
}

impl SignedRequest {
    /// Attach `sign` to parameters that were signed without it
    pub fn new(mut params: ParameterSet, charset: Charset, sign: String) -> Self {
        params.insert(SIGN_FIELD, sign);
        Self { params, charset }
    }

    /// All fields, `sign` included
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn sign(&self) -> &str {
        self.params.get_text(SIGN_FIELD).unwrap_or_default()
    }

    pub fn method(&self) -> Option<&str> {
        self.params.get_text("method")
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// `application/x-www-form-urlencoded` body.
    ///
    /// Values are converted to the request charset before percent-encoding;
    /// null fields are left out.
    pub fn to_form_body(&self) -> String {
        let mut body = String::new();
        for (key, value) in &self.params {
            if matches!(
                value,
                super::ParamValue::Null | super::ParamValue::Json(serde_json::Value::Null)
            ) {
                continue;
            }
            if !body.is_empty() {
                body.push('&');
            }
            body.extend(byte_serialize(key.as_bytes()));
            body.push('=');
            let rendered = value.render();
            body.extend(byte_serialize(&self.charset.encode(&rendered)));
        }
        body
    }

    pub fn into_params(self) -> ParameterSet {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParamValue;

    #[test]
    fn test_sign_field_attached() {
        let params = ParameterSet::new().with("app_id", "2021");
        let request = SignedRequest::new(params, Charset::Utf8, "c2ln".to_string());

        assert_eq!(request.sign(), "c2ln");
        assert_eq!(request.params().len(), 2);
        assert_eq!(request.method(), None);
    }

    #[test]
    fn test_form_body_encoding() {
        let params = ParameterSet::new()
            .with("method", "alipay.trade.query")
            .with("timestamp", "2024-01-01 12:00:00")
            .with("empty", "")
            .with("skipped", ParamValue::Null)
            .with("raw_null", ParamValue::Json(serde_json::Value::Null))
            .with("biz_content", r#"{"out_trade_no":"A&B"}"#);
        let request = SignedRequest::new(params, Charset::Utf8, "a+b/c=".to_string());

        assert_eq!(
            request.to_form_body(),
            "biz_content=%7B%22out_trade_no%22%3A%22A%26B%22%7D\
             &empty=\
             &method=alipay.trade.query\
             &sign=a%2Bb%2Fc%3D\
             &timestamp=2024-01-01+12%3A00%3A00"
        );
    }

    #[test]
    fn test_form_body_uses_request_charset() {
        let params = ParameterSet::new().with("subject", "中文");
        let utf8 = SignedRequest::new(params.clone(), Charset::Utf8, "s".to_string());
        let gbk = SignedRequest::new(params, Charset::Gbk, "s".to_string());

        assert_eq!(utf8.to_form_body(), "sign=s&subject=%E4%B8%AD%E6%96%87");
        assert_eq!(gbk.to_form_body(), "sign=s&subject=%D6%D0%CE%C4");
    }
}
