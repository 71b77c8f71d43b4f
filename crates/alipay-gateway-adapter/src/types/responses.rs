/*
[INPUT]:  Decoded JSON body returned by the gateway
[OUTPUT]: Generic response map and typed business result envelope
[POS]:    Data layer - response decoding helpers for the transport
[UPDATE]: When the gateway response envelope changes
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::{GatewayError, Result};

/// Business code the gateway returns on success
pub const SUCCESS_CODE: &str = "10000";

const ERROR_RESPONSE_KEY: &str = "error_response";

/// Top-level JSON object returned by the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayResponse(pub Map<String, Value>);

impl GatewayResponse {
    /// Key of the response node for a method, e.g.
    /// `alipay.trade.query` → `alipay_trade_query_response`
    pub fn response_key(method: &str) -> String {
        format!("{}_response", method.replace('.', "_"))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Response signature as sent by the gateway (not verified)
    pub fn sign(&self) -> Option<&str> {
        self.0.get("sign").and_then(Value::as_str)
    }

    /// Business envelope for `method`, falling back to `error_response`
    pub fn business(&self, method: &str) -> Result<BusinessResponse> {
        let key = Self::response_key(method);
        let node = self
            .0
            .get(&key)
            .or_else(|| self.0.get(ERROR_RESPONSE_KEY))
            .ok_or_else(|| GatewayError::InvalidResponse(format!("missing `{key}` node")))?;
        Ok(serde_json::from_value(node.clone())?)
    }

    /// Business envelope, with non-success codes turned into `GatewayError::Api`
    pub fn into_business_result(self, method: &str) -> Result<BusinessResponse> {
        let business = self.business(method)?;
        if business.is_success() {
            Ok(business)
        } else {
            Err(GatewayError::Api {
                code: business.code,
                message: business.msg,
                sub_code: business.sub_code,
                sub_msg: business.sub_msg,
            })
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Common fields of every business response node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessResponse {
    pub code: String,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_msg: Option<String>,
    /// Method-specific fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BusinessResponse {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}
