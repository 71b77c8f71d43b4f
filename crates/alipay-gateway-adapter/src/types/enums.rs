/*
[INPUT]:  Gateway protocol enumerations and serde requirements
[OUTPUT]: Typed sign type, key type and charset enums
[POS]:    Data layer - protocol selectors shared by signer and client
[UPDATE]: When the gateway adds a sign type or charset
*/

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoding, GB18030, GBK, UTF_8};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Signature algorithm selector sent as `sign_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignType {
    /// Legacy RSA signature over SHA-1
    #[serde(rename = "RSA", alias = "rsa")]
    Rsa,
    /// RSA signature over SHA-256
    #[default]
    #[serde(rename = "RSA2", alias = "rsa2")]
    Rsa2,
}

/// Digest fed into the PKCS#1 v1.5 signature primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
}

impl SignType {
    /// Wire value of the `sign_type` field
    pub fn as_str(self) -> &'static str {
        match self {
            SignType::Rsa => "RSA",
            SignType::Rsa2 => "RSA2",
        }
    }

    /// Digest table: RSA2 is SHA-256, RSA keeps the legacy SHA-1
    pub fn digest(self) -> DigestAlgorithm {
        match self {
            SignType::Rsa => DigestAlgorithm::Sha1,
            SignType::Rsa2 => DigestAlgorithm::Sha256,
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RSA" => Ok(SignType::Rsa),
            "RSA2" => Ok(SignType::Rsa2),
            other => Err(format!("unsupported sign type: {other}")),
        }
    }
}

/// How the application proves its identity to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignKeyType {
    /// Plain public/private key pair registered with the gateway
    #[default]
    #[serde(alias = "key")]
    Key,
    /// Certificate mode; attaches certificate serial numbers to each request
    #[serde(alias = "cert")]
    Cert,
}

/// Character set of request parameters and response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    #[serde(rename = "UTF-8", alias = "utf-8", alias = "utf8", alias = "UTF8")]
    Utf8,
    #[serde(rename = "GBK", alias = "gbk")]
    Gbk,
    #[serde(rename = "GB2312", alias = "gb2312")]
    Gb2312,
    #[serde(rename = "GB18030", alias = "gb18030")]
    Gb18030,
}

impl Charset {
    /// Wire value used for the `charset` field and query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Gbk => "GBK",
            Charset::Gb2312 => "GB2312",
            Charset::Gb18030 => "GB18030",
        }
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            Charset::Utf8 => UTF_8,
            // WHATWG maps the GB2312 label onto GBK
            Charset::Gbk | Charset::Gb2312 => GBK,
            Charset::Gb18030 => GB18030,
        }
    }

    /// Convert UTF-8 text into this charset.
    ///
    /// Conversion is best-effort: a character the charset cannot represent
    /// keeps its original UTF-8 bytes while the rest is still converted.
    /// Fallback is per character, so encoding a joined string yields the
    /// same bytes as joining its encoded parts.
    pub fn encode(self, text: &str) -> Cow<'_, [u8]> {
        if self == Charset::Utf8 {
            return Cow::Borrowed(text.as_bytes());
        }

        let encoding = self.encoding();
        let (bytes, _, had_errors) = encoding.encode(text);
        if !had_errors {
            return bytes;
        }

        warn!(
            charset = self.as_str(),
            len = text.len(),
            "characters not representable in target charset, passing original bytes through"
        );
        let mut out = Vec::with_capacity(text.len());
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let utf8: &str = ch.encode_utf8(&mut buf);
            let (converted, _, unmappable) = encoding.encode(utf8);
            if unmappable {
                out.extend_from_slice(utf8.as_bytes());
            } else {
                out.extend_from_slice(&converted);
            }
        }
        Cow::Owned(out)
    }

    /// Decode bytes received in this charset into UTF-8 text
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        let (text, had_errors) = self.encoding().decode_without_bom_handling(bytes);
        if had_errors {
            warn!(charset = self.as_str(), "malformed sequences replaced while decoding");
        }
        text
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            "GBK" => Ok(Charset::Gbk),
            "GB2312" => Ok(Charset::Gb2312),
            "GB18030" => Ok(Charset::Gb18030),
            other => Err(format!("unsupported charset: {other}")),
        }
    }
}
