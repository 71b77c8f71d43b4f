/*
[INPUT]:  ParameterSet and target charset
[OUTPUT]: Canonical `key=value&...` string and its charset bytes
[POS]:    HTTP layer - string-to-be-signed construction
[UPDATE]: When the gateway changes its signing content rules
*/

use std::borrow::Cow;

use crate::types::{Charset, ParameterSet, SIGN_FIELD};

/// Fields that take part in the signature, in ascending byte order of key.
///
/// Drops `sign`, empty values and `@`-prefixed file references.
fn signable(params: &ParameterSet) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
    params
        .iter()
        .filter(|(key, value)| {
            key.as_str() != SIGN_FIELD && !value.is_empty() && !value.is_file_reference()
        })
        .map(|(key, value)| (key.as_str(), value.render()))
}

/// Canonical string used as signing content
pub fn canonical_string(params: &ParameterSet) -> String {
    let mut content = String::new();
    for (i, (key, value)) in signable(params).enumerate() {
        if i > 0 {
            content.push('&');
        }
        content.push_str(key);
        content.push('=');
        content.push_str(&value);
    }
    content
}

/// Canonical content as bytes in `charset`.
///
/// Characters the charset cannot represent keep their UTF-8 bytes while the
/// rest are still converted, so this always equals the encoded
/// `canonical_string`.
pub fn canonical_bytes(params: &ParameterSet, charset: Charset) -> Vec<u8> {
    let content = canonical_string(params);
    charset.encode(&content).into_owned()
}
