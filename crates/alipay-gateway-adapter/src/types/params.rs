/*
[INPUT]:  Caller-supplied request fields (strings, JSON values, nulls)
[OUTPUT]: Byte-ordered ParameterSet with emptiness rules for signing
[POS]:    Data layer - request parameter model consumed by the canonicalizer
[UPDATE]: When parameter value kinds or emptiness semantics change
*/

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

/// Characters stripped before deciding whether a string value is empty.
///
/// Matches the gateway's reference trim set, which differs from
/// `str::trim` (NUL and vertical tab count, Unicode spaces do not).
const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Single request parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Text(String),
    Json(serde_json::Value),
}

impl ParamValue {
    /// Whether the value is left out of the signature and the form body.
    ///
    /// Only nulls and whitespace-only strings are empty; numbers, booleans
    /// and nested structures never are. A raw JSON null or string is judged
    /// like its `Null`/`Text` counterpart.
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Null | ParamValue::Json(serde_json::Value::Null) => true,
            ParamValue::Text(text) | ParamValue::Json(serde_json::Value::String(text)) => {
                text.trim_matches(TRIM_CHARS).is_empty()
            }
            ParamValue::Json(_) => false,
        }
    }

    /// Text form used in the canonical string and the form body
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            ParamValue::Null | ParamValue::Json(serde_json::Value::Null) => Cow::Borrowed(""),
            ParamValue::Text(text) | ParamValue::Json(serde_json::Value::String(text)) => {
                Cow::Borrowed(text)
            }
            ParamValue::Json(value) => Cow::Owned(value.to_string()),
        }
    }

    /// `@`-prefixed values reference local files and are never signed
    pub fn is_file_reference(&self) -> bool {
        self.render().starts_with('@')
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) | ParamValue::Json(serde_json::Value::String(text)) => {
                Some(text)
            }
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ParamValue::Null,
            serde_json::Value::String(text) => ParamValue::Text(text),
            other => ParamValue::Json(other),
        }
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Request parameters keyed by field name, iterated in byte order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    entries: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value for the key
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Text of a string-valued field
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Overlay `other` onto `self`; fields present in both take `other`'s value
    pub fn merge(&mut self, other: ParameterSet) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending byte order of their keys
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParameterSet::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(ParamValue::Null, true)]
    #[case(ParamValue::from(""), true)]
    #[case(ParamValue::from("  \t\r\n"), true)]
    #[case(ParamValue::from("\0\x0B"), true)]
    #[case(ParamValue::from("\u{3000}"), false)]
    #[case(ParamValue::from(" x "), false)]
    #[case(ParamValue::from(json!(0)), false)]
    #[case(ParamValue::from(json!(false)), false)]
    #[case(ParamValue::from(json!([])), false)]
    #[case(ParamValue::Json(json!(null)), true)]
    #[case(ParamValue::Json(json!(" \t")), true)]
    #[case(ParamValue::Json(json!("x")), false)]
    fn test_emptiness(#[case] value: ParamValue, #[case] expected: bool) {
        assert_eq!(value.is_empty(), expected);
    }

    #[test]
    fn test_json_conversion() {
        assert_eq!(ParamValue::from(json!(null)), ParamValue::Null);
        assert_eq!(ParamValue::from(json!("abc")), ParamValue::from("abc"));
        assert_eq!(ParamValue::from(json!({"a": 1})).render(), r#"{"a":1}"#);
        assert_eq!(ParamValue::from(None::<&str>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some("v")), ParamValue::from("v"));
    }

    #[test]
    fn test_file_reference() {
        assert!(ParamValue::from("@/tmp/img.png").is_file_reference());
        assert!(!ParamValue::from("a@b").is_file_reference());
        assert!(ParamValue::Json(json!("@/tmp/img.png")).is_file_reference());
        assert_eq!(ParamValue::Json(json!("@x")).render(), "@x");
    }

    #[test]
    fn test_insert_replaces_and_iterates_sorted() {
        let mut params = ParameterSet::new();
        params.insert("b", "2");
        params.insert("a", "1");
        params.insert("Z", "0");
        let previous = params.insert("a", "one");

        assert_eq!(previous, Some(ParamValue::from("1")));
        assert_eq!(params.len(), 3);
        let keys: Vec<&str> = params.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Z", "a", "b"]);
    }

    #[test]
    fn test_merge_overrides() {
        let mut base: ParameterSet = [("format", "JSON"), ("version", "1.0")]
            .into_iter()
            .collect();
        base.merge(ParameterSet::new().with("version", "2.0").with("extra", "x"));

        assert_eq!(base.get_text("format"), Some("JSON"));
        assert_eq!(base.get_text("version"), Some("2.0"));
        assert_eq!(base.get_text("extra"), Some("x"));
    }
}
