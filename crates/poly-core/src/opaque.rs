//! Pass-through storage for arbitrary JSON values.
//!
//! The payload is kept as raw JSON text and parsed only when it is encoded
//! again. An empty payload means the value is absent; an explicit `null` in
//! the input is folded into absence. YAML numbers with no JSON form (`.nan`,
//! `.inf`) are rejected rather than stored.

use std::borrow::Cow;

use schemars::{JsonSchema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{DecodeOptions, UnionCodec};
use crate::discriminant::Discriminant;
use crate::error::CodecError;

const NULL: &[u8] = b"null";

/// Any JSON value held as unparsed text, or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OpaqueValue {
    raw: Vec<u8>,
}

impl OpaqueValue {
    /// Wrap raw JSON text without validating it.
    ///
    /// A `null` token or blank input yields an absent value.
    #[must_use]
    pub fn from_raw(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim_ascii();
        if trimmed.is_empty() || trimmed == NULL {
            return Self::default();
        }
        Self { raw }
    }

    /// Store a parsed value as compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the value cannot be written as JSON
    /// (for example a map with non-string keys).
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> Result<Self, CodecError> {
        let raw = serde_json::to_vec(value)?;
        Ok(Self::from_raw(raw))
    }

    /// The stored bytes, empty when absent.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.raw
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.raw.is_empty()
    }

    /// Parse the payload. Absent values parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if the stored bytes are not valid JSON.
    pub fn to_value(&self) -> Result<Option<serde_json::Value>, CodecError> {
        if self.is_absent() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&self.raw)?))
    }

    /// Store a YAML value as JSON text. Null yields an absent value.
    fn from_yaml_value(value: &serde_yaml::Value) -> Result<Self, CodecError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        ensure_finite(value)?;
        Self::from_value(value)
    }

    fn lossy(source: CodecError) -> CodecError {
        tracing::warn!(error = %source, "opaque payload failed to re-parse; emitting null");
        CodecError::LossyEncode {
            output: NULL.to_vec(),
            source: Box::new(source),
        }
    }
}

impl UnionCodec for OpaqueValue {
    /// Store non-null input verbatim. Never fails.
    fn decode_json_with(data: &[u8], _: &DecodeOptions) -> Result<Self, CodecError> {
        Ok(Self::from_raw(data))
    }

    /// Parse the YAML document and keep it as JSON text.
    fn decode_yaml_with(data: &[u8], _: &DecodeOptions) -> Result<Self, CodecError> {
        if Discriminant::sniff(data) == Discriminant::Empty {
            return Ok(Self::default());
        }
        let value: serde_yaml::Value = serde_yaml::from_slice(data)?;
        Self::from_yaml_value(&value)
    }

    /// Re-parse and re-emit the payload, normalizing whitespace and key order.
    ///
    /// On a malformed payload the error is a [`CodecError::LossyEncode`]
    /// carrying the `null` that stands in for it.
    fn encode_json(&self) -> Result<Vec<u8>, CodecError> {
        if self.is_absent() {
            return Ok(NULL.to_vec());
        }
        let value: serde_json::Value =
            serde_json::from_slice(&self.raw).map_err(|e| Self::lossy(e.into()))?;
        Ok(serde_json::to_vec(&value)?)
    }

    fn encode_yaml(&self) -> Result<Vec<u8>, CodecError> {
        if self.is_absent() {
            return Ok(serde_yaml::to_string(&())?.into_bytes());
        }
        let value: serde_yaml::Value =
            serde_yaml::from_slice(&self.raw).map_err(|e| Self::lossy(e.into()))?;
        Ok(serde_yaml::to_string(&value)?.into_bytes())
    }
}

impl Serialize for OpaqueValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_value().map_err(serde::ser::Error::custom)? {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for OpaqueValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        Self::from_yaml_value(&value).map_err(serde::de::Error::custom)
    }
}

/// JSON has no NaN or infinity; serde_json would silently write them as `null`.
fn ensure_finite(value: &serde_yaml::Value) -> Result<(), CodecError> {
    match value {
        serde_yaml::Value::Number(n) if !n.is_finite() => Err(CodecError::Yaml(
            serde::de::Error::custom(format!("number {n} has no JSON representation")),
        )),
        serde_yaml::Value::Sequence(items) => items.iter().try_for_each(ensure_finite),
        serde_yaml::Value::Mapping(map) => map.iter().try_for_each(|(key, value)| {
            ensure_finite(key)?;
            ensure_finite(value)
        }),
        serde_yaml::Value::Tagged(tagged) => ensure_finite(&tagged.value),
        _ => Ok(()),
    }
}

impl JsonSchema for OpaqueValue {
    fn schema_name() -> Cow<'static, str> {
        "OpaqueValue".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> schemars::Schema {
        json_schema!(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn absent_encodes_null() {
        let value = OpaqueValue::default();
        assert_eq!(value.encode_json().unwrap(), b"null");
        assert_eq!(
            String::from_utf8(value.encode_yaml().unwrap()).unwrap().trim(),
            "null"
        );
    }

    #[test]
    fn null_decodes_to_absent_and_back() {
        let value = OpaqueValue::decode_json(b"null").unwrap();
        assert!(value.is_absent());
        assert_eq!(value.encode_json().unwrap(), b"null");

        assert!(OpaqueValue::decode_json(b"").unwrap().is_absent());
        assert!(OpaqueValue::decode_yaml(b"~\n").unwrap().is_absent());
        assert!(OpaqueValue::decode_yaml(b"").unwrap().is_absent());
    }

    #[test]
    fn decode_stores_bytes_verbatim() {
        let input = br#"{ "b": 1,   "a": [true] }"#;
        let value = OpaqueValue::decode_json(input).unwrap();
        assert_eq!(value.raw(), input);
    }

    #[test]
    fn decode_accepts_malformed_bytes() {
        let value = OpaqueValue::decode_json(b"{not json").unwrap();
        assert_eq!(value.raw(), b"{not json");
    }

    #[test]
    fn encode_normalizes_payload() {
        let value = OpaqueValue::decode_json(br#"{ "b": 1,   "a": [true] }"#).unwrap();
        assert_eq!(value.encode_json().unwrap(), br#"{"a":[true],"b":1}"#);
    }

    #[test]
    fn encode_malformed_payload_reports_and_emits_null() {
        let value = OpaqueValue::from_raw("{not json");
        let err = value.encode_json().unwrap_err();
        assert_eq!(err.fallback_output(), Some(&b"null"[..]));
        assert!(matches!(err, CodecError::LossyEncode { ref source, .. } if source.is_parse()));
    }

    #[test]
    fn yaml_encode_malformed_payload_reports_and_emits_null() {
        let value = OpaqueValue::from_raw(r#"{"a":1,"a":2}"#);
        let err = value.encode_yaml().unwrap_err();
        assert_eq!(err.fallback_output(), Some(&b"null"[..]));
        assert!(matches!(err, CodecError::LossyEncode { ref source, .. } if source.is_parse()));
    }

    #[test]
    fn yaml_non_finite_numbers_are_rejected() {
        let inputs: [&[u8]; 4] = [b".nan", b".inf\n", b"-.inf", b"limits: [1, .inf]\n"];
        for input in inputs {
            let err = OpaqueValue::decode_yaml(input).unwrap_err();
            assert!(err.is_parse(), "input {:?}: {err}", String::from_utf8_lossy(input));
        }
        assert_eq!(
            OpaqueValue::decode_yaml(b"1.5").unwrap().raw(),
            b"1.5"
        );
    }

    #[test]
    fn nested_yaml_non_finite_is_an_error() {
        #[derive(Debug, Deserialize)]
        struct Holder {
            #[allow(dead_code)]
            example: OpaqueValue,
        }

        let err = serde_yaml::from_str::<Holder>("example: .nan\n").unwrap_err();
        assert!(err.to_string().contains("no JSON representation"), "{err}");
    }

    #[test]
    fn yaml_encode_reemits_structure() {
        let value = OpaqueValue::from_value(&json!({"port": 8080})).unwrap();
        let yaml = String::from_utf8(value.encode_yaml().unwrap()).unwrap();
        assert_eq!(yaml, "port: 8080\n");
    }

    #[test]
    fn yaml_decode_stores_json_text() {
        let value = OpaqueValue::decode_yaml(b"hosts:\n  - a\n  - b\n").unwrap();
        assert_eq!(value.to_value().unwrap(), Some(json!({"hosts": ["a", "b"]})));
    }

    #[test]
    fn from_value_null_is_absent() {
        assert!(OpaqueValue::from_value(&json!(null)).unwrap().is_absent());
        assert!(OpaqueValue::from_raw("  null ").is_absent());
    }

    #[test]
    fn nested_serde_roundtrip() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            default: OpaqueValue,
        }

        let holder: Holder = serde_json::from_str(r#"{"default": {"x": [1, 2]}}"#).unwrap();
        assert_eq!(holder.default.raw(), br#"{"x":[1,2]}"#);
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"default":{"x":[1,2]}}"#);
    }
}
