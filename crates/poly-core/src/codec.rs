//! Byte-level encode/decode surface shared by all union fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::discriminant::Discriminant;
use crate::error::CodecError;

/// The two serialization formats a union field can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when the input shape matches none of a union's alternatives.
///
/// `SchemaOrBool` ignores this setting: an unexpected shape is always a
/// [`CodecError::Format`] there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePolicy {
    /// Leave the union unset and carry on.
    #[default]
    Ignore,
    /// Fail with [`CodecError::Format`].
    Reject,
}

impl ShapePolicy {
    /// Apply the policy to a shape the union has no alternative for.
    pub(crate) fn resolve<T>(
        self,
        found: Discriminant,
        expected: &'static str,
        unset: T,
    ) -> Result<T, CodecError> {
        match self {
            Self::Ignore => {
                tracing::debug!(%found, expected, "unrecognized shape ignored; union left unset");
                Ok(unset)
            }
            Self::Reject => Err(CodecError::Format { expected, found }),
        }
    }
}

/// Options for byte-level decoding.
///
/// Only the top-level value is governed by these options; union fields nested
/// inside a document are decoded through serde with the default options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub unknown_shape: ShapePolicy,
}

impl DecodeOptions {
    /// Options that reject unrecognized shapes instead of ignoring them.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            unknown_shape: ShapePolicy::Reject,
        }
    }
}

/// Encode and decode a union field as JSON or YAML bytes.
///
/// Encoding goes through the type's `Serialize` impl by default. Decoding
/// classifies the input with [`Discriminant`] and dispatches to the matching
/// alternative.
pub trait UnionCodec: Serialize + Sized {
    /// Decode JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] for malformed input and
    /// [`CodecError::Format`] for a shape the union does not accept.
    fn decode_json_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError>;

    /// Decode a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Yaml`] for malformed input and
    /// [`CodecError::Format`] for a shape the union does not accept.
    fn decode_yaml_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError>;

    /// Decode JSON bytes with default options.
    ///
    /// # Errors
    ///
    /// See [`UnionCodec::decode_json_with`].
    fn decode_json(data: &[u8]) -> Result<Self, CodecError> {
        Self::decode_json_with(data, &DecodeOptions::default())
    }

    /// Decode a YAML document with default options.
    ///
    /// # Errors
    ///
    /// See [`UnionCodec::decode_yaml_with`].
    fn decode_yaml(data: &[u8]) -> Result<Self, CodecError> {
        Self::decode_yaml_with(data, &DecodeOptions::default())
    }

    /// Encode as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Json`] if a nested value fails to serialize.
    fn encode_json(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Encode as a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Yaml`] if a nested value fails to serialize.
    fn encode_yaml(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_yaml::to_string(self)?.into_bytes())
    }

    /// Encode in the given format.
    ///
    /// # Errors
    ///
    /// See [`UnionCodec::encode_json`] and [`UnionCodec::encode_yaml`].
    fn encode(&self, format: Format) -> Result<Vec<u8>, CodecError> {
        match format {
            Format::Json => self.encode_json(),
            Format::Yaml => self.encode_yaml(),
        }
    }

    /// Decode from the given format with default options.
    ///
    /// # Errors
    ///
    /// See [`UnionCodec::decode_json_with`] and [`UnionCodec::decode_yaml_with`].
    fn decode(format: Format, data: &[u8]) -> Result<Self, CodecError> {
        match format {
            Format::Json => Self::decode_json(data),
            Format::Yaml => Self::decode_yaml(data),
        }
    }
}
