//! Codec error types.

use thiserror::Error;

use crate::discriminant::Discriminant;

/// Errors raised while encoding or decoding a union field.
#[derive(Debug, Error)]
#[allow(clippy::use_self)]
pub enum CodecError {
    /// Input was not well-formed JSON, or did not match the selected alternative.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input was not well-formed YAML, or did not match the selected alternative.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The decoded shape is none of the alternatives the union accepts.
    #[error("{expected} expected, found {found}")]
    Format {
        /// Human-readable list of accepted alternatives.
        expected: &'static str,
        /// Shape that was actually present.
        found: Discriminant,
    },

    /// An opaque payload could not be re-parsed on encode.
    ///
    /// `output` holds the `null` token that was emitted in place of the payload,
    /// so callers that tolerate the loss can still write a well-formed document.
    #[error("opaque payload could not be re-encoded, emitted null: {source}")]
    LossyEncode {
        /// Bytes written in place of the payload.
        output: Vec<u8>,
        /// Why the payload did not parse.
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Whether the error comes from malformed input rather than an unexpected shape.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Yaml(_))
    }

    /// Whether the error reports a shape outside the accepted alternatives.
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Fallback bytes emitted alongside the error, if any.
    #[must_use]
    pub fn fallback_output(&self) -> Option<&[u8]> {
        match self {
            Self::LossyEncode { output, .. } => Some(output),
            _ => None,
        }
    }
}
