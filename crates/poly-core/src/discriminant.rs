//! Shape classification for union input.
//!
//! ```text
//! ""        → Empty
//! {...}     → Object
//! [...]     → Array
//! true      → True
//! false     → False
//! anything  → Unrecognized
//! ```

use std::fmt;

/// The shape of a serialized value, as far as the union codecs care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Discriminant {
    /// No input at all (zero bytes, or a null/empty document on the serde path).
    Empty,
    /// Object / mapping start.
    Object,
    /// Array / sequence start.
    Array,
    /// The literal `true`.
    True,
    /// The literal `false`.
    False,
    /// Any other scalar: strings, numbers, `null` as raw bytes, garbage.
    Unrecognized,
}

impl Discriminant {
    /// Classify raw input by its leading byte.
    ///
    /// Leading and trailing ASCII whitespace is ignored. Only the leading byte is
    /// inspected for objects and arrays; the boolean literals must match exactly.
    #[must_use]
    pub fn sniff(data: &[u8]) -> Self {
        match data.trim_ascii() {
            [] => Self::Empty,
            [b'{', ..] => Self::Object,
            [b'[', ..] => Self::Array,
            b"true" => Self::True,
            b"false" => Self::False,
            _ => Self::Unrecognized,
        }
    }

    /// Map a decoded boolean onto its literal discriminant.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }

    /// Return the name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty input",
            Self::Object => "object",
            Self::Array => "array",
            Self::True => "true",
            Self::False => "false",
            Self::Unrecognized => "unrecognized value",
        }
    }
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
