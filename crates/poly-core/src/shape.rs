//! Shared serde machinery for shape-dispatched unions.
//!
//! Each union implements [`ShapeTarget`] once; the same table then serves the
//! byte-level decoders and the `Deserialize` impls used for nested fields.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::codec::{DecodeOptions, ShapePolicy};
use crate::discriminant::Discriminant;
use crate::error::CodecError;

/// Per-union dispatch table: one entry per [`Discriminant`].
pub(crate) trait ShapeTarget: Sized {
    /// Accepted alternatives, for diagnostics.
    const EXPECTING: &'static str;

    /// Treat a lone byte of input as carrying no discriminant at all.
    const SINGLE_BYTE_IS_EMPTY: bool = false;

    /// Decode the object alternative.
    fn from_object<'de, M: MapAccess<'de>>(map: M) -> Result<Self, M::Error>;

    /// Decode the array alternative, or report that the union has none.
    fn from_array<'de, A: SeqAccess<'de>>(seq: A) -> Result<Result<Self, CodecError>, A::Error>;

    /// Resolve every scalar shape (and empty input).
    fn from_literal(found: Discriminant, policy: ShapePolicy) -> Result<Self, CodecError>;
}

/// Visitor that classifies the serde data model and defers to a [`ShapeTarget`].
///
/// Parse failures surface as the deserializer's error; shape rejections are
/// returned in the inner `Result` so callers can keep them as
/// [`CodecError::Format`].
pub(crate) struct ShapeVisitor<T> {
    policy: ShapePolicy,
    /// How a null value is classified.
    null: Discriminant,
    marker: PhantomData<fn() -> T>,
}

impl<T> ShapeVisitor<T> {
    /// Visitor for a field inside a document, where null means unset.
    pub(crate) const fn nested(policy: ShapePolicy) -> Self {
        Self {
            policy,
            null: Discriminant::Empty,
            marker: PhantomData,
        }
    }

    /// Visitor for a whole input. A parsed `null` is a value, not empty input,
    /// so it classifies the same way the byte sniffer does.
    pub(crate) const fn top_level(policy: ShapePolicy) -> Self {
        Self {
            policy,
            null: Discriminant::Unrecognized,
            marker: PhantomData,
        }
    }
}

impl<T: ShapeTarget> ShapeVisitor<T> {
    fn literal(self, found: Discriminant) -> Result<T, CodecError> {
        tracing::trace!(%found, union = T::EXPECTING, "dispatching literal shape");
        T::from_literal(found, self.policy)
    }
}

impl<'de, T: ShapeTarget> Visitor<'de> for ShapeVisitor<T> {
    type Value = Result<T, CodecError>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(T::EXPECTING)
    }

    fn visit_map<M: MapAccess<'de>>(self, map: M) -> Result<Self::Value, M::Error> {
        T::from_object(map).map(Ok)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        T::from_array(seq)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(self.literal(Discriminant::from_bool(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        let null = self.null;
        Ok(self.literal(null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        let null = self.null;
        Ok(self.literal(null))
    }

    fn visit_some<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(self.literal(Discriminant::Unrecognized))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(self.literal(Discriminant::Unrecognized))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(self.literal(Discriminant::Unrecognized))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(self.literal(Discriminant::Unrecognized))
    }

    fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<Self::Value, E> {
        Ok(self.literal(Discriminant::Unrecognized))
    }
}

impl<'de, T: ShapeTarget> DeserializeSeed<'de> for ShapeVisitor<T> {
    type Value = Result<T, CodecError>;

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

/// `Deserialize` body for a union nested inside a document.
pub(crate) fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: de::Deserializer<'de>,
    T: ShapeTarget,
{
    ShapeVisitor::<T>::nested(ShapePolicy::default())
        .deserialize(deserializer)?
        .map_err(de::Error::custom)
}

/// Classify raw input for `T`, honouring [`ShapeTarget::SINGLE_BYTE_IS_EMPTY`].
fn sniff<T: ShapeTarget>(data: &[u8]) -> Discriminant {
    if T::SINGLE_BYTE_IS_EMPTY && data.trim_ascii().len() == 1 {
        return Discriminant::Empty;
    }
    Discriminant::sniff(data)
}

/// Sniff raw JSON, then parse only the structural alternatives.
pub(crate) fn decode_json<T: ShapeTarget>(
    data: &[u8],
    options: &DecodeOptions,
) -> Result<T, CodecError> {
    match sniff::<T>(data) {
        Discriminant::Object | Discriminant::Array => {
            let mut deserializer = serde_json::Deserializer::from_slice(data);
            let decoded =
                ShapeVisitor::<T>::top_level(options.unknown_shape).deserialize(&mut deserializer)?;
            deserializer.end()?;
            decoded
        }
        found => T::from_literal(found, options.unknown_shape),
    }
}

/// Decode a single YAML document through the shape visitor.
///
/// Only blank input is empty; a document that parses to null is an
/// unrecognized scalar, as it is for JSON.
pub(crate) fn decode_yaml<T: ShapeTarget>(
    data: &[u8],
    options: &DecodeOptions,
) -> Result<T, CodecError> {
    if sniff::<T>(data) == Discriminant::Empty {
        return T::from_literal(Discriminant::Empty, options.unknown_shape);
    }
    let deserializer = serde_yaml::Deserializer::from_slice(data);
    ShapeVisitor::<T>::top_level(options.unknown_shape).deserialize(deserializer)?
}

/// Consume the rest of a sequence the union has no alternative for.
pub(crate) fn skip_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}
