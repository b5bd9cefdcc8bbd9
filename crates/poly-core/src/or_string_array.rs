//! `dependencies`-style union: a schema, or a list of property names.

use std::borrow::Cow;

use schemars::{JsonSchema, SchemaGenerator, json_schema};
use serde::de::value::{MapAccessDeserializer, SeqAccessDeserializer};
use serde::de::{DeserializeOwned, MapAccess, SeqAccess};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{DecodeOptions, ShapePolicy, UnionCodec};
use crate::discriminant::Discriminant;
use crate::error::CodecError;
use crate::props::JsonSchemaProps;
use crate::shape::{self, ShapeTarget};

/// A schema, or an ordered list of strings.
///
/// Encode order: non-empty list, then schema, then `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaOrStringArray<S = JsonSchemaProps> {
    #[default]
    Unset,
    Schema(Box<S>),
    Property(Vec<String>),
}

impl<S> SchemaOrStringArray<S> {
    #[must_use]
    pub fn schema(schema: S) -> Self {
        Self::Schema(Box::new(schema))
    }

    #[must_use]
    pub fn as_schema(&self) -> Option<&S> {
        match self {
            Self::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    /// The property list, empty unless that alternative is active.
    #[must_use]
    pub fn as_property(&self) -> &[String] {
        match self {
            Self::Property(property) => property,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl<S, T: Into<String>> FromIterator<T> for SchemaOrStringArray<S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Property(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: DeserializeOwned> ShapeTarget for SchemaOrStringArray<S> {
    const EXPECTING: &'static str = "schema or array of strings";
    const SINGLE_BYTE_IS_EMPTY: bool = true;

    fn from_object<'de, M: MapAccess<'de>>(map: M) -> Result<Self, M::Error> {
        S::deserialize(MapAccessDeserializer::new(map)).map(Self::schema)
    }

    fn from_array<'de, A: SeqAccess<'de>>(seq: A) -> Result<Result<Self, CodecError>, A::Error> {
        Vec::<String>::deserialize(SeqAccessDeserializer::new(seq))
            .map(|property| Ok(Self::Property(property)))
    }

    fn from_literal(found: Discriminant, policy: ShapePolicy) -> Result<Self, CodecError> {
        match found {
            Discriminant::Empty => Ok(Self::Unset),
            _ => policy.resolve(found, Self::EXPECTING, Self::Unset),
        }
    }
}

impl<S: Serialize> Serialize for SchemaOrStringArray<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        match self {
            Self::Property(property) if !property.is_empty() => property.serialize(serializer),
            Self::Schema(schema) => schema.serialize(serializer),
            Self::Property(_) | Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, S: DeserializeOwned> Deserialize<'de> for SchemaOrStringArray<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        shape::deserialize(deserializer)
    }
}

impl<S: Serialize + DeserializeOwned> UnionCodec for SchemaOrStringArray<S> {
    fn decode_json_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError> {
        shape::decode_json(data, options)
    }

    fn decode_yaml_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError> {
        shape::decode_yaml(data, options)
    }
}

impl<S: JsonSchema> JsonSchema for SchemaOrStringArray<S> {
    fn schema_name() -> Cow<'static, str> {
        format!("SchemaOrStringArray_for_{}", S::schema_name()).into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> schemars::Schema {
        let schema = generator.subschema_for::<S>();
        json_schema!({
            "anyOf": [
                { "type": "array", "items": { "type": "string" } },
                schema,
                { "type": "null" }
            ]
        })
    }
}
