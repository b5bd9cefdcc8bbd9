//! `additionalProperties`-style union: a schema, or a boolean.

use std::borrow::Cow;

use schemars::{JsonSchema, SchemaGenerator, json_schema};
use serde::de::value::MapAccessDeserializer;
use serde::de::{DeserializeOwned, MapAccess, SeqAccess};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{DecodeOptions, ShapePolicy, UnionCodec};
use crate::discriminant::Discriminant;
use crate::error::CodecError;
use crate::props::JsonSchemaProps;
use crate::shape::{self, ShapeTarget};

/// A schema constraining the allowed values, or a blanket allow/deny.
///
/// ```text
/// Schema(s)     → allowed, constrained by s
/// Allows(true)  → anything allowed
/// Allows(false) → nothing allowed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOrBool<S = JsonSchemaProps> {
    Schema(Box<S>),
    Allows(bool),
}

impl<S> Default for SchemaOrBool<S> {
    fn default() -> Self {
        Self::Allows(false)
    }
}

impl<S> SchemaOrBool<S> {
    #[must_use]
    pub fn schema(schema: S) -> Self {
        Self::Schema(Box::new(schema))
    }

    /// Whether values are allowed at all. A schema implies `true`.
    #[must_use]
    pub const fn allows(&self) -> bool {
        match self {
            Self::Schema(_) => true,
            Self::Allows(allows) => *allows,
        }
    }

    #[must_use]
    pub fn as_schema(&self) -> Option<&S> {
        match self {
            Self::Schema(schema) => Some(schema),
            Self::Allows(_) => None,
        }
    }
}

impl<S> From<bool> for SchemaOrBool<S> {
    fn from(allows: bool) -> Self {
        Self::Allows(allows)
    }
}

impl<S: DeserializeOwned> ShapeTarget for SchemaOrBool<S> {
    const EXPECTING: &'static str = "boolean or schema";

    fn from_object<'de, M: MapAccess<'de>>(map: M) -> Result<Self, M::Error> {
        S::deserialize(MapAccessDeserializer::new(map)).map(Self::schema)
    }

    fn from_array<'de, A: SeqAccess<'de>>(seq: A) -> Result<Result<Self, CodecError>, A::Error> {
        shape::skip_seq(seq)?;
        Ok(Self::from_literal(Discriminant::Array, ShapePolicy::Reject))
    }

    // Unexpected shapes are always an error here, whatever the policy.
    fn from_literal(found: Discriminant, _: ShapePolicy) -> Result<Self, CodecError> {
        match found {
            Discriminant::Empty | Discriminant::False => Ok(Self::Allows(false)),
            Discriminant::True => Ok(Self::Allows(true)),
            Discriminant::Object | Discriminant::Array | Discriminant::Unrecognized => {
                Err(CodecError::Format {
                    expected: Self::EXPECTING,
                    found,
                })
            }
        }
    }
}

impl<S: Serialize> Serialize for SchemaOrBool<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        match self {
            Self::Schema(schema) => schema.serialize(serializer),
            Self::Allows(allows) => serializer.serialize_bool(*allows),
        }
    }
}

impl<'de, S: DeserializeOwned> Deserialize<'de> for SchemaOrBool<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        shape::deserialize(deserializer)
    }
}

impl<S: Serialize + DeserializeOwned> UnionCodec for SchemaOrBool<S> {
    fn decode_json_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError> {
        shape::decode_json(data, options)
    }

    fn decode_yaml_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError> {
        shape::decode_yaml(data, options)
    }
}

impl<S: JsonSchema> JsonSchema for SchemaOrBool<S> {
    fn schema_name() -> Cow<'static, str> {
        format!("SchemaOrBool_for_{}", S::schema_name()).into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> schemars::Schema {
        let schema = generator.subschema_for::<S>();
        json_schema!({
            "anyOf": [schema, { "type": "boolean" }]
        })
    }
}
