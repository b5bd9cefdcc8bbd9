//! `items`-style union: one schema, or a list of schemas.

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

/// A single schema, or an ordered list of schemas.
///
/// A non-empty list wins on encode; an empty list falls back to the
/// single-schema form, which for an unset value is `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaOrArray<S = JsonSchemaProps> {
    /// Neither alternative was present in the input.
    #[default]
    Unset,
    Schema(Box<S>),
    Schemas(Vec<S>),
}

impl<S> SchemaOrArray<S> {
    #[must_use]
    pub fn schema(schema: S) -> Self {
        Self::Schema(Box::new(schema))
    }

    /// The single schema, if that alternative is active.
    #[must_use]
    pub fn as_schema(&self) -> Option<&S> {
        match self {
            Self::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    /// The schema list, empty unless that alternative is active.
    #[must_use]
    pub fn as_schemas(&self) -> &[S] {
        match self {
            Self::Schemas(schemas) => schemas,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl<S> From<Vec<S>> for SchemaOrArray<S> {
    fn from(schemas: Vec<S>) -> Self {
        Self::Schemas(schemas)
    }
}

impl<S: DeserializeOwned> ShapeTarget for SchemaOrArray<S> {
    const EXPECTING: &'static str = "schema or array of schemas";
    const SINGLE_BYTE_IS_EMPTY: bool = true;

    fn from_object<'de, M: MapAccess<'de>>(map: M) -> Result<Self, M::Error> {
        S::deserialize(MapAccessDeserializer::new(map)).map(Self::schema)
    }

    fn from_array<'de, A: SeqAccess<'de>>(seq: A) -> Result<Result<Self, CodecError>, A::Error> {
        Vec::<S>::deserialize(SeqAccessDeserializer::new(seq)).map(|schemas| Ok(Self::Schemas(schemas)))
    }

    fn from_literal(found: Discriminant, policy: ShapePolicy) -> Result<Self, CodecError> {
        match found {
            Discriminant::Empty => Ok(Self::Unset),
            _ => policy.resolve(found, Self::EXPECTING, Self::Unset),
        }
    }
}

impl<S: Serialize> Serialize for SchemaOrArray<S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        match self {
            Self::Schemas(schemas) if !schemas.is_empty() => schemas.serialize(serializer),
            Self::Schema(schema) => schema.serialize(serializer),
            Self::Schemas(_) | Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, S: DeserializeOwned> Deserialize<'de> for SchemaOrArray<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        shape::deserialize(deserializer)
    }
}

impl<S: Serialize + DeserializeOwned> UnionCodec for SchemaOrArray<S> {
    fn decode_json_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError> {
        shape::decode_json(data, options)
    }

    fn decode_yaml_with(data: &[u8], options: &DecodeOptions) -> Result<Self, CodecError> {
        shape::decode_yaml(data, options)
    }
}

impl<S: JsonSchema> JsonSchema for SchemaOrArray<S> {
    fn schema_name() -> Cow<'static, str> {
        format!("SchemaOrArray_for_{}", S::schema_name()).into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> schemars::Schema {
        let schema = generator.subschema_for::<S>();
        json_schema!({
            "anyOf": [
                schema,
                { "type": "array", "items": schema },
                { "type": "null" }
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn string_schema() -> JsonSchemaProps {
        JsonSchemaProps {
            type_: Some("string".into()),
            ..JsonSchemaProps::default()
        }
    }

    #[test]
    fn decode_object_selects_schema() {
        let decoded = SchemaOrArray::<JsonSchemaProps>::decode_json(br#"{"type":"string"}"#).unwrap();
        assert_eq!(decoded, SchemaOrArray::schema(string_schema()));
        assert!(decoded.as_schemas().is_empty());
    }

    #[test]
    fn decode_array_selects_schemas() {
        let decoded =
            SchemaOrArray::<JsonSchemaProps>::decode_json(br#"[{"type":"string"},{}]"#).unwrap();
        assert_eq!(
            decoded,
            SchemaOrArray::Schemas(vec![string_schema(), JsonSchemaProps::default()])
        );
        assert!(decoded.as_schema().is_none());
    }

    #[test]
    fn decode_unrecognized_is_unset_by_default() {
        let inputs: [&[u8]; 5] = [b"true", b"42", br#""x""#, b"null", b""];
        for input in inputs {
            let decoded = SchemaOrArray::<JsonSchemaProps>::decode_json(input).unwrap();
            assert!(decoded.is_unset(), "input {:?}", String::from_utf8_lossy(input));
        }
    }

    #[test]
    fn decode_unrecognized_rejected_when_strict() {
        let err = SchemaOrArray::<JsonSchemaProps>::decode_json_with(b"42", &DecodeOptions::strict())
            .unwrap_err();
        assert!(err.is_format());
        // Empty input is not a shape, so strict mode still accepts it.
        let empty =
            SchemaOrArray::<JsonSchemaProps>::decode_json_with(b"", &DecodeOptions::strict()).unwrap();
        assert!(empty.is_unset());
    }

    #[test]
    fn single_byte_input_has_no_discriminant() {
        let inputs: [&[u8]; 4] = [b"{", b"[", b"7", b" { \n"];
        for input in inputs {
            for options in [DecodeOptions::default(), DecodeOptions::strict()] {
                let decoded =
                    SchemaOrArray::<JsonSchemaProps>::decode_json_with(input, &options).unwrap();
                assert!(decoded.is_unset(), "input {:?}", String::from_utf8_lossy(input));
            }
        }
        assert!(SchemaOrArray::<JsonSchemaProps>::decode_yaml(b"[").unwrap().is_unset());
    }

    #[test]
    fn decode_malformed_object_is_parse_error() {
        let err = SchemaOrArray::<JsonSchemaProps>::decode_json(br#"{"type": }"#).unwrap_err();
        assert!(err.is_parse());
        let err = SchemaOrArray::<JsonSchemaProps>::decode_json(br#"{} trailing"#).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn encode_prefers_non_empty_list() {
        let value = SchemaOrArray::Schemas(vec![string_schema()]);
        assert_eq!(value.encode_json().unwrap(), br#"[{"type":"string"}]"#);
    }

    #[test]
    fn encode_empty_list_falls_back_to_null() {
        let value = SchemaOrArray::<JsonSchemaProps>::Schemas(Vec::new());
        assert_eq!(value.encode_json().unwrap(), b"null");
        assert_eq!(SchemaOrArray::<JsonSchemaProps>::Unset.encode_json().unwrap(), b"null");
    }

    #[test]
    fn yaml_block_sequence_decodes() {
        let yaml = b"- type: string\n- type: integer\n";
        let decoded = SchemaOrArray::<JsonSchemaProps>::decode_yaml(yaml).unwrap();
        assert_eq!(decoded.as_schemas().len(), 2);
        assert_eq!(decoded.as_schemas()[1].type_.as_deref(), Some("integer"));
    }
}
