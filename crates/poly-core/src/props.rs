//! The schema document the union fields compose into.
//!
//! Field names follow the JSON Schema draft-04 subset used by OpenAPI v3 and
//! Kubernetes-style structural schemas. Every field is optional and omitted on
//! encode when unset. Content is carried, not validated.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::opaque::OpaqueValue;
use crate::or_array::SchemaOrArray;
use crate::or_bool::SchemaOrBool;
use crate::or_string_array::SchemaOrStringArray;

/// A (recursive) JSON Schema object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::use_self)]
pub struct JsonSchemaProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Default value, kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<OpaqueValue>,

    /// Numeric bounds keep the written form, so `65535` stays an integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_maximum: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_minimum: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_: Vec<OpaqueValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaOrArray<JsonSchemaProps>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<JsonSchemaProps>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<JsonSchemaProps>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<JsonSchemaProps>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<JsonSchemaProps>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchemaProps>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<SchemaOrBool<JsonSchemaProps>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pattern_properties: BTreeMap<String, JsonSchemaProps>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, SchemaOrStringArray<JsonSchemaProps>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<SchemaOrBool<JsonSchemaProps>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, JsonSchemaProps>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,

    /// Example value, kept as raw JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<OpaqueValue>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl JsonSchemaProps {
    /// A schema with only `type` set.
    #[must_use]
    pub fn of_type(type_: impl Into<String>) -> Self {
        Self {
            type_: Some(type_.into()),
            ..Self::default()
        }
    }
}

/// Pointer to documentation outside the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExternalDocumentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
