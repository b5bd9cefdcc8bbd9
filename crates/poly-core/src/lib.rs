//! # poly-core
//!
//! Codec for JSON Schema fields that may legally hold more than one shape.
//!
//! This crate provides:
//! - `SchemaOrArray`: a schema, or an ordered list of schemas (`items`)
//! - `SchemaOrBool`: a schema, or a boolean (`additionalProperties`, `additionalItems`)
//! - `SchemaOrStringArray`: a schema, or a list of property names (`dependencies`)
//! - `OpaqueValue`: any JSON value kept as raw text, or absent (`default`, `example`, `enum`)
//! - `UnionCodec`: byte-level encode/decode for JSON and YAML
//! - `JsonSchemaProps`: the schema document type the unions compose into
//!
//! ## Decoding
//!
//! The alternative present in the input is inferred from its shape alone. Raw
//! bytes are classified by [`Discriminant::sniff`]; serde-driven decoding (YAML,
//! and union fields nested inside a document) maps the serde data model onto the
//! same [`Discriminant`], so both paths share one dispatch table per union.

pub mod codec;
pub mod discriminant;
pub mod error;
pub mod opaque;
pub mod or_array;
pub mod or_bool;
pub mod or_string_array;
pub mod props;
mod shape;

pub use codec::{DecodeOptions, Format, ShapePolicy, UnionCodec};
pub use discriminant::Discriminant;
pub use error::CodecError;
pub use opaque::OpaqueValue;
pub use or_array::SchemaOrArray;
pub use or_bool::SchemaOrBool;
pub use or_string_array::SchemaOrStringArray;
pub use props::{ExternalDocumentation, JsonSchemaProps};
