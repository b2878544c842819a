//! OpenAPI document structs for serde deserialization.
//!
//! This module defines the subset of the OpenAPI 3.x document shape the
//! generator consumes. The core never performs file I/O — it receives an
//! already-parsed JSON string (or a [`Document`] built by the caller) and
//! everything downstream is a pure transformation.
//!
//! Maps preserve source-document order (`IndexMap`) because field ordering in
//! the generated types follows the order things appear in the document.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::GenerateError;

/// Root OpenAPI document.
#[derive(Debug, Deserialize)]
pub struct Document {
    /// Declared OpenAPI version (e.g. "3.1.0"). Not validated.
    pub openapi: Option<String>,
    /// Path template → path item.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable components.
    pub components: Option<Components>,
}

/// Components section containing reusable schemas.
#[derive(Debug, Deserialize)]
pub struct Components {
    /// Named schemas referenced via `#/components/schemas/{name}`.
    pub schemas: Option<IndexMap<String, Schema>>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Deserialize)]
pub struct PathItem {
    /// GET operation.
    pub get: Option<Operation>,
    /// POST operation.
    pub post: Option<Operation>,
    /// PUT operation.
    pub put: Option<Operation>,
    /// PATCH operation.
    pub patch: Option<Operation>,
    /// DELETE operation.
    pub delete: Option<Operation>,
    /// HEAD operation.
    pub head: Option<Operation>,
    /// OPTIONS operation.
    pub options: Option<Operation>,
    /// Path-level parameters shared by all operations on this path.
    pub parameters: Option<Vec<Parameter>>,
}

/// An API operation (endpoint).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique operation identifier; becomes the generated method name.
    pub operation_id: Option<String>,
    /// Short summary, carried through for documentation emission.
    pub summary: Option<String>,
    /// Operation-level parameters. Override path-level ones of the same name.
    pub parameters: Option<Vec<Parameter>>,
    /// Request body definition.
    pub request_body: Option<RequestBody>,
    /// Status code (or range, or "default") → response definition.
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// A parameter (path, query, header, or cookie).
#[derive(Debug, Deserialize)]
pub struct Parameter {
    /// Wire name as it appears in the request.
    pub name: String,
    /// Parameter location: `path`, `query`, `header`, or `cookie`.
    #[serde(rename = "in")]
    pub location: String,
    /// Whether the parameter must be supplied. Path parameters are always
    /// required regardless of this flag.
    #[serde(default)]
    pub required: bool,
    /// Serialization style (e.g. `form`, `simple`).
    pub style: Option<String>,
    /// Whether array values serialize as repeated keys (true) or a single
    /// comma-joined value (false). Defaults per style.
    pub explode: Option<bool>,
    /// Value schema.
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Deserialize)]
pub struct RequestBody {
    /// Whether a body must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Content type → media type entry.
    pub content: Option<IndexMap<String, MediaType>>,
}

/// A response definition.
#[derive(Debug, Deserialize)]
pub struct Response {
    /// Human-readable description.
    pub description: Option<String>,
    /// Content type → media type entry. Absent for bodiless responses (204).
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Media type content (e.g. `application/json`).
#[derive(Debug, Deserialize)]
pub struct MediaType {
    /// Body schema for this content type.
    pub schema: Option<Schema>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema. A list encodes 3.1-style nullability.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema (`#/components/schemas/Name`).
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types, in document order.
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Enum values.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Union type (any of these schemas). Often encodes nullability.
    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<Schema>>,

    /// Union type (exactly one of these schemas).
    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<Schema>>,

    /// Intersection type (all of these schemas combined).
    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<Schema>>,

    /// Additional properties for map-like object types.
    pub additional_properties: Option<AdditionalProperties>,

    /// Format hint (e.g. `date-time`, `uuid`). Parsed, not mapped.
    pub format: Option<String>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,

    /// Default value for the schema.
    pub default: Option<serde_json::Value>,
}

/// Enum value can be a string, integer, float, boolean, or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    /// String member.
    String(String),
    /// Integer member.
    Integer(i64),
    /// Floating-point member.
    Float(f64),
    /// Boolean member.
    Bool(bool),
    /// Null member (usually paired with `nullable`).
    Null,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    /// A single type name.
    Single(String),
    /// Multiple type names, e.g. `["string", "null"]`.
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` allows arbitrary values, `false` forbids extra keys.
    Bool(bool),
    /// Extra values must conform to this schema.
    Schema(Box<Schema>),
}

impl Document {
    /// Parse an OpenAPI document from a JSON string.
    ///
    /// Structural failures (missing required fields, wrong shapes) are
    /// [`GenerateError::MalformedSpec`] — fatal, nothing is generated.
    pub fn from_json(json: &str) -> Result<Self, GenerateError> {
        serde_json::from_str(json).map_err(|e| GenerateError::MalformedSpec(e.to_string()))
    }

    /// Look up a component schema by bare name.
    pub fn component_schema(&self, name: &str) -> Option<&Schema> {
        self.components
            .as_ref()
            .and_then(|c| c.schemas.as_ref())
            .and_then(|s| s.get(name))
    }
}

impl Schema {
    /// Check if this schema is nullable under any of the three encodings:
    /// the 3.0 `nullable` flag, a 3.1 type array containing `"null"`, or an
    /// `anyOf` with a null branch.
    pub fn is_nullable(&self) -> bool {
        if self.nullable == Some(true) {
            return true;
        }

        if let Some(any_of) = &self.any_of {
            for schema in any_of {
                if let Some(SchemaType::Single(t)) = &schema.schema_type
                    && t == "null"
                {
                    return true;
                }
            }
        }

        if let Some(SchemaType::Multiple(types)) = &self.schema_type
            && types.iter().any(|t| t == "null")
        {
            return true;
        }

        false
    }

    /// Get the non-null branches from an `anyOf`/`oneOf` union, if this
    /// schema is one.
    pub fn union_branches(&self) -> Option<Vec<&Schema>> {
        let branches = self.any_of.as_ref().or(self.one_of.as_ref())?;
        let non_null: Vec<&Schema> = branches
            .iter()
            .filter(|s| {
                !matches!(&s.schema_type, Some(SchemaType::Single(t)) if t == "null")
            })
            .collect();
        Some(non_null)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc = Document::from_json(r#"{"openapi": "3.1.0", "paths": {}}"#).unwrap();
        assert_eq!(doc.openapi.as_deref(), Some("3.1.0"));
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn test_parse_failure_is_malformed_spec() {
        let err = Document::from_json("{not json").unwrap_err();
        assert!(matches!(err, GenerateError::MalformedSpec(_)));
    }

    #[test]
    fn test_nullable_30_flag() {
        let schema: Schema =
            serde_json::from_str(r#"{"type": "string", "nullable": true}"#).unwrap();
        assert!(schema.is_nullable());
    }

    #[test]
    fn test_nullable_31_type_array() {
        let schema: Schema = serde_json::from_str(r#"{"type": ["string", "null"]}"#).unwrap();
        assert!(schema.is_nullable());
    }

    #[test]
    fn test_nullable_any_of() {
        let schema: Schema =
            serde_json::from_str(r#"{"anyOf": [{"type": "integer"}, {"type": "null"}]}"#).unwrap();
        assert!(schema.is_nullable());
        let branches = schema.union_branches().unwrap();
        assert_eq!(branches.len(), 1);
    }

    #[test]
    fn test_properties_preserve_document_order() {
        let schema: Schema = serde_json::from_str(
            r#"{"type": "object", "properties": {"zulu": {"type": "string"}, "alpha": {"type": "integer"}, "mike": {"type": "boolean"}}}"#,
        )
        .unwrap();
        let names: Vec<&String> = schema.properties.as_ref().unwrap().keys().collect();
        assert_eq!(names, ["zulu", "alpha", "mike"]);
    }
}
