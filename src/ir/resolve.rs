//! Type resolution from schema nodes to type descriptors.
//!
//! Component schemas resolve into an arena of named type definitions;
//! cross-references are by-name lookups into that arena, never inlined.
//! The walk is depth-first with a visiting set keyed by reference name —
//! a reference whose target is still being resolved is recorded as
//! [`TypeKind::Indirect`] instead of recursing, so resolution terminates
//! on any reference cycle. This is the single most important correctness
//! rule in the generator.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::document::{
    AdditionalProperties, Document, EnumValue, Schema, SchemaType,
};
use crate::error::{Diagnostic, GenerateError};

use super::types::{EnumLiteral, Field, GeneratedType, Primitive, TypeDef, TypeKind};
use super::utils::sanitize_ident;

/// Policy for collapsing `oneOf`/`anyOf`/`allOf` combinators that cannot be
/// mapped to a single concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnionPolicy {
    /// Pick the first branch and record a warning diagnostic; generation
    /// stays total over partial-failure documents.
    #[default]
    FirstBranch,
    /// Fail generation with [`GenerateError::UnsupportedSchema`].
    Reject,
}

/// Generator configuration. The core takes no file or environment input;
/// callers construct this directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratorConfig {
    /// How to collapse multi-branch schema combinators.
    pub union_policy: UnionPolicy,
}

/// Resolves schema nodes against a document, accumulating named type
/// definitions and diagnostics.
#[derive(Debug)]
pub struct Resolver<'a> {
    doc: &'a Document,
    config: GeneratorConfig,
    visiting: HashSet<String>,
    arena: IndexMap<String, TypeDef>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a parsed document.
    pub fn new(doc: &'a Document, config: GeneratorConfig) -> Self {
        Self {
            doc,
            config,
            visiting: HashSet::new(),
            arena: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Resolve every component schema into the arena, in document order.
    pub fn resolve_components(&mut self) -> Result<(), GenerateError> {
        let Some(schemas) = self.doc.components.as_ref().and_then(|c| c.schemas.as_ref()) else {
            return Ok(());
        };

        // Collect names first; definitions may pull each other in early via
        // references, so a name can already be present when its turn comes.
        let names: Vec<String> = schemas.keys().cloned().collect();
        for name in names {
            if self.arena.contains_key(&name) {
                continue;
            }
            let Some(schema) = self.doc.component_schema(&name) else {
                continue;
            };
            self.define(&name, schema)?;
        }
        Ok(())
    }

    /// Register a synthesized definition (parameter group, request body).
    /// A name collision here is a generation-time naming error.
    pub fn define_synthesized(&mut self, def: TypeDef) -> Result<(), GenerateError> {
        let name = def.name().to_string();
        if self.arena.contains_key(&name) {
            return Err(GenerateError::DuplicateOperation { name });
        }
        self.arena.insert(name, def);
        Ok(())
    }

    /// Record a warning diagnostic.
    pub fn push_warning(&mut self, message: String) {
        warn!("{message}");
        self.diagnostics.push(Diagnostic::warning(message));
    }

    /// Record a note diagnostic.
    pub fn push_note(&mut self, message: String) {
        self.diagnostics.push(Diagnostic::note(message));
    }

    /// Consume the resolver, yielding the type arena and the diagnostics
    /// accumulated along the way.
    pub fn finish(self) -> (IndexMap<String, TypeDef>, Vec<Diagnostic>) {
        (self.arena, self.diagnostics)
    }

    fn define(&mut self, name: &str, schema: &Schema) -> Result<(), GenerateError> {
        self.visiting.insert(name.to_string());
        let def = self.schema_to_def(name, schema);
        self.visiting.remove(name);
        self.arena.insert(name.to_string(), def?);
        Ok(())
    }

    fn schema_to_def(&mut self, name: &str, schema: &Schema) -> Result<TypeDef, GenerateError> {
        if let Some(values) = &schema.enum_values {
            return Ok(TypeDef::Enum {
                name: name.to_string(),
                values: values.iter().map(enum_literal).collect(),
            });
        }

        if schema.properties.is_some()
            && schema.additional_properties.is_none()
            && schema.ref_path.is_none()
        {
            let fields = self.object_fields(schema, name)?;
            return Ok(TypeDef::Struct(GeneratedType {
                name: name.to_string(),
                fields,
            }));
        }

        let ty = self.resolve_type(schema, name)?;
        Ok(TypeDef::Alias {
            name: name.to_string(),
            ty,
        })
    }

    /// Resolve a schema node to a type descriptor. `ctx` names the schema's
    /// position in the document for diagnostics.
    pub fn resolve_type(&mut self, schema: &Schema, ctx: &str) -> Result<TypeKind, GenerateError> {
        if let Some(ref_path) = &schema.ref_path {
            return self.resolve_ref(ref_path);
        }

        let nullable = schema.is_nullable();

        // anyOf/oneOf: the [T, null] encoding is ordinary nullability, not a
        // union needing the collapse policy.
        if let Some(branches) = schema.union_branches() {
            let base = match branches.as_slice() {
                [] => TypeKind::Unknown,
                [only] => self.resolve_type(only, ctx)?,
                [first, ..] => {
                    self.collapse_union(ctx, branches.len(), "oneOf/anyOf")?;
                    self.resolve_type(first, ctx)?
                }
            };
            return Ok(wrap_nullable(base, nullable));
        }

        if let Some(all_of) = &schema.all_of {
            let base = match all_of.as_slice() {
                [] => TypeKind::Unknown,
                [only] => self.resolve_type(only, ctx)?,
                [first, ..] => {
                    self.collapse_union(ctx, all_of.len(), "allOf")?;
                    self.resolve_type(first, ctx)?
                }
            };
            return Ok(wrap_nullable(base, nullable));
        }

        if let Some(values) = &schema.enum_values {
            let base = TypeKind::Enum(values.iter().map(enum_literal).collect());
            return Ok(wrap_nullable(base, nullable));
        }

        let base = match &schema.schema_type {
            Some(SchemaType::Single(t)) => self.named_type(t, schema, ctx)?,
            Some(SchemaType::Multiple(types)) => {
                let non_null: Vec<&String> = types.iter().filter(|t| *t != "null").collect();
                match non_null.as_slice() {
                    [] => TypeKind::Unknown,
                    [only] => self.named_type(only, schema, ctx)?,
                    [first, ..] => {
                        self.collapse_union(ctx, non_null.len(), "type array")?;
                        self.named_type(first, schema, ctx)?
                    }
                }
            }
            None => {
                if schema.additional_properties.is_some() {
                    self.map_type(schema, ctx)?
                } else if schema.properties.is_some() {
                    TypeKind::Object(self.object_fields(schema, ctx)?)
                } else {
                    TypeKind::Unknown
                }
            }
        };

        Ok(wrap_nullable(base, nullable))
    }

    fn named_type(
        &mut self,
        type_name: &str,
        schema: &Schema,
        ctx: &str,
    ) -> Result<TypeKind, GenerateError> {
        match type_name {
            "string" => Ok(TypeKind::Primitive(Primitive::String)),
            "integer" => Ok(TypeKind::Primitive(Primitive::Integer)),
            "number" => Ok(TypeKind::Primitive(Primitive::Number)),
            "boolean" => Ok(TypeKind::Primitive(Primitive::Boolean)),
            "null" => Ok(TypeKind::Unknown),
            "array" => {
                let item = match &schema.items {
                    Some(items) => self.resolve_type(items, ctx)?,
                    None => TypeKind::Unknown,
                };
                Ok(TypeKind::Array(Box::new(item)))
            }
            "object" => {
                let has_props = schema.properties.is_some();
                let has_additional = schema.additional_properties.is_some();
                match (has_props, has_additional) {
                    (true, true) => {
                        self.push_warning(format!(
                            "{ctx}: object declares both properties and additionalProperties; \
                             keeping the named properties"
                        ));
                        Ok(TypeKind::Object(self.object_fields(schema, ctx)?))
                    }
                    (true, false) => Ok(TypeKind::Object(self.object_fields(schema, ctx)?)),
                    (false, true) => self.map_type(schema, ctx),
                    (false, false) => Ok(TypeKind::Map(Box::new(TypeKind::Unknown))),
                }
            }
            other => {
                self.push_warning(format!("{ctx}: unknown schema type `{other}`"));
                Ok(TypeKind::Unknown)
            }
        }
    }

    fn map_type(&mut self, schema: &Schema, ctx: &str) -> Result<TypeKind, GenerateError> {
        match &schema.additional_properties {
            Some(AdditionalProperties::Bool(_)) | None => {
                Ok(TypeKind::Map(Box::new(TypeKind::Unknown)))
            }
            Some(AdditionalProperties::Schema(s)) => {
                let value = self.resolve_type(s, ctx)?;
                Ok(TypeKind::Map(Box::new(value)))
            }
        }
    }

    /// Resolve an object schema's properties into ordered fields. Optional
    /// means absent from the `required` set; nullability is carried on the
    /// field type itself.
    pub fn object_fields(&mut self, schema: &Schema, ctx: &str) -> Result<Vec<Field>, GenerateError> {
        let Some(properties) = &schema.properties else {
            return Ok(Vec::new());
        };
        let required: HashSet<&String> = schema
            .required
            .as_ref()
            .map(|r| r.iter().collect())
            .unwrap_or_default();

        let mut fields = Vec::with_capacity(properties.len());
        for (prop_name, prop_schema) in properties {
            let ty = self.resolve_type(prop_schema, &format!("{ctx}.{prop_name}"))?;
            fields.push(Field {
                name: sanitize_ident(prop_name),
                wire_name: prop_name.clone(),
                ty,
                optional: !required.contains(prop_name),
            });
        }
        Ok(fields)
    }

    fn resolve_ref(&mut self, ref_path: &str) -> Result<TypeKind, GenerateError> {
        let Some(name) = ref_path.strip_prefix("#/components/schemas/") else {
            // External and non-schema references are out of scope.
            return Err(GenerateError::MissingReference {
                reference: ref_path.to_string(),
            });
        };

        if self.visiting.contains(name) {
            return Ok(TypeKind::Indirect(name.to_string()));
        }
        if self.arena.contains_key(name) {
            return Ok(TypeKind::Named(name.to_string()));
        }

        let Some(target) = self.doc.component_schema(name) else {
            return Err(GenerateError::MissingReference {
                reference: ref_path.to_string(),
            });
        };

        self.define(name, target)?;
        Ok(TypeKind::Named(name.to_string()))
    }

    fn collapse_union(
        &mut self,
        ctx: &str,
        branches: usize,
        combinator: &str,
    ) -> Result<(), GenerateError> {
        let message =
            format!("{ctx}: {combinator} with {branches} branches collapsed to its first branch");
        match self.config.union_policy {
            UnionPolicy::FirstBranch => {
                self.push_warning(message);
                Ok(())
            }
            UnionPolicy::Reject => Err(GenerateError::UnsupportedSchema(message)),
        }
    }
}

fn wrap_nullable(ty: TypeKind, nullable: bool) -> TypeKind {
    if nullable && !matches!(ty, TypeKind::Nullable(_)) {
        TypeKind::Nullable(Box::new(ty))
    } else {
        ty
    }
}

fn enum_literal(v: &EnumValue) -> EnumLiteral {
    match v {
        EnumValue::String(s) => EnumLiteral::String(s.clone()),
        EnumValue::Integer(n) => EnumLiteral::Integer(*n),
        EnumValue::Float(f) => EnumLiteral::Number(*f),
        EnumValue::Bool(b) => EnumLiteral::Bool(*b),
        EnumValue::Null => EnumLiteral::Null,
    }
}
