//! Type descriptor IR for generated bindings.
//!
//! This module defines the language-neutral type system the generator emits:
//! - [`TypeKind`]: type descriptors (primitives, arrays, maps, references)
//! - [`GeneratedType`]: a named type with ordered fields
//! - [`TypeDef`]: an arena entry (struct, alias, or enum)
//!
//! Schema reference cycles are a graph, not a tree, so cross-references are
//! always by name into the arena — never inlined. A reference discovered
//! while its target is still being resolved becomes [`TypeKind::Indirect`],
//! which target languages render as an owned/boxed indirection.

/// Scalar kinds mapped directly from JSON Schema primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `type: string`
    String,
    /// `type: integer`
    Integer,
    /// `type: number`
    Number,
    /// `type: boolean`
    Boolean,
}

impl Primitive {
    /// JSON Schema name for this primitive.
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
        }
    }
}

/// A literal enum member.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumLiteral {
    /// String member.
    String(String),
    /// Integer member.
    Integer(i64),
    /// Floating-point member.
    Number(f64),
    /// Boolean member.
    Bool(bool),
    /// Null member.
    Null,
}

/// Language-neutral type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Scalar type.
    Primitive(Primitive),
    /// Homogeneous array.
    Array(Box<TypeKind>),
    /// String-keyed map (`additionalProperties`).
    Map(Box<TypeKind>),
    /// Inline literal value set.
    Enum(Vec<EnumLiteral>),
    /// Anonymous inline object with named fields.
    Object(Vec<Field>),
    /// Reference to a named type in the arena.
    Named(String),
    /// Reference that participates in a cycle; target languages must render
    /// this with indirection (boxing/pointer) to keep the type finite.
    Indirect(String),
    /// The value itself may legitimately be null. Distinct from field
    /// optionality, which is about presence, not value.
    Nullable(Box<TypeKind>),
    /// No usable type information.
    Unknown,
}

impl TypeKind {
    /// Whether this descriptor (through nullable wrappers) is an array.
    /// Query-style serialization only applies to array-valued parameters.
    pub fn is_array(&self) -> bool {
        match self {
            TypeKind::Array(_) => true,
            TypeKind::Nullable(inner) => inner.is_array(),
            _ => false,
        }
    }
}

/// A single field of a generated type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Identifier-safe field name.
    pub name: String,
    /// Name as it appears on the wire (JSON key, parameter name).
    pub wire_name: String,
    /// Field type.
    pub ty: TypeKind,
    /// Whether the field may be absent entirely. Optional fields default to
    /// absent — not to a zero value — so "not sent" and "sent empty" stay
    /// distinguishable.
    pub optional: bool,
}

/// A named generated type with ordered fields.
///
/// Constructor contract for emitted code: all required fields must be
/// supplied; optional fields default to absent. Field order follows the
/// source document, so regeneration is byte-for-byte diffable.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedType {
    /// Type name (e.g. `GetUserByIdPathParams`).
    pub name: String,
    /// Fields in source-document order.
    pub fields: Vec<Field>,
}

/// An arena entry: one named type definition.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// A struct-like type with named fields.
    Struct(GeneratedType),
    /// A transparent alias to another descriptor.
    Alias {
        /// Alias name.
        name: String,
        /// Aliased type.
        ty: TypeKind,
    },
    /// A closed set of literal values.
    Enum {
        /// Enum type name.
        name: String,
        /// Members in document order.
        values: Vec<EnumLiteral>,
    },
}

impl TypeDef {
    /// The definition's name.
    pub fn name(&self) -> &str {
        match self {
            TypeDef::Struct(t) => &t.name,
            TypeDef::Alias { name, .. } | TypeDef::Enum { name, .. } => name,
        }
    }
}
