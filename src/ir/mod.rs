//! Intermediate representation of a generated client.
//!
//! The pipeline runs in three stages over a parsed document:
//!
//! 1. [`resolve`] turns component schemas into an arena of named type
//!    definitions, cycle-safe via by-name indirection.
//! 2. [`bindings`] turns each operation into typed parameter groups, a
//!    request-body type, and a success-response set.
//! 3. [`client`] assembles the bound operations into the client surface.
//!
//! Every stage walks the document in source order, so the same document
//! always produces the same IR.

pub mod bindings;
pub mod client;
pub mod resolve;
pub mod types;
mod utils;

pub use bindings::{
    BoundBody, BoundOperation, BoundParam, HttpMethod, ParamGroup, ParamLocation, QueryStyle,
    StatusMatcher, SuccessResponse, bind_operations,
};
pub use client::{ClientIr, MethodIr, UrlPart, UrlTemplate, emit_client};
pub use resolve::{GeneratorConfig, Resolver, UnionPolicy};
pub use types::{EnumLiteral, Field, GeneratedType, Primitive, TypeDef, TypeKind};
