#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Typed HTTP client bindings from OpenAPI documents.
//!
//! The generator core is a pure transformation: it takes a parsed OpenAPI
//! 3.x document and produces an intermediate representation of a typed
//! client — named type definitions for every component schema, typed
//! parameter-group and request-body structs per operation, and a client
//! surface with one method per operation. No file or network I/O happens
//! during generation, and the same document always yields the same output.
//!
//! The [`runtime`] module is the support library the generated client
//! methods delegate to: base-URL handling, default headers, query
//! serialization, and the success/error taxonomy.
//!
//! ```no_run
//! # fn main() -> Result<(), openapi_clientgen::GenerateError> {
//! use openapi_clientgen::{GeneratorConfig, generate_json};
//!
//! let document = std::fs::read_to_string("openapi.json")
//!     .map_err(|e| openapi_clientgen::GenerateError::MalformedSpec(e.to_string()))?;
//! let output = generate_json(&document, &GeneratorConfig::default())?;
//! for diagnostic in &output.diagnostics {
//!     eprintln!("{}: {}", diagnostic.severity, diagnostic.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod ir;
pub mod runtime;

use indexmap::IndexMap;
use tracing::info;

pub use document::Document;
pub use error::{Diagnostic, GenerateError, Severity};
pub use ir::{ClientIr, GeneratorConfig, TypeDef, UnionPolicy};

use ir::{Resolver, bind_operations, emit_client};

/// Everything generation produces: the type arena, the client surface, and
/// the diagnostics accumulated along the way.
///
/// Diagnostics are advisory; if generation returned `Ok`, the output is
/// complete and usable regardless of how many warnings it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutput {
    /// Named type definitions in first-use order: component schemas plus
    /// synthesized parameter-group and request-body types.
    pub types: IndexMap<String, TypeDef>,
    /// The client surface, one method per operation.
    pub client: ClientIr,
    /// Warnings and notes recorded during generation.
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate client bindings from a parsed document.
///
/// Fatal conditions (structural errors, dangling references, duplicate
/// operation ids, rejected unions) return a [`GenerateError`] and produce
/// nothing; recoverable ones become [`Diagnostic`]s on the output.
pub fn generate(doc: &Document, config: &GeneratorConfig) -> Result<GenerateOutput, GenerateError> {
    let mut resolver = Resolver::new(doc, *config);
    resolver.resolve_components()?;
    let operations = bind_operations(doc, &mut resolver)?;
    let client = emit_client(&operations);
    let (types, diagnostics) = resolver.finish();

    info!(
        types = types.len(),
        methods = client.methods.len(),
        diagnostics = diagnostics.len(),
        "generation complete"
    );

    Ok(GenerateOutput {
        types,
        client,
        diagnostics,
    })
}

/// Generate client bindings from an OpenAPI JSON string.
pub fn generate_json(json: &str, config: &GeneratorConfig) -> Result<GenerateOutput, GenerateError> {
    let doc = Document::from_json(json)?;
    generate(&doc, config)
}
