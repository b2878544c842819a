//! Generation-time error taxonomy and diagnostics.
//!
//! Fatal errors ([`GenerateError`]) abort the whole run with no partial
//! output, so a broken document can never produce an inconsistent client.
//! Recoverable conditions (unsupported schema constructs handled via a
//! fallback) accumulate as [`Diagnostic`]s surfaced to the caller alongside
//! the otherwise-complete output.

use thiserror::Error;

/// Fatal generation errors. Any of these aborts generation before output
/// is produced.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The document is structurally invalid: unparseable JSON, a path
    /// parameter with no matching `{name}` token, a malformed status code
    /// key, and similar.
    #[error("malformed OpenAPI document: {0}")]
    MalformedSpec(String),

    /// A `$ref` points at a schema that does not exist (or at a location
    /// the generator does not support).
    #[error("unresolved schema reference `{reference}`")]
    MissingReference {
        /// The dangling reference as written in the document.
        reference: String,
    },

    /// Two operations normalized to the same generated name. Detected at
    /// generation time, never at runtime.
    #[error("duplicate operation id `{name}` after normalization")]
    DuplicateOperation {
        /// The colliding normalized name.
        name: String,
    },

    /// A schema construct could not be mapped to a single concrete type and
    /// the configured [`UnionPolicy`](crate::ir::UnionPolicy) forbids the
    /// first-branch fallback.
    #[error("unsupported schema construct: {0}")]
    UnsupportedSchema(String),
}

/// Severity of a recoverable diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A construct was mapped via a lossy fallback.
    Warning,
    /// Informational, e.g. a derived operation id for an operation that
    /// declared none.
    Note,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A recoverable condition encountered during generation. The output is
/// still complete; the diagnostic records what was approximated or assumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How serious the condition is.
    pub severity: Severity,
    /// Human-readable description, including the schema or operation context.
    pub message: String,
}

impl Diagnostic {
    /// Build a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Build a note diagnostic.
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
        }
    }
}
