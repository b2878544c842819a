//! Client emission: bound operations to the client surface description.
//!
//! The output here is an in-memory description of the generated client —
//! one struct holding base URL, HTTP backend, and default headers, plus one
//! method per operation. Rendering that description to source text is the
//! templating layer's job; everything semantic is decided here.

use super::bindings::{BoundBody, BoundOperation, HttpMethod, ParamGroup, SuccessResponse};
use super::types::TypeKind;

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPart {
    /// Literal text copied into the URL as-is.
    Static(String),
    /// A `{name}` placeholder filled from the path parameter group.
    Param(String),
}

/// A path template split into static and parameter segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    /// Segments in order of appearance.
    pub parts: Vec<UrlPart>,
}

impl UrlTemplate {
    /// Split a path template like `/users/{id}/posts` into parts.
    pub fn parse(path: &str) -> Self {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut in_param = false;

        for c in path.chars() {
            match c {
                '{' => {
                    if !current.is_empty() {
                        parts.push(UrlPart::Static(std::mem::take(&mut current)));
                    }
                    in_param = true;
                }
                '}' if in_param => {
                    parts.push(UrlPart::Param(std::mem::take(&mut current)));
                    in_param = false;
                }
                _ => current.push(c),
            }
        }
        if !current.is_empty() {
            parts.push(UrlPart::Static(current));
        }

        UrlTemplate { parts }
    }

    /// Names of the template's parameters, in order.
    pub fn param_names(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                UrlPart::Param(name) => Some(name.as_str()),
                UrlPart::Static(_) => None,
            })
            .collect()
    }
}

/// One generated client method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodIr {
    /// Method name (the operation's identifier-safe name).
    pub name: String,
    /// Doc summary, if the operation declared one.
    pub summary: Option<String>,
    /// HTTP method of the request.
    pub method: HttpMethod,
    /// Path template split into renderable parts.
    pub url: UrlTemplate,
    /// Parameter groups the method accepts, in location order. Each is a
    /// distinct argument of the group's generated type.
    pub groups: Vec<ParamGroup>,
    /// Request body argument, if any.
    pub body: Option<BoundBody>,
    /// Declared success responses; the first with a body type is the
    /// method's return type.
    pub success: Vec<SuccessResponse>,
}

impl MethodIr {
    /// The method's decoded return type: the first declared success entry
    /// carrying a body. `None` means the method resolves to unit.
    pub fn return_type(&self) -> Option<&TypeKind> {
        self.success.iter().find_map(|s| s.ty.as_ref())
    }
}

/// The full client surface: every operation in the document as a method on
/// one client type.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientIr {
    /// Generated client type name.
    pub name: String,
    /// Methods in document order.
    pub methods: Vec<MethodIr>,
}

/// Build the client surface from bound operations. Order is preserved, so
/// regenerating from the same document yields an identical surface.
pub fn emit_client(operations: &[BoundOperation]) -> ClientIr {
    let methods = operations
        .iter()
        .map(|op| MethodIr {
            name: op.name.clone(),
            summary: op.summary.clone(),
            method: op.method,
            url: UrlTemplate::parse(&op.path),
            groups: op.groups.clone(),
            body: op.body.clone(),
            success: op.success.clone(),
        })
        .collect();

    ClientIr {
        name: "Client".to_string(),
        methods,
    }
}
