//! Binding synthesis: operations to typed parameter groups and bodies.
//!
//! For each operation this derives up to four parameter-group types
//! (`{OperationName}PathParams`, `...QueryParams`, `...HeaderParams`,
//! `...CookieParams`) and, when a request body exists,
//! `{OperationName}RequestBody`. Generated parameter structures always have
//! named, typed fields — never a generic key-value bag — so statically
//! typed targets get compile-time enforcement of required parameters.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::document::{Document, MediaType, Operation, Parameter, PathItem, Schema};
use crate::error::GenerateError;

use super::resolve::Resolver;
use super::types::{Field, GeneratedType, Primitive, TypeDef, TypeKind};
use super::utils::{pascal_case, sanitize_ident};

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Canonical uppercase method name.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

/// Where a parameter appears in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Substituted into the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a request header.
    Header,
    /// Sent in the `Cookie` header.
    Cookie,
}

impl ParamLocation {
    fn parse(location: &str) -> Option<Self> {
        match location {
            "path" => Some(ParamLocation::Path),
            "query" => Some(ParamLocation::Query),
            "header" => Some(ParamLocation::Header),
            "cookie" => Some(ParamLocation::Cookie),
            _ => None,
        }
    }

    /// Suffix of the generated group type name for this location.
    pub fn group_suffix(self) -> &'static str {
        match self {
            ParamLocation::Path => "PathParams",
            ParamLocation::Query => "QueryParams",
            ParamLocation::Header => "HeaderParams",
            ParamLocation::Cookie => "CookieParams",
        }
    }
}

/// How an array-valued query parameter serializes. Recorded per parameter
/// from the document's `style`/`explode`, never hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStyle {
    /// One `key=value` pair per element (form style, `explode: true`, the
    /// OpenAPI default for query parameters).
    Repeated,
    /// A single `key=a,b,c` pair (`explode: false`).
    CommaJoined,
}

/// A single bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Identifier-safe field name.
    pub name: String,
    /// Wire name as sent in the request.
    pub wire_name: String,
    /// Value type.
    pub ty: TypeKind,
    /// Whether the caller must supply it. Always true for path parameters.
    pub required: bool,
    /// Serialization style. Meaningful for query parameters only.
    pub style: QueryStyle,
}

/// One parameter group: all of an operation's parameters for one location,
/// generated as one type.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGroup {
    /// Generated type name, e.g. `GetUserByIdPathParams`.
    pub type_name: String,
    /// Location shared by every parameter in the group.
    pub location: ParamLocation,
    /// Parameters in source-document order.
    pub params: Vec<BoundParam>,
}

impl ParamGroup {
    /// The group as a named generated type (what the emission layer renders).
    pub fn generated_type(&self) -> GeneratedType {
        GeneratedType {
            name: self.type_name.clone(),
            fields: self
                .params
                .iter()
                .map(|p| Field {
                    name: p.name.clone(),
                    wire_name: p.wire_name.clone(),
                    ty: p.ty.clone(),
                    optional: !p.required,
                })
                .collect(),
        }
    }
}

/// The bound request body of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundBody {
    /// Generated type name, e.g. `CreateNewUserRequestBody`.
    pub type_name: String,
    /// The content type the body serializes as.
    pub content_type: String,
    /// Whether a body must be supplied.
    pub required: bool,
}

/// Matches a response status against a declared response-map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMatcher {
    /// An exact status code, e.g. `200`.
    Exact(u16),
    /// A wildcard range like `2XX` (stored as the leading digit).
    Range(u8),
    /// The `default` entry: the catch-all for statuses no other entry
    /// covers. Never placed in an operation's success set.
    Default,
}

impl StatusMatcher {
    /// Whether a concrete status code falls under this matcher.
    pub fn matches(self, status: u16) -> bool {
        match self {
            StatusMatcher::Exact(code) => status == code,
            StatusMatcher::Range(digit) => status / 100 == u16::from(digit),
            StatusMatcher::Default => true,
        }
    }
}

/// One declared success outcome of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessResponse {
    /// Which statuses this entry covers.
    pub matcher: StatusMatcher,
    /// Decoded body type, absent for bodiless responses (204).
    pub ty: Option<TypeKind>,
}

/// A fully bound operation: everything the client emitter needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundOperation {
    /// Identifier-safe operation name (from the operation id); becomes the
    /// generated method name.
    pub name: String,
    /// PascalCase prefix shared by the operation's generated type names.
    pub type_prefix: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template as written in the document.
    pub path: String,
    /// Summary carried through for documentation emission.
    pub summary: Option<String>,
    /// Parameter groups, at most one per location, in location order.
    pub groups: Vec<ParamGroup>,
    /// Request body, if the operation declares one with a JSON-compatible
    /// content type.
    pub body: Option<BoundBody>,
    /// Declared success responses. Statuses matching none of these become
    /// `ApiError` at runtime.
    pub success: Vec<SuccessResponse>,
}

impl BoundOperation {
    /// The group for a location, if the operation declares parameters there.
    pub fn group(&self, location: ParamLocation) -> Option<&ParamGroup> {
        self.groups.iter().find(|g| g.location == location)
    }
}

/// Bind every operation in the document, registering synthesized types
/// (parameter groups, request bodies) into the resolver's arena.
///
/// Paths and methods are walked in document order so output is
/// deterministic across regenerations.
pub fn bind_operations(
    doc: &Document,
    resolver: &mut Resolver<'_>,
) -> Result<Vec<BoundOperation>, GenerateError> {
    let mut operations = Vec::new();
    let mut seen_prefixes = HashSet::new();

    for (path, item) in &doc.paths {
        for (method, op) in path_item_operations(item) {
            let Some(op) = op else { continue };
            let bound = bind_operation(path, method, op, item.parameters.as_ref(), resolver)?;

            // Collision on the normalized prefix: `getUser` and `get_user`
            // both become `GetUser`. Build-time error, never a runtime one.
            if !seen_prefixes.insert(bound.type_prefix.clone()) {
                return Err(GenerateError::DuplicateOperation {
                    name: bound.type_prefix,
                });
            }

            for group in &bound.groups {
                resolver.define_synthesized(TypeDef::Struct(group.generated_type()))?;
            }

            operations.push(bound);
        }
    }

    Ok(operations)
}

fn path_item_operations(item: &PathItem) -> [(HttpMethod, Option<&Operation>); 7] {
    [
        (HttpMethod::Get, item.get.as_ref()),
        (HttpMethod::Post, item.post.as_ref()),
        (HttpMethod::Put, item.put.as_ref()),
        (HttpMethod::Patch, item.patch.as_ref()),
        (HttpMethod::Delete, item.delete.as_ref()),
        (HttpMethod::Head, item.head.as_ref()),
        (HttpMethod::Options, item.options.as_ref()),
    ]
}

fn bind_operation(
    path: &str,
    method: HttpMethod,
    op: &Operation,
    path_level_params: Option<&Vec<Parameter>>,
    resolver: &mut Resolver<'_>,
) -> Result<BoundOperation, GenerateError> {
    let name = operation_name(path, method, op, resolver);
    let type_prefix = pascal_case(&name);
    debug!(operation = %name, method = method.as_str(), path, "binding operation");

    let merged = merge_parameters(path, path_level_params, op.parameters.as_ref())?;
    let groups = bind_groups(&type_prefix, path, &merged, resolver)?;
    let body = bind_body(&type_prefix, op, resolver)?;
    let success = bind_success(&type_prefix, op, resolver)?;

    Ok(BoundOperation {
        name,
        type_prefix,
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        groups,
        body,
        success,
    })
}

/// Operation name from the operation id, or derived from method and path
/// when the document declares none (with a note diagnostic, since derived
/// names are less stable across document edits).
fn operation_name(
    path: &str,
    method: HttpMethod,
    op: &Operation,
    resolver: &mut Resolver<'_>,
) -> String {
    if let Some(id) = &op.operation_id {
        return sanitize_ident(id);
    }

    let base: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with('{'))
        .collect();
    let derived = sanitize_ident(&format!(
        "{} {}",
        method.as_str().to_lowercase(),
        base.join(" ")
    ));
    resolver.push_note(format!(
        "{} {path}: missing operationId, derived `{derived}`",
        method.as_str()
    ));
    derived
}

/// Merge path-level and operation-level parameters. Operation-level entries
/// override path-level ones with the same name and location. Duplicates
/// within one level are a document error.
fn merge_parameters<'p>(
    path: &str,
    path_level: Option<&'p Vec<Parameter>>,
    op_level: Option<&'p Vec<Parameter>>,
) -> Result<Vec<&'p Parameter>, GenerateError> {
    let mut merged: Vec<&Parameter> = Vec::new();

    for (level, params) in [("path-level", path_level), ("operation-level", op_level)] {
        let Some(params) = params else { continue };
        let mut seen = HashSet::new();
        for p in params {
            if !seen.insert((p.name.as_str(), p.location.as_str())) {
                return Err(GenerateError::MalformedSpec(format!(
                    "{path}: duplicate {level} parameter `{}` in `{}`",
                    p.name, p.location
                )));
            }
            merged.retain(|m: &&Parameter| !(m.name == p.name && m.location == p.location));
            merged.push(p);
        }
    }

    Ok(merged)
}

fn bind_groups(
    type_prefix: &str,
    path: &str,
    params: &[&Parameter],
    resolver: &mut Resolver<'_>,
) -> Result<Vec<ParamGroup>, GenerateError> {
    let mut groups = Vec::new();

    for location in [
        ParamLocation::Path,
        ParamLocation::Query,
        ParamLocation::Header,
        ParamLocation::Cookie,
    ] {
        let mut bound = Vec::new();
        for p in params {
            let Some(loc) = ParamLocation::parse(&p.location) else {
                return Err(GenerateError::MalformedSpec(format!(
                    "{path}: parameter `{}` has unknown location `{}`",
                    p.name, p.location
                )));
            };
            if loc != location {
                continue;
            }
            bound.push(bind_param(type_prefix, p, loc, resolver)?);
        }

        if location == ParamLocation::Path {
            check_path_tokens(path, &bound)?;
        }

        if !bound.is_empty() {
            groups.push(ParamGroup {
                type_name: format!("{type_prefix}{}", location.group_suffix()),
                location,
                params: bound,
            });
        }
    }

    Ok(groups)
}

fn bind_param(
    type_prefix: &str,
    p: &Parameter,
    location: ParamLocation,
    resolver: &mut Resolver<'_>,
) -> Result<BoundParam, GenerateError> {
    let ctx = format!("{type_prefix}.{}", p.name);
    let ty = match &p.schema {
        Some(schema) => resolver.resolve_type(schema, &ctx)?,
        None => TypeKind::Primitive(Primitive::String),
    };

    // Path parameters are required by definition; a document that says
    // otherwise is corrected, not trusted.
    let required = if location == ParamLocation::Path {
        if !p.required {
            resolver.push_warning(format!(
                "{ctx}: path parameter declared optional; forced to required"
            ));
        }
        true
    } else {
        p.required
    };

    // `explode` wins when declared; otherwise the default follows the
    // declared style (`form` explodes, every other style does not).
    let style = match p.explode {
        Some(false) => QueryStyle::CommaJoined,
        Some(true) => QueryStyle::Repeated,
        None => match p.style.as_deref() {
            None | Some("form") => QueryStyle::Repeated,
            Some(_) => QueryStyle::CommaJoined,
        },
    };

    Ok(BoundParam {
        name: sanitize_ident(&p.name),
        wire_name: p.name.clone(),
        ty,
        required,
        style,
    })
}

/// Every path parameter must appear as a `{name}` token in the template
/// exactly once, and every token must be declared as a path parameter.
fn check_path_tokens(path: &str, params: &[BoundParam]) -> Result<(), GenerateError> {
    let mut token_counts: HashMap<String, usize> = HashMap::new();
    for token in path_tokens(path) {
        *token_counts.entry(token).or_insert(0) += 1;
    }

    for p in params {
        match token_counts.get(&p.wire_name) {
            Some(1) => {}
            Some(n) => {
                return Err(GenerateError::MalformedSpec(format!(
                    "{path}: path parameter `{}` appears {n} times in the template",
                    p.wire_name
                )));
            }
            None => {
                return Err(GenerateError::MalformedSpec(format!(
                    "{path}: path parameter `{}` has no matching {{{}}} token",
                    p.wire_name, p.wire_name
                )));
            }
        }
    }

    for token in token_counts.keys() {
        if !params.iter().any(|p| &p.wire_name == token) {
            return Err(GenerateError::MalformedSpec(format!(
                "{path}: template token {{{token}}} has no declared path parameter"
            )));
        }
    }

    Ok(())
}

fn path_tokens(path: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    for c in path.chars() {
        match c {
            '{' => {
                in_token = true;
                current.clear();
            }
            '}' if in_token => {
                tokens.push(current.clone());
                in_token = false;
            }
            _ if in_token => current.push(c),
            _ => {}
        }
    }
    tokens
}

/// Pick the first JSON-compatible content entry of a body, in document
/// order. `application/json` and `+json` suffixes qualify.
fn pick_json_content<'c>(
    content: &'c indexmap::IndexMap<String, MediaType>,
) -> Option<(&'c str, &'c Schema)> {
    content.iter().find_map(|(content_type, media)| {
        let json = content_type == "application/json"
            || content_type.split(';').next().is_some_and(|t| {
                t.trim() == "application/json" || t.trim().ends_with("+json")
            });
        match (&media.schema, json) {
            (Some(schema), true) => Some((content_type.as_str(), schema)),
            _ => None,
        }
    })
}

fn bind_body(
    type_prefix: &str,
    op: &Operation,
    resolver: &mut Resolver<'_>,
) -> Result<Option<BoundBody>, GenerateError> {
    let Some(body) = &op.request_body else {
        return Ok(None);
    };

    let Some(content) = body.content.as_ref().filter(|c| !c.is_empty()) else {
        resolver.push_warning(format!(
            "{type_prefix}: request body declares no content; body dropped"
        ));
        return Ok(None);
    };

    let Some((content_type, schema)) = pick_json_content(content) else {
        resolver.push_warning(format!(
            "{type_prefix}: request body has no JSON-compatible content type; body dropped"
        ));
        return Ok(None);
    };

    let type_name = format!("{type_prefix}RequestBody");
    let ctx = type_name.clone();

    // Inline object schemas become a struct named after the operation;
    // anything else (a $ref, an array) becomes a transparent alias.
    let def = if schema.properties.is_some() && schema.ref_path.is_none() {
        TypeDef::Struct(GeneratedType {
            name: type_name.clone(),
            fields: resolver.object_fields(schema, &ctx)?,
        })
    } else {
        TypeDef::Alias {
            name: type_name.clone(),
            ty: resolver.resolve_type(schema, &ctx)?,
        }
    };
    resolver.define_synthesized(def)?;

    Ok(Some(BoundBody {
        type_name,
        content_type: content_type.to_string(),
        required: body.required,
    }))
}

fn bind_success(
    type_prefix: &str,
    op: &Operation,
    resolver: &mut Resolver<'_>,
) -> Result<Vec<SuccessResponse>, GenerateError> {
    let mut success = Vec::new();

    for (status_key, response) in &op.responses {
        let Some(matcher) = parse_status_key(status_key) else {
            return Err(GenerateError::MalformedSpec(format!(
                "{type_prefix}: invalid response status key `{status_key}`"
            )));
        };

        // Only declared success entries decode to a value; everything else
        // (declared 4xx/5xx included) is ApiError territory at runtime.
        // A `default` entry is the catch-all for otherwise-undeclared
        // statuses — almost always the error shape — so it never widens
        // the success set; non-2xx statuses must stay ApiError.
        let is_success = match matcher {
            StatusMatcher::Exact(code) => (200..300).contains(&code),
            StatusMatcher::Range(digit) => digit == 2,
            StatusMatcher::Default => false,
        };
        if !is_success {
            continue;
        }

        let ty = match response.content.as_ref().and_then(|c| pick_json_content(c)) {
            Some((_, schema)) => {
                Some(resolver.resolve_type(schema, &format!("{type_prefix}.{status_key}"))?)
            }
            None => {
                if response.content.as_ref().is_some_and(|c| !c.is_empty()) {
                    resolver.push_warning(format!(
                        "{type_prefix}.{status_key}: no JSON-compatible response content; \
                         body will not be decoded"
                    ));
                }
                None
            }
        };

        success.push(SuccessResponse { matcher, ty });
    }

    if success.is_empty() {
        resolver.push_note(format!(
            "{type_prefix}: no success responses declared; any 2xx accepted"
        ));
        success.push(SuccessResponse {
            matcher: StatusMatcher::Range(2),
            ty: None,
        });
    }

    Ok(success)
}

fn parse_status_key(key: &str) -> Option<StatusMatcher> {
    if key == "default" {
        return Some(StatusMatcher::Default);
    }
    if let Ok(code) = key.parse::<u16>() {
        return (100..600).contains(&code).then_some(StatusMatcher::Exact(code));
    }
    let bytes = key.as_bytes();
    if bytes.len() == 3
        && bytes[0].is_ascii_digit()
        && (1..=5).contains(&(bytes[0] - b'0'))
        && bytes[1].to_ascii_uppercase() == b'X'
        && bytes[2].to_ascii_uppercase() == b'X'
    {
        return Some(StatusMatcher::Range(bytes[0] - b'0'));
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::ir::resolve::GeneratorConfig;

    fn bind(doc_json: &str) -> Result<(Vec<BoundOperation>, Vec<crate::error::Diagnostic>), GenerateError> {
        let doc = Document::from_json(doc_json).unwrap();
        let mut resolver = Resolver::new(&doc, GeneratorConfig::default());
        resolver.resolve_components()?;
        let ops = bind_operations(&doc, &mut resolver)?;
        let (_, diagnostics) = resolver.finish();
        Ok((ops, diagnostics))
    }

    const GET_USER_BY_ID: &str = r##"{
      "openapi": "3.1.0",
      "paths": {
        "/users/{id}": {
          "get": {
            "operationId": "getUserById",
            "parameters": [
              { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } },
              { "name": "include", "in": "query", "schema": { "type": "string" } },
              { "name": "authorization", "in": "header", "schema": { "type": "string" } }
            ],
            "responses": {
              "200": { "description": "OK", "content": { "application/json": { "schema": { "type": "object" } } } }
            }
          }
        }
      }
    }"##;

    #[test]
    fn test_get_user_by_id_scenario() {
        let (ops, _) = bind(GET_USER_BY_ID).unwrap();
        assert_eq!(ops.len(), 1);
        let op = &ops[0];
        assert_eq!(op.name, "getUserById");
        assert_eq!(op.type_prefix, "GetUserById");

        let path = op.group(ParamLocation::Path).unwrap();
        assert_eq!(path.type_name, "GetUserByIdPathParams");
        assert_eq!(path.params.len(), 1);
        assert!(path.params[0].required);
        assert_eq!(path.params[0].ty, TypeKind::Primitive(Primitive::Integer));

        let query = op.group(ParamLocation::Query).unwrap();
        assert_eq!(query.type_name, "GetUserByIdQueryParams");
        assert!(!query.params[0].required);

        let header = op.group(ParamLocation::Header).unwrap();
        assert_eq!(header.type_name, "GetUserByIdHeaderParams");
        assert_eq!(header.params[0].wire_name, "authorization");
        assert!(!header.params[0].required);

        assert!(op.group(ParamLocation::Cookie).is_none());
        assert!(op.body.is_none());
    }

    #[test]
    fn test_path_group_has_exactly_n_required_fields() {
        let (ops, _) = bind(
            r##"{
              "paths": {
                "/orgs/{org}/repos/{repo}/issues/{num}": {
                  "get": {
                    "operationId": "getIssue",
                    "parameters": [
                      { "name": "org", "in": "path", "required": true, "schema": { "type": "string" } },
                      { "name": "repo", "in": "path", "required": true, "schema": { "type": "string" } },
                      { "name": "num", "in": "path", "required": true, "schema": { "type": "integer" } }
                    ],
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let group = ops[0].group(ParamLocation::Path).unwrap();
        assert_eq!(group.params.len(), 3);
        assert!(group.params.iter().all(|p| p.required));
        let generated = group.generated_type();
        assert_eq!(generated.fields.len(), 3);
        assert!(generated.fields.iter().all(|f| !f.optional));
    }

    #[test]
    fn test_duplicate_operation_ids_after_normalization() {
        let err = bind(
            r##"{
              "paths": {
                "/users": { "get": { "operationId": "getUser", "responses": { "200": { "description": "OK" } } } },
                "/user": { "get": { "operationId": "get_user", "responses": { "200": { "description": "OK" } } } }
              }
            }"##,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::DuplicateOperation { name } if name == "GetUser"
        ));
    }

    #[test]
    fn test_path_param_without_token_is_malformed() {
        let err = bind(
            r##"{
              "paths": {
                "/users": {
                  "get": {
                    "operationId": "getUser",
                    "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::MalformedSpec(_)));
    }

    #[test]
    fn test_token_without_path_param_is_malformed() {
        let err = bind(
            r##"{
              "paths": {
                "/users/{id}": {
                  "get": { "operationId": "getUser", "responses": { "200": { "description": "OK" } } }
                }
              }
            }"##,
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::MalformedSpec(_)));
    }

    #[test]
    fn test_optional_path_param_forced_required() {
        let (ops, diagnostics) = bind(
            r##"{
              "paths": {
                "/users/{id}": {
                  "get": {
                    "operationId": "getUser",
                    "parameters": [{ "name": "id", "in": "path", "schema": { "type": "integer" } }],
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        assert!(ops[0].group(ParamLocation::Path).unwrap().params[0].required);
        assert!(diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("forced to required")));
    }

    #[test]
    fn test_request_body_inline_object() {
        let (ops, _) = bind(
            r##"{
              "paths": {
                "/users": {
                  "post": {
                    "operationId": "createNewUser",
                    "requestBody": {
                      "required": true,
                      "content": {
                        "application/json": {
                          "schema": {
                            "type": "object",
                            "required": ["name", "email"],
                            "properties": { "name": { "type": "string" }, "email": { "type": "string" } }
                          }
                        }
                      }
                    },
                    "responses": { "201": { "description": "Created" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let body = ops[0].body.as_ref().unwrap();
        assert_eq!(body.type_name, "CreateNewUserRequestBody");
        assert_eq!(body.content_type, "application/json");
        assert!(body.required);
    }

    #[test]
    fn test_non_json_body_dropped_with_warning() {
        let (ops, diagnostics) = bind(
            r##"{
              "paths": {
                "/upload": {
                  "post": {
                    "operationId": "upload",
                    "requestBody": { "content": { "application/octet-stream": { "schema": { "type": "string" } } } },
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        assert!(ops[0].body.is_none());
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("no JSON-compatible content type")));
    }

    #[test]
    fn test_query_style_from_explode() {
        let (ops, _) = bind(
            r##"{
              "paths": {
                "/items": {
                  "get": {
                    "operationId": "listItems",
                    "parameters": [
                      { "name": "tags", "in": "query", "explode": false, "schema": { "type": "array", "items": { "type": "string" } } },
                      { "name": "ids", "in": "query", "explode": true, "schema": { "type": "array", "items": { "type": "integer" } } },
                      { "name": "q", "in": "query", "schema": { "type": "string" } }
                    ],
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let query = ops[0].group(ParamLocation::Query).unwrap();
        assert_eq!(query.params[0].style, QueryStyle::CommaJoined);
        assert_eq!(query.params[1].style, QueryStyle::Repeated);
        assert_eq!(query.params[2].style, QueryStyle::Repeated);
    }

    #[test]
    fn test_declared_style_sets_explode_default() {
        let (ops, _) = bind(
            r##"{
              "paths": {
                "/items": {
                  "get": {
                    "operationId": "listItems",
                    "parameters": [
                      { "name": "piped", "in": "query", "style": "pipeDelimited", "schema": { "type": "array", "items": { "type": "string" } } },
                      { "name": "formed", "in": "query", "style": "form", "schema": { "type": "array", "items": { "type": "string" } } },
                      { "name": "pipedExploded", "in": "query", "style": "pipeDelimited", "explode": true, "schema": { "type": "array", "items": { "type": "string" } } }
                    ],
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let query = ops[0].group(ParamLocation::Query).unwrap();
        // Non-form styles default to a single joined value; form (and any
        // explicit explode) stays one pair per element.
        assert_eq!(query.params[0].style, QueryStyle::CommaJoined);
        assert_eq!(query.params[1].style, QueryStyle::Repeated);
        assert_eq!(query.params[2].style, QueryStyle::Repeated);
    }

    #[test]
    fn test_success_set_excludes_declared_errors() {
        let (ops, _) = bind(
            r##"{
              "paths": {
                "/users": {
                  "get": {
                    "operationId": "listUsers",
                    "responses": {
                      "200": { "description": "OK", "content": { "application/json": { "schema": { "type": "array", "items": { "type": "object" } } } } },
                      "404": { "description": "Not found", "content": { "application/json": { "schema": { "type": "object" } } } },
                      "5XX": { "description": "Server error" }
                    }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let success = &ops[0].success;
        assert_eq!(success.len(), 1);
        assert_eq!(success[0].matcher, StatusMatcher::Exact(200));
        assert!(success[0].matcher.matches(200));
        assert!(!success.iter().any(|s| s.matcher.matches(404)));
    }

    #[test]
    fn test_default_response_does_not_widen_success_set() {
        // The common shape: one declared success code plus a catch-all
        // `default` carrying the error schema. Error statuses must still
        // fall outside the success set.
        let (ops, _) = bind(
            r##"{
              "paths": {
                "/users/{id}": {
                  "get": {
                    "operationId": "getUser",
                    "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
                    "responses": {
                      "200": { "description": "OK", "content": { "application/json": { "schema": { "type": "object" } } } },
                      "default": { "description": "Error", "content": { "application/json": { "schema": { "type": "object" } } } }
                    }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let success = &ops[0].success;
        assert_eq!(success.len(), 1);
        assert_eq!(success[0].matcher, StatusMatcher::Exact(200));
        assert!(!success.iter().any(|s| s.matcher.matches(404)));
        assert!(!success.iter().any(|s| s.matcher.matches(500)));
    }

    #[test]
    fn test_only_default_response_falls_back_to_2xx() {
        let (ops, diagnostics) = bind(
            r##"{
              "paths": {
                "/ping": {
                  "get": {
                    "operationId": "ping",
                    "responses": { "default": { "description": "Anything" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let success = &ops[0].success;
        assert_eq!(success.len(), 1);
        assert_eq!(success[0].matcher, StatusMatcher::Range(2));
        assert!(success[0].matcher.matches(204));
        assert!(!success[0].matcher.matches(404));
        assert!(diagnostics
            .iter()
            .any(|d| d.message.contains("no success responses declared")));
    }

    #[test]
    fn test_status_key_parsing() {
        assert_eq!(parse_status_key("200"), Some(StatusMatcher::Exact(200)));
        assert_eq!(parse_status_key("2XX"), Some(StatusMatcher::Range(2)));
        assert_eq!(parse_status_key("4xx"), Some(StatusMatcher::Range(4)));
        assert_eq!(parse_status_key("default"), Some(StatusMatcher::Default));
        assert_eq!(parse_status_key("teapot"), None);
        assert_eq!(parse_status_key("999"), None);
    }

    #[test]
    fn test_missing_operation_id_derives_name() {
        let (ops, diagnostics) = bind(
            r##"{
              "paths": {
                "/users/{id}/posts": {
                  "get": {
                    "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        assert_eq!(ops[0].name, "getUsersPosts");
        assert!(diagnostics
            .iter()
            .any(|d| d.severity == Severity::Note && d.message.contains("missing operationId")));
    }

    #[test]
    fn test_op_level_param_overrides_path_level() {
        let (ops, _) = bind(
            r##"{
              "paths": {
                "/items/{id}": {
                  "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                  "get": {
                    "operationId": "getItem",
                    "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
                    "responses": { "200": { "description": "OK" } }
                  }
                }
              }
            }"##,
        )
        .unwrap();
        let group = ops[0].group(ParamLocation::Path).unwrap();
        assert_eq!(group.params.len(), 1);
        assert_eq!(group.params[0].ty, TypeKind::Primitive(Primitive::Integer));
    }
}
