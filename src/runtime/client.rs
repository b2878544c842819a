//! Runtime client shared by every generated method.
//!
//! A generated method is a thin wrapper: it fills a [`RequestTemplate`]
//! from its typed parameter groups and hands it to [`Client::execute`] or
//! [`Client::send_json`]. One call performs one HTTP exchange and resolves
//! once the response is fully received; concurrency and timeouts stay in
//! the caller's hands (pass a pre-configured backend via
//! [`Client::with_client`] for timeouts).

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Mutex, PoisonError};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::ir::bindings::{HttpMethod, QueryStyle, StatusMatcher};
use crate::ir::client::{UrlPart, UrlTemplate};

use super::error::{ApiError, Error};

/// HTTP client holding the base URL, the transport backend, and mutable
/// default headers applied to every request.
#[derive(Debug)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    default_headers: Mutex<Vec<(String, String)>>,
}

impl Client {
    /// Create a client for a base URL with a default transport backend.
    ///
    /// Fails immediately on an empty or unparseable URL rather than at
    /// first request time.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client with a caller-configured backend (timeouts,
    /// proxies, connection pools).
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        if base_url.trim().is_empty() {
            return Err(Error::InvalidBaseUrl("base URL is empty".to_string()));
        }
        let mut url = Url::parse(base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        // A trailing slash keeps the base path intact when joining
        // operation paths onto it.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            http,
            default_headers: Mutex::new(Vec::new()),
        })
    }

    /// Set a default header sent with every subsequent request.
    ///
    /// Setting the same name again (case-insensitively) replaces the
    /// earlier value. Requests already in flight are unaffected; each call
    /// snapshots the defaults at send time.
    pub fn default_header(&self, name: &str, value: &str) {
        let mut headers = self
            .default_headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        headers.push((name.to_string(), value.to_string()));
    }

    fn header_snapshot(&self) -> Vec<(String, String)> {
        self.default_headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Perform one HTTP exchange for a filled template and return the raw
    /// response body of a successful status.
    ///
    /// A status outside the template's success set becomes
    /// [`Error::Api`]; a failed exchange stays [`Error::Transport`].
    pub async fn execute(&self, template: RequestTemplate) -> Result<Vec<u8>, Error> {
        let path = template.render_path()?;
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidBaseUrl(format!("{path}: {e}")))?;
        debug!(method = template.method.as_str(), %url, "sending request");

        let mut headers = self.header_snapshot();
        for (name, value) in &template.headers {
            headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        if !template.cookies.is_empty() {
            let cookie = template
                .cookies
                .iter()
                .map(|(n, v)| format!("{n}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            headers.retain(|(n, _)| !n.eq_ignore_ascii_case("cookie"));
            headers.push(("cookie".to_string(), cookie));
        }

        let mut request = self
            .http
            .request(to_reqwest_method(template.method), url)
            .headers(build_header_map(&headers)?);
        if !template.query.is_empty() {
            request = request.query(&template.query);
        }
        if let Some((content_type, bytes)) = template.body {
            request = request.header("content-type", content_type).body(bytes);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        if template.success.iter().any(|m| m.matches(status)) {
            Ok(body)
        } else {
            Err(ApiError::from_response(status, body).into())
        }
    }

    /// Execute a template and decode the successful response body as JSON.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        template: RequestTemplate,
    ) -> Result<T, Error> {
        let body = self.execute(template).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute a template, discarding any response body.
    pub async fn send_unit(&self, template: RequestTemplate) -> Result<(), Error> {
        self.execute(template).await?;
        Ok(())
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    }
}

fn build_header_map(headers: &[(String, String)]) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidHeader { name: name.clone() })?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidHeader { name: name.clone() })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// One request under construction: a path template plus everything a
/// generated method binds into it.
#[derive(Debug)]
pub struct RequestTemplate {
    method: HttpMethod,
    path: UrlTemplate,
    path_values: HashMap<String, String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    body: Option<(String, Vec<u8>)>,
    success: Vec<StatusMatcher>,
}

impl RequestTemplate {
    /// Start a template for a method and path pattern like `/users/{id}`.
    /// Until overridden with [`success`](Self::success), any 2xx status
    /// counts as success.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: UrlTemplate::parse(path),
            path_values: HashMap::new(),
            query: Vec::new(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: None,
            success: vec![StatusMatcher::Range(2)],
        }
    }

    /// Fill a `{name}` placeholder.
    pub fn path(mut self, name: &str, value: impl Display) -> Self {
        self.path_values.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a single query parameter.
    pub fn query(mut self, name: &str, value: impl Display) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Add an array-valued query parameter using the declared style:
    /// one `key=value` pair per element, or a single comma-joined value.
    pub fn query_values<T: Display>(
        mut self,
        name: &str,
        values: &[T],
        style: QueryStyle,
    ) -> Self {
        if values.is_empty() {
            return self;
        }
        match style {
            QueryStyle::Repeated => {
                for v in values {
                    self.query.push((name.to_string(), v.to_string()));
                }
            }
            QueryStyle::CommaJoined => {
                let joined = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                self.query.push((name.to_string(), joined));
            }
        }
        self
    }

    /// Add a request header. Overrides a default header of the same name
    /// for this request only.
    pub fn header(mut self, name: &str, value: impl Display) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a cookie, folded into a single `Cookie` header at send time.
    pub fn cookie(mut self, name: &str, value: impl Display) -> Self {
        self.cookies.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json_body(mut self, value: &impl Serialize) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(value)?;
        self.body = Some(("application/json".to_string(), bytes));
        Ok(self)
    }

    /// Replace the success set with the operation's declared one.
    pub fn success(mut self, matchers: Vec<StatusMatcher>) -> Self {
        self.success = matchers;
        self
    }

    /// Render the path with every placeholder filled. An unfilled
    /// placeholder fails here, before any request is sent. Substituted
    /// values are percent-encoded so a value containing `/`, `?`, or `#`
    /// stays one path segment instead of rewriting the request target.
    fn render_path(&self) -> Result<String, Error> {
        let mut rendered = String::new();
        for part in &self.path.parts {
            match part {
                UrlPart::Static(s) => rendered.push_str(s),
                UrlPart::Param(name) => match self.path_values.get(name) {
                    Some(value) => {
                        rendered.extend(utf8_percent_encode(value, PATH_SEGMENT));
                    }
                    None => {
                        return Err(Error::MissingPathParameter { name: name.clone() });
                    }
                },
            }
        }
        Ok(rendered)
    }
}

// Everything a URL path segment cannot carry raw: controls, separators,
// and `%` itself so pre-encoded input is not re-interpreted.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');
