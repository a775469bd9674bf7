//! Request and response values exchanged with the transport.
//!
//! The transport parses bytes into a [`Request`] and writes a prepared
//! [`Response`] back out. Neither side of that is done here.

use std::collections::BTreeMap;

/// Header map with case-insensitive names (stored lowercase).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: BTreeMap<String, String>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Sets a header, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.entries.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Sets a header only if it is not already present.
    pub fn insert_default(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| value.into());
        self
    }

    /// Removes a header.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_ascii_lowercase())
    }

    /// Whether the header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Iterates `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An inbound request as handed over by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    uri: String,
    headers: Headers,
    body: Vec<u8>,
}

impl Request {
    /// Creates a request.
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            uri: uri.into(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new("GET", uri)
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Upper-case method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Full request target, including any query string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Path component of the target.
    pub fn path(&self) -> &str {
        self.uri.split(['?', '#']).next().unwrap_or("/")
    }

    /// Query string, without the `?`.
    pub fn query(&self) -> Option<&str> {
        let (_, rest) = self.uri.split_once('?')?;
        Some(rest.split('#').next().unwrap_or(rest))
    }

    /// Request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Content-negotiation signal: the client asked for structured data.
    pub fn wants_json(&self) -> bool {
        self.headers
            .get("accept")
            .is_some_and(|accept| accept.contains("json"))
    }

    /// Whether this is a `HEAD` request.
    pub fn is_head(&self) -> bool {
        self.method == "HEAD"
    }
}

/// A cookie to set on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Optional `Path` attribute.
    pub path: Option<String>,
    /// `HttpOnly` attribute.
    pub http_only: bool,
}

impl Cookie {
    /// Creates a cookie with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            http_only: false,
        }
    }

    /// Renders the `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        out
    }
}

/// Kind of body a response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Rendered template text.
    Html,
    /// Serialized structured data.
    Json,
    /// No meaningful body (redirects).
    Empty,
}

impl BodyKind {
    fn content_type(&self) -> Option<&'static str> {
        match self {
            BodyKind::Html => Some("text/html; charset=UTF-8"),
            BodyKind::Json => Some("application/json"),
            BodyKind::Empty => None,
        }
    }
}

/// Reason phrase for the status codes this crate produces.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// An outbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    reason: String,
    headers: Headers,
    cookies: Vec<Cookie>,
    body: Vec<u8>,
    kind: BodyKind,
    prepared: bool,
}

impl Response {
    fn with_kind(status: u16, kind: BodyKind, body: Vec<u8>) -> Self {
        Self {
            status,
            reason: reason_phrase(status).to_owned(),
            headers: Headers::new(),
            cookies: Vec::new(),
            body,
            kind,
            prepared: false,
        }
    }

    /// A rendered text response.
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::with_kind(status, BodyKind::Html, body.into().into_bytes())
    }

    /// A structured data response.
    pub fn json(status: u16, body: Vec<u8>) -> Self {
        Self::with_kind(status, BodyKind::Json, body)
    }

    /// A redirect to `location`.
    pub fn redirect(status: u16, reason: &str, location: &str) -> Self {
        let mut response = Self::with_kind(status, BodyKind::Empty, Vec::new());
        response.reason = reason.to_owned();
        response.headers.insert("location", location);
        response
    }

    /// Replaces the body. A non-empty body on a redirect is sent as text.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        if self.kind == BodyKind::Empty && !self.body.is_empty() {
            self.kind = BodyKind::Html;
        }
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds a cookie.
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Reason phrase.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// `HTTP/1.1 <code> <reason>` status line.
    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {} {}", self.status, self.reason)
    }

    /// Response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable response headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Cookies to set.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, lossy.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Kind of body.
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Redirect target, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers.get("location")
    }

    /// Whether [`Response::prepare`] already ran.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Finalizes the response against the request it answers.
    ///
    /// Locks in content negotiation (`Vary: Accept`), fills in
    /// `Content-Type` and `Content-Length`, and drops the body of `HEAD`
    /// responses. Running it again is a no-op.
    pub fn prepare(&mut self, request: &Request) -> &mut Self {
        if self.prepared {
            return self;
        }
        if let Some(content_type) = self.kind.content_type() {
            self.headers.insert_default("content-type", content_type);
        }
        self.headers
            .insert("content-length", self.body.len().to_string());
        self.headers.insert_default("vary", "Accept");
        if request.is_head() {
            self.body.clear();
        }
        self.prepared = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_case_insensitive() {
        let request = Request::get("/").with_header("Accept", "application/json");
        assert_eq!(request.headers().get("ACCEPT"), Some("application/json"));
        assert!(request.wants_json());
        assert!(!Request::get("/").wants_json());
    }

    #[test]
    fn test_path_and_query() {
        let request = Request::get("/users/7?tab=posts#top");
        assert_eq!(request.path(), "/users/7");
        assert_eq!(request.query(), Some("tab=posts"));
        assert_eq!(Request::get("/plain").query(), None);
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let request = Request::get("/");
        let mut response = Response::html(200, "<p>hi</p>");

        response.prepare(&request);
        response.headers_mut().insert("content-length", "999");
        response.prepare(&request);

        assert!(response.is_prepared());
        assert_eq!(response.headers().get("content-length"), Some("999"));
        assert_eq!(
            response.headers().get("content-type"),
            Some("text/html; charset=UTF-8")
        );
        assert_eq!(response.headers().get("vary"), Some("Accept"));
    }

    #[test]
    fn test_prepare_head_drops_body() {
        let request = Request::new("head", "/");
        let mut response = Response::html(200, "abc");
        response.prepare(&request);
        assert!(response.body().is_empty());
        assert_eq!(response.headers().get("content-length"), Some("3"));
    }

    #[test]
    fn test_redirect_has_location() {
        let mut response = Response::redirect(303, "See Other", "/login");
        response.prepare(&Request::get("/"));
        assert_eq!(response.status_line(), "HTTP/1.1 303 See Other");
        assert_eq!(response.location(), Some("/login"));
        assert!(!response.headers().contains("content-type"));
    }

    #[test]
    fn test_cookie_header_value() {
        let mut cookie = Cookie::new("flash", "denied");
        cookie.path = Some("/".into());
        cookie.http_only = true;
        assert_eq!(cookie.header_value(), "flash=denied; Path=/; HttpOnly");
    }
}
