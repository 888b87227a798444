//! HTTP request descriptors.
//!
//! An [`HttpRequest`] is a plain description of a call: method, URL, ordered
//! headers, ordered query parameters and an optional body. It does not talk
//! to the network. [`HttpRequest::prepare`] turns it into the exact bytes on
//! the wire: the query string is appended to the URL and the body is
//! serialized, which is what the client sends and what tests assert on.

use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::NetworkError;

/// Characters escaped in query keys and values.
///
/// Everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the same unreserved set a
/// browser's `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single query component.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

// ============================================================================
// Method
// ============================================================================

/// HTTP request methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    #[default]
    Get,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
    /// HTTP PATCH method.
    Patch,
    /// HTTP HEAD method.
    Head,
    /// HTTP OPTIONS method.
    Options,
}

impl HttpMethod {
    /// Canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Convert to reqwest method.
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = NetworkError;

    /// Parse a method name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(NetworkError::InvalidMethod(s.to_string())),
        }
    }
}

// ============================================================================
// Body
// ============================================================================

/// The body of an HTTP request.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// Plain text body, sent as-is.
    Text(String),
    /// Structured body. Objects and arrays are serialized to JSON; scalars
    /// are sent as their plain text.
    Json(serde_json::Value),
    /// Raw binary body, sent as-is.
    Bytes(Bytes),
}

impl RequestBody {
    /// Whether the body carries anything worth sending.
    ///
    /// Empty text, empty bytes, `null`, `false`, `0` and `""` count as no
    /// body at all.
    pub fn is_present(&self) -> bool {
        match self {
            Self::None => false,
            Self::Text(text) => !text.is_empty(),
            Self::Bytes(bytes) => !bytes.is_empty(),
            Self::Json(value) => match value {
                serde_json::Value::Null => false,
                serde_json::Value::Bool(b) => *b,
                serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
                serde_json::Value::String(s) => !s.is_empty(),
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
            },
        }
    }

    /// Serialize for the wire. Returns the bytes and whether they are JSON.
    fn encode(&self) -> Option<(Bytes, bool)> {
        if !self.is_present() {
            return None;
        }
        match self {
            Self::None => None,
            Self::Text(text) => Some((Bytes::from(text.clone()), false)),
            Self::Bytes(bytes) => Some((bytes.clone(), false)),
            Self::Json(serde_json::Value::String(s)) => Some((Bytes::from(s.clone()), false)),
            Self::Json(value @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => {
                Some((Bytes::from(value.to_string()), true))
            }
            Self::Json(scalar) => Some((Bytes::from(scalar.to_string()), false)),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// A request descriptor, built per call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The request URL, without the query parameters below.
    pub url: String,
    /// Request headers in insertion order. Names compare case-insensitively.
    pub headers: Vec<(String, String)>,
    /// Query parameters in insertion order. `None` values encode as empty.
    pub params: Vec<(String, Option<String>)>,
    /// Request body.
    pub body: RequestBody,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a request with no headers, params or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set a header, replacing any existing header of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Append a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), Some(value.into())));
        self
    }

    /// Set the body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Set a timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a header in place, replacing one with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Look up a header value by name, ignoring case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The encoded query string, without a leading separator.
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    encode_component(key),
                    encode_component(value.as_deref().unwrap_or(""))
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The URL with the query string appended.
    ///
    /// Uses `?` unless the URL already contains one, in which case `&`.
    pub fn full_url(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            return self.url.clone();
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.url)
    }

    /// Resolve this descriptor into what goes on the wire.
    ///
    /// GET requests never carry a body. JSON bodies get a
    /// `Content-Type: application/json` header unless one is already set.
    pub fn prepare(&self) -> PreparedRequest {
        let mut headers = self.headers.clone();
        let body = if self.method == HttpMethod::Get {
            None
        } else {
            self.body.encode().map(|(bytes, is_json)| {
                let has_content_type = headers
                    .iter()
                    .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
                if is_json && !has_content_type {
                    headers.insert(0, ("Content-Type".to_string(), "application/json".to_string()));
                }
                bytes
            })
        };

        PreparedRequest {
            method: self.method,
            url: self.full_url(),
            headers,
            body,
            timeout: self.timeout,
        }
    }
}

/// A request resolved down to its wire form.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The URL including the query string.
    pub url: String,
    /// Final headers.
    pub headers: Vec<(String, String)>,
    /// Encoded body, if one is sent.
    pub body: Option<Bytes>,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    /// Look up a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The body as UTF-8 text, if present and valid.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}
