//! Host-supplied request and response mappers.
//!
//! Mappers let the host reshape outgoing requests and incoming payloads.
//! They are arbitrary code, so every invocation is sandboxed: an `Err` result
//! and a panic are both caught, logged and replaced by the neutral outcome
//! (no overrides for request mappers, no items for response mappers).
//!
//! # Example
//!
//! ```
//! use horizon_select::mapper::{RequestContext, RequestMapper, RequestOverrides, ResponseMapper};
//!
//! let map_request = RequestMapper::new(|ctx: &RequestContext| {
//!     Ok(RequestOverrides::default()
//!         .with_param("search", ctx.term().unwrap_or_default())
//!         .with_param("page", "1"))
//! });
//!
//! let map_response = ResponseMapper::new(|body| {
//!     Ok(body.get("items").cloned().unwrap_or_default())
//! });
//! # let _ = (map_request, map_response);
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use horizon_select_core::logging::targets;
use horizon_select_net::RequestBody;
use serde_json::Value;

use crate::error::MapperError;

/// Result type returned by mapper functions.
pub type MapperResult<T> = std::result::Result<T, MapperError>;

// ============================================================================
// Request Context
// ============================================================================

/// What a request is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContext {
    /// A search-driven page fetch.
    Search {
        /// The search term as typed.
        term: String,
        /// Index of the first record requested.
        start: u64,
        /// Page length.
        length: u64,
        /// Draw counter, always 1.
        draw: u64,
    },
    /// Resolution of a preset value to its record.
    Resolve {
        /// The value to resolve.
        value: String,
        /// Draw counter, always 1.
        draw: u64,
    },
}

impl RequestContext {
    /// The search term, for search contexts.
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Search { term, .. } => Some(term),
            Self::Resolve { .. } => None,
        }
    }

    /// The value being resolved, for resolve contexts.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Resolve { value, .. } => Some(value),
            Self::Search { .. } => None,
        }
    }
}

// ============================================================================
// Request Overrides
// ============================================================================

/// Fields a request mapper may override.
///
/// Empty `url` and `method` keep the configured values. `headers` merge over
/// the configured headers. `params` replace the default parameters. A body is
/// attached only when present and the method is not GET.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOverrides {
    /// Replacement URL.
    pub url: Option<String>,
    /// Replacement method name, any case.
    pub method: Option<String>,
    /// Headers merged over the configured ones.
    pub headers: Vec<(String, String)>,
    /// Query parameters.
    pub params: Vec<(String, Option<String>)>,
    /// Request body.
    pub body: RequestBody,
}

impl RequestOverrides {
    /// Override the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Override the method.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append a query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), Some(value.into())));
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

// ============================================================================
// Mappers
// ============================================================================

type RequestFn = dyn Fn(&RequestContext) -> MapperResult<RequestOverrides> + Send + Sync;
type ResponseFn = dyn Fn(&Value) -> MapperResult<Value> + Send + Sync;

/// Maps a [`RequestContext`] to request overrides.
///
/// Used for both `mapRequest` (search) and `resolveByValue` (resolve).
#[derive(Clone)]
pub struct RequestMapper(Arc<RequestFn>);

impl RequestMapper {
    /// Wrap a mapping function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RequestContext) -> MapperResult<RequestOverrides> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the mapper. Failures yield `None`.
    pub fn invoke(&self, context: &RequestContext) -> Option<RequestOverrides> {
        sandboxed("request", || (self.0)(context))
    }
}

impl fmt::Debug for RequestMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestMapper(..)")
    }
}

/// Maps a raw response body to the list of items to normalize.
#[derive(Clone)]
pub struct ResponseMapper(Arc<ResponseFn>);

impl ResponseMapper {
    /// Wrap a mapping function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> MapperResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the mapper. Failures yield `None`.
    pub fn invoke(&self, body: &Value) -> Option<Value> {
        sandboxed("response", || (self.0)(body))
    }
}

impl fmt::Debug for ResponseMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseMapper(..)")
    }
}

fn sandboxed<T>(kind: &str, f: impl FnOnce() -> MapperResult<T>) -> Option<T> {
    let outcome = catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(MapperError::Panicked(panic_message(payload.as_ref()))));

    match outcome {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(target: targets::REQUEST, mapper = kind, error = %err, "mapper failed, ignoring its result");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search(term: &str) -> RequestContext {
        RequestContext::Search {
            term: term.to_string(),
            start: 0,
            length: 25,
            draw: 1,
        }
    }

    #[test]
    fn test_request_mapper_success() {
        let mapper = RequestMapper::new(|ctx| {
            Ok(RequestOverrides::default().with_param("term", ctx.term().unwrap_or_default()))
        });
        let overrides = mapper.invoke(&search("ab")).unwrap();
        assert_eq!(overrides.params, vec![("term".to_string(), Some("ab".to_string()))]);
    }

    #[test]
    fn test_request_mapper_error_yields_none() {
        let mapper = RequestMapper::new(|_| Err(MapperError::failed("boom")));
        assert_eq!(mapper.invoke(&search("x")), None);
    }

    #[test]
    fn test_request_mapper_panic_yields_none() {
        let mapper = RequestMapper::new(|_| panic!("mapper blew up"));
        assert_eq!(mapper.invoke(&search("x")), None);
    }

    #[test]
    fn test_response_mapper_panic_yields_none() {
        let mapper = ResponseMapper::new(|body| {
            let items = body["items"].as_array().expect("items");
            Ok(Value::Array(items.clone()))
        });
        assert_eq!(mapper.invoke(&json!({"items": [1]})), Some(json!([1])));
        assert_eq!(mapper.invoke(&json!({})), None);
    }

    #[test]
    fn test_context_accessors() {
        let resolve = RequestContext::Resolve {
            value: "7".into(),
            draw: 1,
        };
        assert_eq!(resolve.value(), Some("7"));
        assert_eq!(resolve.term(), None);
        assert_eq!(search("q").term(), Some("q"));
    }
}
