//! Request building.
//!
//! Turns a [`RequestContext`] and the ajax configuration into an
//! [`HttpRequest`]. Without a mapper, searches send `q`, `length` and
//! `start`, and resolves send `id`. With a mapper, its overrides apply field
//! by field on top of the configured URL, method and headers; a failed mapper
//! leaves those untouched and sends no parameters.

use horizon_select_core::logging::targets;
use horizon_select_net::{HttpMethod, HttpRequest};

use crate::config::AjaxConfig;
use crate::mapper::{RequestContext, RequestMapper};

/// Build the search request for `term`.
pub fn search_request(ajax: &AjaxConfig, term: &str) -> HttpRequest {
    let context = RequestContext::Search {
        term: term.to_string(),
        start: ajax.start,
        length: ajax.page_length(),
        draw: 1,
    };
    build_request(ajax, &context)
}

/// Build the resolve request for `value`.
pub fn resolve_request(ajax: &AjaxConfig, value: &str) -> HttpRequest {
    let context = RequestContext::Resolve {
        value: value.to_string(),
        draw: 1,
    };
    build_request(ajax, &context)
}

/// Build the request for any context.
pub fn build_request(ajax: &AjaxConfig, context: &RequestContext) -> HttpRequest {
    let mut request = HttpRequest::new(base_method(ajax), ajax.url.clone());
    for (name, value) in &ajax.headers {
        request.set_header(name.clone(), value.clone());
    }
    request.timeout = ajax.request_timeout();

    match mapper_for(ajax, context) {
        Some(mapper) => {
            if let Some(overrides) = mapper.invoke(context) {
                if let Some(url) = overrides.url.filter(|url| !url.is_empty()) {
                    request.url = url;
                }
                if let Some(method) = overrides.method.filter(|m| !m.trim().is_empty()) {
                    match method.parse::<HttpMethod>() {
                        Ok(method) => request.method = method,
                        Err(err) => {
                            tracing::warn!(target: targets::REQUEST, %err, "mapper returned an unknown method, keeping the configured one");
                        }
                    }
                }
                for (name, value) in overrides.headers {
                    request.set_header(name, value);
                }
                request.params = overrides.params;
                request.body = overrides.body;
            }
        }
        None => {
            request.params = match context {
                RequestContext::Search {
                    term, start, length, ..
                } => vec![
                    ("q".to_string(), Some(term.clone())),
                    ("length".to_string(), Some(length.to_string())),
                    ("start".to_string(), Some(start.to_string())),
                ],
                RequestContext::Resolve { value, .. } => {
                    vec![("id".to_string(), Some(value.clone()))]
                }
            };
        }
    }

    tracing::debug!(
        target: targets::REQUEST,
        method = %request.method,
        url = %request.full_url(),
        "request built"
    );
    request
}

fn mapper_for<'a>(ajax: &'a AjaxConfig, context: &RequestContext) -> Option<&'a RequestMapper> {
    match context {
        RequestContext::Search { .. } => ajax.map_request.as_ref(),
        RequestContext::Resolve { .. } => ajax.resolve_by_value.as_ref(),
    }
}

/// Configurations are validated on load; one built in code with a bad method
/// falls back to GET.
fn base_method(ajax: &AjaxConfig) -> HttpMethod {
    ajax.http_method().unwrap_or_else(|err| {
        tracing::warn!(target: targets::REQUEST, %err, "falling back to GET");
        HttpMethod::Get
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapperError;
    use crate::mapper::RequestOverrides;
    use horizon_select_net::RequestBody;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_default_search_params() {
        let ajax = AjaxConfig::new("/api").with_length(10).with_start(20);
        let request = search_request(&ajax, "new york");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.full_url(), "/api?q=new%20york&length=10&start=20");
        assert_eq!(request.timeout, None);
    }

    #[test]
    fn test_default_resolve_params() {
        let ajax = AjaxConfig::new("/api?lang=de").with_timeout(500);
        let request = resolve_request(&ajax, "a&b");
        assert_eq!(request.full_url(), "/api?lang=de&id=a%26b");
        assert_eq!(request.timeout, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_mapper_overrides_apply_field_by_field() {
        let ajax = AjaxConfig::new("/api")
            .with_header("X-Token", "abc")
            .with_header("Accept", "text/plain")
            .with_map_request(RequestMapper::new(|ctx| {
                Ok(RequestOverrides::default()
                    .with_url("/search")
                    .with_method("post")
                    .with_header("accept", "application/json")
                    .with_param("term", ctx.term().unwrap_or_default())
                    .with_body(RequestBody::Json(json!({"page": 1}))))
            }));

        let request = search_request(&ajax, "ab");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.full_url(), "/search?term=ab");
        assert_eq!(request.header_value("X-Token"), Some("abc"));
        assert_eq!(request.header_value("Accept"), Some("application/json"));
        assert_eq!(request.headers.len(), 2);

        let prepared = request.prepare();
        assert_eq!(prepared.body_text(), Some(r#"{"page":1}"#));
        assert_eq!(prepared.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_empty_overrides_keep_base() {
        let ajax = AjaxConfig::new("/api")
            .with_method("PUT")
            .with_map_request(RequestMapper::new(|_| {
                Ok(RequestOverrides::default().with_url("").with_method(""))
            }));
        let request = search_request(&ajax, "x");
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.full_url(), "/api");
    }

    #[test]
    fn test_failing_mapper_sends_base_without_params() {
        let ajax = AjaxConfig::new("/api")
            .with_map_request(RequestMapper::new(|_| Err(MapperError::failed("boom"))))
            .with_resolve_by_value(RequestMapper::new(|_| panic!("boom")));

        assert_eq!(search_request(&ajax, "x").full_url(), "/api");
        let resolve = resolve_request(&ajax, "7");
        assert_eq!(resolve.full_url(), "/api");
        assert_eq!(resolve.body, RequestBody::None);
    }

    #[test]
    fn test_resolve_uses_its_own_mapper() {
        let ajax = AjaxConfig::new("/api")
            .with_map_request(RequestMapper::new(|_| Ok(RequestOverrides::default().with_url("/search"))))
            .with_resolve_by_value(RequestMapper::new(|ctx| {
                Ok(RequestOverrides::default().with_param("ids[]", ctx.value().unwrap_or_default()))
            }));
        assert_eq!(resolve_request(&ajax, "7").full_url(), "/api?ids%5B%5D=7");
    }

    #[test]
    fn test_get_body_from_mapper_is_not_sent() {
        let ajax = AjaxConfig::new("/api").with_map_request(RequestMapper::new(|_| {
            Ok(RequestOverrides::default().with_body(RequestBody::Json(json!({"a": 1}))))
        }));
        let prepared = search_request(&ajax, "x").prepare();
        assert_eq!(prepared.body, None);
    }
}
