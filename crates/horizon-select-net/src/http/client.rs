//! HTTP client implementation.

use std::sync::Arc;
use std::time::Duration;

use horizon_select_core::logging::targets;
use reqwest::redirect::Policy;
use serde_json::Value;
use url::Url;

use super::request::HttpRequest;
use super::response::HttpResponse;
use crate::error::{NetworkError, Result};

/// Configuration for the HTTP client.
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// Default request timeout. Requests may override it.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Whether to follow redirects.
    pub follow_redirects: bool,
    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
    /// Default user agent.
    pub user_agent: Option<String>,
    /// Base that relative request URLs are resolved against.
    pub base_url: Option<Url>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Some(Duration::from_secs(10)),
            follow_redirects: true,
            max_redirects: 10,
            user_agent: Some(format!(
                "HorizonSelect/{} (Rust)",
                env!("CARGO_PKG_VERSION")
            )),
            base_url: None,
        }
    }
}

/// Builder for creating an HTTP client with custom configuration.
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    default_headers: http::HeaderMap,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClientBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: HttpClientConfig::default(),
            default_headers: http::HeaderMap::new(),
        }
    }

    /// Set the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Disable the default request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Disable redirect following.
    pub fn no_redirects(mut self) -> Self {
        self.config.follow_redirects = false;
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve relative request URLs such as `/api/users` against `base`.
    pub fn base_url(mut self, base: impl AsRef<str>) -> Result<Self> {
        self.config.base_url = Some(Url::parse(base.as_ref())?);
        Ok(self)
    }

    /// Add a default header that will be sent with every request.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Result<Self> {
        let name = name
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("Invalid header name".to_string()))?;
        let value = value
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("Invalid header value".to_string()))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Build the HTTP client.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if self.config.follow_redirects {
            builder = builder.redirect(Policy::limited(self.config.max_redirects));
        } else {
            builder = builder.redirect(Policy::none());
        }

        if let Some(ref ua) = self.config.user_agent {
            builder = builder.user_agent(ua);
        }

        builder = builder.default_headers(self.default_headers);

        let client = builder.build()?;

        Ok(HttpClient {
            inner: Arc::new(HttpClientInner {
                client,
                config: self.config,
            }),
        })
    }
}

/// Internal state for the HTTP client.
struct HttpClientInner {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// A high-level HTTP client that executes [`HttpRequest`] descriptors.
///
/// The client is cheaply cloneable and thread-safe. Clones share the same
/// underlying connection pool and configuration.
///
/// # Example
///
/// ```ignore
/// use horizon_select_net::http::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::builder()
///     .base_url("https://api.example.com")?
///     .build()?;
///
/// let request = HttpRequest::new(HttpMethod::Get, "/users").param("q", "jo");
/// let users = client.request_json(&request).await?;
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        HttpClientBuilder::new().build()
    }

    /// Create a builder for configuring a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Get the client's configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    /// Resolve a possibly relative URL against the configured base.
    pub fn resolve_url(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.inner.config.base_url {
                Some(base) => Ok(base.join(url)?),
                None => Err(NetworkError::InvalidUrl(format!(
                    "relative URL without a base: {url}"
                ))),
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Send a request and return the raw response, whatever its status.
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let prepared = request.prepare();
        let url = self.resolve_url(&prepared.url)?;

        tracing::debug!(
            target: targets::NET_HTTP,
            method = %prepared.method,
            %url,
            "sending request"
        );

        let mut req_builder = self
            .inner
            .client
            .request(prepared.method.to_reqwest(), url);

        for (name, value) in &prepared.headers {
            let name = http::HeaderName::try_from(name.as_str())?;
            let value = http::HeaderValue::try_from(value.as_str())?;
            req_builder = req_builder.header(name, value);
        }

        if let Some(timeout) = prepared.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        if let Some(body) = prepared.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await?;
        tracing::debug!(
            target: targets::NET_HTTP,
            status = response.status().as_u16(),
            "response received"
        );
        Ok(HttpResponse::from_reqwest(response))
    }

    /// Send a request, require a 2xx status and parse the body as JSON.
    pub async fn request_json(&self, request: &HttpRequest) -> Result<Value> {
        let response = self.execute(request).await?.error_for_status()?;
        response.json().await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_url_needs_base() {
        let client = HttpClient::new().unwrap();
        assert!(matches!(
            client.resolve_url("/api"),
            Err(NetworkError::InvalidUrl(_))
        ));

        let client = HttpClient::builder()
            .base_url("http://localhost:8080/app/")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            client.resolve_url("/api?q=a").unwrap().as_str(),
            "http://localhost:8080/api?q=a"
        );
        assert_eq!(
            client.resolve_url("https://other.test/x").unwrap().as_str(),
            "https://other.test/x"
        );
    }
}
