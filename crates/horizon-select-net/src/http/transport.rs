//! The seam between request descriptors and whatever executes them.

use std::future::Future;

use serde_json::Value;

use super::client::HttpClient;
use super::request::HttpRequest;
use crate::error::Result;

/// Executes request descriptors and yields parsed JSON bodies.
///
/// Implementations must fail with [`NetworkError::HttpStatus`] on any
/// non-2xx status and with [`NetworkError::Json`] on a malformed body.
/// [`HttpClient`] is the production implementation; tests substitute
/// scripted transports.
///
/// [`NetworkError::HttpStatus`]: crate::NetworkError::HttpStatus
/// [`NetworkError::Json`]: crate::NetworkError::Json
pub trait Transport: Send + Sync {
    /// Execute `request` and return its JSON body.
    fn fetch_json(&self, request: HttpRequest) -> impl Future<Output = Result<Value>> + Send;
}

impl Transport for HttpClient {
    fn fetch_json(&self, request: HttpRequest) -> impl Future<Output = Result<Value>> + Send {
        let client = self.clone();
        async move { client.request_json(&request).await }
    }
}
