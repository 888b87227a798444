//! HTTP support for Horizon Select.
//!
//! Requests are described with [`HttpRequest`] and executed by anything that
//! implements [`Transport`]. [`HttpClient`] is the reqwest-backed transport.
//!
//! # Example
//!
//! ```ignore
//! use horizon_select_net::http::{HttpClient, HttpMethod, HttpRequest, Transport};
//!
//! let client = HttpClient::builder()
//!     .base_url("https://api.example.com")?
//!     .build()?;
//!
//! let request = HttpRequest::new(HttpMethod::Get, "/countries")
//!     .param("q", "ger")
//!     .param("length", "25")
//!     .param("start", "0");
//!
//! let body = client.fetch_json(request).await?;
//! ```

mod client;
mod request;
mod response;
mod transport;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{HttpMethod, HttpRequest, PreparedRequest, RequestBody, encode_component};
pub use response::HttpResponse;
pub use transport::Transport;
