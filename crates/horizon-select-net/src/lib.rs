//! Networking module for Horizon Select.
//!
//! This crate provides the remote side of the select widget:
//!
//! - **Request descriptors**: [`HttpRequest`](http::HttpRequest) with ordered
//!   headers and query parameters, and browser-compatible query encoding
//! - **HTTP Client**: a reqwest-backed [`HttpClient`](http::HttpClient)
//! - **Transport**: the [`Transport`](http::Transport) trait the widget
//!   driver executes requests through
//!
//! # Errors
//!
//! Every fallible operation returns [`NetworkError`]. Non-2xx responses
//! become [`NetworkError::HttpStatus`] carrying the status code and reason
//! phrase; [`NetworkError::user_message`] renders them as `"404 Not Found"`.

mod error;
pub mod http;

pub use error::{NetworkError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, RequestBody, Transport};
