//! Transport layer for talking to the authorization server
//!
//! The client never touches an HTTP library directly: it builds an
//! [`HttpRequest`], hands it to an [`HttpTransport`] and gets back the
//! status and body. [`ReqwestTransport`] is the default implementation.

mod http;

use async_trait::async_trait;

use crate::error::Result;

pub use http::ReqwestTransport;

/// HTTP method used by the OAuth endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

/// Request handed to an [`HttpTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method
    pub method: HttpMethod,
    /// Absolute request URL
    pub url: String,
    /// Extra headers as `(name, value)` pairs
    pub headers: Vec<(String, String)>,
    /// Form fields, sent as `application/x-www-form-urlencoded` when present
    pub form: Option<Vec<(String, String)>>,
}

impl HttpRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            form: None,
        }
    }

    /// Create a POST request with a form-encoded body
    pub fn post_form<K, V>(url: impl Into<String>, form: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            form: Some(
                form.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value (case-insensitive)
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a form field value
    #[must_use]
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body returned by an [`HttpTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is below 400 (informational, success or redirect)
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status < 400
    }
}

/// Capability to send a request and receive status + body
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request
    ///
    /// # Errors
    /// Returns an error if no HTTP response was received. 4xx and 5xx
    /// responses are not errors at this layer.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
