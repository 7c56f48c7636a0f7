//! [`HttpTransport`] backed by `reqwest`

use async_trait::async_trait;

use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::Result;

/// Default transport using an async `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default `reqwest` client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, TLS settings)
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(url = %request.url, status, "OAuth endpoint responded");

        Ok(HttpResponse { status, body })
    }
}
