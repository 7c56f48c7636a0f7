//! Client configuration

use serde::Deserialize;
use std::fmt;
use typed_builder::TypedBuilder;

/// Production authorization server used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://api.kerliix.com";

/// OAuth client configuration
///
/// A configured `client_secret` makes this a confidential client: the token
/// and revocation endpoints are called with HTTP Basic credentials. Without
/// one the client is public and relies on PKCE.
#[derive(Clone, TypedBuilder, Deserialize)]
#[builder(
    builder_method(doc = "Create a new builder for ClientConfig"),
    builder_type(doc = "Builder for ClientConfig", vis = "pub"),
    build_method(doc = "Build the ClientConfig")
)]
pub struct ClientConfig {
    /// OAuth client ID
    #[builder(setter(into))]
    #[serde(default)]
    pub client_id: String,

    /// Client secret for confidential clients
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Redirect URI registered for this client
    #[builder(setter(into))]
    #[serde(default)]
    pub redirect_uri: String,

    /// Authorization server base URL (defaults to [`DEFAULT_BASE_URL`])
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ClientConfig {
    /// Base URL with trailing slashes removed, or the default endpoint
    #[must_use]
    pub fn base_url(&self) -> &str {
        match self.base_url.as_deref() {
            Some(url) if !url.is_empty() => url.trim_end_matches('/'),
            _ => DEFAULT_BASE_URL,
        }
    }

    /// Client secret, treating an empty string as absent
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether a client secret is configured
    #[must_use]
    pub fn is_confidential(&self) -> bool {
        self.client_secret().is_some()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret().map(|_| "[REDACTED]"),
            )
            .field("redirect_uri", &self.redirect_uri)
            .field("base_url", &self.base_url)
            .finish()
    }
}
