//! OAuth 2.0 Authorization Code client with PKCE support

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::pkce::{CODE_CHALLENGE_METHOD, PkceChallenge};
use super::response::{handle_response, parse_payload};
use super::token::{Clock, SystemClock, TokenCache, TokenRecord};
use crate::error::{OAuthError, Result, codes};
use crate::transport::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::types::{ClientConfig, UserInfo};

/// Scopes requested when the caller names none
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "email"];

/// Parameters for [`OAuthClient::get_auth_url`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationRequest {
    scopes: Vec<String>,
    state: String,
    use_pkce: bool,
}

impl AuthorizationRequest {
    /// Request with default scopes, empty state and no PKCE
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scopes to request. An empty list falls back to [`DEFAULT_SCOPES`].
    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the opaque state echoed back on the redirect
    #[must_use]
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Enable or disable PKCE (default: disabled)
    #[must_use]
    pub fn pkce(mut self, use_pkce: bool) -> Self {
        self.use_pkce = use_pkce;
        self
    }

    /// Scopes as sent: defaults applied, duplicates dropped, order kept
    #[must_use]
    pub fn effective_scopes(&self) -> Vec<&str> {
        if self.scopes.is_empty() {
            return DEFAULT_SCOPES.to_vec();
        }
        let mut scopes: Vec<&str> = Vec::with_capacity(self.scopes.len());
        for scope in &self.scopes {
            if !scopes.contains(&scope.as_str()) {
                scopes.push(scope);
            }
        }
        scopes
    }
}

/// Authorization URL plus the PKCE verifier the caller must keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUrl {
    /// URL to send the user's browser to
    pub url: String,
    /// PKCE code verifier, present only when PKCE was requested
    pub code_verifier: Option<String>,
}

/// Builder for [`OAuthClient`]
#[derive(Default)]
pub struct OAuthClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl OAuthClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Some(config),
            transport: None,
            clock: None,
        }
    }

    /// Set a custom HTTP transport (default: [`ReqwestTransport`])
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set a custom clock for the token cache (default: [`SystemClock`])
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the OAuth client
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidConfig`] if `client_id` or `redirect_uri`
    /// is empty, or the base URL is not an absolute URL.
    pub fn build(self) -> Result<OAuthClient> {
        let config = self
            .config
            .ok_or_else(|| OAuthError::invalid_config("client configuration is required"))?;

        if config.client_id.is_empty() || config.redirect_uri.is_empty() {
            return Err(OAuthError::invalid_config(
                "client_id and redirect_uri are required",
            ));
        }

        let endpoints = Endpoints::new(config.base_url())?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        Ok(OAuthClient {
            config,
            endpoints,
            cache: TokenCache::with_clock(clock),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            refresh_guard: Mutex::new(()),
        })
    }
}

/// Endpoint URLs derived from the base URL
#[derive(Debug, Clone)]
struct Endpoints {
    authorize: Url,
    token: String,
    userinfo: String,
    revoke: String,
}

impl Endpoints {
    fn new(base_url: &str) -> Result<Self> {
        let authorize = Url::parse(&format!("{base_url}/oauth/authorize"))
            .map_err(|e| OAuthError::invalid_config(format!("invalid base_url {base_url:?}: {e}")))?;

        Ok(Self {
            authorize,
            token: format!("{base_url}/oauth/token"),
            userinfo: format!("{base_url}/oauth/userinfo"),
            revoke: format!("{base_url}/oauth/revoke"),
        })
    }
}

/// OAuth client for a single authorization server
///
/// Owns one [`TokenCache`]: successful exchanges and refreshes overwrite it,
/// a successful revocation clears it.
pub struct OAuthClient {
    config: ClientConfig,
    endpoints: Endpoints,
    cache: TokenCache,
    transport: Arc<dyn HttpTransport>,
    // Serializes check-refresh-store so concurrent callers issue one refresh
    refresh_guard: Mutex<()>,
}

impl fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClient")
            .field("config", &self.config)
            .field("base_url", &self.config.base_url())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl OAuthClient {
    /// Create a client using the `reqwest` transport and the system clock
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::InvalidConfig`] if `client_id` or `redirect_uri`
    /// is empty, or the base URL is not an absolute URL.
    pub fn new(config: ClientConfig) -> Result<Self> {
        OAuthClientBuilder::new(config).build()
    }

    /// Create a builder for custom transport or clock
    #[must_use]
    pub fn builder(config: ClientConfig) -> OAuthClientBuilder {
        OAuthClientBuilder::new(config)
    }

    /// Get the client configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the token cache
    #[must_use]
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Get the cached token if it has not expired
    #[must_use]
    pub fn current_token(&self) -> Option<TokenRecord> {
        self.cache.get()
    }

    /// Check if a valid token is cached
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Forget the cached token locally without contacting the server
    pub fn logout(&self) {
        self.cache.clear();
        tracing::debug!("Cleared cached OAuth token");
    }

    /// Build the authorization URL the user's browser is sent to
    ///
    /// With PKCE enabled the returned [`AuthUrl::code_verifier`] must be kept
    /// by the caller and passed to [`Self::exchange_code_for_token`].
    #[must_use]
    pub fn get_auth_url(&self, request: &AuthorizationRequest) -> AuthUrl {
        let mut url = self.endpoints.authorize.clone();
        let pkce = request.use_pkce.then(PkceChallenge::generate);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", &request.effective_scopes().join(" "))
                .append_pair("state", &request.state);

            if let Some(pkce) = &pkce {
                query
                    .append_pair("code_challenge", &pkce.challenge)
                    .append_pair("code_challenge_method", CODE_CHALLENGE_METHOD);
            }
        }

        AuthUrl {
            url: url.into(),
            code_verifier: pkce.map(|pkce| pkce.verifier),
        }
    }

    /// Exchange an authorization code for a token and cache it
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for an empty code without any network call,
    /// the server-reported code on failure, or `token_exchange_failed` when
    /// the server gives none.
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenRecord> {
        if code.is_empty() {
            return Err(OAuthError::invalid_request("Authorization code is required"));
        }

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        if let Some(verifier) = code_verifier.filter(|v| !v.is_empty()) {
            form.push(("code_verifier", verifier));
        }

        let mut request = HttpRequest::post_form(&self.endpoints.token, form);
        if let Some(secret) = self.config.client_secret() {
            request = request.header("Authorization", self.basic_auth(secret));
        }

        tracing::debug!(
            pkce = code_verifier.is_some(),
            confidential = self.config.is_confidential(),
            "Exchanging authorization code"
        );

        let response = self.transport.send(request).await?;
        let payload = handle_response(&response, codes::TOKEN_EXCHANGE_FAILED)?;
        let token: TokenRecord = parse_payload(payload, codes::TOKEN_EXCHANGE_FAILED, "token")?;

        Ok(self.cache.set(token))
    }

    /// Return a valid token, refreshing it if the cached one expired
    ///
    /// Returns `Ok(None)` when no refresh is possible (nothing cached, no
    /// refresh token, or no client secret); the caller must re-authenticate.
    ///
    /// # Errors
    ///
    /// Returns the server-reported code, or `refresh_failed`, when the
    /// refresh request fails. The cache is left unchanged.
    pub async fn refresh_token_if_needed(&self) -> Result<Option<TokenRecord>> {
        if let Some(token) = self.cache.get() {
            tracing::debug!("Using cached OAuth token");
            return Ok(Some(token));
        }

        let _guard = self.refresh_guard.lock().await;

        // Another caller may have refreshed while we waited
        if let Some(token) = self.cache.get() {
            tracing::debug!("Using token refreshed by a concurrent caller");
            return Ok(Some(token));
        }

        let Some(last) = self.cache.last() else {
            tracing::debug!("No cached token found");
            return Ok(None);
        };
        let Some(refresh_token) = last.refresh_token.filter(|t| !t.is_empty()) else {
            tracing::debug!("Cached token expired and has no refresh token");
            return Ok(None);
        };
        let Some(secret) = self.config.client_secret() else {
            tracing::debug!("Refresh requires a client secret");
            return Ok(None);
        };

        tracing::debug!("Attempting token refresh");
        let request = HttpRequest::post_form(
            &self.endpoints.token,
            [
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ],
        )
        .header("Authorization", self.basic_auth(secret));

        let response = self.transport.send(request).await?;
        let payload = handle_response(&response, codes::REFRESH_FAILED)?;
        let mut token: TokenRecord = parse_payload(payload, codes::REFRESH_FAILED, "token")?;

        // Servers may keep the refresh token unchanged and omit it
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token);
        }

        Ok(Some(self.cache.set(token)))
    }

    /// Fetch the user's profile
    ///
    /// Without an explicit `access_token` the token comes from
    /// [`Self::refresh_token_if_needed`], called exactly once.
    ///
    /// # Errors
    ///
    /// Returns `missing_token` when no token can be resolved, any refresh
    /// error, or the server-reported code / `userinfo_fetch_failed`.
    pub async fn get_user_info(&self, access_token: Option<&str>) -> Result<UserInfo> {
        let token = match access_token.filter(|t| !t.is_empty()) {
            Some(token) => token.to_string(),
            None => self
                .refresh_token_if_needed()
                .await?
                .map(|record| record.access_token)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| OAuthError::missing_token("No access token available"))?,
        };

        let request = HttpRequest::get(&self.endpoints.userinfo)
            .header("Authorization", format!("Bearer {token}"));

        let response = self.transport.send(request).await?;
        let payload = handle_response(&response, codes::USERINFO_FETCH_FAILED)?;
        parse_payload(payload, codes::USERINFO_FETCH_FAILED, "userinfo")
    }

    /// Revoke a token and clear the cache
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for an empty token or `unauthorized_client`
    /// without a client secret, both before any network call. Server failures
    /// surface as the server-reported code or `revoke_failed` and leave the
    /// cache untouched.
    pub async fn revoke_token(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(OAuthError::invalid_request("Token is required"));
        }
        let Some(secret) = self.config.client_secret() else {
            return Err(OAuthError::unauthorized_client("Client secret required"));
        };

        let request = HttpRequest::post_form(&self.endpoints.revoke, [("token", token)])
            .header("Authorization", self.basic_auth(secret));

        let response = self.transport.send(request).await?;
        handle_response(&response, codes::REVOKE_FAILED)?;

        self.cache.clear();
        tracing::debug!("Token revoked, cache cleared");
        Ok(())
    }

    fn basic_auth(&self, secret: &str) -> String {
        let credentials = format!("{}:{secret}", self.config.client_id);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}
