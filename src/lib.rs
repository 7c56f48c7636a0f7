//! # Kerliix OAuth client for Rust
//!
//! Client side of the OAuth 2.0 Authorization Code flow (with optional PKCE)
//! against a single Kerliix authorization server: authorization URLs, code
//! exchange, token refresh, userinfo and revocation. The current access
//! token is kept in a short-lived in-memory cache so repeated calls do not
//! refresh needlessly.
//!
//! ## Quick Start
//!
//! ```no_run
//! use kerliix_oauth::{AuthorizationRequest, ClientConfig, OAuthClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .client_id("your-client-id")
//!         .client_secret("your-client-secret")
//!         .redirect_uri("https://yourapp.com/callback")
//!         .build();
//!     let client = OAuthClient::new(config)?;
//!
//!     // 1. Send the user to the authorization URL, keep the verifier
//!     let auth = client.get_auth_url(&AuthorizationRequest::new().pkce(true));
//!     println!("Visit: {}", auth.url);
//!
//!     // 2. Exchange the code delivered to the redirect URI
//!     let token = client
//!         .exchange_code_for_token("AUTH_CODE", auth.code_verifier.as_deref())
//!         .await?;
//!
//!     // 3. Fetch the profile using the cached token
//!     let user = client.get_user_info(None).await?;
//!     println!("User: {}", user.id);
//!
//!     // 4. Revoke when done
//!     client.revoke_token(&token.access_token).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`auth`]: [`OAuthClient`], [`TokenCache`], PKCE helpers
//! - [`transport`]: the [`HttpTransport`] seam and its `reqwest` implementation
//! - [`types`]: [`ClientConfig`] and [`UserInfo`]
//! - [`error`]: [`OAuthError`] with its `code`/`message` pair
//!
//! ## Logging
//!
//! This crate uses [`tracing`](https://crates.io/crates/tracing) for structured logging.
//! Tracing events are always emitted but are zero-cost when no subscriber is attached.
//! To see logs, attach a tracing subscriber in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, OAuthError>`](Result). Match on
//! [`OAuthError::code`] for the OAuth error identifier:
//!
//! ```no_run
//! # use kerliix_oauth::OAuthClient;
//! # async fn example(client: &OAuthClient) {
//! match client.get_user_info(None).await {
//!     Ok(user) => println!("{}", user.id),
//!     Err(e) if e.code() == "missing_token" => eprintln!("Please log in again"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod error;
pub mod transport;
pub mod types;
pub mod utils;

pub use auth::{
    AuthUrl, AuthorizationRequest, Clock, OAuthClient, OAuthClientBuilder, PkceChallenge,
    SystemClock, TokenCache, TokenRecord,
};
pub use error::{OAuthError, Result};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{ClientConfig, UserInfo};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
