//! OAuth 2.0 Authorization Code flow with optional PKCE
//!
//! # Overview
//!
//! 1. Build an authorization URL with [`OAuthClient::get_auth_url`], keeping
//!    the PKCE verifier if one was generated
//! 2. The user authenticates and is redirected back with a code
//! 3. Exchange the code (and verifier) with [`OAuthClient::exchange_code_for_token`]
//! 4. [`OAuthClient::refresh_token_if_needed`] returns the cached token or
//!    refreshes it once it is within 30 seconds of expiry
//! 5. [`OAuthClient::revoke_token`] revokes server-side and clears the cache
//!
//! # Token Cache
//!
//! Tokens live in process memory only, in a single-slot [`TokenCache`]
//! owned by the client. Nothing is written to disk.
//!
//! # Security
//!
//! - PKCE verifiers come from 32 cryptographically random bytes
//! - Confidential clients authenticate to the token and revocation
//!   endpoints with HTTP Basic credentials
//! - Tokens and secrets never appear in log events or `Debug` output of the config

mod oauth;
mod pkce;
mod response;
mod token;

pub use oauth::{AuthUrl, AuthorizationRequest, DEFAULT_SCOPES, OAuthClient, OAuthClientBuilder};
pub use pkce::{CODE_CHALLENGE_METHOD, PkceChallenge, code_challenge};
pub use token::{
    Clock, DEFAULT_EXPIRES_IN, EXPIRY_MARGIN_SECS, SystemClock, TokenCache, TokenRecord,
};
