//! Error types for the Kerliix OAuth client

use thiserror::Error;

/// Machine-readable error codes carried by [`OAuthError`]
pub mod codes {
    /// Client configuration is missing a required field or is malformed
    pub const INVALID_CONFIG: &str = "invalid_config";
    /// A required request argument was empty
    pub const INVALID_REQUEST: &str = "invalid_request";
    /// The operation needs a confidential client (client secret)
    pub const UNAUTHORIZED_CLIENT: &str = "unauthorized_client";
    /// No access token was supplied and none could be obtained from the cache
    pub const MISSING_TOKEN: &str = "missing_token";
    /// Fallback code for a failed authorization code exchange
    pub const TOKEN_EXCHANGE_FAILED: &str = "token_exchange_failed";
    /// Fallback code for a failed refresh grant
    pub const REFRESH_FAILED: &str = "refresh_failed";
    /// Fallback code for a failed userinfo request
    pub const USERINFO_FETCH_FAILED: &str = "userinfo_fetch_failed";
    /// Fallback code for a failed revocation
    pub const REVOKE_FAILED: &str = "revoke_failed";
    /// The request never produced an HTTP response
    pub const NETWORK_ERROR: &str = "network_error";
}

/// Message used when the server reports a failure without a description
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors that can occur during OAuth operations
///
/// Every variant maps onto a `code`/`message` pair, see [`OAuthError::code`]
/// and [`OAuthError::message`].
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Invalid client configuration, raised at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Local validation failure or error reported by the authorization server
    #[error("{code}: {message}")]
    Protocol {
        /// Machine-readable error identifier
        code: String,
        /// Human-readable description
        message: String,
    },

    /// Transport failed without an HTTP response
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Result type alias for OAuth operations
pub type Result<T> = std::result::Result<T, OAuthError>;

impl OAuthError {
    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an error from a code and message
    pub fn protocol(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an `invalid_request` error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::protocol(codes::INVALID_REQUEST, message)
    }

    /// Create an `unauthorized_client` error
    pub fn unauthorized_client(message: impl Into<String>) -> Self {
        Self::protocol(codes::UNAUTHORIZED_CLIENT, message)
    }

    /// Create a `missing_token` error
    pub fn missing_token(message: impl Into<String>) -> Self {
        Self::protocol(codes::MISSING_TOKEN, message)
    }

    /// Create a transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidConfig(_) => codes::INVALID_CONFIG,
            Self::Protocol { code, .. } => code,
            Self::Http(_) | Self::Reqwest(_) => codes::NETWORK_ERROR,
        }
    }

    /// Human-readable description
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidConfig(msg) | Self::Http(msg) => msg.clone(),
            Self::Protocol { message, .. } => message.clone(),
            Self::Reqwest(e) => e.to_string(),
        }
    }

    /// Whether the error was raised by the authorization server or local
    /// validation rather than configuration or transport
    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let err = OAuthError::protocol("invalid_grant", "code expired");
        assert_eq!(err.to_string(), "invalid_grant: code expired");
        assert_eq!(err.code(), "invalid_grant");
        assert_eq!(err.message(), "code expired");
        assert!(err.is_protocol());
    }

    #[test]
    fn test_codes_for_non_protocol_variants() {
        let err = OAuthError::invalid_config("client_id is required");
        assert_eq!(err.code(), codes::INVALID_CONFIG);
        assert_eq!(err.message(), "client_id is required");
        assert!(!err.is_protocol());

        let err = OAuthError::http("connection refused");
        assert_eq!(err.code(), codes::NETWORK_ERROR);
    }

    #[test]
    fn test_validation_constructors() {
        assert_eq!(OAuthError::invalid_request("x").code(), "invalid_request");
        assert_eq!(
            OAuthError::unauthorized_client("x").code(),
            "unauthorized_client"
        );
        assert_eq!(OAuthError::missing_token("x").code(), "missing_token");
    }
}
