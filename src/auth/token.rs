//! Token records and the single-slot in-memory token cache

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds before the literal expiry at which a token is already treated as expired
pub const EXPIRY_MARGIN_SECS: u64 = 30;

/// Lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Source of the current unix time in seconds
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current unix timestamp in seconds
    fn now(&self) -> u64;
}

/// [`Clock`] backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs()
    }
}

/// OAuth token as returned by the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Access token for API calls
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (usually "Bearer")
    #[serde(
        default = "default_token_type",
        deserialize_with = "deserialize_token_type"
    )]
    pub token_type: String,

    /// Lifetime of the access token in seconds
    #[serde(
        default = "default_expires_in",
        deserialize_with = "deserialize_expires_in"
    )]
    pub expires_in: u64,

    /// Scopes granted to this token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Unix timestamp at which the record entered the cache.
    ///
    /// Stamped by [`TokenCache::set`]; any value supplied by the server or
    /// the caller is overwritten.
    #[serde(default, deserialize_with = "deserialize_created_at")]
    pub created_at: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN
}

fn deserialize_token_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_token_type))
}

fn deserialize_expires_in<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(deserialize_seconds(deserializer)?.unwrap_or(DEFAULT_EXPIRES_IN))
}

fn deserialize_created_at<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(deserialize_seconds(deserializer)?.unwrap_or_default())
}

/// Non-negative whole seconds; `null` is absent and `3600.0` reads as `3600`
fn deserialize_seconds<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(secs) = number.as_u64() {
        return Ok(Some(secs));
    }
    match number.as_f64() {
        Some(secs) if secs >= 0.0 && secs.fract() == 0.0 && secs <= u64::MAX as f64 => {
            Ok(Some(secs as u64))
        }
        _ => Err(D::Error::custom(format!(
            "expected non-negative whole seconds, got {number}"
        ))),
    }
}

impl TokenRecord {
    /// Create a record with the default token type and lifetime
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: default_token_type(),
            expires_in: DEFAULT_EXPIRES_IN,
            scope: None,
            created_at: 0,
        }
    }

    /// Unix timestamp of the literal expiry
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.created_at.saturating_add(self.expires_in)
    }

    /// Whether the token counts as expired at `now`, applying [`EXPIRY_MARGIN_SECS`]
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expires_at().saturating_sub(EXPIRY_MARGIN_SECS)
    }

    /// Get the Authorization header value
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Single-slot storage for the most recent token
///
/// Holds at most one [`TokenRecord`]. Storing a record replaces the
/// previous one; reading returns nothing once the record is within
/// [`EXPIRY_MARGIN_SECS`] of its expiry.
#[derive(Debug)]
pub struct TokenCache {
    slot: Mutex<Option<TokenRecord>>,
    clock: Arc<dyn Clock>,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache {
    /// Create an empty cache using the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache using a custom clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            clock,
        }
    }

    /// Stamp `created_at` with the current time and store the record,
    /// replacing whatever was stored before. Returns the stored record.
    pub fn set(&self, mut token: TokenRecord) -> TokenRecord {
        token.created_at = self.clock.now();
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.clone());
        token
    }

    /// Get the stored record if it is still valid
    #[must_use]
    pub fn get(&self) -> Option<TokenRecord> {
        let now = self.clock.now();
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|token| !token.is_expired_at(now))
            .cloned()
    }

    /// Get the stored record regardless of expiry
    #[must_use]
    pub fn last(&self) -> Option<TokenRecord> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Drop the stored record. Clearing an empty cache is a no-op.
    pub fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug)]
    struct ManualClock(AtomicU64);

    impl ManualClock {
        fn at(now: u64) -> Arc<Self> {
            Arc::new(Self(AtomicU64::new(now)))
        }

        fn set(&self, now: u64) {
            self.0.store(now, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn token(expires_in: u64) -> TokenRecord {
        TokenRecord {
            expires_in,
            refresh_token: Some("refresh456".to_string()),
            ..TokenRecord::new("access123")
        }
    }

    #[test]
    fn test_set_stamps_created_at() {
        let clock = ManualClock::at(1_000);
        let cache = TokenCache::with_clock(clock.clone());

        let mut record = token(3600);
        record.created_at = 42;
        let stored = cache.set(record);

        assert_eq!(stored.created_at, 1_000);
        assert_eq!(cache.get().map(|t| t.created_at), Some(1_000));
    }

    #[test]
    fn test_get_respects_expiry_margin() {
        let clock = ManualClock::at(1_000);
        let cache = TokenCache::with_clock(clock.clone());
        cache.set(token(3600));

        // Cutoff is 1_000 + 3600 - 30
        clock.set(4_569);
        assert!(cache.get().is_some());

        clock.set(4_570);
        assert!(cache.get().is_none());

        clock.set(10_000);
        assert!(cache.get().is_none());
        assert!(cache.last().is_some(), "expired record stays in the slot");
    }

    #[test]
    fn test_short_lived_token_is_expired_immediately() {
        let clock = ManualClock::at(1_000);
        let cache = TokenCache::with_clock(clock);
        cache.set(token(20));
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_set_replaces_previous_record() {
        let cache = TokenCache::with_clock(ManualClock::at(1_000));
        cache.set(token(3600));
        cache.set(TokenRecord::new("second"));

        let current = cache.get().map(|t| t.access_token);
        assert_eq!(current.as_deref(), Some("second"));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let cache = TokenCache::with_clock(ManualClock::at(1_000));
        cache.clear();
        assert!(cache.get().is_none());

        cache.set(token(3600));
        cache.clear();
        cache.clear();
        assert!(cache.get().is_none());
        assert!(cache.last().is_none());
    }

    #[test]
    fn test_token_record_defaults_from_json() {
        let record: TokenRecord = serde_json::from_str(
            r#"{"access_token":"abc","id_token":"ignored","created_at":7}"#,
        )
        .unwrap();

        assert_eq!(record.access_token, "abc");
        assert_eq!(record.token_type, "Bearer");
        assert_eq!(record.expires_in, DEFAULT_EXPIRES_IN);
        assert_eq!(record.refresh_token, None);
        assert_eq!(record.created_at, 7);
    }

    #[test]
    fn test_token_record_null_fields_take_defaults() {
        let record: TokenRecord = serde_json::from_str(
            r#"{"access_token":"abc","token_type":null,"expires_in":null,"refresh_token":null,"scope":null,"created_at":null}"#,
        )
        .unwrap();

        assert_eq!(record.token_type, "Bearer");
        assert_eq!(record.expires_in, DEFAULT_EXPIRES_IN);
        assert_eq!(record.refresh_token, None);
        assert_eq!(record.scope, None);
        assert_eq!(record.created_at, 0);
    }

    #[test]
    fn test_token_record_whole_float_expires_in() {
        let record: TokenRecord =
            serde_json::from_str(r#"{"access_token":"abc","expires_in":7200.0}"#).unwrap();
        assert_eq!(record.expires_in, 7200);
    }

    #[test]
    fn test_token_record_rejects_fractional_or_negative_expires_in() {
        for body in [
            r#"{"access_token":"abc","expires_in":1.5}"#,
            r#"{"access_token":"abc","expires_in":-10}"#,
            r#"{"access_token":"abc","expires_in":"3600"}"#,
        ] {
            assert!(serde_json::from_str::<TokenRecord>(body).is_err(), "{body}");
        }
    }

    #[test]
    fn test_token_record_requires_access_token() {
        let result = serde_json::from_str::<TokenRecord>(r#"{"expires_in":3600}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_authorization_header() {
        let record = TokenRecord::new("access123");
        assert_eq!(record.authorization_header(), "Bearer access123");
    }
}
