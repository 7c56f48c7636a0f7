//! Utility functions for the Kerliix OAuth client
//!
//! Error bodies from misbehaving servers can be large HTML pages. They are
//! only ever logged as a bounded preview cut at a UTF-8 character boundary.

/// Maximum number of bytes of a raw response body included in log events
pub const BODY_PREVIEW_BYTES: usize = 256;

/// Safely truncate a string at a UTF-8 character boundary.
///
/// Returns a slice of at most `max_bytes` bytes.
///
/// # Example
/// ```
/// use kerliix_oauth::utils::safe_truncate;
///
/// // 'é' is 2 bytes - cutting at byte 4 would split it
/// assert_eq!(safe_truncate("Café", 4), "Caf");
/// ```
#[inline]
#[must_use]
pub fn safe_truncate(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut boundary = max_bytes;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    &s[..boundary]
}

/// Single-line preview of a response body for log output.
///
/// Whitespace runs collapse to one space and the result is capped at
/// [`BODY_PREVIEW_BYTES`], with "..." appended when truncated.
#[must_use]
pub fn body_preview(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated = safe_truncate(&flat, BODY_PREVIEW_BYTES);
    if truncated.len() < flat.len() {
        format!("{truncated}...")
    } else {
        flat
    }
}
