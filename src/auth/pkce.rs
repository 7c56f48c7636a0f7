//! PKCE (RFC 7636) verifier and S256 challenge generation

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes behind a code verifier
const VERIFIER_BYTES: usize = 32;

/// Code challenge method sent alongside the challenge
pub const CODE_CHALLENGE_METHOD: &str = "S256";

/// PKCE code challenge data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    /// Code verifier (kept by the client until the code exchange)
    pub verifier: String,
    /// Code challenge (SHA-256 hash of verifier, base64url encoded)
    pub challenge: String,
}

impl PkceChallenge {
    /// Generate a verifier from 32 cryptographically random bytes
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; VERIFIER_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self::from_verifier(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Derive the challenge for an existing verifier
    #[must_use]
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = code_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// BASE64URL(SHA256(verifier)) without padding
#[must_use]
pub fn code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_base64url(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    #[test]
    fn test_generated_lengths() {
        let pkce = PkceChallenge::generate();
        // 32 bytes and a SHA-256 digest both encode to 43 chars
        assert_eq!(pkce.verifier.len(), 43);
        assert_eq!(pkce.challenge.len(), 43);
        assert!(is_base64url(&pkce.verifier));
        assert!(is_base64url(&pkce.challenge));
        assert!(!pkce.challenge.contains('='));
    }

    #[test]
    fn test_challenge_matches_verifier() {
        let pkce = PkceChallenge::generate();
        assert_eq!(pkce.challenge, code_challenge(&pkce.verifier));
    }

    #[test]
    fn test_rfc7636_appendix_b_vector() {
        let pkce = PkceChallenge::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(pkce.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_verifiers_are_unique() {
        let a = PkceChallenge::generate();
        let b = PkceChallenge::generate();
        assert_ne!(a.verifier, b.verifier);
    }
}
