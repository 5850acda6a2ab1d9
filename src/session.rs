//! The signed-in user's access token and what can be read from it

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::LoginResponse;

/// Claims the service puts in its tokens. Only the ones the client reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    /// Username the token was issued for
    pub sub: Option<String>,
    /// Expiry, seconds since the epoch
    pub exp: Option<i64>,
}

/// Read a JWT's payload without checking its signature.
/// The service verifies tokens; the client only needs the identity and expiry.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_login(response: &LoginResponse) -> Self {
        let mut session = Self::restore(response.access_token.clone(), &response.username);
        session.username = response.username.clone();
        session
    }

    /// Rebuild a session from a stored token. The token's own subject wins
    /// over the stored username when present.
    pub fn restore(token: String, stored_username: &str) -> Self {
        let claims = decode_claims(&token).unwrap_or_default();
        let username = claims.sub.unwrap_or_else(|| stored_username.to_string());
        let expires_at = claims.exp.and_then(|exp| DateTime::from_timestamp(exp, 0));
        Self { token, username, expires_at }
    }

    /// Tokens without an expiry never expire client-side
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token_with(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn reads_subject_and_expiry() {
        let token = token_with(r#"{"sub":"alice","exp":1771286400,"fresh":false}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("alice"));
        assert_eq!(claims.exp, Some(1_771_286_400));
    }

    #[test]
    fn malformed_tokens_have_no_claims() {
        assert!(decode_claims("not-a-jwt").is_none());
        assert!(decode_claims("a.!!!.c").is_none());
    }

    #[test]
    fn restore_prefers_token_subject() {
        let session = Session::restore(token_with(r#"{"sub":"alice"}"#), "bob");
        assert_eq!(session.username, "alice");
        assert!(session.expires_at.is_none());

        let session = Session::restore("opaque".to_string(), "bob");
        assert_eq!(session.username, "bob");
    }

    #[test]
    fn expiry() {
        let session = Session::restore(token_with(r#"{"sub":"alice","exp":1771286400}"#), "");
        let before = Utc.with_ymd_and_hms(2026, 2, 16, 0, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 2, 18, 0, 0, 0).unwrap();
        assert!(!session.is_expired(before));
        assert!(session.is_expired(after));
        assert!(!Session::restore("opaque".into(), "bob").is_expired(after));
    }
}
