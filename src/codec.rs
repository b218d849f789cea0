use crate::config::CodecConfig;
use crate::digest;
use crate::error::{CsrfError, Result};
use crate::secret::Secret;
use crate::wire;
use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;

/// Issues and verifies tokens with one secret and one configuration
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: CodecConfig,
    secret: Secret,
}

impl TokenCodec {
    /// Create a new codec
    pub fn new(config: CodecConfig, secret: impl Into<Secret>) -> Result<Self> {
        config.validate()?;

        let secret = secret.into();
        if secret.len() < config.min_secret_len {
            return Err(CsrfError::InvalidConfig(format!(
                "Secret key must be at least {} bytes",
                config.min_secret_len
            )));
        }

        Ok(Self { config, secret })
    }

    /// Get the configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Issue a token for `session_id` that expires at `expire_at`.
    ///
    /// The expiration is not checked against the current time, so an
    /// already-expired token can be issued. Sub-second precision is dropped.
    pub fn issue(&self, session_id: &str, expire_at: DateTime<Utc>) -> String {
        issue_token(
            session_id,
            expire_at,
            self.secret.as_bytes(),
            self.config.separator,
        )
    }

    /// Issue a token that expires `token_ttl` seconds from now
    pub fn issue_with_ttl(&self, session_id: &str) -> String {
        let expire_at = Duration::try_seconds(self.config.token_ttl)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.issue(session_id, expire_at)
    }

    /// Verify `token` for `session_id` at the instant `now`.
    ///
    /// Malformed, expired and forged tokens are all reported as `false`.
    #[must_use]
    pub fn verify(&self, token: &str, session_id: &str, now: DateTime<Utc>) -> bool {
        verify_token(
            token,
            session_id,
            now,
            self.secret.as_bytes(),
            self.config.separator,
        )
    }

    /// Verify `token` against the current time
    #[must_use]
    pub fn verify_now(&self, token: &str, session_id: &str) -> bool {
        self.verify(token, session_id, Utc::now())
    }

    /// Read the expiration of a token without authenticating it.
    ///
    /// The result is attacker-controlled; only use it to decide when to hand
    /// out a fresh token, never to accept one.
    pub fn expires_at(&self, token: &str) -> Option<DateTime<Utc>> {
        let parsed = wire::decode(token, self.config.separator).ok()?;
        DateTime::from_timestamp(parsed.expires_at, 0)
    }
}

pub(crate) fn issue_token(
    session_id: &str,
    expire_at: DateTime<Utc>,
    secret: &[u8],
    separator: char,
) -> String {
    let timestamp = expire_at.timestamp().to_string();
    let content = digest::content(session_id, &timestamp);
    let digest = digest::digest(&content, secret);

    tracing::trace!(expires_at = %timestamp, "issued CSRF token");

    wire::encode(&digest, separator, &timestamp)
}

pub(crate) fn verify_token(
    token: &str,
    session_id: &str,
    now: DateTime<Utc>,
    secret: &[u8],
    separator: char,
) -> bool {
    match check(token, session_id, now, secret, separator) {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(reason = e.reason(), "rejected CSRF token");
            false
        }
    }
}

/// Run every check in order and return the verified expiration timestamp.
fn check(
    token: &str,
    session_id: &str,
    now: DateTime<Utc>,
    secret: &[u8],
    separator: char,
) -> Result<i64> {
    let parsed = wire::decode(token, separator)?;

    if is_expired(parsed.expires_at, now) {
        return Err(CsrfError::TokenExpired);
    }

    // Sign the timestamp text as received, not a re-rendered value.
    let expected = digest::digest(&digest::content(session_id, parsed.timestamp), secret);

    if bool::from(parsed.digest.as_bytes().ct_eq(expected.as_bytes())) {
        Ok(parsed.expires_at)
    } else {
        Err(CsrfError::SignatureMismatch)
    }
}

/// Whether the instant `expires_at` (whole seconds) lies strictly before `now`.
fn is_expired(expires_at: i64, now: DateTime<Utc>) -> bool {
    let now_secs = now.timestamp();
    expires_at < now_secs || (expires_at == now_secs && now.timestamp_subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SESSION: &str = "user1-login";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(CodecConfig::default(), "LoremIpsum123").unwrap()
    }

    #[test]
    fn test_issue_layout() {
        let token = codec().issue(SESSION, at(1_700_000_300));
        let (digest, timestamp) = token.split_once('.').unwrap();
        assert_eq!(digest.len(), digest::DIGEST_HEX_LEN);
        assert_eq!(timestamp, "1700000300");
    }

    #[test]
    fn test_issue_truncates_subseconds() {
        let expire_at = Utc.timestamp_opt(1_700_000_300, 999_999_999).unwrap();
        let codec = codec();
        assert_eq!(codec.issue(SESSION, expire_at), codec.issue(SESSION, at(1_700_000_300)));
    }

    #[test]
    fn test_check_reasons() {
        let secret = b"LoremIpsum123";
        let token = issue_token(SESSION, at(100), secret, '.');

        assert_eq!(check(&token, SESSION, at(100), secret, '.'), Ok(100));
        assert_eq!(
            check(&token, SESSION, at(101), secret, '.'),
            Err(CsrfError::TokenExpired)
        );
        assert_eq!(
            check(&token, "user2-login", at(50), secret, '.'),
            Err(CsrfError::SignatureMismatch)
        );
        assert!(matches!(
            check("nope", SESSION, at(50), secret, '.'),
            Err(CsrfError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_expiry_checked_before_signature() {
        // An expired token with a bogus digest reports expiry, not mismatch.
        assert_eq!(
            check("deadbeef.10", SESSION, at(11), b"k", '.'),
            Err(CsrfError::TokenExpired)
        );
    }

    #[test]
    fn test_is_expired_boundary() {
        assert!(!is_expired(100, at(99)));
        assert!(!is_expired(100, at(100)));
        assert!(is_expired(100, Utc.timestamp_opt(100, 1).unwrap()));
        assert!(is_expired(100, at(101)));
    }

    #[test]
    fn test_is_expired_extreme_timestamps() {
        assert!(!is_expired(i64::MAX, at(1_700_000_000)));
        assert!(is_expired(i64::MIN, at(1_700_000_000)));
    }

    #[test]
    fn test_custom_separator() {
        let codec = TokenCodec::new(CodecConfig::new().with_separator('~'), "secret").unwrap();
        let token = codec.issue(SESSION, at(200));
        assert!(token.contains('~'));
        assert!(!token.contains('.'));
        assert!(codec.verify(&token, SESSION, at(200)));

        // A codec with a different separator cannot parse the token.
        let dotted = TokenCodec::new(CodecConfig::new(), "secret").unwrap();
        assert!(!dotted.verify(&token, SESSION, at(200)));
    }

    #[test]
    fn test_new_rejects_short_secret() {
        let config = CodecConfig::new().with_min_secret_len(32);
        assert!(TokenCodec::new(config.clone(), "short").is_err());
        assert!(TokenCodec::new(config, Secret::generate()).is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        for sep in ['a', '§'] {
            let config = CodecConfig::new().with_separator(sep);
            assert!(matches!(
                TokenCodec::new(config, "secret"),
                Err(CsrfError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_issue_with_ttl_and_verify_now() {
        let codec = TokenCodec::new(CodecConfig::new().with_token_ttl(300), "secret").unwrap();
        let before = Utc::now().timestamp();
        let token = codec.issue_with_ttl(SESSION);

        let expires_at = codec.expires_at(&token).unwrap().timestamp();
        assert!(expires_at >= before + 300);
        assert!(expires_at <= Utc::now().timestamp() + 300);
        assert!(codec.verify_now(&token, SESSION));
    }

    #[test]
    fn test_expires_at() {
        let codec = codec();
        let token = codec.issue(SESSION, at(1_700_000_300));
        assert_eq!(codec.expires_at(&token), Some(at(1_700_000_300)));
        assert_eq!(codec.expires_at("garbage"), None);
        assert_eq!(codec.expires_at(&format!("abc.{}", i64::MAX)), None);
    }
}
