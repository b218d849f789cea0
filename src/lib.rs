//! # HMAC CSRF Tokens
//!
//! Stateless anti-forgery tokens bound to a session id and an expiration
//! instant, authenticated with HMAC-SHA-512/224.
//!
//! ## Features
//!
//! - ✅ **Stateless** - Nothing is stored server-side; the token carries its own expiration
//! - ✅ **Session Binding** - Tokens only verify for the session id they were issued for
//! - ✅ **Signed Tokens** - HMAC-SHA-512/224 over the session id and expiration
//! - ✅ **Constant-time Comparison** - Digests are compared with `subtle`
//! - ✅ **Configurable** - Separator, default TTL and minimum secret length
//!
//! ## Token Format
//!
//! ```text
//! <56 lowercase hex digest chars>.<expiration epoch seconds>
//! ```
//!
//! The digest covers `session_id|expiration`. Verification fails for malformed
//! tokens, expired tokens and tokens whose digest does not match; the caller
//! is never told which.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{Duration, Utc};
//!
//! let now = Utc::now();
//! let token = hmac_csrf::issue("user1-login", now + Duration::minutes(5), "S3cret");
//!
//! assert!(hmac_csrf::verify(&token, "user1-login", now, "S3cret"));
//! assert!(!hmac_csrf::verify(&token, "user2-login", now, "S3cret"));
//! assert!(!hmac_csrf::verify(&token, "user1-login", now + Duration::minutes(6), "S3cret"));
//! ```
//!
//! ## Using a Codec
//!
//! ```rust
//! use hmac_csrf::{CodecConfig, Secret, TokenCodec};
//!
//! let config = CodecConfig::new()
//!     .with_token_ttl(1800)
//!     .with_min_secret_len(32);
//! let codec = TokenCodec::new(config, Secret::generate()).unwrap();
//!
//! let token = codec.issue_with_ttl("user1-transfer");
//! assert!(codec.verify_now(&token, "user1-transfer"));
//! ```
//!
//! Session ids should be unique per user and operation, for example a hash of
//! the session identifier and the operation name. Deriving them, storing the
//! secret and moving the token through forms or headers is up to the host
//! application.

pub mod codec;
pub mod config;
pub mod digest;
pub mod error;
pub mod secret;
pub mod wire;

pub use codec::TokenCodec;
pub use config::CodecConfig;
pub use error::{CsrfError, Result};
pub use secret::Secret;

use chrono::{DateTime, Utc};

/// Issue a token with the default separator.
///
/// `secret` is used as raw UTF-8 key bytes.
pub fn issue(session_id: &str, expire_at: DateTime<Utc>, secret: &str) -> String {
    codec::issue_token(
        session_id,
        expire_at,
        secret.as_bytes(),
        CodecConfig::DEFAULT_SEPARATOR,
    )
}

/// Verify a token issued by [`issue`].
#[must_use]
pub fn verify(token: &str, session_id: &str, now: DateTime<Utc>, secret: &str) -> bool {
    codec::verify_token(
        token,
        session_id,
        now,
        secret.as_bytes(),
        CodecConfig::DEFAULT_SEPARATOR,
    )
}
