//! Wire format: `<digest-hex><separator><expiration-epoch-seconds>`.

use crate::error::{CsrfError, Result};

/// A token split into its two segments.
///
/// Nothing here is authenticated yet; the digest is whatever the client sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireToken<'a> {
    /// Candidate digest, taken as-is
    pub digest: &'a str,

    /// Expiration segment exactly as it appeared on the wire
    pub timestamp: &'a str,

    /// Expiration in seconds since the Unix epoch
    pub expires_at: i64,
}

/// Join a digest and an expiration timestamp into a token.
pub fn encode(digest: &str, separator: char, timestamp: &str) -> String {
    let mut token = String::with_capacity(digest.len() + separator.len_utf8() + timestamp.len());
    token.push_str(digest);
    token.push(separator);
    token.push_str(timestamp);
    token
}

/// Split a token into exactly two segments and parse the expiration.
///
/// Tokens without a separator or with more than one are rejected; this is not
/// a split on the first occurrence.
pub fn decode(token: &str, separator: char) -> Result<WireToken<'_>> {
    let mut parts = token.split(separator);

    let (Some(digest), Some(timestamp), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CsrfError::MalformedToken("expected exactly two segments"));
    };

    let expires_at = timestamp
        .parse::<i64>()
        .map_err(|_| CsrfError::MalformedToken("expiration is not an integer"))?;

    Ok(WireToken {
        digest,
        timestamp,
        expires_at,
    })
}
