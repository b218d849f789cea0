//! Keyed hash over the canonical token content.
//!
//! Tokens are authenticated with HMAC over SHA-512/224. The digest is rendered
//! as lowercase hex, so it never contains a wire separator.

use hmac::{Hmac, Mac};
use sha2::Sha512_224;

type HmacSha512_224 = Hmac<Sha512_224>;

/// Joins the session id and the expiration timestamp inside the signed content.
pub const CONTENT_JOINER: char = '|';

/// Length of a rendered digest in hex characters.
pub const DIGEST_HEX_LEN: usize = 56;

/// Build the canonical content string `session_id|timestamp`.
pub fn content(session_id: &str, timestamp: &str) -> String {
    let mut content = String::with_capacity(session_id.len() + timestamp.len() + 1);
    content.push_str(session_id);
    content.push(CONTENT_JOINER);
    content.push_str(timestamp);
    content
}

/// Compute the hex-encoded HMAC-SHA-512/224 of `content` keyed by `secret`.
///
/// Any key length is accepted; HMAC hashes or pads the key internally.
pub fn digest(content: &str, secret: &[u8]) -> String {
    let mut mac = <HmacSha512_224 as Mac>::new_from_slice(secret)
        .expect("HMAC can take key of any size");
    mac.update(content.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
