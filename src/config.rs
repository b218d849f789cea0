use crate::error::{CsrfError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Prefix of the environment variables read by [`CodecConfig::from_env`]
pub const ENV_PREFIX: &str = "HMAC_CSRF";

/// Token codec configuration
///
/// Issuer and verifier must agree on the separator; the other settings only
/// affect the issuing side or codec construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Character between the digest and the expiration timestamp
    pub separator: char,

    /// Token time-to-live in seconds, used by `issue_with_ttl`
    pub token_ttl: i64,

    /// Minimum secret length in bytes accepted by the codec
    pub min_secret_len: usize,
}

impl CodecConfig {
    /// Separator used when none is configured
    pub const DEFAULT_SEPARATOR: char = '.';

    /// TTL used when none is configured (1 hour)
    pub const DEFAULT_TOKEN_TTL: i64 = 3600;

    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            separator: Self::DEFAULT_SEPARATOR,
            token_ttl: Self::DEFAULT_TOKEN_TTL,
            min_secret_len: 0,
        }
    }

    /// Load configuration from `HMAC_CSRF_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Some(separator) = env_var::<char>("SEPARATOR")? {
            config.separator = separator;
        }
        if let Some(ttl) = env_var::<i64>("TOKEN_TTL")? {
            config.token_ttl = ttl;
        }
        if let Some(len) = env_var::<usize>("MIN_SECRET_LEN")? {
            config.min_secret_len = len;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Set token TTL
    pub fn with_token_ttl(mut self, ttl_seconds: i64) -> Self {
        self.token_ttl = ttl_seconds;
        self
    }

    /// Set minimum secret length
    pub fn with_min_secret_len(mut self, len: usize) -> Self {
        self.min_secret_len = len;
        self
    }

    /// Check that tokens produced with this configuration can be parsed back.
    pub fn validate(&self) -> Result<()> {
        let sep = self.separator;

        // The separator must never occur inside a digest or a timestamp.
        if sep.is_ascii_hexdigit() || sep == '-' || sep == '+' {
            return Err(CsrfError::InvalidConfig(format!(
                "separator {:?} collides with digest or timestamp characters",
                sep
            )));
        }

        if sep == crate::digest::CONTENT_JOINER {
            return Err(CsrfError::InvalidConfig(format!(
                "separator {:?} is reserved for token content",
                sep
            )));
        }

        if !sep.is_ascii_graphic() {
            return Err(CsrfError::InvalidConfig(
                "separator must be a visible ASCII character".to_string(),
            ));
        }

        if self.token_ttl <= 0 {
            return Err(CsrfError::InvalidConfig(
                "token TTL must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    let name = format!("{}_{}", ENV_PREFIX, key);
    match env::var(&name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CsrfError::InvalidConfig(format!("{} has an invalid value", name))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(CsrfError::InvalidConfig(format!("{}: {}", name, e))),
    }
}
