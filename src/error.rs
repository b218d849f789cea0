use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsrfError {
    #[error("Malformed CSRF token: {0}")]
    MalformedToken(&'static str),

    #[error("CSRF token expired")]
    TokenExpired,

    #[error("CSRF token signature mismatch")]
    SignatureMismatch,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CsrfError {
    /// Short reason used in diagnostic events.
    pub(crate) fn reason(&self) -> &'static str {
        match self {
            CsrfError::MalformedToken(_) => "malformed",
            CsrfError::TokenExpired => "expired",
            CsrfError::SignatureMismatch => "signature mismatch",
            CsrfError::InvalidConfig(_) => "invalid config",
        }
    }
}

pub type Result<T> = std::result::Result<T, CsrfError>;
