use thiserror::Error;

/// Stable, machine-readable identifiers for [`ApiError`] variants.
///
/// Screens and logs match on these, never on the display message.
pub mod error_code {
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const ACCOUNT_DISABLED: &str = "ACCOUNT_DISABLED";
    pub const EMAIL_NOT_FOUND: &str = "EMAIL_NOT_FOUND";
    pub const INVALID_CODE: &str = "INVALID_CODE";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const DUPLICATE_EMAIL: &str = "DUPLICATE_EMAIL";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const NETWORK: &str = "NETWORK";
    pub const SERVICE: &str = "SERVICE";
    pub const STORAGE: &str = "STORAGE";
}

/// Client-side API error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials rejected by the token endpoint.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but the backend refuses to sign it in.
    #[error("account disabled")]
    AccountDisabled,

    #[error("email not found")]
    EmailNotFound,

    #[error("invalid recovery code")]
    InvalidCode,

    /// Field or format check failed. Raised before any request when the
    /// check is local.
    #[error("validation: {0}")]
    Validation(String),

    #[error("email already registered")]
    DuplicateEmail,

    /// The backend no longer accepts the session token.
    #[error("session unauthorized")]
    Unauthorized,

    /// No response could be obtained.
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a status this call does not expect.
    #[error("HTTP {status}: {message}")]
    Service { status: u16, message: String },

    /// The backend answered 2xx with a body this client cannot read.
    #[error("decode: {0}")]
    Decode(String),

    #[error("token storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials => error_code::INVALID_CREDENTIALS,
            ApiError::AccountDisabled => error_code::ACCOUNT_DISABLED,
            ApiError::EmailNotFound => error_code::EMAIL_NOT_FOUND,
            ApiError::InvalidCode => error_code::INVALID_CODE,
            ApiError::Validation(_) => error_code::VALIDATION_FAILED,
            ApiError::DuplicateEmail => error_code::DUPLICATE_EMAIL,
            ApiError::Unauthorized => error_code::UNAUTHENTICATED,
            ApiError::Network(_) => error_code::NETWORK,
            ApiError::Service { .. } | ApiError::Decode(_) => error_code::SERVICE,
            ApiError::Storage(_) => error_code::STORAGE,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
