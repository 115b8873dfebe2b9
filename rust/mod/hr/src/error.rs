use pointer_client::ApiError;

/// Failures surfaced by screen handlers.
///
/// Every variant maps to a message-catalog key through
/// [`FlowError::message_key`]; handlers store the translated text in the
/// screen's state instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Client-side rule violation. Carries the catalog key, with arguments
    /// in query form (`error/required?field=nome`).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("cannot {event} from recovery step {from}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },

    #[error("resend available in {0}s")]
    CooldownActive(u64),

    #[error("not signed in")]
    SignedOut,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FlowError {
    pub fn validation(key: impl Into<String>) -> Self {
        FlowError::Validation(key.into())
    }

    pub fn required(field: &str) -> Self {
        FlowError::Validation(format!("error/required?field={field}"))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FlowError::Api(e) if e.is_unauthorized())
    }

    pub fn message_key(&self) -> String {
        match self {
            FlowError::Validation(key) => key.clone(),
            FlowError::InvalidTransition { .. } => "error/invalid-step".into(),
            FlowError::CooldownActive(secs) => format!("error/cooldown?seconds={secs}"),
            FlowError::SignedOut => "error/session-expired".into(),
            FlowError::Api(e) => match e {
                ApiError::InvalidCredentials => "error/invalid-credentials".into(),
                ApiError::AccountDisabled => "error/account-disabled".into(),
                ApiError::EmailNotFound => "error/email-not-found".into(),
                ApiError::InvalidCode => "error/invalid-code".into(),
                ApiError::DuplicateEmail => "error/email-taken".into(),
                ApiError::Unauthorized => "error/session-expired".into(),
                ApiError::Network(_) => "error/network".into(),
                ApiError::Validation(_) => "error/validation".into(),
                ApiError::Service { .. } | ApiError::Decode(_) | ApiError::Storage(_) => {
                    "error/service".into()
                }
            },
        }
    }
}
