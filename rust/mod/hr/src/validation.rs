//! Field rules checked before any request leaves the client.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// At least two name tokens.
pub fn is_full_name(name: &str) -> bool {
    name.split_whitespace().nth(1).is_some()
}

/// Live pass/fail per password rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChecks {
    pub min_length: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub special: bool,
    pub matches: bool,
}

impl PasswordChecks {
    pub fn evaluate(password: &str, confirmation: &str) -> Self {
        Self {
            min_length: password.chars().count() >= MIN_PASSWORD_LEN,
            uppercase: password.chars().any(char::is_uppercase),
            digit: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| !c.is_alphanumeric()),
            matches: !password.is_empty() && password == confirmation,
        }
    }

    /// The four strength rules, ignoring confirmation.
    pub fn policy_passes(&self) -> bool {
        self.min_length && self.uppercase && self.digit && self.special
    }

    pub fn all_pass(&self) -> bool {
        self.policy_passes() && self.matches
    }

    /// First failing rule as a validation error.
    pub fn check(&self) -> Result<(), FlowError> {
        if !self.policy_passes() {
            Err(FlowError::validation("error/password-policy"))
        } else if !self.matches {
            Err(FlowError::validation("error/password-mismatch"))
        } else {
            Ok(())
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), FlowError> {
    if email.trim().is_empty() {
        return Err(FlowError::required("email"));
    }
    if !is_valid_email(email.trim()) {
        return Err(FlowError::validation("error/email-format"));
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FlowError> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(FlowError::required("senha"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FlowError::validation("error/password-length"));
    }
    Ok(())
}
