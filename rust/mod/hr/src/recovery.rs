//! Password recovery: the stage machine, the backend seam it drives, and
//! the resend cooldown.
//!
//! ```text
//! RequestCode ──code sent──▶ VerifyCode{email} ──code ok──▶ SetNewPassword{email}
//!                              │    ▲                              │
//!                              └────┘ resend (cooldown at 0)       └─▶ login
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pointer_client::{ApiError, IdentityClient};
use pointer_flux::StateStore;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::error::FlowError;
use crate::guard::Route;
use crate::state::ResendCooldown;

// ── Stages ──────────────────────────────────────────────────────────

/// Each stage carries what it needs; a stage past the first cannot exist
/// without the email collected in the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryStage {
    #[default]
    RequestCode,
    VerifyCode { email: String },
    SetNewPassword { email: String },
}

impl RecoveryStage {
    pub fn name(&self) -> &'static str {
        match self {
            RecoveryStage::RequestCode => "REQUEST_CODE",
            RecoveryStage::VerifyCode { .. } => "VERIFY_CODE",
            RecoveryStage::SetNewPassword { .. } => "SET_NEW_PASSWORD",
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            RecoveryStage::RequestCode => None,
            RecoveryStage::VerifyCode { email } | RecoveryStage::SetNewPassword { email } => {
                Some(email)
            }
        }
    }

    pub fn route(&self) -> Route {
        match self {
            RecoveryStage::RequestCode => Route::ForgotPassword,
            RecoveryStage::VerifyCode { .. } => Route::VerifyCode,
            RecoveryStage::SetNewPassword { .. } => Route::ResetPassword,
        }
    }

    /// Later stages with a blank email fall back to the first.
    pub fn normalized(self) -> Self {
        match self.email() {
            Some(email) if email.trim().is_empty() => RecoveryStage::RequestCode,
            _ => self,
        }
    }

    /// `RequestCode` → `VerifyCode` once a code was dispatched to `email`.
    pub fn code_sent(&self, email: &str) -> Result<Self, FlowError> {
        match self {
            RecoveryStage::RequestCode if !email.trim().is_empty() => {
                Ok(RecoveryStage::VerifyCode {
                    email: email.trim().to_string(),
                })
            }
            RecoveryStage::RequestCode => Err(FlowError::required("email")),
            other => Err(FlowError::InvalidTransition {
                from: other.name(),
                event: "send a code",
            }),
        }
    }

    /// `VerifyCode` → `SetNewPassword`, keeping the email.
    pub fn code_verified(&self) -> Result<Self, FlowError> {
        match self.clone().normalized() {
            RecoveryStage::VerifyCode { email } => Ok(RecoveryStage::SetNewPassword { email }),
            other => Err(FlowError::InvalidTransition {
                from: other.name(),
                event: "verify a code",
            }),
        }
    }
}

// ── Backend seam ────────────────────────────────────────────────────

/// The three recovery calls. Implemented by [`IdentityClient`].
#[async_trait]
pub trait RecoveryService: Send + Sync + 'static {
    async fn request_password_code(&self, email: &str) -> Result<(), ApiError>;
    async fn verify_code(&self, email: &str, code: &str) -> Result<(), ApiError>;
    async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl RecoveryService for IdentityClient {
    async fn request_password_code(&self, email: &str) -> Result<(), ApiError> {
        IdentityClient::request_password_code(self, email).await
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        IdentityClient::verify_code(self, email, code).await
    }

    async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), ApiError> {
        IdentityClient::reset_password(self, email, new_password).await
    }
}

// ── Cooldown ────────────────────────────────────────────────────────

const TICK: Duration = Duration::from_secs(1);

/// Resend countdown. The deadline is authoritative; a ticker task mirrors
/// the remaining seconds into [`ResendCooldown`] once per second and is
/// aborted on restart, cancel and drop.
pub struct Cooldown {
    period: Duration,
    deadline: Option<Instant>,
    ticker: Option<JoinHandle<()>>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
            ticker: None,
        }
    }

    /// Whole seconds left, rounded up. Zero when idle.
    pub fn remaining_secs(&self) -> u64 {
        self.deadline
            .map_or(0, |d| ceil_secs(d.saturating_duration_since(Instant::now())))
    }

    pub fn is_ready(&self) -> bool {
        self.remaining_secs() == 0
    }

    /// Start over from the full period, whatever the current count.
    pub fn restart(&mut self, store: Arc<StateStore>) {
        self.cancel();
        let deadline = Instant::now() + self.period;
        self.deadline = Some(deadline);
        store.set(
            ResendCooldown::PATH,
            ResendCooldown {
                remaining_secs: ceil_secs(self.period),
            },
        );
        self.ticker = Some(tokio::spawn(tick(deadline, store)));
        debug!(secs = self.period.as_secs(), "resend cooldown restarted");
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.deadline = None;
    }
}

impl Drop for Cooldown {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn tick(deadline: Instant, store: Arc<StateStore>) {
    let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
    loop {
        interval.tick().await;
        let remaining_secs = ceil_secs(deadline.saturating_duration_since(Instant::now()));
        store.set(ResendCooldown::PATH, ResendCooldown { remaining_secs });
        if remaining_secs == 0 {
            debug!("resend cooldown elapsed");
            break;
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    (d.as_millis() as u64).div_ceil(1000)
}
