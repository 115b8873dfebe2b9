//! Requests a renderer can emit, one path each.

use pointer_client::UserFilters;
use serde::{Deserialize, Serialize};

/// Restore a persisted session, if any.
pub struct InitializeReq;
impl InitializeReq {
    pub const PATH: &'static str = "app/initialize";
}

/// Navigate; the guard decides where we actually land.
pub struct NavigateReq {
    pub path: String,
}
impl NavigateReq {
    pub const PATH: &'static str = "app/navigate";
}

pub struct LoginReq {
    pub email: String,
    pub password: String,
}
impl LoginReq {
    pub const PATH: &'static str = "auth/login";
}

pub struct LogoutReq;
impl LogoutReq {
    pub const PATH: &'static str = "auth/logout";
}

// ── Recovery ────────────────────────────────────────────────────────

/// Enter the recovery flow at its first step.
pub struct StartRecoveryReq;
impl StartRecoveryReq {
    pub const PATH: &'static str = "recovery/start";
}

pub struct RequestCodeReq {
    pub email: String,
}
impl RequestCodeReq {
    pub const PATH: &'static str = "recovery/request-code";
}

pub struct VerifyCodeReq {
    pub code: String,
}
impl VerifyCodeReq {
    pub const PATH: &'static str = "recovery/verify-code";
}

pub struct ResendCodeReq;
impl ResendCodeReq {
    pub const PATH: &'static str = "recovery/resend";
}

/// Keystroke in the new-password fields; refreshes the live checks.
pub struct EditRecoveryPasswordReq {
    pub password: String,
    pub confirmation: String,
}
impl EditRecoveryPasswordReq {
    pub const PATH: &'static str = "recovery/edit-password";
}

pub struct ResetPasswordReq {
    pub password: String,
    pub confirmation: String,
}
impl ResetPasswordReq {
    pub const PATH: &'static str = "recovery/reset";
}

/// Leave the flow; stops the cooldown.
pub struct CancelRecoveryReq;
impl CancelRecoveryReq {
    pub const PATH: &'static str = "recovery/cancel";
}

// ── User console ────────────────────────────────────────────────────

/// Reload the current page.
pub struct LoadUsersReq;
impl LoadUsersReq {
    pub const PATH: &'static str = "users/load";
}

/// Replace the filters and go back to the first page.
pub struct SetFiltersReq {
    pub filters: UserFilters,
}
impl SetFiltersReq {
    pub const PATH: &'static str = "users/filter";
}

pub struct NextPageReq;
impl NextPageReq {
    pub const PATH: &'static str = "users/next-page";
}

pub struct PrevPageReq;
impl PrevPageReq {
    pub const PATH: &'static str = "users/prev-page";
}

pub struct ToggleStatusReq {
    pub email: String,
}
impl ToggleStatusReq {
    pub const PATH: &'static str = "users/toggle-status";
}

pub struct DismissToastReq;
impl DismissToastReq {
    pub const PATH: &'static str = "users/dismiss-toast";
}

// ── User form ───────────────────────────────────────────────────────

pub struct OpenCreateFormReq;
impl OpenCreateFormReq {
    pub const PATH: &'static str = "users/form/open-create";
}

pub struct OpenEditFormReq {
    pub email: String,
}
impl OpenEditFormReq {
    pub const PATH: &'static str = "users/form/open-edit";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Nome,
    Email,
    Cargo,
    Setor,
    TipoUsuario,
    Status,
}

pub struct EditFieldReq {
    pub field: FormField,
    pub value: String,
}
impl EditFieldReq {
    pub const PATH: &'static str = "users/form/edit";
}

pub struct SubmitFormReq;
impl SubmitFormReq {
    pub const PATH: &'static str = "users/form/submit";
}

pub struct CloseFormReq;
impl CloseFormReq {
    pub const PATH: &'static str = "users/form/close";
}

// ── Profile ─────────────────────────────────────────────────────────

pub struct LoadProfileReq;
impl LoadProfileReq {
    pub const PATH: &'static str = "profile/load";
}

pub struct EditProfilePasswordReq {
    pub password: String,
    pub confirmation: String,
}
impl EditProfilePasswordReq {
    pub const PATH: &'static str = "profile/edit-password";
}

pub struct ChangePasswordReq {
    pub password: String,
    pub confirmation: String,
}
impl ChangePasswordReq {
    pub const PATH: &'static str = "profile/change-password";
}
