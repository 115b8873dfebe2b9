//! Screen state, one value per store path. Renderers read these; only
//! handlers write them.

use pointer_client::{Identity, ManagedUser, UserDraft, UserFilters, UserStatus, UserType};
use serde::{Deserialize, Serialize};

use crate::guard::Route;
use crate::nav::MenuItem;
use crate::recovery::RecoveryStage;
use crate::validation::PasswordChecks;

// ── Session ─────────────────────────────────────────────────────────

/// Stored at `auth/state`. `identity` is set exactly when a session token
/// is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// One-shot confirmation shown on the login screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl AuthState {
    pub const PATH: &'static str = "auth/state";

    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Default::default()
        }
    }

    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            error: Some(message),
            ..Default::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Current location, stored at `app/route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoute(pub String);

impl AppRoute {
    pub const PATH: &'static str = "app/route";

    pub fn to(route: Route) -> Self {
        AppRoute(route.path().to_string())
    }
}

/// Authenticated chrome: avatar initial, email and the translated menu.
/// Stored at `app/shell` while signed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellState {
    pub initial: String,
    pub display_name: String,
    pub email: String,
    pub menu: Vec<MenuItem>,
}

impl ShellState {
    pub const PATH: &'static str = "app/shell";
}

// ── Password recovery ───────────────────────────────────────────────

/// Stored at `recovery/state`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryState {
    pub stage: RecoveryStage,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub checks: PasswordChecks,
}

impl RecoveryState {
    pub const PATH: &'static str = "recovery/state";
}

/// Seconds until a code may be resent. Stored at `recovery/cooldown` and
/// refreshed once per second while counting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendCooldown {
    pub remaining_secs: u64,
}

impl ResendCooldown {
    pub const PATH: &'static str = "recovery/cooldown";

    pub fn can_resend(&self) -> bool {
        self.remaining_secs == 0
    }
}

// ── User console ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsolePhase {
    #[default]
    Idle,
    Loading,
    Error,
    Empty,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: String) -> Self {
        Self { kind: ToastKind::Success, message }
    }

    pub fn error(message: String) -> Self {
        Self { kind: ToastKind::Error, message }
    }
}

/// A listing row ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub nome: String,
    pub email: String,
    pub initials: String,
    pub cargo: String,
    pub setor: String,
    pub tipo_usuario: UserType,
    pub role_label: String,
    pub status: UserStatus,
    pub status_label: String,
}

/// Stored at `users/console`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleState {
    /// Zero-based.
    pub page: u32,
    pub page_size: u32,
    pub filters: UserFilters,
    pub phase: ConsolePhase,
    pub rows: Vec<UserRow>,
    pub total: u64,
    pub summary: String,
    pub can_prev: bool,
    /// False once a page comes back short.
    pub can_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<Toast>,
}

impl ConsoleState {
    pub const PATH: &'static str = "users/console";

    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size,
            filters: UserFilters::default(),
            phase: ConsolePhase::Idle,
            rows: Vec::new(),
            total: 0,
            summary: String::new(),
            can_prev: false,
            can_next: false,
            error: None,
            toast: None,
        }
    }
}

// ── User form ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum FormMode {
    Create,
    Edit { original: ManagedUser },
}

/// Live result of the availability probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmailStatus {
    #[default]
    Unchecked,
    Checking,
    Available,
    Taken,
}

/// Stored at `users/form` while the create/edit dialog is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFormState {
    pub mode: FormMode,
    pub draft: UserDraft,
    pub email_status: EmailStatus,
    /// Titles valid for the selected sector.
    pub titles: Vec<String>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UserFormState {
    pub const PATH: &'static str = "users/form";

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    /// Email is fixed once the record exists.
    pub fn email_read_only(&self) -> bool {
        self.is_edit()
    }
}

// ── Profile ─────────────────────────────────────────────────────────

/// Stored at `profile/state`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ManagedUser>,
    pub loading: bool,
    pub saving: bool,
    pub checks: PasswordChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl ProfileState {
    pub const PATH: &'static str = "profile/state";
}
