//! Route table and access decisions.
//!
//! [`can_access`] is pure and cheap; navigation calls [`resolve`] on
//! every transition with the identity currently in the store.

use pointer_client::{Identity, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    ForgotPassword,
    VerifyCode,
    ResetPassword,
    Dashboard,
    Profile,
    Feedbacks,
    Announcements,
    DevelopmentPlan,
    AdminHome,
    AdminUsers,
    AdminReports,
    TeamManagement,
}

impl Route {
    pub const ALL: [Route; 13] = [
        Route::Login,
        Route::ForgotPassword,
        Route::VerifyCode,
        Route::ResetPassword,
        Route::Dashboard,
        Route::Profile,
        Route::Feedbacks,
        Route::Announcements,
        Route::DevelopmentPlan,
        Route::AdminHome,
        Route::AdminUsers,
        Route::AdminReports,
        Route::TeamManagement,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::ForgotPassword => "/auth/esqueceu-senha",
            Route::VerifyCode => "/auth/verificar-codigo",
            Route::ResetPassword => "/auth/redefinir-senha",
            Route::Dashboard => "/",
            Route::Profile => "/perfil",
            Route::Feedbacks => "/feedbacks",
            Route::Announcements => "/comunicados",
            Route::DevelopmentPlan => "/meu-pdi",
            Route::AdminHome => "/admin",
            Route::AdminUsers => "/admin/users",
            Route::AdminReports => "/admin/relatorios",
            Route::TeamManagement => "/gestor",
        }
    }

    /// Exact path match; a trailing slash is tolerated.
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Route::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::ForgotPassword | Route::VerifyCode | Route::ResetPassword
        )
    }

    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::AdminHome | Route::AdminUsers | Route::AdminReports => {
                Some(Role::Administrator)
            }
            Route::TeamManagement => Some(Role::Manager),
            _ => None,
        }
    }
}

/// `true` when no role is required, or the identity holds it.
/// An absent identity never passes a role check.
pub fn can_access(identity: Option<&Identity>, required: Option<Role>) -> bool {
    match (required, identity) {
        (None, _) => true,
        (Some(role), Some(id)) => id.has_role(role),
        (Some(_), None) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(Route),
    RedirectLogin,
    RedirectHome,
}

impl Decision {
    /// Where navigation actually lands.
    pub fn target(&self, identity: Option<&Identity>) -> Route {
        match self {
            Decision::Allow(r) => *r,
            Decision::RedirectLogin => Route::Login,
            Decision::RedirectHome => landing(identity),
        }
    }
}

pub fn resolve(identity: Option<&Identity>, path: &str) -> Decision {
    let Some(route) = Route::from_path(path) else {
        return Decision::RedirectLogin;
    };
    if route.is_public() {
        return Decision::Allow(route);
    }
    if identity.is_none() {
        return Decision::RedirectLogin;
    }
    if can_access(identity, route.required_role()) {
        Decision::Allow(route)
    } else {
        Decision::RedirectHome
    }
}

/// Post-login destination.
pub fn landing(identity: Option<&Identity>) -> Route {
    match identity {
        None => Route::Login,
        Some(id) if id.has_role(Role::Administrator) => Route::AdminHome,
        Some(id) if id.has_role(Role::Manager) => Route::TeamManagement,
        Some(_) => Route::Dashboard,
    }
}
