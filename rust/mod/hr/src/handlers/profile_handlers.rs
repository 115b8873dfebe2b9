//! Signed-in user's own profile and password change.

use pointer_flux::StateStore;
use tracing::info;

use crate::context::HrContext;
use crate::error::FlowError;
use crate::handlers::session_handlers::{absorb, current_identity};
use crate::request::*;
use crate::state::*;
use crate::validation::PasswordChecks;

fn current(store: &StateStore) -> ProfileState {
    store.read::<ProfileState>(ProfileState::PATH).unwrap_or_default()
}

/// Handle `profile/load`.
pub async fn handle_load(store: &StateStore, ctx: &HrContext) {
    let mut state = current(store);
    let Some(identity) = current_identity(store) else {
        state.error = Some(ctx.message(&FlowError::SignedOut));
        store.set(ProfileState::PATH, state);
        return;
    };

    state.loading = true;
    state.error = None;
    store.set(ProfileState::PATH, state.clone());

    match ctx.directory.get_by_email(&identity.email).await {
        Ok(user) => {
            state.user = Some(user);
            state.loading = false;
            store.set(ProfileState::PATH, state);
        }
        Err(e) => {
            let Some(message) = absorb(store, ctx, e.into()) else {
                return;
            };
            state.loading = false;
            state.error = Some(message);
            store.set(ProfileState::PATH, state);
        }
    }
}

/// Handle `profile/edit-password`.
pub async fn handle_edit_password(req: &EditProfilePasswordReq, store: &StateStore) {
    let mut state = current(store);
    state.checks = PasswordChecks::evaluate(&req.password, &req.confirmation);
    state.notice = None;
    store.set(ProfileState::PATH, state);
}

/// Handle `profile/change-password`. Same rules as recovery.
pub async fn handle_change_password(req: &ChangePasswordReq, store: &StateStore, ctx: &HrContext) {
    let mut state = current(store);
    state.notice = None;
    state.checks = PasswordChecks::evaluate(&req.password, &req.confirmation);

    let Some(identity) = current_identity(store) else {
        state.error = Some(ctx.message(&FlowError::SignedOut));
        store.set(ProfileState::PATH, state);
        return;
    };
    if let Err(e) = state.checks.check() {
        state.error = Some(ctx.message(&e));
        store.set(ProfileState::PATH, state);
        return;
    }

    state.saving = true;
    state.error = None;
    store.set(ProfileState::PATH, state.clone());

    let result = ctx.recovery.reset_password(&identity.email, &req.password).await;
    state.saving = false;
    match result {
        Ok(()) => {
            info!("password changed from profile");
            state.checks = PasswordChecks::default();
            state.notice = Some(ctx.t("ui/profile/password-changed"));
        }
        Err(e) => match absorb(store, ctx, e.into()) {
            Some(message) => state.error = Some(message),
            None => return,
        },
    }
    store.set(ProfileState::PATH, state);
}
