//! Password recovery handlers: request → verify → reset.

use std::sync::Arc;

use pointer_flux::StateStore;
use tracing::{info, warn};

use crate::context::HrContext;
use crate::error::FlowError;
use crate::guard::Route;
use crate::handlers::session_handlers::end_session;
use crate::recovery::RecoveryStage;
use crate::request::*;
use crate::state::*;
use crate::validation::{self, PasswordChecks};

fn current(store: &StateStore) -> RecoveryState {
    let mut state = store
        .read::<RecoveryState>(RecoveryState::PATH)
        .unwrap_or_default();
    state.stage = state.stage.normalized();
    state
}

fn fail(store: &StateStore, ctx: &HrContext, mut state: RecoveryState, err: FlowError) {
    if let FlowError::InvalidTransition { from, event } = &err {
        warn!(from, event, "recovery step out of order");
    }
    state.busy = false;
    state.notice = None;
    state.error = Some(ctx.message(&err));
    store.set(RecoveryState::PATH, state);
}

fn enter(store: &StateStore, state: RecoveryState) {
    info!(stage = state.stage.name(), "recovery stage");
    let route = state.stage.route();
    store.set(RecoveryState::PATH, state);
    store.set(AppRoute::PATH, AppRoute::to(route));
}

/// Handle `recovery/start`.
pub async fn handle_start(store: &StateStore, ctx: &HrContext) {
    restart(store, ctx);
}

/// Back to the first step with no countdown running.
pub(crate) fn restart(store: &StateStore, ctx: &HrContext) {
    ctx.cooldown.lock().unwrap().cancel();
    store.remove(ResendCooldown::PATH);
    enter(store, RecoveryState::default());
}

/// Handle `recovery/request-code`.
pub async fn handle_request_code(req: &RequestCodeReq, store: &Arc<StateStore>, ctx: &HrContext) {
    let state = current(store);
    let email = req.email.trim();
    if let Err(e) = validation::validate_email(email) {
        return fail(store, ctx, state, e);
    }
    let next = match state.stage.code_sent(email) {
        Ok(next) => next,
        Err(e) => return fail(store, ctx, state, e),
    };

    store.set(RecoveryState::PATH, RecoveryState { busy: true, error: None, ..state.clone() });
    match ctx.recovery.request_password_code(email).await {
        Ok(()) => {
            ctx.cooldown.lock().unwrap().restart(Arc::clone(store));
            enter(store, RecoveryState { stage: next, ..Default::default() });
        }
        Err(e) => fail(store, ctx, state, e.into()),
    }
}

/// Handle `recovery/verify-code`.
pub async fn handle_verify_code(req: &VerifyCodeReq, store: &StateStore, ctx: &HrContext) {
    let state = current(store);
    let next = match state.stage.code_verified() {
        Ok(next) => next,
        Err(e) => {
            fail(store, ctx, state.clone(), e);
            store.set(AppRoute::PATH, AppRoute::to(state.stage.route()));
            return;
        }
    };
    let code = req.code.trim();
    if code.is_empty() {
        return fail(store, ctx, state, FlowError::required("codigo"));
    }
    let email = next.email().unwrap_or_default().to_string();

    store.set(RecoveryState::PATH, RecoveryState { busy: true, error: None, ..state.clone() });
    match ctx.recovery.verify_code(&email, code).await {
        Ok(()) => {
            ctx.cooldown.lock().unwrap().cancel();
            store.remove(ResendCooldown::PATH);
            enter(store, RecoveryState { stage: next, ..Default::default() });
        }
        Err(e) => fail(store, ctx, state, e.into()),
    }
}

/// Handle `recovery/resend`. Only allowed once the cooldown reached zero;
/// success restarts it at the full period.
pub async fn handle_resend(store: &Arc<StateStore>, ctx: &HrContext) {
    let state = current(store);
    let RecoveryStage::VerifyCode { email } = state.stage.clone() else {
        let err = FlowError::InvalidTransition { from: state.stage.name(), event: "resend a code" };
        return fail(store, ctx, state, err);
    };

    let remaining = ctx.cooldown.lock().unwrap().remaining_secs();
    if remaining > 0 {
        return fail(store, ctx, state, FlowError::CooldownActive(remaining));
    }

    store.set(RecoveryState::PATH, RecoveryState { busy: true, error: None, ..state.clone() });
    match ctx.recovery.request_password_code(&email).await {
        Ok(()) => {
            ctx.cooldown.lock().unwrap().restart(Arc::clone(store));
            info!("recovery code resent");
            store.set(
                RecoveryState::PATH,
                RecoveryState {
                    busy: false,
                    error: None,
                    notice: Some(ctx.t("ui/recovery/code-resent")),
                    ..state
                },
            );
        }
        Err(e) => fail(store, ctx, state, e.into()),
    }
}

/// Handle `recovery/edit-password`.
pub async fn handle_edit_password(req: &EditRecoveryPasswordReq, store: &StateStore) {
    let mut state = current(store);
    state.checks = PasswordChecks::evaluate(&req.password, &req.confirmation);
    store.set(RecoveryState::PATH, state);
}

/// Handle `recovery/reset`. Success ends the flow and any open session.
pub async fn handle_reset(req: &ResetPasswordReq, store: &StateStore, ctx: &HrContext) {
    let mut state = current(store);
    let RecoveryStage::SetNewPassword { email } = state.stage.clone() else {
        let err = FlowError::InvalidTransition { from: state.stage.name(), event: "reset the password" };
        let route = state.stage.route();
        fail(store, ctx, state, err);
        store.set(AppRoute::PATH, AppRoute::to(route));
        return;
    };

    state.checks = PasswordChecks::evaluate(&req.password, &req.confirmation);
    if let Err(e) = state.checks.check() {
        return fail(store, ctx, state, e);
    }

    store.set(RecoveryState::PATH, RecoveryState { busy: true, error: None, ..state.clone() });
    match ctx.recovery.reset_password(&email, &req.password).await {
        Ok(()) => {
            info!("password reset completed");
            end_session(store, ctx);
            finish(store, ctx);
            store.set(
                AuthState::PATH,
                AuthState {
                    notice: Some(ctx.t("ui/recovery/password-reset")),
                    ..AuthState::signed_out()
                },
            );
        }
        Err(e) => fail(store, ctx, state, e.into()),
    }
}

/// Handle `recovery/cancel`.
pub async fn handle_cancel(store: &StateStore, ctx: &HrContext) {
    finish(store, ctx);
}

fn finish(store: &StateStore, ctx: &HrContext) {
    ctx.cooldown.lock().unwrap().cancel();
    store.remove(RecoveryState::PATH);
    store.remove(ResendCooldown::PATH);
    store.set(AppRoute::PATH, AppRoute::to(Route::Login));
}
