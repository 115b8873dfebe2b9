//! Session lifecycle and guarded navigation.

use pointer_client::{Identity, IdentityClient};
use pointer_flux::StateStore;
use tracing::{debug, info, warn};

use crate::context::HrContext;
use crate::error::FlowError;
use crate::guard::{self, Route};
use crate::handlers::recovery_handlers as recovery;
use crate::nav;
use crate::request::*;
use crate::state::*;
use crate::validation;

/// Handle `app/initialize`: adopt the persisted token or discard it.
pub async fn handle_initialize(store: &StateStore, ctx: &HrContext) {
    store.set(AuthState::PATH, AuthState::loading());
    match restore(ctx) {
        Some(identity) => sign_in(store, ctx, identity),
        None => {
            store.set(AuthState::PATH, AuthState::signed_out());
            store.set(AppRoute::PATH, AppRoute::to(Route::Login));
        }
    }
}

fn restore(ctx: &HrContext) -> Option<Identity> {
    let token = ctx.identity.tokens().load()?;
    match IdentityClient::decode_token(&token) {
        Some(identity) if !identity.is_expired_now() => Some(identity),
        Some(_) => {
            info!("persisted session expired");
            clear_token(ctx);
            None
        }
        None => {
            warn!("persisted session token is malformed, discarding");
            clear_token(ctx);
            None
        }
    }
}

/// Handle `auth/login`. Every attempt starts from a signed-out session so a
/// failure never leaves the previous token behind.
pub async fn handle_login(req: &LoginReq, store: &StateStore, ctx: &HrContext) {
    end_session(store, ctx);
    if let Err(e) = validation::validate_login(&req.email, &req.password) {
        store.set(AuthState::PATH, AuthState::failed(ctx.message(&e)));
        return;
    }

    store.set(AuthState::PATH, AuthState::loading());
    match ctx.identity.login(req.email.trim(), &req.password).await {
        Ok(identity) => sign_in(store, ctx, identity),
        Err(e) => {
            warn!(code = e.error_code(), "login rejected");
            store.set(AuthState::PATH, AuthState::failed(ctx.message(&e.into())));
        }
    }
}

/// Handle `auth/logout`.
pub async fn handle_logout(store: &StateStore, ctx: &HrContext) {
    end_session(store, ctx);
    info!("signed out");
}

/// Handle `app/navigate`. Decided afresh on every call from the identity
/// currently in the store. Opening the first recovery step starts the flow over.
pub async fn handle_navigate(req: &NavigateReq, store: &StateStore, ctx: &HrContext) {
    let auth = store.read::<AuthState>(AuthState::PATH).unwrap_or_default();
    let identity = auth.identity.as_ref();
    let target = guard::resolve(identity, &req.path).target(identity);

    let target = match target {
        Route::ForgotPassword => {
            recovery::restart(store, ctx);
            target
        }
        // Later recovery steps only open for the stage the flow is in.
        Route::VerifyCode | Route::ResetPassword => store
            .read::<RecoveryState>(RecoveryState::PATH)
            .map(|s| s.stage.normalized())
            .unwrap_or_default()
            .route(),
        _ => target,
    };

    debug!(requested = %req.path, to = target.path(), "navigate");
    store.set(AppRoute::PATH, AppRoute::to(target));
}

pub(crate) fn sign_in(store: &StateStore, ctx: &HrContext, identity: Identity) {
    info!(email = %identity.email, roles = ?identity.roles, "signed in");
    let landing = guard::landing(Some(&identity));
    store.set(ShellState::PATH, shell_for(&identity, ctx));
    store.set(AuthState::PATH, AuthState::signed_in(identity));
    store.set(AppRoute::PATH, AppRoute::to(landing));
}

fn shell_for(identity: &Identity, ctx: &HrContext) -> ShellState {
    let menu = nav::menu_for(identity)
        .into_iter()
        .map(|mut item| {
            item.label = ctx.t(&item.label);
            item
        })
        .collect();
    ShellState {
        initial: identity.initial().to_string(),
        display_name: identity.display_name.clone(),
        email: identity.email.clone(),
        menu,
    }
}

/// Drop the token and every piece of signed-in state together.
pub(crate) fn end_session(store: &StateStore, ctx: &HrContext) {
    clear_token(ctx);
    ctx.probe.cancel();
    ctx.cooldown.lock().unwrap().cancel();
    store.set(AuthState::PATH, AuthState::signed_out());
    store.set(AppRoute::PATH, AppRoute::to(Route::Login));
    for path in [
        ShellState::PATH,
        ConsoleState::PATH,
        UserFormState::PATH,
        ProfileState::PATH,
    ] {
        store.remove(path);
    }
}

fn clear_token(ctx: &HrContext) {
    if let Err(e) = ctx.identity.logout() {
        warn!(error = %e, "failed to clear session token");
    }
}

/// Message for a failed call. An unauthorized response ends the session
/// and yields `None`: the screen that failed is gone.
pub(crate) fn absorb(store: &StateStore, ctx: &HrContext, err: FlowError) -> Option<String> {
    if err.is_unauthorized() {
        warn!("session rejected by backend, signing out");
        end_session(store, ctx);
        let auth = AuthState {
            error: Some(ctx.message(&err)),
            ..AuthState::signed_out()
        };
        store.set(AuthState::PATH, auth);
        return None;
    }
    Some(ctx.message(&err))
}

/// Identity of the current session, if any.
pub(crate) fn current_identity(store: &StateStore) -> Option<Identity> {
    store
        .read::<AuthState>(AuthState::PATH)
        .and_then(|a| a.identity)
}
