//! Request handlers and their Flux wiring.
//!
//! Handlers never fail: every error becomes text in the state of the
//! screen that issued the request.

pub mod console_handlers;
pub mod form_handlers;
pub mod profile_handlers;
pub mod recovery_handlers;
pub mod session_handlers;

#[cfg(test)]
pub(crate) mod test_support;

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use pointer_flux::{Flux, StateStore};
use tracing::warn;

use crate::context::HrContext;
use crate::request::*;

/// Register `handler` for `path`, downcasting the payload to `R`.
fn on<R, F, Fut>(flux: &Flux, ctx: &Arc<HrContext>, path: &str, handler: F)
where
    R: Any + Send + Sync,
    F: Fn(Arc<R>, Arc<StateStore>, Arc<HrContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let ctx = Arc::clone(ctx);
    flux.on(path, move |path, payload, store| {
        let call = payload
            .downcast::<R>()
            .ok()
            .map(|req| handler(req, store, Arc::clone(&ctx)));
        async move {
            match call {
                Some(fut) => fut.await,
                None => warn!(%path, "request payload has unexpected type"),
            }
        }
    });
}

/// Register every handler with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<HrContext>) {
    use console_handlers as console;
    use form_handlers as form;
    use profile_handlers as profile;
    use recovery_handlers as recovery;
    use session_handlers as session;

    // Session & navigation.
    on(flux, &ctx, InitializeReq::PATH, |_: Arc<InitializeReq>, store, ctx| async move {
        session::handle_initialize(&store, &ctx).await
    });
    on(flux, &ctx, LoginReq::PATH, |req: Arc<LoginReq>, store, ctx| async move {
        session::handle_login(&req, &store, &ctx).await
    });
    on(flux, &ctx, LogoutReq::PATH, |_: Arc<LogoutReq>, store, ctx| async move {
        session::handle_logout(&store, &ctx).await
    });
    on(flux, &ctx, NavigateReq::PATH, |req: Arc<NavigateReq>, store, ctx| async move {
        session::handle_navigate(&req, &store, &ctx).await
    });

    // Password recovery.
    on(flux, &ctx, StartRecoveryReq::PATH, |_: Arc<StartRecoveryReq>, store, ctx| async move {
        recovery::handle_start(&store, &ctx).await
    });
    on(flux, &ctx, RequestCodeReq::PATH, |req: Arc<RequestCodeReq>, store, ctx| async move {
        recovery::handle_request_code(&req, &store, &ctx).await
    });
    on(flux, &ctx, VerifyCodeReq::PATH, |req: Arc<VerifyCodeReq>, store, ctx| async move {
        recovery::handle_verify_code(&req, &store, &ctx).await
    });
    on(flux, &ctx, ResendCodeReq::PATH, |_: Arc<ResendCodeReq>, store, ctx| async move {
        recovery::handle_resend(&store, &ctx).await
    });
    on(flux, &ctx, EditRecoveryPasswordReq::PATH, |req: Arc<EditRecoveryPasswordReq>, store, _| async move {
        recovery::handle_edit_password(&req, &store).await
    });
    on(flux, &ctx, ResetPasswordReq::PATH, |req: Arc<ResetPasswordReq>, store, ctx| async move {
        recovery::handle_reset(&req, &store, &ctx).await
    });
    on(flux, &ctx, CancelRecoveryReq::PATH, |_: Arc<CancelRecoveryReq>, store, ctx| async move {
        recovery::handle_cancel(&store, &ctx).await
    });

    // User console.
    on(flux, &ctx, LoadUsersReq::PATH, |_: Arc<LoadUsersReq>, store, ctx| async move {
        console::handle_load(&store, &ctx).await
    });
    on(flux, &ctx, SetFiltersReq::PATH, |req: Arc<SetFiltersReq>, store, ctx| async move {
        console::handle_set_filters(&req, &store, &ctx).await
    });
    on(flux, &ctx, NextPageReq::PATH, |_: Arc<NextPageReq>, store, ctx| async move {
        console::handle_next_page(&store, &ctx).await
    });
    on(flux, &ctx, PrevPageReq::PATH, |_: Arc<PrevPageReq>, store, ctx| async move {
        console::handle_prev_page(&store, &ctx).await
    });
    on(flux, &ctx, ToggleStatusReq::PATH, |req: Arc<ToggleStatusReq>, store, ctx| async move {
        console::handle_toggle_status(&req, &store, &ctx).await
    });
    on(flux, &ctx, DismissToastReq::PATH, |_: Arc<DismissToastReq>, store, _| async move {
        console::handle_dismiss_toast(&store).await
    });

    // User form.
    on(flux, &ctx, OpenCreateFormReq::PATH, |_: Arc<OpenCreateFormReq>, store, ctx| async move {
        form::handle_open_create(&store, &ctx).await
    });
    on(flux, &ctx, OpenEditFormReq::PATH, |req: Arc<OpenEditFormReq>, store, ctx| async move {
        form::handle_open_edit(&req, &store, &ctx).await
    });
    on(flux, &ctx, EditFieldReq::PATH, |req: Arc<EditFieldReq>, store, ctx| async move {
        form::handle_edit_field(&req, &store, &ctx).await
    });
    on(flux, &ctx, SubmitFormReq::PATH, |_: Arc<SubmitFormReq>, store, ctx| async move {
        form::handle_submit(&store, &ctx).await
    });
    on(flux, &ctx, CloseFormReq::PATH, |_: Arc<CloseFormReq>, store, ctx| async move {
        form::handle_close(&store, &ctx).await
    });

    // Profile.
    on(flux, &ctx, LoadProfileReq::PATH, |_: Arc<LoadProfileReq>, store, ctx| async move {
        profile::handle_load(&store, &ctx).await
    });
    on(flux, &ctx, EditProfilePasswordReq::PATH, |req: Arc<EditProfilePasswordReq>, store, _| async move {
        profile::handle_edit_password(&req, &store).await
    });
    on(flux, &ctx, ChangePasswordReq::PATH, |req: Arc<ChangePasswordReq>, store, ctx| async move {
        profile::handle_change_password(&req, &store, &ctx).await
    });
}
