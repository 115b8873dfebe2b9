//! User management console: filters, pagination, status toggling.
//!
//! Every change of page or filters, and every mutation, goes through
//! [`reload`], which refetches the current page from the backend.

use pointer_client::{ManagedUser, UserStatus, UserType};
use pointer_flux::StateStore;
use tracing::{debug, info};

use crate::context::HrContext;
use crate::handlers::session_handlers::absorb;
use crate::request::*;
use crate::state::*;

fn current(store: &StateStore, ctx: &HrContext) -> ConsoleState {
    store
        .read::<ConsoleState>(ConsoleState::PATH)
        .unwrap_or_else(|| ConsoleState::new(ctx.config.effective_page_size()))
}

pub(crate) fn role_label(ctx: &HrContext, t: UserType) -> String {
    ctx.t(&format!("ui/user-type/{}", t.as_str().to_ascii_lowercase()))
}

pub(crate) fn status_label(ctx: &HrContext, s: UserStatus) -> String {
    ctx.t(&format!("ui/status/{}", s.as_str().to_ascii_lowercase()))
}

fn to_row(ctx: &HrContext, u: ManagedUser) -> UserRow {
    UserRow {
        initials: u.initials(),
        role_label: role_label(ctx, u.tipo_usuario),
        status_label: status_label(ctx, u.status),
        id: u.id,
        nome: u.nome,
        email: u.email,
        cargo: u.cargo,
        setor: u.setor,
        tipo_usuario: u.tipo_usuario,
        status: u.status,
    }
}

/// Fetch the current page with the current filters.
pub(crate) async fn reload(store: &StateStore, ctx: &HrContext) {
    let mut state = current(store, ctx);
    state.phase = ConsolePhase::Loading;
    state.error = None;
    state.can_next = false;
    state.can_prev = state.page > 0;
    store.set(ConsoleState::PATH, state.clone());

    match ctx.directory.list(state.page, state.page_size, &state.filters).await {
        Ok(page) => {
            let shown = page.records.len();
            state.rows = page.records.into_iter().map(|u| to_row(ctx, u)).collect();
            state.total = page.total_count;
            state.phase = if state.rows.is_empty() {
                ConsolePhase::Empty
            } else {
                ConsolePhase::Loaded
            };
            state.can_next = shown as u64 == u64::from(state.page_size);
            state.summary = ctx.t(&format!(
                "ui/users/summary?shown={shown}&total={}",
                state.total
            ));
            debug!(page = state.page, shown, total = state.total, "users page loaded");
        }
        Err(e) => {
            let Some(message) = absorb(store, ctx, e.into()) else {
                return;
            };
            state.phase = ConsolePhase::Error;
            state.rows.clear();
            state.error = Some(message);
        }
    }
    // Keep a toast written while the request was in flight.
    if let Some(latest) = store.read::<ConsoleState>(ConsoleState::PATH) {
        state.toast = latest.toast;
    }
    store.set(ConsoleState::PATH, state);
}

/// Handle `users/load`.
pub async fn handle_load(store: &StateStore, ctx: &HrContext) {
    reload(store, ctx).await;
}

/// Handle `users/filter`.
pub async fn handle_set_filters(req: &SetFiltersReq, store: &StateStore, ctx: &HrContext) {
    let mut state = current(store, ctx);
    state.filters = req.filters.clone();
    state.page = 0;
    store.set(ConsoleState::PATH, state);
    reload(store, ctx).await;
}

/// Handle `users/next-page`. Ignored while the affordance is disabled.
pub async fn handle_next_page(store: &StateStore, ctx: &HrContext) {
    let mut state = current(store, ctx);
    if !state.can_next {
        return;
    }
    state.page += 1;
    store.set(ConsoleState::PATH, state);
    reload(store, ctx).await;
}

/// Handle `users/prev-page`.
pub async fn handle_prev_page(store: &StateStore, ctx: &HrContext) {
    let mut state = current(store, ctx);
    if state.page == 0 {
        return;
    }
    state.page -= 1;
    store.set(ConsoleState::PATH, state);
    reload(store, ctx).await;
}

/// Handle `users/toggle-status`. The row is never flipped locally; the
/// reload shows what the backend now holds.
pub async fn handle_toggle_status(req: &ToggleStatusReq, store: &StateStore, ctx: &HrContext) {
    let toast = match ctx.directory.toggle_status(&req.email).await {
        Ok(()) => {
            info!(email = %req.email, "status toggled");
            Toast::success(ctx.t("toast/status-updated"))
        }
        Err(e) => match absorb(store, ctx, e.into()) {
            Some(message) => Toast::error(message),
            None => return,
        },
    };
    show_toast(store, ctx, toast);
    reload(store, ctx).await;
}

/// Handle `users/dismiss-toast`.
pub async fn handle_dismiss_toast(store: &StateStore) {
    if let Some(mut state) = store.read::<ConsoleState>(ConsoleState::PATH) {
        state.toast = None;
        store.set(ConsoleState::PATH, state);
    }
}

pub(crate) fn show_toast(store: &StateStore, ctx: &HrContext, toast: Toast) {
    let mut state = current(store, ctx);
    state.toast = Some(toast);
    store.set(ConsoleState::PATH, state);
}

#[cfg(test)]
mod tests {
    use pointer_client::{TokenStore, UserFilters};
    use pointer_golden::{seed, Golden, SeedUser};

    use super::*;
    use crate::handlers::test_support::*;

    fn console(app: &crate::HrApp) -> ConsoleState {
        app.read::<ConsoleState>(ConsoleState::PATH).unwrap()
    }

    fn filters(setor: Option<&str>, status: Option<UserStatus>) -> SetFiltersReq {
        SetFiltersReq {
            filters: UserFilters {
                setor: setor.map(str::to_string),
                cargo: None,
                status,
            },
        }
    }

    #[tokio::test]
    async fn first_page_renders_rows() {
        let golden = Golden::start().await;
        let app = admin_app(&golden).await;

        app.emit(LoadUsersReq::PATH, LoadUsersReq).await;
        let c = console(&app);
        assert_eq!(c.phase, ConsolePhase::Loaded);
        assert_eq!(c.rows.len(), seed::USER_COUNT);
        assert_eq!(c.total, seed::USER_COUNT as u64);
        assert!(!c.can_prev);
        assert!(!c.can_next);
        assert_eq!(c.summary, "Mostrando 4 de 4 usuários");

        let ana = c.rows.iter().find(|r| r.email == seed::ADMIN_EMAIL).unwrap();
        assert_eq!(ana.initials, "AA");
        assert_eq!(ana.role_label, "Administrador");
        assert_eq!(ana.status_label, "Ativo");
    }

    #[tokio::test]
    async fn empty_sector_renders_empty_state() {
        let golden = Golden::start().await;
        let app = admin_app(&golden).await;

        app.emit(SetFiltersReq::PATH, filters(Some("TI"), None)).await;
        let c = console(&app);
        assert_eq!(c.phase, ConsolePhase::Empty);
        assert_eq!(c.total, 0);
        assert!(c.rows.is_empty());
        assert!(!c.can_next);
        assert_eq!(c.page, 0);
    }

    #[tokio::test]
    async fn filters_reset_to_first_page() {
        let golden = Golden::start().await;
        for i in 0..12 {
            golden.add_user(SeedUser {
                nome: "Extra Pessoa",
                email: Box::leak(format!("extra{i}@pointer.dev").into_boxed_str()),
                password: "Extra#2024",
                cargo: "ANALISTA",
                setor: "TI",
                tipo_usuario: "COLABORADOR",
                status: "ATIVO",
            });
        }
        let app = admin_app(&golden).await;

        app.emit(LoadUsersReq::PATH, LoadUsersReq).await;
        assert!(console(&app).can_next);
        app.emit(NextPageReq::PATH, NextPageReq).await;
        let c = console(&app);
        assert_eq!(c.page, 1);
        assert_eq!(c.rows.len(), 6);
        assert!(c.can_prev);
        assert!(!c.can_next);

        // Disabled: stays on the short page.
        app.emit(NextPageReq::PATH, NextPageReq).await;
        assert_eq!(console(&app).page, 1);

        app.emit(SetFiltersReq::PATH, filters(Some("TI"), Some(UserStatus::Ativo))).await;
        let c = console(&app);
        assert_eq!(c.page, 0);
        assert_eq!(c.total, 12);
        assert!(c.can_next);

        app.emit(NextPageReq::PATH, NextPageReq).await;
        app.emit(PrevPageReq::PATH, PrevPageReq).await;
        assert_eq!(console(&app).page, 0);
        app.emit(PrevPageReq::PATH, PrevPageReq).await;
        assert_eq!(console(&app).page, 0);
    }

    #[tokio::test]
    async fn toggle_reloads_from_backend() {
        let golden = Golden::start().await;
        let app = admin_app(&golden).await;
        app.emit(LoadUsersReq::PATH, LoadUsersReq).await;

        app.emit(
            ToggleStatusReq::PATH,
            ToggleStatusReq { email: seed::COLLABORATOR_EMAIL.into() },
        )
        .await;

        let c = console(&app);
        let row = c.rows.iter().find(|r| r.email == seed::COLLABORATOR_EMAIL).unwrap();
        assert_eq!(row.status, UserStatus::Inativo);
        assert_eq!(row.status_label, "Inativo");
        assert_eq!(golden.status_of(seed::COLLABORATOR_EMAIL).as_deref(), Some("INATIVO"));
        assert_eq!(
            c.toast,
            Some(Toast::success("Status do usuário atualizado com sucesso!".into()))
        );
        assert_eq!(golden.hits("GET /usuarios"), 2);

        app.emit(DismissToastReq::PATH, DismissToastReq).await;
        assert!(console(&app).toast.is_none());
    }

    #[tokio::test]
    async fn revoked_session_signs_out() {
        let golden = Golden::start().await;
        let app = admin_app(&golden).await;
        app.emit(LoadUsersReq::PATH, LoadUsersReq).await;

        golden.revoke_sessions();
        app.emit(LoadUsersReq::PATH, LoadUsersReq).await;

        let auth = app.read::<AuthState>(AuthState::PATH).unwrap();
        assert!(!auth.is_authenticated());
        assert_eq!(
            auth.error.as_deref(),
            Some("Sessão expirada. Faça login novamente.")
        );
        assert!(app.ctx().identity.tokens().load().is_none());
        assert!(app.read::<ConsoleState>(ConsoleState::PATH).is_none());
        assert_eq!(route(&app), "/login");
    }

    #[tokio::test]
    async fn unreachable_backend_shows_error_row() {
        let app = offline_app(|ctx| ctx);
        app.emit(LoadUsersReq::PATH, LoadUsersReq).await;
        let c = console(&app);
        assert_eq!(c.phase, ConsolePhase::Error);
        assert!(c.error.is_some());
    }
}
