//! Admin user console: list / show / create / update / toggle-status.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use pointer_client::{ManagedUser, UserFilters};
use pointer_hr::request::*;
use pointer_hr::state::{ConsolePhase, ConsoleState, EmailStatus, FormMode, ToastKind, UserFormState};
use pointer_hr::{HrApp, Route};

use super::{enter, pad, restore, signed_in};

/// Field values from the command line; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserInput {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub setor: Option<String>,
    pub cargo: Option<String>,
    pub tipo_usuario: Option<String>,
    pub status: Option<String>,
}

async fn open_console(app: &HrApp) -> Result<()> {
    restore(app).await?;
    enter(app, Route::AdminUsers).await
}

fn console(app: &HrApp) -> Result<ConsoleState> {
    signed_in(app)?;
    let state: ConsoleState = app
        .read(ConsoleState::PATH)
        .ok_or_else(|| anyhow!("user listing not loaded"))?;
    if state.phase == ConsolePhase::Error {
        bail!(state.error.unwrap_or_default());
    }
    Ok(state)
}

/// Toast left by the last mutation, as a result.
fn outcome(app: &HrApp) -> Result<String> {
    signed_in(app)?;
    let toast = app
        .read::<ConsoleState>(ConsoleState::PATH)
        .and_then(|s| s.toast)
        .ok_or_else(|| anyhow!("no result reported"))?;
    match toast.kind {
        ToastKind::Success => Ok(toast.message),
        ToastKind::Error => Err(anyhow!(toast.message)),
    }
}

/// List users. `page` is one-based; paging stops at the last full page.
pub async fn list(app: &HrApp, filters: UserFilters, page: u32) -> Result<ConsoleState> {
    open_console(app).await?;
    app.emit(SetFiltersReq::PATH, SetFiltersReq { filters }).await;
    for _ in 1..page.max(1) {
        if !console(app)?.can_next {
            break;
        }
        app.emit(NextPageReq::PATH, NextPageReq).await;
    }
    console(app)
}

pub fn render_list(state: &ConsoleState) -> String {
    if state.rows.is_empty() {
        return state.summary.clone();
    }
    let headers = ["", "NOME", "EMAIL", "SETOR", "CARGO", "TIPO", "STATUS"];
    let rows: Vec<[String; 7]> = state
        .rows
        .iter()
        .map(|r| {
            [
                r.initials.clone(),
                r.nome.clone(),
                r.email.clone(),
                r.setor.clone(),
                r.cargo.clone(),
                r.role_label.clone(),
                r.status_label.clone(),
            ]
        })
        .collect();
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths)
            .map(|(c, w)| pad(c, w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    out.extend(rows.iter().map(|r| line(r.iter().map(String::as_str).collect())));
    out.push(String::new());
    out.push(format!("{}  (page {})", state.summary, state.page + 1));
    if state.can_next {
        out.push(format!("more: --page {}", state.page + 2));
    }
    out.join("\n")
}

/// Fetch one record through the edit dialog and close it again.
pub async fn show(app: &HrApp, email: &str) -> Result<ManagedUser> {
    open_console(app).await?;
    let form = open_edit(app, email).await?;
    app.emit(CloseFormReq::PATH, CloseFormReq).await;
    match form.mode {
        FormMode::Edit { original } => Ok(original),
        FormMode::Create => bail!("unexpected create dialog"),
    }
}

async fn open_edit(app: &HrApp, email: &str) -> Result<UserFormState> {
    app.emit(OpenEditFormReq::PATH, OpenEditFormReq { email: email.to_string() }).await;
    match app.read::<UserFormState>(UserFormState::PATH) {
        Some(form) => Ok(form),
        None => {
            outcome(app)?;
            bail!("user {email} not found")
        }
    }
}

pub fn render_user(user: &ManagedUser) -> String {
    [
        ("id", user.id.as_str()),
        ("nome", &user.nome),
        ("email", &user.email),
        ("setor", &user.setor),
        ("cargo", &user.cargo),
        ("tipoUsuario", user.tipo_usuario.as_str()),
        ("status", user.status.as_str()),
    ]
    .iter()
    .map(|(k, v)| format!("{}  {}", pad(k, 11), v))
    .collect::<Vec<_>>()
    .join("\n")
}

pub async fn create(app: &HrApp, input: UserInput) -> Result<String> {
    open_console(app).await?;
    app.emit(OpenCreateFormReq::PATH, OpenCreateFormReq).await;
    fill(app, input).await;
    await_email_check(app).await;
    submit(app).await
}

pub async fn update(app: &HrApp, email: &str, input: UserInput) -> Result<String> {
    open_console(app).await?;
    open_edit(app, email).await?;
    fill(app, UserInput { email: None, ..input }).await;
    submit(app).await
}

/// Changing the sector clears the title, so the sector goes first.
async fn fill(app: &HrApp, input: UserInput) {
    let fields = [
        (FormField::Nome, input.nome),
        (FormField::Setor, input.setor),
        (FormField::Cargo, input.cargo),
        (FormField::TipoUsuario, input.tipo_usuario),
        (FormField::Status, input.status),
        (FormField::Email, input.email),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            app.emit(EditFieldReq::PATH, EditFieldReq { field, value }).await;
        }
    }
}

/// Wait out the debounced availability probe.
async fn await_email_check(app: &HrApp) {
    let debounce = app.ctx().config.email_check_debounce();
    let deadline = tokio::time::Instant::now() + debounce + Duration::from_secs(10);
    while tokio::time::Instant::now() < deadline {
        let checking = app
            .read::<UserFormState>(UserFormState::PATH)
            .is_some_and(|f| f.email_status == EmailStatus::Checking);
        if !checking {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

async fn submit(app: &HrApp) -> Result<String> {
    app.emit(SubmitFormReq::PATH, SubmitFormReq).await;
    if let Some(form) = app.read::<UserFormState>(UserFormState::PATH) {
        app.emit(CloseFormReq::PATH, CloseFormReq).await;
        bail!(form.error.unwrap_or_else(|| "user not saved".to_string()));
    }
    outcome(app)
}

pub async fn toggle_status(app: &HrApp, email: &str) -> Result<String> {
    open_console(app).await?;
    app.emit(ToggleStatusReq::PATH, ToggleStatusReq { email: email.to_string() }).await;
    outcome(app)
}

#[cfg(test)]
mod tests {
    use pointer_client::UserStatus;
    use pointer_golden::{seed, Golden};

    use super::*;
    use crate::commands::session::login;
    use crate::commands::test_support::config_for;
    use crate::commands::open;

    async fn admin(golden: &Golden, dir: &std::path::Path) -> HrApp {
        let config = config_for(golden, dir);
        login(&open(&config).unwrap(), seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD)
            .await
            .unwrap();
        open(&config).unwrap()
    }

    fn new_user() -> UserInput {
        UserInput {
            nome: Some("Bruno Dev".into()),
            email: Some("bruno@pointer.dev".into()),
            setor: Some("TI".into()),
            cargo: Some("DESENVOLVEDOR".into()),
            tipo_usuario: Some("COLABORADOR".into()),
            status: Some("ATIVO".into()),
        }
    }

    #[tokio::test]
    async fn list_renders_filtered_rows() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = admin(&golden, dir.path()).await;

        let filters = UserFilters {
            setor: Some("RH".into()),
            ..Default::default()
        };
        let state = list(&app, filters, 1).await.unwrap();
        assert_eq!(state.rows.len(), 2);
        let text = render_list(&state);
        assert!(text.contains(seed::ADMIN_EMAIL));
        assert!(text.contains(seed::MANAGER_EMAIL));
        assert!(!text.contains(seed::COLLABORATOR_EMAIL));
        assert!(!text.contains("more:"));
    }

    #[tokio::test]
    async fn collaborator_is_refused() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&golden, dir.path());
        login(&open(&config).unwrap(), seed::COLLABORATOR_EMAIL, seed::COLLABORATOR_PASSWORD)
            .await
            .unwrap();

        let err = list(&open(&config).unwrap(), UserFilters::default(), 1).await.unwrap_err();
        assert!(err.to_string().contains("/admin/users"));
        assert_eq!(golden.hits("GET /usuarios"), 0);
    }

    #[tokio::test]
    async fn create_waits_for_availability_then_saves() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = admin(&golden, dir.path()).await;

        let message = create(&app, new_user()).await.unwrap();
        assert!(message.starts_with("Usuário cadastrado com sucesso!"));
        assert_eq!(golden.status_of("bruno@pointer.dev").as_deref(), Some("ATIVO"));
    }

    #[tokio::test]
    async fn create_with_taken_email_fails_without_posting() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = admin(&golden, dir.path()).await;

        let input = UserInput {
            email: Some(seed::COLLABORATOR_EMAIL.into()),
            ..new_user()
        };
        let err = create(&app, input).await.unwrap_err();
        assert_eq!(err.to_string(), "Este e-mail já está cadastrado");
        assert_eq!(golden.hits("POST /usuarios"), 0);
    }

    #[tokio::test]
    async fn update_changes_sector_and_title() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = admin(&golden, dir.path()).await;

        let input = UserInput {
            setor: Some("TI".into()),
            cargo: Some("ANALISTA".into()),
            ..Default::default()
        };
        let message = update(&app, seed::COLLABORATOR_EMAIL, input).await.unwrap();
        assert_eq!(message, "Usuário atualizado com sucesso!");

        let user = show(&app, seed::COLLABORATOR_EMAIL).await.unwrap();
        assert_eq!(user.setor, "TI");
        assert_eq!(user.cargo, "ANALISTA");
        assert!(render_user(&user).contains("Carla Colaboradora"));
    }

    #[tokio::test]
    async fn sector_change_without_title_is_rejected() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = admin(&golden, dir.path()).await;

        let input = UserInput {
            setor: Some("TI".into()),
            ..Default::default()
        };
        assert!(update(&app, seed::COLLABORATOR_EMAIL, input).await.is_err());
        assert_eq!(golden.hits("PUT /usuarios/atualizar-usuario"), 0);
    }

    #[tokio::test]
    async fn toggle_reports_and_flips() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = admin(&golden, dir.path()).await;

        let message = toggle_status(&app, seed::INACTIVE_EMAIL).await.unwrap();
        assert_eq!(message, "Status do usuário atualizado com sucesso!");
        assert_eq!(
            golden.status_of(seed::INACTIVE_EMAIL).as_deref(),
            Some(UserStatus::Ativo.as_str())
        );
    }

    #[tokio::test]
    async fn revoked_session_surfaces_expiry() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = admin(&golden, dir.path()).await;
        golden.revoke_sessions();

        let err = list(&app, UserFilters::default(), 1).await.unwrap_err();
        assert_eq!(err.to_string(), "Sessão expirada. Faça login novamente.");
        assert!(!dir.path().join("token").exists());
    }
}
