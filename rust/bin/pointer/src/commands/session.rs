//! Login / logout / whoami / menu.

use anyhow::{anyhow, Result};
use pointer_client::Identity;
use pointer_hr::request::{LoginReq, LogoutReq};
use pointer_hr::state::{AppRoute, AuthState, ShellState};
use pointer_hr::HrApp;
use tracing::info;

use super::{restore, signed_in};

/// Sign in and persist the token. Returns who signed in and where the
/// web client would land them.
pub async fn login(app: &HrApp, email: &str, password: &str) -> Result<(Identity, String)> {
    app.emit(
        LoginReq::PATH,
        LoginReq {
            email: email.to_string(),
            password: password.to_string(),
        },
    )
    .await;
    let auth: AuthState = app.read(AuthState::PATH).unwrap_or_default();
    if let Some(message) = auth.error {
        return Err(anyhow!(message));
    }
    let identity = signed_in(app)?;
    let landing = app.read::<AppRoute>(AppRoute::PATH).map(|r| r.0).unwrap_or_default();
    info!(email = %identity.email, "cli login");
    Ok((identity, landing))
}

/// Drop the persisted session. Succeeds when already signed out.
pub async fn logout(app: &HrApp) -> Result<()> {
    app.emit(LogoutReq::PATH, LogoutReq).await;
    Ok(())
}

pub async fn whoami(app: &HrApp) -> Result<ShellState> {
    restore(app).await?;
    shell(app)
}

pub fn shell(app: &HrApp) -> Result<ShellState> {
    app.read::<ShellState>(ShellState::PATH)
        .ok_or_else(|| anyhow!("Not logged in. Run `pointer login`."))
}

pub fn render_whoami(shell: &ShellState, identity: &Identity) -> String {
    let roles: Vec<&str> = identity.roles.iter().map(|r| r.as_str()).collect();
    format!(
        "[{}] {} <{}>\nroles: {}",
        shell.initial,
        shell.display_name,
        shell.email,
        if roles.is_empty() { "-".to_string() } else { roles.join(", ") }
    )
}

pub fn render_menu(shell: &ShellState) -> String {
    let width = shell.menu.iter().map(|m| m.label.chars().count()).max().unwrap_or(0);
    shell
        .menu
        .iter()
        .map(|m| format!("{}  {}", super::pad(&m.label, width), m.path))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use pointer_golden::{seed, Golden};

    use super::*;
    use crate::commands::open;
    use crate::commands::test_support::config_for;

    #[tokio::test]
    async fn login_persists_session_for_next_invocation() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&golden, dir.path());

        let (identity, landing) = login(&open(&config).unwrap(), seed::MANAGER_EMAIL, seed::MANAGER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(identity.email, seed::MANAGER_EMAIL);
        assert_eq!(landing, "/gestor");
        assert!(dir.path().join("token").exists());

        // A fresh process restores from the token file.
        let app = open(&config).unwrap();
        let shell = whoami(&app).await.unwrap();
        assert_eq!(shell.email, seed::MANAGER_EMAIL);
        assert_eq!(shell.initial, "G");
        let text = render_menu(&shell);
        assert!(text.contains("Gestão de Equipe"));
        assert!(!text.contains("/admin/users"));
    }

    #[tokio::test]
    async fn bad_credentials_report_backend_message() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = open(&config_for(&golden, dir.path())).unwrap();

        let err = login(&app, seed::ADMIN_EMAIL, "Wrong#2024").await.unwrap_err();
        assert_eq!(err.to_string(), "Email ou senha inválidos");
        assert!(!dir.path().join("token").exists());
    }

    #[tokio::test]
    async fn logout_then_whoami_fails() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&golden, dir.path());
        login(&open(&config).unwrap(), seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD)
            .await
            .unwrap();

        logout(&open(&config).unwrap()).await.unwrap();
        assert!(!dir.path().join("token").exists());
        assert!(whoami(&open(&config).unwrap()).await.is_err());
    }

    #[test]
    fn whoami_lists_roles() {
        let identity = Identity {
            subject_id: "user-1".into(),
            email: "ana@pointer.dev".into(),
            display_name: "Ana".into(),
            roles: [pointer_client::Role::Administrator].into_iter().collect(),
            expires_at: None,
        };
        let shell = ShellState {
            initial: "A".into(),
            display_name: "Ana".into(),
            email: "ana@pointer.dev".into(),
            menu: Vec::new(),
        };
        assert_eq!(render_whoami(&shell, &identity), "[A] Ana <ana@pointer.dev>\nroles: administrator");
    }
}
