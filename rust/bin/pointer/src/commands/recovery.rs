//! Interactive password recovery: email → code → new password.
//!
//! The flow's stage lives in process memory, so all three steps run in a
//! single invocation.

use anyhow::{anyhow, Result};
use pointer_hr::request::*;
use pointer_hr::state::{AuthState, RecoveryState, ResendCooldown};
use pointer_hr::{HrApp, PasswordChecks, RecoveryStage};

/// Where answers come from.
pub trait Prompter {
    fn line(&mut self, label: &str) -> Result<String>;
    fn secret(&mut self, label: &str) -> Result<String>;
}

pub struct Terminal;

impl Prompter for Terminal {
    fn line(&mut self, label: &str) -> Result<String> {
        super::prompt(label)
    }

    fn secret(&mut self, label: &str) -> Result<String> {
        Ok(rpassword::prompt_password(label)?)
    }
}

fn state(app: &HrApp) -> RecoveryState {
    app.read(RecoveryState::PATH).unwrap_or_default()
}

fn report(app: &HrApp) {
    let st = state(app);
    if let Some(notice) = st.notice {
        eprintln!("{notice}");
    }
    if let Some(error) = st.error {
        eprintln!("{error}");
    }
}

/// One line per password rule, ticked when satisfied.
pub fn render_checks(app: &HrApp, checks: &PasswordChecks) -> String {
    [
        (checks.min_length, "ui/check/min-length"),
        (checks.uppercase, "ui/check/uppercase"),
        (checks.digit, "ui/check/digit"),
        (checks.special, "ui/check/special"),
        (checks.matches, "ui/check/matches"),
    ]
    .iter()
    .map(|(ok, key)| format!("[{}] {}", if *ok { "x" } else { " " }, app.t(key)))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Run the whole flow. Returns the confirmation shown on the login screen.
pub async fn run(app: &HrApp, mut email: Option<String>, io: &mut dyn Prompter) -> Result<String> {
    app.emit(StartRecoveryReq::PATH, StartRecoveryReq).await;

    loop {
        let from_flag = email.is_some();
        let address = match email.take() {
            Some(e) => e,
            None => io.line("Email: ")?,
        };
        app.emit(RequestCodeReq::PATH, RequestCodeReq { email: address.clone() }).await;
        if matches!(state(app).stage, RecoveryStage::VerifyCode { .. }) {
            eprintln!("Code sent to {address}.");
            break;
        }
        if from_flag {
            return Err(anyhow!(state(app).error.unwrap_or_default()));
        }
        report(app);
    }

    loop {
        let remaining = app
            .read::<ResendCooldown>(ResendCooldown::PATH)
            .map(|c| c.remaining_secs)
            .unwrap_or_default();
        let label = if remaining > 0 {
            format!("Code (empty to resend in {remaining}s): ")
        } else {
            "Code (empty to resend): ".to_string()
        };
        let code = io.line(&label)?;
        if code.is_empty() {
            app.emit(ResendCodeReq::PATH, ResendCodeReq).await;
            report(app);
            continue;
        }
        app.emit(VerifyCodeReq::PATH, VerifyCodeReq { code }).await;
        if matches!(state(app).stage, RecoveryStage::SetNewPassword { .. }) {
            break;
        }
        report(app);
    }

    loop {
        let password = io.secret("New password: ")?;
        let confirmation = io.secret("Confirm new password: ")?;
        app.emit(
            ResetPasswordReq::PATH,
            ResetPasswordReq { password, confirmation },
        )
        .await;
        match app.read::<RecoveryState>(RecoveryState::PATH) {
            None => {
                let auth: AuthState = app.read(AuthState::PATH).unwrap_or_default();
                return Ok(auth.notice.unwrap_or_default());
            }
            Some(st) => {
                eprintln!("{}", render_checks(app, &st.checks));
                report(app);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pointer_golden::{seed, Golden};

    use super::*;
    use crate::commands::open;
    use crate::commands::session::login;
    use crate::commands::test_support::config_for;

    /// Answers from a closure; `None` ends the script.
    struct Scripted<F>(F);

    impl<F: FnMut(&str) -> Option<String>> Prompter for Scripted<F> {
        fn line(&mut self, label: &str) -> Result<String> {
            (self.0)(label).ok_or_else(|| anyhow!("script exhausted at {label:?}"))
        }

        fn secret(&mut self, label: &str) -> Result<String> {
            self.line(label)
        }
    }

    const NEW_PASSWORD: &str = "Nova#Senha9";

    #[tokio::test]
    async fn full_flow_resets_password() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&golden, dir.path());
        let app = open(&config).unwrap();

        let mut wrong_code_sent = false;
        let mut io = Scripted(|label: &str| {
            if label.starts_with("Code") {
                if !wrong_code_sent {
                    wrong_code_sent = true;
                    return Some("000000".to_string());
                }
                return golden.last_code(seed::COLLABORATOR_EMAIL);
            }
            Some(NEW_PASSWORD.to_string())
        });

        let notice = run(&app, Some(seed::COLLABORATOR_EMAIL.into()), &mut io).await.unwrap();
        assert_eq!(notice, "Senha redefinida com sucesso! Faça login.");
        assert_eq!(golden.hits("POST /auth/verify-code"), 2);

        login(&open(&config).unwrap(), seed::COLLABORATOR_EMAIL, NEW_PASSWORD)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn early_resend_is_refused_by_cooldown() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = open(&config_for(&golden, dir.path())).unwrap();

        let mut labels = Vec::new();
        let mut io = Scripted(|label: &str| {
            labels.push(label.to_string());
            match labels.len() {
                1 => Some(String::new()),
                _ => None,
            }
        });

        assert!(run(&app, Some(seed::COLLABORATOR_EMAIL.into()), &mut io).await.is_err());
        assert_eq!(golden.codes_sent(seed::COLLABORATOR_EMAIL), 1);
        assert!(labels[0].contains("resend in"));
        assert!(state(&app).error.unwrap().starts_with("Aguarde"));
    }

    #[tokio::test]
    async fn unknown_email_from_flag_fails_fast() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = open(&config_for(&golden, dir.path())).unwrap();
        let mut io = Scripted(|_: &str| None);

        let err = run(&app, Some("ninguem@pointer.dev".into()), &mut io).await.unwrap_err();
        assert_eq!(err.to_string(), "Email não encontrado");
    }

    #[tokio::test]
    async fn weak_password_shows_checklist_and_asks_again() {
        let golden = Golden::start().await;
        let dir = tempfile::tempdir().unwrap();
        let app = open(&config_for(&golden, dir.path())).unwrap();

        let mut passwords = vec!["fraca", "fraca", NEW_PASSWORD, NEW_PASSWORD].into_iter();
        let mut io = Scripted(|label: &str| {
            if label.starts_with("Code") {
                golden.last_code(seed::COLLABORATOR_EMAIL)
            } else if label.contains("password") {
                passwords.next().map(str::to_string)
            } else {
                Some(seed::COLLABORATOR_EMAIL.to_string())
            }
        });

        // Email comes from the prompt this time.
        run(&app, None, &mut io).await.unwrap();
        assert_eq!(golden.hits("POST /auth/reset-password"), 1);
    }

    #[test]
    fn checklist_marks_satisfied_rules() {
        let app = {
            let ctx = pointer_hr::HrContext::new(
                pointer_hr::HrConfig::default(),
                std::sync::Arc::new(pointer_client::MemoryTokenStore::new()),
            )
            .unwrap();
            HrApp::new(ctx)
        };
        let text = render_checks(&app, &PasswordChecks::evaluate("abcdefgh", "abcdefgh"));
        assert!(text.contains("[x] Mínimo de 8 caracteres"));
        assert!(text.contains("[ ] Uma letra maiúscula"));
        assert!(text.contains("[x] As senhas coincidem"));
    }
}
