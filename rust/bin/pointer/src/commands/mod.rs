pub mod profile;
pub mod recovery;
pub mod session;
pub mod users;

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use pointer_client::{FileTokenStore, Identity, TokenStore};
use pointer_hr::request::{InitializeReq, NavigateReq};
use pointer_hr::state::{AppRoute, AuthState};
use pointer_hr::{HrApp, HrContext, Route};
use serde::Serialize;

use crate::config::CliConfig;

/// Build the state engine over the configured token file.
pub fn open(config: &CliConfig) -> Result<HrApp> {
    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path()));
    let ctx = HrContext::new(config.hr.clone(), tokens)?;
    Ok(HrApp::new(ctx))
}

/// Restore the persisted session.
pub async fn restore(app: &HrApp) -> Result<Identity> {
    app.emit(InitializeReq::PATH, InitializeReq).await;
    signed_in(app)
}

/// The current identity, or the reason there is none.
pub fn signed_in(app: &HrApp) -> Result<Identity> {
    let auth: AuthState = app.read(AuthState::PATH).unwrap_or_default();
    match (auth.identity, auth.error) {
        (Some(identity), _) => Ok(identity),
        (None, Some(message)) => Err(anyhow!(message)),
        (None, None) => Err(anyhow!("Not logged in. Run `pointer login`.")),
    }
}

/// Navigate to `route` and fail unless the guard let us in.
pub async fn enter(app: &HrApp, route: Route) -> Result<()> {
    app.emit(NavigateReq::PATH, NavigateReq { path: route.path().to_string() }).await;
    let landed = app.read::<AppRoute>(AppRoute::PATH).map(|r| r.0);
    if landed.as_deref() != Some(route.path()) {
        bail!("You do not have access to {}.", route.path());
    }
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read one line from stdin. A closed stdin is an error, not an empty answer.
pub fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    let mut s = String::new();
    if std::io::stdin().read_line(&mut s)? == 0 {
        bail!("input closed");
    }
    Ok(s.trim().to_string())
}

/// Prompt for a new password twice.
pub fn prompt_new_password() -> Result<(String, String)> {
    let password = rpassword::prompt_password("New password: ")?;
    let confirmation = rpassword::prompt_password("Confirm new password: ")?;
    Ok((password, confirmation))
}

/// Pad `s` to `width` columns.
pub(crate) fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}
