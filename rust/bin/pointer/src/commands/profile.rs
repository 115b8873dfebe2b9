//! Own profile and password change.

use anyhow::{anyhow, Result};
use pointer_client::ManagedUser;
use pointer_hr::request::{ChangePasswordReq, LoadProfileReq};
use pointer_hr::state::ProfileState;
use pointer_hr::{HrApp, Route};

use super::{enter, restore, signed_in};

fn profile(app: &HrApp) -> Result<ProfileState> {
    signed_in(app)?;
    let state: ProfileState = app.read(ProfileState::PATH).unwrap_or_default();
    match state.error {
        Some(message) => Err(anyhow!(message)),
        None => Ok(state),
    }
}

pub async fn show(app: &HrApp) -> Result<ManagedUser> {
    restore(app).await?;
    enter(app, Route::Profile).await?;
    app.emit(LoadProfileReq::PATH, LoadProfileReq).await;
    profile(app)?
        .user
        .ok_or_else(|| anyhow!("profile not loaded"))
}

/// Returns the confirmation message.
pub async fn change_password(app: &HrApp, password: String, confirmation: String) -> Result<String> {
    restore(app).await?;
    enter(app, Route::Profile).await?;
    app.emit(ChangePasswordReq::PATH, ChangePasswordReq { password, confirmation }).await;
    Ok(profile(app)?.notice.unwrap_or_default())
}
