//! Shared fixtures for handler tests.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use pointer_client::{MemoryTokenStore, TokenStore};
use pointer_golden::{seed, Golden};

use crate::config::HrConfig;
use crate::context::HrContext;
use crate::request::*;
use crate::state::*;
use crate::HrApp;

/// Nothing listens here; every call is a network error.
const UNREACHABLE: &str = "http://127.0.0.1:9";

pub(crate) fn test_config(base_url: &str) -> HrConfig {
    HrConfig {
        email_check_debounce_ms: 50,
        ..HrConfig::default().with_api_url(base_url)
    }
}

pub(crate) fn memory_tokens() -> Arc<dyn TokenStore> {
    Arc::new(MemoryTokenStore::new())
}

pub(crate) fn app_with_context(
    golden: &Golden,
    tokens: Arc<dyn TokenStore>,
    customize: impl FnOnce(HrContext) -> HrContext,
) -> HrApp {
    let ctx = HrContext::new(test_config(&golden.base_url), tokens).unwrap();
    HrApp::new(customize(ctx))
}

pub(crate) fn app_with_tokens(golden: &Golden, tokens: Arc<dyn TokenStore>) -> HrApp {
    app_with_context(golden, tokens, |ctx| ctx)
}

pub(crate) fn app_for(golden: &Golden) -> (HrApp, Arc<dyn TokenStore>) {
    let tokens = memory_tokens();
    (app_with_tokens(golden, tokens.clone()), tokens)
}

/// Signed in as the seeded administrator.
pub(crate) async fn admin_app(golden: &Golden) -> HrApp {
    let (app, _) = app_for(golden);
    app.emit(LoginReq::PATH, login(seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD)).await;
    assert!(app.read::<AuthState>(AuthState::PATH).unwrap().is_authenticated());
    app
}

pub(crate) fn offline_app(customize: impl FnOnce(HrContext) -> HrContext) -> HrApp {
    let ctx = HrContext::new(test_config(UNREACHABLE), memory_tokens()).unwrap();
    HrApp::new(customize(ctx))
}

pub(crate) fn login(email: &str, password: &str) -> LoginReq {
    LoginReq {
        email: email.into(),
        password: password.into(),
    }
}

pub(crate) fn nav_to(path: &str) -> NavigateReq {
    NavigateReq { path: path.into() }
}

pub(crate) fn route(app: &HrApp) -> String {
    app.read::<AppRoute>(AppRoute::PATH).map(|r| r.0).unwrap_or_default()
}

pub(crate) fn cooldown(app: &HrApp) -> u64 {
    app.read::<ResendCooldown>(ResendCooldown::PATH)
        .map(|c| c.remaining_secs)
        .unwrap_or_default()
}

/// Well-formed, unsigned token for a collaborator with the given `exp`.
pub(crate) fn token_expiring_at(exp: i64) -> String {
    let claims = serde_json::json!({
        "sub": "user-9",
        "email": "old@pointer.dev",
        "name": "Old Session",
        "roles": ["colaborador"],
        "exp": exp,
    });
    let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.sig",
        b64.encode(br#"{"alg":"none"}"#),
        b64.encode(claims.to_string())
    )
}

/// Poll `path` until `pred` holds.
pub(crate) async fn wait_for<T: Any + Clone>(
    app: &HrApp,
    path: &str,
    pred: impl Fn(&T) -> bool,
) -> T {
    for _ in 0..300 {
        if let Some(value) = app.read::<T>(path) {
            if pred(&value) {
                return value;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting on {path}");
}
