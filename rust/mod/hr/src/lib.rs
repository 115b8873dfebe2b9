//! HR client state engine.
//!
//! Owns every piece of client-side logic: the session, the route guard,
//! the password-recovery flow, the user console and form, the profile page
//! and the navigation shell. State lives at store paths (`auth/state`,
//! `users/console`, ...); a renderer reads those and emits requests.
//!
//! ```ignore
//! let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(path));
//! let app = HrApp::new(HrContext::new(HrConfig::default(), tokens)?);
//! app.emit(InitializeReq::PATH, InitializeReq).await;
//! app.emit(LoginReq::PATH, LoginReq { email, password }).await;
//! let auth: AuthState = app.read(AuthState::PATH).unwrap_or_default();
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod i18n_strings;
pub mod nav;
pub mod probe;
pub mod recovery;
pub mod request;
pub mod state;
pub mod validation;

use std::any::Any;
use std::sync::Arc;

use pointer_flux::Flux;

pub use config::HrConfig;
pub use context::HrContext;
pub use error::FlowError;
pub use guard::{can_access, Decision, Route};
pub use recovery::{RecoveryService, RecoveryStage};
pub use validation::PasswordChecks;

/// A Flux instance with every HR handler registered.
pub struct HrApp {
    flux: Flux,
    ctx: Arc<HrContext>,
}

impl HrApp {
    pub fn new(ctx: HrContext) -> Self {
        let flux = Flux::new();
        let ctx = Arc::new(ctx);
        handlers::register_handlers(&flux, Arc::clone(&ctx));
        Self { flux, ctx }
    }

    /// Run the handler for `path` to completion.
    pub async fn emit<T: Any + Send + Sync>(&self, path: &str, payload: T) {
        self.flux.emit(path, payload).await;
    }

    pub fn read<T: Any + Clone>(&self, path: &str) -> Option<T> {
        self.flux.read(path)
    }

    /// Translate a message-catalog key.
    pub fn t(&self, key: &str) -> String {
        self.ctx.t(key)
    }

    pub fn flux(&self) -> &Flux {
        &self.flux
    }

    pub fn ctx(&self) -> &Arc<HrContext> {
        &self.ctx
    }
}
