//! Golden backend: an in-process stand-in for the HR REST API.
//!
//! Serves every endpoint the client consumes, from in-memory state, with
//! HS256 session tokens shaped like the identity service's
//! (`sub`, `email`, `name`, `realm_access.roles`, `exp`). Tests start one
//! per case on a random loopback port:
//!
//! ```ignore
//! let golden = Golden::start().await;
//! let client = IdentityClient::new(&golden.base_url, tokens)?;
//! ```
//!
//! Knobs on [`Golden`] let tests revoke sessions, change how disabled
//! accounts are reported, delay availability probes, and inspect which
//! endpoints were hit.

pub mod seed;
mod server;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use seed::SeedUser;
use server::Backend;

/// A running golden backend.
pub struct Golden {
    pub base_url: String,
    backend: Arc<Backend>,
}

impl Golden {
    /// Start with the default seed users.
    pub async fn start() -> Golden {
        Self::start_with(seed::users()).await
    }

    pub async fn start_with(users: Vec<SeedUser>) -> Golden {
        let backend = Arc::new(Backend::new(users));
        let app = server::router(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind golden backend");
        let addr = listener.local_addr().expect("golden backend addr");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("golden backend stopped: {e}");
            }
        });

        let base_url = format!("http://{}", addr);
        wait_ready(&base_url).await;
        Golden { base_url, backend }
    }

    /// Add a user at runtime.
    pub fn add_user(&self, user: SeedUser) {
        self.backend.insert(&user);
    }

    /// Every token issued so far stops being accepted.
    pub fn revoke_sessions(&self) {
        self.backend.with(|s| s.session_epoch += 1);
    }

    /// HTTP status returned when an inactive account tries to log in.
    pub fn set_disabled_status(&self, status: u16) {
        self.backend.with(|s| s.disabled_status = status);
    }

    /// Make `/token` answer 200 with a token whose payload is not JSON.
    pub fn issue_garbage_tokens(&self, on: bool) {
        self.backend.with(|s| s.garbage_tokens = on);
    }

    /// Delay the availability probe for `email`.
    pub fn set_probe_delay(&self, email: &str, delay: Duration) {
        self.backend
            .with(|s| s.probe_delays.insert(email.to_string(), delay));
    }

    /// Last recovery code emailed to `email`.
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.backend.with(|s| s.codes.get(email).cloned())
    }

    /// Number of recovery codes sent to `email`.
    pub fn codes_sent(&self, email: &str) -> usize {
        self.backend
            .with(|s| s.codes_sent.get(email).copied().unwrap_or(0))
    }

    /// Requests served for a route template, e.g. `"POST /usuarios"` or
    /// `"GET /usuarios/verificar-email"` (path parameters omitted).
    pub fn hits(&self, route: &str) -> usize {
        self.backend
            .with(|s| s.hits.iter().filter(|h| h.as_str() == route).count())
    }

    /// Current status (`ATIVO`/`INATIVO`) of a user.
    pub fn status_of(&self, email: &str) -> Option<String> {
        self.backend.with(|s| {
            s.users
                .iter()
                .find(|u| u.email == email)
                .map(|u| u.status.clone())
        })
    }

    /// Snapshot of per-route hit counts.
    pub fn hit_counts(&self) -> HashMap<String, usize> {
        self.backend.with(|s| {
            let mut counts = HashMap::new();
            for h in &s.hits {
                *counts.entry(h.clone()).or_insert(0) += 1;
            }
            counts
        })
    }
}

async fn wait_ready(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if client.get(format!("{}/health", base_url)).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
