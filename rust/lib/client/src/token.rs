//! Session token persistence and payload decoding.
//!
//! The token itself is opaque and signed by the identity service; this
//! client never verifies signatures. It only reads the payload segment to
//! learn who is signed in.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use base64::Engine;
use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{Identity, Role};

// ── TokenStore ──────────────────────────────────────────────────────

/// Durable client-side slot for the session token.
pub trait TokenStore: Send + Sync + 'static {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> io::Result<()>;
    /// Idempotent.
    fn clear(&self) -> io::Result<()>;
}

/// Process-local token slot.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.read().unwrap().clone()
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.slot.write().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}

/// Token persisted in a single file, readable by the owner only.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let token = content.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

// ── TokenSource ─────────────────────────────────────────────────────

/// Pluggable bearer-token provider, called before every authenticated
/// request. `Ok(None)` sends the request anonymously.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}

/// Reads the bearer token from a [`TokenStore`] on every call, so a
/// logout or re-login is picked up without rebuilding clients.
pub struct PersistedToken(Arc<dyn TokenStore>);

impl PersistedToken {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self(store)
    }
}

#[async_trait::async_trait]
impl TokenSource for PersistedToken {
    async fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.0.load())
    }
}

// ── Decoding ────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Claims {
    sub: Option<String>,
    email: Option<String>,
    name: Option<String>,
    preferred_username: Option<String>,
    realm_access: Option<RealmAccess>,
    roles: Option<Vec<String>>,
    exp: Option<i64>,
}

#[derive(Deserialize)]
struct RealmAccess {
    #[serde(default)]
    roles: Vec<String>,
}

/// Decode a token's payload segment into an [`Identity`].
///
/// Returns `None` for anything that is not a well-formed identity: missing
/// segments, bad base64, bad JSON, a blank `sub`/`email`/name, or no role
/// this client recognizes. Never panics.
pub fn decode_token(token: &str) -> Option<Identity> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
    let subject_id = non_blank(claims.sub)?;
    let email = non_blank(claims.email)?;
    let display_name = non_blank(claims.name).or_else(|| non_blank(claims.preferred_username))?;

    let tags = claims
        .realm_access
        .map(|r| r.roles)
        .into_iter()
        .flatten()
        .chain(claims.roles.into_iter().flatten());
    let roles: BTreeSet<Role> = tags.filter_map(|t| Role::from_tag(&t)).collect();
    if roles.is_empty() {
        return None;
    }

    Some(Identity {
        subject_id,
        email,
        display_name,
        roles,
        expires_at: claims.exp,
    })
}
