//! Identity client: credential exchange and password recovery.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::http::{self, Endpoint};
use crate::model::Identity;
use crate::token::{self, TokenStore};

/// Client id sent with every credential exchange.
pub const DEFAULT_CLIENT_ID: &str = "pointer";

/// Statuses of a login rejection that mean "account exists but may not sign
/// in". Backends that signal this differently override it with
/// [`IdentityClient::with_disabled_statuses`].
pub const DEFAULT_DISABLED_STATUSES: [u16; 2] = [403, 423];

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Wraps the token-issuing and password-recovery endpoints.
///
/// Owns the persisted token slot: `login` writes it, `logout` clears it.
pub struct IdentityClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    client_id: String,
    tokens: Arc<dyn TokenStore>,
    disabled_statuses: Vec<u16>,
}

impl IdentityClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: Endpoint::parse(base_url)?,
            client_id: DEFAULT_CLIENT_ID.to_string(),
            tokens,
            disabled_statuses: DEFAULT_DISABLED_STATUSES.to_vec(),
        })
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_disabled_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.disabled_statuses = statuses.into_iter().collect();
        self
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Exchange credentials for a session token, persist it, and return
    /// the identity it carries.
    ///
    /// A token that does not decode is not kept.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let url = self.endpoint.url(&["token"]);
        debug!(%url, email, "requesting session token");
        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({
                "clientId": self.client_id,
                "username": email,
                "password": password,
                "grantType": "password",
            }))
            .send()
            .await?;

        let resp = match http::check(resp).await {
            Ok(resp) => resp,
            Err(r) if r.status == StatusCode::UNAUTHORIZED => {
                info!(email, "login rejected: invalid credentials");
                return Err(ApiError::InvalidCredentials);
            }
            Err(r) if self.disabled_statuses.contains(&r.code()) => {
                info!(email, status = r.code(), "login rejected: account disabled");
                return Err(ApiError::AccountDisabled);
            }
            Err(r) => {
                warn!(email, status = r.code(), "login failed");
                return Err(ApiError::Service {
                    status: r.code(),
                    message: r.message,
                });
            }
        };

        let body: TokenResponse = http::json(resp).await?;
        self.tokens.save(&body.access_token)?;
        match token::decode_token(&body.access_token) {
            Some(identity) => {
                info!(email, roles = ?identity.roles, "logged in");
                Ok(identity)
            }
            None => {
                warn!(email, "token issued for login does not decode; discarding");
                self.tokens.clear()?;
                Err(ApiError::Decode("session token payload".into()))
            }
        }
    }

    /// See [`token::decode_token`].
    pub fn decode_token(token: &str) -> Option<Identity> {
        token::decode_token(token)
    }

    /// Identity of the persisted token, if any decodes.
    pub fn current_identity(&self) -> Option<Identity> {
        self.tokens.load().and_then(|t| token::decode_token(&t))
    }

    /// Drop the persisted token. Idempotent.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.tokens.clear()?;
        debug!("session token cleared");
        Ok(())
    }

    /// Ask the backend to email a recovery code.
    pub async fn request_password_code(&self, email: &str) -> Result<(), ApiError> {
        let url = self.endpoint.url(&["esqueceu-senha"]);
        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        match http::check(resp).await {
            Ok(_) => {
                info!(email, "recovery code requested");
                Ok(())
            }
            Err(r) if r.status == StatusCode::NOT_FOUND => Err(ApiError::EmailNotFound),
            Err(r) => Err(service(r)),
        }
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        let url = self.endpoint.url(&["auth", "verify-code"]);
        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email, "code": code }))
            .send()
            .await?;
        match http::check(resp).await {
            Ok(_) => Ok(()),
            Err(r) if r.status == StatusCode::BAD_REQUEST || r.status == StatusCode::GONE => {
                info!(email, "recovery code rejected");
                Err(ApiError::InvalidCode)
            }
            Err(r) => Err(service(r)),
        }
    }

    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), ApiError> {
        let url = self.endpoint.url(&["auth", "reset-password"]);
        let resp = self
            .http
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": new_password }))
            .send()
            .await?;
        match http::check(resp).await {
            Ok(_) => {
                info!(email, "password reset");
                Ok(())
            }
            Err(r) => Err(service(r)),
        }
    }
}

// Recovery endpoints are anonymous, so a 401 there is not a session signal.
fn service(r: http::Rejection) -> ApiError {
    ApiError::Service {
        status: r.code(),
        message: r.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;
    use pointer_golden::{Golden, seed};

    fn client(golden: &Golden) -> (IdentityClient, Arc<dyn TokenStore>) {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        (IdentityClient::new(&golden.base_url, tokens.clone()).unwrap(), tokens)
    }

    #[tokio::test]
    async fn login_persists_token_and_returns_identity() {
        let golden = Golden::start().await;
        let (client, tokens) = client(&golden);

        let id = client.login(seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD).await.unwrap();
        assert_eq!(id.email, seed::ADMIN_EMAIL);
        assert!(id.has_role(crate::Role::Administrator));
        assert!(tokens.load().is_some());
        assert_eq!(client.current_identity(), Some(id));
    }

    #[tokio::test]
    async fn login_wrong_password_is_invalid_credentials() {
        let golden = Golden::start().await;
        let (client, tokens) = client(&golden);

        let err = client.login(seed::ADMIN_EMAIL, "wrong-password").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials), "got {err:?}");
        assert!(tokens.load().is_none());
    }

    #[tokio::test]
    async fn login_inactive_account_is_account_disabled() {
        let golden = Golden::start().await;
        let (client, _) = client(&golden);

        let err = client
            .login(seed::INACTIVE_EMAIL, seed::INACTIVE_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccountDisabled), "got {err:?}");
    }

    #[tokio::test]
    async fn disabled_status_list_is_configurable() {
        let golden = Golden::start().await;
        golden.set_disabled_status(500);
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());

        let strict = IdentityClient::new(&golden.base_url, tokens.clone()).unwrap();
        let err = strict
            .login(seed::INACTIVE_EMAIL, seed::INACTIVE_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Service { status: 500, .. }), "got {err:?}");

        let legacy = IdentityClient::new(&golden.base_url, tokens)
            .unwrap()
            .with_disabled_statuses([500]);
        let err = legacy
            .login(seed::INACTIVE_EMAIL, seed::INACTIVE_PASSWORD)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AccountDisabled), "got {err:?}");
    }

    #[tokio::test]
    async fn undecodable_token_is_not_kept() {
        let golden = Golden::start().await;
        golden.issue_garbage_tokens(true);
        let (client, tokens) = client(&golden);

        let err = client.login(seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
        assert!(tokens.load().is_none());
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        // Port 9 (discard) on loopback: nothing listens there in test envs.
        let client = IdentityClient::new("http://127.0.0.1:9", tokens).unwrap();
        let err = client.login("a@b.co", "Secret#123").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let golden = Golden::start().await;
        let (client, tokens) = client(&golden);
        client.login(seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD).await.unwrap();

        client.logout().unwrap();
        client.logout().unwrap();
        assert!(tokens.load().is_none());
        assert!(client.current_identity().is_none());
    }

    #[tokio::test]
    async fn recovery_round_trip() {
        let golden = Golden::start().await;
        let (client, _) = client(&golden);

        client.request_password_code(seed::COLLABORATOR_EMAIL).await.unwrap();
        let code = golden.last_code(seed::COLLABORATOR_EMAIL).unwrap();

        let err = client.verify_code(seed::COLLABORATOR_EMAIL, "000000").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCode), "got {err:?}");

        client.verify_code(seed::COLLABORATOR_EMAIL, &code).await.unwrap();
        client.reset_password(seed::COLLABORATOR_EMAIL, "Nova#Senha1").await.unwrap();

        let id = client.login(seed::COLLABORATOR_EMAIL, "Nova#Senha1").await.unwrap();
        assert_eq!(id.email, seed::COLLABORATOR_EMAIL);
    }

    #[tokio::test]
    async fn recovery_for_unknown_email_is_email_not_found() {
        let golden = Golden::start().await;
        let (client, _) = client(&golden);
        let err = client.request_password_code("ninguem@empresa.com").await.unwrap_err();
        assert!(matches!(err, ApiError::EmailNotFound), "got {err:?}");
    }

    #[tokio::test]
    async fn reset_without_verified_code_is_service_error() {
        let golden = Golden::start().await;
        let (client, _) = client(&golden);
        let err = client
            .reset_password(seed::COLLABORATOR_EMAIL, "Nova#Senha1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Service { status: 400, .. }), "got {err:?}");
    }
}
