//! User directory client: listing, lookup, create, update, status toggle.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::http::{self, Endpoint};
use crate::model::{ManagedUser, UserDraft, UserFilters, UserPage};
use crate::token::TokenSource;

/// Email-availability probe, the one call the user form debounces.
#[async_trait::async_trait]
pub trait EmailProbe: Send + Sync + 'static {
    async fn check_email_available(&self, email: &str) -> Result<bool, ApiError>;
}

/// Wraps the backend `usuarios` resource. Every call carries the bearer
/// token from the configured [`TokenSource`]; a 401 surfaces as
/// [`ApiError::Unauthorized`] for the caller to end the session.
pub struct UserDirectoryClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    token_source: Arc<dyn TokenSource>,
}

impl UserDirectoryClient {
    pub fn new(base_url: &str, token_source: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: Endpoint::parse(base_url)?,
            token_source,
        })
    }

    async fn authed(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// One page of users. `page` is zero-based.
    pub async fn list(
        &self,
        page: u32,
        page_size: u32,
        filters: &UserFilters,
    ) -> Result<UserPage, ApiError> {
        let mut query = vec![("page", page.to_string()), ("size", page_size.to_string())];
        query.extend(filters.query_pairs());
        debug!(page, page_size, ?filters, "listing users");

        let req = self.http.get(self.endpoint.url(&["usuarios"])).query(&query);
        let resp = self.authed(req).await?.send().await?;
        match http::check(resp).await {
            Ok(resp) => http::json(resp).await,
            Err(r) => Err(r.into_error()),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<ManagedUser, ApiError> {
        let req = self.http.get(self.endpoint.url(&["usuarios", email]));
        let resp = self.authed(req).await?.send().await?;
        match http::check(resp).await {
            Ok(resp) => http::json(resp).await,
            Err(r) => Err(r.into_error()),
        }
    }

    /// Create a user. The backend emails the initial password; the client
    /// never sends one.
    pub async fn create(&self, draft: &UserDraft) -> Result<(), ApiError> {
        if let Some(field) = draft.first_blank_field() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
        let req = self.http.post(self.endpoint.url(&["usuarios"])).json(draft);
        let resp = self.authed(req).await?.send().await?;
        match http::check(resp).await {
            Ok(_) => {
                info!(email = %draft.email, "user created");
                Ok(())
            }
            Err(r) if r.status == StatusCode::CONFLICT => Err(ApiError::DuplicateEmail),
            Err(r) if is_validation(r.status) => Err(ApiError::Validation(r.message)),
            Err(r) => Err(r.into_error()),
        }
    }

    /// Update the user with `id`. The record's email is sent as loaded;
    /// it is not editable through this call.
    pub async fn update(&self, id: &str, original: &ManagedUser, draft: &UserDraft) -> Result<(), ApiError> {
        let mut payload = draft.clone();
        payload.email = original.email.clone();
        if let Some(field) = payload.first_blank_field() {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
        let url = self.endpoint.url(&["usuarios", "atualizar-usuario", id]);
        let req = self.http.put(url).json(&payload);
        let resp = self.authed(req).await?.send().await?;
        match http::check(resp).await {
            Ok(_) => {
                info!(id, email = %payload.email, "user updated");
                Ok(())
            }
            Err(r) if is_validation(r.status) => Err(ApiError::Validation(r.message)),
            Err(r) => Err(r.into_error()),
        }
    }

    /// Flip ATIVO/INATIVO for `email`. Callers reload rather than flip a
    /// local copy.
    pub async fn toggle_status(&self, email: &str) -> Result<(), ApiError> {
        let url = self.endpoint.url(&["usuarios", "alterar-status"]);
        let req = self.http.post(url).json(&serde_json::json!({ "email": email }));
        let resp = self.authed(req).await?.send().await?;
        match http::check(resp).await {
            Ok(_) => {
                info!(email, "user status toggled");
                Ok(())
            }
            Err(r) => Err(r.into_error()),
        }
    }
}

#[async_trait::async_trait]
impl EmailProbe for UserDirectoryClient {
    /// 2xx means unused. Any other 4xx except 401 means taken.
    async fn check_email_available(&self, email: &str) -> Result<bool, ApiError> {
        let req = self
            .http
            .get(self.endpoint.url(&["usuarios", "verificar-email", email]));
        let resp = self.authed(req).await?.send().await?;
        match http::check(resp).await {
            Ok(_) => Ok(true),
            Err(r) if r.status.is_client_error() && r.status != StatusCode::UNAUTHORIZED => Ok(false),
            Err(r) => Err(r.into_error()),
        }
    }
}

fn is_validation(status: StatusCode) -> bool {
    status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{UserStatus, UserType};
    use crate::token::{MemoryTokenStore, PersistedToken, TokenStore};
    use crate::IdentityClient;
    use pointer_golden::{Golden, seed};

    async fn admin_client(golden: &Golden) -> UserDirectoryClient {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        IdentityClient::new(&golden.base_url, tokens.clone())
            .unwrap()
            .login(seed::ADMIN_EMAIL, seed::ADMIN_PASSWORD)
            .await
            .unwrap();
        UserDirectoryClient::new(&golden.base_url, Arc::new(PersistedToken::new(tokens))).unwrap()
    }

    fn draft(nome: &str, email: &str) -> UserDraft {
        UserDraft {
            nome: nome.into(),
            email: email.into(),
            cargo: "DESENVOLVEDOR".into(),
            setor: "TI".into(),
            tipo_usuario: Some(UserType::Colaborador),
            status: Some(UserStatus::Ativo),
        }
    }

    #[tokio::test]
    async fn list_paginates_and_filters() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;

        let all = client.list(0, 10, &UserFilters::default()).await.unwrap();
        assert_eq!(all.total_count, seed::USER_COUNT as u64);
        assert_eq!(all.records.len(), seed::USER_COUNT);

        let first = client.list(0, 2, &UserFilters::default()).await.unwrap();
        let second = client.list(1, 2, &UserFilters::default()).await.unwrap();
        assert_eq!(first.records.len(), 2);
        assert_ne!(first.records[0].email, second.records[0].email);

        let inactive = UserFilters { status: Some(UserStatus::Inativo), ..Default::default() };
        let page = client.list(0, 10, &inactive).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.records[0].email, seed::INACTIVE_EMAIL);

        let rh_manager = UserFilters {
            setor: Some("RH".into()),
            cargo: Some("GERENTE".into()),
            status: None,
        };
        let page = client.list(0, 10, &rh_manager).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].email, seed::MANAGER_EMAIL);
    }

    #[tokio::test]
    async fn list_without_session_is_unauthorized() {
        let golden = Golden::start().await;
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let client =
            UserDirectoryClient::new(&golden.base_url, Arc::new(PersistedToken::new(tokens))).unwrap();
        let err = client.list(0, 10, &UserFilters::default()).await.unwrap_err();
        assert!(err.is_unauthorized(), "got {err:?}");
    }

    #[tokio::test]
    async fn revoked_session_is_unauthorized() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;
        golden.revoke_sessions();
        let err = client.get_by_email(seed::ADMIN_EMAIL).await.unwrap_err();
        assert!(err.is_unauthorized(), "got {err:?}");
    }

    #[tokio::test]
    async fn availability_probe() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;
        assert!(!client.check_email_available(seed::MANAGER_EMAIL).await.unwrap());
        assert!(client.check_email_available("nova.pessoa@pointer.dev").await.unwrap());
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;

        client.create(&draft("Nina Nova", "nina@pointer.dev")).await.unwrap();
        let u = client.get_by_email("nina@pointer.dev").await.unwrap();
        assert_eq!(u.nome, "Nina Nova");
        assert_eq!(u.status, UserStatus::Ativo);
        assert!(!u.id.is_empty());
    }

    #[tokio::test]
    async fn create_duplicate_is_duplicate_email() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;
        let err = client
            .create(&draft("Outro Nome", seed::MANAGER_EMAIL))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail), "got {err:?}");
    }

    #[tokio::test]
    async fn create_with_blank_field_never_reaches_backend() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;
        let mut d = draft("Nina Nova", "nina@pointer.dev");
        d.setor = " ".into();

        let err = client.create(&d).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m.contains("setor")), "got {err:?}");
        assert_eq!(golden.hits("POST /usuarios"), 0);
    }

    #[tokio::test]
    async fn update_keeps_original_email() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;
        let original = client.get_by_email(seed::COLLABORATOR_EMAIL).await.unwrap();

        let mut d = original.to_draft();
        d.nome = "Carla Renomeada".into();
        d.email = "hijack@pointer.dev".into();
        client.update(&original.id, &original, &d).await.unwrap();

        let after = client.get_by_email(seed::COLLABORATOR_EMAIL).await.unwrap();
        assert_eq!(after.nome, "Carla Renomeada");
        assert!(client.check_email_available("hijack@pointer.dev").await.unwrap());
    }

    #[tokio::test]
    async fn toggle_status_flips_on_backend() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;

        client.toggle_status(seed::COLLABORATOR_EMAIL).await.unwrap();
        let u = client.get_by_email(seed::COLLABORATOR_EMAIL).await.unwrap();
        assert_eq!(u.status, UserStatus::Inativo);

        client.toggle_status(seed::COLLABORATOR_EMAIL).await.unwrap();
        let u = client.get_by_email(seed::COLLABORATOR_EMAIL).await.unwrap();
        assert_eq!(u.status, UserStatus::Ativo);
    }

    #[tokio::test]
    async fn get_unknown_email_is_service_404() {
        let golden = Golden::start().await;
        let client = admin_client(&golden).await;
        let err = client.get_by_email("ninguem@pointer.dev").await.unwrap_err();
        assert!(matches!(err, ApiError::Service { status: 404, .. }), "got {err:?}");
    }
}
