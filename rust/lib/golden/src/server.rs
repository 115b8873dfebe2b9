//! Routes and in-memory state of the golden backend.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::seed::SeedUser;

const JWT_SECRET: &str = "golden-hr-jwt-secret";
const TOKEN_TTL_SECS: i64 = 3600;
const DEFAULT_PAGE_SIZE: usize = 10;

pub(crate) struct Row {
    pub id: u64,
    pub nome: String,
    pub email: String,
    pub password: String,
    pub cargo: String,
    pub setor: String,
    pub tipo_usuario: String,
    pub status: String,
}

impl Row {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "nome": self.nome,
            "email": self.email,
            "cargo": self.cargo,
            "setor": self.setor,
            "tipoUsuario": self.tipo_usuario,
            "status": self.status,
        })
    }

    fn role_tags(&self) -> Vec<String> {
        let tag = match self.tipo_usuario.as_str() {
            "ADMIN" => "admin",
            "GESTOR" => "gestor",
            _ => "colaborador",
        };
        vec!["offline_access".to_string(), tag.to_string()]
    }
}

pub(crate) struct BackendState {
    pub users: Vec<Row>,
    pub next_id: u64,
    pub codes: HashMap<String, String>,
    pub codes_sent: HashMap<String, usize>,
    pub verified: HashSet<String>,
    pub session_epoch: u64,
    pub disabled_status: u16,
    pub garbage_tokens: bool,
    pub probe_delays: HashMap<String, Duration>,
    pub hits: Vec<String>,
}

pub(crate) struct Backend {
    state: Mutex<BackendState>,
}

impl Backend {
    pub fn new(seed: Vec<SeedUser>) -> Self {
        let backend = Self {
            state: Mutex::new(BackendState {
                users: Vec::new(),
                next_id: 1,
                codes: HashMap::new(),
                codes_sent: HashMap::new(),
                verified: HashSet::new(),
                session_epoch: 0,
                disabled_status: 403,
                garbage_tokens: false,
                probe_delays: HashMap::new(),
                hits: Vec::new(),
            }),
        };
        for u in &seed {
            backend.insert(u);
        }
        backend
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn insert(&self, u: &SeedUser) {
        self.with(|s| {
            let id = s.next_id;
            s.next_id += 1;
            s.users.push(Row {
                id,
                nome: u.nome.to_string(),
                email: u.email.to_string(),
                password: u.password.to_string(),
                cargo: u.cargo.to_string(),
                setor: u.setor.to_string(),
                tipo_usuario: u.tipo_usuario.to_string(),
                status: u.status.to_string(),
            });
        });
    }

    fn hit(&self, route: &str) {
        self.with(|s| s.hits.push(route.to_string()));
    }
}

type AppState = Arc<Backend>;

pub(crate) fn router(backend: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route("/token", post(token))
        .route("/esqueceu-senha", post(forgot_password))
        .route("/auth/verify-code", post(verify_code))
        .route("/auth/reset-password", post(reset_password))
        .route("/usuarios", get(list_users).post(create_user))
        .route("/usuarios/alterar-status", post(toggle_status))
        .route("/usuarios/atualizar-usuario/:id", put(update_user))
        .route("/usuarios/verificar-email/:email", get(check_email))
        .route("/usuarios/:email", get(get_user))
        .with_state(backend)
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

// ── Tokens ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    name: String,
    realm_access: RealmAccess,
    exp: i64,
    epoch: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RealmAccess {
    roles: Vec<String>,
}

fn sign(claims: &Claims) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("sign golden token")
}

/// Verify the bearer token and its session epoch.
fn authorize(backend: &Backend, headers: &HeaderMap) -> Result<Claims, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "missing bearer token"))?;
    let claims = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| reject(StatusCode::UNAUTHORIZED, "invalid token"))?
    .claims;
    if claims.epoch != backend.with(|s| s.session_epoch) {
        return Err(reject(StatusCode::UNAUTHORIZED, "session revoked"));
    }
    Ok(claims)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest {
    #[allow(dead_code)]
    client_id: String,
    username: String,
    password: String,
    grant_type: String,
}

async fn token(State(b): State<AppState>, Json(req): Json<TokenRequest>) -> Response {
    b.hit("POST /token");
    if req.grant_type != "password" {
        return reject(StatusCode::BAD_REQUEST, "unsupported grant type");
    }
    let outcome = b.with(|s| {
        let user = s
            .users
            .iter()
            .find(|u| u.email == req.username && u.password == req.password);
        match user {
            None => Err(reject(StatusCode::UNAUTHORIZED, "Email ou senha inválidos")),
            Some(u) if u.status != "ATIVO" => {
                let status = StatusCode::from_u16(s.disabled_status)
                    .unwrap_or(StatusCode::FORBIDDEN);
                Err(reject(status, "Usuário inativo"))
            }
            Some(u) => Ok((
                Claims {
                    sub: format!("user-{}", u.id),
                    email: u.email.clone(),
                    name: u.nome.clone(),
                    realm_access: RealmAccess { roles: u.role_tags() },
                    exp: chrono::Utc::now().timestamp() + TOKEN_TTL_SECS,
                    epoch: s.session_epoch,
                },
                s.garbage_tokens,
            )),
        }
    });
    match outcome {
        Err(resp) => resp,
        Ok((claims, garbage)) => {
            let access_token = if garbage {
                "header.bm90LWpzb24.signature".to_string()
            } else {
                sign(&claims)
            };
            Json(json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "expires_in": TOKEN_TTL_SECS,
            }))
            .into_response()
        }
    }
}

// ── Password recovery ───────────────────────────────────────────────

#[derive(Deserialize)]
struct EmailBody {
    email: String,
}

async fn forgot_password(State(b): State<AppState>, Json(req): Json<EmailBody>) -> Response {
    b.hit("POST /esqueceu-senha");
    b.with(|s| {
        if !s.users.iter().any(|u| u.email == req.email) {
            return reject(StatusCode::NOT_FOUND, "Email não encontrado");
        }
        let sent = s.codes_sent.entry(req.email.clone()).or_insert(0);
        *sent += 1;
        let code = format!("{:06}", 100_000 + (*sent * 7919 + req.email.len() * 31) % 900_000);
        s.codes.insert(req.email.clone(), code);
        s.verified.remove(&req.email);
        Json(json!({ "message": "code sent" })).into_response()
    })
}

#[derive(Deserialize)]
struct VerifyBody {
    email: String,
    code: String,
}

async fn verify_code(State(b): State<AppState>, Json(req): Json<VerifyBody>) -> Response {
    b.hit("POST /auth/verify-code");
    b.with(|s| match s.codes.get(&req.email) {
        Some(code) if *code == req.code => {
            s.verified.insert(req.email.clone());
            Json(json!({ "valid": true })).into_response()
        }
        _ => reject(StatusCode::BAD_REQUEST, "Código inválido"),
    })
}

#[derive(Deserialize)]
struct ResetBody {
    email: String,
    password: String,
}

async fn reset_password(State(b): State<AppState>, Json(req): Json<ResetBody>) -> Response {
    b.hit("POST /auth/reset-password");
    b.with(|s| {
        if !s.verified.remove(&req.email) {
            return reject(StatusCode::BAD_REQUEST, "code not verified");
        }
        s.codes.remove(&req.email);
        match s.users.iter_mut().find(|u| u.email == req.email) {
            Some(u) => {
                u.password = req.password.clone();
                Json(json!({ "message": "password updated" })).into_response()
            }
            None => reject(StatusCode::NOT_FOUND, "Email não encontrado"),
        }
    })
}

// ── Users ───────────────────────────────────────────────────────────

async fn list_users(
    State(b): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    b.hit("GET /usuarios");
    if let Err(resp) = authorize(&b, &headers) {
        return resp;
    }
    let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = q
        .get("size")
        .and_then(|p| p.parse().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let wanted = |key: &str, value: &str| q.get(key).map_or(true, |v| v.is_empty() || v == value);

    b.with(|s| {
        let matching: Vec<&Row> = s
            .users
            .iter()
            .filter(|u| {
                wanted("setor", &u.setor) && wanted("cargo", &u.cargo) && wanted("status", &u.status)
            })
            .collect();
        let total = matching.len();
        let content: Vec<Value> = matching
            .iter()
            .skip(page * size)
            .take(size)
            .map(|u| u.to_json())
            .collect();
        Json(json!({
            "content": content,
            "totalElements": total,
            "totalPages": total.div_ceil(size),
            "number": page,
            "size": size,
        }))
        .into_response()
    })
}

async fn get_user(
    State(b): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Response {
    b.hit("GET /usuarios/:email");
    if let Err(resp) = authorize(&b, &headers) {
        return resp;
    }
    b.with(|s| match s.users.iter().find(|u| u.email == email) {
        Some(u) => Json(u.to_json()).into_response(),
        None => reject(StatusCode::NOT_FOUND, "Usuário não encontrado"),
    })
}

async fn check_email(
    State(b): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Response {
    b.hit("GET /usuarios/verificar-email");
    if let Err(resp) = authorize(&b, &headers) {
        return resp;
    }
    let delay = b.with(|s| s.probe_delays.get(&email).copied());
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    b.with(|s| {
        if s.users.iter().any(|u| u.email == email) {
            reject(StatusCode::CONFLICT, "Email já cadastrado")
        } else {
            Json(json!({ "available": true })).into_response()
        }
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserBody {
    #[serde(default)]
    nome: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    cargo: String,
    #[serde(default)]
    setor: String,
    #[serde(default)]
    tipo_usuario: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl UserBody {
    fn has_blank(&self) -> bool {
        [&self.nome, &self.email, &self.cargo, &self.setor]
            .iter()
            .any(|v| v.trim().is_empty())
            || self.tipo_usuario.is_none()
            || self.status.is_none()
    }
}

async fn create_user(
    State(b): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UserBody>,
) -> Response {
    b.hit("POST /usuarios");
    if let Err(resp) = authorize(&b, &headers) {
        return resp;
    }
    if req.has_blank() {
        return reject(StatusCode::BAD_REQUEST, "campos obrigatórios ausentes");
    }
    b.with(|s| {
        if s.users.iter().any(|u| u.email == req.email) {
            return reject(StatusCode::CONFLICT, "Email já cadastrado");
        }
        let id = s.next_id;
        s.next_id += 1;
        let row = Row {
            id,
            nome: req.nome.clone(),
            email: req.email.clone(),
            password: format!("Inicial#{id}"),
            cargo: req.cargo.clone(),
            setor: req.setor.clone(),
            tipo_usuario: req.tipo_usuario.clone().unwrap_or_default(),
            status: req.status.clone().unwrap_or_default(),
        };
        let body = row.to_json();
        s.users.push(row);
        (StatusCode::CREATED, Json(body)).into_response()
    })
}

async fn update_user(
    State(b): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(req): Json<UserBody>,
) -> Response {
    b.hit("PUT /usuarios/atualizar-usuario");
    if let Err(resp) = authorize(&b, &headers) {
        return resp;
    }
    if req.has_blank() {
        return reject(StatusCode::BAD_REQUEST, "campos obrigatórios ausentes");
    }
    b.with(|s| match s.users.iter_mut().find(|u| u.id == id) {
        Some(u) => {
            // Email is the account key and never changes here.
            u.nome = req.nome.clone();
            u.cargo = req.cargo.clone();
            u.setor = req.setor.clone();
            u.tipo_usuario = req.tipo_usuario.clone().unwrap_or_default();
            u.status = req.status.clone().unwrap_or_default();
            Json(u.to_json()).into_response()
        }
        None => reject(StatusCode::NOT_FOUND, "Usuário não encontrado"),
    })
}

async fn toggle_status(
    State(b): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<EmailBody>,
) -> Response {
    b.hit("POST /usuarios/alterar-status");
    if let Err(resp) = authorize(&b, &headers) {
        return resp;
    }
    b.with(|s| match s.users.iter_mut().find(|u| u.email == req.email) {
        Some(u) => {
            u.status = if u.status == "ATIVO" { "INATIVO" } else { "ATIVO" }.to_string();
            Json(u.to_json()).into_response()
        }
        None => reject(StatusCode::NOT_FOUND, "Usuário não encontrado"),
    })
}
