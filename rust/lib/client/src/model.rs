//! Domain types shared by the identity and directory clients.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ── Roles & identity ────────────────────────────────────────────────

/// Role tags carried by a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Collaborator,
    Manager,
    Administrator,
}

impl Role {
    /// Map a token role tag to a role. Tags the client does not model
    /// (identity-service defaults such as `offline_access`) yield `None`.
    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag.to_ascii_lowercase().as_str() {
            "colaborador" | "collaborator" | "user" => Some(Role::Collaborator),
            "gestor" | "manager" => Some(Role::Manager),
            "admin" | "administrador" | "administrator" => Some(Role::Administrator),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Collaborator => "collaborator",
            Role::Manager => "manager",
            Role::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decoded, role-bearing view of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    pub email: String,
    pub display_name: String,
    pub roles: BTreeSet<Role>,
    /// `exp` claim, seconds since epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Identity {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// [`Identity::is_expired`] against the wall clock.
    pub fn is_expired_now(&self) -> bool {
        self.is_expired(chrono::Utc::now().timestamp())
    }

    /// First letter of the display name, upper-cased.
    pub fn initial(&self) -> char {
        self.display_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('U')
    }
}

// ── Managed users ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Colaborador,
    Gestor,
    Admin,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Colaborador, UserType::Gestor, UserType::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Colaborador => "COLABORADOR",
            UserType::Gestor => "GESTOR",
            UserType::Admin => "ADMIN",
        }
    }

    pub fn parse(s: &str) -> Option<UserType> {
        UserType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Ativo,
    Inativo,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Ativo => "ATIVO",
            UserStatus::Inativo => "INATIVO",
        }
    }

    pub fn parse(s: &str) -> Option<UserStatus> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ATIVO" => Some(UserStatus::Ativo),
            "INATIVO" => Some(UserStatus::Inativo),
            _ => None,
        }
    }

    pub fn toggled(self) -> UserStatus {
        match self {
            UserStatus::Ativo => UserStatus::Inativo,
            UserStatus::Inativo => UserStatus::Ativo,
        }
    }
}

/// A user record as held by the backend. The client only keeps
/// transient copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub cargo: String,
    #[serde(default)]
    pub setor: String,
    pub tipo_usuario: UserType,
    pub status: UserStatus,
}

impl ManagedUser {
    /// Avatar initials: first letter of every name token, upper-cased.
    pub fn initials(&self) -> String {
        let s: String = self
            .nome
            .split_whitespace()
            .filter_map(|n| n.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if s.is_empty() {
            "?".to_string()
        } else {
            s
        }
    }

    /// Editable copy of this record.
    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            nome: self.nome.clone(),
            email: self.email.clone(),
            cargo: self.cargo.clone(),
            setor: self.setor.clone(),
            tipo_usuario: Some(self.tipo_usuario),
            status: Some(self.status),
        }
    }
}

fn id_from_string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }
    Ok(match RawId::deserialize(de)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub nome: String,
    pub email: String,
    pub cargo: String,
    pub setor: String,
    pub tipo_usuario: Option<UserType>,
    pub status: Option<UserStatus>,
}

impl UserDraft {
    /// Required fields, in the order they are checked.
    pub const REQUIRED: [&'static str; 6] =
        ["nome", "email", "cargo", "setor", "tipoUsuario", "status"];

    /// A blank create form: collaborator, active.
    pub fn new() -> Self {
        Self {
            tipo_usuario: Some(UserType::Colaborador),
            status: Some(UserStatus::Ativo),
            ..Default::default()
        }
    }

    /// Wire name of the first blank required field.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        let blank = |s: &str| s.trim().is_empty();
        Self::REQUIRED.into_iter().find(|field| match *field {
            "nome" => blank(&self.nome),
            "email" => blank(&self.email),
            "cargo" => blank(&self.cargo),
            "setor" => blank(&self.setor),
            "tipoUsuario" => self.tipo_usuario.is_none(),
            _ => self.status.is_none(),
        })
    }
}

// ── Listing ─────────────────────────────────────────────────────────

/// Optional listing filters; set filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

impl UserFilters {
    /// Query pairs for the set filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(setor) = self.setor.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("setor", setor.to_string()));
        }
        if let Some(cargo) = self.cargo.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("cargo", cargo.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserPage {
    #[serde(rename = "content", default)]
    pub records: Vec<ManagedUser>,
    #[serde(rename = "totalElements", default)]
    pub total_count: u64,
}
