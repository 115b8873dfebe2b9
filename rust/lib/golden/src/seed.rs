//! Seed accounts loaded into every fresh backend.
//!
//! No seeded user works in TI, so a `setor=TI` listing is empty until a
//! test creates one.

pub const ADMIN_EMAIL: &str = "ana.admin@pointer.dev";
pub const ADMIN_PASSWORD: &str = "Admin#2024";
pub const MANAGER_EMAIL: &str = "gabriel.gestor@pointer.dev";
pub const MANAGER_PASSWORD: &str = "Gestor#2024";
pub const COLLABORATOR_EMAIL: &str = "carla@pointer.dev";
pub const COLLABORATOR_PASSWORD: &str = "Colab#2024";
pub const INACTIVE_EMAIL: &str = "igor@pointer.dev";
pub const INACTIVE_PASSWORD: &str = "Inativo#2024";

/// Number of seeded users.
pub const USER_COUNT: usize = 4;

/// A user to load into the backend.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub nome: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub cargo: &'static str,
    pub setor: &'static str,
    pub tipo_usuario: &'static str,
    pub status: &'static str,
}

pub fn users() -> Vec<SeedUser> {
    vec![
        SeedUser {
            nome: "Ana Administradora",
            email: ADMIN_EMAIL,
            password: ADMIN_PASSWORD,
            cargo: "COORDENADOR",
            setor: "RH",
            tipo_usuario: "ADMIN",
            status: "ATIVO",
        },
        SeedUser {
            nome: "Gabriel Gestor",
            email: MANAGER_EMAIL,
            password: MANAGER_PASSWORD,
            cargo: "GERENTE",
            setor: "RH",
            tipo_usuario: "GESTOR",
            status: "ATIVO",
        },
        SeedUser {
            nome: "Carla Colaboradora",
            email: COLLABORATOR_EMAIL,
            password: COLLABORATOR_PASSWORD,
            cargo: "ANALISTA",
            setor: "FINANCEIRO",
            tipo_usuario: "COLABORADOR",
            status: "ATIVO",
        },
        SeedUser {
            nome: "Igor Inativo",
            email: INACTIVE_EMAIL,
            password: INACTIVE_PASSWORD,
            cargo: "VENDEDOR",
            setor: "COMERCIAL",
            tipo_usuario: "COLABORADOR",
            status: "INATIVO",
        },
    ]
}
