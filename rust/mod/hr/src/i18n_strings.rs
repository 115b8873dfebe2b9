//! User-facing text in pt-BR (default) and en.

use std::collections::HashMap;
use std::sync::Arc;

use pointer_flux::{I18nHandler, I18nStore, QueryParams};

pub fn register_all(i18n: &I18nStore) {
    i18n.handle(
        "ui/users/summary",
        Arc::new(|_: &str, q: &QueryParams, locale: &str| {
            let shown = q.get("shown").unwrap_or("0");
            let total = q.get("total").unwrap_or("0");
            match locale_index(locale) {
                EN => format!("Showing {shown} of {total} users"),
                _ => format!("Mostrando {shown} de {total} usuários"),
            }
        }),
    );
    i18n.handle("ui/#", Arc::new(Table::new(UI)));
    i18n.handle("toast/#", Arc::new(Table::new(TOAST)));
    i18n.handle("field/#", Arc::new(Table::new(FIELDS)));
    i18n.handle("error/#", Arc::new(ErrorStrings::new()));
}

const PT: usize = 0;
const EN: usize = 1;

fn locale_index(locale: &str) -> usize {
    if locale.starts_with("en") {
        EN
    } else {
        PT
    }
}

type Entries = &'static [(&'static str, [&'static str; 2])];

const UI: Entries = &[
    ("ui/login/title", ["Entrar", "Sign in"]),
    ("ui/login/email", ["E-mail", "Email"]),
    ("ui/login/password", ["Senha", "Password"]),
    ("ui/login/forgot", ["Esqueceu a senha?", "Forgot your password?"]),
    ("ui/menu/dashboard", ["Dashboard", "Dashboard"]),
    ("ui/menu/feedbacks", ["Feedbacks", "Feedback"]),
    ("ui/menu/announcements", ["Comunicados", "Announcements"]),
    ("ui/menu/pdi", ["Meu PDI", "My IDP"]),
    ("ui/menu/profile", ["Perfil", "Profile"]),
    ("ui/menu/team", ["Gestão de Equipe", "Team management"]),
    ("ui/menu/users", ["Usuários", "Users"]),
    ("ui/menu/reports", ["Relatórios", "Reports"]),
    ("ui/shell/logout", ["Sair", "Log out"]),
    ("ui/user-type/admin", ["Administrador", "Administrator"]),
    ("ui/user-type/gestor", ["Gestor", "Manager"]),
    ("ui/user-type/colaborador", ["Colaborador", "Collaborator"]),
    ("ui/status/ativo", ["Ativo", "Active"]),
    ("ui/status/inativo", ["Inativo", "Inactive"]),
    ("ui/users/loading", ["Carregando usuários...", "Loading users..."]),
    ("ui/users/empty", ["Nenhum usuário encontrado", "No users found"]),
    ("ui/email/checking", ["Verificando e-mail...", "Checking email..."]),
    ("ui/email/available", ["E-mail disponível", "Email available"]),
    ("ui/email/taken", ["E-mail já cadastrado", "Email already registered"]),
    ("ui/recovery/code", ["Código de verificação", "Verification code"]),
    ("ui/recovery/new-password", ["Nova senha", "New password"]),
    ("ui/recovery/confirm", ["Confirmar senha", "Confirm password"]),
    ("ui/recovery/code-resent", ["Novo código enviado para o seu e-mail", "A new code was sent to your email"]),
    ("ui/recovery/password-reset", ["Senha redefinida com sucesso! Faça login.", "Password reset. Please sign in."]),
    ("ui/profile/password-changed", ["Senha alterada com sucesso!", "Password changed."]),
    ("ui/check/min-length", ["Mínimo de 8 caracteres", "At least 8 characters"]),
    ("ui/check/uppercase", ["Uma letra maiúscula", "One uppercase letter"]),
    ("ui/check/digit", ["Um número", "One digit"]),
    ("ui/check/special", ["Um caractere especial", "One special character"]),
    ("ui/check/matches", ["As senhas coincidem", "Passwords match"]),
];

const TOAST: Entries = &[
    ("toast/status-updated", ["Status do usuário atualizado com sucesso!", "User status updated."]),
    ("toast/user-created", ["Usuário cadastrado com sucesso! A senha inicial foi enviada por e-mail.", "User created. The initial password was emailed."]),
    ("toast/user-updated", ["Usuário atualizado com sucesso!", "User updated."]),
];

const FIELDS: Entries = &[
    ("field/nome", ["Nome", "Name"]),
    ("field/email", ["E-mail", "Email"]),
    ("field/cargo", ["Cargo", "Job title"]),
    ("field/setor", ["Setor", "Department"]),
    ("field/tipoUsuario", ["Tipo de usuário", "User type"]),
    ("field/status", ["Status", "Status"]),
    ("field/senha", ["Senha", "Password"]),
    ("field/codigo", ["Código", "Code"]),
];

/// Fixed strings keyed by full path.
struct Table {
    data: HashMap<&'static str, [&'static str; 2]>,
}

impl Table {
    fn new(entries: Entries) -> Self {
        Self {
            data: entries.iter().copied().collect(),
        }
    }
}

impl I18nHandler for Table {
    fn translate(&self, path: &str, _query: &QueryParams, locale: &str) -> String {
        match self.data.get(path) {
            Some(texts) => texts[locale_index(locale)].to_string(),
            None => path.to_string(),
        }
    }
}

/// Error messages; some interpolate query arguments.
struct ErrorStrings {
    fields: Table,
    fixed: Table,
}

const ERRORS: Entries = &[
    ("error/email-format", ["Informe um e-mail válido", "Enter a valid email"]),
    ("error/password-length", ["A senha deve ter pelo menos 8 caracteres", "Password must be at least 8 characters"]),
    ("error/password-policy", ["A senha não atende aos requisitos", "Password does not meet the requirements"]),
    ("error/password-mismatch", ["As senhas não coincidem", "Passwords do not match"]),
    ("error/full-name", ["Informe o nome completo", "Enter the full name"]),
    ("error/cargo-sector", ["Cargo inválido para o setor selecionado", "Job title not valid for the selected department"]),
    ("error/email-taken", ["Este e-mail já está cadastrado", "This email is already registered"]),
    ("error/email-unchecked", ["Aguarde a verificação do e-mail", "Wait for the email check to finish"]),
    ("error/invalid-step", ["Etapa inválida. Recomece a recuperação de senha.", "Invalid step. Start password recovery again."]),
    ("error/session-expired", ["Sessão expirada. Faça login novamente.", "Session expired. Please sign in again."]),
    ("error/invalid-credentials", ["Email ou senha inválidos", "Invalid email or password"]),
    ("error/account-disabled", ["Usuário inativo. Contate o administrador.", "Account disabled. Contact an administrator."]),
    ("error/email-not-found", ["Email não encontrado", "Email not found"]),
    ("error/invalid-code", ["Código inválido ou expirado", "Invalid or expired code"]),
    ("error/network", ["Não foi possível conectar ao servidor", "Could not reach the server"]),
    ("error/validation", ["Dados inválidos", "Invalid data"]),
    ("error/service", ["Erro no servidor. Tente novamente.", "Server error. Please try again."]),
];

impl ErrorStrings {
    fn new() -> Self {
        Self {
            fields: Table::new(FIELDS),
            fixed: Table::new(ERRORS),
        }
    }
}

impl I18nHandler for ErrorStrings {
    fn translate(&self, path: &str, query: &QueryParams, locale: &str) -> String {
        let pt = locale_index(locale) == PT;
        match path {
            "error/required" => {
                let key = format!("field/{}", query.get("field").unwrap_or("?"));
                let field = self.fields.translate(&key, query, locale);
                if pt {
                    format!("O campo {field} é obrigatório")
                } else {
                    format!("{field} is required")
                }
            }
            "error/cooldown" => {
                let secs = query.get("seconds").unwrap_or("0");
                if pt {
                    format!("Aguarde {secs}s para reenviar o código")
                } else {
                    format!("Wait {secs}s before resending the code")
                }
            }
            _ => self.fixed.translate(path, query, locale),
        }
    }
}
