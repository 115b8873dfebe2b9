//! Role-dependent navigation menu.

use pointer_client::{Identity, Role};
use serde::{Deserialize, Serialize};

use crate::guard::Route;

/// One menu entry. `label` is a message-catalog key until the shell
/// translates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub path: String,
}

impl MenuItem {
    fn new(label: &str, route: Route) -> Self {
        Self {
            label: label.to_string(),
            path: route.path().to_string(),
        }
    }
}

pub fn menu_for(identity: &Identity) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem::new("ui/menu/dashboard", Route::Dashboard),
        MenuItem::new("ui/menu/feedbacks", Route::Feedbacks),
        MenuItem::new("ui/menu/announcements", Route::Announcements),
        MenuItem::new("ui/menu/pdi", Route::DevelopmentPlan),
        MenuItem::new("ui/menu/profile", Route::Profile),
    ];
    if identity.has_role(Role::Manager) {
        items.push(MenuItem::new("ui/menu/team", Route::TeamManagement));
    }
    if identity.has_role(Role::Administrator) {
        items.push(MenuItem::new("ui/menu/users", Route::AdminUsers));
        items.push(MenuItem::new("ui/menu/reports", Route::AdminReports));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(roles: &[Role]) -> Identity {
        Identity {
            subject_id: "1".into(),
            email: "x@pointer.dev".into(),
            display_name: "X".into(),
            roles: roles.iter().copied().collect(),
            expires_at: None,
        }
    }

    fn paths(items: &[MenuItem]) -> Vec<&str> {
        items.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn collaborator_menu() {
        let m = menu_for(&identity(&[Role::Collaborator]));
        assert_eq!(paths(&m), ["/", "/feedbacks", "/comunicados", "/meu-pdi", "/perfil"]);
    }

    #[test]
    fn manager_and_admin_extras() {
        let m = menu_for(&identity(&[Role::Manager]));
        assert!(paths(&m).contains(&"/gestor"));
        assert!(!paths(&m).contains(&"/admin/users"));

        let m = menu_for(&identity(&[Role::Administrator]));
        assert!(paths(&m).ends_with(&["/admin/users", "/admin/relatorios"]));
        assert!(!paths(&m).contains(&"/gestor"));
    }
}
