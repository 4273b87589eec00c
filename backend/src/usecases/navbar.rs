use crates::domain::value_objects::{
    enums::roles::Role,
    navbar::{NavMenuModel, menu_for},
};
use tracing::debug;

use crate::auth::OptionalAuthUser;

/// Navigation menu for the caller. Anonymous callers are treated as guests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavbarUseCase;

impl NavbarUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn menu(&self, caller: &OptionalAuthUser) -> NavMenuModel {
        let role = if caller.is_authenticated() {
            caller.role()
        } else {
            Role::Guest
        };

        let menu = menu_for(role, caller.is_authenticated());
        debug!(%role, entries = menu.items.len(), "navbar: menu resolved");
        menu
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::auth::AuthUser;

    fn signed_in(role: Role) -> OptionalAuthUser {
        OptionalAuthUser(Some(AuthUser {
            user_id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            role,
            username: "ana".to_string(),
        }))
    }

    fn top_level(menu: &NavMenuModel) -> Vec<&str> {
        menu.items.iter().map(|item| item.menu_name.as_str()).collect()
    }

    #[test]
    fn anonymous_caller_gets_guest_menu() {
        let menu = NavbarUseCase::new().menu(&OptionalAuthUser(None));

        assert_eq!(menu.role, Role::Guest);
        assert!(!menu.is_authenticated);
        assert!(top_level(&menu).contains(&"Iniciar Sesión"));
        assert!(!top_level(&menu).contains(&"Perfil"));
        assert!(!top_level(&menu).contains(&"Gestion"));
    }

    #[test]
    fn admin_sees_management_and_not_login() {
        let menu = NavbarUseCase::new().menu(&signed_in(Role::Admin));

        let names = top_level(&menu);
        assert!(names.contains(&"Gestion"));
        assert!(names.contains(&"Cerrar Sesión"));
        assert!(!names.contains(&"Iniciar Sesión"));
    }

    #[test]
    fn buyer_does_not_see_management() {
        let menu = NavbarUseCase::new().menu(&signed_in(Role::Buyer));

        assert!(!top_level(&menu).contains(&"Gestion"));
        assert!(top_level(&menu).contains(&"Carrito"));
    }
}
