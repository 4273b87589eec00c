use serde::Serialize;

use crate::domain::value_objects::enums::roles::Role;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct NavItem {
    pub menu_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub display_menu_name: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<NavItem>,
    #[serde(skip)]
    pub roles: Vec<Role>,
    #[serde(skip)]
    pub require_auth: bool,
    #[serde(skip)]
    pub hide_when_authenticated: bool,
    #[serde(skip)]
    pub order: i32,
    #[serde(skip)]
    pub enabled: bool,
}

impl NavItem {
    fn link(menu_name: &str, route: &str) -> Self {
        Self {
            menu_name: menu_name.to_string(),
            route: Some(route.to_string()),
            display_menu_name: true,
            enabled: true,
            ..Default::default()
        }
    }

    fn group(menu_name: &str, submenu: Vec<NavItem>) -> Self {
        Self {
            menu_name: menu_name.to_string(),
            display_menu_name: true,
            submenu,
            enabled: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NavMenuModel {
    pub role: Role,
    pub is_authenticated: bool,
    pub items: Vec<NavItem>,
}

pub fn base_menu() -> Vec<NavItem> {
    vec![
        NavItem {
            roles: vec![Role::Admin],
            ..NavItem::group(
                "Gestion",
                vec![
                    NavItem::link("Usuarios", "/gestion/usuarios"),
                    NavItem::link("Items", "/gestion/items"),
                    NavItem::link("Ventas", "/gestion/ventas"),
                    NavItem::link("Categorías", "/gestion/categorias"),
                    NavItem::link("Tipos", "/gestion/tipos"),
                ],
            )
        },
        NavItem::group(
            "Servicios",
            vec![
                NavItem::link("Construcción", "/servicio?tipo=servicio&categoria=construccion"),
                NavItem::link("Asesoría", "/servicio?tipo=servicio&categoria=asesoria"),
                NavItem::link("Inspección", "/servicio?tipo=servicio&categoria=inspeccion"),
                NavItem::link("Pericia", "/servicio?tipo=servicio&categoria=pericia"),
            ],
        ),
        NavItem::group(
            "Sobre Nosotros",
            vec![
                NavItem::link("Quienes Somos", "/servicio/quienes-somos"),
                NavItem::link("Nuestros Proyectos", "/servicio/nuestros-proyectos"),
                NavItem::link("Misión / Visión", "/servicio/mision-vision"),
            ],
        ),
        NavItem::link("Contacto", "/contacto"),
        NavItem {
            require_auth: true,
            ..NavItem::link("Perfil", "/perfil")
        },
        NavItem {
            hide_when_authenticated: true,
            ..NavItem::link("Iniciar Sesión", "/login")
        },
        NavItem {
            require_auth: true,
            ..NavItem::link("Cerrar Sesión", "/logout")
        },
        NavItem {
            display_menu_name: false,
            require_auth: true,
            ..NavItem::link("Carrito", "/cart")
        },
    ]
}

pub fn filter_menu(items: &[NavItem], role: Role, is_authenticated: bool) -> Vec<NavItem> {
    let mut visible: Vec<NavItem> = items
        .iter()
        .filter(|item| item.enabled)
        .filter(|item| item.roles.is_empty() || item.roles.contains(&role))
        .filter(|item| !(item.require_auth && !is_authenticated))
        .filter(|item| !(item.hide_when_authenticated && is_authenticated))
        .map(|item| NavItem {
            submenu: filter_menu(&item.submenu, role, is_authenticated),
            ..item.clone()
        })
        .filter(|item| item.route.is_some() || !item.submenu.is_empty())
        .collect();

    // sort_by_key is stable, equal orders keep their declaration order.
    visible.sort_by_key(|item| item.order);
    visible
}

pub fn menu_for(role: Role, is_authenticated: bool) -> NavMenuModel {
    NavMenuModel {
        role,
        is_authenticated,
        items: filter_menu(&base_menu(), role, is_authenticated),
    }
}
