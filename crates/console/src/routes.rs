//! Route configuration: the guarded pages and the landing priority list.
//!
//! The two tables are maintained by hand. [`table_mismatches`] reports drift
//! between them; it is checked in tests, not at runtime.

use backoffice_auth::{AccessCondition, Role};

use crate::landing::LandingEntry;

pub const LOGIN_PATH: &str = "/login";
pub const ROOT_PATH: &str = "/";

/// A guarded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: &'static str,
    pub title: &'static str,
    pub condition: AccessCondition,
}

impl RouteSpec {
    fn new(path: &'static str, title: &'static str, condition: AccessCondition) -> Self {
        Self { path, title, condition }
    }
}

/// Every protected route of the console.
pub fn protected_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec::new("/productos", "Productos", AccessCondition::permission("productos.ver")),
        RouteSpec::new("/tienda", "Tienda", AccessCondition::permission("productos.ver_tienda")),
        RouteSpec::new("/calculos", "Cálculos", AccessCondition::permission("precios.calcular")),
        RouteSpec::new(
            "/preparacion",
            "Preparación de pedidos",
            AccessCondition::permission("pedidos.ver_preparacion"),
        ),
        RouteSpec::new(
            "/etiquetas",
            "Etiquetas de envío",
            AccessCondition::any_of(["envios.ver_etiquetas", "envios.imprimir_etiquetas"]),
        ),
        RouteSpec::new(
            "/dashboard-ventas",
            "Dashboard de ventas",
            AccessCondition::permission("dashboard.ver_ventas"),
        ),
        RouteSpec::new("/alertas", "Alertas", AccessCondition::any_of(["alertas.ver", "alertas.gestionar"])),
        RouteSpec::new(
            "/notificaciones",
            "Notificaciones",
            AccessCondition::permission("notificaciones.ver"),
        ),
        RouteSpec::new("/admin/pms", "Gestión de PMs", AccessCondition::permission("admin.gestionar_pms")),
        RouteSpec::new(
            "/admin/permisos",
            "Permisos",
            AccessCondition::all_of(["admin.ver_permisos", "admin.editar_permisos"]),
        ),
        RouteSpec::new("/admin/usuarios", "Usuarios", AccessCondition::roles([Role::SUPERADMIN, Role::ADMIN])),
    ]
}

/// Landing priority, most-used destinations first. First match wins.
pub fn landing_priority() -> Vec<LandingEntry> {
    vec![
        LandingEntry::new("/productos", AccessCondition::permission("productos.ver")),
        LandingEntry::new("/dashboard-ventas", AccessCondition::permission("dashboard.ver_ventas")),
        LandingEntry::new("/preparacion", AccessCondition::permission("pedidos.ver_preparacion")),
        LandingEntry::new(
            "/etiquetas",
            AccessCondition::any_of(["envios.ver_etiquetas", "envios.imprimir_etiquetas"]),
        ),
        LandingEntry::new("/tienda", AccessCondition::permission("productos.ver_tienda")),
        LandingEntry::new("/calculos", AccessCondition::permission("precios.calcular")),
        LandingEntry::new("/alertas", AccessCondition::any_of(["alertas.ver", "alertas.gestionar"])),
        LandingEntry::new("/notificaciones", AccessCondition::permission("notificaciones.ver")),
        LandingEntry::new("/admin/pms", AccessCondition::permission("admin.gestionar_pms")),
    ]
}

/// Landing entries that point at an unguarded path or disagree with the
/// route's own condition.
pub fn table_mismatches(routes: &[RouteSpec], landing: &[LandingEntry]) -> Vec<String> {
    landing
        .iter()
        .filter_map(|entry| match routes.iter().find(|r| r.path == entry.path()) {
            None => Some(format!("landing entry {} has no guarded route", entry.path())),
            Some(route) if route.condition != *entry.condition() => Some(format!(
                "landing entry {} requires {:?} but the route requires {:?}",
                entry.path(),
                entry.condition(),
                route.condition
            )),
            Some(_) => None,
        })
        .collect()
}
