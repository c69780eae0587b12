//! Static route table for the admin and customer views.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host UI shell mounts one view per named route. Each entry carries the
//! metadata the guard reads (`requires_auth`, `requires_admin`,
//! `requires_guest`) and the document title shown while the route is active.
//! Views themselves live outside this crate; a route refers to its view by
//! name.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

/// Guard-relevant metadata attached to a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: &'static str,
    pub requires_auth: bool,
    pub requires_admin: bool,
    pub requires_guest: bool,
}

impl RouteMeta {
    const fn titled(title: &'static str) -> Self {
        Self { title, requires_auth: false, requires_admin: false, requires_guest: false }
    }

    const fn guest(title: &'static str) -> Self {
        Self { requires_guest: true, ..Self::titled(title) }
    }

    const fn auth(title: &'static str) -> Self {
        Self { requires_auth: true, ..Self::titled(title) }
    }

    const fn admin(title: &'static str) -> Self {
        Self { requires_auth: true, requires_admin: true, ..Self::titled(title) }
    }
}

/// A named, guarded route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub meta: RouteMeta,
}

/// One row of the route table: either a view route or a static path alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteEntry {
    Route(RouteDescriptor),
    Redirect { from: &'static str, to: &'static str },
}

/// Path of the root route. The guard treats it specially.
pub const ROOT_PATH: &str = "/";

const fn route(path: &'static str, name: &'static str, meta: RouteMeta) -> RouteEntry {
    RouteEntry::Route(RouteDescriptor { path, name, meta })
}

/// Ordered route table. Defined once, never mutated.
pub static ROUTES: &[RouteEntry] = &[
    route("/", "login", RouteMeta::guest("Login")),
    RouteEntry::Redirect { from: "/login", to: "/" },
    route("/signup", "signup", RouteMeta::guest("Sign Up")),
    route("/verify-email", "verify-email", RouteMeta::titled("Verify Email")),
    route("/dashboard", "dashboard", RouteMeta::admin("Admin Dashboard")),
    route("/user-dashboard", "user-dashboard", RouteMeta::auth("User Dashboard")),
    route("/browse-vehicles", "browse-vehicles", RouteMeta::auth("Browse Vehicles")),
    route("/my-bookings", "my-bookings", RouteMeta::auth("My Bookings")),
    route("/users", "users", RouteMeta::admin("User Management")),
    route("/vehicles", "vehicles", RouteMeta::admin("Vehicle Management")),
    route("/bookings", "bookings", RouteMeta::admin("Booking Management")),
    route("/maintenance", "maintenance", RouteMeta::admin("Maintenance")),
    route("/payments", "payments", RouteMeta::admin("Payments")),
    route("/licenses", "licenses", RouteMeta::admin("License Verification")),
];

/// Iterate the view routes of `table`, skipping aliases.
pub fn view_routes(table: &'static [RouteEntry]) -> impl Iterator<Item = &'static RouteDescriptor> {
    table.iter().filter_map(|entry| match entry {
        RouteEntry::Route(descriptor) => Some(descriptor),
        RouteEntry::Redirect { .. } => None,
    })
}

/// Look up a view route by name.
pub fn find_by_name(table: &'static [RouteEntry], name: &str) -> Option<&'static RouteDescriptor> {
    view_routes(table).find(|descriptor| descriptor.name == name)
}

/// Look up the entry for an already-normalized `path`. Matching ignores
/// ASCII case.
pub fn find_entry(table: &'static [RouteEntry], path: &str) -> Option<&'static RouteEntry> {
    table.iter().find(|entry| match entry {
        RouteEntry::Route(descriptor) => descriptor.path.eq_ignore_ascii_case(path),
        RouteEntry::Redirect { from, .. } => from.eq_ignore_ascii_case(path),
    })
}

/// Strip query string, fragment, and trailing slashes; ensure a leading `/`.
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}
