//! Navigation guard: proceed or redirect, decided from route metadata and
//! the current session flags.
//!
//! DESIGN
//! ======
//! The decision is a pure function. The host shell reads the session once per
//! navigation and passes `authenticated` and `role` in explicitly; nothing
//! here touches storage. Rules are checked in a fixed order and the first
//! match wins, so every call yields exactly one action.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::RouteMeta;

/// Route name of the admin landing page.
pub const ADMIN_HOME: &str = "dashboard";
/// Route name of the customer landing page.
pub const USER_HOME: &str = "user-dashboard";
/// Route name of the login page.
pub const LOGIN: &str = "login";

/// Role of the signed-in user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Map a stored role string. Only `"admin"` is privileged.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == "admin" { Self::Admin } else { Self::User }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    Proceed,
    RedirectTo(&'static str),
}

/// Landing route for `role`.
#[must_use]
pub fn home_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_HOME,
        Role::User => USER_HOME,
    }
}

/// Decide whether a navigation to a route with `meta` may proceed.
///
/// 1. Root while signed in goes to the role's home.
/// 2. Auth-only routes send anonymous users to login.
/// 3. Admin-only routes send non-admins to the user dashboard.
/// 4. Guest-only routes send signed-in users to their home.
/// 5. Anything else proceeds.
#[must_use]
pub fn decide(meta: &RouteMeta, is_root: bool, authenticated: bool, role: Role) -> NavAction {
    if is_root && authenticated {
        return NavAction::RedirectTo(home_for(role));
    }
    if meta.requires_auth && !authenticated {
        return NavAction::RedirectTo(LOGIN);
    }
    if meta.requires_admin && role != Role::Admin {
        return NavAction::RedirectTo(USER_HOME);
    }
    if meta.requires_guest && authenticated {
        return NavAction::RedirectTo(home_for(role));
    }
    NavAction::Proceed
}
