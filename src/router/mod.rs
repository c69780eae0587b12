//! Client-side routing: route table, guard policy, and the navigator that
//! ties them together.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host shell calls [`Navigator::guard`] before each navigation, the way a
//! `before_each(to, from, next)` hook would, and gets back exactly one
//! [`NavAction`]. [`Navigator::navigate`] runs the whole chain instead: it
//! follows static aliases and guard redirects, re-checking the guard on every
//! hop, and reports where the user finally lands.

pub mod guard;
pub mod routes;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

pub use guard::{NavAction, Role, decide, home_for};
pub use routes::{ROUTES, RouteDescriptor, RouteEntry, RouteMeta};

use crate::state::session::SessionFlags;

/// Upper bound on redirects followed during one navigation.
pub const MAX_REDIRECTS: usize = 8;

/// Errors produced while resolving a navigation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavError {
    /// No route or alias matches the requested path.
    #[error("no route matches path {0}")]
    NotFound(String),

    /// A guard or alias pointed at a route that is not in the table.
    #[error("unknown route name: {0}")]
    UnknownRouteName(String),

    /// Redirects kept bouncing past [`MAX_REDIRECTS`].
    #[error("too many redirects navigating to {path}")]
    RedirectLoop { path: String },
}

/// Where a navigation ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// Final route after all redirects.
    pub route: &'static RouteDescriptor,
    /// Paths visited by redirects, in order. Empty when the first target
    /// was accepted as is.
    pub hops: Vec<&'static str>,
}

impl Navigation {
    /// Document title for the landing route.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.route.meta.title
    }

    #[must_use]
    pub fn redirected(&self) -> bool {
        !self.hops.is_empty()
    }
}

/// Route table plus guard evaluation.
#[derive(Clone, Copy, Debug)]
pub struct Navigator {
    table: &'static [RouteEntry],
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

impl Navigator {
    #[must_use]
    pub fn new(table: &'static [RouteEntry]) -> Self {
        Self { table }
    }

    /// The ordered route table, aliases included.
    #[must_use]
    pub fn table(&self) -> &'static [RouteEntry] {
        self.table
    }

    /// Look up a view route by name.
    #[must_use]
    pub fn route_named(&self, name: &str) -> Option<&'static RouteDescriptor> {
        routes::find_by_name(self.table, name)
    }

    /// Resolve `path` to a view route, following static aliases.
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing matches, `RedirectLoop` when aliases cycle.
    pub fn resolve(&self, path: &str) -> Result<&'static RouteDescriptor, NavError> {
        self.resolve_tracking(path, &mut Vec::new())
    }

    /// One guard step for a navigation to `path`.
    ///
    /// # Errors
    ///
    /// Fails only when `path` does not resolve.
    pub fn guard(&self, path: &str, session: &SessionFlags) -> Result<NavAction, NavError> {
        let target = self.resolve(path)?;
        Ok(check(target, session))
    }

    /// Navigate to `path`, following every redirect to its final route.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown paths, `UnknownRouteName` when a redirect names
    /// a missing route, `RedirectLoop` after [`MAX_REDIRECTS`] hops.
    pub fn navigate(&self, path: &str, session: &SessionFlags) -> Result<Navigation, NavError> {
        let mut hops = Vec::new();
        let mut target = self.resolve_tracking(path, &mut hops)?;

        loop {
            match check(target, session) {
                NavAction::Proceed => {
                    tracing::debug!(requested = path, route = target.name, hops = hops.len(), "navigation accepted");
                    return Ok(Navigation { route: target, hops });
                }
                NavAction::RedirectTo(name) => {
                    if hops.len() >= MAX_REDIRECTS {
                        tracing::warn!(requested = path, "redirect limit reached");
                        return Err(NavError::RedirectLoop { path: path.to_owned() });
                    }
                    tracing::debug!(from = target.name, to = name, "guard redirect");
                    target = self
                        .route_named(name)
                        .ok_or_else(|| NavError::UnknownRouteName(name.to_owned()))?;
                    hops.push(target.path);
                }
            }
        }
    }

    fn resolve_tracking(
        &self,
        path: &str,
        hops: &mut Vec<&'static str>,
    ) -> Result<&'static RouteDescriptor, NavError> {
        let mut current = routes::normalize_path(path);
        for _ in 0..=MAX_REDIRECTS {
            match routes::find_entry(self.table, &current) {
                Some(RouteEntry::Route(descriptor)) => return Ok(descriptor),
                Some(RouteEntry::Redirect { to, .. }) => {
                    hops.push(*to);
                    current = routes::normalize_path(to);
                }
                None => return Err(NavError::NotFound(current)),
            }
        }
        Err(NavError::RedirectLoop { path: path.to_owned() })
    }
}

fn check(target: &RouteDescriptor, session: &SessionFlags) -> NavAction {
    let is_root = target.path == routes::ROOT_PATH;
    decide(&target.meta, is_root, session.authenticated, session.role)
}
