use super::*;

fn admin() -> SessionFlags {
    SessionFlags::new(true, Role::Admin)
}

fn user() -> SessionFlags {
    SessionFlags::new(true, Role::User)
}

fn anonymous() -> SessionFlags {
    SessionFlags::anonymous()
}

// =============================================================
// resolve
// =============================================================

#[test]
fn resolve_follows_login_alias_to_root() {
    let nav = Navigator::default();
    assert_eq!(nav.resolve("/login").unwrap().name, "login");
    assert_eq!(nav.resolve("/login/").unwrap().path, "/");
}

#[test]
fn navigate_matches_paths_regardless_of_case() {
    let landed = Navigator::default().navigate("/Dashboard", &admin()).unwrap();
    assert_eq!(landed.route.name, "dashboard");
    assert!(!landed.redirected());
}

#[test]
fn resolve_unknown_path_is_not_found() {
    let nav = Navigator::default();
    assert_eq!(nav.resolve("/reports"), Err(NavError::NotFound("/reports".to_owned())));
}

// =============================================================
// guard (single step)
// =============================================================

#[test]
fn guard_returns_single_step_action() {
    let nav = Navigator::default();
    assert_eq!(nav.guard("/users", &anonymous()).unwrap(), NavAction::RedirectTo("login"));
    assert_eq!(nav.guard("/users", &user()).unwrap(), NavAction::RedirectTo("user-dashboard"));
    assert_eq!(nav.guard("/users", &admin()).unwrap(), NavAction::Proceed);
    assert_eq!(nav.guard("/", &admin()).unwrap(), NavAction::RedirectTo("dashboard"));
    assert_eq!(nav.guard("/login", &user()).unwrap(), NavAction::RedirectTo("user-dashboard"));
}

// =============================================================
// navigate (full chain)
// =============================================================

#[test]
fn anonymous_visitor_lands_on_login_for_protected_pages() {
    let nav = Navigator::default();
    let result = nav.navigate("/dashboard", &anonymous()).unwrap();
    assert_eq!(result.route.name, "login");
    assert_eq!(result.hops, vec!["/"]);
    assert_eq!(result.title(), "Login");
    assert!(result.redirected());
}

#[test]
fn anonymous_visitor_sees_guest_pages() {
    let nav = Navigator::default();
    let root = nav.navigate("/", &anonymous()).unwrap();
    assert_eq!(root.route.name, "login");
    assert!(!root.redirected());

    let signup = nav.navigate("/signup", &anonymous()).unwrap();
    assert_eq!(signup.route.name, "signup");
}

#[test]
fn signed_in_users_leave_root_for_their_home() {
    let nav = Navigator::default();
    assert_eq!(nav.navigate("/", &admin()).unwrap().route.name, "dashboard");
    assert_eq!(nav.navigate("/", &user()).unwrap().route.name, "user-dashboard");
}

#[test]
fn login_alias_redirects_signed_in_user_home() {
    let nav = Navigator::default();
    let result = nav.navigate("/login", &user()).unwrap();
    assert_eq!(result.route.name, "user-dashboard");
    assert_eq!(result.hops, vec!["/", "/user-dashboard"]);
}

#[test]
fn non_admin_is_bounced_from_admin_pages() {
    let nav = Navigator::default();
    for path in ["/dashboard", "/users", "/vehicles", "/bookings", "/maintenance", "/payments", "/licenses"] {
        let result = nav.navigate(path, &user()).unwrap();
        assert_eq!(result.route.name, "user-dashboard", "from {path}");
        assert_eq!(result.title(), "User Dashboard");
    }
}

#[test]
fn admin_reaches_admin_pages_directly() {
    let nav = Navigator::default();
    let result = nav.navigate("/payments?status=pending", &admin()).unwrap();
    assert_eq!(result.route.name, "payments");
    assert!(result.hops.is_empty());
}

#[test]
fn signed_in_user_on_signup_goes_home() {
    let nav = Navigator::default();
    assert_eq!(nav.navigate("/signup", &admin()).unwrap().route.name, "dashboard");
    assert_eq!(nav.navigate("/signup", &user()).unwrap().route.name, "user-dashboard");
}

#[test]
fn verify_email_is_reachable_by_everyone() {
    let nav = Navigator::default();
    for session in [anonymous(), user(), admin()] {
        assert_eq!(nav.navigate("/verify-email", &session).unwrap().route.name, "verify-email");
    }
}

#[test]
fn navigate_unknown_path_errors() {
    let nav = Navigator::default();
    assert!(matches!(nav.navigate("/nowhere", &admin()), Err(NavError::NotFound(_))));
}

#[test]
fn redirect_to_missing_route_name_errors() {
    static TABLE: &[RouteEntry] = &[RouteEntry::Route(RouteDescriptor {
        path: "/reports",
        name: "reports",
        meta: RouteMeta { title: "Reports", requires_auth: true, requires_admin: false, requires_guest: false },
    })];
    let nav = Navigator::new(TABLE);
    assert_eq!(
        nav.navigate("/reports", &anonymous()),
        Err(NavError::UnknownRouteName("login".to_owned()))
    );
}

#[test]
fn guard_redirect_cycle_is_cut_off() {
    // An admin-only login page bounces non-admins to a guest-only home that
    // sends them back: no route ever proceeds.
    static TABLE: &[RouteEntry] = &[
        RouteEntry::Route(RouteDescriptor {
            path: "/",
            name: "login",
            meta: RouteMeta { title: "Login", requires_auth: false, requires_admin: true, requires_guest: false },
        }),
        RouteEntry::Route(RouteDescriptor {
            path: "/home",
            name: "user-dashboard",
            meta: RouteMeta { title: "Home", requires_auth: true, requires_admin: false, requires_guest: false },
        }),
    ];
    let nav = Navigator::new(TABLE);
    assert_eq!(
        nav.navigate("/home", &anonymous()),
        Err(NavError::RedirectLoop { path: "/home".to_owned() })
    );
}

#[test]
fn alias_cycle_is_cut_off() {
    static TABLE: &[RouteEntry] = &[
        RouteEntry::Redirect { from: "/a", to: "/b" },
        RouteEntry::Redirect { from: "/b", to: "/a" },
    ];
    let nav = Navigator::new(TABLE);
    assert_eq!(nav.resolve("/a"), Err(NavError::RedirectLoop { path: "/a".to_owned() }));
}

#[test]
fn default_navigator_uses_static_table() {
    let nav = Navigator::default();
    assert_eq!(nav.table().len(), ROUTES.len());
    assert_eq!(nav.route_named("my-bookings").unwrap().path, "/my-bookings");
}
