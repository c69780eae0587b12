use super::*;

const ROLES: [Role; 2] = [Role::Admin, Role::User];

fn meta(requires_auth: bool, requires_admin: bool, requires_guest: bool) -> RouteMeta {
    RouteMeta { title: "t", requires_auth, requires_admin, requires_guest }
}

fn all_metas() -> Vec<RouteMeta> {
    let mut metas = Vec::new();
    for auth in [false, true] {
        for admin in [false, true] {
            for guest in [false, true] {
                metas.push(meta(auth, admin, guest));
            }
        }
    }
    metas
}

// =============================================================
// Role
// =============================================================

#[test]
fn role_parse_only_admin_is_privileged() {
    assert_eq!(Role::parse("admin"), Role::Admin);
    assert_eq!(Role::parse("user"), Role::User);
    assert_eq!(Role::parse("Admin"), Role::User);
    assert_eq!(Role::parse("staff"), Role::User);
    assert_eq!(Role::parse(""), Role::User);
    assert_eq!(Role::default(), Role::User);
}

#[test]
fn home_for_role() {
    assert_eq!(home_for(Role::Admin), "dashboard");
    assert_eq!(home_for(Role::User), "user-dashboard");
}

// =============================================================
// Rule 1: root while signed in
// =============================================================

#[test]
fn root_authenticated_admin_goes_to_dashboard() {
    for m in all_metas() {
        assert_eq!(decide(&m, true, true, Role::Admin), NavAction::RedirectTo("dashboard"));
    }
}

#[test]
fn root_authenticated_user_goes_to_user_dashboard() {
    for m in all_metas() {
        assert_eq!(decide(&m, true, true, Role::User), NavAction::RedirectTo("user-dashboard"));
    }
}

#[test]
fn root_anonymous_falls_through_to_other_rules() {
    assert_eq!(decide(&meta(false, false, true), true, false, Role::User), NavAction::Proceed);
    assert_eq!(decide(&meta(true, false, false), true, false, Role::User), NavAction::RedirectTo("login"));
}

// =============================================================
// Rule 2: auth required
// =============================================================

#[test]
fn requires_auth_anonymous_goes_to_login() {
    for role in ROLES {
        for admin in [false, true] {
            for guest in [false, true] {
                assert_eq!(
                    decide(&meta(true, admin, guest), false, false, role),
                    NavAction::RedirectTo("login")
                );
            }
        }
    }
}

#[test]
fn requires_auth_signed_in_user_proceeds() {
    assert_eq!(decide(&meta(true, false, false), false, true, Role::User), NavAction::Proceed);
    assert_eq!(decide(&meta(true, false, false), false, true, Role::Admin), NavAction::Proceed);
}

// =============================================================
// Rule 3: admin required
// =============================================================

#[test]
fn requires_admin_non_admin_goes_to_user_dashboard() {
    assert_eq!(decide(&meta(true, true, false), false, true, Role::User), NavAction::RedirectTo("user-dashboard"));
    // Without requires_auth, even anonymous visitors hit the admin rule.
    assert_eq!(decide(&meta(false, true, false), false, false, Role::User), NavAction::RedirectTo("user-dashboard"));
}

#[test]
fn requires_admin_admin_proceeds() {
    assert_eq!(decide(&meta(true, true, false), false, true, Role::Admin), NavAction::Proceed);
}

#[test]
fn admin_rule_wins_over_guest_rule() {
    assert_eq!(decide(&meta(false, true, true), false, true, Role::User), NavAction::RedirectTo("user-dashboard"));
}

// =============================================================
// Rule 4: guest only
// =============================================================

#[test]
fn requires_guest_signed_in_goes_home() {
    assert_eq!(decide(&meta(false, false, true), false, true, Role::User), NavAction::RedirectTo("user-dashboard"));
    assert_eq!(decide(&meta(false, false, true), false, true, Role::Admin), NavAction::RedirectTo("dashboard"));
}

#[test]
fn requires_guest_anonymous_proceeds() {
    for role in ROLES {
        assert_eq!(decide(&meta(false, false, true), false, false, role), NavAction::Proceed);
    }
}

// =============================================================
// Rule 5: open routes
// =============================================================

#[test]
fn open_route_always_proceeds_off_root() {
    for authenticated in [false, true] {
        for role in ROLES {
            assert_eq!(decide(&meta(false, false, false), false, authenticated, role), NavAction::Proceed);
        }
    }
}

#[test]
fn redirects_only_target_known_landing_routes() {
    for m in all_metas() {
        for is_root in [false, true] {
            for authenticated in [false, true] {
                for role in ROLES {
                    if let NavAction::RedirectTo(name) = decide(&m, is_root, authenticated, role) {
                        assert!(
                            [LOGIN, ADMIN_HOME, USER_HOME].contains(&name),
                            "unexpected redirect target {name}"
                        );
                    }
                }
            }
        }
    }
}
