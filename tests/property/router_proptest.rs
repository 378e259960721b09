//! Property-based tests for the role router

use proptest::prelude::*;
use rollcall::client::{guard, route, Destination};
use rollcall::shared::{Identity, Role, Session};

fn any_session() -> impl Strategy<Value = Session> {
    prop_oneof![
        Just(Session::Unresolved),
        Just(Session::Anonymous),
        ("[a-z0-9]{1,12}", "[A-Za-z ]{1,20}", "[a-z]{1,8}@[a-z]{1,8}\\.edu", "[A-Za-z]{0,10}").prop_map(
            |(id, name, email, role)| Session::Authenticated(Identity::new(id, name, email, Role::from(role)))
        ),
    ]
}

fn any_destination() -> impl Strategy<Value = Destination> {
    prop_oneof![
        Just(Destination::Splash),
        Just(Destination::Welcome),
        Just(Destination::TeacherHome),
        Just(Destination::StudentHome),
        Just(Destination::AdminHome),
    ]
}

proptest! {
    #[test]
    fn route_is_deterministic_and_leaves_input_alone(session in any_session()) {
        let before = session.clone();
        let first = route(&session);
        let second = route(&session);
        prop_assert_eq!(first, second);
        prop_assert_eq!(session, before);
    }

    #[test]
    fn only_admin_role_reaches_admin_home(role in "[A-Za-z]{0,10}") {
        let session = Session::Authenticated(Identity::new("1", "N", "n@school.edu", Role::from(role.clone())));
        let is_admin = role.eq_ignore_ascii_case("admin");
        prop_assert_eq!(route(&session) == Destination::AdminHome, is_admin);
        prop_assert_eq!(guard(&session, Destination::AdminHome) == Destination::AdminHome, is_admin);
    }

    #[test]
    fn guard_never_lets_signed_out_sessions_in(requested in any_destination()) {
        prop_assert!(!guard(&Session::Anonymous, requested).requires_auth());
        prop_assert_eq!(guard(&Session::Unresolved, requested), Destination::Splash);
    }

    #[test]
    fn guard_result_is_always_reachable(session in any_session(), requested in any_destination()) {
        let landed = guard(&session, requested);
        // Landing again on where guard sent us is always allowed
        prop_assert_eq!(guard(&session, landed), landed);
    }
}
