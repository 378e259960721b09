/**
 * Role Router
 *
 * Decides which top-level surface a session lands on and what it may do
 * there. Everything here is a pure function of the session value, so the
 * presentation layer can be tested without a navigator.
 */

use crate::shared::{Role, Session};

/// Top-level landing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Session not resolved yet; wait, do not navigate
    Splash,
    /// Login/signup entry point
    Welcome,
    TeacherHome,
    StudentHome,
    AdminHome,
}

impl Destination {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Destination::Splash | Destination::Welcome)
    }
}

/// Action a session may take on its surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ViewClasses,
    TakeAttendance,
    ManageEnrollment,
    ReviewAttendanceRequests,
    ViewOwnAttendance,
    SubmitAttendanceRequest,
    ManageUsers,
}

const TEACHER_CAPABILITIES: &[Capability] = &[
    Capability::ViewClasses,
    Capability::TakeAttendance,
    Capability::ManageEnrollment,
    Capability::ReviewAttendanceRequests,
];

const STUDENT_CAPABILITIES: &[Capability] = &[
    Capability::ViewClasses,
    Capability::ViewOwnAttendance,
    Capability::SubmitAttendanceRequest,
];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::ViewClasses,
    Capability::TakeAttendance,
    Capability::ManageEnrollment,
    Capability::ReviewAttendanceRequests,
    Capability::ViewOwnAttendance,
    Capability::SubmitAttendanceRequest,
    Capability::ManageUsers,
];

/// Landing surface for a session
pub fn route(session: &Session) -> Destination {
    match session {
        Session::Unresolved => Destination::Splash,
        Session::Anonymous => Destination::Welcome,
        Session::Authenticated(identity) => home_for(identity.role()),
    }
}

fn home_for(role: &Role) -> Destination {
    match role {
        Role::Admin => Destination::AdminHome,
        Role::Student => Destination::StudentHome,
        // Unknown roles get the teacher surface, never admin
        Role::Teacher | Role::Unrecognized(_) => Destination::TeacherHome,
    }
}

/// Everything `session` is allowed to do
pub fn capabilities(session: &Session) -> &'static [Capability] {
    match session.identity().map(|identity| identity.role()) {
        Some(Role::Admin) => ADMIN_CAPABILITIES,
        Some(Role::Student) => STUDENT_CAPABILITIES,
        Some(Role::Teacher | Role::Unrecognized(_)) => TEACHER_CAPABILITIES,
        None => &[],
    }
}

impl Session {
    pub fn can(&self, capability: Capability) -> bool {
        capabilities(self).contains(&capability)
    }
}

/// `requested` if the session may land there, otherwise its own home
pub fn guard(session: &Session, requested: Destination) -> Destination {
    let home = route(session);
    let allowed = match session {
        Session::Unresolved | Session::Anonymous => requested == home,
        // Admins may visit the other homes; everyone else stays on their own
        Session::Authenticated(identity) => {
            requested == home || (identity.role().is_admin() && requested.requires_auth())
        }
    };

    if allowed {
        requested
    } else {
        tracing::debug!("Redirecting {:?} to {:?}", requested, home);
        home
    }
}
