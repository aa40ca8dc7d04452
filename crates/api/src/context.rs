use orderdesk_auth::Role;
use orderdesk_core::UserId;

/// Verified identity for one request.
///
/// Inserted into the request's extensions exactly once by the auth
/// middleware, read-only afterwards, and dropped with the request. Routes
/// outside the protected prefix simply never carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    uid: UserId,
    username: String,
    role: Role,
}

impl AuthContext {
    pub fn new(uid: UserId, username: String, role: Role) -> Self {
        Self { uid, username, role }
    }

    pub fn uid(&self) -> UserId {
        self.uid
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
