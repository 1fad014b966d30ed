use souk_auth::Role;
use souk_core::UserId;

/// Authenticated identity for a request.
///
/// Produced once by the auth middleware from verified claims and passed to
/// handlers as a typed extension; handlers never inspect raw claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    email: String,
    role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, email: String, role: Role) -> Self {
        Self { user_id, email, role }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
