//! Session state published by the auth service.

use super::user::User;

/// Who is logged in right now.
///
/// ## Invariants
/// - `Authenticated` carries the credential-free [`User`] projection only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nobody is logged in.
    #[default]
    Anonymous,
    /// A survivor is logged in.
    Authenticated(User),
}

impl SessionState {
    /// The logged-in survivor, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// `true` when a survivor is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Option<User>> for SessionState {
    fn from(value: Option<User>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}
