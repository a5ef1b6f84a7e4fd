//! Failures raised by the auth service.
//!
//! Every variant is terminal for the single call that raised it; the
//! survivor can correct the input and submit again.

use super::credentials::ValidationErrors;
use super::session_store::StoreError;
use super::user::Email;

/// Authentication and registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The email already belongs to a registered survivor.
    #[error("an account already exists for {email}")]
    DuplicateEmail { email: Email },
    /// No registered survivor uses the email.
    #[error("no account found for {email}")]
    UserNotFound { email: Email },
    /// The email exists but the password differs.
    #[error("incorrect password")]
    InvalidPassword,
    /// One or more form fields failed validation.
    #[error("invalid form: {0}")]
    Validation(#[from] ValidationErrors),
    /// The outcome could not be persisted, so it was not published.
    #[error("could not save your session: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// Follow-up hint shown beneath the error banner.
    ///
    /// # Examples
    /// ```
    /// use survivor_hub::domain::{AuthError, Email};
    ///
    /// let email = Email::new("joel@jackson.org").unwrap();
    /// let err = AuthError::UserNotFound { email };
    /// assert!(err.suggestion().unwrap().contains("register"));
    /// ```
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::DuplicateEmail { .. } => Some("log in with that email instead"),
            Self::UserNotFound { .. } => Some("register a new account with that email"),
            Self::InvalidPassword => Some("check your password and try again"),
            Self::Validation(_) => None,
            Self::Storage(_) => Some("try again in a moment"),
        }
    }
}
