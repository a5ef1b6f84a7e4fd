//! Registration and login inputs.
//!
//! Forms arrive as raw strings from an inbound adapter. Validation collects
//! every failing field at once so the adapter can render them inline, then
//! hands the auth service fully typed inputs.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Country, Email, Password, PersonName, UserValidationError};

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Surname,
    Email,
    Country,
    Password,
}

impl FormField {
    /// Field label used when rendering errors.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Email => "email",
            Self::Country => "country",
            Self::Password => "password",
        }
    }
}

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: FormField,
    error: UserValidationError,
}

impl FieldError {
    /// Which field failed.
    #[must_use]
    pub fn field(&self) -> FormField {
        self.field
    }

    /// Why it failed.
    #[must_use]
    pub fn error(&self) -> &UserValidationError {
        &self.error
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.error)
    }
}

/// Every field error found in one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: FormField, error: UserValidationError) {
        self.0.push(FieldError { field, error });
    }

    fn check<T>(&mut self, field: FormField, result: Result<T, UserValidationError>) -> Option<T> {
        result.map_err(|error| self.push(field, error)).ok()
    }

    /// Error for `field`, if it failed.
    #[must_use]
    pub fn for_field(&self, field: FormField) -> Option<&UserValidationError> {
        self.0
            .iter()
            .find(|entry| entry.field == field)
            .map(FieldError::error)
    }

    /// Iterate failing fields in form order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{entry}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw registration form as typed by the survivor.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub country: String,
    pub password: Zeroizing<String>,
}

impl RegistrationForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Examples
    /// ```
    /// use survivor_hub::domain::{FormField, RegistrationForm};
    ///
    /// let form = RegistrationForm {
    ///     name: "E".into(),
    ///     email: "ellie@jackson.org".into(),
    ///     ..RegistrationForm::default()
    /// };
    /// let errors = form.validate().unwrap_err();
    /// assert!(errors.for_field(FormField::Name).is_some());
    /// assert!(errors.for_field(FormField::Email).is_none());
    /// ```
    pub fn validate(&self) -> Result<RegistrationInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = errors.check(FormField::Name, PersonName::new(&self.name));
        let surname = errors.check(FormField::Surname, PersonName::new(&self.surname));
        let email = errors.check(FormField::Email, Email::new(&self.email));
        let country = errors.check(FormField::Country, self.country.parse::<Country>());
        let password = errors.check(
            FormField::Password,
            Password::for_registration(self.password.as_str()),
        );

        match (name, surname, email, country, password) {
            (Some(name), Some(surname), Some(email), Some(country), Some(password)) => {
                Ok(RegistrationInput {
                    name,
                    surname,
                    email,
                    country,
                    password,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    name: PersonName,
    surname: PersonName,
    email: Email,
    country: Country,
    password: Password,
}

impl RegistrationInput {
    /// Build from already validated parts.
    #[must_use]
    pub fn new(
        name: PersonName,
        surname: PersonName,
        email: Email,
        country: Country,
        password: Password,
    ) -> Self {
        Self {
            name,
            surname,
            email,
            country,
            password,
        }
    }

    /// Email the account will be keyed by.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    pub(crate) fn into_parts(self) -> (PersonName, PersonName, Email, Country, Password) {
        (
            self.name,
            self.surname,
            self.email,
            self.country,
            self.password,
        )
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised exactly like registration so lookups agree.
/// - `password` is non-empty and keeps caller-provided whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = errors.check(FormField::Email, Email::new(email));
        let password = errors.check(FormField::Password, Password::new(password));
        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(errors),
        }
    }

    /// Email used for the table lookup.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Submitted password.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Complexity rules surfaced by the strength meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
}

impl PasswordRule {
    const ALL: [Self; 4] = [Self::MinLength, Self::Uppercase, Self::Lowercase, Self::Digit];

    fn satisfied_by(self, password: &str) -> bool {
        match self {
            Self::MinLength => password.chars().count() >= super::user::PASSWORD_MIN,
            Self::Uppercase => password.chars().any(char::is_uppercase),
            Self::Lowercase => password.chars().any(char::is_lowercase),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
        }
    }

    /// Hint shown when the rule is not met.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::MinLength => "use at least 6 characters",
            Self::Uppercase => "add an upper-case letter",
            Self::Lowercase => "add a lower-case letter",
            Self::Digit => "add a digit",
        }
    }
}

/// Advisory strength band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        })
    }
}

/// Result of scoring a password against [`PasswordRule`]s.
///
/// Only the minimum length blocks registration; the other rules feed the
/// meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordAssessment {
    score: u8,
    strength: PasswordStrength,
    missing: Vec<PasswordRule>,
}

impl PasswordAssessment {
    const POINTS_PER_RULE: u8 = 25;
    const MEDIUM_FROM: u8 = 50;
    const STRONG_FROM: u8 = 75;

    /// Score `password` out of 100.
    ///
    /// # Examples
    /// ```
    /// use survivor_hub::domain::{PasswordAssessment, PasswordStrength};
    ///
    /// assert_eq!(PasswordAssessment::of("Abcdef1").strength(), PasswordStrength::Strong);
    /// assert_eq!(PasswordAssessment::of("abc").strength(), PasswordStrength::Weak);
    /// ```
    #[must_use]
    pub fn of(password: &str) -> Self {
        let missing: Vec<_> = PasswordRule::ALL
            .into_iter()
            .filter(|rule| !rule.satisfied_by(password))
            .collect();
        let met = PasswordRule::ALL.len() - missing.len();
        let score = u8::try_from(met).unwrap_or(0) * Self::POINTS_PER_RULE;
        let strength = if score >= Self::STRONG_FROM {
            PasswordStrength::Strong
        } else if score >= Self::MEDIUM_FROM {
            PasswordStrength::Medium
        } else {
            PasswordStrength::Weak
        };
        Self {
            score,
            strength,
            missing,
        }
    }

    /// Score out of 100.
    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Band for the score.
    #[must_use]
    pub fn strength(&self) -> PasswordStrength {
        self.strength
    }

    /// Rules not yet met, in display order.
    #[must_use]
    pub fn missing(&self) -> &[PasswordRule] {
        &self.missing
    }
}
