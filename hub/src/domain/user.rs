//! Survivor account model.
//!
//! [`User`] is the session projection handed to presentation code and never
//! carries a credential. [`RegisteredUser`] pairs it with the [`Password`]
//! and only lives inside the registered-user table.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Minimum number of characters in a name or surname once trimmed.
pub const NAME_MIN: usize = 2;

/// Minimum password length enforced at registration.
pub const PASSWORD_MIN: usize = 6;

/// Validation errors raised by the account newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    NameTooShort { min: usize },
    EmptyCountry,
    UnknownCountry { value: String },
    EmptyPassword,
    PasswordTooShort { min: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain.tld"),
            Self::NameTooShort { min } => write!(f, "must be at least {min} characters"),
            Self::EmptyCountry => write!(f, "a country must be selected"),
            Self::UnknownCountry { value } => write!(f, "'{value}' is not an available country"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the unique account key.
///
/// ## Invariants
/// - Trimmed and lower-cased.
/// - Matches `local@domain.tld` with no whitespace and a single `@`.
///
/// # Examples
/// ```
/// use survivor_hub::domain::Email;
///
/// let email = Email::new("  Ellie@Jackson.org ").unwrap();
/// assert_eq!(email.as_ref(), "ellie@jackson.org");
/// assert!(Email::new("ellie@jackson").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A given name or surname.
///
/// ## Invariants
/// - Trimmed, with at least [`NAME_MIN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and trim a name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.chars().count() < NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: NAME_MIN });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Countries offered by the registration form.
///
/// Variants are declared in label order so [`Country::ALL`] is already
/// sorted for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Country {
    Germany,
    Argentina,
    Australia,
    Bolivia,
    Brazil,
    Canada,
    Chile,
    China,
    Colombia,
    SouthKorea,
    CostaRica,
    Cuba,
    Ecuador,
    Egypt,
    ElSalvador,
    Spain,
    UnitedStates,
    France,
    Guatemala,
    Honduras,
    India,
    Italy,
    Japan,
    Kenya,
    Morocco,
    Mexico,
    Nicaragua,
    Nigeria,
    NewZealand,
    Panama,
    Paraguay,
    Peru,
    PuertoRico,
    UnitedKingdom,
    DominicanRepublic,
    Russia,
    SouthAfrica,
    Uruguay,
    Venezuela,
}

impl Country {
    /// Every selectable country, sorted by label.
    pub const ALL: [Self; 39] = [
        Self::Germany,
        Self::Argentina,
        Self::Australia,
        Self::Bolivia,
        Self::Brazil,
        Self::Canada,
        Self::Chile,
        Self::China,
        Self::Colombia,
        Self::SouthKorea,
        Self::CostaRica,
        Self::Cuba,
        Self::Ecuador,
        Self::Egypt,
        Self::ElSalvador,
        Self::Spain,
        Self::UnitedStates,
        Self::France,
        Self::Guatemala,
        Self::Honduras,
        Self::India,
        Self::Italy,
        Self::Japan,
        Self::Kenya,
        Self::Morocco,
        Self::Mexico,
        Self::Nicaragua,
        Self::Nigeria,
        Self::NewZealand,
        Self::Panama,
        Self::Paraguay,
        Self::Peru,
        Self::PuertoRico,
        Self::UnitedKingdom,
        Self::DominicanRepublic,
        Self::Russia,
        Self::SouthAfrica,
        Self::Uruguay,
        Self::Venezuela,
    ];

    /// Display label shown in the registration form and stored on disk.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Germany => "Alemania",
            Self::Argentina => "Argentina",
            Self::Australia => "Australia",
            Self::Bolivia => "Bolivia",
            Self::Brazil => "Brasil",
            Self::Canada => "Canadá",
            Self::Chile => "Chile",
            Self::China => "China",
            Self::Colombia => "Colombia",
            Self::SouthKorea => "Corea del Sur",
            Self::CostaRica => "Costa Rica",
            Self::Cuba => "Cuba",
            Self::Ecuador => "Ecuador",
            Self::Egypt => "Egipto",
            Self::ElSalvador => "El Salvador",
            Self::Spain => "España",
            Self::UnitedStates => "Estados Unidos",
            Self::France => "Francia",
            Self::Guatemala => "Guatemala",
            Self::Honduras => "Honduras",
            Self::India => "India",
            Self::Italy => "Italia",
            Self::Japan => "Japón",
            Self::Kenya => "Kenia",
            Self::Morocco => "Marruecos",
            Self::Mexico => "México",
            Self::Nicaragua => "Nicaragua",
            Self::Nigeria => "Nigeria",
            Self::NewZealand => "Nueva Zelanda",
            Self::Panama => "Panamá",
            Self::Paraguay => "Paraguay",
            Self::Peru => "Perú",
            Self::PuertoRico => "Puerto Rico",
            Self::UnitedKingdom => "Reino Unido",
            Self::DominicanRepublic => "República Dominicana",
            Self::Russia => "Rusia",
            Self::SouthAfrica => "Sudáfrica",
            Self::Uruguay => "Uruguay",
            Self::Venezuela => "Venezuela",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Country {
    type Err = UserValidationError;

    /// Parse a label, ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(UserValidationError::EmptyCountry);
        }
        Self::ALL
            .into_iter()
            .find(|country| country.label().to_lowercase() == wanted)
            .ok_or_else(|| UserValidationError::UnknownCountry {
                value: value.trim().to_owned(),
            })
    }
}

impl From<Country> for String {
    fn from(value: Country) -> Self {
        value.label().to_owned()
    }
}

impl TryFrom<String> for Country {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Account credential.
///
/// The secret is wiped from memory on drop. Whitespace is kept as typed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password; used for login attempts.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(password)))
    }

    /// Accept a password for a new account, enforcing [`PASSWORD_MIN`].
    pub fn for_registration(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = Self::new(password)?;
        if password.as_str().chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(password)
    }

    /// Raw password text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compare against a submitted password.
    #[must_use]
    pub fn matches(&self, submitted: &Password) -> bool {
        self.as_str() == submitted.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// The session projection of an account.
///
/// ## Invariants
/// - Never holds a credential; see [`RegisteredUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct User {
    name: PersonName,
    surname: PersonName,
    email: Email,
    country: Country,
    registration_date: DateTime<Utc>,
}

impl User {
    /// Build a user from validated components.
    #[must_use]
    pub fn new(
        name: PersonName,
        surname: PersonName,
        email: Email,
        country: Country,
        registration_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            surname,
            email,
            country,
            registration_date,
        }
    }

    /// Given name.
    #[must_use]
    pub fn name(&self) -> &PersonName {
        &self.name
    }

    /// Family name.
    #[must_use]
    pub fn surname(&self) -> &PersonName {
        &self.surname
    }

    /// Unique account key.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Selected country.
    #[must_use]
    pub fn country(&self) -> Country {
        self.country
    }

    /// When the account was created.
    #[must_use]
    pub fn registration_date(&self) -> DateTime<Utc> {
        self.registration_date
    }
}

/// An entry of the registered-user table: the projection plus credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegisteredUserDto", into = "RegisteredUserDto")]
pub struct RegisteredUser {
    user: User,
    password: Password,
}

impl RegisteredUser {
    /// Pair a projection with its credential.
    #[must_use]
    pub fn new(user: User, password: Password) -> Self {
        Self { user, password }
    }

    /// The credential-free projection.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Table key.
    #[must_use]
    pub fn email(&self) -> &Email {
        self.user.email()
    }

    /// Check a submitted password against the stored one.
    #[must_use]
    pub fn password_matches(&self, submitted: &Password) -> bool {
        self.password.matches(submitted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct RegisteredUserDto {
    name: String,
    surname: String,
    email: String,
    country: String,
    registration_date: DateTime<Utc>,
    password: String,
}

impl From<RegisteredUser> for RegisteredUserDto {
    fn from(value: RegisteredUser) -> Self {
        let RegisteredUser { user, password } = value;
        Self {
            name: user.name.into(),
            surname: user.surname.into(),
            email: user.email.into(),
            country: user.country.into(),
            registration_date: user.registration_date,
            password: password.as_str().to_owned(),
        }
    }
}

impl TryFrom<RegisteredUserDto> for RegisteredUser {
    type Error = UserValidationError;

    fn try_from(value: RegisteredUserDto) -> Result<Self, Self::Error> {
        let user = User::new(
            PersonName::new(value.name)?,
            PersonName::new(value.surname)?,
            Email::new(value.email)?,
            value.country.parse()?,
            value.registration_date,
        );
        Ok(Self::new(user, Password::new(value.password)?))
    }
}

#[cfg(test)]
mod tests;
