//! Account field rules mirroring the hub's registration constraints.
//!
//! The hub's `PersonName` requires at least [`NAME_MIN`] characters once
//! trimmed and its registration gate requires [`PASSWORD_MIN`] characters.
//! Demo accounts go further and always carry "strong" passwords (upper-case,
//! lower-case and a digit) so they never trip the advisory strength meter.

/// Minimum number of characters in a name or surname after trimming.
pub const NAME_MIN: usize = 2;

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Returns `true` when `name` is long enough and purely alphabetic.
///
/// # Examples
///
/// ```
/// use demo_data::is_valid_person_name;
///
/// assert!(is_valid_person_name("Ellie"));
/// assert!(is_valid_person_name("Jo"));
/// assert!(!is_valid_person_name("J"));
/// assert!(!is_valid_person_name("O'Brien"));
/// assert!(!is_valid_person_name("  "));
/// ```
#[must_use]
pub fn is_valid_person_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.chars().count() >= NAME_MIN && trimmed.chars().all(char::is_alphabetic)
}

/// Returns `true` when `password` meets the length gate and every
/// complexity rule.
///
/// # Examples
///
/// ```
/// use demo_data::is_strong_password;
///
/// assert!(is_strong_password("Abcdef1"));
/// assert!(!is_strong_password("abcdef1"));
/// assert!(!is_strong_password("Ab1"));
/// ```
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Keeps only alphabetic characters.
#[must_use]
pub(crate) fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| c.is_alphabetic()).collect()
}

/// Lower-cases and keeps ASCII alphanumerics for use in an email local part.
#[must_use]
pub(crate) fn email_fragment(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Ellie", true)]
    #[case("  Joel  ", true)]
    #[case("Ángela", true)]
    #[case("Jo", true)]
    #[case("J", false)]
    #[case("", false)]
    #[case("Mary Ann", false)]
    #[case("O'Brien", false)]
    fn person_name_rules(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_person_name(name), expected);
    }

    #[rstest]
    #[case("Abcdef1", true)]
    #[case("ABCDEF1", false)]
    #[case("abcdef1", false)]
    #[case("Abcdefg", false)]
    #[case("Ab1", false)]
    fn strong_password_rules(#[case] password: &str, #[case] expected: bool) {
        assert_eq!(is_strong_password(password), expected);
    }

    #[test]
    fn sanitize_drops_punctuation() {
        assert_eq!(sanitize_name("O'Brien-Smith"), "OBrienSmith");
    }

    #[test]
    fn email_fragment_is_lower_ascii() {
        assert_eq!(email_fragment("Müller Ann"), "mllerann");
    }
}
