//! Tests for the survivor account model.

use super::*;
use chrono::TimeZone;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn ellie() -> RegisteredUser {
    let registered = Utc
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let user = User::new(
        PersonName::new("Ellie").expect("name"),
        PersonName::new("Williams").expect("surname"),
        Email::new("ellie@jackson.org").expect("email"),
        Country::Mexico,
        registered,
    );
    RegisteredUser::new(user, Password::new("Abcdef1").expect("password"))
}

#[rstest]
#[case("ellie@jackson.org", "ellie@jackson.org")]
#[case("  Ellie@Jackson.ORG  ", "ellie@jackson.org")]
#[case("joel.miller+patrol@fireflies.net", "joel.miller+patrol@fireflies.net")]
fn email_normalises(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(Email::new(input).expect("valid email").as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("ellie", UserValidationError::InvalidEmail)]
#[case("ellie@jackson", UserValidationError::InvalidEmail)]
#[case("ellie@@jackson.org", UserValidationError::InvalidEmail)]
#[case("el lie@jackson.org", UserValidationError::InvalidEmail)]
fn email_rejects(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(input), Err(expected));
}

#[rstest]
#[case("Jo", "Jo")]
#[case("  Ellie ", "Ellie")]
#[case("Ángela", "Ángela")]
fn person_name_accepts(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(PersonName::new(input).expect("valid name").as_ref(), expected);
}

#[rstest]
#[case("")]
#[case("E")]
#[case("  E  ")]
fn person_name_rejects_short(#[case] input: &str) {
    assert_eq!(
        PersonName::new(input),
        Err(UserValidationError::NameTooShort { min: NAME_MIN })
    );
}

#[rstest]
#[case("México", Country::Mexico)]
#[case("méxico", Country::Mexico)]
#[case(" REINO UNIDO ", Country::UnitedKingdom)]
#[case("Corea del Sur", Country::SouthKorea)]
fn country_parses_labels(#[case] input: &str, #[case] expected: Country) {
    assert_eq!(input.parse::<Country>(), Ok(expected));
}

#[test]
fn country_rejects_unknown_and_blank() {
    assert_eq!(
        "Atlantis".parse::<Country>(),
        Err(UserValidationError::UnknownCountry {
            value: "Atlantis".to_owned()
        })
    );
    assert_eq!("  ".parse::<Country>(), Err(UserValidationError::EmptyCountry));
}

#[test]
fn country_list_is_sorted_and_complete() {
    let labels: Vec<_> = Country::ALL.iter().map(|c| c.label()).collect();
    let mut sorted = labels.clone();
    sorted.sort_unstable();

    assert_eq!(labels.len(), 39);
    assert_eq!(labels, sorted);
}

#[rstest]
#[case("", Err(UserValidationError::EmptyPassword))]
#[case("abc", Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN }))]
#[case("abcdef", Ok(()))]
fn registration_password_gate(
    #[case] input: &str,
    #[case] expected: Result<(), UserValidationError>,
) {
    assert_eq!(Password::for_registration(input).map(|_| ()), expected);
}

#[test]
fn login_password_only_requires_content() {
    assert!(Password::new("abc").is_ok());
    assert_eq!(Password::new(""), Err(UserValidationError::EmptyPassword));
}

#[test]
fn password_debug_is_redacted() {
    let password = Password::new("Abcdef1").expect("password");
    assert_eq!(format!("{password:?}"), "Password(***)");
}

#[rstest]
fn user_serialises_without_password(ellie: RegisteredUser) {
    let value = serde_json::to_value(ellie.user()).expect("serialise user");

    assert_eq!(
        value,
        json!({
            "name": "Ellie",
            "surname": "Williams",
            "email": "ellie@jackson.org",
            "country": "México",
            "registrationDate": "2024-03-01T12:00:00Z",
        })
    );
}

#[rstest]
fn registered_user_round_trips_with_password(ellie: RegisteredUser) {
    let value = serde_json::to_value(&ellie).expect("serialise registered user");
    assert_eq!(value["password"], "Abcdef1");

    let decoded: RegisteredUser = serde_json::from_value(value).expect("decode");
    assert_eq!(decoded, ellie);
    assert!(decoded.password_matches(&Password::new("Abcdef1").expect("password")));
    assert!(!decoded.password_matches(&Password::new("Abcdef2").expect("password")));
}

#[test]
fn user_rejects_unknown_fields() {
    let value = json!({
        "name": "Ellie",
        "surname": "Williams",
        "email": "ellie@jackson.org",
        "country": "México",
        "registrationDate": "2024-03-01T12:00:00Z",
        "password": "leaked",
    });

    assert!(serde_json::from_value::<User>(value).is_err());
}

#[test]
fn user_rejects_invalid_date() {
    let value = json!({
        "name": "Ellie",
        "surname": "Williams",
        "email": "ellie@jackson.org",
        "country": "México",
        "registrationDate": "yesterday",
    });

    assert!(serde_json::from_value::<User>(value).is_err());
}
