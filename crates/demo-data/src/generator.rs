//! Deterministic account generation from seed definitions.
//!
//! The same seed definition always yields identical accounts, so demo
//! environments can be rebuilt without surprises.

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;
use crate::registry::{SeedDefinition, SeedRegistry};
use crate::seed::DemoUserSeed;
use crate::validation::{email_fragment, is_valid_person_name, sanitize_name};

/// Maximum number of attempts to generate a valid name part.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Number of lower-case letters in a generated password.
const PASSWORD_LOWER_LEN: usize = 5;

/// Number of digits in a generated password.
const PASSWORD_DIGITS_LEN: usize = 2;

/// Generates demonstration accounts from a seed definition.
///
/// Every account gets a valid name and surname, an email built from both
/// plus its position in the batch (so emails are unique within a batch), a
/// country from the registry, and a strong password.
///
/// # Errors
///
/// Returns [`GenerationError`] if name generation exhausts its retries or
/// the registry offers no countries or email domains.
///
/// # Example
///
/// ```
/// use demo_data::{SeedRegistry, generate_demo_users, is_strong_password};
///
/// let json = r#"{
///     "version": 1,
///     "countries": ["Perú"],
///     "emailDomains": ["jackson.org"],
///     "seeds": [{"name": "test", "seed": 7, "userCount": 2}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid");
/// let seed_def = registry.find_seed("test").expect("found");
/// let users = generate_demo_users(&registry, seed_def).expect("generated");
///
/// assert_eq!(users.len(), 2);
/// assert!(users.iter().all(|u| is_strong_password(&u.password)));
/// assert_eq!(users, generate_demo_users(&registry, seed_def).expect("generated"));
/// ```
pub fn generate_demo_users(
    registry: &SeedRegistry,
    seed_def: &SeedDefinition,
) -> Result<Vec<DemoUserSeed>, GenerationError> {
    if registry.countries().is_empty() {
        return Err(GenerationError::NoCountries);
    }
    if registry.email_domains().is_empty() {
        return Err(GenerationError::NoEmailDomains);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());
    let mut users = Vec::with_capacity(seed_def.user_count());

    for ordinal in 1..=seed_def.user_count() {
        users.push(generate_single_user(&mut rng, registry, ordinal)?);
    }

    Ok(users)
}

fn generate_single_user(
    rng: &mut ChaCha8Rng,
    registry: &SeedRegistry,
    ordinal: usize,
) -> Result<DemoUserSeed, GenerationError> {
    let name = generate_name_part(rng, "name", |rng| FirstName(EN).fake_with_rng(rng))?;
    let surname = generate_name_part(rng, "surname", |rng| LastName(EN).fake_with_rng(rng))?;

    let domain = pick(rng, registry.email_domains()).ok_or(GenerationError::NoEmailDomains)?;
    let email = format!(
        "{}.{}{ordinal}@{domain}",
        email_fragment(&name),
        email_fragment(&surname)
    );

    let country = pick(rng, registry.countries())
        .ok_or(GenerationError::NoCountries)?
        .clone();

    Ok(DemoUserSeed {
        name,
        surname,
        email,
        country,
        password: generate_password(rng),
    })
}

fn generate_name_part(
    rng: &mut ChaCha8Rng,
    field: &'static str,
    mut produce: impl FnMut(&mut ChaCha8Rng) -> String,
) -> Result<String, GenerationError> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let candidate = sanitize_name(&produce(rng));
        // Email fragments must stay non-empty too.
        if is_valid_person_name(&candidate) && !email_fragment(&candidate).is_empty() {
            return Ok(candidate);
        }
    }

    Err(GenerationError::NameGenerationFailed {
        field,
        max_attempts: MAX_NAME_ATTEMPTS,
    })
}

/// One upper-case letter, five lower-case letters, two digits.
fn generate_password(rng: &mut ChaCha8Rng) -> String {
    let mut password = String::with_capacity(1 + PASSWORD_LOWER_LEN + PASSWORD_DIGITS_LEN);
    password.push(char::from(b'A' + rng.random_range(0..26_u8)));
    for _ in 0..PASSWORD_LOWER_LEN {
        password.push(char::from(b'a' + rng.random_range(0..26_u8)));
    }
    for _ in 0..PASSWORD_DIGITS_LEN {
        password.push(char::from(b'0' + rng.random_range(0..10_u8)));
    }
    password
}

fn pick<'a, T>(rng: &mut ChaCha8Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::validation::is_strong_password;

    const TEST_REGISTRY_JSON: &str = r#"{
        "version": 1,
        "countries": ["México", "España", "Canadá"],
        "emailDomains": ["jackson.org", "fireflies.net"],
        "seeds": [
            {"name": "jackson-patrol", "seed": 42, "userCount": 12},
            {"name": "small-seed", "seed": 123, "userCount": 2}
        ]
    }"#;

    #[fixture]
    fn test_registry() -> SeedRegistry {
        SeedRegistry::from_json(TEST_REGISTRY_JSON).expect("valid test registry")
    }

    fn generate(registry: &SeedRegistry, seed_name: &str) -> Vec<DemoUserSeed> {
        let seed_def = registry.find_seed(seed_name).expect("seed should be found");
        generate_demo_users(registry, seed_def).expect("generation should succeed")
    }

    #[rstest]
    fn generates_requested_user_count(test_registry: SeedRegistry) {
        assert_eq!(generate(&test_registry, "jackson-patrol").len(), 12);
    }

    #[rstest]
    fn generation_is_deterministic(test_registry: SeedRegistry) {
        assert_eq!(
            generate(&test_registry, "jackson-patrol"),
            generate(&test_registry, "jackson-patrol")
        );
    }

    #[rstest]
    fn different_seeds_produce_different_users(test_registry: SeedRegistry) {
        let first = generate(&test_registry, "jackson-patrol");
        let second = generate(&test_registry, "small-seed");

        assert_ne!(first.first(), second.first());
    }

    #[rstest]
    fn emails_are_unique_within_a_batch(test_registry: SeedRegistry) {
        let users = generate(&test_registry, "jackson-patrol");
        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();

        assert_eq!(emails.len(), users.len());
    }

    #[rstest]
    fn every_field_satisfies_registration_rules(test_registry: SeedRegistry) {
        for user in generate(&test_registry, "jackson-patrol") {
            assert!(is_valid_person_name(&user.name), "bad name: {user:?}");
            assert!(is_valid_person_name(&user.surname), "bad surname: {user:?}");
            assert!(is_strong_password(&user.password), "weak password: {user:?}");
            assert!(test_registry.countries().contains(&user.country));
            let domain = user.email.rsplit('@').next().expect("email has a domain");
            assert!(test_registry.email_domains().iter().any(|d| d == domain));
        }
    }

    #[test]
    fn password_shape_is_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let password = generate_password(&mut rng);

        assert_eq!(password.len(), 8);
        assert!(password.starts_with(|c: char| c.is_ascii_uppercase()));
        assert!(password.ends_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn pick_returns_none_for_empty_slices() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let empty: [String; 0] = [];

        assert!(pick(&mut rng, &empty).is_none());
    }
}
