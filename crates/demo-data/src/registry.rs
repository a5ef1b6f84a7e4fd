//! Seed registry types and JSON parsing.
//!
//! A registry names one or more seeds and lists the countries and email
//! domains that generated accounts draw from.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// A seed registry containing named seeds, countries and email domains.
///
/// # Example
///
/// ```
/// use demo_data::SeedRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "countries": ["Chile"],
///     "emailDomains": ["jackson.org"],
///     "seeds": [{"name": "test", "seed": 42, "userCount": 5}]
/// }"#;
///
/// let registry = SeedRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.seeds().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRegistry {
    version: u32,
    countries: Vec<String>,
    email_domains: Vec<String>,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parses a seed registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the JSON is malformed, the version is
    /// unsupported, the country or domain lists are empty or invalid, or no
    /// seeds are defined.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawSeedRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a seed registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|e| RegistryError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawSeedRegistry) -> Result<Self, RegistryError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.countries.is_empty() {
            return Err(RegistryError::EmptyCountries);
        }
        let countries = raw
            .countries
            .into_iter()
            .enumerate()
            .map(|(index, country)| {
                let trimmed = country.trim();
                if trimmed.is_empty() {
                    Err(RegistryError::BlankCountry { index })
                } else {
                    Ok(trimmed.to_owned())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if raw.email_domains.is_empty() {
            return Err(RegistryError::EmptyEmailDomains);
        }
        let email_domains = raw
            .email_domains
            .into_iter()
            .enumerate()
            .map(|(index, domain)| {
                if is_plausible_domain(&domain) {
                    Ok(domain.to_ascii_lowercase())
                } else {
                    Err(RegistryError::InvalidEmailDomain {
                        index,
                        value: domain,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let seeds = raw
            .seeds
            .into_iter()
            .map(|s| SeedDefinition {
                name: s.name,
                seed: s.seed,
                user_count: s.user_count,
            })
            .collect();

        Ok(Self {
            version: raw.version,
            countries,
            email_domains,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the country labels accounts are assigned from.
    #[must_use]
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Returns the lower-cased email domains.
    #[must_use]
    pub fn email_domains(&self) -> &[String] {
        &self.email_domains
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

fn is_plausible_domain(domain: &str) -> bool {
    !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.chars().any(|c| c.is_whitespace() || c == '@')
}

/// A named seed definition for deterministic account generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    user_count: usize,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of accounts to generate.
    #[must_use]
    pub const fn user_count(&self) -> usize {
        self.user_count
    }

    /// Returns a copy with a different account count.
    #[must_use]
    pub fn with_user_count(&self, user_count: usize) -> Self {
        Self {
            name: self.name.clone(),
            seed: self.seed,
            user_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedRegistry {
    version: u32,
    countries: Vec<String>,
    email_domains: Vec<String>,
    seeds: Vec<RawSeedDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    user_count: usize,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const VALID_JSON: &str = r#"{
        "version": 1,
        "countries": ["México", " Canadá "],
        "emailDomains": ["Jackson.org", "fireflies.net"],
        "seeds": [
            {"name": "jackson-patrol", "seed": 2013, "userCount": 8},
            {"name": "seattle-day-one", "seed": 2020, "userCount": 3}
        ]
    }"#;

    #[test]
    fn parses_valid_registry() {
        let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");

        assert_eq!(registry.version(), 1);
        assert_eq!(registry.countries(), ["México", "Canadá"]);
        assert_eq!(registry.email_domains(), ["jackson.org", "fireflies.net"]);
        assert_eq!(registry.seeds().len(), 2);
    }

    #[test]
    fn finds_seed_by_name() {
        let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");
        let seed = registry.find_seed("seattle-day-one").expect("seed found");

        assert_eq!(seed.seed(), 2020);
        assert_eq!(seed.user_count(), 3);
        assert_eq!(seed.with_user_count(9).user_count(), 9);
    }

    #[test]
    fn returns_error_for_unknown_seed() {
        let registry = SeedRegistry::from_json(VALID_JSON).expect("valid registry");

        assert_eq!(
            registry.find_seed("unknown"),
            Err(RegistryError::SeedNotFound {
                name: "unknown".to_owned()
            })
        );
    }

    #[rstest]
    #[case::malformed_json("not valid json")]
    #[case::missing_domains(
        r#"{"version": 1, "countries": ["Chile"], "seeds": [{"name": "a", "seed": 1, "userCount": 1}]}"#
    )]
    fn rejects_json_with_parse_error(#[case] json: &str) {
        let result = SeedRegistry::from_json(json);
        assert!(matches!(result, Err(RegistryError::ParseError { .. })));
    }

    #[rstest]
    #[case::unsupported_version(
        r#"{"version": 7, "countries": ["Chile"], "emailDomains": ["a.org"], "seeds": [{"name": "a", "seed": 1, "userCount": 1}]}"#,
        RegistryError::UnsupportedVersion { expected: 1, actual: 7 }
    )]
    #[case::empty_countries(
        r#"{"version": 1, "countries": [], "emailDomains": ["a.org"], "seeds": [{"name": "a", "seed": 1, "userCount": 1}]}"#,
        RegistryError::EmptyCountries
    )]
    #[case::blank_country(
        r#"{"version": 1, "countries": ["Chile", "  "], "emailDomains": ["a.org"], "seeds": [{"name": "a", "seed": 1, "userCount": 1}]}"#,
        RegistryError::BlankCountry { index: 1 }
    )]
    #[case::empty_domains(
        r#"{"version": 1, "countries": ["Chile"], "emailDomains": [], "seeds": [{"name": "a", "seed": 1, "userCount": 1}]}"#,
        RegistryError::EmptyEmailDomains
    )]
    #[case::invalid_domain(
        r#"{"version": 1, "countries": ["Chile"], "emailDomains": ["localhost"], "seeds": [{"name": "a", "seed": 1, "userCount": 1}]}"#,
        RegistryError::InvalidEmailDomain { index: 0, value: "localhost".to_owned() }
    )]
    #[case::empty_seeds(
        r#"{"version": 1, "countries": ["Chile"], "emailDomains": ["a.org"], "seeds": []}"#,
        RegistryError::EmptySeeds
    )]
    fn rejects_invalid_registry(#[case] json: &str, #[case] expected: RegistryError) {
        assert_eq!(SeedRegistry::from_json(json), Err(expected));
    }
}
