//! Error types for the demo-data crate.
//!
//! Registry parsing and account generation fail in distinct ways, so each
//! gets its own `thiserror` enum.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing or querying a seed registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry file could not be read.
    #[error("failed to read registry file at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry lists no countries to pick from.
    #[error("registry contains no countries")]
    EmptyCountries,

    /// A country entry is blank.
    #[error("blank country at index {index}")]
    BlankCountry {
        /// Index of the blank entry.
        index: usize,
    },

    /// The registry lists no email domains.
    #[error("registry contains no email domains")]
    EmptyEmailDomains,

    /// An email domain lacks a dot or contains whitespace or `@`.
    #[error("invalid email domain at index {index}: {value}")]
    InvalidEmailDomain {
        /// Index of the invalid entry.
        index: usize,
        /// The rejected domain.
        value: String,
    },

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur during account generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No usable name was produced within the retry budget.
    #[error("failed to generate a valid {field} after {max_attempts} attempts")]
    NameGenerationFailed {
        /// Which name part failed (`name` or `surname`).
        field: &'static str,
        /// Number of attempts made before giving up.
        max_attempts: usize,
    },

    /// The registry has no countries to assign.
    #[error("registry contains no countries for selection")]
    NoCountries,

    /// The registry has no email domains to assign.
    #[error("registry contains no email domains for selection")]
    NoEmailDomains,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        RegistryError::IoError {
            path: PathBuf::from("/tmp/seeds.json"),
            message: "file not found".to_owned(),
        },
        "failed to read registry file at '/tmp/seeds.json': file not found"
    )]
    #[case(
        RegistryError::UnsupportedVersion { expected: 1, actual: 2 },
        "unsupported registry version: expected 1, found 2"
    )]
    #[case(RegistryError::BlankCountry { index: 3 }, "blank country at index 3")]
    #[case(
        RegistryError::InvalidEmailDomain { index: 0, value: "nodot".to_owned() },
        "invalid email domain at index 0: nodot"
    )]
    #[case(
        RegistryError::SeedNotFound { name: "jackson-patrol".to_owned() },
        "seed 'jackson-patrol' not found in registry"
    )]
    fn registry_errors_format(#[case] err: RegistryError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn generation_error_names_the_failed_field() {
        let err = GenerationError::NameGenerationFailed {
            field: "surname",
            max_attempts: 100,
        };
        assert_eq!(
            err.to_string(),
            "failed to generate a valid surname after 100 attempts"
        );
    }
}
