//! Settings for seeding demonstration accounts at start-up.
//!
//! Seeding stays off unless `DEMO_DATA_ENABLED` is set. [`DemoDataSettings::plan`]
//! turns the raw values into a [`SeedingPlan`], rejecting a blank seed name or
//! a zero account count before the registry is touched.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SEED_NAME: &str = "jackson-patrol";

fn bundled_registry() -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "fixtures", "demo-data", "seeds.json"]
        .iter()
        .collect()
}

/// Raw seeding values from the environment, files and arguments.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DEMO_DATA")]
pub struct DemoDataSettings {
    /// Seed demo accounts on start-up.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Registry seed to generate from; `jackson-patrol` when unset.
    pub seed_name: Option<String>,
    /// Replace the seed's own account count.
    #[ortho_config(file_key = "user_count")]
    pub count: Option<usize>,
    /// Registry file; the bundled fixture when unset.
    pub registry_path: Option<PathBuf>,
}

/// Rejected seeding settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemoDataConfigError {
    /// The seed name is empty after trimming.
    #[error("seed name must not be empty")]
    EmptySeedName,
    /// An explicit account count of zero.
    #[error("demo account count must be at least 1")]
    ZeroCount,
}

/// A validated seeding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedingPlan {
    /// Seed to look up in the registry.
    pub seed_name: String,
    /// Account count override, if any.
    pub user_count: Option<usize>,
    /// Registry file to read.
    pub registry_path: PathBuf,
}

impl DemoDataSettings {
    /// Resolve defaults and validate. `Ok(None)` means seeding is off.
    pub fn plan(&self) -> Result<Option<SeedingPlan>, DemoDataConfigError> {
        if !self.enabled {
            return Ok(None);
        }
        let seed_name = self
            .seed_name
            .as_deref()
            .map_or(DEFAULT_SEED_NAME, str::trim);
        if seed_name.is_empty() {
            return Err(DemoDataConfigError::EmptySeedName);
        }
        if self.count == Some(0) {
            return Err(DemoDataConfigError::ZeroCount);
        }
        Ok(Some(SeedingPlan {
            seed_name: seed_name.to_owned(),
            user_count: self.count,
            registry_path: self
                .registry_path
                .clone()
                .unwrap_or_else(bundled_registry),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load() -> DemoDataSettings {
        DemoDataSettings::load_from_iter([OsString::from("survivor-hub")])
            .expect("config should load")
    }

    fn enabled(seed_name: Option<&str>, count: Option<usize>) -> DemoDataSettings {
        DemoDataSettings {
            enabled: true,
            seed_name: seed_name.map(str::to_owned),
            count,
            registry_path: None,
        }
    }

    #[rstest]
    fn seeding_is_off_without_configuration() {
        let _guard = lock_env([
            ("DEMO_DATA_ENABLED", None::<String>),
            ("DEMO_DATA_SEED_NAME", None::<String>),
            ("DEMO_DATA_COUNT", None::<String>),
            ("DEMO_DATA_REGISTRY_PATH", None::<String>),
        ]);

        assert_eq!(load().plan(), Ok(None));
    }

    #[rstest]
    fn environment_builds_a_plan() {
        let _guard = lock_env([
            ("DEMO_DATA_ENABLED", Some("true".to_owned())),
            ("DEMO_DATA_SEED_NAME", Some(" seattle-day-one ".to_owned())),
            ("DEMO_DATA_COUNT", Some("3".to_owned())),
            (
                "DEMO_DATA_REGISTRY_PATH",
                Some("/tmp/demo_registry.json".to_owned()),
            ),
        ]);

        let plan = load().plan().expect("valid").expect("enabled");

        assert_eq!(
            plan,
            SeedingPlan {
                seed_name: "seattle-day-one".to_owned(),
                user_count: Some(3),
                registry_path: PathBuf::from("/tmp/demo_registry.json"),
            }
        );
    }

    #[rstest]
    fn defaults_fill_the_plan() {
        let plan = enabled(None, None).plan().expect("valid").expect("enabled");

        assert_eq!(plan.seed_name, DEFAULT_SEED_NAME);
        assert_eq!(plan.user_count, None);
        assert!(plan.registry_path.ends_with("fixtures/demo-data/seeds.json"));
    }

    #[rstest]
    #[case::empty(enabled(Some(""), None), DemoDataConfigError::EmptySeedName)]
    #[case::whitespace(enabled(Some("   "), None), DemoDataConfigError::EmptySeedName)]
    #[case::zero_count(enabled(None, Some(0)), DemoDataConfigError::ZeroCount)]
    fn invalid_settings_are_rejected(
        #[case] settings: DemoDataSettings,
        #[case] expected: DemoDataConfigError,
    ) {
        assert_eq!(settings.plan(), Err(expected));
    }
}
