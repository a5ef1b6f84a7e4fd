//! Startup seeding orchestration.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use demo_data::{DemoUserSeed, GenerationError, RegistryError, SeedRegistry, generate_demo_users};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::info;
use zeroize::Zeroizing;

use crate::demo_data::config::{DemoDataConfigError, DemoDataSettings, SeedingPlan};
use crate::domain::{AuthError, AuthService, RegisteredUser, RegistrationForm, User, ValidationErrors};

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Registry file could not be read.
    #[error("failed to read registry at {path}: {source}")]
    RegistryRead {
        /// Path to the registry file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Registry parsing or lookup failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Account generation failed.
    #[error("demo account generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated account does not pass registration validation.
    #[error("demo account {email} is invalid: {source}")]
    InvalidAccount {
        /// Email of the rejected account.
        email: String,
        /// Field failures.
        #[source]
        source: ValidationErrors,
    },
    /// The accounts could not be stored.
    #[error("demo accounts not stored: {0}")]
    Storage(#[from] AuthError),
    /// The settings were rejected before seeding began.
    #[error("invalid demo data settings: {0}")]
    Config(#[from] DemoDataConfigError),
}

/// What a seeding run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedingOutcome {
    /// Seed that was applied.
    pub seed_name: String,
    /// Accounts generated from the seed.
    pub generated: usize,
    /// Accounts that were new and got inserted.
    pub inserted: usize,
}

/// Register demo accounts on startup when enabled.
///
/// Accounts whose email already exists are left untouched, so running the
/// same seed twice inserts nothing the second time.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::PathBuf;
///
/// use survivor_hub::demo_data::{DemoDataSettings, seed_demo_users_on_startup};
/// use survivor_hub::domain::{AuthLatency, AuthService, ServiceRuntime, SessionStore};
/// use survivor_hub::outbound::storage::InMemoryKeyValueStore;
/// use std::sync::Arc;
///
/// let settings = DemoDataSettings {
///     enabled: false,
///     seed_name: Some("jackson-patrol".to_owned()),
///     count: None,
///     registry_path: Some(PathBuf::from("fixtures/demo-data/seeds.json")),
/// };
/// let store = SessionStore::new(Arc::new(InMemoryKeyValueStore::default()));
/// let auth = AuthService::start(store, ServiceRuntime::default(), AuthLatency::none());
/// let outcome = seed_demo_users_on_startup(&settings, &auth).expect("seeding");
/// assert!(outcome.is_none());
/// ```
pub fn seed_demo_users_on_startup(
    settings: &DemoDataSettings,
    auth: &AuthService,
) -> Result<Option<SeedingOutcome>, StartupSeedingError> {
    let Some(plan) = settings.plan()? else {
        info!(reason = "disabled", "demo account seeding skipped");
        return Ok(None);
    };
    apply_plan(&plan, auth).map(Some)
}

fn apply_plan(plan: &SeedingPlan, auth: &AuthService) -> Result<SeedingOutcome, StartupSeedingError> {
    let seed_name = plan.seed_name.as_str();
    let registry = load_registry(&plan.registry_path)?;
    let seed_def = registry.find_seed(seed_name)?;
    let seed_def = match plan.user_count {
        Some(count) => seed_def.with_user_count(count),
        None => seed_def.clone(),
    };
    let seeds = generate_demo_users(&registry, &seed_def)?;

    let now = DefaultClock.utc();
    let accounts = seeds
        .iter()
        .map(|seed| to_registered_user(seed, now))
        .collect::<Result<Vec<_>, _>>()?;
    let generated = accounts.len();
    let inserted = auth.seed_registered_users(accounts)?;

    if inserted == 0 {
        info!(
            seed_key = seed_name,
            user_count = generated,
            "demo accounts already present; skipping"
        );
    } else {
        info!(
            seed_key = seed_name,
            user_count = generated,
            inserted,
            "demo account seeding applied"
        );
    }

    Ok(SeedingOutcome {
        seed_name: seed_name.to_owned(),
        generated,
        inserted,
    })
}

fn to_registered_user(
    seed: &DemoUserSeed,
    registered_at: DateTime<Utc>,
) -> Result<RegisteredUser, StartupSeedingError> {
    let form = RegistrationForm {
        name: seed.name.clone(),
        surname: seed.surname.clone(),
        email: seed.email.clone(),
        country: seed.country.clone(),
        password: Zeroizing::new(seed.password.clone()),
    };
    let input = form
        .validate()
        .map_err(|source| StartupSeedingError::InvalidAccount {
            email: seed.email.clone(),
            source,
        })?;
    let (name, surname, email, country, password) = input.into_parts();
    let user = User::new(name, surname, email, country, registered_at);
    Ok(RegisteredUser::new(user, password))
}

fn load_registry(path: &Path) -> Result<SeedRegistry, StartupSeedingError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let read_error = |source| StartupSeedingError::RegistryRead {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "registry path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    Ok(SeedRegistry::from_json(&contents)?)
}
