//! Deterministic demonstration accounts for the survivor hub.
//!
//! This crate turns a small JSON seed registry into believable, reproducible
//! survivor accounts (name, surname, email, country and password). It stays
//! independent of the hub's domain types so the hub can validate every
//! generated value through its own constructors before seeding.
//!
//! # Example
//!
//! ```
//! use demo_data::{SeedRegistry, generate_demo_users};
//!
//! let json = r#"{
//!     "version": 1,
//!     "countries": ["México", "Canadá"],
//!     "emailDomains": ["jackson.org"],
//!     "seeds": [{"name": "jackson-patrol", "seed": 42, "userCount": 3}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed_def = registry.find_seed("jackson-patrol").expect("seed exists");
//! let users = generate_demo_users(&registry, seed_def).expect("generation succeeds");
//!
//! assert_eq!(users.len(), 3);
//! ```

mod error;
mod generator;
mod registry;
mod seed;
mod validation;

pub use error::{GenerationError, RegistryError};
pub use generator::generate_demo_users;
pub use registry::{SeedDefinition, SeedRegistry};
pub use seed::DemoUserSeed;
pub use validation::{NAME_MIN, PASSWORD_MIN, is_strong_password, is_valid_person_name};
