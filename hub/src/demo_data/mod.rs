//! Startup wiring for demo account seeding.

mod config;
mod startup;

pub use config::{DemoDataConfigError, DemoDataSettings, SeedingPlan};
pub use startup::{SeedingOutcome, StartupSeedingError, seed_demo_users_on_startup};
