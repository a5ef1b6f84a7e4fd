//! Survivor hub library modules.
//!
//! A fan community hub for survivors of the outbreak: account registration
//! and login with a persisted session, a simulated public chat, an admin
//! contact inbox and a survival map. The `domain` module holds the types
//! and services, `outbound` the storage adapters and `inbound` the console.

pub mod config;
pub mod demo_data;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
