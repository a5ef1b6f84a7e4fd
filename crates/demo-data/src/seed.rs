//! Generated account seed types.
//!
//! These records are plain data; the hub converts them into its validated
//! domain types at the point of use.

use serde::{Deserialize, Serialize};

/// A generated demonstration account.
///
/// # Example
///
/// ```
/// use demo_data::DemoUserSeed;
///
/// let user = DemoUserSeed {
///     name: "Ellie".to_owned(),
///     surname: "Williams".to_owned(),
///     email: "ellie.williams1@jackson.org".to_owned(),
///     country: "México".to_owned(),
///     password: "Abcdef12".to_owned(),
/// };
///
/// assert_eq!(user.name, "Ellie");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoUserSeed {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Unique, lower-case email address.
    pub email: String,
    /// Country label taken from the registry.
    pub country: String,
    /// Plain-text password satisfying the strong password rules.
    pub password: String,
}
