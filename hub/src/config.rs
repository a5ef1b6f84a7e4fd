//! Hub configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{AuthLatency, ChatSettings, MessagingSettings};

const DEFAULT_STORAGE_DIR: &str = ".survivor-hub";
const DEFAULT_CHAT_REPLY_PERCENT: u8 = 30;

/// Settings for the console hub: where records live and how the simulated
/// services behave.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HUB")]
pub struct HubSettings {
    /// Directory holding one JSON file per storage key.
    pub storage_dir: Option<PathBuf>,
    /// Skip artificial latency and reply delays.
    #[ortho_config(default = false)]
    pub instant: bool,
    /// Percentage of chat posts that draw a persona reply.
    pub chat_reply_percent: Option<u8>,
}

impl HubSettings {
    /// Return the configured storage directory, falling back to the default.
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }

    /// Reply probability for chat posts, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn chat_reply_probability(&self) -> f64 {
        let percent = self
            .chat_reply_percent
            .unwrap_or(DEFAULT_CHAT_REPLY_PERCENT)
            .min(100);
        f64::from(percent) / 100.0
    }

    /// Latency for registration and login.
    #[must_use]
    pub fn auth_latency(&self) -> AuthLatency {
        if self.instant {
            AuthLatency::none()
        } else {
            AuthLatency::default()
        }
    }

    /// Chat reply behaviour.
    #[must_use]
    pub fn chat_settings(&self) -> ChatSettings {
        let defaults = ChatSettings::default();
        ChatSettings {
            reply_probability: self.chat_reply_probability(),
            reply_delay: if self.instant {
                Duration::ZERO..=Duration::ZERO
            } else {
                defaults.reply_delay
            },
        }
    }

    /// Admin inbox delays.
    #[must_use]
    pub fn messaging_settings(&self) -> MessagingSettings {
        if self.instant {
            MessagingSettings {
                send_latency: Duration::ZERO,
                reply_delay: Duration::ZERO..=Duration::ZERO,
            }
        } else {
            MessagingSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for hub configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> HubSettings {
        HubSettings::load_from_iter([OsString::from("survivor-hub")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("HUB_STORAGE_DIR", None::<String>),
            ("HUB_INSTANT", None::<String>),
            ("HUB_CHAT_REPLY_PERCENT", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.instant);
        assert_eq!(settings.storage_dir(), PathBuf::from(DEFAULT_STORAGE_DIR));
        assert!((settings.chat_reply_probability() - 0.3).abs() < f64::EPSILON);
        assert_eq!(settings.auth_latency(), AuthLatency::default());
        assert_eq!(settings.messaging_settings(), MessagingSettings::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("HUB_STORAGE_DIR", Some("/tmp/hub-records".to_owned())),
            ("HUB_INSTANT", Some("true".to_owned())),
            ("HUB_CHAT_REPLY_PERCENT", Some("100".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.instant);
        assert_eq!(settings.storage_dir(), PathBuf::from("/tmp/hub-records"));
        assert_eq!(settings.auth_latency(), AuthLatency::none());
        assert_eq!(settings.chat_settings().reply_delay, Duration::ZERO..=Duration::ZERO);
        assert!((settings.chat_reply_probability() - 1.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn reply_percent_is_capped() {
        let _guard = lock_env([("HUB_CHAT_REPLY_PERCENT", Some("250".to_owned()))]);

        let settings = load_from_empty_args();
        assert!((settings.chat_reply_probability() - 1.0).abs() < f64::EPSILON);
    }
}
