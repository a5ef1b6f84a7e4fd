//! Survivor chat model: messages, personas and presence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who a chat line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Written by a survivor.
    User,
    /// Posted by the hub itself.
    System,
    /// Posted by an administrator.
    Admin,
}

/// A line in the public chat or a private conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub author: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub kind: MessageKind,
}

/// Synthetic chat partners that seed the room and answer posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Joel,
    Ellie,
    Tommy,
    Dina,
    System,
}

impl Persona {
    /// Personas that can answer a post, in pick order.
    pub const REPLIERS: [Self; 5] = [Self::Joel, Self::Ellie, Self::Tommy, Self::Dina, Self::System];

    /// Chat handle.
    #[must_use]
    pub const fn handle(self) -> &'static str {
        match self {
            Self::Joel => "Joel_Miller",
            Self::Ellie => "Ellie_Williams",
            Self::Tommy => "Tommy_Miller",
            Self::Dina => "Dina_Woodward",
            Self::System => "System",
        }
    }

    /// Canned answer to someone else's post.
    #[must_use]
    pub const fn reply(self) -> &'static str {
        match self {
            Self::Joel => "Good point, we need to be careful.",
            Self::Ellie => "Totally agree!",
            Self::Tommy => "Stay safe out there.",
            Self::Dina => "Thanks for the info.",
            Self::System => "Reminder: check the map for new points of interest.",
        }
    }

    /// Message kind this persona posts as.
    #[must_use]
    pub const fn kind(self) -> MessageKind {
        match self {
            Self::System => MessageKind::System,
            Self::Joel | Self::Ellie | Self::Tommy | Self::Dina => MessageKind::User,
        }
    }
}

/// Tri-state presence shown in the online list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Online,
    Away,
    Busy,
}

/// Error returned when presence text is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown presence '{0}', expected online, away or busy")]
pub struct ParsePresenceError(String);

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
        })
    }
}

impl FromStr for Presence {
    type Err = ParsePresenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "busy" => Ok(Self::Busy),
            _ => Err(ParsePresenceError(value.trim().to_owned())),
        }
    }
}

/// An entry in the online list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUser {
    pub id: u64,
    pub name: String,
    pub presence: Presence,
    pub last_active: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("online", Presence::Online)]
    #[case(" AWAY ", Presence::Away)]
    #[case("Busy", Presence::Busy)]
    fn presence_parses(#[case] text: &str, #[case] expected: Presence) {
        assert_eq!(text.parse::<Presence>(), Ok(expected));
    }

    #[test]
    fn presence_rejects_unknown_text() {
        let err = "asleep".parse::<Presence>().expect_err("unknown presence");
        assert_eq!(
            err.to_string(),
            "unknown presence 'asleep', expected online, away or busy"
        );
    }

    #[test]
    fn only_the_system_persona_posts_system_messages() {
        let system: Vec<_> = Persona::REPLIERS
            .into_iter()
            .filter(|p| p.kind() == MessageKind::System)
            .collect();
        assert_eq!(system, [Persona::System]);
    }
}
