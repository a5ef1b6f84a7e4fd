//! Who is who around Jackson and Seattle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::messaging::UnknownVariant;

/// Whether a character is still around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterStatus {
    Alive,
    Dead,
    Unknown,
}

impl CharacterStatus {
    /// Every status.
    pub const ALL: [Self; 3] = [Self::Alive, Self::Dead, Self::Unknown];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Alive => "alive",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| UnknownVariant::new("character status", value.trim()))
    }
}

/// A profile in the character guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub age: u8,
    pub location: String,
    pub skills: Vec<String>,
    pub story: String,
    pub status: CharacterStatus,
}

impl Character {
    /// Case-insensitive match on name or description.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

struct Profile {
    id: u64,
    name: &'static str,
    description: &'static str,
    age: u8,
    location: &'static str,
    skills: [&'static str; 4],
    story: &'static str,
    status: CharacterStatus,
}

impl From<Profile> for Character {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.to_owned(),
            description: profile.description.to_owned(),
            age: profile.age,
            location: profile.location.to_owned(),
            skills: profile.skills.iter().map(|skill| (*skill).to_owned()).collect(),
            story: profile.story.to_owned(),
            status: profile.status,
        }
    }
}

/// The six main characters, ordered by id.
#[must_use]
pub fn main_characters() -> Vec<Character> {
    [
        Profile {
            id: 1,
            name: "Ellie Williams",
            description: "The protagonist, immune to the Cordyceps fungus",
            age: 19,
            location: "Jackson, Wyoming",
            skills: ["Close combat", "Stealth", "Survival", "Guitar"],
            story: "A young survivor who settled in Jackson with Joel until a traumatic event sent her after revenge.",
            status: CharacterStatus::Alive,
        },
        Profile {
            id: 2,
            name: "Abby Anderson",
            description: "Former soldier of the Washington Liberation Front",
            age: 21,
            location: "Seattle, Washington",
            skills: ["Military combat", "Strength", "Leadership", "Medicine"],
            story: "A former soldier whose past is tied to Joel. Her search for justice changes everyone's fate.",
            status: CharacterStatus::Alive,
        },
        Profile {
            id: 3,
            name: "Joel Miller",
            description: "Veteran smuggler and Ellie's father figure",
            age: 56,
            location: "Jackson, Wyoming",
            skills: ["Survival", "Combat", "Carpentry", "Leadership"],
            story: "A hardened survivor of twenty years of outbreak. His bond with Ellie is the heart of the story.",
            status: CharacterStatus::Dead,
        },
        Profile {
            id: 4,
            name: "Dina Woodward",
            description: "Ellie's partner and love interest",
            age: 19,
            location: "Jackson, Wyoming",
            skills: ["Archery", "Stealth", "Scouting", "Childcare"],
            story: "Ellie's companion in Jackson and on the road to Seattle. She stands for hope in a brutal world.",
            status: CharacterStatus::Alive,
        },
        Profile {
            id: 5,
            name: "Tommy Miller",
            description: "Joel's younger brother and a leader of Jackson",
            age: 48,
            location: "Jackson, Wyoming",
            skills: ["Leadership", "Military strategy", "Sniping", "Diplomacy"],
            story: "Co-leader of the Jackson community whose military past makes him a steady hand in hard times.",
            status: CharacterStatus::Alive,
        },
        Profile {
            id: 6,
            name: "Lev",
            description: "Young deserter from the Seraphites",
            age: 14,
            location: "Seraphite island, Seattle",
            skills: ["Archery", "Climbing", "Stealth", "Tribal lore"],
            story: "A boy who defies his clan's traditions and forms an unlikely alliance that changes the course of events.",
            status: CharacterStatus::Alive,
        },
    ]
    .into_iter()
    .map(Character::from)
    .collect()
}
