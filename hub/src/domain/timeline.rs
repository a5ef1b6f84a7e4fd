//! Story timeline: key events from the prologue to the epilogue.
//!
//! Event ids follow story order, so sorting by id is chronological.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::map::Importance;
use super::messaging::UnknownVariant;

/// Part of the story an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryArc {
    Prologue,
    Jackson,
    Seattle,
    Epilogue,
}

impl StoryArc {
    /// Every arc in story order.
    pub const ALL: [Self; 4] = [Self::Prologue, Self::Jackson, Self::Seattle, Self::Epilogue];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Prologue => "prologue",
            Self::Jackson => "jackson",
            Self::Seattle => "seattle",
            Self::Epilogue => "epilogue",
        }
    }
}

impl fmt::Display for StoryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryArc {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|arc| arc.as_str() == wanted)
            .ok_or_else(|| UnknownVariant::new("story arc", value.trim()))
    }
}

/// One entry on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: u64,
    pub title: String,
    pub date: String,
    pub description: String,
    pub location: String,
    pub characters_involved: Vec<String>,
    pub arc: StoryArc,
    pub importance: Importance,
}

impl TimelineEvent {
    /// Case-insensitive match on title, description or location.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.title, &self.description, &self.location]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// The eight key events.
#[must_use]
pub fn story_events() -> Vec<TimelineEvent> {
    let event = |id,
                 title: &str,
                 description: &str,
                 location: &str,
                 characters: &[&str],
                 arc,
                 importance| TimelineEvent {
        id,
        title: title.to_owned(),
        date: "27 June 2027".to_owned(),
        description: description.to_owned(),
        location: location.to_owned(),
        characters_involved: characters.iter().map(|name| (*name).to_owned()).collect(),
        arc,
        importance,
    };
    vec![
        event(
            1,
            "Life in Jackson",
            "Ellie and Joel have built a fairly peaceful life in the Jackson community. Ellie trains and patrols the surroundings.",
            "Jackson, Wyoming",
            &["Ellie", "Joel", "Tommy", "Dina"],
            StoryArc::Jackson,
            Importance::Medium,
        ),
        event(
            2,
            "Abby Arrives",
            "A traumatic event changes Ellie's life for ever when Joel's past comes back to face him.",
            "Jackson, Wyoming",
            &["Joel", "Abby", "Ellie", "Tommy"],
            StoryArc::Jackson,
            Importance::High,
        ),
        event(
            3,
            "The Road to Revenge",
            "Ellie sets out for Seattle in search of revenge, with Dina at her side.",
            "Road to Seattle",
            &["Ellie", "Dina", "Tommy"],
            StoryArc::Seattle,
            Importance::High,
        ),
        event(
            4,
            "War in Seattle",
            "Seattle is at war between the WLF and the Seraphites. Ellie must cross the conflict while hunting Abby.",
            "Seattle, Washington",
            &["Ellie", "Dina", "WLF", "Seraphites"],
            StoryArc::Seattle,
            Importance::High,
        ),
        event(
            5,
            "Abby's Past",
            "Abby's story comes out: the daughter of Dr. Jerry Anderson and her reason for finding Joel Miller.",
            "Salt Lake City hospital",
            &["Abby", "Dr. Jerry Anderson", "Marlene"],
            StoryArc::Prologue,
            Importance::High,
        ),
        event(
            6,
            "Meeting Lev",
            "Abby meets Lev and Yara, two young Seraphites who change how she sees the war.",
            "Seraphite territory, Seattle",
            &["Abby", "Lev", "Yara"],
            StoryArc::Seattle,
            Importance::High,
        ),
        event(
            7,
            "The Final Confrontation",
            "Ellie and Abby face each other in a final fight that tests what they have learnt about forgiveness.",
            "Seraphite theatre, Seattle",
            &["Ellie", "Abby", "Lev", "Dina"],
            StoryArc::Seattle,
            Importance::High,
        ),
        event(
            8,
            "A New Beginning",
            "The fallout from Seattle lingers while the survivors try to rebuild their lives.",
            "Farm in Wyoming",
            &["Ellie", "Dina", "JJ"],
            StoryArc::Epilogue,
            Importance::Medium,
        ),
    ]
}
