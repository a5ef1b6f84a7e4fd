//! Survival map catalogue: locations around Jackson and field tips.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::messaging::UnknownVariant;

/// What a location offers or threatens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Shelter,
    Danger,
    Treasure,
    Resource,
    PointOfInterest,
}

impl LocationKind {
    /// Every kind in legend order.
    pub const ALL: [Self; 5] = [
        Self::Shelter,
        Self::Danger,
        Self::Treasure,
        Self::Resource,
        Self::PointOfInterest,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Shelter => "shelter",
            Self::Danger => "danger",
            Self::Treasure => "treasure",
            Self::Resource => "resource",
            Self::PointOfInterest => "point_of_interest",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase().replace('-', "_");
        if wanted == "poi" {
            return Ok(Self::PointOfInterest);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownVariant::new("location kind", value.trim()))
    }
}

/// How hard a location is to survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Extreme => "extreme",
        })
    }
}

/// Position on the map as percentages of its width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: u8,
    pub y: u8,
}

/// A marked place on the survival map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    pub id: String,
    pub name: String,
    pub kind: LocationKind,
    pub coordinates: Coordinates,
    pub description: String,
    pub tips: Vec<String>,
    pub rewards: Vec<String>,
    pub difficulty: Difficulty,
    pub discovered: bool,
}

impl MapLocation {
    /// Case-insensitive match on name or description.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

/// Area a survival tip applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Combat,
    Stealth,
    Resources,
    Navigation,
    Survival,
}

impl TipCategory {
    /// Every category.
    pub const ALL: [Self; 5] = [
        Self::Combat,
        Self::Stealth,
        Self::Resources,
        Self::Navigation,
        Self::Survival,
    ];
}

impl fmt::Display for TipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Combat => "combat",
            Self::Stealth => "stealth",
            Self::Resources => "resources",
            Self::Navigation => "navigation",
            Self::Survival => "survival",
        })
    }
}

impl FromStr for TipCategory {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.to_string() == wanted)
            .ok_or_else(|| UnknownVariant::new("tip category", value.trim()))
    }
}

/// How much a tip or story event matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// Every level, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

impl FromStr for Importance {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.to_string() == wanted)
            .ok_or_else(|| UnknownVariant::new("importance", value.trim()))
    }
}

/// A piece of field advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalTip {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: TipCategory,
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_location: Option<String>,
}

/// Favourite location and tip ids, in the order they were marked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourites {
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

/// The six marked locations around Jackson.
#[must_use]
pub fn jackson_locations() -> Vec<MapLocation> {
    vec![
        MapLocation {
            id: "jackson_center".to_owned(),
            name: "Jackson Center".to_owned(),
            kind: LocationKind::Shelter,
            coordinates: Coordinates { x: 25, y: 30 },
            description: "The heart of the Jackson community. Safety and supplies are found here."
                .to_owned(),
            tips: strings(&[
                "Always report your status when returning from patrol",
                "Check the notice board for new missions",
                "Keep your weapons in good shape at the workshop",
            ]),
            rewards: strings(&["Ammunition", "Medical supplies", "Intel"]),
            difficulty: Difficulty::Easy,
            discovered: true,
        },
        MapLocation {
            id: "infected_forest".to_owned(),
            name: "Infected Forest".to_owned(),
            kind: LocationKind::Danger,
            coordinates: Coordinates { x: 60, y: 45 },
            description: "Highly dangerous zone with a heavy concentration of infected. Avoid at night."
                .to_owned(),
            tips: strings(&[
                "Use stealth and avoid direct combat",
                "Clickers are blind but have sharp hearing",
                "Always plan an escape route",
            ]),
            rewards: Vec::new(),
            difficulty: Difficulty::Extreme,
            discovered: false,
        },
        MapLocation {
            id: "supply_cache".to_owned(),
            name: "Hidden Supply Cache".to_owned(),
            kind: LocationKind::Treasure,
            coordinates: Coordinates { x: 40, y: 20 },
            description: "A secret stash of valuable supplies left by earlier survivors.".to_owned(),
            tips: strings(&[
                "Look for marks on the nearby trees",
                "The entrance is hidden under loose rocks",
                "Watch out for improvised traps",
            ]),
            rewards: strings(&["Special ammunition", "Medicine", "Tools", "Area map"]),
            difficulty: Difficulty::Medium,
            discovered: false,
        },
        MapLocation {
            id: "observation_post".to_owned(),
            name: "Observation Post".to_owned(),
            kind: LocationKind::PointOfInterest,
            coordinates: Coordinates { x: 75, y: 15 },
            description: "Watchtower with a panoramic view. Ideal for reconnaissance.".to_owned(),
            tips: strings(&[
                "Use binoculars to scout distant areas",
                "Mark points of interest on your map",
                "Beware of enemy snipers",
            ]),
            rewards: strings(&["Area intel", "Marked locations"]),
            difficulty: Difficulty::Medium,
            discovered: true,
        },
        MapLocation {
            id: "resource_river".to_owned(),
            name: "River of Resources".to_owned(),
            kind: LocationKind::Resource,
            coordinates: Coordinates { x: 15, y: 60 },
            description: "Source of clean water and fish. Medicinal plants grow along the bank."
                .to_owned(),
            tips: strings(&[
                "Purify the water before drinking it",
                "Medicinal plants grow close to the water",
                "Watch for wild animals coming to drink",
            ]),
            rewards: strings(&["Clean water", "Medicinal plants", "Fish"]),
            difficulty: Difficulty::Easy,
            discovered: true,
        },
        MapLocation {
            id: "hospital_ruins".to_owned(),
            name: "Hospital Ruins".to_owned(),
            kind: LocationKind::Treasure,
            coordinates: Coordinates { x: 80, y: 70 },
            description: "Old hospital with valuable medical supplies, but infested with infected."
                .to_owned(),
            tips: strings(&[
                "The medical supplies are in the basement",
                "Use molotovs against groups of infected",
                "The main lift is broken, take the emergency stairs",
            ]),
            rewards: strings(&["Advanced medical supplies", "Antibiotics", "Surgical kit"]),
            difficulty: Difficulty::Hard,
            discovered: false,
        },
    ]
}

/// The five general survival tips.
#[must_use]
pub fn survival_tips() -> Vec<SurvivalTip> {
    let tip = |id: &str, title: &str, description: &str, category, importance| SurvivalTip {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        category,
        importance,
        related_location: None,
    };
    vec![
        tip(
            "tip_1",
            "Stealth vs Combat",
            "In most situations stealth beats direct combat. Save ammunition and avoid drawing more infected.",
            TipCategory::Combat,
            Importance::High,
        ),
        tip(
            "tip_2",
            "Resource Management",
            "Keep a balanced inventory: ammunition, medical supplies and crafting tools.",
            TipCategory::Resources,
            Importance::High,
        ),
        tip(
            "tip_3",
            "Night Navigation",
            "Infected are more active at night. Plan safe routes and avoid open areas.",
            TipCategory::Navigation,
            Importance::Medium,
        ),
        tip(
            "tip_4",
            "Danger Signals",
            "Learn to recognise the sounds of each kind of infected. Each one needs a different strategy.",
            TipCategory::Survival,
            Importance::High,
        ),
        tip(
            "tip_5",
            "Efficient Crafting",
            "Craft items that give an immediate edge first: molotovs for groups, bandages for wounds.",
            TipCategory::Resources,
            Importance::Medium,
        ),
    ]
}
