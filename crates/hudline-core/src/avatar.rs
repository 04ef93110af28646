//! Snapshot of the player state consumed by widget rendering.
//!
//! The simulation itself lives outside this crate; rendering only ever sees
//! an [`AvatarSnapshot`] value captured by the host for a single frame.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of indexed compass slots carried by the snapshot.
pub const NUM_CARDINAL_DIRECTIONS: usize = 9;

/// Compass direction used to index per-direction snapshot arrays.
///
/// The discriminants match the slot order of [`AvatarSnapshot::compass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardinalDirection {
    North = 0,
    Northeast = 1,
    East = 2,
    Southeast = 3,
    South = 4,
    Southwest = 5,
    West = 6,
    Northwest = 7,
    Local = 8,
}

impl CardinalDirection {
    /// Slot index into a direction-indexed snapshot array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Body part identifiers for part-qualified widget variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Torso,
    Head,
    ArmLeft,
    ArmRight,
    HandLeft,
    HandRight,
    LegLeft,
    LegRight,
    FootLeft,
    FootRight,
}

/// Per-part condition values for one body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyPartStatus {
    pub hp: i32,
    pub hp_max: i32,
    pub encumbrance: i32,
    pub warmth: i32,
    pub wetness: i32,
}

/// One frame of player state, as handed over by the host simulation.
///
/// Numeric fields are raw quantities; `*_text` fields arrive pre-colored
/// (markup included) and are displayed verbatim by text-variable widgets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarSnapshot {
    pub focus: i32,
    pub move_count: i32,
    pub pain: i32,
    pub sound: i32,
    pub speed: i32,
    pub stamina: i32,
    pub stamina_max: i32,
    pub fatigue: i32,
    pub health: i32,
    pub mana: i32,
    pub mana_max: i32,
    pub morale: i32,
    pub weariness: i32,
    pub stat_str: i32,
    pub stat_dex: i32,
    pub stat_int: i32,
    pub stat_per: i32,
    pub cardio_fit: i32,

    pub body: BTreeMap<BodyPart, BodyPartStatus>,

    pub activity_text: String,
    pub body_temp_text: String,
    pub date_text: String,
    pub fatigue_text: String,
    pub hunger_text: String,
    pub lighting_text: String,
    pub mood_text: String,
    pub move_mode_text: String,
    pub pain_text: String,
    pub place_text: String,
    pub thirst_text: String,
    pub time_text: String,
    pub weather_text: String,
    pub weariness_text: String,
    pub wielding_text: String,

    /// Threat summary per compass slot, `Local` last.
    pub compass: [String; NUM_CARDINAL_DIRECTIONS],
}

impl AvatarSnapshot {
    /// Condition of one body part; parts absent from the snapshot read as zeroed.
    #[must_use]
    pub fn body_part(&self, part: BodyPart) -> BodyPartStatus {
        self.body.get(&part).copied().unwrap_or_default()
    }

    /// Compass entry for one direction slot.
    #[must_use]
    pub fn compass_text(&self, direction: CardinalDirection) -> &str {
        &self.compass[direction.index()]
    }
}
