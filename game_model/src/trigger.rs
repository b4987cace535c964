//! Quest trigger events emitted by external game systems.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CharacterId;

/// Unique identifier for world locations, as seen by the quest engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub Uuid);

impl LocationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An external event that may prompt quest generation.
///
/// Triggers are emitted by the combat, world, and dialogue systems; the
/// dispatcher decides whether each one actually reaches the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestTrigger {
    /// The character entered a location.
    LocationEntered { location: LocationId },

    /// The character won a combat encounter.
    CombatVictory {
        defeated: Vec<CharacterId>,
        /// Whether the fight was against a named/boss opponent.
        notable: bool,
    },

    /// The character made a significant dialogue choice.
    DialogueChoice {
        speaker: CharacterId,
        topic: String,
    },

    /// The character's corruption crossed a threshold.
    CorruptionThreshold { threshold: f32, rising: bool },

    /// The character gained a level.
    LevelUp { new_level: u32 },

    /// The character's standing with a faction changed materially.
    FactionChange { faction: String, delta: f32 },

    /// The character acquired a noteworthy item.
    ItemAcquired { item_name: String },

    /// A span of in-game time passed without quest activity.
    TimeElapsed { idle_ticks: u64 },
}

/// The kind of a trigger, without its payload.
///
/// Used for cooldown keying and template eligibility filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKind {
    LocationEntered,
    CombatVictory,
    DialogueChoice,
    CorruptionThreshold,
    LevelUp,
    FactionChange,
    ItemAcquired,
    TimeElapsed,
}

impl TriggerKind {
    /// All trigger kinds, in a stable order.
    pub const ALL: [TriggerKind; 8] = [
        TriggerKind::LocationEntered,
        TriggerKind::CombatVictory,
        TriggerKind::DialogueChoice,
        TriggerKind::CorruptionThreshold,
        TriggerKind::LevelUp,
        TriggerKind::FactionChange,
        TriggerKind::ItemAcquired,
        TriggerKind::TimeElapsed,
    ];
}

impl QuestTrigger {
    /// The payload-free kind of this trigger.
    pub fn kind(&self) -> TriggerKind {
        match self {
            QuestTrigger::LocationEntered { .. } => TriggerKind::LocationEntered,
            QuestTrigger::CombatVictory { .. } => TriggerKind::CombatVictory,
            QuestTrigger::DialogueChoice { .. } => TriggerKind::DialogueChoice,
            QuestTrigger::CorruptionThreshold { .. } => TriggerKind::CorruptionThreshold,
            QuestTrigger::LevelUp { .. } => TriggerKind::LevelUp,
            QuestTrigger::FactionChange { .. } => TriggerKind::FactionChange,
            QuestTrigger::ItemAcquired { .. } => TriggerKind::ItemAcquired,
            QuestTrigger::TimeElapsed { .. } => TriggerKind::TimeElapsed,
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TriggerKind::LocationEntered => "location-entered",
            TriggerKind::CombatVictory => "combat-victory",
            TriggerKind::DialogueChoice => "dialogue-choice",
            TriggerKind::CorruptionThreshold => "corruption-threshold",
            TriggerKind::LevelUp => "level-up",
            TriggerKind::FactionChange => "faction-change",
            TriggerKind::ItemAcquired => "item-acquired",
            TriggerKind::TimeElapsed => "time-elapsed",
        };
        write!(f, "{}", name)
    }
}
