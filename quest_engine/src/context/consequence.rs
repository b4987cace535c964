//! Consequence descriptors attached to quest choices.

use serde::{Deserialize, Serialize};

use game_model::{FlagValue, NarrativeTheme};

/// The three moral-alignment axes, each a scalar in [-1.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentAxis {
    /// -1.0 = Chaos, 1.0 = Order.
    OrderChaos,
    /// -1.0 = Evil, 1.0 = Good.
    GoodEvil,
    /// -1.0 = Selfish, 1.0 = Selfless.
    SelflessSelfish,
}

/// A single effect a resolved choice applies to the character's narrative
/// context. Effects are applied atomically per choice resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsequenceEffect {
    /// Shift one alignment axis by a delta; the axis is clamped afterward.
    AlignmentShift { axis: AlignmentAxis, delta: f32 },

    /// Shift standing with a faction by a delta.
    FactionShift { faction: String, delta: f32 },

    /// Write a narrative flag.
    FlagWrite { key: String, value: FlagValue },
}

/// A thematic tag on a choice's consequences, with a valence in [-1.0, 1.0].
///
/// Positive valences feed the affinity scorer's frequency boost: choosing
/// options tagged with a theme pulls future generation toward it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceTag {
    pub theme: NarrativeTheme,
    pub valence: f32,
}

impl ConsequenceTag {
    /// Create a tag, clamping the valence to its bounds.
    pub fn new(theme: NarrativeTheme, valence: f32) -> Self {
        Self {
            theme,
            valence: valence.clamp(-1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_valence_clamped() {
        let tag = ConsequenceTag::new(NarrativeTheme::Power, 3.0);
        assert_eq!(tag.valence, 1.0);

        let tag = ConsequenceTag::new(NarrativeTheme::Power, -3.0);
        assert_eq!(tag.valence, -1.0);
    }
}
