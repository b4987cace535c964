//! Play-style archetype definitions.

use serde::{Deserialize, Serialize};

/// Coarse play-style classification derived from attribute distribution.
///
/// Archetypes are never stored as ground truth - they are recomputed from
/// the current attribute snapshot whenever needed, so they track character
/// progression automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterArchetype {
    /// Might-dominant.
    Warrior,
    /// Intellect-dominant.
    Scholar,
    /// Will-dominant.
    Mystic,
    /// Shadow-dominant.
    ShadowWalker,
    /// No single dominant attribute.
    Balanced,
}

impl CharacterArchetype {
    /// All archetypes, in a stable order.
    pub const ALL: [CharacterArchetype; 5] = [
        CharacterArchetype::Warrior,
        CharacterArchetype::Scholar,
        CharacterArchetype::Mystic,
        CharacterArchetype::ShadowWalker,
        CharacterArchetype::Balanced,
    ];

    /// Human-readable name for presentation layers.
    pub fn display_name(&self) -> &'static str {
        match self {
            CharacterArchetype::Warrior => "Warrior",
            CharacterArchetype::Scholar => "Scholar",
            CharacterArchetype::Mystic => "Mystic",
            CharacterArchetype::ShadowWalker => "Shadow Walker",
            CharacterArchetype::Balanced => "Balanced",
        }
    }
}

impl std::fmt::Display for CharacterArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
