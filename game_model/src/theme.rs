//! Narrative theme definitions.

use serde::{Deserialize, Serialize};

/// The ten narrative themes a quest can be built around.
///
/// Themes are the unit of affinity scoring and anti-repetition tracking:
/// the generator picks a theme first, then a template within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NarrativeTheme {
    /// Power at a price; taint spreading through people and places.
    Corruption,
    /// Uncovering what was lost, hidden, or never meant to be found.
    Discovery,
    /// Trust broken by allies, factions, or the character's own past.
    Betrayal,
    /// Atonement and the repair of past wrongs.
    Redemption,
    /// Retribution for an injury, real or perceived.
    Vengeance,
    /// Shielding the vulnerable from a concrete threat.
    Protection,
    /// Knowledge that exacts a cost from those who seek it.
    ForbiddenKnowledge,
    /// Endurance against scarcity, exposure, or pursuit.
    Survival,
    /// Ambition, influence, and the climb over others.
    Power,
    /// Giving up something dear for a greater end.
    Sacrifice,
}

impl NarrativeTheme {
    /// All themes, in a stable order.
    pub const ALL: [NarrativeTheme; 10] = [
        NarrativeTheme::Corruption,
        NarrativeTheme::Discovery,
        NarrativeTheme::Betrayal,
        NarrativeTheme::Redemption,
        NarrativeTheme::Vengeance,
        NarrativeTheme::Protection,
        NarrativeTheme::ForbiddenKnowledge,
        NarrativeTheme::Survival,
        NarrativeTheme::Power,
        NarrativeTheme::Sacrifice,
    ];

    /// Human-readable name for presentation layers.
    pub fn display_name(&self) -> &'static str {
        match self {
            NarrativeTheme::Corruption => "Corruption",
            NarrativeTheme::Discovery => "Discovery",
            NarrativeTheme::Betrayal => "Betrayal",
            NarrativeTheme::Redemption => "Redemption",
            NarrativeTheme::Vengeance => "Vengeance",
            NarrativeTheme::Protection => "Protection",
            NarrativeTheme::ForbiddenKnowledge => "Forbidden Knowledge",
            NarrativeTheme::Survival => "Survival",
            NarrativeTheme::Power => "Power",
            NarrativeTheme::Sacrifice => "Sacrifice",
        }
    }
}

impl std::fmt::Display for NarrativeTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_themes_distinct() {
        use std::collections::HashSet;
        let set: HashSet<_> = NarrativeTheme::ALL.iter().collect();
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(NarrativeTheme::Betrayal.to_string(), "Betrayal");
        assert_eq!(
            NarrativeTheme::ForbiddenKnowledge.to_string(),
            "Forbidden Knowledge"
        );
    }
}
