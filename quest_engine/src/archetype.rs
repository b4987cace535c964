//! Archetype detection - pure mapping from attribute distribution to archetype.

use game_model::{AttributeSnapshot, CharacterArchetype};

use crate::config::EngineConfig;

/// Derive the archetype for an attribute snapshot.
///
/// # Algorithm
///
/// 1. Normalize the four attributes to shares of their total
/// 2. Find the dominant share
/// 3. Dominant share above the threshold maps its attribute to an archetype
/// 4. A tie within the epsilon band, a sub-threshold maximum, or a zero
///    total all yield `Balanced`
///
/// Deterministic and side-effect free; the result is never cached or stored.
pub fn detect(snapshot: &AttributeSnapshot, config: &EngineConfig) -> CharacterArchetype {
    let total = snapshot.total();
    if total <= 0.0 {
        return CharacterArchetype::Balanced;
    }

    let shares = [
        (snapshot.might / total, CharacterArchetype::Warrior),
        (snapshot.intellect / total, CharacterArchetype::Scholar),
        (snapshot.will / total, CharacterArchetype::Mystic),
        (snapshot.shadow / total, CharacterArchetype::ShadowWalker),
    ];

    let (max_share, candidate) = shares
        .iter()
        .copied()
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0.0, CharacterArchetype::Balanced));

    if max_share <= config.dominance_threshold {
        return CharacterArchetype::Balanced;
    }

    // Two or more attributes inside the epsilon band means no clear dominant
    let contenders = shares
        .iter()
        .filter(|(share, _)| max_share - share < config.dominance_epsilon)
        .count();
    if contenders > 1 {
        return CharacterArchetype::Balanced;
    }

    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_might_dominant_is_warrior() {
        let snap = AttributeSnapshot::new(15.0, 5.0, 5.0, 5.0);
        assert_eq!(detect(&snap, &config()), CharacterArchetype::Warrior);
    }

    #[test]
    fn test_even_spread_is_balanced() {
        let snap = AttributeSnapshot::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(detect(&snap, &config()), CharacterArchetype::Balanced);
    }

    #[test]
    fn test_each_attribute_maps_to_its_archetype() {
        let cfg = config();
        let cases = [
            (
                AttributeSnapshot::new(20.0, 4.0, 4.0, 4.0),
                CharacterArchetype::Warrior,
            ),
            (
                AttributeSnapshot::new(4.0, 20.0, 4.0, 4.0),
                CharacterArchetype::Scholar,
            ),
            (
                AttributeSnapshot::new(4.0, 4.0, 20.0, 4.0),
                CharacterArchetype::Mystic,
            ),
            (
                AttributeSnapshot::new(4.0, 4.0, 4.0, 20.0),
                CharacterArchetype::ShadowWalker,
            ),
        ];

        for (snap, expected) in cases {
            assert_eq!(detect(&snap, &cfg), expected);
        }
    }

    #[test]
    fn test_near_tie_is_balanced() {
        // Two attributes just above threshold but within epsilon of each other
        let snap = AttributeSnapshot::new(20.0, 19.5, 1.0, 1.0);
        assert_eq!(detect(&snap, &config()), CharacterArchetype::Balanced);
    }

    #[test]
    fn test_zero_total_is_balanced() {
        let snap = AttributeSnapshot::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(detect(&snap, &config()), CharacterArchetype::Balanced);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let cfg = config();
        let snap = AttributeSnapshot::new(7.0, 13.0, 9.0, 2.0);
        let first = detect(&snap, &cfg);
        for _ in 0..100 {
            assert_eq!(detect(&snap, &cfg), first);
        }
    }
}
