//! Theme Affinity Scorer - weights each narrative theme for a character.
//!
//! The scorer is a pure function of archetype and narrative context. It is
//! queried fresh on every generation request and holds no cache;
//! recomputation is cheap and avoids staleness bugs.

use std::collections::HashMap;

use game_model::{CharacterArchetype, NarrativeTheme};

use crate::config::EngineConfig;
use crate::context::NarrativeContext;

/// Static base affinity of an archetype for a theme, in [0, 1].
///
/// These are the registry constants the scorer starts from before any
/// history adjustment.
pub fn base_affinity(archetype: CharacterArchetype, theme: NarrativeTheme) -> f32 {
    use CharacterArchetype::*;
    use NarrativeTheme::*;

    match (archetype, theme) {
        (Warrior, Corruption) => 0.3,
        (Warrior, Discovery) => 0.4,
        (Warrior, Betrayal) => 0.5,
        (Warrior, Redemption) => 0.5,
        (Warrior, Vengeance) => 0.8,
        (Warrior, Protection) => 0.8,
        (Warrior, ForbiddenKnowledge) => 0.2,
        (Warrior, Survival) => 0.7,
        (Warrior, Power) => 0.6,
        (Warrior, Sacrifice) => 0.5,

        (Scholar, Corruption) => 0.4,
        (Scholar, Discovery) => 0.9,
        (Scholar, Betrayal) => 0.4,
        (Scholar, Redemption) => 0.4,
        (Scholar, Vengeance) => 0.3,
        (Scholar, Protection) => 0.4,
        (Scholar, ForbiddenKnowledge) => 0.9,
        (Scholar, Survival) => 0.4,
        (Scholar, Power) => 0.5,
        (Scholar, Sacrifice) => 0.4,

        (Mystic, Corruption) => 0.6,
        (Mystic, Discovery) => 0.6,
        (Mystic, Betrayal) => 0.4,
        (Mystic, Redemption) => 0.7,
        (Mystic, Vengeance) => 0.3,
        (Mystic, Protection) => 0.6,
        (Mystic, ForbiddenKnowledge) => 0.7,
        (Mystic, Survival) => 0.4,
        (Mystic, Power) => 0.4,
        (Mystic, Sacrifice) => 0.8,

        (ShadowWalker, Corruption) => 0.8,
        (ShadowWalker, Discovery) => 0.5,
        (ShadowWalker, Betrayal) => 0.8,
        (ShadowWalker, Redemption) => 0.3,
        (ShadowWalker, Vengeance) => 0.7,
        (ShadowWalker, Protection) => 0.3,
        (ShadowWalker, ForbiddenKnowledge) => 0.6,
        (ShadowWalker, Survival) => 0.6,
        (ShadowWalker, Power) => 0.7,
        (ShadowWalker, Sacrifice) => 0.3,

        (Balanced, _) => 0.5,
    }
}

/// Score every theme for a character.
///
/// # Algorithm
///
/// 1. Start from the archetype's static base affinity per theme
/// 2. Adjust by tag valence for themes appearing in the recent choice
///    history sample (positive tags pull a theme up, negative push it down)
/// 3. Subtract a recency penalty for themes generated within the last N
///    quests; the penalty decays linearly toward zero as quests intervene
/// 4. Clamp every score to [0, 1]
pub fn score_themes(
    archetype: CharacterArchetype,
    context: &NarrativeContext,
    config: &EngineConfig,
) -> HashMap<NarrativeTheme, f32> {
    // Signed frequency adjustment from consequence tags
    let mut frequency: HashMap<NarrativeTheme, f32> = HashMap::new();
    for record in context.recent_choices(config.history_sample) {
        for tag in &record.tags {
            *frequency.entry(tag.theme).or_default() += tag.valence * config.frequency_boost;
        }
    }

    // Strongest applicable recency penalty per theme; repeats don't stack
    let mut recency: HashMap<NarrativeTheme, f32> = HashMap::new();
    let window = config.recency_window;
    if window > 0 {
        for (age, theme) in context.recent_themes(window).enumerate() {
            let penalty = config.recency_penalty * (window - age) as f32 / window as f32;
            let entry = recency.entry(theme).or_default();
            if penalty > *entry {
                *entry = penalty;
            }
        }
    }

    NarrativeTheme::ALL
        .iter()
        .map(|&theme| {
            let score = base_affinity(archetype, theme)
                + frequency.get(&theme).copied().unwrap_or(0.0)
                - recency.get(&theme).copied().unwrap_or(0.0);
            (theme, score.clamp(0.0, 1.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ConsequenceTag;
    use crate::quest::{ChoiceId, QuestInstanceId};
    use crate::registry::TemplateId;
    use game_model::CharacterId;

    fn context() -> NarrativeContext {
        NarrativeContext::new(CharacterId::new())
    }

    fn record_tagged_choice(ctx: &mut NarrativeContext, theme: NarrativeTheme, valence: f32) {
        ctx.record_choice(
            QuestInstanceId::new(),
            TemplateId::new("test-template"),
            ChoiceId::new(),
            theme,
            vec![ConsequenceTag::new(theme, valence)],
        );
    }

    #[test]
    fn test_base_affinities_in_range() {
        for archetype in CharacterArchetype::ALL {
            for theme in NarrativeTheme::ALL {
                let base = base_affinity(archetype, theme);
                assert!((0.0..=1.0).contains(&base), "{archetype} {theme}: {base}");
            }
        }
    }

    #[test]
    fn test_fresh_context_scores_are_base() {
        let config = EngineConfig::default();
        let scores = score_themes(CharacterArchetype::Warrior, &context(), &config);

        for theme in NarrativeTheme::ALL {
            let expected = base_affinity(CharacterArchetype::Warrior, theme);
            assert!((scores[&theme] - expected).abs() < 0.001);
        }
    }

    #[test]
    fn test_positive_tags_raise_score() {
        let config = EngineConfig::default();
        let mut ctx = context();
        for _ in 0..4 {
            record_tagged_choice(&mut ctx, NarrativeTheme::Vengeance, 1.0);
        }

        let scores = score_themes(CharacterArchetype::Scholar, &ctx, &config);
        let base = base_affinity(CharacterArchetype::Scholar, NarrativeTheme::Vengeance);
        assert!(scores[&NarrativeTheme::Vengeance] > base);
    }

    #[test]
    fn test_negative_tags_lower_score() {
        let config = EngineConfig::default();
        let mut ctx = context();
        for _ in 0..4 {
            record_tagged_choice(&mut ctx, NarrativeTheme::Protection, -1.0);
        }

        let scores = score_themes(CharacterArchetype::Warrior, &ctx, &config);
        let base = base_affinity(CharacterArchetype::Warrior, NarrativeTheme::Protection);
        assert!(scores[&NarrativeTheme::Protection] < base);
    }

    #[test]
    fn test_recency_penalty_decays() {
        let config = EngineConfig::default();

        // Betrayal generated three quests ago, then two other themes
        let mut older = context();
        older.record_generated_theme(NarrativeTheme::Betrayal);
        older.record_generated_theme(NarrativeTheme::Discovery);
        older.record_generated_theme(NarrativeTheme::Survival);

        // Betrayal generated just now
        let mut newer = context();
        newer.record_generated_theme(NarrativeTheme::Betrayal);

        let older_score =
            score_themes(CharacterArchetype::Balanced, &older, &config)[&NarrativeTheme::Betrayal];
        let newer_score =
            score_themes(CharacterArchetype::Balanced, &newer, &config)[&NarrativeTheme::Betrayal];
        let base = base_affinity(CharacterArchetype::Balanced, NarrativeTheme::Betrayal);

        assert!(newer_score < older_score);
        assert!(older_score < base);
    }

    #[test]
    fn test_penalty_vanishes_outside_window() {
        let config = EngineConfig::default();
        let mut ctx = context();

        ctx.record_generated_theme(NarrativeTheme::Power);
        for _ in 0..config.recency_window {
            ctx.record_generated_theme(NarrativeTheme::Discovery);
        }

        let scores = score_themes(CharacterArchetype::Balanced, &ctx, &config);
        let base = base_affinity(CharacterArchetype::Balanced, NarrativeTheme::Power);
        assert!((scores[&NarrativeTheme::Power] - base).abs() < 0.001);
    }

    #[test]
    fn test_scores_always_in_unit_interval() {
        let config = EngineConfig::default();
        let mut ctx = context();

        // Pile on extreme history in both directions
        for i in 0..50 {
            let theme = NarrativeTheme::ALL[i % NarrativeTheme::ALL.len()];
            record_tagged_choice(&mut ctx, theme, if i % 2 == 0 { 1.0 } else { -1.0 });
            ctx.record_generated_theme(theme);
        }
        for _ in 0..30 {
            record_tagged_choice(&mut ctx, NarrativeTheme::Discovery, 1.0);
            record_tagged_choice(&mut ctx, NarrativeTheme::Vengeance, -1.0);
        }

        for archetype in CharacterArchetype::ALL {
            let scores = score_themes(archetype, &ctx, &config);
            assert_eq!(scores.len(), NarrativeTheme::ALL.len());
            for (theme, score) in scores {
                assert!((0.0..=1.0).contains(&score), "{archetype} {theme}: {score}");
            }
        }
    }
}
