//! Narrative Context Tracker - the persistent per-character record of
//! choices, moral alignment, faction standing, and narrative flags.
//!
//! One `NarrativeContext` exists per character, created on first quest
//! interaction and mutated only through choice resolution and quest
//! completion events. The engine never deletes it; persistence of the
//! record across sessions is the orchestrating caller's job.

mod consequence;

pub use consequence::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use game_model::{CharacterId, FlagValue, NarrativeTheme};

use crate::quest::{ChoiceId, QuestInstanceId};
use crate::registry::TemplateId;

/// How many generated themes the context remembers. Only the configured
/// recency window is ever scored, so this just bounds the record.
const RECENT_THEME_CAPACITY: usize = 16;

/// The three moral-alignment axes, clamped to [-1.0, 1.0] after every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AlignmentAxes {
    pub order_chaos: f32,
    pub good_evil: f32,
    pub selfless_selfish: f32,
}

impl AlignmentAxes {
    /// Shift one axis by a delta, clamping the result to its bounds.
    pub fn shift(&mut self, axis: AlignmentAxis, delta: f32) {
        let value = match axis {
            AlignmentAxis::OrderChaos => &mut self.order_chaos,
            AlignmentAxis::GoodEvil => &mut self.good_evil,
            AlignmentAxis::SelflessSelfish => &mut self.selfless_selfish,
        };
        *value = (*value + delta).clamp(-1.0, 1.0);
    }

    /// Read one axis.
    pub fn get(&self, axis: AlignmentAxis) -> f32 {
        match axis {
            AlignmentAxis::OrderChaos => self.order_chaos,
            AlignmentAxis::GoodEvil => self.good_evil,
            AlignmentAxis::SelflessSelfish => self.selfless_selfish,
        }
    }
}

/// One resolved choice in the character's ordered history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub instance: QuestInstanceId,
    pub template: TemplateId,
    pub choice: ChoiceId,
    pub theme: NarrativeTheme,
    pub tags: Vec<ConsequenceTag>,
    /// Monotonic per-character ordering; assigned by the context.
    pub sequence: u64,
}

/// Persistent per-character narrative profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeContext {
    pub character: CharacterId,

    /// Ordered choice history, oldest first.
    pub history: Vec<ChoiceRecord>,

    pub alignment: AlignmentAxes,

    /// Faction name -> standing scalar.
    pub faction_standing: HashMap<String, f32>,

    /// Open set of narrative flags.
    pub flags: HashMap<String, FlagValue>,

    /// Themes of recently generated quests, most recent last. Feeds the
    /// affinity scorer's anti-repetition penalty.
    pub recent_themes: Vec<NarrativeTheme>,

    next_sequence: u64,
}

impl NarrativeContext {
    /// Create an empty profile for a character.
    pub fn new(character: CharacterId) -> Self {
        Self {
            character,
            history: Vec::new(),
            alignment: AlignmentAxes::default(),
            faction_standing: HashMap::new(),
            flags: HashMap::new(),
            recent_themes: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Apply a single consequence effect. Alignment axes are clamped after
    /// the update; faction standing accumulates unbounded.
    pub fn apply_effect(&mut self, effect: &ConsequenceEffect) {
        match effect {
            ConsequenceEffect::AlignmentShift { axis, delta } => {
                self.alignment.shift(*axis, *delta);
            }
            ConsequenceEffect::FactionShift { faction, delta } => {
                *self.faction_standing.entry(faction.clone()).or_insert(0.0) += delta;
            }
            ConsequenceEffect::FlagWrite { key, value } => {
                self.flags.insert(key.clone(), value.clone());
            }
        }
    }

    /// Append a resolved choice to the history, assigning its sequence
    /// number. Returns the assigned sequence.
    pub fn record_choice(
        &mut self,
        instance: QuestInstanceId,
        template: TemplateId,
        choice: ChoiceId,
        theme: NarrativeTheme,
        tags: Vec<ConsequenceTag>,
    ) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.history.push(ChoiceRecord {
            instance,
            template,
            choice,
            theme,
            tags,
            sequence,
        });
        sequence
    }

    /// Note that a quest with this theme was generated for the character.
    pub fn record_generated_theme(&mut self, theme: NarrativeTheme) {
        self.recent_themes.push(theme);
        if self.recent_themes.len() > RECENT_THEME_CAPACITY {
            let excess = self.recent_themes.len() - RECENT_THEME_CAPACITY;
            self.recent_themes.drain(..excess);
        }
    }

    /// The last `n` generated themes, most recent first.
    pub fn recent_themes(&self, n: usize) -> impl Iterator<Item = NarrativeTheme> + '_ {
        self.recent_themes.iter().rev().take(n).copied()
    }

    /// The last `n` choice records, most recent first.
    pub fn recent_choices(&self, n: usize) -> impl Iterator<Item = &ChoiceRecord> {
        self.history.iter().rev().take(n)
    }

    /// Read a narrative flag.
    pub fn flag(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// Whether a flag exists and is truthy.
    pub fn flag_is_set(&self, key: &str) -> bool {
        self.flags.get(key).map(FlagValue::is_truthy).unwrap_or(false)
    }

    /// Standing with a faction; zero when unknown.
    pub fn faction_standing(&self, faction: &str) -> f32 {
        self.faction_standing.get(faction).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> NarrativeContext {
        NarrativeContext::new(CharacterId::new())
    }

    #[test]
    fn test_alignment_shift_and_clamp() {
        let mut ctx = context();

        ctx.apply_effect(&ConsequenceEffect::AlignmentShift {
            axis: AlignmentAxis::GoodEvil,
            delta: -0.2,
        });
        assert!((ctx.alignment.good_evil - (-0.2)).abs() < 0.001);

        // Push past the lower bound; must clamp
        ctx.apply_effect(&ConsequenceEffect::AlignmentShift {
            axis: AlignmentAxis::GoodEvil,
            delta: -5.0,
        });
        assert_eq!(ctx.alignment.good_evil, -1.0);

        ctx.apply_effect(&ConsequenceEffect::AlignmentShift {
            axis: AlignmentAxis::OrderChaos,
            delta: 3.0,
        });
        assert_eq!(ctx.alignment.order_chaos, 1.0);
    }

    #[test]
    fn test_faction_shift_accumulates() {
        let mut ctx = context();

        ctx.apply_effect(&ConsequenceEffect::FactionShift {
            faction: "Ashen Circle".into(),
            delta: 5.0,
        });
        ctx.apply_effect(&ConsequenceEffect::FactionShift {
            faction: "Ashen Circle".into(),
            delta: -2.0,
        });

        assert!((ctx.faction_standing("Ashen Circle") - 3.0).abs() < 0.001);
        assert_eq!(ctx.faction_standing("Unknown Order"), 0.0);
    }

    #[test]
    fn test_flag_write_and_read() {
        let mut ctx = context();

        ctx.apply_effect(&ConsequenceEffect::FlagWrite {
            key: "spared_the_traitor".into(),
            value: FlagValue::Bool(true),
        });

        assert!(ctx.flag_is_set("spared_the_traitor"));
        assert!(!ctx.flag_is_set("never_written"));
    }

    #[test]
    fn test_choice_history_ordering() {
        let mut ctx = context();
        let instance = QuestInstanceId::new();
        let template = TemplateId::new("test-template");

        for _ in 0..3 {
            ctx.record_choice(
                instance,
                template.clone(),
                ChoiceId::new(),
                NarrativeTheme::Betrayal,
                vec![],
            );
        }

        let sequences: Vec<_> = ctx.history.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn test_recent_themes_window() {
        let mut ctx = context();

        ctx.record_generated_theme(NarrativeTheme::Discovery);
        ctx.record_generated_theme(NarrativeTheme::Betrayal);
        ctx.record_generated_theme(NarrativeTheme::Power);

        let recent: Vec<_> = ctx.recent_themes(2).collect();
        assert_eq!(recent, vec![NarrativeTheme::Power, NarrativeTheme::Betrayal]);
    }

    #[test]
    fn test_recent_theme_capacity_bounded() {
        let mut ctx = context();
        for _ in 0..100 {
            ctx.record_generated_theme(NarrativeTheme::Survival);
        }
        assert!(ctx.recent_themes.len() <= RECENT_THEME_CAPACITY);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut ctx = context();
        ctx.apply_effect(&ConsequenceEffect::AlignmentShift {
            axis: AlignmentAxis::SelflessSelfish,
            delta: 0.3,
        });
        ctx.apply_effect(&ConsequenceEffect::FactionShift {
            faction: "Wardens".into(),
            delta: 4.0,
        });
        ctx.apply_effect(&ConsequenceEffect::FlagWrite {
            key: "oath_sworn".into(),
            value: FlagValue::Text("wardens".into()),
        });
        ctx.record_choice(
            QuestInstanceId::new(),
            TemplateId::new("test-template"),
            ChoiceId::new(),
            NarrativeTheme::Protection,
            vec![ConsequenceTag::new(NarrativeTheme::Protection, 0.8)],
        );
        ctx.record_generated_theme(NarrativeTheme::Protection);

        let json = serde_json::to_string(&ctx).unwrap();
        let restored: NarrativeContext = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, ctx);
    }
}
