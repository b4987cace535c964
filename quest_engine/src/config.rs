//! Engine tuning configuration.
//!
//! Every constant the generation pipeline depends on lives here rather than
//! inline in the algorithms, so hosts can tune behavior from a TOML file
//! without recompiling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use game_model::{CharacterArchetype, TriggerKind};

use crate::error::EngineError;

/// Tunable parameters for the quest engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Share of the attribute total a single attribute must exceed to count
    /// as dominant (0.25 = perfectly even four-way split).
    pub dominance_threshold: f32,

    /// Attributes whose normalized share is within this band of the maximum
    /// are treated as tied, forcing the Balanced archetype.
    pub dominance_epsilon: f32,

    /// How many recently generated themes attract a repetition penalty.
    pub recency_window: usize,

    /// Affinity penalty for the most recently generated theme. Decays
    /// linearly to zero across the recency window.
    pub recency_penalty: f32,

    /// Affinity boost per positively tagged occurrence of a theme in the
    /// choice history sample.
    pub frequency_boost: f32,

    /// How many of the most recent choice records feed frequency scoring.
    pub history_sample: usize,

    /// Cooldown applied to trigger kinds without an explicit override,
    /// in caller-supplied monotonic ticks.
    pub default_cooldown_ticks: u64,

    /// Per-kind cooldown overrides.
    pub cooldown_overrides: HashMap<TriggerKind, u64>,

    /// Reward scaling per archetype.
    pub reward_scaling: RewardScaling,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dominance_threshold: 0.4,
            dominance_epsilon: 0.05,
            recency_window: 3,
            recency_penalty: 0.4,
            frequency_boost: 0.05,
            history_sample: 20,
            default_cooldown_ticks: 300,
            cooldown_overrides: HashMap::new(),
            reward_scaling: RewardScaling::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML. Missing fields fall back to defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(input).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Cooldown for a trigger kind, honoring overrides.
    pub fn cooldown_for(&self, kind: TriggerKind) -> u64 {
        self.cooldown_overrides
            .get(&kind)
            .copied()
            .unwrap_or(self.default_cooldown_ticks)
    }

    /// Reject configurations the scoring pipeline cannot work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.25..=1.0).contains(&self.dominance_threshold) {
            return Err(EngineError::Config(format!(
                "dominance_threshold must be in [0.25, 1.0], got {}",
                self.dominance_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.recency_penalty) {
            return Err(EngineError::Config(format!(
                "recency_penalty must be in [0.0, 1.0], got {}",
                self.recency_penalty
            )));
        }
        if self.dominance_epsilon < 0.0 {
            return Err(EngineError::Config(format!(
                "dominance_epsilon must be non-negative, got {}",
                self.dominance_epsilon
            )));
        }
        Ok(())
    }
}

/// Reward multipliers keyed by archetype. Numeric reward fields are scaled
/// once at instantiation and never re-adapted mid-quest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardScaling {
    pub warrior: f32,
    pub scholar: f32,
    pub mystic: f32,
    pub shadow_walker: f32,
    pub balanced: f32,
}

impl Default for RewardScaling {
    fn default() -> Self {
        Self {
            warrior: 1.0,
            scholar: 1.1,
            mystic: 1.05,
            shadow_walker: 1.15,
            balanced: 1.0,
        }
    }
}

impl RewardScaling {
    /// Multiplier for a given archetype.
    pub fn multiplier(&self, archetype: CharacterArchetype) -> f32 {
        match archetype {
            CharacterArchetype::Warrior => self.warrior,
            CharacterArchetype::Scholar => self.scholar,
            CharacterArchetype::Mystic => self.mystic,
            CharacterArchetype::ShadowWalker => self.shadow_walker,
            CharacterArchetype::Balanced => self.balanced,
        }
    }
}
