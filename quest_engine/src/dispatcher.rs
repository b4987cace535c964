//! Trigger Dispatcher - decides whether an external trigger reaches the
//! generator.
//!
//! Cooldowns are tracked per (character, trigger kind) in caller-supplied
//! monotonic ticks, so the host decides what a tick means (game seconds,
//! turns, frames). A trigger inside its cooldown is a silent no-op, never
//! an error.

use std::collections::HashMap;

use tracing::debug;

use game_model::{CharacterId, TriggerKind};

use crate::config::EngineConfig;

/// Per-character, per-trigger-kind cooldown gate.
#[derive(Debug, Clone, Default)]
pub struct TriggerDispatcher {
    /// Tick at which each (character, kind) last passed the gate.
    last_accepted: HashMap<(CharacterId, TriggerKind), u64>,
}

impl TriggerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a trigger may proceed to generation at `now`.
    ///
    /// Acceptance records the tick and starts a fresh cooldown; rejection
    /// records nothing, so a rejected trigger does not extend the window.
    pub fn try_accept(
        &mut self,
        character: CharacterId,
        kind: TriggerKind,
        now: u64,
        config: &EngineConfig,
    ) -> bool {
        let key = (character, kind);
        if let Some(&last) = self.last_accepted.get(&key) {
            let cooldown = config.cooldown_for(kind);
            if now.saturating_sub(last) < cooldown {
                debug!(%character, trigger = %kind, now, last, "trigger rejected by cooldown");
                return false;
            }
        }
        self.last_accepted.insert(key, now);
        true
    }

    /// Ticks until this (character, kind) pair passes the gate again; zero
    /// when it would pass now.
    pub fn remaining_cooldown(
        &self,
        character: CharacterId,
        kind: TriggerKind,
        now: u64,
        config: &EngineConfig,
    ) -> u64 {
        match self.last_accepted.get(&(character, kind)) {
            Some(&last) => config
                .cooldown_for(kind)
                .saturating_sub(now.saturating_sub(last)),
            None => 0,
        }
    }

    /// Drop all cooldown state for a character.
    pub fn forget_character(&mut self, character: CharacterId) {
        self.last_accepted.retain(|(c, _), _| *c != character);
    }
}
