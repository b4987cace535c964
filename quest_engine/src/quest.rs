//! Quest instances and the lifecycle state machine.
//!
//! An instance is generated from exactly one template for exactly one
//! character. Its objectives, text, and reward are fixed at generation time;
//! only objective progress and the lifecycle state change afterward.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use game_model::{CharacterId, NarrativeTheme};

use crate::context::{ConsequenceEffect, ConsequenceTag, NarrativeContext};
use crate::error::EngineError;
use crate::registry::TemplateId;

/// Unique identifier for quest instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestInstanceId(pub Uuid);

impl QuestInstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestInstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QuestInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for objectives within an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectiveId(pub Uuid);

impl ObjectiveId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectiveId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for choices within an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceId(pub Uuid);

impl ChoiceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states. `Completed`, `Failed`, and `Abandoned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestState {
    NotStarted,
    Active,
    Completed,
    Failed,
    Abandoned,
}

impl QuestState {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuestState::Completed | QuestState::Failed | QuestState::Abandoned
        )
    }
}

/// One objective on an instance. Everything but `progress` is fixed at
/// generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: ObjectiveId,
    pub description: String,
    pub progress: u32,
    pub target: u32,
    pub required: bool,
}

impl Objective {
    /// Whether the objective's completion predicate holds.
    pub fn is_satisfied(&self) -> bool {
        self.progress >= self.target
    }
}

/// One available choice on an instance, with its consequence descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestChoice {
    pub id: ChoiceId,
    pub text: String,
    pub effects: Vec<ConsequenceEffect>,
    pub tags: Vec<ConsequenceTag>,
    /// Set once the choice has been resolved; a choice resolves at most once.
    pub resolved: bool,
}

/// Resolved reward, already scaled for the character's archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Reward {
    pub experience: u32,
    pub gold: u32,
    pub items: Vec<String>,
}

/// Summary of one choice resolution, handed back to the caller alongside
/// the updated instance so it can persist the context delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceResolution {
    pub instance: QuestInstanceId,
    pub choice: ChoiceId,
    pub effects: Vec<ConsequenceEffect>,
    /// Position assigned in the character's choice history.
    pub sequence: u64,
}

/// A concrete, generated occurrence of a template, bound to one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestInstance {
    pub id: QuestInstanceId,
    pub template: TemplateId,
    pub character: CharacterId,
    pub theme: NarrativeTheme,
    pub title: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    pub choices: Vec<QuestChoice>,
    pub reward: Reward,
    pub state: QuestState,
}

impl QuestInstance {
    /// Move from `NotStarted` to `Active`.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state {
            QuestState::NotStarted => {
                self.state = QuestState::Active;
                Ok(())
            }
            state => Err(EngineError::InvalidTransition {
                state,
                action: "start",
            }),
        }
    }

    /// Apply progress to an objective. Progress saturates at the objective's
    /// target and never goes below zero. When every required objective is
    /// satisfied the instance auto-transitions to `Completed`.
    ///
    /// Returns the state after the update.
    pub fn report_objective_progress(
        &mut self,
        objective: ObjectiveId,
        delta: i64,
    ) -> Result<QuestState, EngineError> {
        if self.state != QuestState::Active {
            return Err(EngineError::InvalidTransition {
                state: self.state,
                action: "report progress on",
            });
        }

        let obj = self
            .objectives
            .iter_mut()
            .find(|o| o.id == objective)
            .ok_or(EngineError::UnknownObjective(objective))?;

        let updated = (obj.progress as i64 + delta).clamp(0, obj.target as i64);
        obj.progress = updated as u32;

        if self.required_objectives_satisfied() {
            self.state = QuestState::Completed;
        }
        Ok(self.state)
    }

    /// Resolve a choice: apply its consequence descriptor to the character's
    /// narrative context and record it in the choice history.
    ///
    /// This is the only path by which an instance mutates state outside
    /// itself. All checks happen before any write, so a failure leaves both
    /// the instance and the context untouched. Once the instance has left
    /// `Active`, re-applying a choice is rejected with `InvalidTransition`.
    pub fn resolve_choice(
        &mut self,
        choice: ChoiceId,
        context: &mut NarrativeContext,
    ) -> Result<ChoiceResolution, EngineError> {
        if self.state != QuestState::Active {
            return Err(EngineError::InvalidTransition {
                state: self.state,
                action: "resolve a choice on",
            });
        }

        let found = self
            .choices
            .iter_mut()
            .find(|c| c.id == choice)
            .ok_or(EngineError::UnknownChoice(choice))?;
        if found.resolved {
            return Err(EngineError::InvalidTransition {
                state: QuestState::Active,
                action: "re-resolve an already resolved choice on",
            });
        }

        found.resolved = true;
        let effects = found.effects.clone();
        let tags = found.tags.clone();

        for effect in &effects {
            context.apply_effect(effect);
        }
        let sequence =
            context.record_choice(self.id, self.template.clone(), choice, self.theme, tags);

        Ok(ChoiceResolution {
            instance: self.id,
            choice,
            effects,
            sequence,
        })
    }

    /// Abandon an active quest.
    pub fn abandon(&mut self) -> Result<(), EngineError> {
        self.transition_terminal(QuestState::Abandoned, "abandon")
    }

    /// Fail an active quest (trigger-driven).
    pub fn fail(&mut self) -> Result<(), EngineError> {
        self.transition_terminal(QuestState::Failed, "fail")
    }

    /// Whether all required objectives are satisfied.
    pub fn required_objectives_satisfied(&self) -> bool {
        self.objectives
            .iter()
            .filter(|o| o.required)
            .all(Objective::is_satisfied)
    }

    /// Look up an objective by id.
    pub fn objective(&self, id: ObjectiveId) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    /// Look up a choice by id.
    pub fn choice(&self, id: ChoiceId) -> Option<&QuestChoice> {
        self.choices.iter().find(|c| c.id == id)
    }

    fn transition_terminal(
        &mut self,
        target: QuestState,
        action: &'static str,
    ) -> Result<(), EngineError> {
        match self.state {
            QuestState::Active => {
                self.state = target;
                Ok(())
            }
            state => Err(EngineError::InvalidTransition { state, action }),
        }
    }
}
