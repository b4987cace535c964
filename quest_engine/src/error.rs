//! Engine error taxonomy.
//!
//! Every failure is a recoverable result value. Nothing in this crate is
//! fatal to the host process: a failed generation simply yields no quest
//! for that trigger.

use thiserror::Error;

use game_model::{CharacterId, TriggerKind};

use crate::quest::{ChoiceId, ObjectiveId, QuestInstanceId, QuestState};
use crate::registry::TemplateId;

/// All errors the quest engine can return.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Filtering left no template eligible for the trigger. The caller may
    /// widen the trigger context or drop the request.
    #[error("no eligible template for trigger '{trigger}'")]
    NoEligibleTemplate { trigger: TriggerKind },

    /// The character already has a non-terminal instance of this template.
    /// Not logged as an error; the caller may retry with another trigger.
    #[error("character already has an active quest from template {template}")]
    DuplicateActiveQuest { template: TemplateId },

    /// A lifecycle operation was attempted from a state that forbids it.
    /// Usually indicates a stale reference on the caller's side.
    #[error("cannot {action} a quest in the {state:?} state")]
    InvalidTransition {
        state: QuestState,
        action: &'static str,
    },

    /// Filtering produced a degenerate theme set the scorer cannot weight.
    #[error("affinity computation failed: empty candidate theme set")]
    AffinityComputation,

    /// The external persistence boundary reported this instance active
    /// elsewhere; the engine refuses to double-start it.
    #[error("quest instance {instance} is already active elsewhere")]
    PersistenceConflict { instance: QuestInstanceId },

    /// The character service has no snapshot for this character.
    #[error("unknown character {0}")]
    UnknownCharacter(CharacterId),

    /// No registered quest instance with this id.
    #[error("unknown quest instance {0}")]
    UnknownInstance(QuestInstanceId),

    /// The instance has no objective with this id.
    #[error("unknown objective {0}")]
    UnknownObjective(ObjectiveId),

    /// The instance has no choice with this id.
    #[error("unknown choice {0}")]
    UnknownChoice(ChoiceId),

    /// The engine configuration failed validation or parsing.
    #[error("invalid engine configuration: {0}")]
    Config(String),
}
