//! Questweave engine - dynamic quest generation driven by character
//! archetypes, narrative themes, and accumulated player choices.
//!
//! The engine turns gameplay triggers into personalized quest instances:
//! a character's attribute spread determines an archetype, the archetype
//! and choice history score the narrative themes, and a weighted draw over
//! the eligible templates produces a concrete quest whose choices feed
//! consequences back into the character's narrative context.
//!
//! [`QuestEngine`] is the facade external code talks to; the modules below
//! it are usable on their own for finer-grained integration.

pub mod affinity;
pub mod archetype;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod generator;
pub mod quest;
pub mod registry;

pub use config::EngineConfig;
pub use context::{
    AlignmentAxes, AlignmentAxis, ChoiceRecord, ConsequenceEffect, ConsequenceTag,
    NarrativeContext,
};
pub use dispatcher::TriggerDispatcher;
pub use engine::QuestEngine;
pub use error::EngineError;
pub use generator::GenerationRequest;
pub use quest::{
    ChoiceId, ChoiceResolution, Objective, ObjectiveId, QuestChoice, QuestInstance,
    QuestInstanceId, QuestState, Reward,
};
pub use registry::{
    ChoiceTemplate, ObjectiveTemplate, Prerequisite, QuestTemplate, RewardTemplate, TemplateId,
    TemplateRegistry,
};
