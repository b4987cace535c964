//! Template Registry - the immutable catalog of quest templates.
//!
//! The registry is built once at startup (from the built-in catalog or a
//! host-supplied template set) and only read afterward, so it is safe to
//! share across any number of concurrent readers.

mod catalog;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use game_model::{AttributeSnapshot, NarrativeTheme, TriggerKind};

use crate::context::{ConsequenceEffect, ConsequenceTag, NarrativeContext};

/// Stable identifier for quest templates. Slug-based so ids survive process
/// restarts and can be referenced from persisted choice history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

impl TemplateId {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A prerequisite a character must satisfy for a template to be eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Prerequisite {
    MinLevel(u32),
    MaxLevel(u32),
    MinCorruption(f32),
    MaxCorruption(f32),
    /// The named narrative flag must exist and be truthy.
    RequiredFlag(String),
    /// The named narrative flag must be absent or falsy.
    ForbiddenFlag(String),
}

impl Prerequisite {
    /// Evaluate against the character's current state.
    pub fn is_satisfied(&self, snapshot: &AttributeSnapshot, context: &NarrativeContext) -> bool {
        match self {
            Prerequisite::MinLevel(level) => snapshot.level >= *level,
            Prerequisite::MaxLevel(level) => snapshot.level <= *level,
            Prerequisite::MinCorruption(c) => snapshot.corruption >= *c,
            Prerequisite::MaxCorruption(c) => snapshot.corruption <= *c,
            Prerequisite::RequiredFlag(key) => context.flag_is_set(key),
            Prerequisite::ForbiddenFlag(key) => !context.flag_is_set(key),
        }
    }
}

/// Structural pattern for one objective. Wording may contain archetype
/// substitution slots; `target` is the progress count that satisfies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTemplate {
    pub description: String,
    pub target: u32,
    pub required: bool,
}

impl ObjectiveTemplate {
    pub fn new(description: impl Into<String>, target: u32) -> Self {
        Self {
            description: description.into(),
            target,
            required: true,
        }
    }

    /// Mark the objective as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Structural pattern for one player choice and its consequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceTemplate {
    pub text: String,
    pub effects: Vec<ConsequenceEffect>,
    pub tags: Vec<ConsequenceTag>,
}

impl ChoiceTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            effects: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: ConsequenceEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_tag(mut self, tag: ConsequenceTag) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Numeric reward pattern, scaled per archetype at instantiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RewardTemplate {
    pub experience: u32,
    pub gold: u32,
    pub items: Vec<String>,
}

impl RewardTemplate {
    pub fn new(experience: u32, gold: u32) -> Self {
        Self {
            experience,
            gold,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }
}

/// An immutable quest template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub id: TemplateId,
    pub theme: NarrativeTheme,
    /// Title pattern; may contain archetype substitution slots.
    pub title: String,
    /// Description pattern; may contain archetype substitution slots.
    pub description: String,
    pub objectives: Vec<ObjectiveTemplate>,
    pub choices: Vec<ChoiceTemplate>,
    pub reward: RewardTemplate,
    pub prerequisites: Vec<Prerequisite>,
    /// Trigger kinds this template may be generated from. Empty means any.
    pub eligible_triggers: Vec<TriggerKind>,
    /// Relative selection weight among templates of the same theme.
    pub weight: f32,
}

impl QuestTemplate {
    pub fn new(
        id: impl Into<String>,
        theme: NarrativeTheme,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TemplateId::new(id),
            theme,
            title: title.into(),
            description: description.into(),
            objectives: Vec::new(),
            choices: Vec::new(),
            reward: RewardTemplate::default(),
            prerequisites: Vec::new(),
            eligible_triggers: Vec::new(),
            weight: 1.0,
        }
    }

    pub fn with_objective(mut self, objective: ObjectiveTemplate) -> Self {
        self.objectives.push(objective);
        self
    }

    pub fn with_choice(mut self, choice: ChoiceTemplate) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_reward(mut self, reward: RewardTemplate) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_prerequisite(mut self, prerequisite: Prerequisite) -> Self {
        self.prerequisites.push(prerequisite);
        self
    }

    pub fn with_triggers(mut self, kinds: impl IntoIterator<Item = TriggerKind>) -> Self {
        self.eligible_triggers.extend(kinds);
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    /// Whether this template accepts the trigger kind.
    pub fn accepts_trigger(&self, kind: TriggerKind) -> bool {
        self.eligible_triggers.is_empty() || self.eligible_triggers.contains(&kind)
    }

    /// Whether the character satisfies every prerequisite.
    pub fn prerequisites_met(
        &self,
        snapshot: &AttributeSnapshot,
        context: &NarrativeContext,
    ) -> bool {
        self.prerequisites
            .iter()
            .all(|p| p.is_satisfied(snapshot, context))
    }
}

/// Read-only catalog of quest templates grouped by theme.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<TemplateId, QuestTemplate>,
    by_theme: HashMap<NarrativeTheme, Vec<TemplateId>>,
}

impl TemplateRegistry {
    /// Build a registry from a template set. Later templates win id clashes.
    pub fn from_templates(templates: impl IntoIterator<Item = QuestTemplate>) -> Self {
        let mut registry = Self::default();
        for template in templates {
            registry
                .by_theme
                .entry(template.theme)
                .or_default()
                .push(template.id.clone());
            registry.templates.insert(template.id.clone(), template);
        }
        registry
    }

    /// The built-in template catalog covering all ten themes.
    pub fn builtin() -> Self {
        Self::from_templates(catalog::builtin_templates())
    }

    /// Look up a template by id.
    pub fn get(&self, id: &TemplateId) -> Option<&QuestTemplate> {
        self.templates.get(id)
    }

    /// All templates for a theme.
    pub fn templates_by_theme(&self, theme: NarrativeTheme) -> Vec<&QuestTemplate> {
        self.by_theme
            .get(&theme)
            .map(|ids| ids.iter().filter_map(|id| self.templates.get(id)).collect())
            .unwrap_or_default()
    }

    /// Iterate over every template.
    pub fn all_templates(&self) -> impl Iterator<Item = &QuestTemplate> {
        self.templates.values()
    }

    /// Themes that have at least one template.
    pub fn themes_present(&self) -> Vec<NarrativeTheme> {
        NarrativeTheme::ALL
            .iter()
            .copied()
            .filter(|t| self.by_theme.get(t).map(|v| !v.is_empty()).unwrap_or(false))
            .collect()
    }

    /// Total number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
