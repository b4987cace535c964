//! Quest Generator - selects a theme and template, then instantiates a quest
//! adapted to the character's archetype.
//!
//! Generation is a pure computation: it reads the registry, the character's
//! snapshot and narrative context, and an explicit RNG, and either returns a
//! fresh `QuestInstance` or a failure value. It writes nothing; registering
//! the instance with the lifecycle machinery is the caller's separate step.

use std::collections::{BTreeMap, HashSet};

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

use game_model::{AttributeSnapshot, CharacterArchetype, CharacterId, QuestTrigger};

use crate::affinity;
use crate::archetype;
use crate::config::EngineConfig;
use crate::context::NarrativeContext;
use crate::error::EngineError;
use crate::quest::{
    ChoiceId, Objective, ObjectiveId, QuestChoice, QuestInstance, QuestInstanceId, QuestState,
    Reward,
};
use crate::registry::{QuestTemplate, TemplateId, TemplateRegistry};

/// Everything generation needs to know about the requesting character.
#[derive(Debug)]
pub struct GenerationRequest<'a> {
    pub character: CharacterId,
    pub snapshot: &'a AttributeSnapshot,
    pub context: &'a NarrativeContext,
    pub trigger: &'a QuestTrigger,
}

/// Generate a quest instance for a character and trigger.
///
/// `active_templates` holds the template ids of the character's current
/// non-terminal instances; selecting one of them fails with
/// `DuplicateActiveQuest` rather than producing a second copy.
pub fn generate(
    registry: &TemplateRegistry,
    config: &EngineConfig,
    request: &GenerationRequest<'_>,
    active_templates: &HashSet<TemplateId>,
    rng: &mut StdRng,
) -> Result<QuestInstance, EngineError> {
    let trigger_kind = request.trigger.kind();
    let archetype = archetype::detect(request.snapshot, config);
    let scores = affinity::score_themes(archetype, request.context, config);

    // Filter to templates eligible for this trigger and character state.
    // BTreeMap keyed by display name keeps iteration order stable, so the
    // seeded RNG draw is reproducible regardless of registry map order.
    let mut surviving: BTreeMap<&'static str, Vec<&QuestTemplate>> = BTreeMap::new();
    for template in registry.all_templates() {
        if template.accepts_trigger(trigger_kind)
            && template.prerequisites_met(request.snapshot, request.context)
        {
            surviving
                .entry(template.theme.display_name())
                .or_default()
                .push(template);
        }
    }

    if surviving.is_empty() {
        debug!(character = %request.character, trigger = %trigger_kind, "no eligible template");
        return Err(EngineError::NoEligibleTemplate {
            trigger: trigger_kind,
        });
    }

    // Sort within each theme so registry iteration order cannot leak into
    // the draw
    for templates in surviving.values_mut() {
        templates.sort_by(|a, b| a.id.0.cmp(&b.id.0));
    }

    // Weighted theme pick over the surviving themes
    let themes: Vec<&Vec<&QuestTemplate>> = surviving.values().collect();
    let theme_weights: Vec<f32> = themes
        .iter()
        .map(|templates| scores.get(&templates[0].theme).copied().unwrap_or(0.0))
        .collect();
    let theme_templates = themes[weighted_pick(&theme_weights, rng)?];

    // Template pick within the theme, by declared weight
    let template_weights: Vec<f32> = theme_templates.iter().map(|t| t.weight).collect();
    let template = theme_templates[weighted_pick(&template_weights, rng)?];

    if active_templates.contains(&template.id) {
        debug!(character = %request.character, template = %template.id, "duplicate active quest");
        return Err(EngineError::DuplicateActiveQuest {
            template: template.id.clone(),
        });
    }

    let instance = instantiate(template, request.character, archetype, config);
    debug!(
        character = %request.character,
        template = %template.id,
        theme = %instance.theme,
        archetype = %archetype,
        "generated quest instance"
    );
    Ok(instance)
}

/// Draw an index from non-negative weights. An all-zero weight vector falls
/// back to a uniform draw; an empty one is a degenerate affinity set.
fn weighted_pick(weights: &[f32], rng: &mut StdRng) -> Result<usize, EngineError> {
    if weights.is_empty() {
        return Err(EngineError::AffinityComputation);
    }
    if weights.iter().sum::<f32>() > 0.0 {
        let dist = WeightedIndex::new(weights).map_err(|_| EngineError::AffinityComputation)?;
        Ok(dist.sample(rng))
    } else {
        Ok(rng.gen_range(0..weights.len()))
    }
}

/// Build a concrete instance from a template: resolve archetype text slots,
/// scale the reward, and assign fresh ids. Resolved text and rewards are
/// never re-adapted afterward, even if the archetype later changes.
fn instantiate(
    template: &QuestTemplate,
    character: CharacterId,
    archetype: CharacterArchetype,
    config: &EngineConfig,
) -> QuestInstance {
    let multiplier = config.reward_scaling.multiplier(archetype);

    QuestInstance {
        id: QuestInstanceId::new(),
        template: template.id.clone(),
        character,
        theme: template.theme,
        title: resolve_slots(&template.title, archetype),
        description: resolve_slots(&template.description, archetype),
        objectives: template
            .objectives
            .iter()
            .map(|o| Objective {
                id: ObjectiveId::new(),
                description: resolve_slots(&o.description, archetype),
                progress: 0,
                target: o.target,
                required: o.required,
            })
            .collect(),
        choices: template
            .choices
            .iter()
            .map(|c| QuestChoice {
                id: ChoiceId::new(),
                text: resolve_slots(&c.text, archetype),
                effects: c.effects.clone(),
                tags: c.tags.clone(),
                resolved: false,
            })
            .collect(),
        reward: Reward {
            experience: scale(template.reward.experience, multiplier),
            gold: scale(template.reward.gold, multiplier),
            items: template.reward.items.clone(),
        },
        state: QuestState::NotStarted,
    }
}

fn scale(value: u32, multiplier: f32) -> u32 {
    (value as f32 * multiplier).round() as u32
}

/// Archetype-specific wording for the `{epithet}` and `{approach}` slots.
fn voice(archetype: CharacterArchetype) -> (&'static str, &'static str) {
    match archetype {
        CharacterArchetype::Warrior => ("seasoned blade", "by force of arms"),
        CharacterArchetype::Scholar => ("keen-eyed scholar", "with patience and study"),
        CharacterArchetype::Mystic => ("quiet mystic", "guided by the unseen"),
        CharacterArchetype::ShadowWalker => ("walker of shadows", "unseen and unheard"),
        CharacterArchetype::Balanced => ("steady hand", "by whatever means serve"),
    }
}

fn resolve_slots(text: &str, archetype: CharacterArchetype) -> String {
    let (epithet, approach) = voice(archetype);
    text.replace("{epithet}", epithet)
        .replace("{approach}", approach)
}
