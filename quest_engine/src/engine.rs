//! Quest Engine facade - the surface external collaborators call.
//!
//! All narrative state is partitioned per character. The registry is shared
//! and read-only; each character's context and active instances live behind
//! their own mutex, so operations on one character serialize while distinct
//! characters proceed concurrently. Generation and scoring inside the locks
//! are pure, synchronous computations; all I/O (loading and saving contexts
//! and instances) happens at the boundary, driven by the caller through the
//! snapshot/restore hooks.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use game_model::{
    CharacterArchetype, CharacterId, CharacterService, NarrativeTheme, QuestTrigger, TriggerKind,
};

use crate::affinity;
use crate::archetype;
use crate::config::EngineConfig;
use crate::context::NarrativeContext;
use crate::dispatcher::TriggerDispatcher;
use crate::error::EngineError;
use crate::generator::{self, GenerationRequest};
use crate::quest::{ChoiceId, ChoiceResolution, ObjectiveId, QuestInstance, QuestInstanceId};
use crate::registry::TemplateRegistry;

/// Mutable per-character state: the narrative profile plus the table of
/// non-terminal quest instances.
#[derive(Debug)]
struct CharacterState {
    context: NarrativeContext,
    active: HashMap<QuestInstanceId, QuestInstance>,
}

impl CharacterState {
    fn new(character: CharacterId) -> Self {
        Self {
            context: NarrativeContext::new(character),
            active: HashMap::new(),
        }
    }

    fn active_templates(&self) -> HashSet<crate::registry::TemplateId> {
        self.active.values().map(|i| i.template.clone()).collect()
    }
}

/// The engine facade. Cheap to share behind an `Arc`.
pub struct QuestEngine {
    config: EngineConfig,
    registry: Arc<TemplateRegistry>,
    characters: Arc<dyn CharacterService>,
    states: Mutex<HashMap<CharacterId, Arc<Mutex<CharacterState>>>>,
    /// Instance id -> owning character, for instance-keyed operations.
    index: Mutex<HashMap<QuestInstanceId, CharacterId>>,
    /// Instances the persistence boundary reported active elsewhere.
    external_active: Mutex<HashSet<QuestInstanceId>>,
    dispatcher: Mutex<TriggerDispatcher>,
    rng: Mutex<StdRng>,
}

/// Mutex poisoning only happens if a panic escaped engine code; the state
/// itself is always left consistent, so recover the guard.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl QuestEngine {
    /// Create an engine with OS-seeded randomness.
    pub fn new(
        registry: TemplateRegistry,
        characters: Arc<dyn CharacterService>,
        config: EngineConfig,
    ) -> Self {
        Self::with_seed(registry, characters, config, rand::random())
    }

    /// Create an engine with a fixed seed, for reproducible generation.
    pub fn with_seed(
        registry: TemplateRegistry,
        characters: Arc<dyn CharacterService>,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
            characters,
            states: Mutex::new(HashMap::new()),
            index: Mutex::new(HashMap::new()),
            external_active: Mutex::new(HashSet::new()),
            dispatcher: Mutex::new(TriggerDispatcher::new()),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Feed an external trigger through the cooldown gate. Returns
    /// `Ok(None)` when the trigger is still cooling down (a no-op, not an
    /// error); otherwise forwards to generation.
    pub fn handle_trigger(
        &self,
        character: CharacterId,
        trigger: &QuestTrigger,
        now: u64,
    ) -> Result<Option<QuestInstance>, EngineError> {
        let accepted =
            lock(&self.dispatcher).try_accept(character, trigger.kind(), now, &self.config);
        if !accepted {
            return Ok(None);
        }
        self.generate(character, trigger).map(Some)
    }

    /// Generate a quest instance for a character and trigger. No state is
    /// written: the instance is registered only when the caller `start`s it.
    pub fn generate(
        &self,
        character: CharacterId,
        trigger: &QuestTrigger,
    ) -> Result<QuestInstance, EngineError> {
        let snapshot = self
            .characters
            .snapshot(character)
            .ok_or(EngineError::UnknownCharacter(character))?;

        let state = self.character_state(character);
        let state = lock(&state);
        let request = GenerationRequest {
            character,
            snapshot: &snapshot,
            context: &state.context,
            trigger,
        };
        let mut rng = lock(&self.rng);
        generator::generate(
            &self.registry,
            &self.config,
            &request,
            &state.active_templates(),
            &mut rng,
        )
    }

    /// Register a generated instance and move it to `Active`.
    ///
    /// Re-checks the one-active-instance-per-template invariant, honors the
    /// persistence boundary's already-active-elsewhere signal, and records
    /// the instance's theme in the character's recency window.
    pub fn start(&self, mut instance: QuestInstance) -> Result<QuestInstance, EngineError> {
        if lock(&self.external_active).contains(&instance.id) {
            return Err(EngineError::PersistenceConflict {
                instance: instance.id,
            });
        }

        let state = self.character_state(instance.character);
        let mut state = lock(&state);

        if state.active_templates().contains(&instance.template) {
            return Err(EngineError::DuplicateActiveQuest {
                template: instance.template.clone(),
            });
        }

        instance.start()?;
        state.context.record_generated_theme(instance.theme);
        state.active.insert(instance.id, instance.clone());
        lock(&self.index).insert(instance.id, instance.character);

        info!(character = %instance.character, instance = %instance.id, theme = %instance.theme, "quest started");
        Ok(instance)
    }

    /// Apply progress to an objective of an active instance. Returns the
    /// updated instance; if the update completed the quest, the instance is
    /// terminal, removed from the active table, and handed back for
    /// archival.
    pub fn report_objective_progress(
        &self,
        instance: QuestInstanceId,
        objective: ObjectiveId,
        delta: i64,
    ) -> Result<QuestInstance, EngineError> {
        self.with_instance(instance, |quest, _| {
            quest.report_objective_progress(objective, delta).map(|_| ())
        })
    }

    /// Resolve a choice on an active instance, applying its consequences to
    /// the character's narrative context atomically.
    pub fn resolve_choice(
        &self,
        instance: QuestInstanceId,
        choice: ChoiceId,
    ) -> Result<(QuestInstance, ChoiceResolution), EngineError> {
        let mut resolution = None;
        let quest = self.with_instance(instance, |quest, context| {
            resolution = Some(quest.resolve_choice(choice, context)?);
            Ok(())
        })?;
        // with_instance only returns Ok after the closure succeeded
        match resolution {
            Some(resolution) => Ok((quest, resolution)),
            None => Err(EngineError::UnknownInstance(instance)),
        }
    }

    /// Abandon an active instance; hands the terminal instance back.
    pub fn abandon(&self, instance: QuestInstanceId) -> Result<QuestInstance, EngineError> {
        self.with_instance(instance, |quest, _| quest.abandon())
    }

    /// Fail an active instance (trigger-driven); hands the terminal
    /// instance back.
    pub fn fail(&self, instance: QuestInstanceId) -> Result<QuestInstance, EngineError> {
        self.with_instance(instance, |quest, _| quest.fail())
    }

    /// The character's archetype, recomputed from the current snapshot.
    pub fn current_archetype(
        &self,
        character: CharacterId,
    ) -> Result<CharacterArchetype, EngineError> {
        let snapshot = self
            .characters
            .snapshot(character)
            .ok_or(EngineError::UnknownCharacter(character))?;
        Ok(archetype::detect(&snapshot, &self.config))
    }

    /// Current theme affinity scores for the character.
    pub fn theme_affinities(
        &self,
        character: CharacterId,
    ) -> Result<HashMap<NarrativeTheme, f32>, EngineError> {
        let archetype = self.current_archetype(character)?;
        let state = self.character_state(character);
        let state = lock(&state);
        Ok(affinity::score_themes(archetype, &state.context, &self.config))
    }

    /// Themes with at least one registered template.
    pub fn available_themes(&self) -> Vec<NarrativeTheme> {
        self.registry.themes_present()
    }

    /// All archetypes, for presentation layers.
    pub fn archetypes(&self) -> &'static [CharacterArchetype] {
        &CharacterArchetype::ALL
    }

    /// All trigger kinds, for presentation layers.
    pub fn trigger_kinds(&self) -> &'static [TriggerKind] {
        &TriggerKind::ALL
    }

    /// The shared template registry.
    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Record that the persistence boundary reported this instance active
    /// elsewhere; `start` will refuse it with `PersistenceConflict`.
    pub fn note_active_elsewhere(&self, instance: QuestInstanceId) {
        lock(&self.external_active).insert(instance);
    }

    /// Clone of the character's narrative context, for the caller to save.
    pub fn context_snapshot(&self, character: CharacterId) -> Option<NarrativeContext> {
        let states = lock(&self.states);
        states
            .get(&character)
            .map(|state| lock(state).context.clone())
    }

    /// Install a previously saved narrative context, replacing any state
    /// accumulated for that character this session.
    pub fn restore_context(&self, context: NarrativeContext) {
        let state = self.character_state(context.character);
        lock(&state).context = context;
    }

    /// Clones of the character's non-terminal instances, for the caller to
    /// save.
    pub fn active_instances(&self, character: CharacterId) -> Vec<QuestInstance> {
        let states = lock(&self.states);
        states
            .get(&character)
            .map(|state| lock(state).active.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Re-register a previously saved non-terminal instance. Terminal
    /// instances are archives and are rejected.
    pub fn restore_instance(&self, instance: QuestInstance) -> Result<(), EngineError> {
        if instance.state.is_terminal() {
            return Err(EngineError::InvalidTransition {
                state: instance.state,
                action: "restore",
            });
        }
        let state = self.character_state(instance.character);
        let mut state = lock(&state);
        if state.active_templates().contains(&instance.template) {
            return Err(EngineError::DuplicateActiveQuest {
                template: instance.template.clone(),
            });
        }
        lock(&self.index).insert(instance.id, instance.character);
        state.active.insert(instance.id, instance);
        Ok(())
    }

    /// Fetch or create the per-character state cell. The outer map lock is
    /// held only long enough to clone the `Arc`.
    fn character_state(&self, character: CharacterId) -> Arc<Mutex<CharacterState>> {
        let mut states = lock(&self.states);
        states
            .entry(character)
            .or_insert_with(|| Arc::new(Mutex::new(CharacterState::new(character))))
            .clone()
    }

    /// Run a mutation against a registered instance under its character's
    /// lock. If the instance ends up terminal it is removed from the active
    /// table; the (possibly terminal) instance is returned for archival.
    fn with_instance<F>(
        &self,
        instance: QuestInstanceId,
        mutate: F,
    ) -> Result<QuestInstance, EngineError>
    where
        F: FnOnce(&mut QuestInstance, &mut NarrativeContext) -> Result<(), EngineError>,
    {
        let character = lock(&self.index)
            .get(&instance)
            .copied()
            .ok_or(EngineError::UnknownInstance(instance))?;
        let state = self.character_state(character);
        let mut state = lock(&state);

        let mut quest = state
            .active
            .get(&instance)
            .cloned()
            .ok_or(EngineError::UnknownInstance(instance))?;
        // Mutate a copy so a failed operation writes nothing back
        mutate(&mut quest, &mut state.context)?;

        if quest.state.is_terminal() {
            state.active.remove(&instance);
            lock(&self.index).remove(&instance);
            info!(character = %character, instance = %instance, state = ?quest.state, "quest reached terminal state");
        } else {
            state.active.insert(instance, quest.clone());
        }
        Ok(quest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AlignmentAxis, ConsequenceEffect, ConsequenceTag};
    use crate::quest::QuestState;
    use crate::registry::{ChoiceTemplate, ObjectiveTemplate, QuestTemplate, TemplateId};
    use game_model::AttributeSnapshot;
    use rand::Rng;

    /// Fixed-snapshot character service for tests.
    struct FixedService {
        snapshots: HashMap<CharacterId, AttributeSnapshot>,
    }

    impl FixedService {
        fn single(snapshot: AttributeSnapshot) -> (Arc<Self>, CharacterId) {
            let character = CharacterId::new();
            let mut snapshots = HashMap::new();
            snapshots.insert(character, snapshot);
            (Arc::new(Self { snapshots }), character)
        }
    }

    impl CharacterService for FixedService {
        fn snapshot(&self, id: CharacterId) -> Option<AttributeSnapshot> {
            self.snapshots.get(&id).copied()
        }
    }

    fn warrior_snapshot() -> AttributeSnapshot {
        AttributeSnapshot::new(15.0, 5.0, 5.0, 5.0).with_level(10)
    }

    fn betrayal_registry() -> TemplateRegistry {
        TemplateRegistry::from_templates([QuestTemplate::new(
            "betrayal-test",
            NarrativeTheme::Betrayal,
            "The Hollow Oath",
            "An oath has gone hollow.",
        )
        .with_objective(ObjectiveTemplate::new("Confront the traitor", 1))
        .with_choice(
            ChoiceTemplate::new("Take the dark bargain")
                .with_effect(ConsequenceEffect::AlignmentShift {
                    axis: AlignmentAxis::GoodEvil,
                    delta: -0.2,
                })
                .with_tag(ConsequenceTag::new(NarrativeTheme::Betrayal, 0.7)),
        )])
    }

    fn engine_with(
        registry: TemplateRegistry,
        snapshot: AttributeSnapshot,
    ) -> (QuestEngine, CharacterId) {
        let (service, character) = FixedService::single(snapshot);
        let engine = QuestEngine::with_seed(registry, service, EngineConfig::default(), 42);
        (engine, character)
    }

    fn any_trigger() -> QuestTrigger {
        QuestTrigger::DialogueChoice {
            speaker: CharacterId::new(),
            topic: "old oaths".into(),
        }
    }

    #[test]
    fn test_trigger_cooldown_suppresses_second_generation() {
        let (engine, character) = engine_with(TemplateRegistry::builtin(), warrior_snapshot());
        let trigger = QuestTrigger::CombatVictory {
            defeated: vec![],
            notable: false,
        };

        let first = engine.handle_trigger(character, &trigger, 100).unwrap();
        assert!(first.is_some());

        // Within the cooldown window: no generation call, silent no-op
        let second = engine.handle_trigger(character, &trigger, 150).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_full_choice_consequence_flow() {
        let (engine, character) = engine_with(betrayal_registry(), warrior_snapshot());
        assert_eq!(
            engine.current_archetype(character).unwrap(),
            CharacterArchetype::Warrior
        );

        let instance = engine.generate(character, &any_trigger()).unwrap();
        assert_eq!(instance.theme, NarrativeTheme::Betrayal);

        let started = engine.start(instance).unwrap();
        assert_eq!(started.state, QuestState::Active);

        let choice = started.choices[0].id;
        let (updated, resolution) = engine.resolve_choice(started.id, choice).unwrap();
        assert_eq!(updated.state, QuestState::Active);
        assert_eq!(resolution.effects.len(), 1);

        let context = engine.context_snapshot(character).unwrap();
        assert!((context.alignment.good_evil - (-0.2)).abs() < 0.001);
        assert_eq!(context.history.len(), 1);
        assert_eq!(context.history[0].choice, choice);
        assert_eq!(context.history[0].theme, NarrativeTheme::Betrayal);
    }

    #[test]
    fn test_duplicate_active_template_rejected() {
        let (engine, character) = engine_with(betrayal_registry(), warrior_snapshot());

        let first = engine.generate(character, &any_trigger()).unwrap();
        engine.start(first).unwrap();

        // The only template is now active, so generation trips the guard
        let err = engine.generate(character, &any_trigger()).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateActiveQuest { .. }));
    }

    #[test]
    fn test_completion_frees_template_for_regeneration() {
        let (engine, character) = engine_with(betrayal_registry(), warrior_snapshot());

        let instance = engine.generate(character, &any_trigger()).unwrap();
        let started = engine.start(instance).unwrap();
        let objective = started.objectives[0].id;

        let done = engine
            .report_objective_progress(started.id, objective, 1)
            .unwrap();
        assert_eq!(done.state, QuestState::Completed);
        assert!(engine.active_instances(character).is_empty());

        // Terminal instance released the (character, template) slot
        assert!(engine.generate(character, &any_trigger()).is_ok());

        // And the archived instance is gone from the engine
        let err = engine
            .report_objective_progress(done.id, objective, 1)
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownInstance(_)));
    }

    #[test]
    fn test_persistence_conflict_refuses_double_start() {
        let (engine, character) = engine_with(betrayal_registry(), warrior_snapshot());

        let instance = engine.generate(character, &any_trigger()).unwrap();
        engine.note_active_elsewhere(instance.id);

        let err = engine.start(instance).unwrap_err();
        assert!(matches!(err, EngineError::PersistenceConflict { .. }));
    }

    #[test]
    fn test_unknown_character_rejected() {
        let (engine, _) = engine_with(TemplateRegistry::builtin(), warrior_snapshot());
        let stranger = CharacterId::new();

        assert!(matches!(
            engine.generate(stranger, &any_trigger()).unwrap_err(),
            EngineError::UnknownCharacter(_)
        ));
        assert!(matches!(
            engine.current_archetype(stranger).unwrap_err(),
            EngineError::UnknownCharacter(_)
        ));
    }

    #[test]
    fn test_theme_affinities_in_range() {
        let (engine, character) = engine_with(TemplateRegistry::builtin(), warrior_snapshot());

        let affinities = engine.theme_affinities(character).unwrap();
        assert_eq!(affinities.len(), NarrativeTheme::ALL.len());
        for score in affinities.values() {
            assert!((0.0..=1.0).contains(score));
        }
    }

    #[test]
    fn test_context_and_instance_restore() {
        let (engine, character) = engine_with(betrayal_registry(), warrior_snapshot());

        let instance = engine.generate(character, &any_trigger()).unwrap();
        let started = engine.start(instance).unwrap();
        let saved_context = engine.context_snapshot(character).unwrap();
        let saved_instances = engine.active_instances(character);
        assert_eq!(saved_instances.len(), 1);

        // Fresh engine, as after a restart
        let (service, _) = FixedService::single(warrior_snapshot());
        let restored = QuestEngine::with_seed(
            betrayal_registry(),
            service,
            EngineConfig::default(),
            42,
        );
        restored.restore_context(saved_context.clone());
        for instance in saved_instances {
            restored.restore_instance(instance).unwrap();
        }

        assert_eq!(restored.context_snapshot(character), Some(saved_context));
        let active = restored.active_instances(character);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, started.id);

        // Restored instance is operable
        let objective = active[0].objectives[0].id;
        let done = restored
            .report_objective_progress(active[0].id, objective, 1)
            .unwrap();
        assert_eq!(done.state, QuestState::Completed);
    }

    #[test]
    fn test_restore_terminal_instance_rejected() {
        let (engine, character) = engine_with(betrayal_registry(), warrior_snapshot());

        let instance = engine.generate(character, &any_trigger()).unwrap();
        let started = engine.start(instance).unwrap();
        let abandoned = engine.abandon(started.id).unwrap();
        assert_eq!(abandoned.state, QuestState::Abandoned);

        let err = engine.restore_instance(abandoned).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
    }

    #[test]
    fn test_failed_operation_writes_nothing() {
        let (engine, character) = engine_with(betrayal_registry(), warrior_snapshot());

        let instance = engine.generate(character, &any_trigger()).unwrap();
        let started = engine.start(instance).unwrap();
        let choice = started.choices[0].id;
        engine.resolve_choice(started.id, choice).unwrap();

        let before = engine.context_snapshot(character).unwrap();
        // Second resolution of the same choice must fail without touching
        // context or instance
        let err = engine.resolve_choice(started.id, choice).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransition { .. }));
        assert_eq!(engine.context_snapshot(character), Some(before));
        assert_eq!(engine.active_instances(character).len(), 1);
    }

    #[test]
    fn test_at_most_one_active_instance_per_template_under_random_ops() {
        let (engine, character) = engine_with(TemplateRegistry::builtin(), warrior_snapshot());
        let mut rng = rand::rngs::StdRng::seed_from_u64(1234);
        let triggers = [
            QuestTrigger::LocationEntered {
                location: game_model::LocationId::new(),
            },
            QuestTrigger::TimeElapsed { idle_ticks: 500 },
            QuestTrigger::DialogueChoice {
                speaker: CharacterId::new(),
                topic: "rumors".into(),
            },
        ];

        for step in 0..200 {
            match rng.gen_range(0..4) {
                0 => {
                    let trigger = &triggers[rng.gen_range(0..triggers.len())];
                    if let Ok(instance) = engine.generate(character, trigger) {
                        let _ = engine.start(instance);
                    }
                }
                1 => {
                    let active = engine.active_instances(character);
                    if let Some(instance) = active.get(rng.gen_range(0..active.len().max(1))) {
                        let objective = instance.objectives[0].id;
                        let _ = engine.report_objective_progress(instance.id, objective, 1);
                    }
                }
                2 => {
                    let active = engine.active_instances(character);
                    if let Some(instance) = active.first() {
                        let _ = engine.abandon(instance.id);
                    }
                }
                _ => {
                    let active = engine.active_instances(character);
                    if let Some(instance) = active.last() {
                        let _ = engine.fail(instance.id);
                    }
                }
            }

            // Invariant: at most one non-terminal instance per template
            let active = engine.active_instances(character);
            let mut templates: Vec<TemplateId> =
                active.iter().map(|i| i.template.clone()).collect();
            templates.sort_by(|a, b| a.0.cmp(&b.0));
            templates.dedup();
            assert_eq!(templates.len(), active.len(), "step {step}");
        }
    }
}
