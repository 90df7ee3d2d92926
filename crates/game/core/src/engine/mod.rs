//! Phase coordination and the simulation context.
//!
//! The [`Simulation`] owns everything a battle touches: the actor arena, the
//! registry and completion tracker, the battlefield, the RNG and the outward
//! event outbox. There is no global state; embedders construct as many
//! independent simulations as they like and drive each with
//! [`Simulation::tick`].
//!
//! All mutation happens on the caller's thread. An actor runs one step at a
//! time with mutable access to the battlefield; cross-actor effects it
//! requests through [`Commands`] are applied before the next actor runs.

mod charge;
mod coordinator;
mod errors;
mod phase;
mod snapshot;

pub use charge::ChargeController;
pub use errors::CycleError;
pub use phase::{Phase, SubPhase};
pub use snapshot::{ActionSnapshot, EnemySnapshot, SimSnapshot};

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;

use phase::Stage;

use crate::actions::{ActionTemplate, PlayerAction};
use crate::actor::{Actor, ActorArena, ActorContext, ActorId, ActorKind, ExecutionState};
use crate::config::{ConfigError, SimConfig};
use crate::enemy::{EnemyActor, EnemyTemplate};
use crate::registry::{CompletionTracker, Registry, RegistryError};
use crate::rng::{PcgRng, RngOracle, SeedContext};
use crate::world::{Battlefield, Commands, EnemyBody, SimEvent};

pub struct Simulation {
    config: SimConfig,
    rng: Box<dyn RngOracle>,
    arena: ActorArena,
    registry: Registry,
    tracker: CompletionTracker,
    battlefield: Battlefield,
    phase: Phase,
    stage: Stage,
    /// Seconds until the late enemy re-scan; `None` once it has run or when
    /// the enemy pass started empty.
    rescan: Option<f32>,
    cycle: u64,
    charge: ChargeController,
    enemy_templates: BTreeMap<String, EnemyTemplate>,
    /// Participants registered mid-pass that still need their first `execute`.
    pending: VecDeque<ActorId>,
    events: Vec<SimEvent>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, PcgRng)
    }

    pub fn with_rng(config: SimConfig, rng: impl RngOracle + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        let battlefield = Battlefield::new(config.base_hp);
        Ok(Self {
            config,
            rng: Box::new(rng),
            arena: ActorArena::new(),
            registry: Registry::new(),
            tracker: CompletionTracker::new(),
            battlefield,
            phase: Phase::Prepare,
            stage: Stage::Running,
            rescan: None,
            cycle: 0,
            charge: ChargeController::default(),
            enemy_templates: BTreeMap::new(),
            pending: VecDeque::new(),
            events: Vec::new(),
        })
    }

    // ===== accessors =====

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed cycles so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn actor(&self, id: ActorId) -> Option<&dyn Actor> {
        self.arena.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut (dyn Actor + 'static)> {
        self.arena.get_mut(id)
    }

    pub fn is_live(&self, id: ActorId) -> bool {
        self.arena.contains(id)
    }

    pub fn enemy_template(&self, name: &str) -> Option<&EnemyTemplate> {
        self.enemy_templates.get(name)
    }

    /// Takes every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== setup =====

    /// Makes `template` available to `Spawn` skills and [`Self::spawn_enemy`].
    /// Replaces any template with the same name.
    pub fn register_enemy_template(&mut self, template: EnemyTemplate) {
        self.enemy_templates.insert(template.name.clone(), template);
    }

    /// Creates and registers a player action. The first action added is
    /// selected for charging.
    pub fn add_action(&mut self, template: ActionTemplate) -> ActorId {
        let action = PlayerAction::new(template, &self.config);
        let id = self.insert_actor(Box::new(action));
        if self.charge.selected().is_none() {
            self.set_selected(Some(id));
        }
        id
    }

    /// Creates and registers an enemy at `position`.
    pub fn add_enemy(
        &mut self,
        template: EnemyTemplate,
        position: Vec2,
    ) -> Result<ActorId, RegistryError> {
        self.check_enemy_capacity()?;
        self.enemy_templates
            .entry(template.name.clone())
            .or_insert_with(|| template.clone());
        let name = template.name.clone();
        let id = self.insert_enemy(template, position);
        self.emit(SimEvent::EnemySpawned {
            id,
            parent: None,
            template: name,
        });
        Ok(id)
    }

    /// Spawns an enemy from a registered template.
    pub fn spawn_enemy(&mut self, name: &str, position: Vec2) -> Result<ActorId, RegistryError> {
        let template = self
            .enemy_templates
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownTemplate(name.to_owned()))?;
        self.add_enemy(template, position)
    }

    /// Unregisters and removes an actor. In-flight effects it launched are
    /// dropped with it.
    pub fn destroy(&mut self, id: ActorId) -> Result<(), RegistryError> {
        let actor = self
            .arena
            .despawn(id)
            .ok_or(RegistryError::UnknownActor(id))?;
        let kind = actor.kind();
        self.registry.unregister(id);
        self.pending.retain(|pending| *pending != id);

        if kind == ActorKind::Enemy {
            self.battlefield.remove_enemy(id);
            self.emit(SimEvent::EnemyDestroyed { id });
        }
        self.emit(SimEvent::ActorUnregistered { id, kind });
        tracing::debug!(target: "battle::registry", actor = %id, %kind, name = actor.name(), "actor destroyed");

        if self.charge.selected() == Some(id) {
            self.select_next_uncharged();
        }
        if let Phase::Battle(sub) = self.phase
            && sub.participants() == kind
        {
            self.tracker.evaluate(kind, &mut self.registry, &self.arena);
        }
        Ok(())
    }

    /// Excludes an actor from its sub-phase, or returns it. An inactive actor
    /// is skipped by the coordinator and does not hold up completion.
    ///
    /// Reactivating an idle actor while its own pass is running executes it
    /// on the next tick, like a late registration.
    pub fn set_active(&mut self, id: ActorId, active: bool) -> Result<(), RegistryError> {
        let actor = self
            .arena
            .get_mut(id)
            .ok_or(RegistryError::UnknownActor(id))?;
        if actor.is_active() == active {
            return Ok(());
        }
        actor.core_mut().set_active(active);
        let kind = actor.kind();
        let idle = actor.state() == ExecutionState::Idle;

        tracing::debug!(target: "battle::registry", actor = %id, %kind, active, "activation changed");
        self.emit(SimEvent::ActivationChanged { id, kind, active });

        if !active && self.charge.selected() == Some(id) {
            self.select_next_uncharged();
        }
        if let Phase::Battle(sub) = self.phase
            && sub.participants() == kind
        {
            if active && idle && self.stage == Stage::Running {
                self.pending.push_back(id);
            }
            self.tracker.evaluate(kind, &mut self.registry, &self.arena);
        }
        Ok(())
    }

    /// Removes up to `amount` skill charges from an enemy's running queue.
    pub fn drain_enemy_budget(&mut self, id: ActorId, amount: u32) -> Result<(), RegistryError> {
        let actor = self
            .arena
            .get_mut(id)
            .ok_or(RegistryError::UnknownActor(id))?;
        let enemy = actor.as_enemy_mut().ok_or(RegistryError::WrongKind {
            id,
            expected: ActorKind::Enemy,
        })?;
        enemy.drain_budget(amount);
        Ok(())
    }

    /// Clears one actor's per-cycle state. Only valid during Prepare.
    pub fn reset_actor(&mut self, id: ActorId) -> Result<(), CycleError> {
        if !self.phase.is_prepare() {
            return Err(CycleError::ResetDuringBattle {
                id,
                phase: self.phase,
            });
        }
        let actor = self
            .arena
            .get_mut(id)
            .ok_or(RegistryError::UnknownActor(id))?;
        actor.reset_for_new_cycle();
        Ok(())
    }

    // ===== internals shared by the coordinator =====

    fn emit(&mut self, event: SimEvent) {
        tracing::trace!(target: "battle::phase", event = event.label(), "emit");
        self.events.push(event);
    }

    fn check_enemy_capacity(&self) -> Result<(), RegistryError> {
        let max = self.config.max_enemies;
        if self.battlefield.enemy_count() >= max {
            return Err(RegistryError::EnemyCapacity { max });
        }
        Ok(())
    }

    fn insert_actor(&mut self, actor: Box<dyn Actor>) -> ActorId {
        let kind = actor.kind();
        let id = self.arena.spawn(actor);
        self.registry.register(id, kind);
        self.emit(SimEvent::ActorRegistered { id, kind });

        // Joining the pass that is currently running means executing now.
        if let Phase::Battle(sub) = self.phase
            && sub.participants() == kind
            && self.stage == Stage::Running
        {
            self.pending.push_back(id);
        }
        id
    }

    fn insert_enemy(&mut self, template: EnemyTemplate, position: Vec2) -> ActorId {
        let hp = template.hp;
        let id = self.insert_actor(Box::new(EnemyActor::new(template)));
        self.battlefield.insert_enemy(id, EnemyBody::new(position, hp));
        id
    }

    /// Runs one step of `id` with mutable world access, then applies the
    /// commands it produced. Returns `false` if the actor is gone.
    fn run_actor<F>(&mut self, id: ActorId, step: F) -> bool
    where
        F: FnOnce(&mut (dyn Actor + 'static), &mut ActorContext<'_>),
    {
        let Some(mut actor) = self.arena.take(id) else {
            return false;
        };
        let before = actor.state();
        let mut commands = Commands::new();
        {
            let mut ctx = ActorContext {
                id,
                config: &self.config,
                battlefield: &mut self.battlefield,
                commands: &mut commands,
                rng: self.rng.as_ref(),
                seeds: SeedContext::new(self.config.seed, self.cycle, id.index),
            };
            step(actor.as_mut(), &mut ctx);
        }
        let after = actor.state();
        let kind = actor.kind();
        self.arena.restore(id, actor);

        if !commands.is_empty() {
            tracing::trace!(target: "battle::phase", actor = %id, commands = commands.len(), "applying commands");
        }
        if before == ExecutionState::Idle && after != ExecutionState::Idle {
            self.emit(SimEvent::ActorExecuted { id, kind });
        }
        self.apply_commands(id, commands.take());

        if before != ExecutionState::Completed && after == ExecutionState::Completed {
            tracing::debug!(target: "battle::phase", actor = %id, %kind, "actor completed");
            self.emit(SimEvent::ActorCompleted { id, kind });
            self.tracker.evaluate(kind, &mut self.registry, &self.arena);
        }
        true
    }
}
