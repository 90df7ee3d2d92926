//! Battle flow: `Prepare → Battle(Actions) → Battle(Enemies) → Prepare`.
//!
//! Each sub-phase executes every live participant once, resumes executing
//! participants every tick in registry order, and waits for the completion
//! tracker before a settle delay and the next stage. The enemy pass also
//! executes enemies registered mid-pass, immediately when they come from a
//! running actor and again in a late re-scan.

use glam::Vec2;

use super::phase::Stage;
use super::{CycleError, Phase, Simulation, SubPhase};
use crate::actor::{ActorId, ActorKind, ExecutionState};
use crate::combat::{HitOutcome, resolve_area_damage};
use crate::world::{Command, EffectKind, SimEvent};

impl Simulation {
    /// Leaves Prepare and starts the action pass.
    pub fn trigger_battle(&mut self) -> Result<(), CycleError> {
        if !self.phase.is_prepare() {
            return Err(CycleError::BattleInProgress { phase: self.phase });
        }
        self.charge.release();
        tracing::info!(target: "battle::phase", cycle = self.cycle, "battle triggered");
        self.start_sub_phase(SubPhase::Actions);
        Ok(())
    }

    /// Advances the simulation by `dt` seconds. Never fails: stale actors and
    /// early removals are handled in place.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.phase {
            Phase::Prepare => self.tick_charging(dt),
            Phase::Battle(sub) => self.tick_battle(sub, dt),
        }
    }

    fn tick_battle(&mut self, sub: SubPhase, dt: f32) {
        if let Stage::Settling { remaining } = &mut self.stage {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.advance_from(sub);
            }
            return;
        }

        for id in self.registry.live(sub.participants(), &self.arena) {
            let executing = self
                .arena
                .get(id)
                .is_some_and(|actor| actor.state() == ExecutionState::Executing);
            if executing {
                self.run_actor(id, |actor, ctx| actor.resume(dt, ctx));
            }
        }
        self.run_pending();

        if let Some(remaining) = self.rescan.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.rescan_enemies();
            }
        }

        self.check_sub_phase(sub);
    }

    fn start_sub_phase(&mut self, sub: SubPhase) {
        self.set_phase(Phase::Battle(sub));
        self.stage = Stage::Running;

        let kind = sub.participants();
        self.registry.prune(&self.arena);
        let participants = self.registry.live(kind, &self.arena);
        tracing::debug!(
            target: "battle::phase",
            sub_phase = %sub,
            participants = participants.len(),
            "sub-phase started"
        );
        self.emit(SimEvent::SubPhaseStarted {
            sub_phase: sub,
            participants: participants.len(),
        });

        self.rescan = match sub {
            SubPhase::Enemies if !participants.is_empty() => Some(self.config.rescan_delay),
            _ => None,
        };

        for id in participants {
            self.execute_actor(id);
        }
        self.run_pending();

        if self.rescan.is_some_and(|remaining| remaining <= 0.0) {
            self.rescan_enemies();
        }
        self.check_sub_phase(sub);
    }

    /// Runs `execute` on `id` if it has not started this cycle.
    fn execute_actor(&mut self, id: ActorId) {
        let idle = self
            .arena
            .get(id)
            .is_some_and(|actor| actor.is_active() && actor.state() == ExecutionState::Idle);
        if idle {
            self.run_actor(id, |actor, ctx| actor.execute(ctx));
        }
    }

    /// Executes participants registered while their pass runs, including
    /// the ones they spawn in turn.
    fn run_pending(&mut self) {
        while let Some(id) = self.pending.pop_front() {
            tracing::debug!(target: "battle::phase", actor = %id, "executing late participant");
            self.execute_actor(id);
        }
    }

    fn rescan_enemies(&mut self) {
        self.rescan = None;
        let idle: Vec<ActorId> = self
            .registry
            .live(ActorKind::Enemy, &self.arena)
            .into_iter()
            .filter(|id| {
                self.arena
                    .get(*id)
                    .is_some_and(|actor| actor.state() == ExecutionState::Idle)
            })
            .collect();
        if !idle.is_empty() {
            tracing::debug!(target: "battle::phase", found = idle.len(), "re-scan found idle enemies");
        }
        for id in idle {
            self.execute_actor(id);
        }
        self.run_pending();
    }

    /// Moves to Settling once every participant is done. The enemy pass also
    /// waits for its re-scan.
    fn check_sub_phase(&mut self, sub: SubPhase) {
        if self.stage != Stage::Running || self.phase != Phase::Battle(sub) || self.rescan.is_some()
        {
            return;
        }
        let kind = sub.participants();
        if !self.tracker.evaluate(kind, &mut self.registry, &self.arena) {
            return;
        }

        tracing::debug!(target: "battle::phase", sub_phase = %sub, "sub-phase completed");
        self.emit(SimEvent::SubPhaseCompleted { sub_phase: sub });

        let settle = self.config.settle_delay;
        if settle > 0.0 {
            self.stage = Stage::Settling { remaining: settle };
        } else {
            self.advance_from(sub);
        }
    }

    fn advance_from(&mut self, sub: SubPhase) {
        match sub.next() {
            Some(next) => self.start_sub_phase(next),
            None => self.finish_cycle(),
        }
    }

    fn finish_cycle(&mut self) {
        self.registry.prune(&self.arena);
        for kind in [ActorKind::Action, ActorKind::Enemy] {
            for id in self.registry.entries(kind).to_vec() {
                if let Some(actor) = self.arena.get_mut(id) {
                    actor.reset_for_new_cycle();
                }
            }
        }
        self.tracker.reset();
        self.pending.clear();
        self.rescan = None;
        self.stage = Stage::Running;
        self.cycle += 1;

        self.set_phase(Phase::Prepare);
        tracing::info!(
            target: "battle::phase",
            cycle = self.cycle,
            score = self.battlefield.score,
            base_hp = self.battlefield.base.hp,
            "cycle finished"
        );
        self.select_next_uncharged();
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        tracing::info!(target: "battle::phase", %from, %to, "phase changed");
        self.emit(SimEvent::PhaseChanged {
            from,
            to,
            cycle: self.cycle,
        });
    }

    /// Applies the cross-actor effects requested by `source` during its step.
    pub(super) fn apply_commands(&mut self, source: ActorId, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::SpawnEnemy { template, position } => {
                    self.spawn_child(source, &template, position);
                }
                Command::DamageArea {
                    center,
                    radius,
                    damage,
                } => self.damage_area(center, radius, damage),
                Command::DamageBase { amount } => {
                    let remaining = self.battlefield.hit_base(amount);
                    self.emit(SimEvent::BaseDamaged { amount, remaining });
                }
                Command::Destroy(id) => {
                    if let Err(err) = self.destroy(id) {
                        tracing::debug!(target: "battle::phase", %source, %err, "destroy ignored");
                    }
                }
                Command::Emit(event) => self.emit(event),
            }
        }
    }

    fn spawn_child(&mut self, parent: ActorId, name: &str, position: Vec2) {
        let Some(template) = self.enemy_templates.get(name).cloned() else {
            tracing::warn!(target: "battle::phase", %parent, template = name, "unknown spawn template");
            return;
        };
        if let Err(err) = self.check_enemy_capacity() {
            tracing::warn!(target: "battle::phase", %parent, template = name, %err, "spawn dropped");
            return;
        }
        let id = self.insert_enemy(template, position);
        tracing::debug!(target: "battle::phase", %parent, child = %id, template = name, "enemy spawned");
        self.emit(SimEvent::EnemySpawned {
            id,
            parent: Some(parent),
            template: name.to_owned(),
        });
    }

    fn damage_area(&mut self, center: Vec2, radius: f32, damage: i32) {
        for hit in resolve_area_damage(&mut self.battlefield, center, radius, damage) {
            let kind = match hit.outcome {
                HitOutcome::Absorbed => EffectKind::ShieldBroken,
                HitOutcome::Damaged { .. } | HitOutcome::Killed => EffectKind::Hit,
            };
            self.emit(SimEvent::Effect {
                kind,
                position: hit.position,
            });
            if hit.outcome.is_kill() {
                self.kill_enemy(hit.target);
            }
        }
    }

    fn kill_enemy(&mut self, id: ActorId) {
        let amount = self
            .arena
            .get(id)
            .and_then(|actor| actor.as_enemy())
            .map_or(0, |enemy| enemy.template().score);
        if self.destroy(id).is_err() {
            return;
        }
        self.battlefield.score += amount;
        self.emit(SimEvent::ScoreAwarded {
            amount,
            total: self.battlefield.score,
        });
    }
}
