//! Outward notifications emitted by the simulation.
//!
//! Events are one-way: the core pushes them into an outbox and never waits on
//! whoever consumes them (UI, camera, audio, logs).

use glam::Vec2;

use crate::actor::{ActorId, ActorKind};
use crate::engine::{Phase, SubPhase};
use crate::skills::SkillKind;

/// Presentation-only effect categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    ProjectileLaunched,
    ProjectileLanded,
    Explosion,
    Hit,
    ShieldRaised,
    ShieldBroken,
    Hidden,
    Strike,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
        cycle: u64,
    },
    SubPhaseStarted {
        sub_phase: SubPhase,
        participants: usize,
    },
    SubPhaseCompleted {
        sub_phase: SubPhase,
    },
    ActorRegistered {
        id: ActorId,
        kind: ActorKind,
    },
    ActorUnregistered {
        id: ActorId,
        kind: ActorKind,
    },
    ActorExecuted {
        id: ActorId,
        kind: ActorKind,
    },
    /// An actor was excluded from (or returned to) its sub-phase.
    ActivationChanged {
        id: ActorId,
        kind: ActorKind,
        active: bool,
    },
    ActorCompleted {
        id: ActorId,
        kind: ActorKind,
    },
    ActionSelected {
        id: ActorId,
    },
    SlotFinalized {
        id: ActorId,
        slot: usize,
        value: f32,
    },
    SkillStarted {
        id: ActorId,
        skill: SkillKind,
        index: usize,
    },
    EnemySpawned {
        id: ActorId,
        parent: Option<ActorId>,
        template: String,
    },
    EnemyDestroyed {
        id: ActorId,
    },
    Effect {
        kind: EffectKind,
        position: Vec2,
    },
    ScoreAwarded {
        amount: u64,
        total: u64,
    },
    BaseDamaged {
        amount: i32,
        remaining: i32,
    },
}

impl SimEvent {
    /// Stable label used as a log field.
    pub fn label(&self) -> &'static str {
        match self {
            SimEvent::PhaseChanged { .. } => "phase_changed",
            SimEvent::SubPhaseStarted { .. } => "sub_phase_started",
            SimEvent::SubPhaseCompleted { .. } => "sub_phase_completed",
            SimEvent::ActorRegistered { .. } => "actor_registered",
            SimEvent::ActorUnregistered { .. } => "actor_unregistered",
            SimEvent::ActorExecuted { .. } => "actor_executed",
            SimEvent::ActivationChanged { .. } => "activation_changed",
            SimEvent::ActorCompleted { .. } => "actor_completed",
            SimEvent::ActionSelected { .. } => "action_selected",
            SimEvent::SlotFinalized { .. } => "slot_finalized",
            SimEvent::SkillStarted { .. } => "skill_started",
            SimEvent::EnemySpawned { .. } => "enemy_spawned",
            SimEvent::EnemyDestroyed { .. } => "enemy_destroyed",
            SimEvent::Effect { .. } => "effect",
            SimEvent::ScoreAwarded { .. } => "score_awarded",
            SimEvent::BaseDamaged { .. } => "base_damaged",
        }
    }
}
