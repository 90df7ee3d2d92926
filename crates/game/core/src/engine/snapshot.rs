//! Read-only views of a running simulation.

use super::{Phase, Simulation};
use crate::actor::{ActorId, ActorKind, ExecutionState};
use crate::skills::SkillKind;
use crate::world::{Base, EnemyBody};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSnapshot {
    pub id: ActorId,
    pub name: String,
    pub state: ExecutionState,
    pub slots: Vec<f32>,
    pub completed_slots: usize,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySnapshot {
    pub id: ActorId,
    pub name: String,
    pub state: ExecutionState,
    pub body: Option<EnemyBody>,
    /// Skill charges left this cycle.
    pub budget: u32,
    /// This cycle's queue in execution order.
    pub queue: Vec<SkillKind>,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimSnapshot {
    pub cycle: u64,
    pub phase: Phase,
    pub base: Base,
    pub score: u64,
    pub selected_action: Option<ActorId>,
    pub actions: Vec<ActionSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
}

impl SimSnapshot {
    pub fn enemy(&self, id: ActorId) -> Option<&EnemySnapshot> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn action(&self, id: ActorId) -> Option<&ActionSnapshot> {
        self.actions.iter().find(|action| action.id == id)
    }
}

impl Simulation {
    pub fn snapshot(&self) -> SimSnapshot {
        let actions = self
            .registry
            .entries(ActorKind::Action)
            .iter()
            .filter_map(|id| {
                let actor = self.arena.get(*id)?;
                let energy = actor.energy();
                Some(ActionSnapshot {
                    id: *id,
                    name: actor.name().to_owned(),
                    state: actor.state(),
                    slots: energy.map(|e| e.slot_values().to_vec()).unwrap_or_default(),
                    completed_slots: energy.map_or(0, |e| e.completed_slots()),
                })
            })
            .collect();

        let enemies = self
            .registry
            .entries(ActorKind::Enemy)
            .iter()
            .filter_map(|id| {
                let actor = self.arena.get(*id)?;
                let enemy = actor.as_enemy()?;
                Some(EnemySnapshot {
                    id: *id,
                    name: actor.name().to_owned(),
                    state: actor.state(),
                    body: self.battlefield.enemy(*id).cloned(),
                    budget: enemy.executor().budget(),
                    queue: enemy.executor().queue().skills().to_vec(),
                })
            })
            .collect();

        SimSnapshot {
            cycle: self.cycle,
            phase: self.phase,
            base: self.battlefield.base.clone(),
            score: self.battlefield.score,
            selected_action: self.charge.selected(),
            actions,
            enemies,
        }
    }
}
