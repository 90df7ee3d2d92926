//! Shared battlefield state, actor command buffer and outward events.
//!
//! The [`Battlefield`] holds the physical side of the simulation: the
//! player's base, one [`EnemyBody`] per registered enemy, and the score.
//! Actor bookkeeping (execution state, queues) stays in the actors.

mod commands;
mod events;

pub use commands::{Command, Commands};
pub use events::{EffectKind, SimEvent};

use std::collections::BTreeMap;

use glam::Vec2;

use crate::actor::ActorId;
use crate::combat::{HitOutcome, apply_hit};

/// The player's base: target of enemy strikes, origin of player throws.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Base {
    pub position: Vec2,
    pub hp: i32,
    pub max_hp: i32,
}

/// Physical state of one enemy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyBody {
    pub position: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    /// Absorbs the next hit, then drops.
    pub shielded: bool,
    /// Hidden enemies cannot be hit by area damage.
    pub hidden: bool,
}

impl EnemyBody {
    pub fn new(position: Vec2, hp: i32) -> Self {
        Self {
            position,
            hp,
            max_hp: hp,
            shielded: false,
            hidden: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Battlefield {
    pub base: Base,
    enemies: BTreeMap<ActorId, EnemyBody>,
    pub score: u64,
}

impl Battlefield {
    pub fn new(base_hp: i32) -> Self {
        Self {
            base: Base {
                position: Vec2::ZERO,
                hp: base_hp,
                max_hp: base_hp,
            },
            enemies: BTreeMap::new(),
            score: 0,
        }
    }

    pub fn insert_enemy(&mut self, id: ActorId, body: EnemyBody) {
        self.enemies.insert(id, body);
    }

    pub fn remove_enemy(&mut self, id: ActorId) -> Option<EnemyBody> {
        self.enemies.remove(&id)
    }

    pub fn enemy(&self, id: ActorId) -> Option<&EnemyBody> {
        self.enemies.get(&id)
    }

    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut EnemyBody> {
        self.enemies.get_mut(&id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = (ActorId, &EnemyBody)> {
        self.enemies.iter().map(|(id, body)| (*id, body))
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// Enemies that area damage centred on `center` would hit.
    pub fn enemies_within(&self, center: Vec2, radius: f32) -> Vec<ActorId> {
        self.enemies
            .iter()
            .filter(|(_, body)| {
                body.is_alive() && !body.hidden && body.position.distance(center) <= radius
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Applies `damage` to one enemy. See [`apply_hit`].
    pub fn hit_enemy(&mut self, id: ActorId, damage: i32) -> Option<HitOutcome> {
        apply_hit(self.enemies.get_mut(&id)?, damage)
    }

    /// Applies `damage` to the base; hit points never go below zero.
    pub fn hit_base(&mut self, damage: i32) -> i32 {
        self.base.hp = (self.base.hp - damage.max(0)).max(0);
        self.base.hp
    }
}

impl Default for Battlefield {
    fn default() -> Self {
        Self::new(crate::config::SimConfig::DEFAULT_BASE_HP)
    }
}
