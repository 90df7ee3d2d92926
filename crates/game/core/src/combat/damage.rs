//! Damage application against enemy bodies.

use glam::Vec2;

use crate::actor::ActorId;
use crate::world::{Battlefield, EnemyBody};

/// Outcome of one hit landing on an enemy body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOutcome {
    /// A shield took the hit and dropped.
    Absorbed,
    Damaged { remaining: i32 },
    Killed,
}

impl HitOutcome {
    pub fn is_kill(self) -> bool {
        matches!(self, HitOutcome::Killed)
    }
}

/// Applies `damage` to a body. A raised shield absorbs the whole hit.
///
/// Returns `None` if the body was already dead.
pub fn apply_hit(body: &mut EnemyBody, damage: i32) -> Option<HitOutcome> {
    if !body.is_alive() {
        return None;
    }
    if body.shielded {
        body.shielded = false;
        return Some(HitOutcome::Absorbed);
    }
    body.hp = (body.hp - damage.max(0)).max(0);
    if body.is_alive() {
        Some(HitOutcome::Damaged { remaining: body.hp })
    } else {
        Some(HitOutcome::Killed)
    }
}

/// One enemy affected by area damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaHit {
    pub target: ActorId,
    pub position: Vec2,
    pub outcome: HitOutcome,
}

/// Damages every visible, living enemy within `radius` of `center`.
///
/// Targets are resolved in handle order so the result is deterministic.
pub fn resolve_area_damage(
    battlefield: &mut Battlefield,
    center: Vec2,
    radius: f32,
    damage: i32,
) -> Vec<AreaHit> {
    battlefield
        .enemies_within(center, radius)
        .into_iter()
        .filter_map(|target| {
            let body = battlefield.enemy_mut(target)?;
            let position = body.position;
            let outcome = apply_hit(body, damage)?;
            Some(AreaHit {
                target,
                position,
                outcome,
            })
        })
        .collect()
}
