//! Effects of individual skills.
//!
//! A [`SkillTask`] is started once per queue entry. Synchronous skills mutate
//! the world in [`SkillTask::start`] and are done immediately; asynchronous
//! skills stay [`SkillProgress::Pending`] until their effect resolves, and the
//! executor does not advance past them until then.

use glam::Vec2;

use super::SkillKind;
use crate::actor::ActorContext;
use crate::combat::Projectile;
use crate::world::{EffectKind, SimEvent};

/// Closest an enemy may approach the base.
const MIN_BASE_DISTANCE: f32 = 0.5;

/// Per-enemy parameters for each skill's effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyProfile {
    /// Distance covered by one `Move`.
    pub move_step: f32,
    /// Seconds one `Move` takes.
    pub move_duration: f32,
    /// Damage dealt to the base by a landed `Strike`.
    pub strike_damage: i32,
    /// Strike projectile speed in units per second.
    pub strike_speed: f32,
    /// Template spawned by `Spawn`. Without one, `Spawn` does nothing.
    pub spawn_template: Option<String>,
    /// Lateral offset of spawned children from the caster.
    pub spawn_offset: f32,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            move_step: 1.0,
            move_duration: 0.5,
            strike_damage: 5,
            strike_speed: 8.0,
            spawn_template: None,
            spawn_offset: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillProgress {
    Pending,
    Done,
}

/// A running skill effect.
#[derive(Clone, Debug, PartialEq)]
pub enum SkillTask {
    /// Tween from `from` to `to` over `duration`.
    Move {
        from: Vec2,
        to: Vec2,
        elapsed: f32,
        duration: f32,
    },
    /// Waiting for a projectile to land on the base.
    Strike { projectile: Projectile, damage: i32 },
    /// Effect already applied.
    Instant,
}

impl SkillTask {
    /// Starts `kind` for the enemy running in `ctx`.
    pub fn start(kind: SkillKind, profile: &EnemyProfile, ctx: &mut ActorContext<'_>) -> Self {
        let base = ctx.battlefield.base.position;
        let Some(body) = ctx.battlefield.enemy_mut(ctx.id) else {
            return SkillTask::Instant;
        };
        let position = body.position;

        match kind {
            SkillKind::Move => {
                let to = step_toward(position, base, profile.move_step);
                if profile.move_duration <= 0.0 {
                    body.position = to;
                    return SkillTask::Instant;
                }
                SkillTask::Move {
                    from: position,
                    to,
                    elapsed: 0.0,
                    duration: profile.move_duration,
                }
            }
            SkillKind::Spawn => {
                if let Some(template) = &profile.spawn_template {
                    let offset = Vec2::new(0.0, profile.spawn_offset);
                    ctx.commands.spawn_enemy(template.clone(), position + offset);
                }
                SkillTask::Instant
            }
            SkillKind::Strike => {
                ctx.commands.emit(SimEvent::Effect {
                    kind: EffectKind::ProjectileLaunched,
                    position,
                });
                SkillTask::Strike {
                    projectile: Projectile::launch(position, base, profile.strike_speed),
                    damage: profile.strike_damage,
                }
            }
            SkillKind::Shield => {
                body.shielded = true;
                ctx.commands.emit(SimEvent::Effect {
                    kind: EffectKind::ShieldRaised,
                    position,
                });
                SkillTask::Instant
            }
            SkillKind::Hide => {
                body.hidden = true;
                ctx.commands.emit(SimEvent::Effect {
                    kind: EffectKind::Hidden,
                    position,
                });
                SkillTask::Instant
            }
        }
    }

    /// Advances the effect by `dt`.
    pub fn resume(&mut self, dt: f32, ctx: &mut ActorContext<'_>) -> SkillProgress {
        match self {
            SkillTask::Instant => SkillProgress::Done,
            SkillTask::Move {
                from,
                to,
                elapsed,
                duration,
            } => {
                *elapsed = (*elapsed + dt).min(*duration);
                let t = *elapsed / *duration;
                // A destroyed body simply ends the tween.
                let Some(body) = ctx.battlefield.enemy_mut(ctx.id) else {
                    return SkillProgress::Done;
                };
                body.position = from.lerp(*to, t);
                if *elapsed >= *duration {
                    SkillProgress::Done
                } else {
                    SkillProgress::Pending
                }
            }
            SkillTask::Strike { projectile, damage } => {
                if !projectile.advance(dt) {
                    return SkillProgress::Pending;
                }
                ctx.commands.damage_base(*damage);
                ctx.commands.emit(SimEvent::Effect {
                    kind: EffectKind::Strike,
                    position: projectile.target,
                });
                SkillProgress::Done
            }
        }
    }
}

fn step_toward(from: Vec2, base: Vec2, step: f32) -> Vec2 {
    let offset = from - base;
    let distance = offset.length();
    if distance <= MIN_BASE_DISTANCE {
        return from;
    }
    let travel = step.max(0.0).min(distance - MIN_BASE_DISTANCE);
    from - offset / distance * travel
}
