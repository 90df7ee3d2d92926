//! Combat resolution: projectiles in flight and damage application.
//!
//! Pure helpers used by player actions and enemy skills. Nothing in here
//! touches the registry or the coordinator.

pub mod damage;
pub mod projectile;

pub use damage::{AreaHit, HitOutcome, apply_hit, resolve_area_damage};
pub use projectile::Projectile;
