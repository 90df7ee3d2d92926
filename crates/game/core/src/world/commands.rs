//! Deferred cross-actor effects.

use glam::Vec2;

use super::SimEvent;
use crate::actor::ActorId;

/// Effect an actor requests on something it does not own.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Create and register a new enemy from a named template.
    SpawnEnemy { template: String, position: Vec2 },
    /// Damage every visible enemy within `radius` of `center`.
    DamageArea {
        center: Vec2,
        radius: f32,
        damage: i32,
    },
    /// Damage the player's base.
    DamageBase { amount: i32 },
    /// Unregister and remove an actor.
    Destroy(ActorId),
    /// Fire-and-forget notification for presentation layers.
    Emit(SimEvent),
}

/// Buffer of [`Command`]s written by one actor step.
///
/// The simulation applies the buffer synchronously right after the step, so
/// an enemy spawned by a skill is registered before control returns to the
/// phase coordinator.
#[derive(Clone, Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push(command);
    }

    pub fn spawn_enemy(&mut self, template: impl Into<String>, position: Vec2) {
        self.push(Command::SpawnEnemy {
            template: template.into(),
            position,
        });
    }

    pub fn damage_area(&mut self, center: Vec2, radius: f32, damage: i32) {
        self.push(Command::DamageArea {
            center,
            radius,
            damage,
        });
    }

    pub fn damage_base(&mut self, amount: i32) {
        self.push(Command::DamageBase { amount });
    }

    pub fn destroy(&mut self, id: ActorId) {
        self.push(Command::Destroy(id));
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.push(Command::Emit(event));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Command> {
        self.queue.iter()
    }

    /// Takes every queued command in submission order.
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}
