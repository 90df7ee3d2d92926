//! Actor execution contract shared by player actions and enemies.
//!
//! Every participant of a Battle sub-phase implements [`Actor`]. Per cycle an
//! actor walks `Idle → Executing → Completed`; the coordinator starts it with
//! [`Actor::execute`], drives it with [`Actor::resume`] once per tick, and
//! clears it with [`Actor::reset_for_new_cycle`] when Prepare begins.
//!
//! Actors never touch other actors directly. They read and mutate their own
//! body on the [`Battlefield`] and write cross-actor effects (spawns, damage,
//! destruction) into [`Commands`], which the simulation applies as soon as
//! the actor's step returns.

mod arena;
mod capabilities;
mod id;

pub use arena::ActorArena;
pub use capabilities::Capabilities;
pub use id::ActorId;

use crate::config::SimConfig;
use crate::energy::EnergyStore;
use crate::enemy::EnemyActor;
use crate::rng::{RngOracle, SeedContext};
use crate::world::{Battlefield, Commands};

/// Per-cycle execution state of an actor.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ExecutionState {
    #[default]
    Idle,
    Executing,
    Completed,
}

/// Which registry list an actor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActorKind {
    Action,
    Enemy,
}

/// State shared by every actor implementation.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorCore {
    state: ExecutionState,
    active: bool,
    energy: Option<EnergyStore>,
}

impl ActorCore {
    pub fn new(energy: Option<EnergyStore>) -> Self {
        Self {
            state: ExecutionState::Idle,
            active: true,
            energy,
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// `Idle → Executing`. Returns `false` (and changes nothing) when the
    /// actor is already executing or has completed this cycle.
    pub fn begin(&mut self) -> bool {
        if self.state != ExecutionState::Idle {
            return false;
        }
        self.state = ExecutionState::Executing;
        true
    }

    /// `Executing → Completed`. Returns `true` only on the transition itself,
    /// so completion is reported once per cycle.
    pub fn complete(&mut self) -> bool {
        if self.state != ExecutionState::Executing {
            return false;
        }
        self.state = ExecutionState::Completed;
        true
    }

    /// Back to `Idle` with an empty energy store.
    pub fn reset(&mut self) {
        self.state = ExecutionState::Idle;
        if let Some(energy) = self.energy.as_mut() {
            energy.reset();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn energy(&self) -> Option<&EnergyStore> {
        self.energy.as_ref()
    }

    pub fn energy_mut(&mut self) -> Option<&mut EnergyStore> {
        self.energy.as_mut()
    }
}

impl Default for ActorCore {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Everything an actor may touch while it runs one step.
pub struct ActorContext<'a> {
    /// The running actor's own handle.
    pub id: ActorId,
    pub config: &'a SimConfig,
    pub battlefield: &'a mut Battlefield,
    pub commands: &'a mut Commands,
    pub rng: &'a dyn RngOracle,
    /// Seed inputs for this actor in the current cycle.
    pub seeds: SeedContext,
}

/// Capability implemented by every Battle participant.
///
/// # Contract
///
/// - `execute` is idempotent: calling it while executing or after completion
///   does nothing.
/// - An actor reports completion exactly once per cycle, and only after every
///   asynchronous effect it launched has resolved.
/// - `reset_for_new_cycle` is only called while the simulation is in Prepare.
pub trait Actor: Send {
    fn kind(&self) -> ActorKind;

    /// Human-readable label for logs and snapshots.
    fn name(&self) -> &str;

    fn core(&self) -> &ActorCore;

    fn core_mut(&mut self) -> &mut ActorCore;

    /// Starts this cycle's work.
    fn execute(&mut self, ctx: &mut ActorContext<'_>);

    /// Advances pending work by `dt` seconds. Called once per tick while the
    /// actor is executing.
    fn resume(&mut self, dt: f32, ctx: &mut ActorContext<'_>);

    /// Clears per-cycle state. Implementations that keep extra per-cycle data
    /// must clear it and call `core_mut().reset()`.
    fn reset_for_new_cycle(&mut self) {
        self.core_mut().reset();
    }

    fn state(&self) -> ExecutionState {
        self.core().state()
    }

    fn is_completed(&self) -> bool {
        self.state() == ExecutionState::Completed
    }

    fn is_executing(&self) -> bool {
        self.state() == ExecutionState::Executing
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    fn energy(&self) -> Option<&EnergyStore> {
        self.core().energy()
    }

    fn energy_mut(&mut self) -> Option<&mut EnergyStore> {
        self.core_mut().energy_mut()
    }

    /// Enemy-specific access; `None` for every other actor.
    fn as_enemy(&self) -> Option<&EnemyActor> {
        None
    }

    fn as_enemy_mut(&mut self) -> Option<&mut EnemyActor> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_idempotent() {
        let mut core = ActorCore::default();
        assert!(core.begin());
        assert!(!core.begin());
        assert_eq!(core.state(), ExecutionState::Executing);

        assert!(core.complete());
        assert!(!core.begin());
        assert_eq!(core.state(), ExecutionState::Completed);
    }

    #[test]
    fn completes_once_per_cycle() {
        let mut core = ActorCore::default();
        assert!(!core.complete(), "idle actors cannot complete");
        core.begin();
        assert!(core.complete());
        assert!(!core.complete());
    }

    #[test]
    fn reset_clears_state_and_energy() {
        let mut core = ActorCore::new(Some(EnergyStore::new(3.0, 1.0)));
        core.energy_mut().unwrap().accumulate(1.0);
        core.begin();
        core.complete();

        core.reset();
        assert_eq!(core.state(), ExecutionState::Idle);
        assert_eq!(core.energy().unwrap().total(), 0.0);
    }
}
