//! Error types for the phase coordinator.

use super::Phase;
use crate::actor::ActorId;
use crate::registry::RegistryError;

/// Requests the coordinator rejects because of the current phase.
///
/// Nothing here is raised while a battle runs: `tick` handles stale actors,
/// premature unregistration and budget exhaustion locally.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CycleError {
    #[error("battle already in progress ({phase})")]
    BattleInProgress { phase: Phase },

    #[error("actor {id} cannot be reset during {phase}")]
    ResetDuringBattle { id: ActorId, phase: Phase },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
