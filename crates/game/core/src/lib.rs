//! Deterministic core of the battle simulation.
//!
//! `battle-core` defines the rules of a Prepare → Battle cycle: charged player
//! actions, enemies running weighted skill queues, and the phase coordinator
//! that decides when every participant has finished. It performs no I/O and
//! spawns no tasks; embedders drive a [`Simulation`] with
//! [`Simulation::tick`] and drain its [`SimEvent`]s.
pub mod actions;
pub mod actor;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod energy;
pub mod engine;
pub mod error;
pub mod registry;
pub mod rng;
pub mod skills;
pub mod world;

pub use actions::{ActionKind, ActionTemplate, PlayerAction};
pub use actor::{
    Actor, ActorArena, ActorContext, ActorCore, ActorId, ActorKind, Capabilities, ExecutionState,
};
pub use config::{ConfigError, SimConfig};
pub use enemy::{EnemyActor, EnemyTemplate};
pub use energy::EnergyStore;
pub use engine::{
    ActionSnapshot, ChargeController, CycleError, EnemySnapshot, Phase, SimSnapshot, Simulation,
    SubPhase,
};
pub use error::{ErrorSeverity, SimError};
pub use registry::{CompletionTracker, Registry, RegistryError};
pub use rng::{PcgRng, RngOracle, SeedContext, compute_seed};
pub use skills::{
    EnemyProfile, SkillEntry, SkillExecutor, SkillKind, SkillQueue, SkillQueueBuilder, SkillTable,
    SkillTableError,
};
pub use world::{Base, Battlefield, Command, Commands, EffectKind, EnemyBody, SimEvent};
