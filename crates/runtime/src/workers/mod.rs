//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the [`battle_core::Simulation`] and executes
//! commands against it.

mod simulation;

pub use simulation::{Command, SimulationWorker};
